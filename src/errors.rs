//! Error taxonomy for the crate.
//!
//! Every kernel-facing call returns a `Result`; local precondition failures
//! (closed handles, oversized consumer labels, out-of-range indices) are
//! reported before any syscall is issued. The sub-enums stay distinct so
//! callers can match precisely; [`Error`] is the umbrella that all of them
//! convert into, which is what `?` propagation in application code sees.

use nix::errno::Errno;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure to open a GPIO chip device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OpenError {
    #[error("GPIO device not found")]
    NotFound,
    #[error("permission denied while opening GPIO device")]
    PermissionDenied,
    #[error("unable to open GPIO device: {0}")]
    OpenFailed(Errno),
}

impl OpenError {
    pub(crate) fn classify(errno: Errno) -> Self {
        match errno {
            Errno::ENOENT => OpenError::NotFound,
            Errno::EACCES => OpenError::PermissionDenied,
            errno => OpenError::OpenFailed(errno),
        }
    }

    pub(crate) fn from_io(err: std::io::Error) -> Self {
        Self::classify(err.raw_os_error().map_or(Errno::UnknownErrno, Errno::from_raw))
    }
}

/// Failure of a kernel-facing operation on a chip, handle or watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IoError {
    /// The file descriptor does not refer to a GPIO character device (ENOTTY).
    #[error("not a GPIO character device")]
    NotAGpioDevice,
    /// A requested line is already held by another consumer (EBUSY).
    #[error("line already requested by another consumer")]
    LineBusy,
    /// The kernel rejected the request as malformed (EINVAL).
    #[error("kernel rejected the request as invalid")]
    InvalidRequest,
    /// The handle was closed; no syscall was attempted.
    #[error("operation on a closed handle")]
    Closed,
    /// The underlying close(2) failed; the state of the descriptor is
    /// unspecified afterwards, matching the kernel's close semantics.
    #[error("closing file descriptor failed: {0}")]
    CloseFailed(Errno),
    /// The readiness notification reported an error condition on the fd
    /// registered with this tag; no event record was read.
    #[error("error condition on monitored line with tag {0}")]
    LineError(u32),
    /// The event fd returned fewer bytes than one event record.
    #[error("truncated event record")]
    TruncatedEvent,
    /// Any other kernel error, carried verbatim. Includes EINTR, which is
    /// surfaced rather than retried.
    #[error("unexpected kernel error: {0}")]
    Unexpected(Errno),
}

impl IoError {
    pub(crate) fn classify(errno: Errno) -> Self {
        match errno {
            Errno::ENOTTY => IoError::NotAGpioDevice,
            Errno::EBUSY => IoError::LineBusy,
            Errno::EINVAL => IoError::InvalidRequest,
            errno => IoError::Unexpected(errno),
        }
    }
}

/// Invalid request configuration, caught before reaching the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Consumer labels are at most 31 bytes plus a NUL terminator.
    #[error("consumer label must be at most 31 bytes")]
    ConsumerTooLong,
    /// A handle drives at most 64 lines, addressed by index 0..64.
    #[error("line index out of range")]
    LineIndexOutOfRange,
}

/// Umbrella over everything this crate can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_classification() {
        assert_eq!(OpenError::classify(Errno::ENOENT), OpenError::NotFound);
        assert_eq!(
            OpenError::classify(Errno::EACCES),
            OpenError::PermissionDenied
        );
        assert_eq!(
            OpenError::classify(Errno::EMFILE),
            OpenError::OpenFailed(Errno::EMFILE)
        );
    }

    #[test]
    fn io_classification() {
        assert_eq!(IoError::classify(Errno::ENOTTY), IoError::NotAGpioDevice);
        assert_eq!(IoError::classify(Errno::EBUSY), IoError::LineBusy);
        assert_eq!(IoError::classify(Errno::EINVAL), IoError::InvalidRequest);
        assert_eq!(
            IoError::classify(Errno::EINTR),
            IoError::Unexpected(Errno::EINTR)
        );
    }
}
