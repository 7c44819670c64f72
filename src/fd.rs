//! Shared lifecycle for owned kernel file descriptors.
//!
//! Chips, line handles, event handles and the watcher all wrap exactly one
//! fd with an explicit, idempotent `close()`. The slot pattern here backs
//! all of them: `Some(fd)` is open, `None` is closed, and dropping an open
//! slot still releases the descriptor through [`OwnedFd`].

use std::os::fd::{IntoRawFd, OwnedFd};

use crate::errors::IoError;

/// Closes the fd in `slot`, surfacing the kernel's close status.
///
/// A second call on an already-empty slot is a no-op. On failure the slot
/// stays empty: per close(2) the descriptor state is unspecified and must
/// not be retried.
pub(crate) fn close_slot(slot: &mut Option<OwnedFd>) -> Result<(), IoError> {
    match slot.take() {
        Some(fd) => nix::unistd::close(fd.into_raw_fd()).map_err(IoError::CloseFailed),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_idempotent() {
        let (r, _w) = nix::unistd::pipe().unwrap();
        let mut slot: Option<OwnedFd> = Some(r);

        assert!(close_slot(&mut slot).is_ok());
        assert!(slot.is_none());
        assert!(close_slot(&mut slot).is_ok());
    }
}
