//! The handle driving a set of requested lines.

use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::errors::IoError;
use crate::fd;
use crate::line::buffer::LineBuffer;
use crate::line::LineDescriptor;
use crate::uapi;

/// Handle controlling the lines acquired by one
/// [`HandleRequest`](crate::line::request::HandleRequest).
///
/// Lines are addressed through the [`LineDescriptor`]s handed out at
/// request time; the buffer slot order is request order, not line-number
/// order. The handle owns its fd independently of the chip that issued it.
#[derive(Debug)]
pub struct LineHandle {
    fd: Option<OwnedFd>,
    lines: heapless::Vec<LineDescriptor, { uapi::GPIOHANDLES_MAX }>,
}

impl LineHandle {
    /// Takes ownership of a handle fd returned by the linehandle ioctl.
    ///
    /// # Safety
    ///
    /// `fd` must be an open descriptor not owned elsewhere.
    pub(crate) unsafe fn from_raw_fd(
        fd: RawFd,
        lines: heapless::Vec<LineDescriptor, { uapi::GPIOHANDLES_MAX }>,
    ) -> Self {
        Self {
            fd: Some(OwnedFd::from_raw_fd(fd)),
            lines,
        }
    }

    /// The driven lines, in request order. Only the first `lines().len()`
    /// slots of a buffer are meaningful for this handle.
    pub fn lines(&self) -> &[LineDescriptor] {
        &self.lines
    }

    fn fd(&self) -> Result<RawFd, IoError> {
        self.fd
            .as_ref()
            .map(AsRawFd::as_raw_fd)
            .ok_or(IoError::Closed)
    }

    /// Reads the current state of all driven lines into a fresh buffer.
    pub fn read(&self) -> Result<LineBuffer, IoError> {
        let mut buffer = LineBuffer::new();
        self.read_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads the current state of all driven lines into `buffer`.
    pub fn read_into(&self, buffer: &mut LineBuffer) -> Result<(), IoError> {
        let fd = self.fd()?;
        let mut data = buffer.to_handle_data();
        unsafe { uapi::gpiohandle_get_line_values(fd, &mut data) }
            .map_err(IoError::classify)?;
        buffer.copy_from_handle_data(&data);
        Ok(())
    }

    /// Writes the state in `buffer` to all driven lines at once. Has no
    /// effect on lines configured as inputs.
    pub fn write(&self, buffer: &LineBuffer) -> Result<(), IoError> {
        let fd = self.fd()?;
        let mut data = buffer.to_handle_data();
        unsafe { uapi::gpiohandle_set_line_values(fd, &mut data) }
            .map_err(IoError::classify)?;
        Ok(())
    }

    /// Releases the fd, letting the kernel free the lines for other
    /// consumers. Idempotent.
    pub fn close(&mut self) -> Result<(), IoError> {
        fd::close_slot(&mut self.fd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::IntoRawFd;

    #[test]
    fn closed_handle_guards_read_and_write() {
        let (r, _w) = nix::unistd::pipe().unwrap();
        let mut lines = heapless::Vec::new();
        lines.push(LineDescriptor::new(17, 0)).unwrap();
        let mut handle = unsafe { LineHandle::from_raw_fd(r.into_raw_fd(), lines) };

        handle.close().unwrap();
        handle.close().unwrap();

        // Fails locally; a syscall on the stale fd would report EBADF
        // instead of Closed.
        assert_eq!(handle.read().err(), Some(IoError::Closed));
        assert_eq!(
            handle.write(&LineBuffer::new()).err(),
            Some(IoError::Closed)
        );
        assert_eq!(handle.lines().len(), 1);
    }
}
