//! Edge events and the handle that produces them.

use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::errors::IoError;
use crate::fd;
use crate::line::buffer::LineBuffer;
use crate::uapi;

/// Which edge transitions generate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDetect {
    Rising,
    Falling,
    Both,
}

impl EdgeDetect {
    pub(crate) const fn event_flags(self) -> uapi::EventFlags {
        match self {
            EdgeDetect::Rising => uapi::EventFlags::RISING_EDGE,
            EdgeDetect::Falling => uapi::EventFlags::FALLING_EDGE,
            EdgeDetect::Both => uapi::EventFlags::BOTH_EDGES,
        }
    }
}

/// The edge a single event was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Rising,
    Falling,
}

/// One edge event, tagged with a logical identifier.
///
/// For events read directly off an [`EventHandle`] the tag is the line
/// number; for events delivered by an
/// [`EventWatcher`](crate::watcher::EventWatcher) it is whatever tag the
/// handle was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    timestamp_ns: u64,
    id: uapi::EventId,
    tag: u32,
}

impl Event {
    /// Reads and decodes exactly one event record from `fd`, blocking until
    /// one is available. EINTR is surfaced, not retried.
    pub(crate) fn read_from(fd: RawFd, tag: u32) -> Result<Self, IoError> {
        let mut buf = [0u8; uapi::gpioevent_data::SIZE];
        let n = nix::unistd::read(fd, &mut buf).map_err(IoError::Unexpected)?;
        if n != buf.len() {
            return Err(IoError::TruncatedEvent);
        }

        let data = uapi::gpioevent_data::from_bytes(buf);
        Ok(Self {
            timestamp_ns: data.timestamp,
            id: data.id,
            tag,
        })
    }

    /// Best-estimate time of the event in nanoseconds, on the kernel's
    /// event clock.
    pub const fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// The logical identifier attached to this event.
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    pub fn is_rising(&self) -> bool {
        self.id.contains(uapi::EventId::RISING_EDGE)
    }

    pub fn is_falling(&self) -> bool {
        self.id.contains(uapi::EventId::FALLING_EDGE)
    }

    pub fn kind(&self) -> EventKind {
        if self.is_rising() {
            EventKind::Rising
        } else {
            EventKind::Falling
        }
    }
}

/// Handle monitoring one line for edge events.
///
/// Owns its fd independently of the [`Chip`](crate::chip::Chip) that issued
/// it; closing the chip does not invalidate the handle. The only states are
/// open and closed, and every operation on a closed handle fails with
/// [`IoError::Closed`] before any syscall.
#[derive(Debug)]
pub struct EventHandle {
    fd: Option<OwnedFd>,
    line_number: u32,
}

impl EventHandle {
    /// Takes ownership of an event fd returned by the lineevent ioctl.
    ///
    /// # Safety
    ///
    /// `fd` must be an open descriptor not owned elsewhere.
    pub(crate) unsafe fn from_raw_fd(fd: RawFd, line_number: u32) -> Self {
        Self {
            fd: Some(OwnedFd::from_raw_fd(fd)),
            line_number,
        }
    }

    /// The line this handle monitors.
    pub const fn line_number(&self) -> u32 {
        self.line_number
    }

    pub(crate) fn fd(&self) -> Result<RawFd, IoError> {
        self.fd
            .as_ref()
            .map(AsRawFd::as_raw_fd)
            .ok_or(IoError::Closed)
    }

    /// Blocks until the monitored line records an edge, then returns the
    /// event, tagged with the line number.
    ///
    /// Only data arrival, a timeout-free close of the fd from elsewhere, or
    /// a signal (surfaced as EINTR) end the wait; use an
    /// [`EventWatcher`](crate::watcher::EventWatcher) for timeouts and for
    /// monitoring several lines from one thread.
    pub fn read_blocking(&self) -> Result<Event, IoError> {
        Event::read_from(self.fd()?, self.line_number)
    }

    /// Current state of the monitored line, through the same values ioctl
    /// line handles use; the line sits at index 0.
    pub fn read_value(&self) -> Result<bool, IoError> {
        let mut buffer = LineBuffer::new();
        self.read_into(&mut buffer)?;
        Ok(buffer.to_handle_data().values[0] == 1)
    }

    /// Reads the monitored line's state into `buffer` at index 0.
    pub fn read_into(&self, buffer: &mut LineBuffer) -> Result<(), IoError> {
        let fd = self.fd()?;
        let mut data = buffer.to_handle_data();
        unsafe { uapi::gpiohandle_get_line_values(fd, &mut data) }
            .map_err(IoError::classify)?;
        buffer.copy_from_handle_data(&data);
        Ok(())
    }

    /// Releases the fd. Idempotent; the kernel cleans up the event queue.
    pub fn close(&mut self) -> Result<(), IoError> {
        fd::close_slot(&mut self.fd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::IntoRawFd;

    fn pipe_backed_handle(line_number: u32) -> (EventHandle, OwnedFd) {
        let (r, w) = nix::unistd::pipe().unwrap();
        let handle = unsafe { EventHandle::from_raw_fd(r.into_raw_fd(), line_number) };
        (handle, w)
    }

    #[test]
    fn read_blocking_decodes_one_record() {
        let (handle, w) = pipe_backed_handle(17);
        let record = uapi::gpioevent_data {
            timestamp: 1_234_567_890,
            id: uapi::EventId::RISING_EDGE,
        };
        nix::unistd::write(&w, &record.to_bytes()).unwrap();

        let event = handle.read_blocking().unwrap();
        assert_eq!(event.timestamp_ns(), 1_234_567_890);
        assert_eq!(event.tag(), 17);
        assert!(event.is_rising());
        assert!(!event.is_falling());
        assert_eq!(event.kind(), EventKind::Rising);
    }

    #[test]
    fn short_record_is_truncated() {
        let (handle, w) = pipe_backed_handle(3);
        nix::unistd::write(&w, &[0u8; 4]).unwrap();
        drop(w);

        assert_eq!(handle.read_blocking(), Err(IoError::TruncatedEvent));
    }

    #[test]
    fn closed_handle_guards_every_operation() {
        let (mut handle, _w) = pipe_backed_handle(9);
        handle.close().unwrap();
        handle.close().unwrap();

        assert_eq!(handle.read_blocking(), Err(IoError::Closed));
        assert_eq!(handle.read_value(), Err(IoError::Closed));
        assert_eq!(handle.line_number(), 9);
    }
}
