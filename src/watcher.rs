//! Multiplexed waiting on many event handles from a single thread.

use std::os::fd::{FromRawFd, OwnedFd, RawFd};

use nix::errno::Errno;

use crate::errors::IoError;
use crate::fd;
use crate::line::event::{Event, EventHandle};

/// The correlation word stored with each readiness registration: fd in the
/// low 32 bits, caller tag in the high 32 bits. Pack and unpack live here
/// so the encoding exists in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    fd: RawFd,
    tag: u32,
}

impl Token {
    const fn new(fd: RawFd, tag: u32) -> Self {
        Self { fd, tag }
    }

    const fn pack(self) -> u64 {
        (self.fd as u32 as u64) | ((self.tag as u64) << 32)
    }

    const fn unpack(word: u64) -> Self {
        Self {
            fd: word as u32 as RawFd,
            tag: (word >> 32) as u32,
        }
    }
}

/// Waits on many [`EventHandle`]s at once, without one thread per line.
///
/// Registrations are weak: the watcher keeps only the fd and the caller's
/// tag, and closing the watcher never closes the registered handles. The
/// intended pattern is one thread calling [`wait`](Self::wait) in a loop
/// for all monitored lines.
///
/// Like every type in this crate the watcher wraps a single kernel
/// resource with no internal locking; share it across threads only with
/// external synchronization.
#[derive(Debug)]
pub struct EventWatcher {
    epfd: Option<OwnedFd>,
}

impl EventWatcher {
    /// Allocates the readiness context.
    pub fn new() -> Result<Self, IoError> {
        let fd = unsafe { libc::epoll_create1(libc::EPOLL_CLOEXEC) };
        if fd < 0 {
            return Err(IoError::Unexpected(Errno::last()));
        }

        Ok(Self {
            epfd: Some(unsafe { OwnedFd::from_raw_fd(fd) }),
        })
    }

    fn epfd(&self) -> Result<RawFd, IoError> {
        self.epfd
            .as_ref()
            .map(std::os::fd::AsRawFd::as_raw_fd)
            .ok_or(IoError::Closed)
    }

    /// Starts monitoring `handle`, associating `tag` with it.
    ///
    /// The tag comes back on every event delivered for this handle; using
    /// the line number is common, but any identifier works. Readiness is
    /// requested for readable and priority conditions.
    pub fn register(&mut self, handle: &EventHandle, tag: u32) -> Result<(), IoError> {
        let epfd = self.epfd()?;
        let fd = handle.fd()?;
        let mut event = libc::epoll_event {
            events: (libc::EPOLLIN | libc::EPOLLPRI) as u32,
            u64: Token::new(fd, tag).pack(),
        };

        if unsafe { libc::epoll_ctl(epfd, libc::EPOLL_CTL_ADD, fd, &mut event) } < 0 {
            return Err(IoError::Unexpected(Errno::last()));
        }
        Ok(())
    }

    /// Stops monitoring `handle`. The handle itself stays open.
    pub fn unregister(&mut self, handle: &EventHandle) -> Result<(), IoError> {
        let epfd = self.epfd()?;
        let fd = handle.fd()?;
        // The event argument is ignored for EPOLL_CTL_DEL but must be
        // non-null on kernels before 2.6.9.
        let mut unused = libc::epoll_event { events: 0, u64: 0 };

        if unsafe { libc::epoll_ctl(epfd, libc::EPOLL_CTL_DEL, fd, &mut unused) } < 0 {
            return Err(IoError::Unexpected(Errno::last()));
        }
        Ok(())
    }

    /// Waits up to `timeout_ms` milliseconds for one registered handle to
    /// become ready, reads one event record from it, and returns the event
    /// tagged with the handle's registration tag.
    ///
    /// A negative timeout waits indefinitely. `Ok(None)` means the timeout
    /// elapsed with nothing ready. One event is consumed per call even if
    /// several handles are ready at once; drain with repeated calls and a
    /// zero/short timeout. Readiness order across simultaneously ready
    /// handles is whatever the kernel reports.
    ///
    /// An error condition signaled on the ready fd returns
    /// [`IoError::LineError`] with its tag, without attempting a read.
    /// EINTR is surfaced, not retried.
    pub fn wait(&mut self, timeout_ms: i32) -> Result<Option<Event>, IoError> {
        let epfd = self.epfd()?;
        let mut ready = libc::epoll_event { events: 0, u64: 0 };
        // epoll_wait(2) only defines -1 as "block forever"; fold every
        // negative timeout into it.
        let timeout_ms = timeout_ms.max(-1);

        let n = unsafe { libc::epoll_wait(epfd, &mut ready, 1, timeout_ms) };
        if n < 0 {
            return Err(IoError::Unexpected(Errno::last()));
        }
        if n == 0 {
            return Ok(None);
        }

        let token = Token::unpack(ready.u64);
        if ready.events & libc::EPOLLERR as u32 != 0 {
            return Err(IoError::LineError(token.tag));
        }

        Event::read_from(token.fd, token.tag).map(Some)
    }

    /// Releases the readiness context. Idempotent; registered event
    /// handles are not closed.
    pub fn close(&mut self) -> Result<(), IoError> {
        fd::close_slot(&mut self.epfd)
    }
}
