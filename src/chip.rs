//! The GPIO chip device: opening, querying, and issuing handle requests.

use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use bstr::ByteSlice;
use nix::errno::Errno;

use crate::errors::{ConfigError, Error, IoError, OpenError};
use crate::fd;
use crate::fixed_str::FixedStr;
use crate::line::request::{EventRequest, HandleRequest};
use crate::line::{EventHandle, LineHandle};
use crate::uapi;

type Name = FixedStr<{ uapi::GPIO_MAX_NAME_SIZE }>;

fn decode_name(bytes: [u8; uapi::GPIO_MAX_NAME_SIZE]) -> Result<Name, IoError> {
    // Kernel-provided names are ASCII; anything else means the response
    // was not what a GPIO chip produces.
    FixedStr::from_byte_array(bytes).map_err(|_| IoError::Unexpected(Errno::EILSEQ))
}

/// Basic information about a GPIO chip.
#[derive(Debug, Clone)]
pub struct ChipInfo {
    name: Name,
    label: Name,
    lines: u32,
}

impl ChipInfo {
    /// The name of the device driving this chip in the kernel.
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then(|| self.name.as_str())
    }

    /// A functional name for the chip, such as a product number. On a
    /// Raspberry Pi SoC controller this is "pinctrl-bcm2835", for instance.
    pub fn label(&self) -> Option<&str> {
        (!self.label.is_empty()).then(|| self.label.as_str())
    }

    /// The number of lines addressable through this chip. Not all of them
    /// are necessarily usable depending on how the hardware is muxed.
    pub const fn num_lines(&self) -> u32 {
        self.lines
    }
}

/// Information about one line of a chip.
#[derive(Debug, Clone)]
pub struct LineInfo {
    line_number: u32,
    flags: uapi::InfoFlags,
    name: Name,
    consumer: Name,
}

impl LineInfo {
    pub const fn line_number(&self) -> u32 {
        self.line_number
    }

    /// The line's name as specified by the chip, e.g. a pin header name.
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then(|| self.name.as_str())
    }

    /// Whoever currently holds the line, if it is held and the holder
    /// bothered to label itself.
    pub fn consumer(&self) -> Option<&str> {
        (!self.consumer.is_empty()).then(|| self.consumer.as_str())
    }

    pub const fn flags(&self) -> uapi::InfoFlags {
        self.flags
    }

    /// Whether the line is held by the kernel or another consumer.
    pub fn is_used(&self) -> bool {
        self.flags.contains(uapi::InfoFlags::KERNEL)
    }

    pub fn is_output(&self) -> bool {
        self.flags.contains(uapi::InfoFlags::IS_OUT)
    }

    pub fn is_active_low(&self) -> bool {
        self.flags.contains(uapi::InfoFlags::ACTIVE_LOW)
    }

    pub fn is_open_drain(&self) -> bool {
        self.flags.contains(uapi::InfoFlags::OPEN_DRAIN)
    }

    pub fn is_open_source(&self) -> bool {
        self.flags.contains(uapi::InfoFlags::OPEN_SOURCE)
    }
}

/// A GPIO chip device, `/dev/gpiochipN`.
///
/// The kernel enforces a single opener per chip. The chip fd is only needed
/// to query information and to issue requests: the line and event handles a
/// chip hands out own their fds independently, so it is fine practice to
/// close the chip as soon as all resources are acquired and let another
/// process open it.
#[derive(Debug)]
pub struct Chip {
    fd: Option<OwnedFd>,
}

impl Chip {
    /// Opens the chip device at `path` read-write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_ref())
            .map_err(OpenError::from_io)?;

        Ok(Self {
            fd: Some(OwnedFd::from(file)),
        })
    }

    /// Opens `/dev/gpiochip<index>`.
    pub fn open_index(index: u32) -> Result<Self, OpenError> {
        Self::open(format!("/dev/gpiochip{index}"))
    }

    fn fd(&self) -> Result<RawFd, IoError> {
        self.fd
            .as_ref()
            .map(AsRawFd::as_raw_fd)
            .ok_or(IoError::Closed)
    }

    /// Closes the chip device. Idempotent; issued handles stay valid.
    pub fn close(&mut self) -> Result<(), IoError> {
        fd::close_slot(&mut self.fd)
    }

    /// Queries name, label and line count.
    ///
    /// Fails with [`IoError::NotAGpioDevice`] when the opened file is not a
    /// GPIO character device.
    pub fn info(&self) -> Result<ChipInfo, IoError> {
        let fd = self.fd()?;
        let mut info = uapi::gpiochip_info::zeroed();
        unsafe { uapi::gpio_get_chipinfo(fd, &mut info) }.map_err(IoError::classify)?;

        Ok(ChipInfo {
            name: decode_name(info.name)?,
            label: decode_name(info.label)?,
            lines: info.lines,
        })
    }

    /// Queries one line. The range check runs locally: the handle ABI only
    /// addresses lines 0..64, so anything beyond is rejected before the
    /// kernel sees it.
    pub fn line_info(&self, line_number: u32) -> Result<LineInfo, Error> {
        if line_number >= uapi::GPIOHANDLES_MAX as u32 {
            return Err(ConfigError::LineIndexOutOfRange.into());
        }

        let fd = self.fd().map_err(Error::Io)?;
        let mut info = uapi::gpioline_info::zeroed();
        info.line_offset = line_number;
        unsafe { uapi::gpio_get_lineinfo(fd, &mut info) }
            .map_err(|errno| Error::Io(IoError::classify(errno)))?;

        Ok(LineInfo {
            line_number,
            flags: info.flags,
            name: decode_name(info.name).map_err(Error::Io)?,
            consumer: decode_name(info.consumer).map_err(Error::Io)?,
        })
    }

    /// Submits a handle request, returning the handle that drives the
    /// requested lines.
    ///
    /// The new fd belongs to the returned handle, not to the chip; the
    /// caller (or drop) closes it. A line already held elsewhere fails with
    /// [`IoError::LineBusy`].
    pub fn request_handle(&self, request: HandleRequest) -> Result<LineHandle, IoError> {
        let fd = self.fd()?;
        let mut raw = request.to_raw();
        unsafe { uapi::gpio_get_linehandle(fd, &mut raw) }.map_err(IoError::classify)?;

        Ok(unsafe { LineHandle::from_raw_fd(raw.fd, request.descriptors()) })
    }

    /// Submits an event request, returning the handle monitoring the line.
    pub fn request_event(&self, request: EventRequest) -> Result<EventHandle, IoError> {
        let fd = self.fd()?;
        let mut raw = request.to_raw();
        unsafe { uapi::gpio_get_lineevent(fd, &mut raw) }.map_err(IoError::classify)?;

        Ok(unsafe { EventHandle::from_raw_fd(raw.fd, request.line_number()) })
    }
}

/// Iterates over all GPIO chip devices present on this system.
pub fn chips() -> Result<ChipIterator, OpenError> {
    Ok(ChipIterator {
        readdir: std::fs::read_dir("/dev").map_err(OpenError::from_io)?,
    })
}

/// Iterator over `/dev/gpiochip*` entries.
#[derive(Debug)]
pub struct ChipIterator {
    readdir: std::fs::ReadDir,
}

impl Iterator for ChipIterator {
    type Item = Result<Chip, OpenError>;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in &mut self.readdir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(OpenError::from_io(e)));
                }
            };
            let path = entry.path();
            let Some(name) = path.file_name() else {
                continue;
            };
            if name.as_bytes().contains_str("gpiochip") {
                return Some(Chip::open(&path));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_info_checks_the_range_locally() {
        let chip = Chip {
            // Closed chip: proves the range check runs before anything else.
            fd: None,
        };
        assert!(matches!(
            chip.line_info(64),
            Err(Error::Config(ConfigError::LineIndexOutOfRange))
        ));
        assert!(matches!(chip.line_info(63), Err(Error::Io(IoError::Closed))));
    }

    #[test]
    fn operations_on_a_closed_chip_fail_locally() {
        let mut chip = Chip { fd: None };
        assert_eq!(chip.close(), Ok(()));
        assert_eq!(chip.info().err(), Some(IoError::Closed));
        assert_eq!(
            chip.request_event(EventRequest::new(4, crate::line::EdgeDetect::Both))
                .err(),
            Some(IoError::Closed)
        );
    }
}
