// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `gpio-chardev` crate provides access to the [GPIO character device
//! ABI](https://www.kernel.org/doc/Documentation/ABI/testing/gpio-cdev)
//! (`/dev/gpiochipN`), the Linux interface that replaced the legacy sysfs
//! GPIO files.
//!
//! A [`Chip`] wraps one opened device and issues requests. A
//! [`HandleRequest`] acquires a [`LineHandle`] driving up to 64 lines at
//! once, read and written as a whole through a [`LineBuffer`] addressed by
//! the [`LineDescriptor`]s handed out while building the request. An
//! [`EventRequest`] acquires an [`EventHandle`] delivering edge events for
//! one line, and an [`EventWatcher`] multiplexes blocking waits over many
//! event handles from a single thread.
//!
//! Handles own their file descriptors independently of the chip: closing
//! the chip early, so other processes can open it, is fine and encouraged.
//!
//! Events are queued by the kernel until read, but Linux is not a real-time
//! operating system out of the box; do not build hard-latency logic on top
//! of this interface.
//!
//! # Examples
//!
//! Drive three lines as outputs and flip them together:
//!
//! ```no_run
//! use gpio_chardev::{Chip, HandleRequest, LineBuffer, LineOptions};
//!
//! fn main() -> Result<(), gpio_chardev::Error> {
//!     let chip = Chip::open("/dev/gpiochip0")?;
//!
//!     let mut request = HandleRequest::new(LineOptions::output());
//!     request.set_consumer("three-leds")?;
//!     let red = request.add_line(17)?;
//!     let amber = request.add_line(27)?;
//!     let green = request.add_line_with_default(22, true)?;
//!     let handle = chip.request_handle(request)?;
//!
//!     let mut buffer = LineBuffer::new();
//!     buffer.set(red, true).set(amber, true).set(green, false);
//!     handle.write(&buffer)?;
//!     Ok(())
//! }
//! ```
//!
//! Monitor two buttons from one thread:
//!
//! ```no_run
//! use gpio_chardev::{Chip, EdgeDetect, EventRequest, EventWatcher};
//!
//! fn main() -> Result<(), gpio_chardev::Error> {
//!     let mut chip = Chip::open("/dev/gpiochip0")?;
//!     let up = chip.request_event(EventRequest::new(23, EdgeDetect::Rising))?;
//!     let down = chip.request_event(EventRequest::new(24, EdgeDetect::Rising))?;
//!     chip.close()?;
//!
//!     let mut watcher = EventWatcher::new()?;
//!     watcher.register(&up, 23)?;
//!     watcher.register(&down, 24)?;
//!
//!     while let Some(event) = watcher.wait(5000)? {
//!         println!("button {} pressed at {}ns", event.tag(), event.timestamp_ns());
//!     }
//!     println!("nothing pressed for five seconds");
//!     Ok(())
//! }
//! ```

mod errors;
mod fd;

pub mod chip;
pub mod fixed_str;
pub mod line;
#[allow(non_camel_case_types)]
pub mod uapi;
pub mod watcher;

pub use chip::{chips, Chip, ChipInfo, LineInfo};
pub use errors::{ConfigError, Error, IoError, OpenError, Result};
pub use line::{
    Direction, Drive, EdgeDetect, Event, EventHandle, EventKind, EventRequest, HandleRequest,
    LineBuffer, LineDescriptor, LineHandle, LineOptions,
};
pub use uapi::InfoFlags;
pub use watcher::EventWatcher;
