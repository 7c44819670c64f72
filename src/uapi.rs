// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Kernel uAPI for the GPIO character device: the v1 ioctl request family
//! and the structures it exchanges.
//!
//! These structs are a wire protocol. Field order, sizes and natural
//! alignment must byte-match the kernel's [`linux/gpio.h`] on the target
//! architecture; the layout is pinned by the tests at the bottom of this
//! module.
//!
//! [`linux/gpio.h`]: https://github.com/torvalds/linux/blob/v5.19/include/uapi/linux/gpio.h

use bitflags::bitflags;
use nix::{ioctl_read, ioctl_readwrite};

/// Size of the fixed name/label/consumer fields, terminator included.
pub const GPIO_MAX_NAME_SIZE: usize = 32;

/// Most lines one handle request can drive.
pub const GPIOHANDLES_MAX: usize = 64;

bitflags! {
    /// Informational flags reported for a line.
    ///
    /// Maps to kernel `GPIOLINE_FLAG_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InfoFlags: u32 {
        const KERNEL = 1 << 0;
        const IS_OUT = 1 << 1;
        const ACTIVE_LOW = 1 << 2;
        const OPEN_DRAIN = 1 << 3;
        const OPEN_SOURCE = 1 << 4;
    }
}

bitflags! {
    /// Flags requesting how lines are driven.
    ///
    /// Maps to kernel `GPIOHANDLE_REQUEST_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RequestFlags: u32 {
        const INPUT = 1 << 0;
        const OUTPUT = 1 << 1;
        const ACTIVE_LOW = 1 << 2;
        const OPEN_DRAIN = 1 << 3;
        const OPEN_SOURCE = 1 << 4;
    }
}

bitflags! {
    /// Edge selection in an event request.
    ///
    /// Maps to kernel `GPIOEVENT_REQUEST_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventFlags: u32 {
        const RISING_EDGE = 1 << 0;
        const FALLING_EDGE = 1 << 1;
        const BOTH_EDGES = Self::RISING_EDGE.bits() | Self::FALLING_EDGE.bits();
    }
}

bitflags! {
    /// Edge identifier carried in an event record.
    ///
    /// Maps to kernel `GPIOEVENT_EVENT_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventId: u32 {
        const RISING_EDGE = 0x01;
        const FALLING_EDGE = 0x02;
    }
}

#[repr(C)]
pub struct gpiochip_info {
    pub name: [u8; GPIO_MAX_NAME_SIZE],
    pub label: [u8; GPIO_MAX_NAME_SIZE],
    pub lines: u32,
}

impl gpiochip_info {
    pub fn zeroed() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

#[repr(C)]
pub struct gpioline_info {
    /// Filled in by the caller to select the line to query.
    pub line_offset: u32,
    pub flags: InfoFlags,
    pub name: [u8; GPIO_MAX_NAME_SIZE],
    pub consumer: [u8; GPIO_MAX_NAME_SIZE],
}

impl gpioline_info {
    pub fn zeroed() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

#[repr(C)]
pub struct gpiohandle_request {
    /// Desired lines, by chip-relative offset; the position in this array is
    /// the index the returned handle addresses the line by.
    pub lineoffsets: [u32; GPIOHANDLES_MAX],
    /// One set of flags for every requested line. Lines needing different
    /// flags must be requested separately.
    pub flags: RequestFlags,
    /// Initial output values, 0 or 1, parallel to `lineoffsets`. Ignored
    /// for inputs.
    pub default_values: [u8; GPIOHANDLES_MAX],
    pub consumer_label: [u8; GPIO_MAX_NAME_SIZE],
    /// Number of valid entries in the arrays above.
    pub lines: u32,
    /// Populated by the kernel on success with the new handle fd.
    pub fd: libc::c_int,
}

impl gpiohandle_request {
    pub fn zeroed() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

/// Whole-buffer line state, exchanged by the GET/SET_LINE_VALUES ioctls.
/// There is no partial update at the ABI level.
#[repr(C)]
pub struct gpiohandle_data {
    pub values: [u8; GPIOHANDLES_MAX],
}

impl gpiohandle_data {
    pub fn zeroed() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

#[repr(C)]
pub struct gpioevent_request {
    pub lineoffset: u32,
    /// Direction is implicitly input; only the modifier flags matter here.
    pub handleflags: RequestFlags,
    pub eventflags: EventFlags,
    pub consumer_label: [u8; GPIO_MAX_NAME_SIZE],
    /// Populated by the kernel on success with the new event fd.
    pub fd: libc::c_int,
}

impl gpioevent_request {
    pub fn zeroed() -> Self {
        unsafe { std::mem::zeroed() }
    }
}

/// One edge event, read from an event fd rather than via ioctl.
///
/// The payload is 12 bytes, padded to the struct's natural alignment; the
/// kernel writes exactly `size_of::<gpioevent_data>()` bytes per record on
/// the running architecture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct gpioevent_data {
    /// Best-estimate time of the event, in nanoseconds.
    pub timestamp: u64,
    pub id: EventId,
}

impl gpioevent_data {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        unsafe { std::mem::transmute(bytes) }
    }

    #[cfg(test)]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        unsafe { std::mem::transmute(self) }
    }
}

ioctl_read!(gpio_get_chipinfo, 0xB4, 0x01, gpiochip_info);
ioctl_readwrite!(gpio_get_lineinfo, 0xB4, 0x02, gpioline_info);
ioctl_readwrite!(gpio_get_linehandle, 0xB4, 0x03, gpiohandle_request);
ioctl_readwrite!(gpio_get_lineevent, 0xB4, 0x04, gpioevent_request);

ioctl_readwrite!(gpiohandle_get_line_values, 0xB4, 0x08, gpiohandle_data);
ioctl_readwrite!(gpiohandle_set_line_values, 0xB4, 0x09, gpiohandle_data);

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn chip_info_layout() {
        assert_eq!(size_of::<gpiochip_info>(), 68);
        assert_eq!(offset_of!(gpiochip_info, name), 0);
        assert_eq!(offset_of!(gpiochip_info, label), 32);
        assert_eq!(offset_of!(gpiochip_info, lines), 64);
    }

    #[test]
    fn line_info_layout() {
        assert_eq!(size_of::<gpioline_info>(), 72);
        assert_eq!(offset_of!(gpioline_info, line_offset), 0);
        assert_eq!(offset_of!(gpioline_info, flags), 4);
        assert_eq!(offset_of!(gpioline_info, name), 8);
        assert_eq!(offset_of!(gpioline_info, consumer), 40);
    }

    #[test]
    fn handle_request_layout() {
        assert_eq!(size_of::<gpiohandle_request>(), 364);
        assert_eq!(offset_of!(gpiohandle_request, lineoffsets), 0);
        assert_eq!(offset_of!(gpiohandle_request, flags), 256);
        assert_eq!(offset_of!(gpiohandle_request, default_values), 260);
        assert_eq!(offset_of!(gpiohandle_request, consumer_label), 324);
        assert_eq!(offset_of!(gpiohandle_request, lines), 356);
        assert_eq!(offset_of!(gpiohandle_request, fd), 360);
    }

    #[test]
    fn event_request_layout() {
        assert_eq!(size_of::<gpioevent_request>(), 48);
        assert_eq!(offset_of!(gpioevent_request, lineoffset), 0);
        assert_eq!(offset_of!(gpioevent_request, handleflags), 4);
        assert_eq!(offset_of!(gpioevent_request, eventflags), 8);
        assert_eq!(offset_of!(gpioevent_request, consumer_label), 12);
        assert_eq!(offset_of!(gpioevent_request, fd), 44);
    }

    #[test]
    fn handle_data_layout() {
        assert_eq!(size_of::<gpiohandle_data>(), 64);
    }

    #[test]
    fn event_data_layout() {
        // 12 bytes of payload plus natural padding for the u64.
        assert_eq!(offset_of!(gpioevent_data, timestamp), 0);
        assert_eq!(offset_of!(gpioevent_data, id), 8);
        let align = std::mem::align_of::<gpioevent_data>();
        assert_eq!(size_of::<gpioevent_data>(), (12 + align - 1) / align * align);
    }

    #[test]
    fn event_data_byte_round_trip() {
        let data = gpioevent_data {
            timestamp: 0x0102_0304_0506_0708,
            id: EventId::FALLING_EDGE,
        };
        let decoded = gpioevent_data::from_bytes(data.to_bytes());
        assert_eq!(decoded, data);
    }
}
