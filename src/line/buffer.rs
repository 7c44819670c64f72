//! The fixed state buffer shared by line reads and writes.

use crate::line::LineDescriptor;
use crate::uapi;

/// State of up to 64 lines, one byte per line. Does no I/O on its own.
///
/// Slots are addressed by the index carried in a [`LineDescriptor`], never
/// by raw line number. The buffer is read and written whole by the
/// GET/SET_LINE_VALUES ioctls; only the first N slots are meaningful, where
/// N is the line count of the originating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    values: [u8; uapi::GPIOHANDLES_MAX],
}

impl LineBuffer {
    /// How many lines a buffer can describe.
    pub const SIZE: usize = uapi::GPIOHANDLES_MAX;

    pub const fn new() -> Self {
        Self {
            values: [0; Self::SIZE],
        }
    }

    /// State of the given line.
    pub fn get(&self, line: LineDescriptor) -> bool {
        self.values[line.index()] == 1
    }

    /// Sets the new state of the given line.
    pub fn set(&mut self, line: LineDescriptor, value: bool) -> &mut Self {
        self.values[line.index()] = value as u8;
        self
    }

    /// Flips the state of the given line.
    pub fn toggle(&mut self, line: LineDescriptor) -> &mut Self {
        let value = self.get(line);
        self.set(line, !value)
    }

    /// Resets every slot to low.
    pub fn clear(&mut self) -> &mut Self {
        self.values = [0; Self::SIZE];
        self
    }

    pub(crate) fn to_handle_data(&self) -> uapi::gpiohandle_data {
        uapi::gpiohandle_data {
            values: self.values,
        }
    }

    pub(crate) fn copy_from_handle_data(&mut self, data: &uapi::gpiohandle_data) {
        self.values = data.values;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
