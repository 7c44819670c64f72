//! Per-request line configuration, passed explicitly to the request
//! constructors and flattened to kernel flags at submission.

use crate::uapi::RequestFlags;

/// Requested direction of a set of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Leave the lines configured as they currently are.
    #[default]
    AsIs,
    Input,
    Output,
}

/// Open-collector drive modes for outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    OpenDrain,
    OpenSource,
}

/// How the lines of one request are configured.
///
/// A plain value: build it, hand it to a request, done. One set of options
/// applies to every line in a request; lines needing different options must
/// be requested separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineOptions {
    direction: Direction,
    active_low: bool,
    drive: Option<Drive>,
}

impl LineOptions {
    /// Options that leave line configuration untouched.
    pub const fn as_is() -> Self {
        Self {
            direction: Direction::AsIs,
            active_low: false,
            drive: None,
        }
    }

    pub const fn input() -> Self {
        Self {
            direction: Direction::Input,
            active_low: false,
            drive: None,
        }
    }

    pub const fn output() -> Self {
        Self {
            direction: Direction::Output,
            active_low: false,
            drive: None,
        }
    }

    /// Inverts polarity: logical high corresponds to electrical low.
    pub const fn active_low(mut self) -> Self {
        self.active_low = true;
        self
    }

    pub const fn open_drain(mut self) -> Self {
        self.drive = Some(Drive::OpenDrain);
        self
    }

    pub const fn open_source(mut self) -> Self {
        self.drive = Some(Drive::OpenSource);
        self
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn is_active_low(&self) -> bool {
        self.active_low
    }

    pub const fn drive(&self) -> Option<Drive> {
        self.drive
    }

    pub(crate) fn request_flags(&self) -> RequestFlags {
        let mut flags = match self.direction {
            Direction::AsIs => RequestFlags::empty(),
            Direction::Input => RequestFlags::INPUT,
            Direction::Output => RequestFlags::OUTPUT,
        };
        if self.active_low {
            flags |= RequestFlags::ACTIVE_LOW;
        }
        match self.drive {
            Some(Drive::OpenDrain) => flags |= RequestFlags::OPEN_DRAIN,
            Some(Drive::OpenSource) => flags |= RequestFlags::OPEN_SOURCE,
            None => (),
        }
        flags
    }

    pub(crate) fn from_request_flags(flags: RequestFlags) -> Self {
        let direction = if flags.contains(RequestFlags::OUTPUT) {
            Direction::Output
        } else if flags.contains(RequestFlags::INPUT) {
            Direction::Input
        } else {
            Direction::AsIs
        };
        let drive = if flags.contains(RequestFlags::OPEN_DRAIN) {
            Some(Drive::OpenDrain)
        } else if flags.contains(RequestFlags::OPEN_SOURCE) {
            Some(Drive::OpenSource)
        } else {
            None
        };

        Self {
            direction,
            active_low: flags.contains(RequestFlags::ACTIVE_LOW),
            drive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_flag_words() {
        assert_eq!(LineOptions::output().request_flags(), RequestFlags::OUTPUT);
        assert_eq!(
            LineOptions::output().active_low().open_drain().request_flags(),
            RequestFlags::OUTPUT | RequestFlags::ACTIVE_LOW | RequestFlags::OPEN_DRAIN
        );
    }

    #[test]
    fn as_is_requests_no_flags() {
        assert_eq!(LineOptions::as_is().request_flags(), RequestFlags::empty());
    }

    #[test]
    fn flag_round_trip_over_every_combination() {
        let directions = [Direction::AsIs, Direction::Input, Direction::Output];
        let drives = [None, Some(Drive::OpenDrain), Some(Drive::OpenSource)];

        for direction in directions {
            for active_low in [false, true] {
                for drive in drives {
                    let options = LineOptions {
                        direction,
                        active_low,
                        drive,
                    };
                    let decoded = LineOptions::from_request_flags(options.request_flags());
                    assert_eq!(decoded, options);
                }
            }
        }
    }
}
