//! Requests for line handles and event handles.
//!
//! Both are plain values: built up front, validated as they are built, and
//! consumed by the [`Chip`](crate::chip::Chip) request call that submits
//! them. Nothing here touches the kernel.

use crate::errors::ConfigError;
use crate::fixed_str::FixedStr;
use crate::line::event::EdgeDetect;
use crate::line::options::LineOptions;
use crate::line::LineDescriptor;
use crate::uapi;

type Consumer = FixedStr<{ uapi::GPIO_MAX_NAME_SIZE }>;

fn consumer_label(consumer: &str) -> Result<Consumer, ConfigError> {
    FixedStr::new(consumer).map_err(|_| ConfigError::ConsumerTooLong)
}

/// Request for a handle driving up to 64 lines at once.
///
/// Every added line receives a [`LineDescriptor`] carrying its index in
/// request order; keep it, it is the only way to address the line in a
/// [`LineBuffer`](crate::line::LineBuffer) afterwards.
#[derive(Debug, Clone)]
pub struct HandleRequest {
    options: LineOptions,
    consumer: Consumer,
    lines: heapless::Vec<u32, { uapi::GPIOHANDLES_MAX }>,
    defaults: [u8; uapi::GPIOHANDLES_MAX],
}

impl HandleRequest {
    pub fn new(options: LineOptions) -> Self {
        Self {
            options,
            consumer: Consumer::empty(),
            lines: heapless::Vec::new(),
            defaults: [0; uapi::GPIOHANDLES_MAX],
        }
    }

    /// Adds a line to the request.
    ///
    /// Fails with [`ConfigError::LineIndexOutOfRange`] once the request
    /// already holds 64 lines.
    pub fn add_line(&mut self, line_number: u32) -> Result<LineDescriptor, ConfigError> {
        let index = self.lines.len();
        self.lines
            .push(line_number)
            .map_err(|_| ConfigError::LineIndexOutOfRange)?;
        Ok(LineDescriptor::new(line_number, index as u8))
    }

    /// Adds a line with an initial output value. Ignored for inputs.
    pub fn add_line_with_default(
        &mut self,
        line_number: u32,
        value: bool,
    ) -> Result<LineDescriptor, ConfigError> {
        let line = self.add_line(line_number)?;
        self.defaults[line.index()] = value as u8;
        Ok(line)
    }

    /// Labels the requested lines with a consumer, at most 31 bytes.
    pub fn set_consumer(&mut self, consumer: &str) -> Result<&mut Self, ConfigError> {
        self.consumer = consumer_label(consumer)?;
        Ok(self)
    }

    pub fn consumer(&self) -> Option<&str> {
        (!self.consumer.is_empty()).then(|| self.consumer.as_str())
    }

    pub fn options(&self) -> LineOptions {
        self.options
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn to_raw(&self) -> uapi::gpiohandle_request {
        let mut raw = uapi::gpiohandle_request::zeroed();
        raw.lineoffsets[..self.lines.len()].copy_from_slice(&self.lines);
        raw.flags = self.options.request_flags();
        raw.default_values = self.defaults;
        raw.consumer_label = self.consumer.into_byte_array();
        raw.lines = self.lines.len() as u32;
        raw.fd = -1;
        raw
    }

    pub(crate) fn descriptors(
        &self,
    ) -> heapless::Vec<LineDescriptor, { uapi::GPIOHANDLES_MAX }> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, number)| LineDescriptor::new(*number, index as u8))
            .collect()
    }
}

/// Request for an event handle monitoring one line for edges.
///
/// Direction is implicitly input; polarity is the only other knob the v1
/// ABI offers here.
#[derive(Debug, Clone)]
pub struct EventRequest {
    line_number: u32,
    edge: EdgeDetect,
    active_low: bool,
    consumer: Consumer,
}

impl EventRequest {
    pub fn new(line_number: u32, edge: EdgeDetect) -> Self {
        Self {
            line_number,
            edge,
            active_low: false,
            consumer: Consumer::empty(),
        }
    }

    pub fn active_low(mut self) -> Self {
        self.active_low = true;
        self
    }

    /// Labels the monitored line with a consumer, at most 31 bytes.
    pub fn consumer(mut self, consumer: &str) -> Result<Self, ConfigError> {
        self.consumer = consumer_label(consumer)?;
        Ok(self)
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn edge(&self) -> EdgeDetect {
        self.edge
    }

    pub(crate) fn to_raw(&self) -> uapi::gpioevent_request {
        let mut raw = uapi::gpioevent_request::zeroed();
        raw.lineoffset = self.line_number;
        raw.handleflags = if self.active_low {
            uapi::RequestFlags::INPUT | uapi::RequestFlags::ACTIVE_LOW
        } else {
            uapi::RequestFlags::INPUT
        };
        raw.eventflags = self.edge.event_flags();
        raw.consumer_label = self.consumer.into_byte_array();
        raw.fd = -1;
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_request_order() {
        let mut request = HandleRequest::new(LineOptions::output());
        let a = request.add_line(17).unwrap();
        let b = request.add_line(27).unwrap();
        let c = request.add_line(22).unwrap();

        assert_eq!((a.line_number(), a.index()), (17, 0));
        assert_eq!((b.line_number(), b.index()), (27, 1));
        assert_eq!((c.line_number(), c.index()), (22, 2));
        assert_eq!(request.descriptors().as_slice(), &[a, b, c]);
    }

    #[test]
    fn sixty_fifth_line_is_rejected() {
        let mut request = HandleRequest::new(LineOptions::input());
        for n in 0..64 {
            request.add_line(n).unwrap();
        }
        assert_eq!(
            request.add_line(64),
            Err(ConfigError::LineIndexOutOfRange)
        );
        assert_eq!(request.num_lines(), 64);
    }

    #[test]
    fn consumer_length_boundary() {
        let mut request = HandleRequest::new(LineOptions::input());
        assert!(request.set_consumer(&"c".repeat(31)).is_ok());
        assert_eq!(
            request.set_consumer(&"c".repeat(32)).err(),
            Some(ConfigError::ConsumerTooLong)
        );

        let event = EventRequest::new(4, EdgeDetect::Both);
        assert!(event.clone().consumer(&"c".repeat(31)).is_ok());
        assert_eq!(
            event.consumer(&"c".repeat(32)).err(),
            Some(ConfigError::ConsumerTooLong)
        );
    }

    #[test]
    fn handle_request_encoding() {
        let mut request = HandleRequest::new(LineOptions::output().active_low());
        request.set_consumer("leds").unwrap();
        request.add_line_with_default(5, true).unwrap();
        request.add_line(6).unwrap();

        let raw = request.to_raw();
        assert_eq!(raw.lineoffsets[0], 5);
        assert_eq!(raw.lineoffsets[1], 6);
        assert_eq!(raw.lines, 2);
        assert_eq!(
            raw.flags,
            uapi::RequestFlags::OUTPUT | uapi::RequestFlags::ACTIVE_LOW
        );
        assert_eq!(raw.default_values[0], 1);
        assert_eq!(raw.default_values[1], 0);
        assert_eq!(&raw.consumer_label[..5], b"leds\0");
        assert_eq!(raw.fd, -1);
    }

    #[test]
    fn event_request_encoding() {
        let raw = EventRequest::new(23, EdgeDetect::Falling)
            .active_low()
            .consumer("button")
            .unwrap()
            .to_raw();

        assert_eq!(raw.lineoffset, 23);
        assert_eq!(
            raw.handleflags,
            uapi::RequestFlags::INPUT | uapi::RequestFlags::ACTIVE_LOW
        );
        assert_eq!(raw.eventflags, uapi::EventFlags::FALLING_EDGE);
        assert_eq!(&raw.consumer_label[..7], b"button\0");
    }
}
