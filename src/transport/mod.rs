//! The driver side of the pipeline.
//!
//! A [`Transport`] receives parameters and packed frames from the
//! [`Controller`](crate::Controller) and turns them into the WS281x signal.

use std::io;

use rpi_ws281x_shared::{
	PARAM_BRIGHTNESS,
	PARAM_COUNT,
	PARAM_DMA,
	PARAM_FREQ,
	PARAM_GPIO,
	PARAM_INVERT,
	PARAM_STRIP_TYPE,
};

mod serial;
mod stub;

pub use serial::SerialTransport;
pub use stub::StubTransport;

/// Global parameters, set before [`Transport::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
	Freq,
	Dma,
}

impl Param {
	pub fn code(self) -> u32 {
		match self {
			Param::Freq => PARAM_FREQ,
			Param::Dma => PARAM_DMA,
		}
	}
}

/// Per-channel parameters. Only [`ChannelParam::Brightness`] may change after
/// [`Transport::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelParam {
	Gpio,
	Count,
	Invert,
	Brightness,
	StripType,
}

impl ChannelParam {
	pub fn code(self) -> u32 {
		match self {
			ChannelParam::Gpio => PARAM_GPIO,
			ChannelParam::Count => PARAM_COUNT,
			ChannelParam::Invert => PARAM_INVERT,
			ChannelParam::Brightness => PARAM_BRIGHTNESS,
			ChannelParam::StripType => PARAM_STRIP_TYPE,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Serial(#[from] serialport::Error),
	#[error("data was not completely written")]
	IncompleteWrite,
	#[error("device did not respond")]
	NoResponse,
	#[error("unexpected response from device: expected {expected}, received {received}")]
	UnexpectedResponse { expected: String, received: String },
	#[error("unsupported by this transport: {0}")]
	Unsupported(String),
	#[error("transport is not initialized")]
	NotInitialized,
}

/// Operations the controller needs from a native driver.
///
/// Calls arrive in a fixed order: global and channel parameters, then
/// [`Transport::init`], then any number of frames (channel data followed by a
/// single [`Transport::render`]), then [`Transport::finalize`].
pub trait Transport {
	fn set_param(&mut self, param: Param, value: u32) -> Result<(), TransportError>;

	fn set_channel_param(&mut self, channel: usize, param: ChannelParam, value: u32) -> Result<(), TransportError>;

	/// Stage the packed frame of one channel for the next render.
	fn set_channel_data(&mut self, channel: usize, data: &[u8]) -> Result<(), TransportError>;

	fn init(&mut self) -> Result<(), TransportError>;

	/// Emit every staged channel as one frame.
	fn render(&mut self) -> Result<(), TransportError>;

	/// Stop output.
	fn reset(&mut self) -> Result<(), TransportError> {
		Ok(())
	}

	/// Release all hardware resources.
	fn finalize(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
	fn set_param(&mut self, param: Param, value: u32) -> Result<(), TransportError> {
		(**self).set_param(param, value)
	}

	fn set_channel_param(&mut self, channel: usize, param: ChannelParam, value: u32) -> Result<(), TransportError> {
		(**self).set_channel_param(channel, param, value)
	}

	fn set_channel_data(&mut self, channel: usize, data: &[u8]) -> Result<(), TransportError> {
		(**self).set_channel_data(channel, data)
	}

	fn init(&mut self) -> Result<(), TransportError> {
		(**self).init()
	}

	fn render(&mut self) -> Result<(), TransportError> {
		(**self).render()
	}

	fn reset(&mut self) -> Result<(), TransportError> {
		(**self).reset()
	}

	fn finalize(&mut self) -> Result<(), TransportError> {
		(**self).finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parameter_codes() {
		assert_eq!(Param::Freq.code(), 1);
		assert_eq!(Param::Dma.code(), 2);
		assert_eq!(ChannelParam::Gpio.code(), 3);
		assert_eq!(ChannelParam::Count.code(), 4);
		assert_eq!(ChannelParam::Invert.code(), 5);
		assert_eq!(ChannelParam::Brightness.code(), 6);
		assert_eq!(ChannelParam::StripType.code(), 7);
	}
}
