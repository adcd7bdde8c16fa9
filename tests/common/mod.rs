#![allow(dead_code)]

use rpi_ws281x::{ChannelParam, Param, Transport, TransportError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	SetParam(Param, u32),
	SetChannelParam(usize, ChannelParam, u32),
	SetChannelData(usize, Vec<u8>),
	Init,
	Render,
	Reset,
	Finalize,
}

/// Remembers every call in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
	pub calls:     Vec<Call>,
	pub fail_init: bool,
}

impl RecordingTransport {
	pub fn failing_init() -> Self {
		Self {
			fail_init: true,
			..Self::default()
		}
	}

	/// Calls recorded after the transport was initialized.
	pub fn after_init(&self) -> &[Call] {
		let start = self.calls.iter().position(|c| *c == Call::Init).map_or(0, |i| i + 1);
		&self.calls[start..]
	}

	pub fn count(&self, call: &Call) -> usize {
		self.calls.iter().filter(|c| *c == call).count()
	}
}

impl Transport for RecordingTransport {
	fn set_param(&mut self, param: Param, value: u32) -> Result<(), TransportError> {
		self.calls.push(Call::SetParam(param, value));
		Ok(())
	}

	fn set_channel_param(&mut self, channel: usize, param: ChannelParam, value: u32) -> Result<(), TransportError> {
		self.calls.push(Call::SetChannelParam(channel, param, value));
		Ok(())
	}

	fn set_channel_data(&mut self, channel: usize, data: &[u8]) -> Result<(), TransportError> {
		self.calls.push(Call::SetChannelData(channel, data.to_vec()));
		Ok(())
	}

	fn init(&mut self) -> Result<(), TransportError> {
		if self.fail_init {
			return Err(TransportError::Unsupported("no hardware".to_string()));
		}
		self.calls.push(Call::Init);
		Ok(())
	}

	fn render(&mut self) -> Result<(), TransportError> {
		self.calls.push(Call::Render);
		Ok(())
	}

	fn reset(&mut self) -> Result<(), TransportError> {
		self.calls.push(Call::Reset);
		Ok(())
	}

	fn finalize(&mut self) -> Result<(), TransportError> {
		self.calls.push(Call::Finalize);
		Ok(())
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}
