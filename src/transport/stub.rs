use tracing::{debug, warn};

use super::{ChannelParam, Param, Transport, TransportError};

/// A transport that accepts everything and drives nothing.
///
/// Useful on machines without the PWM peripheral, or when the process lacks
/// the privileges to map it.
#[derive(Debug, Default)]
pub struct StubTransport {
	warned: bool,
}

impl StubTransport {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Transport for StubTransport {
	fn set_param(&mut self, param: Param, value: u32) -> Result<(), TransportError> {
		debug!(?param, value, "stub: ignoring parameter");
		Ok(())
	}

	fn set_channel_param(&mut self, channel: usize, param: ChannelParam, value: u32) -> Result<(), TransportError> {
		debug!(channel, ?param, value, "stub: ignoring channel parameter");
		Ok(())
	}

	fn set_channel_data(&mut self, _channel: usize, _data: &[u8]) -> Result<(), TransportError> {
		Ok(())
	}

	fn init(&mut self) -> Result<(), TransportError> {
		if !self.warned {
			warn!("no led driver available, output goes nowhere");
			self.warned = true;
		}
		Ok(())
	}

	fn render(&mut self) -> Result<(), TransportError> {
		Ok(())
	}

	fn finalize(&mut self) -> Result<(), TransportError> {
		Ok(())
	}
}
