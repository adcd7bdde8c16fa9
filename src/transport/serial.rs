use std::{
	io,
	io::{Read, Write},
	time::Duration,
};

use rpi_ws281x_shared::{
	BRIDGE_BAUD_RATE,
	BRIDGE_BYTES_PER_LED,
	BRIDGE_MAX_LEDS_PER_STRIP,
	DEVICE_ERROR_MESSAGE,
	DEVICE_INIT_MESSAGE,
	DEVICE_MESSAGE_TYPE_LEN,
	DEVICE_OK_MESSAGE,
	DEVICE_PARTIAL_MESSAGE,
	DEVICE_PRODUCT_NAME,
	MAX_CHANNELS,
	SET_LEDS_MESSAGE,
	SET_STRIPS_MESSAGE,
	UPDATE_MESSAGE,
};
use serialport::{SerialPort, SerialPortType};
use tracing::{debug, info, trace, warn};

use super::{ChannelParam, Param, Transport, TransportError};

const SYNC_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Default)]
struct StagedChannel {
	count:      usize,
	strip_type: u32,
	data:       Vec<u8>,
}

/// Drives strips through the "Serial WS2812" USB bridge.
///
/// Channel 0 and 1 map to the first two bridge outputs. The bridge has its
/// own fixed timing and no white channel, so frequency, DMA, GPIO, invert and
/// brightness parameters are ignored and only 3 byte strip types are
/// accepted.
pub struct SerialTransport {
	port:     Box<dyn SerialPort>,
	channels: [StagedChannel; MAX_CHANNELS],

	synced:      bool,
	initialized: bool,
}

impl SerialTransport {
	/// Open the bridge at the given serial device.
	pub fn new(serial_device: &str) -> Result<Self, TransportError> {
		let builder = serialport::new(serial_device, BRIDGE_BAUD_RATE).timeout(Duration::from_millis(50));
		let port = builder.open()?;

		info!(serial_device, "opened serial bridge");

		Ok(Self {
			port,
			channels: Default::default(),

			synced: false,
			initialized: false,
		})
	}

	/// Finds the first available serial device with product name "Serial WS2812".
	///
	/// If more than one device is connected the returned device will be the first the OS lists.
	pub fn find() -> Result<Option<Self>, TransportError> {
		let ports = serialport::available_ports()?;

		let serial_device = ports.into_iter().find_map(|p| match p.port_type {
			SerialPortType::UsbPort(usb)
				if usb.product.as_deref() == Some(DEVICE_PRODUCT_NAME)
					|| usb.product == Some(DEVICE_PRODUCT_NAME.replace(' ', "_")) =>
			{
				Some(p.port_name)
			}
			_ => None,
		});

		let Some(serial_device) = serial_device else {
			return Ok(None);
		};

		Ok(Some(Self::new(&serial_device)?))
	}

	fn staged(&mut self, channel: usize) -> Result<&mut StagedChannel, TransportError> {
		self.channels
			.get_mut(channel)
			.ok_or_else(|| TransportError::Unsupported(format!("channel {}", channel)))
	}

	fn reset_to_command(&mut self) -> Result<(), TransportError> {
		let mut buffer = [0u8; DEVICE_MESSAGE_TYPE_LEN * 4];

		let mut has_printed = false;
		let mut counter = 0;

		info!("trying to reset device to start of command");
		self.port.set_timeout(Duration::from_millis(10))?;

		for _ in 0..SYNC_ATTEMPTS {
			let read_bytes = match self.port.read(&mut buffer) {
				Ok(n) => n,
				Err(e) if e.kind() == io::ErrorKind::TimedOut => {
					if !has_printed {
						info!("read timeout, writing null bytes to force a response");
						has_printed = true;
					}

					counter += 1;
					if counter < 8 {
						self.port.write_all(&[0u8])?;
					} else {
						self.port.write_all(&[0u8; 32])?;
					}

					continue;
				}
				Err(e) => return Err(e.into()),
			};

			// more than one byte means the device answered a 32 byte burst, start over
			if read_bytes > 1 {
				counter = 0;
				continue;
			}

			if &buffer[..1] == DEVICE_INIT_MESSAGE || &buffer[..1] == DEVICE_ERROR_MESSAGE {
				self.port.set_timeout(Duration::from_millis(50))?;
				info!("reset successful");
				return Ok(());
			}
		}

		Err(TransportError::NoResponse)
	}

	fn send_command(&mut self, command: &[u8], data: &[u8]) -> Result<(), TransportError> {
		let mut output = [0u8; DEVICE_MESSAGE_TYPE_LEN];

		if self.serial_write(command)? != command.len() {
			return Err(TransportError::IncompleteWrite);
		}
		if self.port.read(&mut output)? != 1 {
			return Err(TransportError::NoResponse);
		}
		if &output != DEVICE_PARTIAL_MESSAGE {
			return Err(TransportError::UnexpectedResponse {
				expected: String::from_utf8_lossy(DEVICE_PARTIAL_MESSAGE).to_string(),
				received: format!("{:?}", output),
			});
		}

		if self.serial_write(data)? != data.len() {
			return Err(TransportError::IncompleteWrite);
		}
		if self.port.read(&mut output)? != 1 {
			return Err(TransportError::NoResponse);
		}
		if &output != DEVICE_OK_MESSAGE {
			return Err(TransportError::UnexpectedResponse {
				expected: String::from_utf8_lossy(DEVICE_OK_MESSAGE).to_string(),
				received: format!("{:?}", output),
			});
		}

		Ok(())
	}

	fn serial_write(&mut self, buffer: &[u8]) -> Result<usize, TransportError> {
		match self.port.write_all(buffer) {
			Ok(_) => Ok(buffer.len()),
			Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {
				warn!("serial timeout");
				Ok(0)
			}
			Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {
				warn!("serial interrupted");
				Ok(0)
			}
			Err(e) => Err(e.into()),
		}
	}

	fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
		trace!(bytes = frame.len(), "sending frame to bridge");
		self.send_command(UPDATE_MESSAGE, frame)
	}
}

impl Transport for SerialTransport {
	fn set_param(&mut self, param: Param, value: u32) -> Result<(), TransportError> {
		debug!(?param, value, "bridge has fixed timing, ignoring parameter");
		Ok(())
	}

	fn set_channel_param(&mut self, channel: usize, param: ChannelParam, value: u32) -> Result<(), TransportError> {
		let staged = self.staged(channel)?;
		match param {
			ChannelParam::Count => staged.count = value as usize,
			ChannelParam::StripType => staged.strip_type = value,
			_ => debug!(channel, ?param, value, "ignoring channel parameter"),
		}
		Ok(())
	}

	fn set_channel_data(&mut self, channel: usize, data: &[u8]) -> Result<(), TransportError> {
		if !self.initialized {
			return Err(TransportError::NotInitialized);
		}

		let staged = self.staged(channel)?;
		if data.len() != staged.count * BRIDGE_BYTES_PER_LED {
			return Err(TransportError::Unsupported(format!(
				"{} bytes of data for {} leds on channel {}",
				data.len(),
				staged.count,
				channel
			)));
		}

		staged.data.clear();
		staged.data.extend_from_slice(data);
		unswap_triples(&mut staged.data);

		Ok(())
	}

	fn init(&mut self) -> Result<(), TransportError> {
		for (id, channel) in self.channels.iter().enumerate() {
			if channel.count == 0 {
				continue;
			}
			if channel.strip_type >> 24 != 0 {
				return Err(TransportError::Unsupported(format!(
					"strip type {:#010x} on channel {}",
					channel.strip_type, id
				)));
			}
			if channel.count > BRIDGE_MAX_LEDS_PER_STRIP {
				return Err(TransportError::Unsupported(format!(
					"{} leds on channel {}, at most {}",
					channel.count, id, BRIDGE_MAX_LEDS_PER_STRIP
				)));
			}
		}

		if !self.synced {
			self.reset_to_command()?;
			self.synced = true;
		}

		let (strips, leds) = frame_shape(&self.channels);
		self.send_command(SET_STRIPS_MESSAGE, &u32::to_le_bytes(strips as u32))?;
		self.send_command(SET_LEDS_MESSAGE, &u32::to_le_bytes(leds as u32))?;

		info!(strips, leds, "bridge configured");
		self.initialized = true;

		Ok(())
	}

	fn render(&mut self) -> Result<(), TransportError> {
		if !self.initialized {
			return Err(TransportError::NotInitialized);
		}

		let frame = encode_frame(&self.channels);
		self.send_frame(&frame)
	}

	fn reset(&mut self) -> Result<(), TransportError> {
		if !self.initialized {
			return Ok(());
		}

		let (strips, leds) = frame_shape(&self.channels);
		self.send_frame(&vec![0; strips * leds * BRIDGE_BYTES_PER_LED])
	}

	fn finalize(&mut self) -> Result<(), TransportError> {
		self.channels = Default::default();
		self.initialized = false;

		info!("bridge released");
		Ok(())
	}
}

/// Number of bridge outputs in use and leds per output.
fn frame_shape(channels: &[StagedChannel]) -> (usize, usize) {
	let strips = channels.iter().rposition(|c| c.count > 0).map_or(0, |i| i + 1);
	let leds = channels.iter().map(|c| c.count).max().unwrap_or(0);

	(strips, leds)
}

/// Strip-major frame, shorter channels padded with black.
fn encode_frame(channels: &[StagedChannel]) -> Vec<u8> {
	let (strips, leds) = frame_shape(channels);
	let stride = leds * BRIDGE_BYTES_PER_LED;

	let mut frame = vec![0; strips * stride];
	for (channel, out) in channels.iter().zip(frame.chunks_exact_mut(stride.max(1))) {
		out[..channel.data.len()].copy_from_slice(&channel.data);
	}

	frame
}

/// The bridge firmware emits every led as bytes `[1, 0, 2]` of what it
/// received. Applying the same swap beforehand keeps the packed order intact.
fn unswap_triples(data: &mut [u8]) {
	for led in data.chunks_exact_mut(BRIDGE_BYTES_PER_LED) {
		led.swap(0, 1);
	}
}
