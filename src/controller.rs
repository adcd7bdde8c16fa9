use rpi_ws281x_shared::MAX_CHANNELS;
use tracing::{debug, info, trace, warn};

use crate::{
	config::{merge_defaults, EffectiveChannel},
	transport::{ChannelParam, Param},
	Channel,
	Config,
	Defaults,
	EffectiveConfig,
	Error,
	IndexMap,
	Result,
	Transport,
};

/// Runs before any channel is packed. Pixels may still be changed here.
pub type BeforeRender = Box<dyn FnMut(&mut [Channel])>;
/// Runs after the transport rendered the frame.
pub type AfterRender = Box<dyn FnMut(&[Channel])>;

struct Session {
	config:   EffectiveConfig,
	channels: Vec<Channel>,
}

/// Owns the transport and both channels, and walks them through
/// init, render and finalize.
///
/// ```no_run
/// use rpi_ws281x::{ChannelConfig, Config, Controller, StubTransport};
///
/// # fn main() -> rpi_ws281x::Result<()> {
/// let mut controller = Controller::new(StubTransport::new());
/// let channels = controller.init(&Config {
/// 	channels: vec![ChannelConfig::with_count(10)],
/// 	..Config::default()
/// })?;
/// channels[0].fill(0xff0000);
/// controller.render()?;
/// # Ok(())
/// # }
/// ```
pub struct Controller<T: Transport> {
	transport: T,
	defaults:  Defaults,
	session:   Option<Session>,

	index_maps:    [Option<IndexMap>; MAX_CHANNELS],
	before_render: Option<BeforeRender>,
	after_render:  Option<AfterRender>,
}

impl<T: Transport> Controller<T> {
	pub fn new(transport: T) -> Self {
		Self::with_defaults(transport, Defaults::default())
	}

	/// Like [`Self::new`], filling missing configuration from `defaults`.
	pub fn with_defaults(transport: T, defaults: Defaults) -> Self {
		Self {
			transport,
			defaults,
			session: None,

			index_maps: Default::default(),
			before_render: None,
			after_render: None,
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.session.is_some()
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// The configuration in effect since the last [`Self::init`].
	pub fn config(&self) -> Option<&EffectiveConfig> {
		self.session.as_ref().map(|session| &session.config)
	}

	/// Resolve `config`, push every parameter to the transport and initialize it.
	///
	/// Nothing reaches the transport unless the whole configuration is valid.
	pub fn init(&mut self, config: &Config) -> Result<&mut [Channel]> {
		if self.session.is_some() {
			return Err(Error::AlreadyInitialized);
		}

		let config = merge_defaults(config, &self.defaults)?;

		debug!(freq = config.freq, dma = config.dma, "setting global parameters");
		self.transport.set_param(Param::Freq, config.freq)?;
		self.transport.set_param(Param::Dma, config.dma)?;

		for (id, channel) in config.channels.iter().enumerate() {
			self.push_channel_params(id, channel)?;
		}

		self.transport.init()?;

		let channels = config
			.channels
			.iter()
			.enumerate()
			.map(|(id, params)| Channel::configure(id, params))
			.collect();

		info!(
			freq = config.freq,
			dma = config.dma,
			leds = ?config.channels.iter().map(|c| c.count).collect::<Vec<_>>(),
			"initialized"
		);

		self.index_maps = Default::default();
		let session = self.session.insert(Session { config, channels });

		Ok(&mut session.channels)
	}

	fn push_channel_params(&mut self, id: usize, channel: &EffectiveChannel) -> Result<()> {
		let params = [
			(ChannelParam::Gpio, channel.gpio),
			(ChannelParam::Count, channel.count as u32),
			(ChannelParam::Invert, channel.invert.into()),
			(ChannelParam::Brightness, channel.brightness.into()),
			(ChannelParam::StripType, channel.ordering.code()),
		];

		for (param, value) in params {
			debug!(channel = id, ?param, value, "setting channel parameter");
			self.transport.set_channel_param(id, param, value)?;
		}

		Ok(())
	}

	/// Pack every non-empty channel, stage it and render all of them as one
	/// frame.
	pub fn render(&mut self) -> Result<()> {
		self.render_frame(true)
	}

	/// Blank every channel and render the blank frame. The controller stays
	/// initialized. Render hooks do not run for the blank frame.
	pub fn reset(&mut self) -> Result<()> {
		let session = self.session.as_mut().ok_or(Error::NotInitialized)?;
		for channel in &mut session.channels {
			channel.clear();
		}

		debug!("blanking all channels");
		self.render_frame(false)
	}

	fn render_frame(&mut self, run_hooks: bool) -> Result<()> {
		let session = self.session.as_mut().ok_or(Error::NotInitialized)?;

		if run_hooks {
			if let Some(hook) = &mut self.before_render {
				hook(&mut session.channels);
			}
		}

		// nothing is staged unless every channel still matches what the
		// transport was initialized with
		for (id, (channel, params)) in session.channels.iter().zip(&session.config.channels).enumerate() {
			if channel.id() != id || channel.count() != params.count || channel.ordering() != params.ordering {
				return Err(Error::ChannelMismatch(id));
			}
			if let Some(map) = &self.index_maps[id] {
				if map.len() != channel.count() {
					return Err(Error::IndexMapLengthMismatch {
						map:  map.len(),
						leds: channel.count(),
					});
				}
			}
		}

		for (id, channel) in session.channels.iter_mut().enumerate() {
			if channel.is_empty() {
				continue;
			}

			let packed = match &self.index_maps[id] {
				Some(map) => channel.pack_remapped(map)?,
				None => channel.pack(),
			};

			self.transport.set_channel_data(id, packed)?;
			self.transport
				.set_channel_param(id, ChannelParam::Brightness, channel.brightness().into())?;
		}

		self.transport.render()?;
		trace!("frame rendered");

		if run_hooks {
			if let Some(hook) = &mut self.after_render {
				hook(&session.channels);
			}
		}

		Ok(())
	}

	/// Drop all channel buffers and release the transport.
	pub fn finalize(&mut self) -> Result<()> {
		if self.session.take().is_none() {
			return Err(Error::NotInitialized);
		}
		self.index_maps = Default::default();

		self.transport.reset()?;
		self.transport.finalize()?;

		info!("finalized");
		Ok(())
	}

	pub fn channels(&self) -> Result<&[Channel]> {
		let session = self.session.as_ref().ok_or(Error::NotInitialized)?;
		Ok(&session.channels)
	}

	pub fn channels_mut(&mut self) -> Result<&mut [Channel]> {
		let session = self.session.as_mut().ok_or(Error::NotInitialized)?;
		Ok(&mut session.channels)
	}

	pub fn channel(&self, id: usize) -> Result<&Channel> {
		self.channels()?.get(id).ok_or(Error::InvalidParameter {
			name:  "channel",
			value: id as u64,
		})
	}

	pub fn channel_mut(&mut self, id: usize) -> Result<&mut Channel> {
		self.channels_mut()?.get_mut(id).ok_or(Error::InvalidParameter {
			name:  "channel",
			value: id as u64,
		})
	}

	/// Set the brightness of one channel, effective from the next render.
	pub fn set_brightness(&mut self, channel: usize, value: u32) -> Result<()> {
		self.channel_mut(channel)?.set_brightness(value)
	}

	/// Register (or with `None` remove) the index map of a channel. The map
	/// must have one entry per led.
	pub fn set_index_map(&mut self, channel: usize, map: Option<IndexMap>) -> Result<()> {
		let leds = self.channel(channel)?.count();
		if let Some(map) = &map {
			if map.len() != leds {
				return Err(Error::IndexMapLengthMismatch { map: map.len(), leds });
			}
		}

		self.index_maps[channel] = map;
		Ok(())
	}

	pub fn on_before_render(&mut self, hook: impl FnMut(&mut [Channel]) + 'static) {
		self.before_render = Some(Box::new(hook));
	}

	pub fn on_after_render(&mut self, hook: impl FnMut(&[Channel]) + 'static) {
		self.after_render = Some(Box::new(hook));
	}
}

impl<T: Transport> Drop for Controller<T> {
	fn drop(&mut self) {
		if self.session.is_some() {
			if let Err(error) = self.finalize() {
				warn!(%error, "failed to finalize transport");
			}
		}
	}
}
