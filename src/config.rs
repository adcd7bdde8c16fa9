use rpi_ws281x_shared::{DEFAULT_BRIGHTNESS, DEFAULT_DMA, DEFAULT_FREQ, DEFAULT_GPIO, MAX_CHANNELS, MAX_DMA};

use crate::{ColorOrdering, Error, Result, StripType};

/// User supplied configuration. Every field left as `None` is filled from
/// [`Defaults`] by [`merge_defaults`].
#[derive(Debug, Clone, Default)]
pub struct Config {
	/// DMA engine used to feed the PWM peripheral.
	pub dma:      Option<u32>,
	/// Output frequency in Hz.
	pub freq:     Option<u32>,
	/// At most two channels, in channel id order.
	pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
	pub gpio:       Option<u32>,
	pub count:      Option<usize>,
	pub invert:     Option<bool>,
	pub brightness: Option<u32>,
	pub strip_type: Option<StripType>,
}

impl ChannelConfig {
	/// A channel with `count` leds and everything else defaulted.
	pub fn with_count(count: usize) -> Self {
		Self {
			count: Some(count),
			..Self::default()
		}
	}
}

#[derive(Debug, Clone)]
pub struct ChannelDefaults {
	pub gpio:       u32,
	pub count:      usize,
	pub invert:     bool,
	pub brightness: u8,
	pub strip_type: StripType,
}

#[derive(Debug, Clone)]
pub struct Defaults {
	pub dma:      u32,
	pub freq:     u32,
	pub channels: [ChannelDefaults; MAX_CHANNELS],
}

impl Default for Defaults {
	fn default() -> Self {
		Self {
			dma:      DEFAULT_DMA,
			freq:     DEFAULT_FREQ,
			channels: DEFAULT_GPIO.map(|gpio| ChannelDefaults {
				gpio,
				count: 0,
				invert: false,
				brightness: DEFAULT_BRIGHTNESS,
				strip_type: StripType::default(),
			}),
		}
	}
}

/// Fully resolved parameters of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveChannel {
	pub gpio:       u32,
	pub count:      usize,
	pub invert:     bool,
	pub brightness: u8,
	pub ordering:   ColorOrdering,
}

/// Fully resolved configuration, always describing both hardware channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
	pub dma:      u32,
	pub freq:     u32,
	pub channels: [EffectiveChannel; MAX_CHANNELS],
}

/// Fill every missing field of `config` from `defaults` and validate the
/// result. Nothing is clamped: out of range values are errors.
pub fn merge_defaults(config: &Config, defaults: &Defaults) -> Result<EffectiveConfig> {
	if config.channels.len() > MAX_CHANNELS {
		return Err(Error::InvalidParameter {
			name:  "channels",
			value: config.channels.len() as u64,
		});
	}

	let dma = config.dma.unwrap_or(defaults.dma);
	if dma > MAX_DMA {
		return Err(Error::InvalidParameter {
			name:  "dma",
			value: dma.into(),
		});
	}

	let freq = config.freq.unwrap_or(defaults.freq);
	if freq == 0 {
		return Err(Error::InvalidParameter {
			name:  "freq",
			value: 0,
		});
	}

	let unset = ChannelConfig::default();
	let user = |id: usize| config.channels.get(id).unwrap_or(&unset);
	let channels = [
		merge_channel(user(0), &defaults.channels[0])?,
		merge_channel(user(1), &defaults.channels[1])?,
	];

	Ok(EffectiveConfig { dma, freq, channels })
}

fn merge_channel(user: &ChannelConfig, defaults: &ChannelDefaults) -> Result<EffectiveChannel> {
	let count = user.count.unwrap_or(defaults.count);
	if u32::try_from(count).is_err() {
		return Err(Error::InvalidParameter {
			name:  "count",
			value: count as u64,
		});
	}

	let brightness = match user.brightness {
		Some(value) => u8::try_from(value).map_err(|_| Error::InvalidBrightness(value))?,
		None => defaults.brightness,
	};

	let strip_type = user.strip_type.as_ref().unwrap_or(&defaults.strip_type);
	let ordering = ColorOrdering::resolve(strip_type)?;

	Ok(EffectiveChannel {
		gpio: user.gpio.unwrap_or(defaults.gpio),
		count,
		invert: user.invert.unwrap_or(defaults.invert),
		brightness,
		ordering,
	})
}

#[cfg(test)]
mod tests {
	use rpi_ws281x_shared::SK6812_STRIP_GBRW;

	use super::*;

	#[test]
	fn empty_config_gets_defaults() {
		let config = merge_defaults(&Config::default(), &Defaults::default()).unwrap();

		assert_eq!(config.dma, 5);
		assert_eq!(config.freq, 800_000);
		assert_eq!(config.channels[0].gpio, 18);
		assert_eq!(config.channels[1].gpio, 13);
		for channel in &config.channels {
			assert_eq!(channel.count, 0);
			assert!(!channel.invert);
			assert_eq!(channel.brightness, 255);
			assert_eq!(channel.ordering, ColorOrdering::default());
		}
	}

	#[test]
	fn user_fields_override_defaults() {
		let config = Config {
			dma:      Some(10),
			freq:     Some(400_000),
			channels: vec![ChannelConfig {
				gpio: Some(12),
				count: Some(30),
				invert: Some(true),
				brightness: Some(100),
				strip_type: Some("sk6812-gbrw".into()),
			}],
		};
		let merged = merge_defaults(&config, &Defaults::default()).unwrap();

		assert_eq!(merged.dma, 10);
		assert_eq!(merged.freq, 400_000);
		let channel = &merged.channels[0];
		assert_eq!(channel.gpio, 12);
		assert_eq!(channel.count, 30);
		assert!(channel.invert);
		assert_eq!(channel.brightness, 100);
		assert_eq!(channel.ordering.code(), SK6812_STRIP_GBRW);
		// untouched channel keeps its defaults
		assert_eq!(merged.channels[1].gpio, 13);
		assert_eq!(merged.channels[1].count, 0);
	}

	#[test]
	fn brightness_is_not_clamped() {
		let config = Config {
			channels: vec![ChannelConfig {
				brightness: Some(256),
				..ChannelConfig::default()
			}],
			..Config::default()
		};
		assert!(matches!(
			merge_defaults(&config, &Defaults::default()),
			Err(Error::InvalidBrightness(256))
		));
	}

	#[test]
	fn invalid_globals() {
		let too_many = Config {
			channels: vec![ChannelConfig::default(); 3],
			..Config::default()
		};
		assert!(matches!(
			merge_defaults(&too_many, &Defaults::default()),
			Err(Error::InvalidParameter { name: "channels", value: 3 })
		));

		let dma = Config {
			dma: Some(15),
			..Config::default()
		};
		assert!(matches!(
			merge_defaults(&dma, &Defaults::default()),
			Err(Error::InvalidParameter { name: "dma", value: 15 })
		));

		let freq = Config {
			freq: Some(0),
			..Config::default()
		};
		assert!(matches!(
			merge_defaults(&freq, &Defaults::default()),
			Err(Error::InvalidParameter { name: "freq", .. })
		));
	}

	#[test]
	fn unknown_strip_type() {
		let config = Config {
			channels: vec![ChannelConfig::with_count(1), ChannelConfig {
				strip_type: Some("ws2813".into()),
				..ChannelConfig::default()
			}],
			..Config::default()
		};
		assert!(matches!(
			merge_defaults(&config, &Defaults::default()),
			Err(Error::UnknownStripType(name)) if name == "ws2813"
		));
	}
}
