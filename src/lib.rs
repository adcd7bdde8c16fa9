//! Pixel pipeline for WS281x LED strips driven by the Raspberry Pi PWM/DMA
//! peripheral.
//!
//! A [`Controller`] owns up to two [`Channel`]s and a [`Transport`]. Callers
//! write logical `0xWWRRGGBB` pixels into a channel, then call
//! [`Controller::render`], which remaps, gamma corrects, scales and packs every
//! channel into the byte order of its strip type before handing the frames to
//! the transport.

pub mod channel;
pub mod color_order;
pub mod config;
pub mod controller;
pub mod gamma;
pub mod index_map;
pub mod transport;

pub use channel::Channel;
pub use color_order::{ColorOrdering, StripType};
pub use config::{ChannelConfig, Config, Defaults, EffectiveChannel, EffectiveConfig};
pub use controller::Controller;
pub use gamma::GammaTable;
pub use index_map::IndexMap;
pub use transport::{ChannelParam, Param, SerialTransport, StubTransport, Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown strip type \"{0}\"")]
	UnknownStripType(String),
	#[error("invalid brightness {0}, expected a value between 0 and 255")]
	InvalidBrightness(u32),
	#[error("invalid value {value} for {name}")]
	InvalidParameter { name: &'static str, value: u64 },
	#[error("index map has {map} entries but the channel has {leds} leds")]
	IndexMapLengthMismatch { map: usize, leds: usize },
	#[error("index map entry {position} points at {index}, the map only has {len} entries")]
	IndexOutOfRange { position: usize, index: usize, len: usize },
	#[error("channel {0} no longer matches its configuration")]
	ChannelMismatch(usize),
	#[error("controller is not initialized")]
	NotInitialized,
	#[error("controller is already initialized")]
	AlreadyInitialized,
	#[error(transparent)]
	Transport(#[from] TransportError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
