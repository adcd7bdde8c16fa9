use std::{thread, time::Duration};

use eyre::{eyre, Result};
use rpi_ws281x::{ChannelConfig, Config, Controller, SerialTransport};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let leds = std::env::args().nth(1).and_then(|n| n.parse().ok()).unwrap_or(10);

	let transport = SerialTransport::find()?.ok_or_else(|| eyre!("no serial to ws2812 device found"))?;
	let mut controller = Controller::new(transport);

	let channels = controller.init(&Config {
		channels: vec![ChannelConfig::with_count(leds)],
		..Config::default()
	})?;
	channels[0].fill(0xffcc22);

	for brightness in (0..=255).step_by(5) {
		controller.set_brightness(0, brightness)?;
		controller.render()?;
		thread::sleep(Duration::from_millis(1000 / 30));
	}

	controller.reset()?;
	controller.finalize()?;

	Ok(())
}
