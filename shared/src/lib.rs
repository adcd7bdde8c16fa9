#![no_std]

// Parameter codes understood by the native driver.
pub const PARAM_FREQ: u32 = 1;
pub const PARAM_DMA: u32 = 2;
pub const PARAM_GPIO: u32 = 3;
pub const PARAM_COUNT: u32 = 4;
pub const PARAM_INVERT: u32 = 5;
pub const PARAM_BRIGHTNESS: u32 = 6;
pub const PARAM_STRIP_TYPE: u32 = 7;

/// The PWM peripheral has exactly two outputs.
pub const MAX_CHANNELS: usize = 2;

pub const DEFAULT_FREQ: u32 = 800_000;
pub const DEFAULT_DMA: u32 = 5;
pub const MAX_DMA: u32 = 14;
pub const DEFAULT_GPIO: [u32; MAX_CHANNELS] = [18, 13];
pub const DEFAULT_BRIGHTNESS: u8 = 255;

// 4 color R, G, B and W ordering
pub const SK6812_STRIP_RGBW: u32 = 0x18100800;
pub const SK6812_STRIP_RBGW: u32 = 0x18100008;
pub const SK6812_STRIP_GRBW: u32 = 0x18081000;
pub const SK6812_STRIP_GBRW: u32 = 0x18080010;
pub const SK6812_STRIP_BRGW: u32 = 0x18001008;
pub const SK6812_STRIP_BGRW: u32 = 0x18000810;

// 3 color R, G and B ordering
pub const WS2811_STRIP_RGB: u32 = 0x00100800;
pub const WS2811_STRIP_RBG: u32 = 0x00100008;
pub const WS2811_STRIP_GRB: u32 = 0x00081000;
pub const WS2811_STRIP_GBR: u32 = 0x00080010;
pub const WS2811_STRIP_BRG: u32 = 0x00001008;
pub const WS2811_STRIP_BGR: u32 = 0x00000810;

// predefined fixed LED types
pub const WS2812_STRIP: u32 = WS2811_STRIP_GRB;
pub const SK6812_STRIP: u32 = WS2811_STRIP_GRB;
// The driver headers define SK6812W as GRBW. Older JavaScript bindings sent
// 0x18080010 (GBRW) for "sk6812w"; use the explicit "sk6812-gbrw" name for
// strips that were configured against that value.
pub const SK6812W_STRIP: u32 = SK6812_STRIP_GRBW;

/// Strip type names accepted in configuration, lowercase.
pub const STRIP_TYPE_NAMES: [(&str, u32); 15] = [
	("sk6812-rgbw", SK6812_STRIP_RGBW),
	("sk6812-rbgw", SK6812_STRIP_RBGW),
	("sk6812-grbw", SK6812_STRIP_GRBW),
	("sk6812-gbrw", SK6812_STRIP_GBRW),
	("sk6812-brgw", SK6812_STRIP_BRGW),
	("sk6812-bgrw", SK6812_STRIP_BGRW),
	("ws2811-rgb", WS2811_STRIP_RGB),
	("ws2811-rbg", WS2811_STRIP_RBG),
	("ws2811-grb", WS2811_STRIP_GRB),
	("ws2811-gbr", WS2811_STRIP_GBR),
	("ws2811-brg", WS2811_STRIP_BRG),
	("ws2811-bgr", WS2811_STRIP_BGR),
	("ws2812", WS2812_STRIP),
	("sk6812", SK6812_STRIP),
	("sk6812w", SK6812W_STRIP),
];

// USB serial bridge protocol, see https://github.com/ForsakenHarmony/serial-ws2812

pub const MESSAGE_TYPE_LEN: usize = 8;
pub const MESSAGE_NUM_LEN: usize = 4;

pub const UPDATE_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"update\0\0";
pub const SET_STRIPS_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"strips\0\0";
pub const SET_LEDS_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"leds\0\0\0\0";

/// The bridge firmware caps each strip at this many leds.
pub const BRIDGE_MAX_LEDS_PER_STRIP: usize = 512;
pub const BRIDGE_BYTES_PER_LED: usize = 3;
pub const BRIDGE_BAUD_RATE: u32 = 921_600;

pub const DEVICE_MESSAGE_TYPE_LEN: usize = 1;

pub const DEVICE_INIT_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"i";
pub const DEVICE_ERROR_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"e";
pub const DEVICE_PARTIAL_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"p";
pub const DEVICE_OK_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"k";

pub const DEVICE_PRODUCT_NAME: &str = "Serial WS2812";
