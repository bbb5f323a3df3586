//! PineTime peripherals used by the watch face

pub mod backlight;
pub mod battery;
pub mod display;
pub mod vibrator;
