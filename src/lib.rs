//! Orrery watch face for the PineTime
//!
//! An earth sits in the middle of the face, a moon circles it once per hour and
//! a sun once every twelve hours. The moon doubles as the battery gauge and the
//! sun as the Bluetooth link indicator.
//!
//! The face logic in [`ui`] only talks to the traits in [`ui::host`], so it runs
//! the same on the watch (feature `firmware`) and in host-side tests.

#![cfg_attr(not(test), no_std)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        #[allow(unused_imports)]
        pub(crate) use defmt::{debug, error, info, trace, warn};
    } else if #[cfg(feature = "log")] {
        #[allow(unused_imports)]
        pub(crate) use log::{debug, error, info, trace, warn};
    } else {
        #[macro_export]
        macro_rules! trace {
            ($($arg:tt)*) => {{}};
        }
        #[macro_export]
        macro_rules! debug {
            ($($arg:tt)*) => {{}};
        }
        #[macro_export]
        macro_rules! info {
            ($($arg:tt)*) => {{}};
        }
        #[macro_export]
        macro_rules! warn {
            ($($arg:tt)*) => {{}};
        }
        #[macro_export]
        macro_rules! error {
            ($($arg:tt)*) => {{}};
        }
    }
}

pub mod error;
pub mod system;
pub mod ui;

#[cfg(feature = "firmware")]
pub mod peripherals;

pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    #[test]
    fn log_macros_take_format_arguments() {
        crate::trace!("trace {}", 1);
        crate::debug!("debug {:?}", Some(2));
        crate::info!("info");
        crate::warn!("warn {}", "three");
        crate::error!("error {} {}", 4, 5);
    }
}
