//! General system configuration

/// When to buzz after the Bluetooth link reports "disconnected"
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectAlert {
    /// Pulse on every disconnected reading, repeated readings included
    #[default]
    EveryReading,
    /// Pulse only when the link goes from connected to disconnected, or when
    /// the face starts up without a link
    OnTransition,
}

/// Watch face settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    /// Show the time as `HH:MM` (00–23) rather than `hh:MM` (01–12)
    pub clock_24h: bool,
    /// Haptic policy for link loss
    pub disconnect_alert: DisconnectAlert,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            clock_24h: true,
            disconnect_alert: DisconnectAlert::EveryReading,
        }
    }
}

/// Offset of local time from UTC in seconds
#[cfg(feature = "firmware")]
pub const UTC_OFFSET_SECS: i32 = 3_600;

#[cfg(feature = "firmware")]
pub use nrf::SystemConfig;

#[cfg(feature = "firmware")]
mod nrf {
    use embassy_nrf::{
        config::{Config, Debug, HfclkSource, LfclkSource},
        interrupt::Priority,
    };

    pub struct SystemConfig {}

    impl SystemConfig {
        /// Create new system configuration
        #[allow(clippy::new_ret_no_self)]
        pub fn new() -> Config {
            // Generate default config, required because Config is set as
            // `non_exhaustive`
            let mut config = Config::default();

            // Set high-frequency and low-frequency clock sources to external
            config.hfclk_source = HfclkSource::ExternalXtal;
            config.lfclk_source = LfclkSource::ExternalXtal;

            // Enable DC/DC regulator to massively reduce runtime current consumption
            config.dcdc.reg1 = true;

            // Configure interrupt priorities to exclude 0 (default), 1, and 4,
            // which are reserved for the nrf SoftDevice
            config.gpiote_interrupt_priority = Priority::P2;
            config.time_interrupt_priority = Priority::P2;

            // Allow debugging
            config.debug = Debug::Allowed;

            config
        }
    }
}
