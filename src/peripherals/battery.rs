//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

/// Battery configuration
struct BatteryConfig<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
}

/// Battery API
pub struct Battery {
    /// Battery configuration
    config: BatteryConfig<'static>,
}

impl Battery {
    /// Configure battery settings on boot
    pub fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        Self {
            config: BatteryConfig {
                adc,
                pin_charge_indication: charge_pin,
            },
        }
    }

    /// Carging state of the battery
    pub fn is_charging(&self) -> bool {
        self.config.pin_charge_indication.is_low()
    }

    /// Battery capacity in percent
    pub async fn get_percent(&mut self) -> Result<u8, Error> {
        let voltage = self.get_voltage().await?;
        Ok(percent_from_millivolts(voltage))
    }

    /// Battery voltage in millivolts
    async fn get_voltage(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 1];
        self.config.adc.sample(&mut buf).await;
        millivolts_from_sample(buf[0])
    }
}

/// Convert a 12 bit SAADC sample into the battery voltage.
///
/// The battery is measured through a 1:2 divider against the 3.3 V reference,
/// see https://wiki.pine64.org/wiki/PineTime for details.
fn millivolts_from_sample(sample: i16) -> Result<u16, Error> {
    match sample {
        // Use u32 during calculation to prevent overflow
        0..=4095 => Ok((sample as u32 * 2000 / 1241) as u16),
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the remaining capacity from fixed data points, interpolating
/// linearly in between.
fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    InvalidMeasurement,
}
