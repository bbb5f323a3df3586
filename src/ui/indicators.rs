//! Status indicators
//!
//! The moon shows the battery charge in five steps, the sun shows whether a
//! phone is connected over Bluetooth.

use crate::system::config::DisconnectAlert;

/// Bundled icon resources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IconId {
    Earth,
    /// Battery at or below 20 %
    MoonLevel1,
    MoonLevel2,
    MoonLevel3,
    MoonLevel4,
    /// Battery above 80 %
    MoonLevel5,
    SunUnlinked,
    SunLinked,
}

impl IconId {
    pub const COUNT: usize = 8;

    pub const ALL: [IconId; Self::COUNT] = [
        IconId::Earth,
        IconId::MoonLevel1,
        IconId::MoonLevel2,
        IconId::MoonLevel3,
        IconId::MoonLevel4,
        IconId::MoonLevel5,
        IconId::SunUnlinked,
        IconId::SunLinked,
    ];

    /// Position in [`IconId::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Moon icons from empty to full
pub const MOON_PALETTE: [IconId; 5] = [
    IconId::MoonLevel1,
    IconId::MoonLevel2,
    IconId::MoonLevel3,
    IconId::MoonLevel4,
    IconId::MoonLevel5,
];

/// Sun icons, disconnected first
pub const SUN_PALETTE: [IconId; 2] = [IconId::SunUnlinked, IconId::SunLinked];

/// Moon icon for a battery charge in percent
pub fn battery_icon(charge_percent: u8) -> IconId {
    match charge_percent {
        81.. => IconId::MoonLevel5,
        61..=80 => IconId::MoonLevel4,
        41..=60 => IconId::MoonLevel3,
        21..=40 => IconId::MoonLevel2,
        _ => IconId::MoonLevel1,
    }
}

/// Sun icon for the Bluetooth link state
pub fn link_icon(connected: bool) -> IconId {
    SUN_PALETTE[connected as usize]
}

/// Whether a link reading should buzz the wrist.
///
/// `previous` is the last reading the face has seen, `None` at startup.
pub fn should_alert(policy: DisconnectAlert, previous: Option<bool>, connected: bool) -> bool {
    if connected {
        return false;
    }

    match policy {
        DisconnectAlert::EveryReading => true,
        DisconnectAlert::OnTransition => previous != Some(false),
    }
}
