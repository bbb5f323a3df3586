//! UI definitions module
//!
//! Watch faces are driven by the host: it loads a face once, forwards minute
//! ticks, battery and link readings, and unloads it when the face goes away.

use crate::Result;

use host::{Device, Haptics, Surface, WallClock};

pub mod compositor;
pub mod host;
pub mod icons;
pub mod indicators;
pub mod orbit;
mod orrery_watchface;
#[cfg(test)]
mod testing;

pub use indicators::IconId;
pub use orrery_watchface::{FaceLayers, OrreryFace};

pub trait WatchFace<S: Surface> {
    /// Build the face on `surface` and show the current device state
    fn load<D: Device>(&mut self, surface: &mut S, device: &mut D) -> Result<()>;

    /// Give every image and layer back to `surface`
    fn unload(&mut self, surface: &mut S);

    /// Show the wall clock time
    fn on_minute_tick<C: WallClock>(&mut self, surface: &mut S, clock: &C) -> Result<()>;

    /// Show a new battery reading
    fn on_battery(&mut self, surface: &mut S, charge_percent: u8) -> Result<()>;

    /// Show a new Bluetooth link reading
    fn on_link<V: Haptics>(&mut self, surface: &mut S, haptics: &mut V, connected: bool)
        -> Result<()>;
}
