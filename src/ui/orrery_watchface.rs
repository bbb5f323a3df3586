//! Orrery watchface

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::BinaryColor,
    primitives::Rectangle,
    text::Alignment,
};
use heapless::Vec;

use super::{
    host::{Device, Haptics, PaintContext, Surface, TextStyle, WallClock},
    indicators::{battery_icon, link_icon, should_alert},
    orbit::{CANVAS_SIZE, GEOMETRY},
    IconId, WatchFace,
};
use crate::{
    debug, info,
    system::{
        config::FaceConfig,
        time::{format_timestamp, ClockTime, TIME_TEXT_LEN},
    },
    warn, Error, Result,
};

/// Orrery backdrop, square at the top of the face
const CANVAS_FRAME: Rectangle = Rectangle::new(Point::zero(), Size::new(CANVAS_SIZE, CANVAS_SIZE));

/// Digital time below the backdrop
const TIME_FRAME: Rectangle = Rectangle::new(Point::new(0, 145), Size::new(CANVAS_SIZE, 23));

/// Shown until the first minute tick lands
const PLACEHOLDER_TEXT: &str = "2015-01-01 00:00";

const TIME_STYLE: TextStyle = TextStyle {
    font: &profont::PROFONT_12_POINT,
    alignment: Alignment::Center,
    text_color: BinaryColor::On,
    background_color: BinaryColor::Off,
};

const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };

/// Black backdrop with the two orbits drawn in white
fn paint_backdrop(bounds: Rectangle, ctx: &mut PaintContext) {
    ctx.set_fill_color(BinaryColor::Off);
    ctx.fill_rect(bounds);

    ctx.set_stroke_color(BinaryColor::On);
    ctx.draw_circle(GEOMETRY.center, GEOMETRY.moon.path_radius as u32);
    ctx.draw_circle(GEOMETRY.center, GEOMETRY.sun.path_radius as u32);
}

/// Number of layers in [`FaceLayers`]
const FACE_LAYER_COUNT: usize = 5;

/// Layers making up the face, in drawing order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLayers<L> {
    pub canvas: L,
    pub time: L,
    pub earth: L,
    pub moon: L,
    pub sun: L,
}

/// Earth, moon and sun watch face.
///
/// Holds every layer it created and the image currently shown by each sprite.
/// Nothing is shared, the host passes itself into every handler.
pub struct OrreryFace<S: Surface> {
    config: FaceConfig,
    layers: Option<FaceLayers<S::Layer>>,
    earth: Option<S::Image>,
    moon: Option<S::Image>,
    sun: Option<S::Image>,
    /// Last link reading, `None` before the first one
    linked: Option<bool>,
}

impl<S: Surface> Default for OrreryFace<S> {
    fn default() -> Self {
        Self::new(FaceConfig::default())
    }
}

impl<S: Surface> OrreryFace<S> {
    pub fn new(config: FaceConfig) -> Self {
        Self {
            config,
            layers: None,
            earth: None,
            moon: None,
            sun: None,
            linked: None,
        }
    }

    /// Layers of a loaded face
    pub fn layers(&self) -> Option<&FaceLayers<S::Layer>> {
        self.layers.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    fn loaded(&self) -> Result<FaceLayers<S::Layer>> {
        self.layers.ok_or(Error::NotLoaded)
    }
}

impl<S: Surface> WatchFace<S> for OrreryFace<S> {
    fn load<D: Device>(&mut self, surface: &mut S, device: &mut D) -> Result<()> {
        if self.is_loaded() {
            debug!("Orrery face already loaded");
            return Ok(());
        }

        info!("Loading orrery face");
        let layers = create_layers(surface)?;
        self.layers = Some(layers);

        swap_icon(surface, layers.earth, &mut self.earth, IconId::Earth)?;

        let connected = device.is_linked();
        self.on_link(surface, device, connected)?;

        let charge_percent = device.battery_percent();
        self.on_battery(surface, charge_percent)?;

        self.on_minute_tick(surface, device)
    }

    fn unload(&mut self, surface: &mut S) {
        info!("Unloading orrery face");

        for image in [self.earth.take(), self.moon.take(), self.sun.take()]
            .into_iter()
            .flatten()
        {
            surface.release(image);
        }

        if let Some(layers) = self.layers.take() {
            for layer in [
                layers.sun,
                layers.moon,
                layers.earth,
                layers.time,
                layers.canvas,
            ] {
                surface.destroy(layer);
            }
        }

        self.linked = None;
    }

    fn on_minute_tick<C: WallClock>(&mut self, surface: &mut S, clock: &C) -> Result<()> {
        let layers = self.loaded()?;
        let now = clock.now();
        let time = ClockTime::from(&now);
        debug!("Minute tick at {}:{}", time.hour, time.minute);

        let mut buf = [0u8; TIME_TEXT_LEN];
        let text = format_timestamp(&mut buf, &now, clock.is_24h_style())?;
        surface.set_text(layers.time, text)?;

        surface.set_sprite_frame(layers.moon, GEOMETRY.moon_frame(time))?;
        surface.set_sprite_frame(layers.sun, GEOMETRY.sun_frame(time))
    }

    fn on_battery(&mut self, surface: &mut S, charge_percent: u8) -> Result<()> {
        let layers = self.loaded()?;
        let icon = battery_icon(charge_percent);
        info!("Battery at {}%, showing {:?}", charge_percent, icon);

        swap_icon(surface, layers.moon, &mut self.moon, icon)
    }

    fn on_link<V: Haptics>(&mut self, surface: &mut S, haptics: &mut V, connected: bool) -> Result<()> {
        let layers = self.loaded()?;
        info!("Link {}", if connected { "connected" } else { "disconnected" });

        if should_alert(self.config.disconnect_alert, self.linked, connected) {
            warn!("Phone disconnected");
            haptics.short_pulse();
        }
        self.linked = Some(connected);

        swap_icon(surface, layers.sun, &mut self.sun, link_icon(connected))
    }
}

/// Create every layer of the face, or none of them
fn create_layers<S: Surface>(surface: &mut S) -> Result<FaceLayers<S::Layer>> {
    let mut created: Vec<S::Layer, FACE_LAYER_COUNT> = Vec::new();

    let result = try_create_layers(surface, &mut created);
    if result.is_err() {
        warn!("Face layers could not be created");
        while let Some(layer) = created.pop() {
            surface.destroy(layer);
        }
    }
    result
}

fn try_create_layers<S: Surface>(
    surface: &mut S,
    created: &mut Vec<S::Layer, FACE_LAYER_COUNT>,
) -> Result<FaceLayers<S::Layer>> {
    let mut track = |layer: Result<S::Layer>| -> Result<S::Layer> {
        let layer = layer?;
        // One slot per face layer, so this never overflows
        created.push(layer).ok();
        Ok(layer)
    };

    Ok(FaceLayers {
        canvas: track(surface.create_canvas(CANVAS_FRAME, paint_backdrop))?,
        time: track(surface.create_text(TIME_FRAME, TIME_STYLE, PLACEHOLDER_TEXT))?,
        earth: track(surface.create_sprite(GEOMETRY.earth_frame()))?,
        moon: track(surface.create_sprite(GEOMETRY.moon_frame(MIDNIGHT)))?,
        sun: track(surface.create_sprite(GEOMETRY.sun_frame(MIDNIGHT)))?,
    })
}

/// Replace the image shown by `sprite` with `icon`.
///
/// The sprite is cleared and the old image released before the new one is
/// loaded. A failed load leaves the sprite blank.
fn swap_icon<S: Surface>(
    surface: &mut S,
    sprite: S::Layer,
    slot: &mut Option<S::Image>,
    icon: IconId,
) -> Result<()> {
    surface.set_sprite_image(sprite, None)?;
    if let Some(previous) = slot.take() {
        surface.release(previous);
    }

    let image = match surface.load(icon) {
        Ok(image) => image,
        Err(err) => {
            warn!("Failed to load {:?}: {:?}", icon, err);
            return Ok(());
        }
    };

    if let Err(err) = surface.set_sprite_image(sprite, Some(&image)) {
        surface.release(image);
        return Err(err);
    }
    *slot = Some(image);
    Ok(())
}
