//! Interface to the runtime hosting the watch face
//!
//! The face never draws pixels, loads artwork or drives the motor by itself.
//! It asks the host through these traits, which keeps it independent of the
//! display driver and lets tests stand in for the watch.

use chrono::NaiveDateTime;
use embedded_graphics::{
    geometry::Point,
    mono_font::MonoFont,
    pixelcolor::BinaryColor,
    primitives::Rectangle,
    text::Alignment,
};
use heapless::Vec;

use super::IconId;
use crate::{warn, Result};

/// Maximum number of drawing commands a single paint call may record
pub const PAINT_CAPACITY: usize = 16;

/// Paint callback of a canvas layer, called with the layer bounds
pub type PaintFn = fn(Rectangle, &mut PaintContext);

/// A drawing operation recorded by a paint callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintCommand {
    FillRect { rect: Rectangle, color: BinaryColor },
    StrokeCircle {
        center: Point,
        radius: u32,
        color: BinaryColor,
    },
}

/// Drawing context handed to canvas paint callbacks.
///
/// Works like a pen: set the fill or stroke color, then issue shapes. Shapes
/// are recorded and replayed onto the display by the host.
#[derive(Debug)]
pub struct PaintContext {
    fill: BinaryColor,
    stroke: BinaryColor,
    commands: Vec<PaintCommand, PAINT_CAPACITY>,
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            fill: BinaryColor::Off,
            stroke: BinaryColor::On,
            commands: Vec::new(),
        }
    }

    pub fn set_fill_color(&mut self, color: BinaryColor) {
        self.fill = color;
    }

    pub fn set_stroke_color(&mut self, color: BinaryColor) {
        self.stroke = color;
    }

    /// Fill `rect` with the fill color
    pub fn fill_rect(&mut self, rect: Rectangle) {
        self.record(PaintCommand::FillRect {
            rect,
            color: self.fill,
        });
    }

    /// Outline a circle with the stroke color
    pub fn draw_circle(&mut self, center: Point, radius: u32) {
        self.record(PaintCommand::StrokeCircle {
            center,
            radius,
            color: self.stroke,
        });
    }

    /// Commands recorded so far, in issue order
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    fn record(&mut self, command: PaintCommand) {
        if self.commands.push(command).is_err() {
            warn!("Paint command dropped, context is full");
        }
    }
}

/// Look of a text region
#[derive(Clone, Copy)]
pub struct TextStyle {
    pub font: &'static MonoFont<'static>,
    pub alignment: Alignment,
    pub text_color: BinaryColor,
    pub background_color: BinaryColor,
}

/// Image resources the host can hand out
pub trait ImageStore {
    /// Handle to a loaded image, owned by whoever loaded it
    type Image;

    /// Load a bundled icon
    fn load(&mut self, id: IconId) -> Result<Self::Image>;

    /// Give a loaded image back to the host
    fn release(&mut self, image: Self::Image);
}

/// Layers the face is composed of, drawn in creation order
pub trait Surface: ImageStore {
    /// Handle to a layer
    type Layer: Copy + PartialEq + core::fmt::Debug;

    /// Create a layer drawn by `paint`
    fn create_canvas(&mut self, frame: Rectangle, paint: PaintFn) -> Result<Self::Layer>;

    /// Create a text region showing `text`
    fn create_text(&mut self, frame: Rectangle, style: TextStyle, text: &str)
        -> Result<Self::Layer>;

    /// Replace the content of a text region
    fn set_text(&mut self, layer: Self::Layer, text: &str) -> Result<()>;

    /// Create an empty image sprite
    fn create_sprite(&mut self, frame: Rectangle) -> Result<Self::Layer>;

    /// Move or resize a sprite
    fn set_sprite_frame(&mut self, layer: Self::Layer, frame: Rectangle) -> Result<()>;

    /// Show `image` in a sprite, or leave the sprite blank with `None`
    fn set_sprite_image(&mut self, layer: Self::Layer, image: Option<&Self::Image>)
        -> Result<()>;

    /// Remove a layer of any kind
    fn destroy(&mut self, layer: Self::Layer);
}

/// Vibration motor
pub trait Haptics {
    fn short_pulse(&mut self);
}

/// Local wall clock and the user's time format preference
pub trait WallClock {
    fn now(&self) -> NaiveDateTime;

    fn is_24h_style(&self) -> bool;
}

/// Current device readings, peeked once when the face loads
pub trait DeviceStatus {
    /// Battery charge in percent, 0–100
    fn battery_percent(&self) -> u8;

    /// Whether a phone is connected
    fn is_linked(&self) -> bool;
}

/// Everything the face needs from the device besides the display
pub trait Device: WallClock + Haptics + DeviceStatus {}

impl<T> Device for T where T: WallClock + Haptics + DeviceStatus {}
