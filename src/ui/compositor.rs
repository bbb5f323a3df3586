//! Software compositor
//!
//! Implements the host side of the watch face on top of `embedded-graphics`:
//! a small table of layers drawn back to front into any [`DrawTarget`], and a
//! store handing out the bundled icons.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::{String, Vec};

use super::{
    host::{ImageStore, PaintCommand, PaintContext, PaintFn, Surface, TextStyle},
    icons, IconId,
};
use crate::{debug, warn, Error, Result};

/// Maximum number of layers alive at once
pub const MAX_LAYERS: usize = 8;

/// Maximum length of a text region's content in bytes
pub const TEXT_CAPACITY: usize = 32;

/// Default number of images that may be loaded at the same time
pub const IMAGE_BUDGET: usize = 4;

/// Handle to a layer owned by a [`Compositor`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerId(u16);

/// A loaded icon.
///
/// Deliberately neither `Clone` nor `Copy`: every handle has to go back
/// through [`ImageStore::release`] exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct Icon {
    id: IconId,
}

impl Icon {
    pub fn id(&self) -> IconId {
        self.id
    }
}

enum Layer {
    Canvas {
        frame: Rectangle,
        paint: PaintFn,
    },
    Text {
        frame: Rectangle,
        style: TextStyle,
        text: String<TEXT_CAPACITY>,
    },
    Sprite {
        frame: Rectangle,
        image: Option<IconId>,
    },
}

struct Entry {
    id: LayerId,
    layer: Layer,
}

pub struct Compositor {
    /// Layers in creation order, drawn first to last
    layers: Vec<Entry, MAX_LAYERS>,
    next_id: u16,
    /// Live handles per icon, indexed by [`IconId::index`]
    live: [u8; IconId::COUNT],
    image_budget: usize,
    dirty: bool,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::with_image_budget(IMAGE_BUDGET)
    }

    /// Compositor refusing to load more than `budget` images at once
    pub fn with_image_budget(budget: usize) -> Self {
        Self {
            layers: Vec::new(),
            next_id: 0,
            live: [0; IconId::COUNT],
            image_budget: budget,
            dirty: true,
        }
    }

    /// Whether anything changed since the last [`Compositor::render`]
    pub fn needs_render(&self) -> bool {
        self.dirty
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of loaded images not yet released
    pub fn live_images(&self) -> usize {
        self.live.iter().map(|&count| count as usize).sum()
    }

    /// Number of loaded handles of one icon not yet released
    pub fn live_count(&self, id: IconId) -> usize {
        self.live[id.index()] as usize
    }

    pub fn text(&self, layer: LayerId) -> Option<&str> {
        match self.get(layer)? {
            Layer::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn sprite_frame(&self, layer: LayerId) -> Option<Rectangle> {
        match self.get(layer)? {
            Layer::Sprite { frame, .. } => Some(*frame),
            _ => None,
        }
    }

    pub fn sprite_image(&self, layer: LayerId) -> Option<IconId> {
        match self.get(layer)? {
            Layer::Sprite { image, .. } => *image,
            _ => None,
        }
    }

    /// Draw every layer into `target`, back to front
    pub fn render<D>(&mut self, target: &mut D) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: RgbColor,
    {
        for entry in self.layers.iter() {
            match &entry.layer {
                Layer::Canvas { frame, paint } => {
                    let mut ctx = PaintContext::new();
                    paint(Rectangle::new(Point::zero(), frame.size), &mut ctx);

                    let mut clipped = target.clipped(frame);
                    let mut local = clipped.translated(frame.top_left);
                    for command in ctx.commands() {
                        replay(command, &mut local)?;
                    }
                }
                Layer::Text { frame, style, text } => {
                    let mut clipped = target.clipped(frame);
                    frame
                        .into_styled(PrimitiveStyle::with_fill(color::<D::Color>(style.background_color)))
                        .draw(&mut clipped)?;

                    let x = match style.alignment {
                        Alignment::Left => frame.top_left.x,
                        Alignment::Center => frame.center().x,
                        Alignment::Right => frame.top_left.x + frame.size.width as i32 - 1,
                    };
                    let character_style = MonoTextStyle::new(style.font, color::<D::Color>(style.text_color));
                    let text_style = TextStyleBuilder::new()
                        .alignment(style.alignment)
                        .baseline(Baseline::Top)
                        .build();
                    Text::with_text_style(
                        text,
                        Point::new(x, frame.top_left.y + 2),
                        character_style,
                        text_style,
                    )
                    .draw(&mut clipped)?;
                }
                Layer::Sprite {
                    frame,
                    image: Some(id),
                } => {
                    let mut clipped = target.clipped(frame);
                    let mut local = clipped.translated(frame.top_left);
                    icons::draw_icon(
                        *id,
                        &mut local,
                        frame.size,
                        D::Color::WHITE,
                        D::Color::BLACK,
                    )?;
                }
                Layer::Sprite { image: None, .. } => {}
            }
        }

        self.dirty = false;
        Ok(())
    }

    fn get(&self, layer: LayerId) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|entry| entry.id == layer)
            .map(|entry| &entry.layer)
    }

    fn get_mut(&mut self, layer: LayerId) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|entry| entry.id == layer)
            .map(|entry| &mut entry.layer)
            .ok_or(Error::UnknownLayer)
    }

    fn insert(&mut self, layer: Layer) -> Result<LayerId> {
        let id = LayerId(self.next_id);
        self.layers
            .push(Entry { id, layer })
            .map_err(|_| Error::LayerLimit)?;
        self.next_id = self.next_id.wrapping_add(1);
        self.dirty = true;
        Ok(id)
    }
}

impl ImageStore for Compositor {
    type Image = Icon;

    fn load(&mut self, id: IconId) -> Result<Icon> {
        if self.live_images() >= self.image_budget {
            warn!("Image budget exhausted, cannot load {:?}", id);
            return Err(Error::ImageUnavailable(id));
        }

        self.live[id.index()] = self.live[id.index()].saturating_add(1);
        Ok(Icon { id })
    }

    fn release(&mut self, image: Icon) {
        let count = &mut self.live[image.id.index()];
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }

        // Sprites must not keep showing artwork that is gone
        for entry in self.layers.iter_mut() {
            if let Layer::Sprite { image: shown, .. } = &mut entry.layer {
                if *shown == Some(image.id) {
                    warn!("{:?} released while still shown", image.id);
                    *shown = None;
                    self.dirty = true;
                }
            }
        }
    }
}

impl Surface for Compositor {
    type Layer = LayerId;

    fn create_canvas(&mut self, frame: Rectangle, paint: PaintFn) -> Result<LayerId> {
        self.insert(Layer::Canvas { frame, paint })
    }

    fn create_text(&mut self, frame: Rectangle, style: TextStyle, text: &str) -> Result<LayerId> {
        let text = String::try_from(text).map_err(|_| Error::TextTooLong)?;
        self.insert(Layer::Text { frame, style, text })
    }

    fn set_text(&mut self, layer: LayerId, content: &str) -> Result<()> {
        let content = String::try_from(content).map_err(|_| Error::TextTooLong)?;
        let changed = match self.get_mut(layer)? {
            Layer::Text { text, .. } => update(text, content),
            _ => return Err(Error::UnknownLayer),
        };
        self.dirty |= changed;
        Ok(())
    }

    fn create_sprite(&mut self, frame: Rectangle) -> Result<LayerId> {
        self.insert(Layer::Sprite { frame, image: None })
    }

    fn set_sprite_frame(&mut self, layer: LayerId, new_frame: Rectangle) -> Result<()> {
        let changed = match self.get_mut(layer)? {
            Layer::Sprite { frame, .. } => update(frame, new_frame),
            _ => return Err(Error::UnknownLayer),
        };
        self.dirty |= changed;
        Ok(())
    }

    fn set_sprite_image(&mut self, layer: LayerId, new_image: Option<&Icon>) -> Result<()> {
        let new_image = new_image.map(Icon::id);
        let changed = match self.get_mut(layer)? {
            Layer::Sprite { image, .. } => update(image, new_image),
            _ => return Err(Error::UnknownLayer),
        };
        self.dirty |= changed;
        Ok(())
    }

    fn destroy(&mut self, layer: LayerId) {
        let before = self.layers.len();
        self.layers.retain(|entry| entry.id != layer);
        if self.layers.len() == before {
            debug!("Layer {:?} destroyed twice", layer);
        } else {
            self.dirty = true;
        }
    }
}

/// Store `value` in `slot`, returning whether it differed
fn update<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn color<C: RgbColor>(color: BinaryColor) -> C {
    match color {
        BinaryColor::On => C::WHITE,
        BinaryColor::Off => C::BLACK,
    }
}

fn replay<D>(command: &PaintCommand, target: &mut D) -> core::result::Result<(), D::Error>
where
    D: DrawTarget,
    D::Color: RgbColor,
{
    match *command {
        PaintCommand::FillRect { rect, color: fill } => rect
            .into_styled(PrimitiveStyle::with_fill(color::<D::Color>(fill)))
            .draw(target),
        PaintCommand::StrokeCircle {
            center,
            radius,
            color: stroke,
        } => Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_stroke(color::<D::Color>(stroke), 1))
            .draw(target),
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::{mono_font::ascii::FONT_6X10, pixelcolor::Rgb565};

    use super::*;
    use crate::ui::testing::FrameBuffer;

    const STYLE: TextStyle = TextStyle {
        font: &FONT_6X10,
        alignment: Alignment::Center,
        text_color: BinaryColor::On,
        background_color: BinaryColor::Off,
    };

    fn square(x: i32, y: i32, side: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(side, side))
    }

    fn paint_ring(bounds: Rectangle, ctx: &mut PaintContext) {
        ctx.set_fill_color(BinaryColor::Off);
        ctx.fill_rect(bounds);
        ctx.set_stroke_color(BinaryColor::On);
        ctx.draw_circle(Point::new(10, 10), 5);
    }

    #[test]
    fn loads_and_releases_images() {
        let mut compositor = Compositor::new();
        let earth = compositor.load(IconId::Earth).unwrap();
        let moon = compositor.load(IconId::MoonLevel3).unwrap();
        assert_eq!(compositor.live_images(), 2);
        assert_eq!(compositor.live_count(IconId::Earth), 1);

        compositor.release(earth);
        compositor.release(moon);
        assert_eq!(compositor.live_images(), 0);
    }

    #[test]
    fn refuses_loads_past_budget() {
        let mut compositor = Compositor::with_image_budget(1);
        let earth = compositor.load(IconId::Earth).unwrap();
        assert_eq!(
            compositor.load(IconId::SunLinked),
            Err(Error::ImageUnavailable(IconId::SunLinked))
        );

        compositor.release(earth);
        assert!(compositor.load(IconId::SunLinked).is_ok());
    }

    #[test]
    fn releasing_a_shown_image_blanks_the_sprite() {
        let mut compositor = Compositor::new();
        let sprite = compositor.create_sprite(square(0, 0, 16)).unwrap();
        let icon = compositor.load(IconId::MoonLevel1).unwrap();
        compositor.set_sprite_image(sprite, Some(&icon)).unwrap();
        assert_eq!(compositor.sprite_image(sprite), Some(IconId::MoonLevel1));

        compositor.release(icon);
        assert_eq!(compositor.sprite_image(sprite), None);
    }

    #[test]
    fn layer_kinds_are_checked() {
        let mut compositor = Compositor::new();
        let sprite = compositor.create_sprite(square(0, 0, 16)).unwrap();
        let text = compositor.create_text(square(0, 20, 20), STYLE, "12:00").unwrap();

        assert_eq!(compositor.set_text(sprite, "x"), Err(Error::UnknownLayer));
        assert_eq!(
            compositor.set_sprite_frame(text, square(1, 1, 1)),
            Err(Error::UnknownLayer)
        );
        assert_eq!(compositor.text(text), Some("12:00"));
    }

    #[test]
    fn rejects_text_longer_than_the_region_buffer() {
        let mut compositor = Compositor::new();
        let text = compositor.create_text(square(0, 0, 20), STYLE, "").unwrap();
        let long = "0123456789012345678901234567890123456789";
        assert_eq!(compositor.set_text(text, long), Err(Error::TextTooLong));
        assert_eq!(compositor.text(text), Some(""));
    }

    #[test]
    fn layer_table_is_bounded() {
        let mut compositor = Compositor::new();
        for _ in 0..MAX_LAYERS {
            compositor.create_sprite(square(0, 0, 4)).unwrap();
        }
        assert_eq!(
            compositor.create_sprite(square(0, 0, 4)),
            Err(Error::LayerLimit)
        );
    }

    #[test]
    fn destroyed_layers_are_gone() {
        let mut compositor = Compositor::new();
        let sprite = compositor.create_sprite(square(0, 0, 4)).unwrap();
        compositor.destroy(sprite);
        compositor.destroy(sprite);
        assert_eq!(compositor.layer_count(), 0);
        assert_eq!(
            compositor.set_sprite_frame(sprite, square(0, 0, 4)),
            Err(Error::UnknownLayer)
        );
    }

    #[test]
    fn tracks_changes_between_renders() {
        let mut compositor = Compositor::new();
        let sprite = compositor.create_sprite(square(0, 0, 16)).unwrap();
        let mut frame = FrameBuffer::new(Size::new(32, 32));

        compositor.render(&mut frame).unwrap();
        assert!(!compositor.needs_render());

        compositor.set_sprite_frame(sprite, square(0, 0, 16)).unwrap();
        assert!(!compositor.needs_render());

        compositor.set_sprite_frame(sprite, square(4, 4, 16)).unwrap();
        assert!(compositor.needs_render());
    }

    #[test]
    fn renders_canvas_relative_to_its_frame() {
        let mut compositor = Compositor::new();
        compositor.create_canvas(square(10, 10, 21), paint_ring).unwrap();
        let mut frame = FrameBuffer::new(Size::new(40, 40));

        compositor.render(&mut frame).unwrap();

        // Ring of radius 5 around (10, 10) inside the canvas at (10, 10)
        assert_eq!(frame.pixel(Point::new(20, 15)), Some(Rgb565::WHITE));
        assert_eq!(frame.pixel(Point::new(20, 25)), Some(Rgb565::WHITE));
        assert_eq!(frame.pixel(Point::new(20, 20)), Some(Rgb565::BLACK));
        assert!(frame.count(Rgb565::WHITE, square(0, 0, 10)) == 0);
    }

    #[test]
    fn sprites_draw_on_top_of_earlier_layers() {
        let mut compositor = Compositor::new();
        compositor.create_canvas(square(0, 0, 32), paint_ring).unwrap();
        let sprite = compositor.create_sprite(square(0, 0, 16)).unwrap();
        let icon = compositor.load(IconId::MoonLevel5).unwrap();
        compositor.set_sprite_image(sprite, Some(&icon)).unwrap();

        let mut frame = FrameBuffer::new(Size::new(32, 32));
        compositor.render(&mut frame).unwrap();

        // Middle of the full moon is lit although the canvas painted it black
        assert_eq!(frame.pixel(Point::new(8, 8)), Some(Rgb565::WHITE));

        compositor.set_sprite_image(sprite, None).unwrap();
        compositor.release(icon);
        compositor.render(&mut frame).unwrap();
        assert_eq!(frame.pixel(Point::new(8, 8)), Some(Rgb565::BLACK));
    }
}
