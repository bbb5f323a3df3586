//! Icon artwork
//!
//! Every icon is drawn from primitives into a square box at the origin, so a
//! sprite of any size gets a crisp icon without bundling bitmaps.

use core::f32::consts::FRAC_PI_4;

use embedded_graphics::{
    prelude::*,
    primitives::{Circle, Ellipse, Line, PrimitiveStyle, Rectangle},
};

use super::IconId;

/// Draw `id` into the `size` box at the origin of `target`.
///
/// `fg` is used for the artwork, `bg` for details cut out of filled shapes.
pub fn draw_icon<D>(
    id: IconId,
    target: &mut D,
    size: Size,
    fg: D::Color,
    bg: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let diameter = size.width.min(size.height);

    match id {
        IconId::Earth => draw_earth(target, diameter, fg, bg),
        IconId::MoonLevel1 => draw_moon(target, diameter, 1, fg),
        IconId::MoonLevel2 => draw_moon(target, diameter, 2, fg),
        IconId::MoonLevel3 => draw_moon(target, diameter, 3, fg),
        IconId::MoonLevel4 => draw_moon(target, diameter, 4, fg),
        IconId::MoonLevel5 => draw_moon(target, diameter, 5, fg),
        IconId::SunUnlinked => draw_sun(target, diameter, false, fg),
        IconId::SunLinked => draw_sun(target, diameter, true, fg),
    }
}

fn draw_earth<D>(target: &mut D, diameter: u32, fg: D::Color, bg: D::Color) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let middle = (diameter / 2) as i32;

    Circle::new(Point::zero(), diameter)
        .into_styled(PrimitiveStyle::with_fill(fg))
        .draw(target)?;

    // Equator and a meridian
    Line::new(Point::new(1, middle), Point::new(diameter as i32 - 2, middle))
        .into_styled(PrimitiveStyle::with_stroke(bg, 1))
        .draw(target)?;
    Ellipse::new(
        Point::new((diameter / 4) as i32, 0),
        Size::new(diameter / 2, diameter),
    )
    .into_styled(PrimitiveStyle::with_stroke(bg, 1))
    .draw(target)
}

/// Moon outline, filled from the bottom up in fifths
fn draw_moon<D>(target: &mut D, diameter: u32, level: u32, fg: D::Color) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let disc = Circle::new(Point::zero(), diameter);

    disc.into_styled(PrimitiveStyle::with_stroke(fg, 1))
        .draw(target)?;

    let filled = diameter * level / 5;
    let lit = Rectangle::new(
        Point::new(0, (diameter - filled) as i32),
        Size::new(diameter, filled),
    );
    disc.into_styled(PrimitiveStyle::with_fill(fg))
        .draw(&mut target.clipped(&lit))
}

/// Sun disc with eight rays while linked, a struck-through ring otherwise
fn draw_sun<D>(target: &mut D, diameter: u32, linked: bool, fg: D::Color) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let center = Point::new((diameter / 2) as i32, (diameter / 2) as i32);
    let core = Circle::with_center(center, diameter / 2);

    if !linked {
        core.into_styled(PrimitiveStyle::with_stroke(fg, 1))
            .draw(target)?;
        let corner = (diameter / 4) as i32;
        return Line::new(
            center - Point::new(corner, corner),
            center + Point::new(corner, corner),
        )
        .into_styled(PrimitiveStyle::with_stroke(fg, 1))
        .draw(target);
    }

    core.into_styled(PrimitiveStyle::with_fill(fg))
        .draw(target)?;

    let inner = (diameter / 4 + 2) as f32;
    let outer = (diameter / 2) as f32 - 1.0;
    for ray in 0..8 {
        let angle = ray as f32 * FRAC_PI_4;
        let (sin, cos) = (libm::sinf(angle), libm::cosf(angle));
        let at = |radius: f32| {
            center
                + Point::new(
                    libm::roundf(sin * radius) as i32,
                    libm::roundf(-cos * radius) as i32,
                )
        };
        Line::new(at(inner), at(outer))
            .into_styled(PrimitiveStyle::with_stroke(fg, 1))
            .draw(target)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Rgb565;

    use super::*;
    use crate::ui::testing::FrameBuffer;

    fn lit_pixels(id: IconId, side: u32) -> usize {
        let mut frame = FrameBuffer::new(Size::new(side + 8, side + 8));
        let mut shifted = frame.translated(Point::new(4, 4));
        draw_icon(id, &mut shifted, Size::new(side, side), Rgb565::WHITE, Rgb565::BLACK).unwrap();

        // Nothing may spill out of the icon box
        let outside = frame.count(Rgb565::WHITE, frame.bounding_box())
            - frame.count(
                Rgb565::WHITE,
                Rectangle::new(Point::new(4, 4), Size::new(side, side)),
            );
        assert_eq!(outside, 0, "{id:?} drew outside its box");

        frame.count(Rgb565::WHITE, frame.bounding_box())
    }

    #[test]
    fn moon_fills_up_with_charge() {
        let mut last = 0;
        for id in crate::ui::indicators::MOON_PALETTE {
            let lit = lit_pixels(id, 16);
            assert!(lit > last, "{id:?} is not brighter than the level below");
            last = lit;
        }
    }

    #[test]
    fn linked_sun_is_brighter() {
        assert!(lit_pixels(IconId::SunLinked, 32) > lit_pixels(IconId::SunUnlinked, 32));
    }

    #[test]
    fn earth_has_cut_outs() {
        let lit = lit_pixels(IconId::Earth, 24);
        let mut frame = FrameBuffer::new(Size::new(24, 24));
        Circle::new(Point::zero(), 24)
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut frame)
            .unwrap();
        assert!(lit > 0);
        assert!(lit < frame.count(Rgb565::WHITE, frame.bounding_box()));
    }
}
