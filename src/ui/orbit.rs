//! Orbit geometry
//!
//! Maps a clock time onto two concentric circles around the face center. Angles
//! are expressed as a fraction of a full turn, 0 at 12 o'clock and increasing
//! clockwise, like the hands of a clock.

use core::f32::consts::PI;

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

use crate::system::time::ClockTime;

/// Top-left corner of a body's bounding box in canvas pixels
pub type ScreenPosition = Point;

/// Side length of the square face canvas
pub const CANVAS_SIZE: u32 = 144;

/// Face center, shared by both orbits
pub const CENTER: Point = Point::new(72, 72);

/// A sprite circling the center
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Body {
    /// Half the side of the sprite's square box
    pub radius: i32,
    /// Distance from the face center to the sprite center
    pub path_radius: i32,
}

impl Body {
    /// Whether the body stays on a canvas extending `half_extent` from the center
    pub const fn fits(&self, half_extent: i32) -> bool {
        self.path_radius + self.radius <= half_extent
    }

    /// Square box of the body with its top-left corner at `position`
    pub fn frame(&self, position: ScreenPosition) -> Rectangle {
        let side = (self.radius * 2) as u32;
        Rectangle::new(position, Size::new(side, side))
    }
}

/// Fixed layout of the orrery
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrbitGeometry {
    pub center: Point,
    pub earth_radius: i32,
    pub moon: Body,
    pub sun: Body,
}

pub const GEOMETRY: OrbitGeometry = OrbitGeometry {
    center: CENTER,
    earth_radius: 12,
    moon: Body {
        radius: 8,
        path_radius: 26,
    },
    sun: Body {
        radius: 16,
        path_radius: 56,
    },
};

const HALF_EXTENT: i32 = CANVAS_SIZE as i32 / 2;

const _: () = assert!(
    GEOMETRY.earth_radius <= HALF_EXTENT,
    "earth does not fit on the canvas"
);
const _: () = assert!(
    GEOMETRY.moon.fits(HALF_EXTENT),
    "moon orbit leaves the canvas"
);
const _: () = assert!(
    GEOMETRY.sun.fits(HALF_EXTENT),
    "sun orbit leaves the canvas"
);

/// Place a body of `body_radius` on a circle of `orbit_path_radius` around
/// `center`, `angle_fraction` of the way round.
///
/// Coordinates are rounded to the nearest pixel rather than truncated toward
/// zero, so off-axis positions can land one pixel further out than a
/// fixed-point truncating lookup would put them (minute 1 gives dx = 3, not 2).
pub fn compute_position(
    orbit_path_radius: i32,
    body_radius: i32,
    center: Point,
    angle_fraction: f32,
) -> ScreenPosition {
    let angle = angle_fraction * 2.0 * PI;
    let radius = orbit_path_radius as f32;

    let dx = libm::roundf(libm::sinf(angle) * radius) as i32;
    let dy = libm::roundf(-libm::cosf(angle) * radius) as i32;

    Point::new(center.x + dx - body_radius, center.y + dy - body_radius)
}

/// Fraction of the turn covered by the minute hand
pub fn minute_fraction(minute: u8) -> f32 {
    minute as f32 / 60.0
}

/// Fraction of the turn covered by the hour hand.
///
/// Only whole hours count, so the hand jumps on the hour.
pub fn hour_fraction(hour: u8) -> f32 {
    (hour % 12) as f32 / 12.0
}

impl OrbitGeometry {
    /// Box of the earth sprite, fixed in the middle of the face
    pub fn earth_frame(&self) -> Rectangle {
        let side = (self.earth_radius * 2) as u32;
        Rectangle::new(
            self.center - Point::new(self.earth_radius, self.earth_radius),
            Size::new(side, side),
        )
    }

    /// Box of the moon sprite for `time`
    pub fn moon_frame(&self, time: ClockTime) -> Rectangle {
        self.moon.frame(compute_position(
            self.moon.path_radius,
            self.moon.radius,
            self.center,
            minute_fraction(time.minute),
        ))
    }

    /// Box of the sun sprite for `time`
    pub fn sun_frame(&self, time: ClockTime) -> Rectangle {
        self.sun.frame(compute_position(
            self.sun.path_radius,
            self.sun.radius,
            self.center,
            hour_fraction(time.hour),
        ))
    }
}
