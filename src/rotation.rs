//! Display rotation and the matching touch axis alignment.

use crate::error::RotationError;
use core::fmt;
use embedded_graphics::geometry::Point;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Logical orientation of the display in degrees.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Whether the display's width and height are exchanged relative to its
    /// native orientation.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Remaps a raw sample taken in the panel's native orientation so that its
    /// axes follow the rotated display.
    ///
    /// A panel wired for rotation 0 reports X along the native width. Rotating
    /// the display makes the touch panel's axes disagree with the screen's:
    ///
    /// - 90: the axes are exchanged,
    /// - 180: both axes are mirrored,
    /// - 270: the axes are exchanged and then both mirrored.
    ///
    /// `full_scale` is the largest raw value the sensor can report, used as the
    /// mirror line.
    pub const fn align_raw(self, raw: Point, full_scale: i32) -> Point {
        match self {
            Rotation::Deg0 => raw,
            Rotation::Deg90 => Point::new(raw.y, raw.x),
            Rotation::Deg180 => Point::new(full_scale - raw.x, full_scale - raw.y),
            Rotation::Deg270 => Point::new(full_scale - raw.y, full_scale - raw.x),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = RotationError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(RotationError(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}
