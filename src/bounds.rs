//! Running per-axis extremes of the raw touch stream.

use core::fmt;
use embedded_graphics::geometry::Point;

#[cfg(feature = "defmt")]
use defmt::Format;

/// The smallest and largest value observed on one axis.
///
/// `min <= max` holds at all times. The interval only ever widens.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBounds {
    min: i32,
    max: i32,
}

impl AxisBounds {
    /// Starts both ends at `seed`, so that the first real value becomes both
    /// the minimum and the maximum unless it lies on the far side of the seed.
    pub const fn seeded(seed: i32) -> Self {
        Self {
            min: seed,
            max: seed,
        }
    }

    pub const fn min(&self) -> i32 {
        self.min
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Width of the interval in raw units.
    pub const fn span(&self) -> i32 {
        self.max - self.min
    }

    /// Widens the interval to contain `value`. Returns whether it changed.
    pub fn include(&mut self, value: i32) -> bool {
        let (min, max) = (self.min.min(value), self.max.max(value));
        let widened = min != self.min || max != self.max;
        self.min = min;
        self.max = max;
        widened
    }
}

/// Calibration bounds for both axes.
///
/// Formats as `((x_min, x_max), (y_min, y_max))`, the tuple a touch source
/// expects for its raw-to-pixel mapping.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: AxisBounds,
    pub y: AxisBounds,
}

impl Bounds {
    pub const fn seeded(seed: Point) -> Self {
        Self {
            x: AxisBounds::seeded(seed.x),
            y: AxisBounds::seeded(seed.y),
        }
    }

    /// Widens both axes to contain `sample`. Returns whether either changed.
    pub fn include(&mut self, sample: Point) -> bool {
        let x = self.x.include(sample.x);
        let y = self.y.include(sample.y);
        x || y
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.x.min, self.x.max, self.y.min, self.y.max
        )
    }
}
