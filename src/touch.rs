//! The touch source consumed by the calibration loop, and the gate that
//! decides which of its samples count.

use crate::{config::CalibrationConfig, rotation::Rotation};
use core::fmt::Debug;
use embedded_graphics::geometry::{Point, Size};

#[cfg(feature = "defmt")]
use defmt::Format;

/// A touch panel that can be polled for its current contact point.
///
/// Coordinates are in whatever units the source produces: raw converter
/// counts for a raw source, display pixels for a source that already applies
/// a calibration.
pub trait TouchSource {
    type Error: Debug;

    /// Prepares the source for polling. Called once, before the first poll.
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Returns the current contact point, or `None` when nothing touches the
    /// panel. Must not block for longer than a measurement takes.
    fn poll(&mut self) -> Result<Option<Point>, Self::Error>;
}

impl<T: TouchSource + ?Sized> TouchSource for &mut T {
    type Error = T::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        T::init(self)
    }

    fn poll(&mut self) -> Result<Option<Point>, Self::Error> {
        T::poll(self)
    }
}

/// Why a polled sample did not reach the bounds.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Raw X did not exceed the noise floor.
    BelowNoiseFloor,
    /// The sample lies outside the range the sensor can report, or off the
    /// display for a scaled source.
    OutOfRange,
}

/// Filters and aligns samples before they are folded into the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGate {
    raw_mode: bool,
    /// Largest acceptable X and Y.
    limit: Point,
    full_scale: i32,
    noise_floor: Option<i32>,
    alignment: Option<Rotation>,
}

impl SampleGate {
    /// `size` is the display size under `rotation`; scaled samples must fall
    /// within it.
    pub fn new(config: &CalibrationConfig, rotation: Rotation, size: Size) -> Self {
        let limit = if config.raw_mode {
            Point::new_equal(config.raw_full_scale)
        } else {
            Point::new(size.width as i32, size.height as i32)
        };
        Self {
            raw_mode: config.raw_mode,
            limit,
            full_scale: config.raw_full_scale,
            noise_floor: config.noise_floor,
            alignment: config.align_axes_to_rotation.then_some(rotation),
        }
    }

    /// Returns the sample to fold into the bounds, or why it was dropped.
    ///
    /// Raw samples must lie in `0..=raw_full_scale`, scaled samples on the
    /// display including its far edges. The noise floor and axis alignment
    /// only apply to raw samples.
    pub fn admit(&self, sample: Point) -> Result<Point, Rejection> {
        if !(0..=self.limit.x).contains(&sample.x) || !(0..=self.limit.y).contains(&sample.y) {
            return Err(Rejection::OutOfRange);
        }
        if !self.raw_mode {
            return Ok(sample);
        }

        if let Some(floor) = self.noise_floor {
            if sample.x <= floor {
                return Err(Rejection::BelowNoiseFloor);
            }
        }

        Ok(match self.alignment {
            Some(rotation) => rotation.align_raw(sample, self.full_scale),
            None => sample,
        })
    }
}
