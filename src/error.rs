//! Error definitions for the crate

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// A rotation that is not one of 0, 90, 180 or 270 degrees.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationError(pub u16);

impl fmt::Display for RotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid rotation {} degrees, expected one of 0, 90, 180 or 270",
            self.0
        )
    }
}

/// The axis of a set of calibration bounds.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// The error returned when calibration bounds cannot be turned into
/// calibration data.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// No touch ever widened this axis, so its minimum equals its maximum.
    CollapsedAxis(Axis),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::CollapsedAxis(Axis::X) => write!(f, "x axis was never swept"),
            CalibrationError::CollapsedAxis(Axis::Y) => write!(f, "y axis was never swept"),
        }
    }
}

/// The error returned when a calibration session cannot run.
///
/// Errors reported by the touch source while the loop is running are not
/// surfaced here. They are treated as "no touch" for that iteration.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum CalibrationRunError<TouchError, DTError> {
    /// The touch source failed to initialize.
    Touch(TouchError),
    /// An error occurred in the display panel driver.
    DrawTarget(DTError),
}
