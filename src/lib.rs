#![doc(html_root_url = "https://docs.rs/touch-calibrator")]
#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_variables,
    unreachable_code,
    unused_comparisons,
    unused_must_use
)]
#![cfg_attr(not(test), no_std)]

//! Edge-swipe touch screen calibration, based on the
//! [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) and
//! [`embedded-graphics`](https://crates.io/crates/embedded-graphics) traits.
//!
//! The operator swipes a stylus from inside the display out past each of its
//! four edges. [`run_calibration()`] records the smallest and largest raw
//! coordinate seen on each axis and reports the bounds after every accepted
//! sample, both on the display being calibrated and through a
//! [`DiagnosticSink`]. The final bounds are the values a touch driver needs to
//! map raw samples onto display pixels, see
//! [`CalibrationResult::calibration_data()`].
//!
//! Any [`TouchSource`] can be calibrated. The [`driver`] module provides one
//! for the XPT2046 resistive touch controller.
//!
//! ```ignore
//! let mut touch = Xpt2046::new(spi_device, penirq);
//! let stop = AtomicBool::new(false);
//! let config = CalibrationConfig::default().with_rotation_degrees(90)?;
//! let result = run_calibration(
//!     &mut display,
//!     &mut touch,
//!     &mut delay,
//!     &mut FmtSink::new(serial),
//!     config,
//!     &stop,
//! )?;
//! ```
//!
//! # Features
//!
//! - `defmt`: derives `defmt::Format` and logs through `defmt`.
//! - `log`: logs through the `log` facade and provides `LogSink`.
//! - `embassy`: async runner stopped by an `embassy-sync` signal.

pub use crate::{
    bounds::{AxisBounds, Bounds},
    calibration::CalibrationData,
    calibration_run::{
        run_calibration, CalibrationResult, CalibrationState, Calibrator, NeverStop, Phase,
        SampleMode, StepOutcome, StopReason, StopToken,
    },
    config::{CalibrationConfig, FeedbackMode, Palette},
    diagnostics::{BoundsReport, DiagnosticSink, FmtSink},
    display::RotatableDisplay,
    driver::Xpt2046,
    error::{Axis, CalibrationError, CalibrationRunError, RotationError},
    rotation::Rotation,
    touch::{Rejection, TouchSource},
};
pub use embedded_graphics::geometry::{Point, Size};

#[cfg(feature = "defmt")]
pub use crate::diagnostics::DefmtSink;
#[cfg(feature = "log")]
pub use crate::diagnostics::LogSink;

pub mod bounds;
pub mod calibration;
pub mod calibration_run;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod driver;
#[cfg(feature = "embassy")]
pub mod embassy;
pub mod error;
pub mod mapping;
pub mod rotation;
pub mod scene;
pub mod touch;

#[cfg(test)]
mod test_support;
