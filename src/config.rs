//! Calibration session configuration.

use crate::{error::RotationError, rotation::Rotation};
use embedded_graphics::pixelcolor::Rgb888;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Noise floor that filters contact noise from a raw 16-bit resistive panel.
///
/// Samples whose raw X does not exceed this value are not treated as touches.
pub const DEFAULT_NOISE_FLOOR: i32 = 3000;

/// Largest value reported by a 12-bit touch converter such as the XPT2046 or
/// STMPE610.
pub const RAW_FULL_SCALE_12BIT: i32 = 4095;

/// Largest value reported by a touch source that scales its readings to 16
/// bits.
pub const RAW_FULL_SCALE_16BIT: i32 = 65535;

/// How calibration progress is shown.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackMode {
    /// Report to the diagnostic sink only.
    None,
    /// Report to the diagnostic sink and draw the bounds, the rotation and a
    /// tracking cursor on the display.
    #[default]
    OnScreen,
}

/// Colors of the on-screen feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Full-bleed background, visible only in the border strip.
    pub alert: Rgb888,
    /// Inset area marking where touches are expected.
    pub calm: Rgb888,
    pub text: Rgb888,
    pub cursor: Rgb888,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alert: Rgb888::new(0xFF, 0x00, 0x00),
            calm: Rgb888::new(0x00, 0x00, 0x60),
            text: Rgb888::new(0xFF, 0xFF, 0xFF),
            cursor: Rgb888::new(0xFF, 0x00, 0x00),
        }
    }
}

/// Settings for one calibration session.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Overrides the display rotation. `None` keeps the display's rotation.
    pub rotation: Option<Rotation>,
    pub feedback: FeedbackMode,
    /// Whether samples are unscaled sensor units (`true`) or already scaled to
    /// display pixels (`false`).
    pub raw_mode: bool,
    /// Sleep between polls.
    pub poll_interval_ms: u32,
    /// Largest raw value the sensor can report. Raw mode seeds the bounds at
    /// the middle of `0..=raw_full_scale` and drops samples outside it.
    pub raw_full_scale: i32,
    /// In raw mode, samples with `x <= noise_floor` are dropped as contact
    /// noise.
    pub noise_floor: Option<i32>,
    /// Remap raw samples from the panel's native orientation to the rotated
    /// display. Only needed for touch sources that are unaware of rotation.
    pub align_axes_to_rotation: bool,
    /// Stop after this many loop iterations.
    pub max_iterations: Option<u32>,
    /// Stop after this many accepted samples.
    pub max_samples: Option<u32>,
    pub palette: Palette,
    /// Width of the alert-colored strip around the touch zone, in pixels.
    pub border_inset: u32,
    /// Side of the square tracking cursor, in pixels.
    pub cursor_size: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            rotation: None,
            feedback: FeedbackMode::OnScreen,
            raw_mode: true,
            poll_interval_ms: 100,
            raw_full_scale: RAW_FULL_SCALE_12BIT,
            noise_floor: None,
            align_axes_to_rotation: false,
            max_iterations: None,
            max_samples: None,
            palette: Palette::default(),
            border_inset: 2,
            cursor_size: 10,
        }
    }
}

impl CalibrationConfig {
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Sets the rotation from degrees, failing on anything other than 0, 90,
    /// 180 or 270.
    pub fn with_rotation_degrees(self, degrees: u16) -> Result<Self, RotationError> {
        Ok(self.with_rotation(Rotation::try_from(degrees)?))
    }

    pub fn with_feedback(mut self, feedback: FeedbackMode) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_raw_mode(mut self, raw_mode: bool) -> Self {
        self.raw_mode = raw_mode;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub fn with_raw_full_scale(mut self, raw_full_scale: i32) -> Self {
        self.raw_full_scale = raw_full_scale;
        self
    }

    pub fn with_noise_floor(mut self, noise_floor: i32) -> Self {
        self.noise_floor = Some(noise_floor);
        self
    }

    pub fn with_axes_aligned_to_rotation(mut self, align: bool) -> Self {
        self.align_axes_to_rotation = align;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_max_samples(mut self, max_samples: u32) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_border_inset(mut self, border_inset: u32) -> Self {
        self.border_inset = border_inset;
        self
    }

    pub fn with_cursor_size(mut self, cursor_size: u32) -> Self {
        self.cursor_size = cursor_size;
        self
    }

    /// Middle of the raw sensor range.
    pub const fn raw_midpoint(&self) -> i32 {
        (self.raw_full_scale + 1) / 2
    }

    /// Whether the tracking cursor is drawn. It is only meaningful when samples
    /// can be mapped onto the screen, so raw passthrough sessions omit it.
    pub fn shows_cursor(&self) -> bool {
        self.feedback == FeedbackMode::OnScreen && !self.raw_mode
    }
}
