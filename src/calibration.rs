//! Calibration data derived from a finished calibration session.
//!
//! The touch panel reports positions in raw converter units. The calibration
//! data describes the affine transformation from those units into display
//! pixels:
//!
//! ```text
//! x_px = alpha_x * x_raw + beta_x * y_raw + delta_x
//! y_px = alpha_y * x_raw + beta_y * y_raw + delta_y
//! ```
//!
//! Edge-swipe calibration measures each axis independently, so the cross terms
//! (`beta_x`, `alpha_y`) are zero. The full form is kept so the data can be
//! used interchangeably with three-point calibration results.

use crate::{
    bounds::{AxisBounds, Bounds},
    error::{Axis, CalibrationError},
};
use embedded_graphics::geometry::{Point, Size};

#[cfg(feature = "defmt")]
use defmt::Format;

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationData {
    pub alpha_x: f32,
    pub beta_x: f32,
    pub delta_x: f32,
    pub alpha_y: f32,
    pub beta_y: f32,
    pub delta_y: f32,
}

// Scale and offset taking [bounds.min, bounds.max] onto [0, extent].
fn axis_transform(
    bounds: &AxisBounds,
    extent: u32,
    axis: Axis,
) -> Result<(f32, f32), CalibrationError> {
    if bounds.span() == 0 {
        return Err(CalibrationError::CollapsedAxis(axis));
    }
    let scale = extent as f32 / bounds.span() as f32;
    Ok((scale, -(bounds.min() as f32) * scale))
}

impl CalibrationData {
    /// Builds the calibration data that maps `bounds` onto a display of
    /// `display_size` pixels.
    pub fn from_bounds(bounds: &Bounds, display_size: Size) -> Result<Self, CalibrationError> {
        let (alpha_x, delta_x) = axis_transform(&bounds.x, display_size.width, Axis::X)?;
        let (beta_y, delta_y) = axis_transform(&bounds.y, display_size.height, Axis::Y)?;

        let calibration_data = CalibrationData {
            alpha_x,
            beta_x: 0.0,
            delta_x,
            alpha_y: 0.0,
            beta_y,
            delta_y,
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("calibration data: {:?}", calibration_data);
        #[cfg(feature = "log")]
        log::debug!("calibration data: {:?}", calibration_data);

        Ok(calibration_data)
    }

    /// Transforms a raw touch measurement into display pixel units.
    pub fn apply(&self, raw: Point) -> Point {
        let x = raw.x as f32;
        let y = raw.y as f32;
        let px = self.alpha_x * x + self.beta_x * y + self.delta_x;
        let py = self.alpha_y * x + self.beta_y * y + self.delta_y;
        Point::new(px as i32, py as i32)
    }
}

impl Bounds {
    /// Shorthand for [`CalibrationData::from_bounds`].
    pub fn calibration_data(
        &self,
        display_size: Size,
    ) -> Result<CalibrationData, CalibrationError> {
        CalibrationData::from_bounds(self, display_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x: (i32, i32), y: (i32, i32)) -> Bounds {
        let mut bounds = Bounds::seeded(Point::new(x.0, y.0));
        bounds.include(Point::new(x.1, y.1));
        bounds
    }

    #[test]
    fn maps_bounds_onto_display_edges() {
        let data = bounds((357, 3812), (390, 3555))
            .calibration_data(Size::new(320, 240))
            .unwrap();

        assert_eq!(data.apply(Point::new(357, 390)), Point::new(0, 0));
        let far = data.apply(Point::new(3812, 3555));
        assert!((319..=320).contains(&far.x));
        assert!((239..=240).contains(&far.y));
        assert_eq!(data.beta_x, 0.0);
        assert_eq!(data.alpha_y, 0.0);
    }

    #[test]
    fn midpoint_lands_mid_screen() {
        let data = bounds((100, 300), (0, 400))
            .calibration_data(Size::new(400, 200))
            .unwrap();
        assert_eq!(data.apply(Point::new(200, 200)), Point::new(200, 100));
    }

    #[test]
    fn collapsed_axis_is_rejected() {
        let untouched = Bounds::seeded(Point::new(2048, 2048));
        assert_eq!(
            untouched.calibration_data(Size::new(240, 320)),
            Err(CalibrationError::CollapsedAxis(Axis::X))
        );

        let x_only = bounds((100, 3900), (2048, 2048));
        assert_eq!(
            x_only.calibration_data(Size::new(240, 320)),
            Err(CalibrationError::CollapsedAxis(Axis::Y))
        );
    }
}
