//! Linear interpolation from raw touch space into display pixel space.

use crate::bounds::{AxisBounds, Bounds};
use embedded_graphics::geometry::{Point, Size};

/// Maps `value` from `[in_min, in_max]` onto `[out_min, out_max]`, rounding to
/// the nearest integer and constraining the result to the output range.
///
/// A collapsed input range maps its own value to the middle of the output
/// range and anything else to the output end on the same side.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let in_range = (i64::from(in_max) - i64::from(in_min)) as f32;
    let in_delta = (i64::from(value) - i64::from(in_min)) as f32;
    let fraction = if in_range != 0.0 {
        in_delta / in_range
    } else if in_delta != 0.0 {
        in_delta
    } else {
        0.5
    };

    let mapped = out_min as f32 + fraction * (i64::from(out_max) - i64::from(out_min)) as f32;
    let (low, high) = if out_min <= out_max {
        (out_min as f32, out_max as f32)
    } else {
        (out_max as f32, out_min as f32)
    };
    round(mapped.clamp(low, high))
}

// `f32::round` needs std. Values beyond the `i32` range saturate.
fn round(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

fn map_axis(value: i32, bounds: &AxisBounds, extent: u32) -> i32 {
    map_range(value, bounds.min(), bounds.max(), 0, extent as i32)
}

/// Maps a raw sample to the pixel it falls on given the current bounds.
///
/// The bounds move while a session runs, so early results are only a rough
/// guide until every edge has been swept.
pub fn map_to_screen(raw: Point, bounds: &Bounds, size: Size) -> Point {
    Point::new(
        map_axis(raw.x, &bounds.x, size.width),
        map_axis(raw.y, &bounds.y, size.height),
    )
}
