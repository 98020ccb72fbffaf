//! The display the calibration loop draws on.
//!
//! Any [embedded-graphics](https://crates.io/crates/embedded-graphics)
//! [`DrawTarget`] can be used, as long as its orientation can be queried and
//! changed. The drawable area reported by [`Dimensions::bounding_box`] must
//! reflect the current rotation, so that width and height are exchanged after
//! a quarter turn.

use crate::rotation::Rotation;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Size},
};

pub trait RotatableDisplay: DrawTarget {
    fn rotation(&self) -> Rotation;

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error>;
}

/// Applies `rotation` if given and returns the rotation in effect together with
/// the resulting drawable size.
///
/// The size is read only after the rotation is set.
pub fn resolve_orientation<D>(
    display: &mut D,
    rotation: Option<Rotation>,
) -> Result<(Rotation, Size), D::Error>
where
    D: RotatableDisplay,
{
    let rotation = match rotation {
        Some(rotation) => {
            display.set_rotation(rotation)?;
            rotation
        }
        None => display.rotation(),
    };
    Ok((rotation, display.bounding_box().size))
}
