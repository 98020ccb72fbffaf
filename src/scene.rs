//! On-screen calibration feedback.
//!
//! The scene is drawn once when a session starts and then mutated in place:
//! the bounds text and the tracking cursor erase only the area they covered
//! before redrawing.
//!
//! ```text
//! +-------------------------------+  <- alert color, full bleed
//! |+-----------------------------+|
//! ||         rotation: 90        ||  <- calm color, inset on all sides
//! || calib: ((x0, x1), (y0, y1)) ||
//! ||                             ||
//! ||             [ ]             ||  <- tracking cursor (scaled mode only)
//! |+-----------------------------+|
//! +-------------------------------+
//! ```

use crate::{
    bounds::Bounds,
    config::{CalibrationConfig, Palette},
    rotation::Rotation,
};
use core::fmt::Write;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder},
    Drawable,
};
use heapless::String;

const STATUS_PLACEHOLDER: &str = "calib: ((x_min, x_max), (y_min, y_max))";
const ROTATION_LINE_OFFSET: i32 = 30;

type Line = String<64>;

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}

#[derive(Debug)]
pub struct CalibrationScene {
    size: Size,
    palette: Palette,
    inset: u32,
    rotation_text: Line,
    status_text: Line,
    /// Area covered by the status text when it was last drawn.
    status_area: Rectangle,
    cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    side: u32,
    area: Rectangle,
}

impl CalibrationScene {
    pub fn new(size: Size, rotation: Rotation, config: &CalibrationConfig) -> Self {
        let mut rotation_text = Line::new();
        let _ = write!(rotation_text, "rotation: {}", rotation);
        let mut status_text = Line::new();
        let _ = status_text.push_str(STATUS_PLACEHOLDER);

        let mut scene = Self {
            size,
            palette: config.palette,
            inset: config.border_inset,
            rotation_text,
            status_text,
            status_area: Rectangle::zero(),
            cursor: None,
        };
        if config.shows_cursor() {
            let side = config.cursor_size;
            let center = Point::new(size.width as i32 / 2, size.height as i32 / 2);
            scene.cursor = Some(Cursor {
                side,
                area: scene.cursor_area(center, side),
            });
        }
        scene
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn rotation_text(&self) -> &str {
        &self.rotation_text
    }

    /// Top-left corner of the tracking cursor, if the scene has one.
    pub fn cursor_position(&self) -> Option<Point> {
        self.cursor.map(|cursor| cursor.area.top_left)
    }

    fn touch_zone(&self) -> Rectangle {
        let inset = self.inset as i32;
        Rectangle::new(
            Point::new(inset, inset),
            Size::new(
                self.size.width.saturating_sub(2 * self.inset),
                self.size.height.saturating_sub(2 * self.inset),
            ),
        )
    }

    fn status_anchor(&self) -> Point {
        Point::new(self.size.width as i32 / 2, self.size.height as i32 / 4)
    }

    // Keeps the cursor inside the touch zone so erasing it never eats into the
    // border.
    fn cursor_area(&self, center: Point, side: u32) -> Rectangle {
        let zone = self.touch_zone();
        let half = side as i32 / 2;
        let low = zone.top_left;
        let high = zone.top_left + zone.size - Size::new_equal(side);
        let clamp = |v: i32, lo: i32, hi: i32| v.min(hi).max(lo);
        Rectangle::new(
            Point::new(
                clamp(center.x - half, low.x, high.x),
                clamp(center.y - half, low.y, high.y),
            ),
            Size::new_equal(side),
        )
    }

    /// Draws the whole scene.
    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        let alert: D::Color = self.palette.alert.into();
        let calm: D::Color = self.palette.calm.into();
        let text: D::Color = self.palette.text.into();

        Rectangle::new(Point::zero(), self.size)
            .into_styled(PrimitiveStyle::with_fill(alert))
            .draw(display)?;
        self.touch_zone()
            .into_styled(PrimitiveStyle::with_fill(calm))
            .draw(display)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, text);
        Text::with_text_style(
            &self.rotation_text,
            self.status_anchor() - Point::new(0, ROTATION_LINE_OFFSET),
            text_style,
            centered(),
        )
        .draw(display)?;
        self.draw_status(display)?;

        if let Some(cursor) = self.cursor {
            display.fill_solid(&cursor.area, self.palette.cursor.into())?;
        }
        Ok(())
    }

    fn draw_status<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        let color: D::Color = self.palette.text.into();
        let text = Text::with_text_style(
            &self.status_text,
            self.status_anchor(),
            MonoTextStyle::new(&FONT_6X10, color),
            centered(),
        );
        let area = text.bounding_box();
        text.draw(display)?;
        self.status_area = area;
        Ok(())
    }

    /// Replaces the status text with the current bounds.
    pub fn show_bounds<D>(&mut self, display: &mut D, bounds: &Bounds) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        display.fill_solid(&self.status_area, self.palette.calm.into())?;
        self.status_text.clear();
        let _ = write!(self.status_text, "calib: {}", bounds);
        self.draw_status(display)?;
        match self.cursor {
            Some(cursor) if cursor.area.intersection(&self.status_area).size != Size::zero() => {
                display.fill_solid(&cursor.area, self.palette.cursor.into())
            }
            _ => Ok(()),
        }
    }

    /// Moves the tracking cursor so it is centered on `center`, as far as the
    /// touch zone allows. Does nothing if the scene has no cursor.
    pub fn move_cursor<D>(&mut self, display: &mut D, center: Point) -> Result<(), D::Error>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
    {
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        let area = self.cursor_area(center, cursor.side);
        if area == cursor.area {
            return Ok(());
        }

        display.fill_solid(&cursor.area, self.palette.calm.into())?;
        // The old cursor may have overlapped the status line.
        if cursor.area.intersection(&self.status_area).size != Size::zero() {
            self.draw_status(display)?;
        }
        display.fill_solid(&area, self.palette.cursor.into())?;
        self.cursor = Some(Cursor { area, ..cursor });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeDisplay;
    use embedded_graphics::pixelcolor::Rgb565;

    fn scaled_config() -> CalibrationConfig {
        CalibrationConfig::default().with_raw_mode(false)
    }

    fn palette_color(color: Rgb888) -> Rgb565 {
        color.into()
    }

    #[test]
    fn draws_border_and_touch_zone() {
        let mut display = FakeDisplay::new(Size::new(240, 320));
        let config = CalibrationConfig::default();
        let mut scene = CalibrationScene::new(Size::new(240, 320), Rotation::Deg0, &config);
        scene.draw(&mut display).unwrap();

        let palette = Palette::default();
        assert_eq!(display.pixel(0, 0), Some(palette_color(palette.alert)));
        assert_eq!(display.pixel(1, 318), Some(palette_color(palette.alert)));
        assert_eq!(display.pixel(239, 319), Some(palette_color(palette.alert)));
        assert_eq!(display.pixel(2, 2), Some(palette_color(palette.calm)));
        assert_eq!(display.pixel(237, 317), Some(palette_color(palette.calm)));
        assert_eq!(display.pixel(238, 317), Some(palette_color(palette.alert)));
    }

    #[test]
    fn labels_rotation_and_placeholder() {
        let config = CalibrationConfig::default();
        let scene = CalibrationScene::new(Size::new(320, 240), Rotation::Deg90, &config);
        assert_eq!(scene.rotation_text(), "rotation: 90");
        assert_eq!(scene.status_text(), STATUS_PLACEHOLDER);
    }

    #[test]
    fn status_text_tracks_bounds() {
        let mut display = FakeDisplay::new(Size::new(240, 320));
        let config = CalibrationConfig::default();
        let mut scene = CalibrationScene::new(Size::new(240, 320), Rotation::Deg0, &config);
        scene.draw(&mut display).unwrap();

        let mut bounds = Bounds::seeded(Point::new(2048, 2048));
        bounds.include(Point::new(100, 200));
        scene.show_bounds(&mut display, &bounds).unwrap();
        assert_eq!(scene.status_text(), "calib: ((100, 2048), (200, 2048))");

        let text_color = palette_color(Palette::default().text);
        let lit = (0..240)
            .flat_map(|x| (70..90).map(move |y| (x, y)))
            .filter(|&(x, y)| display.pixel(x, y) == Some(text_color))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn raw_mode_has_no_cursor() {
        let config = CalibrationConfig::default();
        let scene = CalibrationScene::new(Size::new(240, 320), Rotation::Deg0, &config);
        assert_eq!(scene.cursor_position(), None);
    }

    #[test]
    fn cursor_starts_centered_and_follows() {
        let mut display = FakeDisplay::new(Size::new(240, 320));
        let mut scene =
            CalibrationScene::new(Size::new(240, 320), Rotation::Deg0, &scaled_config());
        scene.draw(&mut display).unwrap();
        assert_eq!(scene.cursor_position(), Some(Point::new(115, 155)));

        scene.move_cursor(&mut display, Point::new(60, 200)).unwrap();
        assert_eq!(scene.cursor_position(), Some(Point::new(55, 195)));

        let palette = Palette::default();
        assert_eq!(display.pixel(60, 200), Some(palette_color(palette.cursor)));
        assert_eq!(display.pixel(120, 160), Some(palette_color(palette.calm)));
    }

    #[test]
    fn cursor_stays_inside_touch_zone() {
        let mut display = FakeDisplay::new(Size::new(240, 320));
        let mut scene =
            CalibrationScene::new(Size::new(240, 320), Rotation::Deg0, &scaled_config());
        scene.draw(&mut display).unwrap();

        scene.move_cursor(&mut display, Point::new(0, 0)).unwrap();
        assert_eq!(scene.cursor_position(), Some(Point::new(2, 2)));

        scene.move_cursor(&mut display, Point::new(240, 320)).unwrap();
        assert_eq!(scene.cursor_position(), Some(Point::new(228, 308)));
        assert_eq!(
            display.pixel(0, 0),
            Some(palette_color(Palette::default().alert))
        );
    }
}
