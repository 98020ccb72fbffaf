//! Fakes shared by the unit tests.

use crate::{
    diagnostics::{BoundsReport, DiagnosticSink},
    display::RotatableDisplay,
    rotation::Rotation,
    touch::TouchSource,
};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    prelude::RgbColor,
    Pixel,
};
use embedded_hal::delay::DelayNs;
use std::collections::VecDeque;

#[derive(Debug, PartialEq, Eq)]
pub struct DisplayFault;

/// An in-memory panel whose drawable area follows its rotation.
#[derive(Debug)]
pub struct FakeDisplay {
    native: Size,
    rotation: Rotation,
    framebuffer: Vec<Rgb565>,
    failing: bool,
    pub rotation_changes: usize,
    pub pixels_drawn: usize,
}

impl FakeDisplay {
    pub fn new(native: Size) -> Self {
        let mut display = Self {
            native,
            rotation: Rotation::Deg0,
            framebuffer: Vec::new(),
            failing: false,
            rotation_changes: 0,
            pixels_drawn: 0,
        };
        display.clear_framebuffer();
        display
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self.clear_framebuffer();
        self
    }

    /// Every draw and rotation change fails.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        let size = self.size();
        if x < 0 || y < 0 || x >= size.width as i32 || y >= size.height as i32 {
            return None;
        }
        self.framebuffer
            .get(y as usize * size.width as usize + x as usize)
            .copied()
    }

    fn clear_framebuffer(&mut self) {
        let size = self.size();
        self.framebuffer = vec![Rgb565::BLACK; (size.width * size.height) as usize];
    }
}

impl OriginDimensions for FakeDisplay {
    fn size(&self) -> Size {
        if self.rotation.swaps_axes() {
            Size::new(self.native.height, self.native.width)
        } else {
            self.native
        }
    }
}

impl DrawTarget for FakeDisplay {
    type Color = Rgb565;
    type Error = DisplayFault;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        if self.failing {
            return Err(DisplayFault);
        }
        let width = self.size().width as i32;
        for Pixel(point, color) in pixels {
            if self.pixel(point.x, point.y).is_some() {
                self.framebuffer[(point.y * width + point.x) as usize] = color;
                self.pixels_drawn += 1;
            }
        }
        Ok(())
    }
}

impl RotatableDisplay for FakeDisplay {
    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error> {
        if self.failing {
            return Err(DisplayFault);
        }
        self.rotation = rotation;
        self.rotation_changes += 1;
        self.clear_framebuffer();
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct TouchFault;

/// Replays a fixed script of poll results, then reports no touch.
#[derive(Debug, Default)]
pub struct ScriptedTouch {
    script: VecDeque<Result<Option<Point>, TouchFault>>,
    init_fails: bool,
    pub polls: usize,
}

impl ScriptedTouch {
    pub fn new(samples: &[Option<Point>]) -> Self {
        Self {
            script: samples.iter().map(|sample| Ok(*sample)).collect(),
            ..Self::default()
        }
    }

    pub fn from_script(script: &[Result<Option<Point>, TouchFault>]) -> Self {
        Self {
            script: script
                .iter()
                .map(|step| match step {
                    Ok(sample) => Ok(*sample),
                    Err(TouchFault) => Err(TouchFault),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.init_fails = true;
        self
    }
}

impl TouchSource for ScriptedTouch {
    type Error = TouchFault;

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.init_fails {
            Err(TouchFault)
        } else {
            Ok(())
        }
    }

    fn poll(&mut self) -> Result<Option<Point>, Self::Error> {
        self.polls += 1;
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

/// Records requested sleeps instead of sleeping.
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub calls: usize,
    pub total_ms: u64,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ms += u64::from(ms);
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub started: Vec<(Rotation, Size)>,
    pub reports: Vec<BoundsReport>,
}

impl DiagnosticSink for RecordingSink {
    fn session_started(&mut self, rotation: Rotation, size: Size) {
        self.started.push((rotation, size));
    }

    fn bounds_updated(&mut self, report: &BoundsReport) {
        self.reports.push(*report);
    }
}
