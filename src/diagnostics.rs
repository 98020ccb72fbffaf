//! Line-oriented diagnostic output of a calibration session.
//!
//! Every accepted sample produces one report carrying the rotation and the
//! bounds tuple. The last report of a session holds the calibration values to
//! transcribe into the touch source's configuration.

use crate::{bounds::Bounds, rotation::Rotation};
use core::fmt;
use embedded_graphics::geometry::Size;

#[cfg(feature = "defmt")]
use defmt::Format;

const BANNER: [&str; 3] = [
    "Touchscreen Calibrator",
    "  Use a stylus to swipe to the four sides",
    "  of the visible display area.",
];

/// The state of a session after a sample was accepted.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsReport {
    pub rotation: Rotation,
    pub bounds: Bounds,
}

impl fmt::Display for BoundsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotation: {}  calib: {}", self.rotation, self.bounds)
    }
}

/// Receives the diagnostic output of a calibration session.
pub trait DiagnosticSink {
    /// Called once before the first poll.
    fn session_started(&mut self, _rotation: Rotation, _size: Size) {}

    /// Called after every accepted sample.
    fn bounds_updated(&mut self, report: &BoundsReport);
}

/// Discards all output.
impl DiagnosticSink for () {
    fn bounds_updated(&mut self, _report: &BoundsReport) {}
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn session_started(&mut self, rotation: Rotation, size: Size) {
        T::session_started(self, rotation, size)
    }

    fn bounds_updated(&mut self, report: &BoundsReport) {
        T::bounds_updated(self, report)
    }
}

/// Writes one line per event to a [`fmt::Write`], such as a serial console
/// or a `heapless::String`.
///
/// Write errors are ignored; a full buffer or a disconnected console must not
/// stop the session.
#[derive(Debug, Default)]
pub struct FmtSink<W> {
    writer: W,
}

impl<W: fmt::Write> FmtSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: fmt::Write> DiagnosticSink for FmtSink<W> {
    fn session_started(&mut self, rotation: Rotation, size: Size) {
        for line in BANNER {
            let _ = writeln!(self.writer, "{}", line);
        }
        let _ = writeln!(self.writer);
        let _ = writeln!(self.writer, "  rotation: {}", rotation);
        let _ = writeln!(self.writer, "  display: {}x{}", size.width, size.height);
        let _ = writeln!(self.writer, "  Calibration values follow:");
        let _ = writeln!(self.writer);
    }

    fn bounds_updated(&mut self, report: &BoundsReport) {
        let _ = writeln!(self.writer, "{}", report);
    }
}

/// Reports through the `log` facade at info level.
#[cfg(feature = "log")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[cfg(feature = "log")]
impl DiagnosticSink for LogSink {
    fn session_started(&mut self, rotation: Rotation, size: Size) {
        for line in BANNER {
            log::info!("{}", line);
        }
        log::info!("rotation: {} display: {}x{}", rotation, size.width, size.height);
    }

    fn bounds_updated(&mut self, report: &BoundsReport) {
        log::info!("{}", report);
    }
}

/// Prints through `defmt::println!`.
#[cfg(feature = "defmt")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn session_started(&mut self, rotation: Rotation, size: Size) {
        for line in BANNER {
            defmt::println!("{=str}", line);
        }
        defmt::println!(
            "rotation: {} display: {}x{}",
            rotation.degrees(),
            size.width,
            size.height
        );
    }

    fn bounds_updated(&mut self, report: &BoundsReport) {
        defmt::println!("{}", defmt::Display2Format(report));
    }
}
