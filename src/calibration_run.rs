//! Running an edge-swipe calibration session.
//!
//! The operator drags a stylus from just inside each display edge outwards.
//! The loop polls the touch source at a fixed interval and keeps the smallest
//! and largest value seen on each axis. Those four numbers are the calibration
//! bounds: the raw range that corresponds to the display's full width and
//! height.
//!
//! Each accepted sample is reported to a [`DiagnosticSink`] and, with
//! [`FeedbackMode::OnScreen`], shown on the display being calibrated.
//!
//! The session runs until it is stopped through a [`StopToken`] or reaches a
//! limit set in the [`CalibrationConfig`]. Stop requests are checked once per
//! iteration, before the sleep, so a poll and the bounds update it causes are
//! never split.

use crate::{
    bounds::Bounds,
    calibration::CalibrationData,
    config::{CalibrationConfig, FeedbackMode},
    diagnostics::{BoundsReport, DiagnosticSink},
    display::{resolve_orientation, RotatableDisplay},
    error::{CalibrationError, CalibrationRunError},
    mapping::map_to_screen,
    rotation::Rotation,
    scene::CalibrationScene,
    touch::{Rejection, SampleGate, TouchSource},
};
use core::{
    fmt::Debug,
    sync::atomic::{AtomicBool, Ordering},
};
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb888,
};
use embedded_hal::delay::DelayNs;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Tells a running session to stop.
pub trait StopToken {
    fn stop_requested(&self) -> bool;
}

impl StopToken for AtomicBool {
    fn stop_requested(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: StopToken + ?Sized> StopToken for &T {
    fn stop_requested(&self) -> bool {
        T::stop_requested(self)
    }
}

/// A token that never asks to stop. The session then ends only at a limit
/// from the configuration, or never.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverStop;

impl StopToken for NeverStop {
    fn stop_requested(&self) -> bool {
        false
    }
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop token asked to stop.
    Requested,
    /// `max_iterations` polls were made.
    IterationLimit,
    /// `max_samples` samples were accepted.
    SampleLimit,
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Stopped(StopReason),
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Samples are unscaled sensor units.
    Raw,
    /// Samples are already scaled to display pixels.
    Scaled,
}

/// What a session has learned so far.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationState {
    pub bounds: Bounds,
    pub rotation: Rotation,
    pub mode: SampleMode,
}

/// What one loop iteration did with the polled sample.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing touched the panel, or the touch source failed.
    Absent,
    Rejected(Rejection),
    Accepted(BoundsReport),
}

/// The outcome of a stopped session.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationResult {
    pub rotation: Rotation,
    /// Display size under `rotation`.
    pub size: Size,
    pub bounds: Bounds,
    pub accepted_samples: u32,
    pub iterations: u32,
    pub stop_reason: StopReason,
}

impl CalibrationResult {
    /// Calibration data mapping the measured bounds onto the display.
    pub fn calibration_data(&self) -> Result<CalibrationData, CalibrationError> {
        self.bounds.calibration_data(self.size)
    }
}

/// The calibration loop, one iteration at a time.
///
/// [`run_calibration()`] drives it with a blocking delay. Driving it directly
/// allows other schedulers, such as the async runner in the `embassy` module.
#[derive(Debug)]
pub struct Calibrator {
    config: CalibrationConfig,
    state: CalibrationState,
    size: Size,
    gate: SampleGate,
    scene: Option<CalibrationScene>,
    phase: Phase,
    iterations: u32,
    accepted: u32,
}

impl Calibrator {
    /// Prepares a session: applies the rotation, initializes the touch source,
    /// seeds the bounds and draws the feedback scene.
    pub fn start<D, T, S>(
        display: &mut D,
        touch: &mut T,
        sink: &mut S,
        config: CalibrationConfig,
    ) -> Result<Self, CalibrationRunError<T::Error, D::Error>>
    where
        D: RotatableDisplay,
        D::Color: From<Rgb888>,
        T: TouchSource,
        S: DiagnosticSink,
    {
        let (rotation, size) = resolve_orientation(display, config.rotation)
            .map_err(CalibrationRunError::DrawTarget)?;
        touch.init().map_err(CalibrationRunError::Touch)?;

        // The seed is never reported as a sample; it only keeps an untouched
        // axis from collapsing onto a meaningless extreme.
        let (mode, seed) = if config.raw_mode {
            (SampleMode::Raw, Point::new_equal(config.raw_midpoint()))
        } else {
            (
                SampleMode::Scaled,
                Point::new(size.width as i32 / 2, size.height as i32 / 2),
            )
        };

        let mut scene = match config.feedback {
            FeedbackMode::OnScreen => Some(CalibrationScene::new(size, rotation, &config)),
            FeedbackMode::None => None,
        };
        if let Some(scene) = scene.as_mut() {
            scene.draw(display).map_err(CalibrationRunError::DrawTarget)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "calibration started: rotation {} size {}x{} seed {}",
            rotation,
            size.width,
            size.height,
            seed
        );
        #[cfg(feature = "log")]
        log::info!(
            "calibration started: rotation {} size {}x{} seed {:?}",
            rotation,
            size.width,
            size.height,
            seed
        );

        sink.session_started(rotation, size);

        Ok(Self {
            gate: SampleGate::new(&config, rotation, size),
            config,
            state: CalibrationState {
                bounds: Bounds::seeded(seed),
                rotation,
                mode,
            },
            size,
            scene,
            phase: Phase::Running,
            iterations: 0,
            accepted: 0,
        })
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Display size under the session's rotation.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn scene(&self) -> Option<&CalibrationScene> {
        self.scene.as_ref()
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.config.poll_interval_ms
    }

    /// Stops the session. Has no effect once stopped.
    pub fn stop(&mut self, reason: StopReason) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Stopped(reason);

        #[cfg(feature = "defmt")]
        defmt::info!("calibration stopped: {}", reason);
        #[cfg(feature = "log")]
        log::info!("calibration stopped: {:?}", reason);
    }

    /// Decides whether another iteration runs. Call once per iteration, before
    /// sleeping.
    pub fn should_continue<ST: StopToken + ?Sized>(&mut self, stop: &ST) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let reached = |limit: Option<u32>, count: u32| limit.is_some_and(|limit| count >= limit);
        if stop.stop_requested() {
            self.stop(StopReason::Requested);
        } else if reached(self.config.max_iterations, self.iterations) {
            self.stop(StopReason::IterationLimit);
        } else if reached(self.config.max_samples, self.accepted) {
            self.stop(StopReason::SampleLimit);
        }
        self.phase == Phase::Running
    }

    /// Folds one poll result into the session.
    ///
    /// A failed poll counts as no touch. Only display errors are returned.
    pub fn process<D, E, S>(
        &mut self,
        display: &mut D,
        sink: &mut S,
        polled: Result<Option<Point>, E>,
    ) -> Result<StepOutcome, D::Error>
    where
        D: RotatableDisplay,
        D::Color: From<Rgb888>,
        E: Debug,
        S: DiagnosticSink,
    {
        self.iterations = self.iterations.saturating_add(1);

        let sample = match polled {
            Ok(Some(sample)) => sample,
            Ok(None) => return Ok(StepOutcome::Absent),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("touch poll failed: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "log")]
                log::debug!("touch poll failed: {:?}", _e);
                return Ok(StepOutcome::Absent);
            }
        };

        let sample = match self.gate.admit(sample) {
            Ok(sample) => sample,
            Err(rejection) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("sample {} rejected: {}", sample, rejection);
                #[cfg(feature = "log")]
                log::trace!("sample {:?} rejected: {:?}", sample, rejection);
                return Ok(StepOutcome::Rejected(rejection));
            }
        };

        self.state.bounds.include(sample);
        self.accepted = self.accepted.saturating_add(1);
        let bounds = self.state.bounds;

        if let Some(scene) = self.scene.as_mut() {
            if self.config.shows_cursor() {
                scene.move_cursor(display, map_to_screen(sample, &bounds, self.size))?;
            }
            scene.show_bounds(display, &bounds)?;
        }

        let report = BoundsReport {
            rotation: self.state.rotation,
            bounds,
        };
        sink.bounds_updated(&report);
        Ok(StepOutcome::Accepted(report))
    }

    pub fn finish(self) -> CalibrationResult {
        CalibrationResult {
            rotation: self.state.rotation,
            size: self.size,
            bounds: self.state.bounds,
            accepted_samples: self.accepted,
            iterations: self.iterations,
            stop_reason: match self.phase {
                Phase::Stopped(reason) => reason,
                Phase::Running => StopReason::Requested,
            },
        }
    }
}

/// Runs a touch screen calibration session until `stop` asks it to stop or a
/// limit in `config` is reached.
///
/// Every iteration sleeps for `config.poll_interval_ms`, polls `touch` once
/// and, if the sample passes the gate, widens the bounds and reports them.
/// The final report equals the returned [`CalibrationResult::bounds`].
///
/// With [`NeverStop`] and no limits, this does not return unless the display
/// fails.
pub fn run_calibration<D, T, DELAY, S, ST>(
    display: &mut D,
    touch: &mut T,
    delay: &mut DELAY,
    sink: &mut S,
    config: CalibrationConfig,
    stop: &ST,
) -> Result<CalibrationResult, CalibrationRunError<T::Error, D::Error>>
where
    D: RotatableDisplay,
    D::Color: From<Rgb888>,
    T: TouchSource,
    DELAY: DelayNs,
    S: DiagnosticSink,
    ST: StopToken + ?Sized,
{
    let mut calibrator = Calibrator::start(display, touch, sink, config)?;
    let interval = calibrator.poll_interval_ms();

    while calibrator.should_continue(stop) {
        delay.delay_ms(interval);
        let polled = touch.poll();
        calibrator
            .process(display, sink, polled)
            .map_err(CalibrationRunError::DrawTarget)?;
    }

    Ok(calibrator.finish())
}
