//! Async calibration runner for embassy executors.
//!
//! Identical to [`run_calibration`](crate::run_calibration) except that the
//! poll interval is awaited and the session is stopped through a [`Signal`].
//! A stop signalled during the sleep ends the session without another poll.

use crate::{
    calibration_run::{CalibrationResult, Calibrator, StopReason, StopToken},
    config::CalibrationConfig,
    diagnostics::DiagnosticSink,
    display::RotatableDisplay,
    error::CalibrationRunError,
    touch::TouchSource,
};
use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_hal_async::delay::DelayNs;

/// A signalled value asks the session to stop. The value is not consumed by
/// the check made before each sleep.
impl<M: RawMutex, T: Send> StopToken for Signal<M, T> {
    fn stop_requested(&self) -> bool {
        self.signaled()
    }
}

pub async fn run_calibration_async<M, D, T, DELAY, S>(
    display: &mut D,
    touch: &mut T,
    delay: &mut DELAY,
    sink: &mut S,
    config: CalibrationConfig,
    stop: &Signal<M, ()>,
) -> Result<CalibrationResult, CalibrationRunError<T::Error, D::Error>>
where
    M: RawMutex,
    D: RotatableDisplay,
    D::Color: From<Rgb888>,
    T: TouchSource,
    DELAY: DelayNs,
    S: DiagnosticSink,
{
    let mut calibrator = Calibrator::start(display, touch, sink, config)?;
    let interval = calibrator.poll_interval_ms();

    while calibrator.should_continue(stop) {
        if let Either::Second(()) = select(delay.delay_ms(interval), stop.wait()).await {
            calibrator.stop(StopReason::Requested);
            break;
        }

        let polled = touch.poll();
        calibrator
            .process(display, sink, polled)
            .map_err(CalibrationRunError::DrawTarget)?;
    }

    Ok(calibrator.finish())
}
