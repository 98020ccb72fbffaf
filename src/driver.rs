//! XPT2046 resistive touch controller as a raw [`TouchSource`].
//!
//! The XPT2046 is an ADC that measures the voltage across a resistive touch
//! panel. The driver measures the X-Position and Y-Position channels using a
//! differential reference at 12-bit precision, leaving PENIRQ enabled so that
//! the controller's PENIRQ output tells whether the panel is touched.
//!
//! Samples are returned in raw converter units (`0..=4095`), which is what the
//! calibration loop needs. Information on the controller can be found in the
//! XPT2046 data sheet
//! (<https://www.snapeda.com/parts/XPT2046/Xptek/datasheet/>).

use crate::touch::TouchSource;
use embedded_graphics::geometry::Point;
use embedded_hal::{digital::InputPin, spi::SpiDevice};

#[cfg(feature = "defmt")]
use defmt::Format;

// The Control Byte is, MSB first: the start bit, three channel select bits,
// the 12-bit/8-bit MODE bit, the SER/DFR bit, and the two power-down bits PD1
// (internal reference) and PD0 (PENIRQ disable).
//
// A measurement starts 9 clocks after the start bit and takes 12 clocks. With
// a byte-aligned Control Byte, the result would straddle the received bytes
// misaligned by three bits. Sending the Control Byte three bits late aligns the
// result with the received bytes instead. Consecutive Control Bytes can overlap
// the previous result, so an X,Y pair fits in five bytes.
mod control_byte {
    const START: u8 = 0b1 << 7;
    const X_POSITION: u8 = 0b001 << 4;
    const Y_POSITION: u8 = 0b101 << 4;
    // MODE = 0 (12-bit), SER/DFR = 0 (differential), PD1 = 0 (internal
    // reference off), PD0 = 0 (PENIRQ enabled).
    const DIFFERENTIAL_12BIT_PENIRQ: u8 = 0b0000;

    const fn delayed(channel: u8) -> [u8; 2] {
        (((START | channel | DIFFERENTIAL_12BIT_PENIRQ) as u16) << 5).to_be_bytes()
    }

    const X: [u8; 2] = delayed(X_POSITION);
    const Y: [u8; 2] = delayed(Y_POSITION);

    pub const READ_XY_LEN: usize = 5;
    pub const READ_XY: [u8; READ_XY_LEN] = [X[0], X[1], Y[0], Y[1], 0];
}

/// Number of X,Y measurements averaged into one sample by default.
pub const DEFAULT_OVERSAMPLING: u8 = 16;

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum Error<SpiError, IrqError> {
    /// SPI error
    Spi(SpiError),
    /// IRQ error
    Irq(IrqError),
}

/// The XPT2046 driver.
///
/// `irq` is the controller's PENIRQ output, which is low while the panel is
/// touched.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub struct Xpt2046<Spi, Irq> {
    spi: Spi,
    irq: Irq,
    oversampling: u8,
}

impl<Spi, SpiError, Irq, IrqError> Xpt2046<Spi, Irq>
where
    Spi: SpiDevice<u8, Error = SpiError>,
    SpiError: embedded_hal::spi::Error,
    Irq: InputPin<Error = IrqError>,
    IrqError: embedded_hal::digital::Error,
{
    pub fn new(spi: Spi, irq: Irq) -> Self {
        Self {
            spi,
            irq,
            oversampling: DEFAULT_OVERSAMPLING,
        }
    }

    /// Sets how many measurements are averaged into each sample. Zero is
    /// treated as one.
    pub fn with_oversampling(mut self, oversampling: u8) -> Self {
        self.oversampling = oversampling.max(1);
        self
    }

    /// Releases the SPI device and PENIRQ pin.
    pub fn release(self) -> (Spi, Irq) {
        (self.spi, self.irq)
    }

    /// Returns whether PENIRQ reports a touch.
    pub fn penirq_is_active(&mut self) -> Result<bool, Error<SpiError, IrqError>> {
        self.irq.is_low().map_err(Error::Irq)
    }

    /// Returns the measurements of X-Position and Y-Position as the tuple
    /// (X-Position,Y-Position).
    pub fn measure_xy_positions(&mut self) -> Result<(u16, u16), SpiError> {
        let mut rx_buf = [0; control_byte::READ_XY_LEN];
        self.spi.transfer(&mut rx_buf, &control_byte::READ_XY)?;
        let x = u16::from_be_bytes([rx_buf[1], rx_buf[2]]);
        let y = u16::from_be_bytes([rx_buf[3], rx_buf[4]]);
        Ok((x, y))
    }
}

impl<Spi, SpiError, Irq, IrqError> TouchSource for Xpt2046<Spi, Irq>
where
    Spi: SpiDevice<u8, Error = SpiError>,
    SpiError: embedded_hal::spi::Error,
    Irq: InputPin<Error = IrqError>,
    IrqError: embedded_hal::digital::Error,
{
    type Error = Error<SpiError, IrqError>;

    /// Makes a throwaway measurement so that the power-down bits leave the
    /// internal reference off and PENIRQ enabled.
    fn init(&mut self) -> Result<(), Self::Error> {
        _ = self.measure_xy_positions().map_err(Error::Spi)?;
        Ok(())
    }

    /// Averages a burst of measurements while PENIRQ is active. A burst that
    /// the pen leaves before it completes is discarded, since its tail was
    /// measured on an open panel.
    fn poll(&mut self) -> Result<Option<Point>, Self::Error> {
        if !self.penirq_is_active()? {
            return Ok(None);
        }

        let mut sum_x = 0_i32;
        let mut sum_y = 0_i32;
        for _ in 0..self.oversampling {
            let (x, y) = self.measure_xy_positions().map_err(Error::Spi)?;
            sum_x += i32::from(x);
            sum_y += i32::from(y);
        }

        if !self.penirq_is_active()? {
            return Ok(None);
        }

        let n = i32::from(self.oversampling);
        Ok(Some(Point::new(sum_x / n, sum_y / n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::{
        digital::ErrorType as PinErrorType,
        spi::{ErrorType as SpiErrorType, Operation},
    };
    use std::collections::VecDeque;

    /// Answers every X,Y transfer with the next queued reading.
    #[derive(Default)]
    struct FakeSpi {
        readings: VecDeque<(u16, u16)>,
        sent: Vec<Vec<u8>>,
    }

    impl SpiErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiDevice<u8> for FakeSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for operation in operations {
                if let Operation::Transfer(read, write) = operation {
                    self.sent.push(write.to_vec());
                    let (x, y) = self.readings.pop_front().unwrap_or((0, 0));
                    let x = x.to_be_bytes();
                    let y = y.to_be_bytes();
                    read.copy_from_slice(&[0, x[0], x[1], y[0], y[1]]);
                }
            }
            Ok(())
        }
    }

    /// PENIRQ levels, one per read, repeating the last when exhausted.
    struct FakeIrq {
        low: VecDeque<bool>,
    }

    impl FakeIrq {
        fn new(low: &[bool]) -> Self {
            Self {
                low: low.iter().copied().collect(),
            }
        }

        fn next(&mut self) -> bool {
            if self.low.len() > 1 {
                self.low.pop_front().unwrap_or(false)
            } else {
                self.low.front().copied().unwrap_or(false)
            }
        }
    }

    impl PinErrorType for FakeIrq {
        type Error = Infallible;
    }

    impl InputPin for FakeIrq {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.next())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.next())
        }
    }

    fn driver(readings: &[(u16, u16)], low: &[bool]) -> Xpt2046<FakeSpi, FakeIrq> {
        let spi = FakeSpi {
            readings: readings.iter().copied().collect(),
            sent: Vec::new(),
        };
        Xpt2046::new(spi, FakeIrq::new(low))
    }

    #[test]
    fn control_bytes_are_delayed_three_bits() {
        // 0b1_001_0000 and 0b1_101_0000 shifted left by five.
        assert_eq!(control_byte::READ_XY, [0x12, 0x00, 0x1A, 0x00, 0x00]);
    }

    #[test]
    fn no_touch_without_penirq() {
        let mut touch = driver(&[(1000, 1000)], &[false]);
        assert_eq!(touch.poll().unwrap(), None);
        let (spi, _) = touch.release();
        assert!(spi.sent.is_empty());
    }

    #[test]
    fn averages_a_burst() {
        let readings = [(1000, 3000), (1002, 3004), (998, 2996), (1000, 3000)];
        let mut touch = driver(&readings, &[true]).with_oversampling(4);
        assert_eq!(touch.poll().unwrap(), Some(Point::new(1000, 3000)));
        let (spi, _) = touch.release();
        assert_eq!(spi.sent.len(), 4);
        assert!(spi.sent.iter().all(|tx| tx.as_slice() == control_byte::READ_XY));
    }

    #[test]
    fn lifted_pen_discards_burst() {
        let mut touch = driver(&[(1000, 3000), (40, 4095)], &[true, false]).with_oversampling(2);
        assert_eq!(touch.poll().unwrap(), None);
    }

    #[test]
    fn init_makes_a_throwaway_measurement() {
        let mut touch = driver(&[], &[false]);
        touch.init().unwrap();
        let (spi, _) = touch.release();
        assert_eq!(spi.sent.len(), 1);
    }
}
