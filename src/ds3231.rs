// Copyright (c) 2025 the ds3231-rtc project developers
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Interface for the DS3231 real-time clock.
//!
//! ## Register map
//!
//! The timekeeping registers occupy the contiguous block 0x00–0x06
//! (seconds, minutes, hours, weekday, day of month, month, year), each a
//! packed-BCD byte except the weekday, which is a raw 1–7 value. The chip
//! auto-increments its register pointer, so the whole block is transferred
//! in a single burst; reading it in one transaction also guarantees a
//! consistent snapshot, since the chip buffers the registers at the START
//! condition.
//!
//! The status register (0x0F) carries the oscillator-stop flag in bit 7.
//! The chip sets it whenever the oscillator halts, typically because both
//! supply and battery were removed, which means the stored time can no
//! longer be trusted. [`init`] clears the flag and reports its prior state.
//!
//! The temperature registers (0x11 MSB, 0x12 LSB) hold the die temperature
//! as a big-endian two's-complement fixed-point value scaled by 1/256. Only
//! the top two bits of the LSB are significant, for a hardware resolution
//! of 0.25 °C.
//!
//! ## Bus timeouts
//!
//! The driver performs exactly one transaction attempt per operation (the
//! presence probe in [`init`] being the only exception) and returns the
//! transport's result verbatim. Timeouts and retries are the transport's
//! concern; configure them on the bus handle before constructing the
//! driver.
//!
//! [`init`]: struct.Ds3231.html#method.init

#![allow(dead_code)]

use core::error;
use core::fmt;
use core::result;

use embedded_hal::i2c::I2c;

use crate::bcd;
use crate::datetime::DateTime;

/// 7-bit I2C slave address of the DS3231, fixed for the chip family.
///
/// `embedded-hal` takes unshifted 7-bit addresses; buses that expect the
/// address pre-shifted into the upper bits of an 8-bit frame (e.g. the
/// STM32 vendor HAL) would use `0x68 << 1` for the same device.
pub const DEVICE_ADDRESS: u8 = 0x68;

// Timekeeping registers, contiguous so they can be burst-transferred
// starting at REG_SECONDS.
const REG_SECONDS: u8 = 0x00;
const REG_MINUTES: u8 = 0x01;
const REG_HOURS: u8 = 0x02;
const REG_WEEKDAY: u8 = 0x03;
const REG_DAY: u8 = 0x04;
const REG_MONTH: u8 = 0x05;
const REG_YEAR: u8 = 0x06;

const REG_CONTROL: u8 = 0x0E;
const REG_STATUS: u8 = 0x0F;
const REG_TEMP_MSB: u8 = 0x11;
const REG_TEMP_LSB: u8 = 0x12;

// Attempts made by the presence probe during init.
const PROBE_ATTEMPTS: u8 = 3;

/// Errors that can occur when accessing the DS3231.
#[derive(Debug)]
pub enum Error<E> {
    /// I2C transport error.
    ///
    /// A register transaction failed; the transport's error is passed
    /// through unchanged. Any output produced by the failed operation must
    /// be discarded.
    I2c(E),
    /// No device acknowledged the DS3231's address.
    ///
    /// The presence probe during [`init`] exhausted its attempts without an
    /// acknowledge. Check the wiring and the bus configuration.
    ///
    /// [`init`]: struct.Ds3231.html#method.init
    DeviceNotFound,
    /// A [`DateTime`] field is outside the range its register can represent.
    ///
    /// The chip stores the year as a two-digit offset from 2000 and only
    /// 24-hour mode is supported, so years outside 2000–2099 or hours above
    /// 23 are rejected before anything is put on the wire, as are
    /// out-of-range values in the remaining fields.
    ///
    /// [`DateTime`]: ../datetime/struct.DateTime.html
    InvalidDateTime,
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::I2c(ref err) => write!(f, "I2C transport error: {}", err),
            Error::DeviceNotFound => write!(f, "No DS3231 found on the bus"),
            Error::InvalidDateTime => write!(f, "Date/time not representable by the DS3231"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> error::Error for Error<E> {}

/// Result type returned from methods that can have `ds3231::Error`s.
pub type Result<T, E> = result::Result<T, Error<E>>;

/// Prior state of the oscillator-stop flag, reported by [`init`].
///
/// [`init`]: struct.Ds3231.html#method.init
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PowerLoss {
    /// The oscillator kept running since the flag was last cleared; the
    /// stored time is as accurate as it was left.
    None,
    /// The oscillator stopped at some point, typically because the chip
    /// lost both supply and battery power. The stored time is stale and
    /// should be set again.
    Detected,
}

/// Contents of the status register (0x0F).
///
/// `Status` wraps the raw byte and exposes the documented bits as named
/// accessors.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Status {
    bits: u8,
}

const STATUS_OSF: u8 = 0x80;
const STATUS_EN32KHZ: u8 = 0x08;
const STATUS_BSY: u8 = 0x04;
const STATUS_A2F: u8 = 0x02;
const STATUS_A1F: u8 = 0x01;

impl Status {
    fn new(bits: u8) -> Status {
        Status { bits }
    }

    /// Returns the raw register byte.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns `true` if the oscillator has stopped since the flag was last
    /// cleared, indicating the stored time may be stale.
    pub fn oscillator_stop(&self) -> bool {
        (self.bits & STATUS_OSF) > 0
    }

    /// Returns `true` if the 32 kHz output is enabled.
    pub fn output_32khz(&self) -> bool {
        (self.bits & STATUS_EN32KHZ) > 0
    }

    /// Returns `true` while a temperature conversion is executing.
    pub fn busy(&self) -> bool {
        (self.bits & STATUS_BSY) > 0
    }

    /// Returns `true` if alarm 2 has triggered.
    pub fn alarm2(&self) -> bool {
        (self.bits & STATUS_A2F) > 0
    }

    /// Returns `true` if alarm 1 has triggered.
    pub fn alarm1(&self) -> bool {
        (self.bits & STATUS_A1F) > 0
    }

    // Clearing only touches bit 7; the alarm flags are left for whoever
    // configured the alarms.
    fn clear_oscillator_stop(self) -> Status {
        Status {
            bits: self.bits & !STATUS_OSF,
        }
    }
}

/// Provides access to a DS3231 connected to an I2C bus.
///
/// `Ds3231` owns the bus handle it's given and addresses the chip at
/// [`DEVICE_ADDRESS`]. Construction performs no bus traffic; call [`init`]
/// to verify the device is present and to clear the oscillator-stop flag
/// before relying on the stored time.
///
/// [`DEVICE_ADDRESS`]: constant.DEVICE_ADDRESS.html
/// [`init`]: #method.init
#[derive(Debug)]
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Constructs a new `Ds3231`, taking ownership of the bus handle.
    pub fn new(i2c: I2C) -> Ds3231<I2C> {
        Ds3231 {
            i2c,
            address: DEVICE_ADDRESS,
        }
    }

    /// Probes the device and clears the oscillator-stop flag.
    ///
    /// The probe issues an address-only transaction and considers the
    /// device present as soon as it acknowledges, retrying up to 3 times
    /// before failing with [`Error::DeviceNotFound`]. No register is
    /// accessed unless the probe succeeds.
    ///
    /// If the status register has the oscillator-stop flag set, it's
    /// written back with the flag cleared and all other bits preserved.
    /// The flag's prior state is returned: [`PowerLoss::Detected`] means
    /// the oscillator halted at some point and the stored time should be
    /// set again before it's trusted. Clearing is idempotent and doesn't
    /// itself correct the time.
    ///
    /// [`Error::DeviceNotFound`]: enum.Error.html#variant.DeviceNotFound
    /// [`PowerLoss::Detected`]: enum.PowerLoss.html#variant.Detected
    pub fn init(&mut self) -> Result<PowerLoss, I2C::Error> {
        if !self.probe() {
            return Err(Error::DeviceNotFound);
        }

        let status = self.status()?;
        if status.oscillator_stop() {
            self.write_register(REG_STATUS, status.clear_oscillator_stop().bits())?;

            return Ok(PowerLoss::Detected);
        }

        Ok(PowerLoss::None)
    }

    /// Reads the timekeeping registers and decodes them.
    ///
    /// The seven registers are read in a single burst, which the chip
    /// serves as a consistent snapshot. Mode and control bits sharing the
    /// registers are masked away before BCD decoding; the weekday is taken
    /// verbatim. On error the transport's failure is returned and no
    /// `DateTime` is produced.
    ///
    /// Sequence: START → Address + Write Bit → Register 0x00 →
    /// Repeated START → Address + Read Bit → 7 Incoming Bytes → STOP
    pub fn datetime(&mut self) -> Result<DateTime, I2C::Error> {
        let mut data = [0u8; 7];

        self.i2c
            .write_read(self.address, &[REG_SECONDS], &mut data)
            .map_err(Error::I2c)?;

        Ok(DateTime {
            seconds: bcd::decode(data[0] & 0x7F),
            minutes: bcd::decode(data[1] & 0x7F),
            // Masking bits 6-7 drops the 12/24-hour mode selection; the
            // remaining bits only decode correctly in 24-hour mode.
            hours: bcd::decode(data[2] & 0x3F),
            weekday: data[3] & 0x07,
            day: bcd::decode(data[4] & 0x3F),
            // Bit 7 is the century flag, which can't be represented.
            month: bcd::decode(data[5] & 0x1F),
            year: 2000 + u16::from(bcd::decode(data[6])),
        })
    }

    /// Encodes `datetime` and writes the timekeeping registers.
    ///
    /// Fields outside the ranges their registers can represent are rejected
    /// with [`Error::InvalidDateTime`] before any bus traffic; see
    /// [`DateTime`] for the valid ranges. The seven registers are written
    /// in a single burst starting at 0x00, relying on the chip's
    /// auto-increment addressing.
    ///
    /// Sequence: START → Address + Write Bit → Register 0x00 →
    /// 7 Outgoing Bytes → STOP
    ///
    /// [`Error::InvalidDateTime`]: enum.Error.html#variant.InvalidDateTime
    /// [`DateTime`]: ../datetime/struct.DateTime.html
    pub fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), I2C::Error> {
        if !datetime.is_representable() {
            return Err(Error::InvalidDateTime);
        }

        let buffer = [
            REG_SECONDS,
            bcd::encode(datetime.seconds),
            bcd::encode(datetime.minutes),
            bcd::encode(datetime.hours),
            // The chip expects the weekday as a raw 1-7 value, not BCD.
            datetime.weekday,
            bcd::encode(datetime.day),
            bcd::encode(datetime.month),
            bcd::encode((datetime.year - 2000) as u8),
        ];

        self.i2c.write(self.address, &buffer).map_err(Error::I2c)
    }

    /// Reads the die temperature in degrees Celsius.
    ///
    /// The two temperature registers form a big-endian two's-complement
    /// value scaled by 1/256. The conversion is exact, but only the top two
    /// bits of the LSB are significant, so the hardware resolution is
    /// 0.25 °C.
    ///
    /// Sequence: START → Address + Write Bit → Register 0x11 →
    /// Repeated START → Address + Read Bit → Incoming Byte MSB →
    /// Incoming Byte LSB → STOP
    pub fn temperature(&mut self) -> Result<f32, I2C::Error> {
        let mut data = [0u8; 2];

        self.i2c
            .write_read(self.address, &[REG_TEMP_MSB], &mut data)
            .map_err(Error::I2c)?;

        Ok(f32::from(i16::from_be_bytes(data)) / 256.0)
    }

    /// Reads the status register.
    pub fn status(&mut self) -> Result<Status, I2C::Error> {
        Ok(Status::new(self.read_register(REG_STATUS)?))
    }

    /// Consumes the driver and returns the bus handle.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // Address-only transaction; an acknowledge on any attempt counts as
    // present. Retry pacing is left to the transport's timeout.
    fn probe(&mut self) -> bool {
        (0..PROBE_ATTEMPTS).any(|_| self.i2c.write(self.address, &[]).is_ok())
    }

    fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut data = [0u8; 1];

        self.i2c
            .write_read(self.address, &[register], &mut data)
            .map_err(Error::I2c)?;

        Ok(data[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::I2c)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    use super::*;

    // Sec=30, Min=45, Hour=12, Weekday=3, Day=15, Month=6, Year=24
    const RAW_DATETIME: [u8; 7] = [0x30, 0x45, 0x12, 0x03, 0x15, 0x06, 0x24];

    fn decoded_datetime() -> DateTime {
        DateTime {
            seconds: 30,
            minutes: 45,
            hours: 12,
            weekday: 3,
            day: 15,
            month: 6,
            year: 2024,
        }
    }

    fn probe_ok() -> I2cTrans {
        I2cTrans::write(DEVICE_ADDRESS, vec![])
    }

    fn probe_nak() -> I2cTrans {
        I2cTrans::write(DEVICE_ADDRESS, vec![]).with_error(ErrorKind::Other)
    }

    #[test]
    fn new_performs_no_bus_traffic() {
        let rtc = Ds3231::new(I2cMock::new(&[]));
        rtc.release().done();
    }

    #[test]
    fn init_fails_after_three_probe_attempts() {
        // No register access may follow a failed probe.
        let mock = I2cMock::new(&[probe_nak(), probe_nak(), probe_nak()]);

        let mut rtc = Ds3231::new(mock);
        assert!(matches!(rtc.init(), Err(Error::DeviceNotFound)));

        rtc.release().done();
    }

    #[test]
    fn init_probe_retries_until_acknowledge() {
        let mock = I2cMock::new(&[
            probe_nak(),
            probe_ok(),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![REG_STATUS], vec![0x00]),
        ]);

        let mut rtc = Ds3231::new(mock);
        assert!(matches!(rtc.init(), Ok(PowerLoss::None)));

        rtc.release().done();
    }

    #[test]
    fn init_clears_oscillator_stop_preserving_other_bits() {
        let mock = I2cMock::new(&[
            probe_ok(),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![REG_STATUS], vec![0x88]),
            I2cTrans::write(DEVICE_ADDRESS, vec![REG_STATUS, 0x08]),
        ]);

        let mut rtc = Ds3231::new(mock);
        assert!(matches!(rtc.init(), Ok(PowerLoss::Detected)));

        rtc.release().done();
    }

    #[test]
    fn init_skips_write_back_when_flag_is_clear() {
        let mock = I2cMock::new(&[
            probe_ok(),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![REG_STATUS], vec![0x0B]),
        ]);

        let mut rtc = Ds3231::new(mock);
        assert!(matches!(rtc.init(), Ok(PowerLoss::None)));

        rtc.release().done();
    }

    #[test]
    fn datetime_decodes_registers() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_SECONDS],
            RAW_DATETIME.to_vec(),
        )]);

        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.datetime().unwrap(), decoded_datetime());

        rtc.release().done();
    }

    #[test]
    fn datetime_masks_mode_and_control_bits() {
        // High bits set on every register: unused bit in seconds, 12-hour
        // mode bits in hours, century flag in month.
        let raw = [0xB0, 0xC5, 0x52, 0xFB, 0x55, 0xA6, 0x24];
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_SECONDS],
            raw.to_vec(),
        )]);

        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.datetime().unwrap(), decoded_datetime());

        rtc.release().done();
    }

    #[test]
    fn datetime_propagates_transport_errors() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_SECONDS],
            vec![0u8; 7],
        )
        .with_error(ErrorKind::Other)]);

        let mut rtc = Ds3231::new(mock);
        assert!(matches!(rtc.datetime(), Err(Error::I2c(_))));

        rtc.release().done();
    }

    #[test]
    fn set_datetime_encodes_registers() {
        let mut expected = vec![REG_SECONDS];
        expected.extend_from_slice(&RAW_DATETIME);

        let mock = I2cMock::new(&[I2cTrans::write(DEVICE_ADDRESS, expected)]);

        let mut rtc = Ds3231::new(mock);
        rtc.set_datetime(&decoded_datetime()).unwrap();

        rtc.release().done();
    }

    #[test]
    fn set_datetime_rejects_out_of_range_fields() {
        // Rejection happens before any bus traffic.
        let mut rtc = Ds3231::new(I2cMock::new(&[]));

        let cases = [
            DateTime { year: 1999, ..decoded_datetime() },
            DateTime { year: 2100, ..decoded_datetime() },
            DateTime { hours: 24, ..decoded_datetime() },
            DateTime { seconds: 60, ..decoded_datetime() },
            DateTime { weekday: 0, ..decoded_datetime() },
            DateTime { month: 13, ..decoded_datetime() },
        ];

        for datetime in &cases {
            assert!(matches!(
                rtc.set_datetime(datetime),
                Err(Error::InvalidDateTime)
            ));
        }

        rtc.release().done();
    }

    #[test]
    fn temperature_decodes_fixed_point() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_TEMP_MSB],
            vec![0x19, 0x40],
        )]);

        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.temperature().unwrap(), 25.25);

        rtc.release().done();
    }

    #[test]
    fn temperature_decodes_negative_values() {
        // 0xFF00 = -256 as two's complement, -1.0 °C after scaling.
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_TEMP_MSB],
            vec![0xFF, 0x00],
        )]);

        let mut rtc = Ds3231::new(mock);
        assert_eq!(rtc.temperature().unwrap(), -1.0);

        rtc.release().done();
    }

    #[test]
    fn status_reports_named_bits() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![REG_STATUS],
            vec![0x8D],
        )]);

        let mut rtc = Ds3231::new(mock);
        let status = rtc.status().unwrap();

        assert!(status.oscillator_stop());
        assert!(status.output_32khz());
        assert!(status.busy());
        assert!(status.alarm1());
        assert!(!status.alarm2());
        assert_eq!(status.bits(), 0x8D);

        rtc.release().done();
    }
}
