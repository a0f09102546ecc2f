//! Platform-agnostic driver for the DS3231 real-time clock.
//!
//! The DS3231 is a battery-backed I2C RTC with an integrated
//! temperature-compensated crystal oscillator. This crate talks to it through
//! the `embedded-hal` blocking I2C traits, so it works with any bus
//! implementation that provides them, on Linux and bare-metal targets alike.
//!
//! The driver covers the timekeeping registers (seconds through year), the
//! oscillator-stop flag in the status register, and the on-die temperature
//! sensor. Alarms, the square-wave output and the aging offset aren't
//! configured by this crate. The chip is assumed to run in 24-hour mode.
//!
//! Access to the bus is blocking and exclusive: every transaction borrows the
//! driver mutably, and the driver owns its transport until [`release`] hands
//! it back. Callers invoking the driver from multiple threads must serialize
//! access to the underlying bus themselves.
//!
//! [`release`]: ds3231/struct.Ds3231.html#method.release

#![no_std]
// Used by rustdoc to link other crates to ds3231-rtc's docs
#![doc(html_root_url = "https://docs.rs/ds3231-rtc/0.1.0")]

pub mod bcd;
pub mod datetime;
pub mod ds3231;
