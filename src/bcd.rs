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

//! Packed binary-coded decimal conversions.
//!
//! The DS3231 stores every timekeeping field except the weekday as packed
//! BCD: the high nibble holds the tens digit, the low nibble the ones digit.

/// Converts a decimal value to its packed BCD representation.
///
/// `encode` is only defined for values in the range 0–99. Larger values
/// overflow the tens nibble and produce a byte the chip won't interpret as
/// the caller intended; the driver validates its inputs before encoding.
pub fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Converts a packed BCD byte to its decimal value.
///
/// `decode` assumes both nibbles are in the range 0–9, which holds for every
/// masked register byte the DS3231 returns. Malformed nibbles (0xA–0xF)
/// aren't rejected and yield an out-of-range decimal value.
pub fn decode(value: u8) -> u8 {
    ((value >> 4) * 10) + (value & 0x0F)
}
