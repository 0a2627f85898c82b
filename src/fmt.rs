/*
 * // Copyright (c) Radzivon Bartoshyk 5/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

//! Exact text formats for f64 words and pairs.
//!
//! The workhorse here is the hex-binary format,
//! `0xMMMMMMMMMMMMMMxb+EEE`: fourteen hex digits of mantissa (53 bits,
//! the leading digit carrying the leftover single bit) and a base-2
//! exponent.  Every finite f64 round-trips through it exactly, which
//! is what the test harness needs to ship reference values between
//! builds.  [`parse_float`] additionally accepts the hex-hex variant
//! (`x` instead of `xb`, exponent scaled by 4), the C99 `%a` hexfloat
//! spelling, and plain decimal.

use crate::common::{HUGE_EXP, TINY_EXP, frexp_k, pow2i};
use crate::dd::DoubleDouble;
use crate::err::ParseFloatError;
use crate::triple::{Triple, floor3, ldexp10, normalize3, sloppy_prod, sloppy_recip, three_sum};
use std::fmt;

/// Formats a single f64 word in hex-binary, 23 characters wide.
pub fn format_hex_binary(value: f64) -> String {
    if !value.is_finite() {
        if value.is_nan() {
            return "NaN".to_owned();
        }
        return if value < 0.0 { "-Inf" } else { "Inf" }.to_owned();
    }

    let (m, e) = frexp_k(value);
    let mut mantissa = m;
    let mut exp = e;
    let mut out = String::with_capacity(23);
    if value.is_sign_negative() {
        out.push('-');
        mantissa = -mantissa;
    } else {
        out.push(' ');
    }
    out.push_str("0x");

    // 53 % 4 == 1, so the single leftover bit goes first
    mantissa *= 2.0;
    exp -= 1;
    for _ in 0..14 {
        let ival = mantissa.floor() as u8;
        if ival < 10 {
            out.push((b'0' + ival) as char);
        } else {
            out.push((b'A' + ival - 10) as char);
        }
        mantissa -= f64::from(ival);
        mantissa *= 16.0;
        exp -= 4;
    }
    exp += 4;

    out.push_str(&format!("xb{exp:+04}"));
    out
}

// Applies a parsed base-2 exponent, staging through exact powers of
// two so a subnormal result rounds exactly once.
fn apply_exponent(mut value: f64, mut exponent: i32) -> f64 {
    while exponent > HUGE_EXP - 1 {
        value *= pow2i(HUGE_EXP - 1);
        exponent -= HUGE_EXP - 1;
    }
    while exponent < TINY_EXP + 1 {
        value *= pow2i(TINY_EXP + 1);
        exponent -= TINY_EXP + 1;
    }
    value * pow2i(exponent)
}

// atoi: optional sign, then decimal digits, stopping at the first
// non-digit.
fn scan_int(bytes: &[u8]) -> i32 {
    let mut i = 0;
    let mut sign = 1i64;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        if bytes[i] == b'-' {
            sign = -1;
        }
        i += 1;
    }
    let mut v: i64 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        v = (v * 10 + i64::from(bytes[i] - b'0')).min(1 << 40);
        i += 1;
    }
    (sign * v).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn hex_digit(ch: u8) -> Option<u32> {
    match ch {
        b'0'..=b'9' => Some(u32::from(ch - b'0')),
        b'a'..=b'f' => Some(u32::from(ch - b'a' + 10)),
        b'A'..=b'F' => Some(u32::from(ch - b'A' + 10)),
        _ => None,
    }
}

// Hex-bin / hex-hex formats:
//
//    smmm...mmmxseee         (hex-hex, exponent base 16)
//    smmm...mmmxbseee        (hex-bin, exponent base 2)
//
// e.g. "5a0xb3" is (5*16^2 + 10*16) * 2^3 = 11520 and "120Fx-7" is
// (1*16^3 + 2*16^2 + 15) * 16^-7.
fn scan_hex_bin(input: &str) -> Result<f64, ParseFloatError> {
    let bytes = input.as_bytes();
    let bad = || ParseFloatError {
        input: input.to_owned(),
    };

    // Skip leading junk
    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        if ch == b'+' || ch == b'-' || hex_digit(ch).is_some() {
            break;
        }
        i += 1;
    }
    let mut sign = 1.0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        if bytes[i] == b'-' {
            sign = -1.0;
        }
        i += 1;
    }
    // Skip a leading "0x", if any
    if i + 1 < bytes.len() && bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
        i += 2;
    }

    let mut value: f64 = 0.0;
    let mut ndigits = 0;
    while i < bytes.len() {
        match hex_digit(bytes[i]) {
            Some(d) => {
                value = 16.0 * value + f64::from(d);
                ndigits += 1;
                i += 1;
            }
            None => break,
        }
    }
    if ndigits == 0 {
        return Err(bad());
    }

    let mut exponent = 0;
    let mut base16 = true;
    if i < bytes.len() && (bytes[i] == b'x' || bytes[i] == b'X') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'b' || bytes[i] == b'B') {
            base16 = false;
            i += 1;
        }
        exponent = scan_int(&bytes[i..]);
    }
    if base16 {
        exponent *= 4;
    }

    Ok(sign * apply_exponent(value, exponent))
}

// C99/C++11 hexfloat, "s0x1.mmm...mmmpseee".
fn scan_c99_hex(input: &str) -> Result<f64, ParseFloatError> {
    let bytes = input.as_bytes();
    let bad = || ParseFloatError {
        input: input.to_owned(),
    };

    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        if ch == b'+' || ch == b'-' || hex_digit(ch).is_some() {
            break;
        }
        i += 1;
    }
    let mut sign = 1.0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        if bytes[i] == b'-' {
            sign = -1.0;
        }
        i += 1;
    }
    if i + 1 < bytes.len() && bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
        i += 2;
    }

    // Next should be "1." or, for zero only, a plain '0'
    if i < bytes.len() && bytes[i] == b'0' {
        return Ok(if sign < 0.0 { -0.0 } else { 0.0 });
    }
    if i + 1 >= bytes.len() || bytes[i] != b'1' || bytes[i + 1] != b'.' {
        return Err(bad());
    }
    i += 2;

    let mut value = 1.0;
    let mut exponent = 0;
    while i < bytes.len() {
        match hex_digit(bytes[i]) {
            Some(d) => {
                value = 16.0 * value + f64::from(d);
                exponent -= 4;
                i += 1;
            }
            None => break,
        }
    }
    if i < bytes.len() && (bytes[i] == b'p' || bytes[i] == b'P') {
        exponent += scan_int(&bytes[i + 1..]);
    }

    Ok(sign * apply_exponent(value, exponent))
}

/// Reads a single f64 from any accepted spelling: `Inf`, `-Inf`,
/// `NaN`, C99 hexfloat (contains `p`), hex-bin/hex-hex (contains
/// `x`), or decimal.
pub fn parse_float(input: &str) -> Result<f64, ParseFloatError> {
    // Infinities and NaNs first
    if let Some(pos) = input.find("Inf") {
        let negative = pos > 0 && input.as_bytes()[pos - 1] == b'-';
        return Ok(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    if input.contains("NaN") {
        return Ok(f64::NAN);
    }
    // A C99 hexfloat also contains an 'x' in its "0x" prefix, so test
    // for 'p' first.
    if input.contains(['p', 'P']) {
        return scan_c99_hex(input);
    }
    if input.contains(['x', 'X']) {
        return scan_hex_bin(input);
    }
    input.trim().parse::<f64>().map_err(|_| ParseFloatError {
        input: input.to_owned(),
    })
}

impl fmt::Display for DoubleDouble {
    /// Prints both words in hex-binary, e.g.
    /// `[ 0x10000000000000xb-052, 0x00000000000000xb-053]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}]",
            format_hex_binary(self.hi),
            format_hex_binary(self.lo)
        )
    }
}

// Decimal digits needed to pin down 107 bits, plus slack; see Steele
// and White (1990).
const MAX_ACTIVE_PRECISION: usize = 34;

const LOG10_2: f64 = std::f64::consts::LOG10_2;

// Lexicographic triple compare against 10^power.
fn is_less_than_pow10(x: Triple, power: i32) -> bool {
    let t = ldexp10((1.0, 0.0, 0.0), power);
    if x.0 != t.0 {
        return x.0 < t.0;
    }
    if x.1 != t.1 {
        return x.1 < t.1;
    }
    x.2 < t.2
}

impl DoubleDouble {
    /// Formats in decimal scientific notation with `precision` digits
    /// after the point, like `" 3.1416e+000"`.  The leading column
    /// holds the sign, space for positive.  Digits beyond what 107
    /// bits can pin down print as zeros.
    pub fn format_sci(&self, precision: usize) -> String {
        if !self.hi.is_finite() {
            return if self.hi.is_nan() {
                "NaN"
            } else if self.hi > 0.0 {
                "Inf"
            } else {
                "-Inf"
            }
            .to_owned();
        }

        if self.hi == 0.0 {
            let mut out = String::new();
            out.push(if self.hi.is_sign_negative() { '-' } else { ' ' });
            out.push('0');
            if precision > 0 {
                out.push('.');
                for _ in 0..precision {
                    out.push('0');
                }
            }
            out.push_str("e+000");
            return out;
        }

        let active = precision.min(MAX_ACTIVE_PRECISION);

        // Estimate the power of ten from the binary exponent, using
        // log(2)*t < log(1+t) so the estimate errs low; the mantissa
        // overflow check below repairs a low-by-one estimate.
        let (m, e) = frexp_k(self.hi.abs());
        let mant = 2.0 * m;
        let exponent = e - 1;
        let powten_estimate = (mant - 1.0 + f64::from(exponent)) * LOG10_2;
        let mut powten = powten_estimate as i32;
        if powten_estimate - f64::from(powten) < f64::EPSILON * LOG10_2 {
            // Boundary case; try one power lower first
            powten -= 1;
        }

        // Scale x into an integer with active+1 digits
        let adjpow = -powten + active as i32;
        let mut y = ldexp10((self.hi, self.lo, 0.0), adjpow);
        let negative = y.0 < 0.0;
        if negative {
            y = (-y.0, -y.1, -y.2);
        }

        // Round to integer.  The shaved half keeps an overestimated
        // top word from double-rounding at a digit boundary.
        let round_adj = 0.5 - f64::EPSILON / 4.0;
        let ysave = y;
        y = floor3(three_sum(y, (round_adj, 0.0, 0.0)));

        // Mantissa overflow check.  Handles both a low powten
        // estimate and rounding that pushed y up to a power of ten.
        if !is_less_than_pow10(y, active as i32 + 1) {
            y = ldexp10(ysave, -1);
            powten += 1;
            y = floor3(three_sum(y, (round_adj, 0.0, 0.0)));
        }
        debug_assert!(is_less_than_pow10(y, active as i32 + 1));
        debug_assert!(!is_less_than_pow10(y, active as i32));

        // Peel off decimal digits right to left.  For values beyond
        // 2^53 the divide by ten has to track the remainder at pair
        // or triple width.
        let break1 = pow2i(103) * 10.0;
        let break2 = pow2i(53);
        let break3 = pow2i(49) * 10.0;
        let invten = sloppy_recip((10.0, 0.0, 0.0));

        let mut digits = vec![b'0'; active + 1];
        let mut pos = active + 1;
        while y.0 != 0.0 && pos > 0 {
            let remainder;
            if y.0 >= break1 {
                // Triple-double remainder
                let tmp = sloppy_prod(y, invten);
                let a0 = tmp.0.floor();
                let a0r = tmp.0 - a0;
                let a1 = tmp.1.floor();
                let a1r = tmp.1 - a1;
                let a2 = tmp.2.floor();
                let a2r = tmp.2 - a2;
                let int_part = normalize3((a0, a1, a2));
                let frac = normalize3((a0r, a1r, a2r));
                y = three_sum(int_part, (frac.0.floor(), 0.0, 0.0));
                let r = frac.0 - frac.0.floor();
                remainder = (r * 10.0 + 0.5).floor();
            } else if y.0 >= break2 {
                // Pair-width remainder
                let mut tmp = DoubleDouble::from_parts(y.0, y.1) / 10.0;
                let yf = tmp.floor();
                tmp -= yf;
                y = (yf.hi(), yf.lo(), 0.0);
                remainder = (tmp.hi() * 10.0 + 0.5).floor();
            } else if y.0 >= break3 {
                // Exact single-word remainder
                let t = (y.0 / 10.0).floor();
                remainder = y.0 - 10.0 * t;
                y = (t, 0.0, 0.0);
            } else {
                let r = y.0 / 10.0;
                let t = r.floor();
                y = (t, 0.0, 0.0);
                remainder = ((r - t) * 10.0 + 0.5).floor();
            }
            debug_assert!((0.0..10.0).contains(&remainder));
            pos -= 1;
            digits[pos] = b'0' + remainder as u8;
        }

        let mut out = String::with_capacity(precision + 9);
        out.push(if negative { '-' } else { ' ' });
        out.push(digits[0] as char);
        if precision > 0 {
            out.push('.');
            for &d in &digits[1..] {
                out.push(d as char);
            }
            // Right fill with zeros past the active precision
            for _ in active..precision {
                out.push('0');
            }
        }
        out.push_str(&format!("e{powten:+04}"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex_binary_basic() {
        assert_eq!(format_hex_binary(1.0), " 0x10000000000000xb-052");
        assert_eq!(format_hex_binary(-0.5), "-0x10000000000000xb-053");
        assert_eq!(format_hex_binary(0.0), " 0x00000000000000xb-053");
        assert_eq!(format_hex_binary(-0.0), "-0x00000000000000xb-053");
        assert_eq!(format_hex_binary(f64::INFINITY), "Inf");
        assert_eq!(format_hex_binary(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_hex_binary(f64::NAN), "NaN");
    }

    #[test]
    fn test_hex_binary_roundtrip() {
        use rand::Rng;
        let mut rng = rand::rng();
        let mut values = vec![
            1.0,
            -1.0,
            std::f64::consts::PI,
            f64::MAX,
            f64::MIN_POSITIVE,
            f64::from_bits(1), // smallest denormal
            -4.9406564584124654e-324,
            1.5e-310, // mid denormal
        ];
        for _ in 0..100 {
            values.push(f64::from_bits(rng.random::<u64>() & 0x7fffffffffffffff));
        }
        for &v in &values {
            if v.is_nan() {
                continue;
            }
            let s = format_hex_binary(v);
            let r = parse_float(&s).unwrap();
            assert_eq!(r.to_bits(), v.to_bits(), "value {v:e} via {s}");
        }
    }

    #[test]
    fn test_parse_hex_bin_forms() {
        assert_eq!(parse_float("5a0xb3").unwrap(), 11520.0);
        assert_eq!(parse_float("120Fxb-7").unwrap(), 36.1171875);
        assert_eq!(parse_float("5a0x3").unwrap(), 5898240.0);
        assert_eq!(
            parse_float("120Fx-7").unwrap(),
            0.0000172220170497894287109375
        );
    }

    #[test]
    fn test_parse_c99_hex() {
        assert_eq!(parse_float("0x1.68p13").unwrap(), 11520.0);
        assert_eq!(parse_float("-0x1.20Fp+5").unwrap(), -36.1171875);
        assert_eq!(parse_float("0x1.p0").unwrap(), 1.0);
        let z = parse_float("-0x0p0").unwrap();
        assert_eq!(z, 0.0);
        assert!(z.is_sign_negative());
    }

    #[test]
    fn test_parse_decimal_and_specials() {
        assert_eq!(parse_float("3.5e2").unwrap(), 350.0);
        assert_eq!(parse_float(" -12.25 ").unwrap(), -12.25);
        assert_eq!(parse_float("Inf").unwrap(), f64::INFINITY);
        assert_eq!(parse_float("-Inf").unwrap(), f64::NEG_INFINITY);
        assert!(parse_float("NaN").unwrap().is_nan());
        assert!(parse_float("xyzzy").is_err());
        assert!(parse_float("").is_err());
    }

    #[test]
    fn test_parse_huge_exponent_saturates() {
        assert_eq!(parse_float("1xb99999").unwrap(), f64::INFINITY);
        assert_eq!(parse_float("1xb-99999").unwrap(), 0.0);
    }

    #[test]
    fn test_display_pair() {
        let one = DoubleDouble::from(1.0);
        assert_eq!(
            format!("{one}"),
            "[ 0x10000000000000xb-052, 0x00000000000000xb-053]"
        );
        let inf = DoubleDouble::from(f64::INFINITY);
        assert_eq!(format!("{inf}"), "[Inf,Inf]");
    }

    #[test]
    fn test_format_sci_pi() {
        let pi = DoubleDouble::PI;
        assert_eq!(
            pi.format_sci(30),
            " 3.141592653589793238462643383280e+000"
        );
        assert_eq!(pi.format_sci(4), " 3.1416e+000");
    }

    #[test]
    fn test_format_sci_simple() {
        assert_eq!(DoubleDouble::from(1.0).format_sci(4), " 1.0000e+000");
        assert_eq!(DoubleDouble::from(0.0).format_sci(2), " 0.00e+000");
        assert_eq!(DoubleDouble::from(-0.0).format_sci(2), "-0.00e+000");
        assert_eq!(DoubleDouble::from(0.1).format_sci(10), " 1.0000000000e-001");
    }

    #[test]
    fn test_format_sci_rounding_carry() {
        // Rounding 999999.75 at 3 digits carries all the way up
        assert_eq!(
            DoubleDouble::from(-999999.75).format_sci(3),
            "-1.000e+006"
        );
        assert_eq!(
            DoubleDouble::from(999999.75).format_sci(5),
            " 1.00000e+006"
        );
    }

    #[test]
    fn test_format_sci_specials() {
        assert_eq!(DoubleDouble::from(f64::NAN).format_sci(5), "NaN");
        assert_eq!(DoubleDouble::from(f64::INFINITY).format_sci(5), "Inf");
        assert_eq!(DoubleDouble::from(f64::NEG_INFINITY).format_sci(5), "-Inf");
    }

    #[test]
    fn test_format_sci_zero_fill_past_active() {
        // Past 34 digits only zeros can be meaningful
        let s = DoubleDouble::from(1.0).format_sci(40);
        assert_eq!(s, " 1.0000000000000000000000000000000000000000e+000");
    }
}
