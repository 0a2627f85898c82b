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

//! Double-double logarithms by Newton/Halley refinement of an f64 seed
//! against the double-double exponential.

use crate::common::{POW_2_MANTISSA, ldexp_k};
use crate::dd::DoubleDouble;
use crate::eft::{fast_two_sum, two_sum};
use crate::exp::exp_base;
use crate::hires::LOG2_MANT;
use crate::triple::{sloppy_prod, three_increment, three_sum};

// log1p(x) for x above this is indistinguishable from log(x); the
// difference is under 0.0001 ULP, so handing off to ln keeps the
// total error under 0.50001 ULP.
const HEADROOM_FACTOR: f64 = 256.0;

impl DoubleDouble {
    /// Computes the natural logarithm.
    pub fn ln(self) -> Self {
        if !(f64::MIN_POSITIVE <= self.hi && self.hi <= f64::MAX) {
            // The !(..) construct also catches NaN
            if self.hi < 0.0 {
                return DoubleDouble::from_parts(f64::NAN, f64::NAN);
            } else if !self.hi.is_finite() {
                // +Inf or NaN
                return self;
            } else if self.hi == 0.0 {
                return DoubleDouble::from_parts(f64::NEG_INFINITY, f64::NEG_INFINITY);
            }

            // Subnormal input: the Newton correction would overflow
            // if computed directly.  The low word must be zero here.
            let mut ia0 = self.hi * POW_2_MANTISSA;
            let x0 = pxfm::f_log(ia0);
            let (mut h1, m) = exp_base(DoubleDouble::from(-x0));
            ia0 = ldexp_k(ia0, m);

            // (h1+1)*ia0 - 1
            h1 = three_increment(h1, 1.0);
            h1 = sloppy_prod(h1, (ia0, 0.0, 0.0));
            h1 = three_increment(h1, -1.0);

            // Halley correction, folding in the -53*log(2) offset
            // from the mantissa prescale
            let h2 = h1.0 * h1.0;
            h1 = three_sum(h1, (-LOG2_MANT[0], -LOG2_MANT[1], -LOG2_MANT[2]));
            h1 = three_increment(h1, -0.5 * h2);
            h1 = three_increment(h1, x0);
            return DoubleDouble::from_parts(h1.0, h1.1);
        }

        // Initial guess, then Newton correction against exp
        let x0 = pxfm::f_log(self.hi);
        let (h1, m) = exp_base(DoubleDouble::from(-x0));
        // The range checks above keep m within the f64 exponent
        // range, so 2^m is representable
        let scale = ldexp_k(1.0, m);
        let ia0 = self.hi * scale;
        let ia1 = self.lo * scale;

        let h1 = three_increment(h1, 1.0);
        let h1 = sloppy_prod(h1, (ia0, ia1, 0.0));

        let (mut a0, mut a1, a2) = h1;
        let scratch;
        (a0, scratch) = two_sum(a0, -1.0);
        a1 += scratch;
        (a0, a1) = fast_two_sum(a0, a1);
        a1 += a2;

        // Halley correction
        let mut h2 = a0 * a0;
        (a0, h2) = two_sum(a0, -0.5 * h2);
        a1 += h2;

        // Add corrections to initial guess
        let (a0, x0) = two_sum(a0, x0);
        DoubleDouble::from_parts(a0, a1 + x0)
    }

    /// Computes log(1 + x) without the cancellation the naive form
    /// suffers for small x.
    pub fn ln_1p(self) -> Self {
        if !(-1.0 + f64::EPSILON <= self.hi
            && self.hi <= HEADROOM_FACTOR * POW_2_MANTISSA * POW_2_MANTISSA)
        {
            // The !(..) construct also catches NaN
            if self.hi > HEADROOM_FACTOR * POW_2_MANTISSA * POW_2_MANTISSA {
                return self.ln();
            }
            if self.hi < -1.0 || (self.hi == -1.0 && self.lo < 0.0) {
                return DoubleDouble::from_parts(f64::NAN, f64::NAN);
            } else if !self.hi.is_finite() {
                // Presumably +Inf or NaN
                return self;
            } else if self.hi == -1.0 && self.lo == 0.0 {
                return DoubleDouble::from_parts(f64::NEG_INFINITY, f64::NEG_INFINITY);
            }
            if self.hi == -1.0 {
                // The initial-estimate code below would see -Inf,
                // which is wrong when the low word is positive.  Hand
                // the problem to ln instead.
                return DoubleDouble::from(self.lo).ln();
            }
        }

        // Initial guess, with the usual trick for an accurate f64
        // log(1+a)
        let mut x0 = 1.0 + self.hi;
        let y0 = x0 - 1.0;
        if y0 != 0.0 {
            x0 = pxfm::f_log(x0) / y0;
            x0 *= self.hi;
        } else {
            x0 = self.hi;
        }

        // Newton correction
        let (tmp, m) = exp_base(DoubleDouble::from(-x0));
        let h1 = if m == 0 {
            let h1 = sloppy_prod((self.hi, self.lo, 0.0), tmp);
            let h1 = three_sum(h1, tmp);
            three_sum(h1, (self.hi, self.lo, 0.0))
        } else {
            // The range check keeps |m| inside the f64 exponent range
            let scale = ldexp_k(1.0, m);
            let h1 = (self.hi * scale, self.lo * scale, 0.0);
            let tmp = three_increment(tmp, 1.0);
            let h1 = three_increment(h1, scale);
            let h1 = sloppy_prod(h1, tmp);
            three_increment(h1, -1.0)
        };

        // Halley correction
        let (mut a0, mut a1, _) = h1;
        let mut h2 = a0 * a0;
        (a0, h2) = two_sum(a0, -0.5 * h2);
        a1 += h2;

        // Add corrections to initial guess
        let mut x0 = x0;
        (a0, x0) = two_sum(a0, x0);
        DoubleDouble::from_parts(a0, a1 + x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_one_and_two() {
        assert_eq!(DoubleDouble::from(1.0).ln(), DoubleDouble::from(0.0));
        let l = DoubleDouble::from(2.0).ln();
        assert_eq!(l.hi(), 0.6931471805599453);
        assert!((l.lo() - 2.3190468138462996e-17).abs() < 1e-31);
    }

    #[test]
    fn test_ln_ten() {
        let l = DoubleDouble::from(10.0).ln();
        assert_eq!(l.hi(), 2.302585092994046);
        assert!((l.lo() + 2.1707562233822494e-16).abs() < 1e-30);
    }

    #[test]
    fn test_ln_specials() {
        assert!(DoubleDouble::from(-1.0).ln().hi().is_nan());
        assert!(DoubleDouble::from(f64::NAN).ln().hi().is_nan());
        assert_eq!(DoubleDouble::from(f64::INFINITY).ln().hi(), f64::INFINITY);
        assert_eq!(DoubleDouble::from(0.0).ln().hi(), f64::NEG_INFINITY);
        assert_eq!(DoubleDouble::from(-0.0).ln().hi(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_ln_subnormal() {
        // ln(2^-1070) = -1070*ln(2)
        let x = DoubleDouble::from(f64::from_bits(1u64 << 4));
        let l = x.ln();
        let want = DoubleDouble::from_parts(0.6931471805599453, 2.3190468138462996e-17)
            * DoubleDouble::from(-1070.0);
        assert!(l.diff_ulp(&want, want.ulp()) <= 1.0);
    }

    #[test]
    fn test_ln_exp_roundtrip() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..100 {
            let x = DoubleDouble::from(rng.random_range(1e-6..1e6));
            let r = x.ln().exp();
            let err = r - x;
            assert!(err.hi().abs() < x.hi() * 1e-31, "x = {:?}", x);
        }
    }

    #[test]
    fn test_ln_1p_basic() {
        let l = DoubleDouble::from(0.5).ln_1p();
        assert_eq!(l.hi(), 0.4054651081081644);
        assert!((l.lo() + 2.8811380259626426e-18).abs() < 1e-32);
    }

    #[test]
    fn test_ln_1p_minus_half() {
        // log1p(-0.5) = -log(2) exactly
        let l = DoubleDouble::from(-0.5).ln_1p();
        let want = DoubleDouble::from(2.0).ln();
        assert_eq!(l, -want);
    }

    #[test]
    fn test_ln_1p_tiny() {
        // For tiny x, log1p(x) = x - x^2/2 + ...
        let x = 1e-25;
        let l = DoubleDouble::from(x).ln_1p();
        assert_eq!(l.hi(), x);
        assert!((l.lo() + 0.5 * x * x).abs() < 1e-65);
    }

    #[test]
    fn test_ln_1p_specials() {
        assert!(DoubleDouble::from(-1.5).ln_1p().hi().is_nan());
        assert!(DoubleDouble::from(f64::NAN).ln_1p().hi().is_nan());
        assert_eq!(
            DoubleDouble::from(-1.0).ln_1p().hi(),
            f64::NEG_INFINITY
        );
        assert_eq!(
            DoubleDouble::from(f64::INFINITY).ln_1p().hi(),
            f64::INFINITY
        );
        // Just below -1 in the low word is out of domain
        assert!(
            DoubleDouble::from_parts(-1.0, -1e-20).ln_1p().hi().is_nan()
        );
    }

    #[test]
    fn test_ln_1p_handoff_to_ln() {
        // Far above the headroom bound ln_1p and ln agree
        let x = DoubleDouble::from(1e40);
        let a = x.ln_1p();
        let b = x.ln();
        assert!(a.diff_ulp(&b, b.ulp()) <= 1.0);
    }

    #[test]
    fn test_ln_1p_near_minus_one() {
        // hi == -1 with a positive low word defers to ln of the low
        // word
        let x = DoubleDouble::from_parts(-1.0, 1e-30);
        let l = x.ln_1p();
        let want = DoubleDouble::from(1e-30).ln();
        assert!(l.diff_ulp(&want, want.ulp()) <= 1.0);
    }
}
