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

use crate::bigfloat::BigFloat;
use crate::common::{POW_2_MANTISSA, VERYTINY_EXP, copysignk, frexp_k, ldexp_k};
use crate::eft::{fast_two_sum, two_diff, two_sum};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Unevaluated sum of two f64 words carrying a 106-bit mantissa.
///
/// The value is `hi + lo` with `|lo| <= ulp(hi)/2`; `hi` alone is the
/// value correctly rounded to f64.  Non-finite values keep both words
/// equal, so `[Inf, Inf]`, `[-Inf, -Inf]`, `[NaN, NaN]`.
///
/// Addition and subtraction are correctly rounded (error <= 0.5 ULP of
/// the 106-bit result).  There is a different split-add with much
/// larger error in TJ Dekker, Numer. Math. 18 (1971), and another in
/// Hida, Li, and Bailey's "QD" library with apparent error of 2.5 ULP;
/// neither is used here.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct DoubleDouble {
    pub(crate) hi: f64,
    pub(crate) lo: f64,
}

impl DoubleDouble {
    /// pi, correct to 106 bits.
    pub const PI: Self = DoubleDouble {
        hi: crate::hires::PI[0],
        lo: crate::hires::PI[1],
    };

    /// pi/2, correct to 106 bits.
    pub const HALF_PI: Self = DoubleDouble {
        hi: 0.5 * crate::hires::PI[0],
        lo: 0.5 * crate::hires::PI[1],
    };

    /// log(2), correct to 106 bits.
    pub const LN_2: Self = DoubleDouble {
        hi: crate::hires::LOG2[0],
        lo: crate::hires::LOG2[1],
    };

    /// sqrt(2), correct to 106 bits.
    pub const SQRT_2: Self = DoubleDouble {
        hi: crate::hires::SQRT2[0],
        lo: crate::hires::SQRT2[1],
    };

    /// Builds from any two f64 values, normalizing.
    #[inline]
    pub fn new(hi: f64, lo: f64) -> Self {
        if !hi.is_finite() || !lo.is_finite() {
            let s = hi + lo;
            return DoubleDouble { hi: s, lo: s };
        }
        let (u, v) = two_sum(hi, lo);
        if !u.is_finite() {
            return DoubleDouble { hi: u, lo: u };
        }
        DoubleDouble { hi: u, lo: v }
    }

    /// Builds from words already known to be normalized.  Member
    /// routines use this to skip the normalization pass.
    #[inline]
    pub fn from_parts(hi: f64, lo: f64) -> Self {
        DoubleDouble { hi, lo }
    }

    /// Rounds a chunked extended-precision value into a pair.
    pub fn from_big(data: &BigFloat) -> Self {
        data.to_double_double()
    }

    #[inline]
    pub const fn hi(&self) -> f64 {
        self.hi
    }

    #[inline]
    pub const fn lo(&self) -> f64 {
        self.lo
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.hi.is_finite()
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.hi.is_nan()
    }

    /// True when the words are close packed, i.e. resumming them
    /// reproduces both words.  Non-finite values pass.
    pub fn is_normalized(&self) -> bool {
        if !self.hi.is_finite() {
            return true;
        }
        let (u, v) = two_sum(self.hi, self.lo);
        self.hi == u && self.lo == v
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.hi < 0.0 || (self.hi == 0.0 && self.hi.is_sign_negative()) {
            -self
        } else {
            self
        }
    }

    /// Sign of the value as a plain f64: -1, 0 (keeping the zero's
    /// sign), or 1; NaN propagates.
    #[inline]
    pub fn signum(&self) -> f64 {
        if self.hi == 0.0 || self.hi.is_nan() {
            self.hi
        } else {
            copysignk(1.0, self.hi)
        }
    }

    /// Size of unit-in-the-last-place of the 106-bit mantissa.  This
    /// assumes hi and lo are close packed, which is what we usually
    /// want.  Non-finite values report 0.
    pub fn ulp(&self) -> f64 {
        if !self.hi.is_finite() {
            return 0.0;
        }
        if self.hi == 0.0 {
            return ldexp_k(1.0, VERYTINY_EXP);
        }
        let (mant, mut exp) = frexp_k(self.hi);
        exp -= 107;
        if exp < VERYTINY_EXP {
            exp = VERYTINY_EXP;
        }
        if (mant == 0.5 && self.lo < 0.0) || (mant == -0.5 && self.lo > 0.0) {
            // At an exact power of two the ULP depends on which side
            // the low word sits.
            exp -= 1;
        }
        if exp < VERYTINY_EXP {
            exp = VERYTINY_EXP;
        }
        ldexp_k(1.0, exp)
    }

    /// Difference from `reference` in units of `refulp`; absolute
    /// difference when `refulp` is zero.
    pub fn diff_ulp(&self, reference: &DoubleDouble, refulp: f64) -> f64 {
        let mut r0 = self.hi - reference.hi;
        let mut r1 = self.lo - reference.lo;
        let mut refulp = refulp;
        if refulp != 0.0 {
            if refulp < 1.0 / POW_2_MANTISSA {
                // Keep the divisor out of the subnormal range.
                refulp *= POW_2_MANTISSA;
                r0 *= POW_2_MANTISSA;
                r1 *= POW_2_MANTISSA;
            }
            r0 /= refulp;
            r1 /= refulp;
        }
        r0 + r1
    }

    /// Scales by 2^m, exactly.
    pub fn ldexp(self, m: i32) -> Self {
        if !self.hi.is_finite() {
            return self;
        }
        let hi = ldexp_k(self.hi, m);
        if !hi.is_finite() {
            return DoubleDouble { hi, lo: hi };
        }
        // Low word may shear off into the subnormal range; renormalize.
        DoubleDouble::new(hi, ldexp_k(self.lo, m))
    }

    /// Largest integer not above the value.
    pub fn floor(self) -> Self {
        let a0 = self.hi.floor();
        let a0r = self.hi - a0;
        let a1 = self.lo.floor();
        let a1r = self.lo - a1;
        let b = DoubleDouble::new(a0, a1); // This is an integer
        let br = DoubleDouble::new(a0r, a1r); // Sum of remainders
        b + br.hi.floor()
    }

    /// Smallest integer not below the value.
    pub fn ceil(self) -> Self {
        let a0 = self.hi.ceil();
        let a0r = self.hi - a0; // This is <= 0
        let a1 = self.lo.ceil();
        let a1r = self.lo - a1; // Also <= 0
        let b = DoubleDouble::new(a0, a1);
        let br = DoubleDouble::new(a0r, a1r);
        b + br.hi.ceil()
    }
}

impl From<f64> for DoubleDouble {
    #[inline]
    fn from(x: f64) -> Self {
        if x.is_finite() && x != 0.0 {
            DoubleDouble { hi: x, lo: 0.0 }
        } else {
            // Keep the sign on the low word for zeros, and the full
            // payload for Inf/NaN.
            DoubleDouble { hi: x, lo: x }
        }
    }
}

impl From<i32> for DoubleDouble {
    #[inline]
    fn from(x: i32) -> Self {
        DoubleDouble::from(x as f64)
    }
}

impl From<i64> for DoubleDouble {
    fn from(x: i64) -> Self {
        // Keep as many bits as possible: split at the mantissa width.
        // Work in i128 so the residual survives the i64::MAX edge.
        let hi = x as f64;
        let rem = (x as i128 - hi as i128) as f64;
        DoubleDouble::new(hi, rem)
    }
}

impl num_traits::Zero for DoubleDouble {
    #[inline]
    fn zero() -> Self {
        DoubleDouble::from(0.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.hi == 0.0
    }
}

impl num_traits::One for DoubleDouble {
    #[inline]
    fn one() -> Self {
        DoubleDouble::from(1.0)
    }
}

impl Neg for DoubleDouble {
    type Output = DoubleDouble;
    #[inline]
    fn neg(self) -> DoubleDouble {
        DoubleDouble {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

/// Shared tail of add/sub, after the leading two-sums.
#[inline]
fn add_finish(mut a0: f64, a1: f64, b0: f64, b1: f64, first_sum: f64) -> DoubleDouble {
    let (mut a1, b0) = two_sum(a1, b0);
    let (u, v) = fast_two_sum(a0, a1);
    a0 = u;
    a1 = v;
    let mut tst = a1 * (1.0 + f64::EPSILON); // part A of the 1 + xi + xi^2 hack
    let bsum = b0 + b1; // order must be (b0 + b1) + a1

    if !a0.is_finite() {
        if !first_sum.is_finite() {
            // The leading two-sum overflowed; a0 may be NaN here, so
            // reset to the first sum.
            return DoubleDouble {
                hi: first_sum,
                lo: first_sum,
            };
        }
        return DoubleDouble { hi: a0, lo: a0 };
    }

    // Workaround hack so 1 + xi + xi^2 gives 1 + xi + xi^2 instead of
    // 1 + xi (where xi = ULP(1)/2).  Also handles 1 - xi/2 - xi^2/2.
    let chk = a0 + tst;
    if chk != a0 {
        // Either |a1| = ULP(a0)/2, or else |a0| = 2^n for some n.
        tst -= a1;
        if tst == a1 * f64::EPSILON {
            // |a1| = 2^m for some m.  The ordered two-sum handles the
            // case bsum - a1 == a1, i.e. |bsum| << |a1|.
            a0 += 2.0 * a1;
            let (hi, lo) = fast_two_sum(a0, bsum - a1);
            return DoubleDouble { hi, lo };
        }
    }
    // The closing ordered two-sum handles cases like
    //   [ 0x10000000000001xb-052,-0x1FFFFFFFFFFFFFxb-106]
    // + [-0x10000000000000xb-052,-0x10000000000000xb-105]
    // where a1 + bsum spills back into a0.
    let (hi, lo) = fast_two_sum(a0, a1 + bsum);
    DoubleDouble { hi, lo }
}

impl Add for DoubleDouble {
    type Output = DoubleDouble;
    fn add(self, y: DoubleDouble) -> DoubleDouble {
        let (a0, b0) = two_sum(self.hi, y.hi);
        let (a1, b1) = two_sum(self.lo, y.lo);
        if y.hi == 0.0 && a0.is_finite() {
            // Signed zero handling.
            return self;
        }
        add_finish(a0, a1, b0, b1, self.hi + y.hi)
    }
}

impl Sub for DoubleDouble {
    type Output = DoubleDouble;
    fn sub(self, y: DoubleDouble) -> DoubleDouble {
        let (a0, b0) = two_diff(self.hi, y.hi);
        let (a1, b1) = two_diff(self.lo, y.lo);
        if y.hi == 0.0 && a0.is_finite() {
            return self;
        }
        add_finish(a0, a1, b0, b1, self.hi - y.hi)
    }
}

impl Add<f64> for DoubleDouble {
    type Output = DoubleDouble;
    #[inline]
    fn add(self, y: f64) -> DoubleDouble {
        self + DoubleDouble::from(y)
    }
}

impl Sub<f64> for DoubleDouble {
    type Output = DoubleDouble;
    #[inline]
    fn sub(self, y: f64) -> DoubleDouble {
        self - DoubleDouble::from(y)
    }
}

impl Add<DoubleDouble> for f64 {
    type Output = DoubleDouble;
    #[inline]
    fn add(self, y: DoubleDouble) -> DoubleDouble {
        DoubleDouble::from(self) + y
    }
}

impl Sub<DoubleDouble> for f64 {
    type Output = DoubleDouble;
    #[inline]
    fn sub(self, y: DoubleDouble) -> DoubleDouble {
        DoubleDouble::from(self) - y
    }
}

impl AddAssign for DoubleDouble {
    #[inline]
    fn add_assign(&mut self, y: DoubleDouble) {
        *self = *self + y;
    }
}

impl SubAssign for DoubleDouble {
    #[inline]
    fn sub_assign(&mut self, y: DoubleDouble) {
        *self = *self - y;
    }
}

impl AddAssign<f64> for DoubleDouble {
    #[inline]
    fn add_assign(&mut self, y: f64) {
        *self = *self + y;
    }
}

impl SubAssign<f64> for DoubleDouble {
    #[inline]
    fn sub_assign(&mut self, y: f64) {
        *self = *self - y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::pow2i;
    use rand::Rng;

    fn dd(hi: u64, lo: u64) -> DoubleDouble {
        DoubleDouble::from_parts(f64::from_bits(hi), f64::from_bits(lo))
    }

    #[test]
    fn test_new_normalizes() {
        let x = DoubleDouble::new(1.0, 3.0);
        assert_eq!((x.hi(), x.lo()), (4.0, 0.0));
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let a: f64 = rng.random_range(-1e8..1e8);
            let b: f64 = rng.random_range(-1e-8..1e-8);
            let x = DoubleDouble::new(a, b);
            assert!(x.lo().abs() <= f64::EPSILON * x.hi().abs());
            // renormalizing is a no-op
            let y = DoubleDouble::new(x.hi(), x.lo());
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_add_table_cases() {
        // 0x10000000000001xb+000 + -0x10000000000000xb-105 etc., the
        // carry propagation corner cases
        let x = DoubleDouble::from_parts(
            4503599627370497.0,
            -4503599627370496.0 * pow2i(-105),
        );
        let y = DoubleDouble::from_parts(9007199254740991.0 * pow2i(-1), 0.0);
        let z = x + y;
        assert_eq!(z.hi(), 4503599627370496.0 * 2.0);
        assert_eq!(z.lo(), 9007199254740990.0 * pow2i(-54));

        let x = DoubleDouble::from_parts(
            4503599627370497.0 * pow2i(54),
            -4503599627370497.0,
        );
        let y = DoubleDouble::from_parts(
            -4503599627370496.0 * pow2i(54),
            -4503599627370496.0,
        );
        let z = x + y;
        assert_eq!(z.hi(), 9007199254740991.0);
        assert_eq!(z.lo(), 0.0);
    }

    #[test]
    fn test_add_epsilon_hack() {
        // 1 + xi + xi^2 must keep the xi^2 term (xi = ULP(1)/2)
        let xi = 0.5 * f64::EPSILON;
        let x = DoubleDouble::from_parts(1.0, xi);
        let y = DoubleDouble::from_parts(xi * xi, 0.0);
        let z = x + y;
        assert_eq!((z.hi(), z.lo()), (1.0 + f64::EPSILON, -xi + xi * xi));
    }

    #[test]
    fn test_add_signed_zero() {
        // A zero addend passes the other operand through unchanged, so
        // (-0) + (+0) keeps the -0 instead of the IEEE sum +0.
        let z = DoubleDouble::from(-0.0) + DoubleDouble::from(0.0);
        assert_eq!(z.hi(), 0.0);
        assert!(z.hi().is_sign_negative());
        let s = DoubleDouble::from(0.0) + DoubleDouble::from(-0.0);
        assert!(!s.hi().is_sign_negative());
        let n = DoubleDouble::from(-0.0) + DoubleDouble::from(-0.0);
        assert!(n.hi().is_sign_negative());
        let w = DoubleDouble::from(3.5) + DoubleDouble::from(-0.0);
        assert_eq!((w.hi(), w.lo()), (3.5, 0.0));
    }

    #[test]
    fn test_add_overflow() {
        let x = DoubleDouble::from(f64::MAX);
        let z = x + x;
        assert_eq!(z.hi(), f64::INFINITY);
        assert_eq!(z.lo(), f64::INFINITY);
    }

    #[test]
    fn test_sub_matches_add_neg() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let x = DoubleDouble::new(
                rng.random_range(-1e10..1e10),
                rng.random_range(-1e-6..1e-6),
            );
            let y = DoubleDouble::new(
                rng.random_range(-1e10..1e10),
                rng.random_range(-1e-6..1e-6),
            );
            assert_eq!(x - y, x + (-y));
        }
    }

    #[test]
    fn test_add_round_trip() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let x = DoubleDouble::new(
                rng.random_range(-1e10..1e10),
                rng.random_range(-1e-6..1e-6),
            );
            let y = DoubleDouble::new(
                rng.random_range(-1e10..1e10),
                rng.random_range(-1e-6..1e-6),
            );
            let z = (x + y) - y;
            // Each add is correctly rounded at the scale of its own
            // result, so the round trip error is bounded by the ULP
            // of the larger operand.
            let tol = 4.0 * x.ulp().max(y.ulp());
            assert!((z - x).hi().abs() <= tol);
        }
    }

    #[test]
    fn test_cancellation_sign() {
        let x = DoubleDouble::from(2.25);
        let z = x - x;
        assert_eq!(z.hi(), 0.0);
        assert!(!z.hi().is_sign_negative());
    }

    #[test]
    fn test_ulp() {
        let one = DoubleDouble::from(1.0);
        assert_eq!(one.ulp(), pow2i(-106));
        // just below a power of two the ULP halves
        let x = DoubleDouble::from_parts(1.0, -pow2i(-108));
        assert_eq!(x.ulp(), pow2i(-107));
        assert_eq!(DoubleDouble::from(0.0).ulp(), f64::from_bits(1));
        assert_eq!(DoubleDouble::from(f64::INFINITY).ulp(), 0.0);
        // deep subnormal clamps at the smallest subnormal
        let tiny = DoubleDouble::from(pow2i(-1000));
        assert_eq!(tiny.ulp(), f64::from_bits(1));
    }

    #[test]
    fn test_diff_ulp() {
        let a = dd(0x3ff0000000000000, 0x0000000000000000);
        let b = DoubleDouble::from_parts(1.0, pow2i(-106));
        assert_eq!(b.diff_ulp(&a, a.ulp()), 1.0);
        assert_eq!(a.diff_ulp(&a, a.ulp()), 0.0);
    }

    #[test]
    fn test_from_i64() {
        let x = DoubleDouble::from((1i64 << 60) + 1);
        assert_eq!(x.hi(), pow2i(60));
        assert_eq!(x.lo(), 1.0);
    }

    #[test]
    fn test_ldexp() {
        let x = DoubleDouble::from_parts(1.5, pow2i(-60));
        let y = x.ldexp(10);
        assert_eq!((y.hi(), y.lo()), (1536.0, pow2i(-50)));
        let z = x.ldexp(2000);
        assert_eq!(z.hi(), f64::INFINITY);
        assert_eq!(z.lo(), f64::INFINITY);
    }

    #[test]
    fn test_ordering() {
        let a = DoubleDouble::from_parts(1.0, -pow2i(-108));
        let b = DoubleDouble::from(1.0);
        let c = DoubleDouble::from_parts(1.0, pow2i(-108));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_zero_one_traits() {
        use num_traits::{One, Zero};
        assert!(DoubleDouble::zero().is_zero());
        assert!(DoubleDouble::from(-0.0).is_zero());
        let one = DoubleDouble::one();
        assert_eq!(one * one, one);
    }

    #[test]
    fn test_is_normalized() {
        assert!(DoubleDouble::from_parts(1.0, pow2i(-60)).is_normalized());
        assert!(!DoubleDouble::from_parts(1.0, 0.5).is_normalized());
        assert!(DoubleDouble::from(f64::NAN).is_normalized());
        assert!(DoubleDouble::from(f64::INFINITY).is_normalized());
    }

    #[test]
    fn test_floor_ceil() {
        let x = DoubleDouble::from_parts(3.5, pow2i(-60));
        assert_eq!(x.floor(), DoubleDouble::from(3.0));
        assert_eq!(x.ceil(), DoubleDouble::from(4.0));
        let y = DoubleDouble::from_parts(-3.5, -pow2i(-60));
        assert_eq!(y.floor(), DoubleDouble::from(-4.0));
        assert_eq!(y.ceil(), DoubleDouble::from(-3.0));
        // An integer with a small negative tail floors one down.  The
        // tail must stay above 2^-54 or the low remainder rounds back
        // to 1.0 and the value floors as the integer itself.
        let z = DoubleDouble::from_parts(4.0, -pow2i(-52));
        assert_eq!(z.floor(), DoubleDouble::from(3.0));
        assert_eq!(z.ceil(), DoubleDouble::from(4.0));
        let t = DoubleDouble::from_parts(4.0, -pow2i(-70));
        assert_eq!(t.floor(), DoubleDouble::from(4.0));
    }
}
