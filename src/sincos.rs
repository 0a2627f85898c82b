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

//! Double-double sine and cosine.

use crate::common::CUBEROOT_VERYTINY;
use crate::dd::DoubleDouble;
use crate::hires::PI;
use crate::reduce::circle_reduce;
use crate::triple::{
    Triple, neg3, scale3, sloppy_prod, sloppy_sqrt, sloppy_square, three_sum,
};

/// Computes sin and cos of `angle` carrying a third word internally, so
/// downstream corrections (atan's Newton step in particular) see a bit
/// better than double-double accuracy.  Error is just a tad over
/// 0.5 ULP.
pub(crate) fn sincos_core(angle: DoubleDouble) -> (Triple, Triple) {
    if !angle.hi.is_finite() {
        let nan = (f64::NAN, f64::NAN, f64::NAN);
        return (nan, nan);
    }

    // Reduce modulo pi/2, keeping quadrant info.  The range test here
    // repeats the fast path inside circle_reduce but skips the call
    // for the common small-angle case.
    let (mut r, quadrant) = if angle.hi.abs() < PI[0] / 4.0 {
        ((angle.hi, angle.lo, 0.0), 0)
    } else {
        circle_reduce(angle)
    };

    let sinb;
    let cosb;
    if r.0.abs() < CUBEROOT_VERYTINY {
        // If r^2 underflows the mainline series is rubbish.  Compute
        // directly from
        //   sin(x) = x ( - x^3/3 + ... )
        //   cos(x) = 1 - x^2/2 ( + x^4/4! - ...)
        // where the parenthesized parts are floating-point zero.
        sinb = r;
        let sq = sloppy_square(r);
        cosb = (1.0, -0.5 * sq.0, -0.5 * sq.1);
    } else {
        // Mainline: halve until |r|^14/14! < 0.5*|r|^2*precision
        let checkval = 8e-3;
        let mut kreduction = 0;
        while r.0.abs() > 8.0 * checkval {
            r = scale3(r, 0.0625);
            kreduction += 4;
        }
        while r.0.abs() > checkval {
            r = scale3(r, 0.5);
            kreduction += 1;
        }

        // Compute 1-cos(r) from the standard series, through r^12.
        // The extra terms buy a few digits that push down rounding
        // error; the bound is 0.5 ULP plus series truncation.
        let rsq = sloppy_square(r);
        // Leading terms at single-double precision
        let mut ssum = rsq.0;
        ssum /= -132.0;
        ssum += 1.0;
        ssum *= rsq.0;
        ssum /= 90.0;
        // Middle terms at double-double
        let rsq_dd = DoubleDouble::from_parts(rsq.0, rsq.1);
        let mut sum = DoubleDouble::from(ssum);
        sum -= 1.0;
        sum = sum * rsq_dd;
        sum /= 56.0;
        sum += 1.0;
        sum = sum * rsq_dd;
        sum /= 30.0;
        sum -= 1.0;
        sum = sum * rsq_dd;
        sum /= 12.0;
        // Finish at triple-double to wring out best accuracy
        let mut sum = sloppy_prod((sum.hi, sum.lo, 0.0), rsq);
        sum = three_sum(sum, rsq);
        sum = scale3(sum, 0.5);

        // Unscale through cos(2x)-1 = 2*(cos(x)-1)^2 + 4*(cos(x)-1)
        for _ in 0..kreduction {
            let t = sloppy_square(sum);
            sum = three_sum(scale3(sum, 4.0), scale3(t, -2.0));
        }

        cosb = three_sum((1.0, 0.0, 0.0), neg3(sum));
        let mut s = scale3(sum, 2.0);
        let sumsq = sloppy_square(sum);
        s = three_sum(s, neg3(sumsq));
        if s.0 <= 0.0 {
            sinb = (0.0, 0.0, 0.0);
        } else {
            let mut root = sloppy_sqrt(s);
            if r.0 < 0.0 {
                root = neg3(root);
            }
            sinb = root;
        }
    }

    // Quadrant fix-up, from
    //     sin(a+b) = sin(a)*cos(b) + sin(b)*cos(a)
    //     cos(a+b) = cos(a)*cos(b) - sin(a)*sin(b)
    // with a = quadrant*(pi/2)
    match quadrant {
        0 => (sinb, cosb),
        1 => (cosb, neg3(sinb)),
        2 => (neg3(sinb), neg3(cosb)),
        _ => (neg3(cosb), sinb),
    }
}

impl DoubleDouble {
    /// Computes sin and cos together, sharing the argument reduction.
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = sincos_core(self);
        (
            DoubleDouble::from_parts(s.0, s.1),
            DoubleDouble::from_parts(c.0, c.1),
        )
    }

    pub fn sin(self) -> Self {
        self.sin_cos().0
    }

    pub fn cos(self) -> Self {
        self.sin_cos().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dd(hi: u64, lo: u64) -> DoubleDouble {
        DoubleDouble::from_parts(f64::from_bits(hi), f64::from_bits(lo))
    }

    #[test]
    fn test_sincos_zero() {
        let (s, c) = DoubleDouble::from(0.0).sin_cos();
        assert_eq!(s.hi(), 0.0);
        assert!(s.hi().is_sign_positive());
        assert_eq!(c, DoubleDouble::from(1.0));
    }

    #[test]
    fn test_sin_signed_zero() {
        let s = DoubleDouble::from(-0.0).sin();
        assert_eq!(s.hi(), 0.0);
        assert!(s.hi().is_sign_negative());
    }

    #[test]
    fn test_sincos_non_finite() {
        assert!(DoubleDouble::from(f64::NAN).sin().hi().is_nan());
        assert!(DoubleDouble::from(f64::INFINITY).cos().hi().is_nan());
        assert!(DoubleDouble::from(f64::NEG_INFINITY).sin().hi().is_nan());
    }

    #[test]
    fn test_sin_small_value() {
        // Below the series cutoff sin(x) == x to double-double
        let x = DoubleDouble::from(1e-150);
        assert_eq!(x.sin(), x);
        let c = x.cos();
        assert_eq!(c.hi(), 1.0);
        assert!((c.lo() + 0.5e-300).abs() < 1e-315);
    }

    #[test]
    fn test_sin_one() {
        // sin(1) = 0.8414709848078965066525023216302989996...
        let s = DoubleDouble::from(1.0).sin();
        let want = 0.8414709848078965_f64;
        assert_eq!(s.hi(), want);
        // Next limb of sin(1) is 1.7768450...e-18
        assert!((s.lo() - 1.776845092935536e-18).abs() < 1e-30);
    }

    #[test]
    fn test_cos_one() {
        // cos(1) = 0.5403023058681397174009366074429766037...
        let c = DoubleDouble::from(1.0).cos();
        assert_eq!(c.hi(), 0.5403023058681398);
        assert!((c.lo() + 4.760954612604417e-17).abs() < 1e-30);
    }

    #[test]
    fn test_sincos_quadrants() {
        // pi/2, pi, 3pi/2 land near 1/0, 0/-1, -1/0
        let pi = dd(0x400921fb54442d18, 0x3ca1a62633145c07);
        let half = pi * DoubleDouble::from(0.5);
        let (s, c) = half.sin_cos();
        assert!((s.hi() - 1.0).abs() < 1e-31);
        assert!(c.hi().abs() < 1e-32);
        let (s, c) = pi.sin_cos();
        assert!(s.hi().abs() < 1e-32);
        assert!((c.hi() + 1.0).abs() < 1e-31);
    }

    #[test]
    fn test_pythagorean_identity() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..200 {
            let x = DoubleDouble::from(rng.random_range(-20.0..20.0));
            let (s, c) = x.sin_cos();
            let one = s.square() + c.square();
            let err = one - DoubleDouble::from(1.0);
            assert!(err.hi().abs() < 1e-30, "x = {:?}", x);
        }
    }

    #[test]
    fn test_sincos_large_argument() {
        // sin/cos of 63*2^50 against independently computed values
        let x = DoubleDouble::from(63.0 * 1125899906842624.0);
        let (s, c) = x.sin_cos();
        let sin_ref = DoubleDouble::from_parts(
            8700223823437620.0 / 9007199254740992.0,
            -7046851665223794.0 * f64::from_bits(0x3910000000000000),
        );
        let cos_ref = DoubleDouble::from_parts(
            4662936343848225.0 / 18014398509481984.0,
            4889264888245350.0 * f64::from_bits(0x3920000000000000),
        );
        assert!(s.diff_ulp(&sin_ref, sin_ref.ulp()) <= 1.0);
        assert!(c.diff_ulp(&cos_ref, cos_ref.ulp()) <= 1.0);
    }
}
