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

//! Double-double exponentials via the sinh power series.

use crate::common::{HUGE_EXP, POW_2_MANTISSA, TINY_EXP, VERYTINY, VERYTINY_EXP, ldexp_k};
use crate::dd::DoubleDouble;
use crate::eft::{fast_two_sum, two_prod, two_sum};
use crate::hires::LOG2;
use crate::arith::rescale3;
use crate::triple::{Triple, sloppy_prod, sloppy_square, three_increment, three_sum};

// Largest input with a finite exp: the max representable value is just
// under 2^1024 and log(2^1024) < 710.  The smallest representable
// value > 0 is just under 2^-1074, so the smallest non-trivial input
// is -1075*log(2) > -746 (the asymmetry is from denormals).
const MAX_INVAL: f64 = 709.78271289338409;
const MIN_INVAL: f64 = -745.13321910194134;

/// Base computation for exp and expm1 via power series.  Returns
/// `(y, m)` with `y + 1 = e^inval * 2^(-m)` carried as a word triple.
/// The 2^m unscaling is left to the caller because for best precision
/// it has to be handled differently in expm1 than in exp.
///
/// The input is reduced as `inval = m*log(2) + r` with
/// `|r| <= 0.5*log(2)`, so `-0.293 < y < 0.42`.  Error is close to
/// 0.5 ULP.
///
/// Does not handle NaN; callers check finiteness first.
pub(crate) fn exp_base(inval: DoubleDouble) -> (Triple, i32) {
    if inval.hi >= MAX_INVAL {
        // Some inputs just under MAX_INVAL also overflow; the code
        // below computes y correctly for those but y * 2^m overflows.
        // The caller handles that border case.
        return ((f64::INFINITY, f64::INFINITY, f64::INFINITY), 0);
    }
    if inval.hi <= MIN_INVAL {
        // Mirror of the overflow note: inputs just over MIN_INVAL can
        // still flush to zero when the caller applies 2^m.
        return ((-1.0, 0.0, 0.0), 0);
    }
    if inval.hi == 0.0 {
        return ((0.0, 0.0, 0.0), 0);
    }

    // Break x = m*log(2) + r.  Like the reduction mod 2*pi in the
    // trigonometric code, but the input range here is small enough
    // that three chunks of log(2) suffice.
    let m = (0.5 + inval.hi / LOG2[0]).floor();
    let mut r0 = inval.hi;
    let mut r1 = inval.lo;
    let mut r2;
    let (tr0a, tr0b) = two_prod(m, LOG2[0]);
    let (tr1a, tr1b) = two_prod(m, LOG2[1]);
    let mut tr2 = m * LOG2[2];
    r0 -= tr0a; // 1/2 <= |r0/tr0a| <= 2, so this difference is exact
    let (tr0b, tr1a) = two_sum(tr0b, tr1a);
    tr2 += tr1a + tr1b;
    (r1, r2) = two_sum(r1, -tr0b);
    (r0, r1) = two_sum(r0, r1);
    r2 -= tr2;
    // The ordered sums shift up zeros in r, which occur when inval is
    // close to an integral multiple of log(2).
    (r1, r2) = fast_two_sum(r1, r2);
    (r0, r1) = fast_two_sum(r0, r1);
    debug_assert!(r0.abs() < 0.347);

    // Scale to range for fast series convergence
    let mut kreduction = 0;
    while r0.abs() > 16.0 * 0.0034 {
        r0 /= 16.0;
        r1 /= 16.0;
        r2 /= 16.0;
        kreduction += 4;
    }
    while r0.abs() > 0.0034 {
        r0 /= 2.0;
        r1 /= 2.0;
        r2 /= 2.0;
        kreduction += 1;
    }

    let mut sum;
    let eps = f64::EPSILON;
    if r0.abs() < eps * eps * eps / 8.0 {
        // Only the first term of the exp(r)-1 series has any impact
        sum = (r0, r1, r2);
    } else {
        // Use the sinh series through r^12; the extra terms buy a few
        // digits that push down rounding error (the bound is 0.5 ULP
        // plus series truncation).
        let rsq = sloppy_square((r0, r1, r2));
        let rsq_dd = DoubleDouble::from_parts(rsq.0, rsq.1);
        // Leading terms at single-double precision
        let mut s0 = rsq.0 / 110.0;
        s0 += 1.0;
        s0 *= rsq.0;
        s0 /= 72.0;
        // Middle terms at double-double
        let mut s = DoubleDouble::from(s0);
        s += 1.0;
        s = s * rsq_dd;
        s /= 42.0;
        s += 1.0;
        s = s * rsq_dd;
        s /= 20.0;
        s += 1.0;
        s = s * rsq_dd;
        s /= 6.0;
        // Finish at triple-double
        sum = sloppy_prod((s.hi, s.lo, 0.0), (r0, r1, r2));
        sum = three_sum(sum, (r0, r1, r2));
        // sum is now sinh(r); convert through
        // exp(r) - 1 = sinh(r) + sinh^2(r)/(1+sqrt(1+sinh^2(r)))
        let t1 = sloppy_square(sum);
        let mut t2 = DoubleDouble::from_parts(t1.0, t1.1) + 1.0;
        t2 = t2.sqrt();
        t2 += 1.0;
        // First approximation to the quotient, then one Newton step
        let q = DoubleDouble::from_parts(t1.0, t1.1) / t2;
        let mut q2 = t1.2 / t2.hi;
        let mut t = sloppy_square((q.hi, q.lo, q2));
        t = three_sum(t, (2.0 * q.hi, 2.0 * q.lo, 2.0 * q2));
        debug_assert!(t1.0 == t.0);
        let d1 = t1.1 - t.1;
        let d2 = t1.2 - t.2;
        q2 += (d1 + d2) / (2.0 * (1.0 + q.hi));
        sum = three_sum(sum, (q.hi, q.lo, q2));
    }

    // Unscale through exp(2x)-1 = (exp(x)-1)^2 + 2*(exp(x)-1)
    for _ in 0..kreduction {
        let z = sloppy_square(sum);
        sum = three_sum((2.0 * sum.0, 2.0 * sum.1, 2.0 * sum.2), z);
    }

    (sum, m as i32)
}

impl DoubleDouble {
    /// Computes e^x.
    pub fn exp(self) -> Self {
        if !self.hi.is_finite() {
            if self.hi == f64::NEG_INFINITY {
                return DoubleDouble::from_parts(0.0, 0.0);
            }
            return DoubleDouble::from_parts(self.hi, self.hi);
        }
        let (mut y, m) = exp_base(self);
        // If the result is finite then -0.293 < y < 0.42 and
        // TINY_EXP - 53 <= m <= HUGE_EXP
        if m == VERYTINY_EXP - 1 && y.0 > 0.0 {
            // Result is below the smallest denormal but rounds up to it
            return DoubleDouble::from_parts(VERYTINY, 0.0);
        }
        if !y.0.is_finite() {
            return DoubleDouble::from_parts(y.0, y.1);
        }
        y = three_increment(y, 1.0);
        if m < HUGE_EXP {
            if m >= TINY_EXP + 2 + 53 + 14 {
                // The "14" allows for non-adjacency of the two words
                let scale = ldexp_k(1.0, m);
                DoubleDouble::from_parts(y.0 * scale, y.1 * scale)
            } else {
                // Underflow rounding error can occur between the
                // words of y.  Extract the rounding error and put it
                // back as a single word.  Prescaling by 2^53 keeps
                // the divide inside rescale3 away from a zero 2^m.
                let scale = ldexp_k(1.0, m + 53);
                rescale3(
                    y.0 / POW_2_MANTISSA,
                    y.1 / POW_2_MANTISSA,
                    y.2 / POW_2_MANTISSA,
                    scale,
                )
            }
        } else {
            let a0 = ldexp_k(y.0, m);
            let a1 = if a0.is_finite() { ldexp_k(y.1, m) } else { a0 };
            DoubleDouble::from_parts(a0, a1)
        }
    }

    /// Computes e^x - 1.
    ///
    /// With double-double storage this matters less than with a
    /// contiguous mantissa, since the low word of `1 + small` does not
    /// have to lie adjacent to 1.0, but the dedicated entry point is
    /// still considerably more accurate for small x.
    pub fn exp_m1(self) -> Self {
        if !self.hi.is_finite() {
            if self.hi == f64::NEG_INFINITY {
                return DoubleDouble::from_parts(-1.0, 0.0);
            }
            return DoubleDouble::from_parts(self.hi, self.hi);
        }
        let (y, m) = exp_base(self);
        if m == 0 {
            return DoubleDouble::from_parts(y.0, y.1);
        }

        if m > 2 * 53 + 20 {
            // (y+1)*2^m dwarfs the trailing -1, so the -1 folds into
            // the bottom word without touching the top.  m > 1 here,
            // so shaving one power of two off the scale protects
            // against overflow at m == HUGE_EXP.
            let y = three_increment(y, 1.0);
            let shaved = ldexp_k(1.0, m - 1);
            let mut a0 = y.0 * 2.0;
            let mut a1 = y.1 * shaved;
            a0 *= shaved;
            a1 = 2.0 * a1 - 1.0;
            if !a0.is_finite() {
                a1 = a0;
            }
            return DoubleDouble::from_parts(a0, a1);
        }

        let scale = ldexp_k(1.0, m);
        if m < -53 - 1 {
            // Here the -1 dominates, so only the hi word of y+1 is
            // needed
            let ydd = DoubleDouble::from_parts(y.0, y.1) + 1.0;
            return DoubleDouble::from_parts(-1.0, ydd.hi * scale);
        }

        // Moderate |m|: compute ((1 - 2^-m) + y) * 2^m, which needs
        // only a single triple-sum.  Neither the adjustment nor the
        // final scaling can overflow.
        let y = three_sum(y, (1.0, -1.0 / scale, 0.0));
        DoubleDouble::from_parts(y.0 * scale, y.1 * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_zero_and_one() {
        assert_eq!(DoubleDouble::from(0.0).exp(), DoubleDouble::from(1.0));
        let e = DoubleDouble::from(1.0).exp();
        assert_eq!(e.hi(), 2.718281828459045);
        assert!((e.lo() - 1.4456468917292502e-16).abs() < 1e-30);
    }

    #[test]
    fn test_exp_moderate() {
        let y = DoubleDouble::from(10.0).exp();
        assert_eq!(y.hi(), 22026.465794806718);
        assert!((y.lo() + 1.3780134700517372e-12).abs() < 1e-26);
        let y = DoubleDouble::from(-0.5).exp();
        assert_eq!(y.hi(), 0.6065306597126334);
        assert!((y.lo() + 6.593178415491414e-19).abs() < 1e-32);
    }

    #[test]
    fn test_exp_specials() {
        assert!(DoubleDouble::from(f64::NAN).exp().hi().is_nan());
        assert_eq!(
            DoubleDouble::from(f64::INFINITY).exp().hi(),
            f64::INFINITY
        );
        let z = DoubleDouble::from(f64::NEG_INFINITY).exp();
        assert_eq!(z.hi(), 0.0);
        assert!(z.hi().is_sign_positive());
    }

    #[test]
    fn test_exp_overflow_underflow() {
        assert_eq!(DoubleDouble::from(710.0).exp().hi(), f64::INFINITY);
        assert_eq!(DoubleDouble::from(MAX_INVAL).exp().hi(), f64::INFINITY);
        let z = DoubleDouble::from(-746.0).exp();
        assert_eq!(z.hi(), 0.0);
        assert!(z.hi().is_sign_positive());
    }

    #[test]
    fn test_exp_subnormal_result() {
        // exp(-744) is a denormal near 1.3e-323
        let y = DoubleDouble::from(-744.0).exp();
        assert!(y.hi() > 0.0);
        assert!(y.hi() < 1e-320);
        let check = y.hi().ln();
        assert!((check + 744.0).abs() < 0.4);
    }

    #[test]
    fn test_exp_m1_zero_and_small() {
        let z = DoubleDouble::from(0.0).exp_m1();
        assert_eq!(z.hi(), 0.0);
        let y = DoubleDouble::from(1e-20).exp_m1();
        assert_eq!(y.hi(), 1e-20);
        assert!((y.lo() - 5e-41).abs() < 1e-55);
    }

    #[test]
    fn test_exp_m1_moderate() {
        let y = DoubleDouble::from(0.25).exp_m1();
        assert_eq!(y.hi(), 0.2840254166877415);
        assert!((y.lo() + 2.133257464457841e-17).abs() < 1e-31);
    }

    #[test]
    fn test_exp_m1_large_matches_exp() {
        // m is large enough that the -1 disappears into the low word
        let x = DoubleDouble::from(200.0);
        let y = x.exp_m1();
        assert_eq!(y.hi(), 7.225973768125749e86);
        let e = x.exp();
        assert!(y.diff_ulp(&e, e.ulp()) <= 1.0);
    }

    #[test]
    fn test_exp_m1_negative_saturates() {
        let y = DoubleDouble::from(-50.0).exp_m1();
        // exp(-50) ~ 1.9e-22, so the hi word is exactly -1
        assert_eq!(y.hi(), -1.0);
        assert!(y.lo() > 0.0 && y.lo() < 2e-22);
        assert_eq!(
            DoubleDouble::from(f64::NEG_INFINITY).exp_m1(),
            DoubleDouble::from(-1.0)
        );
    }

    #[test]
    fn test_exp_log_roundtrip() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..100 {
            let x = DoubleDouble::from(rng.random_range(-20.0..20.0));
            let y = x.exp().ln();
            let err = y - x;
            assert!(err.hi().abs() < x.hi().abs().max(1.0) * 1e-31, "x = {:?}", x);
        }
    }
}
