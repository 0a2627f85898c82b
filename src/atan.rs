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

//! Double-double arctangent via sin/cos plus one modified Halley step.

use crate::dd::DoubleDouble;
use crate::eft::fast_two_sum;
use crate::hires::PI;
use crate::sincos::sincos_core;
use crate::triple::{neg3, sloppy_prod, three_increment, three_sum};

// Below this a two-term series is both faster and more accurate than
// the Halley iteration.
const SMALL_CHECK: f64 = 9.53674316e-7;

#[inline]
fn atan_seed(v: f64) -> f64 {
    pxfm::f_atan2(v, 1.0)
}

impl DoubleDouble {
    /// Computes the arctangent, in (-pi/2, pi/2).
    pub fn atan(self) -> Self {
        if self.hi.is_nan() {
            return DoubleDouble::from_parts(f64::NAN, f64::NAN);
        }
        if !(-1e40 <= self.hi && self.hi <= 1e40) {
            // Inputs this big round to +/- pi/2 anyway, and the
            // construction also captures the infinities
            let mut r = DoubleDouble::HALF_PI;
            if self.hi < -1e40 {
                r = -r;
            }
            return r;
        }

        if self.hi.abs() < SMALL_CHECK {
            // atan(x) = x - x^3/3 + x^5/5, regrouped
            let xsq = self.square();
            let mut sum = xsq * 3.0 - 5.0;
            sum = sum * xsq;
            sum /= 15.0;
            let s = three_increment((sum.hi, sum.lo, 0.0), 1.0);
            let s = sloppy_prod(s, (self.hi, self.lo, 0.0));
            return DoubleDouble::from_parts(s.0, s.1);
        }

        // Normal case, using modified Halley.  The seed only needs
        // single-double accuracy; sin and cos of it come back with a
        // bit better than double-double accuracy so "delta" below is
        // good to the full width.
        let flip;
        let mut offset = (0.0, 0.0, 0.0);
        let x0;
        let sinx0;
        let cosx0;
        if self.hi.abs() <= 1.0 {
            // The "1.0" bound could be raised a good bit and still
            // keep full double-double accuracy
            flip = false;
            x0 = atan_seed(self.hi);
            (sinx0, cosx0) = sincos_core(DoubleDouble::from(x0));
        } else {
            // Work with the complementary angle
            flip = true;
            let x = atan_seed(1.0 / self.hi);
            offset = if self.hi > 0.0 {
                (0.5 * PI[0], 0.5 * PI[1], 0.5 * PI[2])
            } else {
                (-0.5 * PI[0], -0.5 * PI[1], -0.5 * PI[2])
            };
            (cosx0, sinx0) = sincos_core(DoubleDouble::from(x));
            x0 = -x;
        }

        // Newton step.  There is significant cancellation in the
        // three-sum.
        let delta = sloppy_prod((self.hi, self.lo, 0.0), cosx0);
        let delta = three_sum(delta, neg3(sinx0));

        let mut adj_a = DoubleDouble::from_parts(delta.0, delta.1)
            * DoubleDouble::from_parts(cosx0.0, cosx0.1);

        // Halley adjustment, single-double is enough
        let adj_b = -adj_a.hi * delta.0 * sinx0.0;
        adj_a += adj_b;

        if !flip {
            let (r0, r1) = fast_two_sum(x0, adj_a.hi);
            DoubleDouble::from_parts(r0, r1 + adj_a.lo)
        } else {
            // Extra care to carry full accuracy through the sum with
            // +/- pi/2
            let (r0, r1) = fast_two_sum(x0, adj_a.hi);
            let (r1, r2) = fast_two_sum(r1, adj_a.lo);
            let r = three_sum(offset, (r0, r1, r2));
            DoubleDouble::from_parts(r.0, r.1)
        }
    }

    /// Computes atan2(self, x), placing the angle in the correct
    /// quadrant.  Slightly less accurate than [`DoubleDouble::atan`];
    /// full accuracy would require carrying the quotient at
    /// triple-double width.
    pub fn atan2(self, x: DoubleDouble) -> Self {
        if self.hi.is_nan() || x.hi.is_nan() {
            return DoubleDouble::from_parts(f64::NAN, f64::NAN);
        }

        // Corner cases first
        if self.hi == 0.0 && x.hi == 0.0 {
            return DoubleDouble::from(0.0);
        }
        if self.hi == 0.0 {
            if x.hi > 0.0 {
                return self; // Keeps the signed zero
            }
            return DoubleDouble::PI;
        }
        if x.hi == 0.0 {
            if self.hi > 0.0 {
                return DoubleDouble::HALF_PI;
            }
            return -DoubleDouble::HALF_PI;
        }

        if self.hi.abs() <= x.hi.abs() {
            // Division won't be cranky
            let result = (self / x).atan();
            if x.hi > 0.0 {
                return result; // atan answers in the right quadrant
            }
            if self.hi > 0.0 {
                return result + DoubleDouble::PI; // x < 0, y > 0
            }
            return result - DoubleDouble::PI; // x < 0, y < 0
        }

        // Otherwise invert the division and subtract from +/- pi/2
        let base = if self.hi < 0.0 {
            -DoubleDouble::HALF_PI
        } else {
            DoubleDouble::HALF_PI
        };
        base - (x / self).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atan_one() {
        // atan(1) = pi/4
        let a = DoubleDouble::from(1.0).atan();
        assert_eq!(a.hi(), 0.7853981633974483);
        assert!((a.lo() - 3.061616997868383e-17).abs() < 1e-31);
    }

    #[test]
    fn test_atan_half() {
        let a = DoubleDouble::from(0.5).atan();
        assert_eq!(a.hi(), 0.4636476090008061);
        assert!((a.lo() - 2.2698777452961687e-17).abs() < 1e-31);
    }

    #[test]
    fn test_atan_flip_path() {
        // |x| > 1 goes through the complementary-angle branch
        let a = DoubleDouble::from(3.0).atan();
        assert_eq!(a.hi(), 1.2490457723982544);
        assert!((a.lo() + 2.196203799612311e-18).abs() < 1e-32);
        let b = DoubleDouble::from(-3.0).atan();
        assert_eq!(b, -a);
    }

    #[test]
    fn test_atan_tiny() {
        // Series branch: atan(x) = x - x^3/3
        let a = DoubleDouble::from(1e-10).atan();
        assert_eq!(a.hi(), 1e-10);
        assert!((a.lo() + 1e-30 / 3.0).abs() < 1e-44);
    }

    #[test]
    fn test_atan_huge_and_specials() {
        let a = DoubleDouble::from(1e50).atan();
        assert_eq!(a, DoubleDouble::HALF_PI);
        let b = DoubleDouble::from(f64::NEG_INFINITY).atan();
        assert_eq!(b, -DoubleDouble::HALF_PI);
        assert!(DoubleDouble::from(f64::NAN).atan().hi().is_nan());
    }

    #[test]
    fn test_atan_tan_roundtrip() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..100 {
            let x = DoubleDouble::from(rng.random_range(-1.5..1.5));
            let (s, c) = x.sin_cos();
            let r = (s / c).atan();
            let err = r - x;
            assert!(err.hi().abs() < 1e-30, "x = {:?}", x);
        }
    }

    #[test]
    fn test_atan2_quadrants() {
        let one = DoubleDouble::from(1.0);
        let q1 = one.atan2(one);
        assert_eq!(q1.hi(), 0.7853981633974483);
        let q2 = one.atan2(-one);
        assert_eq!(q2.hi(), 2.356194490192345);
        assert!((q2.lo() - 9.184850993605148e-17).abs() < 1e-30);
        let q3 = (-one).atan2(-one);
        assert_eq!(q3, -q2);
        let q4 = (-one).atan2(one);
        assert_eq!(q4, -q1);
    }

    #[test]
    fn test_atan2_axes() {
        let zero = DoubleDouble::from(0.0);
        let two = DoubleDouble::from(2.0);
        assert_eq!(zero.atan2(zero), zero);
        assert_eq!(zero.atan2(two), zero);
        assert_eq!(zero.atan2(-two), DoubleDouble::PI);
        assert_eq!(two.atan2(zero), DoubleDouble::HALF_PI);
        assert_eq!((-two).atan2(zero), -DoubleDouble::HALF_PI);
    }

    #[test]
    fn test_atan2_signed_zero_y() {
        let y = DoubleDouble::from(-0.0);
        let r = y.atan2(DoubleDouble::from(3.0));
        assert_eq!(r.hi(), 0.0);
        assert!(r.hi().is_sign_negative());
    }

    #[test]
    fn test_atan2_nan() {
        assert!(
            DoubleDouble::from(f64::NAN)
                .atan2(DoubleDouble::from(1.0))
                .hi()
                .is_nan()
        );
        assert!(
            DoubleDouble::from(1.0)
                .atan2(DoubleDouble::from(f64::NAN))
                .hi()
                .is_nan()
        );
    }
}
