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

//! Argument reduction modulo pi/2 (and 2*pi) with a centered quadrant.

use crate::common::{POW_2_MANTISSA, POW_2_MANTISSAHALF, frexp_k, ldexp_k};
use crate::dd::DoubleDouble;
use crate::eft::{fast_two_sum, split, two_sum};
use crate::hires::{HALFPI, INVTWOPI, PI};
use crate::triple::{Triple, sloppy_prod};

const BLOCK_START: i32 = -29;
const BLOCK_SIZE: i32 = 27;
const BLOCK_COUNT: i32 = 64;

/// Reduces `angle` mod pi/2 and returns the "centered" quadrant, so
///
/// ```text
///   |r0| <= pi/4    and    angle = r + quadrant*(pi/2) + m*(2*pi)
/// ```
///
/// for some unspecified integer m.  An angle of `2*pi - eps` with
/// `0 < eps < pi/4` therefore comes back as `r = -eps, quadrant = 0`.
/// Reduction modulo other power-of-two multiples of pi/4 works by pre-
/// and post-scaling the input, which is how [`DoubleDouble::reduce_mod_two_pi`]
/// uses this routine.
///
/// No handling for non-finite values; callers check first.
pub(crate) fn circle_reduce(angle: DoubleDouble) -> (Triple, i32) {
    if angle.hi.abs() < PI[0] / 4.0
        || (angle.hi == -PI[0] / 4.0 && angle.lo > -PI[1] / 4.0)
        || (angle.hi == PI[0] / 4.0
            && (angle.lo < PI[1] / 4.0 || (angle.lo == PI[1] / 4.0 && 0.0 <= PI[2])))
    {
        return ((angle.hi, angle.lo, 0.0), 0);
    }

    if angle.hi.abs() <= 1e8 {
        // Reduce by subtraction, which is quicker for small angles and
        // skips the triple-double multiplication at the end (that
        // multiply alone can cost up to 20 ULP).  Valid while the
        // nearest multiple of pi/2 fits in a half-width mantissa.
        let block_scale = 1.0 / POW_2_MANTISSAHALF;

        let mut p0 = angle.hi;
        let mut p1 = angle.lo;
        let mut p2;
        let mut m = (0.5 + 2.0 * p0 / PI[0]).floor();
        // If 2*p0/pi is very close to a half integer then m may not be
        // the absolutely closest integer without looking at p1; the
        // +/- pi/4 fixup below covers that.

        let mut quadrant = (4.0 * (0.25 * m).fract()) as i32;
        if quadrant < 0 {
            quadrant += 4;
        }

        // Subtract m*(pi/2); m and the halfpi chunks are half-width,
        // so each product is exact.
        m = -m;

        let mut t0 = m * HALFPI[0];
        p0 += t0; // Exact; t0 is close to p0
        (p0, p1) = fast_two_sum(p0, p1);

        t0 = m * HALFPI[1];
        (p0, t0) = two_sum(p0, t0);
        (p1, p2) = two_sum(p1, t0);
        (p0, p1) = fast_two_sum(p0, p1);
        (p1, p2) = fast_two_sum(p1, p2);

        let c = 2.0 * POW_2_MANTISSA * block_scale;
        let mut checkval = c * c * c * m.abs();
        for chunk in HALFPI.iter().skip(2) {
            t0 = m * chunk;
            (p0, t0) = two_sum(p0, t0);
            (p1, t0) = two_sum(p1, t0);
            p2 += t0;
            (p0, p1) = fast_two_sum(p0, p1);
            (p1, p2) = fast_two_sum(p1, p2);
            if p0.abs() > checkval {
                break;
            }
            checkval *= block_scale;
        }

        if p0 > PI[0] / 4.0
            || (p0 == PI[0] / 4.0 && p1 > PI[1] / 4.0)
            || (p0 == PI[0] / 4.0 && p1 == PI[1] / 4.0 && p2 > PI[2] / 4.0)
        {
            // p is too big
            p0 -= PI[0] / 2.0; // Exact
            let ptmp;
            (p1, ptmp) = two_sum(p1, -PI[1] / 2.0);
            p2 += ptmp - PI[2] / 2.0;
            quadrant += 1;
            if quadrant > 3 {
                quadrant -= 4;
            }
        } else if p0 < -PI[0] / 4.0
            || (p0 == -PI[0] / 4.0 && p1 < -PI[1] / 4.0)
            || (p0 == -PI[0] / 4.0 && p1 == -PI[1] / 4.0 && p2 <= -PI[2] / 4.0)
        {
            // -p is too big
            p0 += PI[0] / 2.0; // Exact
            let ptmp;
            (p1, ptmp) = two_sum(p1, PI[1] / 2.0);
            p2 += ptmp + PI[2] / 2.0;
            quadrant -= 1;
            if quadrant < 0 {
                quadrant += 4;
            }
        }

        return ((p0, p1, p2), quadrant);
    }

    // Large angles: multiply by 1/(2*pi), keeping only the portion of
    // the product below 1 in absolute value, extending block products
    // until triple-double precision is reached.
    let block_scale = 1.0 / POW_2_MANTISSAHALF;
    let start_scale = block_scale / 4.0; // 2^BLOCK_START

    // Split the import into four half-width pieces; each piece times
    // 2^(xN_exp) is an integer, so each block product below is exact.
    let (a0_mant, x0e) = frexp_k(angle.hi);
    let (a1_mant, x2e) = frexp_k(angle.lo);
    let (mut x0, mut x1) = split(a0_mant);
    let (mut x2, mut x3) = split(a1_mant);

    // |angle.hi| >= pi/4 here, so offblk0 >= -1 and offblk1 >= -2.
    let x1_exp = x0e - 53;
    let x0_exp = x0e - 27;
    let offblk1 = (x1_exp + BLOCK_START + BLOCK_SIZE) / BLOCK_SIZE;
    let offblk0 = (x0_exp + BLOCK_START + BLOCK_SIZE) / BLOCK_SIZE;
    debug_assert!(offblk0 + 8 <= BLOCK_COUNT);

    let x3_exp = x2e - 53;
    let x2_exp = x2e - 27;
    let offblk3 = (x3_exp + BLOCK_START + BLOCK_SIZE) / BLOCK_SIZE;
    let offblk2 = (x2_exp + BLOCK_START + BLOCK_SIZE) / BLOCK_SIZE;

    let mut p0 = 0.0;
    let mut p1 = 0.0;
    let mut p2 = 0.0;

    x0 = ldexp_k(x0, x0_exp - offblk0 * BLOCK_SIZE + 27);
    x1 = ldexp_k(x1, x1_exp - offblk1 * BLOCK_SIZE + 53);

    if offblk0 >= 0 {
        p0 = x0 * start_scale * INVTWOPI[offblk0 as usize];
    }
    if offblk0 + 1 >= 0 {
        p1 = x0 * start_scale * block_scale * INVTWOPI[(offblk0 + 1) as usize];
        if x0 >= 0.0 {
            p0 -= p0.floor();
            p1 -= p1.floor();
        } else {
            p0 -= p0.ceil();
            p1 -= p1.ceil();
        }
        (p0, p1) = two_sum(p0, p1);
    }

    let mut t0 = 0.0;
    if offblk1 >= 0 {
        t0 = x1 * start_scale * INVTWOPI[offblk1 as usize];
    }
    if offblk1 + 1 >= 0 {
        let mut t1 = x1 * start_scale * block_scale * INVTWOPI[(offblk1 + 1) as usize];
        if x1 >= 0.0 {
            t0 -= t0.floor();
            t1 -= t1.floor();
        } else {
            t0 -= t0.ceil();
            t1 -= t1.ceil();
        }
        (p0, t0) = two_sum(p0, t0);
        (p1, t0) = two_sum(p1, t0);
        p2 += t0;
        (p0, t1) = two_sum(p0, t1);
        (p1, t1) = two_sum(p1, t1);
        p2 += t1;
    }

    x2 = ldexp_k(x2, x2_exp - offblk2 * BLOCK_SIZE + 27);
    x3 = ldexp_k(x3, x3_exp - offblk3 * BLOCK_SIZE + 53);

    let mut t0 = 0.0;
    if offblk2 >= 0 {
        t0 = x2 * start_scale * INVTWOPI[offblk2 as usize];
    }
    if offblk2 + 1 >= 0 {
        let mut t1 = x2 * start_scale * block_scale * INVTWOPI[(offblk2 + 1) as usize];
        if x2 >= 0.0 {
            t0 -= t0.floor();
            t1 -= t1.floor();
        } else {
            t0 -= t0.ceil();
            t1 -= t1.ceil();
        }
        (p0, t0) = two_sum(p0, t0);
        (p1, t0) = two_sum(p1, t0);
        p2 += t0;
        (p0, t1) = two_sum(p0, t1);
        (p1, t1) = two_sum(p1, t1);
        p2 += t1;
    }

    let mut t0 = 0.0;
    if offblk3 >= 0 {
        t0 = x3 * start_scale * INVTWOPI[offblk3 as usize];
    }
    if offblk3 + 1 >= 0 {
        let mut t1 = x3 * start_scale * block_scale * INVTWOPI[(offblk3 + 1) as usize];
        if x3 >= 0.0 {
            t0 -= t0.floor();
            t1 -= t1.floor();
        } else {
            t0 -= t0.ceil();
            t1 -= t1.ceil();
        }
        (p0, t0) = two_sum(p0, t0);
        (p1, t0) = two_sum(p1, t0);
        p2 += t0;
        (p0, t1) = two_sum(p0, t1);
        (p1, t1) = two_sum(p1, t1);
        p2 += t1;
    }

    if p0.abs() > 0.5 {
        p0 -= p0.floor();
        if p0 > 0.5 {
            p0 -= 1.0;
        }
    }

    // The products above are by 1/(2*pi).  Shift to 1/(pi/2) now and
    // pull out the quadrant, so the quadrant offset doesn't eat into
    // the low-order bits.
    p0 *= 4.0;
    p1 *= 4.0;
    p2 *= 4.0;
    let mut quadrant: i32 = 0;
    if p0.abs() > 0.5 {
        let fq = p0.floor();
        quadrant = fq as i32;
        p0 -= fq;
        if p0 > 0.5 {
            p0 -= 1.0;
            quadrant += 1;
        }
    }
    (p0, p1) = fast_two_sum(p0, p1);
    (p1, p2) = fast_two_sum(p1, p2);

    let h = POW_2_MANTISSAHALF;
    let checkval = h * h * h * h * h * h * h * h / (4.0 * start_scale);
    let mut scale = 4.0 * block_scale * block_scale * start_scale;

    // offblk0 and offblk1 are >= -2, so offblk0+i and offblk1+i are
    // >= 0 from here on.  The scale exponent carries a +2 because the
    // multiplier is now 1/(pi/2) rather than 1/(2*pi).
    let mut i = 2;
    while p0.abs() < checkval * scale && offblk0 + i < BLOCK_COUNT {
        let mut ta = x0 * INVTWOPI[(offblk0 + i) as usize] * scale;
        (p0, ta) = two_sum(p0, ta);
        (p1, ta) = two_sum(p1, ta);
        p2 += ta;

        let mut tb = x1 * INVTWOPI[(offblk1 + i) as usize] * scale;
        (p0, tb) = two_sum(p0, tb);
        (p1, tb) = two_sum(p1, tb);
        p2 += tb;

        if offblk2 + i >= 0 {
            let mut tc = x2 * INVTWOPI[(offblk2 + i) as usize] * scale;
            (p0, tc) = two_sum(p0, tc);
            (p1, tc) = two_sum(p1, tc);
            p2 += tc;
        }

        if offblk3 + i >= 0 {
            let mut td = x3 * INVTWOPI[(offblk3 + i) as usize] * scale;
            (p0, td) = two_sum(p0, td);
            (p1, td) = two_sum(p1, td);
            p2 += td;
        }

        if p0.abs() > 0.5 {
            let fq = p0.floor();
            quadrant += fq as i32;
            p0 -= fq; // Exact
            if p0 > 0.5 {
                p0 -= 1.0; // Exact
                quadrant += 1;
            }
        }

        (p0, p1) = fast_two_sum(p0, p1);
        (p1, p2) = fast_two_sum(p1, p2);

        scale *= block_scale;
        i += 1;
    }

    // Boundary cases
    if p0 == 0.5 && p1 > 0.0 {
        p0 -= 1.0;
        quadrant += 1;
    } else if p0 == -0.5 && p1 <= 0.0 {
        p0 += 1.0;
        quadrant -= 1;
    }

    // (p0,p1,p2) is now the fractional part of angle/(pi/2).
    quadrant %= 4;
    if quadrant < 0 {
        quadrant += 4;
    }

    // The final multiply costs more ULPs than everything above it
    // combined.
    let r = sloppy_prod((p0, p1, p2), (0.5 * PI[0], 0.5 * PI[1], 0.5 * PI[2]));
    debug_assert!(r.0.abs() <= PI[0] / 4.0);
    (r, quadrant)
}

impl DoubleDouble {
    /// Reduces the value modulo 2*pi into (-pi, pi].
    pub fn reduce_mod_two_pi(self) -> Self {
        if !self.hi.is_finite() {
            return DoubleDouble::from_parts(f64::NAN, f64::NAN);
        }
        if self.hi.abs() < PI[0] {
            return self;
        }
        // Reduction mod pi/2 turns into reduction mod 2*pi with a
        // prescale by 1/4 and postscale by 4; the magnitude check
        // above protects the prescale from underflow.
        let tmp = DoubleDouble::from_parts(self.hi * 0.25, self.lo * 0.25);
        let ((r0, r1, _), _) = circle_reduce(tmp);
        DoubleDouble::from_parts(r0 * 4.0, r1 * 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_path_small_angle() {
        let a = DoubleDouble::from(0.5);
        let ((r0, r1, r2), q) = circle_reduce(a);
        assert_eq!(r0, 0.5);
        assert_eq!(r1, 0.0);
        assert_eq!(r2, 0.0);
        assert_eq!(q, 0);
    }

    #[test]
    fn test_fast_path_negative_boundary() {
        // A low word nudged inside -pi/4 stays put in quadrant 0.  The
        // nudge must exceed half an ulp of the low word (about 3e-33
        // here) or it rounds away in the f64 sum.
        let a = DoubleDouble::from_parts(-PI[0] / 4.0, -PI[1] / 4.0 + 1e-32);
        let ((r0, ..), q) = circle_reduce(a);
        assert_eq!(r0, -PI[0] / 4.0);
        assert_eq!(q, 0);
        // The two stored limbs alone sit just below -pi/4 (the third
        // limb of pi is negative), so the exact pair wraps by +pi/2
        // into quadrant 3.
        let b = DoubleDouble::from_parts(-PI[0] / 4.0, -PI[1] / 4.0);
        let ((s0, ..), sq) = circle_reduce(b);
        assert_eq!(s0, PI[0] / 4.0);
        assert_eq!(sq, 3);
    }

    #[test]
    fn test_subtraction_path_pi() {
        // pi reduces to the tail beyond the two stored limbs, in
        // quadrant 2
        let a = DoubleDouble::from_parts(PI[0], PI[1]);
        let ((r0, ..), q) = circle_reduce(a);
        assert_eq!(q, 2);
        assert!((r0 + PI[2]).abs() < 1e-45);
    }

    #[test]
    fn test_subtraction_path_three_half_pi() {
        // 3*(pi/2) lands in quadrant 3
        let t = DoubleDouble::from_parts(PI[0], PI[1]) * DoubleDouble::from(1.5);
        let ((r0, ..), q) = circle_reduce(t);
        assert_eq!(q, 3);
        assert!(r0.abs() < 1e-30);
    }

    #[test]
    fn test_reduce_mod_two_pi_moderate() {
        // 20*pi + 1 comes back to ~1
        let pi = DoubleDouble::from_parts(PI[0], PI[1]);
        let a = pi * DoubleDouble::from(20.0) + DoubleDouble::from(1.0);
        let r = a.reduce_mod_two_pi();
        assert!((r.hi() - 1.0).abs() < 1e-30);
    }

    #[test]
    fn test_reduce_mod_two_pi_specials() {
        assert!(DoubleDouble::from(f64::NAN).reduce_mod_two_pi().hi().is_nan());
        assert!(DoubleDouble::from(f64::INFINITY).reduce_mod_two_pi().hi().is_nan());
        // Values already inside (-pi, pi) pass through untouched
        let a = DoubleDouble::from(3.0);
        assert_eq!(a.reduce_mod_two_pi(), a);
    }

    #[test]
    fn test_block_path_stays_bounded() {
        for &x in &[1e9, 1e16, 63.0 * 1125899906842624.0, 1e300] {
            let ((r0, r1, _), q) = circle_reduce(DoubleDouble::from(x));
            assert!(r0.abs() <= PI[0] / 4.0, "x = {x}");
            assert!(r1.abs() <= r0.abs().max(1e-300), "x = {x}");
            assert!((0..4).contains(&q), "x = {x}");
        }
    }

    #[test]
    fn test_block_path_matches_subtraction_near_crossover() {
        // Just below 1e8 uses subtraction; scaled copies of the same
        // angle plus whole turns must land on the same remainder to
        // double-double accuracy.  2^27 turns of 2*pi added to x keeps
        // the fractional part, so compare x against x + n*2pi computed
        // in double-double.
        let x = DoubleDouble::from(12345678.0);
        let ((s0, s1, _), sq) = circle_reduce(x);
        let pi = DoubleDouble::from_parts(PI[0], PI[1]);
        let big = x + pi * DoubleDouble::from(2.0e9);
        assert!(big.hi() > 1e8);
        let ((b0, b1, _), bq) = circle_reduce(big);
        // Two error sources: the double-double pi is only good to
        // ~2^-106 and we take 2e9 multiples of it, and the product
        // itself rounds at an ulp of 6.3e9 (about 8e-23).
        assert_eq!(sq, bq);
        let d = DoubleDouble::from_parts(s0, s1) - DoubleDouble::from_parts(b0, b1);
        assert!(d.hi().abs() < 1e-22);
    }
}
