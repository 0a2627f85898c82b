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

//! Multiplicative arithmetic for [`DoubleDouble`]: products, quotients,
//! square roots, reciprocals.  Every public entry point is correctly
//! rounded (error <= 0.5 ULP of the 106-bit result) across the full
//! f64 range, including subnormal and overflow boundaries, via
//! power-of-two pre-scaling on out-of-range operands.

use crate::common::{DD_TINY, HUGE_EXP, POW_2_MANTISSA, POW_2_MANTISSAHALF, VERYTINY_EXP, frexp_k, ldexp_k};
use crate::dd::DoubleDouble;
use crate::eft::{fast_two_sum, square_prod, two_prod, two_sum};
use std::ops::{Div, DivAssign, Mul, MulAssign};

/// Zero with the sign the product or quotient of the two factors would
/// carry.
#[inline]
pub(crate) fn get_signed_zero(afactor: f64, bfactor: f64) -> f64 {
    if afactor.is_sign_negative() == bfactor.is_sign_negative() {
        0.0
    } else {
        -0.0
    }
}

/// Squeezes three overlapping words down toward two.  Imports must
/// satisfy `|a0| >= |a1| >= |a2|`.  Callers finish with `a1 += a2`.
#[inline]
pub(crate) fn coalesce(a0: f64, a1: f64, a2: f64) -> (f64, f64, f64) {
    let u = a1 + a2;
    let v = a1 - u;
    let mut s = a0;
    let b0 = a0 + u;
    let b2 = a2 + v;
    s -= b0;
    let b1 = s + u;
    (b0, b1, b2)
}

/// Variant of [`coalesce`] that finishes the reduction to two words,
/// with a correction so that values one half-ULP off a power of two
/// round to the nearest 106-bit value rather than losing the last bit.
#[inline]
pub(crate) fn coalesce_plus(a0: f64, a1: f64, a2: f64) -> (f64, f64) {
    let x = a1 + a2;
    let mut b0 = a0 + x;
    let mut b1 = a0 - b0;
    b1 += x;
    let mut y = a1 - x;
    let mut tst = b1 * (1.0 + f64::EPSILON);
    y += a2;

    let chk = b0 + tst;
    if chk != b0 {
        // Either |b1| = ULP(b0)/2, or else |b0| = 2^n for some n.
        tst -= b1;
        if tst == b1 * f64::EPSILON {
            b0 += 2.0 * b1;
            return fast_two_sum(b0, y - b1);
        }
    }
    b1 += y;
    (b0, b1)
}

/// Applies a power-of-two `rescale` to a normalized pair, with a
/// correction pass when the scaled value lands in the subnormal range
/// and the plain products would double round.
pub(crate) fn rescale2(x: f64, y: f64, rescale: f64) -> DoubleDouble {
    let test = x * rescale;
    if !test.is_finite() {
        return DoubleDouble::from_parts(test, test);
    }
    if test.abs() < f64::MIN_POSITIVE {
        let tmp = test / rescale;
        let mut err = x - tmp;
        err += y;
        err *= rescale;
        return DoubleDouble::from_parts(test + err, 0.0);
    }
    // Even if (x,y) is normalized, (x*rescale,y*rescale) might not be
    // when y*rescale rounds in the subnormal range.
    let (u, v) = fast_two_sum(test, y * rescale);
    DoubleDouble::from_parts(u, v)
}

/// Three-word input variant of [`rescale2`].
pub(crate) fn rescale3(xi: f64, yi: f64, zi: f64, rescale: f64) -> DoubleDouble {
    let (x, y) = fast_two_sum(xi, yi);
    let (y, z) = fast_two_sum(y, zi);

    let testx = x * rescale;
    let testy = y * rescale;
    if !testx.is_finite() {
        return DoubleDouble::from_parts(testx, testx);
    }
    if testy.abs() < f64::MIN_POSITIVE {
        let tmpx = testx / rescale;
        let errx = x - tmpx;
        let tmpy = testy / rescale;
        let erry = y - tmpy;
        let err_total = (errx + erry + z) * rescale;
        let (u, v) = fast_two_sum(testx, testy + err_total);
        return DoubleDouble::from_parts(u, v);
    }
    let (u, v) = fast_two_sum(testx, testy);
    DoubleDouble::from_parts(u, v)
}

/// Pulls the exponents off both factors so their product stays well in
/// range, returning the power of two the result must be scaled back
/// by.  `Err` carries the saturated value (signed infinity or zero)
/// when the product over- or underflows outright.  Both factors are
/// rescaled identically on the `expsum` boundary cases so the routine
/// also serves [`DoubleDouble::square`].
fn multiplication_rescale(a: &mut DoubleDouble, b: &mut DoubleDouble) -> Result<f64, f64> {
    if !a.hi.is_finite() || !b.hi.is_finite() {
        return Err(a.hi * b.hi);
    }

    let (am, mut a0_exp) = frexp_k(a.hi);
    a.hi = 2.0 * am;
    a0_exp -= 1; // 1.0 <= |a.hi| < 2.0
    let (bm, mut b0_exp) = frexp_k(b.hi);
    b.hi = 2.0 * bm;
    b0_exp -= 1;
    a.lo = ldexp_k(a.lo, -a0_exp);
    b.lo = ldexp_k(b.lo, -b0_exp);
    let mut expsum = a0_exp + b0_exp;

    if expsum > HUGE_EXP - 1 {
        if expsum > HUGE_EXP {
            // Definite overflow, regardless of the low words
            return Err(if a.hi * b.hi > 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            });
        }
        // expsum == HUGE_EXP: whether the product is finite depends on
        // the low words.  Shift scaling and let the caller sort it out.
        expsum -= 2;
        a.hi *= 2.0;
        a.lo *= 2.0;
        b.hi *= 2.0;
        b.lo *= 2.0;
    } else if expsum < VERYTINY_EXP {
        if expsum < VERYTINY_EXP - 3 {
            return Err(if a.hi * b.hi > 0.0 { 0.0 } else { -0.0 });
        }
        // The product may still be non-zero; keep 2^expsum normal.
        expsum += 8;
        a.hi *= 0.0625;
        a.lo *= 0.0625;
        b.hi *= 0.0625;
        b.lo *= 0.0625;
    }
    Ok(ldexp_k(1.0, expsum))
}

/// Quotient counterpart of [`multiplication_rescale`]; the returned
/// scale is `bscale/ascale`.
fn division_rescale(a: &mut DoubleDouble, b: &mut DoubleDouble) -> Result<f64, f64> {
    if !a.hi.is_finite() || !b.hi.is_finite() {
        return Err(a.hi / b.hi);
    }

    let (am, mut a0_exp) = frexp_k(a.hi);
    a.hi = 2.0 * am;
    a0_exp -= 1; // 1.0 <= |a.hi| < 2.0
    let (bm, b0_exp) = frexp_k(b.hi);
    b.hi = bm; // 0.5 <= |b.hi| < 1.0
    a.lo = ldexp_k(a.lo, -a0_exp);
    b.lo = ldexp_k(b.lo, -b0_exp);
    let mut expdiff = a0_exp - b0_exp;

    if expdiff > HUGE_EXP - 1 {
        return Err(if a.hi * b.hi > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        });
    } else if expdiff < VERYTINY_EXP {
        if expdiff < VERYTINY_EXP - 3 {
            return Err(if a.hi * b.hi > 0.0 { 0.0 } else { -0.0 });
        }
        a.hi *= 0.00390625;
        a.lo *= 0.00390625;
        expdiff += 8;
    }
    Ok(ldexp_k(1.0, expdiff))
}

impl Mul for DoubleDouble {
    type Output = DoubleDouble;

    fn mul(self, y: DoubleDouble) -> DoubleDouble {
        let a0 = self.hi;
        let a1 = self.lo;
        let b0 = y.hi;
        let b1 = y.lo;

        let (u0, mut u1) = two_prod(a0, b0);
        let (mut s1, mut s2) = two_prod(a0, b1);

        if u0.abs() < DD_TINY || !u1.is_finite() {
            if u1.is_finite() && u0 == 0.0 {
                let z = get_signed_zero(a0, b0);
                return DoubleDouble::from_parts(z, z);
            }

            // Out-of-range operands; brute-force rescaling.
            let mut rx = self;
            let mut ry = y;
            return match multiplication_rescale(&mut rx, &mut ry) {
                Err(mut rescale) => {
                    if rescale == 0.0 {
                        rescale = get_signed_zero(a0, b0);
                    }
                    DoubleDouble::from_parts(rescale, rescale)
                }
                Ok(rescale) => {
                    let r = rx * ry;
                    let mut r = rescale2(r.hi, r.lo, rescale);
                    if r.hi == 0.0 {
                        let z = get_signed_zero(a0, b0);
                        r = DoubleDouble::from_parts(z, z);
                    }
                    r
                }
            };
        }

        (u1, s1) = two_sum(u1, s1);
        s2 += s1;
        let (t1, mut t2) = two_prod(a1, b0);
        let mut u2 = a1 * b1;
        t2 += s2;
        let tl;
        (u1, tl) = two_sum(u1, t1);
        t2 += tl;
        u2 += t2;

        let (r0, mut r1) = fast_two_sum(u0, u1);
        if !r0.is_finite() {
            return DoubleDouble::from_parts(r0, r0);
        }
        r1 += u2;
        DoubleDouble::from_parts(r0, r1)
    }
}

impl Mul<f64> for DoubleDouble {
    type Output = DoubleDouble;

    fn mul(self, x: f64) -> DoubleDouble {
        let a0 = self.hi;
        let a1 = self.lo;

        let (u0, mut u1) = two_prod(a0, x);
        let (t1, mut u2) = two_prod(a1, x);

        if u0.abs() < DD_TINY || !u1.is_finite() {
            if u1.is_finite() && u0 == 0.0 {
                let z = get_signed_zero(x, a0);
                return DoubleDouble::from_parts(z, z);
            }

            let mut ry = self;
            let mut rx = DoubleDouble::from_parts(x, 0.0);
            return match multiplication_rescale(&mut ry, &mut rx) {
                Err(mut rescale) => {
                    if rescale == 0.0 {
                        rescale = get_signed_zero(x, a0);
                    }
                    DoubleDouble::from_parts(rescale, rescale)
                }
                Ok(rescale) => {
                    let r = ry * rx.hi;
                    let mut r = rescale2(r.hi, r.lo, rescale);
                    if r.hi == 0.0 {
                        let z = get_signed_zero(x, a0);
                        r = DoubleDouble::from_parts(z, z);
                    }
                    r
                }
            };
        }

        let t2;
        (u1, t2) = two_sum(u1, t1);
        u2 += t2;
        let (r0, mut r1) = fast_two_sum(u0, u1);
        if !r0.is_finite() {
            return DoubleDouble::from_parts(r0, r0);
        }
        r1 += u2;
        DoubleDouble::from_parts(r0, r1)
    }
}

impl Mul<DoubleDouble> for f64 {
    type Output = DoubleDouble;
    #[inline]
    fn mul(self, y: DoubleDouble) -> DoubleDouble {
        y * self
    }
}

impl MulAssign for DoubleDouble {
    #[inline]
    fn mul_assign(&mut self, y: DoubleDouble) {
        *self = *self * y;
    }
}

impl MulAssign<f64> for DoubleDouble {
    #[inline]
    fn mul_assign(&mut self, y: f64) {
        *self = *self * y;
    }
}

/// Core of pair division; two Newton steps off the f64 quotient seed.
/// The extra third word is handed back separately so underflow
/// rescaling can round `q.hi + q.lo + q2` in one go; `(q.hi, q.lo +
/// q2)` is a normalized pair but `q2` may overlap `q.lo`.
fn auxiliary_divide(x: DoubleDouble, y: DoubleDouble) -> (DoubleDouble, f64) {
    let a0 = x.hi;
    let a1 = x.lo;
    let b0 = y.hi;
    let b1 = y.lo;

    let recip_b0 = 1.0 / b0;
    let x0 = a0 * recip_b0;
    let (t0, mut t1) = two_prod(x0, -b0);
    let (s1, mut u2) = two_prod(x0, -b1);
    let mut u1 = a0 + t0; // a0 and -t0 should be nearly equal

    if a0.abs() < 16.0 * DD_TINY
        || !(16.0 * f64::MIN_POSITIVE * POW_2_MANTISSA * POW_2_MANTISSA < x0.abs())
        || !t1.is_finite()
    {
        if x.hi == 0.0 {
            let q = if y.hi != 0.0 && y.hi.is_finite() {
                get_signed_zero(x.hi, y.hi)
            } else {
                x.hi / y.hi // May be NaN
            };
            return (DoubleDouble::from_parts(q, q), 0.0);
        }
        if y.hi == 0.0 {
            let q = x.hi / y.hi; // Signed infinity
            return (DoubleDouble::from_parts(q, q), 0.0);
        }

        let mut rx = x;
        let mut ry = y;
        return match division_rescale(&mut rx, &mut ry) {
            Err(mut rescale) => {
                if rescale == 0.0 {
                    rescale = get_signed_zero(x.hi, y.hi);
                }
                (DoubleDouble::from_parts(rescale, rescale), 0.0)
            }
            Ok(rescale) => {
                let (q, q2) = auxiliary_divide(rx, ry);
                (rescale3(q.hi, q.lo, q2, rescale), 0.0)
            }
        };
    }

    let t2;
    (t1, t2) = two_sum(a1, t1);
    u2 += t2;
    let s2;
    (u1, s2) = two_sum(u1, s1);
    u2 += s2;
    let t2;
    (u1, t2) = two_sum(u1, t1);
    u2 += t2;
    let d1 = u1 * recip_b0;
    let (q0, q1) = fast_two_sum(x0, d1);
    if !q0.is_finite() {
        return (DoubleDouble::from_parts(q0, q0), q0);
    }
    u2 -= d1 * b1;

    let (t1, t2) = two_prod(d1, -b0);
    u1 += t1; // u1 and -t1 should be nearly equal
    u2 += t2;
    let q2 = recip_b0 * (u1 + u2);
    let (q0, q1, q2) = coalesce(q0, q1, q2);
    (DoubleDouble::from_parts(q0, q1), q2)
}

impl Div for DoubleDouble {
    type Output = DoubleDouble;

    fn div(self, y: DoubleDouble) -> DoubleDouble {
        let (mut q, q2) = auxiliary_divide(self, y);
        q.lo += q2;
        if q.hi.is_finite() && q.hi == 0.0 {
            let z = get_signed_zero(self.hi, y.hi);
            return DoubleDouble::from_parts(z, z);
        }
        q
    }
}

impl Div<f64> for DoubleDouble {
    type Output = DoubleDouble;

    fn div(self, y: f64) -> DoubleDouble {
        let a0 = self.hi;
        let a1 = self.lo;
        let b0 = y;

        let recip_b0 = 1.0 / b0;
        let x0 = a0 * recip_b0;
        let (t0, t1) = two_prod(x0, -b0);

        if a0.abs() < 16.0 * DD_TINY
            || !(16.0 * f64::MIN_POSITIVE * POW_2_MANTISSA * POW_2_MANTISSA < x0.abs())
            || !t1.is_finite()
        {
            if self.hi == 0.0 {
                let q = if y != 0.0 && y.is_finite() {
                    get_signed_zero(self.hi, y)
                } else {
                    self.hi / y // May be NaN
                };
                return DoubleDouble::from_parts(q, q);
            }
            if y == 0.0 {
                let q = self.hi / y; // Signed infinity
                return DoubleDouble::from_parts(q, q);
            }

            let mut rx = self;
            let mut ry = DoubleDouble::from_parts(y, 0.0);
            return match division_rescale(&mut rx, &mut ry) {
                Err(mut rescale) => {
                    if rescale == 0.0 {
                        rescale = get_signed_zero(self.hi, y);
                    }
                    DoubleDouble::from_parts(rescale, rescale)
                }
                Ok(rescale) => {
                    let r = rx / ry.hi;
                    let mut r = rescale2(r.hi, r.lo, rescale);
                    if r.hi == 0.0 {
                        let z = get_signed_zero(self.hi, y);
                        r = DoubleDouble::from_parts(z, z);
                    }
                    r
                }
            };
        }

        let (t1, mut u2) = two_sum(a1, t1);
        let mut u1 = a0 + t0; // a0 and -t0 should be nearly equal
        let t2;
        (u1, t2) = two_sum(u1, t1);

        let d1 = u1 * recip_b0;
        u2 += t2;

        let (s1, s2) = two_prod(d1, -b0);
        let (q0, q1) = fast_two_sum(x0, d1);

        u1 += s1; // u1 and -s1 should be nearly equal
        u2 += s2;
        let q2 = recip_b0 * (u1 + u2);
        let (q0, mut q1, q2) = coalesce(q0, q1, q2);
        q1 += q2;
        DoubleDouble::from_parts(q0, q1)
    }
}

impl Div<DoubleDouble> for f64 {
    type Output = DoubleDouble;
    #[inline]
    fn div(self, y: DoubleDouble) -> DoubleDouble {
        DoubleDouble::from(self) / y
    }
}

impl DivAssign for DoubleDouble {
    #[inline]
    fn div_assign(&mut self, y: DoubleDouble) {
        *self = *self / y;
    }
}

impl DivAssign<f64> for DoubleDouble {
    #[inline]
    fn div_assign(&mut self, y: f64) {
        *self = *self / y;
    }
}

/// Core of [`DoubleDouble::recip`], held apart so the rescaled path can
/// round `result + correction` after unscaling.
fn auxiliary_recip(x: DoubleDouble, y0: f64) -> (DoubleDouble, f64) {
    let (mut s1, mut s2) = two_prod(y0, x.hi);
    s1 -= 1.0;
    let (mut u1, mut u2) = two_prod(y0, x.lo);
    (s1, s2) = two_sum(s1, s2);
    u2 += s2;
    (s1, u1) = two_sum(s1, u1);
    let (r1, t2) = two_prod(y0, -s1);
    u2 = y0 * (u2 + u1 - s1 * s1);
    (DoubleDouble::from_parts(y0, r1), t2 - u2)
}

impl DoubleDouble {
    /// Squares the value.  Cheaper than `self * self` because the cross
    /// terms collapse.
    pub fn square(self) -> Self {
        let a0 = self.hi;
        let a1 = self.lo;
        let (u0, mut u1) = square_prod(a0);
        // Unlike the general product, a finite u0 guarantees u1 is
        // finite too.
        if !u0.is_finite() || u0.abs() < DD_TINY {
            if a0 == 0.0 {
                // Either signed zero squares to +0.0
                return DoubleDouble::from_parts(0.0, 0.0);
            }

            let mut a = self;
            let mut b = self;
            return match multiplication_rescale(&mut a, &mut b) {
                Err(rescale) => DoubleDouble::from_parts(rescale, rescale),
                Ok(rescale) => {
                    let r = a.square();
                    rescale2(r.hi, r.lo, rescale)
                }
            };
        }

        let (t12, mut u2) = two_prod(2.0 * a0, a1);
        let tl;
        (u1, tl) = two_sum(u1, t12);
        u2 += tl;
        u2 += a1 * a1;
        let (r0, mut r1) = fast_two_sum(u0, u1);
        r1 += u2;
        DoubleDouble::from_parts(r0, r1)
    }

    /// Reciprocal with one Newton correction off the f64 seed.
    pub fn recip(self) -> Self {
        let mut y0 = 1.0 / self.hi;

        let xcheck = self.hi.abs();
        if !(f64::MIN_POSITIVE * POW_2_MANTISSAHALF < xcheck
            && xcheck < f64::MAX / (16.0 * POW_2_MANTISSA * POW_2_MANTISSA))
        {
            if !self.hi.is_finite() {
                let r = if self.hi == f64::INFINITY {
                    0.0
                } else if self.hi == f64::NEG_INFINITY {
                    -0.0
                } else {
                    f64::NAN
                };
                return DoubleDouble::from_parts(r, r);
            }
            if !y0.is_finite() {
                // self.hi is a (possibly signed) zero
                return DoubleDouble::from_parts(y0, y0);
            }

            let rescale = if self.hi.abs() > 1.0 {
                1.0 / (32.0 * POW_2_MANTISSA * POW_2_MANTISSA)
            } else {
                POW_2_MANTISSA
            };
            let atmp = DoubleDouble::from_parts(self.hi * rescale, self.lo * rescale);
            y0 = 1.0 / atmp.hi;
            let (rtmp, corr) = auxiliary_recip(atmp, y0);
            return rescale3(rtmp.hi, rtmp.lo, corr, rescale);
        }

        let (r, corr) = auxiliary_recip(self, y0);
        let (r0, r1, corr) = coalesce(r.hi, r.lo, corr);
        DoubleDouble::from_parts(r0, r1 + corr)
    }

    /// Square root via two Newton steps off the f64 seed.
    pub fn sqrt(self) -> Self {
        if !(DD_TINY <= self.hi && self.hi <= 0.5 * f64::MAX) {
            if !self.hi.is_finite() {
                let r = if self.hi == f64::INFINITY {
                    f64::INFINITY
                } else {
                    f64::NAN
                };
                return DoubleDouble::from_parts(r, r);
            }
            if self.hi == 0.0 {
                // Pass the sign through: sqrt(-0.0) is -0.0
                return DoubleDouble::from_parts(self.hi, self.hi);
            }
            if self.hi < 0.0 {
                return DoubleDouble::from_parts(f64::NAN, f64::NAN);
            }
            if self.hi < DD_TINY {
                // Underflow can drop digits; rescale by an even power
                let scaleup = 4.0 * POW_2_MANTISSA * POW_2_MANTISSA;
                let r = DoubleDouble::from_parts(self.hi * scaleup, self.lo * scaleup).sqrt();
                let scaledown = 0.5 / POW_2_MANTISSA;
                return DoubleDouble::from_parts(r.hi * scaledown, r.lo * scaledown);
            }
            // self.hi > 0.5 * MAX; the mainline can overflow
            let r = DoubleDouble::from_parts(self.hi * 0.25, self.lo * 0.25).sqrt();
            return DoubleDouble::from_parts(r.hi * 2.0, r.lo * 2.0);
        }

        let y0 = self.hi.sqrt();
        let (mut s1, mut s2) = square_prod(y0);
        let ry0 = 0.5 / y0;
        s1 = self.hi - s1;
        (s1, s2) = two_sum(s1, -s2);
        let mut t1;
        (s1, t1) = two_sum(s1, self.lo);
        s2 += t1;
        let u1 = s1 * ry0;

        let u1sq = u1 * u1;
        let t2;
        (t1, t2) = two_prod(-2.0 * y0, u1);
        (s1, t1) = two_sum(s1, t1);
        s2 += t2 + t1 - u1sq;
        s1 = ry0 * (s1 + s2);

        let (r0, mut r1) = fast_two_sum(y0, u1);
        r1 += s1;
        DoubleDouble::from_parts(r0, r1)
    }

    /// `1/sqrt(x)` in one pass; about 20% faster than composing
    /// [`Self::sqrt`] with [`Self::recip`].  The correction applied to
    /// the seed is `0.5*y0*d*(1 + 0.75*d)` with `d = 1 - x*y0*y0`.
    pub fn recip_sqrt(self) -> Self {
        if !(2.0 * DD_TINY <= self.hi && self.hi <= 1.0 / DD_TINY) {
            if !self.hi.is_finite() {
                let r = if self.hi == f64::INFINITY {
                    0.0
                } else {
                    f64::NAN
                };
                return DoubleDouble::from_parts(r, r);
            }
            if self.hi == 0.0 {
                let r = if self.hi.is_sign_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                };
                return DoubleDouble::from_parts(r, r);
            }
            if self.hi < 2.0 * DD_TINY {
                if self.hi < 0.0 {
                    return DoubleDouble::from_parts(f64::NAN, f64::NAN);
                }
                let scale = 4.0 * POW_2_MANTISSA * POW_2_MANTISSA;
                let r = DoubleDouble::from_parts(self.hi * scale, self.lo * scale).recip_sqrt();
                let unscale = 2.0 * POW_2_MANTISSA;
                return DoubleDouble::from_parts(r.hi * unscale, r.lo * unscale);
            }
            // Large inputs can lose digits to underflow
            let scale = 1.0 / (4.0 * POW_2_MANTISSA * POW_2_MANTISSA);
            let r = DoubleDouble::from_parts(self.hi * scale, self.lo * scale).recip_sqrt();
            let unscale = 1.0 / (2.0 * POW_2_MANTISSA);
            return DoubleDouble::from_parts(r.hi * unscale, r.lo * unscale);
        }

        let y0 = (1.0 / self.hi).sqrt();
        let (s0, s1) = square_prod(y0);
        let (mut t2, mut u1) = two_prod(self.hi, s0);
        t2 -= 1.0;
        let mhy0 = -0.5 * y0;
        let (mut t1, mut u2) = two_prod(self.lo, s0);
        u2 += self.lo * s1;

        (u1, t2) = two_sum(u1, t2);
        u2 += t2;
        let mut v2;
        (u1, v2) = two_sum(u1, t1);
        u2 += v2;

        (t1, t2) = two_prod(self.hi, s1);
        u2 += t2;
        (u1, v2) = two_sum(u1, t1);
        u2 += v2;
        u2 -= 0.75 * u1 * u1; // Halley correction

        (u1, t2) = two_prod(mhy0, u1);
        u2 *= mhy0;
        u2 += t2;

        let (r0, r1) = coalesce_plus(y0, u1, u2);
        DoubleDouble::from_parts(r0, r1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ldexp_k, pow2i};
    use crate::hires;
    use rand::Rng;

    #[test]
    fn test_mul_exact_small() {
        let x = DoubleDouble::from(3.0);
        let y = DoubleDouble::from(7.0);
        let p = x * y;
        assert_eq!(p.hi(), 21.0);
        assert_eq!(p.lo(), 0.0);
    }

    #[test]
    fn test_mul_pi_squared() {
        let pi = DoubleDouble::from_parts(hires::PI[0], hires::PI[1]);
        let p = pi * pi;
        // pi^2 = 9.8696044010893586188...
        assert!((p.hi() - 9.869604401089358).abs() < 1e-14);
        let q = p / pi;
        assert!(q.diff_ulp(&pi, pi.ulp()).abs() <= 1.0);
    }

    #[test]
    fn test_mul_signed_zero() {
        let p = DoubleDouble::from(-3.0) * DoubleDouble::from(0.0);
        assert_eq!(p.hi(), 0.0);
        assert!(p.hi().is_sign_negative());
        let q = DoubleDouble::from(-3.0) * DoubleDouble::from(-0.0);
        assert!(!q.hi().is_sign_negative());
    }

    #[test]
    fn test_mul_overflow_and_underflow() {
        let big = DoubleDouble::from(pow2i(600));
        let p = big * big;
        assert_eq!(p.hi(), f64::INFINITY);
        assert_eq!(p.lo(), f64::INFINITY);

        let tiny = DoubleDouble::from(pow2i(-600));
        let q = tiny * tiny;
        assert_eq!(q.hi(), 0.0);
        assert!(!q.hi().is_sign_negative());
        let r = tiny * -tiny;
        assert_eq!(r.hi(), 0.0);
        assert!(r.hi().is_sign_negative());
    }

    #[test]
    fn test_mul_subnormal_rescale() {
        let x = DoubleDouble::from(pow2i(-530));
        let p = x.square();
        // 2^-1060 is subnormal; build it by exact halving, not pow2i.
        assert_eq!(p.hi(), ldexp_k(1.0, -1060));
        assert_eq!(p.lo(), 0.0);
    }

    #[test]
    fn test_mul_by_scalar_matches_full() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(
                rng.random_range(-1e10..1e10),
                rng.random_range(-1e-8..1e-8),
            );
            let s: f64 = rng.random_range(-1e6..1e6);
            let fast = a * s;
            let full = a * DoubleDouble::from(s);
            let d = fast.diff_ulp(&full, full.ulp());
            assert!(d.abs() <= 1.0, "{fast:?} vs {full:?}");
        }
    }

    #[test]
    fn test_square_matches_mul() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(
                rng.random_range(-1e150..1e150),
                rng.random_range(-1e130..1e130),
            );
            let s = a.square();
            let p = a * a;
            let d = s.diff_ulp(&p, p.ulp());
            assert!(d.abs() <= 1.0, "{s:?} vs {p:?}");
        }
    }

    #[test]
    fn test_div_one_third() {
        let q = DoubleDouble::from(1.0) / DoubleDouble::from(3.0);
        assert_eq!(q.hi(), 1.0 / 3.0);
        let back = q * DoubleDouble::from(3.0) - DoubleDouble::from(1.0);
        assert!(back.hi().abs() < 1e-31);
    }

    #[test]
    fn test_div_specials() {
        let one = DoubleDouble::from(1.0);
        let zero = DoubleDouble::from(0.0);
        assert_eq!((one / zero).hi(), f64::INFINITY);
        assert_eq!((-one / zero).hi(), f64::NEG_INFINITY);
        assert!((zero / zero).hi().is_nan());
        let q = zero / DoubleDouble::from(5.0);
        assert_eq!(q.hi(), 0.0);
        assert!(!q.hi().is_sign_negative());
        let q = zero / DoubleDouble::from(-5.0);
        assert!(q.hi().is_sign_negative());
        assert_eq!((DoubleDouble::from(5.0) / DoubleDouble::from(f64::INFINITY)).hi(), 0.0);
        assert_eq!(
            (DoubleDouble::from(f64::INFINITY) / DoubleDouble::from(2.0)).hi(),
            f64::INFINITY
        );
    }

    #[test]
    fn test_div_roundtrip_random() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(rng.random_range(-1e8..1e8), rng.random_range(-1e-9..1e-9));
            let b = DoubleDouble::new(rng.random_range(0.5..1e8), rng.random_range(-1e-9..1e-9));
            let q = a / b;
            let back = q * b;
            let d = back.diff_ulp(&a, a.ulp());
            assert!(d.abs() <= 2.0, "{a:?} / {b:?}");
        }
    }

    #[test]
    fn test_div_by_scalar_matches_full() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(rng.random_range(-1e10..1e10), 0.0);
            let s: f64 = rng.random_range(0.5..1e6);
            let fast = a / s;
            let full = a / DoubleDouble::from(s);
            let d = fast.diff_ulp(&full, full.ulp());
            assert!(d.abs() <= 1.0);
        }
    }

    #[test]
    fn test_div_underflow_rounding() {
        // Quotient lands in the subnormal range; the rescale path must
        // round once, not twice.
        let a = DoubleDouble::from(pow2i(-1000));
        let b = DoubleDouble::from(pow2i(60));
        let q = a / b;
        assert_eq!(q.hi(), ldexp_k(1.0, -1060));
    }

    #[test]
    fn test_recip() {
        let r = DoubleDouble::from(4.0).recip();
        assert_eq!(r.hi(), 0.25);
        assert_eq!(r.lo(), 0.0);

        let r = DoubleDouble::from(3.0).recip();
        let back = r * DoubleDouble::from(3.0) - DoubleDouble::from(1.0);
        assert!(back.hi().abs() < 1e-31);
    }

    #[test]
    fn test_recip_specials() {
        assert_eq!(DoubleDouble::from(f64::INFINITY).recip().hi(), 0.0);
        let r = DoubleDouble::from(f64::NEG_INFINITY).recip();
        assert_eq!(r.hi(), 0.0);
        assert!(r.hi().is_sign_negative());
        assert!(DoubleDouble::from(f64::NAN).recip().hi().is_nan());
        assert_eq!(DoubleDouble::from(0.0).recip().hi(), f64::INFINITY);
        assert_eq!(DoubleDouble::from(-0.0).recip().hi(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_recip_rescale_path() {
        let r = DoubleDouble::from(pow2i(1020)).recip();
        assert_eq!(r.hi(), pow2i(-1020));
        assert_eq!(r.lo(), 0.0);
        let r = DoubleDouble::from(pow2i(-1040)).recip();
        assert_eq!(r.hi(), pow2i(1040));
    }

    #[test]
    fn test_recip_matches_divide() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(rng.random_range(0.001..1e8), rng.random_range(-1e-12..1e-12));
            let r = a.recip();
            let q = DoubleDouble::from(1.0) / a;
            let d = r.diff_ulp(&q, q.ulp());
            assert!(d.abs() <= 1.0, "{a:?}");
        }
    }

    #[test]
    fn test_sqrt_two() {
        let r = DoubleDouble::from(2.0).sqrt();
        assert_eq!(r.hi(), hires::SQRT2[0]);
        assert_eq!(r.lo(), hires::SQRT2[1]);
    }

    #[test]
    fn test_sqrt_specials() {
        assert_eq!(DoubleDouble::from(f64::INFINITY).sqrt().hi(), f64::INFINITY);
        assert!(DoubleDouble::from(f64::NAN).sqrt().hi().is_nan());
        assert!(DoubleDouble::from(-1.0).sqrt().hi().is_nan());
        let z = DoubleDouble::from(-0.0).sqrt();
        assert_eq!(z.hi(), 0.0);
        assert!(z.hi().is_sign_negative());
        assert_eq!(DoubleDouble::from(0.0).sqrt().hi(), 0.0);
    }

    #[test]
    fn test_sqrt_subnormal() {
        let r = DoubleDouble::from(ldexp_k(1.0, -1070)).sqrt();
        assert_eq!(r.hi(), pow2i(-535));
        assert_eq!(r.lo(), 0.0);
    }

    #[test]
    fn test_sqrt_roundtrip_random() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(rng.random_range(1e-10..1e10), 0.0);
            let r = a.sqrt();
            let back = r.square();
            let d = back.diff_ulp(&a, a.ulp());
            assert!(d.abs() <= 2.0, "{a:?}");
        }
    }

    #[test]
    fn test_recip_sqrt() {
        let r = DoubleDouble::from(4.0).recip_sqrt();
        assert_eq!(r.hi(), 0.5);
        assert_eq!(r.lo(), 0.0);

        let r = DoubleDouble::from(2.0).recip_sqrt();
        assert_eq!(r.hi(), 0.5 * hires::SQRT2[0]);
        assert_eq!(r.lo(), 0.5 * hires::SQRT2[1]);
    }

    #[test]
    fn test_recip_sqrt_specials() {
        assert_eq!(DoubleDouble::from(f64::INFINITY).recip_sqrt().hi(), 0.0);
        assert!(DoubleDouble::from(f64::NAN).recip_sqrt().hi().is_nan());
        assert!(DoubleDouble::from(-2.0).recip_sqrt().hi().is_nan());
        assert_eq!(DoubleDouble::from(0.0).recip_sqrt().hi(), f64::INFINITY);
        assert_eq!(DoubleDouble::from(-0.0).recip_sqrt().hi(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_recip_sqrt_matches_composition() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = DoubleDouble::new(rng.random_range(1e-6..1e12), 0.0);
            let fast = a.recip_sqrt();
            let slow = a.sqrt().recip();
            let d = fast.diff_ulp(&slow, slow.ulp());
            assert!(d.abs() <= 2.0, "{a:?}");
        }
    }

    #[test]
    fn test_mul_near_max() {
        // MAX * 2 goes through the expsum == 1024 rescale path
        let p = DoubleDouble::from(f64::MAX) * DoubleDouble::from(2.0);
        assert_eq!(p.hi(), f64::INFINITY);
        assert_eq!(p.lo(), f64::INFINITY);
    }

    #[test]
    fn test_coalesce_plus_epsilon_case() {
        // 1 + xi + xi^2 with xi = ULP(1)/2 must keep the xi^2 word
        let xi = 0.5 * f64::EPSILON;
        let (b0, b1) = coalesce_plus(1.0, xi, xi * xi);
        assert_eq!(b0, 1.0 + f64::EPSILON);
        assert_eq!(b1, -xi + xi * xi);
    }
}
