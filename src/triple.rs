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

//! Triple-word helpers used internally by the transcendental routines.
//! A triple `(a0, a1, a2)` is a mostly-normalized three-word expansion
//! with `|a1/a0|` and `|a2/a1|` below about 2^53.  The "sloppy"
//! routines trade the last few ULPs of the third word for speed; their
//! errors are well under a single double-double ULP, which is what the
//! callers need.

use crate::dd::DoubleDouble;
use crate::eft::{fast_two_sum, square_prod, two_prod, two_sum};

pub(crate) type Triple = (f64, f64, f64);

/// Adds two triples.  Error is <= 0.5 ULP of the triple result.
pub(crate) fn three_sum(a: Triple, b: Triple) -> Triple {
    let (mut a0, mut a1, mut a2) = a;
    let (mut b0, mut b1, mut b2) = b;
    (a0, b0) = two_sum(a0, b0);
    (a1, b1) = two_sum(a1, b1);
    (a2, b2) = two_sum(a2, b2);

    let save_sum = a0;

    (a1, b0) = two_sum(a1, b0);
    (a2, b1) = two_sum(a2, b1);
    b2 += b1;

    (a0, a1) = two_sum(a0, a1);

    (a2, b0) = two_sum(a2, b0);
    b2 += b0;
    (a1, a2) = two_sum(a1, a2);
    a2 += b2;

    let (c0, a1) = fast_two_sum(a0, a1);
    if !c0.is_finite() {
        let inf = if save_sum > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
        return (inf, inf, inf);
    }
    let (c1, c2) = fast_two_sum(a1, a2);
    (c0, c1, c2)
}

/// Adds a single word to a triple.  Error is <= 0.5 ULP.
pub(crate) fn three_increment(a: Triple, b0: f64) -> Triple {
    let (mut a0, mut a1, mut a2) = a;
    let mut b0 = b0;
    (a0, b0) = two_sum(a0, b0);
    (a1, b0) = two_sum(a1, b0);
    (a0, a1) = two_sum(a0, a1);
    (a2, b0) = two_sum(a2, b0);
    (a1, a2) = two_sum(a1, a2);
    a2 += b0;
    (a0, a1, a2)
}

/// Re-packs a triple so the words are non-overlapping and ordered.
pub(crate) fn normalize3(a: Triple) -> Triple {
    let (a0, a1, a2) = a;
    let (b1, b2) = two_sum(a1, a2);
    let (b0, b1) = two_sum(a0, b1);
    let (b1, b2) = two_sum(b1, b2);
    (b0, b1, b2)
}

pub(crate) fn scale3(a: Triple, s: f64) -> Triple {
    (a.0 * s, a.1 * s, a.2 * s)
}

/// Floor of a triple.  Both the integer and remainder pieces need
/// normalizing; salient example:
/// `1.411905e+00 + -6.604641e-17 + -4.687262e-33`.
pub(crate) fn floor3(a: Triple) -> Triple {
    let b0 = a.0.floor();
    let b0r = a.0 - b0;
    let b1 = a.1.floor();
    let b1r = a.1 - b1;
    let b2 = a.2.floor();
    let b2r = a.2 - b2;
    let b = normalize3((b0, b1, b2));
    let br = normalize3((b0r, b1r, b2r));
    three_increment(b, br.0.floor())
}

pub(crate) fn neg3(a: Triple) -> Triple {
    (-a.0, -a.1, -a.2)
}

/// Triple product.  Error appears to stay under 20 triple ULPs.
pub(crate) fn sloppy_prod(a: Triple, b: Triple) -> Triple {
    let (a0, a1, a2) = a;
    let (b0, b1, b2) = b;

    let (t0, mut t1) = two_prod(a0, b0);
    let (mut u1, mut u2) = two_prod(a0, b1);
    let (v1, v2) = two_prod(a1, b0);

    if !t0.is_finite() {
        let t0 = a0 * b0;
        return (t0, t0, t0);
    }

    u2 += v2;
    let w2;
    (u1, w2) = two_sum(u1, v1);
    u2 += w2;
    let mut t2;
    (t1, t2) = two_sum(t1, u1);
    t2 += u2;

    let (c0, t1) = fast_two_sum(t0, t1);

    t2 += a0 * b2 + a1 * b1 + a2 * b0;

    // This last pass must be an unordered two-sum; t2 can exceed t1
    // after the cross terms land.
    let (c1, c2) = two_sum(t1, t2);
    (c0, c1, c2)
}

/// Triple square.  Error appears to stay under 12 triple ULPs.
pub(crate) fn sloppy_square(a: Triple) -> Triple {
    let (a0, a1, a2) = a;
    let (t0, mut t1) = square_prod(a0);
    if !t0.is_finite() {
        return (t0, t0, t0);
    }
    let (u1, u2) = two_prod(2.0 * a0, a1);
    let mut t2;
    (t1, t2) = two_sum(t1, u1);
    t2 += u2 + a1 * a1 + 2.0 * a0 * a2;
    let (c0, t1) = fast_two_sum(t0, t1);
    let (c1, c2) = fast_two_sum(t1, t2);
    (c0, c1, c2)
}

/// Triple square root via two Newton steps off the f64 seed.  Error
/// appears to stay under 15 triple ULPs.  Assumes a0 is finite, not
/// negative, and far enough from the overflow boundary.
pub(crate) fn sloppy_sqrt(a: Triple) -> Triple {
    let (a0, a1, a2) = a;
    if a0 == 0.0 {
        return (a0, a0, a0);
    }

    let x0 = a0.sqrt();
    let rhx0 = 0.5 / x0;
    let (xsq0, xsq1) = square_prod(x0);
    let mut d0 = a0 - xsq0;
    let (d1, mut d2) = two_sum(a1, -xsq1);
    let (d0n, d1) = fast_two_sum(d0, d1);
    d0 = d0n;
    let e1 = rhx0 * d0;
    d2 += a2;
    let (mut t0, t1) = two_prod(-2.0 * x0, e1);
    t0 += d0;
    d2 -= e1 * e1;
    t0 += t1 + d1 + d2;
    let (c0, e1) = fast_two_sum(x0, e1);
    t0 *= rhx0;
    let (c1, c2) = two_sum(e1, t0);
    (c0, c1, c2)
}

/// Triple reciprocal, two Newton corrections off the f64 seed.
pub(crate) fn sloppy_recip(a: Triple) -> Triple {
    let (a0, _a1, _a2) = a;
    if !a0.is_finite() {
        let c = if a0 == f64::INFINITY {
            0.0
        } else if a0 == f64::NEG_INFINITY {
            -0.0
        } else {
            f64::NAN
        };
        return (c, c, c);
    }
    if a0 == 0.0 {
        let c = if a0.is_sign_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return (c, c, c);
    }

    let b0 = 1.0 / a0;

    // First Newton correction in double-double.
    let mut tmp = DoubleDouble::from_parts(a.0, a.1);
    tmp = tmp * b0;
    tmp = DoubleDouble::from(1.0) - tmp;
    tmp = tmp * b0;
    tmp += DoubleDouble::from(b0);
    let mut b = (tmp.hi(), tmp.lo(), 0.0);

    // Second Newton correction in triple-double.
    let mut t = sloppy_prod(a, b);
    t = three_increment(t, -1.0);
    t = sloppy_prod(t, b);
    b = three_sum(b, neg3(t));
    normalize3(b)
}

/// Multiplies a triple by 10^m with a touch under triple accuracy.
/// Exponentiation by squaring; plain f64 squarings stay exact while
/// the running power of five fits in 53 bits (n >> 4 shifts left), and
/// the triple base stays below 10^308 through n >> 8 shifts.
pub(crate) fn ldexp10(a: Triple, m: i32) -> Triple {
    if m == 0 {
        return a;
    }
    let mut a = a;
    let mut n: u32 = m.unsigned_abs();

    let nmant1stop = n >> 4;
    let nrangestop = n >> 8;

    let mut base: Triple = (10.0, 0.0, 0.0);
    let mut xpow: Triple = (if n & 1 == 1 { 10.0 } else { 1.0 }, 0.0, 0.0);

    loop {
        n >>= 1;
        if n <= nmant1stop {
            break;
        }
        base.0 *= base.0;
        if n & 1 == 1 {
            xpow.0 *= base.0;
        }
    }

    while n > nrangestop {
        base = sloppy_square(base);
        if n & 1 == 1 {
            xpow = sloppy_prod(xpow, base);
        }
        n >>= 1;
    }

    if m > 0 {
        a = sloppy_prod(a, xpow);
        if n > 0 {
            // Leftover bits in the case where xpow would overflow.
            for _ in 0..=n {
                a = sloppy_prod(a, base);
            }
        }
    } else {
        xpow = sloppy_recip(xpow);
        a = sloppy_prod(a, xpow);
        if n > 0 {
            base = sloppy_recip(base);
            for _ in 0..=n {
                a = sloppy_prod(a, base);
            }
        }
    }

    a
}
