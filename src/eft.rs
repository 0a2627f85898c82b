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

//! Error-free transforms.  Each routine returns a rounded result plus
//! its exact rounding error, so `s + e == a + b` (resp. `p + e == a *
//! b`) whenever no overflow or underflow occurs.
//!
//! Refs: Knuth, TAOCP vol 2; Dekker, Numer. Math. 18, 224-242 (1971);
//! Rump, Ogita, and Oishi, SIAM J. Sci. Comput. 31, 189-224 (2008).

/// Knuth two-sum, branch free.  6 flops.
#[inline(always)]
pub(crate) fn two_sum(x: f64, y: f64) -> (f64, f64) {
    let u = x + y;
    let t1 = u - x;
    let t2 = u - t1;
    let t3 = y - t1;
    let t4 = x - t2;
    (u, t4 + t3)
}

/// Two-sum of x and -y without negating y first.
#[inline(always)]
pub(crate) fn two_diff(x: f64, y: f64) -> (f64, f64) {
    let u = x - y;
    let t1 = u - x;
    let t2 = u - t1;
    let t3 = y + t1;
    let t4 = x - t2;
    (u, t4 - t3)
}

/// Dekker two-sum.  3 flops, but requires |x| >= |y| or x == 0.
#[inline(always)]
pub(crate) fn fast_two_sum(x: f64, y: f64) -> (f64, f64) {
    let u = x + y;
    let t1 = u - x;
    (u, y - t1)
}

/// Splits x into a 26-bit high part and a 27-bit low part, exactly.
///
/// The "splitmagic" constant, multiplied against x, produces x plus a
/// half-mantissa-width shifted version of x, which is faster than
/// cracking the exponent out with ldexp.  If MAX/|x| < 2^26 the
/// product overflows and the pieces come back NaN; callers working
/// near the range limit must prescale.
#[inline(always)]
pub(crate) fn split(x: f64) -> (f64, f64) {
    const SPLITMAGIC: f64 = 134217728.0; // 2^27
    let t = SPLITMAGIC * x;
    let u = t - x;
    let u = t - u; // u = t-(t-x) == t+(x-t)
    (u, x - u)
}

#[cfg(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
))]
#[inline(always)]
pub(crate) fn two_prod(x: f64, y: f64) -> (f64, f64) {
    let u = x * y;
    (u, f64::mul_add(x, y, -u))
}

#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
#[inline(always)]
pub(crate) fn two_prod(x: f64, y: f64) -> (f64, f64) {
    let u = x * y;
    let (x0, x1) = split(x);
    let (y0, y1) = split(y);
    let mut v = x0 * y0;
    v -= u;
    v += x0 * y1;
    v += x1 * y0;
    v += x1 * y1;
    (u, v)
}

#[cfg(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
))]
#[inline(always)]
pub(crate) fn square_prod(x: f64) -> (f64, f64) {
    let u = x * x;
    (u, f64::mul_add(x, x, -u))
}

/// two_prod specialized to x * x; one split instead of two.
#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
#[inline(always)]
pub(crate) fn square_prod(x: f64) -> (f64, f64) {
    let u = x * x;
    let (x0, x1) = split(x);
    let mut v = x0 * x0;
    v -= u;
    v += 2.0 * (x0 * x1);
    v += x1 * x1;
    (u, v)
}
