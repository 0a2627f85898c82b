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

/// Largest binary exponent of a finite f64, plus one.
pub(crate) const HUGE_EXP: i32 = 1024;
/// Smallest binary exponent of a normal f64.
pub(crate) const TINY_EXP: i32 = -1022;
/// Binary exponent of the smallest positive subnormal.
pub(crate) const VERYTINY_EXP: i32 = -1074;
/// Smallest positive subnormal f64.
pub(crate) const VERYTINY: f64 = f64::from_bits(1);

/// 2^53
pub(crate) const POW_2_MANTISSA: f64 = 9007199254740992.0;
/// 2^27
pub(crate) const POW_2_MANTISSAHALF: f64 = 134217728.0;
/// 2^-358, cube root of the smallest positive subnormal.
pub(crate) const CUBEROOT_VERYTINY: f64 = f64::from_bits(0x2990000000000000);

/// Pair magnitudes below this may lose low-word bits to underflow
/// in products, 2^-968.
pub(crate) const DD_TINY: f64 = f64::from_bits(0x0370000000000000);
/// Largest scale safe against overflow in the splitting step, 2^996.
pub(crate) const SPLITMAX: f64 = f64::from_bits(0x7e30000000000000);

#[inline(always)]
pub(crate) const fn fmla(a: f64, b: f64, c: f64) -> f64 {
    c + a * b
}

#[cfg(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
))]
#[inline(always)]
pub(crate) fn mlaf(acc: f64, a: f64, b: f64) -> f64 {
    f64::mul_add(a, b, acc)
}

#[cfg(not(any(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "fma"
    ),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
#[inline(always)]
pub(crate) fn mlaf(acc: f64, a: f64, b: f64) -> f64 {
    fmla(a, b, acc)
}

#[inline(always)]
pub(crate) fn f_fmla(a: f64, b: f64, c: f64) -> f64 {
    mlaf(c, a, b)
}

/// Copies sign from `y` to `x`
#[inline]
pub(crate) const fn copysignk(x: f64, y: f64) -> f64 {
    f64::from_bits((x.to_bits() & !(1 << 63)) ^ (y.to_bits() & (1 << 63)))
}

/// Computes 2^n for n in the normal exponent range.
#[inline(always)]
pub(crate) const fn pow2i(q: i32) -> f64 {
    f64::from_bits((q.wrapping_add(0x3ff) as u64) << 52)
}

/// Computes x * 2^m across the full exponent range, with correct
/// rounding into and out of the subnormal range.  System `ldexp`
/// implementations are not reliable here; this follows exponentiation
/// by squaring so the intermediate scale never overflows.
pub(crate) fn ldexp_k(x: f64, m: i32) -> f64 {
    if m == 0 {
        return x;
    }
    let mut x = x;
    let mut n: u32;
    let mut base: f64;
    if m > 0 {
        n = m as u32;
        if n & 1 != 0 {
            x *= 2.0;
        }
        base = 2.0;
    } else {
        n = (-(m as i64)) as u32;
        if n & 1 != 0 {
            x *= 0.5;
        }
        base = 0.5;
    }

    // Stop squaring once base * base would overflow.
    let nstop = n >> 10;
    loop {
        n >>= 1;
        if n <= nstop {
            break;
        }
        base *= base;
        if n & 1 != 0 {
            x *= base;
        }
    }

    if n > 0 {
        x *= base;
        loop {
            x *= base;
            n -= 1;
            if n == 0 {
                break;
            }
        }
    }
    x
}

/// Splits x into (mantissa, exponent) with mantissa in [0.5, 1),
/// matching C `frexp`.  Zero and non-finite values come back with
/// exponent 0.
pub(crate) fn frexp_k(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let mut bits = x.to_bits();
    let mut adj = 0i32;
    if bits & 0x7ff0_0000_0000_0000 == 0 {
        // Subnormal; prescale into the normal range first.
        bits = (x * pow2i(64)).to_bits();
        adj = -64;
    }
    let e = ((bits >> 52) & 0x7ff) as i32 - 0x3fe;
    let mant = f64::from_bits((bits & !0x7ff0_0000_0000_0000) | (0x3fe << 52));
    (mant, e + adj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow2i() {
        assert_eq!(pow2i(0), 1.0);
        assert_eq!(pow2i(10), 1024.0);
        assert_eq!(pow2i(-10), 1.0 / 1024.0);
        assert_eq!(pow2i(1023), f64::MAX / (2.0 - f64::EPSILON));
    }

    #[test]
    fn test_ldexp_extremes() {
        assert_eq!(ldexp_k(1.0, -1074), VERYTINY);
        assert_eq!(ldexp_k(VERYTINY, 1074), 1.0);
        // ldexp(2^-1000, 2000) is finite even though 2^2000 overflows
        assert_eq!(ldexp_k(pow2i(-1000), 2000), pow2i(1000));
        assert_eq!(ldexp_k(1.5, 2048), f64::INFINITY);
        assert_eq!(ldexp_k(-1.5, -2048), -0.0);
        assert!(ldexp_k(-1.5, -2048).is_sign_negative());
    }

    #[test]
    fn test_ldexp_subnormal_rounding() {
        // 3 * 2^-1075 rounds to 2^-1073, not 2^-1074
        assert_eq!(ldexp_k(3.0, -1075), ldexp_k(1.0, -1073));
    }

    #[test]
    fn test_frexp() {
        let (m, e) = frexp_k(8.0);
        assert_eq!((m, e), (0.5, 4));
        let (m, e) = frexp_k(-0.75);
        assert_eq!((m, e), (-0.75, 0));
        let (m, e) = frexp_k(VERYTINY);
        assert_eq!(m, 0.5);
        assert_eq!(e, -1073);
        let (m, e) = frexp_k(0.0);
        assert_eq!((m, e), (0.0, 0));
    }

    #[test]
    fn test_copysignk() {
        assert_eq!(copysignk(3.0, -1.0), -3.0);
        assert_eq!(copysignk(-3.0, 1.0), 3.0);
        assert!(copysignk(0.0, -1.0).is_sign_negative());
    }

    #[test]
    fn test_f_fmla() {
        assert_eq!(f_fmla(2.0, 3.0, 4.0), 10.0);
    }

    #[test]
    fn test_range_constants() {
        assert_eq!(DD_TINY, pow2i(-968));
        assert_eq!(SPLITMAX, pow2i(996));
        assert_eq!(CUBEROOT_VERYTINY, pow2i(-358));
        assert_eq!(VERYTINY * CUBEROOT_VERYTINY * CUBEROOT_VERYTINY, 0.0);
    }
}
