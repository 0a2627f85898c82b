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

use crate::common::ldexp_k;
use crate::dd::DoubleDouble;

/// Arbitrary-width binary float stored as a chunk vector, used for
/// reference values with more than 106 bits of mantissa.
///
/// The represented value is
///
/// ```text
///   sign * sum_i chunks[i] * 2^(offset - i*width)
/// ```
///
/// with each chunk an integer strictly below `2^width`.  Chunk vectors
/// with 32-bit width and a couple thousand bits total are what the
/// cross-check tables use.
#[derive(Clone, Debug, PartialEq)]
pub struct BigFloat {
    /// +1 or -1.
    pub sign: i8,
    /// Power-of-two scaling applied to the leading chunk.
    pub offset: i32,
    /// Bits per chunk; must not exceed 52 so chunks stay exact in f64.
    pub width: u32,
    /// Big-endian chunk list, most significant first.
    pub chunks: Vec<u32>,
}

impl BigFloat {
    /// Rounds to a double-double via a Horner pass from the low chunks
    /// up.  Each step divides by 2^width, which is exact, then adds the
    /// next chunk with a correctly rounded pair addition, so the result
    /// is the chunk value correctly rounded to 106+ bits.
    pub fn to_double_double(&self) -> DoubleDouble {
        let mut val = DoubleDouble::from(0.0);
        for &c in self.chunks.iter().rev() {
            val = val.ldexp(-(self.width as i32)) + f64::from(c);
        }
        val = val.ldexp(self.offset);
        if self.sign < 0 { -val } else { val }
    }

    /// Rounds to a single f64.
    pub fn to_f64(&self) -> f64 {
        let mut val = 0.0f64;
        for &c in self.chunks.iter().rev() {
            val = ldexp_k(val, -(self.width as i32)) + f64::from(c);
        }
        val = ldexp_k(val, self.offset);
        if self.sign < 0 { -val } else { val }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk() {
        let b = BigFloat {
            sign: 1,
            offset: -31,
            width: 32,
            chunks: vec![2147483648],
        };
        let dd = b.to_double_double();
        assert_eq!(dd.hi(), 1.0);
        assert_eq!(dd.lo(), 0.0);
        assert_eq!(b.to_f64(), 1.0);
    }

    #[test]
    fn test_two_and_a_half() {
        let b = BigFloat {
            sign: 1,
            offset: -30,
            width: 32,
            chunks: vec![2684354560],
        };
        assert_eq!(b.to_f64(), 2.5);
    }

    #[test]
    fn test_negative() {
        let b = BigFloat {
            sign: -1,
            offset: -30,
            width: 32,
            chunks: vec![3221225472],
        };
        let dd = b.to_double_double();
        assert_eq!(dd.hi(), -3.0);
        assert_eq!(dd.lo(), 0.0);
    }

    #[test]
    fn test_multi_chunk_rounding() {
        // 1 + 2^-63 + 2^-64 needs two f64 words
        let b = BigFloat {
            sign: 1,
            offset: -31,
            width: 32,
            chunks: vec![2147483648, 1, 2147483648],
        };
        let dd = b.to_double_double();
        let want = DoubleDouble::from(1.0)
            + DoubleDouble::from(f64::powi(2.0, -63))
            + DoubleDouble::from(f64::powi(2.0, -64));
        assert_eq!(dd, want);
    }

    #[test]
    fn test_to_f64_matches_pair_hi() {
        let b = BigFloat {
            sign: 1,
            offset: -30,
            width: 32,
            chunks: vec![3373259426, 560513588, 3301335691],
        };
        assert_eq!(b.to_f64(), b.to_double_double().hi());
        assert_eq!(b.to_f64(), std::f64::consts::PI);
    }
}
