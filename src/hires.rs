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

//! Extended-precision constants, stored as sequences of non-overlapping
//! f64 limbs so that the first two or three limbs form a valid
//! double-double (triple) representation.  Each limb is the correctly
//! rounded residual left after subtracting the preceding limbs.

use crate::common::pow2i;

/// pi to five limbs, about 265 bits.
pub(crate) const PI: [f64; 5] = [
    f64::from_bits(0x400921fb54442d18),
    f64::from_bits(0x3ca1a62633145c07),
    f64::from_bits(0xb92f1976b7ed8fbc),
    f64::from_bits(0x35c4cf98e804177d),
    f64::from_bits(0x32631d89cd9128a5),
];

/// log(2) to three limbs.
pub(crate) const LOG2: [f64; 3] = [
    f64::from_bits(0x3fe62e42fefa39ef),
    f64::from_bits(0x3c7abc9e3b39803f),
    f64::from_bits(0x3907b57a079a1934),
];

/// 53 * log(2), the mantissa-width shift used by the log range split.
pub(crate) const LOG2_MANT: [f64; 3] = [
    f64::from_bits(0x40425e4f7b2737fa),
    f64::from_bits(0x3cc8486612173c69),
    f64::from_bits(0xb9665db6f1b46321),
];

/// sqrt(2) to three limbs.
pub(crate) const SQRT2: [f64; 3] = [
    f64::from_bits(0x3ff6a09e667f3bcd),
    f64::from_bits(0xbc9bdd3413b26456),
    f64::from_bits(0x39357d3e3adec175),
];

/// pi/2 broken into 27-bit chunks, chunk i scaled by 2^(-26-27i).
/// 32 chunks cover 864 bits, enough to absorb the worst-case
/// cancellation in the subtraction reduction path.
pub(crate) const HALFPI: [f64; 32] = [
    105414357.0 * pow2i(-26),
    8935984.0 * pow2i(-53),
    74025356.0 * pow2i(-80),
    103331853.0 * pow2i(-107),
    101607572.0 * pow2i(-134),
    67713058.0 * pow2i(-161),
    21821838.0 * pow2i(-188),
    67242942.0 * pow2i(-215),
    87152796.0 * pow2i(-242),
    113808466.0 * pow2i(-269),
    68219676.0 * pow2i(-296),
    54545886.0 * pow2i(-323),
    130714841.0 * pow2i(-350),
    120908044.0 * pow2i(-377),
    57017697.0 * pow2i(-404),
    40759903.0 * pow2i(-431),
    10599039.0 * pow2i(-458),
    5069659.0 * pow2i(-485),
    44270731.0 * pow2i(-512),
    105405271.0 * pow2i(-539),
    53555007.0 * pow2i(-566),
    52154673.0 * pow2i(-593),
    6108358.0 * pow2i(-620),
    132999947.0 * pow2i(-647),
    133883319.0 * pow2i(-674),
    83996155.0 * pow2i(-701),
    64778455.0 * pow2i(-728),
    129345689.0 * pow2i(-755),
    131258191.0 * pow2i(-782),
    76563953.0 * pow2i(-809),
    23329993.0 * pow2i(-836),
    19424849.0 * pow2i(-863),
];

/// 1/(2 pi) as unscaled 27-bit integer chunks; the block reduction
/// applies its own running scale.
pub(crate) const INVTWOPI: [f64; 64] = [
    85445659.0, 60002565.0, 39057486.0, 92086099.0, 40820845.0, 92952164.0, 126382600.0,
    33444195.0, 90109406.0, 22572489.0, 14447748.0, 81604096.0, 52729717.0, 2573896.0, 60801981.0,
    52212009.0, 87684932.0, 9272651.0, 91654409.0, 110741250.0, 56242111.0, 17098311.0,
    46608490.0, 54129820.0, 69401693.0, 125717006.0, 104853807.0, 134078553.0, 67630999.0,
    71708008.0, 21865453.0, 87457487.0, 20863053.0, 97767823.0, 114113727.0, 111335250.0,
    64840693.0, 127387116.0, 127985470.0, 126505618.0, 122904538.0, 132925411.0, 45748396.0,
    3343471.0, 104707541.0, 130236144.0, 68378246.0, 102607331.0, 76221175.0, 25608729.0,
    53676734.0, 21628548.0, 4653036.0, 33633740.0, 82190528.0, 102061770.0, 60638795.0, 3710704.0,
    18405007.0, 71408694.0, 65465972.0, 2402829.0, 54038225.0, 60169382.0,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigfloat::BigFloat;

    // 2048-bit chunk vectors for the same constants, to cross-check
    // the limb tables above.
    fn big_pi() -> BigFloat {
        BigFloat {
            sign: 1,
            offset: -30,
            width: 32,
            chunks: vec![
                3373259426, 560513588, 3301335691, 2161908945, 688016904, 2322058356, 34324134,
                991140642, 1363806329, 2385773789, 4019526067, 3443147547, 808127085, 4066317367,
                1340159341, 1834074693, 3833967990, 1650360006, 4098638569, 2788683115,
            ],
        }
    }

    fn big_log2() -> BigFloat {
        BigFloat {
            sign: 1,
            offset: -32,
            width: 32,
            chunks: vec![
                2977044471, 3520035243, 3387143064, 66254511, 1089684262, 1922610733, 2316113755,
                2343238187, 3887625760, 1844161688, 1435849467, 1257904912, 3979259445, 3241681220,
                660028201, 292141093, 1050069526, 575334597, 449567249, 830224510,
            ],
        }
    }

    fn big_sqrt2() -> BigFloat {
        BigFloat {
            sign: 1,
            offset: -31,
            width: 32,
            chunks: vec![
                3037000499, 4192101508, 1501399475, 1967832735, 493838522, 2302388300, 3977751685,
                2201196821, 1258062596, 985178819, 2830237295, 3699628857, 259303518, 1134328650,
                2013562678, 1039804264, 3525324423, 1118773070, 1392876640, 297546619,
            ],
        }
    }

    #[test]
    fn test_pi_limbs() {
        let dd = big_pi().to_double_double();
        assert_eq!((dd.hi(), dd.lo()), (PI[0], PI[1]));
    }

    #[test]
    fn test_log2_limbs() {
        let dd = big_log2().to_double_double();
        assert_eq!((dd.hi(), dd.lo()), (LOG2[0], LOG2[1]));
    }

    #[test]
    fn test_sqrt2_limbs() {
        let dd = big_sqrt2().to_double_double();
        assert_eq!((dd.hi(), dd.lo()), (SQRT2[0], SQRT2[1]));
    }

    #[test]
    fn test_halfpi_chunks_sum_to_half_pi() {
        // leading chunks reassemble the double-double pi/2
        let mut acc = crate::DoubleDouble::from(HALFPI[4]);
        for i in (0..4).rev() {
            acc = acc + crate::DoubleDouble::from(HALFPI[i]);
        }
        assert_eq!(acc.hi(), 0.5 * PI[0]);
        assert_eq!(acc.lo(), 0.5 * PI[1]);
    }

    #[test]
    fn test_invtwopi_leading_chunks() {
        // sum of the first chunks scaled by 2^(-29-27i) approximates 1/(2 pi)
        let mut acc = 0.0f64;
        let mut scale = pow2i(-29);
        for &c in INVTWOPI.iter().take(3) {
            acc += c * scale;
            scale *= pow2i(-27);
        }
        let inv_two_pi = 1.0 / (2.0 * std::f64::consts::PI);
        assert!((acc - inv_two_pi).abs() < 1e-16);
    }
}
