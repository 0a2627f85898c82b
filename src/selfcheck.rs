/*
 * // Copyright (c) Radzivon Bartoshyk 6/2025. All rights reserved.
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
use crate::err::SelfCheckError;
use crate::hires;

/// Fast sanity check of the transcendental layer against stored
/// reference values.  Every comparison demands exact limb equality, so
/// any platform or build quirk that perturbs the arithmetic by even one
/// bit is caught.  Returns the first mismatch.
pub fn quick_test() -> Result<(), SelfCheckError> {
    let log2 = DoubleDouble::from_parts(hires::LOG2[0], hires::LOG2[1]);
    let check = DoubleDouble::from(2.0).ln();
    if check != log2 {
        return Err(SelfCheckError {
            name: "log(2)",
            observed: check,
            expected: log2,
        });
    }

    let check = DoubleDouble::from(-0.5).ln_1p();
    if check != -log2 {
        return Err(SelfCheckError {
            name: "log1p(-1/2)",
            observed: check,
            expected: -log2,
        });
    }

    let check = 4.0 * DoubleDouble::from(1.0).atan();
    if check != DoubleDouble::PI {
        return Err(SelfCheckError {
            name: "4*atan(1)",
            observed: check,
            expected: DoubleDouble::PI,
        });
    }

    // Sin and cos for a large input, exercising the argument reduction
    // block path.
    let sin_ref = DoubleDouble::from_parts(
        ldexp_k(8700223823437620.0, -53),
        ldexp_k(-7046851665223794.0, -110),
    );
    let cos_ref = DoubleDouble::from_parts(
        ldexp_k(4662936343848225.0, -54),
        ldexp_k(4889264888245350.0, -109),
    );
    let scinput = DoubleDouble::from(63.0 * 1125899906842624.0);
    let (sin_check, cos_check) = scinput.sin_cos();
    if sin_check != sin_ref {
        return Err(SelfCheckError {
            name: "sin(63*2^50)",
            observed: sin_check,
            expected: sin_ref,
        });
    }
    if cos_check != cos_ref {
        return Err(SelfCheckError {
            name: "cos(63*2^50)",
            observed: cos_check,
            expected: cos_ref,
        });
    }
    Ok(())
}
