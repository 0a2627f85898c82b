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

//! Double-double (106-bit) extended precision arithmetic.
//!
//! A [`DoubleDouble`] carries a value as an unevaluated sum of two f64
//! words.  Addition, subtraction, multiplication, division, square
//! root and their friends are correctly rounded to 0.5 ULP of the
//! 106-bit result; the transcendental layer (sin, cos, exp, expm1,
//! log, log1p, atan) stays within about the same bound.  All
//! operations are pure, never panic on numeric input, and follow IEEE
//! conventions for NaN, infinities and signed zero.
//!
//! The [`harness`] module and the `ddcheck` binary replay stored
//! reference vectors against the library, measuring disagreement in
//! ULPs.
#![allow(clippy::excessive_precision, clippy::approx_constant)]
#![deny(unreachable_pub)]
#![forbid(unsafe_code)]
mod arith;
mod atan;
mod bigfloat;
mod common;
mod dd;
mod eft;
mod err;
mod exp;
mod fmt;
pub mod harness;
mod hires;
mod log;
mod reduce;
mod selfcheck;
mod sincos;
mod triple;

pub use bigfloat::BigFloat;
pub use dd::DoubleDouble;
pub use err::{HarnessError, ParseFloatError, SelfCheckError};
pub use fmt::{format_hex_binary, parse_float};
pub use selfcheck::quick_test;
