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

//! Reference-vector checker for the double-double library.
//!
//! ```text
//!   ddcheck quicktest
//!   ddcheck basetest [-slack amount]
//!   ddcheck test <file|-> [-slack amount]
//!   ddcheck formatsample
//! ```

use std::fs::File;
use std::io::{self, BufReader};

use doubledouble::harness::{self, RunSummary};
use doubledouble::{DoubleDouble, quick_test};

fn usage() -> ! {
    eprintln!("Usage: ddcheck quicktest");
    eprintln!("       ddcheck basetest [-slack amount]");
    eprintln!("       ddcheck test <file|-> [-slack amount]");
    eprintln!("       ddcheck formatsample");
    std::process::exit(2);
}

fn finish(summary: RunSummary) -> i32 {
    let total = summary.passed + summary.failed;
    if summary.failed > 0 {
        eprintln!("ERROR: {}/{} tests failed.", summary.failed, total);
        1
    } else {
        println!("All {} tests passed.", total);
        0
    }
}

fn format_sample() -> i32 {
    let tests = [
        DoubleDouble::PI,
        DoubleDouble::PI.ldexp(520),
        DoubleDouble::PI.ldexp(1022),
        DoubleDouble::PI.ldexp(-969),
        DoubleDouble::PI.ldexp(-972),
        DoubleDouble::PI.ldexp(-975),
        DoubleDouble::PI.ldexp(-1028),
        DoubleDouble::from(-999999.75),
        DoubleDouble::new(1.0, -f64::EPSILON / 4.0),
        DoubleDouble::new(1.0, -f64::EPSILON / 12.0),
        DoubleDouble::from(f64::EPSILON / 12.0),
    ];
    for (i, t) in tests.iter().enumerate() {
        if i != 0 {
            println!();
        }
        println!("--- TEST {:2}, VAL: {:.12e} ---", i, t.hi());
        println!("+++ HEXVAL: {}", t);
        for p in 0..38 {
            println!(" check {:2}: {}", p, t.format_sci(p));
        }
    }
    0
}

fn run() -> i32 {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut slack = harness::DEFAULT_SLACK;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-slack" {
            if i + 1 >= args.len() {
                usage();
            }
            slack = match args[i + 1].parse::<f64>() {
                Ok(v) => v,
                Err(_) => usage(),
            };
            args.drain(i..i + 2);
        } else {
            i += 1;
        }
    }

    match args.len() {
        1 if args[0] == "quicktest" => match quick_test() {
            Ok(()) => {
                println!("QuickTest passed.");
                0
            }
            Err(e) => {
                eprintln!("{e}");
                eprintln!("QuickTest failure.");
                1
            }
        },
        1 if args[0] == "formatsample" => format_sample(),
        1 if args[0] == "basetest" => match harness::base_cases() {
            Ok(cases) => finish(harness::run_cases(&cases, slack)),
            Err(e) => {
                eprintln!("{e}");
                1
            }
        },
        2 if args[0] == "test" => {
            let filename = &args[1];
            let summary = if filename == "-" {
                harness::run_stream(io::stdin().lock(), slack)
            } else {
                match File::open(filename) {
                    Ok(f) => harness::run_stream(BufReader::new(f), slack),
                    Err(e) => {
                        eprintln!("Error: unable to open test file \"{filename}\": {e}");
                        return 1;
                    }
                }
            };
            match summary {
                Ok(s) => finish(s),
                Err(e) => {
                    eprintln!("{e}");
                    1
                }
            }
        }
        _ => usage(),
    }
}

fn main() {
    std::process::exit(run());
}
