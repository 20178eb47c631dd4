//! Contest checker for judgekit grading runs.
//!
//! A graded test binary prints the run secret followed by its score. The
//! checker compares that secret with the one in the jury answer file,
//! applies the public-case override, and reports `points <score>` with
//! the exit status the contest system expects:
//!
//! | Status | Meaning                                   |
//! |--------|-------------------------------------------|
//! | 0      | accepted, non-zero score                  |
//! | 1      | wrong answer, zero score                  |
//! | 3      | an input file or the report was unusable  |
//! | 5      | the secret did not match                  |
//!
//! Only whitespace-separated tokens matter; line structure is ignored.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use error::{CheckerError, EXIT_IO_FAILURE};

/// First input token marking a public (sample) case.
pub const PUBLIC_CASE: &str = "public";

/// Message printed when the participant secret is wrong.
pub const SECRET_MISMATCH_MESSAGE: &str = "Potential security violation - incorrect secret.";

/// Report line of a zero-score verdict.
pub const WRONG_ANSWER_REPORT: &str = "points  0";

/// Outcome of checking one test case.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// Non-zero score, or a public case.
    Accepted {
        /// Reported score.
        points: f64,
    },
    /// Zero score on a non-public case.
    WrongAnswer {
        /// Reported score (always zero).
        points: f64,
    },
    /// The output's secret differs from the answer's.
    SecretMismatch,
}

impl Verdict {
    /// Process exit status for this verdict.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Accepted { .. } => 0,
            Self::WrongAnswer { .. } => 1,
            Self::SecretMismatch => 5,
        }
    }

    /// The single report line, without a trailing newline.
    ///
    /// A wrong answer reports `points  0`, with two spaces.
    pub fn report(&self) -> String {
        match self {
            Self::Accepted { points } => format!("points {points}"),
            Self::WrongAnswer { .. } => WRONG_ANSWER_REPORT.to_owned(),
            Self::SecretMismatch => SECRET_MISMATCH_MESSAGE.to_owned(),
        }
    }
}

/// Check one case from the contents of its three files.
pub fn check(input: &str, output: &str, answer: &str) -> Verdict {
    let mut output_tokens = output.split_whitespace();
    let participant_secret = output_tokens.next().unwrap_or("");
    let jury_secret = answer.split_whitespace().next().unwrap_or("");
    if participant_secret != jury_secret {
        log::warn!("participant secret does not match the jury answer");
        return Verdict::SecretMismatch;
    }

    let score = output_tokens.next().map_or(0.0, parse_score);
    let public = input.split_whitespace().next() == Some(PUBLIC_CASE);
    log::debug!("score {score}, public case: {public}");

    if public {
        Verdict::Accepted { points: 1.0 }
    } else if score == 0.0 {
        Verdict::WrongAnswer { points: 0.0 }
    } else {
        Verdict::Accepted { points: score }
    }
}

fn parse_score(token: &str) -> f64 {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::debug!("unparseable score token {token:?}, treating as 0");
            0.0
        }
    }
}

/// Read a checker input file. Invalid UTF-8 is replaced, not rejected.
pub fn read_file(path: &Path) -> Result<String, CheckerError> {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|source| CheckerError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the three files and check them.
pub fn check_files(input: &Path, output: &Path, answer: &Path) -> Result<Verdict, CheckerError> {
    let input = read_file(input)?;
    let output = read_file(output)?;
    let answer = read_file(answer)?;
    Ok(check(&input, &output, &answer))
}

/// Write the verdict's report line to `destination`, or to standard
/// output when `None`.
pub fn write_report(verdict: &Verdict, destination: Option<&Path>) -> Result<(), CheckerError> {
    let line = verdict.report();
    match destination {
        Some(path) => {
            fs::write(path, format!("{line}\n")).map_err(|source| CheckerError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{line}")
                .and_then(|()| out.flush())
                .map_err(|source| CheckerError::Write {
                    path: PathBuf::from("-"),
                    source,
                })
        }
    }
}
