//! Per-case verdicts, per-suite aggregation, and the contest output file.
//!
//! Cases of one suite are folded into a single [`SuiteReport`] unless a
//! case is marked standalone, in which case it forms a group of its own.
//! The run's score is the sum of its suites' scores; the verdict is
//! accepted as soon as any suite earns points.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use indexmap::IndexMap;

/// Which run mode selects a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestKind {
    /// Sample case, run in public mode.
    Public,
    /// Hidden case, run in private mode.
    Private,
}

/// Outcome of one case, one suite, or the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseVerdict {
    /// Passed.
    Accepted,
    /// An assertion in the body failed.
    Failed,
    /// Skipped because a prerequisite case did not pass.
    DependencyFailed,
    /// The watched run, or the whole run, exceeded its time limit.
    TimeLimitExceeded,
    /// The harness itself could not judge.
    CheckFailed,
}

impl fmt::Display for CaseVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accepted => "ACCEPTED",
            Self::Failed => "FAILED",
            Self::DependencyFailed => "DEPENDENCY_FAILED",
            Self::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Self::CheckFailed => "CHECK_FAILED",
        };
        f.write_str(s)
    }
}

/// Result of one case.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseReport {
    /// Suite the case belongs to.
    pub suite: String,
    /// Case name within the suite.
    pub name: String,
    /// Run mode that selects the case.
    pub kind: TestKind,
    /// Outcome.
    pub verdict: CaseVerdict,
    /// Points earned: `max_score` when accepted, otherwise 0.
    pub score: f64,
    /// Points available.
    pub max_score: f64,
    /// Wall time spent, zero for skipped cases.
    pub elapsed: Duration,
    /// Reported as its own group instead of folding into the suite.
    pub standalone: bool,
}

impl CaseReport {
    /// `suite.name`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }

    /// Whether the case passed.
    pub fn passed(&self) -> bool {
        self.verdict == CaseVerdict::Accepted
    }

    /// One summary line: `[  OK  ] (score: 1 / 1)` padded, then the name.
    pub fn log_line(&self) -> String {
        let tag = if self.passed() { "  OK  " } else { " FAIL " };
        let result = format!(
            "[{tag}] (score: {} / {})",
            round_score(self.score),
            round_score(self.max_score)
        );
        format!("{result:<35}{}", self.full_name())
    }
}

/// Aggregate of the cases of one suite (or one standalone case).
#[derive(Clone, Debug, PartialEq)]
pub struct SuiteReport {
    /// `suite.*`, or the full name of a standalone case.
    pub name: String,
    /// `Accepted` only if every case passed.
    pub verdict: CaseVerdict,
    /// Sum of case scores.
    pub score: f64,
    /// Sum of case maxima.
    pub max_score: f64,
    /// Sum of case times.
    pub elapsed: Duration,
    /// Cases in run order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    fn new(name: String) -> Self {
        Self {
            name,
            verdict: CaseVerdict::Accepted,
            score: 0.0,
            max_score: 0.0,
            elapsed: Duration::ZERO,
            cases: Vec::new(),
        }
    }

    fn push(&mut self, case: CaseReport) {
        self.score += case.score;
        self.max_score += case.max_score;
        self.elapsed += case.elapsed;
        if !case.passed() {
            self.verdict = CaseVerdict::Failed;
        }
        self.cases.push(case);
    }

    /// Cases that passed.
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }
}

/// Outcome of a whole run.
#[derive(Clone, Debug, PartialEq)]
pub struct TestingReport {
    /// `Accepted` if any suite scored, `Failed` otherwise, or the reason the
    /// run was aborted.
    pub verdict: CaseVerdict,
    /// Points earned.
    pub score: f64,
    /// Points available.
    pub max_score: f64,
    /// Total case time.
    pub elapsed: Duration,
    /// Groups in first-seen order.
    pub suites: Vec<SuiteReport>,
    /// Why the run was aborted, if it was.
    pub comment: Option<String>,
}

impl TestingReport {
    /// Group `cases` by suite and total them.
    pub fn from_cases(cases: Vec<CaseReport>) -> Self {
        let mut groups: IndexMap<String, SuiteReport> = IndexMap::new();
        for case in cases {
            let key = if case.standalone {
                case.full_name()
            } else {
                format!("{}.*", case.suite)
            };
            groups
                .entry(key.clone())
                .or_insert_with(|| SuiteReport::new(key))
                .push(case);
        }

        let mut report = Self::empty(CaseVerdict::Failed);
        for (_, suite) in groups {
            report.score += suite.score;
            report.max_score += suite.max_score;
            report.elapsed += suite.elapsed;
            if suite.score > 0.0 {
                report.verdict = CaseVerdict::Accepted;
            }
            report.suites.push(suite);
        }
        report
    }

    /// A run that stopped before producing results. Scores zero.
    pub fn aborted(verdict: CaseVerdict, comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::empty(verdict)
        }
    }

    fn empty(verdict: CaseVerdict) -> Self {
        Self {
            verdict,
            score: 0.0,
            max_score: 0.0,
            elapsed: Duration::ZERO,
            suites: Vec::new(),
            comment: None,
        }
    }

    /// Every case in run order.
    pub fn cases(&self) -> impl Iterator<Item = &CaseReport> + '_ {
        self.suites.iter().flat_map(|s| s.cases.iter())
    }

    /// Number of cases.
    pub fn tests_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    /// Number of passed cases.
    pub fn passed_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::passed).sum()
    }

    /// Human-readable summary: one line per case, then the totals.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(comment) = &self.comment {
            writeln!(out, "{comment}")?;
        }
        for case in self.cases() {
            writeln!(out, "{}", case.log_line())?;
        }
        writeln!(
            out,
            "Passed {} out of {} tests",
            self.passed_count(),
            self.tests_count()
        )?;
        writeln!(
            out,
            "Total score: {} out of {}",
            round_score(self.score),
            round_score(self.max_score)
        )?;
        out.flush()
    }
}

/// `score` rounded to three decimal places.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Content of the contest output file: the secret, a newline, and the
/// rounded score.
pub fn contest_output(secret: &str, score: f64) -> String {
    format!("{secret}\n{}", round_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(suite: &str, name: &str, verdict: CaseVerdict, max: f64) -> CaseReport {
        CaseReport {
            suite: suite.into(),
            name: name.into(),
            kind: TestKind::Private,
            verdict,
            score: if verdict == CaseVerdict::Accepted { max } else { 0.0 },
            max_score: max,
            elapsed: Duration::from_millis(10),
            standalone: false,
        }
    }

    #[test]
    fn cases_fold_into_suites_in_first_seen_order() {
        let mut solo = case("Sort", "Huge", CaseVerdict::Accepted, 5.0);
        solo.standalone = true;
        let report = TestingReport::from_cases(vec![
            case("Sort", "Small", CaseVerdict::Accepted, 1.0),
            case("Search", "Empty", CaseVerdict::Failed, 2.0),
            case("Sort", "Large", CaseVerdict::DependencyFailed, 3.0),
            solo,
        ]);

        let names: Vec<&str> = report.suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Sort.*", "Search.*", "Sort.Huge"]);
        assert_eq!(report.suites[0].verdict, CaseVerdict::Failed);
        assert_eq!(report.suites[0].score, 1.0);
        assert_eq!(report.suites[0].max_score, 4.0);
        assert_eq!(report.suites[2].verdict, CaseVerdict::Accepted);
        assert_eq!((report.score, report.max_score), (6.0, 11.0));
        assert_eq!((report.passed_count(), report.tests_count()), (2, 4));
        assert_eq!(report.verdict, CaseVerdict::Accepted);
    }

    #[test]
    fn no_points_means_failed() {
        let report = TestingReport::from_cases(vec![case("A", "x", CaseVerdict::Failed, 1.0)]);
        assert_eq!(report.verdict, CaseVerdict::Failed);
        assert_eq!(TestingReport::from_cases(vec![]).verdict, CaseVerdict::Failed);
    }

    #[test]
    fn scores_round_to_three_places() {
        assert_eq!(round_score(2.0 / 3.0), 0.667);
        assert_eq!(contest_output("tok", 2.0 / 3.0), "tok\n0.667");
        assert_eq!(contest_output("tok", 4.0), "tok\n4");
        assert_eq!(contest_output("", 0.0), "\n0");
    }

    #[test]
    fn summary_lists_cases_then_totals() {
        let report = TestingReport::from_cases(vec![
            case("Sort", "Small", CaseVerdict::Accepted, 1.0),
            case("Sort", "Large", CaseVerdict::Failed, 2.5),
        ]);
        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("{:<35}Sort.Small", "[  OK  ] (score: 1 / 1)"));
        assert_eq!(lines[1], format!("{:<35}Sort.Large", "[ FAIL ] (score: 0 / 2.5)"));
        assert_eq!(lines[2], "Passed 1 out of 2 tests");
        assert_eq!(lines[3], "Total score: 1 out of 3.5");
    }

    #[test]
    fn aborted_report_carries_its_comment() {
        let report = TestingReport::aborted(CaseVerdict::TimeLimitExceeded, "TLE: too slow");
        assert_eq!(report.score, 0.0);
        assert_eq!(report.comment.as_deref(), Some("TLE: too slow"));
        assert_eq!(report.tests_count(), 0);
    }
}
