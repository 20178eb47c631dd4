//! Scored test registry and the contest run.
//!
//! A [`Tester`] holds every scored case of an assignment. A contest run
//! reads the input file to learn whether this is the public or the
//! private pass, runs the matching cases in registration order, and writes
//! the output file the checker reads: the pass's output secret and the
//! score.
//!
//! ```no_run
//! use std::time::Duration;
//! use judgekit_harness::{ContestIo, ContestSecrets, TestCase, Tester};
//!
//! let mut tester = Tester::new(Duration::from_secs(60));
//! tester.add(TestCase::public("Sum", "Sample", 0.0, |ctx| {
//!     ctx.ro_array(&[1, 2, 3], |v| assert_eq!(v.iter().sum::<i32>(), 6));
//! }));
//! tester.add(TestCase::private("Sum", "Random", 2.0, |ctx| {
//!     let v = ctx.rng().random_i32_array(100, -5, 5);
//!     let expected: i32 = v.iter().sum();
//!     ctx.ro_array(&v, |view| assert_eq!(view.iter().sum::<i32>(), expected));
//! }));
//!
//! let io = ContestIo::new("input.txt", "output.txt", ContestSecrets::new("pub-key", "priv-key"));
//! let report = tester.run_contest(&io).expect("contest files unusable");
//! println!("score {}", report.score);
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SafeTestConfig;
use crate::context::TestContext;
use crate::error::HarnessError;
use crate::panics::catch_panic;
use crate::report::{contest_output, CaseReport, CaseVerdict, TestKind, TestingReport};
use crate::safe_test::drive;

type CaseBody = dyn Fn(&mut TestContext) + Send + Sync;

/// Which cases a run executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestMode {
    /// Public cases only.
    Public,
    /// Private cases only.
    Private,
    /// Public cases, then private ones.
    All,
}

impl TestMode {
    fn selects(self, kind: TestKind) -> bool {
        match self {
            Self::Public => kind == TestKind::Public,
            Self::Private => kind == TestKind::Private,
            Self::All => true,
        }
    }
}

/// Input tokens that select a pass, and the secret each pass writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContestSecrets {
    /// Input content selecting the public pass. Default `public`.
    pub public_input: String,
    /// Output secret of the public pass.
    pub public_output: String,
    /// Input content selecting the private pass. Default `private`.
    pub private_input: String,
    /// Output secret of the private pass.
    pub private_output: String,
}

impl ContestSecrets {
    /// Secrets with the standard `public` / `private` input tokens.
    pub fn new(public_output: impl Into<String>, private_output: impl Into<String>) -> Self {
        Self {
            public_input: "public".into(),
            public_output: public_output.into(),
            private_input: "private".into(),
            private_output: private_output.into(),
        }
    }

    /// The pass selected by `input` (surrounding whitespace ignored) and
    /// its output secret.
    pub fn mode_for(&self, input: &str) -> Option<(TestMode, &str)> {
        let input = input.trim();
        if input == self.public_input {
            Some((TestMode::Public, &self.public_output))
        } else if input == self.private_input {
            Some((TestMode::Private, &self.private_output))
        } else {
            None
        }
    }
}

/// Files and secrets of one contest run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContestIo {
    /// File holding the pass selector.
    pub input: PathBuf,
    /// File the secret and score are written to.
    pub output: PathBuf,
    /// Pass selectors and secrets.
    pub secrets: ContestSecrets,
    /// Print the per-case summary to stderr. Default: true.
    pub print_summary: bool,
}

impl ContestIo {
    /// Contest files with the summary printed to stderr.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        secrets: ContestSecrets,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            secrets,
            print_summary: true,
        }
    }

    /// Set whether the summary is printed.
    pub fn print_summary(mut self, print: bool) -> Self {
        self.print_summary = print;
        self
    }
}

/// One scored case.
#[derive(Clone)]
pub struct TestCase {
    suite: String,
    name: String,
    kind: TestKind,
    max_score: f64,
    config: SafeTestConfig,
    prerequisites: Vec<String>,
    standalone: bool,
    body: Arc<CaseBody>,
}

impl TestCase {
    /// A case run in the public pass.
    pub fn public<F>(
        suite: impl Into<String>,
        name: impl Into<String>,
        max_score: f64,
        body: F,
    ) -> Self
    where
        F: Fn(&mut TestContext) + Send + Sync + 'static,
    {
        Self::new(suite, name, TestKind::Public, max_score, Arc::new(body))
    }

    /// A case run in the private pass.
    pub fn private<F>(
        suite: impl Into<String>,
        name: impl Into<String>,
        max_score: f64,
        body: F,
    ) -> Self
    where
        F: Fn(&mut TestContext) + Send + Sync + 'static,
    {
        Self::new(suite, name, TestKind::Private, max_score, Arc::new(body))
    }

    fn new(
        suite: impl Into<String>,
        name: impl Into<String>,
        kind: TestKind,
        max_score: f64,
        body: Arc<CaseBody>,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            kind,
            max_score,
            config: SafeTestConfig::default(),
            prerequisites: Vec::new(),
            standalone: false,
            body,
        }
    }

    /// Replace the time budget, iteration count and seed.
    pub fn config(mut self, config: SafeTestConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip this case with `DependencyFailed` unless the case named
    /// `suite.name` passed earlier in the run.
    pub fn after(mut self, full_name: impl Into<String>) -> Self {
        self.prerequisites.push(full_name.into());
        self
    }

    /// Report this case as its own group.
    pub fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }

    /// `suite.name`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }

    fn report(&self, verdict: CaseVerdict, elapsed: Duration) -> CaseReport {
        CaseReport {
            suite: self.suite.clone(),
            name: self.name.clone(),
            kind: self.kind,
            verdict,
            score: if verdict == CaseVerdict::Accepted {
                self.max_score
            } else {
                0.0
            },
            max_score: self.max_score,
            elapsed,
            standalone: self.standalone,
        }
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.full_name())
            .field("kind", &self.kind)
            .field("max_score", &self.max_score)
            .field("prerequisites", &self.prerequisites)
            .finish_non_exhaustive()
    }
}

/// Registry of scored cases with an overall time limit.
#[derive(Debug)]
pub struct Tester {
    cases: Vec<TestCase>,
    overall_limit: Duration,
}

impl Tester {
    /// Comment of a run stopped by the overall time limit.
    pub const OVERALL_TLE_COMMENT: &'static str =
        "TLE: General time limit exceeded. Testing aborted.";

    /// An empty registry whose runs abort once case time exceeds
    /// `overall_limit`.
    pub fn new(overall_limit: Duration) -> Self {
        Self {
            cases: Vec::new(),
            overall_limit,
        }
    }

    /// Register a case.
    pub fn add(&mut self, case: TestCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    /// Registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no case is registered.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run the cases `mode` selects and aggregate the results.
    ///
    /// `All` runs public cases before private ones.
    pub fn run(&self, mode: TestMode) -> TestingReport {
        let selected: Vec<&TestCase> = match mode {
            TestMode::All => self
                .cases
                .iter()
                .filter(|c| c.kind == TestKind::Public)
                .chain(self.cases.iter().filter(|c| c.kind == TestKind::Private))
                .collect(),
            _ => self.cases.iter().filter(|c| mode.selects(c.kind)).collect(),
        };
        log::info!("running {} case(s) in {mode:?} mode", selected.len());

        let mut outcomes: HashMap<String, CaseVerdict> = HashMap::new();
        let mut reports = Vec::with_capacity(selected.len());
        let mut total = Duration::ZERO;
        for case in selected {
            let full_name = case.full_name();
            let blocked = case
                .prerequisites
                .iter()
                .any(|p| outcomes.get(p).is_some_and(|v| *v != CaseVerdict::Accepted));
            if blocked {
                log::info!("skipping {full_name} (dependency failed)");
                outcomes.insert(full_name, CaseVerdict::DependencyFailed);
                reports.push(case.report(CaseVerdict::DependencyFailed, Duration::ZERO));
                continue;
            }

            log::info!("running {full_name}");
            let start = Instant::now();
            let outcome = catch_panic(|| drive(&full_name, &case.config, Arc::clone(&case.body)));
            let elapsed = start.elapsed();
            let verdict = match outcome {
                Ok(Ok(())) => CaseVerdict::Accepted,
                Ok(Err(HarnessError::TimedOut { .. })) => CaseVerdict::TimeLimitExceeded,
                Ok(Err(HarnessError::Io(_))) => CaseVerdict::CheckFailed,
                Err(_) => CaseVerdict::Failed,
            };
            log::debug!("{full_name}: {verdict} in {} ms", elapsed.as_millis());

            total += elapsed;
            if total > self.overall_limit {
                log::warn!(
                    "case time {} ms exceeds overall limit {} ms",
                    total.as_millis(),
                    self.overall_limit.as_millis()
                );
                return TestingReport::aborted(
                    CaseVerdict::TimeLimitExceeded,
                    Self::OVERALL_TLE_COMMENT,
                );
            }

            outcomes.insert(full_name, verdict);
            reports.push(case.report(verdict, elapsed));
        }
        TestingReport::from_cases(reports)
    }

    /// Run the pass the input file selects and write the output file.
    ///
    /// An unrecognised input yields a `CheckFailed` report and an output
    /// file with an empty secret and a zero score.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if the input cannot be read or the output
    /// cannot be written.
    pub fn run_contest(&self, files: &ContestIo) -> Result<TestingReport, HarnessError> {
        let input = fs::read_to_string(&files.input)?;
        let (report, secret) = match files.secrets.mode_for(&input) {
            Some((mode, secret)) => (self.run(mode), secret),
            None => {
                log::warn!("input file does not name a known pass");
                (
                    TestingReport::aborted(CaseVerdict::CheckFailed, "CF: Wrong input secret!"),
                    "",
                )
            }
        };

        if files.print_summary {
            report.write_summary(&mut io::stderr().lock())?;
        }
        fs::write(&files.output, contest_output(secret, report.score))?;
        log::info!(
            "{}: score {} of {}",
            files.output.display(),
            report.score,
            report.max_score
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn quick() -> SafeTestConfig {
        SafeTestConfig::default().timeout_ms(2_000).iterations(0)
    }

    fn passing(suite: &str, name: &str, max: f64) -> TestCase {
        TestCase::private(suite, name, max, |_| {}).config(quick())
    }

    fn failing(suite: &str, name: &str, max: f64) -> TestCase {
        TestCase::private(suite, name, max, |_| panic!("wrong answer")).config(quick())
    }

    #[test]
    fn mode_selects_cases() {
        let mut t = Tester::new(Duration::from_secs(30));
        t.add(TestCase::public("S", "pub", 0.0, |_| {}).config(quick()))
            .add(passing("S", "priv", 1.0));
        assert_eq!(t.run(TestMode::Public).tests_count(), 1);
        assert_eq!(t.run(TestMode::Private).score, 1.0);
        let all = t.run(TestMode::All);
        let order: Vec<String> = all.cases().map(CaseReport::full_name).collect();
        assert_eq!(order, ["S.pub", "S.priv"]);
    }

    #[test]
    fn failed_prerequisite_skips_dependents() {
        let mut t = Tester::new(Duration::from_secs(30));
        t.add(failing("Tree", "Insert", 1.0))
            .add(passing("Tree", "Erase", 2.0).after("Tree.Insert"))
            .add(passing("Tree", "Size", 3.0).after("Tree.Erase"))
            .add(passing("List", "Push", 4.0).after("Tree.Missing"));
        let report = t.run(TestMode::Private);
        let verdicts: Vec<CaseVerdict> = report.cases().map(|c| c.verdict).collect();
        assert_eq!(
            verdicts,
            [
                CaseVerdict::Failed,
                CaseVerdict::DependencyFailed,
                CaseVerdict::DependencyFailed,
                CaseVerdict::Accepted,
            ]
        );
        assert_eq!(report.score, 4.0);
    }

    #[test]
    fn slow_case_is_time_limit_exceeded() {
        let mut t = Tester::new(Duration::from_secs(30));
        t.add(
            TestCase::private("Slow", "Sleep", 1.0, |_| thread::sleep(Duration::from_millis(500)))
                .config(quick().timeout_ms(20)),
        );
        let report = t.run(TestMode::Private);
        assert_eq!(report.suites[0].cases[0].verdict, CaseVerdict::TimeLimitExceeded);
        assert_eq!(report.verdict, CaseVerdict::Failed);
    }

    #[test]
    fn overall_limit_aborts_the_run() {
        let mut t = Tester::new(Duration::from_millis(30));
        for i in 0..3 {
            t.add(
                TestCase::private("Slow", format!("Case{i}"), 1.0, |_| {
                    thread::sleep(Duration::from_millis(20))
                })
                .config(quick()),
            );
        }
        let report = t.run(TestMode::Private);
        assert_eq!(report.verdict, CaseVerdict::TimeLimitExceeded);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.comment.as_deref(), Some(Tester::OVERALL_TLE_COMMENT));
    }

    #[test]
    fn secrets_select_the_pass() {
        let s = ContestSecrets::new("P", "Q");
        assert_eq!(s.mode_for("public\n"), Some((TestMode::Public, "P")));
        assert_eq!(s.mode_for("  private "), Some((TestMode::Private, "Q")));
        assert_eq!(s.mode_for("all"), None);
    }
}
