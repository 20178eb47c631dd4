//! A scored run feeding its output file to the checker.

use std::fs;
use std::time::Duration;

use judgekit_checker::{check_files, Verdict};
use judgekit_harness::{
    CaseVerdict, ContestIo, ContestSecrets, SafeTestConfig, TestCase, Tester, TestingReport,
};
use tempfile::TempDir;

const PUBLIC_SECRET: &str = "9f1c-public";
const PRIVATE_SECRET: &str = "4b7e-private";

// ── Helpers ─────────────────────────────────────────────────────

fn quick() -> SafeTestConfig {
    SafeTestConfig::default().timeout_ms(5_000).iterations(1)
}

fn tester() -> Tester {
    let mut tester = Tester::new(Duration::from_secs(60));
    tester
        .add(
            TestCase::public("Sum", "Sample", 0.0, |ctx| {
                ctx.ro_array(&[1, 2, 3], |v| assert_eq!(v.iter().sum::<i32>(), 6));
            })
            .config(quick()),
        )
        .add(
            TestCase::private("Sum", "Random", 1.5, |ctx| {
                let data = ctx.rng().random_i32_array(256, -50, 50);
                let expected: i64 = data.iter().map(|&x| x as i64).sum();
                ctx.ro_array(&data, |v| {
                    assert_eq!(v.iter().map(|&x| x as i64).sum::<i64>(), expected);
                });
            })
            .config(quick()),
        )
        .add(
            TestCase::private("Max", "Broken", 2.0, |ctx| {
                let data = ctx.rng().random_i32_array(16, 0, 9);
                ctx.ro_array(&data, |v| assert_eq!(v.iter().max(), Some(&100)));
            })
            .config(quick()),
        )
        .add(
            TestCase::private("Max", "Huge", 4.0, |_| {})
                .config(quick())
                .after("Max.Broken"),
        );
    tester
}

struct Contest {
    dir: TempDir,
}

impl Contest {
    fn new(input: &str, answer: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("input.txt"), input).unwrap();
        fs::write(dir.path().join("answer.txt"), answer).unwrap();
        Self { dir }
    }

    fn run(&self) -> TestingReport {
        let files = ContestIo::new(
            self.dir.path().join("input.txt"),
            self.dir.path().join("output.txt"),
            ContestSecrets::new(PUBLIC_SECRET, PRIVATE_SECRET),
        )
        .print_summary(false);
        tester().run_contest(&files).unwrap()
    }

    fn output(&self) -> String {
        fs::read_to_string(self.dir.path().join("output.txt")).unwrap()
    }

    fn check(&self) -> Verdict {
        check_files(
            &self.dir.path().join("input.txt"),
            &self.dir.path().join("output.txt"),
            &self.dir.path().join("answer.txt"),
        )
        .unwrap()
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn private_pass_reports_partial_score() {
    let contest = Contest::new("private\n", PRIVATE_SECRET);
    let report = contest.run();

    let verdicts: Vec<CaseVerdict> = report.cases().map(|c| c.verdict).collect();
    assert_eq!(
        verdicts,
        [
            CaseVerdict::Accepted,
            CaseVerdict::Failed,
            CaseVerdict::DependencyFailed,
        ]
    );
    assert_eq!(report.verdict, CaseVerdict::Accepted);
    assert_eq!((report.score, report.max_score), (1.5, 7.5));
    assert_eq!(contest.output(), format!("{PRIVATE_SECRET}\n1.5"));

    let verdict = contest.check();
    assert_eq!(verdict, Verdict::Accepted { points: 1.5 });
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn public_pass_is_accepted_with_one_point() {
    let contest = Contest::new("public", PUBLIC_SECRET);
    let report = contest.run();

    assert_eq!(report.tests_count(), 1);
    assert_eq!(report.score, 0.0);
    assert_eq!(contest.output(), format!("{PUBLIC_SECRET}\n0"));
    assert_eq!(contest.check(), Verdict::Accepted { points: 1.0 });
}

#[test]
fn unknown_input_fails_the_secret_check() {
    let contest = Contest::new("tampered", PRIVATE_SECRET);
    let report = contest.run();

    assert_eq!(report.verdict, CaseVerdict::CheckFailed);
    assert_eq!(report.comment.as_deref(), Some("CF: Wrong input secret!"));
    assert_eq!(report.tests_count(), 0);
    assert_eq!(contest.output(), "\n0");

    let verdict = contest.check();
    assert_eq!(verdict, Verdict::SecretMismatch);
    assert_eq!(verdict.exit_code(), 5);
}

#[test]
fn private_output_does_not_pass_as_public() {
    let contest = Contest::new("private", PUBLIC_SECRET);
    contest.run();
    assert_eq!(contest.check(), Verdict::SecretMismatch);
}
