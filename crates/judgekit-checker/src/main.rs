use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use judgekit_checker::{check_files, write_report, CheckerError};

/// Verify the run secret and report the score of one graded case.
#[derive(Debug, Parser)]
#[command(name = "judgekit-checker", version)]
struct CheckerArgs {
    /// Test input; a first token of `public` forces a score of 1
    input: PathBuf,

    /// Participant output: secret, then score
    output: PathBuf,

    /// Jury answer: secret
    answer: PathBuf,

    /// Write the report here instead of standard output
    report: Option<PathBuf>,
}

fn run(args: &CheckerArgs) -> Result<u8, CheckerError> {
    let verdict = check_files(&args.input, &args.output, &args.answer)?;
    log::info!("{}: {:?}", args.output.display(), verdict);
    write_report(&verdict, args.report.as_deref())?;
    Ok(verdict.exit_code())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = CheckerArgs::parse();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::error!("{e}");
            eprintln!("judgekit-checker: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
