use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::Path,
    time::Duration,
};

use publicizer::{process_file, resolve_inputs, Error, FileReport, PublicizeOptions, RetryPolicy};

use crate::app::Cli;

/// Library options from the command line.
pub fn options(cli: &Cli) -> PublicizeOptions {
    let defaults = RetryPolicy::default();

    PublicizeOptions {
        suffix: cli.suffix.clone(),
        output_subdirectory: cli.output_subdirectory.clone(),
        retry: RetryPolicy {
            delay: Duration::from_millis(cli.retry_delay_ms),
            settle: cli.settle_ms.map_or(defaults.settle, Duration::from_millis),
            ..defaults
        },
    }
}

/// Publicize every input named on the command line and return the process exit code.
///
/// Without `--quiet` the first failure ends the run, and every run waits for Enter
/// before it exits. With it, every input is attempted, nothing waits, and the code of
/// the last failure is returned.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    run_with_pause(cli, wait_for_enter)
}

fn run_with_pause(cli: &Cli, mut pause: impl FnMut()) -> anyhow::Result<i32> {
    let exit_code = publicize_inputs(cli)?;

    if !cli.quiet {
        pause();
    }
    Ok(exit_code)
}

fn publicize_inputs(cli: &Cli) -> anyhow::Result<i32> {
    let options = options(cli);
    let mut reports = Vec::new();
    let mut exit_code = 0;

    let inputs = match resolve_inputs(&cli.path, &options) {
        Ok(inputs) => inputs,
        Err(error) => return Ok(fail(&error)),
    };

    if inputs.is_empty() {
        log::warn!("No assemblies found in {}", cli.path.display());
    }

    for input in &inputs {
        match process_file(input, &options) {
            Ok(report) => {
                if !cli.json {
                    println!("{}", summary(&report));
                }
                reports.push(report);
            }
            Err(error) => {
                exit_code = fail(&error);
                if !cli.quiet {
                    break;
                }
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(exit_code)
}

/// Report `error` and return its exit code.
fn fail(error: &Error) -> i32 {
    let code = error.exit_code();
    log::error!("{error} (exit code {code})");
    code
}

fn wait_for_enter() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }

    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let _ = stdin.lock().read_line(&mut String::new());
}

/// `name -> output: N types, M methods, K fields`
fn summary(report: &FileReport) -> String {
    format!(
        "{} -> {}: {}",
        display_name(&report.input),
        report.output.display(),
        report.stats
    )
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
