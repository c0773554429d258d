//! CLI entry point for the staffdb demo.
//!
//! # Responsibility
//! - Load config from the environment and start logging.
//! - Run the seed-and-report sequence and print the report to stdout.
//!
//! # Invariants
//! - Takes no flags.
//! - Exit status is 0 once all phases complete, even when sample records were
//!   rejected; only fatal setup or read failures exit with 1.

use log::{error, info};
use staffdb_core::{flush_logging, init_logging, run_demo, DemoConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("staffdb: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("staffdb: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    println!("staffdb {}", staffdb_core::core_version());

    let code = match run_demo(&config) {
        Ok(summary) => {
            println!("people:");
            for line in &summary.person_lines {
                println!("  {line}");
            }
            println!("jobs:");
            if summary.job_lines.is_empty() {
                println!("  (no rows)");
            }
            for line in &summary.job_lines {
                println!("  {line}");
            }
            for (key, kind) in summary
                .people
                .rejected_keys()
                .into_iter()
                .chain(summary.jobs.rejected_keys())
            {
                println!("rejected: {key} ({})", kind.as_str());
            }
            info!(
                "event=cli_done module=cli status=ok db_path={}",
                config.db_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_done module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    };

    flush_logging();
    code
}
