//! keylease command-line tool
//!
//! Usage:
//!   keylease check client.enc.json --password 123 --keepalives 3
//!   keylease seal client.json client.enc.json --password 123
//!   keylease status -8
//!
//! Engine timeouts and endpoints follow the `KEYLEASE_*` environment
//! variables; log filtering follows `RUST_LOG` unless `--verbose` is set.

use clap::Parser;
use keylease_cli::{exit_code, run_check, run_seal, run_status, Args, Command};
use keylease_session::{EngineConfig, LicenseClient};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut stdout = std::io::stdout().lock();
    let result = match &args.command {
        Command::Check(check) => {
            let client = LicenseClient::new(EngineConfig::from_env());
            run_check(&client, check, &mut stdout)
        }
        Command::Seal(seal) => run_seal(seal, &mut stdout),
        Command::Status { code } => run_status(*code, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = exit_code(&err);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
