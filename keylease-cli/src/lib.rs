//! Command-line driver for keylease license sessions.
//!
//! The binary in `main.rs` only parses arguments and installs logging; the
//! commands live here so they can be driven from tests.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use keylease_crypto::{KdfParams, SealedSecret};
use keylease_engine::{SecretDocument, SecretMaterial};
use keylease_session::{CredentialHandle, LicenseClient, LicenseEngine};
use keylease_types::{describe, LeaseError, Status};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable read when `--password` is not given.
pub const PASSWORD_ENV: &str = "KEYLEASE_PASSWORD";

/// Keepalive spacing when neither the flag nor the server sets one.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "keylease")]
#[command(version, about = "Check and manage keylease license sessions")]
pub struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate with a secret file, send keepalives, then release
    Check(CheckArgs),
    /// Encrypt a plaintext secret file with a password
    Seal(SealArgs),
    /// Print the status code table, or the description of one code
    Status {
        /// Status code to describe
        #[arg(allow_negative_numbers = true)]
        code: Option<i32>,
    },
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Path to the secret file
    pub secret: PathBuf,

    /// Password for an encrypted secret file
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Accept invalid TLS certificates (development servers only)
    #[arg(long)]
    pub insecure: bool,

    /// Number of keepalives to send after authenticating
    #[arg(short, long, default_value_t = 1)]
    pub keepalives: u32,

    /// Seconds between keepalives [default: server recommendation, or 30]
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct SealArgs {
    /// Plaintext secret file to encrypt
    pub plain: PathBuf,

    /// Where to write the encrypted secret file
    pub out: PathBuf,

    /// Password to seal with
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// Overwrite `out` if it exists
    #[arg(long)]
    pub force: bool,

    /// Argon2 memory cost in KiB
    #[arg(long, default_value_t = KdfParams::default().memory_cost)]
    pub memory_cost: u32,

    /// Argon2 iterations
    #[arg(long, default_value_t = KdfParams::default().time_cost)]
    pub time_cost: u32,
}

/// Parses, authenticates, keeps alive and releases one license session.
///
/// The session is released on every path once parsing succeeded; a
/// keepalive failure is reported after the release. When both fail, the
/// release failure is logged and printed and the earlier failure is returned.
pub fn run_check<E: LicenseEngine>(
    client: &LicenseClient<E>,
    args: &CheckArgs,
    out: &mut impl Write,
) -> Result<()> {
    let mut handle = client
        .parse_secret_file(&args.secret, args.password.as_deref())
        .with_context(|| format!("Failed to load secret file {}", args.secret.display()))?;
    if args.insecure {
        handle.set_insecure_tls(true);
    }

    let outcome = drive(&mut handle, args, out);
    let released = handle.release();

    if let Err(err) = outcome {
        if let Err(release_err) = &released {
            warn!(status = %release_err.status(), error = %release_err, "session release failed");
            writeln!(out, "session release failed: {release_err}")?;
        }
        return Err(err);
    }
    released.context("Failed to release license session")?;
    writeln!(out, "session released")?;
    Ok(())
}

fn drive<E: LicenseEngine>(
    handle: &mut CredentialHandle<E>,
    args: &CheckArgs,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "client id:  {}", handle.client_id())?;
    writeln!(out, "server:     {}", handle.server_url())?;

    handle.authenticate().context("Failed to authenticate")?;
    writeln!(out, "authenticated")?;
    if let Some(content) = handle.custom_content() {
        writeln!(out, "custom content: {content}")?;
    }

    let interval = args
        .interval
        .map(Duration::from_secs)
        .or(handle.keepalive_interval())
        .unwrap_or(DEFAULT_KEEPALIVE_INTERVAL);

    for n in 1..=args.keepalives {
        if n > 1 {
            info!(seconds = interval.as_secs(), "waiting before next keepalive");
            std::thread::sleep(interval);
        }
        handle
            .keepalive()
            .with_context(|| format!("Keepalive {n} of {} failed", args.keepalives))?;
        writeln!(out, "keepalive {n}/{} ok", args.keepalives)?;
    }
    Ok(())
}

/// Seals a plaintext secret file into a password envelope.
pub fn run_seal(args: &SealArgs, out: &mut impl Write) -> Result<()> {
    if args.out.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.out.display());
    }
    if args.password.is_empty() {
        bail!("Refusing to seal with an empty password");
    }

    let bytes = std::fs::read(&args.plain)
        .with_context(|| format!("Failed to read {}", args.plain.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not JSON", args.plain.display()))?;
    if SealedSecret::is_envelope(&value) {
        bail!("{} is already encrypted", args.plain.display());
    }

    // Validate the whole document before sealing it.
    SecretMaterial::from_bytes(&bytes, None)
        .with_context(|| format!("{} is not a valid secret file", args.plain.display()))?;
    let document: SecretDocument =
        serde_json::from_value(value).context("Failed to decode secret document")?;

    let params = KdfParams {
        memory_cost: args.memory_cost,
        time_cost: args.time_cost,
        ..KdfParams::default()
    };
    document
        .seal_to(&args.out, &args.password, &params)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!(client_id = %document.client_id, out = %args.out.display(), "sealed secret file");
    writeln!(out, "sealed {} -> {}", args.plain.display(), args.out.display())?;
    Ok(())
}

/// Prints the status table, or one code's description.
pub fn run_status(code: Option<i32>, out: &mut impl Write) -> Result<()> {
    match code {
        Some(code) => {
            if Status::from_code(code).is_none() {
                warn!(code, "code is not part of the status table");
            }
            writeln!(out, "{code}: {}", describe(code))?;
        }
        None => {
            for status in Status::ALL {
                let name = format!("{status:?}");
                writeln!(out, "{:>4}  {name:<22}{}", status.code(), status.description())?;
            }
        }
    }
    Ok(())
}

/// Maps a command failure to a process exit code.
///
/// Licensing failures exit with the absolute value of their status code;
/// anything else exits with 1.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LeaseError>())
        .map(|lease| lease.code().abs())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}
