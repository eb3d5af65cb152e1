//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{FileVaultError, Result};
use crate::vault::VaultService;

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "FILEVAULT_PASSWORD";

/// FileVault CLI: encrypted local file vault.
#[derive(Parser)]
#[command(name = "filevault", about = "Encrypted local file vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.filevault, or `vault_dir` in .filevault.toml)
    #[arg(long, env = "FILEVAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault and choose its master password
    Init,

    /// Encrypt a file and store it in the vault
    Store {
        /// Path of the file to store
        path: PathBuf,
    },

    /// Decrypt a stored file
    Retrieve {
        /// Name of the stored file
        name: String,

        /// Directory to write the decrypted file into
        #[arg(long)]
        to: Option<PathBuf>,
    },

    /// List stored files
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs: the loaded settings, the working directory
/// they were resolved against, and the vault.
pub struct Context {
    pub settings: Settings,
    pub cwd: PathBuf,
    pub service: VaultService,
}

/// Load settings and open the vault selected by the CLI arguments.
///
/// `--vault-dir` / `FILEVAULT_DIR` wins over the config file.
pub fn context(cli: &Cli) -> Result<Context> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let root = match &cli.vault_dir {
        Some(dir) => cwd.join(dir),
        None => settings.vault_root(&cwd),
    };

    Ok(Context {
        settings,
        cwd,
        service: VaultService::open(root),
    })
}

/// Get the master password, trying in order:
/// 1. `FILEVAULT_PASSWORD` env var (scripts/CI)
/// 2. Interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter your master password")
        .interact()
        .map_err(|e| FileVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `FILEVAULT_PASSWORD`.  Enforces `min_len`.
pub fn prompt_new_password(min_len: usize) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        check_password_len(&pw, min_len)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Create a new master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| FileVaultError::CommandFailed(format!("password prompt: {e}")))?;
        let password = Zeroizing::new(password);

        if check_password_len(&password, min_len).is_err() {
            output::warning(&format!(
                "Password must be at least {min_len} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

fn check_password_len(password: &str, min_len: usize) -> Result<()> {
    if password.chars().count() < min_len {
        return Err(FileVaultError::CommandFailed(format!(
            "password must be at least {min_len} characters"
        )));
    }
    Ok(())
}

/// Map an error to the single line shown to the user.
///
/// Integrity failures get one fixed message regardless of cause.
pub fn error_message(err: &FileVaultError) -> String {
    match err {
        FileVaultError::DecryptionFailed => {
            "Failed to decrypt — wrong password or corrupted file".to_string()
        }
        other => other.to_string(),
    }
}
