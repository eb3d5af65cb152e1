//! `filevault retrieve` — decrypt a stored file to disk.

use std::path::Path;

use crate::cli::output;
use crate::cli::{context, prompt_password, Cli};
use crate::errors::{FileVaultError, Result};

/// Execute the `retrieve` command.
pub fn execute(cli: &Cli, name: &str, to: Option<&Path>) -> Result<()> {
    let ctx = context(cli)?;

    if !ctx.service.is_initialized() {
        return Err(FileVaultError::NotInitialized(ctx.service.root().to_path_buf()));
    }

    let dest_dir = match to {
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.settings.retrieve_dir(&ctx.cwd),
    };

    let password = prompt_password()?;
    let out_path = ctx.service.retrieve(password.as_bytes(), name, &dest_dir)?;

    output::success(&format!("Retrieved {name} to {}", out_path.display()));

    Ok(())
}
