//! `filevault store` — encrypt a file into the vault.

use std::path::Path;

use crate::cli::output;
use crate::cli::{context, prompt_password, Cli};
use crate::errors::{FileVaultError, Result};

/// Execute the `store` command.
pub fn execute(cli: &Cli, path: &Path) -> Result<()> {
    let ctx = context(cli)?;

    if !ctx.service.is_initialized() {
        return Err(FileVaultError::NotInitialized(ctx.service.root().to_path_buf()));
    }

    let source = ctx.cwd.join(path);
    if !source.is_file() {
        return Err(FileVaultError::CommandFailed(format!(
            "{} is not a readable file",
            path.display()
        )));
    }

    let replacing = source
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| ctx.service.store_handle().contains_entry(n));

    let password = prompt_password()?;
    let name = ctx.service.store(password.as_bytes(), &source)?;

    if replacing {
        output::success(&format!("Replaced {name} in vault."));
    } else {
        output::success(&format!("Stored {name} in vault."));
    }

    Ok(())
}
