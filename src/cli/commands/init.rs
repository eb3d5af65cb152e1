//! `filevault init` — create the vault root and its salt.

use crate::cli::output;
use crate::cli::{context, prompt_new_password, Cli};
use crate::errors::{FileVaultError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = context(cli)?;
    let root = ctx.service.root().to_path_buf();

    // Check before prompting so the user doesn't type a password for nothing.
    if ctx.service.is_initialized() {
        output::tip("Use `filevault store <PATH>` to add files to the existing vault.");
        return Err(FileVaultError::AlreadyInitialized(root));
    }

    let password = prompt_new_password(ctx.settings.min_password_len)?;
    ctx.service.init(password.as_bytes())?;

    output::success(&format!("Initialized vault at {}", root.display()));
    output::tip("Run `filevault store <PATH>` to encrypt a file into the vault.");
    output::tip("Your password cannot be recovered — losing it loses the vault.");

    Ok(())
}
