//! `filevault list` — show stored file names (no password needed).

use crate::cli::output;
use crate::cli::{context, Cli};
use crate::errors::{FileVaultError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let ctx = context(cli)?;
    let entries = ctx.service.entries()?;

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| FileVaultError::SerializationError(format!("entry list: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    output::info(&format!(
        "{} — {} file(s)",
        ctx.service.root().display(),
        entries.len()
    ));
    output::print_entries_table(&entries);

    Ok(())
}
