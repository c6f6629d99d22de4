//! Env import/export commands.

use std::path::Path;

use crate::cli::output;
use crate::core::app::App;
use crate::core::store::DocumentStore;
use crate::core::vault::{ExportOptions, ImportOptions};
use crate::error::Result;

pub fn import<S: DocumentStore>(
    app: &mut App<S>,
    path: &Path,
    project: String,
    category: String,
    overwrite: bool,
) -> Result<()> {
    let options = ImportOptions::new(project)
        .category(category)
        .overwrite(overwrite);
    let report = app.import_env_file(path, &options)?;

    output::success(&format!(
        "imported {} secrets from {}",
        report.imported.len(),
        path.display()
    ));
    if !report.skipped.is_empty() {
        output::warn(&format!(
            "{} existing keys skipped (use --overwrite to replace)",
            report.skipped.len()
        ));
        for key in &report.skipped {
            output::list_item(key);
        }
    }
    Ok(())
}

pub fn export<S: DocumentStore>(
    app: &App<S>,
    project: String,
    category: Option<String>,
) -> Result<()> {
    let mut options = ExportOptions::new(project);
    if let Some(category) = category {
        options = options.category(category);
    }
    print!("{}", app.export_env(&options)?);
    Ok(())
}
