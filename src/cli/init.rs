//! Init command - create the identity and an empty vault.

use tracing::info;

use crate::cli::output;
use crate::core::app::App;
use crate::core::config::Config;
use crate::error::Result;

pub fn execute(config: &Config) -> Result<()> {
    App::init(config)?;

    let vault = config.vault.path.display().to_string();
    let identity = config.identity_path()?.display().to_string();
    output::success(&format!("initialized {}", output::key(&vault)));
    output::kv("identity:", &identity);

    info!(vault = %vault, "init complete");
    Ok(())
}
