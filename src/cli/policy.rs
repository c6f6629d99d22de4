//! Policy commands.

use std::path::Path;

use crate::cli::output;
use crate::core::app::App;
use crate::core::domain::{PolicyDraft, RotationPolicy};
use crate::core::store::DocumentStore;
use crate::error::{PersistenceError, Result, ValidationError};

/// Create or update a policy from a JSON draft file.
pub fn put<S: DocumentStore>(app: &mut App<S>, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let draft: PolicyDraft = serde_json::from_str(&contents)
        .map_err(|e| ValidationError::InvalidPolicy(e.to_string()))?;

    let policy = app.save_policy(&draft)?;
    output::success(&format!(
        "saved policy {} for {}",
        output::key(&policy.policy_id),
        policy.secret_name
    ));
    output::kv("next rotation:", policy.next_rotation_date.to_rfc3339());
    Ok(())
}

pub fn list<S: DocumentStore>(
    app: &mut App<S>,
    project: Option<&str>,
    enabled_only: bool,
    json: bool,
) -> Result<()> {
    let policies: Vec<RotationPolicy> = app
        .list_policies()?
        .into_iter()
        .filter(|p| project.map_or(true, |name| p.project == name))
        .filter(|p| !enabled_only || p.is_enabled)
        .collect();

    if json {
        println!("{}", to_json(&policies)?);
        return Ok(());
    }

    if policies.is_empty() {
        output::dimmed("no rotation policies");
        return Ok(());
    }
    for policy in &policies {
        let state = if policy.is_enabled { "" } else { " (disabled)" };
        println!(
            "{}  {}/{}/{}  {}  next {}{}",
            output::key(&policy.policy_id),
            policy.project,
            policy.category,
            policy.secret_name,
            policy.rotation_interval,
            policy.next_rotation_date.to_rfc3339(),
            state
        );
    }
    Ok(())
}

pub fn show<S: DocumentStore>(app: &mut App<S>, policy_id: &str) -> Result<()> {
    let policy = app.get_policy(policy_id)?;
    println!("{}", to_json(&policy)?);
    Ok(())
}

pub fn rm<S: DocumentStore>(app: &mut App<S>, policy_id: &str) -> Result<()> {
    if app.delete_policy(policy_id)? {
        output::success(&format!("removed policy {}", output::key(policy_id)));
    } else {
        output::warn(&format!("no policy {}", policy_id));
    }
    Ok(())
}

pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| PersistenceError::Serialize(e).into())
}
