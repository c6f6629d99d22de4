//! Rotation commands: manual rotate, due listing, and batch tick.

use crate::cli::output;
use crate::cli::policy::to_json;
use crate::core::app::App;
use crate::core::domain::{PolicyStatus, RotationOutcome};
use crate::core::store::DocumentStore;
use crate::error::{Result, ValidationError};

pub fn rotate<S: DocumentStore>(
    app: &mut App<S>,
    policy_id: Option<String>,
    secret: Option<String>,
    project: Option<String>,
    category: &str,
) -> Result<()> {
    let outcome = match (policy_id, secret, project) {
        (Some(id), _, _) => app.rotate_by_id(&id)?,
        (None, Some(secret), Some(project)) => app.rotate_by_secret(&secret, &project, category)?,
        _ => return Err(ValidationError::MissingField("policy_id").into()),
    };

    match outcome {
        RotationOutcome::Rotated {
            secret_name,
            version_key,
            next_rotation_date,
            ..
        } => {
            output::success(&format!("rotated {}", output::key(&secret_name)));
            if let Some(version) = version_key {
                output::kv("previous value kept as:", version);
            }
            output::kv("next rotation:", next_rotation_date.to_rfc3339());
        }
        RotationOutcome::Skipped { reason } => output::warn(&format!("skipped: {}", reason)),
    }
    Ok(())
}

pub fn due<S: DocumentStore>(app: &App<S>, json: bool) -> Result<()> {
    let due = app.due();
    if json {
        println!("{}", to_json(&due)?);
        return Ok(());
    }

    let counts = app.counts();
    output::header(&format!(
        "{} due / {} enabled / {} total",
        counts.due, counts.enabled, counts.total
    ));
    for policy in &due {
        output::list_item(&format!(
            "{}  {}/{}  due {}",
            output::key(&policy.policy_id),
            policy.project,
            policy.secret_name,
            policy.next_rotation_date.to_rfc3339()
        ));
    }
    Ok(())
}

pub fn tick<S: DocumentStore>(app: &mut App<S>, json: bool) -> Result<()> {
    let report = app.trigger_due();
    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    if report.total == 0 {
        output::dimmed("nothing due");
        return Ok(());
    }
    for result in &report.results {
        match result.status {
            PolicyStatus::Success => output::success(&format!("rotated {}", result.secret_name)),
            PolicyStatus::Skipped => output::warn(&format!(
                "skipped {}: {}",
                result.secret_name,
                result.error.as_deref().unwrap_or("")
            )),
            PolicyStatus::Failure => output::error(&format!(
                "{} failed: {}",
                result.secret_name,
                result.error.as_deref().unwrap_or("")
            )),
        }
    }
    output::section("Summary");
    output::kv("successful:", report.successful);
    output::kv("failed:", report.failed);
    output::kv("skipped:", report.skipped);
    Ok(())
}
