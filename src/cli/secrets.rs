//! Secret CRUD commands.

use crate::cli::output;
use crate::core::app::App;
use crate::core::domain::SecretEntry;
use crate::core::store::DocumentStore;
use crate::error::{NotFoundError, PersistenceError, Result};

pub fn set<S: DocumentStore>(
    app: &mut App<S>,
    project: &str,
    category: &str,
    key: String,
    value: String,
    description: Option<String>,
) -> Result<()> {
    let mut entry = SecretEntry::new(key.clone(), value).with_category(category);
    if let Some(description) = description {
        entry = entry.with_description(description);
    }

    let replaced = app.set_secret(project, entry)?;
    let verb = if replaced { "updated" } else { "set" };
    output::success(&format!("{} {}", verb, output::key(&key)));
    Ok(())
}

pub fn get<S: DocumentStore>(app: &App<S>, project: &str, category: &str, key: &str) -> Result<()> {
    let secret = app
        .vault()
        .find_secret(project, category, key)
        .ok_or_else(|| NotFoundError::Secret {
            project: project.to_string(),
            category: category.to_string(),
            key: key.to_string(),
        })?;
    println!("{}", secret.value);
    Ok(())
}

pub fn rm<S: DocumentStore>(app: &mut App<S>, project: &str, category: &str, key: &str) -> Result<()> {
    app.remove_secret(project, category, key)?;
    output::success(&format!("removed {}", output::key(key)));
    Ok(())
}

pub fn list<S: DocumentStore>(
    app: &App<S>,
    project: &str,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let secrets = app.vault().list_secrets(project, category)?;

    if json {
        let keys: Vec<&str> = secrets.iter().map(|s| s.key.as_str()).collect();
        println!("{}", serde_json::to_string(&keys).map_err(PersistenceError::Serialize)?);
        return Ok(());
    }

    if secrets.is_empty() {
        output::dimmed("no secrets stored");
        return Ok(());
    }
    for secret in secrets {
        println!("{}/{}", secret.category, output::key(&secret.key));
    }
    Ok(())
}
