//! Project commands.

use crate::cli::output;
use crate::core::app::App;
use crate::core::store::DocumentStore;
use crate::core::validation::is_policy_slot;
use crate::error::Result;

pub fn create<S: DocumentStore>(app: &mut App<S>, name: &str, description: &str) -> Result<()> {
    app.create_project(name, description)?;
    output::success(&format!("created project {}", output::key(name)));
    Ok(())
}

pub fn list<S: DocumentStore>(app: &App<S>) -> Result<()> {
    let projects: Vec<_> = app.vault().list_projects().collect();
    if projects.is_empty() {
        output::dimmed("no projects");
        return Ok(());
    }

    for project in projects {
        let count = project
            .secrets
            .iter()
            .filter(|s| !is_policy_slot(&project.name, &s.category))
            .count();
        println!("{}  {} secrets", output::key(&project.name), count);
    }
    Ok(())
}
