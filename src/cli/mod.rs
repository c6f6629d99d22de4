//! Command-line interface.

pub mod env;
pub mod init;
pub mod output;
pub mod policy;
pub mod project;
pub mod rotate;
pub mod secrets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::app::App;
use crate::core::config::Config;
use crate::core::constants::DEFAULT_CATEGORY;
use crate::error::Result;

/// Bullpen - an encrypted secrets vault with scheduled rotation.
#[derive(Parser)]
#[command(
    name = "bullpen",
    about = "An encrypted secrets vault with policy-driven rotation",
    version
)]
pub struct Cli {
    /// Config file (defaults to $BULLPEN_CONFIG, then ./bullpen.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the identity key and an empty vault
    Init,

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Set a secret value
    Set {
        /// Secret key (e.g., DATABASE_URL)
        key: String,
        /// Secret value
        value: String,
        #[arg(short, long)]
        project: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Print a secret value
    Get {
        key: String,
        #[arg(short, long)]
        project: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Remove a secret
    Rm {
        key: String,
        #[arg(short, long)]
        project: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// List secret keys in a project
    List {
        #[arg(short, long)]
        project: String,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import secrets from a .env file
    Import {
        /// Path to .env file
        path: PathBuf,
        #[arg(short, long)]
        project: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// Replace values of existing keys
        #[arg(long)]
        overwrite: bool,
    },

    /// Print secrets in .env format
    Export {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Manage rotation policies
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },

    /// Rotate one secret now
    Rotate {
        /// Policy id
        #[arg(conflicts_with_all = ["secret", "project"], required_unless_present = "secret")]
        policy_id: Option<String>,
        /// Rotate by secret name instead of policy id
        #[arg(long, requires = "project")]
        secret: Option<String>,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Show policies due for rotation
    Due {
        #[arg(long)]
        json: bool,
    },

    /// Rotate every due policy
    Tick {
        #[arg(long)]
        json: bool,
    },
}

/// Project subcommands.
#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create an empty project
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List projects
    List,
}

/// Policy subcommands.
#[derive(Subcommand)]
pub enum PolicyAction {
    /// Create or update a policy from a JSON file
    Put {
        /// JSON policy draft
        path: PathBuf,
    },

    /// List policies
    List {
        #[arg(short, long)]
        project: Option<String>,
        /// Only enabled policies
        #[arg(long)]
        enabled: bool,
        #[arg(long)]
        json: bool,
    },

    /// Show one policy as JSON
    Show { policy_id: String },

    /// Delete a policy
    Rm { policy_id: String },
}

/// Run a parsed command.
///
/// # Errors
///
/// Returns any error from the command.
pub fn execute(command: Command, config: &Config) -> Result<()> {
    if let Command::Init = command {
        return init::execute(config);
    }

    let mut app = App::open(config)?;
    match command {
        Command::Init => Ok(()),
        Command::Project { action } => match action {
            ProjectAction::Create { name, description } => {
                project::create(&mut app, &name, &description)
            }
            ProjectAction::List => project::list(&app),
        },
        Command::Set {
            key,
            value,
            project,
            category,
            description,
        } => secrets::set(&mut app, &project, &category, key, value, description),
        Command::Get {
            key,
            project,
            category,
        } => secrets::get(&app, &project, &category, &key),
        Command::Rm {
            key,
            project,
            category,
        } => secrets::rm(&mut app, &project, &category, &key),
        Command::List {
            project,
            category,
            json,
        } => secrets::list(&app, &project, category.as_deref(), json),
        Command::Import {
            path,
            project,
            category,
            overwrite,
        } => env::import(&mut app, &path, project, category, overwrite),
        Command::Export { project, category } => env::export(&app, project, category),
        Command::Policy { action } => match action {
            PolicyAction::Put { path } => policy::put(&mut app, &path),
            PolicyAction::List {
                project,
                enabled,
                json,
            } => policy::list(&mut app, project.as_deref(), enabled, json),
            PolicyAction::Show { policy_id } => policy::show(&mut app, &policy_id),
            PolicyAction::Rm { policy_id } => policy::rm(&mut app, &policy_id),
        },
        Command::Rotate {
            policy_id,
            secret,
            project,
            category,
        } => rotate::rotate(&mut app, policy_id, secret, project, &category),
        Command::Due { json } => rotate::due(&app, json),
        Command::Tick { json } => rotate::tick(&mut app, json),
    }
}
