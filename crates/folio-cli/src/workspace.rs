//! `folio workspace`: the stored multi-file project.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use folio_common::SnapshotStore;
use folio_editor_core::Project;
use miette::{IntoDiagnostic, Result, miette};

pub const DEFAULT_STORE: &str = ".folio/workspace.json";

#[derive(Args)]
pub struct WorkspaceArgs {
    /// Workspace file
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: WorkspaceCommand,
}

#[derive(Subcommand)]
pub enum WorkspaceCommand {
    /// List files; `*` marks main, `>` the open file
    Ls,
    /// Print a file
    Cat { name: String },
    /// Create a file, empty or copied from disk
    Add {
        name: String,

        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Overwrite a file from disk
    Write { name: String, from: PathBuf },
    Rm { name: String },
    Mv { from: String, to: String },
    /// Make a file the document root
    Main { name: String },
    /// Open a file in the editor
    Open { name: String },
    /// Packages loaded by the main file
    Packages,
    /// Write every file under a directory
    Export { dir: PathBuf },
}

/// Load the stored project, if there is one.
pub async fn load(store: &SnapshotStore) -> Result<Option<Project>> {
    match store.load().await? {
        Some(snapshot) => Ok(Some(Project::from_snapshot(snapshot)?)),
        None => Ok(None),
    }
}

/// Store a fresh project unless one exists. Returns whether it was created.
pub async fn init(store: &SnapshotStore, force: bool) -> Result<bool> {
    if !force && store.load().await?.is_some() {
        return Ok(false);
    }
    store.save(&Project::default().to_snapshot()).await?;
    Ok(true)
}

pub async fn run(args: WorkspaceArgs) -> Result<()> {
    let store = SnapshotStore::new(args.store);
    let mut project = load(&store).await?.ok_or_else(|| {
        miette!(
            help = "run `folio init` first",
            "no workspace at {}",
            store.path().display()
        )
    })?;

    let changed = apply(&mut project, args.command).await?;
    if changed {
        store.save(&project.to_snapshot()).await?;
    }
    Ok(())
}

/// Run one command against the project. Returns whether it changed.
async fn apply(project: &mut Project, command: WorkspaceCommand) -> Result<bool> {
    match command {
        WorkspaceCommand::Ls => {
            for name in project.file_names() {
                let marker = match (name == project.main(), name == project.active()) {
                    (true, true) => "*>",
                    (true, false) => "* ",
                    (false, true) => " >",
                    (false, false) => "  ",
                };
                println!("{marker} {name}");
            }
            Ok(false)
        }
        WorkspaceCommand::Cat { name } => {
            let text = project
                .file(&name)
                .ok_or_else(|| miette!("file {name} does not exist"))?;
            print!("{text}");
            Ok(false)
        }
        WorkspaceCommand::Add { name, from } => {
            let text = match from {
                Some(path) => tokio::fs::read_to_string(&path).await.into_diagnostic()?,
                None => String::new(),
            };
            project.create_file(&name, text)?;
            println!("✓ Added {name}");
            Ok(true)
        }
        WorkspaceCommand::Write { name, from } => {
            let text = tokio::fs::read_to_string(&from).await.into_diagnostic()?;
            project.write(&name, text)?;
            println!("✓ Wrote {name}");
            Ok(true)
        }
        WorkspaceCommand::Rm { name } => {
            project.remove_file(&name)?;
            println!("✓ Removed {name}");
            Ok(true)
        }
        WorkspaceCommand::Mv { from, to } => {
            project.rename_file(&from, &to)?;
            println!("✓ Renamed {from} → {to}");
            Ok(true)
        }
        WorkspaceCommand::Main { name } => {
            project.set_main(&name)?;
            Ok(true)
        }
        WorkspaceCommand::Open { name } => {
            project.set_active(&name)?;
            Ok(true)
        }
        WorkspaceCommand::Packages => {
            for package in project.installed_packages() {
                println!("{}", package.name);
            }
            Ok(false)
        }
        WorkspaceCommand::Export { dir } => {
            for name in project.file_names() {
                let target = dir.join(name);
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await.into_diagnostic()?;
                }
                let text = project.file(name).unwrap_or_default();
                tokio::fs::write(&target, text).await.into_diagnostic()?;
            }
            println!("✓ Exported {} files to {}", project.len(), dir.display());
            Ok(false)
        }
    }
}
