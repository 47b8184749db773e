//! Folder management CLI commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use libris_core::error::AppError;
use libris_service::LibraryService;

use crate::output::{self, FolderRow, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Owner of the folder tree
    #[arg(long)]
    pub owner: Uuid,

    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List root folders, or the subfolders of a folder
    List {
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: Uuid,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Move a folder under another folder
    Move {
        /// Folder ID
        id: Uuid,
        /// New parent folder ID (omit to move to the root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Delete a folder
    Delete {
        /// Folder ID
        id: Uuid,
        /// Also delete every subfolder and file below it
        #[arg(short, long)]
        recursive: bool,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the folder tree
    Tree {
        /// Root of the tree (omit for the whole library)
        id: Option<Uuid>,
    },
    /// Show the breadcrumb trail of a folder
    Breadcrumb {
        /// Folder ID
        id: Uuid,
    },
    /// Recompute stale paths below a folder
    Repair {
        /// Folder ID
        id: Uuid,
    },
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    library: &LibraryService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let owner = args.owner;
    let folders = library.folders();

    match &args.command {
        FolderCommand::List { parent } => {
            let list = match parent {
                Some(id) => folders.list_children(*id, owner).await?,
                None => folders.list_root(owner).await?,
            };
            let rows: Vec<FolderRow> = list.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = folders.create(owner, name, *parent).await?;
            match format {
                OutputFormat::Json => output::print_item(&folder, format),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder created: {}", folder.id));
                    output::print_kv("Path", &output::breadcrumb(&folder.path));
                }
            }
        }
        FolderCommand::Rename { id, name } => {
            let folder = folders.rename(*id, owner, name).await?;
            match format {
                OutputFormat::Json => output::print_item(&folder, format),
                OutputFormat::Table => {
                    output::print_success("Folder renamed.");
                    output::print_kv("Path", &output::breadcrumb(&folder.path));
                }
            }
        }
        FolderCommand::Move { id, parent } => {
            let folder = folders.move_folder(*id, owner, *parent).await?;
            match format {
                OutputFormat::Json => output::print_item(&folder, format),
                OutputFormat::Table => {
                    output::print_success("Folder moved.");
                    output::print_kv("Path", &output::breadcrumb(&folder.path));
                }
            }
        }
        FolderCommand::Delete { id, recursive, yes } => {
            if !*recursive {
                folders.delete(*id, owner).await?;
                output::print_success("Folder deleted.");
                return Ok(());
            }

            if !*yes {
                let folder = folders.get_folder(*id, owner).await?;
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' with all subfolders and files?",
                        output::breadcrumb(&folder.path)
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let report = library.delete_subtree(*id, owner).await?;
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table if report.is_complete() => {
                    output::print_success(&report.summary());
                }
                OutputFormat::Table => {
                    output::print_warning(&report.summary());
                    for id in &report.retained_folders {
                        output::print_kv("Kept folder", &id.to_string());
                    }
                    for item in report.files.orphaned_blobs() {
                        output::print_kv("Orphaned blob", &item.storage_path);
                    }
                }
            }
        }
        FolderCommand::Tree { id } => {
            let trees = match id {
                Some(id) => vec![library.tree().get_tree(*id, owner).await?],
                None => library.tree().get_library_tree(owner).await?,
            };
            output::print_trees(&trees, format);
        }
        FolderCommand::Breadcrumb { id } => {
            let trail = library.breadcrumbs().resolve(*id, owner).await?;
            match format {
                OutputFormat::Json => output::print_item(&trail, format),
                OutputFormat::Table => println!("{}", output::breadcrumb(&trail)),
            }
        }
        FolderCommand::Repair { id } => {
            let summary = folders.repair_paths(*id, owner).await?;
            match format {
                OutputFormat::Json => output::print_item(&summary, format),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Checked {} folder(s), rewrote {} path(s).",
                        summary.folders_visited, summary.paths_rewritten
                    ));
                }
            }
        }
    }

    Ok(())
}
