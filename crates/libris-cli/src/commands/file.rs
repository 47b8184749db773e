//! File placement CLI commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use libris_core::error::AppError;
use libris_service::LibraryService;

use crate::output::{self, FileRow, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Owner of the files
    #[arg(long)]
    pub owner: Uuid,

    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List files at the root or in a folder
    List {
        /// Folder ID (omit for root)
        #[arg(long)]
        folder: Option<Uuid>,
    },
    /// Move one or more files into a folder
    Move {
        /// File IDs
        #[arg(required = true)]
        ids: Vec<Uuid>,
        /// Target folder ID (omit to move to the root)
        #[arg(long)]
        folder: Option<Uuid>,
    },
    /// Delete the files of a folder, keeping the folder itself
    DeleteInFolder {
        /// Folder ID
        folder: Uuid,
        /// Include files in every subfolder
        #[arg(short, long)]
        recursive: bool,
    },
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    library: &LibraryService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let owner = args.owner;
    let files = library.files();

    match &args.command {
        FileCommand::List { folder } => {
            let list = match folder {
                Some(id) => files.list_by_folder(*id, owner).await?,
                None => files.list_root(owner).await?,
            };
            let rows: Vec<FileRow> = list.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
        FileCommand::Move { ids, folder } => {
            let report = files.move_files(ids, owner, *folder).await?;
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table if report.is_complete() => {
                    output::print_success(&report.summary());
                }
                OutputFormat::Table => {
                    output::print_warning(&report.summary());
                    for failure in &report.failed {
                        output::print_kv(
                            &failure.file_id.to_string(),
                            &format!("{}: {}", failure.kind, failure.message),
                        );
                    }
                }
            }
        }
        FileCommand::DeleteInFolder { folder, recursive } => {
            let report = if *recursive {
                files
                    .delete_files_in_folder_recursively(*folder, owner)
                    .await?
            } else {
                files.delete_files_in_folder(*folder, owner).await?
            };
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table if report.is_complete() => {
                    output::print_success(&report.summary());
                }
                OutputFormat::Table => {
                    output::print_warning(&report.summary());
                    for item in report.failed() {
                        output::print_kv("Not deleted", &item.file_id.to_string());
                    }
                    for item in report.orphaned_blobs() {
                        output::print_kv("Orphaned blob", &item.storage_path);
                    }
                }
            }
        }
    }

    Ok(())
}
