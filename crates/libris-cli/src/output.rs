//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use libris_entity::file::File;
use libris_entity::folder::{Folder, FolderNode};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
pub struct FolderRow {
    /// Folder ID
    pub id: String,
    /// Name
    pub name: String,
    /// Breadcrumb path
    pub path: String,
    /// Depth below the root
    pub depth: usize,
    /// Last rename or move
    pub updated_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            path: breadcrumb(&f.path),
            depth: f.depth(),
            updated_at: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// File ID
    pub id: String,
    /// Name
    pub name: String,
    /// MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size: i64,
    /// Created at
    pub created_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            mime_type: f.mime_type.clone().unwrap_or_else(|| "-".to_string()),
            size: f.size_bytes,
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Join path segments for display.
pub fn breadcrumb(path: &[String]) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.join(" / ")
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item as JSON, or as a debug dump in table mode
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print folder trees as an indented outline or JSON
pub fn print_trees(trees: &[FolderNode], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if trees.is_empty() {
                println!("No folders.");
            }
            let mut stack: Vec<(&FolderNode, usize)> = trees.iter().rev().map(|t| (t, 0)).collect();
            while let Some((node, indent)) = stack.pop() {
                println!(
                    "{:indent$}{} ({} files)  [{}]",
                    "",
                    node.name,
                    node.file_count,
                    node.id,
                    indent = indent * 2
                );
                stack.extend(node.children.iter().rev().map(|c| (c, indent + 1)));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(trees).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
