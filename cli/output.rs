use crate::commands::generate::ExportSummary;
use anyhow::Result;
use byte_unit::{Byte, UnitType};
use code2md_core::{AppError, FileRecord};
use colored::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes the rendered document as UTF-8 and returns the number of bytes written.
pub fn write_document(path: &Path, content: &str) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(content.len() as u64)
}

pub fn human_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

pub fn print_file_list(files: &[FileRecord]) {
    for file in files {
        println!("  - {}", file.relative_display().dimmed());
    }
}

pub fn print_export_summary(summary: &ExportSummary) {
    println!();
    println!("{} {}", "✅".green(), "Export complete!".green().bold());
    println!(
        "{:<8} {}",
        "File:".green(),
        summary.output_path.display().to_string().blue()
    );
    println!(
        "{:<8} {}",
        "Size:".green(),
        human_size(summary.bytes_written).cyan()
    );
    println!(
        "{:<8} {}",
        "Files:".green(),
        summary.files.len().to_string().cyan()
    );
}
