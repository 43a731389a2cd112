//! Plan workbook discovery

use std::path::{Path, PathBuf};

use fleetplan_types::{Error, Result};
use walkdir::WalkDir;

/// Extensions picked up by the hub summary scan
const PLAN_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Check if a path looks like a plan workbook
pub fn is_plan_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PLAN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Workbooks directly inside `dir`, sorted by file name.
///
/// Lock files left by Excel (`~$...`) are ignored.
pub fn scan_plan_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_plan_workbook(path))
        .filter(|path| {
            !path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();

    files.sort_by(|a, b| {
        a.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .cmp(b.file_name().and_then(|n| n.to_str()).unwrap_or(""))
    });

    Ok(files)
}
