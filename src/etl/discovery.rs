use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const JSON_EXTENSION: &str = "json";

/// Absolute paths of every `.json` file at any depth below `root`.
///
/// Entries are visited sorted by file name, so the result is stable for a
/// given tree. Symlinked files are included; symlinked directories are not
/// descended into. A missing root yields an empty list.
pub fn discover<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.exists() {
        return Ok(Vec::new());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("Error resolving path: {}", root.display()))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {}", root.display()))?;
        // `Path::is_file` follows symlinks, so linked files count too.
        if entry.path().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(JSON_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
