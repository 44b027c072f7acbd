use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files directly inside `dir` whose extension is one of `extensions`
/// (case-insensitive), sorted by path. A missing directory yields nothing.
pub fn files_with_extensions<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut result = Vec::new();

    if !dir.is_dir() {
        return Ok(result);
    }

    for entry in fs::read_dir(dir)? {
        let entry_path = entry?.path();
        if !entry_path.is_file() {
            continue;
        }
        let matches = entry_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if matches {
            result.push(entry_path);
        }
    }

    result.sort();
    Ok(result)
}

/// Names of the sub-directories of `dir`, sorted. A missing directory yields nothing.
pub fn subdirectory_names<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut names = Vec::new();

    if !dir.is_dir() {
        return Ok(names);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}
