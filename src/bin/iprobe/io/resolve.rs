use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

const GLOB_CHARS: [char; 4] = ['*', '?', '[', ']'];

fn is_pattern(raw: &str) -> bool {
    raw.contains(GLOB_CHARS)
}

/// First existing candidate file inside `dir`.
fn find_in_dir(dir: &Path, names: &[String]) -> Option<PathBuf> {
    names.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}

fn expand_pattern(raw: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for entry in glob::glob(raw).with_context(|| format!("Invalid glob pattern: '{raw}'"))? {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => debug!("unreadable glob match: {e}"),
        }
    }
    matches.sort();
    Ok(matches)
}

/// Expands files, directories and glob patterns into input files.
///
/// Directories contribute their first existing file among `names`. With no
/// raw inputs the current directory is searched. Duplicates (by canonical
/// path) are dropped, keeping the first occurrence.
pub fn resolve_inputs(raw_inputs: &[String], names: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    if raw_inputs.is_empty() {
        found.extend(find_in_dir(Path::new("."), names));
    }

    for raw in raw_inputs {
        let candidates = if is_pattern(raw) {
            expand_pattern(raw)?
        } else {
            vec![PathBuf::from(raw)]
        };

        for path in candidates {
            if path.is_dir() {
                match find_in_dir(&path, names) {
                    Some(hit) => found.push(hit),
                    None => debug!("no input file inside {}", path.display()),
                }
            } else if path.is_file() {
                found.push(path);
            } else {
                debug!("input does not exist: {}", path.display());
            }
        }
    }

    Ok(dedup_by_canonical(found))
}

fn dedup_by_canonical(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(fs::canonicalize(p).unwrap_or_else(|_| p.clone())))
        .collect()
}

/// One line per raw input explaining what it resolved to, for the report
/// printed when nothing was found.
pub fn describe_inputs(raw_inputs: &[String]) -> Vec<String> {
    if raw_inputs.is_empty() {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".to_string());
        return vec![format!("no inputs given; searched {cwd}")];
    }

    raw_inputs
        .iter()
        .map(|raw| {
            if is_pattern(raw) {
                let count = expand_pattern(raw).map(|m| m.len()).unwrap_or(0);
                format!("glob '{raw}' -> {count} matches")
            } else {
                let path = Path::new(raw);
                let kind = if path.is_dir() {
                    "directory without a list file"
                } else if path.exists() {
                    "not a regular file"
                } else {
                    "does not exist"
                };
                format!("path '{raw}' -> {kind}")
            }
        })
        .collect()
}
