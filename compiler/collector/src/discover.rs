//! Package discovery
//!
//! Expands input patterns into package directories and works out the import
//! path each package is known by.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::{CollectorError, Result};

/// Suffix marking a recursive input pattern.
pub const RECURSIVE_SUFFIX: &str = "...";

/// Expand one input pattern into package directories.
///
/// A plain path names exactly one directory, whether or not it exists; the
/// loader reports problems with it. A `dir/...` pattern walks `dir` and keeps
/// every directory holding at least one non-test Go file.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let Some(root) = pattern.strip_suffix(RECURSIVE_SUFFIX) else {
        return Ok(vec![PathBuf::from(pattern)]);
    };
    let root = match root.trim_end_matches('/') {
        "" if root.starts_with('/') => "/",
        "" => ".",
        trimmed => trimmed,
    };

    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry.path()));
    for entry in walker {
        let entry = entry.map_err(|e| CollectorError::Io { path: PathBuf::from(root), source: e.into() })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let has_go = go_files(entry.path())
            .map_err(|source| CollectorError::Io { path: entry.path().to_path_buf(), source })?
            .next()
            .is_some();
        if has_go {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn is_skipped_dir(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name == "vendor" || name == "testdata" || name.starts_with('.') || name.starts_with('_'),
        None => false,
    }
}

fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

fn go_files(dir: &Path) -> io::Result<impl Iterator<Item = PathBuf>> {
    Ok(fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_go_source(path)))
}

/// Non-test Go files of a package directory, in lexicographic order.
pub fn package_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = go_files(dir)?.collect();
    files.sort();
    Ok(files)
}

/// The import path of the package in `dir`.
///
/// Uses the nearest enclosing `go.mod`; falls back to the cleaned directory
/// path when there is none.
pub fn import_path(dir: &Path) -> String {
    let absolute = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    for ancestor in absolute.ancestors() {
        let Ok(contents) = fs::read_to_string(ancestor.join("go.mod")) else {
            continue;
        };
        let Some(module) = module_path(&contents) else {
            continue;
        };
        let relative = absolute.strip_prefix(ancestor).map(slash_path).unwrap_or_default();
        return if relative.is_empty() { module } else { format!("{}/{}", module, relative) };
    }
    slash_path(dir)
}

/// The module path declared by a `go.mod` file.
pub fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or_default().trim().trim_matches(|c| c == '"' || c == '`');
        (!rest.is_empty()).then(|| rest.to_string())
    })
}

fn slash_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(last) if last != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::RootDir => parts.push(String::new()),
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
        }
    }
    match parts.as_slice() {
        [] => ".".to_string(),
        [root] if root.is_empty() => "/".to_string(),
        _ => parts.join("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path() {
        assert_eq!(module_path("module example.com/app\n\ngo 1.21\n"), Some("example.com/app".into()));
        assert_eq!(module_path("// header\nmodule \"quoted/mod\" // note\n"), Some("quoted/mod".into()));
        assert_eq!(module_path("modules x\n"), None);
        assert_eq!(module_path("go 1.21\n"), None);
    }

    #[test]
    fn test_slash_path_cleans_components() {
        assert_eq!(slash_path(Path::new("./models/../api/v1")), "api/v1");
        assert_eq!(slash_path(Path::new(".")), ".");
        assert_eq!(slash_path(Path::new("../shared")), "../shared");
    }

    #[test]
    fn test_go_source_filter() {
        assert!(is_go_source(Path::new("model.go")));
        assert!(!is_go_source(Path::new("model_test.go")));
        assert!(!is_go_source(Path::new("model.go.txt")));
    }
}
