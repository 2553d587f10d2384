#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Go symbol collector.
//!
//! Loads Go packages from disk and exposes their top-level type declarations
//! as a [`TypeSet`]. Only declarations are read: function bodies, variables
//! and constants are skipped, and no type checking takes place.
//!
//! Every package is loaded independently; per-package failures are gathered
//! and reported together once all packages have been tried.

pub mod discover;
pub mod lexer;
pub mod lower;
pub mod parser;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use types::{TypeDefinition, TypeId, TypeSet};

use crate::lower::Scope;
use crate::parser::{parse_file, SourceFile};

/// Errors raised while loading Go packages.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// One or more packages failed to load.
    #[error("Failed to load packages: {0}")]
    Packages(String),
    /// A directory could not be walked.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Directory being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The input patterns matched no package.
    #[error("No packages matched {0}")]
    NoPackages(String),
}

/// Convenient result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Load every package named by `patterns`.
///
/// Definitions keep a deterministic order: packages in pattern order, files
/// in lexicographic order, declarations in source order. A directory reached
/// by more than one pattern is loaded once.
pub fn load_packages<S: AsRef<str>>(patterns: &[S]) -> Result<TypeSet> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        for dir in discover::expand(pattern.as_ref())? {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
    }
    if dirs.is_empty() {
        let joined: Vec<&str> = patterns.iter().map(AsRef::as_ref).collect();
        return Err(CollectorError::NoPackages(joined.join(",")));
    }

    let mut set = TypeSet::new();
    let mut failures = Vec::new();
    for dir in &dirs {
        let import_path = discover::import_path(dir);
        match load_package(dir, &import_path) {
            Ok(definitions) => {
                debug!(package = %import_path, definitions = definitions.len(), "Loaded package");
                set.extend(definitions);
            }
            Err(errors) => failures.push(format!("package {}: {}", import_path, errors.join(", "))),
        }
    }

    if failures.is_empty() {
        Ok(set)
    } else {
        Err(CollectorError::Packages(failures.join("; ")))
    }
}

/// Load one package directory, returning every error it produced.
fn load_package(dir: &Path, import_path: &str) -> std::result::Result<Vec<TypeDefinition>, Vec<String>> {
    let files = discover::package_files(dir).map_err(|e| vec![format!("{}: {}", dir.display(), e)])?;
    if files.is_empty() {
        return Err(vec![format!("no Go files in {}", dir.display())]);
    }

    let mut errors = Vec::new();
    let mut parsed: Vec<(PathBuf, SourceFile)> = Vec::new();
    for path in files {
        let name = file_name(&path);
        match fs::read_to_string(&path) {
            Ok(source) => match parse_file(&source) {
                Ok(file) => parsed.push((path, file)),
                Err(e) => errors.push(format!("{}: {}", name, e)),
            },
            Err(e) => errors.push(format!("{}: {}", name, e)),
        }
    }

    if let Some((first_path, first)) = parsed.first() {
        for (path, file) in &parsed[1..] {
            if file.package != first.package {
                errors.push(format!(
                    "found packages {} ({}) and {} ({})",
                    first.package,
                    file_name(first_path),
                    file.package,
                    file_name(path)
                ));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let locals: HashSet<String> =
        parsed.iter().flat_map(|(_, file)| file.types.iter().map(|spec| spec.name.clone())).collect();

    let mut definitions = Vec::new();
    for (path, file) in &parsed {
        let scope = Scope::new(import_path, &locals, &file.imports);
        for spec in &file.types {
            if spec.generic {
                debug!(file = %path.display(), line = spec.line, name = %spec.name, "Skipping generic type");
                continue;
            }
            let id = TypeId::new(import_path, spec.name.as_str());
            let ty = scope.lower(&spec.ty);
            definitions.push(if spec.alias { TypeDefinition::alias(id, ty) } else { TypeDefinition::new(id, ty) });
        }
    }
    Ok(definitions)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
