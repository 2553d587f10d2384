//! Output-path validation and atomic persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{PipelineError, Result};

/// Check that the directory holding `output` exists and is a directory.
///
/// A bare file name refers to the current directory. Returns that directory.
pub fn validate_output(output: &Path) -> Result<PathBuf> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        return Err(PipelineError::OutputDirMissing(dir));
    }
    if !dir.is_dir() {
        return Err(PipelineError::OutputNotDirectory(dir));
    }
    Ok(dir)
}

/// Write `path` through a temporary file in the same directory.
///
/// `write` fills the temporary file; the target is only replaced once it
/// returns successfully. On error the temporary file is removed and any
/// previous target is left untouched.
pub fn persist_output<F, E>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> std::result::Result<(), E>,
    PipelineError: From<E>,
{
    let create_err = |source| PipelineError::CreateOutput { path: path.to_path_buf(), source };

    let dir = validate_output(path)?;
    let mut file = NamedTempFile::new_in(&dir).map_err(create_err)?;
    write(&mut file)?;
    file.flush()?;
    file.persist(path).map_err(|e| create_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let dir = validate_output(Path::new("output.proto")).expect("current dir should be valid");
        assert_eq!(dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_and_non_directory_parents() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope").join("out.proto");
        match validate_output(&missing).expect_err("missing dir should fail") {
            PipelineError::OutputDirMissing(dir) => assert_eq!(dir, temp_dir.path().join("nope")),
            other => panic!("Expected OutputDirMissing, got {:?}", other),
        }

        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").expect("Failed to write file");
        match validate_output(&file.join("out.proto")).expect_err("file parent should fail") {
            PipelineError::OutputNotDirectory(dir) => assert_eq!(dir, file),
            other => panic!("Expected OutputNotDirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_persist_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("out.proto");
        std::fs::write(&target, "old contents that are longer").expect("Failed to seed target");

        persist_output(&target, |file| file.write_all(b"new")).expect("Failed to persist");

        assert_eq!(std::fs::read_to_string(&target).expect("Failed to read"), "new");
        let leftovers = std::fs::read_dir(temp_dir.path()).expect("Failed to list").count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("out.proto");
        std::fs::write(&target, "previous").expect("Failed to seed target");

        let result = persist_output(&target, |file| {
            file.write_all(b"partial")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "writer failed"))
        });

        assert!(matches!(result, Err(PipelineError::Io(_))));
        assert_eq!(std::fs::read_to_string(&target).expect("Failed to read"), "previous");
        let leftovers = std::fs::read_dir(temp_dir.path()).expect("Failed to list").count();
        assert_eq!(leftovers, 1);
    }
}
