#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns Go packages into a proto3 schema file.
//!
//! ## Module Organization
//!
//! - `orchestration` - Main pipeline entry points (`run`, `get_messages`)
//! - `output` - Output-path validation and write-then-rename persistence

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No package paths were given.
    #[error("No input paths provided")]
    NoInputPaths,
    /// The output file's directory does not exist.
    #[error("Output folder {} does not exist", .0.display())]
    OutputDirMissing(PathBuf),
    /// The output file's directory is not a directory.
    #[error("{} is not a directory", .0.display())]
    OutputNotDirectory(PathBuf),
    /// Error from loading the Go packages.
    #[error("Error getting messages: {0}")]
    Collector(#[from] collector::CollectorError),
    /// Nothing survived analysis and filtering.
    #[error("No messages were found")]
    NoMessages,
    /// The output file could not be created or replaced.
    #[error("Unable to create file {} : {source}", path.display())]
    CreateOutput {
        /// Destination path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// Error propagated from the codegen crate.
    #[error("Error writing output: {0}")]
    Emit(#[from] codegen::EmitError),
    /// I/O error while writing output or the IR dump.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub mod orchestration;
pub mod output;

pub use orchestration::{dump_ir, get_messages, run, Settings};
pub use output::{persist_output, validate_output};
