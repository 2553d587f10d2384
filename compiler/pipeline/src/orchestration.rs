//! Pipeline orchestration for the main entry points.
//!
//! This module coordinates the collector, the analysis passes and the emitter
//! to execute the complete conversion.

use std::path::{Path, PathBuf};

use codegen::{EmitOptions, ProtoEmitter};
use ir::SchemaIR;
use tracing::{debug, info};

use crate::output::{persist_output, validate_output};
use crate::{PipelineError, Result};

/// Inputs to a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Package directories or `dir/...` patterns
    pub inputs: Vec<String>,
    /// Substring that final message names must contain; empty keeps everything
    pub filter: String,
    /// Destination `.proto` file
    pub output: PathBuf,
    /// Emit struct tags as field options
    pub use_tags: bool,
    /// Also write the resolved schema as JSON to this path
    pub dump_ir: Option<PathBuf>,
}

/// Load `inputs`, resolve the message graph and keep messages whose final
/// name contains `filter`.
///
/// # Errors
///
/// Returns [`PipelineError::NoMessages`] if nothing is left after filtering.
pub fn get_messages<S: AsRef<str>>(inputs: &[S], filter: &str) -> Result<SchemaIR> {
    let definitions = collector::load_packages(inputs)?;
    debug!("Collected {} type definitions", definitions.len());

    let map = analysis::analyze(&definitions);
    let total = map.len();
    let messages: Vec<_> =
        map.into_messages().into_iter().filter(|m| m.type_name.contains(filter)).collect();
    debug!("Kept {} of {} messages after filter {:?}", messages.len(), total, filter);

    if messages.is_empty() {
        return Err(PipelineError::NoMessages);
    }
    Ok(SchemaIR::new(messages))
}

/// Write `schema` to `path` as pretty-printed JSON.
pub fn dump_ir(schema: &SchemaIR, path: &Path) -> Result<()> {
    schema.to_file(path)?;
    info!("IR written to {}", path.display());
    Ok(())
}

/// Run the whole conversion described by `settings`.
///
/// Configuration is checked before any package is loaded, and the output file
/// is only replaced once the schema has been written in full. Returns the
/// absolute path of the written file.
pub fn run(settings: &Settings) -> Result<PathBuf> {
    if settings.inputs.is_empty() {
        return Err(PipelineError::NoInputPaths);
    }
    validate_output(&settings.output)?;

    let schema = get_messages(&settings.inputs, &settings.filter)?;
    if let Some(path) = &settings.dump_ir {
        dump_ir(&schema, path)?;
    }

    let emitter = ProtoEmitter::new(EmitOptions { use_tags: settings.use_tags });
    persist_output(&settings.output, |file| emitter.write_output(file, &schema))?;

    let written = std::fs::canonicalize(&settings.output).unwrap_or_else(|_| settings.output.clone());
    info!("Output file written to {}", written.display());
    Ok(written)
}
