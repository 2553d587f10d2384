#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! proto3 schema emission.
//!
//! This crate renders a resolved [`SchemaIR`] as proto3 text. Output is fully
//! determined by its input: messages come out in the schema's final-name
//! order, fields keep their ordinal order, and the optional imports are
//! derived from a scan of the whole schema before any message is written.

pub mod proto;

use std::io::Write;

use ir::SchemaIR;
use thiserror::Error;

pub use proto::{escape_quotes, field_line, ANY_IMPORT, TAGGER_IMPORT};

/// Error type for schema emission.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Underlying I/O error while writing output.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Formatting error when building the schema text.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Convenient result type for emission functions in this crate.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Options controlling what the emitter writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Emit struct tags as `(tagger.tags)` field options
    pub use_tags: bool,
}

/// Renders schemas as proto3 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoEmitter {
    options: EmitOptions,
}

impl ProtoEmitter {
    /// Create an emitter with the given options.
    pub fn new(options: EmitOptions) -> Self { Self { options } }

    /// Imports the schema needs, in emission order.
    pub fn imports(&self, schema: &SchemaIR) -> Vec<&'static str> {
        let mut imports = Vec::new();
        if self.options.use_tags && schema.has_tags() {
            imports.push(TAGGER_IMPORT);
        }
        if schema.uses_any() {
            imports.push(ANY_IMPORT);
        }
        imports
    }

    /// Render the schema to a string.
    pub fn render(&self, schema: &SchemaIR) -> Result<String> {
        use std::fmt::Write as _;

        let mut buf = String::new();
        writeln!(buf, "syntax = \"proto3\";")?;
        writeln!(buf)?;
        writeln!(buf, "package proto;")?;

        let imports = self.imports(schema);
        if !imports.is_empty() {
            writeln!(buf)?;
            for import in imports {
                writeln!(buf, "import \"{}\";", import)?;
            }
        }

        for message in schema.messages() {
            writeln!(buf)?;
            writeln!(buf, "message {} {{", message.type_name)?;
            for field in &message.fields {
                writeln!(buf, "  {}", field_line(field, self.options.use_tags))?;
            }
            writeln!(buf, "}}")?;
        }

        Ok(buf)
    }

    /// Render the schema and write it to `out` in one piece.
    pub fn write_output<W: Write>(&self, mut out: W, schema: &SchemaIR) -> Result<()> {
        let text = self.render(schema)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
