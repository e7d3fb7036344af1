//! Schema command handlers

use super::utils::load_validator;
use crate::cli::{SchemaAction, SchemaArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use formflow_schemas::SchemaLoader;
use serde_json::json;
use std::path::Path;
use tracing::info;

/// Handle the schema command
pub async fn handle_schema(args: SchemaArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        SchemaAction::Show { file } => handle_schema_show(file.as_deref(), config, output),
        SchemaAction::Check { file } => handle_schema_check(&file, output),
    }
}

/// Print the effective schema
fn handle_schema_show(file: Option<&Path>, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let validator = load_validator(file, config)?;
    output.schema(validator.schema())
}

/// Load and compile a schema file, reporting what it declares
fn handle_schema_check(file: &Path, output: &mut OutputWriter) -> Result<()> {
    let validator = SchemaLoader::new().load_validator(file)?;
    let schema = validator.schema();
    info!(schema = %schema.name, fields = schema.fields.len(), "Schema check passed");

    if output.format() == crate::cli::OutputFormat::Human {
        output.success(&format!(
            "✓ Schema '{}' is valid ({} field(s))",
            schema.name,
            schema.fields.len()
        ))
    } else {
        output.data(&json!({
            "valid": true,
            "name": schema.name,
            "fields": schema.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        }))
    }
}
