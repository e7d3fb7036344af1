//! Loads form schemas from JSON or YAML files
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::validation::{FieldValidator, FormSchema};
use std::path::Path;

/// File formats a schema can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Reads schema files and checks them before handing them out
#[derive(Debug, Default)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and parse a schema file without checking it
    pub fn load_schema(&self, path: &Path) -> LoaderResult<FormSchema> {
        let format =
            SchemaFormat::from_path(path).ok_or_else(|| LoaderError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        Self::parse_str(&content, format, path)
    }

    /// Load a schema file and build a validator from it
    pub fn load_validator(&self, path: &Path) -> LoaderResult<FieldValidator> {
        let schema = self.load_schema(path)?;
        FieldValidator::new(schema).map_err(|source| LoaderError::InvalidSchema {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse schema text in the given format; `origin` is only used for errors
    pub fn parse_str(content: &str, format: SchemaFormat, origin: &Path) -> LoaderResult<FormSchema> {
        match format {
            SchemaFormat::Json => serde_json::from_str(content)
                .map_err(|e| LoaderError::json_parse_error(origin.to_path_buf(), e)),
            SchemaFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| LoaderError::yaml_parse_error(origin.to_path_buf(), e)),
        }
    }
}
