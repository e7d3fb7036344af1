//! Schema file loading
//!
//! Copyright (c) 2025 Formflow Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod schema_loader;

pub use error::{LoaderError, LoaderResult};
pub use schema_loader::{SchemaFormat, SchemaLoader};
