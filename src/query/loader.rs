//! Definition loader - YAML/JSON file loading and parsing
//!
//! This module handles loading query definitions from disk.

use super::types::QueryDefinition;
use crate::error::QueryError;
use std::fs;
use std::path::Path;

/// Loads query definitions from YAML or JSON files
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a definition, choosing the format from the file extension
    pub fn load_definition<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<QueryDefinition, QueryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("Loaded definition file {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_yaml(&content),
        }
    }

    /// Parse a definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<QueryDefinition, QueryError> {
        let def: QueryDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Parse a definition from a JSON string
    pub fn parse_json(content: &str) -> Result<QueryDefinition, QueryError> {
        let def: QueryDefinition = serde_json::from_str(content)?;
        Ok(def)
    }
}

impl Default for DefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}
