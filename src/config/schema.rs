//! JSON Schema validation for fetchtree manifests

use anyhow::{Result, anyhow};
use jsonschema::{Draft, Validator};
use serde_json::Value;

/// Compile the embedded JSON schema for fetchtree manifests
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {}", e))?;

    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&schema)
        .map_err(|e| anyhow!("Failed to compile JSON schema: {}", e))
}

/// Validate a manifest value against the schema
pub fn validate_against_schema(manifest: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(manifest)
        .map(|e| format!("  - Path '{}': {}", e.instance_path, e))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Manifest validation failed:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}
