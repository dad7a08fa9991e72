//! Static JSON Schema declarations for the two output streams.
//!
//! The schemas are declarative metadata shipped with the binary, not derived
//! from observed data. They are parsed once at the start of a run.

use serde_json::Value;

use crate::error::{Result, TapError};

const TASKS_SCHEMA: &str = include_str!("tasks.json");
const STORIES_SCHEMA: &str = include_str!("stories.json");

/// Parsed schema documents for both streams.
pub struct Schemas {
    pub tasks: Value,
    pub stories: Value,
}

/// Parse the embedded schema documents.
pub fn load_schemas() -> Result<Schemas> {
    Ok(Schemas {
        tasks: parse_schema(TASKS_SCHEMA, "tasks")?,
        stories: parse_schema(STORIES_SCHEMA, "stories")?,
    })
}

fn parse_schema(raw: &str, name: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| TapError::InvalidJson(format!("embedded {} schema: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_parse_and_declare_identity_key() {
        let schemas = load_schemas().unwrap();
        assert!(schemas.tasks["properties"]["id"].is_object());
        assert!(schemas.stories["properties"]["id"].is_object());
    }

    #[test]
    fn test_story_schema_declares_task_id_link() {
        let schemas = load_schemas().unwrap();
        assert!(schemas.stories["properties"]["task_id"].is_object());
    }

    #[test]
    fn test_task_schema_omits_stripped_fields() {
        let schemas = load_schemas().unwrap();
        let properties = schemas.tasks["properties"].as_object().unwrap();
        for field in ["enum_options", "custom_fields", "hearts"] {
            assert!(!properties.contains_key(field));
        }
    }
}
