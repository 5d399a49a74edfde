//! Read-only lookups used to populate host option lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::instrument;

use odoo_core::{DisplayName, ModelName, Record, Result};

use crate::normalize;
use crate::session::JsonRpcSession;

/// An installed model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub modules: String,
}

/// A field of a model as described by `fields_get`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub help: Option<String>,
}

impl JsonRpcSession {
    /// Every model installed on the server.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let records = self
            .search_read_all(&ModelName::new("ir.model")?, &["name", "model", "modules"])
            .await?;

        Ok(records
            .into_iter()
            .map(|record| ModelInfo {
                name: text(&record, "name"),
                model: text(&record, "model"),
                modules: text(&record, "modules"),
            })
            .collect())
    }

    /// Fields of `model`, sorted by label.
    #[instrument(skip(self), fields(%model))]
    pub async fn fields_get(&self, model: &ModelName) -> Result<Vec<FieldInfo>> {
        let mut kwargs = Map::new();
        kwargs.insert(
            "attributes".to_string(),
            json!(["string", "type", "help", "required", "name"]),
        );
        let response = self
            .execute_kw(model, "fields_get", Vec::new(), kwargs)
            .await?;

        let mut fields: Vec<FieldInfo> = match response {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, attrs)| FieldInfo {
                    label: attrs
                        .get("string")
                        .and_then(Value::as_str)
                        .unwrap_or(&name)
                        .to_string(),
                    field_type: attrs
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    required: attrs
                        .get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    help: attrs
                        .get("help")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    name,
                })
                .collect(),
            _ => Vec::new(),
        };
        fields.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(fields)
    }

    /// Countries, sorted by name.
    pub async fn list_countries(&self) -> Result<Vec<DisplayName>> {
        self.named_options("res.country").await
    }

    /// Country states, sorted by name.
    pub async fn list_states(&self) -> Result<Vec<DisplayName>> {
        self.named_options("res.country.state").await
    }

    async fn named_options(&self, model: &str) -> Result<Vec<DisplayName>> {
        let records = self
            .search_read_all(&ModelName::new(model)?, &["id", "name"])
            .await?;

        let pairs = Value::Array(
            records
                .into_iter()
                .map(|record| json!([record.get("id"), record.get("name")]))
                .collect(),
        );
        let mut options = normalize::display_names(pairs)?;
        options.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(options)
    }

    async fn search_read_all(&self, model: &ModelName, fields: &[&str]) -> Result<Vec<Record>> {
        let mut kwargs = Map::new();
        kwargs.insert("fields".to_string(), json!(fields));
        let response = self
            .execute_kw(model, "search_read", vec![json!([])], kwargs)
            .await?;
        normalize::records(response)
    }
}

fn text(record: &Record, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
