use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One page of the `/gtr/api/projects` listing (`application/vnd.rcuk.gtr.json-v7`).
///
/// Records stay as raw JSON so a single malformed entry does not fail the page.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub project: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub funders: Option<Vec<Funder>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Funder {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub name: Option<String>,
}

impl ProjectEnvelope {
    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
    }
}

impl Project {
    /// Name of the first listed funder, if any.
    pub fn lead_funder(&self) -> Option<&str> {
        self.funders
            .as_deref()
            .and_then(|funders| funders.first())
            .and_then(|funder| funder.name.as_deref())
    }
}

/// Best-effort id of a raw record, used to label records that fail to decode.
pub fn raw_project_id(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text columns take any JSON scalar in its JSON spelling (`17` -> `"17"`).
/// Arrays and objects are still a decode error.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
            "expected a string, number or boolean",
        )),
    }
}
