//! Octane entity payloads and collection responses

use serde::Deserialize;
use serde_json::{json, Value};

/// Phase of a newly migrated manual test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestPhase {
    #[default]
    New,
}

impl TestPhase {
    pub fn logical_name(&self) -> &'static str {
        match self {
            TestPhase::New => "phase.test_manual.new",
        }
    }
}

/// A manual test as sent to and returned from the `tests` collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualTest {
    /// Server assigned, present once created
    pub id: Option<String>,
    pub name: String,
    pub phase: TestPhase,
    pub description: String,
    pub expected_result: String,
}

impl ManualTest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_expected_result(mut self, expected_result: impl Into<String>) -> Self {
        self.expected_result = expected_result.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Body for `POST .../tests`
    pub fn create_body(&self) -> Value {
        json!({
            "data": [{
                "type": "test",
                "subtype": "test_manual",
                "name": self.name,
                "description": self.description,
                "expected_result_udf": self.expected_result,
                "phase": { "type": "phase", "id": self.phase.logical_name() },
            }]
        })
    }

    /// Body for `PUT .../tests` pointing the test at its parameter table
    pub fn attach_table_body(test_id: &str, table_id: &str) -> Value {
        json!({
            "data": [{
                "type": "test",
                "id": test_id,
                "test_data_table": { "type": "test_data_table", "id": table_id },
            }]
        })
    }
}

/// Octane returns ids as strings, older servers sometimes as numbers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntity {
    id: RawId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawCollection {
    total_count: Option<u64>,
    data: Vec<RawEntity>,
}

/// Entities returned by a create or update on a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCollection {
    pub total_count: Option<u64>,
    pub ids: Vec<String>,
}

impl EntityCollection {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawCollection = serde_json::from_str(body)?;
        Ok(Self {
            total_count: raw.total_count,
            ids: raw.data.into_iter().map(|e| e.id.into_string()).collect(),
        })
    }

    pub fn first_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
