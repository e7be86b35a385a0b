//! Configuration shared by all discovery components.
//!
//! Each component flattens [`BaseConfig`] into its own record. Defaults live
//! in `Default` impls and `default_*` functions next to the fields, so one
//! place per type documents what an omitted field means.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{HassError, HassResult};

/// Highest QoS level MQTT knows.
pub const MAX_QOS: u8 = 2;

/// Fields every discovery payload may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Friendly name; each component has its own fallback.
    pub name: Option<String>,

    /// Template applied to incoming state payloads.
    pub value_template: Option<String>,

    pub qos: u8,

    pub retain: bool,

    pub unique_id: Option<String>,

    pub availability_topic: Option<String>,

    pub payload_available: String,

    pub payload_not_available: String,

    pub json_attributes_topic: Option<String>,

    pub json_attributes_template: Option<String>,

    pub device: Option<DeviceInfo>,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            name: None,
            value_template: None,
            qos: 0,
            retain: false,
            unique_id: None,
            availability_topic: None,
            payload_available: "online".to_string(),
            payload_not_available: "offline".to_string(),
            json_attributes_topic: None,
            json_attributes_template: None,
            device: None,
        }
    }
}

impl BaseConfig {
    pub fn validate(&self, component: &'static str) -> HassResult<()> {
        if self.qos > MAX_QOS {
            return Err(HassError::invalid_config(
                component,
                format!("qos must be between 0 and {}, got {}", MAX_QOS, self.qos),
            ));
        }
        Ok(())
    }

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    pub fn value_template(&self) -> Option<&str> {
        self.value_template.as_deref()
    }

    pub fn availability(&self) -> Option<Availability> {
        let topic = self.availability_topic.as_deref().filter(|t| !t.is_empty())?;
        Some(Availability {
            topic: topic.to_string(),
            payload_available: self.payload_available.clone(),
            payload_not_available: self.payload_not_available.clone(),
            qos: self.qos,
        })
    }

    pub fn json_attributes(&self) -> Option<JsonAttributes> {
        let topic = self.json_attributes_topic.as_deref().filter(|t| !t.is_empty())?;
        Some(JsonAttributes {
            topic: topic.to_string(),
            template: self
                .json_attributes_template
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }
}

/// Device the entity belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// A single string is accepted as a one-element list.
    #[serde(default, deserialize_with = "string_or_seq")]
    pub identifiers: Vec<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub manufacturer: Option<String>,

    #[serde(default)]
    pub sw_version: Option<String>,
}

/// Online/offline reporting of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub topic: String,
    pub payload_available: String,
    pub payload_not_available: String,
    pub qos: u8,
}

impl Availability {
    /// `None` for payloads that are neither literal.
    pub fn decode(&self, payload: &str) -> Option<bool> {
        if payload == self.payload_available {
            Some(true)
        } else if payload == self.payload_not_available {
            Some(false)
        } else {
            None
        }
    }
}

/// Topic carrying a JSON object of extra state attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonAttributes {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Deserialize a component record from a discovery payload.
pub(crate) fn parse_config<T: DeserializeOwned>(
    component: &'static str,
    payload: &JsonValue,
) -> HassResult<T> {
    T::deserialize(payload).map_err(|e| HassError::invalid_config(component, e.to_string()))
}

/// Explicitly configured literal lists must not be empty.
pub(crate) fn require_literals(
    component: &'static str,
    field: &str,
    literals: &[String],
) -> HassResult<()> {
    if literals.is_empty() {
        return Err(HassError::invalid_config(
            component,
            format!("{} must contain at least one entry", field),
        ));
    }
    Ok(())
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match OneOrMany::deserialize(deserializer) {
        Ok(OneOrMany::One(s)) => Ok(vec![s]),
        Ok(OneOrMany::Many(v)) => Ok(v),
        Err(_) => Err(de::Error::custom(
            "expected a string or a list of strings",
        )),
    }
}
