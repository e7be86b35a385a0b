//! Home Assistant MQTT Discovery envelope.
//!
//! HASS devices publish their configuration to MQTT topics:
//! - `<prefix>/<component>/<object_id>/config`
//! - `<prefix>/<component>/<node_id>/<object_id>/config`
//!
//! The prefix is `homeassistant` unless configured otherwise.
//!
//! ## Example
//!
//! ```json
//! // Topic: homeassistant/fan/bedroom/config
//! {
//!   "name": "Bedroom Fan",
//!   "state_topic": "bedroom/fan/on/state",
//!   "command_topic": "bedroom/fan/on/set",
//!   "oscillation_command_topic": "bedroom/fan/oscillation/set",
//!   "speeds": ["low", "high"]
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{HassError, HassResult};

/// Default discovery prefix.
pub const DEFAULT_DISCOVERY_PREFIX: &str = "homeassistant";

/// Runtime settings for discovery parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySettings {
    pub prefix: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_DISCOVERY_PREFIX)
    }
}

impl DiscoverySettings {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Check if a topic is a discovery topic under this prefix.
    pub fn is_discovery_topic(&self, topic: &str) -> bool {
        TopicParts::parse(&self.prefix, topic).is_some()
    }

    /// Subscription patterns for both topic shapes.
    ///
    /// The MQTT `+` wildcard matches exactly one level, so the 4-part and
    /// 5-part formats need separate patterns.
    pub fn subscription_patterns(&self, component: Option<ComponentType>) -> Vec<String> {
        let component = component.map_or("+", |c| c.as_str());
        vec![
            format!("{}/{}/+/config", self.prefix, component),
            format!("{}/{}/+/+/config", self.prefix, component),
        ]
    }
}

/// Component types this crate can assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Fan,
    Climate,
    Cover,
    Vacuum,
}

impl ComponentType {
    pub const ALL: [ComponentType; 4] = [
        ComponentType::Fan,
        ComponentType::Climate,
        ComponentType::Cover,
        ComponentType::Vacuum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Fan => "fan",
            ComponentType::Climate => "climate",
            ComponentType::Cover => "cover",
            ComponentType::Vacuum => "vacuum",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = HassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fan" => Ok(ComponentType::Fan),
            "climate" => Ok(ComponentType::Climate),
            "cover" => Ok(ComponentType::Cover),
            "vacuum" => Ok(ComponentType::Vacuum),
            other => Err(HassError::UnsupportedComponent(other.to_string())),
        }
    }
}

/// Parsed discovery topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicParts {
    /// Component segment as published (may be unsupported).
    pub component: String,

    pub node_id: Option<String>,

    pub object_id: String,
}

impl TopicParts {
    /// Parse a discovery topic, `None` if it does not have one of the two
    /// discovery shapes under `prefix`.
    pub fn parse(prefix: &str, topic: &str) -> Option<Self> {
        let rest = topic.strip_prefix(prefix)?.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        match parts.as_slice() {
            [component, object_id, "config"] => Some(Self {
                component: component.to_string(),
                node_id: None,
                object_id: object_id.to_string(),
            }),
            [component, node_id, object_id, "config"] => Some(Self {
                component: component.to_string(),
                node_id: Some(node_id.to_string()),
                object_id: object_id.to_string(),
            }),
            _ => None,
        }
    }

    /// `<node_id>_<object_id>`, or just the object id.
    pub fn default_id(&self) -> String {
        match &self.node_id {
            Some(node) => format!("{}_{}", node, self.object_id),
            None => self.object_id.clone(),
        }
    }

    /// Entity ID in HASS format.
    pub fn entity_id(&self) -> String {
        format!("{}.{}", self.component, self.default_id())
    }
}

/// Discovery message with topic context.
#[derive(Debug, Clone)]
pub struct DiscoveryMessage {
    pub topic: String,

    pub topic_parts: TopicParts,

    pub component_type: ComponentType,

    /// Raw configuration payload, parsed per component type later.
    pub payload: JsonValue,
}

impl DiscoveryMessage {
    /// Build a message from an already-parsed payload.
    pub fn new(
        settings: &DiscoverySettings,
        topic: &str,
        payload: JsonValue,
    ) -> HassResult<Self> {
        let topic_parts = TopicParts::parse(&settings.prefix, topic)
            .ok_or_else(|| HassError::InvalidMessage(format!("Invalid topic: {}", topic)))?;
        let component_type = topic_parts.component.parse()?;

        if !payload.is_object() {
            return Err(HassError::InvalidMessage(
                "Payload must be a JSON object".to_string(),
            ));
        }

        Ok(Self {
            topic: topic.to_string(),
            topic_parts,
            component_type,
            payload,
        })
    }

    /// `unique_id` from the payload when present, otherwise derived from the topic.
    pub fn component_id(&self) -> String {
        self.payload
            .get("unique_id")
            .and_then(JsonValue::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.topic_parts.default_id())
    }
}

/// Parse a discovery message from topic and raw payload.
pub fn parse_discovery_message(
    settings: &DiscoverySettings,
    topic: &str,
    payload: &[u8],
) -> HassResult<DiscoveryMessage> {
    let payload: JsonValue = serde_json::from_slice(payload)
        .map_err(|e| HassError::InvalidMessage(format!("Invalid JSON: {}", e)))?;

    DiscoveryMessage::new(settings, topic, payload)
}
