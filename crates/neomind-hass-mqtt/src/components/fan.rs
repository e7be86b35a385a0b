//! Fan component: power, oscillation and speed tiers.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{configured, enumeration};
use crate::channel::{ChannelDescriptor, CommandTopic, StateTopic};
use crate::codec::ValueCodec;
use crate::config::{parse_config, BaseConfig};
use crate::error::{HassError, HassResult};

pub const STATE_CHANNEL_ID: &str = "state";
pub const OSCILLATION_CHANNEL_ID: &str = "oscillation";
pub const SPEED_CHANNEL_ID: &str = "speed";

pub const DEFAULT_NAME: &str = "MQTT Fan";

const COMPONENT: &str = "fan";

/// Canonical speed tiers, in the order they are offered.
pub const SPEED_TIERS: [&str; 4] = ["off", "low", "medium", "high"];

fn default_payload_on() -> String {
    "ON".to_string()
}
fn default_payload_off() -> String {
    "OFF".to_string()
}
fn default_payload_oscillation_on() -> String {
    "oscillate_on".to_string()
}
fn default_payload_oscillation_off() -> String {
    "oscillate_off".to_string()
}
fn default_payload_off_speed() -> String {
    "off".to_string()
}
fn default_payload_low_speed() -> String {
    "low".to_string()
}
fn default_payload_medium_speed() -> String {
    "medium".to_string()
}
fn default_payload_high_speed() -> String {
    "high".to_string()
}

/// Discovery configuration of a fan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FanConfig {
    #[serde(flatten)]
    pub base: BaseConfig,

    pub state_topic: Option<String>,
    /// Required by the fan schema.
    pub command_topic: String,
    #[serde(default = "default_payload_on")]
    pub payload_on: String,
    #[serde(default = "default_payload_off")]
    pub payload_off: String,

    pub oscillation_state_topic: Option<String>,
    pub oscillation_command_topic: Option<String>,
    pub oscillation_value_template: Option<String>,
    #[serde(default = "default_payload_oscillation_on")]
    pub payload_oscillation_on: String,
    #[serde(default = "default_payload_oscillation_off")]
    pub payload_oscillation_off: String,

    pub speed_state_topic: Option<String>,
    pub speed_command_topic: Option<String>,
    pub speed_value_template: Option<String>,
    /// Canonical tiers the fan supports. All four when omitted.
    pub speeds: Option<Vec<String>>,
    #[serde(default = "default_payload_off_speed")]
    pub payload_off_speed: String,
    #[serde(default = "default_payload_low_speed")]
    pub payload_low_speed: String,
    #[serde(default = "default_payload_medium_speed")]
    pub payload_medium_speed: String,
    #[serde(default = "default_payload_high_speed")]
    pub payload_high_speed: String,
}

impl FanConfig {
    /// Parse and validate a fan discovery payload.
    pub fn from_payload(payload: &JsonValue) -> HassResult<Self> {
        let config: Self = parse_config(COMPONENT, payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HassResult<()> {
        self.base.validate(COMPONENT)?;
        if self.command_topic.is_empty() {
            return Err(HassError::invalid_config(COMPONENT, "command_topic is required"));
        }
        Ok(())
    }

    /// Literal for a canonical tier.
    fn tier_literal(&self, tier: &str) -> Option<&str> {
        match tier {
            "off" => Some(&self.payload_off_speed),
            "low" => Some(&self.payload_low_speed),
            "medium" => Some(&self.payload_medium_speed),
            "high" => Some(&self.payload_high_speed),
            _ => None,
        }
    }

    /// Speed literals offered on the speed channel.
    pub fn speed_literals(&self) -> Vec<String> {
        let Some(speeds) = &self.speeds else {
            return SPEED_TIERS
                .iter()
                .filter_map(|tier| self.tier_literal(tier))
                .map(str::to_string)
                .collect();
        };

        for unknown in speeds.iter().filter(|s| !SPEED_TIERS.contains(&s.as_str())) {
            tracing::debug!(speed = %unknown, "Ignoring unknown fan speed");
        }

        SPEED_TIERS
            .iter()
            .filter(|tier| speeds.iter().any(|s| s == *tier))
            .filter_map(|tier| self.tier_literal(tier))
            .map(str::to_string)
            .collect()
    }
}

/// Channels of a fan.
pub fn channels(config: &FanConfig) -> Vec<ChannelDescriptor> {
    let base = &config.base;
    let mut channels = Vec::new();

    channels.extend(ChannelDescriptor::assemble(
        STATE_CHANNEL_ID,
        "State",
        ValueCodec::on_off(&config.payload_on, &config.payload_off),
        StateTopic::from_config(config.state_topic.as_deref(), base.value_template(), None),
        CommandTopic::from_config(Some(&config.command_topic), base),
        None,
    ));

    if configured(&config.oscillation_state_topic) || configured(&config.oscillation_command_topic) {
        channels.extend(ChannelDescriptor::assemble(
            OSCILLATION_CHANNEL_ID,
            "Oscillation",
            ValueCodec::on_off(&config.payload_oscillation_on, &config.payload_oscillation_off),
            StateTopic::from_config(
                config.oscillation_state_topic.as_deref(),
                config.oscillation_value_template.as_deref(),
                base.value_template(),
            ),
            CommandTopic::from_config(config.oscillation_command_topic.as_deref(), base),
            None,
        ));
    }

    if configured(&config.speed_state_topic) || configured(&config.speed_command_topic) {
        if let Some(codec) = enumeration(SPEED_CHANNEL_ID, config.speed_literals()) {
            channels.extend(ChannelDescriptor::assemble(
                SPEED_CHANNEL_ID,
                "Speed",
                codec,
                StateTopic::from_config(
                    config.speed_state_topic.as_deref(),
                    config.speed_value_template.as_deref(),
                    base.value_template(),
                ),
                CommandTopic::from_config(config.speed_command_topic.as_deref(), base),
                None,
            ));
        }
    }

    channels
}
