//! Vacuum component.
//!
//! The command channel offers the literals of the supported features only.
//! Status channels are read-only, each gated by its own topic.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{configured, enumeration};
use crate::channel::{ChannelDescriptor, CommandTopic, StateTopic};
use crate::codec::{PercentageCodec, ValueCodec};
use crate::config::{parse_config, BaseConfig};
use crate::error::HassResult;

pub const COMMAND_CHANNEL_ID: &str = "command";
pub const BATTERY_CHANNEL_ID: &str = "battery";
pub const CHARGING_CHANNEL_ID: &str = "charging";
pub const CLEANING_CHANNEL_ID: &str = "cleaning";
pub const DOCKED_CHANNEL_ID: &str = "docked";
pub const ERROR_CHANNEL_ID: &str = "error";
pub const FAN_SPEED_CHANNEL_ID: &str = "fan";
pub const EXTRA_COMMAND_CHANNEL_ID: &str = "extra";

pub const DEFAULT_NAME: &str = "MQTT Vacuum";

pub const DEFAULT_SUPPORTED_FEATURES: [&str; 7] = [
    "turn_on",
    "turn_off",
    "stop",
    "return_home",
    "status",
    "battery",
    "clean_spot",
];

const COMPONENT: &str = "vacuum";

fn default_supported_features() -> Vec<String> {
    DEFAULT_SUPPORTED_FEATURES.iter().map(|f| f.to_string()).collect()
}
fn default_payload_turn_on() -> String {
    "turn_on".to_string()
}
fn default_payload_turn_off() -> String {
    "turn_off".to_string()
}
fn default_payload_return_to_base() -> String {
    "return_to_base".to_string()
}
fn default_payload_stop() -> String {
    "stop".to_string()
}
fn default_payload_clean_spot() -> String {
    "clean_spot".to_string()
}
fn default_payload_locate() -> String {
    "locate".to_string()
}
fn default_payload_start_pause() -> String {
    "start_pause".to_string()
}

/// Discovery configuration of a vacuum.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VacuumConfig {
    #[serde(flatten)]
    pub base: BaseConfig,

    #[serde(default = "default_supported_features")]
    pub supported_features: Vec<String>,

    pub command_topic: Option<String>,
    #[serde(default = "default_payload_turn_on")]
    pub payload_turn_on: String,
    #[serde(default = "default_payload_turn_off")]
    pub payload_turn_off: String,
    #[serde(default = "default_payload_return_to_base")]
    pub payload_return_to_base: String,
    #[serde(default = "default_payload_stop")]
    pub payload_stop: String,
    #[serde(default = "default_payload_clean_spot")]
    pub payload_clean_spot: String,
    #[serde(default = "default_payload_locate")]
    pub payload_locate: String,
    #[serde(default = "default_payload_start_pause")]
    pub payload_start_pause: String,

    pub battery_level_topic: Option<String>,
    pub battery_level_template: Option<String>,

    pub charging_topic: Option<String>,
    pub charging_template: Option<String>,

    pub cleaning_topic: Option<String>,
    pub cleaning_template: Option<String>,

    pub docked_topic: Option<String>,
    pub docked_template: Option<String>,

    pub error_topic: Option<String>,
    pub error_template: Option<String>,

    pub fan_speed_topic: Option<String>,
    pub fan_speed_template: Option<String>,
    pub set_fan_speed_topic: Option<String>,
    /// No canonical default; the fan speed channel needs an explicit list.
    pub fan_speed_list: Option<Vec<String>>,

    pub send_command_topic: Option<String>,
}

impl VacuumConfig {
    /// Parse and validate a vacuum discovery payload.
    pub fn from_payload(payload: &JsonValue) -> HassResult<Self> {
        let config: Self = parse_config(COMPONENT, payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HassResult<()> {
        self.base.validate(COMPONENT)
    }

    /// Command literal for a feature, `None` for features without a command.
    fn feature_literal(&self, feature: &str) -> Option<&str> {
        match feature {
            "turn_on" => Some(&self.payload_turn_on),
            "turn_off" => Some(&self.payload_turn_off),
            "pause" => Some(&self.payload_start_pause),
            "stop" => Some(&self.payload_stop),
            "return_home" => Some(&self.payload_return_to_base),
            "locate" => Some(&self.payload_locate),
            "clean_spot" => Some(&self.payload_clean_spot),
            _ => None,
        }
    }

    /// Command literals in `supported_features` order.
    pub fn command_literals(&self) -> Vec<String> {
        self.supported_features
            .iter()
            .filter_map(|feature| {
                let literal = self.feature_literal(feature);
                if literal.is_none() {
                    tracing::debug!(feature = %feature, "Vacuum feature has no command");
                }
                literal
            })
            .map(str::to_string)
            .collect()
    }
}

/// Read-only channel fed by `topic`.
fn status(
    config: &VacuumConfig,
    id: &'static str,
    label: &str,
    codec: ValueCodec,
    topic: &Option<String>,
    template: &Option<String>,
) -> Option<ChannelDescriptor> {
    ChannelDescriptor::assemble(
        id,
        label,
        codec,
        StateTopic::from_config(
            topic.as_deref(),
            template.as_deref(),
            config.base.value_template(),
        ),
        None,
        None,
    )
}

/// Channels of a vacuum.
pub fn channels(config: &VacuumConfig) -> Vec<ChannelDescriptor> {
    let base = &config.base;
    let mut channels = Vec::new();

    if configured(&config.command_topic) {
        if let Some(codec) = enumeration(COMMAND_CHANNEL_ID, config.command_literals()) {
            channels.extend(ChannelDescriptor::assemble(
                COMMAND_CHANNEL_ID,
                "Command",
                codec,
                None,
                CommandTopic::from_config(config.command_topic.as_deref(), base),
                None,
            ));
        }
    }

    if configured(&config.battery_level_topic) {
        match PercentageCodec::new(0.0, 100.0) {
            Ok(codec) => channels.extend(ChannelDescriptor::assemble(
                BATTERY_CHANNEL_ID,
                "Battery Level",
                ValueCodec::Percentage(codec),
                StateTopic::from_config(
                    config.battery_level_topic.as_deref(),
                    config.battery_level_template.as_deref(),
                    base.value_template(),
                ),
                None,
                Some("%"),
            )),
            Err(e) => tracing::warn!(error = %e, "Battery channel skipped"),
        }
    }

    let flags = [
        (CHARGING_CHANNEL_ID, "Charging", &config.charging_topic, &config.charging_template),
        (CLEANING_CHANNEL_ID, "Cleaning", &config.cleaning_topic, &config.cleaning_template),
        (DOCKED_CHANNEL_ID, "Docked", &config.docked_topic, &config.docked_template),
    ];
    for (id, label, topic, template) in flags {
        channels.extend(status(config, id, label, ValueCodec::on_off("ON", "OFF"), topic, template));
    }

    channels.extend(status(
        config,
        ERROR_CHANNEL_ID,
        "Error",
        ValueCodec::Text,
        &config.error_topic,
        &config.error_template,
    ));

    if configured(&config.fan_speed_topic) || configured(&config.set_fan_speed_topic) {
        let speeds = config.fan_speed_list.as_deref().unwrap_or_default();
        if let Some(codec) = enumeration(FAN_SPEED_CHANNEL_ID, speeds) {
            channels.extend(ChannelDescriptor::assemble(
                FAN_SPEED_CHANNEL_ID,
                "Fan Speed",
                codec,
                StateTopic::from_config(
                    config.fan_speed_topic.as_deref(),
                    config.fan_speed_template.as_deref(),
                    base.value_template(),
                ),
                CommandTopic::from_config(config.set_fan_speed_topic.as_deref(), base),
                None,
            ));
        }
    }

    channels.extend(ChannelDescriptor::assemble(
        EXTRA_COMMAND_CHANNEL_ID,
        "Extra Command",
        ValueCodec::Text,
        None,
        CommandTopic::from_config(config.send_command_topic.as_deref(), base),
        None,
    ));

    channels
}
