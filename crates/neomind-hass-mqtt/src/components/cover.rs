//! Cover component: blinds, shutters, garage doors.
//!
//! A cover is driven either by position or by open/close/stop commands, never
//! both. A `position_topic` makes the position channel replace the
//! open/close/stop channel. A `set_position_topic` alone only builds a
//! write-only position channel when no state or command topic is configured.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::configured;
use crate::channel::{ChannelDescriptor, CommandTopic, StateTopic};
use crate::codec::{PercentageCodec, RollershutterCodec, ValueCodec};
use crate::config::{parse_config, BaseConfig};
use crate::error::{HassError, HassResult};

pub const COVER_CHANNEL_ID: &str = "cover";
pub const POSITION_CHANNEL_ID: &str = "position";
pub const TILT_CHANNEL_ID: &str = "tilt";

pub const DEFAULT_NAME: &str = "MQTT Cover";

const COMPONENT: &str = "cover";

fn default_payload_open() -> String {
    "OPEN".to_string()
}
fn default_payload_close() -> String {
    "CLOSE".to_string()
}
fn default_payload_stop() -> String {
    "STOP".to_string()
}
fn default_upper() -> i64 {
    100
}

/// Discovery configuration of a cover.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoverConfig {
    #[serde(flatten)]
    pub base: BaseConfig,

    pub state_topic: Option<String>,
    pub command_topic: Option<String>,
    #[serde(default = "default_payload_open")]
    pub payload_open: String,
    #[serde(default = "default_payload_close")]
    pub payload_close: String,
    #[serde(default = "default_payload_stop")]
    pub payload_stop: String,

    pub position_topic: Option<String>,
    pub set_position_topic: Option<String>,
    #[serde(default = "default_upper")]
    pub position_open: i64,
    #[serde(default, alias = "position_close")]
    pub position_closed: i64,

    pub tilt_command_topic: Option<String>,
    pub tilt_status_topic: Option<String>,
    pub tilt_status_template: Option<String>,
    #[serde(default)]
    pub tilt_min: i64,
    #[serde(default = "default_upper")]
    pub tilt_max: i64,
    #[serde(default)]
    pub tilt_closed_value: i64,
    #[serde(default = "default_upper")]
    pub tilt_opened_value: i64,
    #[serde(default)]
    pub tilt_invert_state: bool,
}

impl CoverConfig {
    /// Parse and validate a cover discovery payload.
    pub fn from_payload(payload: &JsonValue) -> HassResult<Self> {
        let config: Self = parse_config(COMPONENT, payload)?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks only apply to the features that are built.
    pub fn validate(&self) -> HassResult<()> {
        self.base.validate(COMPONENT)?;
        if self.uses_position() && self.position_open == self.position_closed {
            return Err(HassError::invalid_config(
                COMPONENT,
                "position_open and position_closed must differ",
            ));
        }
        if self.has_tilt() && self.tilt_min == self.tilt_max {
            return Err(HassError::invalid_config(COMPONENT, "tilt_min and tilt_max must differ"));
        }
        Ok(())
    }

    /// Whether the position channel replaces the open/close/stop channel.
    pub fn uses_position(&self) -> bool {
        if configured(&self.position_topic) {
            return true;
        }
        configured(&self.set_position_topic)
            && !configured(&self.state_topic)
            && !configured(&self.command_topic)
    }

    pub fn has_tilt(&self) -> bool {
        configured(&self.tilt_status_topic) || configured(&self.tilt_command_topic)
    }
}

/// Channels of a cover.
pub fn channels(config: &CoverConfig) -> Vec<ChannelDescriptor> {
    let base = &config.base;
    let mut channels = Vec::new();

    if config.uses_position() {
        match PercentageCodec::new(config.position_closed as f64, config.position_open as f64) {
            Ok(codec) => channels.extend(ChannelDescriptor::assemble(
                POSITION_CHANNEL_ID,
                "Position",
                ValueCodec::Percentage(codec),
                StateTopic::from_config(config.position_topic.as_deref(), base.value_template(), None),
                CommandTopic::from_config(config.set_position_topic.as_deref(), base),
                None,
            )),
            Err(e) => tracing::warn!(error = %e, "Position channel skipped"),
        }
    } else if configured(&config.state_topic) || configured(&config.command_topic) {
        let codec = RollershutterCodec::new(
            &config.payload_open,
            &config.payload_close,
            &config.payload_stop,
        );
        channels.extend(ChannelDescriptor::assemble(
            COVER_CHANNEL_ID,
            "State",
            ValueCodec::Rollershutter(codec),
            StateTopic::from_config(config.state_topic.as_deref(), base.value_template(), None),
            CommandTopic::from_config(config.command_topic.as_deref(), base),
            None,
        ));
    }

    if config.has_tilt() {
        match PercentageCodec::new(config.tilt_min as f64, config.tilt_max as f64) {
            Ok(codec) => {
                let codec = codec
                    .inverted(config.tilt_invert_state)
                    .with_literals(
                        config.tilt_opened_value.to_string(),
                        config.tilt_closed_value.to_string(),
                    );
                channels.extend(ChannelDescriptor::assemble(
                    TILT_CHANNEL_ID,
                    "Tilt",
                    ValueCodec::Percentage(codec),
                    StateTopic::from_config(
                        config.tilt_status_topic.as_deref(),
                        config.tilt_status_template.as_deref(),
                        base.value_template(),
                    ),
                    CommandTopic::from_config(config.tilt_command_topic.as_deref(), base),
                    None,
                ));
            }
            Err(e) => tracing::warn!(error = %e, "Tilt channel skipped"),
        }
    }

    channels
}
