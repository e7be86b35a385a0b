//! Climate (HVAC) component.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{configured, enumeration};
use crate::channel::{ChannelDescriptor, CommandTopic, StateTopic};
use crate::codec::{NumberCodec, ValueCodec};
use crate::config::{parse_config, require_literals, BaseConfig};
use crate::error::{HassError, HassResult};

pub const CURRENT_TEMPERATURE_CHANNEL_ID: &str = "current";
pub const POWER_CHANNEL_ID: &str = "power";
pub const MODE_CHANNEL_ID: &str = "mode";
pub const TEMPERATURE_CHANNEL_ID: &str = "temperature";
pub const FAN_MODE_CHANNEL_ID: &str = "fan";
pub const SWING_MODE_CHANNEL_ID: &str = "swing";
pub const AWAY_MODE_CHANNEL_ID: &str = "away";
pub const HOLD_CHANNEL_ID: &str = "hold";
pub const AUX_CHANNEL_ID: &str = "aux";

pub const DEFAULT_NAME: &str = "MQTT HVAC";

pub const DEFAULT_MODES: [&str; 6] = ["auto", "off", "cool", "heat", "dry", "fan_only"];
pub const DEFAULT_FAN_MODES: [&str; 4] = ["auto", "low", "medium", "high"];
pub const DEFAULT_SWING_MODES: [&str; 2] = ["on", "off"];

const COMPONENT: &str = "climate";

fn default_payload_on() -> String {
    "ON".to_string()
}
fn default_payload_off() -> String {
    "OFF".to_string()
}
fn default_modes() -> Vec<String> {
    DEFAULT_MODES.iter().map(|m| m.to_string()).collect()
}
fn default_fan_modes() -> Vec<String> {
    DEFAULT_FAN_MODES.iter().map(|m| m.to_string()).collect()
}
fn default_swing_modes() -> Vec<String> {
    DEFAULT_SWING_MODES.iter().map(|m| m.to_string()).collect()
}
fn default_temp_step() -> f64 {
    1.0
}

/// Discovery configuration of a climate device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClimateConfig {
    #[serde(flatten)]
    pub base: BaseConfig,

    #[serde(default = "default_payload_on")]
    pub payload_on: String,
    #[serde(default = "default_payload_off")]
    pub payload_off: String,

    pub current_temperature_topic: Option<String>,
    pub current_temperature_template: Option<String>,

    pub power_command_topic: Option<String>,
    pub power_state_topic: Option<String>,
    pub power_state_template: Option<String>,

    pub mode_command_topic: Option<String>,
    pub mode_state_topic: Option<String>,
    pub mode_state_template: Option<String>,
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,

    pub temperature_command_topic: Option<String>,
    pub temperature_state_topic: Option<String>,
    pub temperature_state_template: Option<String>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    #[serde(default = "default_temp_step")]
    pub temp_step: f64,
    /// `C`, `F` or a free-form unit.
    pub temperature_unit: Option<String>,

    pub fan_mode_command_topic: Option<String>,
    pub fan_mode_state_topic: Option<String>,
    pub fan_mode_state_template: Option<String>,
    #[serde(default = "default_fan_modes")]
    pub fan_modes: Vec<String>,

    pub swing_mode_command_topic: Option<String>,
    pub swing_mode_state_topic: Option<String>,
    pub swing_mode_state_template: Option<String>,
    #[serde(default = "default_swing_modes")]
    pub swing_modes: Vec<String>,

    pub away_mode_command_topic: Option<String>,
    pub away_mode_state_topic: Option<String>,
    pub away_mode_state_template: Option<String>,

    pub hold_command_topic: Option<String>,
    pub hold_state_topic: Option<String>,
    pub hold_state_template: Option<String>,

    pub aux_command_topic: Option<String>,
    pub aux_state_topic: Option<String>,
    pub aux_state_template: Option<String>,
}

impl ClimateConfig {
    /// Parse and validate a climate discovery payload.
    pub fn from_payload(payload: &JsonValue) -> HassResult<Self> {
        let config: Self = parse_config(COMPONENT, payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HassResult<()> {
        self.base.validate(COMPONENT)?;

        if let (Some(min), Some(max)) = (self.min_temp, self.max_temp) {
            if min > max {
                return Err(HassError::invalid_config(
                    COMPONENT,
                    format!("min_temp {} is greater than max_temp {}", min, max),
                ));
            }
        }
        if !(self.temp_step.is_finite() && self.temp_step > 0.0) {
            return Err(HassError::invalid_config(COMPONENT, "temp_step must be positive"));
        }

        require_literals(COMPONENT, "modes", &self.modes)?;
        require_literals(COMPONENT, "fan_modes", &self.fan_modes)?;
        require_literals(COMPONENT, "swing_modes", &self.swing_modes)?;
        Ok(())
    }

    /// Unit shown on temperature channels.
    pub fn temperature_unit(&self) -> Option<&str> {
        match self.temperature_unit.as_deref() {
            Some("C") => Some("°C"),
            Some("F") => Some("°F"),
            Some("") | None => None,
            Some(other) => Some(other),
        }
    }

    fn on_off(&self) -> ValueCodec {
        ValueCodec::on_off(&self.payload_on, &self.payload_off)
    }
}

/// Topics and template of one optional climate feature.
struct Feature<'a> {
    id: &'static str,
    label: &'static str,
    state_topic: &'a Option<String>,
    template: &'a Option<String>,
    command_topic: &'a Option<String>,
}

impl Feature<'_> {
    fn is_present(&self) -> bool {
        configured(self.state_topic) || configured(self.command_topic)
    }

    fn assemble(&self, config: &ClimateConfig, codec: ValueCodec) -> Option<ChannelDescriptor> {
        ChannelDescriptor::assemble(
            self.id,
            self.label,
            codec,
            StateTopic::from_config(
                self.state_topic.as_deref(),
                self.template.as_deref(),
                config.base.value_template(),
            ),
            CommandTopic::from_config(self.command_topic.as_deref(), &config.base),
            None,
        )
    }

    fn switch(&self, config: &ClimateConfig) -> Option<ChannelDescriptor> {
        if !self.is_present() {
            return None;
        }
        self.assemble(config, config.on_off())
    }

    fn modes(&self, config: &ClimateConfig, literals: &[String]) -> Option<ChannelDescriptor> {
        if !self.is_present() {
            return None;
        }
        self.assemble(config, enumeration(self.id, literals)?)
    }
}

/// Channels of a climate device.
pub fn channels(config: &ClimateConfig) -> Vec<ChannelDescriptor> {
    let base = &config.base;
    let unit = config.temperature_unit();
    let mut channels = Vec::new();

    if configured(&config.current_temperature_topic) {
        channels.extend(ChannelDescriptor::assemble(
            CURRENT_TEMPERATURE_CHANNEL_ID,
            "Current Temperature",
            ValueCodec::Number(NumberCodec::unbounded()),
            StateTopic::from_config(
                config.current_temperature_topic.as_deref(),
                config.current_temperature_template.as_deref(),
                base.value_template(),
            ),
            None,
            unit,
        ));
    }

    let power = Feature {
        id: POWER_CHANNEL_ID,
        label: "Power",
        state_topic: &config.power_state_topic,
        template: &config.power_state_template,
        command_topic: &config.power_command_topic,
    };
    channels.extend(power.switch(config));

    let mode = Feature {
        id: MODE_CHANNEL_ID,
        label: "Mode",
        state_topic: &config.mode_state_topic,
        template: &config.mode_state_template,
        command_topic: &config.mode_command_topic,
    };
    channels.extend(mode.modes(config, &config.modes));

    if configured(&config.temperature_state_topic) || configured(&config.temperature_command_topic) {
        match NumberCodec::bounded(config.min_temp, config.max_temp, Some(config.temp_step)) {
            Ok(codec) => channels.extend(ChannelDescriptor::assemble(
                TEMPERATURE_CHANNEL_ID,
                "Temperature",
                ValueCodec::Number(codec),
                StateTopic::from_config(
                    config.temperature_state_topic.as_deref(),
                    config.temperature_state_template.as_deref(),
                    base.value_template(),
                ),
                CommandTopic::from_config(config.temperature_command_topic.as_deref(), base),
                unit,
            )),
            Err(e) => tracing::warn!(error = %e, "Temperature channel skipped"),
        }
    }

    let fan_mode = Feature {
        id: FAN_MODE_CHANNEL_ID,
        label: "Fan Mode",
        state_topic: &config.fan_mode_state_topic,
        template: &config.fan_mode_state_template,
        command_topic: &config.fan_mode_command_topic,
    };
    channels.extend(fan_mode.modes(config, &config.fan_modes));

    let swing_mode = Feature {
        id: SWING_MODE_CHANNEL_ID,
        label: "Swing Mode",
        state_topic: &config.swing_mode_state_topic,
        template: &config.swing_mode_state_template,
        command_topic: &config.swing_mode_command_topic,
    };
    channels.extend(swing_mode.modes(config, &config.swing_modes));

    let switches = [
        Feature {
            id: AWAY_MODE_CHANNEL_ID,
            label: "Away Mode",
            state_topic: &config.away_mode_state_topic,
            template: &config.away_mode_state_template,
            command_topic: &config.away_mode_command_topic,
        },
        Feature {
            id: HOLD_CHANNEL_ID,
            label: "Hold Mode",
            state_topic: &config.hold_state_topic,
            template: &config.hold_state_template,
            command_topic: &config.hold_command_topic,
        },
        Feature {
            id: AUX_CHANNEL_ID,
            label: "Aux Heat",
            state_topic: &config.aux_state_topic,
            template: &config.aux_state_template,
            command_topic: &config.aux_command_topic,
        },
    ];
    channels.extend(switches.iter().filter_map(|feature| feature.switch(config)));

    channels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ChannelValue;
    use serde_json::json;

    fn ids(channels: &[ChannelDescriptor]) -> Vec<&'static str> {
        channels.iter().map(|c| c.id).collect()
    }

    fn find<'a>(channels: &'a [ChannelDescriptor], id: &str) -> &'a ChannelDescriptor {
        channels.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn test_empty_config_has_no_channels() {
        let config = ClimateConfig::from_payload(&json!({})).unwrap();
        assert!(channels(&config).is_empty());
    }

    #[test]
    fn test_default_modes() {
        let config = ClimateConfig::from_payload(&json!({ "mode_state_topic": "hvac/mode" })).unwrap();
        let channels = channels(&config);

        match &find(&channels, MODE_CHANNEL_ID).codec {
            ValueCodec::Enumeration(codec) => {
                assert_eq!(codec.literals(), &["auto", "off", "cool", "heat", "dry", "fan_only"]);
            }
            other => panic!("unexpected codec {:?}", other),
        }
    }

    #[test]
    fn test_custom_modes_replace_defaults() {
        let config = ClimateConfig::from_payload(&json!({
            "mode_command_topic": "hvac/mode/set",
            "modes": ["heat", "eco"]
        }))
        .unwrap();
        let channels = channels(&config);
        let mode = find(&channels, MODE_CHANNEL_ID);

        assert!(mode.codec.decode("eco").is_ok());
        assert!(mode.codec.decode("auto").is_err());
        assert!(mode.is_write_only());
    }

    #[test]
    fn test_empty_mode_list_rejected() {
        let err = ClimateConfig::from_payload(&json!({ "modes": [] })).unwrap_err();
        assert!(err.to_string().contains("modes"));
    }

    #[test]
    fn test_temperature_bounds() {
        let config = ClimateConfig::from_payload(&json!({
            "temperature_command_topic": "hvac/temp/set",
            "min_temp": 7,
            "max_temp": 35,
            "temp_step": 0.5,
            "temperature_unit": "C"
        }))
        .unwrap();
        let channels = channels(&config);
        let temperature = find(&channels, TEMPERATURE_CHANNEL_ID);

        assert_eq!(temperature.unit.as_deref(), Some("°C"));
        match &temperature.codec {
            ValueCodec::Number(codec) => {
                assert_eq!(codec.min(), Some(7.0));
                assert_eq!(codec.max(), Some(35.0));
                assert_eq!(codec.step(), Some(0.5));
            }
            other => panic!("unexpected codec {:?}", other),
        }
        assert!(temperature.codec.decode("40").is_err());

        let err = ClimateConfig::from_payload(&json!({ "min_temp": 30, "max_temp": 10 }));
        assert!(err.is_err());
    }

    #[test]
    fn test_current_temperature_is_read_only() {
        let config = ClimateConfig::from_payload(&json!({
            "current_temperature_topic": "hvac/current",
            "value_template": "{{ value_json.t }}"
        }))
        .unwrap();
        let channels = channels(&config);

        assert_eq!(ids(&channels), vec![CURRENT_TEMPERATURE_CHANNEL_ID]);
        let current = &channels[0];
        assert!(current.is_read_only());
        assert_eq!(
            current.state.as_ref().unwrap().effective_template(),
            Some("{{ value_json.t }}")
        );
        assert_eq!(current.codec.decode("-3.5").unwrap(), ChannelValue::Number(-3.5));
    }

    #[test]
    fn test_swing_and_fan_mode_have_distinct_ids() {
        let config = ClimateConfig::from_payload(&json!({
            "fan_mode_state_topic": "hvac/fan",
            "swing_mode_state_topic": "hvac/swing",
            "swing_mode_state_template": "{{ value_json.swing }}"
        }))
        .unwrap();
        let channels = channels(&config);

        assert_eq!(ids(&channels), vec![FAN_MODE_CHANNEL_ID, SWING_MODE_CHANNEL_ID]);
        let swing = find(&channels, SWING_MODE_CHANNEL_ID);
        assert!(swing.codec.decode("on").is_ok());
        assert_eq!(
            swing.state.as_ref().unwrap().template.as_deref(),
            Some("{{ value_json.swing }}")
        );
    }

    #[test]
    fn test_switches_from_either_topic() {
        let config = ClimateConfig::from_payload(&json!({
            "power_command_topic": "hvac/power/set",
            "away_mode_state_topic": "hvac/away",
            "hold_command_topic": "hvac/hold/set",
            "aux_state_topic": "hvac/aux",
            "payload_on": "1",
            "payload_off": "0"
        }))
        .unwrap();
        let channels = channels(&config);

        assert_eq!(
            ids(&channels),
            vec![POWER_CHANNEL_ID, AWAY_MODE_CHANNEL_ID, HOLD_CHANNEL_ID, AUX_CHANNEL_ID]
        );
        let hold = find(&channels, HOLD_CHANNEL_ID);
        assert_eq!(hold.label, "Hold Mode");
        assert_eq!(hold.codec.encode(&ChannelValue::OnOff(true)).unwrap(), "1");
    }
}
