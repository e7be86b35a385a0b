//! Component Assembly Tests
//!
//! End-to-end checks from discovery topic + payload to registered channels:
//! - Minimal configurations build only the always-present channels
//! - Either topic of a gated feature is enough
//! - Codec behaviour on assembled channels
//! - Registration order, idempotence and listener pass-through

use std::sync::{Arc, Mutex};

use neomind_hass_mqtt::components::{climate, cover, fan, vacuum};
use neomind_hass_mqtt::{
    parse_discovery_message, ChannelList, ChannelValue, Component, ComponentType,
    DiscoverySettings, ListenerHandle, UpdateListener, ValueCodec,
};
use serde_json::{json, Value as JsonValue};

fn component(component_type: ComponentType, payload: JsonValue) -> Component {
    let topic = format!("homeassistant/{}/test_device/config", component_type);
    let bytes = serde_json::to_vec(&payload).unwrap();
    let msg = parse_discovery_message(&DiscoverySettings::default(), &topic, &bytes).unwrap();
    Component::from_message(&msg).unwrap()
}

fn ids(component: &Component) -> Vec<&'static str> {
    component.channels().iter().map(|c| c.id).collect()
}

fn literals(component: &Component, id: &str) -> Vec<String> {
    match &component.channel(id).unwrap().codec {
        ValueCodec::Enumeration(codec) => codec.literals().to_vec(),
        other => panic!("unexpected codec {:?}", other),
    }
}

#[test]
fn test_minimal_configurations() {
    let fan = component(ComponentType::Fan, json!({ "command_topic": "fan/set" }));
    assert_eq!(ids(&fan), vec![fan::STATE_CHANNEL_ID]);

    for component_type in [ComponentType::Climate, ComponentType::Cover, ComponentType::Vacuum] {
        let c = component(component_type, json!({}));
        assert!(c.channels().is_empty(), "{} should have no channels", component_type);
    }
}

#[test]
fn test_either_topic_enables_gated_features() {
    let gates: Vec<(ComponentType, JsonValue, &str, &str, &str)> = vec![
        (
            ComponentType::Fan,
            json!({ "command_topic": "fan/set" }),
            "speed_state_topic",
            "speed_command_topic",
            fan::SPEED_CHANNEL_ID,
        ),
        (
            ComponentType::Climate,
            json!({}),
            "mode_state_topic",
            "mode_command_topic",
            climate::MODE_CHANNEL_ID,
        ),
        (
            ComponentType::Climate,
            json!({}),
            "temperature_state_topic",
            "temperature_command_topic",
            climate::TEMPERATURE_CHANNEL_ID,
        ),
        (
            ComponentType::Climate,
            json!({}),
            "swing_mode_state_topic",
            "swing_mode_command_topic",
            climate::SWING_MODE_CHANNEL_ID,
        ),
        (
            ComponentType::Cover,
            json!({}),
            "position_topic",
            "set_position_topic",
            cover::POSITION_CHANNEL_ID,
        ),
        (
            ComponentType::Cover,
            json!({}),
            "tilt_status_topic",
            "tilt_command_topic",
            cover::TILT_CHANNEL_ID,
        ),
        (
            ComponentType::Vacuum,
            json!({ "fan_speed_list": ["quiet", "turbo"] }),
            "fan_speed_topic",
            "set_fan_speed_topic",
            vacuum::FAN_SPEED_CHANNEL_ID,
        ),
    ];

    for (component_type, base, state_field, command_field, channel_id) in gates {
        for field in [state_field, command_field] {
            let mut payload = base.clone();
            payload[field] = json!("some/topic");
            let c = component(component_type, payload);
            assert!(
                c.channel(channel_id).is_some(),
                "{} alone should enable {}#{}",
                field,
                component_type,
                channel_id
            );
        }
    }
}

#[test]
fn test_binary_codec_round_trip() {
    let default = component(ComponentType::Fan, json!({ "command_topic": "fan/set" }));
    let custom = component(
        ComponentType::Fan,
        json!({ "command_topic": "fan/set", "payload_on": "1", "payload_off": "0" }),
    );

    for c in [default, custom] {
        let codec = &c.channel(fan::STATE_CHANNEL_ID).unwrap().codec;
        for value in [true, false] {
            let raw = codec.encode(&ChannelValue::OnOff(value)).unwrap();
            assert_eq!(codec.decode(&raw).unwrap(), ChannelValue::OnOff(value));
        }
    }
}

#[test]
fn test_fan_speed_fallback_set() {
    let c = component(
        ComponentType::Fan,
        json!({ "command_topic": "fan/set", "speed_command_topic": "fan/speed/set" }),
    );

    assert_eq!(literals(&c, fan::SPEED_CHANNEL_ID), vec!["off", "low", "medium", "high"]);
    let codec = &c.channel(fan::SPEED_CHANNEL_ID).unwrap().codec;
    assert!(codec.decode("turbo").is_err());
    assert!(codec.decode("Low").is_err());
}

#[test]
fn test_tilt_invert_literals() {
    for (invert, open, closed) in [(false, 100.0, 0.0), (true, 0.0, 100.0)] {
        let c = component(
            ComponentType::Cover,
            json!({
                "tilt_command_topic": "blind/tilt/set",
                "tilt_opened_value": 80,
                "tilt_closed_value": 20,
                "tilt_invert_state": invert
            }),
        );
        let codec = &c.channel(cover::TILT_CHANNEL_ID).unwrap().codec;
        assert_eq!(codec.decode("80").unwrap(), ChannelValue::Percent(open));
        assert_eq!(codec.decode("20").unwrap(), ChannelValue::Percent(closed));
    }
}

#[test]
fn test_cover_position_excludes_state() {
    let c = component(
        ComponentType::Cover,
        json!({ "state_topic": "blind/state", "position_topic": "blind/position" }),
    );

    assert_eq!(ids(&c), vec![cover::POSITION_CHANNEL_ID]);
    assert!(c.channel(cover::COVER_CHANNEL_ID).is_none());
}

#[test]
fn test_vacuum_bogus_feature() {
    let c = component(
        ComponentType::Vacuum,
        json!({
            "command_topic": "robo/cmd",
            "supported_features": ["turn_on", "bogus_feature"]
        }),
    );

    assert_eq!(literals(&c, vacuum::COMMAND_CHANNEL_ID), vec!["turn_on"]);
}

#[test]
fn test_climate_modes() {
    let default = component(ComponentType::Climate, json!({ "mode_state_topic": "hvac/mode" }));
    assert_eq!(
        literals(&default, climate::MODE_CHANNEL_ID),
        vec!["auto", "off", "cool", "heat", "dry", "fan_only"]
    );

    let custom = component(
        ComponentType::Climate,
        json!({ "mode_state_topic": "hvac/mode", "modes": ["off", "heat"] }),
    );
    assert_eq!(literals(&custom, climate::MODE_CHANNEL_ID), vec!["off", "heat"]);
}

#[test]
fn test_assembly_is_idempotent() {
    let payload = json!({
        "name": "Living Room",
        "current_temperature_topic": "hvac/current",
        "mode_command_topic": "hvac/mode/set",
        "fan_mode_state_topic": "hvac/fan",
        "swing_mode_state_topic": "hvac/swing",
        "aux_command_topic": "hvac/aux/set"
    });

    let first = component(ComponentType::Climate, payload.clone());
    let second = component(ComponentType::Climate, payload);
    assert_eq!(first.channels(), second.channels());
    assert_eq!(first.config().channels(), first.channels());
}

#[derive(Default)]
struct RecordingListener {
    updates: Mutex<Vec<(String, String)>>,
}

impl UpdateListener for RecordingListener {
    fn update_channel(&self, group_id: &str, channel_id: &str, _value: &ChannelValue) {
        self.updates
            .lock()
            .unwrap()
            .push((group_id.to_string(), channel_id.to_string()));
    }
}

#[test]
fn test_registration_passes_listener() {
    let c = component(
        ComponentType::Vacuum,
        json!({
            "unique_id": "robo_1",
            "command_topic": "robo/cmd",
            "battery_level_topic": "robo/battery",
            "send_command_topic": "robo/send"
        }),
    );

    let recorder = Arc::new(RecordingListener::default());
    let listener: ListenerHandle = recorder.clone();
    let mut registry = ChannelList::new();

    assert_eq!(c.register(&mut registry, Some(&listener)), 3);
    assert_eq!(registry.len(), 3);
    assert!(registry.get("robo_1#battery").is_some());

    for registration in registry.iter() {
        let handle = registration.listener.as_ref().unwrap();
        assert!(Arc::ptr_eq(handle, &listener));
    }

    let battery = registry.get("robo_1#battery").unwrap();
    let value = battery.descriptor.codec.decode("55").unwrap();
    battery
        .listener
        .as_ref()
        .unwrap()
        .update_channel(&battery.group_id, battery.descriptor.id, &value);
    assert_eq!(
        recorder.updates.lock().unwrap().as_slice(),
        &[("robo_1".to_string(), "battery".to_string())]
    );
}

#[test]
fn test_registration_is_append_only() {
    let fan = component(ComponentType::Fan, json!({ "command_topic": "fan/set" }));
    let cover = component(ComponentType::Cover, json!({ "command_topic": "garage/set" }));

    let mut registry = ChannelList::new();
    fan.register(&mut registry, None);
    cover.register(&mut registry, None);
    fan.register(&mut registry, None);

    let uids: Vec<String> = registry.iter().map(|r| r.uid()).collect();
    assert_eq!(
        uids,
        vec!["test_device#state", "test_device#cover", "test_device#state"]
    );
}
