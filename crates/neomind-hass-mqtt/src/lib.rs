//! Home Assistant MQTT Discovery Components
//!
//! This crate turns Home Assistant discovery configurations into typed,
//! topic-addressed channels for the NeoMind device layer.
//!
//! ## Supported Components
//!
//! | Component | Channels |
//! |-----------|----------|
//! | `fan` | state, oscillation, speed |
//! | `climate` | current, power, mode, temperature, fan, swing, away, hold, aux |
//! | `cover` | position or cover, tilt |
//! | `vacuum` | command, battery, charging, cleaning, docked, error, fan, extra |
//!
//! ## Architecture
//!
//! - **DiscoveryMessage**: topic + JSON payload from `<prefix>/<component>/.../config`
//! - **ComponentConfig**: typed, validated configuration per device type
//! - **ChannelDescriptor**: codec, state topic, command topic and unit of one channel
//! - **ChannelRegistry**: external sink the descriptors are registered with
//!
//! Assembly is synchronous and performs no I/O. MQTT transport and template
//! evaluation belong to the channel framework behind [`ChannelRegistry`].
//!
//! ## Example
//!
//! ```
//! use neomind_hass_mqtt::{parse_discovery_message, ChannelList, Component, DiscoverySettings};
//!
//! let msg = parse_discovery_message(
//!     &DiscoverySettings::default(),
//!     "homeassistant/fan/bedroom/config",
//!     br#"{ "command_topic": "bedroom/fan/set", "speed_state_topic": "bedroom/fan/speed" }"#,
//! )?;
//! let component = Component::from_message(&msg)?;
//!
//! let mut registry = ChannelList::new();
//! component.register(&mut registry, None);
//! assert!(registry.get("bedroom#speed").is_some());
//! # Ok::<(), neomind_hass_mqtt::HassError>(())
//! ```

pub mod channel;
pub mod codec;
pub mod components;
pub mod config;
pub mod discovery;
pub mod error;

pub use channel::{
    ChannelDescriptor, ChannelList, ChannelRegistration, ChannelRegistry, CommandTopic,
    ListenerHandle, StateTopic, UpdateListener,
};
pub use codec::{
    ChannelValue, CoverAction, EnumerationCodec, NumberCodec, OnOffCodec, PercentageCodec,
    RollershutterCodec, ValueCodec,
};
pub use components::{
    ClimateConfig, Component, ComponentConfig, CoverConfig, FanConfig, VacuumConfig,
};
pub use config::{Availability, BaseConfig, DeviceInfo, JsonAttributes};
pub use discovery::{
    parse_discovery_message, ComponentType, DiscoveryMessage, DiscoverySettings, TopicParts,
    DEFAULT_DISCOVERY_PREFIX,
};
pub use error::{HassError, HassResult, ValueError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
