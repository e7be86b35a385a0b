//! Device components assembled from discovery configurations.
//!
//! Each device type lives in its own module with a typed configuration record
//! and a free `channels(&config)` function. [`Component`] ties a parsed
//! configuration to its id and built descriptors, and hands the descriptors
//! to a [`ChannelRegistry`].

pub mod climate;
pub mod cover;
pub mod fan;
pub mod vacuum;

use serde_json::Value as JsonValue;

use crate::channel::{ChannelDescriptor, ChannelRegistration, ChannelRegistry, ListenerHandle};
use crate::codec::{EnumerationCodec, ValueCodec};
use crate::config::{Availability, BaseConfig, JsonAttributes};
use crate::discovery::{ComponentType, DiscoveryMessage};
use crate::error::HassResult;

pub use climate::ClimateConfig;
pub use cover::CoverConfig;
pub use fan::FanConfig;
pub use vacuum::VacuumConfig;

/// A topic field counts as configured when present and non-empty.
pub(crate) fn configured(topic: &Option<String>) -> bool {
    topic.as_deref().is_some_and(|t| !t.is_empty())
}

/// Enumeration codec over `literals`, `None` when the set is empty.
pub(crate) fn enumeration<I, S>(channel: &'static str, literals: I) -> Option<ValueCodec>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match EnumerationCodec::new(literals) {
        Ok(codec) => Some(ValueCodec::Enumeration(codec)),
        Err(_) => {
            tracing::debug!(channel, "No literals, channel skipped");
            None
        }
    }
}

/// Typed configuration of one of the supported device types.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentConfig {
    Fan(FanConfig),
    Climate(ClimateConfig),
    Cover(CoverConfig),
    Vacuum(VacuumConfig),
}

impl ComponentConfig {
    /// Parse and validate the payload as the given component type.
    pub fn parse(component_type: ComponentType, payload: &JsonValue) -> HassResult<Self> {
        Ok(match component_type {
            ComponentType::Fan => Self::Fan(FanConfig::from_payload(payload)?),
            ComponentType::Climate => Self::Climate(ClimateConfig::from_payload(payload)?),
            ComponentType::Cover => Self::Cover(CoverConfig::from_payload(payload)?),
            ComponentType::Vacuum => Self::Vacuum(VacuumConfig::from_payload(payload)?),
        })
    }

    pub fn base(&self) -> &BaseConfig {
        match self {
            Self::Fan(c) => &c.base,
            Self::Climate(c) => &c.base,
            Self::Cover(c) => &c.base,
            Self::Vacuum(c) => &c.base,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Fan(_) => ComponentType::Fan,
            Self::Climate(_) => ComponentType::Climate,
            Self::Cover(_) => ComponentType::Cover,
            Self::Vacuum(_) => ComponentType::Vacuum,
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Fan(_) => fan::DEFAULT_NAME,
            Self::Climate(_) => climate::DEFAULT_NAME,
            Self::Cover(_) => cover::DEFAULT_NAME,
            Self::Vacuum(_) => vacuum::DEFAULT_NAME,
        }
    }

    /// Build the channel descriptors of this configuration.
    pub fn channels(&self) -> Vec<ChannelDescriptor> {
        match self {
            Self::Fan(c) => fan::channels(c),
            Self::Climate(c) => climate::channels(c),
            Self::Cover(c) => cover::channels(c),
            Self::Vacuum(c) => vacuum::channels(c),
        }
    }
}

/// A discovered device with its channels.
///
/// Immutable once built: the configuration is never modified and the
/// descriptor set is computed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: String,
    config: ComponentConfig,
    channels: Vec<ChannelDescriptor>,
}

impl Component {
    /// Build a component from a discovery message.
    pub fn from_message(message: &DiscoveryMessage) -> HassResult<Self> {
        let config = ComponentConfig::parse(message.component_type, &message.payload)?;
        let component = Self::new(message.component_id(), config);

        tracing::info!(
            id = %component.id,
            component = %component.component_type(),
            channels = component.channels.len(),
            "Component assembled"
        );
        Ok(component)
    }

    pub fn new(id: impl Into<String>, config: ComponentConfig) -> Self {
        let channels = config.channels();
        Self {
            id: id.into(),
            config,
            channels,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.config.base().display_name(self.config.default_name())
    }

    pub fn component_type(&self) -> ComponentType {
        self.config.component_type()
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&ChannelDescriptor> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn availability(&self) -> Option<Availability> {
        self.config.base().availability()
    }

    pub fn json_attributes(&self) -> Option<JsonAttributes> {
        self.config.base().json_attributes()
    }

    /// Register every channel with `registry`, in assembly order.
    ///
    /// Returns the number of registrations made.
    pub fn register(
        &self,
        registry: &mut dyn ChannelRegistry,
        listener: Option<&ListenerHandle>,
    ) -> usize {
        for descriptor in &self.channels {
            registry.register(ChannelRegistration {
                group_id: self.id.clone(),
                descriptor: descriptor.clone(),
                listener: listener.cloned(),
            });
        }
        self.channels.len()
    }
}
