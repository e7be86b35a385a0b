//! Channel descriptors and the registry seam.
//!
//! A [`ChannelDescriptor`] is the complete wiring of one logical channel:
//! codec, optional state subscription, optional command publication and unit.
//! Descriptors are handed whole to a [`ChannelRegistry`], which is owned by
//! the channel framework that performs the actual MQTT subscription.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::codec::{ChannelValue, ValueCodec};
use crate::config::BaseConfig;

/// Where a channel receives its state from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTopic {
    pub topic: String,
    /// Template applied to incoming payloads before decoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Used when `template` is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_template: Option<String>,
}

impl StateTopic {
    /// `None` when no topic is configured.
    pub fn from_config(
        topic: Option<&str>,
        template: Option<&str>,
        fallback_template: Option<&str>,
    ) -> Option<Self> {
        let topic = non_empty(topic)?;
        Some(Self {
            topic: topic.to_string(),
            template: non_empty(template).map(str::to_string),
            fallback_template: non_empty(fallback_template).map(str::to_string),
        })
    }

    /// Template the channel framework should apply.
    pub fn effective_template(&self) -> Option<&str> {
        self.template
            .as_deref()
            .or(self.fallback_template.as_deref())
    }
}

/// Where a channel publishes commands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTopic {
    pub topic: String,
    pub retain: bool,
    pub qos: u8,
}

impl CommandTopic {
    /// `None` when no topic is configured. Retain and QoS come from the
    /// component's common configuration.
    pub fn from_config(topic: Option<&str>, base: &BaseConfig) -> Option<Self> {
        let topic = non_empty(topic)?;
        Some(Self {
            topic: topic.to_string(),
            retain: base.retain,
            qos: base.qos,
        })
    }
}

/// Wiring of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDescriptor {
    pub id: &'static str,
    pub label: String,
    pub codec: ValueCodec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateTopic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandTopic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ChannelDescriptor {
    /// Assemble a descriptor in one step.
    ///
    /// Returns `None` when neither a state nor a command topic is present;
    /// the feature is then simply absent.
    pub fn assemble(
        id: &'static str,
        label: impl Into<String>,
        codec: ValueCodec,
        state: Option<StateTopic>,
        command: Option<CommandTopic>,
        unit: Option<&str>,
    ) -> Option<Self> {
        if state.is_none() && command.is_none() {
            tracing::debug!(channel = id, "No state or command topic, channel skipped");
            return None;
        }
        Some(Self {
            id,
            label: label.into(),
            codec,
            state,
            command,
            unit: unit.map(str::to_string),
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.command.is_none()
    }

    pub fn is_write_only(&self) -> bool {
        self.state.is_none()
    }
}

/// Receives state updates for channels of a component.
///
/// Implemented by the channel framework; this crate only passes the handle
/// through at registration time.
pub trait UpdateListener: Send + Sync {
    fn update_channel(&self, group_id: &str, channel_id: &str, value: &ChannelValue);
}

/// Shared listener handle.
pub type ListenerHandle = Arc<dyn UpdateListener>;

/// A descriptor on its way into the registry.
#[derive(Clone)]
pub struct ChannelRegistration {
    /// Component the channel belongs to.
    pub group_id: String,
    pub descriptor: ChannelDescriptor,
    pub listener: Option<ListenerHandle>,
}

impl ChannelRegistration {
    /// `<group_id>#<channel_id>`
    pub fn uid(&self) -> String {
        format!("{}#{}", self.group_id, self.descriptor.id)
    }
}

impl fmt::Debug for ChannelRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRegistration")
            .field("group_id", &self.group_id)
            .field("descriptor", &self.descriptor)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// Append-only sink for channel registrations.
pub trait ChannelRegistry {
    fn register(&mut self, registration: ChannelRegistration);
}

/// In-memory registry keeping registrations in arrival order.
#[derive(Debug, Default)]
pub struct ChannelList {
    registrations: Vec<ChannelRegistration>,
}

impl ChannelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelRegistration> {
        self.registrations.iter()
    }

    /// Find a registration by its `<group_id>#<channel_id>` uid.
    pub fn get(&self, uid: &str) -> Option<&ChannelRegistration> {
        self.registrations.iter().find(|r| r.uid() == uid)
    }
}

impl ChannelRegistry for ChannelList {
    fn register(&mut self, registration: ChannelRegistration) {
        tracing::trace!(uid = %registration.uid(), "Channel registered");
        self.registrations.push(registration);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
