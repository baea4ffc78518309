/*!
   Identifier types for chains, ports, channels, packets and heights.
*/

use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/**
   The identifier of a network, e.g. `seda-1` or `gaia-1`.
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub String);

/**
   An IBC port identifier. ICS-20 transfers are bound to the
   [`transfer`](PortId::transfer) port.
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub String);

/**
   An IBC channel identifier in the form of `channel-<n>`.
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

/**
   The sequence number of a packet, unique and monotonically increasing
   per source port and channel.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(pub u64);

/**
   A block height on a single network.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Height(pub u64);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The port that the ICS-20 token transfer application is bound to.
    pub fn transfer() -> Self {
        Self("transfer".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::transfer()
    }
}

impl ChannelId {
    pub fn new(counter: u64) -> Self {
        Self(format!("channel-{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Sequence {
    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Height {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn increment(&self) -> Self {
        self.add(1)
    }

    pub fn add(&self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
