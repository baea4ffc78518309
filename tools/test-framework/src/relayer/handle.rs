/*!
   The capability surface of the relaying process.
*/

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::id::{ChainId, ChannelId, PortId};
use crate::types::topology::{ChainSpec, LinkSpec};

pub const STATE_OPEN: &str = "STATE_OPEN";

/**
   A handle to the relayer serving a topology.

   The relayer runs independently of the test once started. Its effects
   are only observed through the state of the chains it relays between.
*/
pub trait RelayerHandle: Send + Sync + 'static {
    /// Make a network known to the relayer.
    fn add_chain(&self, chain: &ChainSpec) -> Result<(), Error>;

    /**
       Create the path named by `link` between two registered networks,
       and complete the client, connection and channel handshakes on it.
    */
    fn link_path(&self, link: &LinkSpec, chain_a: &ChainSpec, chain_b: &ChainSpec)
        -> Result<(), Error>;

    /**
       Start relaying packets on `path` in the background. Starting a
       path that is already being relayed has no effect.
    */
    fn start(&self, path: &str) -> Result<(), Error>;

    /// Stop all background relaying.
    fn stop(&self) -> Result<(), Error>;

    fn is_running(&self) -> bool;

    /// All channel ends known on the given network.
    fn query_channels(&self, chain_id: &ChainId) -> Result<Vec<IdentifiedChannel>, Error>;

    /**
       The open transfer channel linking `src` to `dst`, viewed from
       `src`.
    */
    fn get_transfer_channel(&self, src: &ChainId, dst: &ChainId)
        -> Result<ConnectedChannel, Error>;
}

/**
   A channel end as reported by the relayer.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedChannel {
    pub state: String,

    #[serde(default)]
    pub ordering: String,

    pub counterparty: ChannelCounterparty,

    #[serde(default)]
    pub connection_hops: Vec<String>,

    #[serde(default)]
    pub version: String,

    pub port_id: PortId,

    pub channel_id: ChannelId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCounterparty {
    pub port_id: PortId,

    #[serde(default)]
    pub channel_id: Option<ChannelId>,
}

impl IdentifiedChannel {
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    /**
       The connected channel this end belongs to, if the handshake has
       completed.
    */
    pub fn connected_channel(&self) -> Option<ConnectedChannel> {
        if !self.is_open() {
            return None;
        }

        let channel_id_b = self.counterparty.channel_id.clone()?;

        Some(ConnectedChannel {
            port_a: self.port_id.clone(),
            channel_id_a: self.channel_id.clone(),
            port_b: self.counterparty.port_id.clone(),
            channel_id_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_channel_is_connected() {
        let channel: IdentifiedChannel = serde_json::from_str(
            r#"{"state":"STATE_OPEN","ordering":"ORDER_UNORDERED","counterparty":{"port_id":"transfer","channel_id":"channel-4"},"connection_hops":["connection-0"],"version":"ics20-1","port_id":"transfer","channel_id":"channel-0"}"#,
        )
        .unwrap();

        let connected = channel.connected_channel().unwrap();

        assert_eq!(connected.channel_id_a, ChannelId::new(0));
        assert_eq!(connected.channel_id_b, ChannelId::new(4));
        assert_eq!(connected.port_b, PortId::transfer());
    }

    #[test]
    fn pending_channel_is_not_connected() {
        let channel: IdentifiedChannel = serde_json::from_str(
            r#"{"state":"STATE_INIT","counterparty":{"port_id":"transfer","channel_id":""},"port_id":"transfer","channel_id":"channel-1"}"#,
        )
        .unwrap();

        assert!(channel.connected_channel().is_none());
    }
}
