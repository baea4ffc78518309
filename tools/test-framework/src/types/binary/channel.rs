/*!
   Type definitions for channel connected between two chains.
*/

use serde::{Deserialize, Serialize};

use crate::types::env::{EnvWriter, ExportEnv};
use crate::types::id::{ChannelId, PortId};

/**
   A channel that is connected between two chains with the full handshake
   completed, viewed from chain A.

   The port and channel pair of each side is immutable once the relayer
   has linked the path.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedChannel {
    /**
       The port ID on chain A, corresponding to the channel connected
       to chain B.
    */
    pub port_a: PortId,

    /**
       The channel ID on chain A, corresponding to the channel connected
       to chain B.
    */
    pub channel_id_a: ChannelId,

    /**
       The port ID on chain B, corresponding to the channel connected
       to chain A.
    */
    pub port_b: PortId,

    /**
       The channel ID on chain B, corresponding to the channel connected
       to chain A.
    */
    pub channel_id_b: ChannelId,
}

impl ConnectedChannel {
    /**
       Flip the position between chain A and chain B, so that the
       counterparty side becomes the sending side.
    */
    pub fn flip(self) -> ConnectedChannel {
        ConnectedChannel {
            port_a: self.port_b,
            channel_id_a: self.channel_id_b,
            port_b: self.port_a,
            channel_id_b: self.channel_id_a,
        }
    }
}

impl ExportEnv for ConnectedChannel {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("CHANNEL_ID_A", self.channel_id_a.as_str());
        writer.write_env("PORT_A", self.port_a.as_str());
        writer.write_env("CHANNEL_ID_B", self.channel_id_b.as_str());
        writer.write_env("PORT_B", self.port_b.as_str());
    }
}
