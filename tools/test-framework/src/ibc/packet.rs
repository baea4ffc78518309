/*!
   Packets sent by ICS-20 token transfers.
*/

use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

use crate::types::amount::Amount;
use crate::types::id::{ChannelId, Height, PortId, Sequence};

/**
   The payload of an ICS-20 transfer packet.

   `denom` carries the full denom trace on the sending chain, e.g.
   `transfer/channel-0/aseda` when a voucher is sent back to its origin.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenPacketData {
    pub denom: String,

    pub amount: Amount,

    pub sender: String,

    pub receiver: String,

    #[serde(default)]
    pub memo: String,
}

/**
   An in-flight transfer packet.

   A packet is identified by its source port, source channel and sequence.
   Once the source chain has processed the acknowledgment the packet is
   terminal and is never mutated again.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub sequence: Sequence,

    pub source_port: PortId,

    pub source_channel: ChannelId,

    pub destination_port: PortId,

    pub destination_channel: ChannelId,

    pub data: FungibleTokenPacketData,
}

/**
   The outcome of submitting a transfer transaction.
*/
#[derive(Debug, Clone)]
pub struct TransferTx {
    pub tx_hash: String,

    /// The height at which the transaction was committed.
    pub height: Height,

    pub packet: Packet,
}

impl Packet {
    pub fn key(&self) -> (PortId, ChannelId, Sequence) {
        (
            self.source_port.clone(),
            self.source_channel.clone(),
            self.sequence,
        )
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Packet {{ sequence: {}, source: {}/{}, destination: {}/{}, amount: {}{} }}",
            self.sequence,
            self.source_port,
            self.source_channel,
            self.destination_port,
            self.destination_channel,
            self.data.amount,
            self.data.denom,
        )
    }
}
