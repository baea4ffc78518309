/*!
   Transaction queries by hash and by event.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RestClient;
use crate::error::{handle_generic_error, Error};
use crate::ibc::packet::{FungibleTokenPacketData, Packet};
use crate::types::id::{ChannelId, Height, PortId, Sequence};

#[derive(Debug, Clone, Deserialize)]
pub struct GetTxResponse {
    pub tx_response: TxResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTxsResponse {
    #[serde(default)]
    pub tx_responses: Vec<TxResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResponse {
    pub txhash: String,

    pub code: u32,

    #[serde(default)]
    pub height: String,

    #[serde(default)]
    pub raw_log: String,

    #[serde(default)]
    pub events: Vec<TxEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,

    #[serde(default)]
    pub value: String,
}

impl TxResponse {
    pub fn height(&self) -> Result<Height, Error> {
        let height = self
            .height
            .parse::<u64>()
            .map_err(handle_generic_error)?;

        Ok(Height(height))
    }

    pub fn find_event(&self, kind: &str) -> Option<&TxEvent> {
        self.events.iter().find(|event| event.kind == kind)
    }

    /**
       Extract the packet committed by the `send_packet` event of a
       transfer transaction.
    */
    pub fn send_packet(&self) -> Result<Packet, Error> {
        let event = self
            .find_event("send_packet")
            .ok_or_else(|| Error::missing_event(self.txhash.clone(), "send_packet".into()))?;

        let attribute = |key| event.required_attribute(&self.txhash, key);

        let sequence = attribute("packet_sequence")?
            .parse::<u64>()
            .map_err(handle_generic_error)?;

        let data: FungibleTokenPacketData = serde_json::from_str(attribute("packet_data")?)
            .map_err(handle_generic_error)?;

        Ok(Packet {
            sequence: Sequence(sequence),
            source_port: PortId::new(attribute("packet_src_port")?),
            source_channel: ChannelId(attribute("packet_src_channel")?.to_string()),
            destination_port: PortId::new(attribute("packet_dst_port")?),
            destination_channel: ChannelId(attribute("packet_dst_channel")?.to_string()),
            data,
        })
    }
}

impl TxEvent {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| attribute.value.as_str())
    }

    fn required_attribute<'a>(&'a self, tx_hash: &str, key: &str) -> Result<&'a str, Error> {
        self.attribute(key).ok_or_else(|| {
            Error::missing_event(tx_hash.to_string(), format!("{}.{}", self.kind, key))
        })
    }
}

/**
   Query a transaction by its hash.

   A transaction that is not yet included in a block is reported by the
   node with a non-200 status, and so surfaces as a query error.
*/
pub fn query_tx(client: &RestClient, tx_hash: &str) -> Result<TxResponse, Error> {
    let response: GetTxResponse =
        client.get_json(&format!("/cosmos/tx/v1beta1/txs/{tx_hash}"), &[])?;

    Ok(response.tx_response)
}

/**
   Query a transaction by its hash, failing if the transaction was
   executed with a non-zero status code.
*/
pub fn query_tx_success(client: &RestClient, tx_hash: &str) -> Result<TxResponse, Error> {
    let response = query_tx(client, tx_hash)?;

    if response.code != 0 {
        return Err(Error::tx_failed(response.txhash, response.code));
    }

    Ok(response)
}

pub fn search_txs(client: &RestClient, events: &[String]) -> Result<Vec<TxResponse>, Error> {
    let query = events.join(" AND ");

    let response: SearchTxsResponse =
        client.get_json("/cosmos/tx/v1beta1/txs", &[("query", &query)])?;

    Ok(response.tx_responses)
}

/**
   Whether the source chain of `packet` has committed a transaction that
   processed its acknowledgment.
*/
pub fn query_packet_acknowledged(client: &RestClient, packet: &Packet) -> Result<bool, Error> {
    let events = [
        format!(
            "acknowledge_packet.packet_src_channel='{}'",
            packet.source_channel
        ),
        format!(
            "acknowledge_packet.packet_sequence='{}'",
            packet.sequence
        ),
    ];

    let responses = search_txs(client, &events)?;

    debug!(
        "found {} acknowledgment transactions for packet {}",
        responses.len(),
        packet
    );

    Ok(responses.iter().any(|response| response.code == 0))
}
