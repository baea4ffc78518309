/*!
   The capability surface of a running network that the conformance
   tests rely on.
*/

use serde_json::Value as JsonValue;

use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::ibc::packet::{Packet, TransferTx};
use crate::ibc::token::WalletAmount;
use crate::types::amount::Amount;
use crate::types::id::{ChainId, ChannelId, Height, PortId};
use crate::types::topology::ChainSpec;
use crate::types::wallet::{Wallet, WalletAddress};

/**
   A handle to a single running network.

   Implementations are cheap to clone and can be shared between the test
   and the topology that owns the network. All methods are blocking.
*/
pub trait ChainHandle: Clone + Send + Sync + 'static {
    /// The specification the network was created from.
    fn spec(&self) -> &ChainSpec;

    fn chain_id(&self) -> &ChainId {
        &self.spec().chain_id
    }

    fn native_denom(&self) -> Denom {
        self.spec().native_denom()
    }

    /// Query the balance of `address` in the given denomination.
    fn query_balance(&self, address: &WalletAddress, denom: &Denom) -> Result<Amount, Error>;

    fn query_latest_height(&self) -> Result<Height, Error>;

    /**
       Submit an ICS-20 transfer from `sender` through the given port and
       channel, and wait until the transaction is committed.

       Fails with [`TransferSubmit`](crate::error::ErrorDetail::TransferSubmit)
       if the network rejects the transaction.
    */
    fn send_ibc_transfer(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sender: &Wallet,
        transfer: &WalletAmount,
    ) -> Result<TransferTx, Error>;

    /**
       Whether the acknowledgment of a packet sent from this network has
       been processed by this network.
    */
    fn query_packet_acknowledged(&self, packet: &Packet) -> Result<bool, Error>;

    /// Stop the network if it is owned by the test.
    fn shutdown(&self) -> Result<(), Error>;
}

/**
   Networks that host a CosmWasm runtime.
*/
pub trait WasmChainHandle: ChainHandle {
    /// Upload contract code and return its code ID.
    fn store_wasm_code(&self, sender: &Wallet, wasm_file: &str) -> Result<u64, Error>;

    /// Instantiate a contract and return its address.
    fn instantiate_contract(
        &self,
        sender: &Wallet,
        code_id: u64,
        label: &str,
        init_msg: &str,
    ) -> Result<String, Error>;

    fn execute_contract(
        &self,
        sender: &Wallet,
        contract: &str,
        msg: &str,
        fees: Option<&str>,
    ) -> Result<(), Error>;

    fn smart_query(&self, contract: &str, query: &str) -> Result<JsonValue, Error>;
}
