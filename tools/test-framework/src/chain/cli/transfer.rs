/*!
   Methods for performing IBC token transfer on a chain.
*/

use super::broadcast_tx;
use crate::chain::query::tx::TxResponse;
use crate::error::Error;
use crate::ibc::token::Token;
use crate::types::id::{ChannelId, PortId};
use crate::types::topology::ChainSpec;
use crate::types::wallet::{Wallet, WalletAddress};

/**
   Broadcast an ICS-20 `MsgTransfer` of `token` from `sender` to
   `recipient` on the counterparty chain.

   `token` must carry the denomination as known to the bank module of
   the sending chain, i.e. the hashed `ibc/...` form for vouchers.
*/
pub fn transfer_from_chain(
    spec: &ChainSpec,
    sender: &Wallet,
    port_id: &PortId,
    channel_id: &ChannelId,
    recipient: &WalletAddress,
    token: &Token,
) -> Result<TxResponse, Error> {
    let amount = format!("{}{}", token.amount, token.denom.as_str());

    broadcast_tx(
        spec,
        sender.id.as_str(),
        &[
            "ibc-transfer",
            "transfer",
            port_id.as_str(),
            channel_id.as_str(),
            recipient.as_str(),
            &amount,
        ],
    )
}
