use core::fmt::{self, Display};

use crate::ibc::denom::{derive_ibc_denom, Denom};
use crate::types::amount::Amount;
use crate::types::id::{ChannelId, PortId};
use crate::types::wallet::WalletAddress;

/**
   An amount of tokens of a single denomination.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub denom: Denom,
    pub amount: Amount,
}

/**
   A transfer instruction: send `token` to `address` on the counterparty
   chain.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAmount {
    pub address: WalletAddress,
    pub token: Token,
}

impl Token {
    pub fn new(denom: Denom, amount: impl Into<Amount>) -> Self {
        Self {
            denom,
            amount: amount.into(),
        }
    }

    /**
       The token as it will be represented on the counterparty chain after
       being received through the given counterparty port and channel.
    */
    pub fn transfer(&self, port_id: &PortId, channel_id: &ChannelId) -> Token {
        Token {
            denom: derive_ibc_denom(port_id, channel_id, &self.denom),
            amount: self.amount,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
