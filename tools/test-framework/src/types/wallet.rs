/*!
   Types for information about a chain wallet.

   Keys themselves are managed by the network bootstrap; the harness
   only refers to a wallet by its key name and its address.
*/

use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

use crate::types::amount::Amount;
use crate::types::env::{EnvWriter, ExportEnv};

/**
   Newtype wrapper for a wallet ID as identified by the chain and relayer.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

/**
   Newtype wrapper for the address a wallet corresponds to.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

/**
   A wallet that is funded in the genesis of a network.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// The key name of the wallet in the node's keyring.
    pub id: WalletId,

    /// The bech32 address of the wallet.
    pub address: WalletAddress,

    /// The amount of native tokens granted to the wallet at genesis.
    #[serde(default)]
    pub genesis_amount: Amount,
}

impl Wallet {
    pub fn new(id: &str, address: &str, genesis_amount: impl Into<Amount>) -> Self {
        Self {
            id: WalletId(id.to_string()),
            address: WalletAddress(address.to_string()),
            genesis_amount: genesis_amount.into(),
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }
}

impl WalletId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ExportEnv for Wallet {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("KEY_ID", &self.id.0);
        writer.write_env("ADDRESS", &self.address.0);
    }
}
