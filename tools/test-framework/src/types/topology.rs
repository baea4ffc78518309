/*!
   Declarative description of the networks, the relayer and the links
   that make up a test topology.

   A [`TopologySpec`] can be built in code or loaded from a TOML file:

   ```toml
   [[chains]]
   name = "seda"
   chain_id = "seda-1"
   denom = "aseda"
   command_path = "sedad"
   home_path = "/tmp/seda"
   rest_address = "http://localhost:1317"
   rpc_address = "tcp://localhost:26657"

   [[chains.wallets]]
   id = "user"
   address = "seda1..."
   genesis_amount = "2000000000000"

   [relayer]
   command_path = "rly"
   home_path = "/tmp/rly"

   [[links]]
   chain_a = "seda"
   chain_b = "gaia"
   path = "ibc-path"
   ```
*/

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::types::env::{prefix_writer, EnvWriter, ExportEnv};
use crate::types::id::{ChainId, PortId};
use crate::types::wallet::Wallet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    pub chains: Vec<ChainSpec>,

    #[serde(default)]
    pub relayer: RelayerSpec,

    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

/**
   Description of a single network.

   Only `name`, `chain_id`, `denom` and `wallets` are relevant to the mock
   backend. The remaining fields describe how to reach a live node.
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSpec {
    /// The name the relayer knows the chain by.
    pub name: String,

    pub chain_id: ChainId,

    /// The native denomination, e.g. `aseda`.
    pub denom: String,

    #[serde(default = "default_account_prefix")]
    pub account_prefix: String,

    /// Wallets funded at genesis. The first wallet is the test user.
    #[serde(default)]
    pub wallets: Vec<Wallet>,

    /// The key the relayer signs with on this chain.
    #[serde(default = "default_relayer_key")]
    pub relayer_key: String,

    #[serde(default)]
    pub command_path: String,

    #[serde(default)]
    pub home_path: PathBuf,

    #[serde(default = "default_rpc_address")]
    pub rpc_address: String,

    #[serde(default = "default_rest_address")]
    pub rest_address: String,

    /// Gas prices passed to the relayer, e.g. `0aseda`.
    #[serde(default)]
    pub gas_prices: Option<String>,

    /// Fees attached to transactions submitted by the harness.
    #[serde(default)]
    pub fees: Option<String>,

    /// Start the node from `home_path` instead of connecting to a node that
    /// is already running.
    #[serde(default)]
    pub launch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayerSpec {
    #[serde(default = "default_relayer_command")]
    pub command_path: String,

    #[serde(default)]
    pub home_path: PathBuf,

    /// Extra flags passed to `start`.
    #[serde(default = "default_startup_flags")]
    pub startup_flags: Vec<String>,
}

/**
   A path to be linked by the relayer between two chains, referred to by
   their [`ChainSpec::name`].
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub chain_a: String,

    pub chain_b: String,

    pub path: String,

    #[serde(default)]
    pub port: PortId,
}

impl TopologySpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let spec = toml::from_str(&content)?;
        Ok(spec)
    }

    pub fn chain(&self, name: &str) -> Option<&ChainSpec> {
        self.chains.iter().find(|chain| chain.name == name)
    }
}

impl ChainSpec {
    /**
       A chain specification that only carries the essentials. Mostly
       useful for the mock backend.
    */
    pub fn new(name: &str, chain_id: &str, denom: &str) -> Self {
        Self {
            name: name.to_string(),
            chain_id: ChainId::new(chain_id),
            denom: denom.to_string(),
            account_prefix: default_account_prefix(),
            wallets: Vec::new(),
            relayer_key: default_relayer_key(),
            command_path: String::new(),
            home_path: PathBuf::new(),
            rpc_address: default_rpc_address(),
            rest_address: default_rest_address(),
            gas_prices: None,
            fees: None,
            launch: false,
        }
    }

    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallets.push(wallet);
        self
    }

    pub fn native_denom(&self) -> Denom {
        Denom::base(&self.denom)
    }

    pub fn gas_prices(&self) -> String {
        self.gas_prices
            .clone()
            .unwrap_or_else(|| format!("0{}", self.denom))
    }
}

impl Default for RelayerSpec {
    fn default() -> Self {
        Self {
            command_path: default_relayer_command(),
            home_path: PathBuf::new(),
            startup_flags: default_startup_flags(),
        }
    }
}

impl LinkSpec {
    pub fn new(chain_a: &str, chain_b: &str, path: &str) -> Self {
        Self {
            chain_a: chain_a.to_string(),
            chain_b: chain_b.to_string(),
            path: path.to_string(),
            port: PortId::transfer(),
        }
    }
}

impl ExportEnv for ChainSpec {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("CHAIN_ID", self.chain_id.as_str());
        writer.write_env("DENOM", &self.denom);
        writer.write_env("CMD", &self.command_path);
        writer.write_env("HOME", &format!("{}", self.home_path.display()));
        writer.write_env("RPC_ADDR", &self.rpc_address);
        writer.write_env("REST_ADDR", &self.rest_address);

        for (i, wallet) in self.wallets.iter().enumerate() {
            wallet.export_env(&mut prefix_writer(&format!("WALLET_{i}"), writer));
        }
    }
}

fn default_account_prefix() -> String {
    "cosmos".to_string()
}

fn default_relayer_key() -> String {
    "relayer".to_string()
}

fn default_rpc_address() -> String {
    "tcp://localhost:26657".to_string()
}

fn default_rest_address() -> String {
    "http://localhost:1317".to_string()
}

fn default_relayer_command() -> String {
    "rly".to_string()
}

fn default_startup_flags() -> Vec<String> {
    vec![
        "--processor".to_string(),
        "events".to_string(),
        "--block-history".to_string(),
        "100".to_string(),
    ]
}
