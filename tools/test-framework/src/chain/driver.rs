/*!
   Implementation of [`CosmosChainDriver`].
*/

use core::time::Duration;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::chain::cli::transfer::transfer_from_chain;
use crate::chain::cli::wasm::{
    execute_wasm_contract, instantiate_wasm_contract, smart_query_contract, store_wasm_contract,
};
use crate::chain::handle::{ChainHandle, WasmChainHandle};
use crate::chain::query::tx::{query_tx, TxResponse};
use crate::chain::query::{bank, block, tx, RestClient};
use crate::error::{handle_generic_error, Error};
use crate::ibc::denom::Denom;
use crate::ibc::packet::{Packet, TransferTx};
use crate::ibc::token::WalletAmount;
use crate::types::amount::Amount;
use crate::types::config::TestConfig;
use crate::types::id::{ChannelId, Height, PortId};
use crate::types::topology::ChainSpec;
use crate::types::wallet::{Wallet, WalletAddress};
use crate::util::mutex::MutexUtil;
use crate::util::process::ChildProcess;
use crate::util::retry::assert_eventually_succeed;

/**
    A driver for interacting with a Cosmos SDK full node, using the
    chain command line to sign and broadcast transactions and the REST
    API for queries.

    The node is either started externally, or launched and owned by the
    driver when [`ChainSpec::launch`] is set. In the latter case the node
    process is killed on [`shutdown`](ChainHandle::shutdown), or when the
    last clone of the driver is dropped.
*/
#[derive(Debug, Clone)]
pub struct CosmosChainDriver {
    spec: ChainSpec,

    rest: RestClient,

    node_process: Arc<Mutex<Option<ChildProcess>>>,

    poll_interval: Duration,

    max_attempts: u16,
}

impl CosmosChainDriver {
    pub fn new(spec: ChainSpec, config: &TestConfig) -> Result<Self, Error> {
        let rest = RestClient::new(&spec.rest_address)?;

        Ok(Self {
            spec,
            rest,
            node_process: Arc::new(Mutex::new(None)),
            poll_interval: config.poll_interval,
            max_attempts: config.max_readiness_attempts,
        })
    }

    /**
       Create a driver for the node described by `spec`, starting the
       node first if `spec.launch` is set, and wait until its REST API
       reports a block height.
    */
    pub fn start(spec: ChainSpec, config: &TestConfig) -> Result<Self, Error> {
        let driver = Self::new(spec, config)?;

        if driver.spec.launch {
            let home_path = driver.spec.home_path.to_string_lossy().to_string();

            let process = ChildProcess::spawn_logged(
                driver.spec.chain_id.as_str(),
                &driver.spec.command_path,
                &["start", "--home", &home_path],
                &config.chain_store_dir,
            )?;

            info!(
                "started full node for chain {} with pid {}",
                driver.spec.chain_id,
                process.id()
            );

            *driver.node_process.acquire_mutex()? = Some(process);
        }

        let height = assert_eventually_succeed(
            &format!("chain {} to serve queries", driver.spec.chain_id),
            driver.max_attempts,
            driver.poll_interval,
            || driver.query_latest_height(),
        )
        .map_err(|e| {
            Error::infrastructure(format!(
                "chain {} is not reachable at {}: {}",
                driver.spec.chain_id, driver.spec.rest_address, e
            ))
        })?;

        info!(
            "chain {} is up at height {}",
            driver.spec.chain_id, height
        );

        Ok(driver)
    }

    pub fn rest_client(&self) -> &RestClient {
        &self.rest
    }

    /**
       Wait until the transaction with `tx_hash` has been committed.
       Whether it succeeded is up to the caller to check.
    */
    pub fn wait_for_tx(&self, tx_hash: &str) -> Result<TxResponse, Error> {
        assert_eventually_succeed(
            &format!("tx {tx_hash} to be committed"),
            self.max_attempts,
            self.poll_interval,
            || query_tx(&self.rest, tx_hash),
        )
    }

    fn wait_for_tx_success(&self, broadcast: TxResponse) -> Result<TxResponse, Error> {
        if broadcast.code != 0 {
            return Err(Error::tx_failed(broadcast.txhash, broadcast.code));
        }

        let committed = self.wait_for_tx(&broadcast.txhash)?;

        if committed.code != 0 {
            return Err(Error::tx_failed(committed.txhash, committed.code));
        }

        Ok(committed)
    }

    fn transfer_submit_error(&self, response: TxResponse) -> Error {
        Error::transfer_submit(
            self.spec.chain_id.to_string(),
            response.txhash,
            response.code,
            response.raw_log,
        )
    }
}

impl ChainHandle for CosmosChainDriver {
    fn spec(&self) -> &ChainSpec {
        &self.spec
    }

    fn query_balance(&self, address: &WalletAddress, denom: &Denom) -> Result<Amount, Error> {
        bank::query_balance(&self.rest, address, denom)
    }

    fn query_latest_height(&self) -> Result<Height, Error> {
        block::query_latest_height(&self.rest)
    }

    fn send_ibc_transfer(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sender: &Wallet,
        transfer: &WalletAmount,
    ) -> Result<TransferTx, Error> {
        let broadcast = transfer_from_chain(
            &self.spec,
            sender,
            port_id,
            channel_id,
            &transfer.address,
            &transfer.token,
        )?;

        if broadcast.code != 0 {
            return Err(self.transfer_submit_error(broadcast));
        }

        let committed = self.wait_for_tx(&broadcast.txhash)?;

        if committed.code != 0 {
            return Err(self.transfer_submit_error(committed));
        }

        let packet = committed.send_packet()?;
        let height = committed.height()?;

        debug!(
            "transfer tx {} committed on chain {} at height {}: {}",
            committed.txhash, self.spec.chain_id, height, packet
        );

        Ok(TransferTx {
            tx_hash: committed.txhash,
            height,
            packet,
        })
    }

    fn query_packet_acknowledged(&self, packet: &Packet) -> Result<bool, Error> {
        tx::query_packet_acknowledged(&self.rest, packet)
    }

    fn shutdown(&self) -> Result<(), Error> {
        let process = self.node_process.acquire_mutex()?.take();

        if let Some(mut process) = process {
            info!("stopping full node of chain {}", self.spec.chain_id);
            process.kill()?;
        }

        Ok(())
    }
}

impl WasmChainHandle for CosmosChainDriver {
    fn store_wasm_code(&self, sender: &Wallet, wasm_file: &str) -> Result<u64, Error> {
        let committed =
            self.wait_for_tx_success(store_wasm_contract(&self.spec, sender, wasm_file)?)?;

        let code_id = committed
            .find_event("store_code")
            .and_then(|event| event.attribute("code_id"))
            .ok_or_else(|| {
                Error::missing_event(committed.txhash.clone(), "store_code.code_id".into())
            })?;

        code_id.parse::<u64>().map_err(handle_generic_error)
    }

    fn instantiate_contract(
        &self,
        sender: &Wallet,
        code_id: u64,
        label: &str,
        init_msg: &str,
    ) -> Result<String, Error> {
        let committed = self.wait_for_tx_success(instantiate_wasm_contract(
            &self.spec, sender, code_id, label, init_msg,
        )?)?;

        committed
            .find_event("instantiate")
            .and_then(|event| event.attribute("_contract_address"))
            .map(str::to_string)
            .ok_or_else(|| {
                Error::missing_event(
                    committed.txhash.clone(),
                    "instantiate._contract_address".into(),
                )
            })
    }

    fn execute_contract(
        &self,
        sender: &Wallet,
        contract: &str,
        msg: &str,
        fees: Option<&str>,
    ) -> Result<(), Error> {
        let broadcast = match fees {
            Some(fees) => {
                let mut spec = self.spec.clone();
                spec.fees = Some(fees.to_string());
                execute_wasm_contract(&spec, sender, contract, msg)?
            }
            None => execute_wasm_contract(&self.spec, sender, contract, msg)?,
        };

        self.wait_for_tx_success(broadcast)?;

        Ok(())
    }

    fn smart_query(&self, contract: &str, query: &str) -> Result<serde_json::Value, Error> {
        smart_query_contract(&self.spec, contract, query)
    }
}
