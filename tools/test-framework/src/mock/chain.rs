/*!
   An in-process chain that produces blocks at a fixed interval.
*/

use core::time::Duration;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;
use tracing::{debug, info, warn};

use crate::chain::handle::{ChainHandle, WasmChainHandle};
use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::ibc::packet::{Packet, TransferTx};
use crate::ibc::token::WalletAmount;
use crate::mock::state::{Acknowledgement, MockChainState};
use crate::mock::wasm::MockWasmState;
use crate::relayer::handle::{ChannelCounterparty, IdentifiedChannel, STATE_OPEN};
use crate::types::amount::Amount;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::id::{ChainId, ChannelId, Height, PortId};
use crate::types::topology::ChainSpec;
use crate::types::wallet::{Wallet, WalletAddress};
use crate::util::mutex::MutexUtil;

pub const DEFAULT_BLOCK_TIME: Duration = Duration::from_millis(20);

/**
   A mock chain. Clones share the same state.

   Block production runs on a background thread until
   [`shutdown`](ChainHandle::shutdown) is called. A stopped chain
   rejects every query and transaction.
*/
#[derive(Clone)]
pub struct MockChain {
    inner: Arc<MockChainInner>,
}

struct MockChainInner {
    spec: ChainSpec,
    state: Mutex<MockChainState>,
    wasm: Mutex<MockWasmState>,
    block_producer: Mutex<Option<BlockProducer>>,
}

struct BlockProducer {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl MockChain {
    pub fn start(spec: ChainSpec, block_time: Duration) -> Self {
        let inner = Arc::new(MockChainInner {
            state: Mutex::new(MockChainState::genesis(&spec)),
            wasm: Mutex::new(MockWasmState::default()),
            block_producer: Mutex::new(None),
            spec,
        });

        let (stop, stop_receiver) = bounded::<()>(1);
        let producer_inner = Arc::downgrade(&inner);

        let handle = thread::spawn(move || loop {
            match stop_receiver.recv_timeout(block_time) {
                Err(RecvTimeoutError::Timeout) => {
                    let Some(inner) = producer_inner.upgrade() else {
                        break;
                    };

                    match inner.state.acquire_mutex() {
                        Ok(mut state) => state.height = state.height.increment(),
                        Err(_) => break,
                    };
                }
                _ => break,
            }
        });

        if let Ok(mut producer) = inner.block_producer.lock() {
            *producer = Some(BlockProducer { stop, handle });
        }

        info!(
            "started mock chain {} producing a block every {:?}",
            inner.spec.chain_id, block_time
        );

        Self { inner }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .block_producer
            .lock()
            .map(|producer| producer.is_some())
            .unwrap_or(false)
    }

    /**
       Lock the state of a running chain.
    */
    fn state(&self) -> Result<MutexGuard<'_, MockChainState>, Error> {
        if !self.is_running() {
            return Err(Error::infrastructure(format!(
                "mock chain {} is not running",
                self.chain_id()
            )));
        }

        self.inner.state.acquire_mutex()
    }

    fn tx_hash(&self, number: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}/{}", self.chain_id(), number).as_bytes());

        String::from_utf8_lossy(&hex::encode_upper(hasher.finalize())).into_owned()
    }

    pub fn init_channel(
        &self,
        port_id: &PortId,
        counterparty_chain_id: &ChainId,
        counterparty_port: &PortId,
    ) -> Result<ChannelId, Error> {
        Ok(self
            .state()?
            .init_channel(port_id, counterparty_chain_id, counterparty_port))
    }

    pub fn open_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_channel: &ChannelId,
    ) -> Result<(), Error> {
        self.state()?
            .open_channel(port_id, channel_id, counterparty_channel)
    }

    pub fn open_channel_to(
        &self,
        port_id: &PortId,
        counterparty_chain_id: &ChainId,
    ) -> Result<Option<ConnectedChannel>, Error> {
        Ok(self.state()?.open_channel_to(port_id, counterparty_chain_id))
    }

    pub fn query_channels(&self) -> Result<Vec<IdentifiedChannel>, Error> {
        Ok(self
            .state()?
            .channels()
            .map(|((port_id, channel_id), end)| IdentifiedChannel {
                state: if end.open {
                    STATE_OPEN.to_string()
                } else {
                    "STATE_INIT".to_string()
                },
                ordering: "ORDER_UNORDERED".to_string(),
                counterparty: ChannelCounterparty {
                    port_id: end.counterparty_port.clone(),
                    channel_id: end.counterparty_channel.clone(),
                },
                connection_hops: vec!["connection-0".to_string()],
                version: "ics20-1".to_string(),
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
            .collect())
    }

    pub fn pending_packets(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<Packet>, Error> {
        Ok(self.state()?.pending_packets(port_id, channel_id))
    }

    pub fn written_ack(&self, packet: &Packet) -> Result<Option<Acknowledgement>, Error> {
        Ok(self.state()?.written_ack(packet))
    }

    pub fn receive_packet(&self, packet: &Packet) -> Result<Acknowledgement, Error> {
        let ack = self.state()?.receive_packet(packet);

        debug!(
            "mock chain {} received packet {} with ack {:?}",
            self.chain_id(),
            packet,
            ack
        );

        Ok(ack)
    }

    pub fn acknowledge_packet(&self, packet: &Packet, ack: &Acknowledgement) -> Result<(), Error> {
        self.state()?.acknowledge_packet(packet, ack);

        debug!(
            "mock chain {} processed acknowledgment of packet {}",
            self.chain_id(),
            packet.sequence
        );

        Ok(())
    }

    fn ensure_running(&self) -> Result<(), Error> {
        self.state().map(|_| ())
    }
}

impl ChainHandle for MockChain {
    fn spec(&self) -> &ChainSpec {
        &self.inner.spec
    }

    fn query_balance(&self, address: &WalletAddress, denom: &Denom) -> Result<Amount, Error> {
        Ok(self.state()?.balance(address, denom))
    }

    fn query_latest_height(&self) -> Result<Height, Error> {
        Ok(self.state()?.height)
    }

    fn send_ibc_transfer(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sender: &Wallet,
        transfer: &WalletAmount,
    ) -> Result<TransferTx, Error> {
        let mut state = self.state()?;

        let tx_hash = self.tx_hash(state.next_tx_number());
        let height = state.height;

        let packet = state
            .send_transfer(
                port_id,
                channel_id,
                &sender.address,
                &transfer.address,
                &transfer.token,
            )
            .map_err(|rejection| {
                Error::transfer_submit(
                    self.chain_id().to_string(),
                    tx_hash.clone(),
                    rejection.code,
                    rejection.log,
                )
            })?;

        debug!(
            "mock chain {} committed transfer tx {} at height {}: {}",
            self.chain_id(),
            tx_hash,
            height,
            packet
        );

        Ok(TransferTx {
            tx_hash,
            height,
            packet,
        })
    }

    fn query_packet_acknowledged(&self, packet: &Packet) -> Result<bool, Error> {
        Ok(self.state()?.acknowledged_at(packet).is_some())
    }

    fn shutdown(&self) -> Result<(), Error> {
        let producer = self.inner.block_producer.acquire_mutex()?.take();

        if let Some(producer) = producer {
            let _ = producer.stop.send(());

            if producer.handle.join().is_err() {
                warn!(
                    "block producer of mock chain {} panicked",
                    self.chain_id()
                );
            }

            info!("stopped mock chain {}", self.chain_id());
        }

        Ok(())
    }
}

impl WasmChainHandle for MockChain {
    fn store_wasm_code(&self, _sender: &Wallet, wasm_file: &str) -> Result<u64, Error> {
        self.ensure_running()?;

        Ok(self.inner.wasm.acquire_mutex()?.store_code(wasm_file))
    }

    fn instantiate_contract(
        &self,
        _sender: &Wallet,
        code_id: u64,
        label: &str,
        init_msg: &str,
    ) -> Result<String, Error> {
        self.ensure_running()?;

        self.inner
            .wasm
            .acquire_mutex()?
            .instantiate(code_id, label, init_msg)
    }

    fn execute_contract(
        &self,
        _sender: &Wallet,
        contract: &str,
        msg: &str,
        _fees: Option<&str>,
    ) -> Result<(), Error> {
        self.ensure_running()?;

        self.inner.wasm.acquire_mutex()?.execute(contract, msg)
    }

    fn smart_query(&self, contract: &str, query: &str) -> Result<serde_json::Value, Error> {
        self.ensure_running()?;

        self.inner.wasm.acquire_mutex()?.query(contract, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::poll::wait_for_blocks;

    #[test]
    fn produces_blocks_until_shutdown() {
        let chain = MockChain::start(
            ChainSpec::new("seda", "seda-1", "aseda"),
            Duration::from_millis(2),
        );

        let height = wait_for_blocks(&chain, 3, Duration::from_millis(2), 1000).unwrap();
        assert!(height >= Height(4));

        chain.shutdown().unwrap();

        assert!(!chain.is_running());
        assert!(chain.query_latest_height().is_err());

        // shutting down twice is harmless
        chain.shutdown().unwrap();
    }

    #[test]
    fn genesis_balances_are_credited() {
        let chain = MockChain::start(
            ChainSpec::new("seda", "seda-1", "aseda").with_wallet(Wallet::new(
                "user",
                "seda1user",
                2_000_000_000_000u64,
            )),
            DEFAULT_BLOCK_TIME,
        );

        let balance = chain
            .query_balance(&WalletAddress("seda1user".into()), &Denom::base("aseda"))
            .unwrap();

        assert_eq!(balance, Amount(2_000_000_000_000));

        chain.shutdown().unwrap();
    }
}
