/*!
   An in-process relayer moving packets between [`MockChain`]s.
*/

use core::time::Duration;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, error, info};

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::mock::chain::MockChain;
use crate::relayer::handle::{IdentifiedChannel, RelayerHandle};
use crate::types::binary::channel::ConnectedChannel;
use crate::types::id::{ChainId, PortId};
use crate::types::topology::{ChainSpec, LinkSpec};
use crate::util::mutex::MutexUtil;

pub type ChainRegistry = Arc<Mutex<BTreeMap<ChainId, MockChain>>>;

pub const DEFAULT_RELAY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct MockRelayerConfig {
    /// Time between two relaying rounds.
    pub relay_interval: Duration,

    /**
       Whether acknowledgments are relayed back to the source chain.
       Turning this off leaves every packet received but never
       acknowledged.
    */
    pub relay_acks: bool,
}

impl Default for MockRelayerConfig {
    fn default() -> Self {
        Self {
            relay_interval: DEFAULT_RELAY_INTERVAL,
            relay_acks: true,
        }
    }
}

#[derive(Clone)]
struct MockPath {
    chain_a: MockChain,
    chain_b: MockChain,
    channel: ConnectedChannel,
}

struct RelayWorker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct MockRelayer {
    config: MockRelayerConfig,
    registry: ChainRegistry,
    chains: Mutex<BTreeMap<ChainId, MockChain>>,
    paths: Mutex<BTreeMap<String, MockPath>>,
    workers: Mutex<BTreeMap<String, RelayWorker>>,
    active_workers: Arc<AtomicUsize>,
}

impl MockRelayer {
    pub fn new(registry: ChainRegistry, config: MockRelayerConfig) -> Self {
        Self::with_worker_counter(registry, config, Arc::new(AtomicUsize::new(0)))
    }

    /**
       Create a relayer that keeps `active_workers` up to date with the
       number of its relay threads that have not exited yet.
    */
    pub fn with_worker_counter(
        registry: ChainRegistry,
        config: MockRelayerConfig,
        active_workers: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            config,
            registry,
            chains: Mutex::new(BTreeMap::new()),
            paths: Mutex::new(BTreeMap::new()),
            workers: Mutex::new(BTreeMap::new()),
            active_workers,
        }
    }

    fn chain(&self, chain_id: &ChainId) -> Result<MockChain, Error> {
        self.chains
            .acquire_mutex()?
            .get(chain_id)
            .cloned()
            .ok_or_else(|| Error::unknown_chain(chain_id.to_string()))
    }
}

/**
   Relay one round on `path` in both directions.

   Within a round a packet is either received or acknowledged, never
   both, so an acknowledgment always reaches the source at least one
   round after the packet was received.
*/
fn relay_round(path: &MockPath, relay_acks: bool) -> Result<(), Error> {
    relay_direction(&path.chain_a, &path.chain_b, &path.channel, relay_acks)?;
    relay_direction(
        &path.chain_b,
        &path.chain_a,
        &path.channel.clone().flip(),
        relay_acks,
    )
}

fn relay_direction(
    src: &MockChain,
    dst: &MockChain,
    channel: &ConnectedChannel,
    relay_acks: bool,
) -> Result<(), Error> {
    for packet in src.pending_packets(&channel.port_a, &channel.channel_id_a)? {
        match dst.written_ack(&packet)? {
            Some(ack) => {
                if relay_acks {
                    src.acknowledge_packet(&packet, &ack)?;
                }
            }
            None => {
                dst.receive_packet(&packet)?;
            }
        }
    }

    Ok(())
}

impl RelayerHandle for MockRelayer {
    fn add_chain(&self, chain: &ChainSpec) -> Result<(), Error> {
        let mock_chain = self
            .registry
            .acquire_mutex()?
            .get(&chain.chain_id)
            .cloned()
            .ok_or_else(|| Error::unknown_chain(chain.chain_id.to_string()))?;

        self.chains
            .acquire_mutex()?
            .insert(chain.chain_id.clone(), mock_chain);

        Ok(())
    }

    fn link_path(
        &self,
        link: &LinkSpec,
        chain_a: &ChainSpec,
        chain_b: &ChainSpec,
    ) -> Result<(), Error> {
        let mock_a = self.chain(&chain_a.chain_id)?;
        let mock_b = self.chain(&chain_b.chain_id)?;

        let channel_a = mock_a.init_channel(&link.port, &chain_b.chain_id, &link.port)?;
        let channel_b = mock_b.init_channel(&link.port, &chain_a.chain_id, &link.port)?;

        mock_a.open_channel(&link.port, &channel_a, &channel_b)?;
        mock_b.open_channel(&link.port, &channel_b, &channel_a)?;

        info!(
            "mock relayer linked path {}: {}/{} <-> {}/{}",
            link.path, chain_a.chain_id, channel_a, chain_b.chain_id, channel_b
        );

        self.paths.acquire_mutex()?.insert(
            link.path.clone(),
            MockPath {
                chain_a: mock_a,
                chain_b: mock_b,
                channel: ConnectedChannel {
                    port_a: link.port.clone(),
                    channel_id_a: channel_a,
                    port_b: link.port.clone(),
                    channel_id_b: channel_b,
                },
            },
        );

        Ok(())
    }

    fn start(&self, path: &str) -> Result<(), Error> {
        let mut workers = self.workers.acquire_mutex()?;

        if workers.contains_key(path) {
            debug!("mock relayer is already relaying path {}", path);
            return Ok(());
        }

        let mock_path = self
            .paths
            .acquire_mutex()?
            .get(path)
            .cloned()
            .ok_or_else(|| Error::unknown_path(path.to_string()))?;

        let (stop, stop_receiver) = bounded::<()>(1);
        let interval = self.config.relay_interval;
        let relay_acks = self.config.relay_acks;
        let path_name = path.to_string();
        let active_workers = self.active_workers.clone();

        active_workers.fetch_add(1, Ordering::SeqCst);

        let handle = thread::spawn(move || {
            loop {
                match stop_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = relay_round(&mock_path, relay_acks) {
                            error!("mock relayer on path {} stopped: {}", path_name, e);
                            break;
                        }
                    }
                    _ => break,
                }
            }

            active_workers.fetch_sub(1, Ordering::SeqCst);
        });

        info!("mock relayer started on path {}", path);

        workers.insert(path.to_string(), RelayWorker { stop, handle });

        Ok(())
    }

    fn stop(&self) -> Result<(), Error> {
        let workers = std::mem::take(&mut *self.workers.acquire_mutex()?);

        for (path, worker) in workers {
            let _ = worker.stop.send(());
            if worker.handle.join().is_err() {
                error!("mock relayer worker on path {} panicked", path);
            }

            info!("mock relayer stopped on path {}", path);
        }

        Ok(())
    }

    fn is_running(&self) -> bool {
        self.workers
            .lock()
            .map(|workers| workers.values().any(|worker| !worker.handle.is_finished()))
            .unwrap_or(false)
    }

    fn query_channels(&self, chain_id: &ChainId) -> Result<Vec<IdentifiedChannel>, Error> {
        self.chain(chain_id)?.query_channels()
    }

    fn get_transfer_channel(
        &self,
        src: &ChainId,
        dst: &ChainId,
    ) -> Result<ConnectedChannel, Error> {
        let chain = self.chain(src)?;

        chain
            .open_channel_to(&PortId::transfer(), dst)?
            .ok_or_else(|| Error::unknown_path(format!("{} -> {}", chain.chain_id(), dst)))
    }
}

impl Drop for MockRelayer {
    fn drop(&mut self) {
        let _ = RelayerHandle::stop(self);
    }
}
