/*!
   Bootstrap of in-process networks and relayer.
*/

use core::time::Duration;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::bootstrap::NetworkBootstrap;
use crate::error::Error;
use crate::mock::chain::{MockChain, DEFAULT_BLOCK_TIME};
use crate::mock::relayer::{ChainRegistry, MockRelayer, MockRelayerConfig};
use crate::types::id::ChainId;
use crate::types::topology::{ChainSpec, RelayerSpec};
use crate::util::mutex::MutexUtil;

/**
   Creates [`MockChain`]s and [`MockRelayer`]s that share a registry, so
   that the relayer can reach every chain created by the same bootstrap.
*/
#[derive(Clone)]
pub struct MockBootstrap {
    registry: ChainRegistry,
    block_time: Duration,
    relayer_config: MockRelayerConfig,
    failing_networks: Vec<ChainId>,
    relay_workers: Arc<AtomicUsize>,
}

impl MockBootstrap {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(BTreeMap::new())),
            block_time: DEFAULT_BLOCK_TIME,
            relayer_config: MockRelayerConfig::default(),
            failing_networks: Vec::new(),
            relay_workers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_block_time(mut self, block_time: Duration) -> Self {
        self.block_time = block_time;
        self
    }

    pub fn with_relayer_config(mut self, relayer_config: MockRelayerConfig) -> Self {
        self.relayer_config = relayer_config;
        self
    }

    /// Make the creation of the network with the given chain ID fail.
    pub fn with_failing_network(mut self, chain_id: &str) -> Self {
        self.failing_networks.push(ChainId::new(chain_id));
        self
    }

    /// The chain created with the given chain ID, if any.
    pub fn chain(&self, chain_id: &ChainId) -> Result<Option<MockChain>, Error> {
        Ok(self.registry.acquire_mutex()?.get(chain_id).cloned())
    }

    pub fn chains(&self) -> Result<Vec<MockChain>, Error> {
        Ok(self.registry.acquire_mutex()?.values().cloned().collect())
    }

    /// Number of relay threads of the created relayers that are still alive.
    pub fn running_relay_workers(&self) -> usize {
        self.relay_workers.load(Ordering::SeqCst)
    }
}

impl Default for MockBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBootstrap for MockBootstrap {
    type Chain = MockChain;

    type Relayer = MockRelayer;

    fn create_network(&self, spec: &ChainSpec) -> Result<MockChain, Error> {
        if self.failing_networks.contains(&spec.chain_id) {
            return Err(Error::infrastructure(format!(
                "mock chain {} failed to start",
                spec.chain_id
            )));
        }

        let mut registry = self.registry.acquire_mutex()?;

        if registry.contains_key(&spec.chain_id) {
            return Err(Error::infrastructure(format!(
                "a mock chain with ID {} already exists",
                spec.chain_id
            )));
        }

        let chain = MockChain::start(spec.clone(), self.block_time);
        registry.insert(spec.chain_id.clone(), chain.clone());

        Ok(chain)
    }

    fn create_relayer(&self, _spec: &RelayerSpec) -> Result<MockRelayer, Error> {
        Ok(MockRelayer::with_worker_counter(
            self.registry.clone(),
            self.relayer_config.clone(),
            self.relay_workers.clone(),
        ))
    }
}
