/*!
   Bootstrap of live networks reached through their command line and
   REST API, linked by the Go relayer.
*/

use crate::bootstrap::NetworkBootstrap;
use crate::chain::driver::CosmosChainDriver;
use crate::error::Error;
use crate::relayer::driver::RlyRelayerDriver;
use crate::types::config::TestConfig;
use crate::types::topology::{ChainSpec, RelayerSpec};

/**
   Networks are expected to be initialized (genesis, keys) beforehand,
   and are only started by the bootstrap when [`ChainSpec::launch`] is
   set.
*/
pub struct ExternalBootstrap {
    config: TestConfig,
}

impl ExternalBootstrap {
    pub fn new(config: TestConfig) -> Self {
        Self { config }
    }
}

impl NetworkBootstrap for ExternalBootstrap {
    type Chain = CosmosChainDriver;

    type Relayer = RlyRelayerDriver;

    fn create_network(&self, spec: &ChainSpec) -> Result<CosmosChainDriver, Error> {
        CosmosChainDriver::start(spec.clone(), &self.config).map_err(|e| {
            Error::infrastructure(format!("failed to bring up chain {}: {}", spec.chain_id, e))
        })
    }

    fn create_relayer(&self, spec: &RelayerSpec) -> Result<RlyRelayerDriver, Error> {
        RlyRelayerDriver::new(spec, &self.config)
            .map_err(|e| Error::infrastructure(format!("failed to set up relayer: {e}")))
    }
}
