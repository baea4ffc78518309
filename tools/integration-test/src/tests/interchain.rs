//! Scenarios against live networks, described by the topology file named
//! by the `TOPOLOGY_CONFIG` environment variable.

use ibc_conformance_framework::prelude::*;

#[test]
fn test_interchain_round_trip() -> Result<(), Error> {
    run_binary_channel_test(&InterchainRoundTripTest, |config| {
        Ok(ExternalBootstrap::new(config.clone()))
    })
}

pub struct InterchainRoundTripTest;

impl TestOverrides for InterchainRoundTripTest {}

impl BinaryChannelTest for InterchainRoundTripTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        _channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let runner = TransferConformanceRunner::new(&chains, relayer, self.transfer_options());

        let report = runner.run_round_trip()?;

        info!("{}", report);

        Ok(())
    }
}

#[cfg(feature = "wasm")]
pub mod wasm {
    use std::env;

    use ibc_conformance_framework::prelude::*;

    use crate::tests::wasm::run_counter_conformance;

    #[test]
    fn test_interchain_counter_contract() -> Result<(), Error> {
        run_basic_test(&InterchainCounterTest)
    }

    pub struct InterchainCounterTest;

    impl TestOverrides for InterchainCounterTest {}

    impl BasicTest for InterchainCounterTest {
        fn run(&self, config: &TestConfig) -> Result<(), Error> {
            let wasm_file = env::var("COUNTER_WASM_PATH")
                .map_err(|_| Error::generic(eyre!("COUNTER_WASM_PATH must be set")))?;

            let spec = TestOverrides::topology_spec(self, config)?;

            let chain_spec = spec
                .chains
                .first()
                .ok_or_else(|| Error::generic(eyre!("topology has no chain")))?;

            let sender = chain_spec
                .wallets
                .first()
                .cloned()
                .ok_or_else(|| Error::generic(eyre!("chain {} has no wallet", chain_spec.chain_id)))?;

            let chain = CosmosChainDriver::start(chain_spec.clone(), config)?;

            let result = run_counter_conformance(&chain, &sender, &wasm_file);

            chain.shutdown()?;

            result
        }
    }
}
