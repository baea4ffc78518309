use ibc_conformance_framework::prelude::*;

use crate::topology::{mock_transfer_options, seda_gaia_topology, use_mock_polling, GENESIS_AMOUNT};

#[test]
fn test_transfer_above_balance_is_rejected() -> Result<(), Error> {
    run_binary_channel_test(&TransferAboveBalanceTest, |_| Ok(MockBootstrap::new()))
}

pub struct TransferAboveBalanceTest;

impl TestOverrides for TransferAboveBalanceTest {
    fn modify_test_config(&self, config: &mut TestConfig) {
        use_mock_polling(config);
    }

    fn topology_spec(&self, _config: &TestConfig) -> Result<TopologySpec, Error> {
        Ok(seda_gaia_topology(GENESIS_AMOUNT))
    }

    fn transfer_options(&self) -> TransferOptions {
        mock_transfer_options(GENESIS_AMOUNT + 1)
    }
}

impl BinaryChannelTest for TransferAboveBalanceTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        _channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let runner = TransferConformanceRunner::new(&chains, relayer, self.transfer_options());

        let result = runner.run_round_trip();

        assert_err("transfer above balance", result.as_ref().map(|_| ()))?;

        if let Err(e) = result {
            info!("transfer rejected as expected: {}", e);
            assert!(e.is_transfer_submit());
        }

        // a rejected transfer is never relayed
        assert!(!relayer.is_running());

        let user_a = chains
            .user_a()
            .ok_or_else(|| Error::assertion("chain A has no user".to_string()))?;

        let balance_a = BalanceSnapshot::query(chains.handle_a(), user_a.address(), &chains.denom_a())?;
        assert_balance_eq(&balance_a, GENESIS_AMOUNT)?;

        Ok(())
    }
}
