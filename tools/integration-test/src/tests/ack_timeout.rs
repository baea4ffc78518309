//! A relayer that delivers packets but never relays their acknowledgments
//! must make the transfer time out, without the balances being checked.

use ibc_conformance_framework::prelude::*;

use crate::topology::{mock_transfer_options, seda_gaia_topology, use_mock_polling, GENESIS_AMOUNT};

#[test]
fn test_ack_timeout_without_ack_relay() -> Result<(), Error> {
    let bootstrap = MockBootstrap::new().with_relayer_config(MockRelayerConfig {
        relay_acks: false,
        ..Default::default()
    });

    run_binary_channel_test(&AckTimeoutTest, |_| Ok(bootstrap.clone()))
}

pub struct AckTimeoutTest;

impl TestOverrides for AckTimeoutTest {
    fn modify_test_config(&self, config: &mut TestConfig) {
        use_mock_polling(config);
    }

    fn topology_spec(&self, _config: &TestConfig) -> Result<TopologySpec, Error> {
        Ok(seda_gaia_topology(GENESIS_AMOUNT))
    }

    fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            outbound_ack_window: 10,
            ..mock_transfer_options(1000)
        }
    }
}

impl BinaryChannelTest for AckTimeoutTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let runner = TransferConformanceRunner::new(&chains, relayer, self.transfer_options());

        let e = match runner.run_round_trip() {
            Ok(report) => {
                return Err(Error::assertion(format!(
                    "expected the round trip to time out, but it completed: {report}"
                )))
            }
            Err(e) => e,
        };

        info!("round trip failed as expected: {}", e);

        assert!(e.is_ack_timeout());
        assert!(!e.is_balance_mismatch());

        // the packet was received, only its acknowledgment is missing
        let denom_b = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &chains.denom_a());
        let user_b = chains
            .user_b()
            .ok_or_else(|| Error::assertion("chain B has no user".to_string()))?;

        let voucher_b = BalanceSnapshot::query(chains.handle_b(), user_b.address(), &denom_b)?;
        assert_balance_eq(&voucher_b, 1000u64)?;

        Ok(())
    }
}
