use ibc_conformance_framework::ibc::packet::TransferTx;
use ibc_conformance_framework::mock::state::escrow_address;
use ibc_conformance_framework::prelude::*;

use crate::topology::{
    mock_transfer_options, seda_gaia_topology, use_mock_polling, GAIA_USER, GENESIS_AMOUNT,
    SEDA_USER,
};

#[test]
fn test_round_trip_transfer() -> Result<(), Error> {
    run_binary_channel_test(&RoundTripTransferTest, |_| Ok(MockBootstrap::new()))
}

#[test]
fn test_round_trip_multiple_amounts() -> Result<(), Error> {
    run_binary_channel_test(&MultipleAmountsTest, |_| Ok(MockBootstrap::new()))
}

#[test]
fn test_single_leg_transfer() -> Result<(), Error> {
    run_binary_channel_test(&SingleLegTransferTest, |_| Ok(MockBootstrap::new()))
}

pub struct RoundTripTransferTest;

pub struct MultipleAmountsTest;

pub struct SingleLegTransferTest;

impl TestOverrides for RoundTripTransferTest {
    fn modify_test_config(&self, config: &mut TestConfig) {
        use_mock_polling(config);
    }

    fn topology_spec(&self, _config: &TestConfig) -> Result<TopologySpec, Error> {
        Ok(seda_gaia_topology(GENESIS_AMOUNT))
    }

    fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            expected_initial_balance: Some(Amount(GENESIS_AMOUNT)),
            ..mock_transfer_options(1000)
        }
    }
}

impl BinaryChannelTest for RoundTripTransferTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let runner = TransferConformanceRunner::new(&chains, relayer, self.transfer_options());

        let report = runner.run_round_trip()?;

        info!("{}", report);

        let denom_b = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &chains.denom_a());

        assert_eq("derived denom", &report.derived_denom, &denom_b)?;

        assert_eq(
            "derived denom trace",
            &report.derived_denom.trace(),
            &format!("{}/{}/aseda", channel.port_b, channel.channel_id_b),
        )?;

        assert!(report.derived_denom.as_str().starts_with("ibc/"));

        assert_eq(
            "original balance",
            &report.original_balance_a.amount,
            &Amount(GENESIS_AMOUNT),
        )?;

        assert_eq(
            "outbound packet sequence",
            &report.outbound.packet.sequence,
            &Sequence(1),
        )?;

        assert_eq(
            "return packet sequence",
            &report.inbound.packet.sequence,
            &Sequence(1),
        )?;

        assert_gt(
            "outbound ack height",
            &report.outbound.ack_height,
            &report.outbound.start_height,
        )?;

        Ok(())
    }
}

impl TestOverrides for MultipleAmountsTest {
    fn modify_test_config(&self, config: &mut TestConfig) {
        use_mock_polling(config);
    }

    fn topology_spec(&self, _config: &TestConfig) -> Result<TopologySpec, Error> {
        Ok(seda_gaia_topology(GENESIS_AMOUNT))
    }
}

impl BinaryChannelTest for MultipleAmountsTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        _channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let amounts = [1, 1000, 123_456_789, GENESIS_AMOUNT];

        for (i, amount) in amounts.into_iter().enumerate() {
            info!("round trip transfer of {}", amount);

            let runner =
                TransferConformanceRunner::new(&chains, relayer, mock_transfer_options(amount));

            let report = runner.run_round_trip()?;

            assert_eq(
                "balance before round trip",
                &report.original_balance_a.amount,
                &Amount(GENESIS_AMOUNT),
            )?;

            assert_eq(
                "outbound packet sequence",
                &report.outbound.packet.sequence,
                &Sequence(i as u64 + 1),
            )?;
        }

        Ok(())
    }
}

impl TestOverrides for SingleLegTransferTest {
    fn modify_test_config(&self, config: &mut TestConfig) {
        use_mock_polling(config);
    }

    fn topology_spec(&self, _config: &TestConfig) -> Result<TopologySpec, Error> {
        Ok(seda_gaia_topology(GENESIS_AMOUNT))
    }

    fn transfer_options(&self) -> TransferOptions {
        mock_transfer_options(1000)
    }
}

impl BinaryChannelTest for SingleLegTransferTest {
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        _config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        channel: ConnectedChannel,
    ) -> Result<(), Error> {
        let options = self.transfer_options();
        let chain_a = chains.handle_a();
        let chain_b = chains.handle_b();

        let user_a = chains
            .user_a()
            .ok_or_else(|| Error::assertion("chain A has no user".to_string()))?;

        let denom_a = chains.denom_a();
        let denom_b = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &denom_a);

        let start_height = chain_a.query_latest_height()?;

        let TransferTx { packet, .. } = chain_a.send_ibc_transfer(
            &channel.port_a,
            &channel.channel_id_a,
            user_a,
            &WalletAmount {
                address: WalletAddress(GAIA_USER.to_string()),
                token: Token::new(denom_a.clone(), options.amount),
            },
        )?;

        assert_eq(
            "packet denom trace",
            &packet.data.denom,
            &"aseda".to_string(),
        )?;

        relayer.start(&chains.path)?;

        poll_for_ack(
            chain_a,
            &packet,
            start_height,
            start_height.add(options.outbound_ack_window),
            options.poll_interval,
        )?;

        let balance_a = chain_a.query_balance(&WalletAddress(SEDA_USER.to_string()), &denom_a)?;
        let escrowed = chain_a.query_balance(
            &escrow_address(&channel.port_a, &channel.channel_id_a),
            &denom_a,
        )?;
        let balance_b = chain_b.query_balance(&WalletAddress(GAIA_USER.to_string()), &denom_b)?;

        assert_eq("sender balance", &balance_a, &Amount(1_999_999_999_000))?;
        assert_eq("escrowed amount", &escrowed, &Amount(1000))?;
        assert_eq("receiver voucher balance", &balance_b, &Amount(1000))?;

        Ok(())
    }
}
