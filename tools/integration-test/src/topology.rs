/*!
   Topologies and settings shared by the scenarios against the mock
   backend.
*/

use ibc_conformance_framework::prelude::*;

/// The amount of native tokens each test user holds at genesis.
pub const GENESIS_AMOUNT: u128 = 2_000_000_000_000;

pub const SEDA_USER: &str = "seda1user";

pub const GAIA_USER: &str = "cosmos1user";

/**
   A `seda-1` network with native denom `aseda` linked to a `gaia-1`
   network with native denom `uatom`, each with one user funded with
   `genesis_amount`.
*/
pub fn seda_gaia_topology(genesis_amount: u128) -> TopologySpec {
    TopologySpec {
        chains: vec![
            ChainSpec::new("seda", "seda-1", "aseda").with_wallet(Wallet::new(
                "user",
                SEDA_USER,
                genesis_amount,
            )),
            ChainSpec::new("gaia", "gaia-1", "uatom").with_wallet(Wallet::new(
                "user",
                GAIA_USER,
                genesis_amount,
            )),
        ],
        relayer: RelayerSpec::default(),
        links: vec![LinkSpec::new("seda", "gaia", "seda-gaia")],
    }
}

/// Poll the mock networks at a pace matching their block time.
pub fn use_mock_polling(config: &mut TestConfig) {
    config.poll_interval = Duration::from_millis(5);
    config.max_readiness_attempts = 400;
}

pub fn mock_transfer_options(amount: u128) -> TransferOptions {
    TransferOptions {
        amount: Amount(amount),
        poll_interval: Duration::from_millis(5),
        block_wait_attempts: 2000,
        ..TransferOptions::default()
    }
}
