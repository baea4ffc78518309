// #![deny(warnings)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![doc = include_str!("../README.md")]

//!
//! ## Overview
//!
//! The framework brings up two networks, links them with a relayer over an
//! ICS-20 transfer channel, drives token transfers across that channel and
//! verifies that the balances on both sides converge to exactly the
//! expected amounts once the packets are acknowledged.
//!
//! The same test logic runs against live Cosmos SDK nodes linked by the Go
//! relayer, or against the in-process [`mock`] backend.
//!
//! ## Example Test
//!
//! ```rust,no_run
//! use ibc_conformance_framework::prelude::*;
//!
//! pub struct ExampleTest;
//!
//! #[test]
//! pub fn example_test() -> Result<(), Error> {
//!     run_binary_channel_test(&ExampleTest, |config| {
//!         Ok(ExternalBootstrap::new(config.clone()))
//!     })
//! }
//!
//! impl TestOverrides for ExampleTest {}
//!
//! impl BinaryChannelTest for ExampleTest {
//!     fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
//!         &self,
//!         _config: &TestConfig,
//!         _relayer: &Relayer,
//!         _chains: ConnectedChains<Chain, Chain>,
//!         _channel: ConnectedChannel,
//!     ) -> Result<(), Error> {
//!         suspend()
//!     }
//! }
//! ```
//!
//! The `example_test` function is the top-most function that drives the
//! test. It picks the kind of test to run, here a
//! [`BinaryChannelTest`](framework::binary::channel::BinaryChannelTest),
//! and the bootstrap that brings up the networks. With the
//! [`ExternalBootstrap`](bootstrap::external::ExternalBootstrap) the
//! topology is read from the TOML file named by the `TOPOLOGY_CONFIG`
//! environment variable. Test cases can implement
//! [`TestOverrides`](framework::overrides::TestOverrides) to build the
//! topology in code instead.
//!
//! The `run` function's parameters are:
//! 1. `config`: the test configuration loaded from the environment
//! 2. `relayer`: the relayer linking the two networks
//! 3. `chains`: handles to the two networks, and the relayer path between them
//! 4. `channel`: the transfer channel, viewed from chain A
//!
//! Since the example calls [`suspend`](util::suspend::suspend), it never
//! finishes, and can be used as a starting point for manual testing.
//!
//! ## Running Tests
//!
//! ```bash
//! RUST_LOG=info RUST_BACKTRACE=1 \
//!     cargo test -p ibc-conformance-integration-test -- --test-threads=1
//! ```
//!
//! After a topology is linked, the identifiers of the networks and the
//! channel are written to `binary-channels.env` in the test data
//! directory, which looks like `data/test-8b3e1c2a9f`:
//!
//! ```text
//! INFO written channel environment to /path/to/data/test-8b3e1c2a9f/binary-channels.env
//! ```
//!
//! With `HANG_ON_FAIL=1` a failing test is suspended before its topology
//! is torn down, so that the networks can be inspected with the variables
//! of that file:
//!
//! ```bash
//! $ source /path/to/data/test-8b3e1c2a9f/binary-channels.env
//! $ $NODE_A_CMD --node $NODE_A_RPC_ADDR query bank balances $NODE_A_WALLET_0_ADDRESS
//! ```

pub mod bootstrap;
pub mod chain;
pub mod error;
pub mod framework;
pub mod ibc;
pub mod mock;
pub mod prelude;
pub mod relayer;
pub mod types;
pub mod util;
