/*!
   Re-export of common constructs that are used by test cases.
*/

pub use core::time::Duration;
pub use eyre::eyre;
pub use std::thread::sleep;
pub use tracing::{debug, error, info, warn};

pub use crate::bootstrap::external::ExternalBootstrap;
pub use crate::bootstrap::init::init_test;
pub use crate::bootstrap::topology::{build_topology, LinkedTopology};
pub use crate::bootstrap::NetworkBootstrap;
pub use crate::chain::driver::CosmosChainDriver;
pub use crate::chain::handle::{ChainHandle, WasmChainHandle};
pub use crate::error::{handle_generic_error, Error};
pub use crate::framework::base::{run_basic_test, BasicTest};
pub use crate::framework::binary::channel::{run_binary_channel_test, BinaryChannelTest};
pub use crate::framework::overrides::TestOverrides;
pub use crate::framework::transfer::{
    RoundTripReport, TransferConformanceRunner, TransferOptions,
};
pub use crate::ibc::denom::{derive_ibc_denom, Denom};
pub use crate::ibc::token::{Token, WalletAmount};
pub use crate::mock::bootstrap::MockBootstrap;
pub use crate::mock::chain::MockChain;
pub use crate::mock::relayer::MockRelayerConfig;
pub use crate::relayer::driver::RlyRelayerDriver;
pub use crate::relayer::handle::RelayerHandle;
pub use crate::types::amount::Amount;
pub use crate::types::binary::chains::ConnectedChains;
pub use crate::types::binary::channel::ConnectedChannel;
pub use crate::types::config::TestConfig;
pub use crate::types::id::{ChainId, ChannelId, Height, PortId, Sequence};
pub use crate::types::topology::{ChainSpec, LinkSpec, RelayerSpec, TopologySpec};
pub use crate::types::wallet::{Wallet, WalletAddress, WalletId};
pub use crate::util::assert::*;
pub use crate::util::poll::{poll_for_ack, wait_for_blocks};
pub use crate::util::suspend::suspend;
