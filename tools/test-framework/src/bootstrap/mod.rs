/*!
   Bringing up the networks and the relayer of a test.

   Test authors normally go through
   [`run_binary_channel_test`](crate::framework::binary::channel::run_binary_channel_test),
   which calls [`build_topology`](topology::build_topology) and tears the
   topology down afterwards. The functions here can also be called
   directly for more control over when networks are spawned.
*/

pub mod external;
pub mod init;
pub mod topology;

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::relayer::handle::RelayerHandle;
use crate::types::topology::{ChainSpec, RelayerSpec};

/**
   A factory for the networks and the relayer of a topology.

   Both methods fail with an
   [`Infrastructure`](crate::error::ErrorDetail::Infrastructure) error
   when the component cannot be brought up.
*/
pub trait NetworkBootstrap {
    type Chain: ChainHandle;

    type Relayer: RelayerHandle;

    fn create_network(&self, spec: &ChainSpec) -> Result<Self::Chain, Error>;

    fn create_relayer(&self, spec: &RelayerSpec) -> Result<Self::Relayer, Error>;
}
