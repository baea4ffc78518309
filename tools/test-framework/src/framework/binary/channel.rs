/*!
   Constructs for running test cases with two networks linked by the
   relayer over a channel with a completed handshake.
*/

use tracing::info;

use crate::bootstrap::init::init_test;
use crate::bootstrap::topology::build_topology;
use crate::bootstrap::NetworkBootstrap;
use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::framework::base::{run_test, HasOverrides, PrimitiveTest, TestConfigOverride};
use crate::relayer::handle::RelayerHandle;
use crate::types::binary::chains::ConnectedChains;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::config::TestConfig;
use crate::types::env::write_env;
use crate::types::topology::TopologySpec;
use crate::util::suspend::hang_on_error;

/**
   Runs a test case that implements [`BinaryChannelTest`].

   The networks and the relayer come from the bootstrap returned by
   `bootstrap`, which is given the test config after the overrides were
   applied. The test runs against the two chains of the first link of
   the topology, and the topology is torn down once the test returns,
   whether it succeeded or not.
*/
pub fn run_binary_channel_test<Test, Overrides, Bootstrap, MakeBootstrap>(
    test: &Test,
    bootstrap: MakeBootstrap,
) -> Result<(), Error>
where
    Test: BinaryChannelTest,
    Test: HasOverrides<Overrides = Overrides>,
    Overrides: TestConfigOverride + TopologyOverride,
    Bootstrap: NetworkBootstrap,
    MakeBootstrap: Fn(&TestConfig) -> Result<Bootstrap, Error>,
{
    run_test(&RunBinaryChannelTest { test, bootstrap })
}

/**
   This trait is implemented for test cases that need to have two
   networks linked by a channel.

   Test writers can use this to implement test cases that only need
   the transfer channel without any other setup.
*/
pub trait BinaryChannelTest {
    /// Test runner
    fn run<Chain: ChainHandle, Relayer: RelayerHandle>(
        &self,
        config: &TestConfig,
        relayer: &Relayer,
        chains: ConnectedChains<Chain, Chain>,
        channel: ConnectedChannel,
    ) -> Result<(), Error>;
}

/**
   An internal trait that can be implemented by test cases to override
   the topology that is brought up for the test.

   Test writers should implement
   [`TestOverrides`](crate::framework::overrides::TestOverrides)
   for their test cases instead of implementing this trait directly.
*/
pub trait TopologyOverride {
    fn topology_spec(&self, config: &TestConfig) -> Result<TopologySpec, Error>;
}

/**
   A wrapper type that lifts a test case that implements [`BinaryChannelTest`]
   into a test case that implements [`PrimitiveTest`].
*/
pub struct RunBinaryChannelTest<'a, Test, MakeBootstrap> {
    /// Inner test
    pub test: &'a Test,

    pub bootstrap: MakeBootstrap,
}

impl<'a, Test, Overrides, Bootstrap, MakeBootstrap> PrimitiveTest
    for RunBinaryChannelTest<'a, Test, MakeBootstrap>
where
    Test: BinaryChannelTest,
    Test: HasOverrides<Overrides = Overrides>,
    Overrides: TestConfigOverride + TopologyOverride,
    Bootstrap: NetworkBootstrap,
    MakeBootstrap: Fn(&TestConfig) -> Result<Bootstrap, Error>,
{
    fn run(&self) -> Result<(), Error> {
        let overrides = self.test.get_overrides();

        let mut config = init_test()?;
        overrides.modify_test_config(&mut config);

        info!("starting test with test config: {:?}", config);

        let spec = overrides.topology_spec(&config)?;

        let link = spec
            .links
            .first()
            .ok_or_else(|| Error::unknown_path("no link in topology".to_string()))?;

        let bootstrap = (self.bootstrap)(&config)?;

        let mut topology = build_topology(&bootstrap, &spec, &config)?;

        let result = (|| {
            let chains = topology.binary(&link.chain_a, &link.chain_b)?;
            let channel = topology.channel(&link.path)?.clone();

            let env_path = config.chain_store_dir.join("binary-channels.env");

            write_env(&env_path, &(&chains, &channel))?;

            info!("written channel environment to {}", env_path.display());

            hang_on_error(config.hang_on_fail, || {
                self.test.run(&config, topology.relayer(), chains, channel)
            })
        })();

        topology.close();

        result
    }
}
