/*!
   Constructs for implementing overrides for test cases.
*/

use eyre::eyre;

use crate::error::Error;
use crate::framework::base::{HasOverrides, TestConfigOverride};
use crate::framework::binary::channel::TopologyOverride;
use crate::framework::transfer::TransferOptions;
use crate::types::config::TestConfig;
use crate::types::topology::TopologySpec;

/**
   This trait should be implemented for all test cases to allow overriding
   some parts of the behavior during the test setup.

   Since all methods in this trait have default implementations, test cases
   that do not need any override can have an empty implementation body for
   this trait.

   The trait contains a hodgepodge of unrelated methods: the overrides
   apply to different stages of the test setup, and the framework
   dispatches each of them through its own override trait.
*/
pub trait TestOverrides {
    /**
       Override the full test config that is passed as the first argument
       of test runners.

       Implemented for [`TestConfigOverride`].
    */
    fn modify_test_config(&self, _config: &mut TestConfig) {}

    /**
       The networks, relayer and links to bring up for the test.

       By default the topology is loaded from the TOML file named by the
       `TOPOLOGY_CONFIG` environment variable.

       Implemented for [`TopologyOverride`].
    */
    fn topology_spec(&self, config: &TestConfig) -> Result<TopologySpec, Error> {
        let path = config.topology_config.as_ref().ok_or_else(|| {
            Error::generic(eyre!(
                "TOPOLOGY_CONFIG must be set to the path of a topology file"
            ))
        })?;

        TopologySpec::load(path)
    }

    /**
       The options of the round trip transfer run by the test, if any.
    */
    fn transfer_options(&self) -> TransferOptions {
        TransferOptions::default()
    }
}

impl<Test: TestOverrides> HasOverrides for Test {
    type Overrides = Self;

    fn get_overrides(&self) -> &Self {
        self
    }
}

impl<Test: TestOverrides> TestConfigOverride for Test {
    fn modify_test_config(&self, config: &mut TestConfig) {
        TestOverrides::modify_test_config(self, config)
    }
}

impl<Test: TestOverrides> TopologyOverride for Test {
    fn topology_spec(&self, config: &TestConfig) -> Result<TopologySpec, Error> {
        TestOverrides::topology_spec(self, config)
    }
}
