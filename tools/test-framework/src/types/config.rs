/*!
   Definition for the test configuration.
*/

use core::time::Duration;
use std::path::PathBuf;

/**
   The test config to be passed to each test case. Currently this is loaded
   from the [`init_test`](crate::bootstrap::init::init_test) function based
   on the test environment variables.
*/
#[derive(Debug, Clone)]
pub struct TestConfig {
    /**
       The directory path for storing the relayer home, the process logs
       and the exported environment of the test.

       Defaults to `data/test-<random>` when the `CHAIN_STORE_DIR`
       environment variable is not set.
    */
    pub chain_store_dir: PathBuf,

    /**
       Path to the TOML file describing the topology to run against live
       networks. Set via the `TOPOLOGY_CONFIG` environment variable.
    */
    pub topology_config: Option<PathBuf>,

    /**
       Suspend a failing test before teardown so that the networks can be
       inspected manually. Set with `HANG_ON_FAIL=1`.
    */
    pub hang_on_fail: bool,

    /**
       Interval between two polls of a network.
    */
    pub poll_interval: Duration,

    /**
       Number of times a readiness check (node start, link, tx inclusion)
       is retried before giving up.
    */
    pub max_readiness_attempts: u16,
}
