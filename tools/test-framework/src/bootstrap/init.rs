/*!
   Functions for initializing each test at the beginning of a Rust test
   session.
*/

use core::time::Duration;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::{
    self as ts,
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::Error;
use crate::types::config::TestConfig;
use crate::util::random::random_string;

static INIT: Once = Once::new();

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_READINESS_ATTEMPTS: u16 = 90;

/**
   Initialize the test with a global logger and error handlers,
   read the environment variables and return a [`TestConfig`].
*/
pub fn init_test() -> Result<TestConfig, Error> {
    let no_color_log = env_flag("NO_COLOR_LOG");

    INIT.call_once(|| {
        if !no_color_log {
            // a hook may already be installed by the test harness
            let _ = color_eyre::install();
        }
        install_logger(!no_color_log);
    });

    let base_chain_store_dir = env::var("CHAIN_STORE_DIR").unwrap_or_else(|_| "data".to_string());

    let chain_store_dir = format!("{}/test-{}", base_chain_store_dir, random_string());

    fs::create_dir_all(&chain_store_dir)?;

    let chain_store_dir = fs::canonicalize(chain_store_dir)?;

    let topology_config = env::var("TOPOLOGY_CONFIG").ok().map(PathBuf::from);

    Ok(TestConfig {
        chain_store_dir,
        topology_config,
        hang_on_fail: env_flag("HANG_ON_FAIL"),
        poll_interval: DEFAULT_POLL_INTERVAL,
        max_readiness_attempts: DEFAULT_READINESS_ATTEMPTS,
    })
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|val| val == "1").unwrap_or(false)
}

/**
   Install the [`tracing_subscriber`] logger handlers so that logs will
   be displayed during test.
*/
pub fn install_logger(with_color: bool) {
    // Use log level INFO by default if RUST_LOG is not set.
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let layer = ts::fmt::layer().with_ansi(with_color).with_test_writer();

    // another subscriber may already be set by a different test binary
    let _ = ts::registry().with(env_filter).with(layer).try_init();
}
