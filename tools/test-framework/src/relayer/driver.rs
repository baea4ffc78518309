/*!
   Driver for the Go relayer (`rly`) command line.

   The relayer keys are expected to be present in the keyring under
   `<relayer home>/keys` already, named after [`ChainSpec::relayer_key`].
*/

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use eyre::eyre;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::chain::exec::simple_exec;
use crate::error::{handle_generic_error, Error};
use crate::relayer::handle::{IdentifiedChannel, RelayerHandle};
use crate::types::binary::channel::ConnectedChannel;
use crate::types::config::TestConfig;
use crate::types::id::{ChainId, PortId};
use crate::types::topology::{ChainSpec, LinkSpec, RelayerSpec};
use crate::util::mutex::MutexUtil;
use crate::util::process::ChildProcess;

const RELAYER_DESC: &str = "relayer";

/**
   A path as registered in the relayer configuration.
*/
#[derive(Debug, Clone)]
struct RegisteredPath {
    name: String,
    chain_a: ChainId,
    chain_b: ChainId,
    port: PortId,
}

#[derive(Debug, Deserialize)]
struct PathShowOutput {
    path: PathEnds,
}

#[derive(Debug, Deserialize)]
struct PathEnds {
    src: PathEnd,
    dst: PathEnd,
}

#[derive(Debug, Deserialize)]
struct PathEnd {
    #[serde(rename = "chain-id")]
    chain_id: ChainId,

    #[serde(rename = "connection-id", default)]
    connection_id: String,
}

pub struct RlyRelayerDriver {
    command_path: String,

    home_path: PathBuf,

    log_dir: PathBuf,

    startup_flags: Vec<String>,

    /// The name each chain was registered with, by chain ID.
    chain_names: Mutex<BTreeMap<ChainId, String>>,

    paths: Mutex<Vec<RegisteredPath>>,

    process: Mutex<Option<(String, ChildProcess)>>,
}

impl RlyRelayerDriver {
    pub fn new(spec: &RelayerSpec, config: &TestConfig) -> Result<Self, Error> {
        let home_path = if spec.home_path.as_os_str().is_empty() {
            config.chain_store_dir.join("relayer")
        } else {
            spec.home_path.clone()
        };

        fs::create_dir_all(&home_path)?;

        let driver = Self {
            command_path: spec.command_path.clone(),
            home_path,
            log_dir: config.chain_store_dir.clone(),
            startup_flags: spec.startup_flags.clone(),
            chain_names: Mutex::new(BTreeMap::new()),
            paths: Mutex::new(Vec::new()),
            process: Mutex::new(None),
        };

        if !driver.home_path.join("config").join("config.yaml").exists() {
            driver.exec(&["config", "init"])?;
        }

        Ok(driver)
    }

    fn home_arg(&self) -> String {
        self.home_path.to_string_lossy().to_string()
    }

    fn exec(&self, args: &[&str]) -> Result<String, Error> {
        let home = self.home_arg();

        let mut full_args = args.to_vec();
        full_args.extend_from_slice(&["--home", home.as_str()]);

        Ok(simple_exec(RELAYER_DESC, &self.command_path, &full_args)?.stdout)
    }

    fn chain_name(&self, chain_id: &ChainId) -> Result<String, Error> {
        self.chain_names
            .acquire_mutex()?
            .get(chain_id)
            .cloned()
            .ok_or_else(|| Error::unknown_chain(chain_id.to_string()))
    }

    fn write_chain_config(&self, chain: &ChainSpec) -> Result<PathBuf, Error> {
        let config = json!({
            "type": "cosmos",
            "value": {
                "key": chain.relayer_key,
                "chain-id": chain.chain_id,
                "rpc-addr": http_rpc_address(&chain.rpc_address),
                "account-prefix": chain.account_prefix,
                "keyring-backend": "test",
                "gas-adjustment": 1.3,
                "gas-prices": chain.gas_prices(),
                "debug": true,
                "timeout": "20s",
                "output-format": "json",
                "sign-mode": "direct",
            }
        });

        let dir = self.home_path.join("chain-configs");
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", chain.name));
        let body = serde_json::to_string_pretty(&config).map_err(handle_generic_error)?;
        fs::write(&path, body)?;

        Ok(path)
    }

    /// The connection on `src` used by the registered path to `dst`.
    fn path_connection(&self, src: &ChainId, dst: &ChainId) -> Result<(String, PortId), Error> {
        let path = self
            .paths
            .acquire_mutex()?
            .iter()
            .find(|path| {
                (&path.chain_a == src && &path.chain_b == dst)
                    || (&path.chain_a == dst && &path.chain_b == src)
            })
            .cloned()
            .ok_or_else(|| Error::unknown_path(format!("{src} <-> {dst}")))?;

        let output = self.exec(&["paths", "show", &path.name, "--json"])?;
        let shown: PathShowOutput = serde_json::from_str(&output).map_err(handle_generic_error)?;

        let end = if &shown.path.src.chain_id == src {
            shown.path.src
        } else {
            shown.path.dst
        };

        if end.connection_id.is_empty() {
            return Err(Error::unknown_path(path.name));
        }

        Ok((end.connection_id, path.port))
    }
}

impl RelayerHandle for RlyRelayerDriver {
    fn add_chain(&self, chain: &ChainSpec) -> Result<(), Error> {
        let config_path = self.write_chain_config(chain)?;
        let config_path = config_path.to_string_lossy().to_string();

        self.exec(&["chains", "add", "--file", &config_path, &chain.name])?;

        self.chain_names
            .acquire_mutex()?
            .insert(chain.chain_id.clone(), chain.name.clone());

        info!("registered chain {} with the relayer", chain.chain_id);

        Ok(())
    }

    fn link_path(
        &self,
        link: &LinkSpec,
        chain_a: &ChainSpec,
        chain_b: &ChainSpec,
    ) -> Result<(), Error> {
        self.exec(&[
            "paths",
            "new",
            chain_a.chain_id.as_str(),
            chain_b.chain_id.as_str(),
            &link.path,
        ])?;

        self.exec(&[
            "tx",
            "link",
            &link.path,
            "--src-port",
            link.port.as_str(),
            "--dst-port",
            link.port.as_str(),
            "--version",
            "ics20-1",
        ])?;

        self.paths.acquire_mutex()?.push(RegisteredPath {
            name: link.path.clone(),
            chain_a: chain_a.chain_id.clone(),
            chain_b: chain_b.chain_id.clone(),
            port: link.port.clone(),
        });

        info!(
            "linked path {} between {} and {}",
            link.path, chain_a.chain_id, chain_b.chain_id
        );

        Ok(())
    }

    fn start(&self, path: &str) -> Result<(), Error> {
        let mut process = self.process.acquire_mutex()?;

        if let Some((running_path, child)) = process.as_mut() {
            if child.is_running() {
                if running_path.as_str() != path {
                    return Err(Error::generic(eyre!(
                        "relayer is already running on path {}, cannot start path {}",
                        running_path,
                        path
                    )));
                }

                debug!("relayer is already running on path {}", path);
                return Ok(());
            }
        }

        let home = self.home_arg();
        let mut args = vec!["start", path, "--home", home.as_str()];
        args.extend(self.startup_flags.iter().map(String::as_str));

        let child = ChildProcess::spawn_logged(
            &format!("relayer-{path}"),
            &self.command_path,
            &args,
            &self.log_dir,
        )?;

        info!("started relayer on path {} with pid {}", path, child.id());

        *process = Some((path.to_string(), child));

        Ok(())
    }

    fn stop(&self) -> Result<(), Error> {
        let process = self.process.acquire_mutex()?.take();

        if let Some((path, mut child)) = process {
            info!("stopping relayer on path {}", path);
            child.kill()?;
        }

        Ok(())
    }

    fn is_running(&self) -> bool {
        match self.process.acquire_mutex() {
            Ok(mut process) => process
                .as_mut()
                .map(|(_, child)| child.is_running())
                .unwrap_or(false),
            Err(e) => {
                warn!("failed to inspect relayer process: {}", e);
                false
            }
        }
    }

    fn query_channels(&self, chain_id: &ChainId) -> Result<Vec<IdentifiedChannel>, Error> {
        let name = self.chain_name(chain_id)?;
        let output = self.exec(&["q", "channels", &name])?;

        parse_channels(&output)
    }

    fn get_transfer_channel(
        &self,
        src: &ChainId,
        dst: &ChainId,
    ) -> Result<ConnectedChannel, Error> {
        let (connection_id, port) = self.path_connection(src, dst)?;

        self.query_channels(src)?
            .iter()
            .filter(|channel| {
                channel.port_id == port
                    && channel.connection_hops.first() == Some(&connection_id)
            })
            .find_map(IdentifiedChannel::connected_channel)
            .ok_or_else(|| {
                Error::generic(eyre!(
                    "no open {} channel on chain {} over {}",
                    port,
                    src,
                    connection_id
                ))
            })
    }
}

/// `rly q channels` prints one JSON object per line.
fn parse_channels(output: &str) -> Result<Vec<IdentifiedChannel>, Error> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).map_err(handle_generic_error))
        .collect()
}

/// The relayer only accepts `http(s)://` RPC addresses.
fn http_rpc_address(address: &str) -> String {
    match address.strip_prefix("tcp://") {
        Some(rest) => format!("http://{rest}"),
        None => address.to_string(),
    }
}

impl Drop for RlyRelayerDriver {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("failed to stop relayer: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::ChannelId;

    #[test]
    fn parses_channel_lines() {
        let output = "\
{\"state\":\"STATE_OPEN\",\"ordering\":\"ORDER_UNORDERED\",\"counterparty\":{\"port_id\":\"transfer\",\"channel_id\":\"channel-0\"},\"connection_hops\":[\"connection-0\"],\"version\":\"ics20-1\",\"port_id\":\"transfer\",\"channel_id\":\"channel-1\"}
{\"state\":\"STATE_TRYOPEN\",\"ordering\":\"ORDER_UNORDERED\",\"counterparty\":{\"port_id\":\"transfer\",\"channel_id\":\"channel-2\"},\"connection_hops\":[\"connection-1\"],\"version\":\"ics20-1\",\"port_id\":\"transfer\",\"channel_id\":\"channel-3\"}
";

        let channels = parse_channels(output).unwrap();

        assert_eq!(channels.len(), 2);
        assert!(channels[0].is_open());
        assert!(!channels[1].is_open());
        assert_eq!(channels[1].channel_id, ChannelId::new(3));
    }

    #[test]
    fn rpc_address_uses_http_scheme() {
        assert_eq!(
            http_rpc_address("tcp://localhost:26657"),
            "http://localhost:26657"
        );
        assert_eq!(http_rpc_address("http://node:26657"), "http://node:26657");
    }
}
