/*!
   Composition of networks and a relayer into a linked topology.
*/

use core::fmt::Display;
use tracing::{info, warn};

use crate::bootstrap::NetworkBootstrap;
use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::relayer::handle::RelayerHandle;
use crate::types::binary::chains::ConnectedChains;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::config::TestConfig;
use crate::types::topology::{ChainSpec, LinkSpec, TopologySpec};
use crate::util::retry::assert_eventually_succeed;

/**
   The running networks of a test, and the relayer linking them.

   The topology owns its components. They are torn down by
   [`close`](LinkedTopology::close), or when the topology is dropped
   without having been closed, so that a failing test never leaks
   running processes.
*/
pub struct LinkedTopology<Chain: ChainHandle, Relayer: RelayerHandle> {
    chains: Vec<Chain>,
    relayer: Relayer,
    links: Vec<(LinkSpec, ConnectedChannel)>,
    closed: bool,
}

/**
   Bring up every network of `spec`, one relayer, and link the requested
   paths.

   The function returns only once every link has an open channel
   observable through the relayer. No step is retried beyond the
   bounded readiness polling: the first failure tears down what was
   already started and is returned as an
   [`Infrastructure`](crate::error::ErrorDetail::Infrastructure) error.
*/
pub fn build_topology<Bootstrap: NetworkBootstrap>(
    bootstrap: &Bootstrap,
    spec: &TopologySpec,
    config: &TestConfig,
) -> Result<LinkedTopology<Bootstrap::Chain, Bootstrap::Relayer>, Error> {
    for link in spec.links.iter() {
        for name in [&link.chain_a, &link.chain_b] {
            if spec.chain(name).is_none() {
                return Err(Error::unknown_chain(name.clone()));
            }
        }
    }

    let mut chains = Vec::new();

    for chain_spec in spec.chains.iter() {
        match bootstrap.create_network(chain_spec) {
            Ok(chain) => chains.push(chain),
            Err(e) => {
                shutdown_chains(&chains);
                return Err(infrastructure(
                    format!("failed to start network {}", chain_spec.chain_id),
                    e,
                ));
            }
        }
    }

    let relayer = match bootstrap.create_relayer(&spec.relayer) {
        Ok(relayer) => relayer,
        Err(e) => {
            shutdown_chains(&chains);
            return Err(infrastructure("failed to start relayer", e));
        }
    };

    // from here on, an early return tears everything down on drop
    let mut topology = LinkedTopology {
        chains,
        relayer,
        links: Vec::new(),
        closed: false,
    };

    for chain in topology.chains.iter() {
        topology.relayer.add_chain(chain.spec()).map_err(|e| {
            infrastructure(
                format!("failed to register network {} with relayer", chain.chain_id()),
                e,
            )
        })?;
    }

    for link in spec.links.iter() {
        let channel = link_and_wait(&topology, link, config)?;

        info!(
            "path {} is ready: {}/{} on {} <-> {}/{} on {}",
            link.path,
            channel.port_a,
            channel.channel_id_a,
            link.chain_a,
            channel.port_b,
            channel.channel_id_b,
            link.chain_b,
        );

        topology.links.push((link.clone(), channel));
    }

    Ok(topology)
}

fn link_and_wait<Chain: ChainHandle, Relayer: RelayerHandle>(
    topology: &LinkedTopology<Chain, Relayer>,
    link: &LinkSpec,
    config: &TestConfig,
) -> Result<ConnectedChannel, Error> {
    let chain_a = topology.chain_spec(&link.chain_a)?;
    let chain_b = topology.chain_spec(&link.chain_b)?;

    topology
        .relayer
        .link_path(link, chain_a, chain_b)
        .map_err(|e| infrastructure(format!("failed to link path {}", link.path), e))?;

    assert_eventually_succeed(
        &format!("open channel on path {}", link.path),
        config.max_readiness_attempts,
        config.poll_interval,
        || {
            topology
                .relayer
                .get_transfer_channel(&chain_a.chain_id, &chain_b.chain_id)
        },
    )
    .map_err(|e| infrastructure(format!("path {} did not become ready", link.path), e))
}

fn infrastructure(context: impl Display, e: Error) -> Error {
    Error::infrastructure(format!("{context}: {e}"))
}

fn shutdown_chains<Chain: ChainHandle>(chains: &[Chain]) {
    for chain in chains.iter() {
        if let Err(e) = chain.shutdown() {
            warn!("failed to shut down network {}: {}", chain.chain_id(), e);
        }
    }
}

impl<Chain: ChainHandle, Relayer: RelayerHandle> LinkedTopology<Chain, Relayer> {
    pub fn relayer(&self) -> &Relayer {
        &self.relayer
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// The network created from the chain spec named `name`.
    pub fn chain(&self, name: &str) -> Result<&Chain, Error> {
        self.chains
            .iter()
            .find(|chain| chain.spec().name == name)
            .ok_or_else(|| Error::unknown_chain(name.to_string()))
    }

    fn chain_spec(&self, name: &str) -> Result<&ChainSpec, Error> {
        Ok(self.chain(name)?.spec())
    }

    /// The channel established for the link named `path`.
    pub fn channel(&self, path: &str) -> Result<&ConnectedChannel, Error> {
        self.links
            .iter()
            .find(|(link, _)| link.path == path)
            .map(|(_, channel)| channel)
            .ok_or_else(|| Error::unknown_path(path.to_string()))
    }

    /**
       The two networks named `name_a` and `name_b`, together with the path
       linking them. Fails if no link between the two was requested.
    */
    pub fn binary(&self, name_a: &str, name_b: &str) -> Result<ConnectedChains<Chain, Chain>, Error> {
        let chain_a = self.chain(name_a)?;
        let chain_b = self.chain(name_b)?;

        let (link, _) = self
            .links
            .iter()
            .find(|(link, _)| {
                (link.chain_a == name_a && link.chain_b == name_b)
                    || (link.chain_a == name_b && link.chain_b == name_a)
            })
            .ok_or_else(|| Error::unknown_path(format!("{name_a} <-> {name_b}")))?;

        Ok(ConnectedChains::new(
            chain_a.clone(),
            chain_b.clone(),
            link.path.clone(),
        ))
    }

    /**
       Stop the relayer, then every network. Failures are logged and do
       not stop the rest of the teardown. Closing twice has no effect.
    */
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;

        info!("tearing down topology");

        if let Err(e) = self.relayer.stop() {
            warn!("failed to stop relayer: {}", e);
        }

        shutdown_chains(&self.chains);
    }
}

impl<Chain: ChainHandle, Relayer: RelayerHandle> Drop for LinkedTopology<Chain, Relayer> {
    fn drop(&mut self) {
        self.close();
    }
}
