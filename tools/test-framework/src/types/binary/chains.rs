/*!
   Type definition for two connected chains.
*/

use crate::chain::handle::ChainHandle;
use crate::ibc::denom::Denom;
use crate::types::env::{prefix_writer, EnvWriter, ExportEnv};
use crate::types::id::ChainId;
use crate::types::wallet::Wallet;

/**
   Two chains linked by the relayer over a named path.
*/
#[derive(Clone)]
pub struct ConnectedChains<ChainA: ChainHandle, ChainB: ChainHandle> {
    /**
        The [`ChainHandle`] for chain A.
    */
    pub handle_a: ChainA,

    /**
        The [`ChainHandle`] for chain B.
    */
    pub handle_b: ChainB,

    /**
       The name of the relayer path linking the two chains.
    */
    pub path: String,
}

impl<ChainA: ChainHandle, ChainB: ChainHandle> ConnectedChains<ChainA, ChainB> {
    pub fn new(handle_a: ChainA, handle_b: ChainB, path: String) -> Self {
        Self {
            handle_a,
            handle_b,
            path,
        }
    }

    pub fn handle_a(&self) -> &ChainA {
        &self.handle_a
    }

    pub fn handle_b(&self) -> &ChainB {
        &self.handle_b
    }

    pub fn chain_id_a(&self) -> &ChainId {
        &self.handle_a.spec().chain_id
    }

    pub fn chain_id_b(&self) -> &ChainId {
        &self.handle_b.spec().chain_id
    }

    pub fn denom_a(&self) -> Denom {
        self.handle_a.spec().native_denom()
    }

    pub fn denom_b(&self) -> Denom {
        self.handle_b.spec().native_denom()
    }

    /**
       The first genesis wallet of chain A, used as the test user.
    */
    pub fn user_a(&self) -> Option<&Wallet> {
        self.handle_a.spec().wallets.first()
    }

    /**
       The first genesis wallet of chain B, used as the test user.
    */
    pub fn user_b(&self) -> Option<&Wallet> {
        self.handle_b.spec().wallets.first()
    }

    /**
       Switch the position between chain A and chain B.
    */
    pub fn flip(self) -> ConnectedChains<ChainB, ChainA> {
        ConnectedChains {
            handle_a: self.handle_b,
            handle_b: self.handle_a,
            path: self.path,
        }
    }
}

impl<ChainA: ChainHandle, ChainB: ChainHandle> ExportEnv for ConnectedChains<ChainA, ChainB> {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        writer.write_env("PATH_NAME", &self.path);
        self.handle_a
            .spec()
            .export_env(&mut prefix_writer("NODE_A", writer));
        self.handle_b
            .spec()
            .export_env(&mut prefix_writer("NODE_B", writer));
    }
}
