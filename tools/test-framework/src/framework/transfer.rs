/*!
   The round trip transfer conformance check.

   A token native to chain A is sent to chain B and back over the channel
   linking the two. After each leg the runner waits for the source chain
   to process the acknowledgment, lets a few more blocks settle, and then
   checks the balances of both accounts exactly:

   - After the outbound leg the sender on A is debited by the amount, and
     the receiver on B holds exactly the amount of the voucher denom
     derived from the B side of the channel.

   - After the return leg the sender on A is back to its original
     balance, and the voucher balance on B is zero.
*/

use core::fmt::{self, Display};
use core::time::Duration;
use tracing::info;

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::ibc::denom::{derive_ibc_denom, Denom};
use crate::ibc::packet::Packet;
use crate::ibc::token::{Token, WalletAmount};
use crate::relayer::handle::RelayerHandle;
use crate::types::amount::Amount;
use crate::types::binary::chains::ConnectedChains;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::id::Height;
use crate::types::wallet::Wallet;
use crate::util::assert::{assert_balance_delta, assert_balance_eq, BalanceDelta, BalanceSnapshot};
use crate::util::poll::{poll_for_ack, wait_for_blocks};

#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// The amount of the native denom of chain A sent on each leg.
    pub amount: Amount,

    /// Number of blocks on chain A within which the outbound packet must
    /// be acknowledged.
    pub outbound_ack_window: u64,

    /// Number of blocks on chain B within which the returning packet must
    /// be acknowledged.
    pub return_ack_window: u64,

    /// Blocks to wait on the source chain after an acknowledgment before
    /// checking balances.
    pub settlement_blocks: u64,

    /// Blocks to wait on both chains before the first balance snapshot.
    pub warmup_blocks: u64,

    pub poll_interval: Duration,

    /// Upper bound on the number of height queries while waiting for
    /// blocks.
    pub block_wait_attempts: u16,

    /// If set, both test accounts must hold exactly this amount of their
    /// native denom before the first transfer.
    pub expected_initial_balance: Option<Amount>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            amount: Amount(1000),
            outbound_ack_window: 50,
            return_ack_window: 25,
            settlement_blocks: 10,
            warmup_blocks: 5,
            poll_interval: Duration::from_secs(1),
            block_wait_attempts: 600,
            expected_initial_balance: None,
        }
    }
}

/// What happened on a single leg of the round trip.
#[derive(Debug, Clone)]
pub struct LegReport {
    pub tx_hash: String,
    pub packet: Packet,
    pub start_height: Height,
    pub ack_height: Height,
}

#[derive(Debug, Clone)]
pub struct RoundTripReport {
    pub original_balance_a: BalanceSnapshot,
    pub original_balance_b: BalanceSnapshot,
    pub derived_denom: Denom,
    pub outbound: LegReport,
    pub inbound: LegReport,
}

pub struct TransferConformanceRunner<'a, ChainA: ChainHandle, ChainB: ChainHandle, Relayer> {
    chains: &'a ConnectedChains<ChainA, ChainB>,
    relayer: &'a Relayer,
    options: TransferOptions,
}

impl<'a, ChainA, ChainB, Relayer> TransferConformanceRunner<'a, ChainA, ChainB, Relayer>
where
    ChainA: ChainHandle,
    ChainB: ChainHandle,
    Relayer: RelayerHandle,
{
    pub fn new(
        chains: &'a ConnectedChains<ChainA, ChainB>,
        relayer: &'a Relayer,
        options: TransferOptions,
    ) -> Self {
        Self {
            chains,
            relayer,
            options,
        }
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    pub fn run_round_trip(&self) -> Result<RoundTripReport, Error> {
        let chain_a = self.chains.handle_a();
        let chain_b = self.chains.handle_b();
        let user_a = test_user(chain_a)?;
        let user_b = test_user(chain_b)?;
        let amount = self.options.amount;

        self.wait_blocks(chain_a, self.options.warmup_blocks)?;
        self.wait_blocks(chain_b, self.options.warmup_blocks)?;

        let denom_a = self.chains.denom_a();
        let denom_b = self.chains.denom_b();

        let original_balance_a = BalanceSnapshot::query(chain_a, user_a.address(), &denom_a)?;
        let original_balance_b = BalanceSnapshot::query(chain_b, user_b.address(), &denom_b)?;

        info!(
            "original balances: {}, {}",
            original_balance_a, original_balance_b
        );

        if let Some(expected) = self.options.expected_initial_balance {
            assert_balance_eq(&original_balance_a, expected)?;
            assert_balance_eq(&original_balance_b, expected)?;
        }

        let channel = self
            .relayer
            .get_transfer_channel(self.chains.chain_id_a(), self.chains.chain_id_b())?;

        info!(
            "sending {}{} from {} to {} over {}/{}",
            amount,
            denom_a,
            self.chains.chain_id_a(),
            self.chains.chain_id_b(),
            channel.port_a,
            channel.channel_id_a,
        );

        let outbound = self.run_leg(
            chain_a,
            &channel,
            user_a,
            user_b,
            &denom_a,
            self.options.outbound_ack_window,
        )?;

        let derived_denom = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &denom_a);

        let balance_a = BalanceSnapshot::query(chain_a, user_a.address(), &denom_a)?;
        assert_balance_delta(&original_balance_a, &balance_a, BalanceDelta::Debit(amount))?;

        let voucher_b = BalanceSnapshot::query(chain_b, user_b.address(), &derived_denom)?;
        assert_balance_eq(&voucher_b, amount)?;

        info!(
            "outbound transfer settled: {}, {}",
            balance_a, voucher_b
        );

        let return_channel = channel.clone().flip();

        info!(
            "sending {}{} back from {} to {} over {}/{}",
            amount,
            derived_denom,
            self.chains.chain_id_b(),
            self.chains.chain_id_a(),
            return_channel.port_a,
            return_channel.channel_id_a,
        );

        let inbound = self.run_leg(
            chain_b,
            &return_channel,
            user_b,
            user_a,
            &derived_denom,
            self.options.return_ack_window,
        )?;

        let final_balance_a = BalanceSnapshot::query(chain_a, user_a.address(), &denom_a)?;
        assert_balance_eq(&final_balance_a, original_balance_a.amount)?;

        let final_voucher_b = BalanceSnapshot::query(chain_b, user_b.address(), &derived_denom)?;
        assert_balance_eq(&final_voucher_b, Amount::zero())?;

        let final_balance_b = BalanceSnapshot::query(chain_b, user_b.address(), &denom_b)?;
        assert_balance_eq(&final_balance_b, original_balance_b.amount)?;

        info!(
            "round trip settled: {}, {}",
            final_balance_a, final_voucher_b
        );

        Ok(RoundTripReport {
            original_balance_a,
            original_balance_b,
            derived_denom,
            outbound,
            inbound,
        })
    }

    /**
       Send `denom` from `sender` on `src` over `channel`, viewed from
       `src`, and wait for the acknowledgment and the settlement blocks.
    */
    fn run_leg<Src: ChainHandle>(
        &self,
        src: &Src,
        channel: &ConnectedChannel,
        sender: &Wallet,
        receiver: &Wallet,
        denom: &Denom,
        ack_window: u64,
    ) -> Result<LegReport, Error> {
        let start_height = src.query_latest_height()?;

        let tx = src.send_ibc_transfer(
            &channel.port_a,
            &channel.channel_id_a,
            sender,
            &WalletAmount {
                address: receiver.address().clone(),
                token: Token::new(denom.clone(), self.options.amount),
            },
        )?;

        info!(
            "transfer tx {} committed on {} at height {} with packet sequence {}",
            tx.tx_hash,
            src.chain_id(),
            tx.height,
            tx.packet.sequence
        );

        self.relayer.start(&self.chains.path)?;

        let ack_height = poll_for_ack(
            src,
            &tx.packet,
            start_height,
            start_height.add(ack_window),
            self.options.poll_interval,
        )?;

        self.wait_blocks(src, self.options.settlement_blocks)?;

        Ok(LegReport {
            tx_hash: tx.tx_hash,
            packet: tx.packet,
            start_height,
            ack_height,
        })
    }

    fn wait_blocks<Chain: ChainHandle>(&self, chain: &Chain, blocks: u64) -> Result<(), Error> {
        if blocks > 0 {
            wait_for_blocks(
                chain,
                blocks,
                self.options.poll_interval,
                self.options.block_wait_attempts,
            )?;
        }

        Ok(())
    }
}

fn test_user<Chain: ChainHandle>(chain: &Chain) -> Result<&Wallet, Error> {
    chain.spec().wallets.first().ok_or_else(|| {
        Error::infrastructure(format!("chain {} has no test wallet", chain.chain_id()))
    })
}

impl Display for LegReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "tx {} sent packet {} at height {}, acknowledged at height {}",
            self.tx_hash, self.packet.sequence, self.start_height, self.ack_height
        )
    }
}

impl Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "round trip of {} as {}: outbound {}; return {}",
            self.original_balance_a.denom, self.derived_denom, self.outbound, self.inbound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::NetworkBootstrap;
    use crate::mock::bootstrap::MockBootstrap;
    use crate::mock::relayer::MockRelayer;
    use crate::relayer::handle::IdentifiedChannel;
    use crate::types::id::ChainId;
    use crate::types::topology::{ChainSpec, LinkSpec, RelayerSpec};

    /**
       A relayer that only resolves transfer channels from one chain, so
       that a round trip can only succeed if the return leg reuses the
       outbound channel.
    */
    struct OneWayRelayer {
        inner: MockRelayer,
        source: ChainId,
    }

    impl RelayerHandle for OneWayRelayer {
        fn add_chain(&self, chain: &ChainSpec) -> Result<(), Error> {
            self.inner.add_chain(chain)
        }

        fn link_path(
            &self,
            link: &LinkSpec,
            chain_a: &ChainSpec,
            chain_b: &ChainSpec,
        ) -> Result<(), Error> {
            self.inner.link_path(link, chain_a, chain_b)
        }

        fn start(&self, path: &str) -> Result<(), Error> {
            self.inner.start(path)
        }

        fn stop(&self) -> Result<(), Error> {
            self.inner.stop()
        }

        fn is_running(&self) -> bool {
            self.inner.is_running()
        }

        fn query_channels(&self, chain_id: &ChainId) -> Result<Vec<IdentifiedChannel>, Error> {
            self.inner.query_channels(chain_id)
        }

        fn get_transfer_channel(
            &self,
            src: &ChainId,
            dst: &ChainId,
        ) -> Result<ConnectedChannel, Error> {
            if src != &self.source {
                return Err(Error::unknown_path(format!("{src} -> {dst}")));
            }

            self.inner.get_transfer_channel(src, dst)
        }
    }

    fn chain_spec(name: &str, chain_id: &str, denom: &str, user: &str) -> ChainSpec {
        ChainSpec::new(name, chain_id, denom)
            .with_wallet(Wallet::new("user", user, 1_000_000u128))
    }

    #[test]
    fn return_leg_uses_counterparty_of_outbound_channel() {
        let bootstrap = MockBootstrap::new();

        let spec_a = chain_spec("seda", "seda-1", "aseda", "seda1user");
        let spec_b = chain_spec("gaia", "gaia-1", "uatom", "cosmos1user");

        let chain_a = bootstrap.create_network(&spec_a).unwrap();
        let chain_b = bootstrap.create_network(&spec_b).unwrap();

        let relayer = OneWayRelayer {
            inner: bootstrap.create_relayer(&RelayerSpec::default()).unwrap(),
            source: spec_a.chain_id.clone(),
        };

        relayer.add_chain(&spec_a).unwrap();
        relayer.add_chain(&spec_b).unwrap();
        relayer
            .link_path(&LinkSpec::new("seda", "gaia", "seda-gaia"), &spec_a, &spec_b)
            .unwrap();

        let chains = ConnectedChains::new(chain_a.clone(), chain_b.clone(), "seda-gaia".into());

        let options = TransferOptions {
            amount: Amount(1000),
            poll_interval: Duration::from_millis(5),
            block_wait_attempts: 2000,
            ..TransferOptions::default()
        };

        let result = TransferConformanceRunner::new(&chains, &relayer, options).run_round_trip();

        relayer.stop().unwrap();
        chain_a.shutdown().unwrap();
        chain_b.shutdown().unwrap();

        let report = result.unwrap();

        assert_eq!(
            report.inbound.packet.source_channel,
            report.outbound.packet.destination_channel
        );
        assert_eq!(
            report.inbound.packet.destination_channel,
            report.outbound.packet.source_channel
        );
    }
}
