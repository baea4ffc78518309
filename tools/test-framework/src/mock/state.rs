/*!
   The ledger of a mock chain, with the ICS-20 escrow and voucher rules
   applied to packets sent and received through its channels.

   Everything in this module is synchronous and free of timing concerns.
   [`MockChain`](crate::mock::chain::MockChain) wraps the state in a
   mutex and advances its height from a background thread.
*/

use std::collections::{BTreeMap, HashMap};

use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::ibc::packet::{FungibleTokenPacketData, Packet};
use crate::ibc::token::Token;
use crate::types::amount::Amount;
use crate::types::binary::channel::ConnectedChannel;
use crate::types::id::{ChainId, ChannelId, Height, PortId, Sequence};
use crate::types::topology::ChainSpec;
use crate::types::wallet::WalletAddress;

/// The ABCI code returned by the bank module for insufficient funds.
pub const CODE_INSUFFICIENT_FUNDS: u32 = 5;

pub type PacketKey = (PortId, ChannelId, Sequence);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Success,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ChannelEnd {
    pub counterparty_chain_id: ChainId,
    pub counterparty_port: PortId,
    pub counterparty_channel: Option<ChannelId>,
    pub open: bool,
}

/**
   A rejected transaction, with the ABCI code and log the chain would
   report.
*/
#[derive(Debug, Clone)]
pub struct TxRejection {
    pub code: u32,
    pub log: String,
}

#[derive(Debug, Default)]
pub struct MockChainState {
    pub height: Height,

    balances: HashMap<(WalletAddress, String), Amount>,

    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,

    next_channel: u64,

    next_sequences: HashMap<(PortId, ChannelId), Sequence>,

    /// Packets sent from this chain whose acknowledgment is pending.
    commitments: BTreeMap<PacketKey, Packet>,

    /// Acknowledgments written for packets received by this chain, keyed
    /// by the packet's source.
    written_acks: HashMap<PacketKey, Acknowledgement>,

    /// The height at which the acknowledgment of a sent packet was
    /// processed.
    acknowledged: HashMap<PacketKey, Height>,

    tx_count: u64,
}

impl MockChainState {
    /**
       The state at genesis: every wallet of `spec` holds its genesis
       amount of the native denomination.
    */
    pub fn genesis(spec: &ChainSpec) -> Self {
        let mut state = Self {
            height: Height(1),
            ..Self::default()
        };

        for wallet in spec.wallets.iter() {
            state.credit(&wallet.address, &spec.native_denom(), wallet.genesis_amount);
        }

        state
    }

    pub fn next_tx_number(&mut self) -> u64 {
        self.tx_count += 1;
        self.tx_count
    }

    pub fn balance(&self, address: &WalletAddress, denom: &Denom) -> Amount {
        self.balances
            .get(&(address.clone(), denom.as_str().to_string()))
            .copied()
            .unwrap_or_else(Amount::zero)
    }

    fn credit(&mut self, address: &WalletAddress, denom: &Denom, amount: Amount) {
        let entry = self
            .balances
            .entry((address.clone(), denom.as_str().to_string()))
            .or_default();

        *entry = entry.checked_add(amount).unwrap_or(Amount(u128::MAX));
    }

    fn debit(
        &mut self,
        address: &WalletAddress,
        denom: &Denom,
        amount: Amount,
    ) -> Result<(), TxRejection> {
        let balance = self.balance(address, denom);

        let remaining = balance.checked_sub(amount).ok_or_else(|| TxRejection {
            code: CODE_INSUFFICIENT_FUNDS,
            log: format!("spendable balance {balance}{denom} is smaller than {amount}{denom}: insufficient funds"),
        })?;

        self.balances
            .insert((address.clone(), denom.as_str().to_string()), remaining);

        Ok(())
    }

    /**
       Allocate a new channel end on `port_id` facing the given
       counterparty. The end stays closed until
       [`open_channel`](Self::open_channel) is called.
    */
    pub fn init_channel(
        &mut self,
        port_id: &PortId,
        counterparty_chain_id: &ChainId,
        counterparty_port: &PortId,
    ) -> ChannelId {
        let channel_id = ChannelId::new(self.next_channel);
        self.next_channel += 1;

        self.channels.insert(
            (port_id.clone(), channel_id.clone()),
            ChannelEnd {
                counterparty_chain_id: counterparty_chain_id.clone(),
                counterparty_port: counterparty_port.clone(),
                counterparty_channel: None,
                open: false,
            },
        );

        channel_id
    }

    pub fn open_channel(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_channel: &ChannelId,
    ) -> Result<(), Error> {
        let end = self
            .channels
            .get_mut(&(port_id.clone(), channel_id.clone()))
            .ok_or_else(|| Error::unknown_path(format!("{port_id}/{channel_id}")))?;

        end.counterparty_channel = Some(counterparty_channel.clone());
        end.open = true;

        Ok(())
    }

    pub fn channels(&self) -> impl Iterator<Item = (&(PortId, ChannelId), &ChannelEnd)> {
        self.channels.iter()
    }

    /// The open channel on `port_id` facing `counterparty_chain_id`.
    pub fn open_channel_to(
        &self,
        port_id: &PortId,
        counterparty_chain_id: &ChainId,
    ) -> Option<ConnectedChannel> {
        self.channels.iter().find_map(|((port, channel), end)| {
            if port != port_id || !end.open || &end.counterparty_chain_id != counterparty_chain_id {
                return None;
            }

            Some(ConnectedChannel {
                port_a: port.clone(),
                channel_id_a: channel.clone(),
                port_b: end.counterparty_port.clone(),
                channel_id_b: end.counterparty_channel.clone()?,
            })
        })
    }

    /**
       Apply the sending side of an ICS-20 transfer and commit the packet.

       A token is escrowed when this chain is its source, and the voucher
       is burned when it is being sent back through the channel it
       arrived from.
    */
    pub fn send_transfer(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sender: &WalletAddress,
        receiver: &WalletAddress,
        token: &Token,
    ) -> Result<Packet, TxRejection> {
        let end = self
            .channels
            .get(&(port_id.clone(), channel_id.clone()))
            .filter(|end| end.open)
            .cloned()
            .ok_or_else(|| TxRejection {
                code: 1,
                log: format!("channel {port_id}/{channel_id} is not open"),
            })?;

        let counterparty_channel = end.counterparty_channel.ok_or_else(|| TxRejection {
            code: 1,
            log: format!("channel {port_id}/{channel_id} has no counterparty"),
        })?;

        if token.amount.is_zero() {
            return Err(TxRejection {
                code: 10,
                log: "invalid coins: amount must be positive".to_string(),
            });
        }

        self.debit(sender, &token.denom, token.amount)?;

        // vouchers going back through their channel are burned
        if !token.denom.has_prefix(port_id, channel_id) {
            self.credit(&escrow_address(port_id, channel_id), &token.denom, token.amount);
        }

        let key = (port_id.clone(), channel_id.clone());
        let sequence = self
            .next_sequences
            .get(&key)
            .copied()
            .unwrap_or(Sequence(1));
        self.next_sequences.insert(key, sequence.increment());

        let packet = Packet {
            sequence,
            source_port: port_id.clone(),
            source_channel: channel_id.clone(),
            destination_port: end.counterparty_port,
            destination_channel: counterparty_channel,
            data: FungibleTokenPacketData {
                denom: token.denom.trace(),
                amount: token.amount,
                sender: sender.to_string(),
                receiver: receiver.to_string(),
                memo: String::new(),
            },
        };

        self.commitments.insert(packet.key(), packet.clone());

        Ok(packet)
    }

    /// Packets sent through the given channel that are not acknowledged.
    pub fn pending_packets(&self, port_id: &PortId, channel_id: &ChannelId) -> Vec<Packet> {
        self.commitments
            .values()
            .filter(|packet| &packet.source_port == port_id && &packet.source_channel == channel_id)
            .cloned()
            .collect()
    }

    pub fn written_ack(&self, packet: &Packet) -> Option<Acknowledgement> {
        self.written_acks.get(&packet.key()).cloned()
    }

    /**
       Apply the receiving side of an ICS-20 transfer and write its
       acknowledgment. Receiving the same packet twice has no effect.

       A token returning through the channel it left from is released
       from escrow. Any other token is minted as a voucher whose trace is
       prefixed with the receiving port and channel.
    */
    pub fn receive_packet(&mut self, packet: &Packet) -> Acknowledgement {
        if let Some(ack) = self.written_acks.get(&packet.key()) {
            return ack.clone();
        }

        let ack = self.apply_receive(packet);
        self.written_acks.insert(packet.key(), ack.clone());

        ack
    }

    fn apply_receive(&mut self, packet: &Packet) -> Acknowledgement {
        let receiver = WalletAddress(packet.data.receiver.clone());
        let amount = packet.data.amount;
        let sent_denom = Denom::from_trace(&packet.data.denom);

        if sent_denom.has_prefix(&packet.source_port, &packet.source_channel) {
            let denom = sent_denom.strip_hop();
            let escrow = escrow_address(&packet.destination_port, &packet.destination_channel);

            match self.debit(&escrow, &denom, amount) {
                Ok(()) => {
                    self.credit(&receiver, &denom, amount);
                    Acknowledgement::Success
                }
                Err(rejection) => Acknowledgement::Error(rejection.log),
            }
        } else {
            let voucher = Denom::from_trace(&format!(
                "{}/{}/{}",
                packet.destination_port, packet.destination_channel, packet.data.denom
            ));

            self.credit(&receiver, &voucher, amount);
            Acknowledgement::Success
        }
    }

    /**
       Process the acknowledgment of a packet sent from this chain. An
       error acknowledgment refunds the sender.
    */
    pub fn acknowledge_packet(&mut self, packet: &Packet, ack: &Acknowledgement) {
        let Some(committed) = self.commitments.remove(&packet.key()) else {
            return;
        };

        if let Acknowledgement::Error(_) = ack {
            self.refund(&committed);
        }

        self.acknowledged.insert(packet.key(), self.height);
    }

    fn refund(&mut self, packet: &Packet) {
        let sender = WalletAddress(packet.data.sender.clone());
        let denom = Denom::from_trace(&packet.data.denom);
        let amount = packet.data.amount;

        if !denom.has_prefix(&packet.source_port, &packet.source_channel) {
            let escrow = escrow_address(&packet.source_port, &packet.source_channel);
            if self.debit(&escrow, &denom, amount).is_err() {
                return;
            }
        }

        self.credit(&sender, &denom, amount);
    }

    pub fn acknowledged_at(&self, packet: &Packet) -> Option<Height> {
        self.acknowledged.get(&packet.key()).copied()
    }
}

/// The module account holding the tokens escrowed on a channel.
pub fn escrow_address(port_id: &PortId, channel_id: &ChannelId) -> WalletAddress {
    WalletAddress(format!("escrow/{port_id}/{channel_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibc::denom::derive_ibc_denom;
    use crate::types::wallet::Wallet;

    const GENESIS: u128 = 2_000_000_000_000;

    fn linked_pair() -> (MockChainState, MockChainState, ConnectedChannel) {
        let spec_a = ChainSpec::new("seda", "seda-1", "aseda").with_wallet(Wallet::new(
            "user",
            "seda1user",
            GENESIS,
        ));
        let spec_b = ChainSpec::new("gaia", "gaia-1", "uatom").with_wallet(Wallet::new(
            "user",
            "cosmos1user",
            GENESIS,
        ));

        let mut a = MockChainState::genesis(&spec_a);
        let mut b = MockChainState::genesis(&spec_b);

        let port = PortId::transfer();

        // give the two chains different channel numbering
        b.init_channel(&port, &ChainId::new("other-1"), &port);

        let channel_a = a.init_channel(&port, &spec_b.chain_id, &port);
        let channel_b = b.init_channel(&port, &spec_a.chain_id, &port);
        a.open_channel(&port, &channel_a, &channel_b).unwrap();
        b.open_channel(&port, &channel_b, &channel_a).unwrap();

        let channel = a.open_channel_to(&port, &spec_b.chain_id).unwrap();

        (a, b, channel)
    }

    fn relay(src: &mut MockChainState, dst: &mut MockChainState, packet: &Packet) {
        let ack = dst.receive_packet(packet);
        src.acknowledge_packet(packet, &ack);
    }

    #[test]
    fn round_trip_restores_balances() {
        let (mut a, mut b, channel) = linked_pair();
        let user_a = WalletAddress("seda1user".into());
        let user_b = WalletAddress("cosmos1user".into());
        let aseda = Denom::base("aseda");

        let packet = a
            .send_transfer(
                &channel.port_a,
                &channel.channel_id_a,
                &user_a,
                &user_b,
                &Token::new(aseda.clone(), 1000u64),
            )
            .unwrap();

        assert_eq!(packet.sequence, Sequence(1));
        assert_eq!(a.balance(&user_a, &aseda), Amount(GENESIS - 1000));

        relay(&mut a, &mut b, &packet);

        let voucher = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &aseda);
        assert_eq!(b.balance(&user_b, &voucher), Amount(1000));
        assert!(a.acknowledged_at(&packet).is_some());

        let back = b
            .send_transfer(
                &channel.port_b,
                &channel.channel_id_b,
                &user_b,
                &user_a,
                &Token::new(voucher.clone(), 1000u64),
            )
            .unwrap();

        assert_eq!(back.data.denom, format!("transfer/{}/aseda", channel.channel_id_b));

        relay(&mut b, &mut a, &back);

        assert_eq!(a.balance(&user_a, &aseda), Amount(GENESIS));
        assert_eq!(b.balance(&user_b, &voucher), Amount(0));
        assert_eq!(
            a.balance(&escrow_address(&channel.port_a, &channel.channel_id_a), &aseda),
            Amount(0)
        );
    }

    #[test]
    fn sequences_increase_per_channel() {
        let (mut a, _, channel) = linked_pair();
        let user_a = WalletAddress("seda1user".into());
        let token = Token::new(Denom::base("aseda"), 1u64);

        let sequences: Vec<Sequence> = (0..3)
            .map(|_| {
                a.send_transfer(
                    &channel.port_a,
                    &channel.channel_id_a,
                    &user_a,
                    &WalletAddress("cosmos1user".into()),
                    &token,
                )
                .unwrap()
                .sequence
            })
            .collect();

        assert_eq!(sequences, vec![Sequence(1), Sequence(2), Sequence(3)]);
    }

    #[test]
    fn insufficient_funds_are_rejected() {
        let (mut a, _, channel) = linked_pair();
        let user_a = WalletAddress("seda1user".into());

        let rejection = a
            .send_transfer(
                &channel.port_a,
                &channel.channel_id_a,
                &user_a,
                &WalletAddress("cosmos1user".into()),
                &Token::new(Denom::base("aseda"), GENESIS + 1),
            )
            .unwrap_err();

        assert_eq!(rejection.code, CODE_INSUFFICIENT_FUNDS);
        assert_eq!(a.balance(&user_a, &Denom::base("aseda")), Amount(GENESIS));
        assert!(a.pending_packets(&channel.port_a, &channel.channel_id_a).is_empty());
    }

    #[test]
    fn receiving_twice_credits_once() {
        let (mut a, mut b, channel) = linked_pair();

        let packet = a
            .send_transfer(
                &channel.port_a,
                &channel.channel_id_a,
                &WalletAddress("seda1user".into()),
                &WalletAddress("cosmos1user".into()),
                &Token::new(Denom::base("aseda"), 500u64),
            )
            .unwrap();

        b.receive_packet(&packet);
        b.receive_packet(&packet);

        let voucher = derive_ibc_denom(&channel.port_b, &channel.channel_id_b, &Denom::base("aseda"));
        assert_eq!(b.balance(&WalletAddress("cosmos1user".into()), &voucher), Amount(500));
    }
}
