/*!
   Polling of chain state bounded by a window of block heights.

   The relayer runs independently of the test, so the only way to
   observe its progress is to query the chains until the expected state
   shows up. Polling is bounded by a block height rather than by wall
   clock time, so that slow block production does not fail a test
   early.
*/

use core::time::Duration;
use eyre::eyre;
use std::thread::sleep;
use tracing::{debug, trace};

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::ibc::packet::Packet;
use crate::types::id::Height;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The predicate was satisfied at `height`.
    Ready { value: T, height: Height },

    /// `max_height` was reached without the predicate being satisfied.
    Expired { last_height: Height },
}

/**
   Alternate between querying the current height and evaluating
   `predicate`, sleeping `interval` between two rounds.

   Returns [`PollOutcome::Ready`] as soon as the predicate yields a
   value, and [`PollOutcome::Expired`] once the observed height reaches
   `max_height` without it. Query errors abort the polling.
*/
pub fn poll_until<T>(
    mut query_height: impl FnMut() -> Result<Height, Error>,
    mut predicate: impl FnMut() -> Result<Option<T>, Error>,
    max_height: Height,
    interval: Duration,
) -> Result<PollOutcome<T>, Error> {
    loop {
        let height = query_height()?;

        if let Some(value) = predicate()? {
            return Ok(PollOutcome::Ready { value, height });
        }

        if height >= max_height {
            return Ok(PollOutcome::Expired {
                last_height: height,
            });
        }

        trace!("polling at height {}, window ends at {}", height, max_height);

        sleep(interval);
    }
}

/**
   Wait until `chain` has processed the acknowledgment of `packet`,
   which must have been sent from `chain`, within heights
   `[start_height, end_height]`.

   Returns the height at which the acknowledgment was observed.
*/
pub fn poll_for_ack<Chain: ChainHandle>(
    chain: &Chain,
    packet: &Packet,
    start_height: Height,
    end_height: Height,
    interval: Duration,
) -> Result<Height, Error> {
    debug!(
        "waiting for acknowledgment of packet {} on chain {} until height {}",
        packet,
        chain.chain_id(),
        end_height
    );

    let outcome = poll_until(
        || chain.query_latest_height(),
        || Ok(chain.query_packet_acknowledged(packet)?.then_some(())),
        end_height,
        interval,
    )?;

    match outcome {
        PollOutcome::Ready { height, .. } => {
            debug!(
                "packet {} acknowledged on chain {} at height {}",
                packet.sequence,
                chain.chain_id(),
                height
            );

            Ok(height)
        }
        PollOutcome::Expired { last_height } => Err(Error::ack_timeout(
            chain.chain_id().to_string(),
            packet.sequence.0,
            start_height.value(),
            end_height.value(),
            last_height.value(),
        )),
    }
}

/**
   Block until `chain` has advanced by `delta` blocks, checking at most
   `max_attempts` times.
*/
pub fn wait_for_blocks<Chain: ChainHandle>(
    chain: &Chain,
    delta: u64,
    interval: Duration,
    max_attempts: u16,
) -> Result<Height, Error> {
    let start = chain.query_latest_height()?;
    let target = start.add(delta);

    trace!(
        "waiting for chain {} to reach height {}",
        chain.chain_id(),
        target
    );

    for _ in 0..max_attempts {
        let height = chain.query_latest_height()?;
        if height >= target {
            return Ok(height);
        }

        sleep(interval);
    }

    Err(Error::generic(eyre!(
        "chain {} did not advance {} blocks from height {} after {} attempts",
        chain.chain_id(),
        delta,
        start,
        max_attempts
    )))
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(1);

    #[test]
    fn ready_on_first_satisfied_predicate() {
        let height = Cell::new(10);

        let outcome = poll_until(
            || {
                height.set(height.get() + 1);
                Ok(Height(height.get()))
            },
            || Ok((height.get() == 13).then_some("acked")),
            Height(20),
            INTERVAL,
        )
        .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Ready {
                value: "acked",
                height: Height(13)
            }
        );
    }

    #[test]
    fn expires_when_window_is_reached() {
        let height = Cell::new(0);

        let outcome: PollOutcome<()> = poll_until(
            || {
                height.set(height.get() + 2);
                Ok(Height(height.get()))
            },
            || Ok(None),
            Height(7),
            INTERVAL,
        )
        .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Expired {
                last_height: Height(8)
            }
        );
    }

    #[test]
    fn query_errors_propagate() {
        let result: Result<PollOutcome<()>, Error> = poll_until(
            || Err(Error::query_status("http://localhost/".into(), 500)),
            || Ok(None),
            Height(7),
            INTERVAL,
        );

        assert!(result.unwrap_err().is_query_error());
    }
}
