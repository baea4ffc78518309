/*!
   Bounded retries for readiness checks.
*/

use core::time::Duration;
use eyre::eyre;
use std::thread::sleep;
use tracing::trace;

use crate::error::Error;

/**
   Run `task` until it succeeds, at most `attempts` times, sleeping
   `interval` between two attempts.

   Only meant for eventual readiness (a node answering queries, a tx
   being included, a channel becoming open). Balance checks and
   acknowledgment polling are never retried this way.
*/
pub fn assert_eventually_succeed<R>(
    task_name: &str,
    attempts: u16,
    interval: Duration,
    mut task: impl FnMut() -> Result<R, Error>,
) -> Result<R, Error> {
    let mut last_error = None;

    for attempt in 1..=attempts {
        match task() {
            Ok(res) => return Ok(res),
            Err(e) => {
                trace!(
                    "attempt {}/{} of task `{}` failed: {}",
                    attempt,
                    attempts,
                    task_name,
                    e
                );
                last_error = Some(e);

                if attempt < attempts {
                    sleep(interval);
                }
            }
        }
    }

    Err(Error::generic(match last_error {
        Some(e) => eyre!(
            "task `{}` did not succeed after {} attempts, last error: {}",
            task_name,
            attempts,
            e
        ),
        None => eyre!("task `{}` was given no attempts", task_name),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_on_later_attempt() {
        let mut calls = 0;

        let result = assert_eventually_succeed("count", 5, Duration::from_millis(1), || {
            calls += 1;
            if calls < 3 {
                Err(Error::assertion("not yet".into()))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_attempts() {
        let mut calls = 0;

        let result: Result<(), Error> =
            assert_eventually_succeed("never", 4, Duration::from_millis(1), || {
                calls += 1;
                Err(Error::assertion("never".into()))
            });

        assert!(result.is_err());
        assert_eq!(calls, 4);
    }
}
