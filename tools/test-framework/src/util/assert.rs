/*!
   Assertions returning [`Error`] instead of panicking, so that a failing
   check goes through the same teardown path as any other failure.
*/

use core::fmt::{self, Debug, Display};

use crate::chain::handle::ChainHandle;
use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::types::amount::Amount;
use crate::types::wallet::WalletAddress;

/**
   The balance of one account in one denomination, as observed at some
   point of a test.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub account: WalletAddress,
    pub denom: Denom,
    pub amount: Amount,
}

/// The expected change of a balance between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDelta {
    Credit(Amount),
    Debit(Amount),
}

impl BalanceSnapshot {
    pub fn query<Chain: ChainHandle>(
        chain: &Chain,
        account: &WalletAddress,
        denom: &Denom,
    ) -> Result<Self, Error> {
        let amount = chain.query_balance(account, denom)?;

        Ok(Self {
            account: account.clone(),
            denom: denom.clone(),
            amount,
        })
    }
}

impl Display for BalanceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} holds {}{}", self.account, self.amount, self.denom)
    }
}

pub fn assert_balance_eq(observed: &BalanceSnapshot, expected: impl Into<Amount>) -> Result<(), Error> {
    let expected = expected.into();

    if observed.amount == expected {
        Ok(())
    } else {
        Err(Error::balance_mismatch(
            observed.account.to_string(),
            observed.denom.to_string(),
            expected.0,
            observed.amount.0,
        ))
    }
}

/**
   Check that `after` differs from `before` by exactly `delta`.

   Both snapshots must be of the same account and denomination. A debit
   larger than the balance before, or a credit past the largest amount,
   can never be satisfied and is an assertion error whatever `after` is.
*/
pub fn assert_balance_delta(
    before: &BalanceSnapshot,
    after: &BalanceSnapshot,
    delta: BalanceDelta,
) -> Result<(), Error> {
    if before.account != after.account || before.denom != after.denom {
        return Err(Error::assertion(format!(
            "cannot compare balance snapshots of different accounts or denoms: ({before}) and ({after})"
        )));
    }

    let expected = match delta {
        BalanceDelta::Credit(amount) => before.amount.checked_add(amount),
        BalanceDelta::Debit(amount) => before.amount.checked_sub(amount),
    }
    .ok_or_else(|| {
        Error::assertion(format!(
            "{delta:?} cannot be applied to balance snapshot ({before})"
        ))
    })?;

    assert_balance_eq(after, expected)
}

pub fn assert_eq<T: Eq + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left == right {
        Ok(())
    } else {
        Err(Error::assertion(format!(
            "{message}: expected {left:?} to equal {right:?}"
        )))
    }
}

pub fn assert_not_eq<T: Eq + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left != right {
        Ok(())
    } else {
        Err(Error::assertion(format!(
            "{message}: expected {left:?} to differ from {right:?}"
        )))
    }
}

pub fn assert_gt<T: Ord + Debug>(message: &str, left: &T, right: &T) -> Result<(), Error> {
    if left > right {
        Ok(())
    } else {
        Err(Error::assertion(format!(
            "{message}: expected {left:?} to be greater than {right:?}"
        )))
    }
}

pub fn assert_err<T: Debug, E: Debug>(message: &str, result: Result<T, E>) -> Result<(), Error> {
    match result {
        Err(_) => Ok(()),
        Ok(value) => Err(Error::assertion(format!(
            "{message}: expected an error, got Ok({value:?})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorDetail;

    fn snapshot(account: &str, denom: &str, amount: u128) -> BalanceSnapshot {
        BalanceSnapshot {
            account: WalletAddress(account.to_string()),
            denom: Denom::base(denom),
            amount: Amount(amount),
        }
    }

    #[test]
    fn exact_balance_passes() {
        assert!(assert_balance_eq(&snapshot("seda1a", "aseda", 1000), 1000u64).is_ok());
    }

    #[test]
    fn mismatch_reports_context() {
        let err = assert_balance_eq(&snapshot("seda1a", "aseda", 999), 1000u64).unwrap_err();

        match err.detail() {
            ErrorDetail::BalanceMismatch(e) => {
                assert_eq!(e.account, "seda1a");
                assert_eq!(e.denom, "aseda");
                assert_eq!(e.expected, 1000);
                assert_eq!(e.observed, 999);
            }
            other => panic!("expected balance mismatch, got {other:?}"),
        }
    }

    #[test]
    fn debit_is_exact() {
        let before = snapshot("seda1a", "aseda", 2_000_000_000_000);
        let after = snapshot("seda1a", "aseda", 1_999_999_999_000);

        assert!(assert_balance_delta(&before, &after, BalanceDelta::Debit(Amount(1000))).is_ok());
        assert!(
            assert_balance_delta(&before, &after, BalanceDelta::Debit(Amount(999)))
                .unwrap_err()
                .is_balance_mismatch()
        );
    }

    #[test]
    fn credit_is_exact() {
        let before = snapshot("cosmos1b", "uatom", 0);
        let after = snapshot("cosmos1b", "uatom", 1000);

        assert!(assert_balance_delta(&before, &after, BalanceDelta::Credit(Amount(1000))).is_ok());
    }

    #[test]
    fn debit_beyond_balance_never_passes() {
        let before = snapshot("seda1a", "aseda", 500);
        let after = snapshot("seda1a", "aseda", 0);

        let err =
            assert_balance_delta(&before, &after, BalanceDelta::Debit(Amount(1000))).unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::Assertion(_)));
    }

    #[test]
    fn overflowing_credit_never_passes() {
        let before = snapshot("cosmos1b", "uatom", u128::MAX);
        let after = snapshot("cosmos1b", "uatom", 0);

        let err =
            assert_balance_delta(&before, &after, BalanceDelta::Credit(Amount(1))).unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::Assertion(_)));
    }

    #[test]
    fn delta_across_accounts_is_an_assertion_error() {
        let before = snapshot("seda1a", "aseda", 10);
        let after = snapshot("seda1b", "aseda", 10);

        let err =
            assert_balance_delta(&before, &after, BalanceDelta::Credit(Amount(0))).unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::Assertion(_)));
    }
}
