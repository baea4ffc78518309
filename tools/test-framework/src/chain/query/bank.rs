use serde::de::Error as _;
use serde::Deserialize;

use super::RestClient;
use crate::error::Error;
use crate::ibc::denom::Denom;
use crate::types::amount::Amount;
use crate::types::wallet::WalletAddress;

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Option<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

/**
   Query the balance of `address` in `denom`. An account that never held
   the denomination has a zero balance.

   A coin of any other denomination in the response is a decode error.
*/
pub fn query_balance(
    client: &RestClient,
    address: &WalletAddress,
    denom: &Denom,
) -> Result<Amount, Error> {
    let path = format!("/cosmos/bank/v1beta1/balances/{address}/by_denom");

    let response: BalanceResponse = client.get_json(&path, &[("denom", denom.as_str())])?;

    match response.balance {
        None => Ok(Amount::zero()),
        Some(coin) if coin.denom == denom.as_str() => Ok(coin.amount),
        Some(coin) => Err(Error::query_decode(
            format!("{}{}", client.base_url(), path),
            serde_json::Error::custom(format!(
                "balance is in denom {}, requested {}",
                coin.denom, denom
            )),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::query::test_server::serve_once;
    use crate::error::ErrorDetail;

    #[test]
    fn parses_balance() {
        let client = serve_once(
            "200 OK",
            r#"{"balance": {"denom": "aseda", "amount": "1999999999000"}}"#,
        );

        let balance = query_balance(
            &client,
            &WalletAddress("seda1user".into()),
            &Denom::base("aseda"),
        )
        .unwrap();

        assert_eq!(balance, Amount(1_999_999_999_000));
    }

    #[test]
    fn balance_in_other_denom_is_a_decode_error() {
        let client = serve_once(
            "200 OK",
            r#"{"balance": {"denom": "uatom", "amount": "1000"}}"#,
        );

        let err = query_balance(
            &client,
            &WalletAddress("seda1user".into()),
            &Denom::base("aseda"),
        )
        .unwrap_err();

        assert!(matches!(err.detail(), ErrorDetail::QueryDecode(_)));
    }
}
