/*!
   Wrappers around the chain command line for the transactions that
   cannot be submitted through the REST API.

   Every transaction is broadcast in sync mode with `--output json`, so
   the returned [`TxResponse`] only reports the result of `CheckTx`. The
   caller is expected to wait for the transaction to be committed with
   [`query_tx`](crate::chain::query::tx::query_tx).
*/

pub mod transfer;
pub mod wasm;

use crate::chain::exec::simple_exec;
use crate::chain::query::tx::TxResponse;
use crate::error::{handle_generic_error, Error};
use crate::types::topology::ChainSpec;

/**
   Run `tx <args>` signed by the key `from`, and decode the broadcast
   response.
*/
pub fn broadcast_tx(spec: &ChainSpec, from: &str, args: &[&str]) -> Result<TxResponse, Error> {
    let home_path = spec.home_path.to_string_lossy().to_string();
    let gas_prices = spec.gas_prices();

    let mut full_args = vec!["tx"];
    full_args.extend_from_slice(args);
    full_args.extend_from_slice(&[
        "--from",
        from,
        "--chain-id",
        spec.chain_id.as_str(),
        "--home",
        home_path.as_str(),
        "--node",
        spec.rpc_address.as_str(),
        "--keyring-backend",
        "test",
        "--output",
        "json",
        "--yes",
    ]);

    match &spec.fees {
        Some(fees) => full_args.extend_from_slice(&["--fees", fees.as_str()]),
        None => full_args.extend_from_slice(&["--gas-prices", gas_prices.as_str()]),
    }

    let output = simple_exec(spec.chain_id.as_str(), &spec.command_path, &full_args)?;

    parse_broadcast(&output.stdout)
}

/**
   Run `query <args>` against the node and decode the JSON output.
*/
pub fn query_json(spec: &ChainSpec, args: &[&str]) -> Result<serde_json::Value, Error> {
    let mut full_args = vec!["query"];
    full_args.extend_from_slice(args);
    full_args.extend_from_slice(&["--node", spec.rpc_address.as_str(), "--output", "json"]);

    let output = simple_exec(spec.chain_id.as_str(), &spec.command_path, &full_args)?;

    serde_json::from_str(&output.stdout).map_err(handle_generic_error)
}

/**
   Some versions of the SDK print a gas estimate line before the JSON
   body, so only the last line of the output is decoded.
*/
fn parse_broadcast(stdout: &str) -> Result<TxResponse, Error> {
    let body = stdout
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with('{'))
        .unwrap_or(stdout);

    serde_json::from_str(body).map_err(handle_generic_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_broadcast_after_gas_estimate() {
        let stdout = "gas estimate: 91042\n{\"height\":\"0\",\"txhash\":\"AB12\",\"code\":0,\"raw_log\":\"[]\"}\n";

        let response = parse_broadcast(stdout).unwrap();

        assert_eq!(response.txhash, "AB12");
        assert_eq!(response.code, 0);
    }

    #[test]
    fn parses_rejected_broadcast() {
        let stdout = r#"{"height":"0","txhash":"CD34","codespace":"sdk","code":5,"raw_log":"insufficient funds"}"#;

        let response = parse_broadcast(stdout).unwrap();

        assert_eq!(response.code, 5);
        assert_eq!(response.raw_log, "insufficient funds");
    }
}
