/*!
   CosmWasm contract lifecycle through the chain command line.
*/

use super::{broadcast_tx, query_json};
use crate::chain::query::tx::TxResponse;
use crate::error::Error;
use crate::types::topology::ChainSpec;
use crate::types::wallet::Wallet;

pub fn store_wasm_contract(
    spec: &ChainSpec,
    sender: &Wallet,
    wasm_file: &str,
) -> Result<TxResponse, Error> {
    broadcast_tx(
        spec,
        sender.id.as_str(),
        &[
            "wasm",
            "store",
            wasm_file,
            "--gas",
            "auto",
            "--gas-adjustment",
            "1.3",
        ],
    )
}

pub fn instantiate_wasm_contract(
    spec: &ChainSpec,
    sender: &Wallet,
    code_id: u64,
    label: &str,
    init_msg: &str,
) -> Result<TxResponse, Error> {
    let code_id = code_id.to_string();

    broadcast_tx(
        spec,
        sender.id.as_str(),
        &[
            "wasm",
            "instantiate",
            &code_id,
            init_msg,
            "--label",
            label,
            "--no-admin",
            "--gas",
            "auto",
            "--gas-adjustment",
            "1.3",
        ],
    )
}

pub fn execute_wasm_contract(
    spec: &ChainSpec,
    sender: &Wallet,
    contract: &str,
    msg: &str,
) -> Result<TxResponse, Error> {
    broadcast_tx(
        spec,
        sender.id.as_str(),
        &[
            "wasm",
            "execute",
            contract,
            msg,
            "--gas",
            "auto",
            "--gas-adjustment",
            "1.3",
        ],
    )
}

/**
   Run a smart query against `contract` and return the `data` field of
   the response.
*/
pub fn smart_query_contract(
    spec: &ChainSpec,
    contract: &str,
    query: &str,
) -> Result<serde_json::Value, Error> {
    let mut output = query_json(spec, &["wasm", "contract-state", "smart", contract, query])?;

    Ok(output
        .get_mut("data")
        .map(serde_json::Value::take)
        .unwrap_or(output))
}
