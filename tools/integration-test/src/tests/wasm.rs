//! Lifecycle of the CosmWasm counter template contract: store, instantiate,
//! execute and query.

use ibc_conformance_framework::mock::chain::DEFAULT_BLOCK_TIME;
use ibc_conformance_framework::prelude::*;
use serde_json::json;

use crate::topology::{seda_gaia_topology, GENESIS_AMOUNT};

/**
   Store the counter contract found at `wasm_file`, instantiate it with a
   count of zero, increment it once and check that the count is one.
*/
pub fn run_counter_conformance<Chain: WasmChainHandle>(
    chain: &Chain,
    sender: &Wallet,
    wasm_file: &str,
) -> Result<(), Error> {
    let code_id = chain.store_wasm_code(sender, wasm_file)?;

    info!("stored counter contract on {} with code id {}", chain.chain_id(), code_id);

    let contract = chain.instantiate_contract(sender, code_id, "counter", r#"{"count":0}"#)?;

    let response = chain.smart_query(&contract, r#"{"get_count":{}}"#)?;
    assert_eq("count after instantiation", &response["count"], &json!(0))?;

    chain.execute_contract(sender, &contract, r#"{"increment":{}}"#, None)?;

    let response = chain.smart_query(&contract, r#"{"get_count":{}}"#)?;
    assert_eq("count after increment", &response["count"], &json!(1))
}

#[test]
fn test_counter_contract_on_mock_chain() -> Result<(), Error> {
    run_basic_test(&MockCounterTest)
}

pub struct MockCounterTest;

impl TestOverrides for MockCounterTest {}

impl BasicTest for MockCounterTest {
    fn run(&self, _config: &TestConfig) -> Result<(), Error> {
        let spec = seda_gaia_topology(GENESIS_AMOUNT)
            .chains
            .into_iter()
            .next()
            .ok_or_else(|| Error::assertion("topology has no chain".to_string()))?;

        let chain = MockChain::start(spec, DEFAULT_BLOCK_TIME);

        let sender = chain
            .spec()
            .wallets
            .first()
            .cloned()
            .ok_or_else(|| Error::assertion("chain has no user".to_string()))?;

        let result = run_counter_conformance(&chain, &sender, "cw_counter.wasm");

        chain.shutdown()?;

        result
    }
}
