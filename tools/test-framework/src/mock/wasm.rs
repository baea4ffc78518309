/*!
   An emulation of the CosmWasm counter template contract, so that the
   contract lifecycle can be exercised against the mock backend.
*/

use std::collections::BTreeMap;

use eyre::eyre;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::error::{handle_generic_error, Error};

#[derive(Debug, Deserialize)]
struct InstantiateMsg {
    count: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExecuteMsg {
    Increment {},
    Reset { count: i32 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum QueryMsg {
    GetCount {},
}

#[derive(Debug, Default)]
pub struct MockWasmState {
    codes: BTreeMap<u64, String>,
    contracts: BTreeMap<String, CounterContract>,
}

#[derive(Debug)]
struct CounterContract {
    code_id: u64,
    count: i32,
}

impl MockWasmState {
    pub fn store_code(&mut self, wasm_file: &str) -> u64 {
        let code_id = self.codes.len() as u64 + 1;
        self.codes.insert(code_id, wasm_file.to_string());
        code_id
    }

    pub fn instantiate(&mut self, code_id: u64, label: &str, init_msg: &str) -> Result<String, Error> {
        if !self.codes.contains_key(&code_id) {
            return Err(Error::generic(eyre!("no wasm code with id {}", code_id)));
        }

        let msg: InstantiateMsg = serde_json::from_str(init_msg).map_err(handle_generic_error)?;

        let address = format!("wasm1{}{}", label, self.contracts.len() + 1);
        self.contracts.insert(
            address.clone(),
            CounterContract {
                code_id,
                count: msg.count,
            },
        );

        Ok(address)
    }

    pub fn execute(&mut self, contract: &str, msg: &str) -> Result<(), Error> {
        let contract = self.contract_mut(contract)?;
        let msg: ExecuteMsg = serde_json::from_str(msg).map_err(handle_generic_error)?;

        match msg {
            ExecuteMsg::Increment {} => contract.count += 1,
            ExecuteMsg::Reset { count } => contract.count = count,
        }

        Ok(())
    }

    pub fn query(&self, contract: &str, query: &str) -> Result<JsonValue, Error> {
        let contract = self
            .contracts
            .get(contract)
            .ok_or_else(|| Error::generic(eyre!("no contract at address {}", contract)))?;

        let query: QueryMsg = serde_json::from_str(query).map_err(handle_generic_error)?;

        match query {
            QueryMsg::GetCount {} => Ok(json!({ "count": contract.count })),
        }
    }

    pub fn code_id_of(&self, contract: &str) -> Option<u64> {
        self.contracts.get(contract).map(|c| c.code_id)
    }

    fn contract_mut(&mut self, contract: &str) -> Result<&mut CounterContract, Error> {
        self.contracts
            .get_mut(contract)
            .ok_or_else(|| Error::generic(eyre!("no contract at address {}", contract)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_lifecycle() {
        let mut state = MockWasmState::default();

        let code_id = state.store_code("counter.wasm");
        let contract = state.instantiate(code_id, "counter", r#"{"count":0}"#).unwrap();

        state.execute(&contract, r#"{"increment":{}}"#).unwrap();

        assert_eq!(
            state.query(&contract, r#"{"get_count":{}}"#).unwrap(),
            json!({ "count": 1 })
        );
        assert_eq!(state.code_id_of(&contract), Some(code_id));

        state.execute(&contract, r#"{"reset":{"count":7}}"#).unwrap();
        assert_eq!(
            state.query(&contract, r#"{"get_count":{}}"#).unwrap()["count"],
            7
        );
    }

    #[test]
    fn unknown_message_is_rejected() {
        let mut state = MockWasmState::default();
        let code_id = state.store_code("counter.wasm");
        let contract = state.instantiate(code_id, "counter", r#"{"count":0}"#).unwrap();

        assert!(state.execute(&contract, r#"{"decrement":{}}"#).is_err());
        assert!(state.instantiate(99, "counter", r#"{"count":0}"#).is_err());
    }
}
