/*!
   Queries of the `wasm-storage` module registry.
*/

use serde::Deserialize;

use super::RestClient;
use crate::error::Error;

const WASM_STORAGE_PREFIX: &str = "/seda-chain/wasm-storage";

#[derive(Debug, Clone, Deserialize)]
pub struct WasmResponse {
    pub wasm: Wasm,
}

/// A stored Wasm binary. The bytecode is base64 encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Wasm {
    pub hash: String,

    #[serde(default)]
    pub bytecode: String,

    #[serde(default)]
    pub wasm_type: String,

    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WasmListResponse {
    #[serde(default)]
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyContractRegistryResponse {
    pub address: String,
}

pub fn query_data_request_wasm(client: &RestClient, hash: &str) -> Result<Wasm, Error> {
    let response: WasmResponse = client.get_json(
        &format!("{WASM_STORAGE_PREFIX}/data_request_wasm/{hash}"),
        &[],
    )?;

    Ok(response.wasm)
}

pub fn query_overlay_wasm(client: &RestClient, hash: &str) -> Result<Wasm, Error> {
    let response: WasmResponse =
        client.get_json(&format!("{WASM_STORAGE_PREFIX}/overlay_wasm/{hash}"), &[])?;

    Ok(response.wasm)
}

pub fn query_data_request_wasms(client: &RestClient) -> Result<Vec<String>, Error> {
    let response: WasmListResponse =
        client.get_json(&format!("{WASM_STORAGE_PREFIX}/data_request_wasms"), &[])?;

    Ok(response.list)
}

pub fn query_overlay_wasms(client: &RestClient) -> Result<Vec<String>, Error> {
    let response: WasmListResponse =
        client.get_json(&format!("{WASM_STORAGE_PREFIX}/overlay_wasms"), &[])?;

    Ok(response.list)
}

pub fn query_proxy_contract_registry(client: &RestClient) -> Result<String, Error> {
    let response: ProxyContractRegistryResponse =
        client.get_json(&format!("{WASM_STORAGE_PREFIX}/proxy_contract_registry"), &[])?;

    Ok(response.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::query::test_server::serve_once;

    #[test]
    fn parses_data_request_wasm() {
        let client = serve_once(
            "200 OK",
            r#"{"wasm": {"hash": "a1b2", "bytecode": "AGFzbQ==", "wasm_type": "WASM_TYPE_DATA_REQUEST", "added_at": "2024-01-01T00:00:00Z"}}"#,
        );

        let wasm = query_data_request_wasm(&client, "a1b2").unwrap();

        assert_eq!(wasm.hash, "a1b2");
        assert_eq!(wasm.wasm_type, "WASM_TYPE_DATA_REQUEST");
    }

    #[test]
    fn parses_wasm_listing() {
        let client = serve_once("200 OK", r#"{"list": ["a1b2,WASM_TYPE_OVERLAY"]}"#);

        let list = query_overlay_wasms(&client).unwrap();

        assert_eq!(list, vec!["a1b2,WASM_TYPE_OVERLAY".to_string()]);
    }

    #[test]
    fn missing_wasm_is_a_query_error() {
        let client = serve_once("404 Not Found", r#"{"code": 5}"#);

        assert!(query_overlay_wasm(&client, "ffff")
            .unwrap_err()
            .is_query_error());
    }
}
