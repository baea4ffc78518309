use serde::Deserialize;

use super::RestClient;
use crate::error::{handle_generic_error, Error};
use crate::types::id::Height;

#[derive(Debug, Deserialize)]
struct LatestBlockResponse {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct Block {
    header: Header,
}

#[derive(Debug, Deserialize)]
struct Header {
    height: String,
}

pub fn query_latest_height(client: &RestClient) -> Result<Height, Error> {
    let response: LatestBlockResponse =
        client.get_json("/cosmos/base/tendermint/v1beta1/blocks/latest", &[])?;

    let height = response
        .block
        .header
        .height
        .parse::<u64>()
        .map_err(handle_generic_error)?;

    Ok(Height(height))
}
