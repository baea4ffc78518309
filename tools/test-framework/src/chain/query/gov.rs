use serde::Deserialize;

use super::RestClient;
use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct ProposalResponse {
    pub proposal: Proposal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Proposal {
    pub id: String,

    pub status: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

impl Proposal {
    pub fn is_passed(&self) -> bool {
        self.status == "PROPOSAL_STATUS_PASSED"
    }
}

pub fn query_gov_proposal(client: &RestClient, proposal_id: u64) -> Result<Proposal, Error> {
    let response: ProposalResponse =
        client.get_json(&format!("/cosmos/gov/v1/proposals/{proposal_id}"), &[])?;

    Ok(response.proposal)
}
