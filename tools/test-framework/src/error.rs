/*!
   Error type used for the conformance tests.

   Every failure aborts the running scenario and is reported with the
   context of the step that failed. The only errors that are swallowed
   are those raised while tearing down a topology, which are logged
   instead so that they never mask the primary failure.
*/

use std::io::{Error as IoError, ErrorKind as IoErrorKind};

use eyre::Report;
use flex_error::{define_error, TraceError};

define_error! {
    Error {
        Generic
            [ TraceError<Report> ]
            | _ | { "generic error" },

        Io
            [ TraceError<IoError> ]
            | _ | { "io error"},

        CommandNotFound
            { command: String }
            [ TraceError<IoError> ]
            | e | { format_args!("failed to execute command: {}. make sure it is available in $PATH", e.command) },

        Config
            [ TraceError<toml::de::Error> ]
            | _ | { "invalid topology configuration" },

        Infrastructure
            { reason: String }
            | e | { format_args!("failed to bring up test infrastructure: {}", e.reason) },

        TransferSubmit
            {
                chain_id: String,
                tx_hash: String,
                code: u32,
                log: String,
            }
            | e | {
                format_args!("transfer transaction {} on chain {} was rejected with code {}: {}",
                    e.tx_hash, e.chain_id, e.code, e.log)
            },

        AckTimeout
            {
                chain_id: String,
                sequence: u64,
                start_height: u64,
                end_height: u64,
                last_height: u64,
            }
            | e | {
                format_args!("no acknowledgment for packet sequence {} on chain {} within heights [{}, {}], last seen height {}",
                    e.sequence, e.chain_id, e.start_height, e.end_height, e.last_height)
            },

        BalanceMismatch
            {
                account: String,
                denom: String,
                expected: u128,
                observed: u128,
            }
            | e | {
                format_args!("balance of account {} in denom {} is {}, expected {}",
                    e.account, e.denom, e.observed, e.expected)
            },

        QueryStatus
            { url: String, status: u16 }
            | e | { format_args!("query to {} returned non-200 status: {}", e.url, e.status) },

        QueryRequest
            { url: String }
            [ TraceError<reqwest::Error> ]
            | e | { format_args!("failed to execute HTTP request to {}", e.url) },

        QueryDecode
            { url: String }
            [ TraceError<serde_json::Error> ]
            | e | { format_args!("failed to decode response body from {}", e.url) },

        TxFailed
            { tx_hash: String, code: u32 }
            | e | { format_args!("tx {} failed with status code {}", e.tx_hash, e.code) },

        MissingEvent
            { tx_hash: String, event: String }
            | e | { format_args!("tx {} does not contain a `{}` event", e.tx_hash, e.event) },

        UnknownChain
            { chain_id: String }
            | e | { format_args!("chain {} is not part of the topology", e.chain_id) },

        UnknownPath
            { path: String }
            | e | { format_args!("path {} has not been linked", e.path) },

        PoisonedMutex
            | _ | { "mutex is poisoned" },

        Assertion
            { message: String }
            | e | { format_args!("assertion failure: {}", e.message) },
    }
}

impl Error {
    /// Whether this is an [`AckTimeout`](ErrorDetail::AckTimeout) error.
    pub fn is_ack_timeout(&self) -> bool {
        matches!(self.detail(), ErrorDetail::AckTimeout(_))
    }

    /// Whether this is a [`BalanceMismatch`](ErrorDetail::BalanceMismatch) error.
    pub fn is_balance_mismatch(&self) -> bool {
        matches!(self.detail(), ErrorDetail::BalanceMismatch(_))
    }

    /// Whether this is a [`TransferSubmit`](ErrorDetail::TransferSubmit) error.
    pub fn is_transfer_submit(&self) -> bool {
        matches!(self.detail(), ErrorDetail::TransferSubmit(_))
    }

    /// Whether this error is one of the REST query failures.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self.detail(),
            ErrorDetail::QueryStatus(_) | ErrorDetail::QueryRequest(_) | ErrorDetail::QueryDecode(_)
        )
    }
}

pub fn handle_generic_error(e: impl Into<Report>) -> Error {
    Error::generic(e.into())
}

pub fn handle_exec_error(command: &str) -> impl FnOnce(IoError) -> Error + '_ {
    |e| match e.kind() {
        IoErrorKind::NotFound => Error::command_not_found(command.to_string(), e),
        _ => Error::io(e),
    }
}

impl From<Report> for Error {
    fn from(e: Report) -> Self {
        Error::generic(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::config(e)
    }
}
