/*!
   Helper functions for deriving IBC denom.
*/

use core::fmt::{self, Display};
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use crate::types::id::{ChannelId, PortId};

/**
   A denomination, either native to a chain or a voucher for a token
   that was transferred from another chain via IBC.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Denom {
    Base(String),
    Ibc {
        /// The trace of `port/channel` hops, most recent hop first.
        path: String,
        /// The denomination on the chain the token originates from.
        base: String,
        /// The `ibc/<HASH>` denomination used by the bank module.
        hashed: String,
    },
}

/**
   Derives the denom on `ChainB` based on a denom on `ChainA` that has been
   transferred to `ChainB` via IBC.

   Accepts the following arguments:

   - A `PortId` on `ChainB` that corresponds to a channel connected
     to `ChainA`.

   - A `ChannelId` on `ChainB` that corresponds to a channel connected
     to `ChainA`.

   - The original denomination on `ChainA`.

   Returns the derived denomination on `ChainB`. The function is pure:
   the same arguments always yield the same denomination.
*/
pub fn derive_ibc_denom(port_id: &PortId, channel_id: &ChannelId, denom: &Denom) -> Denom {
    match denom {
        Denom::Base(base) => {
            let path = format!("{port_id}/{channel_id}");
            let hashed = hash_denom_trace(&format!("{path}/{base}"));

            Denom::Ibc {
                path,
                base: base.clone(),
                hashed,
            }
        }
        Denom::Ibc { path, base, .. } => {
            let new_path = format!("{port_id}/{channel_id}/{path}");
            let hashed = hash_denom_trace(&format!("{new_path}/{base}"));

            Denom::Ibc {
                path: new_path,
                base: base.clone(),
                hashed,
            }
        }
    }
}

/// Derive the transferred token denomination using
/// <https://github.com/cosmos/ibc-go/blob/main/docs/architecture/adr-001-coin-source-tracing.md>
fn hash_denom_trace(trace: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(trace.as_bytes());

    let denom_bytes = hasher.finalize();
    let denom_hex = String::from_utf8_lossy(&hex::encode_upper(denom_bytes)).into_owned();

    format!("ibc/{denom_hex}")
}

impl Denom {
    pub fn base(denom: &str) -> Self {
        Denom::Base(denom.to_string())
    }

    /**
       Parse a full denom trace such as `transfer/channel-0/aseda`, as
       carried in the packet data of an ICS-20 transfer.

       Port and channel identifiers come in pairs; the last segment that
       does not form a complete pair is the base denomination. A trace
       without a base denomination is kept whole as a base denomination.
    */
    pub fn from_trace(trace: &str) -> Self {
        let segments: Vec<&str> = trace.split('/').collect();

        let mut hops = 0;
        while hops * 2 + 1 < segments.len() && segments[hops * 2 + 1].starts_with("channel-") {
            hops += 1;
        }

        let base = segments[hops * 2..].join("/");

        if hops == 0 || base.is_empty() {
            return Denom::Base(trace.to_string());
        }

        let path = segments[..hops * 2].join("/");
        let hashed = hash_denom_trace(trace);

        Denom::Ibc { path, base, hashed }
    }

    /**
       The full trace of the denomination, `port/channel/.../base` for a
       voucher and the base denomination otherwise.
    */
    pub fn trace(&self) -> String {
        match self {
            Denom::Base(base) => base.clone(),
            Denom::Ibc { path, base, .. } => format!("{path}/{base}"),
        }
    }

    /**
       Whether the most recent hop of this denomination went through the
       given port and channel, i.e. the token is returning through the
       channel it arrived from.
    */
    pub fn has_prefix(&self, port_id: &PortId, channel_id: &ChannelId) -> bool {
        match self {
            Denom::Base(_) => false,
            Denom::Ibc { path, .. } => {
                let prefix = format!("{port_id}/{channel_id}");
                path == &prefix || path.starts_with(&format!("{prefix}/"))
            }
        }
    }

    /**
       Remove the most recent hop from the trace, returning the denomination
       that the token had before it was sent through that hop.
    */
    pub fn strip_hop(&self) -> Denom {
        match self {
            Denom::Base(_) => self.clone(),
            Denom::Ibc { path, base, .. } => {
                let remaining: Vec<&str> = path.split('/').skip(2).collect();
                if remaining.is_empty() {
                    Denom::Base(base.clone())
                } else {
                    Denom::from_trace(&format!("{}/{}", remaining.join("/"), base))
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Denom::Base(base) => base,
            Denom::Ibc { hashed, .. } => hashed,
        }
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}
