/*!
   All test cases are placed within this module.

   We expose the modules as public so that cargo doc
   will pick up the definition by default.
*/

pub mod ack_timeout;
pub mod submit_failure;
pub mod transfer;
pub mod wasm;

#[cfg(any(doc, feature = "interchain"))]
pub mod interchain;
