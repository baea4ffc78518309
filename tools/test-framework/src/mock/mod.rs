/*!
   An in-process backend with ICS-20 escrow and voucher semantics.

   Each [`MockChain`](chain::MockChain) produces blocks on its own thread
   and the [`MockRelayer`](relayer::MockRelayer) moves packets on another,
   so that a test observes the same asynchronous behavior as with live
   networks, only faster and without external processes.
*/

pub mod bootstrap;
pub mod chain;
pub mod relayer;
pub mod state;
pub mod wasm;
