/*!
   Access to the networks under test.

   [`ChainHandle`](handle::ChainHandle) is the only interface the test
   logic depends on. [`CosmosChainDriver`](driver::CosmosChainDriver)
   implements it for live Cosmos SDK nodes.
*/

pub mod cli;
pub mod driver;
pub mod exec;
pub mod handle;
pub mod query;
