/*!
   Definitions of data types used by the conformance tests.
*/

pub mod amount;
pub mod binary;
pub mod config;
pub mod env;
pub mod id;
pub mod topology;
pub mod wallet;
