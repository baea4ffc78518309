/*!
   Control of the relaying process connecting the networks under test.
*/

pub mod driver;
pub mod handle;
