/*!
   Utility functions and types used by the tests.
*/

pub mod assert;
pub mod mutex;
pub mod poll;
pub mod process;
pub mod random;
pub mod retry;
pub mod suspend;
