/*!
   Run test cases that involve exactly two networks.
*/

pub mod channel;
