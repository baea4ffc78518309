/*!
   Data types for a pair of chains linked by the relayer.
*/

pub mod chains;
pub mod channel;
