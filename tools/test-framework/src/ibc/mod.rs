/*!
   Types and helpers for the ICS-20 token transfer application.
*/

pub mod denom;
pub mod packet;
pub mod token;
