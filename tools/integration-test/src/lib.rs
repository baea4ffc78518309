#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![doc = include_str!("../README.md")]

pub mod topology;

#[cfg(any(test, doc))]
pub mod tests;
