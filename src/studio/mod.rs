/// Content backend contract and credential retry.
pub mod backend;
/// Response payload decoding.
pub mod json;
/// Content package data types.
pub mod model;
