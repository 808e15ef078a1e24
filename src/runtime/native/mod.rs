//! Native runtime: blocking HTTP transport and filesystem-backed storage.

pub mod data;
pub mod storage;
