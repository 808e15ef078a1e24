//! Browser runtime: async HTTP transport and `localStorage`-backed storage.

pub mod data;
pub mod storage;
