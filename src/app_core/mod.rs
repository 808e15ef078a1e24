//! Shared application core: state, input types, reducer and fetch ingestion.

pub mod ingest;
pub mod input;
pub mod reducer;
pub mod state;
pub mod text_input;
pub mod web_mouse;
