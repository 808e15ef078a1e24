//! itemshop-tui library: data model, view logic and the application core
//! shared by the native and web runtimes.

pub mod api;
pub mod app_core;
pub mod card;
pub mod catalog;
pub mod countdown;
pub mod favorites;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod runtime;
pub mod stats;
pub mod theme;
pub mod ui;
