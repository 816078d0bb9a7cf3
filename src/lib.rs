pub mod check;
pub mod config;
pub mod error;
pub mod parse;
pub mod walk;
pub mod wasm;
