//! Service layer module
//!
//! Contains the quote service client and the greeter handler

pub mod client;
pub mod greeter;

pub use client::*;
pub use greeter::*;
