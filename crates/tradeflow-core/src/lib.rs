//! Tradeflow Core Library
//!
//! Domain models and workflow logic for the invoice-discounting marketplace.

pub mod account;
pub mod config;
pub mod contract;
pub mod dashboard;
pub mod error;
pub mod funding;
pub mod invoice;
pub mod money;
pub mod notification;
pub mod notifier;
pub mod project;
pub mod role;
pub mod seed;
pub mod workflow;

pub use error::{TradeflowError, TradeflowResult};
pub use role::{Actor, Role};
pub use workflow::Engine;
