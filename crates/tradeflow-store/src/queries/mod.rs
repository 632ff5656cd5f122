//! Query modules for every stored collection.

pub mod buyers;
pub mod clients;
pub mod contracts;
pub mod funded;
pub mod invoices;
pub mod notifications;
pub mod opportunities;
pub mod projects;
pub mod session;
