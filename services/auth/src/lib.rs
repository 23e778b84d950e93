//! Authentication building blocks for the YaMDb API
//!
//! Accounts are confirmed by a numeric code sent by mail and then exchange
//! that code for a signed bearer token. This crate holds those pieces plus the
//! role model and the validators for account fields; persistence and HTTP live
//! in the `api` service.

pub mod confirmation;
pub mod jwt;
pub mod mail;
pub mod models;
pub mod validation;

pub use models::Role;
