//! Servantin client core.
//!
//! Domain types mirrored from the backend, the session and booking-draft
//! stores, the [`api::MarketplaceApi`] trait every controller talks through,
//! and the navigation model. Nothing in this crate performs I/O beyond the
//! [`session::SessionStorage`] seam.

pub mod admin;
pub mod api;
pub mod booking;
pub mod category;
pub mod error;
pub mod format;
pub mod message;
pub mod navigation;
pub mod provider;
pub mod session;
pub mod validation;

pub use error::{ApiError, ApiErrorKind, ApiResult, Result, ServantinError};
pub use navigation::{Navigator, Route};
