//! Backend communication and the upload flow.
//!
//! # Services
//!
//! - [`upload`] - Multipart payload and the HTTP transport to the invoice endpoint
//! - [`handler`] - The upload handler driving the UI surfaces

pub mod upload;
pub mod handler;

pub use upload::*;
pub use handler::*;
