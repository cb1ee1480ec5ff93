//! Outbound mail for turbo-link.
//!
//! A [`MailMessage`] is assembled with chained setters, checked by
//! [`validate_message`] and handed to a [`MailTransport`]. The bundled provider,
//! [`GraphMailTransport`], delivers through Microsoft Graph with OAuth2 client
//! credentials.

#![cfg_attr(not(debug_assertions), forbid(missing_docs))]

pub mod graph;
pub mod http;
pub mod message;
pub mod prelude;
pub mod transport;
pub mod validation;

pub use graph::GraphMailTransport;
pub use http::{HttpBody, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use message::*;
pub use transport::MailTransport;
pub use validation::{sanitize_address, validate_message};
