//! Prelude module for sending mail.
//!
//! Import with `use turbo_link_mail::prelude::*;`.

pub use crate::graph::GraphMailTransport;
pub use crate::message::{Attachment, MailEncoding, MailMessage};
pub use crate::transport::MailTransport;
pub use turbo_link_core::prelude::*;
