//! Checks run on a [`MailMessage`] immediately before every send.
//!
//! Steps run in a fixed order and the first violation is returned:
//!
//! 1. sender address is non empty
//! 2. at least one receiver
//! 3. sender and receivers are sanitized in place
//! 4. every sanitized receiver is non empty
//! 5. encoding is `UTF8` or `ISO_8859_1`
//! 6. subject and body are not both empty
//!
//! Addresses are only stripped of characters that cannot appear in an email
//! address; their syntax is not verified.

use crate::message::{MailEncoding, MailMessage};
use regex::Regex;
use std::sync::LazyLock;
use turbo_link_core::{CoreError, Result, require_non_empty_array, require_non_empty_string};

static NON_EMAIL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9!#$%&'*+\-=?^_`{|}~@.\[\]]").expect("static pattern compiles")
});

/// Removes every character outside the email character set, then trims.
pub fn sanitize_address(address: &str) -> String {
    NON_EMAIL_CHARS.replace_all(address, "").trim().to_string()
}

/// Runs the validation pipeline, sanitizing the message's addresses as it goes.
///
/// # Errors
///
/// [`CoreError::Validation`] describing the first failed step.
pub fn validate_message(message: &mut MailMessage) -> Result<()> {
    require_non_empty_string(&message.sender_address, "senderAddress")?;
    require_non_empty_array(&message.receiver_addresses, "receiverAddresses")?;

    message.sender_address = sanitize_address(&message.sender_address);
    for receiver in message.receiver_addresses.iter_mut() {
        *receiver = sanitize_address(receiver);
    }

    for receiver in &message.receiver_addresses {
        require_non_empty_string(receiver, "receiverAddress")?;
    }

    if message.encoding.parse::<MailEncoding>().is_err() {
        return Err(CoreError::validation(format!(
            "Invalid encoding specified: {}",
            message.encoding
        )));
    }

    require_non_empty_string(
        &format!("{}{}", message.subject, message.body),
        "Email text",
    )
}
