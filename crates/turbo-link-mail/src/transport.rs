//! Provider abstraction for outbound mail.

use crate::message::MailMessage;
use crate::validation::validate_message;
use turbo_link_core::Result;

/// A provider-specific way of delivering a [`MailMessage`].
///
/// Implementors only provide [`deliver`](MailTransport::deliver); [`send`](MailTransport::send)
/// runs the validation pipeline first so every provider rejects the same bad input
/// before spending any network effort.
pub trait MailTransport {
    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;

    /// Delivers an already validated message. All-or-nothing: any failure is a
    /// [`CoreError::Transport`](turbo_link_core::CoreError::Transport).
    fn deliver(&self, message: &MailMessage) -> Result<()>;

    /// Validates (sanitizing addresses in place) and then delivers `message`.
    ///
    /// The message is left as is afterwards and may be sent again.
    fn send(&self, message: &mut MailMessage) -> Result<()> {
        validate_message(message)?;
        tracing::debug!(
            provider = self.provider(),
            recipients = message.receiver_addresses().len(),
            attachments = message.attachments_len(),
            "message validated"
        );
        self.deliver(message)
    }
}
