//! Outbound message state.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt;
use std::str::FromStr;

/// Line length used when wrapping base64 attachment payloads for MIME.
pub const MIME_LINE_LENGTH: usize = 76;

/// Character encodings a message may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailEncoding {
    /// `UTF8`
    Utf8,
    /// `ISO_8859_1`
    Iso8859_1,
}

impl MailEncoding {
    /// Canonical name stored on a [`MailMessage`].
    pub fn as_str(&self) -> &'static str {
        match self {
            MailEncoding::Utf8 => "UTF8",
            MailEncoding::Iso8859_1 => "ISO_8859_1",
        }
    }
}

impl fmt::Display for MailEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UTF8" => Ok(MailEncoding::Utf8),
            "ISO_8859_1" => Ok(MailEncoding::Iso8859_1),
            other => Err(format!("Invalid encoding specified: {}", other)),
        }
    }
}

impl From<MailEncoding> for String {
    fn from(encoding: MailEncoding) -> Self {
        encoding.as_str().to_string()
    }
}

/// A file attached to a message, already base64 encoded and wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    binary: String,
}

impl Attachment {
    /// Name the file is sent under.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Base64 payload with a CRLF after every 76 characters.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Base64 payload with the line breaks removed.
    pub fn unwrapped(&self) -> String {
        self.binary.replace("\r\n", "")
    }
}

/// Splits `encoded` into `MIME_LINE_LENGTH` sized lines, each terminated by CRLF.
fn chunk_split(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / MIME_LINE_LENGTH * 2 + 2);
    for line in encoded.as_bytes().chunks(MIME_LINE_LENGTH) {
        out.extend(line.iter().map(|&b| char::from(b)));
        out.push_str("\r\n");
    }
    out
}

/// Accumulates everything needed to send one email.
///
/// Setters store values as given; nothing is checked until a transport runs the
/// validation pipeline on send. The message is never reset by a send, so the same
/// instance can be sent again with all of its fields intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub(crate) encoding: String,
    pub(crate) is_html: bool,
    pub(crate) sender_address: String,
    pub(crate) receiver_addresses: Vec<String>,
    pub(crate) subject: String,
    pub(crate) body: String,
    pub(crate) attachments: Vec<Attachment>,
}

impl Default for MailMessage {
    fn default() -> Self {
        Self {
            encoding: MailEncoding::Utf8.into(),
            is_html: false,
            sender_address: String::new(),
            receiver_addresses: Vec::new(),
            subject: String::new(),
            body: String::new(),
            attachments: Vec::new(),
        }
    }
}

impl MailMessage {
    /// Empty message declaring `UTF8`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the encoding of subject and body, `UTF8` or `ISO_8859_1`.
    pub fn set_encoding(&mut self, encoding: impl Into<String>) -> &mut Self {
        self.encoding = encoding.into();
        self
    }

    /// Sends the body as HTML instead of plain text.
    pub fn set_html(&mut self, is_html: bool) -> &mut Self {
        self.is_html = is_html;
        self
    }

    /// Mailbox the message is sent from.
    pub fn set_sender_address(&mut self, sender: impl Into<String>) -> &mut Self {
        self.sender_address = sender.into();
        self
    }

    /// Replaces the recipient list.
    pub fn set_receiver_addresses<I, S>(&mut self, receivers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receiver_addresses = receivers.into_iter().map(Into::into).collect();
        self
    }

    /// Subject line.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = subject.into();
        self
    }

    /// Sets the message contents; enable [`set_html`](Self::set_html) for markup.
    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Appends a file, base64 encoding `data` and wrapping it at 76 characters.
    pub fn attach_file(&mut self, filename: impl Into<String>, data: &[u8]) -> &mut Self {
        self.attachments.push(Attachment {
            filename: filename.into(),
            binary: chunk_split(&BASE64.encode(data)),
        });
        self
    }

    /// Declared encoding name.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Whether the body is HTML.
    pub fn is_html(&self) -> bool {
        self.is_html
    }

    /// Sender mailbox.
    pub fn sender_address(&self) -> &str {
        &self.sender_address
    }

    /// Recipient mailboxes.
    pub fn receiver_addresses(&self) -> &[String] {
        &self.receiver_addresses
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Message contents.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Attached files in the order they were added.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Number of files attached so far.
    pub fn attachments_len(&self) -> usize {
        self.attachments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let message = MailMessage::new();
        assert_eq!(message.encoding(), "UTF8");
        assert!(!message.is_html());
        assert!(message.receiver_addresses().is_empty());
        assert_eq!(message.attachments_len(), 0);
    }

    #[test]
    fn test_setters_store_values_unchecked() {
        let mut message = MailMessage::new();
        message
            .set_encoding("hello")
            .set_sender_address("  not an address ")
            .set_receiver_addresses(["a@test.com", ""])
            .set_html(true);

        assert_eq!(message.encoding(), "hello");
        assert_eq!(message.sender_address(), "  not an address ");
        assert_eq!(message.receiver_addresses(), ["a@test.com", ""]);
        assert!(message.is_html());
    }

    #[test]
    fn test_attach_file_appends_in_order() {
        let mut message = MailMessage::new();
        message.attach_file("first.txt", b"one");
        message.attach_file("second.bin", &[0, 159, 146, 150]);

        assert_eq!(message.attachments_len(), 2);
        let names: Vec<_> = message.attachments().iter().map(Attachment::filename).collect();
        assert_eq!(names, ["first.txt", "second.bin"]);
        assert_eq!(message.attachments()[0].binary(), "b25l\r\n");
        assert_eq!(message.attachments()[1].unwrapped(), "AJ+Slg==");
    }

    #[test]
    fn test_attachment_lines_wrap_at_76() {
        let mut message = MailMessage::new();
        message.attach_file("big.bin", &[0xAB; 120]);

        let binary = message.attachments()[0].binary();
        let lines: Vec<&str> = binary.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 76);
        assert_eq!(lines[2].len(), 8);
        assert!(binary.ends_with("\r\n"));
        assert_eq!(BASE64.decode(message.attachments()[0].unwrapped()).unwrap(), vec![0xAB; 120]);
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("ISO_8859_1".parse::<MailEncoding>().unwrap(), MailEncoding::Iso8859_1);
        assert_eq!(String::from(MailEncoding::Utf8), "UTF8");
        assert!("utf8".parse::<MailEncoding>().is_err());
    }
}
