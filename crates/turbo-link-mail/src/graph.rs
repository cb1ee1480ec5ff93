//! Microsoft Graph mail provider.
//!
//! Delivery is a client-credentials token exchange against the identity platform
//! followed by a `sendMail` call on behalf of the sender's mailbox.

use crate::http::{HttpBody, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::message::MailMessage;
use crate::transport::MailTransport;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use turbo_link_config::{ConfigError, ConnectorConfig, GraphMailConfig};
use turbo_link_core::{CoreError, Result};
use url::Url;

const FILE_ATTACHMENT_TYPE: &str = "#microsoft.graph.fileAttachment";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct SendMailRequest<'a> {
    message: GraphMessage<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage<'a> {
    subject: &'a str,
    body: GraphBody<'a>,
    to_recipients: Vec<GraphRecipient<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<GraphAttachment<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphBody<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecipient<'a> {
    email_address: GraphAddress<'a>,
}

#[derive(Serialize)]
struct GraphAddress<'a> {
    address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphAttachment<'a> {
    #[serde(rename = "@odata.type")]
    odata_type: &'static str,
    name: &'a str,
    content_bytes: String,
}

fn parse_endpoint(field: &str, value: &str) -> std::result::Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::invalid_config(field, format!("not a valid URL: {}", value), Some(Box::new(e)))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::invalid_config(
            field,
            format!("expected an http(s) base URL, got {}", value),
            None,
        ));
    }

    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CoreError::transport(format!("{} cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Builds the JSON document Graph's `sendMail` expects.
fn compose_request(message: &MailMessage) -> Result<serde_json::Value> {
    let request = SendMailRequest {
        message: GraphMessage {
            subject: message.subject(),
            body: GraphBody {
                content_type: if message.is_html() { "HTML" } else { "Text" },
                content: message.body(),
            },
            to_recipients: message
                .receiver_addresses()
                .iter()
                .map(|address| GraphRecipient {
                    email_address: GraphAddress { address },
                })
                .collect(),
            attachments: message
                .attachments()
                .iter()
                .map(|attachment| GraphAttachment {
                    odata_type: FILE_ATTACHMENT_TYPE,
                    name: attachment.filename(),
                    content_bytes: attachment.unwrapped(),
                })
                .collect(),
        },
    };

    serde_json::to_value(&request)
        .map_err(|e| CoreError::transport(format!("could not encode sendMail request: {}", e)))
}

/// Sends mail through Microsoft Graph using an app registration's client credentials.
///
/// # Examples
///
/// ```ignore
/// use turbo_link_mail::{GraphMailTransport, MailMessage, MailTransport};
///
/// let mut transport = GraphMailTransport::from_config_file("connector.toml".as_ref())?;
/// transport.set_client_secret(std::env::var("GRAPH_SECRET")?);
///
/// let mut message = MailMessage::new();
/// message
///     .set_sender_address("reports@contoso.com")
///     .set_receiver_addresses(["ops@contoso.com"])
///     .set_subject("Nightly export")
///     .set_body("Attached.")
///     .attach_file("export.csv", b"id,total\n");
/// transport.send(&mut message)?;
/// ```
pub struct GraphMailTransport<C: HttpClient = ReqwestHttpClient> {
    client: C,
    authority_url: Url,
    graph_url: Url,
    scope: String,
    client_id: String,
    client_secret: SecretString,
    tenant_id: String,
}

impl GraphMailTransport<ReqwestHttpClient> {
    /// Builds a transport from configuration with the default HTTP client.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] if an endpoint is not a usable URL or the HTTP client
    /// cannot be set up. No credential is used at this point.
    pub fn new(config: &GraphMailConfig) -> Result<Self> {
        let timeout = Duration::from_secs(u64::from(config.request_timeout_secs));
        let client = ReqwestHttpClient::new(timeout).map_err(|e| {
            ConfigError::invalid_config("mail", "could not set up HTTP client", Some(Box::new(e)))
        })?;

        Self::with_client(config, client)
    }

    /// Loads the `[mail]` section of a connector configuration file.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] if the file cannot be located or parsed.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = ConnectorConfig::load(path)?;
        Self::new(config.mail())
    }
}

impl<C: HttpClient> GraphMailTransport<C> {
    /// Builds a transport that issues its requests through `client`.
    pub fn with_client(config: &GraphMailConfig, client: C) -> Result<Self> {
        let authority_url = parse_endpoint("mail.authority_url", &config.authority_url)?;
        let graph_url = parse_endpoint("mail.graph_url", &config.graph_url)?;

        Ok(Self {
            client,
            authority_url,
            graph_url,
            scope: config.scope.clone(),
            client_id: config.client_id.clone(),
            client_secret: SecretString::new(config.client_secret.clone()),
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Replaces the application (client) id used for the token exchange.
    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.client_id = client_id.into();
    }

    /// Replaces the client secret.
    pub fn set_client_secret(&mut self, client_secret: impl Into<String>) {
        self.client_secret = SecretString::new(client_secret.into());
    }

    /// Replaces the directory (tenant) id the token endpoint is built from.
    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.tenant_id = tenant_id.into();
    }

    /// `{authority}/{tenant}/oauth2/v2.0/token`
    fn token_endpoint(&self) -> Result<Url> {
        join_segments(
            &self.authority_url,
            &[self.tenant_id.as_str(), "oauth2", "v2.0", "token"],
        )
    }

    /// `{graph}/users/{sender}/sendMail`
    fn send_endpoint(&self, sender: &str) -> Result<Url> {
        join_segments(&self.graph_url, &["users", sender, "sendMail"])
    }

    fn request_token(&self) -> Result<String> {
        let url = self.token_endpoint()?;
        debug!(%url, "requesting graph access token");

        let response = self
            .client
            .post(HttpRequest {
                url: url.to_string(),
                headers: vec![("Accept".to_string(), "application/json".to_string())],
                body: HttpBody::Form(vec![
                    ("client_id".to_string(), self.client_id.clone()),
                    (
                        "client_secret".to_string(),
                        self.client_secret.expose_secret().clone(),
                    ),
                    ("scope".to_string(), self.scope.clone()),
                    ("grant_type".to_string(), "client_credentials".to_string()),
                ]),
            })
            .map_err(|e| CoreError::transport(e.to_string()))?;

        if !response.is_success() {
            return Err(CoreError::transport(format!(
                "token request rejected with status {}: {}",
                response.status, response.body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| CoreError::transport(format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }
}

impl<C: HttpClient> MailTransport for GraphMailTransport<C> {
    fn provider(&self) -> &'static str {
        "graph"
    }

    #[tracing::instrument(skip_all, fields(sender = %message.sender_address()))]
    fn deliver(&self, message: &MailMessage) -> Result<()> {
        let access_token = self.request_token()?;
        let document = compose_request(message)?;
        let url = self.send_endpoint(message.sender_address())?;

        let response = self
            .client
            .post(HttpRequest {
                url: url.to_string(),
                headers: vec![
                    (
                        "Authorization".to_string(),
                        format!("Bearer {}", access_token),
                    ),
                    (
                        "Content-Type".to_string(),
                        "application/json; charset=UTF-8".to_string(),
                    ),
                ],
                body: HttpBody::Json(document),
            })
            .map_err(|e| CoreError::transport(e.to_string()))?;

        if !response.is_success() {
            return Err(CoreError::transport(format!(
                "sendMail rejected with status {}: {}",
                response.status, response.body
            )));
        }

        info!(
            recipients = message.receiver_addresses().len(),
            "mail handed to graph"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, HttpResponse};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use turbo_link_core::ErrorKind;

    #[derive(Default)]
    struct RecordingClient {
        requests: RefCell<Vec<HttpRequest>>,
        replies: RefCell<VecDeque<std::result::Result<HttpResponse, HttpError>>>,
    }

    impl RecordingClient {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, reason: &str) -> Self {
            self.replies.borrow_mut().push_back(Err(HttpError::Network {
                url: "https://login.microsoftonline.com".to_string(),
                reason: reason.to_string(),
            }));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl HttpClient for RecordingClient {
        fn post(&self, request: HttpRequest) -> std::result::Result<HttpResponse, HttpError> {
            self.requests.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::Setup("no scripted reply".to_string())))
        }
    }

    const TOKEN_OK: &str = r#"{"token_type":"Bearer","expires_in":3599,"access_token":"tok-123"}"#;

    fn config() -> GraphMailConfig {
        GraphMailConfig {
            tenant_id: "contoso-tenant".to_string(),
            client_id: "app-id".to_string(),
            client_secret: "app-secret".to_string(),
            ..Default::default()
        }
    }

    fn transport(client: RecordingClient) -> GraphMailTransport<RecordingClient> {
        GraphMailTransport::with_client(&config(), client).unwrap()
    }

    fn message() -> MailMessage {
        let mut message = MailMessage::new();
        message
            .set_sender_address("a@test.com")
            .set_receiver_addresses(["dest@test.com", "copy@test.com"])
            .set_subject("Nightly export")
            .set_body("<p>Done</p>")
            .set_html(true);
        message
    }

    #[test]
    fn test_validation_runs_before_any_request() {
        let transport = transport(RecordingClient::default().reply(200, TOKEN_OK).reply(202, ""));
        let mut message = MailMessage::new();

        let err = transport.send(&mut message).unwrap_err();
        assert!(err.to_string().contains("senderAddress must be a non empty string"));

        message.set_sender_address("a@test.com");
        let err = transport.send(&mut message).unwrap_err();
        assert!(err.to_string().contains("receiverAddresses must be a non empty array"));

        message.set_receiver_addresses(["dest@test.com"]);
        let err = transport.send(&mut message).unwrap_err();
        assert!(err.to_string().contains("Email text must be a non empty string"));

        message.set_encoding("hello");
        let err = transport.send(&mut message).unwrap_err();
        assert!(err.to_string().contains("Invalid encoding specified: hello"));
        assert!(transport.client.requests().is_empty());

        message.set_encoding(crate::MailEncoding::Utf8).set_subject("hola");
        transport.send(&mut message).unwrap();
        assert_eq!(transport.client.requests().len(), 2);
    }

    #[test]
    fn test_send_exchanges_token_then_posts_message() {
        let transport = transport(RecordingClient::default().reply(200, TOKEN_OK).reply(202, ""));
        let mut message = message();
        message.attach_file("export.csv", b"id,total\n1,20\n");

        transport.send(&mut message).unwrap();

        let requests = transport.client.requests();
        assert_eq!(requests.len(), 2);

        let token = &requests[0];
        assert_eq!(
            token.url,
            "https://login.microsoftonline.com/contoso-tenant/oauth2/v2.0/token"
        );
        let HttpBody::Form(params) = &token.body else {
            panic!("token request must be form encoded");
        };
        let expected: Vec<(String, String)> = [
            ("client_id", "app-id"),
            ("client_secret", "app-secret"),
            ("scope", "https://graph.microsoft.com/.default"),
            ("grant_type", "client_credentials"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(params, &expected);

        let send = &requests[1];
        assert_eq!(send.url, "https://graph.microsoft.com/v1.0/users/a@test.com/sendMail");
        assert_eq!(send.header("authorization"), Some("Bearer tok-123"));
        assert_eq!(
            send.body,
            HttpBody::Json(json!({
                "message": {
                    "subject": "Nightly export",
                    "body": { "contentType": "HTML", "content": "<p>Done</p>" },
                    "toRecipients": [
                        { "emailAddress": { "address": "dest@test.com" } },
                        { "emailAddress": { "address": "copy@test.com" } }
                    ],
                    "attachments": [{
                        "@odata.type": "#microsoft.graph.fileAttachment",
                        "name": "export.csv",
                        "contentBytes": "aWQsdG90YWwKMSwyMAo="
                    }]
                }
            }))
        );
    }

    #[test]
    fn test_plain_text_message_omits_attachments() {
        let transport = transport(RecordingClient::default().reply(200, TOKEN_OK).reply(202, ""));
        let mut message = message();
        message.set_html(false);

        transport.send(&mut message).unwrap();

        let HttpBody::Json(document) = &transport.client.requests()[1].body else {
            panic!("send request must be json");
        };
        assert_eq!(document["message"]["body"]["contentType"], "Text");
        assert!(document["message"].get("attachments").is_none());
    }

    #[test]
    fn test_sanitized_addresses_reach_the_provider() {
        let transport = transport(RecordingClient::default().reply(200, TOKEN_OK).reply(202, ""));
        let mut message = message();
        message.set_receiver_addresses([" dest @test.com\n"]);

        transport.send(&mut message).unwrap();

        assert_eq!(message.receiver_addresses(), ["dest@test.com"]);
        let HttpBody::Json(document) = &transport.client.requests()[1].body else {
            panic!("send request must be json");
        };
        assert_eq!(
            document["message"]["toRecipients"][0]["emailAddress"]["address"],
            "dest@test.com"
        );
    }

    #[test]
    fn test_rejected_token_is_transport_error() {
        let transport = transport(
            RecordingClient::default().reply(401, r#"{"error":"invalid_client"}"#),
        );
        let mut message = message();

        let err = transport.send(&mut message).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("invalid_client"));
        assert_eq!(transport.client.requests().len(), 1);
    }

    #[test]
    fn test_network_failure_is_transport_error() {
        let transport = transport(RecordingClient::default().fail("dns error: no such host"));
        let mut message = message();

        let err = transport.send(&mut message).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("dns error: no such host"));
    }

    #[test]
    fn test_malformed_token_response_is_transport_error() {
        let transport = transport(RecordingClient::default().reply(200, "<html>proxy</html>"));
        let mut message = message();

        let err = transport.send(&mut message).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("invalid token response"));
    }

    #[test]
    fn test_rejected_send_is_transport_error() {
        let transport = transport(
            RecordingClient::default()
                .reply(200, TOKEN_OK)
                .reply(403, r#"{"error":{"code":"ErrorAccessDenied"}}"#),
        );
        let mut message = message();

        let err = transport.send(&mut message).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("ErrorAccessDenied"));
    }

    #[test]
    fn test_message_is_reusable_across_sends() {
        let transport = transport(
            RecordingClient::default()
                .reply(200, TOKEN_OK)
                .reply(202, "")
                .reply(200, TOKEN_OK)
                .reply(202, ""),
        );
        let mut message = message();

        transport.send(&mut message).unwrap();
        transport.send(&mut message).unwrap();

        let requests = transport.client.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[1].body, requests[3].body);
        assert_eq!(message.subject(), "Nightly export");
    }

    #[test]
    fn test_setters_replace_configured_credentials() {
        let mut transport = transport(RecordingClient::default().reply(200, TOKEN_OK).reply(202, ""));
        transport.set_tenant_id("fabrikam");
        transport.set_client_id("other-app");
        transport.set_client_secret("other-secret");

        transport.send(&mut message()).unwrap();

        let token = &transport.client.requests()[0];
        assert!(token.url.contains("/fabrikam/"));
        let HttpBody::Form(params) = &token.body else {
            panic!("token request must be form encoded");
        };
        assert!(params.contains(&("client_id".to_string(), "other-app".to_string())));
        assert!(params.contains(&("client_secret".to_string(), "other-secret".to_string())));
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let config = GraphMailConfig {
            authority_url: "login.microsoftonline.com".to_string(),
            ..config()
        };
        let result = GraphMailTransport::with_client(&config, RecordingClient::default());

        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("mail.authority_url"));
    }

    #[test]
    fn test_missing_bootstrap_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = GraphMailTransport::from_config_file(&dir.path().join("connector.toml"));

        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("not found"));
    }
}
