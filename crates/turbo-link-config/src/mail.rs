//! Settings for the Microsoft Graph mail provider.

use crate::config_struct;
use crate::error::{ConfigError, Result};

config_struct! {
    /// OAuth2 client-credentials and endpoint settings for Graph mail delivery.
    pub struct GraphMailConfig {
        /// Directory (tenant) id of the app registration
        pub tenant_id: String = String::new(),
        /// Application (client) id
        pub client_id: String = String::new(),
        /// Client secret (prefer `TURBO_LINK_MAIL__CLIENT_SECRET`)
        pub client_secret: String = String::new(),
        /// Identity platform authority, the tenant id is appended to it
        pub authority_url: String = "https://login.microsoftonline.com".to_string(),
        /// Graph API base url including the version segment
        pub graph_url: String = "https://graph.microsoft.com/v1.0".to_string(),
        /// Scope requested in the token exchange
        pub scope: String = "https://graph.microsoft.com/.default".to_string(),
        /// Per-request timeout in seconds for token and send calls
        pub request_timeout_secs: u32 = 30,
    }
}

impl GraphMailConfig {
    /// Checks the credential triple is complete.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("mail.tenant_id", &self.tenant_id),
            ("mail.client_id", &self.client_id),
            ("mail.client_secret", &self.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_config(field, "must not be empty", None));
            }
        }
        Ok(())
    }
}
