mod google;
mod traits;

pub use google::{GoogleEndpoints, GoogleProvider, GMAIL_SCOPES};
pub use traits::{GmailProvider, MessagePage, Profile, TokenSet};

use crate::config::Config;

/// Build the Google provider from configured client credentials.
pub fn google_from_config(config: &Config) -> GoogleProvider {
    GoogleProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.redirect_uri.clone(),
    )
}
