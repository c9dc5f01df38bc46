// Controller authentication
//
// Two strategies: a long-lived API key sent as `X-Nd-Apikey` on every
// request, or a username/password login that yields a JWT which is then
// cached on the client and sent as a bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::NdfcClient;
use crate::error::Error;

/// Default login domain on Nexus Dashboard.
pub const DEFAULT_DOMAIN: &str = "DefaultAuth";

/// Credentials for authenticating with the controller.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// API key generated in Nexus Dashboard, paired with the owning user.
    ApiKey { key: SecretString, username: String },
    /// Interactive login exchanged for a JWT.
    Login {
        username: String,
        password: SecretString,
        domain: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    user_passwd: &'a str,
    domain: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    jwttoken: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl NdfcClient {
    /// Authenticate with username/password and cache the returned JWT.
    ///
    /// `POST /login` with `{userName, userPasswd, domain}` at the
    /// controller root (outside the REST prefix).
    pub async fn login(&self, username: &str, password: &SecretString, domain: &str) -> Result<(), Error> {
        let url = self.root_url("login")?;
        debug!("POST {url}");

        let body = LoginRequest {
            user_name: username,
            user_passwd: password.expose_secret(),
            domain,
        };
        let resp = self.http().post(url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("HTTP {}: {text}", status.as_u16()),
            });
        }

        let login: LoginResponse = resp.json().await?;
        let token = login
            .jwttoken
            .or(login.token)
            .ok_or_else(|| Error::Authentication {
                message: "login response carried no token".into(),
            })?;
        self.set_token(SecretString::from(token));
        Ok(())
    }
}
