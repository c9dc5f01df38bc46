// Hand-crafted async HTTP client for the NDFC LAN-fabric REST API (12.2.x).
//
// Base path: /appcenter/cisco/ndfc/api/v1/lan-fabric/rest/
// Auth: X-Nd-Apikey + X-Nd-Username headers, or a bearer JWT from /login

use std::sync::RwLock;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// REST prefix every LAN-fabric endpoint lives under.
pub const REST_PREFIX: &str = "appcenter/cisco/ndfc/api/v1/lan-fabric/rest/";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NDFC LAN-fabric API.
///
/// Endpoint groups (fabrics, VRFs, networks, switches, interfaces, vPC
/// pairs, policies) are inherent methods implemented in sibling modules.
/// Requests are issued one at a time by callers; the client holds no
/// state beyond the cached login token.
pub struct NdfcClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl NdfcClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key. Injects `X-Nd-Apikey` and `X-Nd-Username`
    /// as default headers on every request.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        username: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("X-Nd-Apikey", key_value);
        headers.insert(
            "X-Nd-Username",
            HeaderValue::from_str(username).map_err(|e| Error::Authentication {
                message: format!("invalid username header value: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            token: RwLock::new(None),
        })
    }

    /// Build a client for the given credentials, logging in when needed.
    pub async fn connect(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        match credentials {
            Credentials::ApiKey { key, username } => {
                Self::from_api_key(base_url, key, username, transport)
            }
            Credentials::Login {
                username,
                password,
                domain,
            } => {
                let client = Self::from_reqwest(base_url, transport.build_client()?)?;
                client.login(username, password, domain).await?;
                Ok(client)
            }
        }
    }

    /// Accept a bare host (`10.0.0.5`), a host with scheme, or a full
    /// controller URL. The result always ends with `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let raw = raw.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("https://{raw}")
        };
        let mut url = Url::parse(&with_scheme)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The controller root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn set_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a path onto the controller root (used for `/login`).
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Join a relative path (e.g. `"control/fabrics"`) onto the REST prefix.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(REST_PREFIX)?.join(path)?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        let bearer = self
            .token
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| format!("Bearer {}", t.expose_secret())));
        match bearer {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .request(reqwest::Method::GET, url)
            .query(params)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    /// POST without a request body (config-save, config-deploy, rediscover).
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(reqwest::Method::POST, url).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.request(reqwest::Method::DELETE, url).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={params:?}");

        let resp = self
            .request(reqwest::Method::DELETE, url)
            .query(params)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete_with_body<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .request(reqwest::Method::DELETE, url)
            .json(body)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            // Empty list endpoints answer with an empty body on some releases.
            let body = if body.trim().is_empty() {
                "[]".to_owned()
            } else {
                body
            };
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED && self.has_api_key_auth() {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            body: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        }
    }

    fn has_api_key_auth(&self) -> bool {
        self.token.read().is_ok_and(|guard| guard.is_none())
    }
}
