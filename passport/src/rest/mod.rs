pub mod score;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{PassportError, Result};
use crate::outcome::{LogEvents, Notice, Route, SessionEvents};
use crate::session::{Session, SessionStore};

pub use score::ScoreClient;

/// Authenticated JSON client for the passport API.
///
/// Every call reads the bearer token from the [`SessionStore`] at call time.
/// A 401 answer destroys the stored session, then the attached
/// [`SessionEvents`] sink is notified and asked to navigate home, and only then
/// does the call return [`PassportError::AuthorizationExpired`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    events: Arc<dyn SessionEvents>,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            events: Arc::new(LogEvents),
            timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        let mut client = Self::new(&config.api_base_url, store);
        client.timeout = config.request_timeout;
        client
    }

    /// Attach the sink that receives notices and redirects.
    pub fn with_events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    // --- Session lifecycle ---

    /// Persist the session returned by a successful login.
    pub fn sign_in(&self, session: &Session) -> Result<()> {
        self.store.set(session)?;
        info!(
            user = session.profile.as_ref().map(|p| p.display_name()),
            "session stored"
        );
        Ok(())
    }

    /// Remove the stored session. Returns `true` if one existed.
    pub fn sign_out(&self) -> Result<bool> {
        let removed = self.store.clear()?;
        info!(removed, "session cleared");
        Ok(removed)
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.token()?.is_some())
    }

    // --- Verbs ---

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None, None).await
    }

    /// POST with an optional JSON body.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body, None).await
    }

    /// PUT with an optional JSON body.
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body, None).await
    }

    /// DELETE a resource.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::DELETE, path, None, None).await
    }

    pub async fn get_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None, Some(cancel))
            .await
    }

    pub async fn post_with_cancel<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body, Some(cancel)).await
    }

    pub async fn put_with_cancel<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body, Some(cancel)).await
    }

    pub async fn delete_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.request::<T, ()>(Method::DELETE, path, None, Some(cancel))
            .await
    }

    // --- Internals ---

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let Some(token) = self.store.token()? else {
            debug!(%method, path, "no session, request not sent");
            self.events.navigate(Route::Home);
            return Err(PassportError::Unauthenticated);
        };

        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), &url).bearer_auth(&token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending request");
        let exchange = async {
            let resp = builder.send().await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;
            Ok::<_, PassportError>((status, bytes))
        };

        let (status, bytes) = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%method, %url, "request cancelled");
                    return Err(PassportError::Cancelled);
                }
                res = self.with_deadline(exchange) => res?,
            },
            None => self.with_deadline(exchange).await?,
        };

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.expire_session(&method, &url, &bytes));
        }

        if !status.is_success() {
            let message = String::from_utf8_lossy(&bytes).into_owned();
            debug!(%method, %url, status = status.as_u16(), "request failed");
            return Err(PassportError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&bytes)
    }

    async fn with_deadline<F, R>(&self, fut: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| PassportError::TimedOut(timeout.as_millis() as u64))?,
            None => fut.await,
        }
    }

    /// Tear down the local session after a 401, then emit the side effects.
    fn expire_session(&self, method: &Method, url: &str, body: &[u8]) -> PassportError {
        match self.store.clear() {
            Ok(removed) => warn!(%method, url, removed, "authorization rejected, session cleared"),
            Err(e) => error!(%method, url, error = %e, "authorization rejected, failed to clear session"),
        }
        self.events.notify(&Notice::session_expired());
        self.events.navigate(Route::Home);
        PassportError::AuthorizationExpired {
            message: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Decode a success body. An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(bytes)?)
}
