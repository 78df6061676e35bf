use std::sync::Arc;
use std::time::Duration;

use plume_model::api::ApiResponse;
use plume_model::routes::v1;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::{RemoteError, RemoteResult};

/// HTTP client for the preferences service with bearer-token support
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;

        info!("[ApiClient] Creating API client with base URL: {}", base_url);

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Build a versioned API URL
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        let path = p.trim_start_matches('/');
        if path.starts_with(v1::ROOT.trim_start_matches('/')) {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}{}/{}", self.base_url, v1::ROOT, path)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token_store.read().await.is_some()
    }

    /// Attach the bearer token, if any
    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_store.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET request returning the envelope's data
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> RemoteResult<R> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);

        let request = self.authorize(self.client.get(&url)).await;
        let response = request.send().await?;
        Self::read_data(response).await
    }

    /// PUT request for endpoints whose confirmation carries no payload
    pub async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<()> {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {}", url);

        let request = self.authorize(self.client.put(&url).json(body)).await;
        let response = request.send().await?;
        Self::read_confirmation(response).await
    }

    async fn read_data<R: DeserializeOwned>(
        response: Response,
    ) -> RemoteResult<R> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(response).await);
        }

        let envelope: ApiResponse<R> = response.json().await.map_err(|e| {
            RemoteError::server(
                status.as_u16(),
                format!("Invalid response body: {e}"),
            )
        })?;

        if !envelope.is_success() {
            return Err(RemoteError::server(
                status.as_u16(),
                envelope
                    .error
                    .unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }

        envelope.data.ok_or_else(|| {
            RemoteError::server(status.as_u16(), "Empty response from server")
        })
    }

    async fn read_confirmation(response: Response) -> RemoteResult<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(response).await);
        }

        // 204 and empty bodies confirm; an envelope may still carry a
        // rejection.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) if !envelope.is_success() => Err(RemoteError::server(
                status.as_u16(),
                envelope
                    .error
                    .unwrap_or_else(|| "Request rejected".to_string()),
            )),
            _ => Ok(()),
        }
    }

    async fn failure(response: Response) -> RemoteError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        RemoteError::server(
            status.as_u16(),
            format!("Request failed with status {}: {}", status, error_text),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_model::api::PreferencesSnapshot;
    use plume_model::{LabelGroup, LabelPreference};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client() -> ApiClient {
        ApiClient::new("https://prefs.example/", Duration::from_secs(5))
            .expect("build client")
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Read one request, headers and body, so the reply is not cut short
    /// by a reset.
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    /// Serve a single canned response and return a client pointed at it.
    async fn serve_once(response: String) -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        ApiClient::new(format!("http://{addr}"), Duration::from_secs(5))
            .expect("build client")
    }

    #[test]
    fn relative_paths_get_the_version_prefix() {
        assert_eq!(
            client().build_url("preferences"),
            "https://prefs.example/api/v1/preferences"
        );
    }

    #[test]
    fn versioned_paths_are_not_prefixed_twice() {
        assert_eq!(
            client().build_url(v1::preferences::ADULT_CONTENT),
            "https://prefs.example/api/v1/preferences/adult-content"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            client().build_url("http://other.example/x"),
            "http://other.example/x"
        );
    }

    #[tokio::test]
    async fn token_is_tracked() {
        let client = client();
        assert!(!client.has_token().await);
        client.set_token(Some("abc".into())).await;
        assert!(client.has_token().await);
    }

    #[tokio::test]
    async fn success_envelope_yields_its_data() {
        let body = r#"{"status":"success","data":{"adultContentEnabled":true,"contentLabels":{"gore":"show"}}}"#;
        let client = serve_once(http_response("200 OK", body)).await;

        let snapshot: PreferencesSnapshot = client
            .get(v1::preferences::SNAPSHOT)
            .await
            .expect("snapshot");

        assert!(snapshot.adult_content_enabled);
        assert_eq!(
            snapshot.content_labels.get(&LabelGroup::Gore),
            Some(&LabelPreference::Show)
        );
    }

    #[tokio::test]
    async fn unknown_label_groups_do_not_fail_the_snapshot() {
        let body = r#"{"status":"success","data":{"adultContentEnabled":false,"contentLabels":{"astrology":"hide","hate":"warn"}}}"#;
        let client = serve_once(http_response("200 OK", body)).await;

        let snapshot: PreferencesSnapshot = client
            .get(v1::preferences::SNAPSHOT)
            .await
            .expect("snapshot");

        assert_eq!(
            snapshot.content_labels.get(&LabelGroup::Hate),
            Some(&LabelPreference::Warn)
        );
        assert_eq!(snapshot.unrecognized_labels, vec!["astrology=hide".to_string()]);
    }

    #[tokio::test]
    async fn error_status_is_a_server_error() {
        let client =
            serve_once(http_response("503 Service Unavailable", "busy")).await;

        let err = client
            .get::<PreferencesSnapshot>(v1::preferences::SNAPSHOT)
            .await
            .expect_err("503 must fail");

        assert!(matches!(err, RemoteError::Server { status: 503, .. }));
    }

    #[tokio::test]
    async fn error_envelope_is_a_server_error() {
        let body = r#"{"status":"error","error":"preferences locked"}"#;
        let client = serve_once(http_response("200 OK", body)).await;

        let err = client
            .get::<PreferencesSnapshot>(v1::preferences::SNAPSHOT)
            .await
            .expect_err("error envelope must fail");

        assert_eq!(err, RemoteError::server(200, "preferences locked"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_server_error() {
        let client = serve_once(http_response("200 OK", "not json")).await;

        let err = client
            .get::<PreferencesSnapshot>(v1::preferences::SNAPSHOT)
            .await
            .expect_err("malformed body must fail");

        assert!(matches!(err, RemoteError::Server { status: 200, .. }));
    }

    #[tokio::test]
    async fn no_content_confirms_an_update() {
        let client = serve_once(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        client
            .put_no_content(
                v1::preferences::ADULT_CONTENT,
                &serde_json::json!({ "enabled": true }),
            )
            .await
            .expect("204 confirms");
    }

    #[tokio::test]
    async fn empty_body_confirms_an_update() {
        let client = serve_once(http_response("200 OK", "")).await;

        client
            .put_no_content(
                v1::preferences::CONTENT_LABELS,
                &serde_json::json!({ "group": "gore", "value": "warn" }),
            )
            .await
            .expect("empty 200 confirms");
    }

    #[tokio::test]
    async fn rejected_update_envelope_is_a_server_error() {
        let body = r#"{"status":"error","error":"not allowed"}"#;
        let client = serve_once(http_response("200 OK", body)).await;

        let err = client
            .put_no_content(
                v1::preferences::ADULT_CONTENT,
                &serde_json::json!({ "enabled": true }),
            )
            .await
            .expect_err("rejection must fail");

        assert_eq!(err, RemoteError::server(200, "not allowed"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let client = ApiClient::new(format!("http://{addr}"), Duration::from_secs(5))
            .expect("build client");

        let err = client
            .get::<PreferencesSnapshot>(v1::preferences::SNAPSHOT)
            .await
            .expect_err("nothing is listening");

        assert!(matches!(err, RemoteError::Network(_)));
    }
}
