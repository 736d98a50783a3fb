// Path: crates/ledger-client-core/src/transport/rest.rs
//! JSON GET/POST with a size-capped body read, used by the REST submit
//! fallback and the Mirror REST client.

use crate::error::TransportError;
use reqwest::Client;
use serde::Serialize;

/// Default cap on a REST response body, guarding against a misbehaving
/// or malicious server streaming an unbounded body.
pub const DEFAULT_BODY_CAP: usize = 4 * 1024 * 1024;

/// Thin wrapper over `reqwest::Client` for the plain-JSON REST surfaces.
#[derive(Debug, Clone)]
pub struct RestFetcher {
    client: Client,
    body_cap: usize,
}

impl RestFetcher {
    /// Builds a fetcher over a shared client with the default body cap.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            body_cap: DEFAULT_BODY_CAP,
        }
    }

    /// Overrides the response body size cap.
    pub fn with_body_cap(mut self, cap: usize) -> Self {
        self.body_cap = cap;
        self
    }

    /// Issues a GET and returns the size-capped raw body.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Fault(e.to_string()))?;
        self.read_capped(response).await
    }

    /// Issues a JSON POST and returns `(status, raw_body)` — the caller
    /// decides what counts as success, since REST submit treats 200/201/202
    /// as success while Mirror REST treats only 200 as success.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(u16, Vec<u8>), TransportError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Fault(e.to_string()))?;
        let status = response.status().as_u16();
        let raw = self.read_capped(response).await?;
        Ok((status, raw))
    }

    async fn read_capped(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        if let Some(len) = response.content_length() {
            if len as usize > self.body_cap {
                return Err(TransportError::BodyTooLarge {
                    actual: len as usize,
                    cap: self.body_cap,
                });
            }
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Fault(e.to_string()))?;
        if bytes.len() > self.body_cap {
            return Err(TransportError::BodyTooLarge {
                actual: bytes.len(),
                cap: self.body_cap,
            });
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Serialize)]
    struct Ping {
        hello: &'static str,
    }

    #[tokio::test]
    async fn get_returns_the_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .mount(&server)
            .await;

        let fetcher = RestFetcher::new(reqwest::Client::new());
        let body = fetcher.get(&format!("{}/x", server.uri())).await.unwrap();
        assert_eq!(body, b"payload");
    }

    #[tokio::test]
    async fn post_json_sends_the_body_and_returns_status_plus_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/x"))
            .and(body_json(serde_json::json!({"hello": "world"})))
            .respond_with(ResponseTemplate::new(201).set_body_bytes(b"{\"ok\":true}".to_vec()))
            .mount(&server)
            .await;

        let fetcher = RestFetcher::new(reqwest::Client::new());
        let (status, raw) = fetcher
            .post_json(&format!("{}/x", server.uri()), &Ping { hello: "world" })
            .await
            .unwrap();
        assert_eq!(status, 201);
        assert_eq!(raw, b"{\"ok\":true}");
    }

    #[tokio::test]
    async fn body_larger_than_the_cap_fails_without_buffering_it_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let fetcher = RestFetcher::new(reqwest::Client::new()).with_body_cap(16);
        let err = fetcher.get(&format!("{}/big", server.uri())).await.unwrap_err();
        assert!(matches!(err, TransportError::BodyTooLarge { actual: 64, cap: 16 }));
    }
}
