// src/catalog/loader.rs
// =============================================================================
// Loads the product list.
//
// Strategy:
// - If a remote catalog URL is configured, fetch it (no-cache) and parse it
//   as a JSON array of products
// - On any failure (network, non-2xx, bad JSON, empty list) log a warning
//   and use the embedded list instead
// - The fallback happens at most once; the remote fetch is never retried
//
// Rust concepts:
// - thiserror: derive Display and From for a typed error enum
// - The ? operator: converts reqwest/serde_json errors via #[from]
// - Builder-style methods: with_fallback(self) -> Self
// =============================================================================

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::product::{embedded_products, Product};

// Every way a remote catalog fetch can fail
//
// #[error("...")] becomes the Display text ({0} is the first field)
// #[from] generates From<reqwest::Error> etc., so ? can convert automatically
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Connection refused, DNS failure, timeout, or the body couldn't be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered, but not with 2xx
    #[error("catalog responded with HTTP {0}")]
    Status(StatusCode),
    /// The body wasn't a JSON array of products
    #[error("catalog is not a valid product list: {0}")]
    Parse(#[from] serde_json::Error),
    /// A valid but empty array: treated like a failure so the fallback shows
    #[error("catalog contains no products")]
    Empty,
}

/// Where the loaded products came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Remote,
    Embedded,
}

#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

pub struct CatalogLoader {
    client: Client,
    remote: Option<Url>, // None: go straight to the fallback
    fallback: Vec<Product>,
}

impl CatalogLoader {
    // anyhow::Result here: building the client is an application-level concern
    pub fn new(remote: Option<Url>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, remote))
    }

    pub fn with_client(client: Client, remote: Option<Url>) -> Self {
        Self {
            client,
            remote,
            fallback: embedded_products(),
        }
    }

    /// Replaces the embedded product list.
    pub fn with_fallback(mut self, fallback: Vec<Product>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Loads the catalog. Never fails; the worst case is an empty list.
    pub async fn load(&self) -> CatalogLoad {
        // Step 1: try the remote catalog, if there is one
        if let Some(url) = &self.remote {
            match self.fetch_remote(url).await {
                Ok(products) => {
                    info!(%url, count = products.len(), "loaded remote catalog");
                    return CatalogLoad {
                        products,
                        source: CatalogSource::Remote,
                    };
                }
                // The error's Display text (from #[error]) ends up in the log
                Err(e) => {
                    warn!(%url, error = %e, "catalog fetch failed, using embedded products");
                }
            }
        }

        // Step 2: the fallback list, exactly once, whatever went wrong above
        CatalogLoad {
            products: self.fallback.clone(),
            source: CatalogSource::Embedded,
        }
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Vec<Product>, CatalogError> {
        // Ask every cache on the way for a fresh copy
        let response = self
            .client
            .get(url.clone())
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache") // for HTTP/1.0 caches
            .send()
            .await?; // reqwest::Error -> CatalogError::Request

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        // Read the whole body, then parse it as Vec<Product>
        let body = response.text().await?;
        let products: Vec<Product> = serde_json::from_str(&body)?; // -> CatalogError::Parse

        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(products)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why thiserror here but anyhow in main.rs?
//    - Library code returns errors callers might want to match on
//    - The CLI only needs to print whatever went wrong
//    - thiserror builds the enum, anyhow wraps anything at the top
//
// 2. Why does load() return CatalogLoad and not Result?
//    - Every failure has the same answer: use the embedded list
//    - The error is still logged with warn! so it isn't lost
//
// 3. What does `if let Some(url) = &self.remote` do?
//    - Runs the block only when remote is Some, binding a reference to it
//    - Borrowing (&) means we don't move the Url out of self
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    // Answers exactly one HTTP request and hands back the raw request text
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).to_string());
        });

        let url = Url::parse(&format!("http://{}/products.json", addr)).unwrap();
        (url, rx)
    }

    fn loader(remote: Option<Url>) -> CatalogLoader {
        let client = Client::builder().no_proxy().build().unwrap();
        CatalogLoader::with_client(client, remote)
    }

    #[tokio::test]
    async fn test_remote_catalog_is_used_and_requested_without_cache() {
        let body = r#"[{"id": 1, "name": "Mug", "folder": "mug"}, {"id": 2, "name": "Lamp", "folder": "lamp"}]"#;
        let (url, request) = serve_once("200 OK", body).await;

        let load = loader(Some(url)).load().await;

        assert_eq!(load.source, CatalogSource::Remote);
        assert_eq!(load.products.len(), 2);
        assert_eq!(load.products[1], Product::new(2, "Lamp", "lamp"));

        let request = request.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_embedded() {
        let (url, _request) = serve_once("500 Internal Server Error", "{}").await;

        let load = loader(Some(url)).load().await;

        assert_eq!(load.source, CatalogSource::Embedded);
        assert_eq!(load.products.len(), 21);
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back_to_embedded() {
        let (url, _request) = serve_once("200 OK", r#"{"products": "nope"}"#).await;

        let load = loader(Some(url)).load().await;

        assert_eq!(load.source, CatalogSource::Embedded);
    }

    #[tokio::test]
    async fn test_empty_remote_list_falls_back_to_embedded() {
        let (url, _request) = serve_once("200 OK", "[]").await;

        let load = loader(Some(url)).load().await;

        assert_eq!(load.source, CatalogSource::Embedded);
        assert_eq!(load.products.len(), 21);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_falls_back_to_embedded() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{}/products.json", addr)).unwrap();

        let load = loader(Some(url)).load().await;

        assert_eq!(load.source, CatalogSource::Embedded);
        assert_eq!(load.products.len(), 21);
    }

    #[tokio::test]
    async fn test_no_remote_uses_fallback_directly() {
        let load = loader(None)
            .with_fallback(vec![Product::new(9, "Vase", "vase")])
            .load()
            .await;

        assert_eq!(load.source, CatalogSource::Embedded);
        assert_eq!(load.products, vec![Product::new(9, "Vase", "vase")]);
    }
}
