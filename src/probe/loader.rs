// src/probe/loader.rs
// =============================================================================
// Image loaders answer one question: "does this image path load?"
//
// A failed load is the normal way of learning that a file is absent, so
// loaders never return errors. They return true (hit) or false (miss).
//
// Two implementations:
// - HttpLoader: asks a web server (HEAD, falling back to GET on 405)
// - DirLoader: looks at a local directory laid out like the site
//
// Both refuse paths that could leave the image tree (see is_safe_path).
//
// Rust concepts:
// - Traits: ImageLoader is the seam the prober talks to
// - async-trait: lets a trait have async methods and still be used as dyn
// - Arc<dyn Trait>: one loader shared by many probe tasks
// - let-else: early return when an Option is None
// =============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Something that can attempt to load an image by relative path.
//
// Send + Sync are required because the same loader is used from many tokio
// tasks at once (one per product card).
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Returns true when the image at `path` loaded successfully.
    async fn load(&self, path: &str) -> bool;
}

// Checks image paths against a web server
pub struct HttpLoader {
    client: Client,
    base: Url,
}

impl HttpLoader {
    /// Creates a loader rooted at `base`.
    ///
    /// `timeout` bounds each request; a request that times out is a miss.
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        // One client for every request so connections get pooled
        let client = Client::builder()
            .timeout(timeout) // a hung server becomes a miss, not a stuck card
            .redirect(reqwest::redirect::Policy::limited(5)) // follow up to 5 redirects
            .build()?;

        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self {
            client,
            base: with_trailing_slash(base),
        }
    }

    // Turns a relative image path into an absolute URL under the base
    //
    // Returns None for anything that isn't a plain relative path, so a
    // folder name can never smuggle in a query, a fragment or a "..".
    fn resolve(&self, path: &str) -> Option<Url> {
        if !is_safe_path(path) {
            return None;
        }
        self.base.join(path).ok()
    }
}

#[async_trait]
impl ImageLoader for HttpLoader {
    async fn load(&self, path: &str) -> bool {
        // let-else: bail out early if the path can't be turned into a URL
        let Some(url) = self.resolve(path) else {
            debug!(path, "refusing to load unsafe image path");
            return false;
        };

        // HEAD first so we don't download image bodies just to learn they exist
        //
        // Some static hosts don't allow HEAD and answer 405 Method Not
        // Allowed. In that case we ask again with GET.
        let response = match self.client.head(url.clone()).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                self.client.get(url.clone()).send().await
            }
            // Anything else (success, 404, transport error) is the answer
            other => other,
        };

        match response {
            Ok(response) => {
                // The header value may not be valid UTF-8; treat that as absent
                let content_type = response
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok());
                is_image_response(response.status(), content_type)
            }
            // Connection refused, DNS failure, timeout... all just misses
            Err(e) => {
                debug!(%url, error = %e, "image load failed");
                false
            }
        }
    }
}

// A response counts as a loaded image when it succeeded and, if the server
// says what it sent, what it sent is an image. Single-page hosts often answer
// every path with 200 + index.html, which must not count as a hit.
fn is_image_response(status: StatusCode, content_type: Option<&str>) -> bool {
    // 2xx only: redirects were already followed by the client
    if !status.is_success() {
        return false;
    }

    match content_type {
        // Case-insensitive, and ignoring parameters like "; charset=..."
        Some(ct) => ct.trim().to_ascii_lowercase().starts_with("image/"),
        // No Content-Type at all: trust the status code
        None => true,
    }
}

// Url::join replaces the last path segment unless the base ends with '/'
//
// Example: "https://shop.example/store" + "Images/a.jpg"
//   without the fix -> https://shop.example/Images/a.jpg
//   with the fix    -> https://shop.example/store/Images/a.jpg
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Returns true when `path` is a plain relative path that stays inside the
/// image tree.
///
/// Rejected:
/// - empty paths and paths starting with '/'
/// - '#' and '?' (would become a URL fragment or query)
/// - '%' (percent-encoded dots count as dots to a URL parser)
/// - '\' and ':' (Windows separators and drive prefixes)
/// - empty, "." and ".." segments
pub fn is_safe_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') {
        return false;
    }

    // A closure works as a string pattern: "does any char match?"
    if path.contains(|c: char| matches!(c, '#' | '?' | '%' | '\\' | ':')) {
        return false;
    }

    // Every segment must be a real name, never a step up or sideways
    path.split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

// Checks image paths against a local directory
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    // impl Into<PathBuf> accepts &str, String, &Path, PathBuf...
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageLoader for DirLoader {
    async fn load(&self, path: &str) -> bool {
        // PathBuf::join with ".." or an absolute path would leave the root
        if !is_safe_path(path) {
            debug!(path, "refusing to load unsafe image path");
            return false;
        }

        // tokio::fs runs the blocking stat on a worker thread
        //
        // An empty file would fail to decode in a browser, so it's a miss too
        match tokio::fs::metadata(self.root.join(path)).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }
}

/// Where product images come from: a site URL or a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Http(Url),
    Dir(PathBuf),
}

impl ImageSource {
    /// Parses a `--source` argument.
    ///
    /// `http://` and `https://` values are treated as a site root, anything
    /// else as a local directory.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(anyhow!("Image source must not be empty"));
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            // Url::parse validates the host, port, etc.
            let url = Url::parse(source)
                .map_err(|e| anyhow!("Invalid source URL '{}': {}", source, e))?;
            Ok(ImageSource::Http(url))
        } else {
            // Existence is not checked here: a missing directory just means
            // every load misses
            Ok(ImageSource::Dir(PathBuf::from(source)))
        }
    }

    /// Builds the loader for this source.
    pub fn into_loader(self, timeout: Duration) -> Result<Arc<dyn ImageLoader>> {
        // Both arms produce an Arc<dyn ImageLoader>, so the caller doesn't
        // care which kind it got
        let loader: Arc<dyn ImageLoader> = match self {
            ImageSource::Http(url) => Arc::new(HttpLoader::new(url, timeout)?),
            ImageSource::Dir(root) => Arc::new(DirLoader::new(root)),
        };
        Ok(loader)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Http(url) => write!(f, "{}", url),
            ImageSource::Dir(root) => write!(f, "{}", root.display()),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for loading?
//    - The prober only needs "did it load?", not how
//    - Tests plug in fake loaders that answer from a HashSet
//    - The CLI picks HTTP or a local directory at runtime
//
// 2. Why #[async_trait]?
//    - Plain async fns in traits can't be used through dyn Trait yet
//    - The macro rewrites them to return boxed futures, which can
//
// 3. Why return bool instead of Result?
//    - A missing image is the expected answer most of the time
//    - There's nothing a caller could do differently with the error
//    - The reason is still logged at debug level for troubleshooting
//
// 4. What does matches!() do?
//    - It's a shorthand for a match that returns true or false
//    - matches!(c, '#' | '?') is true when c is '#' or '?'
// -----------------------------------------------------------------------------
