// src/probe/prober.rs
// =============================================================================
// The probe loop.
//
// How it works:
// 1. Start at index 1
// 2. Try <root>/<folder>/<index>.<ext> for every extension, all at once
// 3. If any loaded, keep the first one in extension order (a hit)
//    otherwise count a miss
// 4. Stop once the index passes max_index or misses reach miss_limit
//
// Index N+1 is never tried before every attempt for index N has settled,
// so results always come out in increasing index order.
//
// Folder names come from the catalog, which may be remote. A folder that
// isn't a single plain path segment is refused up front and yields no
// images, without issuing a single load.
//
// Rust concepts:
// - join_all: run several futures at once and collect results in order
// - Iterators: map / zip / find_map instead of index bookkeeping
// - bool::then_some: turn a bool into an Option
// - #[derive(Serialize)]: the report doubles as the --json output
// =============================================================================

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::loader::{is_safe_path, ImageLoader};

/// Directory (relative to the source root) holding one folder per product.
pub const IMAGE_ROOT: &str = "Images/Products";

pub const DEFAULT_MAX_INDEX: u32 = 12;
pub const DEFAULT_MISS_LIMIT: u32 = 4;
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// An image that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbedImage {
    /// Path relative to the source root
    pub path: String,
    /// Left empty by the prober; cards fill in the product name
    #[serde(rename = "alt")]
    pub alt_text: String,
}

impl ProbedImage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alt_text: String::new(),
        }
    }
}

// Bounds of the search space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Highest filename index attempted
    pub max_index: u32,
    /// Consecutive misses after which the folder is assumed exhausted
    pub miss_limit: u32,
    /// Candidate extensions, in priority order
    pub extensions: Vec<String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_index: DEFAULT_MAX_INDEX,
            miss_limit: DEFAULT_MISS_LIMIT,
            // &str -> String for each entry of the constant array
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Everything one probe learned, including how much work it did.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub folder: String,
    pub images: Vec<ProbedImage>,
    /// Highest index that was attempted (0 when nothing was attempted)
    pub indices_attempted: u32,
    /// Total (index x extension) load attempts issued
    pub loads_issued: usize,
}

// Cheap to clone: the loader is shared behind an Arc so every card's probe
// task can hold its own copy
#[derive(Clone)]
pub struct Prober {
    loader: Arc<dyn ImageLoader>,
    options: ProbeOptions,
}

impl Prober {
    pub fn new(loader: Arc<dyn ImageLoader>, options: ProbeOptions) -> Self {
        Self { loader, options }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Discovers the images in `folder`, in increasing index order.
    ///
    /// Never fails: a folder with nothing in it simply yields an empty Vec.
    pub async fn probe(&self, folder: &str) -> Vec<ProbedImage> {
        self.probe_report(folder).await.images
    }

    pub async fn probe_report(&self, folder: &str) -> ProbeReport {
        // Start with an empty report; the loop below fills it in
        let mut report = ProbeReport {
            folder: folder.to_string(),
            images: Vec::new(),
            indices_attempted: 0,
            loads_issued: 0,
        };

        // A folder like "../x" or "mug#1" would point somewhere else entirely
        if !is_valid_folder(folder) {
            warn!(folder, "refusing to probe invalid folder name");
            return report;
        }

        // No candidates means no index can ever hit; don't issue anything
        if self.options.extensions.is_empty() {
            return report;
        }

        let mut index = 1;
        let mut misses = 0; // consecutive misses, reset on every hit

        while index <= self.options.max_index && misses < self.options.miss_limit {
            // Step 1: one candidate path per extension, in priority order
            //   e.g. [".../3.jpg", ".../3.jpeg", ".../3.png", ".../3.webp"]
            let candidates: Vec<String> = self
                .options
                .extensions
                .iter()
                .map(|ext| image_path(folder, index, ext))
                .collect();

            report.loads_issued += candidates.len();
            report.indices_attempted = index;

            // Step 2: fire every candidate at once and wait for all of them
            //
            // join_all keeps input order, so "first success" means first in
            // extension priority, not whichever request happened to finish first
            let outcomes = join_all(candidates.iter().map(|path| self.loader.load(path))).await;

            // Step 3: pair each path with its outcome and keep the first hit
            //
            // zip:       (".../3.jpg", false), (".../3.png", true), ...
            // find_map:  stops at the first pair that produces Some(path)
            let winner = candidates
                .into_iter()
                .zip(outcomes)
                .find_map(|(path, loaded)| loaded.then_some(path));

            // Step 4: update the miss counter
            match winner {
                Some(path) => {
                    debug!(folder, index, %path, "probe hit");
                    misses = 0; // gaps shorter than miss_limit are skipped over
                    report.images.push(ProbedImage::new(path));
                }
                None => {
                    misses += 1;
                }
            }

            index += 1;
        }

        debug!(
            folder,
            found = report.images.len(),
            attempted = report.indices_attempted,
            "probe finished"
        );

        report
    }
}

/// Returns true when `folder` is a single plain path segment.
///
/// Slashes, "..", '#', '?' and the other characters `is_safe_path` refuses
/// are all rejected, as is an empty name.
pub fn is_valid_folder(folder: &str) -> bool {
    !folder.contains('/') && is_safe_path(folder)
}

/// Builds the relative path for one candidate image.
///
/// Example: image_path("mug", 2, "png") -> "Images/Products/mug/2.png"
pub fn image_path(folder: &str, index: u32, ext: &str) -> String {
    format!("{}/{}/{}.{}", IMAGE_ROOT, folder, index, ext)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why join_all and not buffer_unordered?
//    - There are only a handful of extensions per index, so no limit is needed
//    - join_all returns results in the same order as its input
//    - That order is what makes the extension priority deterministic
//
// 2. Why not probe every index at once?
//    - The miss limit depends on earlier results
//    - Going one index at a time means we never ask for 12 images when the
//      folder only has 2
//
// 3. What does loaded.then_some(path) do?
//    - true.then_some(x) is Some(x)
//    - false.then_some(x) is None
//    - Combined with find_map it means "the first path that loaded"
//
// 4. Why a ProbeReport and not just a Vec?
//    - The CLI shows how much work a probe did
//    - Tests use the counters to check the stopping rules
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // Serves a fixed set of paths and records every attempt
    struct FakeLoader {
        present: HashSet<String>,
        attempts: Mutex<Vec<String>>,
    }

    impl FakeLoader {
        fn with(paths: &[String]) -> Arc<Self> {
            Arc::new(Self {
                present: paths.iter().cloned().collect(),
                attempts: Mutex::new(Vec::new()),
            })
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageLoader for FakeLoader {
        async fn load(&self, path: &str) -> bool {
            self.attempts.lock().unwrap().push(path.to_string());
            self.present.contains(path)
        }
    }

    fn jpgs(folder: &str, indices: impl IntoIterator<Item = u32>) -> Vec<String> {
        indices
            .into_iter()
            .map(|i| image_path(folder, i, "jpg"))
            .collect()
    }

    fn highest_index_attempted(attempts: &[String]) -> u32 {
        attempts
            .iter()
            .filter_map(|p| p.rsplit('/').next()?.split('.').next()?.parse().ok())
            .max()
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_finds_contiguous_images_and_stops_after_miss_limit() {
        let loader = FakeLoader::with(&jpgs("mug", 1..=3));
        let prober = Prober::new(loader.clone(), ProbeOptions::default());

        let report = prober.probe_report("mug").await;

        assert_eq!(
            report.images.iter().map(|i| i.path.as_str()).collect::<Vec<_>>(),
            vec![
                "Images/Products/mug/1.jpg",
                "Images/Products/mug/2.jpg",
                "Images/Products/mug/3.jpg",
            ]
        );
        // 3 hits + 4 misses, never past index 7
        assert_eq!(report.indices_attempted, 7);
        assert_eq!(report.loads_issued, 7 * 4);
        assert_eq!(highest_index_attempted(&loader.attempts()), 7);
        assert!(report.images.iter().all(|i| i.alt_text.is_empty()));
    }

    #[tokio::test]
    async fn test_max_index_caps_search_before_miss_limit() {
        let loader = FakeLoader::with(&jpgs("mug", 1..=10));
        let prober = Prober::new(loader.clone(), ProbeOptions::default());

        let images = prober.probe("mug").await;

        assert_eq!(images.len(), 10);
        assert_eq!(highest_index_attempted(&loader.attempts()), 12);
    }

    #[tokio::test]
    async fn test_empty_folder_resolves_after_miss_limit() {
        let loader = FakeLoader::with(&[]);
        let prober = Prober::new(loader.clone(), ProbeOptions::default());

        let report = prober.probe_report("nothing-here").await;

        assert!(report.images.is_empty());
        assert_eq!(report.indices_attempted, 4);
        assert_eq!(loader.attempts().len(), 16);
    }

    #[tokio::test]
    async fn test_empty_folder_with_small_max_index() {
        let loader = FakeLoader::with(&[]);
        let options = ProbeOptions {
            max_index: 2,
            ..ProbeOptions::default()
        };
        let prober = Prober::new(loader.clone(), options);
        assert_eq!(prober.options().max_index, 2);

        let report = prober.probe_report("nothing-here").await;

        assert!(report.images.is_empty());
        assert_eq!(report.indices_attempted, 2);
    }

    #[tokio::test]
    async fn test_gap_shorter_than_miss_limit_is_skipped() {
        let loader = FakeLoader::with(&jpgs("mug", [1, 4]));
        let prober = Prober::new(loader, ProbeOptions::default());

        let images = prober.probe("mug").await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[1].path, "Images/Products/mug/4.jpg");
    }

    #[tokio::test]
    async fn test_first_extension_in_priority_order_wins() {
        let present = vec![image_path("mug", 1, "png"), image_path("mug", 1, "jpg")];
        let loader = FakeLoader::with(&present);

        let prober = Prober::new(loader.clone(), ProbeOptions::default());
        let images = prober.probe("mug").await;
        assert_eq!(images, vec![ProbedImage::new("Images/Products/mug/1.jpg")]);

        let options = ProbeOptions {
            extensions: vec!["png".into(), "jpg".into()],
            ..ProbeOptions::default()
        };
        let prober = Prober::new(loader, options);
        let images = prober.probe("mug").await;
        assert_eq!(images, vec![ProbedImage::new("Images/Products/mug/1.png")]);
    }

    #[tokio::test]
    async fn test_mixed_extensions_across_indices() {
        let present = vec![image_path("lamp", 1, "jpg"), image_path("lamp", 2, "png")];
        let prober = Prober::new(FakeLoader::with(&present), ProbeOptions::default());

        let images = prober.probe("lamp").await;

        assert_eq!(
            images,
            vec![
                ProbedImage::new("Images/Products/lamp/1.jpg"),
                ProbedImage::new("Images/Products/lamp/2.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_extensions_means_no_attempts() {
        let loader = FakeLoader::with(&jpgs("mug", 1..=3));
        let options = ProbeOptions {
            extensions: Vec::new(),
            ..ProbeOptions::default()
        };
        let prober = Prober::new(loader.clone(), options);

        let report = prober.probe_report("mug").await;

        assert!(report.images.is_empty());
        assert_eq!(report.loads_issued, 0);
        assert!(loader.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_unsafe_folder_names_issue_no_loads() {
        // Even if the fake would answer for these paths, nothing is asked
        let present: Vec<String> = ["../secret", "mug#x", "mug?x=1", "a/b"]
            .iter()
            .flat_map(|folder| jpgs(folder, 1..=2))
            .collect();
        let loader = FakeLoader::with(&present);
        let prober = Prober::new(loader.clone(), ProbeOptions::default());

        for folder in ["../secret", "..", "mug#x", "mug?x=1", "a/b", "", "%2e%2e"] {
            let report = prober.probe_report(folder).await;
            assert!(report.images.is_empty(), "folder {:?}", folder);
            assert_eq!(report.loads_issued, 0, "folder {:?}", folder);
        }
        assert!(loader.attempts().is_empty());
    }

    #[test]
    fn test_valid_folder_names() {
        assert!(is_valid_folder("stoneware-mug"));
        assert!(is_valid_folder("Mug Set (2)"));
        assert!(!is_valid_folder("mugs/blue"));
        assert!(!is_valid_folder(".."));
        assert!(!is_valid_folder("mug#x"));
        assert!(!is_valid_folder("mug?x=1"));
    }

    #[test]
    fn test_image_path_layout() {
        assert_eq!(image_path("mug", 2, "png"), "Images/Products/mug/2.png");
    }
}
