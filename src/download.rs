//! Remote media fetching
//!
//! Streams untrusted remote inputs to uniquely named files in a dedicated
//! temporary directory. Unsupported media types are rejected from the URL
//! path before any network I/O, and no partial file survives a failed
//! download: the fetched file is owned by a [`TempMedia`] guard whose drop
//! removes it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::TryStreamExt;
use reqwest::{Client, Url};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{FaceSwapError, Result};
use crate::media::{AllowListPolicy, MediaKind};

/// Read/write chunk size for streamed downloads
const CHUNK_SIZE: usize = 8192;

/// Request timeout applied to each fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(300);

/// A fetched media file with scoped ownership of its on-disk temp file
///
/// The file is removed when the guard is dropped, on every exit path of the
/// owning scope. A `TempMedia` is never shared across requests.
#[derive(Debug)]
pub struct TempMedia {
    path: PathBuf,
    kind: MediaKind,
}

impl TempMedia {
    fn new(path: PathBuf, kind: MediaKind) -> Self {
        Self { path, kind }
    }

    /// Local path of the fetched file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Media kind the file classified as
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

impl Drop for TempMedia {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed temp media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove temp media file"
            ),
        }
    }
}

/// Fetcher that streams remote media into the temp directory
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: Client,
    temp_dir: PathBuf,
    policy: Arc<AllowListPolicy>,
    max_bytes: u64,
}

impl MediaFetcher {
    /// Create a new fetcher writing into `temp_dir`
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    /// - Failed to create the HTTP client
    /// - Failed to create the temp directory
    pub fn new(
        temp_dir: impl Into<PathBuf>,
        policy: Arc<AllowListPolicy>,
        max_bytes: u64,
    ) -> Result<Self> {
        let temp_dir = temp_dir.into();
        fs::create_dir_all(&temp_dir)
            .map_err(|e| FaceSwapError::file_io_error("create temp directory", &temp_dir, e))?;

        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FaceSwapError::network_error("failed to create HTTP client", e))?;

        Ok(Self {
            client,
            temp_dir,
            policy,
            max_bytes,
        })
    }

    /// Fetch a remote media file into the temp directory
    ///
    /// The URL path's extension is checked against the combined allow-list
    /// before any request is made, bounding resource consumption from
    /// malformed or malicious URLs. Concurrent fetches of the same URL never
    /// collide: each download gets a fresh `{uuid}.{ext}` name.
    ///
    /// # Errors
    /// - `InvalidMedia` if the URL extension is not allow-listed (no network I/O)
    /// - `DownloadStatus` for a non-success HTTP status
    /// - `Network` for transport-level faults
    /// - `FileIo` for local disk faults
    ///
    /// On any failure no partial file is left behind.
    pub async fn fetch(&self, url: &Url) -> Result<TempMedia> {
        let kind = self.policy.classify_url(url).ok_or_else(|| {
            FaceSwapError::invalid_media(format!(
                "unsupported media type for URL: {}",
                url.path()
            ))
        })?;

        let ext = AllowListPolicy::url_extension(url)
            .ok_or_else(|| FaceSwapError::invalid_media("URL has no file extension"))?;
        let local_path = self.temp_dir.join(format!("{}.{ext}", Uuid::new_v4()));

        debug!(url = %url, path = %local_path.display(), kind = %kind, "fetching remote media");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FaceSwapError::network_error(format!("failed to fetch {url}"), e))?;

        if !response.status().is_success() {
            return Err(FaceSwapError::DownloadStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(FaceSwapError::invalid_media(format!(
                    "remote file is {length} bytes, exceeding the {} byte limit",
                    self.max_bytes
                )));
            }
        }

        // The guard owns the path from here on, so any failure below removes
        // whatever was written.
        let media = TempMedia::new(local_path, kind);
        self.stream_to_disk(response, media.path()).await?;

        Ok(media)
    }

    /// Stream a response body to disk in bounded chunks
    async fn stream_to_disk(&self, response: reqwest::Response, local_path: &Path) -> Result<()> {
        let mut file = tokio::fs::File::create(local_path)
            .await
            .map_err(|e| FaceSwapError::file_io_error("create temp file", local_path, e))?;

        let mut stream = StreamReader::new(response.bytes_stream().map_err(std::io::Error::other));

        let mut downloaded = 0u64;
        let mut buffer = vec![0; CHUNK_SIZE];

        loop {
            let bytes_read = stream
                .read(&mut buffer)
                .await
                .map_err(|e| FaceSwapError::network_error("failed to read download stream", e))?;

            if bytes_read == 0 {
                break;
            }

            downloaded += bytes_read as u64;
            if downloaded > self.max_bytes {
                return Err(FaceSwapError::invalid_media(format!(
                    "download exceeded the {} byte limit",
                    self.max_bytes
                )));
            }

            file.write_all(buffer.get(..bytes_read).unwrap_or(&[]))
                .await
                .map_err(|e| FaceSwapError::file_io_error("write temp file", local_path, e))?;
        }

        file.flush()
            .await
            .map_err(|e| FaceSwapError::file_io_error("flush temp file", local_path, e))?;

        debug!(path = %local_path.display(), bytes = downloaded, "download complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetcher(dir: &TempDir) -> MediaFetcher {
        MediaFetcher::new(
            dir.path(),
            Arc::new(AllowListPolicy::default()),
            50 * 1024 * 1024,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_network() {
        let dir = TempDir::new().unwrap();
        // Unroutable address: if classification did not short-circuit, this
        // fetch would hang against the request timeout instead of failing
        // instantly.
        let url = Url::parse("https://192.0.2.1/payload.txt").unwrap();

        let result = fetcher(&dir).fetch(&url).await;
        assert!(matches!(result, Err(FaceSwapError::InvalidMedia(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_extensionless_url_rejected() {
        let dir = TempDir::new().unwrap();
        let url = Url::parse("https://192.0.2.1/payload").unwrap();

        let result = fetcher(&dir).fetch(&url).await;
        assert!(matches!(result, Err(FaceSwapError::InvalidMedia(_))));
    }

    #[test]
    fn test_temp_media_drop_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.jpg");
        fs::write(&path, b"data").unwrap();

        let media = TempMedia::new(path.clone(), MediaKind::Image);
        assert_eq!(media.kind(), MediaKind::Image);
        assert!(path.exists());

        drop(media);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_media_drop_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("already-gone.mp4");

        let media = TempMedia::new(path, MediaKind::Video);
        // Nothing was ever written; dropping must not panic.
        drop(media);
    }

    #[tokio::test]
    async fn test_streaming_cap_applies_without_content_length() {
        use axum::{body::Body, routing::get, Router};
        use tokio::net::TcpListener;

        // A streamed body is sent chunked, so the declared-length check
        // never fires and only the running byte count can stop the download.
        let app = Router::new().route(
            "/big.mp4",
            get(|| async {
                let chunks =
                    (0..64).map(|_| Ok::<Vec<u8>, std::io::Error>(vec![0u8; 1024]));
                Body::from_stream(futures_util::stream::iter(chunks))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dir = TempDir::new().unwrap();
        let fetcher = MediaFetcher::new(
            dir.path(),
            Arc::new(AllowListPolicy::default()),
            4096, // 4 KiB cap, well under the 64 KiB body
        )
        .unwrap();

        let url = Url::parse(&format!("http://{addr}/big.mp4")).unwrap();
        match fetcher.fetch(&url).await {
            Err(FaceSwapError::InvalidMedia(message)) => {
                assert!(message.contains("download exceeded"));
            },
            other => panic!("expected the streaming cap to reject: {other:?}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_fetcher_creates_temp_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        let _fetcher =
            MediaFetcher::new(&nested, Arc::new(AllowListPolicy::default()), 1024).unwrap();
        assert!(nested.is_dir());
    }
}
