//! # Blob Disk Cache

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use downloader::{Download, Downloader};
use parking_lot::Mutex;
use sha1::{Digest, Sha1};

use crate::TOKENMINT_CACHE_CONFIG;

/// Options for [`BlobDiskCache`].
#[derive(Clone, Default, Debug)]
pub struct BlobCacheOptions {
    /// Optional path to the cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Optional [`Downloader`] builder.
    pub downloader: Option<fn() -> Downloader>,
}

impl BlobCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        mut self,
        cache_dir: Option<P>,
    ) -> Self {
        self.cache_dir = cache_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set the downloader builder.
    pub fn with_downloader(
        mut self,
        downloader: Option<fn() -> Downloader>,
    ) -> Self {
        self.downloader = downloader;
        self
    }
}

/// The cache key of a blob path or URL: its lowercase hex SHA-1.
pub fn cache_key(blob_path: &str) -> String {
    Sha1::digest(blob_path.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn is_remote(blob_path: &str) -> bool {
    blob_path.starts_with("http://") || blob_path.starts_with("https://")
}

/// A unique sibling temp path for `path`.
fn temp_path(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{nanos}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Remove a temp file, if it exists.
fn discard_temp(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("failed to remove temp file {}: {e}", path.display()),
    }
}

/// Disk cache for vocabulary blobs.
///
/// Blobs are read from local paths or fetched over HTTP(S) with
/// [`Downloader`], and stored flat in the cache directory under
/// [`cache_key`]. Writes go to a temp file which is then renamed into place,
/// so concurrent readers never observe a partial blob.
pub struct BlobDiskCache {
    /// Cache directory.
    cache_dir: PathBuf,

    /// Connection pool for downloading files.
    downloader: Mutex<Downloader>,
}

impl BlobDiskCache {
    /// Construct a new [`BlobDiskCache`].
    pub fn new(options: BlobCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = TOKENMINT_CACHE_CONFIG.resolve_cache_dir(options.cache_dir);

        let downloader = match options.downloader {
            Some(builder) => builder(),
            None => Downloader::builder()
                .build()
                .context("failed to build downloader")?,
        };

        Ok(Self {
            cache_dir,
            downloader: Mutex::new(downloader),
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the cache path for a blob path or URL.
    ///
    /// Does not check that the path exists.
    pub fn cache_path(
        &self,
        blob_path: &str,
    ) -> PathBuf {
        self.cache_dir.join(cache_key(blob_path))
    }

    /// Read a blob, through the cache.
    ///
    /// # Arguments
    /// * `blob_path` - a local path, or an `http(s)://` URL.
    ///
    /// # Errors
    /// * if the blob can be neither found in the cache nor fetched.
    /// * if the fetched blob cannot be written to the cache.
    pub fn read_blob(
        &self,
        blob_path: &str,
    ) -> anyhow::Result<Vec<u8>> {
        let path = self.cache_path(blob_path);
        if path.exists() {
            log::debug!("blob cache hit: {blob_path}");
            return fs::read(&path)
                .with_context(|| format!("failed to read cached blob: {}", path.display()));
        }

        let data = self.read_blob_uncached(blob_path)?;
        self.store(&path, &data)?;
        log::info!("cached {blob_path} at {}", path.display());
        Ok(data)
    }

    /// Read a blob without touching the cache.
    pub fn read_blob_uncached(
        &self,
        blob_path: &str,
    ) -> anyhow::Result<Vec<u8>> {
        if is_remote(blob_path) {
            self.download(blob_path)
        } else {
            fs::read(blob_path).with_context(|| format!("failed to read blob: {blob_path}"))
        }
    }

    fn download(
        &self,
        url: &str,
    ) -> anyhow::Result<Vec<u8>> {
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("failed to create cache dir: {}", self.cache_dir.display())
        })?;

        let target = temp_path(&self.cache_path(url));
        let data = self.fetch(url, &target).and_then(|()| {
            fs::read(&target)
                .with_context(|| format!("failed to read download: {}", target.display()))
        });
        discard_temp(&target);
        data
    }

    /// Download `url` into `target`.
    fn fetch(
        &self,
        url: &str,
        target: &Path,
    ) -> anyhow::Result<()> {
        let mut dl = Download::new(url);
        dl.file_name = target.to_path_buf();

        log::debug!("downloading {url}");
        let summaries = self
            .downloader
            .lock()
            .download(&[dl])
            .with_context(|| format!("failed to download: {url}"))?;
        for summary in summaries {
            summary.with_context(|| format!("failed to download: {url}"))?;
        }
        Ok(())
    }

    /// Atomically write `data` to `path`.
    fn store(
        &self,
        path: &Path,
        data: &[u8],
    ) -> anyhow::Result<()> {
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("failed to create cache dir: {}", self.cache_dir.display())
        })?;

        let tmp = temp_path(path);
        let result = fs::write(&tmp, data)
            .with_context(|| format!("failed to write blob: {}", tmp.display()))
            .and_then(|()| {
                fs::rename(&tmp, path).with_context(|| {
                    format!("failed to move blob into place: {}", path.display())
                })
            });
        if result.is_err() {
            discard_temp(&tmp);
        }
        result
    }
}
