// src/fetch/static_dir.rs

use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, trace};

use super::{Fetch, RequestOptions, TextBody};
use crate::error::LoadError;

/// Serves root-relative URLs out of a local static directory,
/// the way a dev server exposes `static/`.
#[derive(Debug, Clone)]
pub struct StaticDirFetch {
    root: PathBuf,
}

impl StaticDirFetch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `/a/b.csv?x#y` to `<root>/a/b.csv`. Refuses to climb out of `root`.
    fn resolve(&self, url: &str) -> Result<PathBuf, LoadError> {
        let path = url.split(['?', '#']).next().unwrap_or_default();

        let mut out = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                return Err(LoadError::transport(
                    url,
                    io::Error::new(io::ErrorKind::InvalidInput, "path escapes static root"),
                ));
            }
            out.push(segment);
        }
        Ok(out)
    }
}

pub struct FileResponse {
    url: String,
    bytes: Vec<u8>,
}

impl Fetch for StaticDirFetch {
    type Response = FileResponse;

    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FileResponse, LoadError> {
        let path = self.resolve(url)?;
        debug!(path = %path.display(), "reading static asset");
        trace!(headers = ?options.headers, "request options ignored for files");

        let bytes = fs::read(&path)
            .await
            .map_err(|e| LoadError::transport(url, e))?;

        Ok(FileResponse {
            url: url.to_string(),
            bytes,
        })
    }
}

impl TextBody for FileResponse {
    async fn text(self) -> Result<String, LoadError> {
        String::from_utf8(self.bytes).map_err(|e| LoadError::Decode {
            url: self.url,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_nested_asset() {
        let dir = tempdir().unwrap();
        std_fs::create_dir_all(dir.path().join("app")).unwrap();
        std_fs::write(dir.path().join("app/imdb.csv"), "a\n1\n").unwrap();

        let fetch = StaticDirFetch::new(dir.path());
        let resp = fetch
            .fetch("/app/imdb.csv?v=2", &RequestOptions::csv())
            .await
            .unwrap();
        assert_eq!(resp.text().await.unwrap(), "a\n1\n");
    }

    #[tokio::test]
    async fn missing_file_is_transport_error() {
        let dir = tempdir().unwrap();
        let fetch = StaticDirFetch::new(dir.path());
        let err = fetch
            .fetch("/imdb.csv", &RequestOptions::csv())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Transport { ref url, .. } if url == "/imdb.csv"));
    }

    #[tokio::test]
    async fn parent_segments_are_refused() {
        let dir = tempdir().unwrap();
        let fetch = StaticDirFetch::new(dir.path().join("static"));
        let err = fetch
            .fetch("/../secret.csv", &RequestOptions::csv())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Transport { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_decode_error() {
        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join("imdb.csv"), [0x61, 0x0a, 0xff, 0xfe]).unwrap();

        let fetch = StaticDirFetch::new(dir.path());
        let resp = fetch
            .fetch("/imdb.csv", &RequestOptions::csv())
            .await
            .unwrap();
        let err = resp.text().await.err().unwrap();
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}
