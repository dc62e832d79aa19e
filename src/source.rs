//! Where fragment markup comes from.
//!
//! The [`FragmentSource`] trait is the single seam between the loader and the
//! outside world. Paths handed to a source are relative to the page being
//! assembled (they may start with `../`).
//!
//! - [`DirSource`] reads files relative to the page's directory on disk.
//! - [`HttpSource`] issues a GET relative to the page's URL.
//!
//! Any non-success status, transport failure or empty body is a
//! [`FetchError`]; the loader treats them all as "fragment unavailable".

use reqwest::Url;
use reqwest::blocking::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("empty response")]
    Empty,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Fetch fragment markup by relative path.
///
/// `Sync` so one source can serve every fetch on the rayon pool.
pub trait FragmentSource: Sync {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Whether a resource exists at `path`. Defaults to a successful fetch.
    fn exists(&self, path: &str) -> bool {
        self.fetch(path).is_ok()
    }
}

fn non_empty(body: String) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        Err(FetchError::Empty)
    } else {
        Ok(body)
    }
}

/// Reads fragments from disk relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    base: PathBuf,
}

impl DirSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl FragmentSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let body = std::fs::read_to_string(self.base.join(path))?;
        non_empty(body)
    }

    fn exists(&self, path: &str) -> bool {
        self.base.join(path).is_file()
    }
}

/// Fetches fragments over HTTP relative to a page URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    page_url: Url,
}

impl HttpSource {
    /// Build a client. No timeout is applied unless one is given.
    pub fn client(timeout: Option<Duration>) -> Result<Client, FetchError> {
        Ok(Client::builder().timeout(timeout).build()?)
    }

    pub fn new(client: Client, page_url: Url) -> Self {
        Self { client, page_url }
    }

    /// Source for the page at `page_path` (relative to the site) under `base`.
    ///
    /// `base` names a directory: a missing trailing `/` is added so its last
    /// path segment survives the join.
    pub fn for_page(client: Client, base: &str, page_path: &str) -> Result<Self, FetchError> {
        let page_url = site_base(base)?
            .join(page_path)
            .map_err(|e| FetchError::InvalidUrl(format!("{page_path}: {e}")))?;
        Ok(Self::new(client, page_url))
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.page_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }
}

/// Parse a site base URL, treating it as a directory.
pub fn site_base(base: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl FragmentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        non_empty(response.text()?)
    }
}
