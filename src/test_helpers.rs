//! Shared test utilities for the folio-site test suite.
//!
//! Provides a recording in-memory [`FragmentSource`], page shell builders and
//! an on-disk fixture site.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = MockSource::new()
//!     .with("components/header.html", "<nav></nav>")
//!     .with_status("components/footer.html", 404);
//! let mut page = Page::parse(&shell_with_slots(&["header", "footer"]));
//! ```

use crate::source::{FetchError, FragmentSource};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
    Delayed(String, Duration),
}

/// In-memory fragment source that records every requested path.
///
/// Unknown paths answer with status 404.
/// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: HashMap<String, MockResponse>,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.responses
            .insert(path.to_string(), MockResponse::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses
            .insert(path.to_string(), MockResponse::Status(status));
        self
    }

    /// Answer after `millis`, to shuffle completion order.
    pub fn with_delay(mut self, path: &str, body: &str, millis: u64) -> Self {
        self.responses.insert(
            path.to_string(),
            MockResponse::Delayed(body.to_string(), Duration::from_millis(millis)),
        );
        self
    }

    /// Paths requested so far, sorted (completion order is not deterministic).
    pub fn requested(&self) -> Vec<String> {
        let mut paths = self.requested.lock().unwrap().clone();
        paths.sort();
        paths
    }
}

impl FragmentSource for MockSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(path.to_string());
        match self.responses.get(path) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Delayed(body, delay)) => {
                std::thread::sleep(*delay);
                Ok(body.clone())
            }
            Some(MockResponse::Status(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// A minimal page shell with one empty placeholder per name.
pub fn shell_with_slots(names: &[&str]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head><title>t</title></head>\n<body>\n");
    for name in names {
        html.push_str(&format!("<div id=\"{name}-placeholder\"></div>\n"));
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub const HEADER_HTML: &str = r##"<nav class="navbar">
  <img class="nav-profile" src="assets/images/profile.jpg" alt="profile">
  <a class="nav-link" href="index.html">Home</a>
  <a class="nav-link" href="#skills">Skills</a>
  <div class="dropdown-content"><a href="projects/bbc-converter.html">BBC</a></div>
</nav>"##;

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Portfolio</title>
    <link rel="stylesheet" href="assets/css/main.css">
</head>
<body>
    <div id="header-placeholder"></div>
    <div id="intro-placeholder"></div>
    <section class="stats">
        <span class="stat-number" data-count="5">0</span>
        <span class="stat-number" data-count="120">0</span>
        <span class="typing-text"></span>
    </section>
    <div class="project-card" data-project-id="wiki-table">Wiki</div>
    <div class="project-card add-more">More</div>
    <img src="assets/images/banner.jpg" alt="banner">
    <div id="footer-placeholder"></div>
</body>
</html>
"##;

pub const PROJECT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <title>BBC</title>
</head>
<body>
    <div id="header-placeholder"></div>
    <div class="code-container"><pre><code>print("hi")</code></pre></div>
    <div id="footer-placeholder"></div>
</body>
</html>
"##;

/// Write a small site to a temp directory:
///
/// ```text
/// index.html                 (header, intro, footer placeholders)
/// about.html                 (no placeholders)
/// components/header.html
/// components/footer.html     (intro.html deliberately missing)
/// projects/bbc-converter.html
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_site(tmp.path());
    tmp
}

pub fn write_site(root: &Path) {
    let write = |rel: &str, body: &str| {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    };
    write("index.html", INDEX_HTML);
    write("about.html", "<html><body><p>About me</p></body></html>");
    write("components/header.html", HEADER_HTML);
    write("components/footer.html", "<footer>© me</footer>");
    write("projects/bbc-converter.html", PROJECT_HTML);
}
