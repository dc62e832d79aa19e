//! # Folio Site
//!
//! Fragment assembly and project showcase tooling for a static personal
//! portfolio. Pages are plain HTML shells; shared fragments (header, footer,
//! intro, the project gallery modal) are fetched concurrently and injected
//! into placeholder elements, project details are rendered from a catalog,
//! and a handful of page effects are wired once everything is in place.
//!
//! # Architecture: Load, Then Wire
//!
//! Every page goes through the same two phases:
//!
//! ```text
//! 1. Load   registry → fetch all fragments concurrently → inject into slots
//!                      (header injection also rewrites its links for depth)
//! 2. Wire   fragments ready → copy buttons, effect targets, load hints
//! ```
//!
//! The second phase starts only after every fetch of the first has settled,
//! successful or not. Effects therefore always see the fully assembled page,
//! including markup that arrived inside fragments.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Fragment names and paths for one page, prefixed by page depth |
//! | [`source`] | Where fragment markup comes from: disk or HTTP |
//! | [`loader`] | Concurrent fetch and injection with per-fragment fallback |
//! | [`rewrite`] | Header link and image rewriting for nested pages |
//! | [`page`] | Page shells split into literal markup and placeholder slots |
//! | [`markup`] | Start-tag scanner used by every markup transformation |
//! | [`catalog`] | Ordered, id-unique project records |
//! | [`render`] | Project detail and gallery markup (Maud) |
//! | [`modal`] | Explicit modal state with generation-checked dismiss |
//! | [`app`] | Project navigation: page, modal detail or gallery |
//! | [`effects`] | Counters, typed text, scroll reveal, clipboard copy |
//! | [`optimize`] | Lazy image loading and preload hints |
//! | [`site`] | Whole-site walk: assemble every page into an output directory |
//! | [`template`] | Standalone project pages and quick project setup |
//! | [`config`] | `folio.toml` loading, merging and validation |
//! | [`types`] | Shared types: project records, page depth |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Global State
//!
//! The catalog, registry, loader, modal and app controller are ordinary values
//! built once and passed by reference. Nothing is looked up through a global,
//! which is what lets every piece be tested in isolation.
//!
//! ## Slots Instead of a DOM
//!
//! A page is parsed once into literal markup and named slots
//! ([`page::Page`]). Injection replaces slot content only, so bytes outside the
//! placeholders come out exactly as they went in. Markup transformations that
//! need element context (the header rewriter, copy buttons) use the small
//! start-tag scanner in [`markup`] rather than a full HTML parser.
//!
//! ## Failure Stays Local
//!
//! A fragment that fails to load gets a visible warning block in its own slot
//! and a log line; nothing else on the page is affected and nothing is
//! retried. An unknown project id leaves the modal exactly as it was.
//!
//! ## Maud for Generated Markup
//!
//! Every piece of markup this crate generates (detail view, gallery, fallback
//! blocks, project pages, preload hints) is written with Maud, so all
//! interpolated text is escaped by construction.

pub mod app;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod loader;
pub mod markup;
pub mod modal;
pub mod optimize;
pub mod output;
pub mod page;
pub mod registry;
pub mod render;
pub mod rewrite;
pub mod site;
pub mod source;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
