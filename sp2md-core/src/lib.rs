#![doc = "sp2md-core: export pipeline for SharePoint posts."]

//! Turns SharePoint blog posts into Wiki.js markdown files with their images
//! downloaded next to them.
//!
//! The pipeline for one post, in order:
//! 1. [`rewrite`] finds site-relative images and flattens them to `/<name>`.
//! 2. [`frontmatter`] and [`document`] build the file content and name.
//! 3. [`export_dir`] appends the document to `<export_dir>/<name>.md`.
//! 4. [`assets`] downloads each referenced image into the export directory.
//!
//! [`export`] drives posts through these steps; [`sharepoint`], [`fetch`] and
//! [`convert`] are the default implementations of the [`contract`] traits.

pub mod assets;
pub mod config;
pub mod contract;
pub mod convert;
pub mod document;
pub mod error;
pub mod export;
pub mod export_dir;
pub mod fetch;
pub mod frontmatter;
pub mod http;
pub mod post;
pub mod rewrite;
pub mod sharepoint;

pub use config::ExportConfig;
pub use error::{ExportError, FetchError};
pub use export::{run, ExportReport, PostExporter, PostReport};
pub use post::PostRecord;
