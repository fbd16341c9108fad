//! # sitegen
//!
//! An incremental static-site converter. Every file under the content
//! directory is mirrored into the output directory: markdown is rendered to
//! HTML by the external `pandoc` program, everything else is copied, and the
//! `%BASEURL%` and `%SITENAME%` placeholders are filled in on the way.
//!
//! # Architecture: One Sequential Pass
//!
//! ```text
//! content/ ──discover──▶ [SourceFile] ──Pipeline──▶ SiteFile ──Converter──▶ public/
//!                                           │
//!                                  StalenessCache (public/.files)
//! ```
//!
//! Files are processed one at a time in discovery order. Each one is bound
//! to a conversion strategy by its extension and is only converted when its
//! modification time differs from the one recorded after its last successful
//! conversion. A failing file is reported and retried on the next run; it
//! never stops the rest of the site from building.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `sitegen.toml` loading, path resolution, validation, CLI overrides |
//! | [`scan`] | Walks the content directory into [`scan::SourceFile`] descriptors |
//! | [`pipeline`] | Runs every file through its conversion unit and collects a [`pipeline::BuildReport`] |
//! | [`site_file`] | The per-file state machine: skip, convert, record |
//! | [`cache`] | Path → modification time of the last successful conversion |
//! | [`convert`] | The [`convert::Converter`] trait, extension dispatch, pandoc and copy strategies |
//! | [`template`] | Nearest-ancestor `.template` lookup for pandoc |
//! | [`placeholder`] | `%BASEURL%` / `%SITENAME%` substitution |
//! | [`clean`] | Empties the output directory |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Cache Lives With the Output
//!
//! The staleness cache is stored at `<output>/.files`, not next to the
//! content. Deleting the output directory (or running `sitegen clean`) is
//! therefore always enough to force a full rebuild, and the content directory
//! stays free of build state.
//!
//! ## Modification Times, Not Hashes
//!
//! A file is stale when its mtime differs from the recorded one, in either
//! direction. Hashing would survive `touch` but costs a full read of every
//! file on every run; mtimes are already in the directory listing.
//!
//! ## Pandoc as an External Program
//!
//! Markdown rendering is delegated to `pandoc` on the `PATH`. Process
//! execution sits behind the [`convert::CommandRunner`] trait so that every
//! code path, including failures, is testable without pandoc installed.

pub mod cache;
pub mod clean;
pub mod config;
pub mod convert;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod scan;
pub mod site_file;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
