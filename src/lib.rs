//! # jar-manager - Maven jars from a plain-text list
//!
//! jar-manager keeps a folder of jars in line with a list of Maven
//! coordinates and records every change it makes.
//!
//! ## Features
//!
//! - **Spec files**: one `group:artifact[:version]` per line, versionless
//!   entries resolve to the latest release
//! - **Update only if different**: jars already present at the requested
//!   version are left alone
//! - **Sources**: optional `-sources.jar` download into a separate folder
//! - **Change log**: append-only, timestamped record of additions and updates
//! - **Eclipse user libraries**: generate and merge `.userlibraries` files
//!
//! ## Quick Start
//!
//! ```bash
//! jar-manager download-jars libs.txt --target-folder lib --update-different-only \
//!     --changes-log changes.log
//! ```
//!
//! ## Module Organization
//!
//! - [`spec`] - Coordinate list parsing
//! - [`inventory`] - Identify jars already on disk
//! - [`repository`] - HTTP transport and latest-version lookup
//! - [`reconcile`] - Skip / add / update decisions for a batch
//! - [`fetch`] - Jar and sources downloads
//! - [`ledger`] - Append-only change log

/// CLI command handlers extracted from main.
pub mod commands;

/// Configuration (defaults, Maven `settings.xml`, TOML file).
pub mod config;

/// Coordinates, local artifacts and repository URLs.
pub mod coordinate;

/// Jar and sources downloads.
pub mod fetch;

/// Local jar inventory.
pub mod inventory;

/// Append-only change log.
pub mod ledger;

/// Diagnostic log file setup.
pub mod logging;

/// POM `<dependencies>` generation.
pub mod pom;

/// Batch reconciliation engine.
pub mod reconcile;

/// Remote repository access.
pub mod repository;

/// Spec file parsing.
pub mod spec;

/// Terminal UI utilities (status lines, tables).
pub mod ui;

/// Eclipse user library generation and merging.
pub mod userlibs;
