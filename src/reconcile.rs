//! Reconciliation of requested coordinates against a local directory.
//!
//! The flow for one run:
//!
//! 1. Structural preconditions are checked once ([`check_preconditions`]).
//! 2. With update-only-if-different, coordinates without a version whose
//!    artifact is already present are dropped up front ([`prefilter`]); this
//!    avoids a metadata round-trip for them.
//! 3. Every remaining coordinate gets a concrete version, a [`Decision`], and
//!    if needed a download. Failures stay local to that coordinate.
//! 4. Each finalized decision is written to the ledger before the next
//!    coordinate is looked at.

use crate::config::Config;
use crate::coordinate::{Coordinate, ResolvedArtifact, artifact_path};
use crate::fetch::{FetchTargets, Fetcher};
use crate::inventory::{self, InventoryError, ScanOptions};
use crate::ledger::{Action, ChangeLedger};
use crate::repository::{self, Transport};
use crate::spec;
use crate::ui::{self, Table};
use colored::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{what} does not exist: {}", .path.display())]
    Precondition { what: &'static str, path: PathBuf },
    #[error("failed to read spec file {}: {source}", .path.display())]
    Spec {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// What to do with one requested artifact once its version is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Add,
    Update { previous: String },
}

/// Final state of one requested coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added { version: String },
    Updated { version: String, previous: String },
    /// `version` is the local version when known.
    Skipped { version: Option<String> },
    Failed { reason: String },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Added { .. } => "Added",
            Outcome::Updated { .. } => "Updated",
            Outcome::Skipped { .. } => "Skipped",
            Outcome::Failed { .. } => "Failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub coordinate: Coordinate,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl RunReport {
    fn push(&mut self, coordinate: &Coordinate, outcome: Outcome) {
        self.artifacts.push(ArtifactReport {
            coordinate: coordinate.clone(),
            outcome,
        });
    }

    pub fn count(&self, label: &str) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.outcome.label() == label)
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.count("Failed") > 0
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(&["Artifact", "Result", "Version"]);
        for report in &self.artifacts {
            let (result, version) = match &report.outcome {
                Outcome::Added { version } => ("Added".green().to_string(), version.clone()),
                Outcome::Updated { version, previous } => (
                    "Updated".cyan().to_string(),
                    format!("{} -> {}", previous, version),
                ),
                Outcome::Skipped { version } => (
                    "Skipped".dimmed().to_string(),
                    version.clone().unwrap_or_else(|| "-".to_string()),
                ),
                Outcome::Failed { reason } => ("Failed".red().to_string(), reason.clone()),
            };
            let c = &report.coordinate;
            table.add_row(vec![format!("{}:{}", c.group_id, c.artifact_id), result, version]);
        }
        table
    }

    pub fn print_summary(&self) {
        let table = self.table();
        if table.is_empty() {
            ui::warn("No artifacts were processed");
            return;
        }
        table.print();
        println!(
            "  {} added, {} updated, {} skipped, {} failed",
            self.count("Added"),
            self.count("Updated"),
            self.count("Skipped"),
            self.count("Failed")
        );
    }
}

/// Inputs of a `download-jars` run.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub spec_file: PathBuf,
    pub target_dir: PathBuf,
    /// Download sources into this directory when set.
    pub sources_dir: Option<PathBuf>,
    pub update_only_if_different: bool,
    pub changes_log: Option<PathBuf>,
}

/// Checks every structural requirement before any artifact is touched.
pub fn check_preconditions(request: &DownloadRequest) -> Result<(), ReconcileError> {
    require(&request.spec_file, "Spec file")?;
    require(&request.target_dir, "Target folder")?;
    if let Some(dir) = &request.sources_dir {
        require(dir, "Source target folder")?;
    }
    if let Some(log) = &request.changes_log {
        let parent = match log.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        require(parent, "Changes log folder")?;
    }
    Ok(())
}

fn require(path: &Path, what: &'static str) -> Result<(), ReconcileError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReconcileError::Precondition {
            what,
            path: path.to_path_buf(),
        })
    }
}

/// Splits `requested` into coordinates that still need processing and
/// coordinates that can be skipped without contacting the repository.
///
/// Only versionless coordinates whose artifact is already in `inventory`
/// are skipped; explicit versions are compared later by [`decide`].
pub fn prefilter(
    requested: &[Coordinate],
    inventory: &[ResolvedArtifact],
    update_only_if_different: bool,
) -> (Vec<Coordinate>, Vec<Coordinate>) {
    requested
        .iter()
        .cloned()
        .partition(|c| !skips_lookup(c, inventory, update_only_if_different))
}

/// Versionless and already present: nothing to resolve remotely.
fn skips_lookup(coordinate: &Coordinate, inventory: &[ResolvedArtifact], update_only_if_different: bool) -> bool {
    update_only_if_different
        && coordinate.version.is_none()
        && find_existing(coordinate, inventory).is_some()
}

/// First local artifact with the same group and artifact id.
pub fn find_existing<'a>(
    coordinate: &Coordinate,
    inventory: &'a [ResolvedArtifact],
) -> Option<&'a ResolvedArtifact> {
    inventory
        .iter()
        .find(|a| a.coordinate.same_artifact(coordinate))
}

pub fn decide(
    requested_version: &str,
    existing: Option<&ResolvedArtifact>,
    update_only_if_different: bool,
) -> Decision {
    match existing {
        None => Decision::Add,
        Some(local) if update_only_if_different && local.version() == Some(requested_version) => {
            Decision::Skip
        }
        Some(local) => Decision::Update {
            previous: local.version().unwrap_or_default().to_string(),
        },
    }
}

/// Drives resolution, decisions, downloads and ledger writes for a batch.
pub struct Reconciler<'a> {
    base_url: &'a str,
    transport: &'a dyn Transport,
    fetcher: Fetcher<'a>,
    ledger: Option<&'a ChangeLedger>,
    log_skipped: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(base_url: &'a str, transport: &'a dyn Transport) -> Self {
        Self {
            base_url,
            transport,
            fetcher: Fetcher::new(transport),
            ledger: None,
            log_skipped: false,
        }
    }

    pub fn with_ledger(mut self, ledger: Option<&'a ChangeLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Also write `Skipped` lines to the ledger.
    pub fn log_skipped(mut self, enabled: bool) -> Self {
        self.log_skipped = enabled;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.fetcher = self.fetcher.quiet();
        self
    }

    pub fn reconcile(
        &self,
        requested: &[Coordinate],
        inventory: &[ResolvedArtifact],
        targets: FetchTargets<'_>,
        update_only_if_different: bool,
    ) -> RunReport {
        let (_, present) = prefilter(requested, inventory, update_only_if_different);
        if !present.is_empty() {
            tracing::info!("{} versionless artifacts already present", present.len());
        }

        let mut report = RunReport::default();
        for coordinate in requested {
            let outcome = if skips_lookup(coordinate, inventory, update_only_if_different) {
                self.skip_present(coordinate, inventory)
            } else {
                self.process(coordinate, inventory, targets, update_only_if_different)
            };
            report.push(coordinate, outcome);
        }
        report
    }

    fn skip_present(&self, coordinate: &Coordinate, inventory: &[ResolvedArtifact]) -> Outcome {
        let version = find_existing(coordinate, inventory)
            .and_then(|a| a.version())
            .map(str::to_string);
        ui::info(format!(
            "{} is already present ({}), skipping latest lookup",
            coordinate.artifact_id,
            version.as_deref().unwrap_or("unknown version")
        ));
        if let Some(v) = &version {
            self.log_skip(coordinate, v);
        }
        Outcome::Skipped { version }
    }

    fn process(
        &self,
        coordinate: &Coordinate,
        inventory: &[ResolvedArtifact],
        targets: FetchTargets<'_>,
        update_only_if_different: bool,
    ) -> Outcome {
        let path = artifact_path(self.base_url, coordinate);
        tracing::info!(
            "requested version of {} is {}",
            coordinate.artifact_id,
            coordinate.version.as_deref().unwrap_or("latest")
        );

        let version = match &coordinate.version {
            Some(v) => v.clone(),
            None => match repository::latest_version(self.transport, &path) {
                Some(v) => {
                    ui::info(format!("Latest version of {} is {}", coordinate.artifact_id, v.bold()));
                    v
                }
                None => {
                    ui::error(format!("Failed to get the latest version of {}", coordinate.artifact_id));
                    return Outcome::Failed {
                        reason: "latest version unavailable".to_string(),
                    };
                }
            },
        };

        let existing = find_existing(coordinate, inventory);
        let decision = decide(&version, existing, update_only_if_different);

        if decision == Decision::Skip {
            ui::info(format!(
                "Artifact {} of version {} already exists, skipping download",
                coordinate.artifact_id, version
            ));
            self.log_skip(coordinate, &version);
            return Outcome::Skipped {
                version: Some(version),
            };
        }

        let Some(downloaded) = self.fetcher.fetch(coordinate, &version, &path, targets) else {
            return Outcome::Failed {
                reason: "download failed".to_string(),
            };
        };
        let file_name = coordinate.jar_name();

        match decision {
            Decision::Update { previous } => {
                ui::success(format!("Updated {} {} -> {}", file_name, previous, version));
                if let Some(ledger) = self.ledger {
                    ledger.record(
                        Action::Updated,
                        &file_name,
                        &coordinate.group_id,
                        &coordinate.artifact_id,
                        &version,
                        Some(&previous),
                    );
                }
                Outcome::Updated { version, previous }
            }
            _ => {
                ui::success(format!("Added {} ({})", file_name, version));
                if let Some(ledger) = self.ledger {
                    ledger.record(
                        Action::Added,
                        &file_name,
                        &coordinate.group_id,
                        &coordinate.artifact_id,
                        &version,
                        None,
                    );
                }
                tracing::debug!("downloaded to {:?}", downloaded.path());
                Outcome::Added { version }
            }
        }
    }

    fn log_skip(&self, coordinate: &Coordinate, version: &str) {
        if !self.log_skipped {
            return;
        }
        if let Some(ledger) = self.ledger {
            ledger.record(
                Action::Skipped,
                &coordinate.jar_name(),
                &coordinate.group_id,
                &coordinate.artifact_id,
                version,
                None,
            );
        }
    }
}

/// Runs a whole `download-jars` batch.
///
/// Only structural problems are returned as errors; per-artifact problems
/// end up as [`Outcome::Failed`] entries in the report.
pub fn download_artifacts(
    config: &Config,
    transport: &dyn Transport,
    request: &DownloadRequest,
) -> Result<RunReport, ReconcileError> {
    check_preconditions(request)?;

    let requested = spec::parse_spec_file(&request.spec_file).map_err(|source| ReconcileError::Spec {
        path: request.spec_file.clone(),
        source,
    })?;
    ui::info(format!(
        "{} artifacts requested in {}",
        requested.len(),
        request.spec_file.display()
    ));

    let ledger = request.changes_log.clone().map(ChangeLedger::new);
    if let Some(ledger) = &ledger {
        tracing::info!("recording changes to {}", ledger.path().display());
    }

    let inventory = if request.update_only_if_different {
        let found = inventory::scan_directory(&request.target_dir, &ScanOptions::primary())?;
        if found.is_empty() {
            ui::warn(format!(
                "No JAR files found in target folder: {}, update only flag is ignored",
                request.target_dir.display()
            ));
        }
        found
    } else {
        Vec::new()
    };

    let targets = FetchTargets {
        target_dir: &request.target_dir,
        sources_dir: request.sources_dir.as_deref(),
    };

    let mut reconciler = Reconciler::new(config.base_url(), transport)
        .with_ledger(ledger.as_ref())
        .log_skipped(config.changes.log_skipped);
    if !console::Term::stdout().is_term() {
        reconciler = reconciler.quiet();
    }

    Ok(reconciler.reconcile(
        &requested,
        &inventory,
        targets,
        request.update_only_if_different,
    ))
}
