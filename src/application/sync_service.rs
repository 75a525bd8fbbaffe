// Sync service - Reconciles local dashboard files with the server
use crate::application::dashboard_repository::DashboardRepository;
use crate::application::sanitizer::Sanitizer;
use crate::domain::dashboard::{folder_title_for, DashboardSummary, Folder};
use crate::domain::diff::{hunks, render_diff, Hunk};
use crate::domain::slug::{derive_dirname, derive_filename, disambiguated_filename};
use crate::domain::sync_status::{SyncReport, SyncStatus};
use crate::error::{Result, SyncError};
use crate::infrastructure::local_store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Write changes to disk; off means dry run
    pub sync: bool,
    pub diff: bool,
    /// Place files in one sub-directory per folder
    pub folders: bool,
    pub diff_context: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            sync: false,
            diff: false,
            folders: false,
            diff_context: 3,
        }
    }
}

/// Result of comparing one remote dashboard with its local file.
#[derive(Debug, Clone)]
pub struct DashboardOutcome {
    pub uid: String,
    pub title: String,
    pub path: PathBuf,
    pub status: SyncStatus,
    pub renamed_from: Option<PathBuf>,
    pub diff: Option<Vec<Hunk>>,
}

/// A processed dashboard. A failed removal of a renamed file does not undo
/// the write, so it is carried separately.
struct Processed {
    outcome: DashboardOutcome,
    written: bool,
    cleanup_error: Option<SyncError>,
}

impl DashboardOutcome {
    pub fn needs_write(&self) -> bool {
        self.status.needs_write() || self.renamed_from.is_some()
    }
}

/// Receives progress while a run is in flight.
pub trait SyncReporter: Send {
    fn started(&mut self, dashboards: usize);
    fn dashboard(&mut self, outcome: &DashboardOutcome);
    fn saved(&mut self, outcome: &DashboardOutcome);
    fn failed(&mut self, summary: &DashboardSummary, error: &SyncError);
    fn finished(&mut self, report: &SyncReport, sync: bool);
}

pub struct SyncService {
    repository: Arc<dyn DashboardRepository>,
    sanitizer: Sanitizer,
    output_dir: PathBuf,
    options: SyncOptions,
}

impl SyncService {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        sanitizer: Sanitizer,
        output_dir: PathBuf,
        options: SyncOptions,
    ) -> Self {
        Self {
            repository,
            sanitizer,
            output_dir,
            options,
        }
    }

    /// Runs one reconciliation pass. Only listing failures are returned as
    /// errors; per-dashboard failures are reported and counted.
    pub async fn run(&self, reporter: &mut dyn SyncReporter) -> Result<SyncReport> {
        let folders = if self.options.folders {
            self.repository.list_folders().await?
        } else {
            Vec::new()
        };

        let dashboards = self.repository.list_dashboards().await?;
        tracing::info!("Found {} dashboards", dashboards.len());
        reporter.started(dashboards.len());

        let index = local_store::index_local_files(&self.output_dir);
        let preferred: Vec<PathBuf> = dashboards
            .iter()
            .map(|summary| self.preferred_path(summary, &folders))
            .collect();

        // Files already holding their dashboard's preferred path keep it, even
        // when a colliding dashboard comes earlier in the listing.
        let held: HashMap<PathBuf, String> = dashboards
            .iter()
            .zip(&preferred)
            .filter(|(summary, path)| index.get(&summary.uid) == Some(*path))
            .map(|(summary, path)| (path.clone(), summary.uid.clone()))
            .collect();

        let mut claimed: HashMap<PathBuf, String> = HashMap::new();
        let mut report = SyncReport::default();

        for (summary, preferred) in dashboards.iter().zip(preferred) {
            report.total += 1;
            let path = claim_path(summary, preferred, &held, &mut claimed);

            match self
                .process_dashboard(summary, path, &index, &claimed, reporter)
                .await
            {
                Ok(processed) => {
                    let outcome = &processed.outcome;
                    report.record(outcome.status);
                    if outcome.renamed_from.is_some() {
                        report.renamed += 1;
                    }
                    if processed.written {
                        report.written += 1;
                    }
                    if let Some(e) = processed.cleanup_error {
                        tracing::error!(
                            "Saved {} but could not remove its old file: {}",
                            summary.uid,
                            e
                        );
                        report.failed += 1;
                        reporter.failed(summary, &e);
                    }
                }
                Err(e) => {
                    tracing::error!("Skipping dashboard {} ({}): {}", summary.title, summary.uid, e);
                    report.failed += 1;
                    reporter.failed(summary, &e);
                }
            }
        }

        reporter.finished(&report, self.options.sync);
        Ok(report)
    }

    /// Path derived from the title (and folder) alone.
    fn preferred_path(&self, summary: &DashboardSummary, folders: &[Folder]) -> PathBuf {
        let dir = if self.options.folders {
            self.output_dir.join(derive_dirname(folder_title_for(summary, folders)))
        } else {
            self.output_dir.clone()
        };

        dir.join(derive_filename(&summary.title))
    }

    async fn process_dashboard(
        &self,
        summary: &DashboardSummary,
        path: PathBuf,
        index: &HashMap<String, PathBuf>,
        claimed: &HashMap<PathBuf, String>,
        reporter: &mut dyn SyncReporter,
    ) -> Result<Processed> {
        let document = self.repository.fetch_dashboard(&summary.uid).await?;
        let remote = self.sanitizer.clean(document.body);

        let renamed_from = index
            .get(&summary.uid)
            .filter(|current| current.as_path() != path.as_path())
            .cloned();
        let compare_path: &Path = renamed_from.as_deref().unwrap_or(path.as_path());

        let comparison = local_store::compare(compare_path, &remote)?;
        tracing::debug!("{} -> {} ({})", document.uid, path.display(), comparison.status);

        let diff = (self.options.diff && comparison.status.needs_write()).then(|| {
            let lines = render_diff(&comparison.local_text, &comparison.remote_text);
            hunks(&lines, self.options.diff_context)
        });

        let outcome = DashboardOutcome {
            uid: summary.uid.clone(),
            title: summary.title.clone(),
            path,
            status: comparison.status,
            renamed_from,
            diff,
        };
        reporter.dashboard(&outcome);

        if !self.options.sync || !outcome.needs_write() {
            return Ok(Processed {
                outcome,
                written: false,
                cleanup_error: None,
            });
        }

        local_store::apply(&outcome.path, &remote)?;
        reporter.saved(&outcome);

        let cleanup_error = match &outcome.renamed_from {
            Some(old) if claimed.get(old).is_some_and(|owner| owner != &outcome.uid) => {
                tracing::debug!("{} now belongs to {}; keeping it", old.display(), claimed[old]);
                None
            }
            Some(old) => local_store::remove(old).err(),
            None => None,
        };

        Ok(Processed {
            outcome,
            written: true,
            cleanup_error,
        })
    }
}

/// Claims a target path for `summary`. If the preferred path is held by
/// another dashboard's file or was claimed earlier in this run, the uid is
/// appended instead.
fn claim_path(
    summary: &DashboardSummary,
    preferred: PathBuf,
    held: &HashMap<PathBuf, String>,
    claimed: &mut HashMap<PathBuf, String>,
) -> PathBuf {
    let owner = claimed
        .get(&preferred)
        .or_else(|| held.get(&preferred))
        .filter(|owner| *owner != &summary.uid)
        .cloned();

    let path = match owner {
        Some(owner) => {
            let alternative =
                preferred.with_file_name(disambiguated_filename(&summary.title, &summary.uid));
            tracing::warn!(
                "'{}' ({}) collides with {} on {}; using {}",
                summary.title,
                summary.uid,
                owner,
                preferred.display(),
                alternative.display()
            );
            alternative
        }
        None => preferred,
    };

    claimed.insert(path.clone(), summary.uid.clone());
    path
}
