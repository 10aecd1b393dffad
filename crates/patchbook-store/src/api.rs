//! # API Facade
//!
//! [`ProjectStore`] is the handle every UI client talks to. It is a **thin
//! facade** over the command layer: it owns the engine, schedules each
//! operation, and fills in configured defaults. The logic itself lives in
//! `commands/*.rs`.
//!
//! ## One Handle, Many Clones
//!
//! The handle is cheap to clone; all clones share one engine behind a mutex.
//! Construct it once at startup (directly, or through
//! [`StoreOpener`](crate::opener::StoreOpener)) and pass clones to whatever
//! needs the store.
//!
//! ## Scheduling
//!
//! Every operation is an `async fn`. The engine work runs on tokio's blocking
//! pool while holding the engine lock, so each call is a single suspension
//! point and concurrent calls from the same process interleave whole, one at a
//! time. There is no ordering between independent calls: a `save` racing a
//! `delete_project` of the same id may land on either side of it.
//!
//! Multi-step operations choose their own granularity:
//! - `delete_project` is one transaction (project and versions together).
//! - `cleanup_old_versions` is one transaction **per project**; other calls can
//!   run between projects.
//! - `stats` reads the two counts in two separate calls, so it is not a
//!   snapshot when writes interleave.
//!
//! ## Absence Is Not an Error
//!
//! Lookups return `Option` or an empty `Vec`. `Err` always means the store
//! could not do what was asked.

use crate::clock::{Clock, SystemClock};
use crate::commands::delete::DeleteOutcome;
use crate::commands::retention::CleanupReport;
use crate::commands::{delete, export, import, projects, retention, search, versions};
use crate::config::StoreOptions;
use crate::error::{Result, StoreError};
use crate::model::{Id, Project, ProjectDraft, ProjectVersion, Stats};
use crate::store::backend::StorageBackend;
use crate::store::Engine;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct ProjectStore {
    engine: Arc<Mutex<Engine>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ProjectStore {
    /// Open (creating if needed) the store behind `backend`.
    pub async fn open(backend: impl StorageBackend, options: StoreOptions) -> Result<Self> {
        Self::open_with_clock(backend, options, Arc::new(SystemClock)).await
    }

    pub async fn open_with_clock(
        backend: impl StorageBackend,
        options: StoreOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Self::open_boxed(Box::new(backend), options, clock).await
    }

    pub(crate) async fn open_boxed(
        backend: Box<dyn StorageBackend>,
        options: StoreOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let engine_clock = Arc::clone(&clock);
        let engine = tokio::task::spawn_blocking(move || {
            Engine::open(backend, engine_clock, options)
        })
        .await
        .map_err(|e| StoreError::open("<store>", e))??;
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            clock,
        })
    }

    /// Whether both handles share the same engine.
    pub fn ptr_eq(&self, other: &ProjectStore) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }

    async fn run<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Engine) -> Result<R> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = engine
                .lock()
                .map_err(|_| StoreError::Storage("Store lock poisoned".to_string()))?;
            op(&mut guard)
        })
        .await;
        joined.map_err(|e| StoreError::Storage(format!("Store task failed: {e}")))?
    }

    async fn read<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&Engine) -> R + Send + 'static,
    {
        self.run(move |engine| Ok(op(engine))).await
    }

    pub async fn location(&self) -> Result<PathBuf> {
        self.read(|engine| engine.location()).await
    }

    // --- Projects ---

    pub async fn save(&self, draft: ProjectDraft) -> Result<Project> {
        self.run(move |engine| projects::save(engine, draft)).await
    }

    pub async fn get(&self, id: &Id) -> Result<Option<Project>> {
        let id = id.clone();
        self.read(move |engine| projects::get(engine, &id)).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Project>> {
        let name = name.to_string();
        self.read(move |engine| projects::find_by_name(engine, &name))
            .await
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.read(projects::list).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Project>> {
        let query = query.to_string();
        self.read(move |engine| search::run(engine, &query)).await
    }

    /// Delete a project and all of its versions atomically.
    pub async fn delete_project(&self, id: &Id) -> Result<DeleteOutcome> {
        let id = id.clone();
        self.run(move |engine| delete::run(engine, &id)).await
    }

    // --- Versions ---

    pub async fn save_version(
        &self,
        project_id: &Id,
        code: impl Into<String>,
        label: Option<String>,
    ) -> Result<ProjectVersion> {
        let project_id = project_id.clone();
        let code = code.into();
        self.run(move |engine| versions::save_version(engine, &project_id, code, label))
            .await
    }

    /// Newest-first history of a project. `None` uses the configured default
    /// limit (20 unless configured otherwise).
    pub async fn list_versions(
        &self,
        project_id: &Id,
        limit: Option<usize>,
    ) -> Result<Vec<ProjectVersion>> {
        let project_id = project_id.clone();
        self.read(move |engine| {
            let limit = limit.unwrap_or(engine.options().version_list_limit);
            versions::list_versions(engine, &project_id, limit)
        })
        .await
    }

    pub async fn get_version(&self, id: &Id) -> Result<Option<ProjectVersion>> {
        let id = id.clone();
        self.read(move |engine| versions::get_version(engine, &id))
            .await
    }

    pub async fn recent_versions(&self, limit: usize) -> Result<Vec<ProjectVersion>> {
        self.read(move |engine| versions::recent_versions(engine, limit))
            .await
    }

    /// Trim every project's history to its `keep` newest versions. `None` uses
    /// the configured default (10 unless configured otherwise).
    ///
    /// On failure the error is [`StoreError::CleanupInterrupted`], carrying the
    /// number of versions already deleted from earlier projects.
    pub async fn cleanup_old_versions(&self, keep: Option<usize>) -> Result<CleanupReport> {
        let (project_ids, keep, scan_limit) = self
            .read(move |engine| {
                let options = *engine.options();
                let ids: Vec<Id> = projects::list(engine).into_iter().map(|p| p.id).collect();
                (
                    ids,
                    keep.unwrap_or(options.keep_versions),
                    options.cleanup_scan_limit,
                )
            })
            .await?;

        let mut report = CleanupReport::default();
        for project_id in project_ids {
            let target = project_id.clone();
            let trimmed = self
                .run(move |engine| retention::trim_project(engine, &target, keep, scan_limit))
                .await;
            match trimmed {
                Ok(deleted) => report.record(project_id, deleted),
                Err(err) => {
                    tracing::warn!(
                        project_id = %project_id,
                        deleted = report.deleted,
                        error = %err,
                        "Cleanup interrupted"
                    );
                    return Err(StoreError::CleanupInterrupted {
                        deleted: report.deleted,
                        source: Box::new(err),
                    });
                }
            }
        }

        tracing::info!(
            deleted = report.deleted,
            projects = report.projects.len(),
            keep,
            "Cleaned up old versions"
        );
        Ok(report)
    }

    // --- Export / Import ---

    pub fn export_project(&self, project: &Project) -> Result<String> {
        export::run(project, self.clock.now())
    }

    pub fn import_project(&self, text: &str) -> Result<ProjectDraft> {
        import::run(text)
    }

    /// Parse an export and save it as a new project.
    pub async fn import_and_save(&self, text: &str) -> Result<Project> {
        let draft = import::run(text)?;
        self.save(draft).await
    }

    // --- Stats ---

    pub async fn stats(&self) -> Result<Stats> {
        let project_count = self.read(search::project_count).await?;
        let version_count = self.read(search::version_count).await?;
        Ok(Stats {
            project_count,
            version_count,
        })
    }
}
