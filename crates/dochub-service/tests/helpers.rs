//! Shared test helpers for integration tests.
//!
//! All external collaborators are recording fakes, and storage/locking run
//! on the in-memory providers, so a full engine stack assembles without
//! any backing services.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dochub_cache::memory::MemoryLockProvider;
use dochub_core::config::limits::LimitsConfig;
use dochub_core::config::lock::LockConfig;
use dochub_core::events::structure::{PathEntry, StructureChanges};
use dochub_core::result::AppResult;
use dochub_core::traits::content_sync::ContentSyncClient;
use dochub_core::traits::cooldown::CooldownSignal;
use dochub_core::traits::docstore::{DocUpdateResult, DocstoreClient};
use dochub_core::traits::filestore::FileStoreClient;
use dochub_core::traits::history::HistoryClient;
use dochub_core::traits::tpds::TpdsClient;
use dochub_core::types::{EntityId, ProjectId, UserId};
use dochub_database::MemoryProjectStore;
use dochub_service::context::RequestContext;
use dochub_service::filetree::{StructureChangeNotifier, TreeMutator};
use dochub_service::project::ProjectService;

/// One recorded content-sync structure update.
#[derive(Debug, Clone)]
pub struct SyncUpdate {
    pub project_id: ProjectId,
    pub history_id: Option<String>,
    pub changes: StructureChanges,
}

/// Recording fake for the content-sync engine.
#[derive(Default)]
pub struct FakeContentSync {
    pub updates: Mutex<Vec<SyncUpdate>>,
    pub resyncs: Mutex<Vec<(ProjectId, usize, usize)>>,
}

#[async_trait]
impl ContentSyncClient for FakeContentSync {
    async fn update_project_structure(
        &self,
        project_id: ProjectId,
        history_id: Option<&str>,
        _user_id: UserId,
        changes: &StructureChanges,
    ) -> AppResult<()> {
        self.updates.lock().unwrap().push(SyncUpdate {
            project_id,
            history_id: history_id.map(str::to_string),
            changes: changes.clone(),
        });
        Ok(())
    }

    async fn resync_project_structure(
        &self,
        project_id: ProjectId,
        _history_id: Option<&str>,
        docs: &[PathEntry],
        files: &[PathEntry],
    ) -> AppResult<()> {
        self.resyncs
            .lock()
            .unwrap()
            .push((project_id, docs.len(), files.len()));
        Ok(())
    }
}

/// Recording fake for the third-party mirror.
#[derive(Default)]
pub struct FakeTpds {
    pub events: Mutex<Vec<String>>,
}

#[async_trait]
impl TpdsClient for FakeTpds {
    async fn add_doc(
        &self,
        _project_id: ProjectId,
        _project_name: &str,
        _doc_id: EntityId,
        path: &str,
        _rev: i64,
    ) -> AppResult<()> {
        self.events.lock().unwrap().push(format!("add_doc {path}"));
        Ok(())
    }

    async fn add_file(
        &self,
        _project_id: ProjectId,
        _project_name: &str,
        _file_id: EntityId,
        path: &str,
        _rev: i64,
    ) -> AppResult<()> {
        self.events.lock().unwrap().push(format!("add_file {path}"));
        Ok(())
    }

    async fn move_entity(
        &self,
        _project_id: ProjectId,
        _project_name: &str,
        start_path: &str,
        end_path: &str,
        _rev: i64,
    ) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("move {start_path} -> {end_path}"));
        Ok(())
    }

    async fn delete_entity(
        &self,
        _project_id: ProjectId,
        _project_name: &str,
        path: &str,
    ) -> AppResult<()> {
        self.events.lock().unwrap().push(format!("delete {path}"));
        Ok(())
    }
}

/// Recording fake for the cooldown side channel.
#[derive(Default)]
pub struct FakeCooldown {
    pub hits: Mutex<Vec<ProjectId>>,
}

#[async_trait]
impl CooldownSignal for FakeCooldown {
    async fn put_project_on_cooldown(&self, project_id: ProjectId) -> AppResult<()> {
        self.hits.lock().unwrap().push(project_id);
        Ok(())
    }
}

/// Fake history service handing out sequential ids.
#[derive(Default)]
pub struct FakeHistory {
    pub initialized: Mutex<Vec<ProjectId>>,
    pub flushed: Mutex<Vec<ProjectId>>,
}

#[async_trait]
impl HistoryClient for FakeHistory {
    async fn initialize_project(&self, project_id: ProjectId) -> AppResult<String> {
        let mut initialized = self.initialized.lock().unwrap();
        initialized.push(project_id);
        Ok(format!("history-{}", initialized.len()))
    }

    async fn flush_project(&self, project_id: ProjectId) -> AppResult<()> {
        self.flushed.lock().unwrap().push(project_id);
        Ok(())
    }
}

/// Recording fake for the docstore.
#[derive(Default)]
pub struct FakeDocstore {
    pub updates: Mutex<Vec<(ProjectId, EntityId, Vec<String>)>>,
    pub destroyed: Mutex<Vec<ProjectId>>,
}

#[async_trait]
impl DocstoreClient for FakeDocstore {
    async fn update_doc(
        &self,
        project_id: ProjectId,
        doc_id: EntityId,
        lines: &[String],
        base_rev: i64,
    ) -> AppResult<DocUpdateResult> {
        self.updates
            .lock()
            .unwrap()
            .push((project_id, doc_id, lines.to_vec()));
        Ok(DocUpdateResult {
            modified: true,
            rev: base_rev + 1,
        })
    }

    async fn destroy_project(&self, project_id: ProjectId) -> AppResult<()> {
        self.destroyed.lock().unwrap().push(project_id);
        Ok(())
    }
}

/// Recording fake for the blob store.
#[derive(Default)]
pub struct FakeFileStore {
    pub uploads: Mutex<Vec<(ProjectId, EntityId)>>,
    pub copies: Mutex<Vec<(ProjectId, EntityId, ProjectId, EntityId)>>,
}

#[async_trait]
impl FileStoreClient for FakeFileStore {
    async fn upload_from_disk(
        &self,
        project_id: ProjectId,
        file_id: EntityId,
        _source: &Path,
    ) -> AppResult<String> {
        self.uploads.lock().unwrap().push((project_id, file_id));
        Ok(format!("fake://{project_id}/{file_id}"))
    }

    async fn copy_file(
        &self,
        src_project_id: ProjectId,
        src_file_id: EntityId,
        dest_project_id: ProjectId,
        dest_file_id: EntityId,
    ) -> AppResult<String> {
        self.copies.lock().unwrap().push((
            src_project_id,
            src_file_id,
            dest_project_id,
            dest_file_id,
        ));
        Ok(format!("fake://{dest_project_id}/{dest_file_id}"))
    }
}

/// A fully wired in-memory engine stack.
pub struct TestApp {
    pub store: Arc<MemoryProjectStore>,
    pub mutator: Arc<TreeMutator>,
    pub projects: ProjectService,
    pub sync: Arc<FakeContentSync>,
    pub tpds: Arc<FakeTpds>,
    pub cooldown: Arc<FakeCooldown>,
    pub history: Arc<FakeHistory>,
    pub docstore: Arc<FakeDocstore>,
    pub filestore: Arc<FakeFileStore>,
    pub ctx: RequestContext,
}

impl TestApp {
    /// Assemble a stack with the default entity ceiling.
    pub fn new() -> Self {
        Self::with_limits(LimitsConfig::default())
    }

    /// Assemble a stack with a custom entity ceiling.
    pub fn with_limits(limits: LimitsConfig) -> Self {
        let store = Arc::new(MemoryProjectStore::new());
        let locks = Arc::new(MemoryLockProvider::new(&LockConfig::default()));
        let sync = Arc::new(FakeContentSync::default());
        let tpds = Arc::new(FakeTpds::default());
        let cooldown = Arc::new(FakeCooldown::default());
        let history = Arc::new(FakeHistory::default());
        let docstore = Arc::new(FakeDocstore::default());
        let filestore = Arc::new(FakeFileStore::default());

        let notifier = Arc::new(StructureChangeNotifier::new(sync.clone(), tpds.clone()));
        let mutator = Arc::new(TreeMutator::new(
            store.clone(),
            locks.clone(),
            notifier.clone(),
            cooldown.clone(),
            limits,
        ));
        let projects = ProjectService::new(
            store.clone(),
            locks,
            notifier,
            mutator.clone(),
            history.clone(),
            docstore.clone(),
            filestore.clone(),
        );

        Self {
            store,
            mutator,
            projects,
            sync,
            tpds,
            cooldown,
            history,
            docstore,
            filestore,
            ctx: RequestContext::new(UserId::new()),
        }
    }
}
