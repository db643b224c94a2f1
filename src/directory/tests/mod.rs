use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::directory::collaborators::{
    CascadeError, LocalFileStore, MetadataStore, ViewStateRegistry,
};
use crate::directory::{DirectoryCache, DirectoryUpsert};
use crate::test::{db_config, init_db};

mod repository;

#[derive(Default)]
pub struct RecordingMetadataStore {
    pub deleted: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl MetadataStore for RecordingMetadataStore {
    fn delete_metadata(&self, account: &str, path: &str) -> Result<(), CascadeError> {
        self.deleted
            .lock()
            .unwrap()
            .push((account.to_string(), path.to_string()));
        if self.fail {
            Err(CascadeError::DbFailure)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct RecordingLocalFileStore {
    pub deleted: Mutex<Vec<String>>,
    pub fail: bool,
}

impl LocalFileStore for RecordingLocalFileStore {
    fn delete_local_file(&self, object_id: &str) -> Result<(), CascadeError> {
        self.deleted.lock().unwrap().push(object_id.to_string());
        if self.fail {
            Err(CascadeError::FileSystemFailure)
        } else {
            Ok(())
        }
    }
}

pub struct ChannelViewState {
    pub sender: Mutex<Sender<(String, String)>>,
}

impl ViewStateRegistry for ChannelViewState {
    fn drop_view_state(&self, account: &str, path: &str) {
        self.sender
            .lock()
            .unwrap()
            .send((account.to_string(), path.to_string()))
            .unwrap();
    }
}

pub struct Fixture {
    pub cache: DirectoryCache,
    pub metadata: Arc<RecordingMetadataStore>,
    pub local_files: Arc<RecordingLocalFileStore>,
}

/// a fresh database with a cache whose collaborators record what they are asked to delete
pub fn fixture() -> Fixture {
    fixture_with(
        RecordingMetadataStore::default(),
        RecordingLocalFileStore::default(),
    )
}

pub fn fixture_with(
    metadata: RecordingMetadataStore,
    local_files: RecordingLocalFileStore,
) -> Fixture {
    init_db();
    let metadata = Arc::new(metadata);
    let local_files = Arc::new(local_files);
    let cache = DirectoryCache::new(&db_config(), metadata.clone(), local_files.clone());
    Fixture {
        cache,
        metadata,
        local_files,
    }
}

pub fn upsert_request(account: &str, object_id: &str, path: &str) -> DirectoryUpsert {
    DirectoryUpsert {
        account: account.to_string(),
        object_id: object_id.to_string(),
        file_id: format!("{object_id}-file"),
        path: path.to_string(),
        is_encrypted: false,
        is_favorite: false,
        etag: None,
        permissions: None,
        rich_workspace: None,
    }
}
