use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{Connection, TransactionBehavior};

use super::collaborators::{LocalFileStore, MetadataStore, ViewStateRegistry};
use super::models::{DirectoryMove, DirectoryRecord, DirectorySortField, DirectoryUpsert};
use super::paths;
use super::predicate::DirectoryPredicate;
use super::repository as directory_repository;
use crate::config::DbConfig;
use crate::repository;

/// the directory cache of one client.
///
/// Every operation opens its own connection and commits its own transaction before returning.
/// Failures to reach or write the database are logged and reported as "no effect":
/// `()` for writes, `None` for reads. Use [`directory_repository`] directly to see the errors
pub struct DirectoryCache {
    db_location: PathBuf,
    busy_timeout: Duration,
    metadata_store: Arc<dyn MetadataStore>,
    local_file_store: Arc<dyn LocalFileStore>,
    view_state: Option<Arc<dyn ViewStateRegistry>>,
}

impl DirectoryCache {
    pub fn new(
        db: &DbConfig,
        metadata_store: Arc<dyn MetadataStore>,
        local_file_store: Arc<dyn LocalFileStore>,
    ) -> Self {
        Self {
            db_location: PathBuf::from(&db.location),
            busy_timeout: db.busy_timeout(),
            metadata_store,
            local_file_store,
            view_state: None,
        }
    }

    /// registers the interactive client's view state, which is told about every deleted subtree
    pub fn with_view_state(mut self, view_state: Arc<dyn ViewStateRegistry>) -> Self {
        self.view_state = Some(view_state);
        self
    }

    /// creates the database tables if they don't exist yet, and returns the database version
    pub fn initialize(&self) -> Result<u64, rusqlite::Error> {
        let con = self.open_connection()?;
        let version = repository::initialize_db(&con);
        if let Err((_, e)) = con.close() {
            log::warn!("Failed to close connection after initializing database: {e:?}");
        }
        version
    }

    fn open_connection(&self) -> Result<Connection, rusqlite::Error> {
        repository::open_connection(&self.db_location, self.busy_timeout)
    }

    fn read<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, rusqlite::Error> {
        let con = self.open_connection()?;
        operation(&con)
    }

    /// runs `operation` inside an immediate transaction, so concurrent writers queue up at `begin`
    /// instead of failing when they try to upgrade a read lock
    fn write<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, rusqlite::Error> {
        let mut con = self.open_connection()?;
        let tx = con.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = operation(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// creates the record for `request.path`, or refreshes it if it already exists.
    ///
    /// On refresh only `is_encrypted`, `is_favorite` and the supplied options change
    pub fn upsert(&self, request: &DirectoryUpsert) {
        let request = DirectoryUpsert {
            path: paths::normalize(&request.path),
            ..request.clone()
        };
        let result = self.write(|tx| {
            if directory_repository::update_observed_attributes(&request, tx)? == 0 {
                directory_repository::save_directory(&DirectoryRecord::from(&request), tx)?;
            }
            Ok(())
        });
        if let Err(e) = result {
            log::error!(
                "Failed to save directory {} for account {}! Error is {e:?}\n{}",
                request.path,
                request.account,
                Backtrace::force_capture()
            );
        }
    }

    /// deletes the directory at `path` and everything below it.
    ///
    /// The listings and local files of each deleted directory are removed first. Those removals are
    /// not undone if deleting the directories themselves fails
    pub fn delete_subtree(&self, account: &str, path: &str) {
        let path = paths::normalize(path);
        if let Some(view_state) = &self.view_state {
            let view_state = Arc::clone(view_state);
            let account = account.to_string();
            let path = path.clone();
            async_global_executor::spawn(async move {
                view_state.drop_view_state(&account, &path);
            })
            .detach();
        }
        let records = match self.read(|con| directory_repository::get_subtree(account, &path, con)) {
            Ok(records) => records,
            Err(e) => {
                log::error!(
                    "Failed to find directories under {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return;
            }
        };
        if records.is_empty() {
            log::debug!("No cached directories under {path} for account {account}");
            return;
        }
        for record in records.iter() {
            if let Err(e) = self
                .metadata_store
                .delete_metadata(&record.account, &record.path)
            {
                log::warn!(
                    "Failed to delete listings of {} for account {}: {e:?}",
                    record.path,
                    record.account
                );
            }
            if let Err(e) = self.local_file_store.delete_local_file(&record.object_id) {
                log::warn!(
                    "Failed to delete local files of directory {}: {e:?}",
                    record.object_id
                );
            }
        }
        let result = self.write(|tx| {
            for record in records.iter() {
                directory_repository::delete_by_object_id(&record.object_id, tx)?;
            }
            Ok(())
        });
        match result {
            Ok(()) => log::debug!(
                "Deleted {} cached directories under {path} for account {account}",
                records.len()
            ),
            Err(e) => log::error!(
                "Failed to delete directories under {path} for account {account}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            ),
        }
    }

    /// moves the record at `request.from_path` and applies the supplied attributes, as one replacement.
    /// Every directory below `from_path` moves along with it.
    /// Does nothing if there is no record at `from_path`
    pub fn move_directory(&self, request: &DirectoryMove) {
        let from_path = paths::normalize(&request.from_path);
        let request = DirectoryMove {
            to_path: request.to_path.as_deref().map(paths::normalize),
            ..request.clone()
        };
        let result = self.write(|tx| {
            let original = match directory_repository::get_by_account_and_path(
                &request.account,
                &from_path,
                tx,
            )? {
                Some(original) => original,
                None => return Ok(false),
            };
            let mut moved = original.clone();
            moved.apply_move(&request);
            directory_repository::move_descendants(
                &original.account,
                &original.path,
                &moved.path,
                tx,
            )?;
            directory_repository::delete_by_object_id(&original.object_id, tx)?;
            directory_repository::save_directory(&moved, tx)?;
            Ok(true)
        });
        match result {
            Ok(true) => {}
            Ok(false) => log::debug!(
                "Not moving directory {from_path} for account {}, because it is not cached",
                request.account
            ),
            Err(e) => log::error!(
                "Failed to move directory {from_path} for account {}! Error is {e:?}\n{}",
                request.account,
                Backtrace::force_capture()
            ),
        }
    }

    /// forgets the etag of the directory, so its next listing is fetched again
    pub fn clear_etag(&self, account: &str, path: &str) {
        let path = paths::normalize(path);
        if let Err(e) = self.write(|tx| directory_repository::clear_etag(account, &path, tx)) {
            log::error!(
                "Failed to clear etag of {path} for account {account}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
        }
    }

    pub fn get(&self, account: &str, path: &str) -> Option<DirectoryRecord> {
        let path = paths::normalize(path);
        match self.read(|con| directory_repository::get_by_account_and_path(account, &path, con)) {
            Ok(record) => record,
            Err(e) => {
                log::error!(
                    "Failed to get directory {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                None
            }
        }
    }

    /// looks a directory up by its stable identity, wherever it currently lives
    pub fn get_by_id(&self, object_id: &str) -> Option<DirectoryRecord> {
        match self.read(|con| directory_repository::get_by_object_id(object_id, con)) {
            Ok(record) => record,
            Err(e) => {
                log::error!(
                    "Failed to get directory with id {object_id}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                None
            }
        }
    }

    /// returns the matching directories in the requested order, or `None` if nothing matches
    pub fn query(
        &self,
        predicate: &DirectoryPredicate,
        sort: DirectorySortField,
        ascending: bool,
    ) -> Option<Vec<DirectoryRecord>> {
        match self.read(|con| directory_repository::query(predicate, sort, ascending, con)) {
            Ok(records) if records.is_empty() => None,
            Ok(records) => Some(records),
            Err(e) => {
                log::error!(
                    "Failed to query directories with {predicate:?}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                None
            }
        }
    }

    /// changes only the path of the directory with `object_id`, and moves the directories below it along
    pub fn rename(&self, object_id: &str, new_path: &str) {
        let new_path = paths::normalize(new_path);
        let result = self.write(|tx| {
            let original = match directory_repository::get_by_object_id(object_id, tx)? {
                Some(original) => original,
                None => return Ok(false),
            };
            directory_repository::move_descendants(
                &original.account,
                &original.path,
                &new_path,
                tx,
            )?;
            directory_repository::update_path(object_id, &new_path, tx)?;
            Ok(true)
        });
        match result {
            Ok(true) => {}
            Ok(false) => log::debug!("Not renaming directory {object_id}, because it is not cached"),
            Err(e) => log::error!(
                "Failed to rename directory {object_id} to {new_path}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            ),
        }
    }

    pub fn set_offline(&self, account: &str, path: &str, is_offline: bool) {
        let path = paths::normalize(path);
        if let Err(e) =
            self.write(|tx| directory_repository::set_offline(account, &path, is_offline, tx))
        {
            log::error!(
                "Failed to set offline flag of {path} for account {account}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
        }
    }

    /// records that the offline copy of the directory finished synchronizing just now
    pub fn set_offline_synced_now(&self, account: &str, path: &str) {
        let path = paths::normalize(path);
        let now = chrono::Utc::now();
        if let Err(e) =
            self.write(|tx| directory_repository::set_offline_synced_at(account, &path, now, tx))
        {
            log::error!(
                "Failed to set offline sync date of {path} for account {account}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
        }
    }

    /// returns the directory after the update, or `None` if it isn't cached
    pub fn set_rich_workspace(
        &self,
        account: &str,
        path: &str,
        rich_workspace: Option<&str>,
    ) -> Option<DirectoryRecord> {
        let path = paths::normalize(path);
        let result = self.write(|tx| {
            directory_repository::set_rich_workspace(account, &path, rich_workspace, tx)?;
            directory_repository::get_by_account_and_path(account, &path, tx)
        });
        match result {
            Ok(record) => record,
            Err(e) => {
                log::error!(
                    "Failed to set rich workspace of {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                None
            }
        }
    }

    /// returns the directory after the update, or `None` if it isn't cached
    pub fn set_color_tag(
        &self,
        account: &str,
        path: &str,
        color_tag: Option<&str>,
    ) -> Option<DirectoryRecord> {
        let path = paths::normalize(path);
        let result = self.write(|tx| {
            directory_repository::set_color_tag(account, &path, color_tag, tx)?;
            directory_repository::get_by_account_and_path(account, &path, tx)
        });
        match result {
            Ok(record) => record,
            Err(e) => {
                log::error!(
                    "Failed to set color of {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                None
            }
        }
    }
}
