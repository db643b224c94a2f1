use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;

use super::models::FileListing;
use super::repository as listing_repository;
use crate::config::DbConfig;
use crate::directory::collaborators::{CascadeError, MetadataStore};
use crate::directory::paths;
use crate::repository;

/// the file listings table, living in the same database file as the directory cache
pub struct SqliteMetadataStore {
    db_location: PathBuf,
    busy_timeout: Duration,
}

impl SqliteMetadataStore {
    pub fn new(db: &DbConfig) -> Self {
        Self {
            db_location: PathBuf::from(&db.location),
            busy_timeout: db.busy_timeout(),
        }
    }

    fn open_connection(&self) -> Result<Connection, rusqlite::Error> {
        repository::open_connection(&self.db_location, self.busy_timeout)
    }

    /// caches one file of the directory at `listing.path`, replacing any listing with the same
    /// object id or the same name in that directory
    pub fn add_listing(&self, listing: &FileListing) -> Result<(), CascadeError> {
        let listing = FileListing {
            path: paths::normalize(&listing.path),
            ..listing.clone()
        };
        let result = self
            .open_connection()
            .and_then(|con| listing_repository::save_listing(&listing, &con));
        result.map_err(|e| {
            log::error!(
                "Failed to save listing {} of {} for account {}! Error is {e:?}\n{}",
                listing.file_name,
                listing.path,
                listing.account,
                Backtrace::force_capture()
            );
            CascadeError::DbFailure
        })
    }

    /// the files cached for the directory at `path`. Failures are logged and returned as an empty list
    pub fn listings(&self, account: &str, path: &str) -> Vec<FileListing> {
        let path = paths::normalize(path);
        let result = self
            .open_connection()
            .and_then(|con| listing_repository::get_listings(account, &path, &con));
        match result {
            Ok(listings) => listings,
            Err(e) => {
                log::error!(
                    "Failed to get file listings of {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                Vec::new()
            }
        }
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn delete_metadata(&self, account: &str, path: &str) -> Result<(), CascadeError> {
        let path = paths::normalize(path);
        let con = self.open_connection().map_err(|e| {
            log::error!(
                "Failed to open database to delete listings of {path}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            CascadeError::DbFailure
        })?;
        match listing_repository::delete_listings(account, &path, &con) {
            Ok(count) => {
                log::debug!("Deleted {count} file listings of {path} for account {account}");
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "Failed to delete listings of {path} for account {account}! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                Err(CascadeError::DbFailure)
            }
        }
    }
}
