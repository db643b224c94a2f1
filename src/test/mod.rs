use std::fs::{remove_dir_all, remove_file};
use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::DbConfig;
use crate::repository::{initialize_db, open_connection};

pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

/// every test thread gets its own database file, so tests can run in parallel
pub fn db_location() -> String {
    format!("{}.sqlite", current_thread_name())
}

pub fn local_files_location() -> String {
    format!("./{}_local_files", current_thread_name())
}

pub fn db_config() -> DbConfig {
    DbConfig {
        location: db_location(),
        busy_timeout_millis: 5_000,
    }
}

pub fn open_test_connection() -> Connection {
    open_connection(Path::new(&db_location()), Duration::from_secs(5)).unwrap()
}

/// removes anything a previous run of this test left behind and creates a fresh database
pub fn init_db() {
    cleanup();
    let con = open_test_connection();
    initialize_db(&con).unwrap();
    con.close().unwrap();
}

pub fn cleanup() {
    let db_name = db_location();
    remove_file(Path::new(&db_name)).unwrap_or(());
    remove_file(Path::new(&format!("{db_name}-wal"))).unwrap_or(());
    remove_file(Path::new(&format!("{db_name}-shm"))).unwrap_or(());
    remove_dir_all(Path::new(&local_files_location())).unwrap_or(());
}
