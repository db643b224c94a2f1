use std::path::Path;
use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{Connection, OpenFlags, Result};

pub mod metadata_repository;

/// opens a new connection to the database at `location`.
///
/// Every connection waits up to `busy_timeout` for a competing writer before failing,
/// and runs in WAL mode so that readers never wait on writers
pub fn open_connection(location: &Path, busy_timeout: Duration) -> Result<Connection> {
    let con = Connection::open_with_flags(location, OpenFlags::default())?;
    con.busy_timeout(busy_timeout)?;
    con.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    Ok(con)
}

/// runs init.sql on the database
fn create_db(con: &Connection) -> Result<()> {
    let sql = include_str!("../assets/init.sql");
    con.execute_batch(sql)
}

/// handles checking if the database exists, and creates the tables if it doesn't.
///
/// Returns the version of the database after initialization
pub fn initialize_db(con: &Connection) -> Result<u64> {
    let table_version = match metadata_repository::get_version(con) {
        Ok(value) => value,
        Err(e) => {
            // tables haven't been created yet
            log::debug!("Could not read database version ({e:?}), creating tables...");
            create_db(con)?;
            metadata_repository::get_version(con)?
        }
    };
    table_version
        .parse::<u64>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}
