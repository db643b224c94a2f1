//! sql access to the `Directories` table.
//!
//! Every function here expects normalized paths (see [`super::paths::normalize`]) and leaves
//! transaction handling and closing the connection to the caller.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::models::{DirectoryRecord, DirectorySortField, DirectoryUpsert};
use super::predicate::DirectoryPredicate;
use super::paths;

static SELECT_DIRECTORIES: &str = "select objectId, account, path, fileId, etag, permissions, isEncrypted, isFavorite, isOffline, offlineSyncedAt, richWorkspace, colorTag from Directories";

/// retrieves the directory stored under `path` for `account`.
///
/// `Ok(None)` means there is no such directory
pub fn get_by_account_and_path(
    account: &str,
    path: &str,
    con: &Connection,
) -> Result<Option<DirectoryRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/get_by_account_and_path.sql"
    ))?;
    pst.query_row(params![account, path], map_directory)
        .optional()
}

pub fn get_by_object_id(
    object_id: &str,
    con: &Connection,
) -> Result<Option<DirectoryRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/get_by_object_id.sql"
    ))?;
    pst.query_row(params![object_id], map_directory).optional()
}

/// returns the directory at `path` and every directory below it, ordered by path.
/// Only whole path segments count, so `/a` does not pull in `/ab`
pub fn get_subtree(
    account: &str,
    path: &str,
    con: &Connection,
) -> Result<Vec<DirectoryRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/directory/get_subtree.sql"))?;
    let prefix = paths::descendant_prefix(path);
    let rows = pst.query_map(params![account, path, prefix], map_directory)?;
    rows.collect()
}

/// returns every directory matching `predicate`, ordered by `sort` and then by object id
pub fn query(
    predicate: &DirectoryPredicate,
    sort: DirectorySortField,
    ascending: bool,
    con: &Connection,
) -> Result<Vec<DirectoryRecord>, rusqlite::Error> {
    let mut values = Vec::new();
    let filter = predicate.to_sql(&mut values);
    let direction = if ascending { "asc" } else { "desc" };
    let sql = format!(
        "{SELECT_DIRECTORIES} where {filter} order by {} {direction}, objectId {direction}",
        sort.column()
    );
    let mut pst = con.prepare(&sql)?;
    let rows = pst.query_map(params_from_iter(values), map_directory)?;
    rows.collect()
}

/// inserts the record, replacing any record that shares its object id or its account and path
pub fn save_directory(record: &DirectoryRecord, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/save_directory.sql"
    ))?;
    pst.execute(params![
        record.object_id,
        record.account,
        record.path,
        record.file_id,
        record.etag,
        record.permissions,
        record.is_encrypted,
        record.is_favorite,
        record.is_offline,
        record.offline_synced_at,
        record.rich_workspace,
        record.color_tag,
    ])?;
    Ok(())
}

/// refreshes the attributes a listing reports on the record stored under `request.path`.
/// `None` options keep their stored values.
///
/// Returns the number of updated rows, which is 0 when there is no such record
pub fn update_observed_attributes(
    request: &DirectoryUpsert,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/update_observed_attributes.sql"
    ))?;
    pst.execute(params![
        request.is_encrypted,
        request.is_favorite,
        request.etag,
        request.permissions,
        request.rich_workspace,
        request.account,
        request.path,
    ])
}

pub fn delete_by_object_id(object_id: &str, con: &Connection) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/delete_by_object_id.sql"
    ))?;
    pst.execute(params![object_id])
}

pub fn clear_etag(account: &str, path: &str, con: &Connection) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/directory/clear_etag.sql"))?;
    pst.execute(params![account, path])
}

/// changes only the path of the directory with `object_id`
pub fn update_path(
    object_id: &str,
    path: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/update_path_by_object_id.sql"
    ))?;
    pst.execute(params![path, object_id])
}

/// moves every directory below `from_path` to the same place below `to_path`, keeping the part
/// of the path after `from_path`. The directory at `from_path` itself is left alone.
///
/// The root cannot be moved, so a `from_path` of `/` changes nothing
pub fn move_descendants(
    account: &str,
    from_path: &str,
    to_path: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    if from_path == to_path || from_path == "/" {
        return Ok(0);
    }
    // the kept part starts with a slash, so the root must not add another one
    let target = if to_path == "/" { "" } else { to_path };
    let prefix = paths::descendant_prefix(from_path);
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/move_descendants.sql"
    ))?;
    pst.execute(params![target, prefix, account])
}

pub fn set_offline(
    account: &str,
    path: &str,
    is_offline: bool,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/directory/set_offline.sql"))?;
    pst.execute(params![is_offline, account, path])
}

pub fn set_offline_synced_at(
    account: &str,
    path: &str,
    synced_at: DateTime<Utc>,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/set_offline_synced_at.sql"
    ))?;
    pst.execute(params![synced_at, account, path])
}

pub fn set_rich_workspace(
    account: &str,
    path: &str,
    rich_workspace: Option<&str>,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/directory/set_rich_workspace.sql"
    ))?;
    pst.execute(params![rich_workspace, account, path])
}

pub fn set_color_tag(
    account: &str,
    path: &str,
    color_tag: Option<&str>,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/directory/set_color_tag.sql"))?;
    pst.execute(params![color_tag, account, path])
}

fn map_directory(row: &rusqlite::Row) -> Result<DirectoryRecord, rusqlite::Error> {
    Ok(DirectoryRecord {
        object_id: row.get(0)?,
        account: row.get(1)?,
        path: row.get(2)?,
        file_id: row.get(3)?,
        etag: row.get(4)?,
        permissions: row.get(5)?,
        is_encrypted: row.get(6)?,
        is_favorite: row.get(7)?,
        is_offline: row.get(8)?,
        offline_synced_at: row.get(9)?,
        rich_workspace: row.get(10)?,
        color_tag: row.get(11)?,
    })
}
