use rusqlite::{params, Connection};

use super::models::FileListing;

/// inserts the listing, replacing any listing with the same object id or the same name in the same directory
pub fn save_listing(listing: &FileListing, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/listing/save_listing.sql"))?;
    pst.execute(params![
        listing.object_id,
        listing.account,
        listing.path,
        listing.file_name,
        listing.etag
    ])?;
    Ok(())
}

/// returns the files directly inside the directory at `path`, ordered by name
pub fn get_listings(
    account: &str,
    path: &str,
    con: &Connection,
) -> Result<Vec<FileListing>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/listing/get_listings_in_directory.sql"
    ))?;
    let rows = pst.query_map(params![account, path], map_listing)?;
    rows.collect()
}

/// removes the files directly inside the directory at `path`. Files in child directories are left alone
pub fn delete_listings(
    account: &str,
    path: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/listing/delete_listings_in_directory.sql"
    ))?;
    pst.execute(params![account, path])
}

fn map_listing(row: &rusqlite::Row) -> Result<FileListing, rusqlite::Error> {
    Ok(FileListing {
        object_id: row.get(0)?,
        account: row.get(1)?,
        path: row.get(2)?,
        file_name: row.get(3)?,
        etag: row.get(4)?,
    })
}
