//! what the directory cache needs from the rest of the client when a subtree goes away

#[derive(PartialEq, Debug)]
pub enum CascadeError {
    /// the database failed to remove the rows
    DbFailure,
    /// the file system failed to remove the cached files
    FileSystemFailure,
    /// the identifier cannot be mapped to a location, e.g. it contains a path separator
    InvalidIdentifier,
}

/// owner of the file listing rows of each directory
pub trait MetadataStore: Send + Sync {
    /// removes the listing rows of the directory at `path` for `account`
    fn delete_metadata(&self, account: &str, path: &str) -> Result<(), CascadeError>;
}

/// owner of the locally cached file contents of each directory
pub trait LocalFileStore: Send + Sync {
    fn delete_local_file(&self, object_id: &str) -> Result<(), CascadeError>;
}

/// view state (scroll position, open listing controllers) kept per directory by interactive clients
pub trait ViewStateRegistry: Send + Sync {
    /// called off the deleting thread, with no ordering guarantee relative to the deletion itself
    fn drop_view_state(&self, account: &str, path: &str);
}
