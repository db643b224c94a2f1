use chrono::{DateTime, Utc};

/// the cached state of one remote folder for one account.
///
/// Values of this type are always detached copies: changing one never changes what is stored
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DirectoryRecord {
    /// stable identity of the folder, survives renames and moves. Unique across all accounts
    pub object_id: String,
    /// the signed-in account this record belongs to
    pub account: String,
    /// normalized server-relative path. Unique per account
    pub path: String,
    /// server-assigned id, may change independently of `object_id`
    pub file_id: String,
    /// change token of the folder listing. Empty means the listing must be fetched again
    pub etag: String,
    pub permissions: String,
    pub is_encrypted: bool,
    pub is_favorite: bool,
    /// the folder is kept available offline
    pub is_offline: bool,
    /// last time the offline copy of this folder finished synchronizing
    pub offline_synced_at: Option<DateTime<Utc>>,
    pub rich_workspace: Option<String>,
    pub color_tag: Option<String>,
}

/// an observation of a folder from a listing or navigation, used to create or refresh its record.
///
/// `None` for `etag`, `permissions` or `rich_workspace` means "not observed": an existing record keeps its value
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DirectoryUpsert {
    pub account: String,
    pub object_id: String,
    pub file_id: String,
    pub path: String,
    pub is_encrypted: bool,
    pub is_favorite: bool,
    pub etag: Option<String>,
    pub permissions: Option<String>,
    pub rich_workspace: Option<String>,
}

/// moves the record at `from_path` and/or replaces some of its server-side attributes.
/// Every `None` field keeps the value of the original record, `is_encrypted` is always applied
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DirectoryMove {
    pub account: String,
    pub from_path: String,
    pub to_path: Option<String>,
    pub object_id: Option<String>,
    pub file_id: Option<String>,
    pub etag: Option<String>,
    pub is_encrypted: bool,
    pub rich_workspace: Option<String>,
}

/// the fields query results can be ordered by
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DirectorySortField {
    Path,
    Account,
    ObjectId,
    FileId,
    Etag,
    Permissions,
    Encrypted,
    Favorite,
    Offline,
    OfflineSyncedAt,
    RichWorkspace,
    ColorTag,
}

impl DirectorySortField {
    pub fn column(&self) -> &'static str {
        match self {
            DirectorySortField::Path => "path",
            DirectorySortField::Account => "account",
            DirectorySortField::ObjectId => "objectId",
            DirectorySortField::FileId => "fileId",
            DirectorySortField::Etag => "etag",
            DirectorySortField::Permissions => "permissions",
            DirectorySortField::Encrypted => "isEncrypted",
            DirectorySortField::Favorite => "isFavorite",
            DirectorySortField::Offline => "isOffline",
            DirectorySortField::OfflineSyncedAt => "offlineSyncedAt",
            DirectorySortField::RichWorkspace => "richWorkspace",
            DirectorySortField::ColorTag => "colorTag",
        }
    }
}

impl From<&DirectoryUpsert> for DirectoryRecord {
    fn from(value: &DirectoryUpsert) -> Self {
        Self {
            object_id: value.object_id.clone(),
            account: value.account.clone(),
            path: value.path.clone(),
            file_id: value.file_id.clone(),
            etag: value.etag.clone().unwrap_or_default(),
            permissions: value.permissions.clone().unwrap_or_default(),
            is_encrypted: value.is_encrypted,
            is_favorite: value.is_favorite,
            is_offline: false,
            offline_synced_at: None,
            rich_workspace: value.rich_workspace.clone(),
            color_tag: None,
        }
    }
}

impl DirectoryRecord {
    /// applies every attribute the move request supplies to this record
    pub fn apply_move(&mut self, request: &DirectoryMove) {
        self.is_encrypted = request.is_encrypted;
        if let Some(to_path) = &request.to_path {
            self.path = to_path.clone();
        }
        if let Some(object_id) = &request.object_id {
            self.object_id = object_id.clone();
        }
        if let Some(file_id) = &request.file_id {
            self.file_id = file_id.clone();
        }
        if let Some(etag) = &request.etag {
            self.etag = etag.clone();
        }
        if let Some(rich_workspace) = &request.rich_workspace {
            self.rich_workspace = Some(rich_workspace.clone());
        }
    }
}
