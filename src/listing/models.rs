/// one file seen in the listing of a cached directory
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileListing {
    pub object_id: String,
    pub account: String,
    /// the normalized path of the directory that contains the file
    pub path: String,
    pub file_name: String,
    pub etag: String,
}
