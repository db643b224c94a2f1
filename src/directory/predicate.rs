use chrono::{DateTime, Utc};
use rusqlite::types::Value;

use super::paths;

/// how `rusqlite` stores a `DateTime<Utc>`, so stored timestamps compare in order as text
static TIMESTAMP_FORMAT: &str = "%F %T%.f%:z";

/// a filter over directory records, compiled to a sql `where` clause by [`DirectoryPredicate::to_sql`].
///
/// Paths passed to [`DirectoryPredicate::Path`] and [`DirectoryPredicate::Subtree`] are normalized before matching
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DirectoryPredicate {
    /// matches every record
    All,
    Account(String),
    /// exactly this path
    Path(String),
    /// this path and every path below it. `/a` matches `/a/b` but never `/ab`
    Subtree(String),
    ObjectId(String),
    FileId(String),
    Permissions(String),
    Encrypted(bool),
    Favorite(bool),
    Offline(bool),
    /// the cached listing is stale
    EtagEmpty,
    /// `None` matches directories without a color
    ColorTag(Option<String>),
    /// `None` matches directories without rich workspace text
    RichWorkspace(Option<String>),
    /// the offline copy last finished synchronizing strictly before this time
    OfflineSyncedBefore(DateTime<Utc>),
    /// the offline copy never finished synchronizing
    NeverSynced,
    /// an empty list matches everything
    And(Vec<DirectoryPredicate>),
    /// an empty list matches nothing
    Or(Vec<DirectoryPredicate>),
    Not(Box<DirectoryPredicate>),
}

impl DirectoryPredicate {
    /// combines this predicate with `other`, flattening nested `And`s
    pub fn and(self, other: DirectoryPredicate) -> DirectoryPredicate {
        match (self, other) {
            (DirectoryPredicate::And(mut left), DirectoryPredicate::And(right)) => {
                left.extend(right);
                DirectoryPredicate::And(left)
            }
            (DirectoryPredicate::And(mut left), other) => {
                left.push(other);
                DirectoryPredicate::And(left)
            }
            (this, other) => DirectoryPredicate::And(vec![this, other]),
        }
    }

    /// renders this predicate as sql, appending the values for its `?` placeholders to `params` in order
    pub fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            DirectoryPredicate::All => "1 = 1".to_string(),
            DirectoryPredicate::Account(account) => {
                params.push(Value::Text(account.clone()));
                "account = ?".to_string()
            }
            DirectoryPredicate::Path(path) => {
                params.push(Value::Text(paths::normalize(path)));
                "path = ?".to_string()
            }
            DirectoryPredicate::Subtree(path) => {
                let path = paths::normalize(path);
                let prefix = paths::descendant_prefix(&path);
                params.push(Value::Text(path));
                params.push(Value::Text(prefix.clone()));
                params.push(Value::Text(prefix));
                "(path = ? or substr(path, 1, length(?)) = ?)".to_string()
            }
            DirectoryPredicate::ObjectId(object_id) => {
                params.push(Value::Text(object_id.clone()));
                "objectId = ?".to_string()
            }
            DirectoryPredicate::FileId(file_id) => {
                params.push(Value::Text(file_id.clone()));
                "fileId = ?".to_string()
            }
            DirectoryPredicate::Permissions(permissions) => {
                params.push(Value::Text(permissions.clone()));
                "permissions = ?".to_string()
            }
            DirectoryPredicate::Encrypted(flag) => flag_sql("isEncrypted", *flag, params),
            DirectoryPredicate::Favorite(flag) => flag_sql("isFavorite", *flag, params),
            DirectoryPredicate::Offline(flag) => flag_sql("isOffline", *flag, params),
            DirectoryPredicate::EtagEmpty => "etag = ''".to_string(),
            DirectoryPredicate::ColorTag(color_tag) => optional_sql("colorTag", color_tag, params),
            DirectoryPredicate::RichWorkspace(text) => optional_sql("richWorkspace", text, params),
            DirectoryPredicate::OfflineSyncedBefore(time) => {
                params.push(Value::Text(time.format(TIMESTAMP_FORMAT).to_string()));
                "offlineSyncedAt < ?".to_string()
            }
            DirectoryPredicate::NeverSynced => "offlineSyncedAt is null".to_string(),
            DirectoryPredicate::And(predicates) => join(predicates, " and ", "1 = 1", params),
            DirectoryPredicate::Or(predicates) => join(predicates, " or ", "1 = 0", params),
            DirectoryPredicate::Not(predicate) => format!("not ({})", predicate.to_sql(params)),
        }
    }
}

fn flag_sql(column: &str, flag: bool, params: &mut Vec<Value>) -> String {
    params.push(Value::Integer(flag as i64));
    format!("{column} = ?")
}

fn optional_sql(column: &str, value: &Option<String>, params: &mut Vec<Value>) -> String {
    match value {
        Some(value) => {
            params.push(Value::Text(value.clone()));
            format!("{column} = ?")
        }
        None => format!("{column} is null"),
    }
}

fn join(
    predicates: &[DirectoryPredicate],
    separator: &str,
    when_empty: &str,
    params: &mut Vec<Value>,
) -> String {
    if predicates.is_empty() {
        return when_empty.to_string();
    }
    let parts: Vec<String> = predicates.iter().map(|p| p.to_sql(params)).collect();
    format!("({})", parts.join(separator))
}
