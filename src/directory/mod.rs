pub mod collaborators;
pub mod models;
pub mod paths;
pub mod predicate;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use models::*;
pub use predicate::DirectoryPredicate;
pub use service::DirectoryCache;
