pub mod config;
pub mod directory;
pub mod listing;
pub mod local_files;
pub mod logging;
pub mod repository;

#[cfg(test)]
mod test;
