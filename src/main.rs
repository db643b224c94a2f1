use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use directory_cache::config::{parse_config, DEFAULT_CONFIG_FILE};
use directory_cache::directory::{
    DirectoryCache, DirectoryPredicate, DirectoryRecord, DirectorySortField,
};
use directory_cache::listing::SqliteMetadataStore;
use directory_cache::local_files::DiskLocalFileStore;
use directory_cache::logging::init_logger;

#[derive(Parser)]
#[command(name = "directory_cache")]
#[command(about = "Inspect and maintain the local directory cache")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables if they don't exist
    Init,
    /// Show one cached directory and its cached files
    Show { account: String, path: String },
    /// List cached directories below a path
    List {
        account: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Only favorite directories
        #[arg(long)]
        favorites: bool,
        /// Only directories kept offline
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        descending: bool,
    },
    /// Force the next listing of a directory to be fetched again
    Invalidate { account: String, path: String },
    /// Remove a directory and everything below it from the cache
    Forget { account: String, path: String },
    /// Mark a directory to be kept offline, or stop keeping it
    Offline {
        account: String,
        path: String,
        #[arg(long, action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match parse_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse config file {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logger(&config.logging) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }
    let cache = DirectoryCache::new(
        &config.database,
        Arc::new(SqliteMetadataStore::new(&config.database)),
        Arc::new(DiskLocalFileStore::new(&config.local_files)),
    );
    match cache.initialize() {
        Ok(version) => log::debug!(
            "Using database v{version} at {}",
            config.database.location
        ),
        Err(e) => {
            log::error!(
                "Failed to initialize database at {}: {e:?}",
                config.database.location
            );
            return ExitCode::FAILURE;
        }
    }

    match cli.command {
        Commands::Init => println!("Database ready at {}", config.database.location),
        Commands::Show { account, path } => match cache.get(&account, &path) {
            Some(directory) => {
                print_directory(&directory);
                let listings = SqliteMetadataStore::new(&config.database).listings(&account, &path);
                println!("  cached files: {}", listings.len());
                for listing in listings {
                    println!("    {}", listing.file_name);
                }
            }
            None => {
                println!("{path} is not cached for {account}");
                return ExitCode::FAILURE;
            }
        },
        Commands::List {
            account,
            path,
            favorites,
            offline,
            descending,
        } => {
            let mut predicate = DirectoryPredicate::Account(account)
                .and(DirectoryPredicate::Subtree(path));
            if favorites {
                predicate = predicate.and(DirectoryPredicate::Favorite(true));
            }
            if offline {
                predicate = predicate.and(DirectoryPredicate::Offline(true));
            }
            match cache.query(&predicate, DirectorySortField::Path, !descending) {
                Some(directories) => directories.iter().for_each(print_directory),
                None => println!("No cached directories"),
            }
        }
        Commands::Invalidate { account, path } => cache.clear_etag(&account, &path),
        Commands::Forget { account, path } => cache.delete_subtree(&account, &path),
        Commands::Offline {
            account,
            path,
            enabled,
        } => cache.set_offline(&account, &path, enabled),
    }
    ExitCode::SUCCESS
}

fn print_directory(directory: &DirectoryRecord) {
    let mut flags = Vec::new();
    if directory.is_favorite {
        flags.push("favorite");
    }
    if directory.is_offline {
        flags.push("offline");
    }
    if directory.is_encrypted {
        flags.push("encrypted");
    }
    let etag = if directory.etag.is_empty() {
        "<stale>"
    } else {
        directory.etag.as_str()
    };
    println!(
        "{} [{}] id={} fileId={} etag={} permissions={} {}",
        directory.path,
        directory.account,
        directory.object_id,
        directory.file_id,
        etag,
        directory.permissions,
        flags.join(",")
    );
    if let Some(synced_at) = directory.offline_synced_at {
        println!("  offline copy synced at {}", synced_at.to_rfc3339());
    }
    if let Some(color) = &directory.color_tag {
        println!("  color: {color}");
    }
}
