use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spdlog::{error, info, warn};

use blogsync::catalog::json_file::JsonCatalog;
use blogsync::catalog::query::{posts_tagged, recent_posts, tag_names};
use blogsync::catalog::CatalogStore;
use blogsync::config::Config;
use blogsync::logger::configure_logger;
use blogsync::reconciler::Reconciler;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "blogsync.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synchronize the catalog with the posts directory (default)
    Sync,
    /// List the posts in the catalog, newest first
    Posts {
        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
}

fn sync(config: &Config) -> Result<()> {
    let mut catalog = JsonCatalog::open(&config.paths.catalog_file)?;
    let reconciler = Reconciler::new(config.source_dir());

    info!("Synchronizing {} into {}", config.paths.posts_dir.display(), catalog.path().display());
    let report = reconciler.run(&mut catalog)
        .with_context(|| format!("Error synchronizing posts from {}", config.paths.posts_dir.display()))?;
    info!("Done: {}", report);

    Ok(())
}

fn list_posts(config: &Config, tag: Option<&str>) -> Result<()> {
    let catalog = JsonCatalog::open(&config.paths.catalog_file)?;

    let posts = match tag {
        Some(tag) => posts_tagged(&catalog, tag)?,
        None => recent_posts(&catalog)?,
    };

    for post in posts {
        let tags: Vec<String> = catalog.tags_of(&post)?.into_iter().map(|t| t.name).collect();
        println!("{}  {:<40} [{}]", post.publish_date, post.slug, tags.join(", "));
    }
    println!("Tags: {}", tag_names(&catalog)?.join(", "));

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run blogsync --help");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let res = match args.command.unwrap_or(Command::Sync) {
        Command::Sync => sync(&config),
        Command::Posts { tag } => list_posts(&config, tag.as_deref()),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            spdlog::default_logger().flush();
            ExitCode::FAILURE
        }
    }
}
