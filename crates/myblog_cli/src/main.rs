//! myblog - write, preview and publish blog posts from the terminal.
//!
//! # Usage
//!
//! ```bash
//! myblog new --title "Hello" --tags "rust, life" --content "**hi**"
//! myblog list --published-only --query rust
//! myblog publish <id>
//! myblog export --dir ~/backups
//! ```

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use myblog_core::db::open_db;
use myblog_core::{
    default_log_level, init_logging, BlogService, KeyValueStore, MemoryKeyValueStore,
    SqliteKeyValueStore, SystemClock,
};

/// Write, preview, and publish blog posts. No backend required.
#[derive(Parser, Debug)]
#[command(name = "myblog", version, about, long_about = None)]
struct Cli {
    /// SQLite file holding the post collection
    #[arg(long, env = "MYBLOG_DB", default_value = "myblog.sqlite3", global = true)]
    db: PathBuf,

    /// Keep posts in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    memory: bool,

    /// Directory for rotating log files; logging is off when unset
    #[arg(long, env = "MYBLOG_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "MYBLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new post
    New {
        /// Post title (required, trimmed)
        #[arg(long)]
        title: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[command(flatten)]
        body: ContentArgs,
        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
    /// Edit an existing post; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[command(flatten)]
        body: ContentArgs,
        /// Also mark the post published
        #[arg(long)]
        publish: bool,
    },
    /// List posts, newest update first
    List {
        /// Hide drafts
        #[arg(long)]
        published_only: bool,
        /// Case-insensitive match on title, content or tags
        #[arg(long, short)]
        query: Option<String>,
        /// Oldest update first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Show one post with rendered content
    Show {
        id: String,
        /// Print the raw source instead of rendered markup
        #[arg(long)]
        raw: bool,
    },
    /// Render markdown from a file or stdin
    Preview {
        /// Input file; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Emit bare tags without class attributes
        #[arg(long)]
        plain: bool,
    },
    /// Toggle the published flag of a post
    Publish { id: String },
    /// Delete a post
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Export all posts to a dated JSON file
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Print JSON to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Replace all posts with the contents of a JSON export
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the core library version
    Version,
}

/// Post body source: inline text or a file.
#[derive(Args, Debug, Default)]
struct ContentArgs {
    /// Post content (markdown-like text)
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read post content from a file
    #[arg(long, value_name = "PATH")]
    content_file: Option<PathBuf>,
}

impl ContentArgs {
    fn resolve(&self) -> Result<Option<String>> {
        match (&self.content, &self.content_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("failed to read content from {}", path.display())),
            (None, None) => Ok(None),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, absolute(dir)?).context("failed to start logging")?;
    }

    match cli.command {
        Command::Version => {
            println!("myblog_core {}", myblog_core::core_version());
            Ok(())
        }
        Command::Preview { file, plain } => commands::preview(file.as_deref(), plain),
        command => {
            let storage = open_storage(cli.memory, &cli.db)?;
            let mut service = BlogService::open(storage, SystemClock);
            commands::run(&mut service, command)
        }
    }
}

fn open_storage(memory: bool, db: &Path) -> Result<Box<dyn KeyValueStore>> {
    if memory {
        return Ok(Box::new(MemoryKeyValueStore::new()));
    }
    let conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    Ok(Box::new(SqliteKeyValueStore::try_new(conn)?))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("failed to resolve current directory")?
        .join(path))
}
