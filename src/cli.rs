use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line front end for browsing the comic catalog
#[derive(Parser)]
#[command(name = "komivox")]
#[command(about = "Browse latest, popular and searched comics and read chapters", long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to the per-user config directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Latest updates, page by page
    Latest {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Popular comics, page by page
    Popular {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Real-time listing
    Realtime {
        #[arg(short, long, default_value_t = 48)]
        count: u32,
        /// Bypass upstream caching
        #[arg(long)]
        fresh: bool,
    },
    /// One offset-based batch
    Scroll {
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
        #[arg(short, long, default_value_t = 20)]
        batch_size: u32,
    },
    /// Search by title
    Search { query: String },
    /// Comic detail and chapter list
    Detail { slug: String },
    /// Chapter pages, e.g. `read solo-leveling-chapter-1`
    Read {
        #[arg(required = true)]
        segments: Vec<String>,
    },
    /// Home page sections
    Home,
    /// Every comic the scroll endpoint yields
    All {
        /// Case-insensitive title filter
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(short, long, default_value_t = 20)]
        batch_size: u32,
        #[arg(short, long, default_value_t = 50)]
        max_batches: usize,
    },
    /// List genres
    Genres {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Comics for a genre
    Genre { name: String },
}
