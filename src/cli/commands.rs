use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `smartblog` - turn GitHub commits into blog posts with Gemini.
#[derive(Parser, Debug)]
#[command(name = "smartblog")]
#[command(version)]
#[command(about = "Turn GitHub commits into blog posts.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API gateway (GitHub + Gemini behind one JSON API)
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// List the latest commits of a repository
    Commits {
        /// Repository as owner/name, or a bare name with [github].default_owner
        repository: String,

        /// Number of commits to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Write a blog post about one commit
    Generate {
        /// Repository as owner/name
        repository: String,

        /// Commit sha or prefix (default: most recent commit)
        sha: Option<String>,

        /// Save the generated post to the local collection
        #[arg(long)]
        save: bool,

        /// Title for the saved post (default: first line of the commit message)
        #[arg(long, requires = "save")]
        title: Option<String>,
    },

    /// Write one post covering recent commits or pull requests
    Digest {
        /// Repository as owner/name
        repository: String,

        /// Summarize pull requests instead of commits
        #[arg(long)]
        prs: bool,

        /// Number of items to include
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Ask the model a free-form question
    Chat {
        /// Message to send
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Manage saved posts
    Posts {
        #[command(subcommand)]
        posts_command: PostCommands,
    },

    /// Show configuration and store status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// List saved posts, newest first
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Print one post
    Show { id: String },

    /// Change a post's title or body
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Read the new body from a file
        #[arg(long, conflicts_with = "content")]
        content_file: Option<PathBuf>,

        /// New body text
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a post
    Delete { id: String },
}
