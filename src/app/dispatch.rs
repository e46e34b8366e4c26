use crate::Config;
use crate::app::render::{render_commits, render_digest, render_page, render_post};
use crate::app::status::render_status;
use crate::app::workbench::{DigestKind, Workbench};
use crate::cli::commands::{Cli, Commands, PostCommands};
use crate::client::ApiClient;
use crate::github::MAX_LIMIT;
use crate::posts::{FileBlobStore, PostStore};
use crate::state::AsyncState;
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;

fn open_store(config: &Config) -> Result<Arc<PostStore>> {
    let blobs = FileBlobStore::new(&config.data_dir)
        .with_context(|| format!("opening post store in {}", config.data_dir.display()))?;
    Ok(Arc::new(PostStore::open(
        Arc::new(blobs),
        config.store.storage_key.clone(),
    )))
}

fn workbench(config: &Config, commit_limit: usize) -> Result<Workbench> {
    let backend = Arc::new(ApiClient::new(&config.client.api_base));
    Ok(Workbench::new(
        backend,
        open_store(config)?,
        commit_limit,
        config.store.page_size,
    ))
}

/// Turn a finished operation into its value, or its error message.
fn settled<T>(value: Option<T>, state: AsyncState<Option<T>>) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => bail!(
            "{}",
            state
                .error
                .unwrap_or_else(|| "request did not complete".to_string())
        ),
    }
}

async fn run_generate(
    config: &Config,
    repository: &str,
    sha: Option<String>,
    save: bool,
    title: Option<String>,
) -> Result<()> {
    // A named sha may be older than the usual window.
    let limit = if sha.is_some() {
        MAX_LIMIT
    } else {
        config.client.commit_limit
    };
    let mut bench = workbench(config, limit)?;
    let default_owner = config.github.default_owner.as_deref();

    let commits = bench.fetch_commits(repository, default_owner).await?;
    let commits = settled(commits, bench.commits())?;

    let chosen = match sha.as_deref() {
        Some(sha) => sha.to_string(),
        None => match commits.first() {
            Some(commit) => commit.sha.clone(),
            None => bail!("Repository has no commits"),
        },
    };
    if !bench.select_commit(&chosen) {
        bail!("Commit {chosen} not found in the latest {limit} commits");
    }

    let text = bench.generate_summary().await?;
    let text = settled(text, bench.summary().map(|post| post.blog_post))?;
    println!("{text}");

    if save {
        let post = bench.save_summary(title.as_deref())?;
        info!(id = %post.id, "post saved");
        println!("\nSaved post {} ({})", post.id, post.title);
    }
    Ok(())
}

async fn run_digest(
    config: &Config,
    repository: &str,
    prs: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut bench = workbench(config, config.client.commit_limit)?;
    bench.set_repository(repository, config.github.default_owner.as_deref())?;

    let kind = if prs {
        DigestKind::PullRequests
    } else {
        DigestKind::Commits
    };
    let digest = bench.generate_digest(kind, limit).await?;
    let digest = settled(digest, bench.digest())?;
    println!("{}", render_digest(&digest));
    Ok(())
}

fn run_posts(config: &Config, command: PostCommands) -> Result<()> {
    let mut bench = workbench(config, config.client.commit_limit)?;
    if let Some(error) = bench.store().posts().error {
        bail!("{error}");
    }

    match command {
        PostCommands::List { page } => {
            bench.go_to_page(page);
            println!("{}", render_page(&bench.page()));
        }
        PostCommands::Show { id } => match bench.store().get_post_by_id(&id) {
            Some(post) => println!("{}", render_post(&post)),
            None => bail!("Post {id} not found"),
        },
        PostCommands::Edit {
            id,
            title,
            content_file,
            content,
        } => {
            let content = match content_file {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?,
                ),
                None => content,
            };
            if title.is_none() && content.is_none() {
                bail!("Nothing to change: pass --title, --content or --content-file");
            }
            if !bench
                .edit_post(&id, title.as_deref(), content.as_deref())
                .applied()
            {
                bail!("Post {id} not found");
            }
            println!("Updated post {id}");
        }
        PostCommands::Delete { id } => {
            if !bench.delete_post(&id).applied() {
                bail!("Post {id} not found");
            }
            println!("Deleted post {id}");
        }
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting smartblog gateway on {host} (random port)");
            } else {
                info!("Starting smartblog gateway on {host}:{port}");
            }
            crate::gateway::run_gateway(&host, port, &config).await
        }

        Commands::Commits { repository, limit } => {
            let limit = limit
                .filter(|&n| n > 0)
                .unwrap_or(config.client.commit_limit);
            let mut bench = workbench(&config, limit)?;
            let commits = bench
                .fetch_commits(&repository, config.github.default_owner.as_deref())
                .await?;
            let commits = settled(commits, bench.commits())?;
            println!("{}", render_commits(&commits));
            Ok(())
        }

        Commands::Generate {
            repository,
            sha,
            save,
            title,
        } => run_generate(&config, &repository, sha, save, title).await,

        Commands::Digest {
            repository,
            prs,
            limit,
        } => run_digest(&config, &repository, prs, limit).await,

        Commands::Chat { message } => {
            let bench = workbench(&config, config.client.commit_limit)?;
            let reply = bench.send_chat(&message.join(" ")).await?;
            let reply = settled(reply, bench.chat())?;
            println!("{reply}");
            Ok(())
        }

        Commands::Posts { posts_command } => run_posts(&config, posts_command),

        Commands::Status => {
            let store = open_store(&config)?;
            println!("{}", render_status(&config, &store));
            Ok(())
        }
    }
}
