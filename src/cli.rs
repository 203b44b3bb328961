use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::ResolverConfig;
use crate::contract::{DefaultDevfileUtils, DevfileUtils};
use crate::devfile::looks_like_devfile_path;
use crate::git_url::GitUrl;
use crate::kube::{names, read_kubernetes_yaml, KubernetesResources, YamlSource};
use crate::load_config::{load_config, load_env_config};

/// CLI for devfile-remote: resolve and fetch devfiles and Kubernetes YAML from git providers.
#[derive(Parser)]
#[clap(
    name = "devfile-remote",
    version,
    about = "Resolve, fetch and classify devfile resources hosted on GitHub, GitLab and Bitbucket"
)]
pub struct Cli {
    /// Optional YAML config file; the token always comes from DEVFILE_GIT_TOKEN
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the repository coordinates of a provider URL as JSON
    Parse { url: String },
    /// Download a file into memory and write it to stdout or a file
    Fetch {
        url: String,
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Clone the repository behind a provider URL into an existing directory
    Clone { url: String, dest: PathBuf },
    /// Classify the Kubernetes documents in a YAML file or URL
    Classify { source: String },
    /// Report whether a path names a devfile
    Check { path: String },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_env_config()?,
    };
    let client = DefaultDevfileUtils::new();

    match cli.command {
        Commands::Parse { url } => {
            let git_url = GitUrl::parse(&url)?;
            println!("{}", serde_json::to_string_pretty(&git_url)?);
        }
        Commands::Fetch { url, output } => {
            let data = client.download_in_memory(config.request(url)).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &data)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {} bytes to {}", data.len(), path.display());
                }
                None => std::io::stdout().write_all(&data)?,
            }
        }
        Commands::Clone { url, dest } => {
            let git_url = authenticated(&url, &config).await?;
            client.clone_git_repo(&git_url, &dest)?;
            println!("Cloned {} into {}", git_url.repo_url(), dest.display());
        }
        Commands::Classify { source } => {
            let source = if source.starts_with("http://") || source.starts_with("https://") {
                YamlSource::Url {
                    url: source,
                    token: config.token.clone().unwrap_or_default(),
                }
            } else {
                YamlSource::Path(PathBuf::from(source))
            };
            let resources =
                read_kubernetes_yaml(source, &client, config.http_timeout_secs).await?;
            print_resources(&resources);
        }
        Commands::Check { path } => {
            println!("{}", looks_like_devfile_path(&path));
        }
    }

    Ok(())
}

async fn authenticated(url: &str, config: &ResolverConfig) -> Result<GitUrl> {
    let mut git_url = GitUrl::parse(url)?;
    if let Some(token) = &config.token {
        git_url.set_token(token, config.http_timeout_secs).await?;
    }
    Ok(git_url)
}

fn print_resources(resources: &KubernetesResources) {
    println!("Deployments: {}", names(&resources.deployments).join(", "));
    println!("Services: {}", names(&resources.services).join(", "));
    println!("Routes: {}", names(&resources.routes).join(", "));
    println!("Ingresses: {}", names(&resources.ingresses).join(", "));
    println!("Others: {}", resources.other_names().join(", "));
}
