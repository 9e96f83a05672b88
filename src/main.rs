use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use covpost::env::Env;
use covpost::params::ParameterSet;
use covpost::{git, model, provider, upload};

/// covpost — Upload code coverage results to a Codecov-compatible service.
#[derive(Parser)]
#[command(name = "covpost", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload coverage using metadata detected from the CI environment.
    Upload {
        /// Path to a coverage JSON file: {"<path>": [null, 1, 0, ...], ...}
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Upload coverage using branch/commit from a local git checkout.
    Local {
        /// Path to a coverage JSON file.
        file: PathBuf,

        /// Path to the repository checkout.
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Explicit parameters. These win over environment- and platform-derived
/// defaults.
#[derive(Args)]
struct Overrides {
    /// Repository upload token (overrides CODECOV_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Base service URL (overrides CODECOV_URL).
    #[arg(long)]
    url: Option<String>,

    /// Repository slug, e.g. owner/repo.
    #[arg(long)]
    slug: Option<String>,

    /// Branch name.
    #[arg(long)]
    branch: Option<String>,

    /// Commit hash.
    #[arg(long)]
    commit: Option<String>,

    /// Build identifier.
    #[arg(long)]
    build: Option<String>,

    /// Construct and print the request but skip the network call.
    #[arg(long)]
    dry_run: bool,
}

impl Overrides {
    fn into_params(self) -> ParameterSet {
        let mut params = ParameterSet::new();
        if let Some(token) = self.token {
            params.insert("token", token);
        }
        if let Some(url) = self.url {
            params.insert("codecov_url", url);
        }
        if let Some(slug) = self.slug {
            params.insert("slug", slug);
        }
        if let Some(branch) = self.branch {
            params.insert("branch", branch);
        }
        if let Some(commit) = self.commit {
            params.insert("commit", commit);
        }
        if let Some(build) = self.build {
            params.insert("build", build);
        }
        if self.dry_run {
            params.insert("dry_run", true);
        }
        params
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::from_process();

    match cli.command {
        Commands::Upload { file, overrides } => {
            let files = read_coverage(&file)?;
            let params = provider::resolve(&env, overrides.into_params())?;
            upload::upload(&files, params, &env)?;
        }
        Commands::Local {
            file,
            repo,
            overrides,
        } => {
            let files = read_coverage(&file)?;
            let params = git::local_params(&repo, &env, overrides.into_params())?;
            upload::upload(&files, params, &env)?;
        }
    }

    Ok(())
}

fn read_coverage(file: &std::path::Path) -> Result<Vec<model::FileCoverage>> {
    model::from_json_file(file)
        .with_context(|| format!("Failed to read coverage from {}", file.display()))
}
