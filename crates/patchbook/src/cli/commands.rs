//! # CLI Layer
//!
//! Responsibilities, in order:
//!
//! 1. **Argument Parsing**: shell arguments into [`Cli`] via clap
//! 2. **Logging**: a `tracing-subscriber` writing to stderr
//! 3. **Configuration**: `StoreConfig` from file and environment, with
//!    `--data-dir` applied on top
//! 4. **Dispatch**: one handler per subcommand, each a few calls on the
//!    `ProjectStore` handle
//! 5. **Output**: strings from `render`, printed here

use super::render;
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use patchbook_store::commands::export;
use patchbook_store::config::default_config_path;
use patchbook_store::{Id, Project, ProjectDraft, ProjectStore, StoreConfig, StoreOpener};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Versions shown under `show`.
const SHOW_VERSIONS: usize = 5;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = load_config(&cli)?;
    let store = StoreOpener::from_config(&config)?
        .open()
        .await
        .context("could not open the project store")?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handle_list(&store).await,
        Commands::Show { id, code } => handle_show(&store, &id, code).await,
        Commands::Save {
            name,
            id,
            description,
            file,
        } => handle_save(&store, name, id, description, file.as_deref()).await,
        Commands::Delete { id } => handle_delete(&store, &id).await,
        Commands::Search { query } => handle_search(&store, &query).await,
        Commands::Snapshot {
            project_id,
            label,
            file,
        } => handle_snapshot(&store, &project_id, label, file.as_deref()).await,
        Commands::Versions { project_id, limit } => {
            handle_versions(&store, project_id.as_deref(), limit, config.version_list_limit)
                .await
        }
        Commands::Cleanup { keep } => handle_cleanup(&store, keep).await,
        Commands::Export { id, output } => handle_export(&store, &id, output).await,
        Commands::Import { file } => handle_import(&store, &file).await,
        Commands::Stats => handle_stats(&store).await,
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "patchbook=debug,patchbook_store=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if let Err(err) = installed {
        tracing::debug!(error = %err, "Keeping the existing tracing subscriber");
    }
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let path = cli.config.clone().or_else(default_config_path);
    let mut config = match path {
        Some(path) => StoreConfig::load_from(&path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
        None => StoreConfig::load().context("could not load config")?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

fn now() -> i64 {
    Utc::now().timestamp_millis()
}

/// The project with `id`, or `None` after printing a not-found notice.
async fn find_project(store: &ProjectStore, id: &str) -> Result<Option<Project>> {
    let project = store.get(&Id::from(id)).await?;
    if project.is_none() {
        print!("{}", render::not_found(id));
    }
    Ok(project)
}

/// Code from `file`, else from piped stdin. `None` when neither supplies any.
fn read_code(file: Option<&Path>) -> Result<Option<String>> {
    if let Some(path) = file {
        let code = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        return Ok(Some(code));
    }
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut code = String::new();
    std::io::stdin()
        .read_to_string(&mut code)
        .context("could not read stdin")?;
    Ok(Some(code))
}

async fn handle_list(store: &ProjectStore) -> Result<()> {
    let projects = store.list().await?;
    print!("{}", render::project_list(&projects, now()));
    Ok(())
}

async fn handle_show(store: &ProjectStore, id: &str, code_only: bool) -> Result<()> {
    let Some(project) = find_project(store, id).await? else {
        return Ok(());
    };
    if code_only {
        print!("{}", project.code);
        return Ok(());
    }
    let versions = store
        .list_versions(&project.id, Some(SHOW_VERSIONS))
        .await?;
    print!("{}", render::project_detail(&project, &versions, now()));
    Ok(())
}

async fn handle_save(
    store: &ProjectStore,
    name: String,
    id: Option<String>,
    description: Option<String>,
    file: Option<&Path>,
) -> Result<()> {
    let code = read_code(file)?.unwrap_or_default();
    let mut draft = ProjectDraft::new(name, code);
    draft.id = id.map(Id::from);
    draft.description = description;

    let project = store.save(draft).await?;
    print!("{}", render::saved(&project));
    Ok(())
}

async fn handle_delete(store: &ProjectStore, id: &str) -> Result<()> {
    let id = Id::from(id);
    let project = store.get(&id).await?;
    // Also sweeps versions left behind by a project that is already gone
    let outcome = store.delete_project(&id).await?;
    match project {
        Some(project) => print!("{}", render::deleted(&project, &outcome)),
        None => print!("{}", render::not_found(id.as_str())),
    }
    Ok(())
}

async fn handle_search(store: &ProjectStore, query: &str) -> Result<()> {
    let projects = store.search(query).await?;
    print!("{}", render::project_list(&projects, now()));
    Ok(())
}

async fn handle_snapshot(
    store: &ProjectStore,
    project_id: &str,
    label: Option<String>,
    file: Option<&Path>,
) -> Result<()> {
    let Some(project) = find_project(store, project_id).await? else {
        return Ok(());
    };
    let code = read_code(file)?.unwrap_or_else(|| project.code.clone());
    let version = store.save_version(&project.id, code, label).await?;
    print!("{}", render::snapshot(&version));
    Ok(())
}

async fn handle_versions(
    store: &ProjectStore,
    project_id: Option<&str>,
    limit: Option<usize>,
    default_limit: usize,
) -> Result<()> {
    let out = match project_id {
        Some(id) => {
            let Some(project) = find_project(store, id).await? else {
                return Ok(());
            };
            let versions = store.list_versions(&project.id, limit).await?;
            render::version_list(&versions, now(), false)
        }
        None => {
            let versions = store
                .recent_versions(limit.unwrap_or(default_limit))
                .await?;
            render::version_list(&versions, now(), true)
        }
    };
    print!("{}", out);
    Ok(())
}

async fn handle_cleanup(store: &ProjectStore, keep: Option<usize>) -> Result<()> {
    let report = store.cleanup_old_versions(keep).await?;
    print!("{}", render::cleanup(&report));
    Ok(())
}

async fn handle_export(store: &ProjectStore, id: &str, output: Option<PathBuf>) -> Result<()> {
    let Some(project) = find_project(store, id).await? else {
        return Ok(());
    };
    let json = store.export_project(&project)?;

    let path = output.unwrap_or_else(|| PathBuf::from(export::file_name(&project)));
    if path.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }
    std::fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("could not write {}", path.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

async fn handle_import(store: &ProjectStore, file: &Path) -> Result<()> {
    let text = if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("could not read stdin")?;
        text
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("could not read {}", file.display()))?
    };
    let project = store.import_and_save(&text).await?;
    print!("{}", render::saved(&project));
    Ok(())
}

async fn handle_stats(store: &ProjectStore) -> Result<()> {
    let stats = store.stats().await?;
    print!("{}", render::stats(&stats));
    Ok(())
}
