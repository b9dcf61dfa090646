use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use quire_repo::{MemoryProvider, RepositoryHandle, RepositoryRef};
use quire_sync::SyncConfig;
use quire_types::CacheSnapshot;
use quire_update::Updater;

use crate::cli::*;
use crate::seed::seed_from_dir;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Check(args) => cmd_check(&config, args, &cli.format),
        Command::Config => cmd_config(&config, &cli.format),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SyncConfig> {
    match &cli.config {
        Some(path) => SyncConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(SyncConfig::default()),
    }
}

fn cmd_check(config: &SyncConfig, args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let provider = Arc::new(MemoryProvider::with_layout(config.layout.clone()));
    let seeded = seed_from_dir(&provider, &args.dir, &args.author)?;
    let handle = RepositoryHandle::new(provider, RepositoryRef::new(config.repository.clone()));
    let updater = Updater::new(handle, config.layout.clone());

    let snapshot = updater
        .check_updates(&CacheSnapshot::default())?
        .into_snapshot()
        .unwrap_or_default();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!(
                "{} Loaded {} posts and {} files from {}",
                "✓".green().bold(),
                seeded.posts.to_string().bold(),
                seeded.files.to_string().bold(),
                args.dir.display()
            );
            if seeded.skipped > 0 {
                println!("  {} {} non-UTF-8 files skipped", "!".yellow(), seeded.skipped);
            }
            print_snapshot(&snapshot);
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &CacheSnapshot) {
    for language in snapshot.posts.languages() {
        println!("\n{}", language.cyan().bold());
        for post in snapshot.posts.language(language).into_iter().flat_map(|m| m.values()) {
            println!(
                "  {}  {}  {}",
                post.name().yellow(),
                post.title,
                format!("({})", post.author).dimmed()
            );
        }
    }
    if snapshot.posts.is_empty() {
        println!("\nNo posts.");
    }

    println!("\n{} {}", "Configuration:".bold(), snapshot.configurations.len());
    for configuration in snapshot.configurations.iter() {
        println!("  {} ({} keys)", configuration.source.blue(), configuration.settings.len());
    }
}

fn cmd_config(config: &SyncConfig, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
    }
    Ok(())
}
