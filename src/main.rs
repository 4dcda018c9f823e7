mod cli;

use seekback::{
    config::{self, Config},
    search::TimeFilter,
    storage::{SearchOptions, Storage},
    watch::SyncWatcher,
};
use seekback_av::{tools::get_tool_path, DurationProbe, FfprobeDurationProbe};
use seekback_common::{format_timestamp, paths::split_file_name, SampleId};
use seekback_db::models::Sample;
use seekback_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Open the index and wire up a storage for `config`.
fn open_storage(config: &Config) -> Result<Storage> {
    let db_path = config.storage.db_path.to_string_lossy();
    tracing::info!("Opening database at {}", db_path);
    let pool = init_pool(&db_path)?;

    let probe = FfprobeDurationProbe::new(config.tools.ffprobe_path.clone());
    Ok(Storage::new(
        config.storage.samples_path.clone(),
        config.layout(),
        pool,
        Arc::new(probe),
    ))
}

async fn start(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    tracing::info!("Starting seekback");
    let storage = Arc::new(open_storage(&config)?);

    // The index must reflect the directory before anything reads it.
    let initial = storage.clone();
    let report = tokio::task::spawn_blocking(move || initial.sync_files())
        .await?
        .context("Initial sync failed")?;
    tracing::info!("Initial sync: {} samples indexed", report.scanned);

    let cancel = CancellationToken::new();
    let watcher_handle = if config.watch.enabled {
        let watcher = SyncWatcher::new(storage.clone(), config.watch.interval());
        Some(tokio::spawn(watcher.run(cancel.clone())))
    } else {
        tracing::info!("Sync watcher is disabled");
        None
    };

    tokio::signal::ctrl_c().await?;

    // Cleanup
    tracing::info!("Shutting down...");
    cancel.cancel();
    if let Some(handle) = watcher_handle {
        let _ = handle.await;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "seekback=trace,seekback_db=debug,seekback_av=debug,seekback_common=debug".to_string()
        } else {
            "seekback=info,seekback_db=info,seekback_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Start => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start(config_path))
        }
        Commands::Sync { json } => sync(config_path, json),
        Commands::Search {
            query,
            overlap,
            contained,
            start_after,
            start_before,
            end_after,
            end_before,
            json,
        } => {
            let filter = TimeFilter {
                overlap: overlap.as_deref().and_then(pair),
                contained: contained.as_deref().and_then(pair),
                start_after,
                start_before,
                end_after,
                end_before,
            };
            search(
                config_path,
                filter.into_options(query.unwrap_or_default()),
                json,
            )
        }
        Commands::List { indexed, json } => list(config_path, indexed, json),
        Commands::Show { id, json } => show(config_path, &SampleId::new(id), json),
        Commands::SetSummary { id, summary } => {
            let storage = open_storage(&config::load_config_or_default(config_path)?)?;
            storage.sample_summary_set(&SampleId::new(id.as_str()), &summary)?;
            println!("Summary of {} updated", id);
            Ok(())
        }
        Commands::SetTranscript {
            id,
            from_file,
            transcript,
        } => {
            let transcript = match (from_file, transcript) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read transcript: {:?}", path))?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("Give a transcript or --from-file"),
            };
            let storage = open_storage(&config::load_config_or_default(config_path)?)?;
            storage.sample_transcript_set(&SampleId::new(id.as_str()), &transcript)?;
            println!("Transcript of {} written; run `seekback sync` to index it", id);
            Ok(())
        }
        Commands::Probe { file } => probe_file(config_path, &file),
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or_else(|| config_path.map(Path::to_path_buf));
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("seekback {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn pair<T: Copy>(values: &[T]) -> Option<(T, T)> {
    match values {
        [a, b] => Some((*a, *b)),
        _ => None,
    }
}

fn sync(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let storage = open_storage(&config)?;
    let report = storage.sync_files()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Scanned:  {}", report.scanned);
        println!("Inserted: {}", report.inserted);
        println!("Updated:  {}", report.updated);
        println!("Deleted:  {}", report.deleted);
        println!("Probed:   {}", report.probed);
    }
    Ok(())
}

fn search(config_path: Option<&Path>, options: SearchOptions, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let storage = open_storage(&config)?;
    let hits = storage.search(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches.");
    }
    for hit in &hits {
        print_sample_line(&hit.sample);
        if !hit.snippet.is_empty() {
            println!("    {}", hit.snippet.replace('\n', " "));
        }
    }
    Ok(())
}

fn list(config_path: Option<&Path>, indexed: bool, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let storage = open_storage(&config)?;
    let samples = if indexed {
        storage.sample_list()?
    } else {
        storage.sample_preview_list()?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
    } else {
        for sample in &samples {
            print_sample_line(sample);
        }
        println!("{} samples", samples.len());
    }
    Ok(())
}

fn show(config_path: Option<&Path>, id: &SampleId, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let storage = open_storage(&config)?;
    let sample = storage.sample_get(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sample)?);
        return Ok(());
    }

    let (start, end) = sample.time_range();
    println!("ID:       {}", sample.id);
    println!("Start:    {}", format_timestamp(&start));
    println!("End:      {}", format_timestamp(&end));
    println!("Duration: {}", format_duration(&sample));
    for media in &sample.media {
        let content_type = split_file_name(media)
            .and_then(|(_, ext)| storage.layout().media.content_type(ext))
            .unwrap_or("unknown");
        println!("Media:    {} ({})", media, content_type);
    }

    // Only media and transcripts are meant to be handed out.
    let allowed = storage
        .layout()
        .media
        .allowed_extensions(&storage.layout().transcript_ext);
    for file in storage.sample_files(id)? {
        let exposed = split_file_name(&file)
            .is_some_and(|(_, ext)| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)));
        println!("File:     {}{}", file, if exposed { "" } else { " (private)" });
    }
    if !sample.summary.is_empty() {
        println!("\n{}", sample.summary);
    }
    Ok(())
}

fn print_sample_line(sample: &Sample) {
    let summary = sample.summary.lines().next().unwrap_or("");
    println!(
        "{}  {:>9}  {}",
        sample.id,
        format_duration(sample),
        summary
    );
}

fn format_duration(sample: &Sample) -> String {
    if !sample.duration_known() {
        return "unknown".to_string();
    }
    let secs = sample.duration.as_secs();
    let mins = secs / 60;
    let hours = mins / 60;
    format!("{:02}:{:02}:{:02}", hours, mins % 60, secs % 60)
}

fn probe_file(config_path: Option<&Path>, file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let program = get_tool_path("ffprobe", config.tools.ffprobe_path.as_deref())?;
    let probe = FfprobeDurationProbe::new(Some(program));
    let duration = probe.probe_duration(file)?;

    println!("File: {}", file.display());
    println!("Duration: {}s", duration.as_secs());
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = seekback_av::check_tools(config.tools.ffprobe_path.as_deref());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Durations stay unknown until ffprobe is installed.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, checking default locations");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Samples path: {}", config.storage.samples_path.display());
    println!("  Database: {}", config.storage.db_path.display());
    println!(
        "  Media types: {}",
        config.media_types.extensions().collect::<Vec<_>>().join(", ")
    );
    println!(
        "  Sidecars: .{} (summary), .{} (transcript)",
        config.storage.summary_ext, config.storage.transcript_ext
    );
    println!(
        "  Exposed extensions: {}",
        config
            .media_types
            .allowed_extensions(&config.storage.transcript_ext)
            .join(", ")
    );
    println!("  Watch enabled: {}", config.watch.enabled);
    if config.watch.enabled {
        println!("  Watch interval: {}s", config.watch.interval_secs);
    }
    Ok(())
}
