use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use futures::executor::LocalPool;
use slidecast::{
    AssetLoader, AssetState, FsMediaSource, Group, GroupPreload, LoaderConfig, LoaderStats,
    Priority,
};

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preload one group of slides from disk and report what loaded.
    Preload(PreloadArgs),
}

#[derive(Parser, Debug)]
struct PreloadArgs {
    /// Directory resource keys are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Background audio track of the group.
    #[arg(long)]
    audio: Option<String>,

    /// Image keys, in slide order.
    #[arg(long = "image", required = true)]
    images: Vec<String>,

    /// Priority class: critical, high or normal.
    #[arg(long, default_value_t = Priority::Critical)]
    priority: Priority,

    /// Maximum simultaneous loads (0 = default).
    #[arg(long, default_value_t = 0)]
    concurrency: usize,

    /// LRU cache capacity (0 = default).
    #[arg(long, default_value_t = 0)]
    cache_size: usize,

    /// Only load the audio track and first image.
    #[arg(long)]
    critical_only: bool,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Log loader decisions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(serde::Serialize)]
struct KeyState {
    src: String,
    state: AssetState,
}

#[derive(serde::Serialize)]
struct Report {
    group: String,
    priority: Priority,
    preload: GroupPreload,
    states: Vec<KeyState>,
    stats: LoaderStats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Preload(args) => cmd_preload(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_preload(args: PreloadArgs) -> anyhow::Result<()> {
    init_tracing(args.verbose);

    if !args.root.is_dir() {
        anyhow::bail!("root '{}' is not a directory", args.root.display());
    }

    let mut group = Group::new("cli");
    if let Some(audio) = &args.audio {
        group = group.with_audio(audio);
    }
    for image in &args.images {
        group = group.with_image(image);
    }

    let mut pool = LocalPool::new();
    let loader = AssetLoader::new(
        LoaderConfig {
            max_cache_size: args.cache_size,
            concurrency_limit: args.concurrency,
        },
        FsMediaSource::new(&args.root),
        pool.spawner(),
    );
    tracing::debug!(?loader, root = %args.root.display(), "loader ready");

    let preload = if args.critical_only {
        loader.preload_group_critical(&group, args.priority)
    } else {
        loader.preload_group(&group, args.priority)
    };
    let preload = pool.run_until(preload);
    pool.run_until_stalled();

    let report = Report {
        group: group.id.clone(),
        priority: args.priority,
        states: group
            .keys()
            .into_iter()
            .map(|src| KeyState {
                src: src.to_string(),
                state: loader.get_state(src),
            })
            .collect(),
        stats: loader.stats(),
        preload,
    };

    if args.json {
        let out = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{out}");
    } else {
        for key in &report.states {
            println!("{:<8} {}", key.state.as_str(), key.src);
        }
        eprintln!(
            "{} loaded, {} unavailable, {} cancelled",
            report.preload.loaded.len(),
            report.preload.unavailable.len(),
            report.preload.cancelled.len()
        );
    }

    if !report.preload.is_complete() {
        anyhow::bail!(
            "{} of {} keys did not load",
            report.preload.unavailable.len() + report.preload.cancelled.len(),
            report.states.len()
        );
    }
    Ok(())
}
