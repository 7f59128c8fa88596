//! The `thumbsmith run` command: execute the pipeline over a URL list.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use thumbsmith_core::{Config, RunSummary, ThumbnailService};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image URLs to process
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line.
    /// Blank lines and lines starting with '#' are skipped.
    #[arg(long, value_name = "FILE")]
    pub urls_file: Option<PathBuf>,

    /// Override the working directory holding incoming/ and outgoing/
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Override target widths (comma separated, e.g. 32,64,200)
    #[arg(long, value_delimiter = ',', value_name = "WIDTH")]
    pub widths: Option<Vec<u32>>,

    /// Override resize worker count (0 = one per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Override concurrent download slots
    #[arg(long)]
    pub fetch_workers: Option<usize>,

    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Execute the run command.
pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    let urls = collect_urls(&args)?;
    if urls.is_empty() {
        anyhow::bail!("No URLs given. Pass URLs as arguments or via --urls-file.");
    }

    let service = ThumbnailService::new(config);

    let spinner = create_spinner(urls.len());
    let summary = service.run(&urls).await?;
    spinner.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Fold CLI flags onto the loaded configuration.
fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(home) = &args.home {
        config.general.home_dir = home.clone();
    }
    if let Some(widths) = &args.widths {
        config.resize.target_widths = widths.clone();
    }
    if let Some(workers) = args.workers {
        config.resize.workers = workers;
    }
    if let Some(fetch_workers) = args.fetch_workers {
        config.fetch.workers = fetch_workers;
    }
}

/// Merge positional URLs with the optional URL file.
fn collect_urls(args: &RunArgs) -> anyhow::Result<Vec<String>> {
    let mut urls = args.urls.clone();
    if let Some(path) = &args.urls_file {
        urls.extend(read_urls_file(path)?);
    }
    Ok(urls)
}

/// Read a line-oriented URL file, skipping blanks and '#' comments.
fn read_urls_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read URL file {}: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// A steady-tick spinner for the run (the pipeline reports per-item
/// progress through tracing, not through the bar).
fn create_spinner(total: usize) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("processing {total} URL(s)..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a formatted summary table after a run.
fn print_summary(summary: &RunSummary) {
    let elapsed_secs = summary.elapsed_ms as f64 / 1000.0;
    let mb_down = summary.downloaded_bytes as f64 / 1_000_000.0;
    let mb_out = summary.produced_bytes as f64 / 1_000_000.0;
    let throughput = if elapsed_secs > 0.0 {
        mb_down / elapsed_secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    URLs:         {:>8}", summary.urls_total);
    eprintln!("    Fetched:      {:>8}", summary.fetched);
    if summary.fetch_failed > 0 {
        eprintln!("    Failed:       {:>8}", summary.fetch_failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Downloaded:   {:>8.2} MB", mb_down);
    eprintln!("    Produced:     {:>8.2} MB", mb_out);
    eprintln!("    Duration:     {:>7.1}s", elapsed_secs);
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}
