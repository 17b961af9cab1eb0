mod listen;

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use artnode_core::{CountingDriver, NodeConfig, ReplayReport};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

use listen::{ListenOptions, SnapshotDriver};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ARTNODE_BUILD_COMMIT"),
    ", ",
    env!("ARTNODE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "artnode")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Art-Net pixel node: answers ArtPoll and maps ArtDmx universes onto RGB strips.",
    long_about = None,
    after_help = "Examples:\n  artnode listen --config node.json\n  artnode replay show.pcapng -o report.json\n  artnode default-config > node.json"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "debug", "artnode_core=trace")
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a capture through a node and write a JSON report.
    #[command(
        after_help = "Examples:\n  artnode replay show.pcapng -o report.json\n  artnode replay 'captures/*.pcap' --stdout --pretty"
    )]
    Replay {
        /// Path (or glob matching exactly one file) to a .pcap or .pcapng capture
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Node configuration (JSON); defaults apply when omitted
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Run a live node on a UDP socket.
    Listen {
        /// Node configuration (JSON); defaults apply when omitted
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Local address to bind
        #[arg(long, default_value = "0.0.0.0:6454")]
        bind: SocketAddr,

        /// Write the frame buffer as JSON to this path on every render
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,

        /// Seconds between statistics log lines
        #[arg(long, default_value_t = 10.0, value_name = "SECS")]
        stats_interval: f64,

        /// Stop after this many seconds instead of running forever
        #[arg(long, value_name = "SECS")]
        duration: Option<f64>,
    },
    /// Print the default node configuration as JSON.
    DefaultConfig {
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet = matches!(cli.command, Commands::Replay { quiet: true, .. });
    let default_level = if quiet { "warn" } else { "info" };
    init_tracing(cli.log_level.as_deref().unwrap_or(default_level));

    let result = match cli.command {
        Commands::Replay {
            input,
            report,
            stdout,
            pretty,
            compact,
            config,
            quiet,
        } => cmd_replay(input, report, stdout, pretty, compact, config, quiet),
        Commands::Listen {
            config,
            bind,
            snapshot,
            stats_interval,
            duration,
        } => cmd_listen(config, bind, snapshot, stats_interval, duration),
        Commands::DefaultConfig { output } => cmd_default_config(output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn load_config(path: Option<&Path>) -> Result<NodeConfig, CliError> {
    let Some(path) = path else {
        return Ok(NodeConfig::default());
    };
    NodeConfig::load(path).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("run `artnode default-config` for a valid starting point".to_string()),
        )
    })
}

fn cmd_replay(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    config: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report = if stdout {
        None
    } else {
        let report_path = report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&report_path, &input_abs)?;
        Some(report_path)
    };

    let config = load_config(config.as_deref())?;
    let rep = artnode_core::replay_pcap_file(&resolved_input, &config)
        .context("capture replay failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn cmd_listen(
    config: Option<PathBuf>,
    bind: SocketAddr,
    snapshot: Option<PathBuf>,
    stats_interval: f64,
    duration: Option<f64>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let stats_interval = seconds(stats_interval, "--stats-interval")?;
    let duration = duration
        .map(|secs| seconds(secs, "--duration"))
        .transpose()?;
    let options = ListenOptions {
        bind,
        stats_interval,
        duration,
    };

    let stats = match snapshot {
        Some(path) => listen::run(&config, &options, SnapshotDriver::new(path))?,
        None => listen::run(&config, &options, CountingDriver::default())?,
    };
    tracing::info!(
        packets = stats.packets_total,
        dmx_frames = stats.dmx_frames,
        polls = stats.polls,
        "node stopped"
    );
    Ok(())
}

fn cmd_default_config(output: Option<PathBuf>) -> Result<(), CliError> {
    let json = NodeConfig::default()
        .to_json_pretty()
        .context("JSON serialization failed")?;
    match output {
        Some(path) => fs::write(&path, format!("{json}\n"))
            .with_context(|| format!("Failed to write config: {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn seconds(value: f64, flag: &str) -> Result<Duration, CliError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        CliError::new(
            format!("invalid value {value} for {flag}"),
            Some("expected a non-negative number of seconds".to_string()),
        )
    })
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A parent that does not exist yet cannot contain the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let Some(file_name) = report_path.file_name() else {
        return Err(CliError::new(
            format!("invalid report path: {}", report_path.display()),
            Some("pass a file path to -o/--report".to_string()),
        ));
    };
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &ReplayReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!("multiple files match pattern '{pattern}' ({count} matches); matches: {listed}"),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
