use anyhow::{anyhow, Context};
use clap::Parser;
use gcodepath::{init_logging, Config, Dialect, Job, JobReport, Session, SessionOptions, WriterSink};
use std::path::PathBuf;

/// Turn a job file into G-code
#[derive(Debug, Parser)]
#[command(name = "gcodepath", version, long_version = gcodepath::LONG_VERSION, about)]
struct Cli {
    /// Job file (.toml or .json)
    job: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file; defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dialect preset overriding the configured one (standard, grbl, linuxcnc)
    #[arg(long)]
    dialect: Option<String>,

    /// Echo emitted lines to stdout when writing to a file
    #[arg(long)]
    echo: bool,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Ok(Config::load_or_default(&path)?),
            Err(e) => {
                tracing::debug!("{}", e);
                Ok(Config::default())
            }
        },
    }
}

fn session_options(cli: &Cli, config: &Config) -> anyhow::Result<SessionOptions> {
    let mut options = config.session_options();
    if let Some(name) = &cli.dialect {
        options.dialect = Dialect::preset(name).ok_or_else(|| {
            anyhow!(
                "Unknown dialect '{}' (expected one of: {})",
                name,
                Dialect::PRESETS.join(", ")
            )
        })?;
    }
    if cli.echo {
        options.echo = true;
    }
    Ok(options)
}

fn run(cli: &Cli) -> anyhow::Result<JobReport> {
    let config = load_config(cli)?;
    let mut options = session_options(cli, &config)?;
    let job = Job::load(&cli.job)?;

    match &cli.output {
        Some(path) => {
            let mut session = Session::create(path, options)?;
            let report = job.run(session.engine())?;
            session.finish()?;
            tracing::info!(path = %path.display(), "wrote G-code");
            Ok(report)
        }
        None => {
            // Already on stdout
            options.echo = false;
            let sink = WriterSink::new(std::io::stdout().lock());
            let mut session = Session::with_sink(sink, options)?;
            let report = job.run(session.engine())?;
            session.finish()?;
            Ok(report)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    let report = run(&cli)?;
    tracing::info!(
        operations = report.operations,
        meanders = report.meanders.len(),
        position = %report.position,
        "job complete"
    );
    Ok(())
}
