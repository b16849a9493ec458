use clap::{CommandFactory, Parser};
use log::info;
use std::process::ExitCode;
use tally::{PipelineBuilder, PipelineError, ReportConfig};
use tally_source::ConnectionConfig;

/// Regenerates the standard e-commerce report: charts, an interactive view
/// and a formatted workbook.
#[derive(Parser, Debug)]
#[command(name = "tally", version)]
#[command(about = "Fixed analytical queries rendered to charts and a workbook")]
struct Cli {
    /// Run every report section and write the workbook
    #[arg(long)]
    run_all: bool,

    /// Write the interactive monthly GMV by category chart
    #[arg(long)]
    interactive: bool,

    /// Preview the snapshot queries and save them as CSV
    #[arg(long)]
    snapshot: bool,

    /// Do not open the interactive chart in the system viewer
    #[arg(long)]
    no_open: bool,
}

impl Cli {
    fn any_stage(&self) -> bool {
        self.run_all || self.interactive || self.snapshot
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.any_stage() {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[{}] {}", e.stage(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = ReportConfig::load()?;
    let connection = ConnectionConfig::from_env();
    info!("Using {}", connection.describe());

    let mut builder = PipelineBuilder::new()
        .with_config(config)
        .with_data_source(connect(&connection)?);
    if cli.no_open {
        builder = builder.with_viewer(false);
    }
    let mut pipeline = builder.build()?;

    if cli.run_all {
        pipeline.run_all()?;
    }
    if cli.interactive {
        pipeline.interactive()?;
    }
    if cli.snapshot {
        pipeline.snapshot()?;
    }
    Ok(())
}

#[cfg(feature = "postgres")]
fn connect(config: &ConnectionConfig) -> Result<tally_source::PostgresDataSource, PipelineError> {
    use tally_source::DataSource;

    let mut source = tally_source::PostgresDataSource::connect(config)?;
    source.ping()?;
    Ok(source)
}

#[cfg(not(feature = "postgres"))]
fn connect(_config: &ConnectionConfig) -> Result<tally_source::StaticDataSource, PipelineError> {
    Err(PipelineError::Config(
        "built without the `postgres` feature; no database source is available".to_string(),
    ))
}
