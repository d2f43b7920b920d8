// Demonstration entry point for seqtrace: traces a small Car/Driver program
// and prints the resulting sequence diagram.

use anyhow::{Context, Result};
use clap::Parser;
use seqtrace::{trace_frame, NamingPolicy, TraceId, TraceSession, TracerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tracer config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Diagram title
    #[arg(short, long)]
    title: Option<String>,

    /// Reset object names at every start
    #[arg(long)]
    per_session_names: bool,

    /// Print tracer diagnostics to stderr
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Car {
    trace_id: TraceId,
    key: String,
    started: bool,
}

impl Car {
    fn new(key: &str) -> Self {
        let _frame = trace_frame!();
        Self {
            trace_id: TraceId::next(),
            key: key.to_string(),
            started: false,
        }
    }

    fn start(&mut self, key: &str, driver: &Driver) -> bool {
        let _frame = trace_frame!(self, id: self.trace_id);
        self.started = self.started || self.key == key;
        driver.check_eyes();
        Driver::sun_glasses();
        Driver::open_window();
        self.started
    }
}

struct Driver {
    trace_id: TraceId,
    driving: bool,
}

impl Driver {
    fn new() -> Self {
        let _frame = trace_frame!();
        Self {
            trace_id: TraceId::next(),
            driving: false,
        }
    }

    fn go(&mut self, car: &mut Car, key: &str) {
        let _frame = trace_frame!(self, id: self.trace_id);
        self.driving = car.start(key, self);
        car.start(key, self);
        self.check_eyes();
        Car::new(key).start(key, self);
    }

    fn check_eyes(&self) -> bool {
        let _frame = trace_frame!(self, id: self.trace_id);
        true
    }

    fn sun_glasses() {
        let _frame = trace_frame!();
    }

    fn open_window() {
        let _frame = trace_frame!();
    }
}

fn run_scenario() {
    let key = "red";
    let mut car = Car::new(key);
    let mut driver = Driver::new();
    Driver::sun_glasses();
    driver.go(&mut car, key);
    tracing::debug!(driving = driver.driving, "scenario finished");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = match &cli.config {
        Some(path) => TracerConfig::load(path)?,
        None => TracerConfig::default(),
    };
    if cli.title.is_some() {
        config.title = cli.title.clone();
    }
    if cli.per_session_names {
        config.naming = NamingPolicy::PerSession;
    }

    let _main = trace_frame!(None, "main");

    let mut session = TraceSession::with_config(config);
    session.start().context("Failed to start tracing")?;
    run_scenario();
    session.stop().context("Tracing failed")?;

    session.dump().context("Failed to write diagram")?;
    Ok(())
}
