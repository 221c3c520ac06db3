use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use stricttypist::config::Config;
use stricttypist::event::KeystrokeSource;
use stricttypist::generator::lines::{load_lines, shuffle};
use stricttypist::logging;
use stricttypist::session::result::SessionEnd;
use stricttypist::session::trainer::{Trainer, TrainingPlan};
use stricttypist::terminal::CrosstermRawMode;
use stricttypist::ui::feedback::TerminalFeedback;

#[derive(Parser)]
#[command(
    name = "stricttypist",
    version,
    about = "Learn to type more accurately with immediate feedback"
)]
struct Cli {
    #[arg(short, long, help = "Source of words or phrases etc. to type; one per line")]
    file: Option<PathBuf>,

    #[arg(
        short = 'o', long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Process file in order; no shuffling"
    )]
    in_order: Option<bool>,

    #[arg(
        short, long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Repeat each line until it is typed correctly"
    )]
    repeat: Option<bool>,

    #[arg(
        short, long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Pick lines at random until stopped"
    )]
    endless: Option<bool>,

    #[arg(long, value_name = "MS", help = "How long to discard keys after a mistake")]
    drain_ms: Option<u64>,

    #[arg(long, value_name = "PATH", help = "Config file to use")]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(file) = &self.file {
            config.source_file = file.clone();
        }
        // Bare flags switch on; `--flag=false` turns off what the config enabled.
        if let Some(in_order) = self.in_order {
            config.in_order = in_order;
        }
        if let Some(repeat) = self.repeat {
            config.repeat_until_correct = repeat;
        }
        if let Some(endless) = self.endless {
            config.endless = endless;
        }
        if let Some(ms) = self.drain_ms {
            config.drain_timeout_ms = ms;
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    let _log_guard = match logging::init_tracing(&logging::default_log_dir()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let mut lines = load_lines(&config.source_file)?;
    let mut rng = SmallRng::from_entropy();
    if !config.in_order {
        shuffle(&mut lines, &mut rng);
    }

    let plan = TrainingPlan {
        lines,
        policy: config.policy(),
        drain_timeout: config.drain_timeout(),
    };

    let events = KeystrokeSource::spawn_stdin();
    let mut raw_mode = CrosstermRawMode;
    let mut feedback = TerminalFeedback::new(io::stdout(), config.theme.clone());
    let report = Trainer::new(&events, &mut raw_mode, &mut feedback).run(&plan, &mut rng)?;

    println!("{}", report.stats.summary());
    match report.end {
        SessionEnd::Complete => Ok(ExitCode::SUCCESS),
        SessionEnd::Stopped(signal) => {
            eprintln!("{}", signal.reason());
            Ok(ExitCode::FAILURE)
        }
    }
}
