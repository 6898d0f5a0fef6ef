use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use skytap::app::App;
use skytap::config::Settings;

/// Plays a rhythm-game chart by sending precisely timed tap commands
/// to a connected device over adb.
#[derive(Parser)]
#[command(name = "skytap", version, about)]
struct Args {
    /// Chart file to play. When omitted, .skym files in the working
    /// directory are listed for selection.
    chart: Option<PathBuf>,

    /// Path to the settings file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Play the given chart without interactive prompts and exit when
    /// done. Needs a chart argument to know what to play.
    #[arg(short = 'y', long, requires = "chart")]
    yes: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        "skytap=debug"
    } else {
        "skytap=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::load_from(&args.config)?;
    if !args.config.exists() {
        settings.save_to(&args.config)?;
        info!(
            "wrote default settings to {}; adjust the key mapping for your device",
            args.config.display()
        );
    }

    let mut app = App::new(settings, args.chart, args.yes);
    app.run()
}
