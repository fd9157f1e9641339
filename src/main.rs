use arduino_harvest::cli::{handle_harvest, handle_mine, CliArgs, Commands};
use arduino_harvest::util::logging::parse_level;
use arduino_harvest::util::{init_logging, LoggingConfig};
use arduino_harvest::{HarvestConfig, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    let config = HarvestConfig::default();
    init_logging(logging_config(&args, &config));

    debug!("arduino-harvest v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let arguments: Vec<String> = env::args().skip(1).collect();
    let exit_code = match &args.command {
        Commands::Harvest(harvest_args) => handle_harvest(harvest_args, &config, &arguments),
        Commands::Mine(mine_args) => handle_mine(mine_args, &arguments),
    };

    std::process::exit(exit_code);
}

/// Command line flags win over `ARDUINO_HARVEST_LOG_LEVEL`
fn logging_config(args: &CliArgs, config: &HarvestConfig) -> LoggingConfig {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose || args.debug {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    }
}
