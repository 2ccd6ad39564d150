use clap::Parser;
use learnhub::configuration::config::Config;
use learnhub::controller::controller_handler::Controller;
use log::{error, info};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(name = "learnhub")]
#[command(version = "0.1.0")]
#[command(about = "Embedded data layer of the LearnHub learning platform")]
struct Args {
    /// Path to the TOML configuration file
    config_file: String,

    /// Seed the store, print the platform overview as JSON and exit
    #[arg(long)]
    seed_only: bool,

    /// Override `web.port` from the configuration file
    #[arg(long, env = "LEARNHUB_PORT")]
    port: Option<u16>,
}

fn main() {
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();

    if args.config_file.is_empty() {
        error!("No configuration file given");
        process::exit(1);
    }

    info!("Importing configuration");
    let mut config = match Config::from_file(Path::new(args.config_file.as_str())) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration from file: {}", e);
            process::exit(1);
        }
    };
    if let Some(port) = args.port {
        config.web.port = port;
        if let Err(e) = config.validate() {
            error!("Invalid port override: {}", e);
            process::exit(1);
        }
    }
    info!("Configuration imported successfully");

    let controller = match Controller::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}, exiting...", e);
            process::exit(1);
        }
    };

    if args.seed_only {
        let overview = controller.seed().and_then(|_| controller.overview());
        match overview.map(|o| serde_json::to_string_pretty(&o)) {
            Ok(Ok(json)) => println!("{}", json),
            Ok(Err(e)) => {
                error!("Unable to render the overview: {}", e);
                process::exit(1);
            }
            Err(e) => {
                error!("Seeding failed: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = controller.run() {
        error!("Error occured in the controller process: {}, exiting...", e);
        process::exit(1);
    }
}
