use shipwright::cli::commands::CliArgs;
use shipwright::cli::output::OutputFormatter;
use shipwright::config::ShipwrightConfig;
use shipwright::detection::types::DEFAULT_PORT;
use shipwright::pipeline::{self, RunContext};
use shipwright::source::SourceSpec;
use shipwright::util::logging::{init_logging, parse_level};
use shipwright::VERSION;

use clap::Parser;
use std::process;
use tracing::{debug, error, info, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Usage errors abort before logging setup or any other side effect.
    let Some(source) = args.source() else {
        eprintln!("Error: Either --repo or --zip must be provided");
        process::exit(1);
    };

    let config = ShipwrightConfig::default();
    let level = resolve_level(&args, &config);
    let log_file = init_logging(level, &config.log_dir);

    debug!("shipwright v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    if let Some(path) = &log_file {
        debug!(log = %path.display(), "run log file");
    }

    let exit_code = handle_deploy(&args, &config, &source).await;
    process::exit(exit_code);
}

fn resolve_level(args: &CliArgs, config: &ShipwrightConfig) -> Level {
    if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    }
}

async fn handle_deploy(args: &CliArgs, config: &ShipwrightConfig, source: &SourceSpec) -> i32 {
    info!("starting deployment process with prompt: {}", args.prompt);

    if let Err(e) = config.validate() {
        error!("configuration error: {}", e);
        eprintln!("Configuration error: {}", e);
        return 1;
    }

    let ctx = RunContext::from_config(config);
    if !args.quiet {
        println!("Parsing input: {}", args.prompt);
    }

    let report = pipeline::run(&ctx, &args.prompt, source).await;

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("failed to format run report: {}", e),
    }

    if let Some(endpoint) = &report.endpoint {
        let port = report
            .app_info
            .as_ref()
            .map(|info| info.port_or_default())
            .unwrap_or(DEFAULT_PORT);
        println!("Deployment successful!");
        println!("App is live at: http://{}:{}", endpoint, port);
        0
    } else {
        if let Some((stage, cause)) = report.failure() {
            error!(%stage, "deployment failed: {}", cause);
        }
        println!("Deployment failed.");
        1
    }
}
