use clap::Parser;
use cover_harvest::config::HarvestConfig;
use cover_harvest::{Harvest, HarvestReport};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => HarvestConfig::default(),
    };
    // Environment first, so explicit flags win over WEBDRIVER_URL
    config.apply_env();
    args.apply_to(&mut config);

    let Some(source) = args.page_source(config.page_url.as_deref()) else {
        ::log::error!("No page given: pass a URL, --html with --base-url, or set page_url in the config");
        return ExitCode::FAILURE;
    };
    ::log::info!("Starting harvest of {:?}", source);

    match Harvest::new(source).with_config(config).run().await {
        Ok(report) => {
            log_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn log_report(report: &HarvestReport) {
    ::log::info!(
        "Harvested {} of {} cards ({} skipped, {} with cover text)",
        report.records.len(),
        report.cards_found,
        report.skipped,
        report.recognized()
    );
    match &report.output {
        Some(path) => println!("{}", path.display()),
        None => ::log::warn!("No file was written"),
    }
}
