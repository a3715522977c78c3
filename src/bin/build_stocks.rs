use tickerone_symbols::config::Config;
use tickerone_symbols::errors::SymbolsError;
use tickerone_symbols::services::symbol_service::SymbolService;

use clap::{App, Arg};
use log::{debug, info};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logger
    env_logger::init();

    let matches = App::new("build_stocks")
        .version("0.1.0")
        .about("Generate extension/stocks.json from the A-share spot listing")
        .arg(
            Arg::with_name("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write to FILE instead of extension/stocks.json")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Read the listing from a spreadsheet or JSON export instead of fetching it")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .value_name("ROWS")
                .help("Rows requested per page from the listing API")
                .takes_value(true)
                .default_value("100"),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("HTTP request timeout in seconds")
                .takes_value(true)
                .default_value("30"),
        )
        .get_matches();

    let page_size = matches.value_of("page-size")
        .unwrap_or("100")
        .parse::<usize>()
        .unwrap_or(100);
    let timeout = matches.value_of("timeout")
        .unwrap_or("30")
        .parse::<u64>()
        .unwrap_or(30);

    // 创建配置
    let mut config = Config::new()
        .with_page_size(page_size)
        .with_request_timeout(Duration::from_secs(timeout));
    if let Some(output) = matches.value_of("output") {
        config = config.with_output_path(output);
    }
    if let Some(input) = matches.value_of("input") {
        config = config.with_input_file(input);
    }
    info!("Output path: {}", config.output_path.display());

    let result = match SymbolService::load_source(&config) {
        Ok(source) => SymbolService::new(config, source).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            println!("Wrote {} symbols to {}", summary.count, summary.output_path.display());
            ExitCode::SUCCESS
        }
        Err(SymbolsError::DependencyMissing(message)) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
        Err(e) => {
            debug!("build_stocks failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
