use anyhow::Context;
use clap::Parser;
use isolate_tests::{Cli, IsolateTests, OutputFormatter, OutputMode, UserFriendlyError};
use std::path::PathBuf;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let isolate = match IsolateTests::from_cli(&cli) {
        Ok(isolate) => isolate,
        Err(e) => {
            let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };

    // clap guarantees a path whenever --generate-config is absent
    let root = match cli.path {
        Some(ref path) => path,
        None => return 1,
    };

    match isolate.isolate(root) {
        Ok(report) => {
            isolate.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            isolate.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("isolate-tests.toml"));

    let result = IsolateTests::generate_sample_config(&config_path)
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .with_context(|| format!("Failed to generate {}", config_path.display()));

    match result {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!(
                "  isolate-tests <path> --config {}",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("{:#}", e);
            1
        }
    }
}
