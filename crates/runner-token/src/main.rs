// Entry point for github-runner-token.
//
// Parses the command line, builds the HostContext, validates the
// configuration and runs the TokenCommand. The token is the only thing
// written to stdout; diagnostics and errors go to stderr.

use clap::Parser;
use runner_token_common::constants::return_code;
use runner_token_common::HostContext;
use runner_token_sdk::{Package, Source, TraceWriter};

use runner_token::command_settings::CommandSettings;
use runner_token::configuration::Configuration;
use runner_token::runner_token::TokenCommand;

fn main() {
    let settings = match CommandSettings::try_parse() {
        Ok(settings) => settings,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            let code = if e.use_stderr() {
                return_code::TERMINATED_ERROR
            } else {
                return_code::SUCCESS
            };
            std::process::exit(code);
        }
    };

    init_tracing(settings.debug);

    // Build the async runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime");

    let exit_code = runtime.block_on(async move { run(settings).await });

    std::process::exit(exit_code);
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

async fn run(settings: CommandSettings) -> i32 {
    let context = HostContext::new(settings.debug);
    let trace = context.get_trace("Program");

    trace.verbose(&format!(
        "{} {} (commit {})",
        Package::PRODUCT_NAME,
        Package::VERSION,
        Source::COMMIT_HASH
    ));
    trace.verbose(&settings.sanitized_summary());

    let config = match Configuration::from_settings(&settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return return_code::TERMINATED_ERROR;
        }
    };

    let command = TokenCommand::new(context.clone(), config);
    match command.execute().await {
        Ok(output) => {
            println!("{}", output);
            return_code::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "ERROR: {}",
                context.secret_masker.mask_secrets(&format!("{:#}", e))
            );
            return_code::TERMINATED_ERROR
        }
    }
}
