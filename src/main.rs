//! sunsave entry point: CLI wiring, config loading and command dispatch.

use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Runtime;

use sunsave::cli::{Cli, Command, EstimateArgs, WizardArgs};
use sunsave::config::AppConfig;
use sunsave::estimate::HttpEstimator;
use sunsave::logging::{self, Fallback};
use sunsave::present::ResultView;
use sunsave::session::Session;
use sunsave::wizard::Advance;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        return ExitCode::FAILURE;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Wizard(WizardArgs::default()));

    // The terminal UI owns stderr, so it only logs to a file.
    let fallback = match command {
        Command::Wizard(_) => Fallback::Discard,
        Command::Estimate(_) => Fallback::Stderr,
    };
    let filter = cli.log_level.as_deref().unwrap_or(&config.logging.filter);
    if let Err(e) = logging::init(filter, config.logging.file.as_deref(), fallback) {
        eprintln!("error: failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    let service = match HttpEstimator::new(
        &config.service.base_url,
        config.service.timeout(),
        &config.service.user_agent,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // One worker runs the HTTP calls; the UI thread owns all wizard state.
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Wizard(args) => run_wizard(&runtime, service, &config, &args),
        Command::Estimate(args) => runtime.block_on(run_estimate(service, &config, &args)),
    }
}

#[cfg(feature = "tui")]
fn run_wizard(
    runtime: &Runtime,
    service: HttpEstimator,
    config: &AppConfig,
    args: &WizardArgs,
) -> ExitCode {
    use sunsave::overlay::Route;

    let _enter = runtime.enter();
    let route = Route::from_path(&args.route);
    match sunsave::tui::run(service, config.defaults.to_params(), route) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: terminal UI failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tui"))]
fn run_wizard(
    _runtime: &Runtime,
    _service: HttpEstimator,
    _config: &AppConfig,
    _args: &WizardArgs,
) -> ExitCode {
    eprintln!("error: built without the `tui` feature; use `sunsave estimate`");
    ExitCode::FAILURE
}

/// Walks the wizard with the given inputs, waits for the run, prints the result.
async fn run_estimate(service: HttpEstimator, config: &AppConfig, args: &EstimateArgs) -> ExitCode {
    let mut session = Session::new(args.params(&config.defaults), service);
    loop {
        match session.advance() {
            Advance::Moved(_) => {}
            Advance::Completed(_) | Advance::AlreadyComplete => break,
            Advance::Blocked => {
                if let Some(step) = session.controller().active_step() {
                    eprintln!("error: invalid input for \"{}\" ({})", step.label, step.hint);
                }
                return ExitCode::FAILURE;
            }
        }
    }
    session.settle().await;

    let Some(outcome) = session.controller().outcome() else {
        eprintln!("error: no estimate received");
        return ExitCode::FAILURE;
    };
    let status = if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if args.json {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to encode result: {e}");
                return ExitCode::FAILURE;
            }
        }
        return status;
    }

    session.toggle_details();
    match session.result_view() {
        Some(ResultView::Ready(ready)) => {
            println!("Daily generation:    {}", ready.generation);
            println!("Extra with battery:  {}", ready.extra_savings);
            if let Some(notice) = ready.fallback_notice {
                println!("{notice}");
            }
            if let Some(d) = ready.details {
                println!("Without battery:     {}", d.baseline);
                println!("With battery:        {}", d.with_battery);
                println!("Energy shifted:      {}", d.shifted);
            }
        }
        Some(ResultView::Failed { message }) => eprintln!("{message}"),
        Some(ResultView::Pending) | None => eprintln!("error: no estimate received"),
    }
    status
}
