use clap::Parser;
use swipecheck::cli::{Cli, Command};
use swipecheck::config::{BASE_URL_ENV, FileConfig, HarnessConfig, Overrides};
use swipecheck::output::{self, RunReport, SuiteListing};
use swipecheck::results::ResultLog;
use swipecheck::runner::Runner;
use swipecheck::{suite_file, suites};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json_output = cli.json;
    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout,
    };

    let result = match cli.command {
        Some(Command::Run { suites }) => {
            run_suites(&suites, &overrides, cli.config.as_deref(), json_output)
        }
        Some(Command::List) => run_list(json_output).map(|_| true),
        Some(Command::Show { suite }) => run_show(&suite).map(|_| true),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Outcome of one suite, kept until every suite has run
struct SuiteRun {
    name: String,
    log: ResultLog,
    aborted: Option<String>,
}

fn run_suites(
    names: &[String],
    overrides: &Overrides,
    config_path: Option<&std::path::Path>,
    json_output: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Resolve everything up front so a typo fails before any request is sent
    let suites = names
        .iter()
        .map(|name| suite_file::resolve(name))
        .collect::<Result<Vec<_>, _>>()?;

    let file = FileConfig::load(config_path)?;
    let config = HarnessConfig::resolve(overrides, std::env::var(BASE_URL_ENV).ok(), file)?;
    tracing::debug!(base_url = %config.base_url, run_id = %config.run_id, "resolved configuration");

    let mut runs = Vec::new();
    let mut all_passed = true;

    for suite in &suites {
        if !json_output {
            println!("\nRunning suite '{}' against {}", suite.name, config.base_url);
        }

        let mut runner = Runner::new(config.clone()).with_echo(!json_output);
        let aborted = match runner.run(suite) {
            Ok(passed) => {
                all_passed &= passed;
                None
            }
            Err(failure) => {
                all_passed = false;
                Some(failure.to_string())
            }
        };

        let log = runner.into_log();
        if !json_output {
            if let Some(reason) = &aborted {
                println!("\n{}. Remaining scenarios skipped.", reason);
            }
            output::print_summary(&suite.name, &log);
        }

        runs.push(SuiteRun {
            name: suite.name.clone(),
            log,
            aborted,
        });
    }

    if json_output {
        let reports: Vec<RunReport> = runs
            .iter()
            .map(|run| {
                let report = RunReport::new(&run.name, &run.log);
                match &run.aborted {
                    Some(reason) => report.with_aborted(reason),
                    None => report,
                }
            })
            .collect();
        output::print_json(&reports);
    }

    Ok(all_passed)
}

fn run_list(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let listings: Vec<SuiteListing> = suites::names()
        .iter()
        .filter_map(|name| suites::builtin(name))
        .map(|suite| SuiteListing::new(&suite))
        .collect();

    if json_output {
        output::print_json(&listings);
    } else {
        for listing in &listings {
            println!(
                "{:<10} {} ({} scenarios)",
                listing.name, listing.description, listing.scenarios
            );
        }
    }

    Ok(())
}

fn run_show(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let suite = suite_file::resolve(name)?;
    output::print_json(&suite);
    Ok(())
}
