//! Command execution: settings resolution and the fetch/categorize/save run

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, RunRequest};
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::Settings;
use crate::domain::{expand_env_vars, CategorizedResult, OutputDocument};
use crate::infrastructure::di::ServiceContainer;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Output file written.
    Saved {
        path: PathBuf,
        total_elements: usize,
    },
    /// Nothing fetched; no file written.
    Aborted { reason: String },
    /// Data fetched but the output file could not be written.
    SaveFailed { path: PathBuf, reason: String },
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = resolve_settings(cli)?;
    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let request = RunRequest {
        area: settings.area.clone(),
        output: settings.output.clone(),
        categorize: cli.categorize,
    };
    let container = ServiceContainer::new(settings);
    let outcome = run(&container, &request)?;
    debug!("outcome: {:?}", outcome);
    Ok(())
}

/// Load layered settings and apply command line overrides on top.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(area) = &cli.area {
        settings.area = area.clone();
    }
    if let Some(output) = &cli.output {
        settings.output = PathBuf::from(expand_env_vars(&output.to_string_lossy()));
    }
    if let Some(bbox) = cli.bbox {
        settings.bbox = bbox;
    }
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }

    settings.validate()?;
    Ok(settings)
}

/// Fetch, optionally categorize, and save.
///
/// Fetch failures and empty results end the run without writing anything;
/// save failures are reported but not raised.
#[instrument(skip(container))]
pub fn run(container: &ServiceContainer, request: &RunRequest) -> CliResult<RunOutcome> {
    let bbox = container.settings.bbox;
    let fetcher = container.fetch_service();
    output::header(&format!("Fetching OSM data for {} ({})", request.area, bbox));
    output::detail("This may take a while...");
    info!("fetching from {}", fetcher.endpoint());

    let raw = match fetcher.fetch(&bbox) {
        Ok(raw) if !raw.is_empty() => raw,
        Ok(raw) => {
            let reason = match raw.remark() {
                Some(remark) => format!("service returned no elements ({remark})"),
                None => "service returned no elements".to_string(),
            };
            return Ok(abort(reason));
        }
        Err(e) => {
            debug!("fetch failed: {:?}", e);
            return Ok(abort(format!("Failed to fetch data: {e}")));
        }
    };

    if let Some(remark) = raw.remark() {
        output::warning(remark);
    }
    output::success(&format!("Fetched {} elements", raw.elements.len()));

    let document = if request.categorize {
        output::header("Categorizing elements...");
        let document = OutputDocument::categorized(request.area.clone(), bbox, raw);
        if let Some(categorized) = document.categorized_result() {
            print_statistics(categorized);
        }
        document
    } else {
        OutputDocument::Raw(raw)
    };
    let total_elements = document.raw().elements.len();

    match container.export_service().save(&document, &request.output) {
        Ok(()) => {
            output::success(&format!("Data saved to {}", request.output.display()));
            output::success("Done!");
            Ok(RunOutcome::Saved {
                path: request.output.clone(),
                total_elements,
            })
        }
        Err(e) => {
            debug!("save failed: {:?}", e);
            output::failure(&format!("Failed to save data: {e}"));
            Ok(RunOutcome::SaveFailed {
                path: request.output.clone(),
                reason: e.to_string(),
            })
        }
    }
}

fn abort(reason: String) -> RunOutcome {
    output::failure(&reason);
    output::failure("No data fetched. Aborting.");
    RunOutcome::Aborted { reason }
}

fn print_statistics(categorized: &CategorizedResult) {
    output::header("Statistics:");
    for (category, count) in categorized.counts() {
        output::detail(&format!("{category}: {count} elements"));
    }
}
