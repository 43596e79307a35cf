//! apig-integration CLI
//!
//! Command-line interface for validating the HTTP events of a serverless
//! service definition and synthesizing their API Gateway integrations.

use anyhow::{bail, Context, Result};
use apig_integration_common::{
    EventRecord, MemoryLog, MethodIntegration, ServiceDefinition, ServiceFormat,
};
use apig_integration_engine::{HttpEventCompiler, ReportRenderer, Validation};
use apig_integration_resolver::{DefaultResolver, Naming};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "apig-integration")]
#[command(version, about = "Validate serverless HTTP events and synthesize API Gateway integrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every HTTP event and report the result
    #[command(after_help = "EXAMPLES:\n  \
        # Print a Markdown summary\n  \
        apig-integration validate --config serverless.yml\n\n  \
        # Print the normalized events and CORS preflight table as JSON\n  \
        apig-integration validate --config serverless.json --output json\n\n  \
        # Also write the summary to a file\n  \
        apig-integration validate --config serverless.yml --report REPORT.md")]
    Validate {
        /// Path to the service definition
        #[arg(short, long)]
        config: PathBuf,

        /// Service definition format (detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<ConfigFormat>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,

        /// Write the Markdown report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the method integration of every HTTP event
    #[command(after_help = "EXAMPLES:\n  \
        # All events of the service\n  \
        apig-integration integrations --config serverless.yml\n\n  \
        # Events of a single function\n  \
        apig-integration integrations --config serverless.yml --function hello")]
    Integrations {
        /// Path to the service definition
        #[arg(short, long)]
        config: PathBuf,

        /// Service definition format (detected from the extension if not specified)
        #[arg(long)]
        format: Option<ConfigFormat>,

        /// Only print the events of this function
        #[arg(long)]
        function: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigFormat {
    /// YAML service definition
    Yaml,
    /// JSON service definition
    Json,
}

impl From<ConfigFormat> for ServiceFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Yaml => ServiceFormat::Yaml,
            ConfigFormat::Json => ServiceFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown summary
    Text,
    /// Normalized events as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Validate {
            config,
            format,
            output,
            report,
        } => {
            validate_command(
                config.as_path(),
                format,
                output,
                report.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::Integrations {
            config,
            format,
            function,
        } => {
            integrations_command(config.as_path(), format, function.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}

fn load_service(path: &Path, format: Option<ConfigFormat>, verbose: bool) -> Result<ServiceDefinition> {
    eprintln!(
        "{} Loading service definition: {}",
        "→".cyan(),
        path.display()
    );

    let service = ServiceDefinition::load(path, format.map(ServiceFormat::from))
        .with_context(|| format!("Failed to load service definition {}", path.display()))?;

    if verbose {
        eprintln!("  Service: {}", service.service);
        eprintln!("  Region: {}", service.provider.region);
        eprintln!("  Stage: {}", service.provider.stage);
        eprintln!("  Functions: {}", service.functions.len());
    }

    eprintln!(
        "{} Found {} HTTP events",
        "✓".green(),
        service.http_event_count()
    );

    Ok(service)
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", "!".yellow().bold(), warning.yellow());
    }
}

fn validate_command(
    config: &Path,
    format: Option<ConfigFormat>,
    output: OutputFormat,
    report: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let service = load_service(config, format, verbose)?;

    eprintln!("{} Validating HTTP events...", "→".cyan());
    let log = MemoryLog::new();
    let validation = HttpEventCompiler::new(DefaultResolver::new(), &log).validate(&service)?;
    let warnings = log.drain();
    print_warnings(&warnings);

    if verbose {
        for record in &validation.events {
            eprintln!(
                "  • {} {} ({})",
                record.function_name.cyan(),
                record.http.route(),
                record.http.integration
            );
        }
    }

    eprintln!(
        "{} Normalized {} events across {} CORS paths",
        "✓".green(),
        validation.events.len(),
        validation.cors_preflight.len()
    );

    let renderer = ReportRenderer::new().context("Failed to create report renderer")?;

    if let Some(report) = report {
        renderer
            .write_to(report, &service, &validation, &warnings)
            .context("Failed to write report")?;
        eprintln!("{} Report written to {}", "✓".green(), report.display());
    }

    match output {
        OutputFormat::Text => {
            let rendered = renderer
                .render(&service, &validation, &warnings)
                .context("Failed to render report")?;
            println!("{}", rendered);
        }
        OutputFormat::Json => {
            println!("{}", validation_json(&validation)?);
        }
    }

    Ok(())
}

fn validation_json(validation: &Validation) -> Result<String> {
    serde_json::to_string_pretty(validation).context("Failed to serialize validation result")
}

fn integrations_command(
    config: &Path,
    format: Option<ConfigFormat>,
    function: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let service = load_service(config, format, verbose)?;

    if let Some(function) = function {
        if !service.functions.contains_key(function) {
            bail!("Function \"{}\" is not defined in {}", function, config.display());
        }
    }

    eprintln!("{} Synthesizing method integrations...", "→".cyan());
    let log = MemoryLog::new();
    let integrations = collect_integrations(&service, function, &log)?;
    print_warnings(&log.drain());

    eprintln!(
        "{} Synthesized {} method integrations",
        "✓".green(),
        integrations.len()
    );

    let json =
        serde_json::to_string_pretty(&integrations).context("Failed to serialize integrations")?;
    println!("{}", json);

    Ok(())
}

/// `<function> <METHOD> /<path>`
fn route_key(record: &EventRecord) -> String {
    format!("{} {}", record.function_name, record.http.route())
}

/// Validate `service`, then synthesize the integration of every event,
/// optionally limited to one function
fn collect_integrations(
    service: &ServiceDefinition,
    function: Option<&str>,
    log: &MemoryLog,
) -> Result<IndexMap<String, MethodIntegration>> {
    let compiler = HttpEventCompiler::new(DefaultResolver::new(), log);
    let validation = compiler.validate(service)?;

    Ok(validation
        .events
        .iter()
        .filter(|record| function.map_or(true, |f| f == record.function_name))
        .map(|record| {
            let logical_id = Naming::lambda_logical_id(&record.function_name);
            (
                route_key(record),
                compiler.method_integration(&record.http, &logical_id),
            )
        })
        .collect())
}
