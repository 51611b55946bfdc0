//! Datacube CLI
//!
//! Command-line interface for building and sending coverage queries:
//! - Render query text without sending it
//! - Execute queries and plain service requests
//! - Generate a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datacube::config::{generate_default_config, Config};
use datacube::query::{parse_axis_subset, Aggregate, AggregateOp, AxisSubset, Coverage, Query};
use datacube::service::{HttpTransport, ServiceParams, ServiceRequest, ServiceResponse, Transport};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "datacube")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and run coverage processing queries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service endpoint URL, overriding the config
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

/// Flags that describe a query over one source
#[derive(clap::Args)]
pub struct QueryArgs {
    /// Coverage names bound to the iteration variable
    #[arg(short, long, required = true, num_args = 1..)]
    coverage: Vec<String>,

    /// Axis subsets, e.g. 'Lat(53.08)' or 'ansi("2014-01":"2014-12")'
    #[arg(short, long)]
    subset: Vec<String>,

    /// Aggregation applied to the coverage (min, max, avg, sum, count)
    #[arg(short, long)]
    aggregate: Option<String>,

    /// Output format (png, csv, json, ...)
    #[arg(short, long)]
    format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print query text without sending it
    Render {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Build and execute a query
    Query {
        #[command(flatten)]
        query: QueryArgs,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Post hand-written query text
    Raw {
        /// Query text
        text: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the service capabilities document
    Capabilities {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Describe one coverage
    Describe {
        /// Coverage identifier
        coverage_id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch raw coverage data
    Coverage {
        /// Coverage identifier
        coverage_id: String,
        /// Axis subsets, e.g. 'Lat(35:75)'
        #[arg(short, long)]
        subset: Vec<String>,
        /// Output format (png, tiff, netcdf, ...)
        #[arg(short, long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.service.endpoint = endpoint;
    }

    init_tracing(&config);

    let params = ServiceParams::from(&config.service);
    let transport = HttpTransport::from_config(&config.service)?;

    match cli.command {
        Commands::Render { query } => {
            let format = query.format.clone();
            let text = build_query(&query)?.render_with_format(format.as_deref())?;
            println!("{}", text);
        }

        Commands::Query { query, output } => {
            let format = query.format.clone();
            let response = build_query(&query)?
                .execute(&transport, &params, format.as_deref())
                .await?;
            write_response(response, output.as_deref())?;
        }

        Commands::Raw { text, output } => {
            let response: ServiceResponse = transport.post_query(&params, &text).await.into();
            write_response(response, output.as_deref())?;
        }

        Commands::Capabilities { output } => {
            let response = ServiceRequest::GetCapabilities
                .execute(&transport, &params)
                .await?;
            write_response(response, output.as_deref())?;
        }

        Commands::Describe {
            coverage_id,
            output,
        } => {
            let response = ServiceRequest::DescribeCoverage { coverage_id }
                .execute(&transport, &params)
                .await?;
            write_response(response, output.as_deref())?;
        }

        Commands::Coverage {
            coverage_id,
            subset,
            format,
            output,
        } => {
            let request = ServiceRequest::GetCoverage {
                coverage_id,
                subsets: parse_subsets(&subset)?,
                format,
            };
            let response = request.execute(&transport, &params).await?;
            write_response(response, output.as_deref())?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("datacube={}", config.logging.level).into());

    // Logs go to stderr so payloads on stdout stay clean
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_subsets(subsets: &[String]) -> Result<Vec<AxisSubset>> {
    subsets
        .iter()
        .map(|s| parse_axis_subset(s).with_context(|| format!("Invalid subset '{}'", s)))
        .collect()
}

fn build_query(args: &QueryArgs) -> Result<Query> {
    let mut coverage = Coverage::named(args.coverage.clone())?;
    if !args.subset.is_empty() {
        coverage.set_subset(parse_subsets(&args.subset)?)?;
    }

    let mut query = Query::over(coverage.clone());
    match &args.aggregate {
        Some(name) => {
            let op = AggregateOp::from_name(name)
                .with_context(|| format!("Unknown aggregation '{}'", name))?;
            query.return_expression(Aggregate::new(op, &coverage)?)?;
        }
        None => {
            query.return_expression(&coverage)?;
        }
    }
    Ok(query)
}

fn write_response(response: ServiceResponse, output: Option<&Path>) -> Result<()> {
    match response {
        ServiceResponse::Success(bytes) => match output {
            Some(path) => {
                std::fs::write(path, &bytes).with_context(|| format!("Failed to write {:?}", path))?;
                eprintln!("Wrote {} bytes to {:?}", bytes.len(), path);
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&bytes)?;
                stdout.flush()?;
            }
        },
        ServiceResponse::Failure(failure) => {
            eprintln!("{}", serde_json::to_string_pretty(&failure.to_json())?);
            std::process::exit(1);
        }
    }
    Ok(())
}
