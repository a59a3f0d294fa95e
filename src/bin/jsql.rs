//! jsql: compile JSON queries to SQL
//!
//! # Usage
//!
//! ```bash
//! # SELECT with a filter
//! jsql --schema ./schemas select User --query '{"age": {"gt": 21}, "limit": 10}'
//!
//! # Same query for SQL Server
//! jsql --dialect mssql select User --query '{"age": {"gt": 21}, "limit": 10}'
//!
//! # INSERT, validated against the schema's required list
//! jsql insert User --data '{"name": "Ada"}'
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use jsql::config::JsqlConfigBuilder;
use jsql::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsql")]
#[command(version)]
#[command(about = "Compile JSON filter/sort/paging queries into SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    jsql select User --query '{\"or\": [{\"age\": {\"lt\": 18}}, {\"age\": {\"gt\": 65}}]}'
    jsql --dialect mysql count User --query '{\"name\": {\"startsWith\": \"A\"}}'
    jsql update User --query '{\"id\": 7}' --data '{\"age\": 42}'")]
struct Cli {
    /// Config file (defaults to ./jsql.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Schema file or directory of *.json schemas
    #[arg(short, long, global = true, env = "JSQL_SCHEMA_PATH")]
    schema: Option<PathBuf>,

    /// SQL dialect: postgres, mysql or sqlserver
    #[arg(short, long, global = true, env = "JSQL_DIALECT")]
    dialect: Option<Dialect>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a SELECT
    Select {
        model: String,
        #[arg(short, long, default_value = "{}")]
        query: String,
    },
    /// Compile a COUNT over the primary key
    Count {
        model: String,
        #[arg(short, long, default_value = "{}")]
        query: String,
    },
    /// Compile a DELETE
    Delete {
        model: String,
        #[arg(short, long, default_value = "{}")]
        query: String,
    },
    /// Compile an INSERT
    Insert {
        model: String,
        #[arg(long)]
        data: String,
    },
    /// Compile an UPDATE
    Update {
        model: String,
        #[arg(short, long, default_value = "{}")]
        query: String,
        #[arg(long)]
        data: String,
    },
    /// List loaded models
    Models,
    /// Show the parsed query and predicate tree
    Explain {
        #[arg(short, long)]
        query: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let source = JsqlConfig::locate(cli.config.as_deref());
    let discovered = match &source {
        Some(path) => JsqlConfig::load_from_file(path),
        None => Ok(JsqlConfig::default()),
    }
    .context("loading configuration")?;
    let mut builder = JsqlConfigBuilder::from_config(discovered);
    if let Some(dialect) = cli.dialect {
        builder = builder.dialect(dialect);
    }
    if let Some(schema) = &cli.schema {
        builder = builder.schema(schema.clone());
    }
    if cli.verbose {
        builder = builder.log_filter("jsql=debug");
    }
    let config = builder.build();

    init_logging(&config.log_filter);
    match &source {
        Some(path) => tracing::info!("Using config {}", path.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }

    let compiler = |model: &str| -> Result<Compiler> {
        Ok(Compiler::new(load_registry(&config)?, model, config.dialect)?)
    };

    let result = match &cli.command {
        Commands::Explain { query } => return explain(query, cli.format),
        Commands::Models => {
            let registry = load_registry(&config)?;
            list_models(&registry, cli.format)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Select { model, query } => compiler(model)?.select_query(&parse_json(query)?)?,
        Commands::Count { model, query } => compiler(model)?.count_query(&parse_json(query)?)?,
        Commands::Delete { model, query } => compiler(model)?.delete_query(&parse_json(query)?)?,
        Commands::Update { model, query, data } => {
            compiler(model)?.update_query(&parse_json(query)?, &parse_json(data)?)?
        }
        Commands::Insert { model, data } => match compiler(model)?.insert(&parse_json(data)?) {
            Ok(result) => result,
            Err(invalid) => {
                report_invalid(&invalid, cli.format)?;
                return Ok(ExitCode::from(2));
            }
        },
    };

    print_result(&result, cli.format)?;
    Ok(ExitCode::SUCCESS)
}

fn load_registry(config: &JsqlConfig) -> Result<Arc<SchemaRegistry>> {
    let registry = SchemaRegistry::load_path(&config.schema_path)
        .with_context(|| format!("loading schemas from {}", config.schema_path.display()))?;
    Ok(Arc::new(registry))
}

/// `JSQL_LOG` wins over the configured filter. Logs go to stderr.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_env("JSQL_LOG").unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_json(text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text).with_context(|| format!("invalid JSON: {}", text))
}

fn print_result(result: &StatementResult, format: OutputFormat) -> Result<()> {
    let unsupported = result.unsupported();
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "sql": result.sql,
                "unsupported": unsupported,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", result.sql);
            for u in unsupported {
                eprintln!(
                    "{} '{}' skipped: {}",
                    "⚠".yellow(),
                    u.property.cyan(),
                    u.reason.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn report_invalid(invalid: &FieldValidationError, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(invalid)?),
        OutputFormat::Text => {
            eprintln!("{} {}", "Invalid:".red().bold(), invalid.message);
            for field in &invalid.error {
                eprintln!("  • {}", field.yellow());
            }
        }
    }
    Ok(())
}

fn list_models(registry: &SchemaRegistry, format: OutputFormat) -> Result<()> {
    let models: Vec<_> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .collect();

    match format {
        OutputFormat::Json => {
            let out: Vec<_> = models
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "name": m.name(),
                        "table": m.table_name(),
                        "primaryKey": m.primary_key(),
                        "properties": m.properties().map(|(n, _)| n).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if models.is_empty() {
                println!("{}", "(no models)".dimmed());
            }
            for m in models {
                println!(
                    "{} {} {}",
                    m.name().cyan().bold(),
                    "→".dimmed(),
                    m.table_name().white()
                );
                for (name, property) in m.properties() {
                    let key = if name == m.primary_key() { " (pk)" } else { "" };
                    let required = if property.required { " required" } else { "" };
                    println!(
                        "    {} {:?}{}{}",
                        name,
                        property.kind,
                        key.yellow(),
                        required.dimmed()
                    );
                }
            }
        }
    }
    Ok(())
}

fn explain(query: &str, format: OutputFormat) -> Result<ExitCode> {
    let spec = jsql::parse(&parse_json(query)?)?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Parsed Query:".green().bold());
    if !spec.select.is_empty() {
        println!("  {} {}", "Select:".dimmed(), spec.select.join(", ").white());
    }
    for term in &spec.sort {
        println!(
            "  {} {} {}",
            "Sort:".dimmed(),
            term.property.white(),
            term.direction.sql_keyword().cyan()
        );
    }
    if let Some(n) = spec.page.offset {
        println!("  {} {}", "Offset:".dimmed(), n);
    }
    if let Some(n) = spec.page.limit {
        println!("  {} {}", "Limit:".dimmed(), n);
    }
    if !spec.filter.is_empty() {
        let total: usize = spec.filter.iter().map(PredicateNode::comparison_count).sum();
        println!("  {} {} comparison(s)", "Filter:".dimmed(), total);
        for node in &spec.filter {
            print_node(node, 2);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_node(node: &PredicateNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        PredicateNode::Comparison {
            property,
            comparator,
            value,
        } => println!(
            "{}{} {} {}",
            indent,
            property.white(),
            comparator.name().cyan(),
            value.to_string().yellow()
        ),
        PredicateNode::Logical { kind, children } => {
            println!("{}[{}]", indent, kind.sql_keyword().magenta());
            for child in children {
                print_node(child, depth + 1);
            }
        }
    }
}
