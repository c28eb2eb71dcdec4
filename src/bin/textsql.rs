//! textsql: plain English in, SQL out.
//!
//! # Usage
//!
//! ```bash
//! # Translate one sentence
//! textsql "show employees with salary at least 50000"
//!
//! # See every pipeline stage
//! textsql explain "list orders where amount > 2000"
//!
//! # Interactive mode
//! textsql repl
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use textsql::prelude::*;
use textsql::repl;
use textsql::translator::SAMPLE_SENTENCES;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textsql")]
#[command(version)]
#[command(about = "Translate plain-English requests into SQL SELECT statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    textsql 'show all students'
    textsql 'get orders where amount > 2000 and status = pending' --format json
    textsql --schema shop.toml explain 'customers in delhi with age at least 30'")]
struct Cli {
    /// The sentence to translate
    query: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (default: ./textsql.toml, then the user config dir)
    #[arg(long, env = "TEXTSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Schema definition file, overrides the configuration
    #[arg(long, env = "TEXTSQL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Column compared against bare dates
    #[arg(long)]
    date_column: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a sentence moves through the pipeline
    Explain {
        /// The sentence to explain
        query: String,
    },
    /// Interactive REPL mode
    Repl,
    /// Translate the built-in sample sentences
    Examples,
    /// Show the active schema
    Schema,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "textsql=debug" } else { "textsql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::resolve(cli.config.as_deref()).context("loading configuration")?;
    if let Some(schema) = &cli.schema {
        config = config.builder().schema(schema.clone()).build();
    }
    if let Some(column) = &cli.date_column {
        config = config.builder().date_column(column.clone()).build();
    }
    let translator = config.translator().context("building translator")?;

    match &cli.command {
        Some(Commands::Explain { query }) => explain_query(&translator, query)?,
        Some(Commands::Repl) => repl::run_repl(&translator, config.history_path().as_deref()),
        Some(Commands::Examples) => run_examples(&translator, &cli.format)?,
        Some(Commands::Schema) => show_schema(&translator, &cli.format)?,
        None => match &cli.query {
            Some(query) => print_translation(&translator, query, &cli.format)?,
            None => {
                println!("{}", "textsql: plain English in, SQL out".cyan().bold());
                println!();
                println!("Usage: textsql <SENTENCE> [OPTIONS]");
                println!();
                println!("Try: textsql --help");
            }
        },
    }

    Ok(())
}

fn print_translation(translator: &Translator, query: &str, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", translator.translate(query)),
        OutputFormat::Json => {
            let value = match translator.analyze(query) {
                Ok(translation) => serde_json::to_value(&translation)?,
                Err(e) => serde_json::json!({ "input": query, "error": e.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn run_examples(translator: &Translator, format: &OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        let pairs: Vec<_> = SAMPLE_SENTENCES
            .iter()
            .map(|s| serde_json::json!({ "input": s, "output": translator.translate(s) }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&pairs)?);
        return Ok(());
    }

    println!("{}", "=== Examples (text → SQL) ===".cyan().bold());
    for sentence in SAMPLE_SENTENCES {
        println!();
        println!("{} {}", "Text:".dimmed(), sentence.yellow());
        println!("{} {}", "SQL: ".dimmed(), translator.translate(sentence).white());
    }
    Ok(())
}

fn show_schema(translator: &Translator, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(translator.schema())?),
        OutputFormat::Text => repl::show_schema(translator),
    }
    Ok(())
}

fn explain_query(translator: &Translator, query: &str) -> Result<()> {
    println!("{}", "textsql Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Input:".dimmed(), query.yellow());
    println!();

    let translation = match translator.analyze(query) {
        Ok(t) => t,
        Err(e) => bail!("not translated: {}", e),
    };

    println!("{}", "Pipeline:".green().bold());
    println!("  {} {}", "Normalized:".dimmed(), translation.normalized.white());
    println!("  {} {}", "Tables:".dimmed(), translation.tables.join(", ").cyan());

    match &translation.query.fields {
        Fields::Star => println!("  {} {}", "Fields:".dimmed(), "*".white()),
        Fields::Columns(cols) => {
            println!("  {}", "Fields:".dimmed());
            for col in cols {
                println!("    • {}", col.white());
            }
        }
    }

    println!("  {} {}", "Conditions from:".dimmed(), translation.condition_text.white());
    let filter = &translation.query.filter;
    if filter.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for (i, clause) in filter.clauses.iter().enumerate() {
        let prefix = if i == 0 {
            if filter.negate_first { "NOT".to_string() } else { String::new() }
        } else {
            filter.connector_before(i).to_string()
        };
        println!("    {:6} {}", prefix.cyan(), clause.to_sql().white());
    }

    let from = &translation.query.from;
    println!("  {} {}", "From:".dimmed(), from.to_sql().white());
    for join in &from.joins {
        let kind = match join {
            Join::Inner { .. } => "inner join",
            Join::Cross { .. } => "cross join",
        };
        println!("    {} {}", kind.dimmed(), join.table().cyan());
    }

    println!();
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", translation.sql.white());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_fails_when_not_translated() {
        let translator = Translator::default();
        let err = explain_query(&translator, "   ").unwrap_err();
        assert_eq!(err.to_string(), "not translated: Empty input.");
        let err = explain_query(&translator, "what is the weather").unwrap_err();
        assert_eq!(err.to_string(), "not translated: Could not detect table.");
    }

    #[test]
    fn test_explain_succeeds() {
        let translator = Translator::default();
        assert!(explain_query(&translator, "show orders and customers").is_ok());
    }
}
