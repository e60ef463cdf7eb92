use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use sparql_query_builder::{CompilerConfig, QueryCompiler, QueryRepresentation, SparqlRenderer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

/// Compile query builder condition lists (JSON) into SPARQL.
#[derive(Parser, Debug)]
#[command(name = "sparql_query_builder", version, about)]
struct Cli {
    /// JSON compiler config; the environment is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON query representation to compile; starts a REPL when omitted
    #[arg(short, long)]
    query: Option<PathBuf>,

    /// Emit PREFIX declarations before the query
    #[arg(long)]
    prefixes: bool,

    #[arg(long, default_value = "warn")]
    log_level: Level,
}

/// Prefer an explicit config file, then the environment, then defaults.
fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    if let Some(path) = path {
        let config = CompilerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        info!(path = %path.display(), "using config file");
        return Ok(config);
    }

    match CompilerConfig::from_env() {
        Ok(config) => {
            info!("using config from environment");
            Ok(config)
        }
        Err(e) => {
            warn!(error = %e, "cannot read config from environment, using defaults");
            Ok(CompilerConfig::default())
        }
    }
}

fn compile_and_render(compiler: &QueryCompiler, json: &str, prefixes: bool) -> Result<String> {
    let representation: QueryRepresentation =
        serde_json::from_str(json).context("Invalid query representation")?;
    let query = compiler
        .compile(&representation)
        .context("Failed to compile query")?;
    Ok(SparqlRenderer::new(&compiler.config().namespaces)
        .with_prefix_declarations(prefixes)
        .render(&query))
}

/// Adds `line` to the REPL history. Failures are logged, not fatal.
fn remember_line<H: History>(history: &mut H, line: &str) {
    if let Err(e) = history.add(line) {
        warn!(error = %e, "cannot add history entry");
    }
}

fn run_repl(compiler: &QueryCompiler, prefixes: bool) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;
    println!("Enter one JSON query representation per line, Ctrl-D to exit.");

    loop {
        match editor.readline("query> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                remember_line(editor.history_mut(), line);
                match compile_and_render(compiler, line, prefixes) {
                    Ok(sparql) => println!("{}", sparql),
                    Err(e) => eprintln!("Error: {:#}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let compiler = QueryCompiler::from_config(load_config(cli.config.as_deref())?);

    match &cli.query {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read query from {}", path.display()))?;
            print!("{}", compile_and_render(&compiler, &json, cli.prefixes)?);
            Ok(())
        }
        None => run_repl(&compiler, cli.prefixes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::MemHistory;

    #[test]
    fn test_remember_line_records_history() {
        let mut history = MemHistory::new();
        remember_line(&mut history, r#"{"conditions": []}"#);
        remember_line(&mut history, r#"{"conditions": [], "limit": 10}"#);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_compile_and_render_reports_invalid_json() {
        let compiler = QueryCompiler::new();
        let error = compile_and_render(&compiler, "{not json", false).unwrap_err();
        assert!(format!("{:#}", error).starts_with("Invalid query representation"));

        let sparql = compile_and_render(&compiler, r#"{"conditions": [], "omitLabels": true}"#, false).unwrap();
        assert!(sparql.starts_with("SELECT DISTINCT ?item"));
    }
}
