//! `pdfsearch`: search PDFs and text files with BM25, semantic or hybrid retrieval.
//!
//! ```bash
//! pdfsearch search "water filtration" manuals/ notes.md --mode all -k 5
//! pdfsearch interactive manuals/
//! ```
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use pdfsearch_cli::output::{self, ModeOutput};
use pdfsearch_cli::repl::{self, ReplCommand};
use pdfsearch_cli::ingest_paths;
use pdfsearch_core::config::{expand_path, Config, Settings};
use pdfsearch_core::types::{SearchMode, WeightPolicy};
use pdfsearch_embed::default_embedder;
use pdfsearch_hybrid::HybridSearchEngine;

#[derive(Parser)]
#[command(name = "pdfsearch", version, about)]
struct Cli {
    /// Enable info logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest the given files and run one query
    Search {
        query: String,
        /// PDF, .txt or .md files, or directories containing them
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// lexical, semantic, hybrid or all
        #[arg(short, long, default_value = "hybrid")]
        mode: String,
        /// Results per method (default: search.default_top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        #[arg(long)]
        lexical_weight: Option<f32>,
        #[arg(long)]
        semantic_weight: Option<f32>,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ingest the given files, then answer queries read from stdin
    Interactive {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;

    match cli.command {
        Command::Search { query, files, mode, top_k, lexical_weight, semantic_weight, json } => {
            let modes = repl::parse_modes(&mode).map_err(anyhow::Error::msg)?;
            let defaults = settings.search.weights;
            let policy = WeightPolicy::new(
                lexical_weight.unwrap_or(defaults.lexical_weight),
                semantic_weight.unwrap_or(defaults.semantic_weight),
            )?;
            let top_k = top_k.unwrap_or(settings.search.default_top_k);

            let engine = prepare(settings, &files, !json).await?;
            let outputs = run_query(&engine, &query, &modes, top_k, policy).await?;
            if json {
                println!("{}", output::format_json(&query, &outputs));
            } else {
                println!("{}", output::format_human(&query, &outputs));
            }
        }
        Command::Interactive { files, top_k } => {
            let mut top_k = top_k.unwrap_or(settings.search.default_top_k);
            let policy = settings.search.weights;
            let engine = prepare(settings, &files, true).await?;
            let mut modes = vec![SearchMode::Hybrid];

            println!("\n{}\n", repl::HELP);
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                print!("pdfsearch> ");
                std::io::stdout().flush()?;
                let Some(line) = lines.next_line().await? else { break };
                match repl::parse_command(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Empty => {}
                    ReplCommand::Help => println!("{}", repl::HELP),
                    ReplCommand::Invalid(msg) => eprintln!("❌ {}", msg),
                    ReplCommand::TopK(k) => {
                        top_k = k;
                        println!("Showing {} results per method", k);
                    }
                    ReplCommand::Mode(m) => {
                        modes = m;
                        let names: Vec<&str> = modes.iter().map(|m| m.as_str()).collect();
                        println!("Mode: {}", names.join(", "));
                    }
                    ReplCommand::Query(query) => match run_query(&engine, &query, &modes, top_k, policy).await {
                        Ok(outputs) => println!("{}", output::format_human(&query, &outputs)),
                        Err(e) => eprintln!("❌ {:#}", e),
                    },
                }
            }
            println!("👋 Bye");
        }
    }
    Ok(())
}

/// Builds the engine, ingests `files` and builds both indexes.
async fn prepare(settings: Settings, files: &[PathBuf], report: bool) -> Result<HybridSearchEngine> {
    let embedder = default_embedder(&settings.embedding)?;
    let engine = HybridSearchEngine::new(settings, embedder)?;
    let inputs: Vec<PathBuf> = files.iter().map(|f| expand_path(f.to_string_lossy())).collect();

    let ingest = ingest_paths(&engine, &inputs, report)?;
    if report {
        for (name, ids) in &ingest.ingested {
            println!("📄 {}: {} segments", name, ids.len());
        }
    }
    for (name, err) in &ingest.failures {
        eprintln!("⚠️  {}: {}", name, err);
    }
    if engine.chunk_count() == 0 {
        anyhow::bail!("No text could be extracted from the given files");
    }

    engine.build_indexes().await?;
    if report {
        println!("✅ Indexed {} segments from {} files", engine.chunk_count(), ingest.ingested.len());
    }
    Ok(engine)
}

/// Runs `query` once per mode. With several modes a failing semantic search
/// drops only that section.
async fn run_query(
    engine: &HybridSearchEngine,
    query: &str,
    modes: &[SearchMode],
    top_k: usize,
    policy: WeightPolicy,
) -> Result<Vec<ModeOutput>> {
    let mut outputs = Vec::with_capacity(modes.len());
    for &mode in modes {
        match engine.search(query, mode, top_k, policy).await {
            Ok(response) => outputs.push(output::resolve(engine, response)?),
            Err(e) if modes.len() > 1 && e.is_semantic_failure() => eprintln!("⚠️  {} search failed: {}", mode, e),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(outputs)
}
