use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use liftdoc_advisor::{Advice, Assistant};
use liftdoc_core::{
    DistanceMetric, Embedder, HashEmbedder, RetrieverConfig, ScoreConversion, ScoringStrategy,
    SimilarityMetric, DEFAULT_EMBEDDING_DIM, DEFAULT_TOP_K,
};
use liftdoc_storage::{ChunkerConfig, KnowledgeBase, DEFAULT_CHUNK_CHARS};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Elevator maintenance assistant: manual search with safety-first advice
#[derive(Parser, Debug)]
#[command(name = "liftdoc")]
#[command(about = "Search a maintenance manual and get safety-first remediation steps", long_about = None)]
struct Args {
    /// Directory holding chunks.txt and features.bin
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean and chunk a manual text file into the data directory
    Index {
        /// Plain-text manual to index
        #[arg(short, long)]
        manual: PathBuf,

        /// Characters per passage
        #[arg(long, default_value_t = DEFAULT_CHUNK_CHARS)]
        chunk_size: usize,

        /// Dimension of the hashed embeddings written to the feature store
        #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM)]
        embedding_dim: usize,

        /// Skip writing the feature store
        #[arg(long)]
        no_embeddings: bool,
    },

    /// Answer a single fault description
    Ask {
        /// Fault description
        #[arg(required = true)]
        query: Vec<String>,

        #[command(flatten)]
        search: SearchArgs,

        /// Print the advice and sources as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive question loop (quit, exit or q to leave)
    Repl {
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show what the data directory contains
    Stats,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Scoring strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Lexical)]
    strategy: StrategyArg,

    /// How dense scores become similarities
    #[arg(long, value_enum, default_value_t = ConversionArg::Cosine)]
    conversion: ConversionArg,

    /// Maximum number of manual sections per answer
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Relevance threshold (defaults to the strategy's own)
    #[arg(long)]
    threshold: Option<f32>,

    /// Dimension of the hashed query embeddings
    #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM)]
    embedding_dim: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StrategyArg {
    Lexical,
    Keyword,
    Dense,
    Hybrid,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ConversionArg {
    L2,
    L2Squared,
    Dot,
    Cosine,
}

impl From<ConversionArg> for ScoreConversion {
    fn from(arg: ConversionArg) -> Self {
        match arg {
            ConversionArg::L2 => ScoreConversion::InverseDistance(DistanceMetric::L2),
            ConversionArg::L2Squared => ScoreConversion::InverseDistance(DistanceMetric::L2Squared),
            ConversionArg::Dot => ScoreConversion::NativeSimilarity(SimilarityMetric::Dot),
            ConversionArg::Cosine => ScoreConversion::NativeSimilarity(SimilarityMetric::Cosine),
        }
    }
}

impl SearchArgs {
    fn config(&self) -> RetrieverConfig {
        let strategy = match self.strategy {
            StrategyArg::Lexical => ScoringStrategy::LexicalCosine,
            StrategyArg::Keyword => ScoringStrategy::KeywordOverlap,
            StrategyArg::Dense => ScoringStrategy::Dense {
                conversion: self.conversion.into(),
            },
            StrategyArg::Hybrid => ScoringStrategy::lexical_hybrid(),
        };
        RetrieverConfig {
            strategy,
            top_k: self.top_k,
            threshold: self.threshold,
        }
    }

    fn embedder(&self) -> Option<Arc<dyn Embedder>> {
        (self.strategy == StrategyArg::Dense)
            .then(|| Arc::new(HashEmbedder::new(self.embedding_dim)) as Arc<dyn Embedder>)
    }

    fn open(&self, data_dir: &Path) -> anyhow::Result<Assistant> {
        let kb = KnowledgeBase::open(data_dir, self.config(), self.embedder())
            .with_context(|| format!("failed to load knowledge base from {:?}", data_dir))?;
        Ok(Assistant::new(kb.into_retriever()))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting liftdoc v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    match &args.command {
        Command::Index {
            manual,
            chunk_size,
            embedding_dim,
            no_embeddings,
        } => {
            let text = std::fs::read_to_string(manual)
                .with_context(|| format!("failed to read manual {:?}", manual))?;
            let chunker = ChunkerConfig {
                chunk_chars: *chunk_size,
                ..ChunkerConfig::default()
            };
            let embedder = HashEmbedder::new(*embedding_dim);
            let embedder: Option<&dyn Embedder> = if *no_embeddings {
                None
            } else {
                Some(&embedder)
            };

            let summary = KnowledgeBase::index_manual(&args.data_dir, &text, &chunker, embedder)?;
            println!("Index created in {:?}", args.data_dir);
            println!("  passages:   {}", summary.passages);
            println!("  vocabulary: {}", summary.vocabulary);
            if let Some(dim) = summary.embedding_dim {
                println!("  embeddings: {} x {}", summary.passages, dim);
            }
        }
        Command::Ask {
            query,
            search,
            json,
        } => {
            let assistant = search.open(&args.data_dir)?;
            let advice = assistant.ask(&query.join(" "));
            if *json {
                println!("{}", serde_json::to_string_pretty(&advice)?);
            } else {
                print_advice(&advice);
            }
        }
        Command::Repl { search } => {
            let assistant = search.open(&args.data_dir)?;
            repl(&assistant)?;
        }
        Command::Stats => {
            let kb = KnowledgeBase::open(&args.data_dir, RetrieverConfig::default(), None)?;
            let corpus = kb.corpus();
            println!("Data directory: {:?}", kb.data_dir());
            if kb.is_degraded() {
                println!("  no corpus file, queries fall back to generic safety advice");
                return Ok(());
            }
            println!("  passages:   {}", corpus.len());
            println!(
                "  vocabulary: {}",
                corpus.lexical().map_or(0, |l| l.space().len())
            );
            match corpus.dense() {
                Some(dense) => println!("  embeddings: {} x {}", dense.rows(), dense.dim()),
                None => println!("  embeddings: none"),
            }
        }
    }

    Ok(())
}

fn repl(assistant: &Assistant) -> anyhow::Result<()> {
    println!("{}", "=".repeat(50));
    println!("ELEVATOR MAINTENANCE ASSISTANT");
    println!("{}", "=".repeat(50));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\nYour issue: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }
        if query.is_empty() {
            continue;
        }

        print_advice(&assistant.ask(query));
    }
    Ok(())
}

fn print_advice(advice: &Advice) {
    match advice.sources.first() {
        Some(best) => println!(
            "Found {} relevant sections (similarity: {:.2})",
            advice.sources.len(),
            best.similarity
        ),
        None => println!("No relevant manual sections found"),
    }

    println!("\n{}", "=".repeat(50));
    println!("MAINTENANCE ADVICE:");
    println!("{}", "=".repeat(50));
    println!("{}", advice.text);

    if !advice.sources.is_empty() {
        println!("\n{}", "-".repeat(50));
        println!("MANUAL SECTIONS FOUND:");
        for (i, source) in advice.sources.iter().enumerate() {
            println!("\nSection {} (relevance: {:.2})", i + 1, source.similarity);
            if let Some(distance) = source.distance {
                println!("Search distance: {:.3}", distance);
            }
            println!("{}", source.text);
        }
    }
}
