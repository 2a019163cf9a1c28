use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use scripture_app_server::{AugmentationHandler, Book, SearchMode};
use scripture_embeddings::{EmbeddingProvider, OpenAIProvider};
use scripture_protocol::ConversationTurn;
use scripture_retrieval::{QueryConfig, RetrievalConfig};
use scripture_web_search::{ContextBuilder, ProviderChain, SearchConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "scripture-augment",
    about = "Retrieve passages and current-events context for a question"
)]
struct Cli {
    /// Question to augment
    query: String,

    /// Directory holding <book>.json passage files
    #[arg(long, env = "SCRIPTURE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory holding <book>_embeddings.json cache files
    #[arg(long, env = "SCRIPTURE_CACHE_DIR", default_value = "cache")]
    cache_dir: PathBuf,

    /// Book to search
    #[arg(long, value_enum, default_value_t = Book::Bible)]
    book: Book,

    /// When to search the web
    #[arg(
        long,
        env = "WEB_SEARCH_MODE",
        value_enum,
        ignore_case = true,
        default_value_t = SearchMode::Always
    )]
    search_mode: SearchMode,

    /// Maximum passages to retrieve
    #[arg(long, default_value_t = scripture_retrieval::config::DEFAULT_TOP_K)]
    top_k: usize,

    /// JSON file with prior turns: [{"role": "user", "content": "..."}]
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print the augmentation as JSON instead of prompt text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_history(path: Option<&Path>) -> Result<Vec<ConversationTurn>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid history file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let history = read_history(cli.history.as_deref()).await?;

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(OpenAIProvider::new());
    let config = RetrievalConfig::new(&cli.data_dir, &cli.cache_dir).with_query(QueryConfig {
        top_k: cli.top_k,
        ..QueryConfig::default()
    });

    let search = SearchConfig::from_env();
    let chain = ProviderChain::from_config(&search).context("failed to build search client")?;
    let context = ContextBuilder::new(chain).with_max_results(search.max_results);

    let handler = AugmentationHandler::initialize(&config, provider, context)
        .await
        .context("OpenAI API key not configured. Set OPENAI_API_KEY in your .env file.")?;
    info!(
        "Search mode: {}, providers: {}",
        cli.search_mode,
        handler.health().search_providers.join(", ")
    );

    let augmentation = handler
        .augment(cli.book.id(), &cli.query, &history, cli.search_mode)
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&augmentation)?);
    } else {
        println!("{}", augmentation.system_context());
        println!();
        println!("{}", augmentation.user_message(&cli.query));
    }
    Ok(())
}
