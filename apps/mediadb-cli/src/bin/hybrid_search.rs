use std::env;

use mediadb_core::config::Config;
use mediadb_es::{ConnectionProvider, EsStorage, HybridQuery};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <index> [--channel NAME] [--keywords a,b,c] [--title TEXT] [--embedding 0.1,0.2,...] [--page N] [--size N] [--limit N] [--media-type N] [--valid-only]", args[0]);
        eprintln!("Example: {} media --channel default --keywords cat,orange --title 'orange cat' --page 1 --size 10", args[0]);
        std::process::exit(1);
    }
    let index = args[1].clone();
    let mut channel_name = "default".to_string();
    let mut query = HybridQuery::default();

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).cloned();
        match flag {
            "--channel" => channel_name = required(flag, value)?,
            "--keywords" => {
                query.keywords = Some(
                    required(flag, value)?
                        .split(',')
                        .map(str::to_string)
                        .collect(),
                );
            }
            "--title" => query.title = Some(required(flag, value)?),
            "--embedding" => {
                let floats = required(flag, value)?
                    .split(',')
                    .map(|v| v.trim().parse::<f32>())
                    .collect::<Result<Vec<f32>, _>>()?;
                query.embedding = Some(floats);
            }
            "--page" => query.page_index = required(flag, value)?.parse()?,
            "--size" => query.page_size = required(flag, value)?.parse()?,
            "--limit" => query.limit = Some(required(flag, value)?.parse()?),
            "--media-type" => query.media_type = Some(required(flag, value)?.parse()?),
            "--valid-only" => {
                query.valid_data = Some(true);
                i += 1;
                continue;
            }
            other => anyhow::bail!("unknown flag: {other}"),
        }
        i += 2;
    }

    let config = Config::load()?;
    let channels = config.channels()?;
    if let (Some(embedding), Some(channel)) = (
        query.embedding.as_ref(),
        channels.iter().find(|c| c.name == channel_name),
    ) {
        if embedding.len() != channel.embedding.dimension {
            eprintln!(
                "warning: embedding has {} dims, channel '{}' was indexed with {} ({})",
                embedding.len(),
                channel_name,
                channel.embedding.dimension,
                channel.embedding.model
            );
        }
    }

    // Handles (including the blocking pair) are built and probed before
    // the async runtime exists.
    let provider = ConnectionProvider::connect(&channels)?;
    let storage = EsStorage::new(provider.get(&channel_name)?, index.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    let page = runtime.block_on(storage.search_hybrid(&index, &query))?;

    if let Some(p) = &page.pagination {
        println!(
            "Page {}/{} ({} items total, window {})",
            p.page_index, p.total_pages, p.total_items, p.page_size
        );
    }
    for (i, item) in page.items.iter().enumerate() {
        println!(
            "{:>3}. score={:.4}  id={}  media={}  type={}  path={}",
            i + 1,
            item.score,
            item.id,
            item.source.media_id,
            item.source.media_type,
            item.source.media_path
        );
        println!("     {}", item.source.description);
    }
    Ok(())
}

fn required(flag: &str, value: Option<String>) -> anyhow::Result<String> {
    value.ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}
