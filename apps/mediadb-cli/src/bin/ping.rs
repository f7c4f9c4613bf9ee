use mediadb_core::config::Config;
use mediadb_es::ConnectionProvider;

// Fail-fast connectivity check: builds and probes every configured
// channel exactly the way service startup does.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let channels = config.channels()?;
    for channel in &channels {
        println!(
            "channel '{}' -> {} (embedding {} / {} dims)",
            channel.name,
            channel.elastic_search.base_url(),
            channel.embedding.model,
            channel.embedding.dimension
        );
    }
    let provider = ConnectionProvider::connect(&channels)?;
    println!("all {} channel(s) reachable", provider.channel_names().count());
    Ok(())
}
