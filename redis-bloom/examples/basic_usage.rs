//! Basic usage of the four RedisBloom data types
//!
//! Run against a server with the RedisBloom module loaded:
//! `REDIS_URL=redis://localhost:6379 RUST_LOG=debug cargo run --example basic_usage`

use redis_bloom::{BfReserveOptions, Client, ConnectionConfig, RespValue, TopKDimensions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::connect(ConnectionConfig::from_env()).await?;
    println!("Connected successfully!");

    let keys = ["demo:bf", "demo:bf:copy", "demo:cf", "demo:cms", "demo:topk"];
    client
        .raw_command("DEL", keys.iter().map(|k| RespValue::from(*k)).collect())
        .await?;

    // Bloom filter
    let visitors = client.bloom_filter("demo:bf");
    visitors
        .reserve(0.01, 1000, BfReserveOptions::new().with_expansion(2))
        .await?;
    visitors.multi_add(["alice", "bob", "carol"]).await?;
    println!("bob seen: {}", visitors.exists("bob").await?);
    println!("dave seen: {}", visitors.exists("dave").await?);
    visitors.copy("demo:bf:copy").await?;
    println!("Copy info: {:?}", client.bf_info("demo:bf:copy").await?);

    // Cuckoo filter
    let sessions = client.cuckoo_filter("demo:cf");
    sessions.add("s-1").await?;
    sessions.add("s-2").await?;
    sessions.delete("s-1").await?;
    println!("s-1 live: {}", sessions.exists("s-1").await?);

    // Count-Min Sketch
    let colors = client.count_min_sketch("demo:cms");
    colors.init_by_dim(100, 4).await?;
    let counts = colors
        .increment_by([("green", 40), ("black", 90), ("orange", 6)])
        .await?;
    println!("Counts after increment: {:?}", counts);

    // Top-K
    let pages = client.top_k("demo:topk");
    pages.reserve(2, Some(TopKDimensions::new(50, 4, 0.9))).await?;
    pages
        .increment_by([("/home", 12), ("/about", 3), ("/pricing", 7)])
        .await?;
    println!("Top pages: {:?}", pages.list_with_count().await?);

    client
        .raw_command("DEL", keys.iter().map(|k| RespValue::from(*k)).collect())
        .await?;
    client.disconnect().await?;
    Ok(())
}
