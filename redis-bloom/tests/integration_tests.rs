//! Integration tests for redis-bloom
//!
//! These tests require a running Redis instance with the RedisBloom module.
//! Set REDIS_URL environment variable or use default redis://localhost:6379
//! and run with `cargo test -- --ignored`.

use redis_bloom::{
    BfInsertOptions, BfReserveOptions, CfInsertOptions, CfInsertOutcome, CfReserveOptions,
    Client, ConnectionConfig, RedisValue, RespValue, TopKDimensions,
};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

async fn connect() -> Client {
    Client::connect(ConnectionConfig::new(redis_url()))
        .await
        .expect("Failed to connect")
}

async fn cleanup(client: &Client, keys: &[&str]) {
    let args = keys.iter().map(|k| RespValue::from(*k)).collect();
    client.raw_command("DEL", args).await.expect("DEL failed");
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_bloom_filter_lifecycle() {
    let client = connect().await;
    let keys = ["test:bf:main", "test:bf:copy"];
    cleanup(&client, &keys).await;

    let filter = client.bloom_filter(keys[0]);
    assert!(filter
        .reserve(0.1, 50, BfReserveOptions::new().with_expansion(4))
        .await
        .expect("BF.RESERVE failed"));

    assert!(filter.add(1).await.unwrap());
    assert!(filter.exists(1).await.unwrap());

    let added = filter.multi_add(2..=5).await.unwrap();
    assert!(added.iter().all(|&b| b));

    let options = BfInsertOptions::new()
        .with_capacity(100)
        .with_error_rate(0.01);
    let inserted = filter.insert(6..=20, options).await.unwrap();
    assert!(inserted.iter().all(|&b| b));

    let info = filter.info().await.unwrap();
    assert_eq!(info.number_of_filters, 1);
    assert_eq!(info.number_of_items_inserted, 20);

    assert!(filter.copy(keys[1]).await.unwrap());
    let copied = client.bloom_filter(keys[1]).multi_exists(1..=20).await.unwrap();
    assert!(copied.iter().all(|&b| b));

    cleanup(&client, &keys).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_bloom_filter_scalar_items() {
    let client = connect().await;
    let key = "test:bf:scalars";
    cleanup(&client, &[key]).await;

    let items = vec![
        RedisValue::from("foo"),
        RedisValue::from(12),
        RedisValue::from(7.01),
    ];
    for item in items {
        assert!(client.bf_add(key, item.clone()).await.unwrap());
        assert!(client.bf_exists(key, item).await.unwrap());
    }

    cleanup(&client, &[key]).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_bloom_filter_server_errors() {
    let client = connect().await;
    let key = "test:bf:errors";
    cleanup(&client, &[key]).await;

    client
        .bf_reserve(key, 0.01, 100, BfReserveOptions::new())
        .await
        .unwrap();
    let err = client
        .bf_reserve(key, 0.01, 100, BfReserveOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_response_error());

    for rate in [0.0, 1.0] {
        let err = client
            .bf_reserve("test:bf:bad-rate", rate, 100, BfReserveOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_response_error());
    }

    let err = client
        .bf_loadchunk("test:bf:nonexistent", 556, "1")
        .await
        .unwrap_err();
    assert!(err.is_response_error());

    let err = client
        .bf_copy("test:bf:nonexistent", "test:bf:other")
        .await
        .unwrap_err();
    assert!(err.is_response_error());

    cleanup(&client, &[key]).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_cuckoo_filter_lifecycle() {
    let client = connect().await;
    let keys = ["test:cf:main", "test:cf:copy"];
    cleanup(&client, &keys).await;

    let filter = client.cuckoo_filter(keys[0]);
    assert!(filter
        .reserve(1000, CfReserveOptions::new().with_bucket_size(4))
        .await
        .unwrap());

    assert!(filter.add("foo").await.unwrap());
    assert!(filter.add("foo").await.unwrap());
    assert!(!filter.add_if_not_exist("foo").await.unwrap());
    assert_eq!(filter.count("foo").await.unwrap(), 2);

    let inserted = filter
        .insert([3, 4, 5], CfInsertOptions::new())
        .await
        .unwrap();
    assert!(inserted.iter().all(|o| o.is_added()));
    let inserted = filter
        .insert_if_not_exist([5, 6], CfInsertOptions::new())
        .await
        .unwrap();
    assert_eq!(inserted, vec![CfInsertOutcome::Exists, CfInsertOutcome::Added]);

    assert!(filter.delete("foo").await.unwrap());
    assert_eq!(filter.count("foo").await.unwrap(), 1);

    assert!(filter.copy(keys[1]).await.unwrap());
    let copied = client
        .cuckoo_filter(keys[1])
        .multi_exists([3, 4, 5, 6])
        .await
        .unwrap();
    assert!(copied.iter().all(|&b| b));

    let info = filter.info().await.unwrap();
    assert_eq!(info.bucket_size, 4);
    assert_eq!(info.number_of_items_deleted, 1);

    cleanup(&client, &keys).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_count_min_sketch() {
    let client = connect().await;
    let keys = ["test:cms:a", "test:cms:b", "test:cms:merged"];
    cleanup(&client, &keys).await;

    let sketch = client.count_min_sketch(keys[0]);
    assert!(sketch.init_by_dim(100, 4).await.unwrap());
    let counts = sketch
        .increment_by([("green", 40), ("black", 90), ("orange", 6)])
        .await
        .unwrap();
    assert_eq!(counts, vec![40, 90, 6]);

    let counts = sketch
        .increment_by(vec![(RedisValue::from(12), 31), (RedisValue::from(13.4), 32)])
        .await
        .unwrap();
    assert_eq!(counts, vec![31, 32]);

    let other = client.count_min_sketch(keys[1]);
    other.init_by_dim(100, 4).await.unwrap();
    other.increment_by([("green", 2)]).await.unwrap();

    let merged = client.count_min_sketch(keys[2]);
    merged.init_by_dim(100, 4).await.unwrap();
    assert!(merged
        .merge_from(
            vec![keys[0].to_string(), keys[1].to_string()],
            Some(vec![1, 3])
        )
        .await
        .unwrap());
    assert_eq!(merged.query(["green"]).await.unwrap(), vec![46]);

    let info = sketch.info().await.unwrap();
    assert_eq!(info.width, 100);
    assert_eq!(info.depth, 4);
    assert_eq!(info.count, 199);

    cleanup(&client, &keys).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_top_k() {
    let client = connect().await;
    let key = "test:topk";
    cleanup(&client, &[key]).await;

    let top = client.top_k(key);
    assert!(top
        .reserve(2, Some(TopKDimensions::new(50, 4, 0.9)))
        .await
        .unwrap());

    top.increment_by([("foo", 10), ("bar", 5)]).await.unwrap();
    assert_eq!(top.query(["foo", "baz"]).await.unwrap(), vec![true, false]);
    assert_eq!(top.count(["foo"]).await.unwrap(), vec![10]);

    let listed = top.list_with_count().await.unwrap();
    assert_eq!(listed.first(), Some(&("foo".to_string(), 10)));
    assert_eq!(top.list().await.unwrap().len(), 2);

    let info = top.info().await.unwrap();
    assert_eq!(info.k, 2);
    assert_eq!(info.width, 50);

    cleanup(&client, &[key]).await;
}

#[tokio::test]
#[ignore = "requires a RedisBloom server"]
async fn test_disconnect_releases_server_connection() {
    let observer = connect().await;
    let filter = redis_bloom::BloomFilter::connect(
        "test:bf:disconnect",
        ConnectionConfig::new(redis_url()),
    )
    .await
    .unwrap();

    let before: i64 = observer.info(Some("clients")).await.unwrap()["connected_clients"]
        .parse()
        .unwrap();
    assert!(filter.disconnect().await.unwrap());
    // The server notices the closed socket asynchronously.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let after: i64 = observer.info(Some("clients")).await.unwrap()["connected_clients"]
        .parse()
        .unwrap();

    assert_eq!(before - after, 1);
    assert!(!filter.disconnect().await.unwrap());
}
