use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};

use chainpulse::config::Config;
use chainpulse::poller;
use chainpulse::rpc::{ChainClient, DEFAULT_BLOCK_TIME_SECS};

fn rpc_result(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

fn block_json(number: u64, timestamp: u64, tx_count: usize) -> Value {
    json!({
        "number": format!("{number:#x}"),
        "hash": format!("0x{:064x}", number),
        "parentHash": format!("0x{:064x}", number.wrapping_sub(1)),
        "timestamp": format!("{timestamp:#x}"),
        "miner": "0x00000000000000000000000000000000000000a1",
        "gasUsed": "0x5208",
        "gasLimit": "0x1c9c380",
        "size": "0x220",
        "nonce": "0x0000000000000042",
        "extraData": "0x",
        "transactions": (0..tx_count).map(|i| json!({
            "hash": format!("0x{:064x}", i),
            "from": "0x00000000000000000000000000000000000000aa",
            "to": "0x00000000000000000000000000000000000000bb",
            "value": "0xde0b6b3a7640000",
        })).collect::<Vec<_>>(),
    })
}

async fn mock_block_at(server: &mut ServerGuard, height: u64, result: Value) -> mockito::Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_getBlockByNumber",
            "params": [format!("{height:#x}"), true],
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(result))
        .create_async()
        .await
}

fn test_config(url: &str) -> Config {
    Config {
        rpc_url: url.to_string(),
        http_bind_addr: "127.0.0.1:0".to_string(),
        poll_interval_secs: 15,
        chain_id: 52,
        symbol: "CET".to_string(),
    }
}

#[tokio::test]
async fn snapshot_assembles_all_dashboard_fields() {
    let mut server = Server::new_async().await;

    let _height = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!("0x78")))
        .create_async()
        .await;
    let _latest = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_getBlockByNumber",
            "params": ["latest", true],
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(block_json(120, 11_500, 3)))
        .create_async()
        .await;
    let _gas = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "eth_gasPrice"})))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!("0x77359400")))
        .create_async()
        .await;

    let mut block_mocks = Vec::new();
    for height in 111..=120 {
        let timestamp = 11_500 - (120 - height) * 15;
        block_mocks.push(mock_block_at(&mut server, height, block_json(height, timestamp, 1)).await);
    }
    // Sample block for the average block time, 100 heights back.
    block_mocks.push(mock_block_at(&mut server, 20, block_json(20, 10_000, 0)).await);

    let client = ChainClient::new(&server.url()).unwrap();
    let config = test_config(&server.url());
    let snapshot = poller::fetch_snapshot(&client, &config).await.unwrap();

    assert_eq!(snapshot.chain_id, 52);
    assert_eq!(snapshot.symbol, "CET");
    assert_eq!(snapshot.latest_height, 120);
    assert_eq!(snapshot.latest_block.number, 120);
    assert_eq!(snapshot.latest_block.tx_count, 3);

    let heights: Vec<u64> = snapshot.recent_blocks.iter().map(|b| b.number).collect();
    assert_eq!(heights, vec![120, 119, 118, 117, 116, 115, 114, 113, 112, 111]);

    assert_eq!(snapshot.recent_transactions.len(), 3);
    assert!(snapshot
        .recent_transactions
        .iter()
        .all(|tx| tx.timestamp == 11_500));

    assert_eq!(snapshot.total_transactions, 360);
    assert!((snapshot.average_block_time_secs - 15.0).abs() < f64::EPSILON);
    assert_eq!(snapshot.gas_price_wei, 2_000_000_000);
    assert_eq!(snapshot.gas_price_display, "2.00 Gwei");
}

#[tokio::test]
async fn snapshot_survives_auxiliary_query_failures() {
    let mut server = Server::new_async().await;

    let _height = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!("0x78")))
        .create_async()
        .await;
    let _latest = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_getBlockByNumber",
            "params": ["latest", true],
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(block_json(120, 11_500, 0)))
        .create_async()
        .await;

    let mut block_mocks = Vec::new();
    for height in 111..=120 {
        block_mocks.push(mock_block_at(&mut server, height, block_json(height, 11_500, 0)).await);
    }
    // No mock for eth_gasPrice or for the height-20 sample block; those
    // requests fail and the auxiliary metrics fall back.

    let client = ChainClient::new(&server.url()).unwrap();
    let config = test_config(&server.url());
    let snapshot = poller::fetch_snapshot(&client, &config).await.unwrap();

    assert_eq!(snapshot.gas_price_wei, 0);
    assert_eq!(snapshot.gas_price_display, "0 Gwei");
    assert!((snapshot.average_block_time_secs - DEFAULT_BLOCK_TIME_SECS).abs() < f64::EPSILON);
    // The empty latest block falls back to ten transactions per block.
    assert_eq!(snapshot.total_transactions, 1_200);
}

#[tokio::test]
async fn snapshot_fails_when_latest_block_unavailable() {
    let mut server = Server::new_async().await;

    let _height = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!("0x78")))
        .create_async()
        .await;
    let _latest = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_getBlockByNumber",
            "params": ["latest", true],
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(Value::Null))
        .create_async()
        .await;

    let client = ChainClient::new(&server.url()).unwrap();
    let config = test_config(&server.url());
    let err = poller::fetch_snapshot(&client, &config).await.unwrap_err();
    assert!(err.to_string().contains("no latest block"));
}
