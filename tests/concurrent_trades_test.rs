use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tradeledger::application::trading::{RetryPolicy, TradingService};
use tradeledger::domain::repositories::StockRepository;
use tradeledger::infrastructure::persistence::{Database, SqliteStockRepository};

/// Test: N parallel trades on one ticker never lose an update
///
/// Every task races through ensure-exists, read, insert and update on the same
/// aggregate row; the final totals must account for every trade.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_trades_on_same_ticker() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ledger.db").display());
    let db = Database::new(&url).await.unwrap();
    let repo: Arc<dyn StockRepository> = Arc::new(SqliteStockRepository::new(db.pool.clone()));

    let policy = RetryPolicy {
        max_retries: 20,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(50),
        jitter: true,
    };
    let service = TradingService::new(repo.clone(), policy, Duration::from_secs(60));

    const N: i64 = 40;
    let handles: Vec<_> = (1..=N)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                // Lower-case half of the time: same stock either way
                let ticker = if i % 2 == 0 { "tsla" } else { "TSLA" };
                service
                    .record_trade(ticker, Decimal::from(200 + i), Decimal::from(i), &format!("B{}", i))
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        result.expect("task panicked").expect("trade failed");
    }

    let stock = service.get_stock("TSLA").await.unwrap();
    let expected_volume: i64 = (1..=N).sum();
    let expected_value: i64 = (1..=N).map(|i| (200 + i) * i).sum();

    assert_eq!(stock.total_volume, Decimal::from(expected_volume));
    assert_eq!(stock.total_value, Decimal::from(expected_value));
    assert_eq!(
        stock.average_price,
        (Decimal::from(expected_value) / Decimal::from(expected_volume))
            .round_dp(8)
            .normalize()
    );
    assert_eq!(stock.version, N);
    let (trades,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trades")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(trades, N);
    assert_eq!(service.list_stocks::<&str>(&[]).await.unwrap().len(), 1);
}

/// Test: parallel first trades on many unseen tickers each create one stock
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_first_trades_create_one_row_each() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ledger.db").display());
    let db = Database::new(&url).await.unwrap();
    let repo = Arc::new(SqliteStockRepository::new(db.pool.clone()));
    let service = TradingService::new(repo, RetryPolicy::default(), Duration::from_secs(60));

    let tickers = ["AAA", "BBB", "CCC", "DDD"];
    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = service.clone();
            let ticker = tickers[i % tickers.len()];
            tokio::spawn(async move {
                service
                    .record_trade(ticker, Decimal::from(10), Decimal::from(1), "B1")
                    .await
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    let stocks = service.list_stocks::<&str>(&[]).await.unwrap();
    assert_eq!(stocks.len(), tickers.len());
    for stock in stocks {
        assert_eq!(stock.total_volume, Decimal::from(8));
        assert_eq!(stock.average_price, Decimal::from(10));
    }
}
