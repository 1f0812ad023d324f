use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::clients::product_service_client::ProductServiceClient;
use crate::models::ItemsQuery;
use crate::utils::output::render_json;
use crate::utils::scope_guard::defer;

/// Per-task outcome counts of a burst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BurstSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Fire `size` identical item listings at once and wait for all of them.
///
/// Every task prints its own listing or logs its own error. Output order is
/// whatever order the responses arrive in.
pub async fn run_burst(client: Arc<ProductServiceClient>, size: usize, pretty: bool) -> BurstSummary {
    info!("Launching {} concurrent item listings", size);

    let tasks = (0..size).map(|task| {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            let _done = defer(move || debug!(task, "burst task finished"));

            let items = match client.get_all_items(&ItemsQuery::default()).await {
                Ok(items) => items,
                Err(e) => {
                    error!(task, "GetAllItems failed: {}", e);
                    return false;
                }
            };

            match render_json(&items, pretty) {
                Ok(json) => {
                    println!("{}", json);
                    true
                }
                Err(e) => {
                    error!(task, "Marshal failed: {}", e);
                    false
                }
            }
        })
    });

    let mut summary = BurstSummary::default();
    for outcome in join_all(tasks).await {
        match outcome {
            Ok(true) => summary.succeeded += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                error!("Burst task aborted: {}", e);
                summary.failed += 1;
            }
        }
    }

    info!("Burst finished: {} succeeded, {} failed", summary.succeeded, summary.failed);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    async fn client_for(router: axum::Router) -> Arc<ProductServiceClient> {
        let base_url = test_support::spawn(router).await;
        Arc::new(ProductServiceClient::new(&test_support::config(&base_url)).unwrap())
    }

    #[tokio::test]
    async fn every_task_succeeds_against_healthy_service() {
        let client = client_for(test_support::product_api()).await;

        let summary = run_burst(client, 10, false).await;

        assert_eq!(summary, BurstSummary { succeeded: 10, failed: 0 });
    }

    #[tokio::test]
    async fn each_task_fails_independently() {
        let client = client_for(test_support::failing_api()).await;

        let summary = run_burst(client, 4, false).await;

        assert_eq!(summary, BurstSummary { succeeded: 0, failed: 4 });
    }

    #[tokio::test]
    async fn empty_burst_does_nothing() {
        let client = client_for(test_support::product_api()).await;

        assert_eq!(run_burst(client, 0, true).await, BurstSummary::default());
    }
}
