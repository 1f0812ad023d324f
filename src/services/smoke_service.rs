use serde::Serialize;
use tracing::{info, warn};

use crate::clients::product_service_client::ProductServiceClient;
use crate::models::{ItemsQuery, LoginRequest};

#[derive(Debug, Clone, Serialize)]
pub struct SmokeCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SmokeReport {
    pub checks: Vec<SmokeCheck>,
}

impl SmokeReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    fn record(&mut self, name: &'static str, passed: bool, detail: String) {
        if passed {
            info!("PASS {}: {}", name, detail);
        } else {
            warn!("FAIL {}: {}", name, detail);
        }
        self.checks.push(SmokeCheck { name, passed, detail });
    }
}

pub const LOGIN_CHECK: &str = "login yields a session token";
pub const LISTING_CHECK: &str = "listing count matches listed items";
pub const MISSING_ITEM_CHECK: &str = "unknown item is not served";

/// Run the smoke checks in order. A failing check does not stop the later ones.
pub async fn run_smoke(
    client: &ProductServiceClient,
    credentials: &LoginRequest,
    missing_item_id: i64,
) -> SmokeReport {
    let mut report = SmokeReport::default();

    match client.login(credentials).await {
        Ok(session) if !session.token().is_empty() => report.record(
            LOGIN_CHECK,
            true,
            format!("{} cookie(s) set", session.cookies.len()),
        ),
        Ok(_) => report.record(LOGIN_CHECK, false, "first cookie has an empty value".to_string()),
        Err(e) => report.record(LOGIN_CHECK, false, e.to_string()),
    }

    match client.get_all_items(&ItemsQuery::default()).await {
        Ok(page) => report.record(
            LISTING_CHECK,
            page.count_is_consistent(),
            format!("count={} listed={}", page.count, page.results.items.len()),
        ),
        Err(e) => report.record(LISTING_CHECK, false, e.to_string()),
    }

    match client.get_item(missing_item_id).await {
        Ok(item) => report.record(
            MISSING_ITEM_CHECK,
            false,
            format!("item {} answered 200 with title {:?}", missing_item_id, item.title),
        ),
        Err(e) => match e.status() {
            Some(status) => report.record(
                MISSING_ITEM_CHECK,
                true,
                format!("item {} answered {}", missing_item_id, status.as_u16()),
            ),
            None => report.record(MISSING_ITEM_CHECK, false, e.to_string()),
        },
    }

    report
}
