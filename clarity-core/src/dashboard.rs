use serde::Serialize;
use tracing::warn;

use crate::identity::{lookup_owner, Identity};
use crate::store::{Store, StoreError};

/// Progress summary shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sessions: i64,
    /// Mean pronunciation score rescaled to 0-100, `None` without sessions.
    pub average_pronunciation_score: Option<f64>,
}

/// Read-only aggregation for `identity`. Falls back to the empty default when
/// the datastore cannot be read.
pub async fn dashboard_stats(store: &dyn Store, identity: &Identity) -> DashboardStats {
    match load_stats(store, identity).await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(error = %err, "Failed to fetch dashboard stats; returning defaults");
            DashboardStats::default()
        }
    }
}

async fn load_stats(store: &dyn Store, identity: &Identity) -> Result<DashboardStats, StoreError> {
    let Some(user_id) = lookup_owner(store, identity).await? else {
        return Ok(DashboardStats::default());
    };

    // Two independent reads, not wrapped in a transaction.
    let (total_sessions, average) = tokio::try_join!(
        store.count_analyses(user_id),
        store.average_pronunciation_score(user_id)
    )?;

    Ok(DashboardStats {
        total_sessions,
        average_pronunciation_score: average.map(to_display_scale),
    })
}

/// Stored [0,1] mean to the 0-100 display scale, at two decimals.
fn to_display_scale(avg: f64) -> f64 {
    (avg * 10_000.0).round() / 100.0
}
