//! Checklist completion tracker
//!
//! Per-visit upsert ledger. The whole batch runs in one transaction so a
//! failure never leaves a partially applied report.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db;
use crate::domain::{EngineError, ReportItemsRequest};

/// Record the reported completion state of catalog items for one visit.
///
/// One row per (visit, item) pair: an existing row is updated in place, a
/// missing one is inserted. An explicit `completed_at` always wins; without
/// one, a row that was already completed keeps its original timestamp and a
/// newly completed row is stamped now. Un-completing forces the timestamp to
/// null. Returns the number of items applied.
pub async fn report_items(
    pool: &SqlitePool,
    owner_id: &str,
    visit_id: i64,
    req: ReportItemsRequest,
) -> Result<usize, EngineError> {
    let items = req
        .items
        .ok_or_else(|| EngineError::InvalidArgument("items is required".to_string()))?;

    let mut tx = pool.begin().await?;

    db::get_visit(&mut *tx, owner_id, visit_id)
        .await?
        .ok_or_else(|| EngineError::not_found("visit", visit_id))?;

    for item in &items {
        let notes = item.notes.as_deref().unwrap_or("");

        match db::get_completed_item(&mut *tx, visit_id, item.checklist_item_id).await? {
            Some(existing) => {
                let completed_at = if item.completed {
                    item.completed_at
                        .or(existing.completed_at.filter(|_| existing.completed))
                        .or_else(|| Some(Utc::now()))
                } else {
                    None
                };
                db::update_completed_item(&mut *tx, existing.id, item.completed, notes, completed_at)
                    .await?;
            }
            None => {
                let completed_at = if item.completed {
                    item.completed_at.or_else(|| Some(Utc::now()))
                } else {
                    None
                };
                db::insert_completed_item(
                    &mut *tx,
                    visit_id,
                    item.checklist_item_id,
                    item.completed,
                    notes,
                    completed_at,
                )
                .await?;
            }
        }
    }

    tx.commit().await?;
    tracing::debug!(owner = owner_id, visit = visit_id, count = items.len(), "checklist reported");
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewVisit;
    use crate::domain::ReportedItem;
    use crate::engine::testutil::{memory_pool, plant_with_order};
    use chrono::TimeZone;

    async fn seed_visit(pool: &SqlitePool, owner: &str) -> i64 {
        let plant = plant_with_order(pool, owner, "A", 1).await;
        for description in ["Check inverters", "Inspect cabling"] {
            db::insert_checklist_item_if_absent(pool, description).await.unwrap();
        }
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        db::insert_visit(
            pool,
            &NewVisit {
                plant_id: plant,
                owner_id: owner,
                start_date: start,
                end_date: None,
                notes: "",
            },
            start,
        )
        .await
        .unwrap()
    }

    fn report(items: Vec<ReportedItem>) -> ReportItemsRequest {
        ReportItemsRequest { items: Some(items) }
    }

    #[tokio::test]
    async fn test_report_inserts_then_updates() {
        let pool = memory_pool().await;
        let visit = seed_visit(&pool, "owner").await;

        let count = report_items(
            &pool,
            "owner",
            visit,
            report(vec![ReportedItem {
                checklist_item_id: 1,
                completed: false,
                notes: Some("pending".to_string()),
                completed_at: None,
            }]),
        )
        .await
        .unwrap();
        assert_eq!(count, 1);

        report_items(
            &pool,
            "owner",
            visit,
            report(vec![ReportedItem {
                checklist_item_id: 1,
                completed: true,
                notes: Some("done".to_string()),
                completed_at: None,
            }]),
        )
        .await
        .unwrap();

        let ledger = db::list_completed_items(&pool, visit).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(ledger[0].completed);
        assert_eq!(ledger[0].notes, "done");
        assert!(ledger[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_replay_with_explicit_timestamps_is_idempotent() {
        let pool = memory_pool().await;
        let visit = seed_visit(&pool, "owner").await;

        let stamp = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let payload = vec![
            ReportedItem {
                checklist_item_id: 1,
                completed: true,
                notes: Some("ok".to_string()),
                completed_at: Some(stamp),
            },
            ReportedItem {
                checklist_item_id: 2,
                completed: false,
                notes: None,
                completed_at: None,
            },
        ];

        report_items(&pool, "owner", visit, report(payload.clone())).await.unwrap();
        let first = db::list_completed_items(&pool, visit).await.unwrap();

        report_items(&pool, "owner", visit, report(payload)).await.unwrap();
        let second = db::list_completed_items(&pool, visit).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_replay_without_timestamp_keeps_original() {
        let pool = memory_pool().await;
        let visit = seed_visit(&pool, "owner").await;

        let payload = vec![ReportedItem {
            checklist_item_id: 1,
            completed: true,
            notes: None,
            completed_at: None,
        }];

        report_items(&pool, "owner", visit, report(payload.clone())).await.unwrap();
        let first = db::list_completed_items(&pool, visit).await.unwrap();

        report_items(&pool, "owner", visit, report(payload)).await.unwrap();
        let second = db::list_completed_items(&pool, visit).await.unwrap();

        assert_eq!(first[0].completed_at, second[0].completed_at);
    }

    #[tokio::test]
    async fn test_uncompleting_clears_timestamp() {
        let pool = memory_pool().await;
        let visit = seed_visit(&pool, "owner").await;

        report_items(
            &pool,
            "owner",
            visit,
            report(vec![ReportedItem {
                checklist_item_id: 1,
                completed: true,
                notes: None,
                completed_at: None,
            }]),
        )
        .await
        .unwrap();

        report_items(
            &pool,
            "owner",
            visit,
            report(vec![ReportedItem {
                checklist_item_id: 1,
                completed: false,
                notes: None,
                completed_at: None,
            }]),
        )
        .await
        .unwrap();

        let ledger = db::list_completed_items(&pool, visit).await.unwrap();
        assert!(!ledger[0].completed);
        assert!(ledger[0].completed_at.is_none());
    }

    #[tokio::test]
    async fn test_missing_items_is_invalid_argument() {
        let pool = memory_pool().await;
        let visit = seed_visit(&pool, "owner").await;

        let err = report_items(&pool, "owner", visit, ReportItemsRequest { items: None })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unknown_visit_is_not_found() {
        let pool = memory_pool().await;
        let err = report_items(&pool, "owner", 42, report(Vec::new())).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
