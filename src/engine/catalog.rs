//! Checklist catalog
//!
//! Owner-independent, append-only catalog of checklist templates, lazily
//! seeded with ten defaults on first read.

use sqlx::SqlitePool;

use crate::db;
use crate::domain::{ChecklistItem, EngineError};

/// Seeded the first time the catalog is read empty
pub const DEFAULT_CHECKLIST: [&str; 10] = [
    "Check electrical connections",
    "Inspect solar panels",
    "Clean panel surfaces",
    "Check inverters",
    "Test monitoring system",
    "Check support structures",
    "Inspect cabling",
    "Check grounding system",
    "Test system performance",
    "Document energy readings",
];

/// All catalog entries ordered by id ascending, seeding defaults when empty.
///
/// Seeding uses `INSERT OR IGNORE` against the unique description constraint,
/// so two first-time callers racing each other settle on the same ten rows.
pub async fn list_or_seed(pool: &SqlitePool) -> Result<Vec<ChecklistItem>, EngineError> {
    let items = db::list_checklist_items(pool).await?;
    if !items.is_empty() {
        return Ok(items);
    }

    let mut tx = pool.begin().await?;
    for description in DEFAULT_CHECKLIST {
        db::insert_checklist_item_if_absent(&mut *tx, description).await?;
    }
    tx.commit().await?;

    tracing::info!("checklist catalog seeded");
    Ok(db::list_checklist_items(pool).await?)
}
