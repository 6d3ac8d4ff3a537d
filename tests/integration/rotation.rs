//! Rotation scenarios across the sequencer and lifecycle manager

use chrono::{Duration, TimeZone, Utc};

use millwright::db;
use millwright::engine::{lifecycle, sequencer};

use crate::{add_plant, memory_pool};

#[tokio::test]
async fn scenario_weekly_advance_and_monthly_wrap() {
    let pool = memory_pool().await;
    let a = add_plant(&pool, "owner", "A", 1).await;
    let b = add_plant(&pool, "owner", "B", 2).await;
    let c = add_plant(&pool, "owner", "C", 3).await;

    // Completing A's visit on 2024-01-01 schedules B for 2024-01-08
    let jan1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let follow_up = sequencer::advance(&mut tx, "owner", a, jan1)
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(follow_up.plant_id, b);
    assert!(!follow_up.wrapped);
    assert_eq!(
        follow_up.scheduled_for,
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
    );

    // Completing C's visit on 2024-02-01 wraps to A for 2024-03-01
    let feb1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let wrapped = sequencer::advance(&mut tx, "owner", c, feb1)
        .await
        .unwrap()
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(wrapped.plant_id, a);
    assert!(wrapped.wrapped);
    assert_eq!(
        wrapped.scheduled_for,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn complete_round_trip_updates_both_plants() {
    let pool = memory_pool().await;
    let a = add_plant(&pool, "owner", "A", 1).await;
    let b = add_plant(&pool, "owner", "B", 2).await;

    // Record A's visit directly so first-visit seeding stays out of the picture
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let visit_id = db::insert_visit(
        &pool,
        &db::NewVisit {
            plant_id: a,
            owner_id: "owner",
            start_date: start,
            end_date: None,
            notes: "",
        },
        start,
    )
    .await
    .unwrap();

    lifecycle::complete_visit(&pool, "owner", visit_id).await.unwrap();

    let visit = db::get_visit(&pool, "owner", visit_id).await.unwrap().unwrap();
    assert!(visit.is_completed);
    let completed_at = visit.end_date.unwrap();

    let plant_a = db::get_plant(&pool, "owner", a).await.unwrap().unwrap();
    assert_eq!(plant_a.last_maintenance_date, Some(completed_at));
    assert!(plant_a.next_maintenance_date.is_none());

    let plant_b = db::get_plant(&pool, "owner", b).await.unwrap().unwrap();
    let b_visit = db::pending_visit_for_plant(&pool, b).await.unwrap().unwrap();
    assert_eq!(plant_b.next_maintenance_date, Some(b_visit.start_date));
    assert_eq!(b_visit.start_date - completed_at, Duration::days(7));

    // Exactly one visit was created by the rotation step
    let visits = db::list_visits(&pool, "owner").await.unwrap();
    assert_eq!(visits.len(), 2);
}

#[tokio::test]
async fn deleting_a_plant_cascades_visits_and_compacts_orders() {
    let pool = memory_pool().await;
    let a = add_plant(&pool, "owner", "A", 1).await;
    let b = add_plant(&pool, "owner", "B", 2).await;
    let c = add_plant(&pool, "owner", "C", 3).await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    db::insert_visit(
        &pool,
        &db::NewVisit {
            plant_id: b,
            owner_id: "owner",
            start_date: start,
            end_date: None,
            notes: "",
        },
        start,
    )
    .await
    .unwrap();

    sequencer::remove_plant(&pool, "owner", b).await.unwrap();

    assert!(db::list_visits(&pool, "owner").await.unwrap().is_empty());
    let plants = db::sequenced_plants(&pool, "owner").await.unwrap();
    assert_eq!(
        plants.iter().map(|p| (p.id, p.sequence_order)).collect::<Vec<_>>(),
        vec![(a, Some(1)), (c, Some(2))]
    );
}

#[tokio::test]
async fn unsequenced_plant_never_advances_the_rotation() {
    let pool = memory_pool().await;
    let a = add_plant(&pool, "owner", "A", 1).await;

    // A plant outside the rotation
    let outside = db::insert_plant(
        &pool,
        "owner",
        "Outside",
        "2 Test Street",
        0.0,
        0.0,
        99,
        Utc::now(),
    )
    .await
    .unwrap();
    sqlx::query("UPDATE plants SET sequence_order = NULL WHERE id = ?")
        .bind(outside)
        .execute(&pool)
        .await
        .unwrap();

    let jan1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let follow_up = sequencer::advance(&mut tx, "owner", outside, jan1).await.unwrap();
    tx.commit().await.unwrap();

    assert!(follow_up.is_none());
    assert!(db::list_visits(&pool, "owner").await.unwrap().is_empty());
    let plant_a = db::get_plant(&pool, "owner", a).await.unwrap().unwrap();
    assert!(plant_a.next_maintenance_date.is_none());
}
