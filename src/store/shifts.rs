use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::overlap::{ResourceFilter, Window};
use crate::paging::{Page, PageRequest};
use crate::types::{EntityRef, Shift};

/// Public sort keys for shift listings.
pub const SORTABLE: &[(&str, &str)] =
    &[("id", "id"), ("start", "start_ts"), ("end", "end_ts"), ("car", "car_id"), ("safetyDriver", "safety_driver_id")];

const SELECT: &str = "SELECT id, car_id, safety_driver_id, start_ts, end_ts FROM shifts";

fn from_row(row: &SqliteRow) -> Result<Shift, sqlx::Error> {
    Ok(Shift {
        id: Some(row.try_get("id")?),
        car: row.try_get::<Option<i64>, _>("car_id")?.map(EntityRef::new),
        safety_driver: row.try_get::<Option<i64>, _>("safety_driver_id")?.map(EntityRef::new),
        start: row.try_get("start_ts")?,
        end: row.try_get("end_ts")?,
    })
}

/// Inserts a new row and returns the id the store assigned.
/// Any id already on `shift` is ignored.
pub async fn insert(db: &SqlitePool, shift: &Shift) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        r#"INSERT INTO shifts (car_id, safety_driver_id, start_ts, end_ts)
           VALUES (?1, ?2, ?3, ?4)"#,
    )
    .bind(shift.car.map(|c| c.id))
    .bind(shift.safety_driver.map(|d| d.id))
    .bind(shift.start)
    .bind(shift.end)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Overwrites the row `id`. Returns whether the row existed.
pub async fn update(db: &SqlitePool, id: i64, shift: &Shift) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        r#"UPDATE shifts SET car_id = ?1, safety_driver_id = ?2, start_ts = ?3, end_ts = ?4
           WHERE id = ?5"#,
    )
    .bind(shift.car.map(|c| c.id))
    .bind(shift.safety_driver.map(|d| d.id))
    .bind(shift.start)
    .bind(shift.end)
    .bind(id)
    .execute(db)
    .await?;

    Ok(res.rows_affected() > 0)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Shift>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT)).bind(id).fetch_optional(db).await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn find_page(db: &SqlitePool, page: &PageRequest) -> Result<Page<Shift>, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shifts").fetch_one(db).await?;
    // order_by only ever holds a column from SORTABLE
    let order = page.order_by.map(|o| o.sql()).unwrap_or_else(|| "id ASC".to_string());
    let rows = sqlx::query(&format!("{} ORDER BY {}, id ASC LIMIT ?1 OFFSET ?2", SELECT, order))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(db)
        .await?;
    let items = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total))
}

pub async fn find_all(db: &SqlitePool) -> Result<Vec<Shift>, sqlx::Error> {
    let rows = sqlx::query(&format!("{} ORDER BY id", SELECT)).fetch_all(db).await?;
    rows.iter().map(from_row).collect()
}

/// Returns whether a row was deleted.
pub async fn delete_by_id(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM shifts WHERE id = ?1").bind(id).execute(db).await?;
    Ok(res.rows_affected() > 0)
}

/// Earliest shift of `driver` with `start >= from`, lowest id on ties.
pub async fn find_next_for_driver(
    db: &SqlitePool,
    driver: EntityRef,
    from: i64,
) -> Result<Option<Shift>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "{} WHERE safety_driver_id = ?1 AND start_ts >= ?2 ORDER BY start_ts ASC, id ASC LIMIT 1",
        SELECT
    ))
    .bind(driver.id)
    .bind(from)
    .fetch_optional(db)
    .await?;
    row.as_ref().map(from_row).transpose()
}

/// SQL form of [`crate::overlap::conflicts_with`]. Unbound references bind
/// NULL, and `column = NULL` never holds. The last clause compares `end_ts`
/// with itself exactly like the in-memory predicate.
pub async fn find_overlapping(
    db: &SqlitePool,
    filter: &ResourceFilter,
    window: Window,
) -> Result<Vec<Shift>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"{} WHERE (car_id = ?1 OR safety_driver_id = ?2)
             AND ((start_ts BETWEEN ?3 AND ?4)
               OR (end_ts BETWEEN ?3 AND ?4)
               OR (start_ts <= ?3 AND end_ts >= end_ts))
           ORDER BY id"#,
        SELECT
    ))
    .bind(filter.car.map(|c| c.id))
    .bind(filter.safety_driver.map(|d| d.id))
    .bind(window.start)
    .bind(window.end)
    .fetch_all(db)
    .await?;
    rows.iter().map(from_row).collect()
}

/// Shifts of the filtered resources whose `[start_ts, end_ts]` intersects
/// `window`. SQL form of [`crate::overlap::find_intersecting`].
pub async fn find_intersecting(
    db: &SqlitePool,
    filter: &ResourceFilter,
    window: Window,
) -> Result<Vec<Shift>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{} WHERE (car_id = ?1 OR safety_driver_id = ?2) AND start_ts <= ?4 AND end_ts >= ?3 ORDER BY id",
        SELECT
    ))
    .bind(filter.car.map(|c| c.id))
    .bind(filter.safety_driver.map(|d| d.id))
    .bind(window.start)
    .bind(window.end)
    .fetch_all(db)
    .await?;
    rows.iter().map(from_row).collect()
}
