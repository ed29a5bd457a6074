use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::paging::{Page, PageRequest};
use crate::types::{CarLicence, EntityRef};

pub const SORTABLE: &[(&str, &str)] =
    &[("id", "id"), ("licence", "licence"), ("car", "car_id"), ("safetyDriver", "safety_driver_id")];

const SELECT: &str = "SELECT id, licence, car_id, safety_driver_id FROM car_licences";

fn from_row(row: &SqliteRow) -> Result<CarLicence, sqlx::Error> {
    Ok(CarLicence {
        id: Some(row.try_get("id")?),
        licence: row.try_get("licence")?,
        car: row.try_get::<Option<i64>, _>("car_id")?.map(EntityRef::new),
        safety_driver: row.try_get::<Option<i64>, _>("safety_driver_id")?.map(EntityRef::new),
    })
}

/// Returns the id the store assigned.
pub async fn insert(db: &SqlitePool, licence: &CarLicence) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        r#"INSERT INTO car_licences (licence, car_id, safety_driver_id)
           VALUES (?1, ?2, ?3)"#,
    )
    .bind(licence.licence.as_deref())
    .bind(licence.car.map(|c| c.id))
    .bind(licence.safety_driver.map(|d| d.id))
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<CarLicence>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT)).bind(id).fetch_optional(db).await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn find_page(db: &SqlitePool, page: &PageRequest) -> Result<Page<CarLicence>, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car_licences").fetch_one(db).await?;
    let order = page.order_by.map(|o| o.sql()).unwrap_or_else(|| "id ASC".to_string());
    let rows = sqlx::query(&format!("{} ORDER BY {}, id ASC LIMIT ?1 OFFSET ?2", SELECT, order))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(db)
        .await?;
    let items = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total))
}

pub async fn find_all(db: &SqlitePool) -> Result<Vec<CarLicence>, sqlx::Error> {
    let rows = sqlx::query(&format!("{} ORDER BY id", SELECT)).fetch_all(db).await?;
    rows.iter().map(from_row).collect()
}

pub async fn delete_by_id(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM car_licences WHERE id = ?1").bind(id).execute(db).await?;
    Ok(res.rows_affected() > 0)
}
