//! [`SqliteOverlayStore`], the SQLite implementation of [`OverlayStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use ramp_core::{
  overlay::{Filed, OverlayStore},
  point::{AccessibilityPoint, LocationKey, PointId},
};

use crate::{
  Result,
  encode::{RawFiled, decode_location, encode_dt, encode_point},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A location overlay backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteOverlayStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteOverlayStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn select_rows(
    &self,
    location: Option<String>,
  ) -> Result<Vec<RawFiled>> {
    let rows = self
      .conn
      .call(move |conn| {
        let rows = if let Some(loc) = location {
          let mut stmt = conn.prepare(
            "SELECT point_id, location_key, point_json FROM overlay_points
             WHERE location_key = ?1
             ORDER BY seq",
          )?;
          stmt
            .query_map(rusqlite::params![loc], raw_filed)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT point_id, location_key, point_json FROM overlay_points
             ORDER BY seq",
          )?;
          stmt
            .query_map([], raw_filed)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

fn raw_filed(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFiled> {
  Ok(RawFiled {
    point_id:     row.get(0)?,
    location_key: row.get(1)?,
    point_json:   row.get(2)?,
  })
}

// ─── OverlayStore impl ───────────────────────────────────────────────────────

impl OverlayStore for SqliteOverlayStore {
  type Error = crate::Error;

  async fn get_by_location(&self, location: LocationKey) -> Result<Vec<AccessibilityPoint>> {
    let raws = self.select_rows(Some(location.as_str().to_owned())).await?;
    debug!(%location, count = raws.len(), "overlay partition read");
    raws.into_iter().map(RawFiled::into_point).collect()
  }

  async fn find_by_id(&self, id: PointId) -> Result<Option<Filed>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawFiled> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT point_id, location_key, point_json FROM overlay_points
               WHERE point_id = ?1",
              rusqlite::params![id_str],
              raw_filed,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFiled::into_filed).transpose()
  }

  async fn upsert(&self, location: LocationKey, point: AccessibilityPoint) -> Result<LocationKey> {
    let id_str       = point.id.as_str().to_owned();
    let location_str = location.as_str().to_owned();
    let json         = encode_point(&point)?;
    let now          = encode_dt(Utc::now());

    // A conflicting point_id keeps its row and therefore its partition; only
    // the body and timestamp change.
    let stored_in: String = self
      .conn
      .call(move |conn| {
        let stored_in = conn.query_row(
          "INSERT INTO overlay_points
             (point_id, location_key, point_json, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT(point_id) DO UPDATE SET
             point_json = excluded.point_json,
             updated_at = excluded.updated_at
           RETURNING location_key",
          rusqlite::params![id_str, location_str, json, now],
          |row| row.get(0),
        )?;
        Ok(stored_in)
      })
      .await?;

    debug!(id = %point.id, requested = %location, stored_in = %stored_in, "overlay upsert");
    decode_location(stored_in)
  }

  async fn list_all(&self) -> Result<Vec<Filed>> {
    let raws = self.select_rows(None).await?;
    raws.into_iter().map(RawFiled::into_filed).collect()
  }
}
