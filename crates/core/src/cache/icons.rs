//! Icon row CRUD operations.
//!
//! The store is a dumb durable map from domain to the outcome of the last
//! fetch attempt. Expiry filtering is deliberately not done here; the
//! coordinator owns that policy.

use super::connection::CacheDb;
use super::policy::{ExpiryPolicy, now_ms};
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Outcome of the last fetch attempt for a domain.
///
/// `Absent` means a full candidate sequence was tried and conclusively
/// failed. A domain with no row at all has simply never been attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredIcon {
    /// Self-contained inline image (`data:` URL), renderable offline.
    Image(String),
    /// Confirmed absent; do not refetch until the failure window lapses.
    Absent,
}

impl StoredIcon {
    pub fn is_absent(&self) -> bool {
        matches!(self, StoredIcon::Absent)
    }
}

/// A cached icon entry as stored, one row per domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconRecord {
    pub domain: String,
    pub icon: StoredIcon,
    /// Milliseconds since the Unix epoch at write time.
    pub fetched_at: i64,
}

impl IconRecord {
    /// Whether this entry records a failed acquisition, selecting the
    /// short retention window.
    pub fn is_failed(&self) -> bool {
        self.icon.is_absent()
    }
}

impl CacheDb {
    /// Get the entry for a domain, expired or not.
    ///
    /// Returns None if the domain has never been attempted.
    pub async fn get_icon(&self, domain: &str) -> Result<Option<IconRecord>, Error> {
        let domain = domain.to_string();
        self.conn
            .call(move |conn| -> Result<Option<IconRecord>, Error> {
                let mut stmt = conn.prepare("SELECT domain, data, failed, fetched_at FROM icons WHERE domain = ?1")?;

                let result = stmt.query_row(params![domain], |row| {
                    let domain: String = row.get(0)?;
                    let data: Option<String> = row.get(1)?;
                    let failed: bool = row.get::<_, i32>(2)? == 1;
                    let fetched_at: i64 = row.get(3)?;

                    // failed rows carry no payload; a success row missing
                    // its payload is unreadable and treated as absent.
                    let icon = match data {
                        Some(d) if !failed => StoredIcon::Image(d),
                        _ => StoredIcon::Absent,
                    };

                    Ok(IconRecord { domain, icon, fetched_at })
                });

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace the entry for a domain with a fresh timestamp.
    ///
    /// Last write wins; the domain column is the primary key, so at most
    /// one entry exists per domain.
    pub async fn put_icon(&self, domain: &str, icon: StoredIcon) -> Result<(), Error> {
        let domain = domain.to_string();
        let fetched_at = now_ms();
        let (data, failed) = match icon {
            StoredIcon::Image(d) => (Some(d), 0i32),
            StoredIcon::Absent => (None, 1i32),
        };
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO icons (domain, data, failed, fetched_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(domain) DO UPDATE SET
                        data = excluded.data,
                        failed = excluded.failed,
                        fetched_at = excluded.fetched_at",
                    params![domain, data, failed, fetched_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries that have outlived their retention window.
    ///
    /// Success and failure rows use their own windows from `policy`.
    /// Returns the number of deleted entries; nothing is written when no
    /// row qualifies.
    pub async fn sweep_expired(&self, policy: &ExpiryPolicy) -> Result<u64, Error> {
        let now = now_ms();
        let success_max = policy.success_max_age.as_millis() as i64;
        let failure_max = policy.failure_max_age.as_millis() as i64;
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM icons
                     WHERE (failed = 0 AND ?1 - fetched_at >= ?2)
                        OR (failed = 1 AND ?1 - fetched_at >= ?3)",
                    params![now, success_max, failure_max],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete all entries unconditionally.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_icons(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM icons", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries currently stored.
    pub async fn count_icons(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM icons", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    async fn insert_backdated(db: &CacheDb, domain: &str, icon: StoredIcon, fetched_at: i64) {
        let domain = domain.to_string();
        let (data, failed) = match icon {
            StoredIcon::Image(d) => (Some(d), 0i32),
            StoredIcon::Absent => (None, 1i32),
        };
        db.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO icons (domain, data, failed, fetched_at) VALUES (?1, ?2, ?3, ?4)",
                    params![domain, data, failed, fetched_at],
                )
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_and_get_image() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_icon("example.com", StoredIcon::Image("data:image/png;base64,AA==".into()))
            .await
            .unwrap();

        let rec = db.get_icon("example.com").await.unwrap().unwrap();
        assert_eq!(rec.domain, "example.com");
        assert_eq!(rec.icon, StoredIcon::Image("data:image/png;base64,AA==".into()));
        assert!(!rec.is_failed());
        assert!(rec.fetched_at > 0);
    }

    #[tokio::test]
    async fn test_put_and_get_absent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_icon("example.com", StoredIcon::Absent).await.unwrap();

        let rec = db.get_icon("example.com").await.unwrap().unwrap();
        assert_eq!(rec.icon, StoredIcon::Absent);
        assert!(rec.is_failed());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get_icon("never-seen.example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_icon("example.com", StoredIcon::Image("data:image/png;base64,AA==".into()))
            .await
            .unwrap();
        db.put_icon("example.com", StoredIcon::Absent).await.unwrap();

        assert_eq!(db.count_icons().await.unwrap(), 1);
        let rec = db.get_icon("example.com").await.unwrap().unwrap();
        assert_eq!(rec.icon, StoredIcon::Absent);
    }

    #[tokio::test]
    async fn test_get_does_not_filter_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let long_ago = now_ms() - 30 * DAY_MS;
        insert_backdated(&db, "stale.example", StoredIcon::Image("data:image/png;base64,AA==".into()), long_ago).await;

        // The store is a dumb map; even a month-old row comes back.
        let rec = db.get_icon("stale.example").await.unwrap().unwrap();
        assert_eq!(rec.fetched_at, long_ago);
    }

    #[tokio::test]
    async fn test_sweep_expired_per_class() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = now_ms();
        let img = || StoredIcon::Image("data:image/png;base64,AA==".into());

        insert_backdated(&db, "fresh-ok.example", img(), now - DAY_MS).await;
        insert_backdated(&db, "old-ok.example", img(), now - 8 * DAY_MS).await;
        insert_backdated(&db, "fresh-fail.example", StoredIcon::Absent, now - DAY_MS / 2).await;
        insert_backdated(&db, "old-fail.example", StoredIcon::Absent, now - 2 * DAY_MS).await;

        let removed = db.sweep_expired(&ExpiryPolicy::default()).await.unwrap();
        assert_eq!(removed, 2);

        assert!(db.get_icon("fresh-ok.example").await.unwrap().is_some());
        assert!(db.get_icon("fresh-fail.example").await.unwrap().is_some());
        assert!(db.get_icon("old-ok.example").await.unwrap().is_none());
        assert!(db.get_icon("old-fail.example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_nothing_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_icon("example.com", StoredIcon::Absent).await.unwrap();

        let removed = db.sweep_expired(&ExpiryPolicy::default()).await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(db.count_icons().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_icons() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_icon("a.example", StoredIcon::Absent).await.unwrap();
        db.put_icon("b.example", StoredIcon::Image("data:image/png;base64,AA==".into()))
            .await
            .unwrap();

        let removed = db.clear_icons().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(db.count_icons().await.unwrap(), 0);
    }
}
