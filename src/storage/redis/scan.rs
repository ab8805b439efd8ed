//! Cursor based key scans

use super::pool::RedisPool;
use crate::utils::error::Result;
use tracing::debug;

/// Keys requested per SCAN round trip
const SCAN_COUNT: u32 = 200;

impl RedisPool {
    /// Collect every key matching `pattern` with SCAN, never KEYS
    pub async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        if self.noop_mode {
            return Ok(Vec::new());
        }

        let mut conn = self.get_connection();
        let mut keys = Vec::new();
        if let Some(ref mut c) = conn.conn {
            let mut cursor: u64 = 0;
            loop {
                let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(SCAN_COUNT)
                    .query_async(c)
                    .await?;
                keys.extend(batch);
                if next == 0 {
                    break;
                }
                cursor = next;
            }
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();
        debug!("Redis scan '{}' matched {} keys", pattern, keys.len());
        Ok(keys)
    }
}
