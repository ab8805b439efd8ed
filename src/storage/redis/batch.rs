//! Batch Redis operations

use super::pool::RedisPool;
use crate::utils::error::Result;
use redis::AsyncCommands;

impl RedisPool {
    /// Get multiple keys at once
    pub async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if self.noop_mode || keys.is_empty() {
            return Ok(vec![None; keys.len()]);
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            // A single-key MGET still replies with an array
            let values: Vec<Option<String>> = redis::cmd("MGET").arg(keys).query_async(c).await?;
            Ok(values)
        } else {
            Ok(vec![None; keys.len()])
        }
    }

    /// Delete multiple keys, returning how many existed
    pub async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        if self.noop_mode || keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let removed: u64 = c.del(keys).await?;
            Ok(removed)
        } else {
            Ok(0)
        }
    }
}
