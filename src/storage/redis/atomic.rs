//! Redis counter pipelines and server info

use super::pool::RedisPool;
use crate::utils::error::Result;
use redis::AsyncCommands;

impl RedisPool {
    /// Increment key value by delta
    pub async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        if self.noop_mode {
            return Ok(delta);
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let new_value: i64 = c.incr(key, delta).await?;
            Ok(new_value)
        } else {
            Ok(delta)
        }
    }

    /// INCRBY and EXPIREAT in one atomic pipeline
    pub async fn increment_until(&self, key: &str, delta: i64, expire_at: u64) -> Result<i64> {
        if self.noop_mode {
            return Ok(delta);
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let mut pipe = redis::pipe();
            pipe.atomic()
                .cmd("INCRBY")
                .arg(key)
                .arg(delta)
                .cmd("EXPIREAT")
                .arg(key)
                .arg(expire_at)
                .ignore();

            let (new_value,): (i64,) = pipe.query_async(c).await?;
            Ok(new_value)
        } else {
            Ok(delta)
        }
    }

    /// SET 0 and EXPIREAT in one atomic pipeline
    pub async fn reset_until(&self, key: &str, expire_at: u64) -> Result<()> {
        if self.noop_mode {
            return Ok(());
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let mut pipe = redis::pipe();
            pipe.atomic()
                .cmd("SET")
                .arg(key)
                .arg(0)
                .ignore()
                .cmd("EXPIREAT")
                .arg(key)
                .arg(expire_at)
                .ignore();

            let _: () = pipe.query_async(c).await?;
        }
        Ok(())
    }

    /// Get Redis info
    pub async fn info(&self) -> Result<String> {
        if self.noop_mode {
            return Ok(String::new());
        }

        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let info: String = redis::cmd("INFO").query_async(c).await?;
            Ok(info)
        } else {
            Ok(String::new())
        }
    }
}
