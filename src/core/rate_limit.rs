//! 内存滑动窗口限流

use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::config::RateLimitConfig;

/// 按客户端标识记录窗口内的请求时间，进程重启即清空
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window)
    }

    /// 记录一次请求；超出限额时返回 `false` 且不记录
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut hits = self.hits.lock();
        // 客户端标识来自请求头，窗口过期的键必须清掉，否则表会无限增长
        hits.retain(|_, times| {
            times.retain(|t| now.saturating_duration_since(*t) < self.window);
            !times.is_empty()
        });

        if self.max_requests == 0 {
            return false;
        }
        let recent = hits.entry(client.to_string()).or_default();
        if recent.len() >= self.max_requests {
            return false;
        }
        recent.push(now);
        true
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.lock().len()
    }
}
