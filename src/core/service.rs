//! 核心服务层模块

use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// 模拟数据的 id 生成器，作为协作者注入各版本的 `UserService`
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// 随机 id，范围 `[0, 1000)`
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> i64 {
        rand::thread_rng().gen_range(0..1000)
    }
}

/// 递增 id，测试中用来得到确定的结果
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
