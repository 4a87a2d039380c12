//! 进程资源采样

use parking_lot::Mutex;
use serde::Serialize;
use std::{sync::Arc, time::Instant};
use sysinfo::{Pid, System};

/// 进程内存快照，单位字节
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub heap_total: u64,
    pub heap_used: u64,
    pub rss: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SystemSnapshot {
    pub memory: MemoryUsage,
    /// 秒
    pub uptime: f64,
}

/// 当前进程的内存和运行时长
#[derive(Clone)]
pub struct SystemProbe {
    system: Arc<Mutex<System>>,
    pid: Option<Pid>,
    started_at: Instant,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            pid: sysinfo::get_current_pid().ok(),
            started_at: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        let fallback = SystemSnapshot {
            memory: MemoryUsage::default(),
            uptime: self.started_at.elapsed().as_secs_f64(),
        };
        let Some(pid) = self.pid else {
            return fallback;
        };

        let mut system = self.system.lock();
        if !system.refresh_process(pid) {
            return fallback;
        }

        system
            .process(pid)
            .map(|process| SystemSnapshot {
                memory: MemoryUsage {
                    heap_total: process.virtual_memory(),
                    heap_used: process.memory(),
                    rss: process.memory(),
                },
                // 进程启动至今，而非探针创建至今
                uptime: process.run_time() as f64,
            })
            .unwrap_or(fallback)
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}
