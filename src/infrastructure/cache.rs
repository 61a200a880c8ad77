//! 内存缓存基础设施
//!
//! 基于 moka。每个条目带有滑动过期与绝对过期两个期限：超过 `sliding` 未被访问，
//! 或写入后超过 `absolute`，条目即失效。期限随条目保存，`set` 时给出。

use moka::Expiry;
use std::time::{Duration, Instant};

/// 缓存条目上限
const MEMORY_CACHE_MAX_CAPACITY: u64 = 1_000;

/// 过期策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub sliding: Duration,
    pub absolute: Duration,
}

impl ExpiryPolicy {
    pub fn new(sliding: Duration, absolute: Duration) -> Self {
        Self { sliding, absolute }
    }

    /// 距离失效的剩余时间：空闲期与绝对期中较早者
    fn remaining(&self, idle_from: Instant, written_at: Instant, now: Instant) -> Duration {
        let idle_left = self
            .sliding
            .saturating_sub(now.saturating_duration_since(idle_from));
        let absolute_left = self
            .absolute
            .saturating_sub(now.saturating_duration_since(written_at));
        idle_left.min(absolute_left)
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5 * 60), Duration::from_secs(60 * 60))
    }
}

/// 缓存抽象
pub trait Cache<V>: Send + Sync {
    /// 命中时刷新滑动期限并返回值的拷贝
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V, policy: ExpiryPolicy);
    fn invalidate(&self, key: &str);
}

#[derive(Clone)]
struct Entry<V> {
    value: V,
    policy: ExpiryPolicy,
}

/// 按条目自带的策略计算过期时间
struct PolicyExpiry;

impl<V> Expiry<String, Entry<V>> for PolicyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.policy.remaining(created_at, created_at, created_at))
    }

    fn expire_after_read(
        &self,
        _key: &String,
        entry: &Entry<V>,
        read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(entry.policy.remaining(read_at, last_modified_at, read_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // 覆盖写入重新计时
        Some(entry.policy.remaining(updated_at, updated_at, updated_at))
    }
}

/// 基于 `moka::sync::Cache` 的进程内缓存
pub struct MemoryCache<V> {
    entries: moka::sync::Cache<String, Entry<V>>,
}

impl<V: Clone + Send + Sync + 'static> MemoryCache<V> {
    pub fn new() -> Self {
        let entries = moka::sync::Cache::builder()
            .max_capacity(MEMORY_CACHE_MAX_CAPACITY)
            .expire_after(PolicyExpiry)
            .build();

        Self { entries }
    }

    /// 当前有效条目数
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: V, policy: ExpiryPolicy) {
        self.entries.insert(key.to_string(), Entry { value, policy });
    }

    fn invalidate(&self, key: &str) {
        self.entries.invalidate(key);
    }
}
