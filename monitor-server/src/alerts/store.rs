use common::AlertEvent;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// 默认报警容量
pub const DEFAULT_CAPACITY: usize = 100;

/// 固定容量的报警存储
///
/// 环形缓冲：容量满时追加会淘汰最旧的一条。写入互斥，
/// 读取并发，所有读取返回快照拷贝。
#[derive(Clone)]
pub struct AlertStore {
    events: Arc<RwLock<VecDeque<AlertEvent>>>,
    capacity: usize,
}

impl AlertStore {
    /// 创建存储，容量至少为1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// 追加报警，容量满时先淘汰最旧的一条；总是成功
    pub async fn add(&self, event: AlertEvent) {
        let mut events = self.events.write().await;
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
        debug!("Alert stored ({}/{})", events.len(), self.capacity);
    }

    /// 最近的count条报警，最新在前；count超出现存数量时整体返回
    pub async fn recent(&self, count: usize) -> Vec<AlertEvent> {
        let events = self.events.read().await;
        events.iter().rev().take(count).cloned().collect()
    }

    /// 全部缓存的报警（可选上限），最新在前
    pub async fn all(&self, limit: Option<usize>) -> Vec<AlertEvent> {
        let events = self.events.read().await;
        let limit = limit.unwrap_or(events.len());
        events.iter().rev().take(limit).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
