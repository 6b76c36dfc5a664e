use crate::alerts::AlertStore;
use crate::detector::Detector;
use crate::stream::StreamSource;
use crate::worker::{StreamWorker, WorkerHandle, WorkerSettings};
use common::{CameraConfig, WorkerState};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 工作器监督者
///
/// 按摄像头配置启动工作器并登记句柄；停止时向所有工作器
/// 广播取消信号，不等待任务结束。
#[derive(Clone)]
pub struct WorkerSupervisor {
    workers: Arc<DashMap<String, WorkerHandle>>,
    shutdown: CancellationToken,
    total_initialized: Arc<AtomicUsize>,
}

impl WorkerSupervisor {
    pub fn new() -> Self {
        Self {
            workers: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
            total_initialized: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 为每个有流地址的摄像头启动一个工作器，返回启动数量。
    /// 没有地址的摄像头在此记录一次并跳过。
    pub fn start_workers(
        &self,
        cameras: &[CameraConfig],
        source: Arc<dyn StreamSource>,
        detector: Arc<dyn Detector>,
        alerts: AlertStore,
        settings: WorkerSettings,
    ) -> usize {
        let mut started = 0;
        for camera in cameras {
            let url = match camera.stream_url() {
                Some(url) => url.to_string(),
                None => {
                    warn!("⚠️ Camera '{}' has no stream url, skipping", camera.name);
                    continue;
                }
            };
            if self.workers.contains_key(&camera.id) {
                warn!("⚠️ Duplicate camera id '{}', skipping", camera.id);
                continue;
            }

            let handle = StreamWorker::spawn(
                Arc::new(camera.clone()),
                url,
                source.clone(),
                detector.clone(),
                alerts.clone(),
                settings.clone(),
                self.shutdown.child_token(),
            );
            debug!("Worker registered for camera '{}'", handle.camera_id());
            self.workers.insert(camera.id.clone(), handle);
            self.total_initialized.fetch_add(1, Ordering::Relaxed);
            started += 1;
        }
        info!("✓ {} camera worker(s) started", started);
        started
    }

    /// 尚未结束（状态非Stopped）的工作器数量
    pub fn live_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|entry| entry.value().state().is_live())
            .count()
    }

    /// 启动过的工作器总数
    pub fn total_initialized(&self) -> usize {
        self.total_initialized.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub fn worker_state(&self, camera_id: &str) -> Option<WorkerState> {
        self.workers.get(camera_id).map(|entry| entry.value().state())
    }

    /// 广播停止信号；不join工作器任务
    pub fn shutdown(&self) {
        info!("⏹️ Stopping all camera workers (fire-and-forget)");
        self.shutdown.cancel();
    }
}

impl Default for WorkerSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
