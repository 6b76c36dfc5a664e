use crate::alerts::AlertStore;
use crate::detector::Detector;
use crate::stream::{FrameStream, StreamSource};
use common::{AlertEvent, CameraConfig, Frame, WorkerState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 工作器的重试与节流参数
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// 两次检测之间的最小间隔
    pub processing_interval: Duration,
    /// 打开失败后的短退避
    pub short_retry: Duration,
    /// 短退避重试仍失败后的长退避
    pub long_retry: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            processing_interval: Duration::from_secs(1),
            short_retry: Duration::from_secs(10),
            long_retry: Duration::from_secs(30),
        }
    }
}

/// 工作器的外部句柄：观察状态、发出停止信号
pub struct WorkerHandle {
    camera_id: String,
    state: watch::Receiver<WorkerState>,
    cancel: CancellationToken,
}

impl WorkerHandle {
    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    #[allow(dead_code)]
    pub fn state_receiver(&self) -> watch::Receiver<WorkerState> {
        self.state.clone()
    }

    /// 请求停止；工作器在循环边界处自行退出，不被强行中断
    #[allow(dead_code)]
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// 单摄像头工作器
///
/// 生命周期：Disconnected → Connecting →（两级退避）→ Streaming，
/// 读取失败释放连接句柄回到Disconnected；停止信号在循环边界生效，
/// 经由Stopping到Stopped。
pub struct StreamWorker {
    camera: Arc<CameraConfig>,
    url: String,
    source: Arc<dyn StreamSource>,
    detector: Arc<dyn Detector>,
    alerts: AlertStore,
    settings: WorkerSettings,
    state: watch::Sender<WorkerState>,
    cancel: CancellationToken,
    last_detection: Option<Instant>,
}

impl StreamWorker {
    /// 启动工作器任务并返回句柄
    pub fn spawn(
        camera: Arc<CameraConfig>,
        url: String,
        source: Arc<dyn StreamSource>,
        detector: Arc<dyn Detector>,
        alerts: AlertStore,
        settings: WorkerSettings,
        cancel: CancellationToken,
    ) -> WorkerHandle {
        let (state_tx, state_rx) = watch::channel(WorkerState::Disconnected);
        let handle = WorkerHandle {
            camera_id: camera.id.clone(),
            state: state_rx,
            cancel: cancel.clone(),
        };
        let worker = StreamWorker {
            camera,
            url,
            source,
            detector,
            alerts,
            settings,
            state: state_tx,
            cancel,
            last_detection: None,
        };
        tokio::spawn(worker.run());
        handle
    }

    async fn run(mut self) {
        info!(
            "📷 Worker started for camera '{}' ({})",
            self.camera.name, self.camera.id
        );

        while !self.cancel.is_cancelled() {
            self.set_state(WorkerState::Connecting);
            let stream = match self.connect().await {
                Some(stream) => stream,
                // 等待期间收到停止信号
                None => break,
            };

            self.set_state(WorkerState::Streaming);
            self.stream_frames(stream).await;

            if !self.cancel.is_cancelled() {
                // 连接句柄已随流释放，回到Disconnected重连
                self.set_state(WorkerState::Disconnected);
            }
        }

        self.set_state(WorkerState::Stopping);
        self.set_state(WorkerState::Stopped);
        info!("⏹️ Worker stopped for camera '{}'", self.camera.id);
    }

    /// 两级退避的连接循环：失败→短退避→重试一次→仍失败→长退避→重来。
    /// 收到停止信号返回None。
    async fn connect(&self) -> Option<Box<dyn FrameStream>> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }

            if let Some(stream) = self.try_open().await {
                return Some(stream);
            }
            if !self.wait(self.settings.short_retry).await {
                return None;
            }

            // 短退避后立即重试一次
            if let Some(stream) = self.try_open().await {
                return Some(stream);
            }
            if !self.wait(self.settings.long_retry).await {
                return None;
            }
        }
    }

    async fn try_open(&self) -> Option<Box<dyn FrameStream>> {
        match self.source.open(&self.url).await {
            Ok(stream) => {
                let session_id = Uuid::new_v4();
                info!(
                    "✓ Camera '{}' connected (session {})",
                    self.camera.name, session_id
                );
                Some(stream)
            }
            Err(e) => {
                warn!("Camera '{}' connect failed: {}", self.camera.name, e);
                None
            }
        }
    }

    /// 可取消的退避等待；等满返回true，被取消返回false
    async fn wait(&self, delay: Duration) -> bool {
        debug!(
            "Camera '{}' backing off for {:?}",
            self.camera.id, delay
        );
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    /// 帧读取循环；返回时流已丢弃、连接已释放
    async fn stream_frames(&mut self, mut stream: Box<dyn FrameStream>) {
        loop {
            let frame = tokio::select! {
                _ = self.cancel.cancelled() => return,
                frame = stream.next_frame() => frame,
            };

            match frame {
                Ok(frame) => self.process_frame(&frame).await,
                Err(e) => {
                    warn!("Camera '{}' stream lost: {}", self.camera.name, e);
                    return;
                }
            }
        }
    }

    /// 节流后的检测：距上次调用不足processing_interval的帧直接丢弃。
    /// 上次调用时刻在每次调用检测器时更新，包括检测器出错的调用。
    async fn process_frame(&mut self, frame: &Frame) {
        let now = Instant::now();
        if let Some(last) = self.last_detection {
            if now.duration_since(last) < self.settings.processing_interval {
                return;
            }
        }
        self.last_detection = Some(now);

        match self.detector.analyze(frame, &self.camera.id).await {
            Ok(detection) if detection.detected => {
                let details = alert_text(&self.camera.name, detection.details.len());
                debug!("🚨 {}", details);
                self.alerts
                    .add(AlertEvent::new(&self.camera.id, &self.camera.name, details))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                // 检测失败按未检出处理，工作器保持流式状态
                warn!("Camera '{}' detector error: {}", self.camera.id, e);
            }
        }
    }

    fn set_state(&self, state: WorkerState) {
        debug!("Camera '{}' -> {:?}", self.camera.id, state);
        let _ = self.state.send(state);
    }
}

/// 报警详情文本
fn alert_text(camera_name: &str, detail_count: usize) -> String {
    if detail_count > 0 {
        format!(
            "Actividad detectada en {} ({} región(es))",
            camera_name, detail_count
        )
    } else {
        format!("Actividad detectada en {}", camera_name)
    }
}
