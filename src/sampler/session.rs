use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{error, info};

use super::SampleSource;
use crate::publish::BatchPublisher;
use crate::signal::SignalProcessor;
use crate::storage::CumulativeStore;
use crate::types::{Reading, SensorEvent, SessionCommand};
use crate::utils;

/// 一次采样会话:信号处理、批量发布与持久化的属主。
/// 没有全局状态,整个生命周期由工作线程独占持有。
pub struct GaugeSession {
    session_id: String,
    processor: SignalProcessor,
    batcher: BatchPublisher,
    store: CumulativeStore,
}

impl GaugeSession {
    /// 开启会话,持久化的累计值在此处一次性读入
    pub fn start(batcher: BatchPublisher, store: CumulativeStore) -> Self {
        let mut processor = SignalProcessor::new();
        let persisted = store.load();
        processor.set_cumulative(persisted);

        let session_id = utils::generate_session_id();
        info!(
            "Session {} started, cumulative resumes at {:.2}",
            session_id, persisted
        );

        Self {
            session_id,
            processor,
            batcher,
            store,
        }
    }

    /// 处理一条原始事件并推进发布队列;返回供显示的读数
    pub fn handle_event(&mut self, event: &SensorEvent, now_ms: i64) -> Option<Reading> {
        let reading = self.processor.process_event(event)?;
        self.batcher.offer(&reading, now_ms);
        Some(reading)
    }

    /// 清零累计指标并立即持久化,之后以新会话身份继续采样
    pub fn reset(&mut self) {
        self.processor = SignalProcessor::new();
        if let Err(e) = self.store.save(0.0) {
            error!("Failed to persist cumulative reset: {}", e);
        }
        let previous = std::mem::replace(&mut self.session_id, utils::generate_session_id());
        info!("Cumulative reset, session {} -> {}", previous, self.session_id);
    }

    /// 会话结束:强制发布剩余批次,并写回累计值
    pub fn finish(&mut self, now_ms: i64) {
        self.batcher.finish(now_ms);
        if let Err(e) = self.store.save(self.processor.cumulative()) {
            error!("Failed to persist cumulative value: {}", e);
        }
        info!(
            "Session {} finished after {} samples, cumulative {:.2}",
            self.session_id,
            self.processor.samples_processed(),
            self.processor.cumulative()
        );
    }

    pub fn cumulative(&self) -> f64 {
        self.processor.cumulative()
    }
}

/// 采样线程入口:驱动采样源,把事件推进有界通道
pub fn run_source(
    mut source: Box<dyn SampleSource>,
    event_sender: Sender<SensorEvent>,
    shutdown_signal: Arc<AtomicBool>,
) {
    info!("Sampling started: {}", source.describe());
    while !shutdown_signal.load(Ordering::Relaxed) {
        match source.next_event() {
            Some(event) => {
                if event_sender.send(event).is_err() {
                    info!("Event channel disconnected, sampler exiting");
                    break;
                }
            }
            None => {
                info!("Sample source exhausted, sampler exiting");
                break;
            }
        }
    }
}

/// 会话工作线程入口:串行消费事件,分发显示更新,响应 UI 命令。
/// 无论因关闭信号还是事件通道关闭退出,都会执行会话收尾。
pub fn run_session(
    event_receiver: Receiver<SensorEvent>,
    display_sender: Sender<Reading>,
    command_receiver: Receiver<SessionCommand>,
    batcher: BatchPublisher,
    store: CumulativeStore,
    shutdown_signal: Arc<AtomicBool>,
) {
    let mut session = GaugeSession::start(batcher, store);

    while !shutdown_signal.load(Ordering::Relaxed) {
        while let Ok(command) = command_receiver.try_recv() {
            match command {
                SessionCommand::ResetCumulative => session.reset(),
            }
        }

        match event_receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let now_ms = Utc::now().timestamp_millis();
                if let Some(reading) = session.handle_event(&event, now_ms) {
                    // debug!("Reading - inst: {:.3}, cum: {:.3}", reading.instantaneous, reading.cumulative);
                    // UI 落后或已退出时丢弃本次显示更新
                    let _ = display_sender.try_send(reading);
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                info!("Event channel closed, ending session");
                break;
            }
        }
    }

    session.finish(Utc::now().timestamp_millis());
}
