mod app;
mod config;
mod gauge;
mod logger;
mod mqtt;
mod publish;
mod sampler;
mod signal;
mod storage;
mod types;
mod utils;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use crossbeam_channel::bounded;
use eframe::egui;
use log::{error, info, warn};

use app::MovementGaugeApp;
use config::ConfigManager;
use mqtt::MqttPublisher;
use publish::{BatchPublisher, UniformThreshold};
use sampler::{build_source, run_session, run_source};
use storage::CumulativeStore;

fn main() {
    logger::init_logger();
    info!("Application starting");

    // 配置:工作目录下有 config.toml 就加载,否则使用默认值
    let config_manager = if std::path::Path::new("config.toml").exists() {
        match ConfigManager::load_from_file("config.toml") {
            Ok(manager) => {
                info!("Loaded configuration from config.toml");
                manager
            }
            Err(e) => {
                warn!("config.toml invalid ({}), using defaults", e);
                ConfigManager::new()
            }
        }
    } else {
        ConfigManager::new()
    };
    let config = config_manager.get_config().clone();

    let (event_sender, event_receiver) = bounded(config.channels.event_channel_capacity);
    let (display_sender, display_receiver) = bounded(config.channels.display_channel_capacity);
    let (command_sender, command_receiver) = bounded(config.channels.command_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    // MQTT 客户端与事件循环线程
    let (mqtt_publisher, connection) = MqttPublisher::connect(&config.mqtt);
    let mqtt_shutdown = Arc::clone(&shutdown_signal);
    let mqtt_handle = thread::spawn(move || {
        mqtt::run_event_loop(connection, mqtt_shutdown);
    });

    // 采样源构建失败属于启动错误:UI 照常运行,采样不会开始
    let mut source_label = None;
    let mut worker_handles = Vec::new();
    match build_source(&config.sampler) {
        Ok(source) => {
            source_label = Some(source.describe());

            let batcher = BatchPublisher::new(
                Box::new(mqtt_publisher.clone()),
                Box::new(UniformThreshold),
                &config.publisher,
                Utc::now().timestamp_millis(),
            );
            let store =
                CumulativeStore::new(config.get_state_path(), config.storage.auto_create_dir);

            let session_shutdown = Arc::clone(&shutdown_signal);
            worker_handles.push(thread::spawn(move || {
                run_session(
                    event_receiver,
                    display_sender,
                    command_receiver,
                    batcher,
                    store,
                    session_shutdown,
                );
            }));

            let sampler_shutdown = Arc::clone(&shutdown_signal);
            worker_handles.push(thread::spawn(move || {
                run_source(source, event_sender, sampler_shutdown);
            }));
        }
        Err(e) => {
            error!("Sample source unavailable: {}", e);
            // 丢弃通道端点,UI 端据此显示传感器不可用并拒绝重置命令
            drop(event_sender);
            drop(event_receiver);
            drop(display_sender);
            drop(command_receiver);
        }
    }

    let options = eframe::NativeOptions {
        vsync: config.window.vsync,
        hardware_acceleration: if config.window.hardware_acceleration {
            eframe::HardwareAcceleration::Preferred // 硬件加速优先模式
        } else {
            eframe::HardwareAcceleration::Off
        },
        renderer: eframe::Renderer::Glow, // 使用Glow渲染器获得更好性能
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_resizable(config.window.resizable),
        ..Default::default()
    };

    let window_title = config.window.title.clone();
    if let Err(e) = eframe::run_native(
        &window_title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(MovementGaugeApp::new(
                cc,
                display_receiver,
                command_sender,
                config_manager,
                source_label,
            )))
        }),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    // GUI 关闭:先放倒采样与会话线程 (会话收尾发布最后一批并写回累计值),
    // 之后断开 MQTT 唤醒事件循环线程
    info!("GUI closed, signaling workers to shutdown");
    shutdown_signal.store(true, Ordering::Relaxed);

    for handle in worker_handles {
        if handle.join().is_err() {
            error!("Worker thread panicked during shutdown");
        }
    }

    mqtt_publisher.disconnect();
    match mqtt_handle.join() {
        Ok(()) => info!("MQTT thread shut down gracefully"),
        Err(_) => error!("MQTT thread panicked during shutdown"),
    }

    info!("Application stopped");
}
