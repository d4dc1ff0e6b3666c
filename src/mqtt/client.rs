use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Connection, Event, LastWill, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::publish::Publisher;
use crate::types::BatchEntry;

/// MQTT 批量发布端。broker 地址来自配置,凭据从环境变量读取,
/// 缺省时匿名连接。
#[derive(Clone)]
pub struct MqttPublisher {
    client: Client,
    topic: String,
    qos: QoS,
}

impl MqttPublisher {
    /// 建立客户端并返回待轮询的连接,连接本身由事件循环线程驱动
    pub fn connect(config: &MqttConfig) -> (Self, Connection) {
        dotenv().ok(); // 加载 .env 文件

        let mut mqtt_options = MqttOptions::new(
            config.client_id.clone(),
            config.broker.clone(),
            config.port,
        );

        match (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
            (Ok(user), Ok(pass)) => {
                mqtt_options.set_credentials(user, pass);
            }
            _ => warn!("MQTT_USER/MQTT_PASS not set, connecting anonymously"),
        }

        mqtt_options
            .set_keep_alive(Duration::from_secs(config.keep_alive as u64))
            .set_last_will(LastWill::new(
                format!("{}/status", config.topic),
                "offline",
                QoS::AtLeastOnce,
                false,
            ));

        let (client, connection) = Client::new(mqtt_options, 10);
        info!(
            "MQTT publisher ready for {}:{} topic '{}'",
            config.broker, config.port, config.topic
        );

        let publisher = Self {
            client,
            topic: config.topic.clone(),
            qos: map_qos(config.qos),
        };
        (publisher, connection)
    }

    /// 主动断开,唤醒并结束事件循环线程
    pub fn disconnect(&self) {
        if let Err(e) = self.client.disconnect() {
            warn!("MQTT disconnect request failed: {}", e);
        }
    }
}

impl Publisher for MqttPublisher {
    fn publish(&self, batch: &[BatchEntry]) {
        let payload = match serde_json::to_vec(batch) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Batch serialization failed: {}", e);
                return;
            }
        };

        if let Err(e) = self.client.publish(self.topic.clone(), self.qos, false, payload) {
            error!("MQTT publish of {} entries failed: {}", batch.len(), e);
        }
    }
}

fn map_qos(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        other => {
            warn!("Unknown QoS level {}, using at-least-once", other);
            QoS::AtLeastOnce
        }
    }
}

/// 驱动 MQTT 连接直到收到关闭信号。连接错误只记日志,重连交给 rumqttc。
pub fn run_event_loop(mut connection: Connection, shutdown_signal: Arc<AtomicBool>) {
    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT thread received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker");
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                // 退避一秒,避免断连时空转刷日志
                thread::sleep(Duration::from_secs(1));
            }
        }
    }
}
