use crate::config::GaugeConfig;

/// 弹簧增益,加速度 = 增益 × 当前偏差
const SPRING_GAIN: f64 = 5.0;
/// 速度达到该值后停止加速
const MAX_VELOCITY: f64 = 90.0;
/// 指针视为到位的容差 (表盘值)
const SNAP_TOLERANCE: f64 = 0.01;

/// 帧调度能力:动画只在还有路要走时申请下一帧,空闲时零开销
pub trait FrameScheduler: Send {
    fn request_frame(&self);
}

/// 指针动画:离散时间弹簧运动,朝目标收敛,终点吸附。
/// 所有方法都在 UI 线程串行调用,无锁。
pub struct NeedleAnimator {
    position: f64,
    target: f64,
    velocity: f64,
    acceleration: f64,
    last_move_ms: Option<i64>,
    min_degrees: f64,
    max_degrees: f64,
    scheduler: Box<dyn FrameScheduler>,
}

impl NeedleAnimator {
    /// 初始指针停在量程下限,目标指向表盘中心 (开机扫摆)
    pub fn new(config: &GaugeConfig, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            position: config.min_degrees,
            target: config.center_degree,
            velocity: 0.0,
            acceleration: 0.0,
            last_move_ms: None,
            min_degrees: config.min_degrees,
            max_degrees: config.max_degrees,
            scheduler,
        }
    }

    /// 设定新目标 (越界值截断),保留现有动量,并立即申请一帧
    pub fn set_target(&mut self, value: f64) {
        self.target = value.clamp(self.min_degrees, self.max_degrees);
        self.scheduler.request_frame();
    }

    /// 推进一步运动并返回当前指针位置。
    /// 已在目标容差内时清除时间基线直接返回;时间基线缺失的首步
    /// 只记录基线,delta 为零,不产生位移。
    pub fn tick(&mut self, now_ms: i64) -> f64 {
        if !self.needs_to_move() {
            self.last_move_ms = None;
            return self.position;
        }

        let delta = match self.last_move_ms {
            Some(last) => (now_ms - last) as f64 / 1000.0,
            None => 0.0,
        };

        // 静止时方向为 0,首步不会误判吸附
        let direction = if self.velocity > 0.0 {
            1.0
        } else if self.velocity < 0.0 {
            -1.0
        } else {
            0.0
        };

        if self.velocity.abs() < MAX_VELOCITY {
            self.acceleration = SPRING_GAIN * (self.target - self.position);
        } else {
            self.acceleration = 0.0;
        }

        self.position += self.velocity * delta;
        self.position = self.position.clamp(self.min_degrees, self.max_degrees);
        self.velocity += self.acceleration * delta;

        if (self.target - self.position) * direction < SNAP_TOLERANCE * direction {
            // 到达或越过目标:吸附并终止动画
            self.position = self.target;
            self.velocity = 0.0;
            self.acceleration = 0.0;
            self.last_move_ms = None;
        } else {
            self.last_move_ms = Some(now_ms);
            self.scheduler.request_frame();
        }

        self.position
    }

    fn needs_to_move(&self) -> bool {
        (self.position - self.target).abs() > SNAP_TOLERANCE
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// 是否仍有未完成的收敛动画
    pub fn is_animating(&self) -> bool {
        self.needs_to_move()
    }
}
