//! 时钟与单次延迟定时器
//!
//! 定时器本身不持有线程：调用方在同一事件循环里询问截止时间并触发（见 `ProblemCollector::poll_timers`）。
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// 时间来源
pub trait Clock {
    fn now(&self) -> Instant;
}

/// 系统单调时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 手动推进的时钟（克隆后共享同一时刻）
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Rc::new(Cell::new(Instant::now())) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// 推进到给定时刻；早于当前时刻则不动
    pub fn advance_to(&self, to: Instant) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// 单次、可取消并重启的延迟定时器
/// - `start` 总是覆盖旧的截止时间，任何时刻最多只有一个待触发实例
/// - `take_due` 到期后只返回一次 true
#[derive(Debug, Clone)]
pub struct DeferredTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl DeferredTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, deadline: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 到期则解除并返回 true
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if d <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
