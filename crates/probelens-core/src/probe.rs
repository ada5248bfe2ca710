//! 应用上下文：持有唯一的收集器与已注册的扫描例程
use tracing::{debug, info, warn};

use crate::collector::ProblemCollector;
use crate::options::CollectorOptions;

/// 扫描例程：收到扫描请求后向收集器上报发现
pub trait ScanRoutine {
    fn name(&self) -> &str;
    fn scan(&mut self, collector: &mut ProblemCollector) -> anyhow::Result<()>;
}

/// 外层上下文，收集器只在这里创建一次，其余组件通过引用拿到它
pub struct Probe {
    collector: ProblemCollector,
    routines: Vec<Box<dyn ScanRoutine>>,
}

impl Probe {
    pub fn new(options: CollectorOptions) -> Self {
        Self::with_collector(ProblemCollector::new(options))
    }

    pub fn with_collector(collector: ProblemCollector) -> Self {
        Self { collector, routines: Vec::new() }
    }

    pub fn collector(&self) -> &ProblemCollector {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut ProblemCollector {
        &mut self.collector
    }

    pub fn register_scanner(&mut self, routine: Box<dyn ScanRoutine>) {
        debug!(name = routine.name(), "scan routine registered");
        self.routines.push(routine);
    }

    /// 清理旧的扫描结果，再依次运行各扫描例程
    /// 每个例程都被 start/finish 包围；例程失败只记录日志，计数仍保持配对
    pub fn request_scan(&mut self) {
        self.collector.request_scan();
        for routine in self.routines.iter_mut() {
            self.collector.report_scan_started();
            if let Err(e) = routine.scan(&mut self.collector) {
                warn!(name = routine.name(), error = %e, "scan routine failed");
            }
            self.collector.report_scan_finished();
        }
        info!(routines = self.routines.len(), problems = self.collector.problems().len(), "scan pass done");
    }

    /// 在当前线程上等待并执行延迟动作，直到没有待触发的动作
    ///
    /// 依赖收集器时钟自行前进（`SystemClock`）；手动时钟请直接调用 `poll_timers`。
    pub fn run_until_idle(&mut self) {
        while let Some(deadline) = self.collector.next_deadline() {
            let now = self.collector.now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            self.collector.poll_timers();
        }
    }
}
