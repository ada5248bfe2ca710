//! 问题收集器：有序去重的问题列表 + 扫描活动计数（带去抖）
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::CollectorError;
use crate::observer::{CollectorEvent, ObserverId, ProblemObserver};
use crate::options::CollectorOptions;
use crate::problem::Problem;
use crate::timer::{Clock, DeferredTimer, SystemClock};

/// 进程内唯一的收集器实例，由外层上下文（见 `Probe`）创建并按引用传给各扫描例程
pub struct ProblemCollector {
    problems: Vec<Problem>,
    running_scan_count: usize,
    report_finished_timer: DeferredTimer,
    clock: Box<dyn Clock>,
    observers: Vec<(ObserverId, Box<dyn ProblemObserver>)>,
    next_observer_id: u64,
}

impl ProblemCollector {
    pub fn new(options: CollectorOptions) -> Self {
        Self::with_clock(options, Box::new(SystemClock))
    }

    pub fn with_clock(options: CollectorOptions, clock: Box<dyn Clock>) -> Self {
        Self {
            problems: Vec::new(),
            running_scan_count: 0,
            report_finished_timer: DeferredTimer::new(options.debounce),
            clock,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// 注册观察者；通知按注册顺序同步下发
    pub fn subscribe(&mut self, observer: Box<dyn ProblemObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: CollectorEvent) {
        for (_, observer) in self.observers.iter_mut() {
            event.dispatch(observer.as_mut());
        }
    }

    /// 当前问题列表（只读）
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// 追加问题；已存在完全相同的问题时不做任何事
    pub fn add_problem(&mut self, problem: Problem) {
        if self.problems.contains(&problem) {
            trace!(problem_id = %problem.problem_id, "duplicate problem ignored");
            return;
        }

        let index = self.problems.len();
        debug!(problem_id = %problem.problem_id, index, "adding problem");
        self.emit(CollectorEvent::AboutToAddProblem { index });
        self.problems.push(problem);
        self.emit(CollectorEvent::ProblemAdded);
    }

    /// 按 id 删除第一条匹配的问题
    pub fn remove_problem(&mut self, problem_id: &str) {
        let row = match self.problems.iter().position(|p| p.problem_id == problem_id) {
            Some(row) => row,
            None => {
                trace!(problem_id, "no problem to remove");
                return;
            }
        };

        debug!(problem_id, row, "removing problem");
        self.emit(CollectorEvent::AboutToRemoveProblems { first_row: row, count: 1 });
        self.problems.remove(row);
        self.emit(CollectorEvent::ProblemsRemoved);
    }

    /// 清除上一轮扫描留下的问题，然后通知各扫描例程重新扫描
    ///
    /// 每段连续的扫描问题只删除一次、只发一对删除通知。
    /// `first` 为待删区间起点，`probe` 为探测位置；区间删除后两者都回到删除点。
    /// 序列末尾视为一个非扫描元素，因此末尾未结束的区间同样会被删除。
    pub fn request_scan(&mut self) {
        let mut first = 0;
        let mut probe = 0;
        let mut runs = 0usize;
        loop {
            if probe < self.problems.len() && self.problems[probe].is_scan_finding() {
                probe += 1;
            } else if first != probe {
                let count = probe - first;
                debug!(first_row = first, count, "purging stale scan problems");
                self.emit(CollectorEvent::AboutToRemoveProblems { first_row: first, count });
                self.problems.drain(first..probe);
                probe = first;
                self.emit(CollectorEvent::ProblemsRemoved);
                runs += 1;
            } else if probe < self.problems.len() {
                probe += 1;
                first += 1;
            } else {
                break;
            }
        }

        debug!(runs, remaining = self.problems.len(), "scan requested");
        self.emit(CollectorEvent::ProblemScanRequested);
    }

    /// 一次扫描开始：计数加一，并取消尚未触发的“结束”通知
    pub fn report_scan_started(&mut self) {
        self.running_scan_count += 1;
        self.report_finished_timer.stop();
        trace!(running = self.running_scan_count, "scan started");
    }

    /// 一次扫描结束；未配对的调用视为调用方缺陷，直接 panic
    pub fn report_scan_finished(&mut self) {
        if let Err(e) = self.try_report_scan_finished() {
            panic!("{e}");
        }
    }

    /// 与 `report_scan_finished` 相同，但未配对时返回错误且不改动任何状态
    pub fn try_report_scan_finished(&mut self) -> Result<(), CollectorError> {
        if self.running_scan_count == 0 {
            return Err(CollectorError::UnbalancedScanFinished);
        }

        self.running_scan_count -= 1;
        trace!(running = self.running_scan_count, "scan finished");

        if self.running_scan_count == 0 {
            // 扫描多为同步且很快，一次结束后常常紧接着下一次开始，
            // 因此延迟一个去抖窗口再决定是否宣布结束
            let now = self.clock.now();
            self.report_finished_timer.start(now);
            debug!(window = ?self.report_finished_timer.interval(), "finish announcement armed");
        }
        Ok(())
    }

    pub fn running_scan_count(&self) -> usize {
        self.running_scan_count
    }

    pub fn is_scanning(&self) -> bool {
        self.running_scan_count > 0
    }

    /// 收集器所用时钟的当前时刻
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// 待触发延迟动作的截止时间（供事件循环决定休眠时长）
    pub fn next_deadline(&self) -> Option<Instant> {
        self.report_finished_timer.deadline()
    }

    /// 执行已到期的延迟动作；有动作被执行时返回 true
    pub fn poll_timers(&mut self) -> bool {
        let now = self.clock.now();
        if self.report_finished_timer.take_due(now) {
            self.maybe_emit_scans_finished();
            return true;
        }
        false
    }

    fn maybe_emit_scans_finished(&mut self) {
        if self.running_scan_count == 0 {
            debug!("all scans finished");
            self.emit(CollectorEvent::ProblemScansFinished);
        }
    }
}
