//! 运行时问题收集器（核心库）
//!
//! 设计要点：
//! - 问题列表按插入顺序保存，按完整值去重；每次变更前后各发一次通知，便于视图模型增量同步。
//! - 清理扫描来源的问题时，按“连续区间”批量删除，每段只发一对删除通知。
//! - 扫描计数归零后延迟（默认 10ms）再宣布“全部扫描结束”，吸收前后紧挨着的扫描。
//! - 全部操作在单一逻辑线程上同步执行，延迟动作由调用方的事件循环驱动（见 `poll_timers`）。

mod collector;
mod error;
mod observer;
mod options;
mod probe;
mod problem;
mod timer;

// 对外暴露
pub use collector::ProblemCollector;
pub use error::CollectorError;
pub use observer::{ChannelObserver, CollectorEvent, ObserverId, ProblemObserver};
pub use options::{CollectorOptions, DEFAULT_DEBOUNCE};
pub use probe::{Probe, ScanRoutine};
pub use problem::{FindingCategory, Problem, Severity, SourceLocation};
pub use timer::{Clock, DeferredTimer, ManualClock, SystemClock};
