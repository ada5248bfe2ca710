//! 变更通知（观察者接口 + 通道转发）
use crossbeam_channel as channel;
use serde::Serialize;

/// 订阅句柄（用于取消订阅）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// 观察者接口：每个信号一个方法，默认空实现
/// - 按注册顺序同步调用
/// - `about_to_*` 一定发生在对应修改之前，成对的完成通知紧随其后，中间不会插入其他修改
pub trait ProblemObserver {
    fn problem_scan_requested(&mut self) {}
    fn about_to_add_problem(&mut self, _index: usize) {}
    fn problem_added(&mut self) {}
    fn about_to_remove_problems(&mut self, _first_row: usize, _count: usize) {}
    fn problems_removed(&mut self) {}
    fn problem_scans_finished(&mut self) {}
}

/// 通知的值形式（便于通道传递与序列化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CollectorEvent {
    ProblemScanRequested,
    AboutToAddProblem { index: usize },
    ProblemAdded,
    AboutToRemoveProblems { first_row: usize, count: usize },
    ProblemsRemoved,
    ProblemScansFinished,
}

impl CollectorEvent {
    /// 分发到观察者的对应方法
    pub fn dispatch(&self, observer: &mut dyn ProblemObserver) {
        match *self {
            CollectorEvent::ProblemScanRequested => observer.problem_scan_requested(),
            CollectorEvent::AboutToAddProblem { index } => observer.about_to_add_problem(index),
            CollectorEvent::ProblemAdded => observer.problem_added(),
            CollectorEvent::AboutToRemoveProblems { first_row, count } => {
                observer.about_to_remove_problems(first_row, count)
            }
            CollectorEvent::ProblemsRemoved => observer.problems_removed(),
            CollectorEvent::ProblemScansFinished => observer.problem_scans_finished(),
        }
    }
}

/// 把每个信号转成 `CollectorEvent` 写入通道
/// 接收端断开后静默丢弃
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: channel::Sender<CollectorEvent>,
}

impl ChannelObserver {
    pub fn new(tx: channel::Sender<CollectorEvent>) -> Self {
        Self { tx }
    }

    pub fn unbounded() -> (Self, channel::Receiver<CollectorEvent>) {
        let (tx, rx) = channel::unbounded();
        (Self::new(tx), rx)
    }

    fn send(&self, event: CollectorEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProblemObserver for ChannelObserver {
    fn problem_scan_requested(&mut self) {
        self.send(CollectorEvent::ProblemScanRequested);
    }
    fn about_to_add_problem(&mut self, index: usize) {
        self.send(CollectorEvent::AboutToAddProblem { index });
    }
    fn problem_added(&mut self) {
        self.send(CollectorEvent::ProblemAdded);
    }
    fn about_to_remove_problems(&mut self, first_row: usize, count: usize) {
        self.send(CollectorEvent::AboutToRemoveProblems { first_row, count });
    }
    fn problems_removed(&mut self) {
        self.send(CollectorEvent::ProblemsRemoved);
    }
    fn problem_scans_finished(&mut self) {
        self.send(CollectorEvent::ProblemScansFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_round_trips_through_channel() {
        let (mut obs, rx) = ChannelObserver::unbounded();
        let events = [
            CollectorEvent::ProblemScanRequested,
            CollectorEvent::AboutToAddProblem { index: 3 },
            CollectorEvent::ProblemAdded,
            CollectorEvent::AboutToRemoveProblems { first_row: 1, count: 2 },
            CollectorEvent::ProblemsRemoved,
            CollectorEvent::ProblemScansFinished,
        ];
        for e in &events {
            e.dispatch(&mut obs);
        }
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, events);
    }

    #[test]
    fn disconnected_receiver_is_ignored() {
        let (mut obs, rx) = ChannelObserver::unbounded();
        drop(rx);
        obs.problem_added();
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&CollectorEvent::AboutToRemoveProblems { first_row: 2, count: 1 }).unwrap();
        assert_eq!(json, r#"{"event":"about_to_remove_problems","first_row":2,"count":1}"#);
    }
}
