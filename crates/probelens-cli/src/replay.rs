//! 会话回放：在手动时钟上逐步执行脚本，把每条通知写成一行 JSON
use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use probelens_core::{ChannelObserver, CollectorEvent, CollectorOptions, ManualClock, Problem, ProblemCollector};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 单个脚本步骤
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Step {
    Add { problem: Problem },
    Remove { problem_id: String },
    RequestScan,
    ScanStarted,
    ScanFinished,
    /// 推进时钟（毫秒）并触发到期的延迟动作
    Wait { ms: u64 },
}

/// 顶层脚本结构
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Script {
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

impl Script {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&txt)
    }

    pub(crate) fn parse(txt: &str) -> Result<Self> {
        Ok(toml::from_str(txt)?)
    }
}

/// 回放统计
#[derive(Debug, Default, Clone)]
pub(crate) struct ReplaySummary {
    pub(crate) problems: usize,
    pub(crate) events: usize,
}

pub(crate) fn run(script: &Script, options: CollectorOptions, out: &mut dyn Write) -> Result<ReplaySummary> {
    let clock = ManualClock::new();
    let mut collector = ProblemCollector::with_clock(options, Box::new(clock.clone()));
    let (observer, rx) = ChannelObserver::unbounded();
    collector.subscribe(Box::new(observer));

    let mut summary = ReplaySummary::default();
    for (idx, step) in script.steps.iter().enumerate() {
        debug!(idx, ?step, "replaying step");
        match step {
            Step::Add { problem } => collector.add_problem(problem.clone()),
            Step::Remove { problem_id } => collector.remove_problem(problem_id),
            Step::RequestScan => collector.request_scan(),
            Step::ScanStarted => collector.report_scan_started(),
            Step::ScanFinished => collector
                .try_report_scan_finished()
                .with_context(|| format!("step {idx}"))?,
            Step::Wait { ms } => {
                clock.advance(Duration::from_millis(*ms));
                collector.poll_timers();
            }
        }
        summary.events += write_events(&rx, out)?;
    }

    // 脚本结束后让尚未触发的延迟动作跑完
    if let Some(deadline) = collector.next_deadline() {
        clock.advance_to(deadline);
        collector.poll_timers();
        summary.events += write_events(&rx, out)?;
    }

    summary.problems = collector.problems().len();
    Ok(summary)
}

fn write_events(rx: &Receiver<CollectorEvent>, out: &mut dyn Write) -> Result<usize> {
    let mut n = 0;
    for event in rx.try_iter() {
        serde_json::to_writer(&mut *out, &event)?;
        writeln!(out)?;
        n += 1;
    }
    Ok(n)
}
