use std::time::Duration;

use probelens_core::{
    ChannelObserver, CollectorEvent, CollectorOptions, FindingCategory, ManualClock, Probe, Problem,
    ProblemCollector, ScanRoutine,
};

/// 每次扫描上报固定的一组问题
struct FixedScanner {
    name: &'static str,
    ids: Vec<&'static str>,
}

impl ScanRoutine for FixedScanner {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&mut self, collector: &mut ProblemCollector) -> anyhow::Result<()> {
        for id in &self.ids {
            collector.add_problem(Problem::new(*id, FindingCategory::Scan));
        }
        Ok(())
    }
}

struct FailingScanner;

impl ScanRoutine for FailingScanner {
    fn name(&self) -> &str {
        "failing"
    }

    fn scan(&mut self, collector: &mut ProblemCollector) -> anyhow::Result<()> {
        collector.add_problem(Problem::new("partial", FindingCategory::Scan));
        anyhow::bail!("lost connection to target")
    }
}

fn manual_probe() -> (Probe, ManualClock) {
    let clock = ManualClock::new();
    let collector = ProblemCollector::with_clock(CollectorOptions::default(), Box::new(clock.clone()));
    (Probe::with_collector(collector), clock)
}

fn ids(probe: &Probe) -> Vec<String> {
    probe.collector().problems().iter().map(|p| p.problem_id.clone()).collect()
}

#[test]
fn rescan_replaces_scan_findings_and_keeps_live_ones() {
    let (mut probe, clock) = manual_probe();
    let (obs, rx) = ChannelObserver::unbounded();
    probe.collector_mut().subscribe(Box::new(obs));
    probe.register_scanner(Box::new(FixedScanner { name: "bindings", ids: vec!["b1", "b2"] }));
    probe.register_scanner(Box::new(FixedScanner { name: "layouts", ids: vec!["l1"] }));

    probe.request_scan();
    probe.collector_mut().add_problem(Problem::new("live", FindingCategory::Live));
    assert_eq!(ids(&probe), ["b1", "b2", "l1", "live"]);

    probe.request_scan();
    assert_eq!(ids(&probe), ["live", "b1", "b2", "l1"]);

    clock.advance(Duration::from_millis(10));
    assert!(probe.collector_mut().poll_timers());
    let finished = rx.try_iter().filter(|e| *e == CollectorEvent::ProblemScansFinished).count();
    assert_eq!(finished, 1);
}

#[test]
fn routines_run_back_to_back_announce_finish_once() {
    let (mut probe, clock) = manual_probe();
    let (obs, rx) = ChannelObserver::unbounded();
    probe.collector_mut().subscribe(Box::new(obs));
    for name in ["a", "b", "c"] {
        probe.register_scanner(Box::new(FixedScanner { name, ids: vec![] }));
    }

    probe.request_scan();
    assert!(!probe.collector().is_scanning());
    clock.advance(Duration::from_millis(10));
    probe.collector_mut().poll_timers();

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events, [CollectorEvent::ProblemScanRequested, CollectorEvent::ProblemScansFinished]);
}

#[test]
fn failing_routine_keeps_bracketing_balanced() {
    let (mut probe, _clock) = manual_probe();
    probe.register_scanner(Box::new(FailingScanner));
    probe.request_scan();
    assert_eq!(probe.collector().running_scan_count(), 0);
    assert_eq!(ids(&probe), ["partial"]);
    assert!(probe.collector().next_deadline().is_some());
}

#[test]
fn run_until_idle_waits_out_debounce_on_system_clock() {
    let mut probe = Probe::new(CollectorOptions { debounce: Duration::from_millis(1) });
    let (obs, rx) = ChannelObserver::unbounded();
    probe.collector_mut().subscribe(Box::new(obs));
    probe.register_scanner(Box::new(FixedScanner { name: "one", ids: vec!["x"] }));

    probe.request_scan();
    probe.run_until_idle();

    assert_eq!(probe.collector().next_deadline(), None);
    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.last(), Some(&CollectorEvent::ProblemScansFinished));
}

#[test]
fn run_until_idle_returns_immediately_without_pending_work() {
    let mut probe = Probe::new(CollectorOptions::default());
    probe.run_until_idle();
    assert!(probe.collector().problems().is_empty());
}
