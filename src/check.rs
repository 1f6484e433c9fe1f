// One check cycle: list → collect → load previous → per-interface checks →
// persist → report. Any CheckError aborts before persistence, so the last
// good baseline survives for the next run.

use crate::config::CheckSettings;
use crate::counter_source::CounterSource;
use crate::delta::{self, CounterCondition, Delta};
use crate::error::Result;
use crate::format::{FormatOptions, Unit, format_quantity};
use crate::models::{CounterSlot, Sample, SampleCollection, Status};
use crate::report::{InterfaceReport, Metric, Report};
use crate::sample_store::SampleStore;
use crate::sink::ReportSink;
use crate::threshold::ThresholdPair;
use crate::worker;
use std::sync::Arc;
use tracing::instrument;

/// ifSpeed is a Gauge32; at this value the real speed is in ifHighSpeed.
const SPEED_SATURATED: u64 = u32::MAX as u64;

const OPER_STATES: [&str; 7] = [
    "up",
    "down",
    "testing",
    "unknown",
    "dormant",
    "notPresent",
    "lowerLayerDown",
];

/// Final status line and metrics handed to the report sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub metrics: Vec<Metric>,
}

impl CheckResult {
    pub fn emit(&self, sink: &mut impl ReportSink) -> std::io::Result<()> {
        sink.emit(self.status, &self.message, &self.metrics)
    }
}

#[instrument(skip(settings, source), fields(host = %settings.host, parallelism = settings.parallelism))]
pub async fn run_cycle<S: CounterSource>(settings: &CheckSettings, source: Arc<S>) -> Result<Report> {
    let indexes = worker::list_indexes(source.clone()).await?;
    let current = worker::collect(source, &indexes, settings.parallelism).await?;

    let store = SampleStore::new(&settings.state_file);
    let previous = store.load()?;

    let report = evaluate(settings, &current, previous.as_ref());

    store.save(&settings.host, &current)?;
    Ok(report)
}

/// Runs every selected interface through its checks and folds the outcomes.
pub fn evaluate(
    settings: &CheckSettings,
    current: &SampleCollection,
    previous: Option<&SampleCollection>,
) -> Report {
    let mut report = Report::new();
    for sample in current.values() {
        if !settings.interfaces.includes(sample) {
            continue;
        }
        let prev = previous.and_then(|p| p.get(&sample.index));
        let iface = check_interface(settings, sample, prev, &mut report);
        report.merge_interface(iface);
    }
    if report.interfaces == 0 {
        report.raise(Status::Unknown);
    }
    report
}

/// Turns a finished (or aborted) cycle into the status line.
pub fn finish(settings: &CheckSettings, outcome: Result<Report>) -> CheckResult {
    match outcome {
        Ok(report) => {
            let mut message = if report.interfaces == 0 {
                "no interfaces selected".to_string()
            } else {
                report.render()
            };
            if settings.verbose && !report.diagnostics.is_empty() {
                message.push_str(&format!(" [{}]", report.diagnostics.join("; ")));
            }
            CheckResult {
                status: report.status,
                message,
                metrics: if settings.metrics {
                    report.metrics
                } else {
                    Vec::new()
                },
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "check cycle aborted");
            CheckResult {
                status: Status::Unknown,
                message: e.to_string(),
                metrics: Vec::new(),
            }
        }
    }
}

struct Ctx<'a> {
    settings: &'a CheckSettings,
    label: String,
    index: u32,
    counts: bool,
}

impl Ctx<'_> {
    fn fmt(&self, value: f64, unit: Unit) -> String {
        format_quantity(
            value,
            unit,
            FormatOptions {
                human: self.settings.human_readable,
                integer: false,
            },
        )
    }

    fn condition(&self, report: &mut Report, condition: &CounterCondition) {
        tracing::warn!(index = self.index, interface = %self.label, condition = %condition, "counter condition");
        report
            .diagnostics
            .push(format!("{}: {}", self.label, condition));
    }
}

pub fn check_interface(
    settings: &CheckSettings,
    current: &Sample,
    previous: Option<&Sample>,
    report: &mut Report,
) -> InterfaceReport {
    let ctx = Ctx {
        settings,
        label: current.label(),
        index: current.index,
        counts: settings.alerting.includes(current),
    };
    let mut iface = InterfaceReport::new(ctx.label.clone());

    check_status(&ctx, current, &mut iface, report);

    if current.counter(CounterSlot::Promiscuous) == Some(1) {
        iface.add_check("promiscuous", Status::Warning, ctx.counts);
    }

    let elapsed = previous
        .map(|p| current.timestamp.saturating_sub(p.timestamp))
        .unwrap_or(0);
    let Some(previous) = previous.filter(|_| elapsed > 0) else {
        iface.add_check("no statistics yet", Status::Ok, ctx.counts);
        report.pending += 1;
        return iface;
    };
    if let Some(reset) = delta::discontinuity(current, previous) {
        ctx.condition(report, &reset);
        iface.add_check("counters reset", Status::Ok, ctx.counts);
        return iface;
    }

    let rate = |narrow: CounterSlot, wide: Option<CounterSlot>, report: &mut Report| -> Option<Delta> {
        match delta::compute(current, previous, elapsed, narrow, wide) {
            Ok(d) => Some(d),
            Err(c) => {
                ctx.condition(report, &c);
                None
            }
        }
    };

    let speed = link_speed(&ctx, current, report);

    let traffic = [
        ("in", CounterSlot::InOctets, CounterSlot::HcInOctets, &settings.bandwidth.inbound),
        ("out", CounterSlot::OutOctets, CounterSlot::HcOutOctets, &settings.bandwidth.outbound),
    ];
    for (dir, narrow, wide, thresholds) in traffic {
        let Some(d) = rate(narrow, Some(wide), report) else {
            continue;
        };
        let bits = d.rate * 8.0;
        let mut metric = Metric::new(format!("{}_{}_traffic", ctx.label, dir), bits, Unit::Bits);
        metric.max = speed.map(|s| s as f64);
        report.metrics.push(metric);

        match speed {
            Some(s) => {
                let pct = bits / s as f64 * 100.0;
                let status = thresholds.evaluate(pct);
                iface.add_check(
                    format!(
                        "{} {} ({})",
                        dir,
                        ctx.fmt(bits, Unit::Bits),
                        ctx.fmt(pct, Unit::Percent)
                    ),
                    status,
                    ctx.counts,
                );
                report.metrics.push(threshold_metric(
                    format!("{}_{}_usage", ctx.label, dir),
                    pct,
                    Unit::Percent,
                    Some(100.0),
                    thresholds,
                ));
            }
            None => {
                iface.add_check(format!("{} {}", dir, ctx.fmt(bits, Unit::Bits)), Status::Ok, ctx.counts);
            }
        }
    }

    let counters = [
        ("errors", CounterSlot::InErrors, CounterSlot::OutErrors, None, None, &settings.errors),
        ("discards", CounterSlot::InDiscards, CounterSlot::OutDiscards, None, None, &settings.discards),
        (
            "packets",
            CounterSlot::InUcastPkts,
            CounterSlot::OutUcastPkts,
            Some(CounterSlot::HcInUcastPkts),
            Some(CounterSlot::HcOutUcastPkts),
            &settings.packets,
        ),
    ];
    for (what, in_slot, out_slot, in_wide, out_wide, thresholds) in counters {
        let dirs = [
            ("in", in_slot, in_wide, &thresholds.inbound),
            ("out", out_slot, out_wide, &thresholds.outbound),
        ];
        for (dir, narrow, wide, pair) in dirs {
            let Some(d) = rate(narrow, wide, report) else {
                continue;
            };
            if !pair.is_empty() {
                iface.add_check(
                    format!("{} {} {}", dir, what, ctx.fmt(d.rate, Unit::Packets)),
                    pair.evaluate(d.rate),
                    ctx.counts,
                );
            }
            report.metrics.push(threshold_metric(
                format!("{}_{}_{}", ctx.label, dir, what),
                d.rate,
                Unit::Packets,
                None,
                pair,
            ));
        }
    }

    iface
}

fn check_status(ctx: &Ctx<'_>, current: &Sample, iface: &mut InterfaceReport, report: &mut Report) {
    let Some(oper) = current.counter(CounterSlot::OperStatus) else {
        let condition = match current.get(CounterSlot::OperStatus) {
            crate::models::RawValue::Unreadable(reply) => CounterCondition::Unreadable {
                slot: CounterSlot::OperStatus,
                reply: reply.clone(),
            },
            _ => CounterCondition::Missing(CounterSlot::OperStatus),
        };
        ctx.condition(report, &condition);
        return;
    };
    let admin_down = current.counter(CounterSlot::AdminStatus) == Some(2);

    if oper == 1 {
        iface.add_check("up", Status::Ok, ctx.counts);
    } else if admin_down {
        let status = if ctx.settings.ignore_admin_down {
            Status::Ok
        } else {
            ctx.settings.status_severity
        };
        iface.add_check("admin down", status, ctx.counts);
    } else {
        let state = oper_state_name(oper);
        iface.add_check(format!("oper {}", state), ctx.settings.status_severity, ctx.counts);
    }
}

fn oper_state_name(oper: u64) -> String {
    usize::try_from(oper)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| OPER_STATES.get(i))
        .map_or_else(|| format!("state {}", oper), |s| s.to_string())
}

/// Link speed in bits/second: override, ifSpeed, or ifHighSpeed (Mbit/s) when
/// ifSpeed is saturated or zero. Unknown speed is a condition; rates still show.
fn link_speed(ctx: &Ctx<'_>, current: &Sample, report: &mut Report) -> Option<u64> {
    if let Some(s) = ctx.settings.speed_override {
        return Some(s);
    }
    let high = current
        .counter(CounterSlot::HighSpeed)
        .filter(|h| *h > 0)
        .map(|h| h.saturating_mul(1_000_000));
    let speed = match current.counter(CounterSlot::Speed) {
        Some(SPEED_SATURATED) | Some(0) | None => high,
        Some(s) => Some(s),
    };
    if speed.is_none() {
        ctx.condition(report, &CounterCondition::SpeedAmbiguous);
    }
    speed
}

fn threshold_metric(
    label: String,
    value: f64,
    unit: Unit,
    max: Option<f64>,
    pair: &ThresholdPair,
) -> Metric {
    let mut metric = Metric::new(label, value, unit);
    metric.max = max;
    metric.warning = pair.warning.clone();
    metric.critical = pair.critical.clone();
    metric
}
