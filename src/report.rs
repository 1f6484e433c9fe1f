// Per-interface check outcomes folded into one severity-ranked report.
//
// Rendered text puts the worst bucket first:
//   OK        "<normal>"
//   WARNING   "<warning>, OK: <normal>"
//   CRITICAL  "<critical>, WARNING: <warning>, OK: <normal>"
// Suffixes appear only for non-empty buckets. UNKNOWN renders like CRITICAL.
// An interface that produced no checks at all shows as "<label> (no data)".

use crate::format::Unit;
use crate::models::Status;
use crate::threshold::RangeThreshold;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub label: String,
    pub status: Status,
    /// False for interfaces outside the alerting filter: shown, never escalates.
    pub counts: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceReport {
    pub label: String,
    pub status: Status,
    pub checks: Vec<CheckOutcome>,
}

impl InterfaceReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: Status::Ok,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, label: impl Into<String>, status: Status, counts: bool) {
        if counts {
            self.status = self.status.max(status);
        }
        self.checks.push(CheckOutcome {
            label: label.into(),
            status,
            counts,
        });
    }

    /// (normal, warning, critical) check labels in insertion order.
    fn buckets(&self) -> (Vec<String>, Vec<String>, Vec<String>) {
        let mut normal = Vec::new();
        let mut warning = Vec::new();
        let mut critical = Vec::new();
        for check in &self.checks {
            match (check.counts, check.status) {
                (true, Status::Warning) => warning.push(check.label.clone()),
                (true, Status::Critical | Status::Unknown) => critical.push(check.label.clone()),
                (false, s) if s != Status::Ok => {
                    normal.push(format!("{} (ignored)", check.label))
                }
                _ => normal.push(check.label.clone()),
            }
        }
        (normal, warning, critical)
    }
}

/// One numeric side-channel value for the report sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: f64,
    pub unit: Unit,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub warning: Option<RangeThreshold>,
    pub critical: Option<RangeThreshold>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: f64, unit: Unit) -> Self {
        Self {
            label: label.into(),
            value,
            unit,
            min: Some(0.0),
            max: None,
            warning: None,
            critical: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub status: Status,
    pub critical: Vec<String>,
    pub warning: Vec<String>,
    pub normal: Vec<String>,
    pub metrics: Vec<Metric>,
    /// Per-counter conditions, in the order they were seen.
    pub diagnostics: Vec<String>,
    /// Interfaces merged so far.
    pub interfaces: usize,
    /// Interfaces with no previous sample to compute rates from.
    pub pending: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, status: Status) {
        self.status = self.status.max(status);
    }

    pub fn merge_interface(&mut self, iface: InterfaceReport) {
        self.raise(iface.status);
        self.interfaces += 1;
        let (mut normal, warning, critical) = iface.buckets();
        if normal.is_empty() && warning.is_empty() && critical.is_empty() {
            normal.push("no data".to_string());
        }
        for (bucket, labels) in [
            (&mut self.critical, critical),
            (&mut self.warning, warning),
            (&mut self.normal, normal),
        ] {
            if !labels.is_empty() {
                bucket.push(format!("{} ({})", iface.label, labels.join(", ")));
            }
        }
    }

    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.status {
            Status::Ok => return self.normal.join(", "),
            Status::Warning => {
                parts.push(self.warning.join(", "));
            }
            Status::Critical | Status::Unknown => {
                parts.push(self.critical.join(", "));
                if !self.warning.is_empty() {
                    parts.push(format!("WARNING: {}", self.warning.join(", ")));
                }
            }
        }
        if !self.normal.is_empty() {
            parts.push(format!("OK: {}", self.normal.join(", ")));
        }
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}
