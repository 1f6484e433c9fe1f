// Report sink: where the final status line and metrics go.

use crate::models::Status;
use crate::report::Metric;
use std::io::Write;

pub trait ReportSink {
    fn emit(&mut self, status: Status, message: &str, metrics: &[Metric]) -> std::io::Result<()>;
}

/// Monitoring-plugin status line:
/// `IFCHECK OK - message | 'label'=value[uom];warn;crit;min;max ...`
pub struct PluginOutput<W: Write> {
    out: W,
}

impl<W: Write> PluginOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for PluginOutput<W> {
    fn emit(&mut self, status: Status, message: &str, metrics: &[Metric]) -> std::io::Result<()> {
        write!(
            self.out,
            "{} {} - {}",
            crate::version::NAME.to_uppercase(),
            status,
            message.replace('|', "/")
        )?;
        if !metrics.is_empty() {
            let perf: Vec<String> = metrics.iter().map(perf_entry).collect();
            write!(self.out, " | {}", perf.join(" "))?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn perf_entry(m: &Metric) -> String {
    let opt_range = |r: &Option<crate::threshold::RangeThreshold>| {
        r.as_ref().map(|t| t.as_str().to_string()).unwrap_or_default()
    };
    let opt_num = |v: Option<f64>| v.map(trim_number).unwrap_or_default();
    let entry = format!(
        "'{}'={}{};{};{};{};{}",
        m.label.replace('\'', "\"").replace('=', "_"),
        trim_number(m.value),
        m.unit.uom(),
        opt_range(&m.warning),
        opt_range(&m.critical),
        opt_num(m.min),
        opt_num(m.max)
    );
    entry.trim_end_matches(';').to_string()
}

/// Integers without a fraction, otherwise up to three decimals.
fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Unit;
    use crate::threshold::RangeThreshold;

    #[test]
    fn status_line_with_metrics() {
        let mut sink = PluginOutput::new(Vec::new());
        let mut m = Metric::new("Gi0/1_in_util", 12.5, Unit::Percent);
        m.max = Some(100.0);
        m.warning = Some(RangeThreshold::parse("80").unwrap());
        m.critical = Some(RangeThreshold::parse("90").unwrap());
        sink.emit(Status::Warning, "a | b", &[m]).unwrap();
        let line = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            line,
            "IFCHECK WARNING - a / b | 'Gi0/1_in_util'=12.5%;80;90;0;100\n"
        );
    }

    #[test]
    fn trailing_empty_fields_are_dropped() {
        let mut m = Metric::new("x", 3.0, Unit::Bits);
        m.min = None;
        assert_eq!(perf_entry(&m), "'x'=3");
    }
}
