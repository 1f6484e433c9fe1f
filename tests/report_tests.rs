// Severity aggregation and rendered message order

use ifcheck::models::Status;
use ifcheck::report::{InterfaceReport, Report};

fn iface(label: &str, checks: &[(&str, Status)]) -> InterfaceReport {
    let mut r = InterfaceReport::new(label);
    for (check, status) in checks {
        r.add_check(*check, *status, true);
    }
    r
}

#[test]
fn all_ok_joins_normal_messages() {
    let mut report = Report::new();
    report.merge_interface(iface("ifA", &[("up", Status::Ok)]));
    report.merge_interface(iface("ifC", &[("up", Status::Ok), ("in 1.0Mb/s", Status::Ok)]));
    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.render(), "ifA (up), ifC (up, in 1.0Mb/s)");
}

#[test]
fn warning_first_then_ok_suffix() {
    let mut report = Report::new();
    report.merge_interface(iface("ifA", &[("up", Status::Ok)]));
    report.merge_interface(iface("ifB", &[("in 85.0%", Status::Warning)]));
    assert_eq!(report.status, Status::Warning);
    assert_eq!(report.render(), "ifB (in 85.0%), OK: ifA (up)");
}

#[test]
fn critical_first_then_warning_then_ok() {
    let mut report = Report::new();
    report.merge_interface(iface("ifA", &[("up", Status::Ok)]));
    report.merge_interface(iface("ifB", &[("in 85.0%", Status::Warning)]));
    report.merge_interface(iface("ifC", &[("oper down", Status::Critical)]));
    assert_eq!(report.status, Status::Critical);
    assert_eq!(
        report.render(),
        "ifC (oper down), WARNING: ifB (in 85.0%), OK: ifA (up)"
    );
}

#[test]
fn critical_and_warning_without_ok() {
    let mut report = Report::new();
    report.merge_interface(iface("ifX", &[("oper down", Status::Critical)]));
    report.merge_interface(iface("ifY", &[("out 91.0%", Status::Warning)]));
    assert_eq!(report.render(), "ifX (oper down), WARNING: ifY (out 91.0%)");
}

#[test]
fn one_interface_splits_across_buckets() {
    let mut report = Report::new();
    report.merge_interface(iface(
        "Gi0/1",
        &[("up", Status::Ok), ("in 97.0%", Status::Critical), ("out 2.0%", Status::Ok)],
    ));
    assert_eq!(report.render(), "Gi0/1 (in 97.0%), OK: Gi0/1 (up, out 2.0%)");
}

#[test]
fn uncounted_checks_are_visible_but_never_escalate() {
    let mut r = InterfaceReport::new("Gi0/9");
    r.add_check("oper down", Status::Critical, false);
    assert_eq!(r.status, Status::Ok);
    assert_eq!(r.checks.len(), 1);

    let mut report = Report::new();
    report.merge_interface(r);
    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.render(), "Gi0/9 (oper down (ignored))");
}

#[test]
fn unknown_outranks_critical() {
    assert!(Status::Unknown > Status::Critical);
    assert!(Status::Critical > Status::Warning);
    assert!(Status::Warning > Status::Ok);

    let mut report = Report::new();
    report.merge_interface(iface("a", &[("x", Status::Critical)]));
    report.raise(Status::Unknown);
    report.raise(Status::Warning);
    assert_eq!(report.status, Status::Unknown);
    assert_eq!(report.render(), "a (x)");
}

#[test]
fn interface_without_checks_shows_no_data() {
    let mut report = Report::new();
    report.merge_interface(iface("a", &[]));
    report.merge_interface(iface("b", &[("up", Status::Ok)]));
    assert_eq!(report.interfaces, 2);
    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.render(), "a (no data), b (up)");
}
