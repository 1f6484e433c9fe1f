// Human-readable quantities for report messages and metric units.

const SUFFIXES: [&str; 8] = ["k", "M", "G", "T", "P", "E", "Z", "Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Bits,
    Bytes,
    Packets,
    Percent,
}

impl Unit {
    /// Traffic in bits scales by 1000, byte counts by 1024.
    pub fn base(self) -> f64 {
        match self {
            Unit::Bytes => 1024.0,
            Unit::Bits | Unit::Packets | Unit::Percent => 1000.0,
        }
    }

    /// Suffix appended in messages.
    pub fn rate_suffix(self) -> &'static str {
        match self {
            Unit::Bits => "b/s",
            Unit::Bytes => "B/s",
            Unit::Packets => "pps",
            Unit::Percent => "%",
        }
    }

    /// Unit of measure for metric output ("" where the sink has none).
    pub fn uom(self) -> &'static str {
        match self {
            Unit::Bits => "",
            Unit::Bytes => "B",
            Unit::Packets => "",
            Unit::Percent => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    /// Scale with k/M/G/... suffixes.
    pub human: bool,
    /// Whole numbers only; scaled values round up.
    pub integer: bool,
}

/// `1234567 b/s` → `1.2Mb/s` (human) or `1234567.0b/s`.
pub fn format_quantity(value: f64, unit: Unit, opts: FormatOptions) -> String {
    let suffix = unit.rate_suffix();
    let unscaled = !opts.human
        || unit == Unit::Percent
        || value.abs() < unit.base()
        || (opts.integer && value < 0.0);
    if unscaled {
        return if opts.integer {
            format!("{}{}", value.ceil() as i64, suffix)
        } else {
            format!("{:.1}{}", value, suffix)
        };
    }

    if opts.integer {
        let base = unit.base() as u64;
        let mut scaled = value.ceil() as u64;
        let mut exp = 0;
        while scaled >= base && exp < SUFFIXES.len() {
            scaled = scaled.div_ceil(base);
            exp += 1;
        }
        return format!("{}{}{}", scaled, SUFFIXES[exp - 1], suffix);
    }

    let base = unit.base();
    let mut scaled = value;
    let mut exp = 0;
    while scaled.abs() >= base && exp < SUFFIXES.len() {
        scaled /= base;
        exp += 1;
    }
    format!("{:.1}{}{}", scaled, SUFFIXES[exp - 1], suffix)
}
