// Include/exclude filter chains over interface fields.
//
// Items are comma separated (",," is a literal comma). Each item:
//   [+|-] [field(=|:)] value
// '+'/'-' and the field/mode carry forward to later items until overridden.
// '=' is an exact, case-sensitive match; ':' is a case-insensitive substring
// match. A FIRST..LAST value is a closed range in natural order.

use crate::error::{CheckError, Result};
use crate::models::{CounterSlot, Sample};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Description,
    Alias,
    Index,
    Type,
}

impl FilterField {
    fn from_name(s: &str) -> Option<Self> {
        match s {
            "name" => Some(FilterField::Name),
            "description" => Some(FilterField::Description),
            "alias" => Some(FilterField::Alias),
            "index" => Some(FilterField::Index),
            "type" => Some(FilterField::Type),
            _ => None,
        }
    }

    fn value_of(self, sample: &Sample) -> Option<String> {
        match self {
            FilterField::Name => sample.text(CounterSlot::Name),
            FilterField::Description => sample.text(CounterSlot::Descr),
            FilterField::Alias => sample.text(CounterSlot::Alias),
            FilterField::Index => Some(sample.index.to_string()),
            FilterField::Type => sample.text(CounterSlot::Type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Exact(String),
    Range { first: String, last: String },
    Contains(String),
}

impl Matcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(v) => value == v,
            Matcher::Range { first, last } => {
                natural_cmp(value, first) != Ordering::Less
                    && natural_cmp(value, last) != Ordering::Greater
            }
            Matcher::Contains(needle) => value.to_lowercase().contains(needle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub include: bool,
    pub field: FilterField,
    matcher: Matcher,
}

impl FilterItem {
    fn matches(&self, sample: &Sample) -> bool {
        self.field
            .value_of(sample)
            .is_some_and(|v| self.matcher.matches(&v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chain {
    Constant(bool),
    Items { default: bool, items: Vec<FilterItem> },
}

/// Ordered predicate list; later matching items override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    chain: Chain,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exact,
    Contains,
}

impl FilterChain {
    /// Chain for an absent specification: every sample is included.
    pub fn include_all() -> Self {
        Self {
            chain: Chain::Constant(true),
        }
    }

    /// `None` (not configured) yields an include-all chain.
    pub fn from_config(spec: Option<&str>) -> Result<Self> {
        match spec {
            None => Ok(Self::include_all()),
            Some(s) => Self::parse(s),
        }
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let tokens = split_escaped(spec);
        if tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(CheckError::config("empty filter specification"));
        }

        let mut include = true;
        let mut field = FilterField::Name;
        let mut mode = Mode::Exact;
        let mut items = Vec::with_capacity(tokens.len());

        for token in &tokens {
            let token = token.trim();
            match token {
                "all" | "+all" => return Ok(Self::include_all()),
                "-all" => {
                    return Ok(Self {
                        chain: Chain::Constant(false),
                    });
                }
                _ => {}
            }

            let mut rest = token;
            if let Some(r) = rest.strip_prefix('+') {
                include = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix('-') {
                include = false;
                rest = r;
            }

            if let Some(pos) = rest.find(['=', ':'])
                && let Some(f) = FilterField::from_name(&rest[..pos])
            {
                field = f;
                mode = if rest.as_bytes()[pos] == b'=' {
                    Mode::Exact
                } else {
                    Mode::Contains
                };
                rest = &rest[pos + 1..];
            }

            if rest.is_empty() {
                return Err(CheckError::config(format!(
                    "filter '{}': item '{}' has no value",
                    spec, token
                )));
            }

            // A FIRST..LAST value is a range under either mode.
            let matcher = match (rest.split_once(".."), mode) {
                (Some((first, last)), _) if !first.is_empty() && !last.is_empty() => {
                    Matcher::Range {
                        first: first.to_string(),
                        last: last.to_string(),
                    }
                }
                (_, Mode::Contains) => Matcher::Contains(rest.to_lowercase()),
                (_, Mode::Exact) => Matcher::Exact(rest.to_string()),
            };
            items.push(FilterItem {
                include,
                field,
                matcher,
            });
        }

        let default = items.first().is_some_and(|i| !i.include);
        Ok(Self {
            chain: Chain::Items { default, items },
        })
    }

    pub fn includes(&self, sample: &Sample) -> bool {
        match &self.chain {
            Chain::Constant(v) => *v,
            Chain::Items { default, items } => items
                .iter()
                .fold(*default, |acc, item| {
                    if item.matches(sample) { item.include } else { acc }
                }),
        }
    }

    pub fn items(&self) -> &[FilterItem] {
        match &self.chain {
            Chain::Constant(_) => &[],
            Chain::Items { items, .. } => items,
        }
    }
}

/// Split on ',' treating ",," as an escaped literal comma.
fn split_escaped(spec: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = spec.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            if chars.peek() == Some(&',') {
                chars.next();
                current.push(',');
            } else {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    out.push(current);
    out
}

/// Mixed ordering: digit runs compare numerically, other runs lexicographically.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ra = runs(a);
    let rb = runs(b);
    for (x, y) in ra.iter().zip(rb.iter()) {
        let ord = match (is_digits(x), is_digits(y)) {
            (true, true) => numeric_cmp(x, y),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ra.len().cmp(&rb.len())
}

fn runs(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_digit: Option<bool> = None;
    for (i, c) in s.char_indices() {
        let d = c.is_ascii_digit();
        if let Some(p) = prev_digit
            && p != d
        {
            out.push(&s[start..i]);
            start = i;
        }
        prev_digit = Some(d);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

// Arbitrary length: strip leading zeros, then longer is larger.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_cmp_orders_port_names() {
        assert_eq!(natural_cmp("Gi0/2", "Gi0/10"), Ordering::Less);
        assert_eq!(natural_cmp("Gi1/1", "Gi0/48"), Ordering::Greater);
        assert_eq!(natural_cmp("eth007", "eth7"), Ordering::Equal);
        assert_eq!(natural_cmp("eth", "eth0"), Ordering::Less);
        assert_eq!(natural_cmp("6", "6"), Ordering::Equal);
    }

    #[test]
    fn split_escaped_keeps_doubled_commas() {
        assert_eq!(split_escaped("a,,b,c"), vec!["a,b", "c"]);
        assert_eq!(split_escaped("x"), vec!["x"]);
    }
}
