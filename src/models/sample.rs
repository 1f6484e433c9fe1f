// Raw per-interface samples and the keyed collection persisted between runs

use super::CounterSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wincode::{SchemaRead, SchemaWrite};

/// One raw reading as returned by the counter source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub enum RawValue {
    Counter(u64),
    Text(String),
    /// The device has no such object for this interface.
    NotPresent,
    /// The device answered with something that does not parse; original reply kept.
    Unreadable(String),
}

impl RawValue {
    /// Classify a textual reply for `slot`.
    pub fn from_reply(slot: CounterSlot, reply: &str) -> Self {
        if slot.is_text() {
            return RawValue::Text(reply.to_string());
        }
        match reply.trim().parse::<u64>() {
            Ok(v) => RawValue::Counter(v),
            Err(_) => RawValue::Unreadable(reply.to_string()),
        }
    }

    pub fn as_counter(&self) -> Option<u64> {
        match self {
            RawValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, RawValue::Unreadable(_))
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, RawValue::NotPresent)
    }
}

pub type FieldMap = BTreeMap<CounterSlot, RawValue>;

/// One interface's raw readings at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub index: u32,
    /// Seconds since the epoch at capture.
    pub timestamp: u64,
    pub fields: FieldMap,
}

impl Sample {
    pub fn new(index: u32, timestamp: u64, fields: FieldMap) -> Self {
        Self {
            index,
            timestamp,
            fields,
        }
    }

    /// Missing slots read as `NotPresent`.
    pub fn get(&self, slot: CounterSlot) -> &RawValue {
        self.fields.get(&slot).unwrap_or(&RawValue::NotPresent)
    }

    pub fn counter(&self, slot: CounterSlot) -> Option<u64> {
        self.get(slot).as_counter()
    }

    /// Text view of a slot for filtering and labels; counters render in decimal.
    pub fn text(&self, slot: CounterSlot) -> Option<String> {
        match self.get(slot) {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Counter(v) => Some(v.to_string()),
            RawValue::NotPresent | RawValue::Unreadable(_) => None,
        }
    }

    /// Display label: name, then description, then `ifIndex N`.
    pub fn label(&self) -> String {
        self.text(CounterSlot::Name)
            .filter(|s| !s.is_empty())
            .or_else(|| self.text(CounterSlot::Descr).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("ifIndex {}", self.index))
    }
}

/// Samples keyed by interface index; index is the join key between runs.
pub type SampleCollection = BTreeMap<u32, Sample>;
