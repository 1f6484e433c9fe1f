// File-backed counter source: a JSON document of interface rows,
// `{ "<ifIndex>": { "<slot>": value, ... }, ... }`. Integers are counters,
// strings are raw replies, null is "not present". Every connection re-reads
// the file, the way a fresh session re-reads the device.

use super::{CounterSource, SourceConnection};
use crate::error::{CheckError, Result};
use crate::models::{CounterSlot, FieldMap, RawValue};
use std::collections::BTreeMap;
use std::path::PathBuf;

type Rows = BTreeMap<u32, BTreeMap<String, serde_json::Value>>;

pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CounterSource for SnapshotSource {
    type Connection = SnapshotConnection;

    fn connect(&self) -> Result<SnapshotConnection> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            CheckError::connection(format!("{}: {}", self.path.display(), e))
        })?;
        let raw: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
            serde_json::from_str(&text).map_err(|e| {
                CheckError::connection(format!("{}: malformed reply: {}", self.path.display(), e))
            })?;
        let mut rows = Rows::new();
        for (key, row) in raw {
            let index: u32 = key
                .parse()
                .ok()
                .filter(|i| *i > 0)
                .ok_or_else(|| CheckError::connection(format!("invalid ifIndex '{}'", key)))?;
            rows.insert(index, row);
        }
        Ok(SnapshotConnection { rows })
    }
}

pub struct SnapshotConnection {
    rows: Rows,
}

impl SourceConnection for SnapshotConnection {
    fn interface_indexes(&mut self) -> Result<Vec<u32>> {
        Ok(self.rows.keys().copied().collect())
    }

    fn fetch(&mut self, index: u32) -> Result<FieldMap> {
        let Some(row) = self.rows.get(&index) else {
            tracing::debug!(index, "interface vanished between listing and fetch");
            return Ok(CounterSlot::ALL
                .into_iter()
                .map(|slot| (slot, RawValue::NotPresent))
                .collect());
        };
        for key in row.keys() {
            if CounterSlot::from_key(key).is_none() {
                tracing::debug!(index, slot = %key, "ignoring unknown slot");
            }
        }
        Ok(CounterSlot::ALL
            .into_iter()
            .map(|slot| {
                let value = row.get(slot.key()).map_or(RawValue::NotPresent, |v| to_raw(slot, v));
                (slot, value)
            })
            .collect())
    }
}

fn to_raw(slot: CounterSlot, value: &serde_json::Value) -> RawValue {
    use serde_json::Value;
    match value {
        Value::Null => RawValue::NotPresent,
        Value::String(s) => RawValue::from_reply(slot, s),
        Value::Number(n) if slot.is_text() => RawValue::Text(n.to_string()),
        Value::Number(n) => match n.as_u64() {
            Some(v) => RawValue::Counter(v),
            None => RawValue::Unreadable(n.to_string()),
        },
        other => RawValue::Unreadable(other.to_string()),
    }
}
