// Shared test helpers: an in-memory counter source and sample builders
#![allow(dead_code)]

use ifcheck::counter_source::{CounterSource, SourceConnection};
use ifcheck::error::{CheckError, Result};
use ifcheck::models::{CounterSlot, FieldMap, RawValue, Sample};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Device double: fixed interface rows, optional failures and per-fetch delay.
#[derive(Default)]
pub struct StaticSource {
    pub rows: Mutex<BTreeMap<u32, FieldMap>>,
    pub connects: AtomicUsize,
    pub fetches: AtomicUsize,
    pub unreachable: bool,
    pub fail_index: Option<u32>,
    pub slow_index: Option<(u32, Duration)>,
    /// `(connection id, index)` per fetch, in completion order.
    pub fetch_log: Mutex<Vec<(usize, u32)>>,
}

impl StaticSource {
    pub fn new(rows: BTreeMap<u32, FieldMap>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn set_row(&self, index: u32, fields: FieldMap) {
        self.rows.lock().unwrap().insert(index, fields);
    }
}

pub struct StaticConnection {
    id: usize,
    source: Arc<StaticSource>,
}

/// `CounterSource` is implemented on the shared handle so tests keep a reference.
pub struct SharedSource(pub Arc<StaticSource>);

impl CounterSource for SharedSource {
    type Connection = StaticConnection;

    fn connect(&self) -> Result<StaticConnection> {
        if self.0.unreachable {
            return Err(CheckError::connection("timeout"));
        }
        let id = self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(StaticConnection {
            id,
            source: self.0.clone(),
        })
    }
}

impl SourceConnection for StaticConnection {
    fn interface_indexes(&mut self) -> Result<Vec<u32>> {
        Ok(self.source.rows.lock().unwrap().keys().copied().collect())
    }

    fn fetch(&mut self, index: u32) -> Result<FieldMap> {
        self.source.fetches.fetch_add(1, Ordering::SeqCst);
        if self.source.fail_index == Some(index) {
            return Err(CheckError::connection(format!("no response for {}", index)));
        }
        if let Some((slow, delay)) = self.source.slow_index
            && slow == index
        {
            std::thread::sleep(delay);
        }
        self.source.fetch_log.lock().unwrap().push((self.id, index));
        Ok(self
            .source
            .rows
            .lock()
            .unwrap()
            .get(&index)
            .cloned()
            .unwrap_or_default())
    }
}

/// A healthy, up interface with 64-bit octet counters.
pub fn iface(name: &str, in_octets: u64, out_octets: u64) -> FieldMap {
    let mut f = FieldMap::new();
    f.insert(CounterSlot::Name, RawValue::Text(name.into()));
    f.insert(CounterSlot::Descr, RawValue::Text(format!("{} description", name)));
    f.insert(CounterSlot::Alias, RawValue::Text(String::new()));
    f.insert(CounterSlot::Type, RawValue::Counter(6));
    f.insert(CounterSlot::AdminStatus, RawValue::Counter(1));
    f.insert(CounterSlot::OperStatus, RawValue::Counter(1));
    f.insert(CounterSlot::Speed, RawValue::Counter(1_000_000_000));
    f.insert(CounterSlot::HcInOctets, RawValue::Counter(in_octets));
    f.insert(CounterSlot::HcOutOctets, RawValue::Counter(out_octets));
    f.insert(CounterSlot::InErrors, RawValue::Counter(0));
    f.insert(CounterSlot::OutErrors, RawValue::Counter(0));
    f
}

pub fn with(mut fields: FieldMap, slot: CounterSlot, value: RawValue) -> FieldMap {
    fields.insert(slot, value);
    fields
}

pub fn sample(index: u32, timestamp: u64, fields: FieldMap) -> Sample {
    Sample::new(index, timestamp, fields)
}

pub fn rows(n: u32) -> BTreeMap<u32, FieldMap> {
    (1..=n)
        .map(|i| (i, iface(&format!("Gi0/{}", i), u64::from(i) * 1000, u64::from(i) * 10)))
        .collect()
}
