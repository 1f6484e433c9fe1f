// Named counter slots of one interface row

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// One readable column of the interface table (IF-MIB ifTable / ifXTable).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
#[serde(rename_all = "snake_case")]
pub enum CounterSlot {
    Name,
    Descr,
    Alias,
    Type,
    AdminStatus,
    OperStatus,
    Speed,
    HighSpeed,
    InOctets,
    OutOctets,
    HcInOctets,
    HcOutOctets,
    InUcastPkts,
    OutUcastPkts,
    HcInUcastPkts,
    HcOutUcastPkts,
    InErrors,
    OutErrors,
    InDiscards,
    OutDiscards,
    Promiscuous,
    CounterDiscontinuityTime,
}

impl CounterSlot {
    pub const ALL: [CounterSlot; 22] = [
        CounterSlot::Name,
        CounterSlot::Descr,
        CounterSlot::Alias,
        CounterSlot::Type,
        CounterSlot::AdminStatus,
        CounterSlot::OperStatus,
        CounterSlot::Speed,
        CounterSlot::HighSpeed,
        CounterSlot::InOctets,
        CounterSlot::OutOctets,
        CounterSlot::HcInOctets,
        CounterSlot::HcOutOctets,
        CounterSlot::InUcastPkts,
        CounterSlot::OutUcastPkts,
        CounterSlot::HcInUcastPkts,
        CounterSlot::HcOutUcastPkts,
        CounterSlot::InErrors,
        CounterSlot::OutErrors,
        CounterSlot::InDiscards,
        CounterSlot::OutDiscards,
        CounterSlot::Promiscuous,
        CounterSlot::CounterDiscontinuityTime,
    ];

    /// Snake-case key, as used in snapshot files and log fields.
    pub fn key(self) -> &'static str {
        match self {
            CounterSlot::Name => "name",
            CounterSlot::Descr => "descr",
            CounterSlot::Alias => "alias",
            CounterSlot::Type => "type",
            CounterSlot::AdminStatus => "admin_status",
            CounterSlot::OperStatus => "oper_status",
            CounterSlot::Speed => "speed",
            CounterSlot::HighSpeed => "high_speed",
            CounterSlot::InOctets => "in_octets",
            CounterSlot::OutOctets => "out_octets",
            CounterSlot::HcInOctets => "hc_in_octets",
            CounterSlot::HcOutOctets => "hc_out_octets",
            CounterSlot::InUcastPkts => "in_ucast_pkts",
            CounterSlot::OutUcastPkts => "out_ucast_pkts",
            CounterSlot::HcInUcastPkts => "hc_in_ucast_pkts",
            CounterSlot::HcOutUcastPkts => "hc_out_ucast_pkts",
            CounterSlot::InErrors => "in_errors",
            CounterSlot::OutErrors => "out_errors",
            CounterSlot::InDiscards => "in_discards",
            CounterSlot::OutDiscards => "out_discards",
            CounterSlot::Promiscuous => "promiscuous",
            CounterSlot::CounterDiscontinuityTime => "counter_discontinuity_time",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    /// Display strings; everything else is numeric and must parse as an integer.
    pub fn is_text(self) -> bool {
        matches!(self, CounterSlot::Name | CounterSlot::Descr | CounterSlot::Alias)
    }
}

impl std::fmt::Display for CounterSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
