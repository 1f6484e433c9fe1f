// Counter source capability: the device-side view of the interface table.
// Calls are blocking; the worker pool gives each connection its own thread.

mod snapshot;

pub use snapshot::{SnapshotConnection, SnapshotSource};

use crate::error::Result;
use crate::models::FieldMap;

/// Opens independent connections to one device.
pub trait CounterSource: Send + Sync + 'static {
    type Connection: SourceConnection;

    /// Fails with `CheckError::Connection` if the device is unreachable.
    fn connect(&self) -> Result<Self::Connection>;
}

pub trait SourceConnection: Send + 'static {
    /// Interface indexes currently present on the device.
    fn interface_indexes(&mut self) -> Result<Vec<u32>>;

    /// Raw readings for one interface; absent objects come back as `NotPresent`.
    fn fetch(&mut self, index: u32) -> Result<FieldMap>;

    fn close(&mut self) {}
}
