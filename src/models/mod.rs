// Domain models: raw samples, counter slots, severities

mod sample;
mod slot;
mod status;

pub use sample::{FieldMap, RawValue, Sample, SampleCollection};
pub use slot::CounterSlot;
pub use status::Status;
