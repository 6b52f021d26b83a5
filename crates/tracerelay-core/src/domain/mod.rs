//! Domain entities and pure business rules

pub mod errors;
pub mod host;
pub mod record;

pub use errors::{StoreError, TransportError};
pub use host::HostInfo;
pub use record::{
    is_record_filename, version_from_filename, CrashRecord, ReportPayload, RECORD_SUFFIX,
};
