//! Batch buffer assembly and destinations
//!
//! A batch is one immutable buffer: the destination's constant header row,
//! a newline, then the pre-serialized records concatenated in order. Records
//! arrive already CSV-encoded with their own trailing newline; this module
//! never inspects them.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Header row for the operations destination
pub const OPERATIONS_FIELDS: &str =
    "target,timestamp,expires_at,hash,ok,errors,duration,client_name,client_version";

/// Header row for the operation registry destination
pub const REGISTRY_FIELDS: &str =
    "target,hash,name,body,operation_kind,coordinates,total,timestamp,expires_at";

/// Telemetry batch destinations
///
/// The destination table name is a property of the batch, not of the store
/// it is written to: every store (primary, mirror, fallback) receives the
/// same table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Per-operation usage samples
    Operations,
    /// Collected operation documents
    Registry,
}

impl Destination {
    /// Store table this destination maps to
    pub fn table(&self) -> &'static str {
        match self {
            Destination::Operations => "operations",
            Destination::Registry => "operation_collection",
        }
    }

    /// Constant header row for this destination
    pub fn fields(&self) -> &'static str {
        match self {
            Destination::Operations => OPERATIONS_FIELDS,
            Destination::Registry => REGISTRY_FIELDS,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Concatenate the header row and records into one immutable buffer
pub fn assemble(destination: Destination, records: &[Bytes]) -> Bytes {
    let fields = destination.fields();
    let record_len: usize = records.iter().map(Bytes::len).sum();

    let mut buffer = BytesMut::with_capacity(fields.len() + 1 + record_len);
    buffer.put_slice(fields.as_bytes());
    buffer.put_u8(b'\n');
    for record in records {
        buffer.put_slice(record);
    }

    buffer.freeze()
}

#[cfg(test)]
#[path = "serializer_test.rs"]
mod serializer_test;
