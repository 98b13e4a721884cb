//! Avro codec and schema loading.
//!
//! Records are written as bare Avro datums (no object container header), so
//! the encoded size is the payload alone. The schema cost is tracked apart
//! through [`SchemaCost`] and charged in the report.

use crate::codec::{Codec, Format};
use crate::error::{Error, Result};
use crate::record::TestRecord;
use crate::stats::elapsed_nanos;
use apache_avro::Schema;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// The schema shipped with the crate, matching [`TestRecord`].
///
/// Loading it costs only the parse. A schema passed by path also pays for the
/// file read, so default Avro timings are not comparable with runs that read
/// `schema.avsc` from disk.
pub const DEFAULT_SCHEMA: &str = include_str!("../schema.avsc");

/// Size and load time of the Avro schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaCost {
    /// Length of the schema text in bytes.
    pub bytes: u64,
    /// Wall-clock nanoseconds spent reading (when loaded from disk) and parsing it.
    pub nanos: u64,
}

#[derive(Debug, Clone)]
pub struct AvroCodec {
    schema: Schema,
}

impl AvroCodec {
    /// Parses `schema_json` and times the parse.
    pub fn from_schema_str(schema_json: &str) -> Result<(Self, SchemaCost)> {
        let start = Instant::now();
        let schema = Self::parse(schema_json)?;
        let cost = SchemaCost {
            bytes: schema_json.len() as u64,
            nanos: elapsed_nanos(start),
        };
        debug!(bytes = cost.bytes, nanos = cost.nanos, "parsed embedded Avro schema");
        Ok((Self { schema }, cost))
    }

    /// Reads and parses the schema at `path`; the read is part of the timed cost.
    pub fn from_schema_file(path: impl AsRef<Path>) -> Result<(Self, SchemaCost)> {
        let path = path.as_ref();
        let start = Instant::now();
        let schema_json = std::fs::read_to_string(path)?;
        let schema = Self::parse(&schema_json)?;
        let cost = SchemaCost {
            bytes: schema_json.len() as u64,
            nanos: elapsed_nanos(start),
        };
        debug!(
            path = %path.display(),
            bytes = cost.bytes,
            nanos = cost.nanos,
            "loaded Avro schema"
        );
        Ok((Self { schema }, cost))
    }

    fn parse(schema_json: &str) -> Result<Schema> {
        Schema::parse_str(schema_json).map_err(|e| Error::Schema(e.to_string()))
    }
}

impl Codec for AvroCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::Avro
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        let value = apache_avro::to_value(message).map_err(|e| Error::encode(Format::Avro, e))?;
        apache_avro::to_avro_datum(&self.schema, value).map_err(|e| Error::encode(Format::Avro, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        let mut reader = bytes;
        let value = apache_avro::from_avro_datum(&self.schema, &mut reader, None)
            .map_err(|e| Error::decode(Format::Avro, e))?;
        apache_avro::from_value(&value).map_err(|e| Error::decode(Format::Avro, e))
    }
}
