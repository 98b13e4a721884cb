//! Protocol Buffers codec.
//!
//! The message types are declared with `prost` derives instead of being
//! generated at build time. The equivalent `.proto` definition is:
//!
//! ```text
//! syntax = "proto3";
//!
//! message TestRecord {
//!   message Entry {
//!     string rty = 1;
//!     int64 ott = 2;
//!   }
//!   int32 id = 1;
//!   string name = 2;
//!   repeated int32 service_ids = 3;
//!   repeated Entry tests = 4;
//!   repeated double flts = 5;
//!   map<string, int32> dict = 6;
//!   float very_long_name_for_small_variable = 7;
//! }
//! ```

use crate::codec::{Codec, Format};
use crate::error::{Error, Result};
use crate::record::{TestEntry, TestRecord};
use prost::Message;
use std::collections::HashMap;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoEntry {
    #[prost(string, tag = "1")]
    pub rty: String,
    #[prost(int64, tag = "2")]
    pub ott: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRecord {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, repeated, tag = "3")]
    pub service_ids: Vec<i32>,
    #[prost(message, repeated, tag = "4")]
    pub tests: Vec<ProtoEntry>,
    #[prost(double, repeated, tag = "5")]
    pub flts: Vec<f64>,
    #[prost(map = "string, int32", tag = "6")]
    pub dict: HashMap<String, i32>,
    #[prost(float, tag = "7")]
    pub very_long_name_for_small_variable: f32,
}

impl From<&TestRecord> for ProtoRecord {
    fn from(record: &TestRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            service_ids: record.service_ids.clone(),
            tests: record
                .tests
                .iter()
                .map(|entry| ProtoEntry {
                    rty: entry.rty.clone(),
                    ott: entry.ott,
                })
                .collect(),
            flts: record.flts.clone(),
            dict: record.dict.clone(),
            very_long_name_for_small_variable: record.very_long_name_for_small_variable,
        }
    }
}

impl From<ProtoRecord> for TestRecord {
    fn from(message: ProtoRecord) -> Self {
        Self {
            id: message.id,
            name: message.name,
            service_ids: message.service_ids,
            tests: message
                .tests
                .into_iter()
                .map(|entry| TestEntry {
                    rty: entry.rty,
                    ott: entry.ott,
                })
                .collect(),
            flts: message.flts,
            dict: message.dict,
            very_long_name_for_small_variable: message.very_long_name_for_small_variable,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl Codec for ProtobufCodec {
    type Message = ProtoRecord;

    fn format(&self) -> Format {
        Format::Protobuf
    }

    fn encode(&self, message: &ProtoRecord) -> Result<Vec<u8>> {
        Ok(message.encode_to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<ProtoRecord> {
        ProtoRecord::decode(bytes).map_err(|e| Error::decode(Format::Protobuf, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::RecordGenerator;

    #[test]
    fn test_protobuf_roundtrip_generated() {
        let record = RecordGenerator::seeded(5).next_record();
        let codec = ProtobufCodec;
        let message = codec.prepare(&record);
        let bytes = codec.encode(&message).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert!(codec.matches(&decoded, &record));
        assert_eq!(TestRecord::from(decoded), record);
    }

    #[test]
    fn test_default_record_encodes_to_nothing() {
        // proto3 omits fields that hold their default value.
        let bytes = ProtobufCodec
            .encode(&ProtoRecord::from(&TestRecord::default()))
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_truncated_input_is_decode_error() {
        let record = RecordGenerator::seeded(9).next_record();
        let bytes = ProtobufCodec.encode(&ProtoRecord::from(&record)).unwrap();
        // Field 7 (a fixed32 float) is written last; cutting a byte splits it.
        let err = ProtobufCodec.decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                format: Format::Protobuf,
                ..
            }
        ));
    }
}
