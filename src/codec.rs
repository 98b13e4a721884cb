//! Defines the `Codec` trait and the serde-backed codecs.
//!
//! Protobuf and Avro need their own message type and schema respectively, so
//! they live in [`crate::proto`] and [`crate::avro`].

use crate::error::{Error, Result};
use crate::record::TestRecord;
use std::fmt;

/// A serialization format under test, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Native,
    Xml,
    Json,
    Protobuf,
    Avro,
    Yaml,
    MessagePack,
}

impl Format {
    /// Every format, in the order they are measured and reported.
    pub const ALL: [Format; 7] = [
        Format::Native,
        Format::Xml,
        Format::Json,
        Format::Protobuf,
        Format::Avro,
        Format::Yaml,
        Format::MessagePack,
    ];

    /// Position of this format within [`Format::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Format::Native => "Native",
            Format::Xml => "XML",
            Format::Json => "JSON",
            Format::Protobuf => "Protobuf",
            Format::Avro => "Avro",
            Format::Yaml => "YAML",
            Format::MessagePack => "MessagePack",
        }
    }

    /// Name of the scratch file the encoded bytes are written to.
    pub const fn file_name(self) -> &'static str {
        match self {
            Format::Native => "native.bin",
            Format::Xml => "record.xml",
            Format::Json => "record.json",
            Format::Protobuf => "record.pb",
            Format::Avro => "record.avro",
            Format::Yaml => "record.yaml",
            Format::MessagePack => "record.msgpack",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A trait that defines how one format encodes and decodes a record.
///
/// `Message` is the in-memory value handed to the underlying library. It is
/// built from the source record outside the timed region, so the timings
/// cover only the library calls.
pub trait Codec {
    type Message: for<'a> From<&'a TestRecord> + PartialEq;

    fn format(&self) -> Format;

    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Message>;

    /// Builds the library-specific message for `record`.
    fn prepare(&self, record: &TestRecord) -> Self::Message {
        Self::Message::from(record)
    }

    /// Whether `decoded` carries the same data as `record`.
    fn matches(&self, decoded: &Self::Message, record: &TestRecord) -> bool {
        *decoded == self.prepare(record)
    }
}

impl From<&TestRecord> for TestRecord {
    fn from(record: &TestRecord) -> Self {
        record.clone()
    }
}

/// Native Rust binary encoding via `bincode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl Codec for NativeCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::Native
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        bincode::serialize(message).map_err(|e| Error::encode(Format::Native, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        bincode::deserialize(bytes).map_err(|e| Error::decode(Format::Native, e))
    }
}

/// XML via `quick-xml`'s serde support.
///
/// The root element is `TestRecord`; `dict` keys become element names, which
/// is why generated keys are never empty and never start with a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::Xml
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        quick_xml::se::to_string(message)
            .map(String::into_bytes)
            .map_err(|e| Error::encode(Format::Xml, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::decode(Format::Xml, e))?;
        quick_xml::de::from_str(text).map_err(|e| Error::decode(Format::Xml, e))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        serde_json::to_vec(message).map_err(|e| Error::encode(Format::Json, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        serde_json::from_slice(bytes).map_err(|e| Error::decode(Format::Json, e))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::Yaml
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        serde_yaml::to_string(message)
            .map(String::into_bytes)
            .map_err(|e| Error::encode(Format::Yaml, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        serde_yaml::from_slice(bytes).map_err(|e| Error::decode(Format::Yaml, e))
    }
}

/// MessagePack via `rmp-serde`, with structs written as field-name maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackCodec;

impl Codec for MessagePackCodec {
    type Message = TestRecord;

    fn format(&self) -> Format {
        Format::MessagePack
    }

    fn encode(&self, message: &TestRecord) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(message).map_err(|e| Error::encode(Format::MessagePack, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<TestRecord> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::decode(Format::MessagePack, e))
    }
}
