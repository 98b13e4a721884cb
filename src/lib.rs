//! # codec-bench
//!
//! A size and speed comparison of serialization formats over one randomly
//! generated record.
//!
//! ## Overview
//!
//! Each trial generates a fresh [`TestRecord`] and pushes it through seven
//! codecs: native binary (`bincode`), XML, JSON, Protocol Buffers, Avro, YAML
//! and MessagePack. For every codec the harness records the encoded size, the
//! encode time, and the time to read the bytes back from disk and decode them.
//! Results are summed over all trials and written out as a table, a
//! spreadsheet and optionally a CSV file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codec_bench::{BenchConfig, Harness, Result};
//!
//! fn main() -> Result<()> {
//!     let config = BenchConfig::default()
//!         .with_iterations(100)
//!         .with_csv_path(Some("report/report.csv"));
//!     let harness = Harness::new(config)?;
//!     let report = harness.run()?;
//!
//!     report.write_table(std::io::stdout())?;
//!     if let Some(path) = &harness.config().csv_path {
//!         report.write_csv(path)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`Codec`**: one implementation per format; encode and decode a prepared message
//! * **`RecordGenerator`**: seeded source of test records
//! * **`Harness`**: the timing loop, aggregating into [`Data`]
//! * **`BenchReport`**: table, spreadsheet and CSV output

pub mod avro;
pub mod codec;
pub mod config;
pub mod error;
pub mod generator;
pub mod harness;
pub mod proto;
pub mod record;
pub mod report;
pub mod stats;

// Re-export the main public API for user convenience.
pub use avro::{AvroCodec, SchemaCost};
pub use codec::{Codec, Format, JsonCodec, MessagePackCodec, NativeCodec, XmlCodec, YamlCodec};
pub use config::BenchConfig;
pub use error::{Error, Result};
pub use generator::RecordGenerator;
pub use harness::Harness;
pub use proto::{ProtoRecord, ProtobufCodec};
pub use record::{TestEntry, TestRecord};
pub use report::{BenchReport, ReportRow};
pub use stats::{Data, DataItem};
