//! The timing loop that drives every codec through a benchmark run.

use crate::avro::{AvroCodec, SchemaCost, DEFAULT_SCHEMA};
use crate::codec::{Codec, Format, JsonCodec, MessagePackCodec, NativeCodec, XmlCodec, YamlCodec};
use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::generator::RecordGenerator;
use crate::proto::ProtobufCodec;
use crate::record::TestRecord;
use crate::report::BenchReport;
use crate::stats::{elapsed_nanos, Data, DataItem};
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Trials between progress log lines.
const PROGRESS_EVERY: usize = 100;

/// Runs trials over all seven codecs and aggregates their measurements.
///
/// Each trial happens in two phases, matching how a producer and a consumer
/// would see the data:
/// 1. Every codec encodes the record (timed) and the bytes are written to
///    `<files_dir>/<format file>` (untimed).
/// 2. Every codec reads its file back and decodes it; the read and the decode
///    are timed together.
///
/// Any failure aborts the run.
pub struct Harness {
    config: BenchConfig,
    avro: AvroCodec,
    schema: SchemaCost,
}

impl Harness {
    /// Validates `config`, loads the Avro schema (timed) and creates the files directory.
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let (avro, schema) = match &config.schema_path {
            Some(path) => AvroCodec::from_schema_file(path)?,
            None => AvroCodec::from_schema_str(DEFAULT_SCHEMA)?,
        };
        fs::create_dir_all(&config.files_dir)?;
        Ok(Self {
            config,
            avro,
            schema,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn schema_cost(&self) -> SchemaCost {
        self.schema
    }

    /// Path of the scratch file used for `format`.
    pub fn file_path(&self, format: Format) -> PathBuf {
        self.config.files_dir.join(format.file_name())
    }

    /// Runs every configured trial and returns the aggregated report.
    pub fn run(&self) -> Result<BenchReport> {
        let iterations = self.config.iterations;
        let seed = self.config.seed;
        info!(
            iterations,
            seed,
            files_dir = %self.config.files_dir.display(),
            verify = self.config.verify,
            "starting benchmark run"
        );

        // The schema is charged once to both sides of the Avro total.
        let mut totals = Data::new();
        totals[Format::Avro] =
            DataItem::new(self.schema.bytes, self.schema.nanos, self.schema.nanos);

        let started = Instant::now();
        let records = RecordGenerator::seeded(seed).take(iterations as usize);
        for (trial, record) in records.enumerate() {
            let data = self.run_trial(&record)?;
            debug!(
                trial,
                native = data[Format::Native].volume,
                xml = data[Format::Xml].volume,
                json = data[Format::Json].volume,
                protobuf = data[Format::Protobuf].volume,
                avro = data[Format::Avro].volume,
                yaml = data[Format::Yaml].volume,
                msgpack = data[Format::MessagePack].volume,
                "trial encoded sizes"
            );
            totals += data;

            if (trial + 1) % PROGRESS_EVERY == 0 {
                info!(completed = trial + 1, iterations, "progress");
            }
        }

        info!(
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "benchmark run finished"
        );
        Ok(BenchReport::new(iterations, seed, totals, self.schema))
    }

    /// Pushes one record through every codec.
    pub fn run_trial(&self, record: &TestRecord) -> Result<Data> {
        let mut data = Data::new();

        self.encode_to_file(&NativeCodec, record, &mut data)?;
        self.encode_to_file(&XmlCodec, record, &mut data)?;
        self.encode_to_file(&JsonCodec, record, &mut data)?;
        self.encode_to_file(&ProtobufCodec, record, &mut data)?;
        self.encode_to_file(&self.avro, record, &mut data)?;
        self.encode_to_file(&YamlCodec, record, &mut data)?;
        self.encode_to_file(&MessagePackCodec, record, &mut data)?;

        self.decode_from_file(&NativeCodec, record, &mut data)?;
        self.decode_from_file(&XmlCodec, record, &mut data)?;
        self.decode_from_file(&JsonCodec, record, &mut data)?;
        self.decode_from_file(&ProtobufCodec, record, &mut data)?;
        self.decode_from_file(&self.avro, record, &mut data)?;
        self.decode_from_file(&YamlCodec, record, &mut data)?;
        self.decode_from_file(&MessagePackCodec, record, &mut data)?;

        Ok(data)
    }

    fn encode_to_file<C: Codec>(
        &self,
        codec: &C,
        record: &TestRecord,
        data: &mut Data,
    ) -> Result<()> {
        let format = codec.format();
        let message = codec.prepare(record);

        let start = Instant::now();
        let bytes = codec.encode(&message)?;
        let ser_nanos = elapsed_nanos(start);

        let item = &mut data[format];
        item.ser_nanos = ser_nanos;
        item.volume = bytes.len() as u64;

        fs::write(self.file_path(format), &bytes)?;
        Ok(())
    }

    fn decode_from_file<C: Codec>(
        &self,
        codec: &C,
        record: &TestRecord,
        data: &mut Data,
    ) -> Result<()> {
        let format = codec.format();
        let path = self.file_path(format);

        let start = Instant::now();
        let bytes = fs::read(&path)?;
        let decoded = codec.decode(&bytes)?;
        data[format].de_nanos = elapsed_nanos(start);

        if self.config.verify && !codec.matches(&decoded, record) {
            return Err(Error::Mismatch { format });
        }
        black_box(decoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> BenchConfig {
        BenchConfig::default()
            .with_iterations(2)
            .with_files_dir(dir.join("files"))
            .with_report_path(None::<&str>)
            .with_verify(true)
    }

    #[test]
    fn test_new_creates_files_dir() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(config_in(dir.path())).unwrap();
        assert!(harness.config().files_dir.is_dir());
        assert!(harness.schema_cost().bytes > 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path()).with_iterations(0);
        assert!(matches!(Harness::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_trial_measures_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(config_in(dir.path())).unwrap();
        let record = RecordGenerator::seeded(1).next_record();
        let data = harness.run_trial(&record).unwrap();
        for (format, item) in data.iter() {
            assert!(item.volume > 0, "{format} wrote nothing");
            let written = fs::metadata(harness.file_path(format)).unwrap().len();
            assert_eq!(written, item.volume, "{format}");
        }
    }

    #[test]
    fn test_corrupted_file_aborts_decode() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(config_in(dir.path())).unwrap();
        let record = RecordGenerator::seeded(2).next_record();
        let mut data = Data::new();
        harness.encode_to_file(&JsonCodec, &record, &mut data).unwrap();
        fs::write(harness.file_path(Format::Json), b"[1, 2").unwrap();
        let err = harness
            .decode_from_file(&JsonCodec, &record, &mut data)
            .unwrap_err();
        assert!(matches!(err, Error::Decode { format: Format::Json, .. }));
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(config_in(dir.path())).unwrap();
        let record = RecordGenerator::seeded(3).next_record();
        let mut other = record.clone();
        other.id = other.id.wrapping_add(1);
        let mut data = Data::new();
        harness.encode_to_file(&JsonCodec, &other, &mut data).unwrap();
        let err = harness
            .decode_from_file(&JsonCodec, &record, &mut data)
            .unwrap_err();
        assert!(matches!(err, Error::Mismatch { format: Format::Json }));
    }
}
