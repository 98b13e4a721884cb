//! Turning aggregated measurements into a console table, a spreadsheet and a CSV file.

use crate::avro::SchemaCost;
use crate::codec::Format;
use crate::error::Result;
use crate::stats::{Averages, Data, DataItem};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Name of the worksheet holding the results.
pub const SHEET_NAME: &str = "СЕРИАЛИЗАЦИЯ";

/// Spreadsheet row (1-based) of the first result row.
pub const FIRST_RESULT_ROW: u32 = 16;

/// Spreadsheet row (1-based) holding the iteration count in column C.
pub const ITERATIONS_ROW: u32 = 13;

/// Label of the Avro row that charges the schema to every message.
pub const AVRO_SCHEMA_PER_MESSAGE: &str = "Avro (schema per message)";

// Zero-based worksheet columns: B, C, D, E, then F, G, H for the averages.
const COL_LABEL: u16 = 1;
const COL_VOLUME: u16 = 2;
const COL_AVERAGES: u16 = 5;
const TOTAL_COLUMNS: [&str; 3] = ["C", "D", "E"];

/// One line of the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    pub label: &'static str,
    /// 1-based spreadsheet row this line is written to.
    pub sheet_row: u32,
    pub item: DataItem,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    format: &'a str,
    volume: u64,
    ser_nanos: u64,
    de_nanos: u64,
    avg_volume: f64,
    avg_ser_nanos: f64,
    avg_de_nanos: f64,
}

/// Totals of a finished benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub iterations: u32,
    pub seed: u64,
    pub totals: Data,
    pub schema: SchemaCost,
}

impl BenchReport {
    pub fn new(iterations: u32, seed: u64, totals: Data, schema: SchemaCost) -> Self {
        Self {
            iterations,
            seed,
            totals,
            schema,
        }
    }

    /// The eight report rows, in spreadsheet order.
    ///
    /// Avro appears twice. The plain row charges the schema once per run. The
    /// "schema per message" row charges its size and parse time to every
    /// message after the first, as if each message carried its own schema.
    /// Only volume and deserialization time grow there.
    pub fn rows(&self) -> Vec<ReportRow> {
        let mut rows = Vec::with_capacity(Format::ALL.len() + 1);
        for (format, item) in self.totals.iter() {
            rows.push((format.name(), *item));
            if format == Format::Avro {
                rows.push((AVRO_SCHEMA_PER_MESSAGE, self.avro_schema_per_message()));
            }
        }
        rows.into_iter()
            .zip(FIRST_RESULT_ROW..)
            .map(|((label, item), sheet_row)| ReportRow {
                label,
                sheet_row,
                item,
            })
            .collect()
    }

    fn avro_schema_per_message(&self) -> DataItem {
        let extra = u64::from(self.iterations.saturating_sub(1));
        let mut item = self.totals[Format::Avro];
        item.de_nanos = item
            .de_nanos
            .saturating_add(self.schema.nanos.saturating_mul(extra));
        item.volume = item
            .volume
            .saturating_add(self.schema.bytes.saturating_mul(extra));
        item
    }

    /// Writes the totals as a tab-separated table.
    pub fn write_table<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "\tVolume\tSerTime\tDeserTime")?;
        for row in self.rows() {
            writeln!(
                out,
                "{}:\t{}\t{}\t{}",
                row.label, row.item.volume, row.item.ser_nanos, row.item.de_nanos
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes totals and per-trial averages as CSV, one row per report line.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        create_parent_dir(path)?;
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.rows() {
            let Averages {
                volume,
                ser_nanos,
                de_nanos,
            } = row.item.per_trial(self.iterations);
            writer.serialize(CsvRow {
                format: row.label,
                volume: row.item.volume,
                ser_nanos: row.item.ser_nanos,
                de_nanos: row.item.de_nanos,
                avg_volume: volume,
                avg_ser_nanos: ser_nanos,
                avg_de_nanos: de_nanos,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the spreadsheet report.
    ///
    /// Totals go to columns C (volume), D (serialization ns) and E
    /// (deserialization ns) on rows 16..=23. The iteration count sits in C13,
    /// and F..H hold per-trial averages as formulas over both.
    #[cfg(feature = "xlsx")]
    pub fn write_xlsx(&self, path: impl AsRef<Path>) -> Result<()> {
        use rust_xlsxwriter::{Format as CellFormat, Workbook};

        let path = path.as_ref();
        create_parent_dir(path)?;

        let mut workbook = Workbook::new();
        let bold = CellFormat::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        sheet.set_column_width(COL_LABEL, 28)?;

        let iterations_row = ITERATIONS_ROW - 1;
        sheet.write_string_with_format(iterations_row, COL_LABEL, "Iterations", &bold)?;
        sheet.write_number(iterations_row, COL_VOLUME, f64::from(self.iterations))?;
        sheet.write_string_with_format(iterations_row + 1, COL_LABEL, "Seed", &bold)?;
        sheet.write_number(iterations_row + 1, COL_VOLUME, self.seed as f64)?;

        let header_row = FIRST_RESULT_ROW - 2;
        let headers = [
            "Format",
            "Volume (bytes)",
            "Serialization (ns)",
            "Deserialization (ns)",
            "Avg volume",
            "Avg serialization",
            "Avg deserialization",
        ];
        for (col, header) in (COL_LABEL..).zip(headers) {
            sheet.write_string_with_format(header_row, col, header, &bold)?;
        }

        for row in self.rows() {
            let r = row.sheet_row - 1;
            sheet.write_string(r, COL_LABEL, row.label)?;
            let totals = [row.item.volume, row.item.ser_nanos, row.item.de_nanos];
            for (col, value) in (COL_VOLUME..).zip(totals) {
                sheet.write_number(r, col, value as f64)?;
            }
            for (col, total_col) in (COL_AVERAGES..).zip(TOTAL_COLUMNS) {
                let formula = format!("={total_col}{}/$C${ITERATIONS_ROW}", row.sheet_row);
                sheet.write_formula(r, col, formula.as_str())?;
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BenchReport {
        let mut totals = Data::new();
        for (i, format) in Format::ALL.iter().enumerate() {
            let n = i as u64 + 1;
            totals[*format] = DataItem::new(n * 100, n * 10, n * 20);
        }
        BenchReport::new(
            10,
            696969,
            totals,
            SchemaCost {
                bytes: 50,
                nanos: 7,
            },
        )
    }

    #[test]
    fn test_rows_layout() {
        let rows = sample_report().rows();
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "Native",
                "XML",
                "JSON",
                "Protobuf",
                "Avro",
                AVRO_SCHEMA_PER_MESSAGE,
                "YAML",
                "MessagePack"
            ]
        );
        let sheet_rows: Vec<_> = rows.iter().map(|r| r.sheet_row).collect();
        assert_eq!(sheet_rows, (16..=23).collect::<Vec<_>>());
    }

    #[test]
    fn test_schema_per_message_row() {
        let report = sample_report();
        let rows = report.rows();
        let avro = rows[4].item;
        let per_message = rows[5].item;
        assert_eq!(avro, DataItem::new(500, 50, 100));
        // 9 extra schema charges: volume and deserialization only.
        assert_eq!(per_message.volume, 500 + 9 * 50);
        assert_eq!(per_message.de_nanos, 100 + 9 * 7);
        assert_eq!(per_message.ser_nanos, 50);
    }

    #[test]
    fn test_single_iteration_adds_no_schema_charge() {
        let mut report = sample_report();
        report.iterations = 1;
        let rows = report.rows();
        assert_eq!(rows[4].item, rows[5].item);
    }

    #[test]
    fn test_write_table() {
        let mut out = Vec::new();
        sample_report().write_table(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "\tVolume\tSerTime\tDeserTime");
        assert_eq!(lines[1], "Native:\t100\t10\t20");
        assert_eq!(lines[3], "JSON:\t300\t30\t60");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.csv");
        sample_report().write_csv(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "format");
        assert_eq!(&headers[4], "avg_volume");
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 8);
        assert_eq!(&records[0][0], "Native");
        assert_eq!(&records[0][1], "100");
        assert_eq!(&records[0][4], "10.0");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_write_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report").join("report.xlsx");
        sample_report().write_xlsx(&path).unwrap();

        let workbook = read_xlsx_part(&path, "xl/workbook.xml");
        assert!(workbook.contains(&format!("name=\"{SHEET_NAME}\"")));

        let sheet = read_xlsx_part(&path, "xl/worksheets/sheet1.xml");
        assert_eq!(cell_value(&sheet, "C13"), "10");
        assert_eq!(cell_value(&sheet, "C14"), "696969");

        // Native
        assert_eq!(cell_value(&sheet, "C16"), "100");
        assert_eq!(cell_value(&sheet, "D16"), "10");
        assert_eq!(cell_value(&sheet, "E16"), "20");
        // Avro, then Avro with 9 extra schema charges on volume and deserialization
        assert_eq!(cell_value(&sheet, "C20"), "500");
        assert_eq!(cell_value(&sheet, "C21"), "950");
        assert_eq!(cell_value(&sheet, "D21"), "50");
        assert_eq!(cell_value(&sheet, "E21"), "163");
        // MessagePack
        assert_eq!(cell_value(&sheet, "C23"), "700");
        assert!(!sheet.contains("r=\"C24\""));

        assert_eq!(cell_formula(&sheet, "F16"), "C16/$C$13");
        assert_eq!(cell_formula(&sheet, "G21"), "D21/$C$13");
        assert_eq!(cell_formula(&sheet, "H23"), "E23/$C$13");
    }

    #[cfg(feature = "xlsx")]
    fn read_xlsx_part(path: &Path, name: &str) -> String {
        use std::io::Read;

        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    /// The XML of the `<c>` element for `cell`.
    #[cfg(feature = "xlsx")]
    fn cell_xml<'a>(sheet: &'a str, cell: &str) -> &'a str {
        let start = sheet
            .find(&format!("<c r=\"{cell}\""))
            .unwrap_or_else(|| panic!("no cell {cell}"));
        let rest = &sheet[start..];
        let end = rest.find("</c>").unwrap_or_else(|| panic!("unclosed cell {cell}"));
        &rest[..end]
    }

    #[cfg(feature = "xlsx")]
    fn cell_tag<'a>(sheet: &'a str, cell: &str, tag: &str) -> &'a str {
        let xml = cell_xml(sheet, cell);
        let open = format!("<{tag}>");
        let start = xml.find(&open).unwrap_or_else(|| panic!("no <{tag}> in {cell}")) + open.len();
        let end = xml[start..].find(&format!("</{tag}>")).unwrap() + start;
        &xml[start..end]
    }

    #[cfg(feature = "xlsx")]
    fn cell_value<'a>(sheet: &'a str, cell: &str) -> &'a str {
        cell_tag(sheet, cell, "v")
    }

    #[cfg(feature = "xlsx")]
    fn cell_formula<'a>(sheet: &'a str, cell: &str) -> &'a str {
        cell_tag(sheet, cell, "f")
    }
}
