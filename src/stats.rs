//! Per-format measurements and their aggregation across trials.

use crate::codec::Format;
use std::ops::{AddAssign, Index, IndexMut};
use std::time::Instant;

/// Byte volume, serialization time and deserialization time for one format.
///
/// Within a trial this holds a single measurement; in a run total it holds
/// the component-wise sum over all trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataItem {
    /// Encoded size in bytes.
    pub volume: u64,
    /// Encode time in nanoseconds.
    pub ser_nanos: u64,
    /// Read-and-decode time in nanoseconds.
    pub de_nanos: u64,
}

/// A [`DataItem`] divided by the number of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages {
    pub volume: f64,
    pub ser_nanos: f64,
    pub de_nanos: f64,
}

impl DataItem {
    pub fn new(volume: u64, ser_nanos: u64, de_nanos: u64) -> Self {
        Self {
            volume,
            ser_nanos,
            de_nanos,
        }
    }

    /// Averages over `iterations` trials. Zero iterations yields zeros.
    pub fn per_trial(&self, iterations: u32) -> Averages {
        if iterations == 0 {
            return Averages {
                volume: 0.0,
                ser_nanos: 0.0,
                de_nanos: 0.0,
            };
        }
        let n = f64::from(iterations);
        Averages {
            volume: self.volume as f64 / n,
            ser_nanos: self.ser_nanos as f64 / n,
            de_nanos: self.de_nanos as f64 / n,
        }
    }
}

impl AddAssign for DataItem {
    fn add_assign(&mut self, rhs: Self) {
        self.volume = self.volume.saturating_add(rhs.volume);
        self.ser_nanos = self.ser_nanos.saturating_add(rhs.ser_nanos);
        self.de_nanos = self.de_nanos.saturating_add(rhs.de_nanos);
    }
}

/// One [`DataItem`] per [`Format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Data {
    items: [DataItem; Format::ALL.len()],
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates `(format, item)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Format, &DataItem)> + '_ {
        Format::ALL.iter().copied().zip(self.items.iter())
    }
}

impl Index<Format> for Data {
    type Output = DataItem;

    fn index(&self, format: Format) -> &DataItem {
        &self.items[format.index()]
    }
}

impl IndexMut<Format> for Data {
    fn index_mut(&mut self, format: Format) -> &mut DataItem {
        &mut self.items[format.index()]
    }
}

impl AddAssign for Data {
    fn add_assign(&mut self, rhs: Self) {
        for (left, right) in self.items.iter_mut().zip(rhs.items) {
            *left += right;
        }
    }
}

/// Nanoseconds elapsed since `start`, saturating at `u64::MAX`.
pub(crate) fn elapsed_nanos(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_item_add_assign() {
        let mut total = DataItem::new(10, 20, 30);
        total += DataItem::new(1, 2, 3);
        assert_eq!(total, DataItem::new(11, 22, 33));
    }

    #[test]
    fn test_data_item_add_saturates() {
        let mut total = DataItem::new(u64::MAX, 0, 0);
        total += DataItem::new(1, 1, 1);
        assert_eq!(total, DataItem::new(u64::MAX, 1, 1));
    }

    #[test]
    fn test_per_trial_average() {
        let averages = DataItem::new(1000, 500, 250).per_trial(4);
        assert_eq!(averages.volume, 250.0);
        assert_eq!(averages.ser_nanos, 125.0);
        assert_eq!(averages.de_nanos, 62.5);
    }

    #[test]
    fn test_per_trial_zero_iterations() {
        let averages = DataItem::new(1000, 500, 250).per_trial(0);
        assert_eq!(averages.volume, 0.0);
    }

    #[test]
    fn test_data_add_is_per_format() {
        let mut total = Data::new();
        let mut trial = Data::new();
        trial[Format::Json] = DataItem::new(5, 6, 7);
        trial[Format::Avro] = DataItem::new(1, 1, 1);
        total += trial;
        total += trial;
        assert_eq!(total[Format::Json], DataItem::new(10, 12, 14));
        assert_eq!(total[Format::Avro], DataItem::new(2, 2, 2));
        assert_eq!(total[Format::Native], DataItem::default());
    }

    #[test]
    fn test_iter_follows_report_order() {
        let data = Data::new();
        let formats: Vec<_> = data.iter().map(|(f, _)| f).collect();
        assert_eq!(formats, Format::ALL.to_vec());
    }
}
