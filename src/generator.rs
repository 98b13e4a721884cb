//! Seeded random generation of [`TestRecord`] values.
//!
//! Every trial of a benchmark run pushes one freshly generated record through
//! all codecs. The distributions are deliberately simple: the goal is a record
//! with a realistic mix of integers, floats, short mixed-script strings, nested
//! entries and a string-keyed map, not a statistically interesting workload.

use crate::record::{TestEntry, TestRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Upper bound (exclusive) for the length of each generated collection.
pub const MAX_COLLECTION_LEN: usize = 256;

/// Number of key/value draws used to fill [`TestRecord::dict`].
pub const DICT_DRAWS: usize = 256;

/// Upper bound (exclusive) for the length of each generated string, in characters.
pub const MAX_STRING_LEN: usize = 32;

/// Characters strings are built from: Latin letters, digits and Cyrillic letters.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789\
абвгдеёжзийклмнопрстуфхцчшщъыьэюяАБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Produces random [`TestRecord`]s from any `rand::Rng`.
///
/// ```rust
/// use codec_bench::RecordGenerator;
///
/// let mut a = RecordGenerator::seeded(7);
/// let mut b = RecordGenerator::seeded(7);
/// assert_eq!(a.next_record(), b.next_record());
/// ```
pub struct RecordGenerator<R: Rng> {
    rng: R,
    alphabet: Vec<char>,
}

impl RecordGenerator<StdRng> {
    /// Creates a deterministic generator: the same seed yields the same records.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecordGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            alphabet: ALPHABET.chars().collect(),
        }
    }

    /// Generates the next record.
    pub fn next_record(&mut self) -> TestRecord {
        let service_ids = (0..self.collection_len())
            .map(|_| self.signed_i32())
            .collect();

        let tests = (0..self.collection_len())
            .map(|_| TestEntry {
                rty: self.string(0),
                ott: i64::from(self.signed_i32()),
            })
            .collect();

        let flts = (0..self.collection_len())
            .map(|_| self.signed_f64())
            .collect();

        // Duplicate keys overwrite, so the map can end up smaller than DICT_DRAWS.
        let mut dict = HashMap::with_capacity(DICT_DRAWS);
        for _ in 0..DICT_DRAWS {
            let key = self.string(1);
            let value = self.signed_i32();
            dict.insert(key, value);
        }

        TestRecord {
            id: self.signed_i32(),
            name: self.string(0),
            service_ids,
            tests,
            flts,
            dict,
            very_long_name_for_small_variable: self.signed_f32(),
        }
    }

    fn collection_len(&mut self) -> usize {
        self.rng.gen_range(0..MAX_COLLECTION_LEN)
    }

    fn negate_half(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Uniform in `[0, i32::MAX]`, negated half of the time.
    fn signed_i32(&mut self) -> i32 {
        let n = self.rng.gen_range(0..=i32::MAX);
        if self.negate_half() {
            -n
        } else {
            n
        }
    }

    /// Uniform in `[0, 1)`, negated half of the time.
    fn signed_f64(&mut self) -> f64 {
        let n: f64 = self.rng.gen();
        if self.negate_half() {
            -n
        } else {
            n
        }
    }

    fn signed_f32(&mut self) -> f32 {
        let n: f32 = self.rng.gen();
        if self.negate_half() {
            -n
        } else {
            n
        }
    }

    /// A string of `[min_len, MAX_STRING_LEN)` characters whose first
    /// character is never an ASCII digit.
    fn string(&mut self, min_len: usize) -> String {
        let len = self.rng.gen_range(min_len..MAX_STRING_LEN);
        let mut s = String::with_capacity(len * 2);
        for i in 0..len {
            let mut c = self.pick_char();
            while i == 0 && c.is_ascii_digit() {
                c = self.pick_char();
            }
            s.push(c);
        }
        s
    }

    fn pick_char(&mut self) -> char {
        self.alphabet[self.rng.gen_range(0..self.alphabet.len())]
    }
}

impl<R: Rng> Iterator for RecordGenerator<R> {
    type Item = TestRecord;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_record())
    }
}
