//! Predefined marker dictionaries
//!
//! A dictionary is a grid size (bits per side) plus a capacity, backed by the
//! OpenCV ArUco codeword tables embedded in `calib_targets_aruco`. Codewords
//! are packed row-major with bit `row * N + col` set for a black cell, so a
//! generated marker is detected by any OpenCV-compatible ArUco detector.

use calib_targets_aruco::builtins::builtin_dictionary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predefined marker dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dictionary {
    name: &'static str,
    marker_size: u32,
    capacity: u32,
}

impl Dictionary {
    pub const DICT_4X4_50: Self = Self::new("DICT_4X4_50", 4, 50);
    pub const DICT_4X4_100: Self = Self::new("DICT_4X4_100", 4, 100);
    pub const DICT_4X4_250: Self = Self::new("DICT_4X4_250", 4, 250);
    pub const DICT_4X4_1000: Self = Self::new("DICT_4X4_1000", 4, 1000);
    pub const DICT_5X5_50: Self = Self::new("DICT_5X5_50", 5, 50);
    pub const DICT_5X5_100: Self = Self::new("DICT_5X5_100", 5, 100);
    pub const DICT_5X5_250: Self = Self::new("DICT_5X5_250", 5, 250);
    pub const DICT_5X5_1000: Self = Self::new("DICT_5X5_1000", 5, 1000);
    pub const DICT_6X6_50: Self = Self::new("DICT_6X6_50", 6, 50);
    pub const DICT_6X6_100: Self = Self::new("DICT_6X6_100", 6, 100);
    pub const DICT_6X6_250: Self = Self::new("DICT_6X6_250", 6, 250);
    pub const DICT_6X6_1000: Self = Self::new("DICT_6X6_1000", 6, 1000);
    pub const DICT_7X7_50: Self = Self::new("DICT_7X7_50", 7, 50);
    pub const DICT_7X7_100: Self = Self::new("DICT_7X7_100", 7, 100);
    pub const DICT_7X7_250: Self = Self::new("DICT_7X7_250", 7, 250);
    pub const DICT_7X7_1000: Self = Self::new("DICT_7X7_1000", 7, 1000);

    const fn new(name: &'static str, marker_size: u32, capacity: u32) -> Self {
        Self {
            name,
            marker_size,
            capacity,
        }
    }

    /// OpenCV name of the dictionary, e.g. `DICT_6X6_250`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of data bits per marker side (excluding the border)
    pub fn marker_size(&self) -> u32 {
        self.marker_size
    }

    /// Number of markers in this dictionary
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn bit_count(&self) -> u32 {
        self.marker_size * self.marker_size
    }

    /// The embedded codeword table (black = 1), empty if the name is unknown
    pub fn codewords(&self) -> &'static [u64] {
        builtin_dictionary(self.name)
            .map(|table| table.codes())
            .unwrap_or(&[])
    }

    /// Get the codeword for a marker id, or None if the id is out of range
    pub fn codeword(&self, id: u32) -> Option<u64> {
        if id >= self.capacity {
            return None;
        }
        self.codewords().get(id as usize).copied()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const ARUCO_SET: &[(&str, Dictionary)] = &[
    ("4x4", Dictionary::DICT_4X4_1000),
    ("5x5", Dictionary::DICT_5X5_1000),
    ("6x6", Dictionary::DICT_6X6_1000),
    ("7x7", Dictionary::DICT_7X7_1000),
];

const EXTENDED_SET: &[(&str, Dictionary)] = &[
    ("DICT_4X4_50", Dictionary::DICT_4X4_50),
    ("DICT_4X4_100", Dictionary::DICT_4X4_100),
    ("DICT_4X4_250", Dictionary::DICT_4X4_250),
    ("DICT_4X4_1000", Dictionary::DICT_4X4_1000),
    ("DICT_5X5_50", Dictionary::DICT_5X5_50),
    ("DICT_5X5_100", Dictionary::DICT_5X5_100),
    ("DICT_5X5_250", Dictionary::DICT_5X5_250),
    ("DICT_5X5_1000", Dictionary::DICT_5X5_1000),
    ("DICT_6X6_50", Dictionary::DICT_6X6_50),
    ("DICT_6X6_100", Dictionary::DICT_6X6_100),
    ("DICT_6X6_250", Dictionary::DICT_6X6_250),
    ("DICT_6X6_1000", Dictionary::DICT_6X6_1000),
    ("DICT_7X7_50", Dictionary::DICT_7X7_50),
    ("DICT_7X7_100", Dictionary::DICT_7X7_100),
    ("DICT_7X7_250", Dictionary::DICT_7X7_250),
    ("DICT_7X7_1000", Dictionary::DICT_7X7_1000),
];

/// The enumeration of dictionary identifiers accepted on the command line
///
/// The set also fixes the prefix of generated marker names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionarySet {
    /// `4x4` .. `7x7`, each the 1000-marker dictionary of that size
    #[default]
    Aruco,
    /// Full `DICT_NXN_CAP` identifiers
    Extended,
}

impl DictionarySet {
    fn entries(&self) -> &'static [(&'static str, Dictionary)] {
        match self {
            DictionarySet::Aruco => ARUCO_SET,
            DictionarySet::Extended => EXTENDED_SET,
        }
    }

    /// Resolve an identifier to its canonical spelling and dictionary
    pub fn lookup(&self, identifier: &str) -> Option<(&'static str, Dictionary)> {
        self.entries()
            .iter()
            .find(|(name, _)| *name == identifier)
            .copied()
    }

    /// All identifiers of this set, in table order
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> {
        self.entries().iter().map(|(name, _)| *name)
    }

    /// Prefix of marker names generated from this set
    pub fn name_prefix(&self) -> &'static str {
        match self {
            DictionarySet::Aruco => "aruco",
            DictionarySet::Extended => "marker",
        }
    }
}

impl fmt::Display for DictionarySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionarySet::Aruco => write!(f, "aruco"),
            DictionarySet::Extended => write!(f, "extended"),
        }
    }
}

/// Whether the cell at (row, col) of a packed codeword is black
pub(crate) fn is_black(codeword: u64, marker_size: u32, row: u32, col: u32) -> bool {
    (codeword >> (row * marker_size + col)) & 1 == 1
}
