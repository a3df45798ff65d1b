//! Marker requests and marker naming

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

use crate::dictionary::{Dictionary, DictionarySet};
use crate::marker::{rasterize, size_in_millimeters, MarkerError, MarkerImage};

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid marker id '{value}': {source}")]
    InvalidId {
        value: String,
        source: ParseIntError,
    },
    #[error("Invalid marker size '{value}': {source}")]
    InvalidSize {
        value: String,
        source: ParseFloatError,
    },
    #[error("Unsupported dictionary '{given}'. Supported dictionaries: {supported}")]
    UnsupportedDictionary { given: String, supported: String },
}

/// A validated request for one marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRequest {
    set: DictionarySet,
    identifier: &'static str,
    dictionary: Dictionary,
    id: u32,
    size: f64,
}

impl MarkerRequest {
    /// Parse the three positional arguments against a dictionary set
    ///
    /// The id and size are parsed before the dictionary is resolved. Nothing
    /// here checks the id against the dictionary capacity or the size against
    /// the marker grid; [`MarkerRequest::rasterize`] does.
    pub fn parse(
        set: DictionarySet,
        dictionary: &str,
        id: &str,
        size: &str,
    ) -> Result<Self, RequestError> {
        let marker_id: u32 = id.parse().map_err(|source| RequestError::InvalidId {
            value: id.to_string(),
            source,
        })?;
        let marker_size: f64 = size.parse().map_err(|source| RequestError::InvalidSize {
            value: size.to_string(),
            source,
        })?;
        let (identifier, dict) =
            set.lookup(dictionary)
                .ok_or_else(|| RequestError::UnsupportedDictionary {
                    given: dictionary.to_string(),
                    supported: set.identifiers().collect::<Vec<_>>().join(", "),
                })?;

        Ok(Self {
            set,
            identifier,
            dictionary: dict,
            id: marker_id,
            size: marker_size,
        })
    }

    pub fn set(&self) -> DictionarySet {
        self.set
    }

    /// Canonical dictionary identifier as accepted on the command line
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn dictionary(&self) -> Dictionary {
        self.dictionary
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Physical side length in meters
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Name used for every generated file and simulator entity
    pub fn marker_name(&self) -> MarkerName {
        MarkerName(format!(
            "{}_{}_id{}_{}mm",
            self.set.name_prefix(),
            self.identifier,
            self.id,
            size_in_millimeters(self.size)
        ))
    }

    pub fn rasterize(&self) -> Result<MarkerImage, MarkerError> {
        rasterize(self.dictionary, self.id, self.size)
    }
}

/// Marker name, e.g. `aruco_6x6_id3_150mm`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerName(String);

impl MarkerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MarkerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
