//! markertile core - Fiducial marker tiles for robotics simulators
//!
//! This crate provides everything needed to turn a marker request into a
//! simulator asset bundle:
//! - Predefined (OpenCV ArUco) marker dictionaries and their identifier sets
//! - Request parsing and deterministic marker naming
//! - Marker rasterization (one pixel per millimeter)
//! - `model.config` / `model.sdf` descriptors and the OGRE material script
//! - Asset tree layout and emission

pub mod descriptor;
pub mod dictionary;
pub mod emitter;
pub mod marker;
pub mod material;
pub mod request;

pub use descriptor::{Author, DescriptorError, ModelConfig, ModelMetadata, SdfDocument};
pub use dictionary::{Dictionary, DictionarySet};
pub use emitter::{AssetEmitter, AssetLayout, AutoConfirm, ConfirmGate, EmitError, EmittedAssets};
pub use marker::{rasterize, MarkerError, MarkerImage, MarkerPattern};
pub use request::{MarkerName, MarkerRequest, RequestError};
