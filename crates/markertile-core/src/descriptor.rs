//! Simulator model descriptors: `model.config` and `model.sdf`
//!
//! Both are XML documents serialized through serde with quick-xml. A tile is
//! a static single-link model: a thin box slightly larger than the marker,
//! used for both collision and visual, plus a textured plane carrying the
//! marker itself just above the box.

use quick_xml::de::from_str;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::material::material_name;
use crate::request::MarkerName;

/// SDF schema version written to both descriptors
pub const SDF_VERSION: &str = "1.6";

/// File name of the geometry descriptor inside the model directory
pub const MODEL_SDF_FILE: &str = "model.sdf";

/// Extra width of the tile box around the marker, in meters
pub const TILE_MARGIN: f64 = 0.03;

/// Thickness of the tile box, in meters
pub const TILE_THICKNESS: f64 = -0.01;

/// Offset of the marker plane along the tile normal, in meters
pub const MARKER_FACE_OFFSET: f64 = 0.006;

/// Yaw of the marker plane, in radians
pub const MARKER_FACE_YAW: f64 = -1.5706;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to parse descriptor: {0}")]
    ParseError(String),
    #[error("Failed to serialize descriptor: {0}")]
    SerializeError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Author block of `model.config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Porée Rémi".to_string(),
            email: "remi.poree.pro@protonmail.com".to_string(),
        }
    }
}

/// Fixed metadata stamped into every `model.config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub version: String,
    pub description: String,
    pub author: Author,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            description: "A simple marker tile model.".to_string(),
            author: Author::default(),
        }
    }
}

/// `<sdf version="1.6">model.sdf</sdf>` reference inside `model.config`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdfRef {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "$text")]
    pub file: String,
}

/// Root of `model.config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "model")]
pub struct ModelConfig {
    pub name: String,
    pub version: String,
    pub sdf: SdfRef,
    pub author: Author,
    pub description: String,
}

impl ModelConfig {
    pub fn new(marker: &MarkerName, metadata: &ModelMetadata) -> Self {
        Self {
            name: marker.to_string(),
            version: metadata.version.clone(),
            sdf: SdfRef {
                version: SDF_VERSION.to_string(),
                file: MODEL_SDF_FILE.to_string(),
            },
            author: metadata.author.clone(),
            description: metadata.description.clone(),
        }
    }

    pub fn from_xml(xml: &str) -> Result<Self, DescriptorError> {
        from_str(xml).map_err(|e| DescriptorError::ParseError(e.to_string()))
    }

    pub fn to_xml(&self) -> Result<String, DescriptorError> {
        to_xml_document(self)
    }

    pub fn to_file(&self, path: &Path) -> Result<(), DescriptorError> {
        std::fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxShape {
    /// "x y z" in meters
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneShape {
    /// "x y z" unit normal
    pub normal: String,
    /// "x y" in meters
    pub size: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub shape_box: Option<BoxShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<PlaneShape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialScriptRef {
    #[serde(default)]
    pub uri: Vec<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub script: MaterialScriptRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collision {
    #[serde(rename = "@name")]
    pub name: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visual {
    #[serde(rename = "@name")]
    pub name: String,
    /// "x y z roll pitch yaw" (meters, radians)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<String>,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@name")]
    pub name: String,
    pub collision: Collision,
    #[serde(default)]
    pub visual: Vec<Visual>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "@name")]
    pub name: String,
    pub pose: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub link: Link,
}

/// Root of `model.sdf`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "sdf")]
pub struct SdfDocument {
    #[serde(rename = "@version")]
    pub version: String,
    pub model: Model,
}

impl SdfDocument {
    /// Build the tile model for a marker of `size` meters
    pub fn tile(marker: &MarkerName, size: f64) -> Self {
        let tile = size + TILE_MARGIN;
        let tile_box = || Geometry {
            shape_box: Some(BoxShape {
                size: format!("{} {} {}", decimal(tile), decimal(tile), TILE_THICKNESS),
            }),
            plane: None,
        };

        let marker_front = Visual {
            name: "marker_front".to_string(),
            pose: Some(format!("0 0 {} 0 0 {}", MARKER_FACE_OFFSET, MARKER_FACE_YAW)),
            geometry: Geometry {
                shape_box: None,
                plane: Some(PlaneShape {
                    normal: "1 0 0".to_string(),
                    size: format!("{} {}", decimal(size), decimal(size)),
                }),
            },
            material: Some(Material {
                script: MaterialScriptRef {
                    uri: vec![
                        format!("model://{}/materials/scripts", marker),
                        format!("model://{}/materials/textures", marker),
                    ],
                    name: material_name(marker),
                },
            }),
        };

        Self {
            version: SDF_VERSION.to_string(),
            model: Model {
                name: marker.to_string(),
                pose: "0 0 0 0 0 0".to_string(),
                is_static: true,
                link: Link {
                    name: "link".to_string(),
                    collision: Collision {
                        name: "collision".to_string(),
                        geometry: tile_box(),
                    },
                    visual: vec![
                        Visual {
                            name: "visual".to_string(),
                            pose: None,
                            geometry: tile_box(),
                            material: None,
                        },
                        marker_front,
                    ],
                },
            },
        }
    }

    pub fn from_xml(xml: &str) -> Result<Self, DescriptorError> {
        from_str(xml).map_err(|e| DescriptorError::ParseError(e.to_string()))
    }

    pub fn to_xml(&self) -> Result<String, DescriptorError> {
        to_xml_document(self)
    }

    pub fn to_file(&self, path: &Path) -> Result<(), DescriptorError> {
        std::fs::write(path, self.to_xml()?)?;
        Ok(())
    }

    /// Find a visual by name
    pub fn visual(&self, name: &str) -> Option<&Visual> {
        self.model.link.visual.iter().find(|v| v.name == name)
    }
}

/// Shortest round-trip form of a length, always with a fractional part
/// (`1.0`, not `1`)
fn decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

fn to_xml_document<T: Serialize>(value: &T) -> Result<String, DescriptorError> {
    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    value
        .serialize(serializer)
        .map_err(|e| DescriptorError::SerializeError(e.to_string()))?;
    Ok(format!("<?xml version=\"1.0\"?>\n{}\n", body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionarySet;
    use crate::request::MarkerRequest;

    fn marker_name(dict: &str, id: &str, size: &str) -> MarkerName {
        MarkerRequest::parse(DictionarySet::Aruco, dict, id, size)
            .unwrap()
            .marker_name()
    }

    #[test]
    fn test_model_config_contents() {
        let name = marker_name("6x6", "3", "0.15");
        let xml = ModelConfig::new(&name, &ModelMetadata::default()).to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<model>"));
        assert!(xml.contains("<name>aruco_6x6_id3_150mm</name>"));
        assert!(xml.contains("<version>1.0</version>"));
        assert!(xml.contains("<sdf version=\"1.6\">model.sdf</sdf>"));
        assert!(xml.contains("<email>remi.poree.pro@protonmail.com</email>"));
        assert!(xml.contains("<description>A simple marker tile model.</description>"));
    }

    #[test]
    fn test_model_config_parses_back() {
        let name = marker_name("4x4", "0", "0.1");
        let xml = ModelConfig::new(&name, &ModelMetadata::default()).to_xml().unwrap();
        let config = ModelConfig::from_xml(&xml).unwrap();
        assert_eq!(config.name, "aruco_4x4_id0_100mm");
        assert_eq!(config.sdf.version, "1.6");
        assert_eq!(config.sdf.file, "model.sdf");
        assert_eq!(config.author, Author::default());
    }

    #[test]
    fn test_tile_geometry() {
        let name = marker_name("6x6", "3", "0.15");
        let sdf = SdfDocument::tile(&name, 0.15);
        let xml = sdf.to_xml().unwrap();
        let parsed = SdfDocument::from_xml(&xml).unwrap();

        assert_eq!(parsed.version, "1.6");
        assert_eq!(parsed.model.name, "aruco_6x6_id3_150mm");
        assert!(parsed.model.is_static);
        assert_eq!(parsed.model.pose, "0 0 0 0 0 0");

        let collision_box = parsed.model.link.collision.geometry.shape_box.as_ref().unwrap();
        assert_eq!(collision_box.size, "0.18 0.18 -0.01");

        let visual = parsed.visual("visual").unwrap();
        assert_eq!(visual.geometry.shape_box.as_ref().unwrap().size, "0.18 0.18 -0.01");
        assert!(visual.material.is_none());

        let front = parsed.visual("marker_front").unwrap();
        assert_eq!(front.pose.as_deref(), Some("0 0 0.006 0 0 -1.5706"));
        let plane = front.geometry.plane.as_ref().unwrap();
        assert_eq!(plane.normal, "1 0 0");
        assert_eq!(plane.size, "0.15 0.15");
    }

    #[test]
    fn test_tile_material_reference() {
        let name = marker_name("5x5", "12", "0.2");
        let sdf = SdfDocument::tile(&name, 0.2);
        let script = &sdf.visual("marker_front").unwrap().material.as_ref().unwrap().script;
        assert_eq!(
            script.uri,
            vec![
                "model://aruco_5x5_id12_200mm/materials/scripts".to_string(),
                "model://aruco_5x5_id12_200mm/materials/textures".to_string(),
            ]
        );
        assert_eq!(script.name, "aruco_5x5_id12_200mm/Marker");
    }

    #[test]
    fn test_box_size_tracks_marker_size() {
        for (size, expected) in [(0.1, "0.13"), (0.25, "0.28"), (0.3, "0.32999999999999996")] {
            let name = marker_name("4x4", "1", &size.to_string());
            let sdf = SdfDocument::tile(&name, size);
            let box_size = &sdf.model.link.collision.geometry.shape_box.as_ref().unwrap().size;
            assert_eq!(box_size, &format!("{} {} -0.01", expected, expected));
            let plane = sdf.visual("marker_front").unwrap().geometry.plane.as_ref().unwrap();
            assert_eq!(plane.size, format!("{} {}", size, size));
        }
    }

    #[test]
    fn test_whole_sizes_keep_fractional_digit() {
        for (size, box_size, plane_size) in [
            (1.0, "1.03 1.03 -0.01", "1.0 1.0"),
            (2.0, "2.03 2.03 -0.01", "2.0 2.0"),
        ] {
            let name = marker_name("4x4", "1", &size.to_string());
            let sdf = SdfDocument::tile(&name, size);
            assert_eq!(
                sdf.model.link.collision.geometry.shape_box.as_ref().unwrap().size,
                box_size
            );
            let plane = sdf.visual("marker_front").unwrap().geometry.plane.as_ref().unwrap();
            assert_eq!(plane.size, plane_size);

            let xml = sdf.to_xml().unwrap();
            assert!(xml.contains(&format!("<size>{}</size>", plane_size)));
        }
        assert_eq!(decimal(0.15), "0.15");
        assert_eq!(decimal(-0.5), "-0.5");
    }
}
