//! OGRE material script binding a marker name to its texture
//!
//! The marker name is substituted verbatim. Names built by
//! [`MarkerRequest::marker_name`](crate::MarkerRequest::marker_name) only
//! contain characters that are safe in the script format.

use crate::request::MarkerName;

/// Name of the material declared for a marker, referenced from `model.sdf`
pub fn material_name(marker: &MarkerName) -> String {
    format!("{}/Marker", marker)
}

/// File name of the marker texture, shared by the texture and the script
pub fn texture_file_name(marker: &MarkerName) -> String {
    format!("{}.png", marker)
}

/// Render the material script for a marker
pub fn render_material_script(marker: &MarkerName) -> String {
    format!(
        "material {material}\n\
         {{\n\
         \x20 technique\n\
         \x20 {{\n\
         \x20   pass\n\
         \x20   {{\n\
         \x20     texture_unit\n\
         \x20     {{\n\
         \x20       texture {texture}\n\
         \x20     }}\n\
         \x20   }}\n\
         \x20 }}\n\
         }}\n",
        material = material_name(marker),
        texture = texture_file_name(marker),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionarySet;
    use crate::request::MarkerRequest;

    #[test]
    fn test_material_script() {
        let name = MarkerRequest::parse(DictionarySet::Aruco, "6x6", "3", "0.15")
            .unwrap()
            .marker_name();
        let script = render_material_script(&name);

        assert!(script.starts_with("material aruco_6x6_id3_150mm/Marker\n{\n"));
        assert!(script.contains("\n        texture aruco_6x6_id3_150mm.png\n"));
        assert_eq!(script.matches('{').count(), script.matches('}').count());
        assert!(script.ends_with("}\n"));
    }
}
