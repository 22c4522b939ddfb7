//! Typed decoding of crowd-sourced annotation rows.
//!
//! The annotation export is a headered CSV in which two columns carry
//! JSON-encoded text: the drawn region geometry and the annotator-supplied
//! tags. Both blobs are decoded into fixed-shape structs here; no untyped
//! JSON maps escape this module. An empty JSON object in either column is a
//! legitimate "nothing here" marker, not an error.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Region;

/// One record of the annotation table. Extra CSV columns are ignored.
///
/// `(filename, region_id)` pairs are unique and jointly determine the
/// derived crop filename, see [`AnnotationRow::derived_filename`].
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRow {
    /// Relative path to the source image; shared by multiple regions.
    pub filename: String,
    /// Disambiguates multiple regions within one source image.
    pub region_id: u32,
    /// JSON object: shape discriminator plus box geometry, possibly `{}`.
    pub region_shape_attributes: String,
    /// JSON object: annotator tags, possibly `{}`.
    pub region_attributes: String,
}

/// Decode failure for a single annotation row.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("invalid region_shape_attributes for {filename} region {region_id}: {source}")]
    Shape {
        filename: String,
        region_id: u32,
        #[source]
        source: serde_json::Error,
    },
    #[error("region {region_id} of {filename} has non-positive box {width}x{height}")]
    DegenerateBox {
        filename: String,
        region_id: u32,
        width: i64,
        height: i64,
    },
    #[error("invalid region_attributes for {filename} region {region_id}: {source}")]
    Tags {
        filename: String,
        region_id: u32,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoded annotator tags for one region.
///
/// Non-empty tag blobs always carry all four top-level keys; a missing
/// `expression` or `clarity` sub-object marks a corrupt export and is a
/// decode error, while the boolean flags inside the sub-objects default
/// to false when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionTags {
    /// Skin tone code on the annotation project's fixed scale.
    #[serde(deserialize_with = "flexible_int")]
    pub skin_tone: i64,
    pub expression: Expression,
    pub clarity: Clarity,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expression {
    #[serde(default)]
    pub smiling: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Clarity {
    #[serde(default)]
    pub frontal: bool,
}

impl AnnotationRow {
    /// Decode the region geometry, ignoring the leading shape discriminator.
    ///
    /// Returns `Ok(None)` for `{}` (no region drawn on this row).
    pub fn region_shape(&self) -> Result<Option<Region>, AnnotationError> {
        let value: serde_json::Value =
            serde_json::from_str(&self.region_shape_attributes).map_err(|source| {
                AnnotationError::Shape {
                    filename: self.filename.clone(),
                    region_id: self.region_id,
                    source,
                }
            })?;
        if value.as_object().is_some_and(|obj| obj.is_empty()) {
            return Ok(None);
        }
        // Region derives Deserialize on x/y/width/height; the `name`
        // discriminator and any other keys fall through as unknown fields.
        let region: Region =
            serde_json::from_value(value).map_err(|source| AnnotationError::Shape {
                filename: self.filename.clone(),
                region_id: self.region_id,
                source,
            })?;
        if region.width <= 0 || region.height <= 0 {
            return Err(AnnotationError::DegenerateBox {
                filename: self.filename.clone(),
                region_id: self.region_id,
                width: region.width,
                height: region.height,
            });
        }
        Ok(Some(region))
    }

    /// Decode the annotator tags.
    ///
    /// Returns `Ok(None)` for `{}` (region present but never annotated).
    pub fn region_tags(&self) -> Result<Option<RegionTags>, AnnotationError> {
        let value: serde_json::Value =
            serde_json::from_str(&self.region_attributes).map_err(|source| {
                AnnotationError::Tags {
                    filename: self.filename.clone(),
                    region_id: self.region_id,
                    source,
                }
            })?;
        if value.as_object().is_some_and(|obj| obj.is_empty()) {
            return Ok(None);
        }
        let tags: RegionTags =
            serde_json::from_value(value).map_err(|source| AnnotationError::Tags {
                filename: self.filename.clone(),
                region_id: self.region_id,
                source,
            })?;
        Ok(Some(tags))
    }

    /// Derive the output filename for this region: `<stem>_<region_id>.<suffix>`.
    ///
    /// Both the cropper and the attribute extractor go through this single
    /// helper so the attribute table always names the file the cropper wrote.
    pub fn derived_filename(&self) -> String {
        derived_filename(&self.filename, self.region_id)
    }
}

fn derived_filename(filename: &str, region_id: u32) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{region_id}.{ext}"),
        None => format!("{stem}_{region_id}"),
    }
}

/// Accept either a JSON integer or a string of digits.
///
/// The crowd-source tool stored numeric tag values as strings (`"3"`), but
/// re-exports of the same table carry real numbers.
fn flexible_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Text(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, got \"{text}\""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(shape: &str, tags: &str) -> AnnotationRow {
        AnnotationRow {
            filename: "a/b.jpg".to_string(),
            region_id: 3,
            region_shape_attributes: shape.to_string(),
            region_attributes: tags.to_string(),
        }
    }

    #[test]
    fn empty_shape_object_means_no_region() {
        let row = row("{}", "{}");
        assert!(row.region_shape().unwrap().is_none());
    }

    #[test]
    fn shape_decodes_ignoring_discriminator() {
        let row = row(
            r#"{"name":"rect","x":10,"y":20,"width":50,"height":60}"#,
            "{}",
        );
        let region = row.region_shape().unwrap().unwrap();
        assert_eq!(region, Region::new(10, 20, 50, 60));
    }

    #[test]
    fn shape_with_missing_field_is_an_error() {
        let row = row(r#"{"name":"rect","x":10,"y":20,"width":50}"#, "{}");
        assert!(matches!(
            row.region_shape(),
            Err(AnnotationError::Shape { .. })
        ));
    }

    #[test]
    fn degenerate_box_is_an_error() {
        let row = row(r#"{"name":"rect","x":0,"y":0,"width":0,"height":10}"#, "{}");
        assert!(matches!(
            row.region_shape(),
            Err(AnnotationError::DegenerateBox { .. })
        ));
    }

    #[test]
    fn empty_tags_object_means_not_annotated() {
        let row = row("{}", "{}");
        assert!(row.region_tags().unwrap().is_none());
    }

    #[test]
    fn tags_decode_with_defaults_for_absent_booleans() {
        let row = row(
            "{}",
            r#"{"skin_tone":"3","expression":{"smiling":true},"clarity":{},"color":"tan"}"#,
        );
        let tags = row.region_tags().unwrap().unwrap();
        assert_eq!(tags.skin_tone, 3);
        assert!(tags.expression.smiling);
        assert!(!tags.clarity.frontal);
        assert_eq!(tags.color, "tan");
    }

    #[test]
    fn skin_tone_accepts_plain_integers() {
        let row = row(
            "{}",
            r#"{"skin_tone":5,"expression":{},"clarity":{},"color":"brown"}"#,
        );
        let tags = row.region_tags().unwrap().unwrap();
        assert_eq!(tags.skin_tone, 5);
        assert!(!tags.expression.smiling);
    }

    #[test]
    fn missing_sub_object_is_an_error() {
        let no_expression = row("{}", r#"{"skin_tone":2,"clarity":{},"color":"tan"}"#);
        assert!(matches!(
            no_expression.region_tags(),
            Err(AnnotationError::Tags { .. })
        ));

        let no_clarity = row("{}", r#"{"skin_tone":2,"expression":{},"color":"tan"}"#);
        assert!(matches!(
            no_clarity.region_tags(),
            Err(AnnotationError::Tags { .. })
        ));
    }

    #[test]
    fn non_numeric_skin_tone_is_an_error() {
        let row = row(
            "{}",
            r#"{"skin_tone":"dark","expression":{},"clarity":{},"color":"brown"}"#,
        );
        assert!(matches!(row.region_tags(), Err(AnnotationError::Tags { .. })));
    }

    #[test]
    fn missing_color_is_an_error() {
        let row = row("{}", r#"{"skin_tone":"2"}"#);
        assert!(matches!(row.region_tags(), Err(AnnotationError::Tags { .. })));
    }

    #[test]
    fn derived_filename_inserts_region_id_before_suffix() {
        assert_eq!(derived_filename("a/b.jpg", 3), "b_3.jpg");
        assert_eq!(derived_filename("photo.png", 0), "photo_0.png");
        assert_eq!(derived_filename("no_extension", 2), "no_extension_2");
    }
}
