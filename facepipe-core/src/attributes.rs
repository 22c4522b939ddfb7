//! Demographic/pose attribute extraction from annotation rows.

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationError, AnnotationRow};

/// One row of the attributes table.
///
/// Created once per annotated region during the pipeline pass and immutable
/// thereafter; field order here is the column order of `attributes.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Derived crop filename (`<stem>_<region_id>.<suffix>`).
    pub filename: String,
    /// Skin tone code on the annotation project's fixed scale.
    pub skin_tone: i64,
    pub smiling: bool,
    pub color: String,
    pub frontal: bool,
}

impl AttributeRecord {
    /// Column header of `attributes.csv`; must stay in field order.
    pub const HEADERS: [&'static str; 5] = ["filename", "skin_tone", "smiling", "color", "frontal"];
}

/// Build the attribute record for one row.
///
/// Returns `Ok(None)` when the row's `region_attributes` is the empty
/// object, meaning the region was never annotated; that row is skipped
/// without error. A missing `color` or sub-object and a non-numeric
/// `skin_tone` surface as [`AnnotationError::Tags`] and abort the run.
pub fn extract_attributes(row: &AnnotationRow) -> Result<Option<AttributeRecord>, AnnotationError> {
    let Some(tags) = row.region_tags()? else {
        return Ok(None);
    };

    Ok(Some(AttributeRecord {
        filename: row.derived_filename(),
        skin_tone: tags.skin_tone,
        smiling: tags.expression.smiling,
        color: tags.color,
        frontal: tags.clarity.frontal,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filename: &str, region_id: u32, tags: &str) -> AnnotationRow {
        AnnotationRow {
            filename: filename.to_string(),
            region_id,
            region_shape_attributes: "{}".to_string(),
            region_attributes: tags.to_string(),
        }
    }

    #[test]
    fn unannotated_region_yields_no_record() {
        assert!(extract_attributes(&row("a/b.jpg", 3, "{}"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn builds_record_with_derived_filename() {
        let record = extract_attributes(&row(
            "a/b.jpg",
            3,
            r#"{"skin_tone":"3","expression":{"smiling":true},"clarity":{},"color":"tan"}"#,
        ))
        .unwrap()
        .expect("record");

        assert_eq!(
            record,
            AttributeRecord {
                filename: "b_3.jpg".to_string(),
                skin_tone: 3,
                smiling: true,
                color: "tan".to_string(),
                frontal: false,
            }
        );
    }

    #[test]
    fn extractor_and_cropper_agree_on_filenames() {
        // Both components derive the name through AnnotationRow, so one
        // assertion against the shared helper covers the agreement.
        let row = row(
            "photos/group.jpeg",
            7,
            r#"{"skin_tone":1,"expression":{},"clarity":{},"color":"red"}"#,
        );
        let record = extract_attributes(&row).unwrap().unwrap();
        assert_eq!(record.filename, row.derived_filename());
        assert_eq!(record.filename, "group_7.jpeg");
    }

    #[test]
    fn malformed_tags_propagate_as_errors() {
        assert!(extract_attributes(&row("a.jpg", 0, r#"{"skin_tone":"3"}"#)).is_err());
        // Sub-objects are required even when everything else is present.
        assert!(extract_attributes(&row(
            "a.jpg",
            0,
            r#"{"skin_tone":"3","expression":{},"color":"tan"}"#
        ))
        .is_err());
    }
}
