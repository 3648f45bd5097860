//! Oriented-box annotation parsing.
//!
//! One box per line, `label_id x1 y1 x2 y2 x3 y3 x4 y4`, coordinates
//! normalized to `[0, 1]`. Each line parses independently: a rejected line
//! goes to the [`ErrorSink`] and its siblings still produce boxes.

use std::fs;
use std::path::Path;

use super::model::{ItemId, LabelCategories, PixelSize, RotatedBox};
use crate::error::{AnnotationError, ItemError};
use crate::geometry::{min_area_rect, Point};
use crate::report::ErrorSink;

const COORD_FIELDS: [&str; 8] = ["x1", "y1", "x2", "y2", "x3", "y3", "x4", "y4"];

/// A non-blank annotation line with its 1-based physical line number.
pub(crate) type AnnotationLine = (usize, String);

/// Reads the non-blank lines of an annotation file.
///
/// A read failure here is item-scoped, not line-scoped: without the file
/// there is no item to salvage.
pub(crate) fn read_annotation_lines(path: &Path) -> Result<Vec<AnnotationLine>, ItemError> {
    let data = fs::read_to_string(path).map_err(|source| ItemError::AnnotationRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(data
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.trim().to_string()))
        .collect())
}

/// Parses pre-read lines into boxes, isolating per-line failures.
///
/// Rejected lines are reported through `sink` with the owning item's
/// identity and otherwise skipped; a box's ordinal is its position among the
/// non-blank lines, so surviving ordinals reflect the original file layout.
pub(crate) fn parse_annotation_lines(
    lines: &[AnnotationLine],
    size: PixelSize,
    categories: &LabelCategories,
    item: &ItemId,
    sink: &mut dyn ErrorSink,
) -> Vec<RotatedBox> {
    let mut boxes = Vec::with_capacity(lines.len());

    for (ordinal, (line_num, line)) in lines.iter().enumerate() {
        match parse_line(line, *line_num, ordinal, size, categories) {
            Ok(bbox) => boxes.push(bbox),
            Err(error) => sink.annotation_error(item, error),
        }
    }

    boxes
}

/// Parses a single annotation line into a [`RotatedBox`].
///
/// The four corners are scaled to pixel space and normalized to their
/// minimum-area enclosing rectangle. Corner order is not validated; a
/// non-rectangular quadrilateral is lossily replaced by the smallest
/// rectangle enclosing it.
pub(crate) fn parse_line(
    line: &str,
    line_num: usize,
    ordinal: usize,
    size: PixelSize,
    categories: &LabelCategories,
) -> Result<RotatedBox, AnnotationError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 9 {
        return Err(AnnotationError::FieldCount {
            line: line_num,
            found: tokens.len(),
        });
    }

    let label = tokens[0]
        .parse::<usize>()
        .map_err(|_| AnnotationError::InvalidLabelId {
            line: line_num,
            value: tokens[0].to_string(),
        })?;
    if !categories.contains_id(label) {
        return Err(AnnotationError::UndeclaredLabel {
            line: line_num,
            label,
            declared: categories.len(),
        });
    }

    let mut coords = [0f64; 8];
    for (i, token) in tokens[1..].iter().enumerate() {
        coords[i] = token
            .parse::<f64>()
            .map_err(|_| AnnotationError::InvalidCoordinate {
                line: line_num,
                field: COORD_FIELDS[i],
                value: token.to_string(),
            })?;
    }

    let width = f64::from(size.width);
    let height = f64::from(size.height);
    let corners = [
        Point::new(coords[0] * width, coords[1] * height),
        Point::new(coords[2] * width, coords[3] * height),
        Point::new(coords[4] * width, coords[5] * height),
        Point::new(coords[6] * width, coords[7] * height),
    ];

    let rect = min_area_rect(&corners);

    Ok(RotatedBox {
        x: rect.cx,
        y: rect.cy,
        w: rect.w,
        h: rect.h,
        angle: rect.angle,
        label,
        ordinal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ImportLog;

    fn categories() -> LabelCategories {
        LabelCategories::from_names(vec!["plane".into(), "ship".into()])
    }

    fn size() -> PixelSize {
        PixelSize::new(100, 100)
    }

    #[test]
    fn golden_axis_aligned_box() {
        let bbox = parse_line(
            "0 0.25 0.25 0.75 0.25 0.75 0.75 0.25 0.75",
            1,
            0,
            size(),
            &categories(),
        )
        .expect("parse line");

        assert_eq!(bbox.label, 0);
        assert_eq!(bbox.ordinal, 0);
        assert!((bbox.x - 50.0).abs() < 1e-9);
        assert!((bbox.y - 50.0).abs() < 1e-9);
        assert!((bbox.w - 50.0).abs() < 1e-9);
        assert!((bbox.h - 50.0).abs() < 1e-9);
        assert!(bbox.angle.abs() < 1e-9);
    }

    #[test]
    fn x_scales_by_width_and_y_by_height() {
        let bbox = parse_line(
            "1 0.1 0.2 0.5 0.2 0.5 0.6 0.1 0.6",
            1,
            0,
            PixelSize::new(100, 200),
            &categories(),
        )
        .expect("parse line");

        // 200 wide, 100 tall image: x in [20, 100], y in [20, 60].
        assert!((bbox.x - 60.0).abs() < 1e-9);
        assert!((bbox.y - 40.0).abs() < 1e-9);
        assert!((bbox.w - 80.0).abs() < 1e-9);
        assert!((bbox.h - 40.0).abs() < 1e-9);
    }

    #[test]
    fn parsing_twice_is_bit_identical() {
        let line = "1 0.12 0.34 0.81 0.29 0.9 0.77 0.2 0.68";
        let a = parse_line(line, 1, 0, size(), &categories()).expect("first parse");
        let b = parse_line(line, 1, 0, size(), &categories()).expect("second parse");
        assert_eq!(a, b);
    }

    #[test]
    fn eight_tokens_are_rejected() {
        let err = parse_line(
            "0 0.25 0.25 0.75 0.25 0.75 0.75 0.25",
            4,
            1,
            size(),
            &categories(),
        )
        .unwrap_err();
        assert!(matches!(err, AnnotationError::FieldCount { line: 4, found: 8 }));
    }

    #[test]
    fn undeclared_label_is_rejected() {
        let err = parse_line(
            "5 0.25 0.25 0.75 0.25 0.75 0.75 0.25 0.75",
            1,
            0,
            size(),
            &categories(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::UndeclaredLabel {
                label: 5,
                declared: 2,
                ..
            }
        ));
    }

    #[test]
    fn non_integer_label_is_rejected() {
        let err = parse_line(
            "ship 0.25 0.25 0.75 0.25 0.75 0.75 0.25 0.75",
            1,
            0,
            size(),
            &categories(),
        )
        .unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidLabelId { .. }));
    }

    #[test]
    fn non_numeric_coordinate_names_the_field() {
        let err = parse_line(
            "0 0.25 0.25 0.75 oops 0.75 0.75 0.25 0.75",
            1,
            0,
            size(),
            &categories(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::InvalidCoordinate { field: "y2", .. }
        ));
    }

    #[test]
    fn rejected_lines_do_not_affect_siblings() {
        let lines: Vec<AnnotationLine> = vec![
            (1, "0 0.25 0.25 0.75 0.25 0.75 0.75 0.25 0.75".into()),
            (2, "0 0.25 0.25 0.75 0.25 0.75 0.75 0.25".into()),
            (3, "1 0.1 0.1 0.3 0.1 0.3 0.3 0.1 0.3".into()),
        ];

        let item = ItemId::new("img_1", "train");
        let mut log = ImportLog::new();
        let boxes = parse_annotation_lines(&lines, size(), &categories(), &item, &mut log);

        assert_eq!(boxes.len(), 2);
        assert_eq!(log.annotation_error_count(), 1);
        // Ordinals keep the original line positions, so they skip the
        // rejected middle line.
        assert_eq!(boxes[0].ordinal, 0);
        assert_eq!(boxes[1].ordinal, 2);
        assert_eq!(boxes[1].label, 1);
    }
}
