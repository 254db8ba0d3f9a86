use crate::{boxes::DetectionBox, error::GroundingError};

/// Discards boxes that enclose the center of another kept box.
///
/// A box that wholly encloses another box's center is usually an over-large,
/// imprecise detection ("microwave" around "button"). Boxes are visited from the
/// lowest to the highest confidence (stable for ties) and each one is checked
/// against every box still kept at that moment, so low-confidence enclosing boxes
/// are pruned first. Boxes already discarded are not considered.
///
/// The pixel-scaled geometry is used for the containment test.
///
/// # Returns
///
/// The surviving boxes in ascending confidence order. No survivor contains the
/// center of another survivor, so filtering the output again is a no-op.
///
/// # Errors
///
/// [`GroundingError::InvariantViolation`] if `boxes` is empty.
pub fn filter_redundant(boxes: &[DetectionBox]) -> Result<Vec<DetectionBox>, GroundingError> {
    if boxes.is_empty() {
        return Err(GroundingError::InvariantViolation(
            "containment filter requires at least one box",
        ));
    }

    let mut kept = boxes.to_vec();
    kept.sort_by(|a, b| a.confidence.total_cmp(&b.confidence));

    let mut cursor = 0;
    while cursor < kept.len() {
        let candidate = &kept[cursor].scaled;
        let encloses_other = kept
            .iter()
            .enumerate()
            .any(|(i, other)| i != cursor && candidate.contains_center_of(&other.scaled));

        if encloses_other {
            let removed = kept.remove(cursor);
            log::debug!(
                "discarding '{}' ({:.3}): encloses another box center",
                removed.phrase,
                removed.confidence
            );
        } else {
            cursor += 1;
        }
    }

    Ok(kept)
}
