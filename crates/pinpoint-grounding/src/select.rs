use crate::{boxes::DetectionBox, error::GroundingError, filter::filter_redundant};

/// The outcome of best box selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The boxes that survived containment filtering, ascending by confidence.
    pub kept: Vec<DetectionBox>,
    /// The most confident surviving box.
    pub best: DetectionBox,
}

/// Filters out enclosing boxes and picks the most confident survivor.
///
/// Ties are broken by the first occurrence in the filtered order.
///
/// # Errors
///
/// [`GroundingError::InvariantViolation`] if `boxes` is empty.
pub fn select(boxes: &[DetectionBox]) -> Result<Selection, GroundingError> {
    let kept = filter_redundant(boxes)?;

    let best = kept
        .iter()
        .reduce(|best, b| if b.confidence > best.confidence { b } else { best })
        .cloned()
        .ok_or(GroundingError::InvariantViolation(
            "containment filter returned no boxes",
        ))?;

    Ok(Selection { kept, best })
}

/// Returns the most specific, most confident box of `boxes`.
///
/// See [`select`].
pub fn select_best(boxes: &[DetectionBox]) -> Result<DetectionBox, GroundingError> {
    select(boxes).map(|selection| selection.best)
}
