use crate::{
    boxes::{DetectionBox, Region},
    error::GroundingError,
};

/// Computes the tightest axis-aligned rectangle covering every box.
///
/// The pixel-scaled geometry is used. Each edge is an independent extremum, so the
/// box defining the left edge need not be the one defining the top edge.
///
/// # Errors
///
/// [`GroundingError::InvariantViolation`] if `boxes` is empty.
pub fn enclosing_region(boxes: &[DetectionBox]) -> Result<Region, GroundingError> {
    if boxes.is_empty() {
        return Err(GroundingError::InvariantViolation(
            "enclosing region requires at least one box",
        ));
    }

    let init = Region::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );

    Ok(boxes.iter().fold(init, |acc, b| {
        Region::new(
            acc.x_min.min(b.scaled.x_min()),
            acc.y_min.min(b.scaled.y_min()),
            acc.x_max.max(b.scaled.x_max()),
            acc.y_max.max(b.scaled.y_max()),
        )
    }))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::enclosing_region;
    use crate::{
        boxes::{BoxGeometry, DetectionBox, Region},
        error::GroundingError,
    };

    fn detection(cx: f64, cy: f64, w: f64, h: f64) -> DetectionBox {
        DetectionBox {
            normalized: BoxGeometry::new(0.0, 0.0, 0.0, 0.0),
            scaled: BoxGeometry::new(cx, cy, w, h),
            confidence: 0.5,
            phrase: String::new(),
        }
    }

    #[test]
    fn region_of_two_boxes() -> Result<(), GroundingError> {
        let boxes = vec![
            detection(100.0, 100.0, 20.0, 20.0),
            detection(200.0, 50.0, 10.0, 10.0),
        ];
        let region = enclosing_region(&boxes)?;
        assert_relative_eq!(region.x_min, 90.0);
        assert_relative_eq!(region.y_min, 45.0);
        assert_relative_eq!(region.x_max, 205.0);
        assert_relative_eq!(region.y_max, 110.0);
        Ok(())
    }

    #[test]
    fn region_of_one_box_is_its_extent() -> Result<(), GroundingError> {
        let region = enclosing_region(&[detection(10.0, 20.0, 4.0, 6.0)])?;
        assert_eq!(region, Region::new(8.0, 17.0, 12.0, 23.0));
        Ok(())
    }

    #[test]
    fn region_is_minimal() -> Result<(), GroundingError> {
        let eps = 1e-6;
        let boxes = vec![
            detection(12.5, 80.0, 5.0, 10.0),
            detection(40.0, 30.0, 30.0, 12.0),
            detection(70.0, 60.0, 8.0, 70.0),
        ];
        let region = enclosing_region(&boxes)?;
        assert!(boxes.iter().all(|b| region.covers(&b.scaled, eps)));

        let shrunk = [
            Region::new(region.x_min + eps, region.y_min, region.x_max, region.y_max),
            Region::new(region.x_min, region.y_min + eps, region.x_max, region.y_max),
            Region::new(region.x_min, region.y_min, region.x_max - eps, region.y_max),
            Region::new(region.x_min, region.y_min, region.x_max, region.y_max - eps),
        ];
        for r in shrunk {
            assert!(boxes.iter().any(|b| !r.covers(&b.scaled, 0.0)));
        }
        Ok(())
    }

    #[test]
    fn empty_input_is_an_invariant_violation() {
        assert!(matches!(
            enclosing_region(&[]),
            Err(GroundingError::InvariantViolation(_))
        ));
    }
}
