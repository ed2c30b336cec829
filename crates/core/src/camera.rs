use geo::Point;

use crate::config::CameraPreset;
use crate::geometry::Bounds;
use crate::presentation::Presentation;

/// Ask the presentation to frame `points`. Returns the requested bounds, or
/// `None` if there was no presentation or no point.
pub fn fit_to_points(
    presentation: Option<&dyn Presentation>,
    points: impl IntoIterator<Item = Point>,
    camera: &CameraPreset,
) -> Option<Bounds> {
    let presentation = presentation?;
    let bounds = Bounds::from_points(points)?;
    presentation.fit_bounds(bounds, camera);
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPresentation;

    #[test]
    fn test_fit_to_points() {
        let presentation = RecordingPresentation::default();
        let bounds = fit_to_points(
            Some(&presentation),
            [Point::new(27.18158, 38.46393), Point::new(27.0856, 38.5102)],
            &CameraPreset::BUILDING,
        )
        .unwrap();

        assert_eq!(bounds.to_array(), [[27.0856, 38.46393], [27.18158, 38.5102]]);
        let fits = presentation.fits();
        assert_eq!(fits.len(), 1);
        assert_eq!(fits[0].1, CameraPreset::BUILDING);
    }

    #[test]
    fn test_fit_without_presentation_or_points() {
        assert!(fit_to_points(None, [Point::new(0.0, 0.0)], &CameraPreset::RANGE).is_none());

        let presentation = RecordingPresentation::default();
        assert!(fit_to_points(Some(&presentation), Vec::new(), &CameraPreset::RANGE).is_none());
        assert!(presentation.fits().is_empty());
    }
}
