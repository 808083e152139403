//! Image classification collaborators.

mod fake;

pub use fake::FakeDetector;

/// Decides whether an image shows the monitored animal.
pub trait Detector {
    /// Returns true if the animal is found with at least `confidence_threshold` percent
    /// confidence.
    fn contains_target_animal(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> Result<bool, DetectionError>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn contains_target_animal(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> Result<bool, DetectionError> {
        (**self).contains_target_animal(image, confidence_threshold)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Classification service unavailable: {0}")]
    Unavailable(String),

    #[error("Image is empty or unreadable")]
    InvalidImage,
}
