use super::DetectionError;
use super::Detector;

/// Stand-in classifier for demos and the CLI.
///
/// Derives a stable confidence score in `0..=100` from the image bytes, so the same image
/// always gets the same answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeDetector;

impl FakeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Confidence, in percent, that `image` shows a cat.
    pub fn score(image: &[u8]) -> f32 {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in image {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        (hash % 101) as f32
    }
}

impl Detector for FakeDetector {
    fn contains_target_animal(
        &self,
        image: &[u8],
        confidence_threshold: f32,
    ) -> Result<bool, DetectionError> {
        if image.is_empty() {
            return Err(DetectionError::InvalidImage);
        }

        let score = Self::score(image);
        tracing::debug!(
            "Fake detector scored {} bytes at {}% (threshold {}%)",
            image.len(),
            score,
            confidence_threshold
        );
        Ok(score >= confidence_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_is_rejected() {
        let result = FakeDetector.contains_target_animal(&[], 50.0);
        assert!(matches!(result, Err(DetectionError::InvalidImage)));
    }

    #[test]
    fn test_score_is_stable_and_bounded() {
        let image = b"\x89PNG not really a cat";
        let score = FakeDetector::score(image);
        assert_eq!(score, FakeDetector::score(image));
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_threshold_extremes() {
        let image = b"tabby";
        assert!(FakeDetector.contains_target_animal(image, 0.0).unwrap());
        assert!(!FakeDetector.contains_target_animal(image, 100.5).unwrap());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let image = b"calico";
        let score = FakeDetector::score(image);
        assert!(FakeDetector.contains_target_animal(image, score).unwrap());
    }
}
