//! Per-file capture facts used by lens correction.

/// Camera and lens facts read from a file's embedded metadata.
///
/// Every field is optional; files without metadata simply leave them all
/// empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensMetadata {
    /// Camera manufacturer.
    pub camera_maker: Option<String>,
    /// Camera model.
    pub camera_model: Option<String>,
    /// Lens manufacturer.
    pub lens_maker: Option<String>,
    /// Lens model.
    pub lens_model: Option<String>,
    /// Focal length in millimetres.
    pub focal_length_mm: Option<f32>,
    /// Aperture as an f-number.
    pub f_number: Option<f32>,
}

impl LensMetadata {
    /// Names of the fields lens correction cannot work without.
    ///
    /// Empty when camera model, lens model, focal length and aperture are
    /// all present.
    pub fn missing_for_correction(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.camera_model.is_none() {
            missing.push("camera model");
        }
        if self.lens_model.is_none() {
            missing.push("lens model");
        }
        if self.focal_length_mm.is_none() {
            missing.push("focal length");
        }
        if self.f_number.is_none() {
            missing.push("aperture");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        assert_eq!(LensMetadata::default().missing_for_correction().len(), 4);

        let full = LensMetadata {
            camera_model: Some("X-T5".into()),
            lens_model: Some("XF23mmF1.4 R LM WR".into()),
            focal_length_mm: Some(23.0),
            f_number: Some(2.8),
            ..Default::default()
        };
        assert!(full.missing_for_correction().is_empty());

        let no_lens = LensMetadata { lens_model: None, ..full };
        assert_eq!(no_lens.missing_for_correction(), vec!["lens model"]);
    }
}
