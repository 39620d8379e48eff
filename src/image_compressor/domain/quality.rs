use super::error::DomainError;

pub const DEFAULT_QUALITY_PERCENT: u8 = 80;

/// Slider position, 0-100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(percent: u32) -> Result<Self, DomainError> {
        if percent > 100 {
            return Err(DomainError::InvalidQuality(percent));
        }
        Ok(Self(percent as u8))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    pub fn fraction(&self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Text shown next to the slider.
    pub fn label(&self) -> String {
        format!("{}%", self.percent())
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bounds() {
        assert!(Quality::new(0).is_ok());
        assert!(Quality::new(100).is_ok());
        assert_eq!(Quality::new(101), Err(DomainError::InvalidQuality(101)));
    }

    #[test]
    fn test_quality_fraction_and_label() {
        let quality = Quality::new(80).unwrap();
        assert!((quality.fraction() - 0.8).abs() < f32::EPSILON);
        assert_eq!(quality.label(), "80%");
        assert_eq!(Quality::default().percent(), 80);
    }
}
