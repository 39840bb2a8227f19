use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};

/// Sensor response of one colour channel at the two emission lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantumEfficiency {
    /// Hydrogen-alpha, 656.3 nm.
    pub ha: f64,
    /// Doubly ionised oxygen, 500.7 nm.
    pub oiii: f64,
}

impl QuantumEfficiency {
    pub fn new(ha: f64, oiii: f64) -> Result<Self> {
        let qe = Self { ha, oiii };
        qe.validate()?;
        Ok(qe)
    }

    fn validate(&self) -> Result<()> {
        for (label, value) in [("H-alpha", self.ha), ("OIII", self.oiii)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(LauncherError::Camera(format!(
                    "{} quantum efficiency must be between 0 and 1, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// Quantum efficiencies of a colour camera, one pair per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    pub red: QuantumEfficiency,
    pub green: QuantumEfficiency,
    pub blue: QuantumEfficiency,
}

impl CameraProfile {
    /// Build a profile from the six values in runtime flag order:
    /// red/green/blue at H-alpha, then red/green/blue at OIII.
    pub fn from_values(values: [f64; 6]) -> Result<Self> {
        let [rh, gh, bh, ro, go, bo] = values;
        Ok(Self {
            red: QuantumEfficiency::new(rh, ro)?,
            green: QuantumEfficiency::new(gh, go)?,
            blue: QuantumEfficiency::new(bh, bo)?,
        })
    }

    /// Inverse of [`CameraProfile::from_values`].
    pub fn values(&self) -> [f64; 6] {
        [
            self.red.ha,
            self.green.ha,
            self.blue.ha,
            self.red.oiii,
            self.green.oiii,
            self.blue.oiii,
        ]
    }

    pub fn validate(&self) -> Result<()> {
        self.red.validate()?;
        self.green.validate()?;
        self.blue.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_channel_order() {
        let profile = CameraProfile::from_values([0.9, 0.2, 0.05, 0.1, 0.8, 0.5]).unwrap();
        assert_eq!(profile.red, QuantumEfficiency { ha: 0.9, oiii: 0.1 });
        assert_eq!(profile.green, QuantumEfficiency { ha: 0.2, oiii: 0.8 });
        assert_eq!(profile.blue, QuantumEfficiency { ha: 0.05, oiii: 0.5 });
        assert_eq!(profile.values(), [0.9, 0.2, 0.05, 0.1, 0.8, 0.5]);
    }

    #[test]
    fn test_out_of_range_qe_rejected() {
        assert!(QuantumEfficiency::new(1.2, 0.5).is_err());
        assert!(QuantumEfficiency::new(0.5, -0.1).is_err());
        assert!(QuantumEfficiency::new(f64::NAN, 0.5).is_err());
        assert!(QuantumEfficiency::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_json_keys() {
        let qe = QuantumEfficiency { ha: 0.25, oiii: 0.5 };
        let json = serde_json::to_string(&qe).unwrap();
        assert_eq!(json, r#"{"ha":0.25,"oiii":0.5}"#);
    }
}
