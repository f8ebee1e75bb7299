use tracing::debug;

use crate::{
  common::{error::SkyBoundError, math::PI},
  primitives::point::Point,
};

/// Annulus of angular separations `[theta_min, theta_max[`, as used to bin pair distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularBin {
  /// Lower separation (inclusive), in radians
  theta_min: f64,
  /// Upper separation (exclusive), in radians
  theta_max: f64,
  /// Derived quantity to avoid trigonometric computations
  cos_theta_min: f64,
  /// Derived quantity to avoid trigonometric computations
  cos_theta_max: f64,
}

impl AngularBin {
  /// Create a new angular bin from separations expressed in degrees.
  /// # params
  /// * `theta_min_deg`: minimal separation (inclusive), in degrees
  /// * `theta_max_deg`: maximal separation (exclusive), in degrees
  pub fn from_deg(theta_min_deg: f64, theta_max_deg: f64) -> Result<Self, SkyBoundError> {
    let theta_min = theta_min_deg.to_radians();
    let theta_max = theta_max_deg.to_radians();
    if !(0.0 <= theta_min && theta_min < theta_max && theta_max <= PI) {
      debug!(theta_min_deg, theta_max_deg, "Angular bin rejected");
      Err(SkyBoundError::UnexpectedAngularBin {
        theta_min_deg,
        theta_max_deg,
      })
    } else {
      Ok(Self::new(theta_min, theta_max))
    }
  }

  /// # Panics
  /// * if `theta_min` not in `[0, theta_max[`
  /// * if `theta_max` not in `]theta_min, \pi]`
  pub fn new(theta_min: f64, theta_max: f64) -> Self {
    assert!(0.0 <= theta_min && theta_min < theta_max && theta_max <= PI);
    Self {
      theta_min,
      theta_max,
      cos_theta_min: theta_min.cos(),
      cos_theta_max: theta_max.cos(),
    }
  }

  pub fn theta_min(&self) -> f64 {
    self.theta_min
  }

  pub fn theta_max(&self) -> f64 {
    self.theta_max
  }

  pub fn cos_theta_min(&self) -> f64 {
    self.cos_theta_min
  }

  pub fn cos_theta_max(&self) -> f64 {
    self.cos_theta_max
  }

  /// Returns `true` if the separation whose cosine is given falls in this bin.
  pub fn contains_cos(&self, cos_theta: f64) -> bool {
    self.cos_theta_max < cos_theta && cos_theta <= self.cos_theta_min
  }

  /// Returns `true` if the separation between the two given points falls in this bin.
  pub fn contains(&self, p1: &Point, p2: &Point) -> bool {
    self.contains_cos(p1.dot(p2))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_deg() {
    let bin = AngularBin::from_deg(1.0, 2.0).unwrap();
    assert!((bin.cos_theta_max() - 2.0_f64.to_radians().cos()).abs() < 1e-15);
    assert!(bin.cos_theta_min() > bin.cos_theta_max());
    assert!(AngularBin::from_deg(2.0, 1.0).is_err());
    assert!(AngularBin::from_deg(-1.0, 1.0).is_err());
    assert!(AngularBin::from_deg(10.0, 181.0).is_err());
  }

  #[test]
  fn test_contains() {
    let bin = AngularBin::from_deg(1.0, 2.0).unwrap();
    let p1 = Point::from_deg(0.0, 0.0).unwrap();
    assert!(bin.contains(&p1, &Point::from_deg(1.5, 0.0).unwrap()));
    assert!(!bin.contains(&p1, &Point::from_deg(0.5, 0.0).unwrap()));
    assert!(!bin.contains(&p1, &Point::from_deg(2.5, 0.0).unwrap()));
    assert!(!bin.contains(&p1, &p1));
  }
}
