use std::ops::Neg;

use crate::common::{
  error::SkyBoundError,
  lat_deg2rad, lon_deg2rad,
  math::{
    cross_product, lonlat_to_xyz, norm, normalized, rotate_around_unit_axis, scalar_product,
    xyz_to_lonlat, Vec3,
  },
};

/// A position on the unit sphere, carrying an optional scalar weight (`1.0` by default).
///
/// The constructors always return unit vectors. The result of [Point::cross] is the only
/// way to obtain a non-unit `Point`: it is the raw cross product, used as a great circle
/// normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  x: f64,
  y: f64,
  z: f64,
  weight: f64,
}

impl Point {
  /// Creates a new unit point from the (possibly non-normalized) given cartesian coordinates.
  ///
  /// # Panics
  /// * if `(x, y, z)` is the null vector.
  pub fn new(x: f64, y: f64, z: f64) -> Self {
    Self::with_weight(x, y, z, 1.0)
  }

  /// Same as [Point::new], with a given `weight`.
  ///
  /// # Panics
  /// * if `(x, y, z)` is the null vector.
  pub fn with_weight(x: f64, y: f64, z: f64, weight: f64) -> Self {
    let v = (x, y, z);
    assert!(norm(&v) > 0.0, "A point can't be built from the null vector");
    Self::from_vec3(normalized(&v), weight)
  }

  /// # params
  /// * `lon`: longitude, in radians
  /// * `lat`: latitude, in radians
  pub fn from_lonlat(lon: f64, lat: f64) -> Self {
    Self::from_vec3(lonlat_to_xyz(lon, lat), 1.0)
  }

  /// Create a new point from coordinates expressed in degrees.
  /// # params
  /// * `lon_deg`: longitude, in `[0, 360[` degrees
  /// * `lat_deg`: latitude, in `[-90, 90]` degrees
  pub fn from_deg(lon_deg: f64, lat_deg: f64) -> Result<Self, SkyBoundError> {
    let lon = lon_deg2rad(lon_deg)?;
    let lat = lat_deg2rad(lat_deg)?;
    Ok(Self::from_lonlat(lon, lat))
  }

  fn from_vec3(v: Vec3, weight: f64) -> Self {
    Self {
      x: v.0,
      y: v.1,
      z: v.2,
      weight,
    }
  }

  fn xyz(&self) -> Vec3 {
    (self.x, self.y, self.z)
  }

  pub fn x(&self) -> f64 {
    self.x
  }

  pub fn y(&self) -> f64 {
    self.y
  }

  pub fn z(&self) -> f64 {
    self.z
  }

  pub fn weight(&self) -> f64 {
    self.weight
  }

  pub fn set_weight(&mut self, weight: f64) {
    self.weight = weight;
  }

  pub fn norm(&self) -> f64 {
    norm(&self.xyz())
  }

  /// Returns this vector scaled to unit length, the null vector is returned unchanged.
  pub fn normalized(&self) -> Self {
    let n = self.norm();
    if n > 0.0 {
      Self::from_vec3(normalized(&self.xyz()), self.weight)
    } else {
      *self
    }
  }

  /// Scalar product, i.e. the cosine of the angular distance between two unit points.
  pub fn dot(&self, rhs: &Point) -> f64 {
    scalar_product(&self.xyz(), &rhs.xyz())
  }

  /// Raw (non-normalized) cross product `self x rhs`.
  pub fn cross(&self, rhs: &Point) -> Point {
    Self::from_vec3(cross_product(&self.xyz(), &rhs.xyz()), 1.0)
  }

  /// Rotates this point, in place, by `angle` radians around `axis` (right-hand rule).
  /// The axis does not have to be normalized. Rotating around the null vector does nothing.
  pub fn rotate_about(&mut self, axis: &Point, angle: f64) {
    let n = axis.norm();
    if n > 0.0 {
      let k = normalized(&axis.xyz());
      let (x, y, z) = rotate_around_unit_axis(&self.xyz(), &k, angle);
      self.x = x;
      self.y = y;
      self.z = z;
    }
  }

  /// Returns `(lon, lat)`, in radians, with `lon` in `[0, 2\pi[` and `lat` in `[-\pi/2, \pi/2]`.
  pub fn to_lonlat(&self) -> (f64, f64) {
    xyz_to_lonlat(self.x, self.y, self.z)
  }

  /// Angular distance to the given point, in radians.
  /// Uses `atan2(|a x b|, a.b)`, accurate both for small and for nearly antipodal separations.
  pub fn angular_distance(&self, rhs: &Point) -> f64 {
    self.cross(rhs).norm().atan2(self.dot(rhs))
  }
}

impl Neg for Point {
  type Output = Point;

  /// Antipode, the weight is kept.
  fn neg(self) -> Self::Output {
    Self::from_vec3((-self.x, -self.y, -self.z), self.weight)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::math::{HALF_PI, PI};

  #[test]
  fn test_new_is_normalized() {
    let p = Point::new(3.0, 0.0, 4.0);
    assert!((p.norm() - 1.0).abs() < 1e-15);
    assert!((p.x() - 0.6).abs() < 1e-15);
    assert!((p.z() - 0.8).abs() < 1e-15);
    assert_eq!(p.weight(), 1.0);
  }

  #[test]
  #[should_panic]
  fn test_new_null_vector() {
    Point::new(0.0, 0.0, 0.0);
  }

  #[test]
  fn test_from_deg() {
    let p = Point::from_deg(90.0, 0.0).unwrap();
    assert!(p.x().abs() < 1e-15);
    assert!((p.y() - 1.0).abs() < 1e-15);
    assert!(Point::from_deg(0.0, 91.0).is_err());
    assert!(Point::from_deg(400.0, 0.0).is_err());
  }

  #[test]
  fn test_cross_and_dot() {
    let x = Point::new(1.0, 0.0, 0.0);
    let y = Point::new(0.0, 1.0, 0.0);
    let z = x.cross(&y);
    assert_eq!(z, Point::new(0.0, 0.0, 1.0));
    assert_eq!(x.dot(&y), 0.0);
    assert_eq!(z.dot(&z), 1.0);
  }

  #[test]
  fn test_rotate_about() {
    let mut p = Point::new(0.0, 0.0, 1.0);
    // Non-normalized rotation axis
    p.rotate_about(&Point::new(0.0, 1.0, 0.0).cross(&Point::new(0.0, 0.0, 2.0)), HALF_PI);
    // Rotating z around x by +pi/2 gives -y
    assert!(p.x().abs() < 1e-15);
    assert!((p.y() + 1.0).abs() < 1e-15);
    assert!(p.z().abs() < 1e-15);
  }

  #[test]
  fn test_rotate_keeps_weight() {
    let mut p = Point::with_weight(1.0, 1.0, 0.0, 3.5);
    p.rotate_about(&Point::new(0.0, 0.0, 1.0), PI);
    assert_eq!(p.weight(), 3.5);
    assert!((p.norm() - 1.0).abs() < 1e-15);
  }

  #[test]
  fn test_angular_distance() {
    let a = Point::from_deg(10.0, 20.0).unwrap();
    let b = Point::from_deg(10.0, 25.0).unwrap();
    assert!((a.angular_distance(&b) - 5.0_f64.to_radians()).abs() < 1e-14);
    assert!((a.angular_distance(&-a) - PI).abs() < 1e-15);
  }

  #[test]
  fn test_to_lonlat() {
    let (lon, lat) = Point::from_deg(250.0, -30.0).unwrap().to_lonlat();
    assert!((lon - 250.0_f64.to_radians()).abs() < 1e-14);
    assert!((lat + 30.0_f64.to_radians()).abs() < 1e-14);
  }
}
