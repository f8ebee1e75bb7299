pub const HALF_PI: f64 = 0.5 * std::f64::consts::PI;
pub const PI: f64 = std::f64::consts::PI;
pub const TWICE_PI: f64 = 2.0 * std::f64::consts::PI;
pub const FOUR_PI: f64 = 4.0 * std::f64::consts::PI;

/// Maximum accepted deviation of `|v|^2` from 1 for a vector to be considered a unit vector.
pub const UNIT_NORM_TOLERANCE: f64 = 1.0e-10;

/// Vector in a 3-dimensional Euclidean space.
pub type Vec3 = (f64, f64, f64);
/// Unit vector in a 3-dimensional Euclidean space, i.e. the norm = 1
/// (i.e. position on the unit sphere).
pub type UnitVec3 = (f64, f64, f64);

pub trait Customf64 {
  fn pow2(self) -> f64;
}

impl Customf64 for f64 {
  /// Returns x^2
  fn pow2(self) -> f64 {
    self * self
  }
}

pub fn lonlat_to_xyz(lon: f64, lat: f64) -> UnitVec3 {
  let (sa, ca) = lon.sin_cos(); // ca, sa stands for cos(alpha), sin(alpha)
  let (sd, cd) = lat.sin_cos(); // cd, sd stands for cos(delta), sin(delta)
  (ca * cd, sa * cd, sd)
}

pub fn xyz_to_lonlat(x: f64, y: f64, z: f64) -> (f64, f64) {
  // Length of the projection on the xy plane
  let r2 = x.pow2() + y.pow2();
  // Latitude in [-pi/2, pi/2] (ok, since cos always positive here)
  let lat = z.atan2(r2.sqrt());
  // Compute the longitude in [-pi, pi]
  let r2 = y.atan2(x);
  // Conforms to convention: Longitude in [0, 2*PI]
  let lon = if r2 < 0.0 { TWICE_PI + r2 } else { r2 };
  (lon, lat)
}

pub fn squared_norm(v: &Vec3) -> f64 {
  v.0 * v.0 + v.1 * v.1 + v.2 * v.2
}

pub fn time(cte: f64, v: &Vec3) -> Vec3 {
  (cte * v.0, cte * v.1, cte * v.2)
}

pub fn add(lhs: &Vec3, rhs: &Vec3) -> Vec3 {
  (lhs.0 + rhs.0, lhs.1 + rhs.1, lhs.2 + rhs.2)
}

pub fn norm(v: &Vec3) -> f64 {
  squared_norm(v).sqrt()
}

pub fn normalized(v: &Vec3) -> UnitVec3 {
  time(1.0 / norm(v), v)
}

pub fn scalar_product(lhs: &Vec3, rhs: &Vec3) -> f64 {
  lhs.0 * rhs.0 + lhs.1 * rhs.1 + lhs.2 * rhs.2
}

pub fn cross_product(lhs: &Vec3, rhs: &Vec3) -> Vec3 {
  (
    lhs.1 * rhs.2 - lhs.2 * rhs.1,
    lhs.2 * rhs.0 - lhs.0 * rhs.2,
    lhs.0 * rhs.1 - lhs.1 * rhs.0,
  )
}

/// Rotates `v` by `angle` radians around the **unit** vector `k` (right-hand rule),
/// using the Rodrigues' rotation formula:
/// `v' = v cos(a) + (k x v) sin(a) + k (k.v) (1 - cos(a))`
pub fn rotate_around_unit_axis(v: &Vec3, k: &UnitVec3, angle: f64) -> Vec3 {
  let (s, c) = angle.sin_cos();
  let v_rot = add(&time(c, v), &time(s, &cross_product(k, v)));
  add(&v_rot, &time(scalar_product(k, v) * (1.0 - c), k))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lonlat_xyz() {
    let (lon, lat) = (1.2_f64, -0.3_f64);
    let (x, y, z) = lonlat_to_xyz(lon, lat);
    assert!((squared_norm(&(x, y, z)) - 1.0).abs() < 1e-15);
    let (lon2, lat2) = xyz_to_lonlat(x, y, z);
    assert!((lon - lon2).abs() < 1e-14);
    assert!((lat - lat2).abs() < 1e-14);
  }

  #[test]
  fn test_rotate_quarter_turn() {
    // x rotated by pi/2 around z gives y
    let v = rotate_around_unit_axis(&(1.0, 0.0, 0.0), &(0.0, 0.0, 1.0), HALF_PI);
    assert!(v.0.abs() < 1e-15);
    assert!((v.1 - 1.0).abs() < 1e-15);
    assert!(v.2.abs() < 1e-15);
  }
}
