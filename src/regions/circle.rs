use std::sync::OnceLock;

use cdshealpix::{best_starting_depth, has_best_starting_depth, DEPTH_MAX};
use rand::Rng;
use tracing::debug;

use crate::{
  common::{
    error::SkyBoundError,
    math::{Customf64, PI, TWICE_PI, UNIT_NORM_TOLERANCE},
  },
  primitives::{angular_bin::AngularBin, pixel::Pixel, point::Point},
  SkyBound,
};

/// A spherical cap: the set of points whose angular distance to `axis` is lower than or
/// equal to a given radius.
///
/// The radius is stored as the cap height `h = 1 - cos(radius)`:
/// * `h < 0` is the empty bound;
/// * `h = 0` contains the axis only;
/// * `h = 1` is a hemisphere;
/// * `h = 2` is the full sphere.
#[derive(Debug, Clone)]
pub struct CircleBound {
  /// Cap center, a unit vector
  axis: Point,
  /// Cap height, `1 - cos(radius)`
  height: f64,
  /// Rotation bringing the z-axis on `axis`, computed at the first random draw.
  random_frame: OnceLock<RandomFrame>,
}

/// Rotation of angle `rotate` around `great_circle_norm`, used to move points drawn
/// around the north pole to the cap position.
#[derive(Debug, Clone, Copy)]
struct RandomFrame {
  rotate: f64,
  great_circle_norm: Point,
}

impl RandomFrame {
  fn new(axis: &Point) -> Self {
    let z_axis = Point::new(0.0, 0.0, 1.0);
    let mut great_circle_norm = z_axis.cross(axis);
    if great_circle_norm.norm() == 0.0 {
      // axis = +/-z: any horizontal rotation axis will do
      great_circle_norm = Point::new(1.0, 0.0, 0.0);
    }
    let rotate = axis.dot(&z_axis).clamp(-1.0, 1.0).acos();
    debug!(rotate, "Random frame initialized");
    Self {
      rotate,
      great_circle_norm,
    }
  }
}

impl Default for CircleBound {
  fn default() -> Self {
    Self::empty()
  }
}

impl CircleBound {
  /// Create a new cap from its axis and its height.
  /// # params
  /// * `axis`: center of the cap, must be a unit vector
  /// * `height`: `1 - cos(radius)`, in `[0, 2]`, or negative for an empty cap
  pub fn from_height(axis: Point, height: f64) -> Result<Self, SkyBoundError> {
    check_axis(&axis)?;
    if height.is_nan() || height > 2.0 {
      debug!(height, "Cap height rejected");
      Err(SkyBoundError::UnexpectedCapHeight { height })
    } else {
      Ok(Self::new(axis, height))
    }
  }

  /// Create a new cap from its axis and its radius expressed in degrees.
  /// # params
  /// * `axis`: center of the cap, must be a unit vector
  /// * `radius_deg`: radius of the cap, in `[0, 180]` degrees
  pub fn from_radius(axis: Point, radius_deg: f64) -> Result<Self, SkyBoundError> {
    check_axis(&axis)?;
    if !(0.0..=180.0).contains(&radius_deg) {
      debug!(radius_deg, "Cap radius rejected");
      Err(SkyBoundError::UnexpectedCapRadius { r_deg: radius_deg })
    } else {
      Ok(Self::new(axis, 1.0 - radius_deg.to_radians().cos()))
    }
  }

  /// Create a new cap whose radius is the upper separation of the given angular bin.
  pub fn from_angular_bin(axis: Point, bin: &AngularBin) -> Result<Self, SkyBoundError> {
    check_axis(&axis)?;
    Ok(Self::new(axis, 1.0 - bin.cos_theta_max()))
  }

  /// Quick creation of a new cap, input parameters **must** have already been checked
  /// to avoid a `panic!`.
  ///
  /// # Panics
  /// * if `axis` is not a unit vector
  /// * if `height` is NaN or larger than 2
  pub fn new(axis: Point, height: f64) -> Self {
    assert!((axis.dot(&axis) - 1.0).abs() <= UNIT_NORM_TOLERANCE);
    assert!(height <= 2.0);
    Self {
      axis,
      height,
      random_frame: OnceLock::new(),
    }
  }

  /// The empty bound.
  pub fn empty() -> Self {
    Self::new(Point::new(0.0, 0.0, 1.0), -1.0)
  }

  pub fn axis(&self) -> &Point {
    &self.axis
  }

  pub fn height(&self) -> f64 {
    self.height
  }

  /// Angular radius, in radians (`0` for an empty bound).
  pub fn radius(&self) -> f64 {
    if self.is_empty() {
      0.0
    } else {
      (1.0 - self.height).clamp(-1.0, 1.0).acos()
    }
  }

  /// Returns `true` if the bound covers the full sphere.
  pub fn is_full(&self) -> bool {
    self.height >= 2.0
  }

  /// All the points not in this bound (up to the border, shared by both bounds).
  /// The complement of the empty bound is the full sphere.
  pub fn complement(&self) -> CircleBound {
    let height = if self.is_empty() {
      2.0
    } else {
      2.0 - self.height
    };
    Self::new(-self.axis, height)
  }

  /// Returns `true` if the border of this bound crosses the interior of one of the edges of
  /// the given cell, or if the cell contains the bound axis.
  /// The vertices of the cell have to be provided, and are supposed **not** to be in the bound.
  /// Edges are the great circle arcs joining the vertices: the axis being inside the polygon
  /// they form counts as an intersection, even if the true cell does not contain it.
  ///
  /// Always returns `false` for bounds larger than, or equal to, an hemisphere: such a bound
  /// overlapping a cell necessarily contains one of its vertices.
  pub fn intersects<P: Pixel>(&self, pix: &P, vertices: &[Point; 4]) -> bool {
    if self.height >= 1.0 || self.is_empty() {
      return false;
    }
    if pix.contains(&self.axis) {
      return true;
    }
    let edges = pix.edges();
    let dots = edges.map(|edge| self.axis.dot(&edge));
    if dots.iter().all(|&dot| dot > 0.0) {
      return true;
    }
    // sin^2 of the cap radius
    let sin2_radius = self.height * (2.0 - self.height);
    (0..4).any(|k| {
      let edge = &edges[k];
      let dot = dots[k];
      // dot > 0: the axis is on the inner side of the edge, the edge is not the closest one.
      // dot^2 > sin2_radius: the edge great circle does not reach the cap.
      if dot > 0.0 || dot.pow2() > sin2_radius {
        false
      } else {
        // The edge great circle crosses the cap: check that its point closest to the axis
        // lies between the two edge vertices.
        let dir = edge.cross(&self.axis);
        dir.dot(&vertices[k]) < 0.0 && dir.dot(&vertices[(k + 1) & 3]) > 0.0
      }
    })
  }

  /// This bound with a radius enlarged by `margin` radians (capped at the full sphere).
  /// Empty bounds stay empty.
  fn dilated(&self, margin: f64) -> CircleBound {
    if margin <= 0.0 || self.is_empty() || self.is_full() {
      self.clone()
    } else {
      let radius = (self.radius() + margin).min(PI);
      Self::new(self.axis, 1.0 - radius.cos())
    }
  }

  fn random_frame(&self) -> &RandomFrame {
    self.random_frame.get_or_init(|| RandomFrame::new(&self.axis))
  }
}

fn check_axis(axis: &Point) -> Result<(), SkyBoundError> {
  let n2 = axis.dot(axis);
  if (n2 - 1.0).abs() > UNIT_NORM_TOLERANCE {
    debug!(n2, "Cap axis rejected");
    Err(SkyBoundError::UnexpectedAxisNorm { norm: n2.sqrt() })
  } else {
    Ok(())
  }
}

impl SkyBound for CircleBound {
  fn is_empty(&self) -> bool {
    self.height < 0.0
  }

  fn size(&self) -> usize {
    if self.is_empty() {
      0
    } else {
      1
    }
  }

  fn area(&self) -> f64 {
    if self.is_empty() {
      0.0
    } else {
      TWICE_PI * self.height
    }
  }

  fn contains(&self, p: &Point) -> bool {
    self.is_full() || 1.0 - self.axis.dot(p) <= self.height
  }

  fn contains_pixel<P: Pixel>(&self, pix: &P) -> bool {
    if self.is_full() {
      return true;
    }
    if !pix.vertices().iter().all(|v| self.contains(v)) {
      return false;
    }
    // All vertices are in the bound, but its border may still cross the cell.
    !self.complement().may_intersect(pix)
  }

  fn may_intersect<P: Pixel>(&self, pix: &P) -> bool {
    // Enlarged by the distance between the true cell border and the arcs joining its vertices
    let bound = self.dilated(pix.boundary_margin());
    let vertices = pix.vertices();
    vertices.iter().any(|v| bound.contains(v)) || bound.intersects(pix, &vertices)
  }

  fn get_random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point, SkyBoundError> {
    if self.is_empty() {
      return Err(SkyBoundError::EmptyBoundSampling);
    }
    let frame = self.random_frame();
    // Uniform in cos(theta), from the cap border to its center, and uniform in phi
    let z = 1.0 - self.height + self.height * rng.gen::<f64>();
    let phi = rng.gen_range(0.0..TWICE_PI);
    let sin_theta = (1.0 - z.pow2()).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    // Point drawn around the north pole, then moved to the true cap position
    let mut p = Point::new(sin_theta * cos_phi, sin_theta * sin_phi, z);
    p.rotate_about(&frame.great_circle_norm, frame.rotate);
    Ok(p)
  }

  fn characteristic_depth(&self) -> u8 {
    let r = self.radius();
    if has_best_starting_depth(r) {
      (best_starting_depth(r) + 2).min(DEPTH_MAX)
    } else {
      2
    }
  }
}
