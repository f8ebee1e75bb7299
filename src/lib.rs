use rand::Rng;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::trace;

use cdshealpix::{best_starting_depth, has_best_starting_depth, DEPTH_MAX};

pub mod common;
pub mod primitives;
pub mod regions;

use self::{
  common::{
    error::SkyBoundError,
    math::{PI, TWICE_PI},
  },
  primitives::{
    pixel::{HpxPixel, Pixel},
    point::Point,
  },
};

/// Define a SkyBound, i.e. a region of the unit sphere that can be tested against points and
/// pixelization cells, integrated over a cell hierarchy and randomly sampled.
pub trait SkyBound: Send + Sync {
  /// Returns `true` if the bound contains no point at all.
  fn is_empty(&self) -> bool;

  /// Number of disjoint pieces the bound is made of.
  fn size(&self) -> usize;

  /// Returns the surface area, in steradians.
  fn area(&self) -> f64;

  /// Returns `true` if the given position is inside the bound.
  fn contains(&self, p: &Point) -> bool;

  /// Returns `true` if the given cell is entirely inside the bound.
  fn contains_pixel<P: Pixel>(&self, pix: &P) -> bool;

  /// Returns `true` if the bound possibly overlaps the given cell.
  /// May return false positives, never false negatives.
  fn may_intersect<P: Pixel>(&self, pix: &P) -> bool;

  /// Draws a point uniformly distributed (in area) in the bound.
  fn get_random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point, SkyBoundError>;

  /// Surface area, in steradians, of the part of the given cell inside the bound.
  /// The cell hierarchy is refined where the bound border crosses the cells, down to the
  /// finest depth the cells accept to be divided in (cells at that depth overlapping the
  /// bound border count for nothing).
  fn contained_area<P: Pixel>(&self, pix: &P) -> f64 {
    self.contained_area_to_depth(pix, u8::MAX)
  }

  /// Same as [SkyBound::contained_area], but never refines cells deeper than `max_depth`.
  fn contained_area_to_depth<P: Pixel>(&self, pix: &P, max_depth: u8) -> f64 {
    if self.contains_pixel(pix) {
      pix.exact_area()
    } else if pix.depth() < max_depth && self.may_intersect(pix) {
      trace!(depth = pix.depth(), "Refine cell overlapping the bound border");
      pix
        .children()
        .map(|child| self.contained_area_to_depth(&child, max_depth))
        .sum()
    } else {
      0.0
    }
  }

  /// Surface area, in steradians, of the bound estimated from the HEALPix cells hierarchy
  /// (starting from the 12 base cells) refined down to `max_depth`.
  ///
  /// # Panics
  /// * if `max_depth` not in `[0, 29]`
  fn sky_contained_area(&self, max_depth: u8) -> f64 {
    let base_cells = HpxPixel::base_cells(max_depth);
    #[cfg(feature = "rayon")]
    let area: f64 = base_cells
      .collect::<Vec<HpxPixel>>()
      .into_par_iter()
      .map(|pix| self.contained_area(&pix))
      .sum();
    #[cfg(not(feature = "rayon"))]
    let area: f64 = base_cells.map(|pix| self.contained_area(&pix)).sum();
    area
  }

  /// Draws `n_points` random points, replacing the content of `points`.
  fn get_random_points<R: Rng + ?Sized>(
    &self,
    n_points: usize,
    points: &mut Vec<Point>,
    rng: &mut R,
  ) -> Result<(), SkyBoundError> {
    if self.is_empty() {
      return Err(SkyBoundError::EmptyBoundSampling);
    }
    points.clear();
    points.reserve(n_points);
    for _ in 0..n_points {
      points.push(self.get_random_point(rng)?);
    }
    Ok(())
  }

  /// Draws a random point in the bound, and assign it the weight of a point
  /// uniformly drawn from `reference_points`.
  /// The positions of the reference points are ignored: only their weight distribution matters.
  fn get_weighted_random_point<R: Rng + ?Sized>(
    &self,
    reference_points: &[Point],
    rng: &mut R,
  ) -> Result<Point, SkyBoundError> {
    if reference_points.is_empty() {
      return Err(SkyBoundError::EmptyReferencePoints);
    }
    let mut p = self.get_random_point(rng)?;
    p.set_weight(reference_points[rng.gen_range(0..reference_points.len())].weight());
    Ok(p)
  }

  /// Draws `n_points` weighted random points (see [SkyBound::get_weighted_random_point]),
  /// replacing the content of `points`.
  fn get_weighted_random_points<R: Rng + ?Sized>(
    &self,
    n_points: usize,
    points: &mut Vec<Point>,
    reference_points: &[Point],
    rng: &mut R,
  ) -> Result<(), SkyBoundError> {
    if self.is_empty() {
      return Err(SkyBoundError::EmptyBoundSampling);
    }
    if reference_points.is_empty() {
      return Err(SkyBoundError::EmptyReferencePoints);
    }
    points.clear();
    points.reserve(n_points);
    for _ in 0..n_points {
      points.push(self.get_weighted_random_point(reference_points, rng)?);
    }
    Ok(())
  }

  /// Provides the characteristic HEALPix depth of the cell overlapping the region.
  /// The returned value is a compromise between the total number of cells and out-of-area coverage.
  fn characteristic_depth(&self) -> u8 {
    let area = self.area();
    let eq_cone_radius = if area < 3.0e-8 {
      // => cone of radius ~20.1 arcsec
      // Euclidean approximation
      (area / PI).sqrt()
    } else {
      // Exact spherical computation
      (1.0 - (area / TWICE_PI)).acos()
    };
    if has_best_starting_depth(eq_cone_radius) {
      (best_starting_depth(eq_cone_radius) + 2).min(DEPTH_MAX) // if a cone => min 16 cells
    } else {
      2
    }
  }
}

impl<S: SkyBound + ?Sized> SkyBound for Box<S> {
  fn is_empty(&self) -> bool {
    (**self).is_empty()
  }
  fn size(&self) -> usize {
    (**self).size()
  }
  fn area(&self) -> f64 {
    (**self).area()
  }
  fn contains(&self, p: &Point) -> bool {
    (**self).contains(p)
  }
  fn contains_pixel<P: Pixel>(&self, pix: &P) -> bool {
    (**self).contains_pixel(pix)
  }
  fn may_intersect<P: Pixel>(&self, pix: &P) -> bool {
    (**self).may_intersect(pix)
  }
  fn get_random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point, SkyBoundError> {
    (**self).get_random_point(rng)
  }
  fn contained_area<P: Pixel>(&self, pix: &P) -> f64 {
    (**self).contained_area(pix)
  }
  fn characteristic_depth(&self) -> u8 {
    (**self).characteristic_depth()
  }
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand_chacha::ChaCha8Rng;

  use super::{
    primitives::point::Point,
    regions::circle::CircleBound,
    SkyBound,
  };

  #[test]
  fn test_boxed_bound() {
    let axis = Point::new(0.0, 0.0, 1.0);
    let bound: Box<CircleBound> = Box::new(CircleBound::from_radius(axis, 10.0).unwrap());
    assert!(bound.contains(&axis));
    assert_eq!(bound.size(), 1);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let p = bound.get_random_point(&mut rng).unwrap();
    assert!(bound.contains(&p));
  }

  #[test]
  fn test_characteristic_depth_from_area() {
    // A boxed bound uses the implementation of the boxed type
    let axis = Point::new(1.0, 0.0, 0.0);
    let bound = Box::new(CircleBound::from_radius(axis, 1.0).unwrap());
    assert_eq!(bound.characteristic_depth(), 7);
  }
}
