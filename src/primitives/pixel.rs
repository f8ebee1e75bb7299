use std::ops::Range;

use cdshealpix::{
  n_hash,
  nested::{hash, vertices},
  DEPTH_MAX,
};

use crate::{common::math::FOUR_PI, primitives::point::Point};

/// Default depth at which the descent in the HEALPix cell hierarchy stops
/// (cells of ~6.4 arcsec).
pub const DEFAULT_MAX_DEPTH: u8 = 15;

/// Upper bound, in radians, on the angular distance between a depth `0` HEALPix cell edge
/// and the great circle arc joining its two vertices. The bound is divided by 2 at each depth.
/// The largest measured distance is ~0.0786 rad (4.5 deg), reached by base cell edges.
const HPX_EDGE_TO_ARC_MAX_DIST_D0: f64 = 0.1;

/// A spherical quadrilateral cell of a hierarchical (quad-tree) sky pixelization.
pub trait Pixel: Sized {
  type Children: Iterator<Item = Self>;

  /// Resolution level of the cell, `0` being the coarsest.
  fn depth(&self) -> u8;

  /// Returns the `k`-th vertex, `k` in `[0, 4[`, vertices being counter-clockwise
  /// ordered when seen from outside the sphere.
  fn vertex(&self, k: usize) -> Point;

  /// Returns the 4 vertices, in the [Pixel::vertex] order.
  fn vertices(&self) -> [Point; 4] {
    [self.vertex(0), self.vertex(1), self.vertex(2), self.vertex(3)]
  }

  /// Returns the unit normal of the great circle going through vertices `k` and `k + 1 (mod 4)`,
  /// pointing toward the cell interior.
  fn edge(&self, k: usize) -> Point;

  /// Returns the 4 edge normals, in the [Pixel::edge] order.
  fn edges(&self) -> [Point; 4] {
    [self.edge(0), self.edge(1), self.edge(2), self.edge(3)]
  }

  /// Upper bound, in radians, on the distance between the true cell border and the
  /// great circle arcs joining its vertices. `0` for cells bounded by great circle arcs.
  fn boundary_margin(&self) -> f64 {
    0.0
  }

  /// Returns `true` if the given point is inside the cell.
  fn contains(&self, p: &Point) -> bool;

  /// Exact surface area of the cell, in steradians.
  fn exact_area(&self) -> f64;

  /// The 4 children of the cell at the next depth, or nothing if the cell is at the
  /// finest depth allowed.
  fn children(&self) -> Self::Children;
}

/// A HEALPix NESTED cell.
///
/// The descent in the cell hierarchy stops at `max_depth` (by default [DEFAULT_MAX_DEPTH],
/// or the cell depth if larger): at that depth, [Pixel::children] returns an empty iterator.
///
/// # Remark
/// HEALPix cell edges are not great circle arcs. [Pixel::edge] returns the normals of the
/// great circle arcs joining consecutive vertices, and [Pixel::boundary_margin] bounds the
/// distance between those arcs and the true edges. Point containment and area are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpxPixel {
  /// HEALPix depth
  depth: u8,
  /// HEALPix cell hash value (i.e. cell number at the given depth)
  hash: u64,
  /// Depth at which the recursive descent stops
  max_depth: u8,
}

impl HpxPixel {
  /// # Panics
  /// * if `depth` not in `[0, 29]`
  /// * if `hash` not in `[0, 12 * 2^(2*depth)[`
  pub fn new(depth: u8, hash: u64) -> Self {
    assert!(depth <= DEPTH_MAX);
    assert!(hash < n_hash(depth));
    Self {
      depth,
      hash,
      max_depth: DEFAULT_MAX_DEPTH.max(depth),
    }
  }

  /// Cell of given `depth` containing the given point.
  ///
  /// # Panics
  /// * if `depth` not in `[0, 29]`
  pub fn from_point(depth: u8, p: &Point) -> Self {
    let (lon, lat) = p.to_lonlat();
    Self::new(depth, hash(depth, lon, lat))
  }

  /// The 12 depth `0` cells, covering the full sky.
  ///
  /// # Panics
  /// * if `max_depth` not in `[0, 29]`
  pub fn base_cells(max_depth: u8) -> impl Iterator<Item = HpxPixel> {
    (0..n_hash(0)).map(move |h| HpxPixel::new(0, h).with_max_depth(max_depth))
  }

  /// Set the depth at which the recursive descent in the cell hierarchy stops.
  /// A `max_depth` smaller than the cell depth is interpreted as the cell depth.
  ///
  /// # Panics
  /// * if `max_depth` not in `[0, 29]`
  pub fn with_max_depth(mut self, max_depth: u8) -> Self {
    assert!(max_depth <= DEPTH_MAX);
    self.max_depth = max_depth.max(self.depth);
    self
  }

  pub fn hash(&self) -> u64 {
    self.hash
  }

  pub fn max_depth(&self) -> u8 {
    self.max_depth
  }
}

impl Pixel for HpxPixel {
  type Children = HpxChildren;

  fn depth(&self) -> u8 {
    self.depth
  }

  fn vertex(&self, k: usize) -> Point {
    let (lon, lat) = vertices(self.depth, self.hash)[k & 3];
    Point::from_lonlat(lon, lat)
  }

  fn vertices(&self) -> [Point; 4] {
    vertices(self.depth, self.hash).map(|(lon, lat)| Point::from_lonlat(lon, lat))
  }

  fn edge(&self, k: usize) -> Point {
    let v = self.vertices();
    v[k & 3].cross(&v[(k + 1) & 3]).normalized()
  }

  fn edges(&self) -> [Point; 4] {
    let v = self.vertices();
    [0, 1, 2, 3].map(|k| v[k].cross(&v[(k + 1) & 3]).normalized())
  }

  fn boundary_margin(&self) -> f64 {
    HPX_EDGE_TO_ARC_MAX_DIST_D0 / ((1_u64 << self.depth) as f64)
  }

  fn contains(&self, p: &Point) -> bool {
    let (lon, lat) = p.to_lonlat();
    self.hash == hash(self.depth, lon, lat)
  }

  fn exact_area(&self) -> f64 {
    FOUR_PI / (n_hash(self.depth) as f64)
  }

  fn children(&self) -> Self::Children {
    let hashes = if self.depth < self.max_depth {
      let start = self.hash << 2;
      start..start + 4
    } else {
      0..0
    };
    HpxChildren {
      depth: self.depth + 1,
      max_depth: self.max_depth,
      hashes,
    }
  }
}

/// Iterator over the children of a [HpxPixel].
#[derive(Debug, Clone)]
pub struct HpxChildren {
  depth: u8,
  max_depth: u8,
  hashes: Range<u64>,
}

impl Iterator for HpxChildren {
  type Item = HpxPixel;

  fn next(&mut self) -> Option<Self::Item> {
    self.hashes.next().map(|hash| HpxPixel {
      depth: self.depth,
      hash,
      max_depth: self.max_depth,
    })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.hashes.size_hint()
  }
}
