pub mod error;
pub mod math;

use self::{
  error::SkyBoundError,
  math::{HALF_PI, TWICE_PI},
};

pub fn lon_deg2rad(lon_deg: f64) -> Result<f64, SkyBoundError> {
  let mut lon = lon_deg.to_radians();
  if lon == TWICE_PI {
    lon = 0.0;
  }
  if !(0.0..TWICE_PI).contains(&lon) {
    Err(SkyBoundError::UnexpectedLongitude { lon_deg })
  } else {
    Ok(lon)
  }
}

pub fn lat_deg2rad(lat_deg: f64) -> Result<f64, SkyBoundError> {
  let lat = lat_deg.to_radians();
  if !(-HALF_PI..=HALF_PI).contains(&lat) {
    Err(SkyBoundError::UnexpectedLatitude { lat_deg })
  } else {
    Ok(lat)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lon_deg2rad() {
    assert_eq!(lon_deg2rad(360.0), Ok(0.0));
    assert!(lon_deg2rad(-1.0).is_err());
    assert!(lon_deg2rad(361.0).is_err());
  }

  #[test]
  fn test_lat_deg2rad() {
    assert!(lat_deg2rad(89.9).is_ok());
    assert!(lat_deg2rad(-45.0).is_ok());
    assert_eq!(
      lat_deg2rad(90.5),
      Err(SkyBoundError::UnexpectedLatitude { lat_deg: 90.5 })
    );
  }
}
