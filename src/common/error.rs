use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkyBoundError {
  #[error("Unexpected SkyBound longitude. Expected: [0, 360[. Actual: {lon_deg}.")]
  UnexpectedLongitude { lon_deg: f64 },
  #[error("Unexpected SkyBound latitude. Expected: [-90, 90]. Actual: {lat_deg}.")]
  UnexpectedLatitude { lat_deg: f64 },
  #[error("Unexpected axis norm. Expected: 1. Actual: {norm}.")]
  UnexpectedAxisNorm { norm: f64 },
  #[error("Unexpected cap height. Expected: [0, 2] (or negative for an empty cap). Actual: {height}.")]
  UnexpectedCapHeight { height: f64 },
  #[error("Unexpected cap radius. Expected: [0, 180]. Actual: {r_deg}.")]
  UnexpectedCapRadius { r_deg: f64 },
  #[error("Unexpected angular bin. Expected: 0 <= theta_min < theta_max <= 180. Actual: [{theta_min_deg}, {theta_max_deg}[.")]
  UnexpectedAngularBin {
    theta_min_deg: f64,
    theta_max_deg: f64,
  },
  #[error("Unable to draw a random point in an empty bound.")]
  EmptyBoundSampling,
  #[error("Unable to draw a weight from an empty list of reference points.")]
  EmptyReferencePoints,
}
