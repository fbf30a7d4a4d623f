pub mod acquire;
pub mod source;

pub use acquire::{GeolocationAcquirer, USER_ZOOM};
pub use source::{
    FixedPositionSource, GeoPosition, GeolocationError, PositionSource, UnavailablePositionSource,
};
