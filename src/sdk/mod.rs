pub mod config;
pub mod error;
pub mod geolocation;
pub mod locations;
pub mod present;
pub mod recommend;
pub mod session;
pub mod util;
