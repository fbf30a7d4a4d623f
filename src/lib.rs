pub mod sdk;

pub use sdk::config::{ClientConfig, ConfigError, RequestPolicy};
pub use sdk::error::FlowError;
pub use sdk::geolocation::{GeoPosition, PositionSource};
pub use sdk::locations::{CascadingSelector, LocationSource, LocationTree, SelectorState};
pub use sdk::present::{HtmlView, MapSurface, RecordedMap, ResultView, TerminalView};
pub use sdk::recommend::{FormState, RecommendationClient, RecommendationOutcome};
pub use sdk::session::{RequestTicket, Session};
