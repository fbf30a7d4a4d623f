pub mod link;
pub mod map;
pub mod presenter;
pub mod view;

pub use link::directions_link;
pub use map::{Layer, LayerHandle, LineStyle, MapSurface, MarkerStyle, RecordedMap};
pub use presenter::{MapOverlay, ResultPresenter};
pub use view::{HtmlView, ListContent, ListItem, ResultView, TerminalView, Tone};
