use super::map::{LayerHandle, LineStyle, MapSurface, MarkerStyle};
use super::view::{distance_label, escape_html, ListContent, ListItem, ResultView};
use crate::sdk::error::FlowError;
use crate::sdk::geolocation::GeoPosition;
use crate::sdk::recommend::{RecommendationOutcome, RecommendationResult};

/// Layers drawn for the current result set. The user marker is not part of it.
#[derive(Debug, Default)]
pub struct MapOverlay {
    markers: Vec<LayerHandle>,
    routes: Vec<LayerHandle>,
}

impl MapOverlay {
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.routes.is_empty()
    }

    fn clear<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        for handle in self.markers.drain(..).chain(self.routes.drain(..)) {
            map.remove_layer(handle);
        }
    }
}

/// Renders outcomes into the list view and keeps the map overlay in step with them.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    overlay: MapOverlay,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> &MapOverlay {
        &self.overlay
    }

    pub fn show_loading<V: ResultView + ?Sized>(&mut self, view: &mut V) {
        view.render(ListContent::Loading);
    }

    pub fn present<M, V>(
        &mut self,
        outcome: RecommendationOutcome,
        user: Option<GeoPosition>,
        map: &mut M,
        view: &mut V,
    ) where
        M: MapSurface + ?Sized,
        V: ResultView + ?Sized,
    {
        match outcome.into_results() {
            Ok(results) => {
                view.render(ListContent::Results(
                    results.iter().map(ListItem::from).collect(),
                ));
                self.redraw(&results, user, map);
            }
            Err(failure) => {
                view.render(ListContent::Message {
                    tone: failure.tone(),
                    text: failure.to_string(),
                });
                // Zero results invalidates the old overlay; a failed request does not.
                if matches!(failure, FlowError::EmptyResult) {
                    self.overlay.clear(map);
                }
            }
        }
    }

    fn redraw<M: MapSurface + ?Sized>(
        &mut self,
        results: &[RecommendationResult],
        user: Option<GeoPosition>,
        map: &mut M,
    ) {
        self.overlay.clear(map);

        for result in results {
            let Some(target) = result.position() else {
                log::debug!("No coordinates for {:?}, listing without a marker", result.name);
                continue;
            };

            let marker = map.add_marker(target, MarkerStyle::Result);
            map.bind_popup(marker, &popup_html(result));
            self.overlay.markers.push(marker);

            if let Some(origin) = user {
                let route = map.add_polyline(&[origin, target], &LineStyle::route());
                self.overlay.routes.push(route);
            }
        }

        log::debug!(
            "Overlay redrawn: {} markers, {} routes",
            self.overlay.marker_count(),
            self.overlay.route_count()
        );
    }
}

fn popup_html(result: &RecommendationResult) -> String {
    format!(
        "<b>{}</b><br/>{}<br/>{}",
        escape_html(&result.name),
        escape_html(&result.kind),
        distance_label(result.distance())
    )
}
