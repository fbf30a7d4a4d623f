use super::config::ClientConfig;
use super::error::FlowError;
use super::geolocation::{GeoPosition, GeolocationAcquirer, PositionSource};
use super::locations::{CascadingSelector, LocationHierarchyCache, LocationSource};
use super::present::{MapSurface, ResultPresenter, ResultView};
use super::recommend::{
    ClientError, FormState, RecommendationClient, RecommendationOutcome, RecommendationRequest,
    RequestBlocked, RequestBuilder,
};

/// Identifies one submitted request. Only the most recent ticket may present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Session-scoped owner of all mutable client state: the acquired position, the
/// selector, the overlay, plus the map and list surfaces they draw on.
pub struct Session<M: MapSurface, V: ResultView> {
    acquirer: GeolocationAcquirer,
    hierarchy: LocationHierarchyCache,
    selector: CascadingSelector,
    builder: RequestBuilder,
    client: RecommendationClient,
    presenter: ResultPresenter,
    position: Option<GeoPosition>,
    generation: u64,
    map: M,
    view: V,
}

impl<M: MapSurface, V: ResultView> Session<M, V> {
    pub fn new(config: &ClientConfig, map: M, view: V) -> Result<Self, ClientError> {
        Ok(Self::with_client(
            config,
            RecommendationClient::new(config)?,
            map,
            view,
        ))
    }

    pub fn with_client(
        config: &ClientConfig,
        client: RecommendationClient,
        map: M,
        view: V,
    ) -> Self {
        Self {
            acquirer: GeolocationAcquirer::new(config.geolocation_timeout),
            hierarchy: LocationHierarchyCache::new(),
            selector: CascadingSelector::unavailable(),
            builder: RequestBuilder::new(config.policy),
            client,
            presenter: ResultPresenter::new(),
            position: None,
            generation: 0,
            map,
            view,
        }
    }

    /// Page initialisation: position reading and hierarchy load run side by side.
    pub async fn start<P, L>(&mut self, positions: &P, locations: &L)
    where
        P: PositionSource + ?Sized,
        L: LocationSource + ?Sized,
    {
        let (position, tree) = tokio::join!(
            self.acquirer.acquire(positions, &mut self.map, &mut self.view),
            self.hierarchy.load(locations)
        );

        self.position = position;
        self.selector = match tree {
            Ok(tree) => CascadingSelector::new(tree),
            Err(err) => {
                log::error!("{}", FlowError::from(err));
                CascadingSelector::unavailable()
            }
        };
    }

    pub fn position(&self) -> Option<GeoPosition> {
        self.position
    }

    pub fn selector(&self) -> &CascadingSelector {
        &self.selector
    }

    /// User change events on the location fields go through here.
    pub fn selector_mut(&mut self) -> &mut CascadingSelector {
        &mut self.selector
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn client(&self) -> &RecommendationClient {
        &self.client
    }

    pub fn into_parts(self) -> (M, V) {
        (self.map, self.view)
    }

    /// Validates the form and shows the loading state. Blocked requests only prompt the user.
    pub fn begin_request(
        &mut self,
        form: &FormState,
    ) -> Result<(RequestTicket, RecommendationRequest), RequestBlocked> {
        let request = self
            .builder
            .build(form, self.selector.state(), self.position)
            .map_err(|blocked| {
                let prompt = FlowError::from(blocked);
                self.view.notice(prompt.tone(), &prompt.to_string());
                blocked
            })?;

        self.generation += 1;
        self.presenter.show_loading(&mut self.view);
        Ok((RequestTicket(self.generation), request))
    }

    /// Presents `outcome` unless a newer request was started after `ticket`.
    /// Returns whether the outcome was shown.
    pub fn finish_request(&mut self, ticket: RequestTicket, outcome: RecommendationOutcome) -> bool {
        if ticket.0 != self.generation {
            log::info!(
                "Discarding stale response for request {} (latest is {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.presenter
            .present(outcome, self.position, &mut self.map, &mut self.view);
        true
    }

    /// The full submit action: build, send, present.
    pub async fn submit(&mut self, form: &FormState) -> Result<(), RequestBlocked> {
        let (ticket, request) = self.begin_request(form)?;
        let outcome = self.client.send(&request).await;
        self.finish_request(ticket, outcome);
        Ok(())
    }
}
