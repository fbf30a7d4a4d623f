use std::sync::Arc;

use serde::Serialize;

use super::error::{Level, SelectorError};
use super::tree::LocationTree;

/// The "nothing chosen" option placed ahead of real options.
pub const UNSELECTED: &str = "";

/// Current choices. An empty parent always implies empty descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorState {
    country: String,
    state: String,
    city: String,
}

impl SelectorState {
    pub fn country(&self) -> Option<&str> {
        non_empty(&self.country)
    }

    pub fn state(&self) -> Option<&str> {
        non_empty(&self.state)
    }

    pub fn city(&self) -> Option<&str> {
        non_empty(&self.city)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Three dependent choice fields driven by a [`LocationTree`].
///
/// Every change event runs its reset logic, even when the value did not change.
/// Option lists are replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct CascadingSelector {
    tree: Arc<LocationTree>,
    selection: SelectorState,
    country_options: Vec<String>,
    state_options: Vec<String>,
    city_options: Vec<String>,
}

impl CascadingSelector {
    pub fn new(tree: Arc<LocationTree>) -> Self {
        let country_options = with_sentinel(tree.countries());
        Self {
            tree,
            selection: SelectorState::default(),
            country_options,
            state_options: Vec::new(),
            city_options: Vec::new(),
        }
    }

    /// A selector with no options at all, used when the hierarchy failed to load.
    pub fn unavailable() -> Self {
        Self {
            tree: Arc::default(),
            selection: SelectorState::default(),
            country_options: Vec::new(),
            state_options: Vec::new(),
            city_options: Vec::new(),
        }
    }

    pub fn state(&self) -> &SelectorState {
        &self.selection
    }

    pub fn country_options(&self) -> &[String] {
        &self.country_options
    }

    pub fn state_options(&self) -> &[String] {
        &self.state_options
    }

    pub fn city_options(&self) -> &[String] {
        &self.city_options
    }

    pub fn change_country(&mut self, value: &str) -> Result<(), SelectorError> {
        if value == UNSELECTED {
            self.selection = SelectorState::default();
            self.state_options.clear();
            self.city_options.clear();
            return Ok(());
        }

        let states = self
            .tree
            .states(value)
            .ok_or_else(|| unknown(Level::Country, value))?;
        self.state_options = with_sentinel(states);
        self.city_options.clear();
        self.selection = SelectorState {
            country: value.to_string(),
            ..SelectorState::default()
        };
        Ok(())
    }

    pub fn change_state(&mut self, value: &str) -> Result<(), SelectorError> {
        if value == UNSELECTED {
            self.selection.state.clear();
            self.selection.city.clear();
            self.city_options.clear();
            return Ok(());
        }
        if self.selection.country.is_empty() {
            return Err(SelectorError::ParentUnset(Level::State));
        }

        let cities = self
            .tree
            .cities(&self.selection.country, value)
            .ok_or_else(|| unknown(Level::State, value))?;
        self.city_options = with_sentinel(cities.iter().map(String::as_str));
        self.selection.state = value.to_string();
        self.selection.city.clear();
        Ok(())
    }

    /// Leaf level: only validates and records the choice.
    pub fn change_city(&mut self, value: &str) -> Result<(), SelectorError> {
        if value == UNSELECTED {
            self.selection.city.clear();
            return Ok(());
        }
        if self.selection.state.is_empty() {
            return Err(SelectorError::ParentUnset(Level::City));
        }
        if !self.city_options.iter().any(|city| city == value) {
            return Err(unknown(Level::City, value));
        }
        self.selection.city = value.to_string();
        Ok(())
    }
}

fn with_sentinel<'a>(options: impl Iterator<Item = &'a str>) -> Vec<String> {
    std::iter::once(UNSELECTED)
        .chain(options)
        .map(str::to_string)
        .collect()
}

fn unknown(level: Level, value: &str) -> SelectorError {
    SelectorError::UnknownOption {
        level,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn tree() -> Arc<LocationTree> {
        Arc::new(
            serde_json::from_value(json!({
                "India": {
                    "Goa": ["Panaji"],
                    "Karnataka": ["Mysuru", "Bengaluru"]
                },
                "Nepal": {"Bagmati": ["Kathmandu", "Lalitpur"]},
                "Bhutan": {}
            }))
            .unwrap(),
        )
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn assert_invariant(selector: &CascadingSelector) {
        let state = selector.state();
        if state.country().is_none() {
            assert!(state.state().is_none() && state.city().is_none());
            assert!(selector.state_options().is_empty());
        }
        if state.state().is_none() {
            assert!(state.city().is_none());
            assert!(selector.city_options().is_empty());
        }
    }

    #[test]
    fn countries_are_sorted_behind_a_sentinel() {
        let selector = CascadingSelector::new(tree());
        assert_eq!(
            selector.country_options(),
            strings(&["", "Bhutan", "India", "Nepal"]).as_slice()
        );
        assert!(selector.state_options().is_empty());
    }

    #[test]
    fn india_goa_panaji() {
        let tree: LocationTree =
            serde_json::from_value(json!({"India": {"Goa": ["Panaji"]}})).unwrap();
        let mut selector = CascadingSelector::new(Arc::new(tree));

        selector.change_country("India").unwrap();
        assert_eq!(selector.state_options(), strings(&["", "Goa"]).as_slice());

        selector.change_state("Goa").unwrap();
        assert_eq!(selector.city_options(), strings(&["", "Panaji"]).as_slice());
    }

    #[test]
    fn cities_keep_tree_order() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("India").unwrap();
        selector.change_state("Karnataka").unwrap();
        assert_eq!(
            selector.city_options(),
            strings(&["", "Mysuru", "Bengaluru"]).as_slice()
        );
    }

    #[test]
    fn changing_country_resets_descendants() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("India").unwrap();
        selector.change_state("Goa").unwrap();
        selector.change_city("Panaji").unwrap();

        selector.change_country("Nepal").unwrap();

        assert_eq!(selector.state().country(), Some("Nepal"));
        assert_eq!(selector.state().state(), None);
        assert_eq!(selector.state().city(), None);
        assert_eq!(selector.state_options(), strings(&["", "Bagmati"]).as_slice());
        assert!(selector.city_options().is_empty());
    }

    #[test]
    fn reselecting_the_same_country_still_resets() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("India").unwrap();
        selector.change_state("Goa").unwrap();
        selector.change_city("Panaji").unwrap();

        selector.change_country("India").unwrap();

        assert_eq!(selector.state().state(), None);
        assert_eq!(selector.state().city(), None);
        assert!(selector.city_options().is_empty());
    }

    #[test]
    fn clearing_country_empties_child_lists() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("India").unwrap();
        selector.change_state("Goa").unwrap();

        selector.change_country(UNSELECTED).unwrap();

        assert_eq!(selector.state(), &SelectorState::default());
        assert!(selector.state_options().is_empty());
        assert!(selector.city_options().is_empty());
    }

    #[test]
    fn clearing_state_empties_city_list() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("Nepal").unwrap();
        selector.change_state("Bagmati").unwrap();
        selector.change_city("Lalitpur").unwrap();

        selector.change_state(UNSELECTED).unwrap();

        assert_eq!(selector.state().country(), Some("Nepal"));
        assert_eq!(selector.state().city(), None);
        assert!(selector.city_options().is_empty());
        assert_eq!(selector.state_options(), strings(&["", "Bagmati"]).as_slice());
    }

    #[test]
    fn country_without_states_offers_only_the_sentinel() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("Bhutan").unwrap();
        assert_eq!(selector.state_options(), strings(&[""]).as_slice());
    }

    #[test]
    fn unknown_options_are_rejected_without_touching_state() {
        let mut selector = CascadingSelector::new(tree());
        selector.change_country("India").unwrap();
        selector.change_state("Goa").unwrap();
        let before = selector.state().clone();

        assert_eq!(
            selector.change_state("Bagmati"),
            Err(SelectorError::UnknownOption {
                level: Level::State,
                value: "Bagmati".to_string()
            })
        );
        assert!(selector.change_country("Atlantis").is_err());
        assert!(selector.change_city("Mysuru").is_err());
        assert_eq!(selector.state(), &before);
    }

    #[test]
    fn children_need_a_parent() {
        let mut selector = CascadingSelector::new(tree());
        assert_eq!(
            selector.change_state("Goa"),
            Err(SelectorError::ParentUnset(Level::State))
        );
        selector.change_country("India").unwrap();
        assert_eq!(
            selector.change_city("Panaji"),
            Err(SelectorError::ParentUnset(Level::City))
        );
    }

    #[test]
    fn unavailable_selector_has_no_options() {
        let selector = CascadingSelector::unavailable();
        assert!(selector.country_options().is_empty());
        assert_eq!(selector.state(), &SelectorState::default());
    }

    #[rstest]
    #[case(&[(Level::Country, "India"), (Level::State, "Goa"), (Level::City, "Panaji"), (Level::Country, "")])]
    #[case(&[(Level::Country, "India"), (Level::State, "Karnataka"), (Level::State, ""), (Level::City, "Mysuru")])]
    #[case(&[(Level::Country, "Nepal"), (Level::State, "Bagmati"), (Level::City, "Kathmandu"), (Level::Country, "India"), (Level::City, "Kathmandu")])]
    #[case(&[(Level::State, "Goa"), (Level::Country, "Atlantis"), (Level::Country, "Bhutan"), (Level::State, "")])]
    #[case(&[(Level::Country, "India"), (Level::State, "Goa"), (Level::City, "Panaji"), (Level::State, "Goa")])]
    fn empty_parent_implies_empty_descendants(#[case] events: &[(Level, &str)]) {
        let mut selector = CascadingSelector::new(tree());
        for (level, value) in events {
            let _ = match level {
                Level::Country => selector.change_country(value),
                Level::State => selector.change_state(value),
                Level::City => selector.change_city(value),
            };
            assert_invariant(&selector);
        }
    }
}
