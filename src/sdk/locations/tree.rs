use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Country → state → cities. Country and state keys iterate sorted, cities keep
/// the order they were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationTree {
    countries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl LocationTree {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// `None` when the country is not in the tree.
    pub fn states(&self, country: &str) -> Option<impl Iterator<Item = &str>> {
        self.countries
            .get(country)
            .map(|states| states.keys().map(String::as_str))
    }

    pub fn cities(&self, country: &str, state: &str) -> Option<&[String]> {
        self.countries
            .get(country)?
            .get(state)
            .map(Vec::as_slice)
    }

    /// Adds the country and state if needed. Repeated cities are ignored; an empty
    /// city registers the state with no cities.
    pub fn insert(&mut self, country: &str, state: &str, city: &str) {
        let cities = self
            .countries
            .entry(country.to_string())
            .or_default()
            .entry(state.to_string())
            .or_default();
        if !city.is_empty() && !cities.iter().any(|known| known == city) {
            cities.push(city.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_server_shape_and_sorts_keys() {
        let tree: LocationTree = serde_json::from_value(json!({
            "Nepal": {"Bagmati": ["Kathmandu"]},
            "India": {"Karnataka": ["Mysuru", "Bengaluru"], "Goa": ["Panaji"]}
        }))
        .unwrap();

        assert_eq!(tree.countries().collect::<Vec<_>>(), vec!["India", "Nepal"]);
        assert_eq!(
            tree.states("India").unwrap().collect::<Vec<_>>(),
            vec!["Goa", "Karnataka"]
        );
        assert_eq!(
            tree.cities("India", "Karnataka").unwrap(),
            &["Mysuru".to_string(), "Bengaluru".to_string()]
        );
        assert!(tree.states("Peru").is_none());
        assert!(tree.cities("India", "Kerala").is_none());
    }

    #[test]
    fn insert_dedupes_cities_and_allows_empty_states() {
        let mut tree = LocationTree::default();
        tree.insert("India", "Goa", "Panaji");
        tree.insert("India", "Goa", "Panaji");
        tree.insert("India", "Ladakh", "");

        assert_eq!(tree.cities("India", "Goa").unwrap().len(), 1);
        assert_eq!(tree.cities("India", "Ladakh").unwrap().len(), 0);
    }
}
