use crate::sdk::geolocation::GeoPosition;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";

/// External turn-by-turn deep link to `target`. The client never computes the route itself.
pub fn directions_link(target: GeoPosition) -> String {
    format!(
        "{}&destination={},{}",
        DIRECTIONS_BASE, target.latitude, target.longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_carries_the_destination_coordinates() {
        assert_eq!(
            directions_link(GeoPosition::new(15.4909, 73.8278)),
            "https://www.google.com/maps/dir/?api=1&destination=15.4909,73.8278"
        );
    }

    #[test]
    fn negative_coordinates_keep_their_sign() {
        assert!(directions_link(GeoPosition::new(-33.8688, 151.2093))
            .ends_with("destination=-33.8688,151.2093"));
    }
}
