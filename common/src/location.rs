use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance in kilometers between two points.
    ///
    /// Shown on the partner dashboard as distance to the pickup address.
    pub fn distance_km(&self, other: &GeoLocation) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point() {
        let p = GeoLocation::new(19.0760, 72.8777);
        assert!((p.distance_km(&p) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_distance_mumbai_to_delhi() {
        let mumbai = GeoLocation::new(19.0760, 72.8777);
        let delhi = GeoLocation::new(28.6139, 77.2090);
        let dist = mumbai.distance_km(&delhi);
        // Mumbai to Delhi is ~1150 km
        assert!((dist - 1150.0).abs() < 30.0);
    }
}
