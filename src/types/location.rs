//! Geographic query locations for the weather pipeline.

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use meteo_eda::LatLon;
///
/// let madrid = LatLon(40.416775, -3.703790);
/// assert_eq!(madrid.latitude(), 40.416775);
/// assert_eq!(madrid.longitude(), -3.703790);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// A named location processed as one entity by the weather pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub location: LatLon,
}

impl City {
    pub fn new(name: impl Into<String>, location: LatLon) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// The cities compared by the default weather run.
    pub fn default_catalog() -> Vec<City> {
        vec![
            City::new("Madrid", LatLon(40.416775, -3.703790)),
            City::new("London", LatLon(51.507351, -0.127758)),
            City::new("Rio", LatLon(-22.906847, -43.172896)),
        ]
    }

    /// File-name friendly version of the city name.
    pub(crate) fn slug(&self) -> String {
        self.name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_three_cities() {
        let names: Vec<_> = City::default_catalog()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Madrid", "London", "Rio"]);
    }

    #[test]
    fn slug_replaces_non_alphanumerics() {
        let city = City::new("Rio de Janeiro", LatLon(0.0, 0.0));
        assert_eq!(city.slug(), "rio_de_janeiro");
    }
}
