//! Geographic points used as routing stops.
//!
//! A [`Location`] carries an optional coordinate pair together with the
//! caller's identifier, a [`Category`] and a display name. Points without a
//! usable coordinate pair are kept rather than rejected: they are simply
//! invalid and every routing computation skips them.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Distance, Geodesic, Point};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metres per kilometre.
const METRES_PER_KM: f64 = 1_000.0;

/// What a location represents. Informational only; routing ignores it.
///
/// # Examples
/// ```
/// use foodroute_core::Category;
///
/// assert_eq!(Category::Camp.as_str(), "camp");
/// assert_eq!("restaurant".parse::<Category>(), Ok(Category::Restaurant));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// The travelling volunteer's current position.
    Volunteer,
    /// A posted donation awaiting pickup.
    #[default]
    Donation,
    /// A restaurant offering food.
    Restaurant,
    /// A collection camp run by an NGO.
    Camp,
}

impl Category {
    /// Return the category as a lowercase `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Donation => "donation",
            Self::Restaurant => "restaurant",
            Self::Camp => "camp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown location category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "volunteer" => Ok(Self::Volunteer),
            "donation" => Ok(Self::Donation),
            "restaurant" => Ok(Self::Restaurant),
            "camp" => Ok(Self::Camp),
            _ => Err(ParseCategoryError(s.to_owned())),
        }
    }
}

/// A point of interest for routing purposes.
///
/// Latitude and longitude are optional because callers build locations from
/// records (profiles, donations, camps) whose coordinates may never have been
/// set. Such a location is *invalid*: [`Location::distance_to`] reports an
/// infinite distance and the optimizer filters it out.
///
/// The serialised form is the map record `{lat, lon, name, type, id}`.
///
/// # Examples
/// ```
/// use foodroute_core::{Category, Location};
///
/// let camp = Location::new(12.97, 77.59)
///     .with_id(7)
///     .with_category(Category::Camp)
///     .with_name("City camp");
///
/// assert!(camp.is_valid());
/// assert_eq!(camp.id(), Some(7));
/// assert!(!Location::unplaced().is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    #[cfg_attr(feature = "serde", serde(rename = "lat", default))]
    latitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "lon", default))]
    longitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    category: Category,
    #[cfg_attr(feature = "serde", serde(default))]
    id: Option<u64>,
}

impl Location {
    /// Construct a location at the given WGS84 coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::from_parts(Some(latitude), Some(longitude))
    }

    /// Construct a location from possibly-missing coordinates.
    ///
    /// # Examples
    /// ```
    /// use foodroute_core::Location;
    ///
    /// assert!(!Location::from_parts(Some(1.0), None).is_valid());
    /// ```
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// Construct a location with no coordinates at all.
    pub fn unplaced() -> Self {
        Self::default()
    }

    /// Attach the caller's identifier.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Latitude in degrees, if set.
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Longitude in degrees, if set.
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Caller-supplied identifier, if any.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// What the location represents.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Display name; empty when unset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the coordinate pair (`x = longitude`, `y = latitude`) when both
    /// values are present, finite and within WGS84 bounds.
    pub fn coordinates(&self) -> Option<Coord<f64>> {
        let lat = self.latitude.filter(|v| v.is_finite() && v.abs() <= 90.0)?;
        let lon = self.longitude.filter(|v| v.is_finite() && v.abs() <= 180.0)?;
        Some(Coord { x: lon, y: lat })
    }

    /// Whether this location can take part in routing.
    pub fn is_valid(&self) -> bool {
        self.coordinates().is_some()
    }

    /// Geodesic distance to `other` in kilometres on the WGS84 ellipsoid.
    ///
    /// Returns [`f64::INFINITY`] when either point is invalid.
    ///
    /// # Examples
    /// ```
    /// use foodroute_core::Location;
    ///
    /// let a = Location::new(0.0, 0.0);
    /// let b = Location::new(0.0, 1.0);
    /// assert!((a.distance_to(&b) - 111.319).abs() < 0.01);
    /// assert!(a.distance_to(&Location::unplaced()).is_infinite());
    /// ```
    pub fn distance_to(&self, other: &Self) -> f64 {
        match (self.coordinates(), other.coordinates()) {
            (Some(from), Some(to)) => {
                Geodesic.distance(Point::from(from), Point::from(to)) / METRES_PER_KM
            }
            _ => f64::INFINITY,
        }
    }
}
