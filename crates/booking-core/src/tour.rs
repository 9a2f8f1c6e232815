//! # Tour Catalog
//!
//! Bookable tours and their per-person prices. The catalog is the only
//! trusted source of unit prices; amounts sent by clients are never used.
//! Tours are loaded from `config/tours.toml`.

use crate::error::ConfigError;
use crate::pricing::{self, Price, PriceBreakdown};
use serde::{Deserialize, Serialize};

/// A tour that can be booked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// Tour name, used as the booking's offering name
    pub name: String,

    /// Price per person
    pub price: Price,

    /// Whether this tour currently accepts bookings
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Tour {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            active: true,
        }
    }

    /// Builder: mark the tour inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Price breakdown for a party of `party_size`
    pub fn quote(&self, party_size: u32) -> PriceBreakdown {
        pricing::compute(self.price, party_size)
    }
}

/// Tour catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourCatalog {
    #[serde(default)]
    pub tours: Vec<Tour>,
}

impl TourCatalog {
    pub fn new() -> Self {
        Self { tours: Vec::new() }
    }

    /// Add a tour to the catalog
    pub fn add(&mut self, tour: Tour) {
        self.tours.push(tour);
    }

    /// Builder: add a tour
    pub fn with_tour(mut self, tour: Tour) -> Self {
        self.add(tour);
        self
    }

    /// Find a tour by name
    pub fn get(&self, name: &str) -> Option<&Tour> {
        self.tours.iter().find(|t| t.name == name)
    }

    /// Find a tour by name, only if it accepts bookings
    pub fn bookable(&self, name: &str) -> Option<&Tour> {
        self.get(name).filter(|t| t.active)
    }

    /// Get all active tours
    pub fn active_tours(&self) -> impl Iterator<Item = &Tour> {
        self.tours.iter().filter(|t| t.active)
    }

    /// Load catalog from a TOML string. Every tour must have a positive price.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let catalog: TourCatalog =
            toml::from_str(toml_str).map_err(|e| ConfigError::Catalog(e.to_string()))?;

        if let Some(tour) = catalog.tours.iter().find(|t| !t.price.is_positive()) {
            return Err(ConfigError::Catalog(format!(
                "tour '{}' must have a positive price",
                tour.name
            )));
        }

        Ok(catalog)
    }
}
