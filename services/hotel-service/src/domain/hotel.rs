//! Hotel inventory model and search criteria

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use stay_errors::{AppError, AppResult};

pub const CITIES: &[&str] = &[
    "São Paulo",
    "Rio de Janeiro",
    "Brasília",
    "Salvador",
    "Fortaleza",
    "Belo Horizonte",
    "Recife",
    "Manaus",
    "Porto Alegre",
];

pub const ACCOMMODATION_TYPES: &[&str] = &["Hotel", "Pousada", "Resort", "Hostel"];

pub const AMENITIES: &[&str] = &[
    "Wi-Fi",
    "Piscina",
    "Academia",
    "Spa",
    "Restaurante",
    "Estacionamento",
    "Café da Manhã",
    "Ar Condicionado",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub stars: u8,
    pub price: Decimal,
    pub available: bool,
    pub amenities: Vec<String>,
    pub accommodation_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    /// Inventory order
    #[default]
    Unspecified,
    /// Cheapest first
    Price,
    /// Most stars first
    Rating,
}

impl OrderBy {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "price" => Self::Price,
            "rating" => Self::Rating,
            _ => Self::Unspecified,
        }
    }
}

/// Filters for a search; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub city: Option<String>,
    pub min_stars: Option<u8>,
    pub max_stars: Option<u8>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub accommodation_type: Option<String>,
    pub order_by: OrderBy,
    pub delay_seconds: u32,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn star_bound(name: &str, value: i32) -> AppResult<Option<u8>> {
    match value {
        0 => Ok(None),
        1..=5 => Ok(Some(value as u8)),
        _ => Err(AppError::validation(format!(
            "{} must be between 0 and 5, got {}",
            name, value
        ))),
    }
}

fn price_bound(name: &str, value: f64) -> AppResult<Option<Decimal>> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    if value == 0.0 {
        return Ok(None);
    }
    Decimal::from_f64(value)
        .map(Some)
        .ok_or_else(|| AppError::validation(format!("{} is out of range", name)))
}

impl SearchCriteria {
    /// Builds criteria from wire values where zero or empty means "unset".
    #[allow(clippy::too_many_arguments)]
    pub fn from_wire(
        city: &str,
        min_stars: i32,
        max_stars: i32,
        min_price: f64,
        max_price: f64,
        accommodation_type: &str,
        order_by: &str,
        delay_seconds: i32,
    ) -> AppResult<Self> {
        let criteria = Self {
            city: non_empty(city),
            min_stars: star_bound("min_stars", min_stars)?,
            max_stars: star_bound("max_stars", max_stars)?,
            min_price: price_bound("min_price", min_price)?,
            max_price: price_bound("max_price", max_price)?,
            accommodation_type: non_empty(accommodation_type),
            order_by: OrderBy::parse(order_by),
            delay_seconds: u32::try_from(delay_seconds).unwrap_or(0),
        };
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min_stars, self.max_stars) {
            if min > max {
                return Err(AppError::validation(format!(
                    "min_stars {} is greater than max_stars {}",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::validation(format!(
                    "min_price {} is greater than max_price {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Whether `hotel` (with its current price) passes every filter.
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(city) = &self.city {
            if hotel.city.to_lowercase() != city.to_lowercase() {
                return false;
            }
        }
        if self.min_stars.is_some_and(|min| hotel.stars < min) {
            return false;
        }
        if self.max_stars.is_some_and(|max| hotel.stars > max) {
            return false;
        }
        if self.min_price.is_some_and(|min| hotel.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| hotel.price > max) {
            return false;
        }
        if let Some(kind) = &self.accommodation_type {
            if hotel.accommodation_type.to_lowercase() != kind.to_lowercase() {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub hotels: Vec<Hotel>,
    pub has_availability: bool,
}

impl SearchOutcome {
    pub fn new(hotels: Vec<Hotel>) -> Self {
        let has_availability = hotels.iter().any(|h| h.available);
        Self {
            hotels,
            has_availability,
        }
    }
}

/// Stable sort, so equal keys keep inventory order.
pub fn sort_hotels(hotels: &mut [Hotel], order_by: OrderBy) {
    match order_by {
        OrderBy::Price => hotels.sort_by(|a, b| a.price.cmp(&b.price)),
        OrderBy::Rating => hotels.sort_by(|a, b| b.stars.cmp(&a.stars)),
        OrderBy::Unspecified => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hotel(city: &str, stars: u8, price: Decimal, kind: &str) -> Hotel {
        Hotel {
            id: format!("{}-{}", city, stars),
            name: format!("Grand {} Plaza", city),
            city: city.to_string(),
            stars,
            price,
            available: true,
            amenities: vec![],
            accommodation_type: kind.to_string(),
        }
    }

    #[test]
    fn test_from_wire_treats_zero_as_unset() {
        let criteria = SearchCriteria::from_wire("", 0, 0, 0.0, 0.0, "", "", 0).unwrap();
        assert_eq!(criteria, SearchCriteria::default());
    }

    #[test]
    fn test_from_wire_rejects_bad_bounds() {
        assert!(SearchCriteria::from_wire("", 4, 2, 0.0, 0.0, "", "", 0).is_err());
        assert!(SearchCriteria::from_wire("", 0, 6, 0.0, 0.0, "", "", 0).is_err());
        assert!(SearchCriteria::from_wire("", 0, 0, -1.0, 0.0, "", "", 0).is_err());
        assert!(SearchCriteria::from_wire("", 0, 0, f64::NAN, 0.0, "", "", 0).is_err());
        assert!(SearchCriteria::from_wire("", 0, 0, 500.0, 100.0, "", "", 0).is_err());
    }

    #[test]
    fn test_matches_ignores_case() {
        let criteria = SearchCriteria {
            city: Some("são paulo".to_string()),
            accommodation_type: Some("RESORT".to_string()),
            ..SearchCriteria::default()
        };
        assert!(criteria.matches(&hotel("São Paulo", 4, dec!(300), "Resort")));
        assert!(!criteria.matches(&hotel("São Paulo", 4, dec!(300), "Hostel")));
        assert!(!criteria.matches(&hotel("Recife", 4, dec!(300), "Resort")));
    }

    #[test]
    fn test_matches_bounds_are_inclusive() {
        let criteria = SearchCriteria::from_wire("", 3, 4, 100.0, 200.0, "", "", 0).unwrap();
        assert!(criteria.matches(&hotel("Recife", 3, dec!(100), "Hotel")));
        assert!(criteria.matches(&hotel("Recife", 4, dec!(200), "Hotel")));
        assert!(!criteria.matches(&hotel("Recife", 5, dec!(150), "Hotel")));
        assert!(!criteria.matches(&hotel("Recife", 3, dec!(200.01), "Hotel")));
    }

    #[test]
    fn test_sort_orders() {
        let mut hotels = vec![
            hotel("A", 2, dec!(300), "Hotel"),
            hotel("B", 5, dec!(100), "Hotel"),
            hotel("C", 3, dec!(200), "Hotel"),
        ];

        sort_hotels(&mut hotels, OrderBy::Price);
        let prices: Vec<_> = hotels.iter().map(|h| h.price).collect();
        assert_eq!(prices, vec![dec!(100), dec!(200), dec!(300)]);

        sort_hotels(&mut hotels, OrderBy::Rating);
        let stars: Vec<_> = hotels.iter().map(|h| h.stars).collect();
        assert_eq!(stars, vec![5, 3, 2]);
    }

    #[test]
    fn test_has_availability() {
        let mut unavailable = hotel("A", 2, dec!(300), "Hotel");
        unavailable.available = false;
        assert!(!SearchOutcome::new(vec![unavailable.clone()]).has_availability);
        assert!(SearchOutcome::new(vec![unavailable, hotel("B", 1, dec!(80), "Hostel")]).has_availability);
        assert!(!SearchOutcome::new(vec![]).has_availability);
    }
}
