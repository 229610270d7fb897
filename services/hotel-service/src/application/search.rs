//! Unary hotel search

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use stay_config::SearchConfig;
use stay_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::domain::{sort_hotels, Hotel, InventoryProvider, SearchCriteria, SearchOutcome};
use crate::infrastructure::observability::record_search;

pub struct SearchHandler {
    inventory: Arc<dyn InventoryProvider>,
    rng: Mutex<StdRng>,
    price_variation: f64,
    availability_rate: f64,
    max_delay: Duration,
}

impl SearchHandler {
    pub fn new(
        inventory: Arc<dyn InventoryProvider>,
        config: &SearchConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            inventory,
            rng: Mutex::new(rng),
            price_variation: config.price_variation,
            availability_rate: config.availability_rate.clamp(0.0, 1.0),
            max_delay: Duration::from_secs(u64::from(config.max_delay_seconds)),
        }
    }

    pub fn from_config(inventory: Arc<dyn InventoryProvider>, config: &SearchConfig) -> Self {
        Self::new(inventory, config, StdRng::from_entropy())
    }

    pub async fn search(&self, criteria: SearchCriteria) -> AppResult<SearchOutcome> {
        criteria.validate()?;

        if criteria.delay_seconds > 0 {
            let delay = Duration::from_secs(u64::from(criteria.delay_seconds)).min(self.max_delay);
            debug!(?delay, "Applying requested search delay");
            tokio::time::sleep(delay).await;
        }

        let started = Instant::now();
        let snapshot = self.inventory.snapshot();
        let mut hotels = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::internal("search rng poisoned"))?;

            let mut matched = Vec::new();
            for hotel in snapshot.iter() {
                let mut hotel = self.with_current_price(hotel, &mut *rng);
                if !criteria.matches(&hotel) {
                    continue;
                }
                hotel.available = rng.gen_bool(self.availability_rate);
                matched.push(hotel);
            }
            matched
        };

        sort_hotels(&mut hotels, criteria.order_by);
        let outcome = SearchOutcome::new(hotels);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            city = criteria.city.as_deref().unwrap_or("*"),
            results = outcome.hotels.len(),
            has_availability = outcome.has_availability,
            "Hotel search completed"
        );
        record_search(outcome.hotels.len(), elapsed_ms);

        Ok(outcome)
    }

    /// Base price moved by a random factor in `[1 - v/2, 1 + v/2)`.
    fn with_current_price(&self, hotel: &Hotel, rng: &mut StdRng) -> Hotel {
        let mut hotel = hotel.clone();
        if self.price_variation > 0.0 {
            let factor = 1.0 + (rng.r#gen::<f64>() - 0.5) * self.price_variation;
            if let Some(factor) = Decimal::from_f64(factor) {
                hotel.price = (hotel.price * factor).round_dp(2);
            }
        }
        hotel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Fixed(Arc<[Hotel]>);

    impl InventoryProvider for Fixed {
        fn snapshot(&self) -> Arc<[Hotel]> {
            self.0.clone()
        }
    }

    fn hotel(price: Decimal) -> Hotel {
        Hotel {
            id: price.to_string(),
            name: "Central Recife Inn".to_string(),
            city: "Recife".to_string(),
            stars: 3,
            price,
            available: true,
            amenities: vec![],
            accommodation_type: "Hotel".to_string(),
        }
    }

    fn handler(price_variation: f64) -> SearchHandler {
        let inventory = Fixed(vec![hotel(dec!(100)), hotel(dec!(200))].into());
        let config = SearchConfig {
            price_variation,
            availability_rate: 1.0,
            max_delay_seconds: 30,
        };
        SearchHandler::new(Arc::new(inventory), &config, StdRng::seed_from_u64(11))
    }

    #[tokio::test]
    async fn test_price_variation_stays_within_band() {
        let outcome = handler(0.6).search(SearchCriteria::default()).await.unwrap();
        assert_eq!(outcome.hotels.len(), 2);

        let base = outcome.hotels[0].id.parse::<Decimal>().unwrap();
        let price = outcome.hotels[0].price;
        assert!(price >= base * dec!(0.7) && price <= base * dec!(1.3));
    }

    #[tokio::test]
    async fn test_zero_variation_keeps_base_price() {
        let outcome = handler(0.0).search(SearchCriteria::default()).await.unwrap();
        let prices: Vec<_> = outcome.hotels.iter().map(|h| h.price).collect();
        assert_eq!(prices, vec![dec!(100), dec!(200)]);
        assert!(outcome.has_availability);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_capped() {
        let handler = handler(0.0);
        let criteria = SearchCriteria {
            delay_seconds: 3600,
            ..SearchCriteria::default()
        };

        let started = tokio::time::Instant::now();
        handler.search(criteria).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
    }
}
