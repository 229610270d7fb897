//! In-memory synthetic inventory
//!
//! All randomness comes from the injected generator, so a fixed seed yields
//! the same inventory every time.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use stay_bootstrap::{ComponentHealth, ReadinessCheck};
use stay_config::InventoryConfig;
use tracing::info;

use crate::domain::hotel::{ACCOMMODATION_TYPES, AMENITIES, CITIES};
use crate::domain::{Hotel, InventoryProvider};

const NAME_PREFIXES: &[&str] = &["Grand", "Royal", "Palace", "Central", "Premium"];
const NAME_SUFFIXES: &[&str] = &["Plaza", "Inn", "Suites", "Park", "Tower"];

const AMENITY_RATE: f64 = 0.65;
const PADDING_AVAILABILITY_RATE: f64 = 0.85;

pub struct InMemoryInventory {
    hotels: Arc<[Hotel]>,
}

impl InMemoryInventory {
    pub fn new(hotels: Vec<Hotel>) -> Self {
        Self {
            hotels: hotels.into(),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hotels = generate_hotels(&mut rng, config.min_hotels);
        info!(
            hotels = hotels.len(),
            seeded = config.seed.is_some(),
            "Inventory generated"
        );
        Self::new(hotels)
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

impl InventoryProvider for InMemoryInventory {
    fn snapshot(&self) -> Arc<[Hotel]> {
        self.hotels.clone()
    }
}

/// 30-50 available hotels per city, then random padding up to `min_hotels`.
pub fn generate_hotels<R: Rng>(rng: &mut R, min_hotels: usize) -> Vec<Hotel> {
    let mut hotels = Vec::with_capacity(min_hotels.max(CITIES.len() * 50));

    for city in CITIES {
        let count = rng.gen_range(30..=50);
        for _ in 0..count {
            hotels.push(generate_hotel(rng, city, true));
        }
    }

    while hotels.len() < min_hotels {
        let city = pick(rng, CITIES);
        let available = rng.gen_bool(PADDING_AVAILABILITY_RATE);
        hotels.push(generate_hotel(rng, city, available));
    }

    hotels
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    // 常量列表非空
    values.choose(rng).copied().unwrap_or_default()
}

fn generate_hotel<R: Rng>(rng: &mut R, city: &str, available: bool) -> Hotel {
    let accommodation_type = pick(rng, ACCOMMODATION_TYPES);
    let stars: u8 = rng.gen_range(1..=5);

    let base = Decimal::from(u32::from(stars) * 80 + rng.gen_range(0..300u32));
    let multiplier = match accommodation_type {
        "Resort" => Decimal::new(18, 1),
        "Hostel" => Decimal::new(35, 2),
        "Pousada" => Decimal::new(7, 1),
        _ => Decimal::ONE,
    };

    let amenities = AMENITIES
        .iter()
        .filter(|_| rng.gen_bool(AMENITY_RATE))
        .map(|a| a.to_string())
        .collect();

    let id = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();
    let name = format!(
        "{} {} {}",
        pick(rng, NAME_PREFIXES),
        city,
        pick(rng, NAME_SUFFIXES)
    );

    Hotel {
        id: id.to_string(),
        name,
        city: city.to_string(),
        stars,
        price: (base * multiplier).round_dp(2),
        available,
        amenities,
        accommodation_type: accommodation_type.to_string(),
    }
}

/// Ready once the inventory holds at least one hotel.
pub struct InventoryReadiness {
    inventory: Arc<dyn InventoryProvider>,
}

impl InventoryReadiness {
    pub fn new(inventory: Arc<dyn InventoryProvider>) -> Self {
        Self { inventory }
    }
}

#[async_trait::async_trait]
impl ReadinessCheck for InventoryReadiness {
    async fn check(&self) -> ComponentHealth {
        if self.inventory.snapshot().is_empty() {
            ComponentHealth::down("inventory", "no hotels loaded")
        } else {
            ComponentHealth::up("inventory")
        }
    }
}
