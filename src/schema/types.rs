// src/schema/types.rs

use rust_decimal::Decimal;

/// Output column names, in order.
pub const CSV_HEADER: [&str; 4] = [
    "country",
    "total_population",
    "smartphone_penetration",
    "smartphone_users",
];

/// One country row of the ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingRecord {
    country: String,
    total_population: Decimal,
    smartphone_penetration: Decimal,
    smartphone_users: Decimal,
}

impl RankingRecord {
    /// `country` is stored trimmed.
    pub fn new(
        country: &str,
        total_population: Decimal,
        smartphone_penetration: Decimal,
        smartphone_users: Decimal,
    ) -> Self {
        Self {
            country: country.trim().to_string(),
            total_population,
            smartphone_penetration,
            smartphone_users,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn total_population(&self) -> Decimal {
        self.total_population
    }

    pub fn smartphone_penetration(&self) -> Decimal {
        self.smartphone_penetration
    }

    pub fn smartphone_users(&self) -> Decimal {
        self.smartphone_users
    }

    /// Fields rendered for CSV, matching `CSV_HEADER`. Decimals use plain notation.
    pub fn to_csv_fields(&self) -> [String; 4] {
        [
            self.country.clone(),
            self.total_population.to_string(),
            self.smartphone_penetration.to_string(),
            self.smartphone_users.to_string(),
        ]
    }
}
