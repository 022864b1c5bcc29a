//! Synthetic price series for tests and demos
//!
//! Both generators emit weekday-only records, the way exchange data skips
//! weekends.

use crate::PriceRecord;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Trading days (weekdays) starting at `start`
pub fn trading_days(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| Some(*d + Duration::days(1))).filter(|d| is_weekday(*d))
}

/// Generate a random-walk daily series for testing purposes
///
/// # Arguments
/// * `start` - First calendar date considered (weekends are skipped)
/// * `num_points` - Number of trading days to generate
/// * `starting_price` - Open of the first trading day
/// * `volatility` - Price volatility factor (0.0-1.0)
pub fn generate_test_data(
    start: NaiveDate,
    num_points: usize,
    starting_price: f64,
    volatility: f64,
) -> Vec<PriceRecord> {
    generate_with_rng(
        &mut rand::thread_rng(),
        start,
        num_points,
        starting_price,
        volatility,
    )
}

/// Same as [`generate_test_data`] but reproducible from `seed`
pub fn generate_seeded_data(
    seed: u64,
    start: NaiveDate,
    num_points: usize,
    starting_price: f64,
    volatility: f64,
) -> Vec<PriceRecord> {
    generate_with_rng(
        &mut StdRng::seed_from_u64(seed),
        start,
        num_points,
        starting_price,
        volatility,
    )
}

fn generate_with_rng<R: Rng>(
    rng: &mut R,
    start: NaiveDate,
    num_points: usize,
    starting_price: f64,
    volatility: f64,
) -> Vec<PriceRecord> {
    let mut data = Vec::with_capacity(num_points);
    let mut current_price = starting_price;

    for date in trading_days(start).take(num_points) {
        // Create a random price movement
        let price_change = current_price * volatility * (rng.gen::<f64>() - 0.5);
        let open = current_price;
        let close = (open + price_change).max(0.01);

        // High and low based on open/close with some randomness
        let high = open.max(close) + rng.gen::<f64>() * volatility * open * 0.5;
        let low = (open.min(close) - rng.gen::<f64>() * volatility * open * 0.5).max(0.01);

        let volume = rng.gen_range(1000..10000);

        data.push(PriceRecord::new(date, open, high, low, close, volume));
        current_price = close;
    }

    data
}

/// Generate a deterministic series whose every month bottoms out on
/// `buy_day` and peaks on `sell_day`
///
/// Covers every trading day from `start` through `end` inclusive. When
/// `buy_day` or `sell_day` falls on a weekend the extreme lands on a nearby
/// trading day instead.
pub fn generate_seasonal_data(
    start: NaiveDate,
    end: NaiveDate,
    buy_day: u32,
    sell_day: u32,
) -> Vec<PriceRecord> {
    trading_days(start)
        .take_while(|d| *d <= end)
        .map(|date| {
            let day = date.day();
            let close = if day == buy_day {
                50.0
            } else if day == sell_day {
                150.0
            } else {
                // Dips towards buy_day and rises towards sell_day, so a
                // weekend extreme moves to the nearest trading day
                100.0 - 40.0 / (1.0 + day.abs_diff(buy_day) as f64)
                    + 40.0 / (1.0 + day.abs_diff(sell_day) as f64)
            };
            PriceRecord::new(date, close, close + 1.0, close - 1.0, close, 1000)
        })
        .collect()
}
