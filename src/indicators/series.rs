//! Price samples and the timestamp-aligned series derived from them

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// A single price observation.
///
/// The timestamp is stored as Unix time in milliseconds, the format used by
/// the market-data APIs that feed this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    timestamp: u64,
    price: f64,
    // Option<T> because not every upstream source reports volume
    volume: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: u64, price: f64) -> Self {
        Self {
            timestamp,
            price,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get_price(&self) -> f64 {
        self.price
    }

    pub fn get_volume(&self) -> Option<f64> {
        self.volume
    }
}

/// An ordered, validated sequence of price samples.
///
/// Invariants, checked at construction:
/// - timestamps strictly ascending (no duplicates)
/// - every price finite and `> 0`
/// - every volume, when present, finite and `>= 0`
///
/// The series is immutable; indicators only ever derive new series from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(AnalyticsError::InvalidSeries(format!(
                    "price at index {i} must be finite and positive, got {}",
                    point.price
                )));
            }
            if let Some(volume) = point.volume {
                if !volume.is_finite() || volume < 0.0 {
                    return Err(AnalyticsError::InvalidSeries(format!(
                        "volume at index {i} must be finite and non-negative, got {volume}"
                    )));
                }
            }
        }

        if let Some(i) = points
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(AnalyticsError::InvalidSeries(format!(
                "timestamps must be strictly ascending: index {} ({}) follows {}",
                i + 1,
                points[i + 1].timestamp,
                points[i].timestamp
            )));
        }

        Ok(Self { points })
    }

    /// Builds a daily series from bare prices, one sample per day starting at
    /// `start_timestamp`.
    pub fn from_prices(start_timestamp: u64, prices: &[f64]) -> Result<Self> {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                (i as u64)
                    .checked_mul(MILLIS_PER_DAY)
                    .and_then(|offset| start_timestamp.checked_add(offset))
                    .map(|timestamp| PricePoint::new(timestamp, price))
                    .ok_or_else(|| {
                        AnalyticsError::InvalidSeries(format!(
                            "timestamp of day {i} after {start_timestamp} overflows"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn timestamps(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<u64> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.points.last().map(|p| p.timestamp)
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// Wraps values computed from this series onto its timestamp axis.
    pub fn derive(&self, values: Vec<Option<f64>>) -> Result<DerivedSeries> {
        DerivedSeries::new(self.timestamps(), values)
    }
}

/// One optional value per source sample, sharing the source's timestamps.
///
/// `None` marks an index without enough history for the window; it is never
/// replaced by a fabricated number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    timestamps: Vec<u64>,
    values: Vec<Option<f64>>,
}

impl DerivedSeries {
    pub fn new(timestamps: Vec<u64>, values: Vec<Option<f64>>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(AnalyticsError::InvalidSeries(format!(
                "derived series has {} values for {} timestamps",
                values.len(),
                timestamps.len()
            )));
        }
        Ok(Self { timestamps, values })
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Returns the most recent defined value.
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, Option<f64>)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Combines two series sharing the same axis element by element.
    /// The result is undefined wherever either input is.
    pub fn zip_with<F>(&self, other: &DerivedSeries, f: F) -> Result<DerivedSeries>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.timestamps != other.timestamps {
            return Err(AnalyticsError::InvalidSeries(
                "cannot combine series with different timestamp axes".to_string(),
            ));
        }

        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(f(*a, *b)),
                _ => None,
            })
            .collect();

        Ok(DerivedSeries {
            timestamps: self.timestamps.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_accepts_ordered_points() {
        let series = PriceSeries::new(vec![
            PricePoint::new(1_000, 100.0).with_volume(5.0),
            PricePoint::new(2_000, 101.0),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.prices(), vec![100.0, 101.0]);
        assert_eq!(series.volumes(), vec![Some(5.0), None]);
        assert_eq!(series.last_price(), Some(101.0));
        assert_eq!(series.first_timestamp(), Some(1_000));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = PriceSeries::new(vec![
            PricePoint::new(1_000, 100.0),
            PricePoint::new(1_000, 101.0),
        ]);
        assert!(matches!(result, Err(AnalyticsError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_descending_timestamps() {
        let result = PriceSeries::new(vec![
            PricePoint::new(2_000, 100.0),
            PricePoint::new(1_000, 101.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_rejects_bad_prices_and_volumes() {
        assert!(PriceSeries::from_prices(0, &[100.0, 0.0]).is_err());
        assert!(PriceSeries::from_prices(0, &[100.0, -3.0]).is_err());
        assert!(PriceSeries::from_prices(0, &[f64::NAN]).is_err());
        assert!(PriceSeries::new(vec![PricePoint::new(0, 1.0).with_volume(-1.0)]).is_err());
    }

    #[test]
    fn test_from_prices_spaces_days() {
        let series = PriceSeries::from_prices(0, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.timestamps(), vec![0, MILLIS_PER_DAY, 2 * MILLIS_PER_DAY]);
    }

    #[test]
    fn test_from_prices_timestamp_overflow() {
        let result = PriceSeries::from_prices(u64::MAX - MILLIS_PER_DAY / 2, &[1.0, 2.0]);
        assert!(matches!(result, Err(AnalyticsError::InvalidSeries(_))));
        assert!(PriceSeries::from_prices(u64::MAX, &[1.0]).is_ok());
    }

    #[test]
    fn test_derived_series_length_must_match() {
        let result = DerivedSeries::new(vec![1, 2, 3], vec![None, Some(1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_derived_series_accessors() {
        let derived = DerivedSeries::new(vec![1, 2, 3], vec![None, Some(1.0), None]).unwrap();
        assert_eq!(derived.value_at(0), None);
        assert_eq!(derived.value_at(1), Some(1.0));
        assert_eq!(derived.value_at(99), None);
        assert_eq!(derived.last_defined(), Some(1.0));
        assert_eq!(derived.defined_count(), 1);
    }

    #[test]
    fn test_zip_with_propagates_undefined() {
        let a = DerivedSeries::new(vec![1, 2, 3], vec![None, Some(4.0), Some(6.0)]).unwrap();
        let b = DerivedSeries::new(vec![1, 2, 3], vec![Some(1.0), Some(1.0), None]).unwrap();
        let diff = a.zip_with(&b, |x, y| x - y).unwrap();
        assert_eq!(diff.values(), &[None, Some(3.0), None]);
    }

    #[test]
    fn test_zip_with_rejects_misaligned_axes() {
        let a = DerivedSeries::new(vec![1, 2], vec![Some(1.0), Some(2.0)]).unwrap();
        let b = DerivedSeries::new(vec![1, 3], vec![Some(1.0), Some(2.0)]).unwrap();
        assert!(a.zip_with(&b, |x, y| x + y).is_err());
    }
}
