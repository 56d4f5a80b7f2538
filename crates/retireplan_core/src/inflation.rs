//! Inflation adjustment helpers

/// Grow a nominal amount by one period of inflation
#[inline]
pub fn inflate(value: f64, rate: f64) -> f64 {
    value * (1.0 + rate)
}

/// Remove one period of inflation from a nominal amount
#[inline]
pub fn deflate(value: f64, rate: f64) -> f64 {
    value / (1.0 + rate)
}

/// Express a value `years` periods in the future in today's money
#[inline]
pub fn deflate_over(value: f64, rate: f64, years: u32) -> f64 {
    value / (1.0 + rate).powf(f64::from(years))
}
