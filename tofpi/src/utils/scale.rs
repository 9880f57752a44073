/// Trait for mapping a value linearly from one scale to another.
pub trait Scalable {
    /// Maps a value from one scale to another (Arduino `map()` equivalent, without integer
    /// truncation).
    ///
    /// # Parameters
    /// * `self`:  the value to map
    /// * `from_low`:  the low end of the originating range
    /// * `from_high`:  the high end of the originating range
    /// * `to_low`:  the low end of the target range
    /// * `to_high`:  the high end of the target range
    fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self;
}

impl Scalable for f64 {
    fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self {
        (self - from_low) * (to_high - to_low) / (from_high - from_low) + to_low
    }
}

#[cfg(test)]
mod tests {
    use super::Scalable;

    #[test]
    fn test_scale_percent_to_duty() {
        assert!((0.0f64.scale(0.0, 100.0, 2.5, 12.5) - 2.5).abs() < f64::EPSILON);
        assert!((50.0f64.scale(0.0, 100.0, 2.5, 12.5) - 7.5).abs() < f64::EPSILON);
        assert!((100.0f64.scale(0.0, 100.0, 2.5, 12.5) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_reversed_target() {
        assert!((25.0f64.scale(0.0, 100.0, 100.0, 0.0) - 75.0).abs() < f64::EPSILON);
    }
}
