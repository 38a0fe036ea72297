//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with the todo schema applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore] // needs Docker
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let title = builder.title("main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// Tests are reproducible because every value derives from the seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_todo");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Todo title unique to this test
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.title("main"), "test-todo-7-main");
    /// ```
    pub fn title(&self, suffix: &str) -> String {
        format!("test-todo-{}-{}", self.seed, suffix)
    }

    /// Todo description unique to this test
    pub fn description(&self, suffix: &str) -> String {
        format!("description for {} ({})", suffix, self.seed)
    }

    /// Reminder instant in seconds since the epoch, spread over 2024 by seed
    pub fn reminder_secs(&self) -> i64 {
        const START_OF_2024: i64 = 1_704_067_200;
        const YEAR_SECS: u64 = 366 * 24 * 3600;
        START_OF_2024 + (self.seed % YEAR_SECS) as i64
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.title("a"), builder2.title("a"));
        assert_eq!(builder1.reminder_secs(), builder2.reminder_secs());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.title("a"), builder2.title("a"));
    }

    #[test]
    fn test_reminder_within_2024() {
        let secs = TestDataBuilder::new(u64::MAX).reminder_secs();
        assert!((1_704_067_200..1_735_689_600).contains(&secs));
    }
}
