use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

use crate::contracts::{Level, LogRecord};

/// Synthesizes [`LogRecord`]s from a random source it owns.
///
/// The generator keeps no state besides the random source: every record
/// gets an independently drawn level and a fresh v4 `order_id`.
pub struct Generator<R = StdRng> {
    rng: R,
}

impl Generator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator, identical seeds produce identical sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self) -> LogRecord {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&mut self, now: DateTime<Utc>) -> LogRecord {
        let level = self.next_level();
        let order_id = self.next_order_id();

        LogRecord::new(now.trunc_subsecs(0), level, order_id)
    }

    fn next_level(&mut self) -> Level {
        // ALL is non-empty
        *Level::ALL.choose(&mut self.rng).unwrap_or(&Level::Info)
    }

    fn next_order_id(&mut self) -> Uuid {
        Builder::from_random_bytes(self.rng.r#gen()).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use uuid::{Variant, Version};

    fn is_layout(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 19
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                10 => *b == b'T',
                13 | 16 => *b == b':',
                _ => b.is_ascii_digit(),
            })
    }

    #[test]
    fn test_level_and_message_consistent() {
        let mut generator = Generator::seeded(7);
        for _ in 0..500 {
            let record = generator.generate();
            assert!(Level::ALL.contains(&record.level()));
            assert_eq!(record.message(), record.level().message());
            assert_eq!(record.service(), "orders");
        }
    }

    #[test]
    fn test_order_id_is_canonical_v4() {
        let mut generator = Generator::from_entropy();
        for _ in 0..100 {
            let id = generator.generate().order_id();
            let text = id.hyphenated().to_string();

            assert_eq!(text.len(), 36);
            assert_eq!(Uuid::parse_str(&text).unwrap(), id);
            assert_eq!(id.get_version(), Some(Version::Random));
            assert_eq!(id.get_variant(), Variant::RFC4122);
        }
    }

    #[test]
    fn test_order_ids_unique() {
        let mut generator = Generator::from_entropy();
        let ids: HashSet<Uuid> = (0..10_000).map(|_| generator.generate().order_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_timestamp_layout_and_not_before_start() {
        let start = Utc::now().trunc_subsecs(0);
        let record = Generator::from_entropy().generate();

        assert!(is_layout(&record.formatted_timestamp()));
        assert!(record.timestamp() >= start);
        assert_eq!(record.timestamp().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_generate_at_truncates_subseconds() {
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999);
        let record = Generator::seeded(1).generate_at(now);
        assert_eq!(record.formatted_timestamp(), "2023-12-31T23:59:59");
    }

    #[test]
    fn test_seeded_generators_reproducible() {
        let now = Utc::now();
        let mut a = Generator::seeded(42);
        let mut b = Generator::seeded(42);

        for _ in 0..20 {
            assert_eq!(a.generate_at(now), b.generate_at(now));
        }
    }

    #[test]
    fn test_all_levels_observed() {
        let mut generator = Generator::seeded(3);
        let seen: HashSet<Level> = (0..300).map(|_| generator.generate().level()).collect();
        assert_eq!(seen.len(), 3);
    }
}
