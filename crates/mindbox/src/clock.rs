//! Time and identity sources injected into the store.
//!
//! Production code uses [`SystemClock`] and [`RandomIds`]. Tests (ours and any
//! UI client's) swap in [`FixedClock`] and [`SequentialIds`] to get stable
//! timestamps and predictable ids such as `Uuid::from_u128(1)`.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use uuid::Uuid;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdSource {
    /// Returns a fresh id. Ids are never handed out twice.
    fn next_id(&self) -> Uuid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Hands out `Uuid::from_u128(n)`, `n + 1`, ...
#[derive(Debug)]
pub struct SequentialIds {
    next: Cell<u128>,
}

impl SequentialIds {
    pub fn starting_at(first: u128) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    /// Moves the counter forward; never backwards, so ids stay unique.
    pub fn skip_to(&self, next: u128) {
        if next > self.next.get() {
            self.next.set(next);
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> Uuid {
        let n = self.next.get();
        self.next.set(n + 1);
        Uuid::from_u128(n)
    }
}

impl<T: Clock + ?Sized> Clock for std::rc::Rc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: IdSource + ?Sized> IdSource for std::rc::Rc<T> {
    fn next_id(&self) -> Uuid {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::starting_at(1);
        assert_eq!(ids.next_id(), Uuid::from_u128(1));
        assert_eq!(ids.next_id(), Uuid::from_u128(2));
        ids.skip_to(10);
        assert_eq!(ids.next_id(), Uuid::from_u128(10));
        ids.skip_to(3);
        assert_eq!(ids.next_id(), Uuid::from_u128(11));
    }

    #[test]
    fn fixed_clock_advances_on_demand() {
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }

    #[test]
    fn random_ids_do_not_repeat() {
        let ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
