use crate::clock::{FixedClock, SequentialIds};
use crate::relations::KeywordPolicy;
use crate::store::entity_store::EntityStore;
use crate::store::mem_backend::MemBackend;
use chrono::{DateTime, TimeZone, Utc};
use std::rc::Rc;

pub type InMemoryStore = EntityStore<MemBackend>;

/// An in-memory store with a clock and id source the test can drive.
///
/// Ids start at `Uuid::from_u128(1)`; use `ids.skip_to(n)` to jump ahead.
pub struct StoreFixture {
    pub store: InMemoryStore,
    pub clock: Rc<FixedClock>,
    pub ids: Rc<SequentialIds>,
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreFixture {
    pub fn new() -> Self {
        Self::with_backend(MemBackend::new(), KeywordPolicy::Keep)
    }

    pub fn with_policy(policy: KeywordPolicy) -> Self {
        Self::with_backend(MemBackend::new(), policy)
    }

    pub fn with_backend(backend: MemBackend, policy: KeywordPolicy) -> Self {
        let clock = Rc::new(FixedClock::new(Self::start()));
        let ids = Rc::new(SequentialIds::starting_at(1));
        let store = match EntityStore::open(backend) {
            Ok(store) => store,
            Err(err) => panic!("in-memory store failed to open: {}", err),
        };
        let store = store
            .with_clock(Rc::clone(&clock))
            .with_ids(Rc::clone(&ids))
            .with_keyword_policy(policy);
        Self { store, clock, ids }
    }

    /// The instant every fixture clock starts at.
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0)
            .single()
            .unwrap_or_default()
    }
}
