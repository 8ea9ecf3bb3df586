//! Live collection view
//!
//! Keeps a local mirror of one remote collection. Every delivery is a full
//! snapshot that replaces the mirror outright; the filtered view is
//! recomputed from the mirror after each snapshot, each debounced filter
//! change and each optimistic mutation.
//!
//! All view state sits behind one mutex that is never held across an
//! `.await`. The subscription pump and the filter debouncer both take that
//! lock and check the phase first, so once [`LiveCollectionView::close`]
//! has marked the view `Closed` nothing else can change it.

use crate::debounce::Debouncer;
use crate::error::ViewError;
use crate::filter::SearchQuery;
use crate::state::{validate_transition, ViewPhase};
use futures::StreamExt;
use parking_lot::Mutex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use wastewise_model::{Document, DocumentId, Entity, Searchable};
use wastewise_store::{DocumentStore, SnapshotEvent, StoreError, Subscription};

/// Default quiet period before filter text is applied
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Live view settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// Quiet period for `set_filter_text`
    pub debounce: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl ViewConfig {
    /// Settings with a custom debounce period
    #[must_use]
    pub fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

/// Local change applied after a successful write, ahead of the next snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum OptimisticMutation<T> {
    /// Add a record, replacing any record with the same key
    Insert(T),
    /// Replace the record with the same key
    Update(T),
    /// Remove the record with this key
    Remove(DocumentId),
}

/// Identifies one subscription cycle of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    collection: &'static str,
    generation: u64,
}

impl SubscriptionHandle {
    /// Subscribed collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Subscription cycle number; increases with every open/refresh
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of [`LiveCollectionView::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new subscription replaced the previous one
    Resubscribed(SubscriptionHandle),
    /// An open or refresh is still waiting for its first snapshot
    AlreadyInFlight,
}

/// Counters for one view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Snapshots that replaced the mirror
    pub snapshots_applied: u64,
    /// Filter recomputations triggered by filter text
    pub filter_passes: u64,
    /// Optimistic mutations applied
    pub optimistic_mutations: u64,
    /// Deliveries dropped because a newer subscription superseded them
    pub stale_discarded: u64,
    /// Documents skipped because they could not be decoded
    pub malformed_skipped: u64,
}

/// Read model handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<T> {
    /// Current phase
    pub phase: ViewPhase,
    /// Every record in the mirror
    pub records: Vec<T>,
    /// Records passing the applied filter
    pub visible: Vec<T>,
    /// Filter text currently applied (not the text still debouncing)
    pub filter_text: String,
    /// Human-readable message of the last subscription failure
    pub error: Option<String>,
    /// A refresh is waiting for its first snapshot while data is shown
    pub refreshing: bool,
}

struct ViewState<T> {
    phase: ViewPhase,
    mirror: Vec<T>,
    visible: Vec<T>,
    query: SearchQuery,
    error: Option<String>,
    generation: u64,
    in_flight: bool,
    pump: Option<JoinHandle<()>>,
    stats: ViewStats,
}

impl<T: Entity + Searchable> ViewState<T> {
    fn new() -> Self {
        Self {
            phase: ViewPhase::Idle,
            mirror: Vec::new(),
            visible: Vec::new(),
            query: SearchQuery::default(),
            error: None,
            generation: 0,
            in_flight: false,
            pump: None,
            stats: ViewStats::default(),
        }
    }

    fn transition(&mut self, to: ViewPhase) -> Result<(), ViewError> {
        validate_transition(self.phase, to)?;
        tracing::trace!(collection = T::COLLECTION, from = %self.phase, %to, "view phase");
        self.phase = to;
        Ok(())
    }

    fn recompute(&mut self) {
        self.visible = self.query.filter(&self.mirror);
    }

    fn fail(&mut self, error: &StoreError) {
        tracing::warn!(collection = T::COLLECTION, %error, "subscription failed");
        if let Err(e) = self.transition(ViewPhase::Error) {
            tracing::error!(collection = T::COLLECTION, error = %e, "cannot enter error phase");
            return;
        }
        self.error = Some(error.user_message().to_string());
        self.in_flight = false;
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.mirror.iter().position(|r| r.id() == id)
    }
}

struct Shared<T> {
    state: Mutex<ViewState<T>>,
    changes: watch::Sender<u64>,
}

impl<T: Entity + Searchable> Shared<T> {
    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    /// Apply one delivery. Returns `false` once the pump should stop.
    fn deliver(&self, generation: u64, event: SnapshotEvent) -> bool {
        let mut state = self.state.lock();
        if state.phase == ViewPhase::Closed {
            return false;
        }
        if generation != state.generation {
            state.stats.stale_discarded += 1;
            tracing::debug!(collection = T::COLLECTION, generation, "stale delivery discarded");
            return false;
        }

        let keep_going = match event {
            Ok(documents) => {
                if let Err(e) = state.transition(ViewPhase::Ready) {
                    tracing::error!(collection = T::COLLECTION, error = %e, "snapshot ignored");
                    return false;
                }
                let (records, skipped) = decode_all::<T>(documents);
                state.mirror = records;
                state.recompute();
                state.in_flight = false;
                state.error = None;
                state.stats.snapshots_applied += 1;
                state.stats.malformed_skipped += skipped;
                tracing::debug!(
                    collection = T::COLLECTION,
                    records = state.mirror.len(),
                    visible = state.visible.len(),
                    "snapshot applied"
                );
                true
            }
            Err(error) => {
                state.fail(&error);
                false
            }
        };
        drop(state);
        self.notify();
        keep_going
    }

    fn apply_filter(&self, text: &str) {
        let mut state = self.state.lock();
        if state.phase == ViewPhase::Closed {
            return;
        }
        state.query = SearchQuery::parse(text);
        state.recompute();
        state.stats.filter_passes += 1;
        tracing::debug!(
            collection = T::COLLECTION,
            terms = state.query.terms().len(),
            visible = state.visible.len(),
            "filter applied"
        );
        drop(state);
        self.notify();
    }
}

fn decode_all<T: Entity>(documents: Vec<Document>) -> (Vec<T>, u64) {
    let mut skipped = 0;
    let records = documents
        .into_iter()
        .filter_map(|document| match T::from_document(document) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(collection = T::COLLECTION, %error, "skipping malformed document");
                skipped += 1;
                None
            }
        })
        .collect();
    (records, skipped)
}

async fn pump<T: Entity + Searchable>(view: Weak<Shared<T>>, generation: u64, mut subscription: Subscription) {
    while let Some(event) = subscription.next().await {
        let Some(shared) = view.upgrade() else {
            break;
        };
        if !shared.deliver(generation, event) {
            break;
        }
    }
    tracing::debug!(collection = T::COLLECTION, generation, id = %subscription.id(), "pump finished");
}

/// Always-fresh local copy of one remote collection with a filtered view
///
/// Owns its mirror exclusively. Dropping the view closes it.
pub struct LiveCollectionView<T: Entity + Searchable> {
    store: Arc<dyn DocumentStore>,
    shared: Arc<Shared<T>>,
    debouncer: Debouncer<String>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity + Searchable> LiveCollectionView<T> {
    /// Create an idle view over the entity's collection
    ///
    /// # Panics
    /// If called outside a Tokio runtime
    pub fn new(store: Arc<dyn DocumentStore>, config: ViewConfig) -> Self {
        let (changes, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            state: Mutex::new(ViewState::new()),
            changes,
        });

        let target = Arc::downgrade(&shared);
        let debouncer = Debouncer::new(config.debounce, move |text: String| {
            if let Some(shared) = target.upgrade() {
                shared.apply_filter(&text);
            }
        });

        Self {
            store,
            shared,
            debouncer,
            _entity: PhantomData,
        }
    }

    /// Subscribe to the collection
    ///
    /// The view enters `Loading`; the first snapshot moves it to `Ready`.
    ///
    /// # Errors
    /// - `ViewError::AlreadyOpen` if the view left `Idle` already
    /// - `ViewError::Closed` if the view was closed
    /// - `ViewError::Subscribe` if the store refused; the view is then in `Error`
    pub async fn open(&self) -> Result<SubscriptionHandle, ViewError> {
        let generation = {
            let mut state = self.shared.state.lock();
            match state.phase {
                ViewPhase::Idle => {}
                ViewPhase::Closed => return Err(ViewError::Closed),
                _ => return Err(ViewError::AlreadyOpen),
            }
            state.transition(ViewPhase::Loading)?;
            state.generation += 1;
            state.in_flight = true;
            state.generation
        };
        self.shared.notify();
        tracing::debug!(collection = T::COLLECTION, generation, "opening view");
        self.start(generation).await
    }

    /// Re-run the subscription cycle (pull-to-refresh, manual retry)
    ///
    /// While an open or refresh is still waiting for its first snapshot this
    /// does nothing and reports `AlreadyInFlight`. From `Ready` the view
    /// stays `Ready` and shows `refreshing`; from `Error` or `Idle` it enters
    /// `Loading`.
    ///
    /// # Errors
    /// - `ViewError::Closed` if the view was closed
    /// - `ViewError::Subscribe` if the store refused; the view is then in `Error`
    pub async fn refresh(&self) -> Result<RefreshOutcome, ViewError> {
        let generation = {
            let mut state = self.shared.state.lock();
            if state.in_flight {
                return Ok(RefreshOutcome::AlreadyInFlight);
            }
            match state.phase {
                ViewPhase::Closed => return Err(ViewError::Closed),
                ViewPhase::Ready => state.transition(ViewPhase::Ready)?,
                ViewPhase::Loading => return Ok(RefreshOutcome::AlreadyInFlight),
                ViewPhase::Idle | ViewPhase::Error => {
                    state.transition(ViewPhase::Loading)?;
                    state.error = None;
                }
            }
            state.generation += 1;
            state.in_flight = true;
            state.generation
        };
        self.shared.notify();
        tracing::debug!(collection = T::COLLECTION, generation, "refreshing view");
        self.start(generation).await.map(RefreshOutcome::Resubscribed)
    }

    async fn start(&self, generation: u64) -> Result<SubscriptionHandle, ViewError> {
        let result = self.store.subscribe(T::COLLECTION).await;

        let mut state = self.shared.state.lock();
        if state.phase == ViewPhase::Closed {
            // Dropping the fresh subscription here releases it.
            return Err(ViewError::Closed);
        }
        let previous = state.pump.take();
        if let Some(previous) = previous {
            previous.abort();
        }

        match result {
            Ok(subscription) => {
                let task = tokio::spawn(pump(Arc::downgrade(&self.shared), generation, subscription));
                state.pump = Some(task);
                Ok(SubscriptionHandle {
                    collection: T::COLLECTION,
                    generation,
                })
            }
            Err(error) => {
                state.fail(&error);
                drop(state);
                self.shared.notify();
                Err(ViewError::Subscribe(error))
            }
        }
    }

    /// Release the subscription and cancel pending filter work
    ///
    /// Idempotent. After this returns no delivery or debounced filter can
    /// change the view.
    pub fn close(&self) {
        let pump = {
            let mut state = self.shared.state.lock();
            if state.phase == ViewPhase::Closed {
                return;
            }
            if let Err(e) = state.transition(ViewPhase::Closed) {
                tracing::error!(collection = T::COLLECTION, error = %e, "close rejected");
                return;
            }
            state.in_flight = false;
            state.pump.take()
        };
        if let Some(pump) = pump {
            pump.abort();
        }
        self.debouncer.cancel();
        self.shared.notify();
        tracing::debug!(collection = T::COLLECTION, "view closed");
    }

    /// Queue new filter text; applied after the quiet period
    ///
    /// # Errors
    /// `ViewError::Closed` if the view was closed
    pub fn set_filter_text(&self, text: impl Into<String>) -> Result<(), ViewError> {
        if self.phase() == ViewPhase::Closed {
            return Err(ViewError::Closed);
        }
        self.debouncer.trigger(text.into());
        Ok(())
    }

    /// Drop pending filter text and show every record immediately
    ///
    /// # Errors
    /// `ViewError::Closed` if the view was closed
    pub fn clear_filter(&self) -> Result<(), ViewError> {
        if self.phase() == ViewPhase::Closed {
            return Err(ViewError::Closed);
        }
        self.debouncer.cancel();
        self.shared.apply_filter("");
        Ok(())
    }

    /// Mutate the mirror ahead of the next snapshot
    ///
    /// Returns whether the mirror changed. The next snapshot overwrites
    /// whatever this did.
    ///
    /// # Errors
    /// `ViewError::Closed` if the view was closed
    pub fn apply_optimistic(&self, mutation: OptimisticMutation<T>) -> Result<bool, ViewError> {
        let mut state = self.shared.state.lock();
        if state.phase == ViewPhase::Closed {
            return Err(ViewError::Closed);
        }

        let changed = match mutation {
            OptimisticMutation::Insert(record) => {
                match state.position(record.id()) {
                    Some(idx) => state.mirror[idx] = record,
                    None => state.mirror.push(record),
                }
                true
            }
            OptimisticMutation::Update(record) => match state.position(record.id()) {
                Some(idx) => {
                    state.mirror[idx] = record;
                    true
                }
                None => false,
            },
            OptimisticMutation::Remove(id) => match state.position(&id) {
                Some(idx) => {
                    state.mirror.remove(idx);
                    true
                }
                None => false,
            },
        };

        if changed {
            state.recompute();
            state.stats.optimistic_mutations += 1;
            drop(state);
            self.shared.notify();
        }
        Ok(changed)
    }

    /// Copy of the current read model
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        let state = self.shared.state.lock();
        ViewSnapshot {
            phase: state.phase,
            records: state.mirror.clone(),
            visible: state.visible.clone(),
            filter_text: state.query.raw().to_string(),
            error: state.error.clone(),
            refreshing: state.phase == ViewPhase::Ready && state.in_flight,
        }
    }

    /// Records passing the applied filter
    #[must_use]
    pub fn visible(&self) -> Vec<T> {
        self.shared.state.lock().visible.clone()
    }

    /// Look up a mirrored record by key
    #[must_use]
    pub fn find(&self, id: &DocumentId) -> Option<T> {
        let state = self.shared.state.lock();
        state.position(id).map(|idx| state.mirror[idx].clone())
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> ViewPhase {
        self.shared.state.lock().phase
    }

    /// Counters
    #[must_use]
    pub fn stats(&self) -> ViewStats {
        self.shared.state.lock().stats
    }

    /// Change signal; the version increments on every observable change
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    /// Quiet period used for filter text
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }
}

impl<T: Entity + Searchable> Drop for LiveCollectionView<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Entity + Searchable> fmt::Debug for LiveCollectionView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("LiveCollectionView")
            .field("collection", &T::COLLECTION)
            .field("phase", &state.phase)
            .field("records", &state.mirror.len())
            .field("visible", &state.visible.len())
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}
