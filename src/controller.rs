use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::location::{LocationError, LocationProvider, Permission};
use crate::models::TimingsRecord;
use crate::navigation::{SelectedDate, Step};
use crate::timings::{FetchError, TimingsClient};

pub const PERMISSION_DENIED_MESSAGE: &str = "Location permission denied.";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching timings.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CycleError {
    /// The one line the user gets to see.
    pub fn user_message(&self) -> &'static str {
        match self {
            CycleError::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            CycleError::Location(_) | CycleError::Fetch(_) => FETCH_FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Success(TimingsRecord),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Mount,
    PrevDay,
    NextDay,
    PickDate(NaiveDate),
    /// Jump to the local calendar date.
    Today,
    Refresh,
}

/// Identifies one fetch cycle. Only the ticket with the latest generation
/// may write its outcome into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub date: NaiveDate,
}

/// Selected date plus what is known about its timings.
#[derive(Debug, Clone)]
pub struct Store {
    selected: SelectedDate,
    state: FetchState,
    generation: u64,
}

impl Store {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            selected: SelectedDate::new(date),
            state: FetchState::Idle,
            generation: 0,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected.get()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Apply a navigation event. Returns the ticket of the fetch cycle it
    /// starts, or `None` when the date did not change.
    pub fn dispatch(&mut self, action: Action) -> Option<FetchTicket> {
        let changed = match action {
            Action::Mount | Action::Refresh => true,
            Action::PrevDay => self.selected.step(Step::Back),
            Action::NextDay => self.selected.step(Step::Forward),
            Action::PickDate(date) => self.selected.set(date),
            Action::Today => self.selected.set(Local::now().date_naive()),
        };
        if !changed {
            return None;
        }

        self.generation += 1;
        self.state = FetchState::Loading;
        Some(FetchTicket {
            generation: self.generation,
            date: self.selected.get(),
        })
    }

    /// Store the outcome of a cycle. Outcomes for superseded tickets are
    /// dropped and `false` is returned.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<TimingsRecord, CycleError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale result for {} (generation {}, latest {})",
                ticket.date, ticket.generation, self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(record) => FetchState::Success(record),
            Err(e) => {
                match &e {
                    CycleError::Fetch(fetch) => warn!(
                        "Fetch for {} failed ({:?}): {}",
                        ticket.date,
                        fetch.kind(),
                        fetch
                    ),
                    _ => warn!("Fetch cycle for {} failed: {}", ticket.date, e),
                }
                FetchState::Error(e.user_message().to_string())
            }
        };
        true
    }
}

/// Permission, then position, then the network call. The first failure
/// ends the cycle.
pub async fn fetch_cycle(
    date: NaiveDate,
    location: &dyn LocationProvider,
    client: &dyn TimingsClient,
) -> Result<TimingsRecord, CycleError> {
    if location.request_permission().await == Permission::Denied {
        return Err(CycleError::PermissionDenied);
    }
    let coords = location.current_position().await?;
    debug!("Fetching timings for {} at {}", date, coords);
    Ok(client.fetch_timings_for(date, coords).await?)
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: FetchTicket,
    pub outcome: Result<TimingsRecord, CycleError>,
}

pub type CompletionSink = Arc<dyn Fn(Completion) + Send + Sync>;

/// Owns the store and the task of the current fetch cycle. Finished cycles
/// go out through the sink; the owner hands them back via [`Controller::complete`].
pub struct Controller {
    store: Store,
    location: Arc<dyn LocationProvider>,
    client: Arc<dyn TimingsClient>,
    runtime: Handle,
    sink: CompletionSink,
    in_flight: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(
        date: NaiveDate,
        location: Arc<dyn LocationProvider>,
        client: Arc<dyn TimingsClient>,
        runtime: Handle,
        sink: CompletionSink,
    ) -> Self {
        Self {
            store: Store::new(date),
            location,
            client,
            runtime,
            sink,
            in_flight: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn dispatch(&mut self, action: Action) -> Option<FetchTicket> {
        let ticket = self.store.dispatch(action)?;
        info!(
            "Loading timings for {} ({:?}, generation {})",
            ticket.date, action, ticket.generation
        );

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let location = Arc::clone(&self.location);
        let client = Arc::clone(&self.client);
        let sink = Arc::clone(&self.sink);
        self.in_flight = Some(self.runtime.spawn(async move {
            let outcome = fetch_cycle(ticket.date, location.as_ref(), client.as_ref()).await;
            sink(Completion { ticket, outcome });
        }));

        Some(ticket)
    }

    pub fn complete(&mut self, completion: Completion) -> bool {
        let applied = self.store.resolve(completion.ticket, completion.outcome);
        if applied {
            self.in_flight = None;
        }
        applied
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
