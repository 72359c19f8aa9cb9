//! Screen state of the dashboard.
//!
//! `Session` is the only writer of `UiState`. Every submitted search gets a
//! ticket with a sequence number; a completion whose ticket is older than
//! the latest dispatched one is discarded, so overlapping searches always
//! settle on the one the user submitted last.

use tracing::debug;

use crate::{LookupError, SearchQuery, WeatherProvider, WeatherReport};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    /// Nothing searched yet, or the user chose to try again.
    #[default]
    Idle,
    Loading {
        query: SearchQuery,
    },
    Error {
        message: String,
    },
    Success(Box<WeatherReport>),
}

/// Handle for one dispatched search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: SearchQuery,
}

impl SearchTicket {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: UiState,
    latest_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UiState::Loading { .. })
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.state {
            UiState::Success(report) => Some(&**report),
            _ => None,
        }
    }

    /// Start a search. Blank input returns `None` and leaves the state alone.
    pub fn submit(&mut self, raw: &str) -> Option<SearchTicket> {
        let query = SearchQuery::parse(raw)?;

        self.latest_seq += 1;
        debug!(seq = self.latest_seq, place = %query, "Search submitted");

        self.state = UiState::Loading { query: query.clone() };
        Some(SearchTicket { seq: self.latest_seq, query })
    }

    /// Apply a finished lookup. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        result: Result<WeatherReport, LookupError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(seq = ticket.seq, latest = self.latest_seq, "Discarding stale lookup result");
            return false;
        }

        self.state = match result {
            Ok(report) => UiState::Success(Box::new(report)),
            Err(err) => UiState::Error { message: err.to_string() },
        };
        true
    }

    /// Leave the error screen for the search screen.
    pub fn retry(&mut self) {
        if matches!(self.state, UiState::Error { .. }) {
            self.state = UiState::Idle;
        }
    }
}

/// Submit `raw`, run the lookup and apply its result.
///
/// Returns `false` without fetching when `raw` is blank.
pub async fn search<P>(provider: &P, session: &mut Session, raw: &str) -> bool
where
    P: WeatherProvider + ?Sized,
{
    let Some(ticket) = session.submit(raw) else {
        return false;
    };

    let result = provider.lookup(ticket.query()).await;
    session.complete(ticket, result);
    true
}
