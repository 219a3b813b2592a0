use super::{playlist, shuffle, Candidate, Outcome, Phase, Status, Verdict};
use crate::api::{CatalogError, CatalogSearch};
use crate::config::{FlowConfig, LengthMismatchPolicy};
use crate::db::{SecretStore, ORIGINAL_ORDER_KEY, SEQUENCE_KEY};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Login fields. Never checked against any identity source.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Handed out by [`FlowController::begin_search`]; results are only accepted
/// for the most recent ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Setup → (Login) → Challenge → Resolved, with `reset` back to Setup from
/// anywhere.
///
/// Every transition is a synchronous `&mut self` call. Calls that do not apply
/// to the current phase are no-ops and report `false` / `None`.
pub struct FlowController<S: SecretStore> {
    store: S,
    config: FlowConfig,
    rng: StdRng,
    phase: Phase,
    playlist: Vec<Candidate>,
    stored_sequence: Vec<Candidate>,
    presentation_order: Vec<Candidate>,
    shuffled: bool,
    attempt: Vec<Candidate>,
    attempts_remaining: u32,
    credential: Option<Credential>,
    status: Option<Status>,
    search_results: Vec<Candidate>,
    search_generation: u64,
}

impl<S: SecretStore> FlowController<S> {
    /// A fresh controller in Setup. Does not read the store.
    pub fn new(store: S, config: FlowConfig) -> Self {
        Self {
            store,
            attempts_remaining: config.retry_budget,
            config,
            rng: StdRng::from_entropy(),
            phase: Phase::Setup,
            playlist: Vec::new(),
            stored_sequence: Vec::new(),
            presentation_order: Vec::new(),
            shuffled: false,
            attempt: Vec::new(),
            credential: None,
            status: None,
            search_results: Vec::new(),
            search_generation: 0,
        }
    }

    /// Resumes from a previously saved sequence if the store holds one.
    pub fn restore(store: S, config: FlowConfig) -> Self {
        let mut controller = Self::new(store, config);
        let saved = load_sequence(&controller.store, SEQUENCE_KEY)
            .or_else(|| load_sequence(&controller.store, ORIGINAL_ORDER_KEY));

        if let Some(sequence) = saved {
            info!(songs = sequence.len(), "restored saved sequence");
            controller.stored_sequence = sequence;
            controller.enter_gate();
        }
        controller
    }

    /// Reseeds the shuffle, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn playlist(&self) -> &[Candidate] {
        &self.playlist
    }

    pub fn stored_sequence(&self) -> &[Candidate] {
        &self.stored_sequence
    }

    pub fn presentation_order(&self) -> &[Candidate] {
        &self.presentation_order
    }

    pub fn attempt(&self) -> &[Candidate] {
        &self.attempt
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn search_results(&self) -> &[Candidate] {
        &self.search_results
    }

    /// Whether the challenge still accepts selections.
    pub fn accepts_selection(&self) -> bool {
        self.phase == Phase::Challenge && self.attempt.len() < self.stored_sequence.len()
    }

    // --- search -------------------------------------------------------------

    /// Starts a search. Any earlier ticket becomes stale, even when this query
    /// is too short to be sent.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        self.search_generation = self.search_generation.saturating_add(1);
        if self.phase != Phase::Setup {
            return None;
        }

        let query = query.trim();
        if query.chars().count() < self.config.min_query_chars {
            self.search_results.clear();
            return None;
        }

        Some(SearchTicket {
            generation: self.search_generation,
            query: query.to_string(),
        })
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.search_generation && self.phase == Phase::Setup
    }

    /// Applies a search outcome. Failures become an empty result set. Returns
    /// false when the ticket was superseded or the flow left Setup.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Candidate>, CatalogError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            debug!(query = %ticket.query, "dropping stale search results");
            return false;
        }

        self.search_results = match outcome {
            Ok(results) => results,
            Err(e) => {
                warn!("Error fetching songs: {e}");
                Vec::new()
            }
        };
        true
    }

    /// `begin_search` + catalog call + `finish_search` in one step.
    pub async fn search<C: CatalogSearch + ?Sized>(
        &mut self,
        catalog: &C,
        query: &str,
    ) -> Vec<Candidate> {
        let Some(ticket) = self.begin_search(query) else {
            return Vec::new();
        };
        let outcome = catalog.search(ticket.query()).await;
        if self.finish_search(ticket, outcome) {
            self.search_results.clone()
        } else {
            Vec::new()
        }
    }

    // --- setup --------------------------------------------------------------

    pub fn add_candidate(&mut self, candidate: impl Into<Candidate>) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        playlist::add(
            &mut self.playlist,
            candidate.into(),
            self.config.duplicate_policy,
        )
    }

    pub fn remove_candidate(&mut self, candidate: &str) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        playlist::remove_first(&mut self.playlist, &candidate.to_string())
    }

    /// Out-of-range indices are rejected, not clamped.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        playlist::move_item(&mut self.playlist, from, to)
    }

    /// Saves the playlist as the secret and moves on to Login or Challenge.
    pub fn complete_setup(&mut self) -> bool {
        if self.phase != Phase::Setup || self.playlist.is_empty() {
            return false;
        }

        self.stored_sequence = std::mem::take(&mut self.playlist);
        self.persist_sequence();
        self.attempt.clear();
        self.search_results.clear();
        self.status = None;
        self.attempts_remaining = self.config.retry_budget;
        self.shuffled = false;
        self.presentation_order.clear();
        info!(songs = self.stored_sequence.len(), "sequence saved");

        self.enter_gate();
        true
    }

    // --- login --------------------------------------------------------------

    /// Placeholder gate: any non-blank username and password pass.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if self.phase != Phase::Login {
            return false;
        }

        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            self.status = Some(Status::LoginRejected);
            return false;
        }

        self.credential = Some(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
        self.status = None;
        debug!(username, "login accepted");
        self.phase = Phase::Challenge;
        self.enter_challenge();
        true
    }

    // --- challenge ----------------------------------------------------------

    /// Shuffles the saved sequence on first entry; later calls return the
    /// same order until `reset`.
    pub fn enter_challenge(&mut self) -> &[Candidate] {
        if self.phase == Phase::Challenge && !self.shuffled {
            self.presentation_order = shuffle::shuffled(&self.stored_sequence, &mut self.rng);
            self.shuffled = true;
            debug!(songs = self.presentation_order.len(), "challenge order shuffled");
        }
        &self.presentation_order
    }

    pub fn select_candidate(&mut self, candidate: &str) -> bool {
        if !self.accepts_selection() || !self.presentation_order.iter().any(|c| c == candidate) {
            return false;
        }
        self.attempt.push(candidate.to_string());
        true
    }

    pub fn clear_attempt(&mut self) -> bool {
        if self.phase != Phase::Challenge {
            return false;
        }
        self.attempt.clear();
        self.status = None;
        true
    }

    /// Checks the attempt against the saved sequence. `None` when there is
    /// nothing to check (empty attempt, or not in an unresolved challenge).
    pub fn verify(&mut self) -> Option<Verdict> {
        if self.phase != Phase::Challenge || self.attempt.is_empty() {
            return None;
        }

        let expected = self.stored_sequence.len();
        let actual = self.attempt.len();
        let verdict = if actual != expected
            && self.config.length_mismatch_policy == LengthMismatchPolicy::Reject
        {
            Verdict::WrongCount { expected, actual }
        } else if self.attempt == self.stored_sequence {
            self.phase = Phase::Resolved(Outcome::Success);
            Verdict::Success
        } else {
            self.attempt.clear();
            // The mismatch that spends the last retry locks immediately.
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            if self.attempts_remaining > 0 {
                Verdict::Mismatch {
                    attempts_remaining: self.attempts_remaining,
                }
            } else {
                self.phase = Phase::Resolved(Outcome::Locked);
                Verdict::Locked
            }
        };

        info!(?verdict, "attempt verified");
        self.status = Some(Status::Verdict(verdict));
        Some(verdict)
    }

    // --- reset --------------------------------------------------------------

    /// Forgets everything, including the stored secret.
    pub fn reset(&mut self) {
        for key in [SEQUENCE_KEY, ORIGINAL_ORDER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {key} from secret store: {e}");
            }
        }

        self.phase = Phase::Setup;
        self.playlist.clear();
        self.stored_sequence.clear();
        self.presentation_order.clear();
        self.shuffled = false;
        self.attempt.clear();
        self.attempts_remaining = self.config.retry_budget;
        self.credential = None;
        self.status = None;
        self.search_results.clear();
        self.search_generation = self.search_generation.saturating_add(1);
        info!("flow reset");
    }

    fn enter_gate(&mut self) {
        if self.config.login_gate {
            self.phase = Phase::Login;
        } else {
            self.phase = Phase::Challenge;
            self.enter_challenge();
        }
    }

    fn persist_sequence(&mut self) {
        let value = Value::from(self.stored_sequence.clone());
        // The session keeps working from memory if the store is read-only.
        if let Err(e) = self.store.set(SEQUENCE_KEY, value.clone()) {
            warn!("Failed to save sequence: {e}");
        }
        if self.config.login_gate {
            if let Err(e) = self.store.set(ORIGINAL_ORDER_KEY, value) {
                warn!("Failed to save original order: {e}");
            }
        }
    }
}

fn load_sequence<S: SecretStore>(store: &S, key: &str) -> Option<Vec<Candidate>> {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read {key} from secret store: {e}");
            return None;
        }
    };

    match serde_json::from_value::<Vec<Candidate>>(value) {
        Ok(sequence) if !sequence.is_empty() => Some(sequence),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring malformed {key}: {e}");
            None
        }
    }
}
