//! Game use case implementation.
//!
//! This module provides the `GameUseCase`, which drives one game session on
//! top of the `RecordStore`: drawing targets, scoring guesses, and confirming
//! wins after the reveal delay.

use crate::record_store::{LoadOutcome, RecordStore};
use crate::scheduler::ScheduledTask;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use vguess_core::character::{CharacterRecord, Roster};
use vguess_core::compare::{ComparisonRow, compare_records};
use vguess_core::error::{Result, VguessError};
use vguess_core::session::{Phase, SessionState, select_target};
use vguess_core::share;

/// What happened to a submitted guess.
#[derive(Debug, Clone)]
pub enum GuessOutcome {
    /// Recorded and scored against the target.
    Compared(ComparisonRow),
    /// Recorded, but the session has no target to score against.
    NoTarget,
    /// Ignored because the session is already won.
    AlreadyWon,
}

/// Use case for playing one game session.
///
/// # Responsibilities
///
/// - Drawing the target when the game starts or restarts
/// - Recording guesses and scoring them against the target
/// - Scheduling the deferred win check and cancelling superseded ones
/// - Publishing phase changes to subscribers
///
/// # Thread Safety
///
/// Session state sits behind a `tokio::sync::Mutex` shared with the pending
/// win check task. A guess updates the state, publishes its phase and swaps the
/// pending check under that one lock. Every transition also bumps the session
/// generation, so a check that fires after being superseded is a no-op even if
/// cancellation lost the race.
pub struct GameUseCase {
    store: Arc<RecordStore>,
    state: Arc<Mutex<SessionState>>,
    pending: std::sync::Mutex<Option<ScheduledTask>>,
    rng: std::sync::Mutex<StdRng>,
    win_delay: Duration,
    phase_tx: watch::Sender<Phase>,
}

impl GameUseCase {
    /// Creates a new `GameUseCase`.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store the roster is read from
    /// * `win_delay` - Delay between a guess and its win check
    pub fn new(store: Arc<RecordStore>, win_delay: Duration) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Idle);
        Self {
            store,
            state: Arc::new(Mutex::new(SessionState::default())),
            pending: std::sync::Mutex::new(None),
            rng: std::sync::Mutex::new(StdRng::from_entropy()),
            win_delay,
            phase_tx,
        }
    }

    /// Replaces the target selection RNG, mainly for reproducible tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = std::sync::Mutex::new(rng);
        self
    }

    /// Loads the roster and starts a fresh session around a random target.
    pub async fn start(&self) -> LoadOutcome {
        let outcome = self.store.load().await;
        let target = self.draw_target(&outcome.roster);
        if target.is_none() {
            tracing::warn!("No target available; this session cannot be won");
        }

        self.cancel_pending();
        self.state.lock().await.restart(target);
        self.publish(Phase::Idle);
        outcome
    }

    /// Drops the snapshot, re-ingests the source, and starts over.
    pub async fn reload(&self) -> LoadOutcome {
        let outcome = self.store.reload().await;
        let target = self.draw_target(&outcome.roster);

        self.cancel_pending();
        self.state.lock().await.restart(target);
        self.publish(Phase::Idle);
        outcome
    }

    pub async fn roster(&self) -> Arc<Roster> {
        self.store.roster().await
    }

    pub async fn set_search_text(&self, text: &str) {
        self.state.lock().await.set_search_text(text);
    }

    /// Records not yet guessed that match the current search text.
    pub async fn candidates(&self) -> Vec<CharacterRecord> {
        let roster = self.store.roster().await;
        let state = self.state.lock().await;
        state.candidates(&roster).into_iter().cloned().collect()
    }

    /// Resolves typed text (full name, nickname, or unique fragment) to a record.
    pub async fn resolve(&self, text: &str) -> Option<CharacterRecord> {
        let roster = self.store.roster().await;
        let state = self.state.lock().await;
        state.resolve(&roster, text).cloned()
    }

    /// Submits a guess by character id.
    ///
    /// The guess is scored immediately. If it is the target, the session only
    /// becomes won once the reveal delay has elapsed without a newer guess.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if `id` is not in the roster.
    pub async fn submit_guess(&self, id: u32) -> Result<GuessOutcome> {
        let roster = self.store.roster().await;
        let record = roster
            .get(id)
            .cloned()
            .ok_or_else(|| VguessError::not_found("character", id.to_string()))?;

        let mut state = self.state.lock().await;
        if state.has_won() {
            tracing::debug!("Ignoring guess {} after the session was won", id);
            return Ok(GuessOutcome::AlreadyWon);
        }

        let check = state.submit_guess(record.clone());
        let row = state.target().map(|target| compare_records(&record, target));

        // Guessing is published and the old check cancelled under the state
        // lock, before the new check can run.
        self.publish(Phase::Guessing);
        self.cancel_pending();
        if let Some(check) = check {
            let state = self.state.clone();
            let phase_tx = self.phase_tx.clone();
            let task = ScheduledTask::after(self.win_delay, async move {
                if state.lock().await.confirm_win(check) {
                    tracing::info!("Target identified");
                    phase_tx.send_replace(Phase::Won);
                }
            });
            *self.pending_slot() = Some(task);
        }
        drop(state);

        tracing::debug!("Recorded guess {}", id);
        Ok(match row {
            Some(row) => GuessOutcome::Compared(row),
            None => GuessOutcome::NoTarget,
        })
    }

    /// Rows for every guess so far, most recent first.
    pub async fn history(&self) -> Vec<ComparisonRow> {
        let state = self.state.lock().await;
        let Some(target) = state.target() else {
            return Vec::new();
        };
        state
            .guesses()
            .iter()
            .map(|guess| compare_records(guess, target))
            .collect()
    }

    /// Starts a new session on the persisted roster, so consumed targets are
    /// honoured even when they were marked after the initial load.
    pub async fn restart(&self) -> bool {
        let roster = self.store.stored_roster().await;
        let target = self.draw_target(&roster);

        self.cancel_pending();
        self.state.lock().await.restart(target);
        self.publish(Phase::Idle);
        self.state.lock().await.can_win()
    }

    /// Marks the current target as used so later sessions never draw it.
    pub async fn mark_target_consumed(&self) -> Result<()> {
        let id = self
            .state
            .lock()
            .await
            .target()
            .map(|t| t.id)
            .ok_or_else(|| VguessError::not_found("target", "current session"))?;
        self.store.mark_consumed(id).await
    }

    /// Share code of the current target, if there is one.
    pub async fn target_share_code(&self) -> Result<Option<String>> {
        let state = self.state.lock().await;
        state.target().map(share::encode_record).transpose()
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase()
    }

    pub async fn has_won(&self) -> bool {
        self.state.lock().await.has_won()
    }

    /// Copy of the current session state.
    pub async fn session(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Receiver notified on every phase change, including the deferred win.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    fn draw_target(&self, roster: &Roster) -> Option<CharacterRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        select_target(roster.records(), &mut *rng).cloned()
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.pending_slot().take() {
            task.cancel();
        }
    }

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<ScheduledTask>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, phase: Phase) {
        self.phase_tx.send_replace(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vguess_core::character::{NumericMode, RawRow};
    use vguess_core::compare::{Attribute, MatchKind};
    use vguess_infrastructure::{MemorySnapshotRepository, StaticRosterSource};

    const DELAY: Duration = Duration::from_millis(4000);

    fn row(id: u32, first: &str, last: &str, height: &str) -> RawRow {
        HashMap::from([
            ("Id".to_string(), id.to_string()),
            ("first_name".to_string(), first.to_string()),
            ("last_name".to_string(), last.to_string()),
            ("height".to_string(), height.to_string()),
        ])
    }

    // A roster with a single record always draws that record as target.
    async fn game_with(rows: Vec<RawRow>) -> GameUseCase {
        game_with_delay(rows, DELAY).await
    }

    async fn game_with_delay(rows: Vec<RawRow>, delay: Duration) -> GameUseCase {
        let store = RecordStore::new(
            Arc::new(MemorySnapshotRepository::new()),
            Arc::new(StaticRosterSource::new(rows)),
            NumericMode::Strict,
        );
        let game = GameUseCase::new(Arc::new(store), delay).with_rng(StdRng::seed_from_u64(3));
        game.start().await;
        game
    }

    async fn target_id(game: &GameUseCase) -> u32 {
        game.session().await.target().unwrap().id
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_guess_wins_after_delay() {
        let game = game_with(vec![row(1, "Ookami", "Mio", "160")]).await;

        let outcome = game.submit_guess(1).await.unwrap();
        let GuessOutcome::Compared(row) = outcome else {
            panic!("expected a scored row");
        };
        assert!(row.all_exact());
        assert_eq!(game.phase().await, Phase::Guessing);

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert!(!game.has_won().await);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(game.has_won().await);
        assert_eq!(*game.subscribe().borrow(), Phase::Won);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_second_guess_cancels_pending_win() {
        let game = game_with(vec![
            row(1, "Ookami", "Mio", "160"),
            row(2, "Usada", "Pekora", "153"),
        ])
        .await;
        let target = target_id(&game).await;
        let other = if target == 1 { 2 } else { 1 };

        game.submit_guess(target).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        game.submit_guess(other).await.unwrap();

        tokio::time::sleep(DELAY * 2).await;
        assert!(!game.has_won().await);
        assert_eq!(game.session().await.guesses().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_height_hint_points_toward_target() {
        let game = game_with(vec![
            row(1, "Ookami", "Mio", "160"),
            row(2, "Usada", "Pekora", "150"),
        ])
        .await;
        let target = target_id(&game).await;
        let other = if target == 1 { 2 } else { 1 };

        let GuessOutcome::Compared(row) = game.submit_guess(other).await.unwrap() else {
            panic!("expected a scored row");
        };
        let height = row.cell(Attribute::Height).unwrap();
        assert_eq!(height.verdict.kind, MatchKind::NoMatch);
        assert!(height.verdict.direction.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_guesses_after_win_are_ignored() {
        let game = game_with(vec![
            row(1, "Ookami", "Mio", "160"),
            row(2, "Usada", "Pekora", "150"),
        ])
        .await;
        let target = target_id(&game).await;
        let other = if target == 1 { 2 } else { 1 };

        game.submit_guess(target).await.unwrap();
        tokio::time::sleep(DELAY * 2).await;
        assert!(game.has_won().await);

        assert!(matches!(
            game.submit_guess(other).await.unwrap(),
            GuessOutcome::AlreadyWon
        ));
        assert_eq!(game.history().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_is_not_found() {
        let game = game_with(vec![row(1, "Ookami", "Mio", "160")]).await;
        let err = game.submit_guess(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_roster_session_never_wins() {
        let game = game_with(Vec::new()).await;
        assert!(game.session().await.target().is_none());
        assert!(game.target_share_code().await.unwrap().is_none());
        assert!(game.mark_target_consumed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_clears_history_and_cancels_pending_check() {
        let game = game_with(vec![row(1, "Ookami", "Mio", "160")]).await;
        game.submit_guess(1).await.unwrap();

        assert!(game.restart().await);
        tokio::time::sleep(DELAY * 2).await;

        assert!(!game.has_won().await);
        assert!(game.history().await.is_empty());
        assert_eq!(game.phase().await, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_narrows_candidates() {
        let game = game_with(vec![
            row(1, "Ookami", "Mio", "160"),
            row(2, "Usada", "Pekora", "150"),
        ])
        .await;

        game.set_search_text("peko").await;
        let names: Vec<String> = game
            .candidates()
            .await
            .iter()
            .map(|r| r.display_name())
            .collect();
        assert_eq!(names, vec!["Usada Pekora"]);
        assert_eq!(game.resolve("ookami mio").await.unwrap().id, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_instant_win_is_the_last_published_phase() {
        let game = game_with_delay(vec![row(1, "Ookami", "Mio", "160")], Duration::ZERO).await;
        let mut phase = game.subscribe();

        game.submit_guess(1).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(2),
            phase.wait_for(|p| *p == Phase::Won),
        )
        .await
        .unwrap()
        .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*phase.borrow(), Phase::Won);
        assert!(game.has_won().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_guesses_keep_only_the_latest_check() {
        for _ in 0..20 {
            let game = Arc::new(
                game_with_delay(
                    vec![
                        row(1, "Ookami", "Mio", "160"),
                        row(2, "Usada", "Pekora", "150"),
                    ],
                    Duration::from_millis(20),
                )
                .await,
            );
            let target = target_id(&game).await;
            let other = if target == 1 { 2 } else { 1 };

            let first = tokio::spawn({
                let game = game.clone();
                async move { game.submit_guess(target).await.map(|_| ()) }
            });
            let second = tokio::spawn({
                let game = game.clone();
                async move { game.submit_guess(other).await.map(|_| ()) }
            });
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            tokio::time::sleep(Duration::from_millis(100)).await;
            let session = game.session().await;
            let head = session.guesses()[0].id;
            assert_eq!(session.has_won(), head == target);
            assert_eq!(game.phase().await == Phase::Won, head == target);
        }
    }
}
