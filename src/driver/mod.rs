//! Session driver
//!
//! Single-threaded event loop that owns a [`Session`] and bridges it to a
//! presentation layer: intents arrive on an mpsc channel, views leave on a
//! watch channel. The computer opponent's delayed move and the celebration
//! clearing run as scheduled tasks keyed to the session's generation
//! counter, so a timer that fires after the state moved on is a no-op.

use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::{
    board::{CellIdx, Mark, Status},
    policy,
    session::Session,
};

/// Outbound state snapshots
pub mod view;

pub use view::GameView;

/// Buffer size for the inbound intent channel
const INTENT_BUF_SIZE: usize = 32;

/// Inbound user intents
/// Presentation layer -> Driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Intent {
    /// Place the current turn's mark at `cell`
    Play { cell: CellIdx },
    /// Move the history cursor to `index`
    JumpTo { index: usize },
    /// Fresh game, scores kept
    NewGame,
    /// Fresh game and zeroed scores
    ResetAll,
    /// Toggle the computer opponent (forces a full reset on change)
    SetMode { vs_computer: bool },
}

/// Internal messages from scheduled timer tasks, each carrying the
/// generation captured when the timer was armed
#[derive(Debug)]
enum Timed {
    OpponentDue(u64),
    CelebrationOver(u64),
}

/// Timing knobs for the driver's scheduled tasks
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Pause before the computer opponent moves
    pub think_delay: Duration,
    /// How long the win celebration displays before auto-clearing
    pub celebration: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(500),
            celebration: Duration::from_secs(5),
        }
    }
}

/// Presentation side of the driver: send intents, watch views
#[derive(Debug, Clone)]
pub struct DriverHandle {
    intents_tx: mpsc::Sender<Intent>,
    views_rx: watch::Receiver<GameView>,
}

impl DriverHandle {
    pub async fn send(&self, intent: Intent) -> Result<()> {
        self.intents_tx
            .send(intent)
            .await
            .with_context(|| "Driver is no longer running")
    }

    /// Fresh watch receiver for the view stream
    pub fn views(&self) -> watch::Receiver<GameView> {
        self.views_rx.clone()
    }

    /// Most recently published view
    pub fn latest(&self) -> GameView {
        self.views_rx.borrow().clone()
    }
}

#[derive(Debug)]
pub struct Driver<R> {
    session: Session,
    config: DriverConfig,
    /// Random source for the opponent's tie-breaking tiers
    rng: R,
    intents_rx: mpsc::Receiver<Intent>,
    views_tx: watch::Sender<GameView>,
    /// Channel the timer tasks report back on
    timed_tx: mpsc::Sender<Timed>,
    timed_rx: mpsc::Receiver<Timed>,
    /// Generation an opponent move is already armed for
    armed_for: Option<u64>,
}

impl<R: Rng> Driver<R> {
    /// Creates a driver and the handle the presentation layer keeps.
    /// Dropping the handle stops the driver.
    pub fn new(config: DriverConfig, rng: R) -> (Self, DriverHandle) {
        let session = Session::new();
        let (intents_tx, intents_rx) = mpsc::channel(INTENT_BUF_SIZE);
        let (views_tx, views_rx) = watch::channel(GameView::capture(&session));
        let (timed_tx, timed_rx) = mpsc::channel(INTENT_BUF_SIZE);

        let driver = Self {
            session,
            config,
            rng,
            intents_rx,
            views_tx,
            timed_tx,
            timed_rx,
            armed_for: None,
        };
        let handle = DriverHandle {
            intents_tx,
            views_rx,
        };
        (driver, handle)
    }

    /// Main driver loop. Runs until every intent sender is dropped.
    pub async fn run(mut self) -> Result<()> {
        log::trace!("Driver started");
        loop {
            tokio::select! {
                intent = self.intents_rx.recv() => {
                    match intent {
                        None => {
                            log::trace!("Intent channel closed, driver stopping");
                            break;
                        }
                        Some(intent) => self.handle_intent(intent),
                    }
                }
                timed = self.timed_rx.recv() => {
                    // The driver holds a sender, so the channel stays open
                    if let Some(timed) = timed {
                        self.handle_timed(timed);
                    }
                }
            }
            self.publish();
            self.arm_opponent();
        }
        Ok(())
    }

    fn handle_intent(&mut self, intent: Intent) {
        log::debug!("Intent: {intent:?}");
        match intent {
            Intent::Play { cell } => self.apply_play(cell),
            Intent::JumpTo { index } => {
                if let Err(e) = self.session.jump_to(index) {
                    log::warn!("Rejected jump: {e}");
                }
            }
            Intent::NewGame => self.session.new_game(),
            Intent::ResetAll => self.session.reset_all(),
            Intent::SetMode { vs_computer } => self.session.set_mode(vs_computer),
        }
    }

    fn handle_timed(&mut self, timed: Timed) {
        match timed {
            Timed::OpponentDue(generation) => {
                if generation != self.session.generation() {
                    log::trace!("Stale opponent timer for generation {generation}");
                    return;
                }
                if !self.session.vs_computer() {
                    return;
                }
                if !matches!(
                    self.session.status(),
                    Status::InProgress {
                        turn: Mark::Nought
                    }
                ) {
                    return;
                }
                match policy::choose_move(self.session.board(), Mark::Nought, &mut self.rng) {
                    Some(cell) => self.apply_play(cell),
                    None => log::error!("Policy found no move on an in-progress board"),
                }
            }
            Timed::CelebrationOver(token) => {
                if !self.session.end_celebration(token) {
                    log::trace!("Stale celebration timer for generation {token}");
                }
            }
        }
    }

    /// Plays a move for whichever mark is up, starting the celebration
    /// timer when it ends the game with a win
    fn apply_play(&mut self, cell: CellIdx) {
        match self.session.play(cell) {
            Ok(Status::Won { .. }) => {
                let token = self.session.generation();
                self.schedule(Timed::CelebrationOver(token), self.config.celebration);
            }
            Ok(_) => {}
            Err(e) => log::warn!("Rejected move at cell {cell}: {e}"),
        }
    }

    /// Arms the opponent's delayed move when it is the computer's turn.
    /// Re-armed after every state change (a jump into a position where the
    /// computer is up also triggers it); stale timers cancel themselves by
    /// generation mismatch.
    fn arm_opponent(&mut self) {
        if !self.session.vs_computer() {
            return;
        }
        if !matches!(
            self.session.status(),
            Status::InProgress {
                turn: Mark::Nought
            }
        ) {
            return;
        }
        let generation = self.session.generation();
        if self.armed_for == Some(generation) {
            return;
        }
        self.armed_for = Some(generation);
        self.schedule(Timed::OpponentDue(generation), self.config.think_delay);
    }

    fn schedule(&self, timed: Timed, delay: Duration) {
        let tx = self.timed_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The driver may have stopped meanwhile
            let _ = tx.send(timed).await;
        });
    }

    fn publish(&self) {
        self.views_tx.send_replace(GameView::capture(&self.session));
    }
}
