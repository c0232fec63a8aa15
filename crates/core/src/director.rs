//! Per-tick orchestration.
//!
//! [`PlayDirector`] owns the state machine and its collaborators. The host
//! calls [`PlayDirector::tick`] at a fixed rate and uses
//! [`PlayDirector::enable_spawn`] / [`PlayDirector::is_game_over`] to steer the
//! session. A finished session is never revived; build a new director instead.

use tracing::{info, trace};

use crate::board::Board;
use crate::collab::{BoardEngine, InputMapper, PieceController, PieceQueue};
use crate::config::SessionConfig;
use crate::player::PuyoPlayer;
use crate::rng::NextQueue;
use crate::score::{ScoreSink, ScoreTracker};
use crate::snapshot::SessionSnapshot;
use crate::state_machine::{Preview, Session, StateMachine};
use crate::types::{GameState, PuyoPair};

/// Director wired to the reference board, player and queue.
pub type ReferenceDirector<I, S> = PlayDirector<Board, PuyoPlayer, NextQueue, I, S>;

pub struct PlayDirector<B, P, Q, I, S> {
    board: B,
    player: P,
    queue: Q,
    input: I,
    tracker: ScoreTracker<S>,
    machine: StateMachine,
    preview: Preview,
    ticks: u64,
}

impl<B, P, Q, I, S> PlayDirector<B, P, Q, I, S>
where
    B: BoardEngine,
    P: PieceController<Board = B>,
    Q: PieceQueue,
    I: InputMapper,
    S: ScoreSink,
{
    /// Start a session: fill the queue, publish the preview, run the initial
    /// cascade and show a zero score.
    pub fn new(mut board: B, mut player: P, mut queue: Q, input: I, sink: S) -> Self {
        queue.initialize();

        let mut preview = Preview::new();
        let machine = {
            let mut session = Session {
                board: &mut board,
                pieces: &mut player,
                queue: &mut queue,
                preview: &mut preview,
            };
            session.refresh_preview();
            StateMachine::start(&mut session)
        };

        let mut tracker = ScoreTracker::new(sink);
        tracker.set_score(0);

        Self {
            board,
            player,
            queue,
            input,
            tracker,
            machine,
            preview,
            ticks: 0,
        }
    }

    /// Advance one fixed tick: input, one state machine update, score drain.
    pub fn tick(&mut self) {
        let keys = self.input.sample();
        self.player.update(&mut self.board, keys);

        let before = self.machine.current();
        {
            let Self {
                board,
                player,
                queue,
                preview,
                machine,
                ..
            } = self;
            let mut session = Session {
                board,
                pieces: player,
                queue,
                preview,
            };
            machine.update(&mut session);
        }

        let piece_points = self.player.pop_score();
        self.tracker.add_score(piece_points);
        let board_points = self.board.pop_score();
        self.tracker.add_score(board_points);

        self.ticks += 1;
        let state = self.machine.current();
        trace!(tick = self.ticks, state = state.as_str(), keys = keys.bits(), "tick");
        if state == GameState::GameOver && before != GameState::GameOver {
            info!(tick = self.ticks, score = self.tracker.score(), "session over");
        }
    }

    /// Grant or revoke spawn permission.
    pub fn enable_spawn(&mut self, enable: bool) {
        self.machine.enable_spawn(enable);
    }

    pub fn is_game_over(&self) -> bool {
        self.machine.is_game_over()
    }

    pub fn state(&self) -> GameState {
        self.machine.current()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    pub fn tracker(&self) -> &ScoreTracker<S> {
        &self.tracker
    }

    pub fn preview(&self) -> &[PuyoPair] {
        &self.preview
    }

    /// Ticks run since the session started
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.machine.current(),
            score: self.tracker.score(),
            chain_count: self.machine.chain_count(),
            can_spawn: self.machine.can_spawn(),
            game_over: self.machine.is_game_over(),
            ticks: self.ticks,
            preview: self.preview.to_vec(),
        }
    }
}

impl<I, S> ReferenceDirector<I, S>
where
    I: InputMapper,
    S: ScoreSink,
{
    /// Session on the reference collaborators, seeded from `config`.
    pub fn from_config(config: &SessionConfig, input: I, sink: S) -> Self {
        info!(seed = config.seed, colors = config.colors, "starting session");
        Self::new(
            Board::new(),
            PuyoPlayer::new(),
            NextQueue::new(config.seed, config.colors),
            input,
            sink,
        )
    }
}
