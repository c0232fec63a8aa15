//! Turn-cycle state machine.
//!
//! Five resting states, each with two transition queries:
//!
//! | State | `initialize` | `update` |
//! |-------|--------------|----------|
//! | Control | spawn next pair, GameOver if blocked | Falling once the pair locks |
//! | GameOver | - | - |
//! | Falling | Erasing if nothing is unsupported | Erasing once settled |
//! | Erasing | look for a match; Control/Waiting if none | Falling once erased |
//! | Waiting | - | Control once spawning is allowed |
//!
//! Whenever a query returns a target, the target's `initialize` runs before
//! control returns to the caller, and so on until some `initialize` answers
//! [`Transition::NoChange`]. A state can therefore be entered and left inside
//! one tick without ever being observed. The cascade is bounded by
//! [`CASCADE_LIMIT`]; overrunning it is a broken invariant and panics.

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::collab::{BoardEngine, PieceController, PieceQueue};
use crate::types::{GameState, PuyoPair, Transition, NEXT_COUNT};

/// Maximum number of `initialize` calls a single cascade may make.
pub const CASCADE_LIMIT: usize = GameState::COUNT;

/// Upcoming pairs as last published by the queue.
pub type Preview = ArrayVec<PuyoPair, NEXT_COUNT>;

/// Mutable context handed to every transition query.
pub struct Session<'a, B, P, Q> {
    pub board: &'a mut B,
    pub pieces: &'a mut P,
    pub queue: &'a mut Q,
    pub preview: &'a mut Preview,
}

impl<B, P, Q> Session<'_, B, P, Q>
where
    B: BoardEngine,
    P: PieceController<Board = B>,
    Q: PieceQueue,
{
    /// Copy the queue's current preview into the published preview. Pairs
    /// beyond [`NEXT_COUNT`] are not published.
    pub fn refresh_preview(&mut self) {
        let preview = &mut *self.preview;
        preview.clear();
        let mut dropped = 0usize;
        self.queue.for_each(&mut |_, pair| {
            if preview.try_push(pair).is_err() {
                dropped += 1;
            }
        });
        if dropped > 0 {
            warn!(dropped, "queue reported more pairs than the preview holds");
        }
    }
}

/// Controller state that survives between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine {
    current: GameState,
    /// `-1` until the first erase check of the session, then the index of the
    /// next check within the current chain.
    chain_count: i32,
    can_spawn: bool,
}

impl StateMachine {
    /// Create the machine for a new session and run its initial cascade,
    /// starting from [`GameState::Falling`].
    pub fn start<B, P, Q>(session: &mut Session<'_, B, P, Q>) -> Self
    where
        B: BoardEngine,
        P: PieceController<Board = B>,
        Q: PieceQueue,
    {
        let mut machine = Self {
            current: GameState::Falling,
            chain_count: -1,
            can_spawn: false,
        };
        machine.enter(session);
        info!(state = machine.current.as_str(), "state machine started");
        machine
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn chain_count(&self) -> i32 {
        self.chain_count
    }

    pub fn can_spawn(&self) -> bool {
        self.can_spawn
    }

    pub fn is_game_over(&self) -> bool {
        self.current == GameState::GameOver
    }

    /// Grant or revoke permission to spawn the next pair.
    pub fn enable_spawn(&mut self, enable: bool) {
        self.can_spawn = enable;
    }

    /// Run the current state's `update` once, cascading through any
    /// `initialize` calls it triggers.
    pub fn update<B, P, Q>(&mut self, session: &mut Session<'_, B, P, Q>)
    where
        B: BoardEngine,
        P: PieceController<Board = B>,
        Q: PieceQueue,
    {
        let transition = update_state(self.current, self.can_spawn, session);
        if let Transition::TransitionTo(next) = transition {
            log_transition(self.current, next);
            self.current = next;
            self.enter(session);
        }
    }

    fn enter<B, P, Q>(&mut self, session: &mut Session<'_, B, P, Q>)
    where
        B: BoardEngine,
        P: PieceController<Board = B>,
        Q: PieceQueue,
    {
        let Self {
            current,
            chain_count,
            can_spawn,
        } = self;
        let can_spawn = *can_spawn;
        run_cascade(current, |state| {
            initialize_state(state, chain_count, can_spawn, session)
        });
        if *current == GameState::GameOver {
            info!("game over");
        }
    }
}

/// Apply `initialize` to `current` until it answers [`Transition::NoChange`].
///
/// # Panics
///
/// If `initialize` keeps transitioning for more than [`CASCADE_LIMIT`] calls.
pub fn run_cascade<F>(current: &mut GameState, mut initialize: F)
where
    F: FnMut(GameState) -> Transition,
{
    for _ in 0..CASCADE_LIMIT {
        match initialize(*current) {
            Transition::NoChange => return,
            Transition::TransitionTo(next) => {
                log_transition(*current, next);
                *current = next;
            }
        }
    }
    panic!(
        "state cascade exceeded {} transitions (last state: {})",
        CASCADE_LIMIT,
        current.as_str()
    );
}

fn log_transition(from: GameState, to: GameState) {
    debug!(from = from.as_str(), to = to.as_str(), "state transition");
}

fn initialize_state<B, P, Q>(
    state: GameState,
    chain_count: &mut i32,
    can_spawn: bool,
    session: &mut Session<'_, B, P, Q>,
) -> Transition
where
    B: BoardEngine,
    P: PieceController<Board = B>,
    Q: PieceQueue,
{
    match state {
        GameState::Control => {
            let pair = session.queue.next_pair();
            if !session.pieces.spawn(&mut *session.board, pair) {
                info!(axis = pair.axis.as_str(), child = pair.child.as_str(), "spawn blocked");
                return Transition::TransitionTo(GameState::GameOver);
            }
            session.refresh_preview();
            Transition::NoChange
        }
        GameState::GameOver => Transition::NoChange,
        GameState::Falling => Transition::stay_or(session.board.check_fall(), GameState::Erasing),
        GameState::Erasing => {
            let chain_index = *chain_count;
            *chain_count += 1;
            if session.board.check_erase(chain_index) {
                debug!(chain_index, "match found");
                return Transition::NoChange;
            }
            *chain_count = 0;
            if can_spawn {
                Transition::TransitionTo(GameState::Control)
            } else {
                Transition::TransitionTo(GameState::Waiting)
            }
        }
        GameState::Waiting => Transition::NoChange,
    }
}

fn update_state<B, P, Q>(
    state: GameState,
    can_spawn: bool,
    session: &mut Session<'_, B, P, Q>,
) -> Transition
where
    B: BoardEngine,
    P: PieceController<Board = B>,
    Q: PieceQueue,
{
    match state {
        GameState::Control => Transition::stay_or(session.pieces.is_active(), GameState::Falling),
        GameState::GameOver => Transition::NoChange,
        GameState::Falling => Transition::stay_or(session.board.fall(), GameState::Erasing),
        GameState::Erasing => Transition::stay_or(session.board.erase(), GameState::Falling),
        GameState::Waiting => Transition::stay_or(!can_spawn, GameState::Control),
    }
}
