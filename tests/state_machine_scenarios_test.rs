//! Turn-cycle scenarios against scripted collaborators.

use std::collections::VecDeque;

use puyo_director::core::{
    BoardEngine, InputMapper, PieceController, PieceQueue, PlayDirector, RecordingSink,
};
use puyo_director::types::{GameState, LogicalKey, PuyoPair, PuyoType};

/// Board whose answers are scripted; an exhausted script answers `false`.
#[derive(Default)]
struct ScriptBoard {
    check_fall: VecDeque<bool>,
    fall: VecDeque<bool>,
    check_erase: VecDeque<bool>,
    erase: VecDeque<bool>,
    scores: VecDeque<u32>,
    chain_indices: Vec<i32>,
    calls: usize,
}

impl ScriptBoard {
    fn next(script: &mut VecDeque<bool>) -> bool {
        script.pop_front().unwrap_or(false)
    }
}

impl BoardEngine for ScriptBoard {
    fn check_fall(&mut self) -> bool {
        self.calls += 1;
        Self::next(&mut self.check_fall)
    }

    fn fall(&mut self) -> bool {
        self.calls += 1;
        Self::next(&mut self.fall)
    }

    fn check_erase(&mut self, chain_index: i32) -> bool {
        self.calls += 1;
        self.chain_indices.push(chain_index);
        Self::next(&mut self.check_erase)
    }

    fn erase(&mut self) -> bool {
        self.calls += 1;
        Self::next(&mut self.erase)
    }

    fn pop_score(&mut self) -> u32 {
        self.scores.pop_front().unwrap_or(0)
    }
}

/// Pair controller whose spawn results and scores are scripted; an exhausted
/// spawn script succeeds.
#[derive(Default)]
struct ScriptPieces {
    spawn_results: VecDeque<bool>,
    spawned: Vec<PuyoPair>,
    active: bool,
    inputs: Vec<LogicalKey>,
    scores: VecDeque<u32>,
}

impl PieceController for ScriptPieces {
    type Board = ScriptBoard;

    fn spawn(&mut self, _board: &mut ScriptBoard, pair: PuyoPair) -> bool {
        self.spawned.push(pair);
        let ok = self.spawn_results.pop_front().unwrap_or(true);
        self.active = ok;
        ok
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self, _board: &mut ScriptBoard, input: LogicalKey) {
        self.inputs.push(input);
    }

    fn pop_score(&mut self) -> u32 {
        self.scores.pop_front().unwrap_or(0)
    }
}

/// Cycles through the colours; the preview is the next two pairs.
#[derive(Default)]
struct CountingQueue {
    drawn: u32,
    initialized: bool,
}

impl CountingQueue {
    fn pair(n: u32) -> PuyoPair {
        let t = PuyoType::ALL[(n % 5) as usize];
        PuyoPair::new(t, t)
    }
}

impl PieceQueue for CountingQueue {
    fn initialize(&mut self) {
        self.initialized = true;
        self.drawn = 0;
    }

    fn next_pair(&mut self) -> PuyoPair {
        let pair = Self::pair(self.drawn);
        self.drawn += 1;
        pair
    }

    fn for_each(&self, visitor: &mut dyn FnMut(usize, PuyoPair)) {
        visitor(0, Self::pair(self.drawn));
        visitor(1, Self::pair(self.drawn + 1));
    }
}

/// Replays a key script, then holds nothing.
#[derive(Default)]
struct ScriptInput {
    keys: VecDeque<LogicalKey>,
}

impl InputMapper for ScriptInput {
    fn sample(&mut self) -> LogicalKey {
        self.keys.pop_front().unwrap_or_default()
    }
}

type Director = PlayDirector<ScriptBoard, ScriptPieces, CountingQueue, ScriptInput, RecordingSink>;

fn director_with(board: ScriptBoard, pieces: ScriptPieces) -> Director {
    PlayDirector::new(
        board,
        pieces,
        CountingQueue::default(),
        ScriptInput::default(),
        RecordingSink::default(),
    )
}

fn director() -> Director {
    director_with(ScriptBoard::default(), ScriptPieces::default())
}

/// Start, grant spawn permission and bring in the first pair.
fn controlling() -> Director {
    let mut d = director();
    d.enable_spawn(true);
    d.tick();
    assert_eq!(d.state(), GameState::Control);
    d
}

/// Lock the active pair and run one tick.
fn lock_pair(d: &mut Director) {
    d.player_mut().active = false;
    d.tick();
}

#[test]
fn test_session_starts_in_waiting_from_falling() {
    let d = director();
    assert_eq!(d.state(), GameState::Waiting);
    assert_eq!(d.board().chain_indices, vec![-1]);
    assert_eq!(d.machine().chain_count(), 0);
    assert_eq!(d.tracker().sink().shown, vec![0]);
    assert!(d.queue().initialized);
    assert_eq!(d.preview().len(), 2);
}

#[test]
fn test_scenario_a_spawn_failure_ends_the_game() {
    let mut pieces = ScriptPieces::default();
    pieces.spawn_results.push_back(false);
    let mut d = director_with(ScriptBoard::default(), pieces);

    d.enable_spawn(true);
    d.tick();
    assert_eq!(d.state(), GameState::GameOver);
    assert!(d.is_game_over());

    let board_calls = d.board().calls;
    for _ in 0..50 {
        d.tick();
        assert_eq!(d.state(), GameState::GameOver);
    }
    assert_eq!(d.player().spawned.len(), 1);
    assert_eq!(d.board().calls, board_calls);
    assert_eq!(d.score(), 0);
}

#[test]
fn test_game_over_ignores_input_and_collaborators() {
    let mut pieces = ScriptPieces::default();
    pieces.spawn_results.push_back(false);
    let mut d = director_with(ScriptBoard::default(), pieces);
    d.enable_spawn(true);
    d.tick();
    assert!(d.is_game_over());

    d.board_mut().check_fall.extend([true; 10]);
    d.board_mut().check_erase.extend([true; 10]);
    d.input_mut().keys.extend([LogicalKey::all(); 10]);
    d.enable_spawn(false);
    for _ in 0..10 {
        d.tick();
        assert!(d.is_game_over());
    }
    d.enable_spawn(true);
    d.tick();
    assert!(d.is_game_over());
    assert_eq!(d.player().spawned.len(), 1);
}

#[test]
fn test_scenario_b_nothing_to_fall_cascades_within_the_tick() {
    let mut d = controlling();
    d.board_mut().check_fall.push_back(false);
    d.board_mut().check_erase.push_back(true);
    d.board_mut().erase.extend([true, true]);

    lock_pair(&mut d);
    // Falling was entered and left inside the tick.
    assert_eq!(d.state(), GameState::Erasing);
    assert_eq!(d.machine().chain_count(), 1);

    d.tick();
    d.tick();
    assert_eq!(d.state(), GameState::Erasing);

    // Erase done: Falling again, nothing falls, no further match, respawn.
    d.tick();
    assert_eq!(d.state(), GameState::Control);
    assert_eq!(d.player().spawned.len(), 2);
    assert_eq!(d.machine().chain_count(), 0);
}

#[test]
fn test_falling_stays_observable_while_settling() {
    let mut d = controlling();
    d.board_mut().check_fall.push_back(true);
    d.board_mut().fall.extend([true, true, false]);

    lock_pair(&mut d);
    assert_eq!(d.state(), GameState::Falling);
    d.tick();
    assert_eq!(d.state(), GameState::Falling);
    d.tick();
    assert_eq!(d.state(), GameState::Falling);
    d.tick();
    assert_eq!(d.state(), GameState::Control);
}

#[test]
fn test_scenario_c_waiting_until_spawn_is_enabled() {
    let mut d = director();
    for _ in 0..30 {
        d.tick();
        assert_eq!(d.state(), GameState::Waiting);
    }
    assert!(d.player().spawned.is_empty());

    d.enable_spawn(true);
    d.tick();
    assert_eq!(d.state(), GameState::Control);
    assert_eq!(d.player().spawned.len(), 1);
}

#[test]
fn test_scenario_d_erasing_exit_depends_on_permission() {
    for (can_spawn, expected) in [(false, GameState::Waiting), (true, GameState::Control)] {
        let mut d = controlling();
        d.enable_spawn(can_spawn);
        lock_pair(&mut d);
        assert_eq!(d.state(), expected, "can_spawn = {}", can_spawn);
        assert_eq!(d.machine().chain_count(), 0);
    }
}

#[test]
fn test_chain_count_increments_per_match_and_resets_on_exit() {
    let mut d = controlling();
    d.board_mut().check_erase.extend([true, true, true]);

    lock_pair(&mut d);
    let mut counts = vec![d.machine().chain_count()];
    while d.state() == GameState::Erasing {
        d.tick();
        if d.state() == GameState::Erasing && Some(&d.machine().chain_count()) != counts.last() {
            counts.push(d.machine().chain_count());
        }
    }

    assert_eq!(counts, vec![1, 2, 3]);
    assert_eq!(d.state(), GameState::Control);
    assert_eq!(d.machine().chain_count(), 0);
    assert_eq!(d.board().chain_indices, vec![-1, 0, 1, 2, 3]);
}

#[test]
fn test_input_is_forwarded_before_the_update() {
    let mut d = director();
    d.input_mut()
        .keys
        .extend([LogicalKey::LEFT, LogicalKey::LEFT | LogicalKey::DOWN]);
    d.tick();
    d.tick();
    d.tick();
    assert_eq!(
        d.player().inputs,
        vec![
            LogicalKey::LEFT,
            LogicalKey::LEFT | LogicalKey::DOWN,
            LogicalKey::empty()
        ]
    );
}

#[test]
fn test_score_drains_positive_deltas_only() {
    let mut d = controlling();
    d.player_mut().scores.extend([0, 3, 0, 0]);
    d.board_mut().scores.extend([0, 0, 40, 0]);

    for _ in 0..4 {
        d.tick();
    }
    assert_eq!(d.score(), 43);
    assert_eq!(d.tracker().sink().shown, vec![0, 3, 43]);
}

#[test]
fn test_score_never_decreases_across_a_session() {
    let mut d = controlling();
    d.player_mut().scores.extend((0..40).map(|i| i % 3));
    d.board_mut().scores.extend((0..40).map(|i| (i % 5) * 10));

    let mut last = d.score();
    for i in 0..40 {
        if i % 7 == 0 {
            lock_pair(&mut d);
        } else {
            d.tick();
        }
        assert!(d.score() >= last);
        last = d.score();
    }
}

#[test]
fn test_states_between_ticks_are_always_resting() {
    let mut d = controlling();
    d.board_mut().check_fall.extend([true, false, true]);
    d.board_mut().fall.extend([true, false, false]);
    d.board_mut().check_erase.extend([true, false, true, true]);
    d.board_mut().erase.extend([true, false, true]);

    for i in 0..60 {
        if i % 5 == 0 {
            lock_pair(&mut d);
        } else {
            d.tick();
        }
        assert!(GameState::ALL.contains(&d.state()));
    }
}
