//! Table-driven rules engine for exact tree-shape tests.
//!
//! A game is a list of positions linked by numbered moves. Each move can be
//! given approach/remote capture counts, and terminal positions carry fixed
//! scores. The state is just the index of the current position.

use std::cell::Cell;
use std::fmt;

use engine_core::{Player, Rules, RulesError, Scores, WinKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedAction {
    pub id: u32,
    pub win: Option<WinKind>,
}

impl ScriptedAction {
    pub fn plain(id: u32) -> Self {
        Self { id, win: None }
    }
}

impl fmt::Display for ScriptedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.win {
            Some(kind) => write!(f, "m{}:{}", self.id, kind),
            None => write!(f, "m{}", self.id),
        }
    }
}

#[derive(Debug, Clone)]
struct ScriptedMove {
    id: u32,
    next: usize,
    approach: usize,
    remote: usize,
}

#[derive(Debug, Clone)]
struct Position {
    to_move: Player,
    last: Option<Player>,
    terminal: bool,
    scores: Scores,
    moves: Vec<ScriptedMove>,
}

#[derive(Debug, Default)]
pub struct ScriptedRules {
    positions: Vec<Position>,
    capture_queries: Cell<usize>,
}

impl ScriptedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-terminal position with zero scores; returns its index.
    pub fn position(&mut self, to_move: Player, last: Option<Player>) -> usize {
        self.positions.push(Position {
            to_move,
            last,
            terminal: false,
            scores: Scores::zero(),
            moves: Vec::new(),
        });
        self.positions.len() - 1
    }

    /// Mark `position` as game over with the given final scores.
    pub fn finish(&mut self, position: usize, scores: Scores) {
        self.positions[position].terminal = true;
        self.positions[position].scores = scores;
    }

    pub fn set_scores(&mut self, position: usize, scores: Scores) {
        self.positions[position].scores = scores;
    }

    /// Quiet move `id` from `from` to `to`.
    pub fn step(&mut self, from: usize, id: u32, to: usize) {
        self.capture(from, id, to, 0, 0);
    }

    /// Move `id` from `from` to `to` capturing the given number of pieces.
    pub fn capture(&mut self, from: usize, id: u32, to: usize, approach: usize, remote: usize) {
        self.positions[from].moves.push(ScriptedMove {
            id,
            next: to,
            approach,
            remote,
        });
    }

    /// Number of approach/remote queries answered so far.
    pub fn capture_queries(&self) -> usize {
        self.capture_queries.get()
    }

    fn find(&self, state: usize, action: &ScriptedAction) -> Result<&ScriptedMove, RulesError> {
        self.positions[state]
            .moves
            .iter()
            .find(|m| m.id == action.id)
            .ok_or_else(|| RulesError::IllegalAction(format!("{} from position {}", action, state)))
    }

    fn captured(count: usize) -> Option<Vec<u8>> {
        (count > 0).then(|| vec![0; count])
    }
}

impl Rules for ScriptedRules {
    type State = usize;
    type Action = ScriptedAction;
    type Square = u8;

    fn legal_actions(&self, state: &usize, _player: Player) -> Result<Vec<ScriptedAction>, RulesError> {
        let position = &self.positions[*state];
        if position.terminal {
            return Ok(Vec::new());
        }
        Ok(position.moves.iter().map(|m| ScriptedAction::plain(m.id)).collect())
    }

    fn apply(&self, state: &mut usize, action: &ScriptedAction, player: Player) -> Result<bool, RulesError> {
        if self.positions[*state].to_move != player {
            return Err(RulesError::IllegalAction(format!("{} is not to move", player)));
        }
        let next = self.find(*state, action)?.next;
        *state = next;
        Ok(self.positions[next].terminal)
    }

    fn is_terminal(&self, state: &usize) -> bool {
        self.positions[*state].terminal
    }

    fn approach_captures(
        &self,
        state: &usize,
        action: &ScriptedAction,
        _player: Player,
    ) -> Result<Option<Vec<u8>>, RulesError> {
        self.capture_queries.set(self.capture_queries.get() + 1);
        Ok(Self::captured(self.find(*state, action)?.approach))
    }

    fn remote_captures(
        &self,
        state: &usize,
        action: &ScriptedAction,
        _player: Player,
    ) -> Result<Option<Vec<u8>>, RulesError> {
        self.capture_queries.set(self.capture_queries.get() + 1);
        Ok(Self::captured(self.find(*state, action)?.remote))
    }

    fn with_win_kind(&self, action: &ScriptedAction, kind: WinKind) -> ScriptedAction {
        ScriptedAction {
            win: Some(kind),
            ..*action
        }
    }

    fn scores(&self, state: &usize) -> Scores {
        self.positions[*state].scores
    }

    fn next_player(&self, state: &usize) -> Player {
        self.positions[*state].to_move
    }

    fn latest_mover(&self, state: &usize) -> Option<Player> {
        self.positions[*state].last
    }
}
