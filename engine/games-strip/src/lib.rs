//! One-row Fanorona for the Blinders engine
//!
//! A reference rules engine played on the middle row of a Fanorona board:
//! nine cells, four pieces a side, one empty cell in the middle. Pieces step to
//! an adjacent empty cell and capture by *approach* (the run of enemy pieces
//! directly ahead of the destination) or by *withdrawal* (the run directly
//! behind the origin), so a single move can offer both win variants.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Player, Rules};
//! use games_strip::{State, Strip};
//!
//! let strip = Strip::new();
//! let mut state = State::new();
//! let moves = strip.legal_actions(&state, Player::First).unwrap();
//! strip.apply(&mut state, &moves[0], Player::First).unwrap();
//! assert_eq!(strip.next_player(&state), Player::Second);
//! ```

use std::fmt;

use engine_core::{Player, Rules, RulesError, Scores, WinKind};

/// Number of cells on the strip
pub const CELLS: usize = 9;

/// Default ply limit after which the game is scored as it stands
pub const DEFAULT_MAX_PLIES: u32 = 60;

fn seat(player: Player) -> usize {
    match player {
        Player::First => 0,
        Player::Second => 1,
    }
}

/// Strip game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    cells: [Option<Player>; CELLS],
    to_move: Player,
    last: Option<Player>,
    /// Pieces captured by each seat, indexed by `seat()`
    captured: [u32; 2],
    plies: u32,
    max_plies: u32,
}

impl State {
    /// Opening position with the default ply limit.
    pub fn new() -> Self {
        let f = Some(Player::First);
        let s = Some(Player::Second);
        Self::from_cells([f, s, f, s, None, f, s, f, s], Player::First)
    }

    /// Arbitrary position with nothing captured and no move played yet.
    pub fn from_cells(cells: [Option<Player>; CELLS], to_move: Player) -> Self {
        Self {
            cells,
            to_move,
            last: None,
            captured: [0, 0],
            plies: 0,
            max_plies: DEFAULT_MAX_PLIES,
        }
    }

    /// Replace the ply limit.
    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Occupant of `cell` (None for empty or off-board).
    pub fn cell(&self, cell: usize) -> Option<Player> {
        self.cells.get(cell).copied().flatten()
    }

    /// Number of pieces `player` has on the board.
    pub fn pieces(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| **c == Some(player)).count()
    }

    /// Pieces captured so far by `player`.
    pub fn captured(&self, player: Player) -> u32 {
        self.captured[seat(player)]
    }

    /// Moves played so far.
    pub fn plies(&self) -> u32 {
        self.plies
    }

    /// Step moves available to `player`, ignoring whose turn it is.
    fn steps(&self, player: Player) -> Vec<Action> {
        let mut moves = Vec::new();
        for at in 0..CELLS {
            if self.cells[at] != Some(player) {
                continue;
            }
            for to in [at.checked_sub(1), Some(at + 1)].into_iter().flatten() {
                if to < CELLS && self.cells[to].is_none() {
                    moves.push(Action::new(at as u8, to as u8));
                }
            }
        }
        moves
    }

    /// Unbroken run of `player`'s opponents starting at `from` and walking by `step`.
    fn enemy_run(&self, from: isize, step: isize, player: Player) -> Vec<u8> {
        let enemy = Some(player.opponent());
        let mut run = Vec::new();
        let mut cell = from;
        while (0..CELLS as isize).contains(&cell) && self.cells[cell as usize] == enemy {
            run.push(cell as u8);
            cell += step;
        }
        run
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// A single step, optionally tagged with the capture it is played for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub at: u8,
    pub to: u8,
    pub win_by: Option<WinKind>,
}

impl Action {
    /// Untagged step from `at` to `to`.
    pub fn new(at: u8, to: u8) -> Self {
        Self {
            at,
            to,
            win_by: None,
        }
    }

    fn direction(&self) -> isize {
        if self.to > self.at {
            1
        } else {
            -1
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.at, self.to)?;
        if let Some(kind) = self.win_by {
            write!(f, ":{}", kind)?;
        }
        Ok(())
    }
}

/// One-row Fanorona rules engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Strip;

impl Strip {
    pub fn new() -> Self {
        Self
    }

    /// Check that `action` is a legal step for `player` in `state`.
    fn validate(&self, state: &State, action: &Action, player: Player) -> Result<(), RulesError> {
        let (at, to) = (action.at as usize, action.to as usize);
        if at >= CELLS || to >= CELLS {
            return Err(RulesError::IllegalAction(format!("{} is off the board", action)));
        }
        if at.abs_diff(to) != 1 {
            return Err(RulesError::IllegalAction(format!(
                "{} is not a single step",
                action
            )));
        }
        if state.cells[at] != Some(player) {
            return Err(RulesError::IllegalAction(format!(
                "{}: no piece of {} at {}",
                action, player, at
            )));
        }
        if state.cells[to].is_some() {
            return Err(RulesError::IllegalAction(format!(
                "{}: cell {} is occupied",
                action, to
            )));
        }
        Ok(())
    }

    fn approach_run(&self, state: &State, action: &Action, player: Player) -> Vec<u8> {
        let dir = action.direction();
        state.enemy_run(action.to as isize + dir, dir, player)
    }

    fn remote_run(&self, state: &State, action: &Action, player: Player) -> Vec<u8> {
        let dir = action.direction();
        state.enemy_run(action.at as isize - dir, -dir, player)
    }

    fn captures(
        &self,
        state: &State,
        action: &Action,
        player: Player,
        kind: WinKind,
    ) -> Result<Option<Vec<u8>>, RulesError> {
        self.validate(state, action, player)?;
        let run = match kind {
            WinKind::Approach => self.approach_run(state, action, player),
            WinKind::Remote => self.remote_run(state, action, player),
        };
        Ok((!run.is_empty()).then_some(run))
    }
}

impl Rules for Strip {
    type State = State;
    type Action = Action;
    type Square = u8;

    fn legal_actions(&self, state: &State, player: Player) -> Result<Vec<Action>, RulesError> {
        if self.is_terminal(state) {
            return Ok(Vec::new());
        }
        Ok(state.steps(player))
    }

    fn apply(&self, state: &mut State, action: &Action, player: Player) -> Result<bool, RulesError> {
        if self.is_terminal(state) {
            return Err(RulesError::IllegalAction(format!(
                "{}: the game is over",
                action
            )));
        }
        if player != state.to_move {
            return Err(RulesError::IllegalAction(format!(
                "{}: {} is not to move",
                action, player
            )));
        }
        self.validate(state, action, player)?;

        let captured = match action.win_by {
            Some(WinKind::Approach) => self.approach_run(state, action, player),
            Some(WinKind::Remote) => self.remote_run(state, action, player),
            None => {
                let approach = self.approach_run(state, action, player);
                if approach.is_empty() {
                    self.remote_run(state, action, player)
                } else {
                    approach
                }
            }
        };
        if action.win_by.is_some() && captured.is_empty() {
            return Err(RulesError::IllegalAction(format!(
                "{} captures nothing",
                action
            )));
        }

        for cell in &captured {
            state.cells[*cell as usize] = None;
        }
        state.captured[seat(player)] += captured.len() as u32;
        state.cells[action.to as usize] = state.cells[action.at as usize].take();
        state.plies += 1;
        state.last = Some(player);
        state.to_move = player.opponent();

        Ok(self.is_terminal(state))
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.plies >= state.max_plies
            || Player::ALL.iter().any(|p| state.pieces(*p) == 0)
            || state.steps(state.to_move).is_empty()
    }

    fn approach_captures(
        &self,
        state: &State,
        action: &Action,
        player: Player,
    ) -> Result<Option<Vec<u8>>, RulesError> {
        self.captures(state, action, player, WinKind::Approach)
    }

    fn remote_captures(
        &self,
        state: &State,
        action: &Action,
        player: Player,
    ) -> Result<Option<Vec<u8>>, RulesError> {
        self.captures(state, action, player, WinKind::Remote)
    }

    fn with_win_kind(&self, action: &Action, kind: WinKind) -> Action {
        Action {
            win_by: Some(kind),
            ..*action
        }
    }

    fn scores(&self, state: &State) -> Scores {
        Scores::new(
            state.captured(Player::First) as f64,
            state.captured(Player::Second) as f64,
        )
    }

    fn next_player(&self, state: &State) -> Player {
        state.to_move
    }

    fn latest_mover(&self, state: &State) -> Option<Player> {
        state.last
    }
}
