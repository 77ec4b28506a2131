use std::collections::VecDeque;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Everything a renderer needs to draw the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    mine_generated: bool,
    status: GameStatus,
    start_time: Option<u64>,
    end_time: Option<u64>,
}

impl GameState {
    fn fresh(config: &GameConfig) -> Self {
        Self {
            board: Board::new(config.width, config.height),
            mine_generated: false,
            status: GameStatus::Ready,
            start_time: None,
            end_time: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mine_generated(&self) -> bool {
        self.mine_generated
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Milliseconds since the Unix epoch at the first reveal.
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    /// Milliseconds since the Unix epoch when the game was won or lost.
    pub fn end_time(&self) -> Option<u64> {
        self.end_time
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// A single game session. Mines are laid out by `G` on the first reveal.
#[derive(Clone, Debug)]
pub struct Minesweeper<G = RandomMineGenerator> {
    config: GameConfig,
    state: GameState,
    generator: G,
}

impl Minesweeper<RandomMineGenerator> {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::from_entropy())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }
}

impl<G: MineGenerator> Minesweeper<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: GameState::fresh(&config),
            config,
            generator,
        })
    }

    /// Replaces the whole game with a fresh board for `config`.
    pub fn init(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        log::debug!(
            "New {}x{} game with {} mines",
            config.width,
            config.height,
            config.mines
        );
        self.config = config;
        self.state = GameState::fresh(&config);
        Ok(())
    }

    /// Starts over with the current configuration.
    pub fn restart(&mut self) {
        self.state = GameState::fresh(&self.config);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_finished(&self) -> bool {
        self.state.status.is_finished()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Milliseconds played so far, frozen once the game ends; 0 before the first reveal.
    pub fn elapsed_millis(&self) -> u64 {
        match self.state.start_time {
            Some(start) => self
                .state
                .end_time
                .unwrap_or_else(now_millis)
                .saturating_sub(start),
            None => 0,
        }
    }

    /// How many mines have not been flagged yet, negative with too many flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mines) - i64::from(self.state.board.flag_count())
    }

    pub fn at(&self, coords: Coord) -> Result<usize> {
        self.state.board.at(coords)
    }

    pub fn resolve_position(&self, index: usize) -> Result<Coord> {
        self.state.board.resolve_position(index)
    }

    pub fn cell(&self, coords: Coord) -> Result<&Cell> {
        self.state.board.cell(coords)
    }

    pub fn neighbors(&self, coords: Coord) -> Result<SmallVec<[&Cell; 8]>> {
        self.state.board.neighbor_cells(coords)
    }

    /// Lays out the mines with `trigger` as the first revealed cell and computes adjacency,
    /// then starts the game.
    ///
    /// Does nothing once mines exist.
    pub fn generate_mines(&mut self, trigger: Coord) -> Result<()> {
        let trigger = self.state.board.validate_coords(trigger)?;
        if self.state.mine_generated {
            return Ok(());
        }

        let mut board = self.state.board.clone();
        self.generator
            .place_mines(&mut board, self.config.mines, trigger)?;
        board.update_numbers();

        let placed = board.mine_count();
        if placed != self.config.mines {
            log::warn!(
                "Generated mine count mismatch, actual: {}, requested: {}",
                placed,
                self.config.mines
            );
        }

        self.state.board = board;
        self.state.mine_generated = true;
        self.mark_started();
        Ok(())
    }

    /// Reveals one cell, placing mines first if this is the opening move.
    pub fn reveal_cell(&mut self, coords: Coord) -> Result<RevealOutcome> {
        let coords = self.state.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.state.board[coords];
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        self.generate_mines(coords)?;
        self.mark_started();

        self.state.board.reveal(coords);
        let cell = self.state.board[coords];
        log::debug!(
            "Reveal cell at {}, mine: {}, adjacent: {}",
            coords,
            cell.is_mine(),
            cell.adjacent_mines()
        );

        if cell.is_mine() {
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }
        if cell.adjacent_mines() == 0 {
            self.flood_from(coords);
        }
        Ok(self.settle(RevealOutcome::Revealed))
    }

    /// Opens the zero region around `coords`, flagged cells stay closed.
    pub fn expand_zero(&mut self, coords: Coord) -> Result<RevealOutcome> {
        let coords = self.state.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.state.mine_generated {
            return Ok(RevealOutcome::NoChange);
        }

        if self.flood_from(coords) {
            Ok(self.settle(RevealOutcome::Revealed))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    /// Chords on a revealed number.
    ///
    /// When the flags around it match its count, every other hidden neighbor is revealed. When
    /// the hidden neighbors are exactly the missing mines, they get flagged. Both checks use the
    /// neighborhood as it was before either ran.
    pub fn auto_expand(&mut self, coords: Coord) -> Result<ChordOutcome> {
        let coords = self.state.board.validate_coords(coords)?;
        let mut outcome = ChordOutcome::default();

        if !matches!(self.state.status, GameStatus::Playing) {
            return Ok(outcome);
        }

        let cell = self.state.board[coords];
        if cell.is_flagged() || !cell.is_revealed() {
            return Ok(outcome);
        }

        let neighbors: SmallVec<[Coord; 8]> = self.state.board.iter_neighbors(coords).collect();
        let (flags, not_revealed) = neighbors
            .iter()
            .fold((0u8, 0u8), |(flags, not_revealed), &pos| {
                let neighbor = &self.state.board[pos];
                if neighbor.is_flagged() {
                    (flags + 1, not_revealed)
                } else if !neighbor.is_revealed() {
                    (flags, not_revealed + 1)
                } else {
                    (flags, not_revealed)
                }
            });
        let adjacent = cell.adjacent_mines();
        log::trace!(
            "Chord at {}: adjacent {}, flags {}, hidden {}",
            coords,
            adjacent,
            flags,
            not_revealed
        );

        if flags == adjacent {
            for &pos in &neighbors {
                if !self.state.board[pos].is_hidden() {
                    continue;
                }
                self.state.board.reveal(pos);
                outcome.revealed = outcome.revealed | RevealOutcome::Revealed;
                self.flood_from(pos);
                if self.state.board[pos].is_mine() {
                    self.end_game(false);
                    outcome.revealed = outcome.revealed | RevealOutcome::HitMine;
                }
            }
        }

        if adjacent.checked_sub(flags) == Some(not_revealed) {
            for &pos in &neighbors {
                if self.state.board[pos].is_hidden() && self.state.board.set_flag(pos, true) {
                    outcome.flagged = MarkOutcome::Changed;
                }
            }
        }

        if outcome.revealed.has_update() {
            outcome.revealed = self.settle(outcome.revealed);
        }
        Ok(outcome)
    }

    /// Flags or unflags a hidden cell.
    pub fn toggle_flag(&mut self, coords: Coord) -> Result<MarkOutcome> {
        let coords = self.state.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let flagged = !self.state.board[coords].is_flagged();
        Ok(if self.state.board.set_flag(coords, flagged) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    /// Reveals every mine, returning how many were newly shown.
    pub fn show_all_mines(&mut self) -> CellCount {
        self.state.board.show_all_mines()
    }

    /// Worklist flood fill, returns whether any cell was revealed.
    ///
    /// Expansion continues through flagged cells without revealing them.
    fn flood_from(&mut self, start: Coord) -> bool {
        let board = &mut self.state.board;
        let mut revealed_any = false;
        let mut visited = HashSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let cell = board[visit_coords];
            if cell.is_mine() || cell.adjacent_mines() != 0 {
                continue;
            }

            for pos in board.iter_neighbors(visit_coords) {
                if board[pos].is_revealed() {
                    continue;
                }
                if !board[pos].is_flagged() {
                    board.reveal(pos);
                    revealed_any = true;
                    log::trace!("Flood opened cell at {}", pos);
                }
                if !visited.contains(&pos) {
                    to_visit.push_back(pos);
                }
            }
        }

        revealed_any
    }

    /// Ends the game as won when nothing safe is left hidden.
    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if outcome == RevealOutcome::HitMine || self.state.status != GameStatus::Playing {
            return outcome;
        }
        if self.state.mine_generated && self.state.board.all_safe_revealed() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn mark_started(&mut self) {
        if self.state.status.is_ready() {
            let now = now_millis();
            log::debug!("started at {}", now);
            self.state.start_time = Some(now);
            self.state.status = GameStatus::Playing;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.status != GameStatus::Playing {
            return;
        }

        self.state.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        let now = now_millis();
        self.state.end_time = Some(now);
        log::debug!("{:?} at {}", self.state.status, now);

        if !won {
            let shown = self.state.board.show_all_mines();
            log::trace!("Showing {} mines", shown);
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
