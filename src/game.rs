//! Game state: arena, falling piece, score, fall timer.

use crate::arena::{Arena, Sweep, collide, merge};
use crate::matrix::{Cell, Matrix, rotate};
use crate::piece::{PieceKind, create_piece};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Default time between automatic one-row drops.
pub const DEFAULT_DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// Offset of a piece grid's local (0, 0) in arena coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// The falling piece and the running score.
#[derive(Debug, Clone)]
pub struct Player {
    pub matrix: Matrix,
    pub pos: Position,
    pub score: u32,
}

/// What a drop step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Piece moved down one row.
    Fell,
    /// Piece could not descend: it was merged, the next piece spawned and rows swept.
    Locked(Sweep),
}

/// One paint instruction for the renderer, in arena cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCommand {
    Clear,
    Fill { x: i32, y: i32, color: Cell },
    /// Score changed since the last frame.
    Score(u32),
}

#[derive(Debug)]
pub struct GameState {
    pub arena: Arena,
    pub player: Player,
    drop_counter: Duration,
    drop_interval: Duration,
    last_time: Duration,
    score_dirty: bool,
    /// Rows cleared since the renderer last asked; drives the clear flash.
    pending_clears: u32,
    rng: StdRng,
}

impl GameState {
    /// Fresh 12x20 arena with a randomly chosen first piece.
    pub fn new(config: &crate::GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_arena(Arena::default(), config.drop_interval, rng)
    }

    pub fn with_arena(arena: Arena, drop_interval: Duration, rng: StdRng) -> Self {
        let mut state = Self {
            arena,
            player: Player {
                matrix: create_piece(PieceKind::T),
                pos: Position::default(),
                score: 0,
            },
            drop_counter: Duration::ZERO,
            drop_interval,
            last_time: Duration::ZERO,
            score_dirty: true,
            pending_clears: 0,
            rng,
        };
        state.player_reset();
        state
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    fn collides(&self) -> bool {
        collide(&self.arena, &self.player.matrix, self.player.pos)
    }

    /// Shift horizontally by `dir`; reverted if the new spot collides.
    pub fn player_move(&mut self, dir: i32) -> bool {
        self.player.pos.x += dir;
        if self.collides() {
            self.player.pos.x -= dir;
            return false;
        }
        true
    }

    /// Move down one row, locking the piece if it cannot descend. Resets the fall timer.
    pub fn player_drop(&mut self) -> DropOutcome {
        self.player.pos.y += 1;
        let outcome = if self.collides() {
            self.player.pos.y -= 1;
            merge(&mut self.arena, &self.player.matrix, self.player.pos);
            debug!(
                "piece locked at ({}, {})",
                self.player.pos.x, self.player.pos.y
            );
            self.player_reset();
            let sweep = self.arena_sweep();
            self.score_dirty = true;
            DropOutcome::Locked(sweep)
        } else {
            DropOutcome::Fell
        };
        self.drop_counter = Duration::ZERO;
        outcome
    }

    /// Spawn a uniformly random piece at the top centre.
    pub fn player_reset(&mut self) {
        let kind = PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())];
        self.spawn(kind);
    }

    /// Spawn `kind` at the top centre; if it collides there the arena is full
    /// and the game restarts with an empty arena and zero score.
    pub fn spawn(&mut self, kind: PieceKind) {
        self.player.matrix = create_piece(kind);
        self.player.pos = Position {
            x: (self.arena.width() / 2) as i32 - (self.player.matrix.width() / 2) as i32,
            y: 0,
        };
        if self.collides() {
            info!(
                "arena full at spawn, restarting (final score {})",
                self.player.score
            );
            self.arena.clear();
            self.player.score = 0;
            self.score_dirty = true;
        }
    }

    /// Rotate with a bounded wall-kick search over x+1, x-1, x+2, ... Returns
    /// false when every kick collides, in which case rotation and x are rolled back.
    pub fn player_rotate(&mut self, dir: i32) -> bool {
        let start_x = self.player.pos.x;
        let mut kick: i32 = 1;
        rotate(&mut self.player.matrix, dir);
        let width = self.player.matrix.width() as i32;
        while self.collides() {
            self.player.pos.x += kick;
            kick = -(kick + kick.signum());
            // The spot just moved to is abandoned untested once the next kick is too wide.
            if kick > width {
                rotate(&mut self.player.matrix, -dir);
                self.player.pos.x = start_x;
                return false;
            }
        }
        true
    }

    /// Clear complete rows and add their points to the score. `points` of the
    /// result is the score delta.
    pub fn arena_sweep(&mut self) -> Sweep {
        let sweep = self.arena.sweep();
        if sweep.rows_cleared > 0 {
            self.player.score += sweep.points;
            self.pending_clears += sweep.rows_cleared;
            self.score_dirty = true;
            info!(
                "cleared {} row(s) for {} points, score {}",
                sweep.rows_cleared, sweep.points, self.player.score
            );
        }
        sweep
    }

    /// Rows cleared since the last call.
    pub fn take_cleared_rows(&mut self) -> u32 {
        std::mem::take(&mut self.pending_clears)
    }

    /// Scheduler entry point: `timestamp` is monotonically increasing time since start.
    pub fn update(&mut self, timestamp: Duration) -> Vec<RenderCommand> {
        let delta = timestamp.saturating_sub(self.last_time);
        self.last_time = timestamp;
        self.tick(delta)
    }

    /// Advance the fall timer by `delta` and return the frame to paint.
    pub fn tick(&mut self, delta: Duration) -> Vec<RenderCommand> {
        self.drop_counter += delta;
        if self.drop_counter > self.drop_interval {
            self.player_drop();
        }
        self.render_commands()
    }

    fn render_commands(&mut self) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(1 + self.arena.width() * self.arena.height());
        commands.push(RenderCommand::Clear);
        commands.extend(
            self.arena
                .grid()
                .cells()
                .map(|(x, y, color)| RenderCommand::Fill { x, y, color }),
        );
        let pos = self.player.pos;
        commands.extend(self.player.matrix.cells().map(|(x, y, color)| RenderCommand::Fill {
            x: pos.x + x,
            y: pos.y + y,
            color,
        }));
        if std::mem::take(&mut self.score_dirty) {
            commands.push(RenderCommand::Score(self.player.score));
        }
        commands
    }
}
