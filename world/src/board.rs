//! Spatial board model: cells, unit storage, and attacker movement.

use std::collections::{HashMap, VecDeque};

use lawn_defence_core::{
    AttackerId, AttackerKind, AttackerSnapshot, DefenderKind, DefenderSnapshot, GridCoord,
};

/// A stationary unit occupying exactly one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Defender {
    kind: DefenderKind,
    health: u32,
    discharged: bool,
}

impl Defender {
    pub(crate) fn new(kind: DefenderKind) -> Self {
        Self {
            kind,
            health: kind.health(),
            discharged: false,
        }
    }

    /// Rebuilds a defender with recorded health, used when an undo re-places it.
    pub(crate) fn with_health(kind: DefenderKind, health: u32) -> Self {
        Self {
            kind,
            health,
            discharged: false,
        }
    }

    pub(crate) fn kind(&self) -> DefenderKind {
        self.kind
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn discharged(&self) -> bool {
        self.discharged
    }

    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health;
    }

    pub(crate) fn discharge(&mut self) {
        self.discharged = true;
    }
}

/// A mobile hostile unit advancing toward the near edge of its lane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Attacker {
    id: AttackerId,
    kind: AttackerKind,
    health: u32,
    ascending: bool,
}

impl Attacker {
    pub(crate) fn new(id: AttackerId, kind: AttackerKind) -> Self {
        Self {
            id,
            kind,
            health: kind.health(),
            // Row-oscillating kinds start by moving toward higher rows.
            ascending: true,
        }
    }

    pub(crate) fn id(&self) -> AttackerId {
        self.id
    }

    pub(crate) fn kind(&self) -> AttackerKind {
        self.kind
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health;
    }

    /// Resolves the row this attacker occupies after its next relocation.
    ///
    /// Non-oscillating kinds stay in their lane. Oscillating kinds bounce
    /// between row 0 and the last row, reversing direction exactly at the
    /// two boundaries; a board with fewer than two rows leaves the row
    /// unchanged.
    pub(crate) fn next_row(&mut self, row: u32, rows: u32) -> u32 {
        if !self.kind.oscillates_rows() || rows < 2 {
            return row;
        }
        if row >= rows - 1 {
            self.ascending = false;
            rows - 2
        } else if row == 0 {
            self.ascending = true;
            1
        } else if self.ascending {
            row + 1
        } else {
            row - 1
        }
    }
}

/// One grid location holding at most one defender and a queue of attackers.
///
/// The queue preserves arrival order, which doubles as attack priority for
/// front-target defenders. The census map tracks live counts per attacker
/// kind; it is maintained incrementally on push/pop and rebuilt outright on
/// any non-incremental mutation so the two can never drift apart.
#[derive(Clone, Debug, Default)]
pub(crate) struct Cell {
    defender: Option<Defender>,
    attackers: VecDeque<Attacker>,
    census: HashMap<AttackerKind, u32>,
}

impl Cell {
    /// Installs a defender unless one is already present. No eviction.
    pub(crate) fn set_defender(&mut self, defender: Defender) -> bool {
        if self.defender.is_some() {
            return false;
        }
        self.defender = Some(defender);
        true
    }

    pub(crate) fn clear_defender(&mut self) -> Option<Defender> {
        self.defender.take()
    }

    pub(crate) fn defender(&self) -> Option<&Defender> {
        self.defender.as_ref()
    }

    pub(crate) fn defender_mut(&mut self) -> Option<&mut Defender> {
        self.defender.as_mut()
    }

    pub(crate) fn is_occupied(&self) -> bool {
        self.defender.is_some()
    }

    /// Enqueues an attacker behind every attacker already present.
    pub(crate) fn add_attacker(&mut self, attacker: Attacker) {
        *self.census.entry(attacker.kind()).or_insert(0) += 1;
        self.attackers.push_back(attacker);
    }

    pub(crate) fn peek_front_attacker(&self) -> Option<&Attacker> {
        self.attackers.front()
    }

    /// Dequeues the attacker that arrived first, if any.
    pub(crate) fn remove_front_attacker(&mut self) -> Option<Attacker> {
        let attacker = self.attackers.pop_front()?;
        match self.census.get_mut(&attacker.kind()) {
            Some(count) if *count > 1 => *count -= 1,
            _ => {
                let _ = self.census.remove(&attacker.kind());
            }
        }
        Some(attacker)
    }

    /// Removes a specific attacker regardless of queue position.
    ///
    /// Front removal stays on the incremental census path; mid-queue removal
    /// is non-incremental, so the census is rebuilt from the surviving queue.
    pub(crate) fn take_attacker(&mut self, id: AttackerId) -> Option<Attacker> {
        if self.attackers.front().map(Attacker::id) == Some(id) {
            return self.remove_front_attacker();
        }
        let position = self
            .attackers
            .iter()
            .position(|attacker| attacker.id() == id)?;
        let attacker = self.attackers.remove(position)?;
        self.rebuild_census();
        Some(attacker)
    }

    /// Removes and returns every attacker in the cell.
    pub(crate) fn drain_attackers(&mut self) -> Vec<Attacker> {
        self.census.clear();
        self.attackers.drain(..).collect()
    }

    pub(crate) fn attacker_count(&self) -> usize {
        self.attackers.len()
    }

    /// Live count of the provided kind according to the census index.
    pub(crate) fn census_count(&self, kind: AttackerKind) -> u32 {
        self.census.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn attackers(&self) -> impl Iterator<Item = &Attacker> {
        self.attackers.iter()
    }

    pub(crate) fn attacker_mut(&mut self, id: AttackerId) -> Option<&mut Attacker> {
        self.attackers
            .iter_mut()
            .find(|attacker| attacker.id() == id)
    }

    fn rebuild_census(&mut self) {
        self.census.clear();
        for attacker in &self.attackers {
            *self.census.entry(attacker.kind()).or_insert(0) += 1;
        }
    }
}

/// Result of a single attacker relocation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    /// The attacker relocated to the provided cell.
    Moved {
        /// Destination the attacker now occupies.
        to: GridCoord,
    },
    /// Movement failed; the attacker must attack the defender at `target`.
    Blocked {
        /// Cell containing the blocking defender.
        target: GridCoord,
    },
    /// No relocation is possible and there is nothing to attack.
    Edge,
}

/// Rectangular array of cells with per-lane defense and end-flag bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
    mowers: Vec<bool>,
    reached_end: Vec<bool>,
}

impl Board {
    pub(crate) fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let lanes = usize::try_from(rows).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![Cell::default(); capacity],
            mowers: vec![true; lanes],
            reached_end: vec![false; lanes],
        }
    }

    pub(crate) fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn coord_of(&self, index: usize) -> GridCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        GridCoord::new((index / width) as u32, (index % width) as u32)
    }

    pub(crate) fn cell(&self, cell: GridCoord) -> Option<&Cell> {
        let index = self.index(cell)?;
        self.cells.get(index)
    }

    pub(crate) fn cell_mut(&mut self, cell: GridCoord) -> Option<&mut Cell> {
        let index = self.index(cell)?;
        self.cells.get_mut(index)
    }

    /// Places a defender, failing on an occupied or out-of-bounds cell.
    pub(crate) fn place_defender(&mut self, defender: Defender, cell: GridCoord) -> bool {
        match self.cell_mut(cell) {
            Some(slot) => slot.set_defender(defender),
            None => false,
        }
    }

    pub(crate) fn remove_defender(&mut self, cell: GridCoord) -> Option<Defender> {
        self.cell_mut(cell)?.clear_defender()
    }

    pub(crate) fn defender_at(&self, cell: GridCoord) -> Option<&Defender> {
        self.cell(cell)?.defender()
    }

    pub(crate) fn defender_at_mut(&mut self, cell: GridCoord) -> Option<&mut Defender> {
        self.cell_mut(cell)?.defender_mut()
    }

    /// Enqueues an attacker, flagging the lane end when it enters column 0.
    pub(crate) fn place_attacker(&mut self, attacker: Attacker, cell: GridCoord) -> bool {
        let row = cell.row();
        let column = cell.column();
        match self.cell_mut(cell) {
            Some(slot) => {
                slot.add_attacker(attacker);
                if column == 0 {
                    self.flag_lane_end(row);
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn front_attacker_at(&self, cell: GridCoord) -> Option<&Attacker> {
        self.cell(cell)?.peek_front_attacker()
    }

    /// Captures a snapshot of every defender in play, ordered by cell.
    pub(crate) fn defenders_in_play(&self) -> Vec<DefenderSnapshot> {
        let mut snapshots = Vec::new();
        for (index, cell) in self.cells.iter().enumerate() {
            if let Some(defender) = cell.defender() {
                snapshots.push(DefenderSnapshot {
                    kind: defender.kind(),
                    cell: self.coord_of(index),
                    health: defender.health(),
                    discharged: defender.discharged(),
                });
            }
        }
        snapshots
    }

    /// Captures a snapshot of every attacker in play.
    pub(crate) fn attackers_in_play(&self) -> Vec<AttackerSnapshot> {
        let mut snapshots = Vec::new();
        for (index, cell) in self.cells.iter().enumerate() {
            let coord = self.coord_of(index);
            for attacker in cell.attackers() {
                snapshots.push(AttackerSnapshot {
                    id: attacker.id(),
                    kind: attacker.kind(),
                    cell: coord,
                    health: attacker.health(),
                });
            }
        }
        snapshots
    }

    /// Total number of live attackers on the board.
    pub(crate) fn attacker_count(&self) -> usize {
        self.cells.iter().map(Cell::attacker_count).sum()
    }

    pub(crate) fn lane_reached_end(&self, row: u32) -> bool {
        usize::try_from(row)
            .ok()
            .and_then(|lane| self.reached_end.get(lane).copied())
            .unwrap_or(false)
    }

    pub(crate) fn reset_lane_end_flag(&mut self, row: u32) {
        if let Ok(lane) = usize::try_from(row) {
            if let Some(flag) = self.reached_end.get_mut(lane) {
                *flag = false;
            }
        }
    }

    fn flag_lane_end(&mut self, row: u32) {
        if let Ok(lane) = usize::try_from(row) {
            if let Some(flag) = self.reached_end.get_mut(lane) {
                *flag = true;
            }
        }
    }

    pub(crate) fn lane_defense_available(&self, row: u32) -> bool {
        usize::try_from(row)
            .ok()
            .and_then(|lane| self.mowers.get(lane).copied())
            .unwrap_or(false)
    }

    /// Spends the lane's defense and drains every attacker in its terminal cell.
    pub(crate) fn consume_lane_defense(&mut self, row: u32) -> Vec<Attacker> {
        if !self.lane_defense_available(row) {
            return Vec::new();
        }
        self.mark_lane_defense_used(row);
        match self.cell_mut(GridCoord::new(row, 0)) {
            Some(cell) => cell.drain_attackers(),
            None => Vec::new(),
        }
    }

    /// Marks the lane's defense as spent without clearing any attackers.
    pub(crate) fn mark_lane_defense_used(&mut self, row: u32) {
        if let Ok(lane) = usize::try_from(row) {
            if let Some(mower) = self.mowers.get_mut(lane) {
                *mower = false;
            }
        }
    }

    /// Returns a spent lane defense to service, used when an end turn is undone.
    pub(crate) fn restore_lane_defense(&mut self, row: u32) {
        if let Ok(lane) = usize::try_from(row) {
            if let Some(mower) = self.mowers.get_mut(lane) {
                *mower = true;
            }
        }
    }

    /// Attempts to relocate the attacker occupying `from` by up to its speed.
    ///
    /// Row change and column advance commit as one atomic relocation: the
    /// destination row is resolved first (oscillating kinds bounce between
    /// the boundary lanes), then the attacker advances through unobstructed
    /// cells of that row, stopping immediately before any defender and at
    /// the board edge. Zero traversable cells is a movement failure and the
    /// caller must resolve an attack against the reported blocker instead.
    pub(crate) fn advance_attacker(&mut self, id: AttackerId, from: GridCoord) -> MoveOutcome {
        let row = from.row();
        let column = from.column();

        // A defender sharing the cell blocks before any path is considered.
        if self.cell(from).is_some_and(Cell::is_occupied) {
            return MoveOutcome::Blocked { target: from };
        }

        let rows = self.rows;
        let (speed, dest_row) = match self.cell_mut(from).and_then(|cell| cell.attacker_mut(id)) {
            Some(attacker) => (attacker.kind().speed(), attacker.next_row(row, rows)),
            None => return MoveOutcome::Edge,
        };

        let lateral = GridCoord::new(dest_row, column);
        if dest_row != row && self.cell(lateral).is_some_and(Cell::is_occupied) {
            return MoveOutcome::Blocked { target: lateral };
        }

        let mut steps = 0;
        for offset in 1..=speed {
            let Some(next_column) = column.checked_sub(offset) else {
                break;
            };
            let candidate = GridCoord::new(dest_row, next_column);
            if self.cell(candidate).is_some_and(Cell::is_occupied) {
                break;
            }
            steps = offset;
        }

        if steps == 0 {
            if column == 0 {
                return MoveOutcome::Edge;
            }
            if dest_row == row {
                return MoveOutcome::Blocked {
                    target: GridCoord::new(row, column - 1),
                };
            }
            // Row change alone is still a relocation for oscillating kinds.
            return self.relocate(id, from, lateral);
        }

        self.relocate(id, from, GridCoord::new(dest_row, column - steps))
    }

    fn relocate(&mut self, id: AttackerId, from: GridCoord, to: GridCoord) -> MoveOutcome {
        let Some(attacker) = self.cell_mut(from).and_then(|cell| cell.take_attacker(id)) else {
            return MoveOutcome::Edge;
        };
        let _ = self.place_attacker(attacker, to);
        MoveOutcome::Moved { to }
    }
}
