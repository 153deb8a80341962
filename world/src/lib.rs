#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lawn Defence.
//!
//! The world owns the board, the purse, the spawn pool and the action
//! history. Adapters submit [`Command`] values through [`apply`]; the world
//! executes them against its state, delegating attack arithmetic to the pure
//! combat system and spawn planning to the seedable spawning system, and
//! pushes [`Event`] values into the caller's buffer. Events are only
//! observed after `apply` returns, so listeners never see mid-phase state.
//!
//! Everything is single-threaded and turn-synchronous. Each turn phase
//! snapshots the units it iterates before mutating the board, which keeps
//! removals during a pass from corrupting the iteration.

mod board;
mod purse;

use std::collections::HashSet;

use lawn_defence_core::{
    AttackerId, AttackerKind, Command, DefenderKind, Event, GameState, GridCoord, LevelSpec,
    PlacementError, SpawnCount,
};
use lawn_defence_system_combat as combat;
use lawn_defence_system_combat::TargetHealth;
use lawn_defence_system_history::{History, RecordedAction};
use lawn_defence_system_spawning::{Config as SpawnConfig, Spawning};

use board::{Attacker, Board, Defender, MoveOutcome};
use purse::Purse;

const DEFAULT_SPAWN_SEED: u64 = 0x6c61_776e_5f64_6566;

/// Represents the authoritative Lawn Defence world state.
#[derive(Debug)]
pub struct World {
    level: LevelSpec,
    board: Board,
    purse: Purse,
    spawn_pool: Vec<SpawnCount>,
    spawning: Spawning,
    history: History,
    state: GameState,
    turn: u32,
    next_attacker_id: u32,
}

impl World {
    /// Creates a new world for the provided level using the default spawn seed.
    #[must_use]
    pub fn new(level: LevelSpec) -> Self {
        Self::with_spawn_seed(level, DEFAULT_SPAWN_SEED)
    }

    /// Creates a new world with an explicit spawn seed.
    ///
    /// Tests and replays supply a fixed seed to make the spawn step fully
    /// deterministic.
    #[must_use]
    pub fn with_spawn_seed(level: LevelSpec, spawn_seed: u64) -> Self {
        let board = Board::new(level.rows(), level.columns());
        let purse = Purse::new(level.initial_balance());
        let spawn_pool: Vec<SpawnCount> = level
            .spawns()
            .iter()
            .copied()
            .filter(|entry| entry.count > 0)
            .collect();
        log::debug!(
            "level has {} attackers across {} kinds",
            level.total_spawns(),
            spawn_pool.len()
        );
        Self {
            level,
            board,
            purse,
            spawn_pool,
            spawning: Spawning::new(SpawnConfig::new(spawn_seed)),
            history: History::new(),
            state: GameState::Playing,
            turn: 0,
            next_attacker_id: 0,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state.is_terminal() {
        push_message(
            out_events,
            "Game Over",
            "The game has already ended.".to_string(),
        );
        return;
    }

    match command {
        Command::PlaceDefender { kind, cell } => place_defender(world, kind, cell, out_events),
        Command::RemoveDefender { cell } => remove_defender(world, cell, out_events),
        Command::EndTurn => end_turn(world, out_events),
        Command::Undo => undo(world, out_events),
        Command::Redo => redo(world, out_events),
    }
}

fn place_defender(
    world: &mut World,
    kind: DefenderKind,
    cell: GridCoord,
    out_events: &mut Vec<Event>,
) {
    if !world.board.in_bounds(cell) {
        push_message(
            out_events,
            "Out of Bounds",
            format!("({}, {}) is not on the board.", cell.row(), cell.column()),
        );
        return;
    }

    if !world.purse.can_afford(kind.cost()) {
        out_events.push(Event::PlacementRejected {
            kind,
            cell,
            reason: PlacementError::InsufficientFunds,
        });
        push_message(
            out_events,
            "Not Enough Points",
            format!("You do not have enough funds for: {kind:?}"),
        );
        return;
    }

    if !world.board.place_defender(Defender::new(kind), cell) {
        out_events.push(Event::PlacementRejected {
            kind,
            cell,
            reason: PlacementError::Occupied,
        });
        push_message(
            out_events,
            "Occupied",
            format!(
                "There is already a defender at ({}, {}).",
                cell.row(),
                cell.column()
            ),
        );
        return;
    }

    let funded = world.purse.debit(kind.cost());
    debug_assert!(funded, "affordability was checked before placement");
    world.history.record(RecordedAction::Place { kind, cell });
    out_events.push(Event::DefenderPlaced { kind, cell });
    out_events.push(Event::CellChanged { cell });
    out_events.push(Event::BalanceChanged {
        balance: world.purse.balance(),
    });
}

fn remove_defender(world: &mut World, cell: GridCoord, out_events: &mut Vec<Event>) {
    let Some(defender) = world.board.remove_defender(cell) else {
        push_message(
            out_events,
            "Nothing to Remove",
            format!("No defender at ({}, {}).", cell.row(), cell.column()),
        );
        return;
    };

    world.history.record(RecordedAction::Dig {
        kind: defender.kind(),
        cell,
        health: defender.health(),
    });
    out_events.push(Event::DefenderRemoved {
        kind: defender.kind(),
        cell,
    });
    out_events.push(Event::CellChanged { cell });
}

fn end_turn(world: &mut World, out_events: &mut Vec<Event>) {
    log::debug!("processing turn {}", world.turn + 1);
    let mut mowed_lanes = Vec::new();

    defender_phase(world, out_events);
    attacker_phase(world, &mut mowed_lanes, out_events);

    if world.state == GameState::Playing {
        spawn_phase(world, out_events);
        economy_phase(world, out_events);

        if world.spawn_pool.is_empty() && world.board.attacker_count() == 0 {
            log::debug!("player has won");
            world.state = GameState::Won;
            out_events.push(Event::GameEnded {
                state: GameState::Won,
            });
        }
    }

    world.turn += 1;
    world.history.record(RecordedAction::EndTurn { mowed_lanes });
    out_events.push(Event::BoardRefreshed);
    out_events.push(Event::TurnEnded { turn: world.turn });
}

/// Every defender attacks once; discharged single-use defenders are removed
/// only after the pass so the snapshot stays coherent.
fn defender_phase(world: &mut World, out_events: &mut Vec<Event>) {
    let defenders = world.board.defenders_in_play();
    let mut discharged = Vec::new();

    for snapshot in defenders {
        let targets = gather_targets(&world.board, snapshot.kind, snapshot.cell);
        let values: Vec<TargetHealth> = targets.iter().map(|(_, target)| *target).collect();
        let outcome = combat::resolve_defender_attack(snapshot.kind, &values);

        for struck in &outcome.remaining {
            let Some(coord) = targets
                .iter()
                .find(|(_, target)| target.id == struck.id)
                .map(|(coord, _)| *coord)
            else {
                continue;
            };
            if struck.health == 0 {
                if let Some(cell) = world.board.cell_mut(coord) {
                    let _ = cell.take_attacker(struck.id);
                }
            } else if let Some(attacker) = world
                .board
                .cell_mut(coord)
                .and_then(|cell| cell.attacker_mut(struck.id))
            {
                attacker.set_health(struck.health);
            }
        }

        if outcome.discharged {
            if let Some(defender) = world.board.defender_at_mut(snapshot.cell) {
                defender.discharge();
            }
            discharged.push(snapshot.cell);
        }
    }

    for cell in discharged {
        let _ = world.board.remove_defender(cell);
        out_events.push(Event::CellChanged { cell });
    }
}

/// Gathers the targets a defender can reach, ordered by attack priority.
fn gather_targets(
    board: &Board,
    kind: DefenderKind,
    cell: GridCoord,
) -> Vec<(GridCoord, TargetHealth)> {
    use lawn_defence_core::AttackPattern;

    match kind.attack_pattern() {
        AttackPattern::Passive => Vec::new(),
        AttackPattern::Front => {
            // First-come priority: the front attacker of the nearest
            // non-empty cell between the defender and the far edge.
            for column in cell.column()..board.columns() {
                let coord = GridCoord::new(cell.row(), column);
                if let Some(front) = board.front_attacker_at(coord) {
                    return vec![(coord, TargetHealth::new(front.id(), front.health()))];
                }
            }
            Vec::new()
        }
        AttackPattern::Burst => {
            let mut targets = Vec::new();
            collect_cell_targets(board, cell, &mut targets);
            collect_cell_targets(
                board,
                GridCoord::new(cell.row(), cell.column().saturating_add(1)),
                &mut targets,
            );
            targets
        }
        AttackPattern::Sweep => {
            let mut targets = Vec::new();
            for column in 0..board.columns() {
                collect_cell_targets(board, GridCoord::new(cell.row(), column), &mut targets);
            }
            targets
        }
    }
}

fn collect_cell_targets(
    board: &Board,
    coord: GridCoord,
    out: &mut Vec<(GridCoord, TargetHealth)>,
) {
    if let Some(cell) = board.cell(coord) {
        for attacker in cell.attackers() {
            out.push((coord, TargetHealth::new(attacker.id(), attacker.health())));
        }
    }
}

/// Every attacker moves or attacks; lane-end consequences resolve after each.
fn attacker_phase(world: &mut World, mowed_lanes: &mut Vec<u32>, out_events: &mut Vec<Event>) {
    let snapshots = world.board.attackers_in_play();
    let mut remove_bin: HashSet<AttackerId> = HashSet::new();
    let mut spent: Vec<(AttackerId, GridCoord)> = Vec::new();

    for snapshot in snapshots {
        if remove_bin.contains(&snapshot.id) {
            continue;
        }

        let mut row = snapshot.cell.row();
        match world.board.advance_attacker(snapshot.id, snapshot.cell) {
            MoveOutcome::Moved { to } => {
                row = to.row();
            }
            MoveOutcome::Blocked { target } => {
                resolve_blocked_attack(world, snapshot.id, snapshot.kind, snapshot.cell, target, &mut spent);
            }
            MoveOutcome::Edge => {}
        }

        if world.board.lane_reached_end(row) {
            if world.board.lane_defense_available(row) {
                for cleared in world.board.consume_lane_defense(row) {
                    let _ = remove_bin.insert(cleared.id());
                }
                world.board.reset_lane_end_flag(row);
                mowed_lanes.push(row);
                out_events.push(Event::LaneDefenseUsed {
                    row,
                    still_available: false,
                });
            } else {
                log::debug!("attacker broke through lane {row}");
                world.state = GameState::Lost;
                out_events.push(Event::GameEnded {
                    state: GameState::Lost,
                });
                break;
            }
        }
    }

    for (id, coord) in spent {
        if !remove_bin.contains(&id) {
            if let Some(cell) = world.board.cell_mut(coord) {
                let _ = cell.take_attacker(id);
            }
        }
    }
}

fn resolve_blocked_attack(
    world: &mut World,
    id: AttackerId,
    kind: AttackerKind,
    at: GridCoord,
    target: GridCoord,
    spent: &mut Vec<(AttackerId, GridCoord)>,
) {
    let Some(defender) = world.board.defender_at(target) else {
        return;
    };
    let outcome = combat::resolve_attacker_attack(kind, defender.health());
    if outcome.defender_slain {
        let _ = world.board.remove_defender(target);
    } else if let Some(defender) = world.board.defender_at_mut(target) {
        defender.set_health(outcome.defender_health);
    }
    if outcome.attacker_spent {
        spent.push((id, at));
    }
}

fn spawn_phase(world: &mut World, out_events: &mut Vec<Event>) {
    let rows = world.board.rows();
    let orders = world.spawning.plan(&world.spawn_pool, rows);
    if orders.is_empty() {
        return;
    }
    log::debug!("spawning {} attackers", orders.len());

    let far_edge = world.board.columns().saturating_sub(1);
    for order in orders {
        decrement_pool(&mut world.spawn_pool, order.kind);
        let id = AttackerId::new(world.next_attacker_id);
        world.next_attacker_id += 1;
        let cell = GridCoord::new(order.row, far_edge);
        let _ = world.board.place_attacker(Attacker::new(id, order.kind), cell);
        out_events.push(Event::AttackerSpawned {
            id,
            kind: order.kind,
            cell,
        });
    }
    world.spawn_pool.retain(|entry| entry.count > 0);
}

fn decrement_pool(pool: &mut [SpawnCount], kind: AttackerKind) {
    if let Some(entry) = pool.iter_mut().find(|entry| entry.kind == kind) {
        entry.count = entry.count.saturating_sub(1);
    }
}

fn economy_phase(world: &mut World, out_events: &mut Vec<Event>) {
    let mut income = world.level.income_per_turn();
    for snapshot in world.board.defenders_in_play() {
        income = income.saturating_add(snapshot.kind.income());
    }
    world.purse.credit(income);
    out_events.push(Event::BalanceChanged {
        balance: world.purse.balance(),
    });
}

fn undo(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(action) = world.history.undo().cloned() else {
        push_message(
            out_events,
            "Cannot Undo",
            "No more moves to undo.".to_string(),
        );
        return;
    };

    match action {
        RecordedAction::Place { kind, cell } => {
            let _ = world.board.remove_defender(cell);
            world.purse.credit(kind.cost());
            out_events.push(Event::CellChanged { cell });
            out_events.push(Event::BalanceChanged {
                balance: world.purse.balance(),
            });
        }
        RecordedAction::Dig { kind, cell, health } => {
            let _ = world
                .board
                .place_defender(Defender::with_health(kind, health), cell);
            out_events.push(Event::CellChanged { cell });
        }
        RecordedAction::EndTurn { mowed_lanes } => {
            world.turn = world.turn.saturating_sub(1);
            for row in mowed_lanes {
                world.board.restore_lane_defense(row);
                out_events.push(Event::LaneDefenseUsed {
                    row,
                    still_available: true,
                });
            }
            out_events.push(Event::BoardRefreshed);
        }
    }
}

fn redo(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(action) = world.history.redo().cloned() else {
        push_message(
            out_events,
            "Cannot Redo",
            "No more moves to redo.".to_string(),
        );
        return;
    };

    match action {
        RecordedAction::Place { kind, cell } => {
            let funded = world.purse.debit(kind.cost());
            debug_assert!(funded, "undo restored the funds this redo spends");
            let _ = world.board.place_defender(Defender::new(kind), cell);
            out_events.push(Event::DefenderPlaced { kind, cell });
            out_events.push(Event::CellChanged { cell });
            out_events.push(Event::BalanceChanged {
                balance: world.purse.balance(),
            });
        }
        RecordedAction::Dig { kind, cell, .. } => {
            let _ = world.board.remove_defender(cell);
            out_events.push(Event::DefenderRemoved { kind, cell });
            out_events.push(Event::CellChanged { cell });
        }
        RecordedAction::EndTurn { mowed_lanes } => {
            world.turn += 1;
            for row in mowed_lanes {
                world.board.mark_lane_defense_used(row);
                out_events.push(Event::LaneDefenseUsed {
                    row,
                    still_available: false,
                });
            }
            out_events.push(Event::BoardRefreshed);
        }
    }
}

fn push_message(out_events: &mut Vec<Event>, title: &str, body: String) {
    out_events.push(Event::Message {
        title: title.to_string(),
        body,
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use lawn_defence_core::{
        AttackerKind, AttackerView, DefenderView, GameState, GridCoord, LevelSpec,
    };

    /// Current lifecycle state of the game.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Number of turns elapsed since the game began.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Current purse balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.purse.balance()
    }

    /// The immutable level descriptor the game was constructed from.
    #[must_use]
    pub fn level(world: &World) -> &LevelSpec {
        &world.level
    }

    /// Captures a read-only view of every defender in play.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        DefenderView::from_snapshots(world.board.defenders_in_play())
    }

    /// Captures a read-only view of every attacker in play.
    #[must_use]
    pub fn attacker_view(world: &World) -> AttackerView {
        AttackerView::from_snapshots(world.board.attackers_in_play())
    }

    /// Total number of attackers yet to spawn from the pool.
    #[must_use]
    pub fn remaining_spawns(world: &World) -> u32 {
        world
            .spawn_pool
            .iter()
            .fold(0, |sum, entry| sum.saturating_add(entry.count))
    }

    /// Number of attackers of the provided kind queued in a single cell.
    ///
    /// Served from the cell's census index rather than a queue scan.
    #[must_use]
    pub fn attackers_of_kind_at(world: &World, cell: GridCoord, kind: AttackerKind) -> u32 {
        world
            .board
            .cell(cell)
            .map_or(0, |slot| slot.census_count(kind))
    }

    /// Reports whether the lane's single-use defense is still available.
    #[must_use]
    pub fn lane_defense_available(world: &World, row: u32) -> bool {
        world.board.lane_defense_available(row)
    }

    /// Reports whether an attacker currently holds the lane's terminal cell flag.
    #[must_use]
    pub fn lane_reached_end(world: &World, row: u32) -> bool {
        world.board.lane_reached_end(row)
    }

    /// Reports whether at least one player action can be undone.
    #[must_use]
    pub fn can_undo(world: &World) -> bool {
        world.history.can_undo()
    }

    /// Reports whether at least one undone action can be redone.
    #[must_use]
    pub fn can_redo(world: &World) -> bool {
        world.history.can_redo()
    }
}
