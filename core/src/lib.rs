#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lawn Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems stay pure: they consume contract values and
//! produce plans or outcomes the world applies deterministically.

use serde::{Deserialize, Serialize};

/// Location of a single board cell expressed as row and column coordinates.
///
/// Rows are independent lanes; column 0 is the near edge attackers try to
/// reach, and the highest column is the far edge where they enter play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    row: u32,
    column: u32,
}

impl GridCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based lane index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Unique identifier assigned to an attacker for its lifetime on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackerId(u32);

impl AttackerId {
    /// Creates a new attacker identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Closed set of defender kinds the player can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Basic shooter that damages the front attacker in its lane each turn.
    Shooter,
    /// Economy producer that yields extra income every turn and never attacks.
    Harvester,
    /// Single-use charge that bursts its own cell and the cell ahead of it.
    Mine,
    /// Single-use charge that sweeps every attacker in its lane.
    Torch,
}

/// Attack behaviour a defender kind exhibits during the defender sub-phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackPattern {
    /// Damages only the first attacker found ahead in the lane.
    Front,
    /// Damages every attacker in the defender's cell and the cell ahead.
    Burst,
    /// Damages every attacker anywhere in the defender's lane.
    Sweep,
    /// Produces resources instead of attacking.
    Passive,
}

impl DefenderKind {
    /// Placement cost debited from the purse.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Shooter => 100,
            Self::Harvester => 50,
            Self::Mine => 25,
            Self::Torch => 125,
        }
    }

    /// Starting health of a freshly placed defender.
    #[must_use]
    pub const fn health(self) -> u32 {
        match self {
            Self::Shooter => 100,
            Self::Harvester | Self::Mine | Self::Torch => 60,
        }
    }

    /// Damage dealt per struck target. Zero for passive kinds.
    #[must_use]
    pub const fn power(self) -> u32 {
        match self {
            Self::Shooter => 10,
            Self::Harvester => 0,
            Self::Mine => 120,
            Self::Torch => 150,
        }
    }

    /// Per-turn resource yield credited during the economy step.
    #[must_use]
    pub const fn income(self) -> u32 {
        match self {
            Self::Harvester => 25,
            Self::Shooter | Self::Mine | Self::Torch => 0,
        }
    }

    /// Attack behaviour exhibited during the defender sub-phase.
    #[must_use]
    pub const fn attack_pattern(self) -> AttackPattern {
        match self {
            Self::Shooter => AttackPattern::Front,
            Self::Harvester => AttackPattern::Passive,
            Self::Mine => AttackPattern::Burst,
            Self::Torch => AttackPattern::Sweep,
        }
    }

    /// Reports whether the kind discharges after a single successful attack.
    #[must_use]
    pub const fn single_use(self) -> bool {
        matches!(self, Self::Mine | Self::Torch)
    }
}

/// Closed set of attacker kinds supplied by the level's spawn pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackerKind {
    /// Regular attacker that walks straight down its lane.
    Shambler,
    /// Durable attacker that oscillates between lanes while advancing.
    Weaver,
    /// Fast, fragile attacker that self-destructs on its first attack.
    Bomber,
}

impl AttackerKind {
    /// Starting health of a freshly spawned attacker.
    #[must_use]
    pub const fn health(self) -> u32 {
        match self {
            Self::Shambler => 100,
            Self::Weaver => 150,
            Self::Bomber => 20,
        }
    }

    /// Damage dealt to a blocking defender per attack.
    #[must_use]
    pub const fn power(self) -> u32 {
        match self {
            Self::Shambler | Self::Weaver => 10,
            Self::Bomber => 60,
        }
    }

    /// Maximum number of cells advanced toward the near edge per turn.
    #[must_use]
    pub const fn speed(self) -> u32 {
        match self {
            Self::Shambler | Self::Weaver => 1,
            Self::Bomber => 3,
        }
    }

    /// Reports whether the kind changes lanes while advancing.
    #[must_use]
    pub const fn oscillates_rows(self) -> bool {
        matches!(self, Self::Weaver)
    }

    /// Reports whether the kind dies after exactly one attack.
    #[must_use]
    pub const fn spent_after_attack(self) -> bool {
        matches!(self, Self::Bomber)
    }
}

/// Lifecycle states of a running game. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The game accepts commands and advances turns.
    #[default]
    Playing,
    /// The spawn pool emptied with no attackers left in play.
    Won,
    /// An attacker reached an undefended near edge.
    Lost,
}

impl GameState {
    /// Reports whether the state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Reasons a defender placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell already holds a defender.
    Occupied,
    /// The purse balance cannot cover the kind's cost.
    InsufficientFunds,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a defender at the provided cell.
    PlaceDefender {
        /// Kind of defender to construct.
        kind: DefenderKind,
        /// Cell that should receive the defender.
        cell: GridCoord,
    },
    /// Requests removal of the defender occupying the provided cell.
    RemoveDefender {
        /// Cell whose defender should be dug up.
        cell: GridCoord,
    },
    /// Advances the simulation by one full turn.
    EndTurn,
    /// Reverses the most recent recorded player action.
    Undo,
    /// Re-applies the most recently undone player action.
    Redo,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the contents of a single cell changed.
    CellChanged {
        /// Cell whose contents changed.
        cell: GridCoord,
    },
    /// Indicates that the whole board should be treated as stale.
    BoardRefreshed,
    /// Announces the completion of a full turn.
    TurnEnded {
        /// Number of turns elapsed since the game began.
        turn: u32,
    },
    /// Reports the purse balance after a credit or debit.
    BalanceChanged {
        /// Balance remaining in the purse.
        balance: u32,
    },
    /// Confirms that a defender was placed into the world.
    DefenderPlaced {
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Cell that received the defender.
        cell: GridCoord,
    },
    /// Confirms that a defender was removed from the world.
    DefenderRemoved {
        /// Kind of defender that was removed.
        kind: DefenderKind,
        /// Cell the defender previously occupied.
        cell: GridCoord,
    },
    /// Reports that a defender placement request was rejected.
    PlacementRejected {
        /// Kind of defender requested for placement.
        kind: DefenderKind,
        /// Cell provided in the placement request.
        cell: GridCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an attacker entered play at the far edge of a lane.
    AttackerSpawned {
        /// Identifier assigned to the new attacker.
        id: AttackerId,
        /// Kind of attacker that spawned.
        kind: AttackerKind,
        /// Cell the attacker occupies after spawning.
        cell: GridCoord,
    },
    /// Reports that a lane's single-use defense cleared its terminal cell.
    LaneDefenseUsed {
        /// Lane whose defense was consumed or restored.
        row: u32,
        /// Whether the lane still has a defense available afterwards.
        still_available: bool,
    },
    /// Announces a terminal game-state transition.
    GameEnded {
        /// Terminal state the game reached.
        state: GameState,
    },
    /// User-facing notice explaining a rejected or impossible request.
    Message {
        /// Short headline suitable for a dialog title.
        title: String,
        /// Longer explanation suitable for a dialog body.
        body: String,
    },
}

/// Remaining spawn budget for a single attacker kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCount {
    /// Kind of attacker this budget covers.
    pub kind: AttackerKind,
    /// Number of attackers of this kind yet to enter play.
    pub count: u32,
}

impl SpawnCount {
    /// Creates a new spawn budget entry.
    #[must_use]
    pub const fn new(kind: AttackerKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Immutable level descriptor supplied to the engine at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    rows: u32,
    columns: u32,
    initial_balance: u32,
    income_per_turn: u32,
    spawns: Vec<SpawnCount>,
}

impl LevelSpec {
    /// Creates a new level descriptor.
    #[must_use]
    pub fn new(
        rows: u32,
        columns: u32,
        initial_balance: u32,
        income_per_turn: u32,
        spawns: Vec<SpawnCount>,
    ) -> Self {
        Self {
            rows,
            columns,
            initial_balance,
            income_per_turn,
            spawns,
        }
    }

    /// Number of lanes on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Purse balance granted before the first turn.
    #[must_use]
    pub const fn initial_balance(&self) -> u32 {
        self.initial_balance
    }

    /// Flat income credited during every economy step.
    #[must_use]
    pub const fn income_per_turn(&self) -> u32 {
        self.income_per_turn
    }

    /// Per-kind spawn budgets that seed the spawn pool.
    #[must_use]
    pub fn spawns(&self) -> &[SpawnCount] {
        &self.spawns
    }

    /// Total number of attackers the level will ever spawn.
    #[must_use]
    pub fn total_spawns(&self) -> u32 {
        self.spawns
            .iter()
            .fold(0, |sum, entry| sum.saturating_add(entry.count))
    }
}

/// Immutable representation of a single defender's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderSnapshot {
    /// Kind of defender occupying the cell.
    pub kind: DefenderKind,
    /// Cell the defender occupies.
    pub cell: GridCoord,
    /// Remaining health of the defender.
    pub health: u32,
    /// Whether a single-use defender has already discharged.
    pub discharged: bool,
}

/// Immutable representation of a single attacker's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerSnapshot {
    /// Identifier assigned to the attacker at spawn time.
    pub id: AttackerId,
    /// Kind of the attacker.
    pub kind: AttackerKind,
    /// Cell the attacker currently occupies.
    pub cell: GridCoord,
    /// Remaining health of the attacker.
    pub health: u32,
}

/// Read-only snapshot describing all defenders in play.
#[derive(Clone, Debug, Default)]
pub struct DefenderView {
    snapshots: Vec<DefenderSnapshot>,
}

impl DefenderView {
    /// Creates a new defender view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.snapshots.iter()
    }

    /// Number of defenders captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no defenders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenderSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all attackers in play.
#[derive(Clone, Debug, Default)]
pub struct AttackerView {
    snapshots: Vec<AttackerSnapshot>,
}

impl AttackerView {
    /// Creates a new attacker view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AttackerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AttackerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of attackers captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no attackers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AttackerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AttackPattern, AttackerId, AttackerKind, AttackerSnapshot, AttackerView, DefenderKind,
        GameState, GridCoord, LevelSpec, PlacementError, SpawnCount,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(3, 6));
    }

    #[test]
    fn level_spec_round_trips_through_bincode() {
        let level = LevelSpec::new(
            5,
            9,
            200,
            25,
            vec![
                SpawnCount::new(AttackerKind::Shambler, 10),
                SpawnCount::new(AttackerKind::Weaver, 4),
            ],
        );
        assert_round_trip(&level);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientFunds);
    }

    #[test]
    fn level_spec_totals_saturate_over_entries() {
        let level = LevelSpec::new(
            1,
            1,
            0,
            0,
            vec![
                SpawnCount::new(AttackerKind::Shambler, u32::MAX),
                SpawnCount::new(AttackerKind::Bomber, 5),
            ],
        );
        assert_eq!(level.total_spawns(), u32::MAX);
    }

    #[test]
    fn single_use_kinds_match_their_patterns() {
        assert!(DefenderKind::Mine.single_use());
        assert!(DefenderKind::Torch.single_use());
        assert!(!DefenderKind::Shooter.single_use());
        assert_eq!(DefenderKind::Mine.attack_pattern(), AttackPattern::Burst);
        assert_eq!(DefenderKind::Torch.attack_pattern(), AttackPattern::Sweep);
        assert_eq!(
            DefenderKind::Harvester.attack_pattern(),
            AttackPattern::Passive
        );
    }

    #[test]
    fn passive_kinds_yield_income_and_deal_no_damage() {
        assert_eq!(DefenderKind::Harvester.power(), 0);
        assert!(DefenderKind::Harvester.income() > 0);
        assert_eq!(DefenderKind::Shooter.income(), 0);
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(!GameState::Playing.is_terminal());
        assert!(GameState::Won.is_terminal());
        assert!(GameState::Lost.is_terminal());
    }

    #[test]
    fn attacker_view_orders_snapshots_by_id() {
        let view = AttackerView::from_snapshots(vec![
            snapshot(7, 0, 3),
            snapshot(2, 1, 4),
            snapshot(5, 0, 0),
        ]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    fn snapshot(id: u32, row: u32, column: u32) -> AttackerSnapshot {
        AttackerSnapshot {
            id: AttackerId::new(id),
            kind: AttackerKind::Shambler,
            cell: GridCoord::new(row, column),
            health: AttackerKind::Shambler.health(),
        }
    }
}
