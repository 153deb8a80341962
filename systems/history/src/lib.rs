#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Undo/redo history for reversible player actions.
//!
//! The history is a log of recorded intents with a cursor separating applied
//! actions from undone-but-redoable ones. Each action carries enough state
//! for the world to derive its inverse: a placement reverses into a removal
//! plus a refund, a removal reverses into a re-placement with the recorded
//! health, and an end turn reverses into a turn-counter rollback plus the
//! restoration of the lane defenses it consumed. The history itself never
//! touches world state; it only answers *what* to reverse or re-apply.

use lawn_defence_core::{DefenderKind, GridCoord};

/// Reversible player action captured by the world as it executes commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedAction {
    /// A defender was placed and its cost debited.
    Place {
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Cell that received the defender.
        cell: GridCoord,
    },
    /// A defender was dug up by the player.
    Dig {
        /// Kind of defender that was removed.
        kind: DefenderKind,
        /// Cell the defender previously occupied.
        cell: GridCoord,
        /// Health the defender had at the moment of removal.
        health: u32,
    },
    /// A full turn was advanced.
    EndTurn {
        /// Lanes whose single-use defense was consumed during the turn.
        mowed_lanes: Vec<u32>,
    },
}

/// Append-only-until-undo log of recorded actions with a position cursor.
///
/// Entries left of the cursor are applied; entries at and right of it have
/// been undone and remain redoable until a new recording truncates them.
#[derive(Clone, Debug, Default)]
pub struct History {
    actions: Vec<RecordedAction>,
    cursor: usize,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action at the cursor, discarding any redoable tail.
    pub fn record(&mut self, action: RecordedAction) {
        self.actions.truncate(self.cursor);
        self.actions.push(action);
        self.cursor = self.actions.len();
    }

    /// Steps the cursor back and yields the action the world must reverse.
    ///
    /// Returns `None` without touching the log when nothing is undoable.
    pub fn undo(&mut self) -> Option<&RecordedAction> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.actions.get(self.cursor)
    }

    /// Yields the action the world must re-apply and advances the cursor.
    ///
    /// Returns `None` without touching the log when nothing is redoable.
    pub fn redo(&mut self) -> Option<&RecordedAction> {
        let action = self.actions.get(self.cursor)?;
        self.cursor += 1;
        Some(action)
    }

    /// Reports whether at least one action is available to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Reports whether at least one undone action is available to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.actions.len()
    }

    /// Number of recorded actions, applied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Reports whether the history holds no actions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{History, RecordedAction};
    use lawn_defence_core::{DefenderKind, GridCoord};

    fn place(column: u32) -> RecordedAction {
        RecordedAction::Place {
            kind: DefenderKind::Shooter,
            cell: GridCoord::new(0, column),
        }
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn redo_without_a_preceding_undo_is_a_no_op() {
        let mut history = History::new();
        history.record(place(0));
        assert!(history.redo().is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_yields_actions_in_reverse_recording_order() {
        let mut history = History::new();
        history.record(place(0));
        history.record(place(1));

        assert_eq!(history.undo(), Some(&place(1)));
        assert_eq!(history.undo(), Some(&place(0)));
        assert!(history.undo().is_none());
    }

    #[test]
    fn redo_replays_undone_actions_in_original_order() {
        let mut history = History::new();
        history.record(place(0));
        history.record(place(1));
        let _ = history.undo();
        let _ = history.undo();

        assert_eq!(history.redo(), Some(&place(0)));
        assert_eq!(history.redo(), Some(&place(1)));
        assert!(history.redo().is_none());
    }

    #[test]
    fn recording_truncates_the_redo_tail() {
        let mut history = History::new();
        history.record(place(0));
        history.record(place(1));
        let _ = history.undo();

        history.record(place(2));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(&place(2)));
        assert_eq!(history.undo(), Some(&place(0)));
    }

    #[test]
    fn end_turn_actions_carry_their_mowed_lanes() {
        let mut history = History::new();
        history.record(RecordedAction::EndTurn {
            mowed_lanes: vec![2, 4],
        });

        match history.undo() {
            Some(RecordedAction::EndTurn { mowed_lanes }) => {
                assert_eq!(mowed_lanes, &[2, 4]);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
