#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat resolution for Lawn Defence.
//!
//! The resolver is stateless given its participants: the world gathers the
//! targets a defender can reach according to its attack pattern, hands their
//! healths over as plain values, and applies the returned outcome to the
//! board. Damage is saturating subtraction; a health of zero is dead,
//! evaluated after every damage application and never before.

use lawn_defence_core::{AttackPattern, AttackerId, AttackerKind, DefenderKind};

/// Health of a single prospective target, identified for outcome reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetHealth {
    /// Identifier of the attacker under fire.
    pub id: AttackerId,
    /// Health of the attacker before the strike.
    pub health: u32,
}

impl TargetHealth {
    /// Creates a new target descriptor.
    #[must_use]
    pub const fn new(id: AttackerId, health: u32) -> Self {
        Self { id, health }
    }
}

/// Outcome of one defender attack step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefenderStrike {
    /// Post-strike health of every target that was actually damaged.
    pub remaining: Vec<TargetHealth>,
    /// Targets whose health reached zero during this strike.
    pub slain: Vec<AttackerId>,
    /// Whether a single-use defender discharged and must be retired.
    pub discharged: bool,
}

/// Outcome of one attacker attack against a blocking defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerStrike {
    /// Health of the defender after the blow.
    pub defender_health: u32,
    /// Whether the defender died from the blow.
    pub defender_slain: bool,
    /// Whether the attacker spent itself and must be removed.
    pub attacker_spent: bool,
}

/// Applies one defender attack step to the provided targets.
///
/// `targets` must be ordered by attack priority: for the front pattern only
/// the first entry is struck, while burst and sweep patterns strike every
/// entry. Passive kinds strike nothing. A single-use kind reports
/// `discharged` only when it damaged at least one target, so an armed charge
/// with nothing in range stays on the board.
#[must_use]
pub fn resolve_defender_attack(kind: DefenderKind, targets: &[TargetHealth]) -> DefenderStrike {
    let struck: &[TargetHealth] = match kind.attack_pattern() {
        AttackPattern::Front => targets.get(..targets.len().min(1)).unwrap_or(&[]),
        AttackPattern::Burst | AttackPattern::Sweep => targets,
        AttackPattern::Passive => &[],
    };

    let mut outcome = DefenderStrike::default();
    for target in struck {
        let health = target.health.saturating_sub(kind.power());
        outcome.remaining.push(TargetHealth::new(target.id, health));
        if health == 0 {
            outcome.slain.push(target.id);
        }
    }

    outcome.discharged = kind.single_use() && !outcome.remaining.is_empty();
    outcome
}

/// Applies one attacker attack against the health of a blocking defender.
#[must_use]
pub fn resolve_attacker_attack(kind: AttackerKind, defender_health: u32) -> AttackerStrike {
    let health = defender_health.saturating_sub(kind.power());
    AttackerStrike {
        defender_health: health,
        defender_slain: health == 0,
        attacker_spent: kind.spent_after_attack(),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_attacker_attack, resolve_defender_attack, TargetHealth};
    use lawn_defence_core::{AttackerId, AttackerKind, DefenderKind};

    fn target(id: u32, health: u32) -> TargetHealth {
        TargetHealth::new(AttackerId::new(id), health)
    }

    #[test]
    fn shooter_strikes_only_the_front_target() {
        let outcome = resolve_defender_attack(
            DefenderKind::Shooter,
            &[target(1, 30), target(2, 30), target(3, 30)],
        );

        assert_eq!(outcome.remaining, vec![target(1, 20)]);
        assert!(outcome.slain.is_empty());
        assert!(!outcome.discharged);
    }

    #[test]
    fn shooter_with_empty_lane_strikes_nothing() {
        let outcome = resolve_defender_attack(DefenderKind::Shooter, &[]);
        assert!(outcome.remaining.is_empty());
        assert!(outcome.slain.is_empty());
    }

    #[test]
    fn harvester_never_attacks() {
        let outcome = resolve_defender_attack(DefenderKind::Harvester, &[target(1, 10)]);
        assert!(outcome.remaining.is_empty());
        assert!(!outcome.discharged);
    }

    #[test]
    fn mine_bursts_every_target_and_discharges() {
        let outcome =
            resolve_defender_attack(DefenderKind::Mine, &[target(4, 100), target(9, 200)]);

        assert_eq!(outcome.remaining, vec![target(4, 0), target(9, 80)]);
        assert_eq!(outcome.slain, vec![AttackerId::new(4)]);
        assert!(outcome.discharged);
    }

    #[test]
    fn armed_charge_stays_when_nothing_is_in_range() {
        let outcome = resolve_defender_attack(DefenderKind::Torch, &[]);
        assert!(!outcome.discharged);
    }

    #[test]
    fn torch_sweeps_the_whole_target_list() {
        let targets = [target(1, 150), target(2, 151), target(3, 20)];
        let outcome = resolve_defender_attack(DefenderKind::Torch, &targets);

        assert_eq!(outcome.remaining.len(), 3);
        assert_eq!(
            outcome.slain,
            vec![AttackerId::new(1), AttackerId::new(3)]
        );
    }

    #[test]
    fn damage_saturates_at_zero_health() {
        let outcome = resolve_defender_attack(DefenderKind::Mine, &[target(1, 5)]);
        assert_eq!(outcome.remaining, vec![target(1, 0)]);
        assert_eq!(outcome.slain, vec![AttackerId::new(1)]);
    }

    #[test]
    fn shambler_attack_reduces_defender_health() {
        let outcome = resolve_attacker_attack(AttackerKind::Shambler, 100);
        assert_eq!(outcome.defender_health, 90);
        assert!(!outcome.defender_slain);
        assert!(!outcome.attacker_spent);
    }

    #[test]
    fn bomber_spends_itself_regardless_of_the_outcome() {
        let survived = resolve_attacker_attack(AttackerKind::Bomber, 1000);
        assert!(!survived.defender_slain);
        assert!(survived.attacker_spent);

        let slain = resolve_attacker_attack(AttackerKind::Bomber, 10);
        assert!(slain.defender_slain);
        assert_eq!(slain.defender_health, 0);
        assert!(slain.attacker_spent);
    }
}
