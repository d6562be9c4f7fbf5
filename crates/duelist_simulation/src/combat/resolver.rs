//! Разрешение обмена ударами между двумя бойцами
//!
//! Чистые функции без ECS: системы только раздают `&mut Fighter`
//! и превращают результат в `CombatEvent`.

use crate::components::{rects_overlap, DamageOutcome, Fighter, Side};

/// Результат одной проверки attacker → defender (когда контакт был)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    Blocked,
    Hit { damage_applied: u32 },
}

/// Block arbitration for a strike that already reached the body.
///
/// Right-hand strike is stopped by a right-facing guard when the attacker
/// stands left of the defender; left-hand strike by a left-facing guard
/// when the attacker stands right of the defender.
pub fn block_succeeds(attacker: &Fighter, defender: &Fighter) -> bool {
    if !defender.blocking {
        return false;
    }

    match attacker.attack_hand() {
        Side::Right => {
            defender.block_direction == Side::Right && attacker.position.x < defender.position.x
        }
        Side::Left => {
            defender.block_direction == Side::Left && attacker.position.x > defender.position.x
        }
    }
}

/// Одна проверка attacker → defender.
///
/// Returns `None` when nothing happened: no live swing, no contact,
/// or damage was unexpectedly negated (swing stays live).
pub fn resolve_strike(attacker: &mut Fighter, defender: &mut Fighter) -> Option<StrikeOutcome> {
    if !attacker.attacking || attacker.already_hit_in_current_attack {
        return None;
    }
    if !rects_overlap(attacker.attack_rect(), defender.body_rect()) {
        return None;
    }

    if block_succeeds(attacker, defender) {
        attacker.already_hit_in_current_attack = true;
        return Some(StrikeOutcome::Blocked);
    }

    // Урон атакующего, не защитника
    let damage = attacker.damage();
    let outcome = if defender.blocking {
        // Блок стоит не в ту сторону
        defender.take_unguarded_damage(damage)
    } else {
        defender.take_damage(damage)
    };

    match outcome {
        DamageOutcome::Dealt { applied } => {
            attacker.already_hit_in_current_attack = true;
            Some(StrikeOutcome::Hit {
                damage_applied: applied,
            })
        }
        DamageOutcome::Negated => {
            debug_assert!(false, "failed block arbitration still negated damage");
            crate::logger::log_warning("⚠️ Strike negated after failed block check, swing stays live");
            None
        }
    }
}

/// Обмен за тик: сначала `a → b`, затем `b → a`.
///
/// The second check sees health already changed by the first.
pub fn resolve_exchange(
    a: &mut Fighter,
    b: &mut Fighter,
) -> (Option<StrikeOutcome>, Option<StrikeOutcome>) {
    let a_on_b = resolve_strike(a, b);
    let b_on_a = resolve_strike(b, a);
    (a_on_b, b_on_a)
}
