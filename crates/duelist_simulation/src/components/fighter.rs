//! Fighter: состояние бойца на арене
//!
//! Per-entity state machine: movement, attack/block windows, cooldowns,
//! damage application and collision geometry.
//!
//! Two sub-machines run concurrently and are gated by independent cooldowns:
//! - `Idle → Attacking → Idle` (15 tick window, 30 tick cooldown)
//! - `Idle → Blocking → Idle` (40 tick window, 40 tick cooldown)
//!
//! Cooldowns start counting at action start, not action end.

use bevy::math::Rect;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, ArchetypeStats};

// ============================================================================
// Timing / geometry constants
// ============================================================================

/// Attack window: hit rectangle is live while this counts down.
pub const ATTACK_ANIMATION_TICKS: u32 = 15;
/// Minimum ticks between two attack starts.
pub const ATTACK_COOLDOWN_TICKS: u32 = 30;
/// Block window and block cooldown (they coincide).
pub const BLOCK_COOLDOWN_TICKS: u32 = 40;

/// Side of the square hit box at the fist.
pub const ATTACK_BOX_SIZE: f32 = 30.0;
pub const BLOCK_BOX_WIDTH: f32 = 25.0;
pub const BLOCK_BOX_HEIGHT: f32 = 80.0;
/// Block box top edge, below the fighter's y.
const BLOCK_BOX_TOP_OFFSET: f32 = 25.0;

// Swing curve: fist travels forward/up, forearm carries 70% of the offset
const SWING_REACH: f32 = 50.0;
const SWING_RISE: f32 = 20.0;
const FOREARM_SHARE: f32 = 0.7;
/// Shoulder joint sits this far inside the shoulder line.
const SHOULDER_INSET: f32 = 5.0;
/// Shoulder line below the fighter's y.
const SHOULDER_DROP: f32 = 5.0;
/// Fist sits at 40% of arm length below the forearm joint.
const FIST_ARM_SHARE: f32 = 0.4;

// ============================================================================
// Side
// ============================================================================

/// Горизонтальная сторона (рука удара, сторона блока, угол ринга)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

// ============================================================================
// Commands / outcomes
// ============================================================================

/// Discrete command accepted by a fighter.
///
/// Human input and the bot controller feed the same commands.
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub enum FighterCommand {
    MoveLeft,
    MoveRight,
    StopMoving,
    Attack { opponent_x: f32 },
    Block { opponent_x: f32 },
}

/// Результат `take_damage`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Damage went through. `applied` is what was actually removed from health
    /// (0 once health is already at 0).
    Dealt { applied: u32 },
    /// Fighter was blocking, nothing applied.
    Negated,
}

impl DamageOutcome {
    pub fn is_dealt(&self) -> bool {
        matches!(self, DamageOutcome::Dealt { .. })
    }

    pub fn applied(&self) -> u32 {
        match self {
            DamageOutcome::Dealt { applied } => *applied,
            DamageOutcome::Negated => 0,
        }
    }
}

// ============================================================================
// Fighter Component
// ============================================================================

/// Боец на арене.
///
/// Invariants:
/// - `attacking` ⇒ `attack_animation_ticks > 0`
/// - `moving_left` and `moving_right` are never both set
/// - `health <= max_health`
/// - `already_hit_in_current_attack` limits damage to one application per swing
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct Fighter {
    /// Start corner. Seeds the default attack hand only.
    pub corner: Side,
    pub archetype: Archetype,
    /// Top-left of the torso box (head extends above it).
    pub position: Vec2,
    pub health: u32,
    pub max_health: u32,

    pub moving_left: bool,
    pub moving_right: bool,
    pub attacking: bool,
    pub blocking: bool,
    /// Authoritative only while `blocking`.
    pub block_direction: Side,
    pub attacking_with_right: bool,

    pub attack_cooldown_ticks: u32,
    pub block_cooldown_ticks: u32,
    pub attack_animation_ticks: u32,
    pub already_hit_in_current_attack: bool,
}

impl Fighter {
    pub fn new(archetype: Archetype, corner: Side, position: Vec2) -> Self {
        let stats = archetype.stats();
        // Left corner faces right: default swing with the right hand
        let attacking_with_right = corner == Side::Left;

        Self {
            corner,
            archetype,
            position,
            health: stats.max_health,
            max_health: stats.max_health,
            moving_left: false,
            moving_right: false,
            attacking: false,
            blocking: false,
            block_direction: corner,
            attacking_with_right,
            attack_cooldown_ticks: 0,
            block_cooldown_ticks: 0,
            attack_animation_ticks: 0,
            already_hit_in_current_attack: false,
        }
    }

    /// Fighter standing on the ground line at `x`.
    pub fn on_ground(archetype: Archetype, corner: Side, x: f32, ground_y: f32) -> Self {
        let height = archetype.stats().height;
        Self::new(archetype, corner, Vec2::new(x, ground_y - height))
    }

    pub fn stats(&self) -> ArchetypeStats {
        self.archetype.stats()
    }

    pub fn width(&self) -> f32 {
        self.stats().width
    }

    pub fn height(&self) -> f32 {
        self.stats().height
    }

    /// Урон одного удара этого бойца
    pub fn damage(&self) -> u32 {
        self.stats().damage
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.stats().half_width()
    }

    /// Side of this fighter's center that `x` lies on.
    pub fn side_of(&self, x: f32) -> Side {
        if x < self.center_x() {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Сторона атакующей руки
    pub fn attack_hand(&self) -> Side {
        if self.attacking_with_right {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown_ticks == 0
    }

    pub fn can_block(&self) -> bool {
        self.block_cooldown_ticks == 0
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn move_left(&mut self) {
        self.moving_left = true;
        self.moving_right = false;
    }

    pub fn move_right(&mut self) {
        self.moving_right = true;
        self.moving_left = false;
    }

    pub fn stop_moving(&mut self) {
        self.moving_left = false;
        self.moving_right = false;
    }

    /// Начать атаку. Hand is picked from the opponent's side of our center.
    ///
    /// Returns `false` (no-op) while the attack cooldown is running.
    pub fn attack(&mut self, opponent_x: f32) -> bool {
        if !self.can_attack() {
            return false;
        }

        self.attacking_with_right = self.side_of(opponent_x) == Side::Right;
        // Swinging right leaves the left side open
        self.block_direction = self.attack_hand().opposite();

        self.attacking = true;
        self.attack_animation_ticks = ATTACK_ANIMATION_TICKS;
        self.attack_cooldown_ticks = ATTACK_COOLDOWN_TICKS;
        self.already_hit_in_current_attack = false;
        true
    }

    /// Поставить блок в сторону противника.
    ///
    /// Returns `false` (no-op) while the block cooldown is running.
    pub fn block(&mut self, opponent_x: f32) -> bool {
        if !self.can_block() {
            return false;
        }

        self.block_direction = self.side_of(opponent_x);
        self.blocking = true;
        self.block_cooldown_ticks = BLOCK_COOLDOWN_TICKS;
        true
    }

    /// Drop movement and end the current attack/block windows.
    ///
    /// Cooldowns keep running, so the actions cannot be restarted early.
    pub fn cancel_actions(&mut self) {
        self.stop_moving();
        self.attacking = false;
        self.attack_animation_ticks = 0;
        self.already_hit_in_current_attack = false;
        self.blocking = false;
    }

    pub fn apply(&mut self, command: FighterCommand) {
        match command {
            FighterCommand::MoveLeft => self.move_left(),
            FighterCommand::MoveRight => self.move_right(),
            FighterCommand::StopMoving => self.stop_moving(),
            FighterCommand::Attack { opponent_x } => {
                self.attack(opponent_x);
            }
            FighterCommand::Block { opponent_x } => {
                self.block(opponent_x);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance one simulation tick.
    pub fn update(&mut self, ground_y: f32, arena_width: f32, opponent_x: Option<f32>) {
        let stats = self.stats();
        let max_x = (arena_width - stats.width).max(0.0);

        if self.moving_left && self.position.x > 0.0 {
            self.position.x -= stats.speed;
        }
        if self.moving_right && self.position.x < max_x {
            self.position.x += stats.speed;
        }
        self.position.x = self.position.x.clamp(0.0, max_x);
        self.position.y = ground_y - stats.height;

        if self.attacking && self.attack_animation_ticks > 0 {
            self.attack_animation_ticks -= 1;
            if self.attack_animation_ticks == 0 {
                self.attacking = false;
                self.already_hit_in_current_attack = false;
            }
        }

        self.attack_cooldown_ticks = self.attack_cooldown_ticks.saturating_sub(1);

        if self.block_cooldown_ticks > 0 {
            self.block_cooldown_ticks -= 1;
            if self.block_cooldown_ticks == 0 {
                self.blocking = false;
            }
        }

        // Блок следует за противником пока держится
        if let Some(opponent_x) = opponent_x {
            if self.blocking {
                self.block_direction = self.side_of(opponent_x);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Damage
    // ------------------------------------------------------------------------

    /// Единственная точка входа урона (guarded).
    ///
    /// Blocking negates the damage entirely; otherwise health floors at 0.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.blocking {
            return DamageOutcome::Negated;
        }
        self.apply_damage(amount)
    }

    /// Damage that already passed block arbitration (a guard facing the wrong way).
    ///
    /// `take_damage` negates everything while `blocking` is set, but a raised
    /// guard only stops a strike from the side it faces: a right-hand strike
    /// from the left needs a right guard, a left-hand strike from the right
    /// needs a left guard (see `combat::block_succeeds`). When that check fails
    /// the strike lands despite `blocking`, so the resolver needs this path.
    pub fn take_unguarded_damage(&mut self, amount: u32) -> DamageOutcome {
        self.apply_damage(amount)
    }

    fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        DamageOutcome::Dealt {
            applied: before - self.health,
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// Defender-side collision box, head included.
    pub fn body_rect(&self) -> Rect {
        let stats = self.stats();
        let head = stats.head_radius * 2.0;
        Rect::new(
            self.position.x,
            self.position.y - head,
            self.position.x + stats.width,
            self.position.y + stats.height,
        )
    }

    /// Fist tip of the attacking hand along the swing curve.
    ///
    /// Swing strength peaks mid-window: `1 - |progress - 0.5| * 2`.
    pub fn fist_position(&self) -> Vec2 {
        let stats = self.stats();
        let progress = if self.attacking {
            self.attack_animation_ticks as f32 / ATTACK_ANIMATION_TICKS as f32
        } else {
            0.0
        };
        let strength = 1.0 - (progress - 0.5).abs() * 2.0;

        let hand = self.attack_hand();
        let shoulder_x = self.center_x() + hand.sign() * (stats.half_shoulder() - SHOULDER_INSET);
        let shoulder_y = self.position.y + SHOULDER_DROP;

        Vec2::new(
            shoulder_x + hand.sign() * SWING_REACH * strength * FOREARM_SHARE,
            shoulder_y - SWING_RISE * strength * FOREARM_SHARE + stats.arm_length * FIST_ARM_SHARE,
        )
    }

    /// Hit box at the attacking fist. Empty when not attacking.
    pub fn attack_rect(&self) -> Rect {
        if !self.attacking {
            return Rect::default();
        }
        Rect::from_center_size(self.fist_position(), Vec2::splat(ATTACK_BOX_SIZE))
    }

    /// Guard box beside the fighter on `block_direction`. Empty when not blocking.
    pub fn block_rect(&self) -> Rect {
        if !self.blocking {
            return Rect::default();
        }

        let half_shoulder = self.stats().half_shoulder();
        let left = match self.block_direction {
            Side::Left => self.center_x() - half_shoulder - BLOCK_BOX_WIDTH,
            Side::Right => self.center_x() + half_shoulder,
        };
        let top = self.position.y + BLOCK_BOX_TOP_OFFSET;

        Rect::new(left, top, left + BLOCK_BOX_WIDTH, top + BLOCK_BOX_HEIGHT)
    }

    pub fn snapshot(&self) -> FighterSnapshot {
        FighterSnapshot {
            archetype: self.archetype,
            x: self.position.x,
            y: self.position.y,
            width: self.width(),
            height: self.height(),
            health: self.health,
            max_health: self.max_health,
            attacking: self.attacking,
            blocking: self.blocking,
            block_direction: self.block_direction,
        }
    }
}

/// Strict overlap of two boxes. Touching edges and empty boxes never overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    !a.is_empty() && !b.is_empty() && !a.intersect(b).is_empty()
}

/// Порядковый номер спавна бойца.
///
/// Монотонный счётчик мира: в отличие от `Entity::index()` не переиспользуется
/// после `reset_match`. Задаёт порядок update / решений / ударов / вердикта.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
#[reflect(Component)]
pub struct SpawnSeq(pub u32);

/// Вид бойца для рендера / табло (health bars, hit flash)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub archetype: Archetype,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub max_health: u32,
    pub attacking: bool,
    pub blocking: bool,
    pub block_direction: Side,
}
