//! Combat and damage resolution
//!
//! All hit tests are AABB overlaps between a bullet box and a damage box
//! (visual bounds inset on every side). First overlapping enemy in roster
//! order wins.

use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::rect::Rect;
use crate::audio::SoundEffect;
use crate::scene::TransitionSignal;
use crate::tuning::Tuning;

/// Data enemies are invulnerable while any mob or boss is alive
pub fn shield_active(enemies: &[Enemy]) -> bool {
    enemies.iter().any(|e| e.kind.is_hostile())
}

/// First live non-data enemy whose damage box touches the player
pub fn contact_hit(player_box: &Rect, enemies: &[Enemy], tuning: &Tuning) -> Option<u32> {
    enemies
        .iter()
        .filter(|e| e.kind != EnemyKind::Data && e.is_alive())
        .find(|e| e.damage_box(tuning).overlaps(player_box))
        .map(|e| e.id)
}

/// What a player bullet did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Miss,
    /// Shielded data enemy ate the bullet
    Absorbed { enemy_id: u32 },
    /// Enemy lost one hp; `killed` when it reached zero
    Damaged { enemy_id: u32, kind: EnemyKind, killed: bool },
}

impl Impact {
    /// Whether the bullet is consumed
    pub fn consumed(self) -> bool {
        !matches!(self, Impact::Miss)
    }
}

/// Resolve a player bullet against the roster. Dead enemies are left in
/// place; the caller removes them and scores the kill.
pub fn strike_enemies(bullet_box: &Rect, enemies: &mut [Enemy], tuning: &Tuning) -> Impact {
    let shielded = shield_active(enemies);
    let Some(target) = enemies
        .iter_mut()
        .find(|e| e.is_alive() && e.damage_box(tuning).overlaps(bullet_box))
    else {
        return Impact::Miss;
    };

    if target.kind == EnemyKind::Data && shielded {
        log::debug!("Shield absorbed a shot on enemy {}", target.id);
        return Impact::Absorbed { enemy_id: target.id };
    }

    let killed = target.take_hit();
    Impact::Damaged {
        enemy_id: target.id,
        kind: target.kind,
        killed,
    }
}

/// Spend a life. Returns `Retry` while lives remain, `GameOver` otherwise.
pub fn settle_player_hit(lives: &mut u8) -> TransitionSignal {
    if *lives > 1 {
        *lives -= 1;
        TransitionSignal::Retry
    } else {
        *lives = 0;
        TransitionSignal::GameOver
    }
}

/// Hit cue: mostly the normal grunt, rarely the alternate
pub fn player_hit_sound<R: Rng>(rng: &mut R) -> SoundEffect {
    if rng.random_range(0..100) < 95 {
        SoundEffect::PlayerHit
    } else {
        SoundEffect::PlayerHitRare
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemySpawn;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn(id: u32, s: EnemySpawn) -> Enemy {
        Enemy::spawn(id, &s, Vec2::new(40.0, 40.0), 0.0, &Tuning::default())
    }

    fn box_at(x: f32, y: f32) -> Rect {
        Rect::from_center(Vec2::new(x, y), Vec2::splat(5.0))
    }

    #[test]
    fn test_data_shield_absorbs_while_mobs_live() {
        let tuning = Tuning::default();
        let mut roster = vec![spawn(1, EnemySpawn::mob(100.0, 500.0)), spawn(2, EnemySpawn::data(800.0, 500.0))];

        let impact = strike_enemies(&box_at(800.0, 500.0), &mut roster, &tuning);
        assert_eq!(impact, Impact::Absorbed { enemy_id: 2 });
        assert_eq!(roster[1].hp, 5);

        roster.remove(0);
        let impact = strike_enemies(&box_at(800.0, 500.0), &mut roster, &tuning);
        assert_eq!(
            impact,
            Impact::Damaged {
                enemy_id: 2,
                kind: EnemyKind::Data,
                killed: false
            }
        );
        assert_eq!(roster[0].hp, 4);
    }

    #[test]
    fn test_first_overlap_wins() {
        let tuning = Tuning::default();
        let mut roster = vec![
            spawn(1, EnemySpawn::mob(100.0, 500.0).with(3.0, 3, false)),
            spawn(2, EnemySpawn::mob(105.0, 500.0).with(3.0, 3, false)),
        ];
        strike_enemies(&box_at(102.0, 500.0), &mut roster, &tuning);
        assert_eq!(roster[0].hp, 2);
        assert_eq!(roster[1].hp, 3);
    }

    #[test]
    fn test_bullet_outside_inset_misses() {
        let tuning = Tuning::default();
        let mut roster = vec![spawn(1, EnemySpawn::mob(100.0, 500.0))];
        // Visual box spans 60..140; damage box 75..125; bullet box 64..74
        let impact = strike_enemies(&box_at(69.0, 500.0), &mut roster, &tuning);
        assert_eq!(impact, Impact::Miss);
        assert!(!impact.consumed());
    }

    #[test]
    fn test_contact_skips_data() {
        let tuning = Tuning::default();
        let roster = vec![spawn(1, EnemySpawn::data(100.0, 500.0)), spawn(2, EnemySpawn::mob(400.0, 500.0))];
        let player = Rect::from_center(Vec2::new(100.0, 500.0), Vec2::new(10.0, 30.0));
        assert_eq!(contact_hit(&player, &roster, &tuning), None);
        let player = Rect::from_center(Vec2::new(400.0, 500.0), Vec2::new(10.0, 30.0));
        assert_eq!(contact_hit(&player, &roster, &tuning), Some(2));
    }

    #[test]
    fn test_lives_accounting() {
        let mut lives = 3;
        assert_eq!(settle_player_hit(&mut lives), TransitionSignal::Retry);
        assert_eq!(lives, 2);
        assert_eq!(settle_player_hit(&mut lives), TransitionSignal::Retry);
        assert_eq!(lives, 1);
        assert_eq!(settle_player_hit(&mut lives), TransitionSignal::GameOver);
        assert_eq!(lives, 0);
    }

    #[test]
    fn test_hit_sound_is_mostly_normal() {
        let mut rng = Pcg32::seed_from_u64(7);
        let rare = (0..1000)
            .filter(|_| player_hit_sound(&mut rng) == SoundEffect::PlayerHitRare)
            .count();
        assert!(rare > 0 && rare < 150, "rare count {rare}");
    }
}
