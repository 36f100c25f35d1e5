//! Health bar and falling heart pickups
//!
//! The health bar keeps one displayed heart entity per remaining life, laid
//! out left to right on the UI layer.

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityKind, Layer, Visual, World};
use crate::tuning::Tuning;

/// Life counter plus its displayed hearts
#[derive(Debug, Clone)]
pub struct HealthBar {
    lives: u32,
    max_lives: u32,
    /// Displayed hearts, index i shows life i + 1
    hearts: Vec<EntityId>,
    heart_size: f32,
    first_heart_x: f32,
    heart_spacing: f32,
    bar_y: f32,
    visual: Visual,
}

impl HealthBar {
    /// Create the bar with `tuning.initial_lives` hearts already displayed
    pub fn new(world: &mut World, tuning: &Tuning, visual: Visual) -> Self {
        let mut bar = Self {
            lives: 0,
            max_lives: tuning.max_lives,
            hearts: Vec::with_capacity(tuning.max_lives as usize),
            heart_size: tuning.heart_size,
            first_heart_x: tuning.first_heart_x,
            heart_spacing: tuning.heart_spacing,
            bar_y: tuning.health_bar_y,
            visual,
        };
        for _ in 0..tuning.initial_lives.min(tuning.max_lives) {
            bar.add_life(world);
        }
        bar
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_full(&self) -> bool {
        self.lives >= self.max_lives
    }

    /// Displayed heart entities, one per life
    pub fn hearts(&self) -> &[EntityId] {
        &self.hearts
    }

    /// Gain a life and display its heart. No-op at the maximum.
    pub fn add_life(&mut self, world: &mut World) -> bool {
        if self.is_full() {
            return false;
        }
        let heart = Entity::new(
            EntityKind::Heart,
            self.heart_center(self.lives),
            Vec2::splat(self.heart_size),
            self.visual,
        );
        self.hearts.push(world.add(heart, Layer::Ui));
        self.lives += 1;
        true
    }

    /// Lose a life and hide its heart. No-op at zero.
    pub fn remove_life(&mut self, world: &mut World) -> bool {
        let Some(heart) = self.hearts.pop() else {
            return false;
        };
        let removed = world.remove_from(heart, Layer::Ui);
        // The bar is the only owner of its UI hearts
        debug_assert!(removed, "health bar heart {} missing from the UI layer", heart);
        self.lives -= 1;
        true
    }

    fn heart_center(&self, index: u32) -> Vec2 {
        let top_left = Vec2::new(self.first_heart_x + index as f32 * self.heart_spacing, self.bar_y);
        top_left + Vec2::splat(self.heart_size / 2.0)
    }
}

/// Drop a heart pickup from `center`, falling straight down
pub fn spawn_falling_heart(world: &mut World, center: Vec2, size: f32, speed: f32, visual: Visual) -> EntityId {
    let heart = Entity::new(EntityKind::FallingHeart, center, Vec2::splat(size), visual)
        .with_velocity(Vec2::new(0.0, speed));
    world.add(heart, Layer::Default)
}

/// A falling heart only collides with the main paddle, and only while a life is missing
pub fn heart_can_collide(health: &HealthBar, other: EntityId, main_paddle: EntityId) -> bool {
    other == main_paddle && !health.is_full()
}

/// Handle a falling heart touching `other`
///
/// On an eligible collision the player gains a life and the heart is
/// removed. Returns true if the heart was collected.
pub fn collect_falling_heart(
    world: &mut World,
    health: &mut HealthBar,
    heart: EntityId,
    other: EntityId,
    main_paddle: EntityId,
) -> bool {
    if !heart_can_collide(health, other, main_paddle) {
        return false;
    }
    if !world.remove(heart) {
        return false;
    }
    health.add_life(world);
    log::info!("Heart collected, lives: {}", health.lives());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, HealthBar) {
        let mut world = World::new();
        let bar = HealthBar::new(&mut world, &Tuning::default(), Visual(5));
        (world, bar)
    }

    fn displayed(world: &World) -> usize {
        world.iter_layer(Layer::Ui).count()
    }

    #[test]
    fn test_initial_hearts() {
        let (world, bar) = setup();
        assert_eq!(bar.lives(), 3);
        assert_eq!(bar.hearts().len(), 3);
        assert_eq!(displayed(&world), 3);

        // Fixed horizontal sequence
        let xs: Vec<f32> = bar.hearts().iter().map(|id| world.get(*id).unwrap().center.x).collect();
        assert_eq!(xs, vec![22.0, 52.0, 82.0]);
    }

    #[test]
    fn test_add_life_caps_at_max() {
        let (mut world, mut bar) = setup();
        assert!(bar.add_life(&mut world));
        assert_eq!(bar.lives(), 4);
        assert!(!bar.add_life(&mut world));
        assert_eq!(bar.lives(), 4);
        assert_eq!(displayed(&world), 4);
    }

    #[test]
    fn test_remove_life_stops_at_zero() {
        let (mut world, mut bar) = setup();
        for expected in (0..3).rev() {
            assert!(bar.remove_life(&mut world));
            assert_eq!(bar.lives(), expected);
            assert_eq!(displayed(&world), expected as usize);
        }
        assert!(!bar.remove_life(&mut world));
        assert_eq!(bar.lives(), 0);
        assert_eq!(displayed(&world), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "missing from the UI layer")]
    fn test_remove_life_requires_owned_hearts() {
        let (mut world, mut bar) = setup();
        let last = *bar.hearts().last().unwrap();
        world.remove(last);
        bar.remove_life(&mut world);
    }

    #[test]
    fn test_heart_collected_below_max() {
        let (mut world, mut bar) = setup();
        let paddle = world.add(Entity::new(EntityKind::Paddle, Vec2::ZERO, Vec2::ONE, Visual(3)), Layer::Default);
        let heart = spawn_falling_heart(&mut world, Vec2::new(100.0, 100.0), 20.0, 100.0, Visual(5));
        assert_eq!(world.get(heart).unwrap().vel, Vec2::new(0.0, 100.0));

        assert!(collect_falling_heart(&mut world, &mut bar, heart, paddle, paddle));
        assert_eq!(bar.lives(), 4);
        assert!(!world.contains(heart));
        assert_eq!(displayed(&world), 4);
    }

    #[test]
    fn test_heart_ignored_at_max() {
        let (mut world, mut bar) = setup();
        bar.add_life(&mut world);
        let paddle = world.add(Entity::new(EntityKind::Paddle, Vec2::ZERO, Vec2::ONE, Visual(3)), Layer::Default);
        let heart = spawn_falling_heart(&mut world, Vec2::ZERO, 20.0, 100.0, Visual(5));

        assert!(!collect_falling_heart(&mut world, &mut bar, heart, paddle, paddle));
        assert_eq!(bar.lives(), 4);
        assert!(world.contains(heart));
    }

    #[test]
    fn test_heart_ignores_other_entities() {
        let (mut world, mut bar) = setup();
        let paddle = world.add(Entity::new(EntityKind::Paddle, Vec2::ZERO, Vec2::ONE, Visual(3)), Layer::Default);
        let extra = world.add(
            Entity::new(EntityKind::ExtraPaddle { collisions: 0 }, Vec2::ZERO, Vec2::ONE, Visual(3)),
            Layer::Default,
        );
        let heart = spawn_falling_heart(&mut world, Vec2::ZERO, 20.0, 100.0, Visual(5));

        assert!(!collect_falling_heart(&mut world, &mut bar, heart, extra, paddle));
        assert_eq!(bar.lives(), 3);
        assert!(world.contains(heart));
    }
}
