//! Headless demo scene.
//!
//! A handful of walkers wander inside a walled arena. Whenever a walker has no
//! active force it picks a random target and asks for a footstep sound; forces
//! end when the target is reached or a wall blocks the way. A shared halt
//! switch, checked through each controller's movement predicate, freezes
//! everyone at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::entitysize::EntitySize;
use crate::components::force::Force;
use crate::components::mapposition::MapPosition;
use crate::components::movementcontroller::{MovementController, MovementPredicate};
use crate::events::sound::SoundRequest;
use crate::geometry::Aabb;
use crate::resources::gameconfig::GameConfig;
use crate::resources::physics::{ObstaclePhysics, PhysicsWorld};

const ARENA_SIZE: f32 = 320.0;
const WALL_THICKNESS: f32 = 16.0;
const WALKER_WIDTH: f32 = 16.0;
const WALKER_HEIGHT: f32 = 24.0;
const WALKER_SPEED: f32 = 60.0;

/// Tag for demo walkers.
#[derive(Component, Debug, Clone)]
pub struct Walker {
    pub name: String,
}

/// Random source of the demo scene.
#[derive(Resource)]
pub struct DemoRng(pub fastrand::Rng);

/// Playable area, inside the walls.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Arena(pub Aabb);

/// When set, every walker's movement check fails.
#[derive(Resource, Clone, Default)]
pub struct HaltSwitch(pub Arc<AtomicBool>);

impl HaltSwitch {
    pub fn set(&self, halted: bool) {
        self.0.store(halted, Ordering::Release);
    }

    pub fn is_halted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Arena walls plus one pillar in the middle.
fn arena_physics() -> (ObstaclePhysics, Aabb) {
    let s = ARENA_SIZE;
    let t = WALL_THICKNESS;
    let inner = Aabb::from_corners(Vec2::splat(t), Vec2::splat(s - t));
    let physics = ObstaclePhysics::new()
        .with_obstacle(Aabb::from_corners(Vec2::ZERO, Vec2::new(s, t)))
        .with_obstacle(Aabb::from_corners(Vec2::new(0.0, s - t), Vec2::new(s, s)))
        .with_obstacle(Aabb::from_corners(Vec2::ZERO, Vec2::new(t, s)))
        .with_obstacle(Aabb::from_corners(Vec2::new(s - t, 0.0), Vec2::new(s, s)))
        .with_obstacle(Aabb::from_origin_size(
            Vec2::splat(s / 2.0 - 20.0),
            Vec2::splat(40.0),
        ));
    (physics, inner)
}

/// Insert the scene resources and spawn `walkers` walkers.
pub fn setup(world: &mut World, walkers: usize, seed: u64) {
    let tolerance = world
        .get_resource::<GameConfig>()
        .map(|c| c.reach_tolerance)
        .unwrap_or(crate::components::movementcontroller::DEFAULT_REACH_TOLERANCE);

    let (physics, inner) = arena_physics();
    world.insert_resource(PhysicsWorld::new(physics));
    world.insert_resource(Arena(inner));
    world.insert_resource(DemoRng(fastrand::Rng::with_seed(seed)));

    let halt = HaltSwitch::default();
    world.insert_resource(halt.clone());

    for i in 0..walkers {
        let mut controller = MovementController::new().with_reach_tolerance(tolerance);
        let switch = halt.clone();
        let not_halted: MovementPredicate =
            Arc::new(move |_: &MovementController| !switch.is_halted());
        controller.on_movement_check(not_halted);

        // Start along the left wall, spaced vertically.
        let y = WALL_THICKNESS + 8.0 + i as f32 * (WALKER_HEIGHT + 12.0);
        world.spawn((
            Walker {
                name: format!("walker-{}", i),
            },
            controller,
            MapPosition::new(WALL_THICKNESS + 4.0, y),
            BoxCollider::feet(WALKER_WIDTH, WALKER_HEIGHT, 12.0, 8.0),
            EntitySize::new(WALKER_WIDTH, WALKER_HEIGHT),
        ));
    }
    info!("demo scene ready with {} walkers", walkers);
}

/// Give idle walkers a new random destination and play a footstep.
pub fn wander_system(
    arena: Res<Arena>,
    mut rng: ResMut<DemoRng>,
    mut query: Query<(&Walker, &mut MovementController)>,
    mut requests: MessageWriter<SoundRequest>,
) {
    for (walker, mut controller) in query.iter_mut() {
        if controller.active_forces().iter().any(|f| !f.has_ended()) {
            continue;
        }
        let area = arena.0;
        let target = Vec2::new(
            area.min.x + rng.0.f32() * area.width(),
            area.min.y + rng.0.f32() * area.height(),
        );
        debug!("{} heads to ({:.1}, {:.1})", walker.name, target.x, target.y);
        controller.apply(
            Force::new(target, WALKER_SPEED)
                .with_cancel_on_reached(true)
                .with_cancel_on_collision(true),
        );
        requests.write(SoundRequest::PlayFx {
            id: "step".to_string(),
        });
    }
}
