//! Engine tick integration tests for force movement and time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy_ecs::prelude::*;
use glam::Vec2;

use forceplay::components::boxcollider::BoxCollider;
use forceplay::components::entitysize::EntitySize;
use forceplay::components::force::Force;
use forceplay::components::mapposition::MapPosition;
use forceplay::components::movementcontroller::{MovementController, MovementPredicate};
use forceplay::geometry::Aabb;
use forceplay::resources::physics::{ObstaclePhysics, PhysicsWorld};
use forceplay::resources::soundcontroller::SoundController;
use forceplay::resources::tickclock::TickClock;
use forceplay::resources::worldtime::WorldTime;
use forceplay::systems::forces::force_movement_system;
use forceplay::systems::time::update_world_time;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(delta: f32, physics: ObstaclePhysics) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        delta,
        ..WorldTime::default()
    });
    world.insert_resource(PhysicsWorld::new(physics));
    world
}

/// 10x20 entity with a 10x10 collision box on its lower half.
fn spawn_mover(world: &mut World, location: Vec2, controller: MovementController) -> Entity {
    world
        .spawn((
            controller,
            MapPosition { pos: location },
            BoxCollider::feet(10.0, 20.0, 10.0, 10.0),
            EntitySize::new(10.0, 20.0),
        ))
        .id()
}

fn tick_forces(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(force_movement_system);
    schedule.run(world);
}

fn position(world: &World, entity: Entity) -> Vec2 {
    world.get::<MapPosition>(entity).unwrap().pos
}

#[test]
fn force_pulls_entity_towards_target() {
    let mut world = make_world(0.5, ObstaclePhysics::new());
    let mut controller = MovementController::new();
    controller.apply(Force::new(Vec2::new(105.0, 15.0), 20.0));
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    tick_forces(&mut world);

    let pos = position(&world, e);
    assert!(approx_eq(pos.x, 10.0));
    assert!(approx_eq(pos.y, 0.0));
}

#[test]
fn wall_ends_cancel_on_collision_force() {
    let wall = Aabb::from_origin_size(Vec2::new(12.0, 0.0), Vec2::new(10.0, 40.0));
    let mut world = make_world(0.1, ObstaclePhysics::new().with_obstacle(wall));
    let force = Force::new(Vec2::new(105.0, 15.0), 10.0).with_cancel_on_collision(true);
    let mut controller = MovementController::new();
    controller.apply(force.clone());
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    // Free for two ticks (box right edge 10 -> 12), blocked on the third.
    for _ in 0..3 {
        tick_forces(&mut world);
    }
    assert!(force.has_ended());
    assert!(approx_eq(position(&world, e).x, 2.0));

    tick_forces(&mut world);
    let controller = world.get::<MovementController>(e).unwrap();
    assert!(controller.active_forces().is_empty());
}

#[test]
fn reached_target_ends_force_and_entity_stops() {
    let mut world = make_world(0.1, ObstaclePhysics::new());
    let force = Force::new(Vec2::new(25.0, 15.0), 50.0).with_cancel_on_reached(true);
    let mut controller = MovementController::new();
    controller.apply(force.clone());
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    for _ in 0..10 {
        tick_forces(&mut world);
    }
    assert!(force.has_ended());
    let rest = position(&world, e);

    for _ in 0..5 {
        tick_forces(&mut world);
    }
    assert_eq!(position(&world, e), rest);
    assert!(
        world
            .get::<MovementController>(e)
            .unwrap()
            .active_forces()
            .is_empty()
    );
}

#[test]
fn failing_movement_check_skips_controller() {
    let mut world = make_world(0.5, ObstaclePhysics::new());
    let halted = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&halted);
    let gate: MovementPredicate =
        Arc::new(move |_: &MovementController| !flag.load(Ordering::Acquire));

    let mut controller = MovementController::new();
    controller.on_movement_check(gate);
    controller.apply(Force::new(Vec2::new(105.0, 15.0), 20.0));
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    tick_forces(&mut world);
    assert_eq!(position(&world, e), Vec2::ZERO);

    halted.store(false, Ordering::Release);
    tick_forces(&mut world);
    assert!(approx_eq(position(&world, e).x, 10.0));
}

#[test]
fn forces_sent_from_another_thread_are_integrated() {
    let mut world = make_world(0.5, ObstaclePhysics::new());
    let controller = MovementController::new();
    let sender = controller.sender();
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    std::thread::spawn(move || {
        sender.apply(Force::new(Vec2::new(5.0, 115.0), 20.0));
    })
    .join()
    .unwrap();

    tick_forces(&mut world);
    let pos = position(&world, e);
    assert!(approx_eq(pos.x, 0.0));
    assert!(approx_eq(pos.y, 10.0));
}

#[test]
fn world_time_update_advances_tick_clock() {
    let mut world = make_world(0.0, ObstaclePhysics::new());
    let clock = TickClock::new();
    world.insert_resource(clock.clone());

    update_world_time(&mut world, 0.25);
    update_world_time(&mut world, 0.25);

    let wt = *world.resource::<WorldTime>();
    assert!(approx_eq(wt.delta, 0.25));
    assert!(approx_eq(wt.elapsed, 0.5));
    assert_eq!(wt.frame_count, 2);
    assert_eq!(clock.ticks(), 500);
}

#[test]
fn tick_clock_keeps_running_in_long_sessions() {
    // At 2^19 seconds one 60 Hz frame is below the f32 precision of `elapsed`.
    let mut world = make_world(0.0, ObstaclePhysics::new());
    world.resource_mut::<WorldTime>().elapsed = 524_288.0;
    let clock = TickClock::starting_at(524_288_000);
    world.insert_resource(clock.clone());

    let sound: SoundController<()> = SoundController::new(clock.clone());
    assert!(sound.call(|_| {}));
    assert!(!sound.can_play());

    let start = clock.ticks();
    for _ in 0..600 {
        update_world_time(&mut world, 1.0 / 60.0);
    }
    let advanced = clock.since(start);
    assert!((9_999..=10_001).contains(&advanced), "advanced {advanced}");
    assert!(sound.can_play());
}

#[test]
fn fractional_frames_do_not_drift() {
    let mut world = make_world(0.0, ObstaclePhysics::new());
    let clock = TickClock::new();
    world.insert_resource(clock.clone());

    for _ in 0..60 {
        update_world_time(&mut world, 1.0 / 60.0);
    }
    assert!((999..=1_001).contains(&clock.ticks()));
}

#[test]
fn time_scale_slows_clock_and_movement() {
    let mut world = make_world(0.0, ObstaclePhysics::new());
    world.resource_mut::<WorldTime>().time_scale = 0.5;
    let clock = TickClock::new();
    world.insert_resource(clock.clone());

    let mut controller = MovementController::new();
    controller.apply(Force::new(Vec2::new(105.0, 15.0), 20.0));
    let e = spawn_mover(&mut world, Vec2::ZERO, controller);

    update_world_time(&mut world, 1.0);
    tick_forces(&mut world);

    assert_eq!(clock.ticks(), 500);
    assert!(approx_eq(position(&world, e).x, 10.0));
}
