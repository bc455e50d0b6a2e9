//! End-to-end tests: a small level driven through `App::step`, with the
//! stand-in physics delivering the contact events.

use glam::Vec2;

use jumpmaster::app::App;
use jumpmaster::components::animator::{AnimationClip, ClipTable};
use jumpmaster::components::contact::{ContactTracker, PlayerSensors};
use jumpmaster::components::jump::{JumpController, JumpPhase};
use jumpmaster::components::rigidbody::RigidBody;
use jumpmaster::components::transform::Transform2D;
use jumpmaster::resources::actions::Action;
use jumpmaster::resources::gameconfig::GameConfig;
use jumpmaster::resources::playerconfig::{
    ChargeClock, FallConfig, JumpConfig, KnockbackConfig, MovementConfig, ObjectConfig,
    PlayerConfig,
};
use jumpmaster::resources::tilemap::{TileLayer, TilePosition, Tilemap};
use jumpmaster::snapshot::GameSnapshot;

const DT: f32 = 1.0 / 60.0;

/// Floor top at y = 32; player resting centre at y = 52.
const REST_Y: f32 = 52.0;

fn clip(name: &str, frames: usize, duration: f32, repeat: bool) -> (String, AnimationClip) {
    (
        name.to_string(),
        AnimationClip {
            repeat,
            duration,
            frames: (0..frames).map(|i| format!("player_{name}_{i}")).collect(),
        },
    )
}

fn player_config(position: Vec2, allowed_fall: f32) -> PlayerConfig {
    let animations: ClipTable = [
        clip("idle", 4, 0.2, true),
        clip("walk", 6, 0.1, true),
        clip("jumpHold", 2, 0.15, false),
        clip("jump", 3, 0.1, false),
        clip("jumpFall", 2, 0.12, true),
        clip("knockBack", 3, 0.1, false),
        clip("fall", 5, 0.15, false),
    ]
    .into_iter()
    .collect();
    PlayerConfig {
        object: ObjectConfig {
            position,
            collider_size: Vec2::new(24.0, 40.0),
            collider_offset: Vec2::ZERO,
            renderer_size: Vec2::splat(48.0),
            renderer_offset: Vec2::ZERO,
            mass: 1.0,
            drag: 0.0,
            friction: 0.0,
        },
        movement: MovementConfig { speed: 150.0 },
        jump: JumpConfig {
            impulse: 450.0,
            impulse_multiplier: 1.0,
            min_impulse: 150.0,
            max_impulse: 650.0,
            diagonal_angle: 30.0,
            charge_clock: ChargeClock::Fixed,
            leniency: None,
        },
        knockback: KnockbackConfig {
            impulse: 180.0,
            diagonal_angle: 60.0,
        },
        fall: FallConfig {
            allowed_duration: allowed_fall,
        },
        animations,
    }
}

/// 32-unit tiles: a floor along the bottom row and, optionally, a wall
/// column four tiles tall starting at tile x = 10 (world x 320..352).
fn level(with_wall: bool) -> Tilemap {
    let mut tiles: Vec<TilePosition> = (0..20).map(|x| TilePosition { x, y: 9, id: 1 }).collect();
    if with_wall {
        tiles.extend((5..9).map(|y| TilePosition { x: 10, y, id: 1 }));
    }
    Tilemap {
        tile_size: 32.0,
        map_width: 20,
        map_height: 10,
        layers: vec![TileLayer {
            name: "platforms".into(),
            collider: true,
            tiles,
        }],
        tile_images: Default::default(),
    }
}

fn game_config() -> GameConfig {
    let mut config = GameConfig::new();
    config.update_rate = 75.0;
    config.camera_position = Vec2::new(320.0, 160.0);
    config.camera_width = 640;
    config.camera_height = 320;
    config
}

fn make_app(position: Vec2, with_wall: bool, allowed_fall: f32) -> App {
    App::new(
        &game_config(),
        &player_config(position, allowed_fall),
        &level(with_wall),
    )
}

fn run(app: &mut App, ticks: usize, actions: &[Action]) -> Vec<GameSnapshot> {
    (0..ticks)
        .map(|_| app.step(actions, DT).expect("tick failed"))
        .collect()
}

fn heard(snapshots: &[GameSnapshot], sound: &str) -> bool {
    snapshots
        .iter()
        .any(|s| s.sounds.iter().any(|heard| heard == sound))
}

fn position(app: &App) -> Vec2 {
    app.world()
        .get::<Transform2D>(app.player())
        .unwrap()
        .position
}

fn velocity(app: &App) -> Vec2 {
    app.world().get::<RigidBody>(app.player()).unwrap().velocity
}

fn grounded(app: &App) -> bool {
    let sensors = app.world().get::<PlayerSensors>(app.player()).unwrap();
    app.world()
        .get::<ContactTracker>(sensors.ground)
        .unwrap()
        .is_touching()
}

// =============================================================================
// Landing and walking
// =============================================================================

#[test]
fn player_settles_on_the_floor() {
    let mut app = make_app(Vec2::new(100.0, 60.0), false, 0.9);
    let snapshots = run(&mut app, 30, &[]);

    assert!(grounded(&app));
    assert!((position(&app).y - REST_Y).abs() < 0.01);
    assert!(velocity(&app).y.abs() < 1e-3);
    assert!(heard(&snapshots, "landing"));

    let last = snapshots.last().unwrap();
    let player = last.object_with_tag("player").unwrap();
    let image = player.renderer.as_ref().unwrap().image.as_deref().unwrap();
    assert!(image.starts_with("player_idle_"));
}

#[test]
fn player_walks_right_across_tile_seams() {
    let mut app = make_app(Vec2::new(100.0, 60.0), false, 0.9);
    run(&mut app, 30, &[]);
    let start = position(&app);

    run(&mut app, 60, &[Action::Right]);
    let walked = position(&app).x - start.x;
    assert!(walked > 140.0 && walked < 155.0, "walked {walked}");
    assert!(grounded(&app));
    assert!((velocity(&app).x - 150.0).abs() < 1e-3);

    let snapshots = run(&mut app, 1, &[Action::Left]);
    let player = snapshots[0].object_with_tag("player").unwrap();
    assert!(player.renderer.as_ref().unwrap().flip_horizontally);
}

// =============================================================================
// Jumping
// =============================================================================

#[test]
fn charged_jump_leaves_the_ground_and_lands_again() {
    let mut app = make_app(Vec2::new(100.0, 60.0), false, 0.9);
    run(&mut app, 30, &[]);

    let charging = run(&mut app, 30, &[Action::Jump]);
    assert!(heard(&charging, "jumpHold"));
    let jump = app.world().get::<JumpController>(app.player()).unwrap();
    assert_eq!(jump.phase(), JumpPhase::Charging);
    assert!(jump.accumulated_impulse() > 150.0);

    let mut flight = run(&mut app, 10, &[]);
    assert!(!grounded(&app));
    assert!(position(&app).y > REST_Y + 10.0);
    assert!(velocity(&app).x.abs() < 1e-3);

    flight.extend(run(&mut app, 90, &[]));
    assert!(heard(&flight, "jump"));
    assert!(heard(&flight, "landing"));
    assert!(grounded(&app));
    assert!((position(&app).y - REST_Y).abs() < 0.01);
}

#[test]
fn launch_sound_is_in_the_snapshot_of_the_release_tick() {
    let mut app = make_app(Vec2::new(100.0, 60.0), false, 0.9);
    run(&mut app, 30, &[]);
    run(&mut app, 20, &[Action::Jump]);

    let release = run(&mut app, 1, &[]);
    assert!(heard(&release, "jump"));
    let rising = velocity(&app).y;
    assert!(rising > 0.0, "vy {rising}");

    let next = run(&mut app, 1, &[]);
    assert!(!heard(&next, "jump"));
}

#[test]
fn airborne_wall_hit_bounces_back() {
    let mut app = make_app(Vec2::new(250.0, 60.0), true, 0.9);
    run(&mut app, 30, &[]);

    run(&mut app, 30, &[Action::Right, Action::Jump]);
    let flight = run(&mut app, 40, &[Action::Right]);

    assert!(heard(&flight, "knockBack"));
    let bounced = flight
        .iter()
        .filter_map(|s| s.object_with_tag("player"))
        .any(|p| p.rigid_body.as_ref().is_some_and(|b| b.velocity.x < 0.0));
    assert!(bounced);
}

// =============================================================================
// Falling
// =============================================================================

#[test]
fn long_fall_plays_recovery_and_blocks_walking() {
    let mut app = make_app(Vec2::new(100.0, 500.0), false, 0.3);
    let mut snapshots = Vec::new();
    while !heard(&snapshots, "fall") {
        assert!(snapshots.len() < 120, "never landed hard");
        snapshots.extend(run(&mut app, 1, &[]));
    }
    assert!(!heard(&snapshots, "landing"));

    let x = position(&app).x;
    run(&mut app, 10, &[Action::Right]);
    assert!((position(&app).x - x).abs() < 1e-3);
}
