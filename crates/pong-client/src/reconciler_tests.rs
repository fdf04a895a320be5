//! Unit tests for table reconciliation.

use super::*;
use crate::scene::{BodyShape, EcsScene};
use pong_net::{GameStatus, Timestamp};

struct Fixture {
    sync: TableSync<EcsScene>,
    players: Vec<PlayerInfo>,
    hud: Hud,
}

impl Fixture {
    fn new() -> Self {
        Self {
            sync: TableSync::new(EcsScene::new(), CoordinateTransform::default()),
            players: Vec::new(),
            hud: Hud::new(),
        }
    }

    fn join(&mut self, id: u64, side: Side) -> Identity {
        let player_id = Identity::from_u64(id);
        self.players.push(PlayerInfo { player_id, side });
        player_id
    }

    fn apply(&mut self, update: TableUpdate) {
        self.sync.apply(&update, &self.players, &mut self.hud);
    }

    fn paddle_pos(&self, id: Identity) -> Option<Vec2> {
        let handle = self.sync.views().get(&id.to_hex())?;
        self.sync.views().scene().position(handle)
    }

    fn ball_pos(&self) -> Option<Vec2> {
        let handle = self.sync.views().singleton()?;
        self.sync.views().scene().position(handle)
    }
}

fn input(player_id: Identity, paddle_y: f32) -> PlayerInput {
    PlayerInput {
        player_id,
        paddle_y,
        last_update: Timestamp::default(),
    }
}

fn ball(x: f32, y: f32) -> Ball {
    Ball {
        singleton_id: 1,
        x,
        y,
        vx: 0.1,
        vy: -0.1,
    }
}

fn game_state(score1: u32, score2: u32, status: GameStatus) -> GameState {
    GameState {
        singleton_id: 1,
        score1,
        score2,
        status,
        last_update: Timestamp::default(),
    }
}

#[test]
fn test_left_paddle_lifecycle() {
    let mut fx = Fixture::new();
    let p1 = fx.join(1, Side::Left);

    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p1, 0.0))));
    assert_eq!(fx.paddle_pos(p1), Some(Vec2::new(40.0, 200.0)));
    let handle = fx.sync.views().get(&p1.to_hex()).unwrap();
    let scene = fx.sync.views().scene();
    assert!(scene.is_static(handle));
    assert_eq!(
        scene.shape(handle),
        Some(BodyShape::Rectangle {
            size: Vec2::new(16.0, 80.0)
        })
    );
    assert_eq!(scene.label(handle), Some(paddle_label(&p1.to_hex()).as_str()));

    fx.apply(TableUpdate::PlayerInput(TableEvent::Update {
        old: input(p1, 0.0),
        new: input(p1, 1.25),
    }));
    assert_eq!(fx.sync.views().get(&p1.to_hex()), Some(handle));
    assert_eq!(fx.paddle_pos(p1), Some(Vec2::new(40.0, 300.0)));

    fx.apply(TableUpdate::PlayerInput(TableEvent::Delete(input(p1, 1.25))));
    assert!(fx.paddle_pos(p1).is_none());
    assert_eq!(fx.sync.views().scene().body_count(), 0);

    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p1, -1.0))));
    assert_eq!(fx.paddle_pos(p1), Some(Vec2::new(40.0, 120.0)));
    assert_eq!(fx.sync.views().len(), 1);
}

#[test]
fn test_right_and_unknown_sides_use_right_slot() {
    let mut fx = Fixture::new();
    let p2 = fx.join(2, Side::Right);
    let stranger = Identity::from_u64(99);

    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p2, 0.0))));
    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(stranger, 0.5))));

    assert_eq!(fx.paddle_pos(p2), Some(Vec2::new(760.0, 200.0)));
    assert_eq!(fx.paddle_pos(stranger), Some(Vec2::new(760.0, 240.0)));
}

#[test]
fn test_duplicate_insert_keeps_slot_and_moves_y() {
    let mut fx = Fixture::new();
    let p1 = fx.join(1, Side::Left);
    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p1, 0.0))));

    // Side changes after creation do not move an existing paddle sideways.
    fx.players[0].side = Side::Right;
    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p1, 2.0))));

    assert_eq!(fx.sync.views().len(), 1);
    assert_eq!(fx.paddle_pos(p1), Some(Vec2::new(40.0, 360.0)));
}

#[test]
fn test_update_for_unknown_paddle_creates_nothing() {
    let mut fx = Fixture::new();
    let p1 = fx.join(1, Side::Left);
    fx.apply(TableUpdate::PlayerInput(TableEvent::Update {
        old: input(p1, 0.0),
        new: input(p1, 1.0),
    }));
    fx.apply(TableUpdate::PlayerInput(TableEvent::Delete(input(p1, 1.0))));
    assert!(fx.sync.views().is_empty());
    assert_eq!(fx.sync.views().scene().body_count(), 0);
}

#[test]
fn test_ball_lifecycle() {
    let mut fx = Fixture::new();

    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(0.0, 0.0))));
    assert_eq!(fx.ball_pos(), Some(Vec2::new(400.0, 200.0)));
    let first = fx.sync.views().singleton().unwrap();
    assert_eq!(
        fx.sync.views().scene().shape(first),
        Some(BodyShape::Circle { radius: 8.0 })
    );

    fx.sync.advance(0.0);
    fx.apply(TableUpdate::Ball(TableEvent::Update {
        old: ball(0.0, 0.0),
        new: ball(3.0, -1.0),
    }));
    assert_eq!(fx.ball_pos(), Some(Vec2::new(640.0, 120.0)));
    assert_eq!(fx.sync.views().scene().velocity(first), Some(Vec2::ZERO));

    fx.apply(TableUpdate::Ball(TableEvent::Delete(ball(3.0, -1.0))));
    assert!(fx.sync.views().singleton().is_none());
    assert_eq!(fx.sync.views().scene().body_count(), 0);

    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(0.0, 0.0))));
    let second = fx.sync.views().singleton().unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_ball_does_not_drift_between_updates() {
    let mut fx = Fixture::new();
    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(1.0, 1.0))));
    fx.sync.advance(1.0);
    assert_eq!(fx.ball_pos(), Some(Vec2::new(480.0, 280.0)));
}

#[test]
fn test_ball_rows_cancel_local_velocity() {
    let mut fx = Fixture::new();
    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(0.0, 0.0))));
    let handle = fx.sync.views().singleton().unwrap();

    fx.sync.views.scene_mut().set_velocity(handle, Vec2::new(120.0, -60.0));
    fx.sync.advance(0.5);
    assert_eq!(fx.ball_pos(), Some(Vec2::new(460.0, 170.0)));

    fx.apply(TableUpdate::Ball(TableEvent::Update {
        old: ball(0.0, 0.0),
        new: ball(1.0, 1.0),
    }));
    assert_eq!(fx.sync.views().scene().velocity(handle), Some(Vec2::ZERO));
    assert_eq!(fx.ball_pos(), Some(Vec2::new(480.0, 280.0)));
    fx.sync.advance(1.0);
    assert_eq!(fx.ball_pos(), Some(Vec2::new(480.0, 280.0)));

    // A repeated insert goes through the same placement.
    fx.sync.views.scene_mut().set_velocity(handle, Vec2::new(-30.0, 10.0));
    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(0.0, 0.0))));
    assert_eq!(fx.sync.views().singleton(), Some(handle));
    assert_eq!(fx.sync.views().scene().velocity(handle), Some(Vec2::ZERO));
    fx.sync.advance(1.0);
    assert_eq!(fx.ball_pos(), Some(Vec2::new(400.0, 200.0)));
}

#[test]
fn test_game_state_drives_hud() {
    let mut fx = Fixture::new();

    fx.apply(TableUpdate::GameState(TableEvent::Insert(game_state(
        0,
        0,
        GameStatus::Playing,
    ))));
    assert_eq!(fx.hud.text(), "Score: 0 - 0");

    fx.apply(TableUpdate::GameState(TableEvent::Update {
        old: game_state(0, 0, GameStatus::Playing),
        new: game_state(2, 1, GameStatus::Paused),
    }));
    assert_eq!(fx.hud.text(), "Score: 2 - 1 (Paused)");

    fx.apply(TableUpdate::GameState(TableEvent::Delete(game_state(
        2,
        1,
        GameStatus::Paused,
    ))));
    assert_eq!(fx.hud.text(), "Game Resetting...");
    assert_eq!(fx.sync.views().scene().body_count(), 0);
}

#[test]
fn test_registry_matches_rows_over_interleaved_sequence() {
    let mut fx = Fixture::new();
    let ids: Vec<Identity> = (1..=4)
        .map(|n| fx.join(n, if n % 2 == 1 { Side::Left } else { Side::Right }))
        .collect();

    // Per-key ordered, cross-key interleaved.
    let script: Vec<(usize, &str, f32)> = vec![
        (0, "insert", 0.0),
        (1, "insert", 0.5),
        (0, "update", 1.0),
        (2, "insert", -1.0),
        (1, "delete", 0.5),
        (3, "insert", 2.0),
        (0, "update", 1.5),
        (2, "delete", -1.0),
        (1, "insert", 0.0),
        (3, "update", -2.0),
    ];

    let mut live = std::collections::HashSet::new();
    for (i, op, y) in script {
        let id = ids[i];
        let update = match op {
            "insert" => {
                live.insert(id.to_hex());
                TableEvent::Insert(input(id, y))
            }
            "update" => TableEvent::Update {
                old: input(id, 0.0),
                new: input(id, y),
            },
            _ => {
                live.remove(&id.to_hex());
                TableEvent::Delete(input(id, y))
            }
        };
        fx.apply(TableUpdate::PlayerInput(update));

        let keys: std::collections::HashSet<String> =
            fx.sync.views().keys().map(str::to_string).collect();
        assert_eq!(keys, live);
        assert_eq!(fx.sync.views().scene().body_count(), live.len());
    }
}

#[test]
fn test_player_info_events_are_ignored() {
    let mut fx = Fixture::new();
    let p1 = Identity::from_u64(1);
    fx.apply(TableUpdate::PlayerInfo(TableEvent::Insert(PlayerInfo {
        player_id: p1,
        side: Side::Left,
    })));
    assert_eq!(fx.sync.views().scene().body_count(), 0);
}

#[test]
fn test_teardown_removes_everything() {
    let mut fx = Fixture::new();
    let p1 = fx.join(1, Side::Left);
    let p2 = fx.join(2, Side::Right);
    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p1, 0.0))));
    fx.apply(TableUpdate::PlayerInput(TableEvent::Insert(input(p2, 0.0))));
    fx.apply(TableUpdate::Ball(TableEvent::Insert(ball(0.0, 0.0))));

    assert_eq!(fx.sync.teardown(), 3);
    assert!(fx.sync.views().is_empty());
    assert!(fx.sync.views().singleton().is_none());
    assert_eq!(fx.sync.views().scene().body_count(), 0);
}
