//! Scripted match played against the loopback store.
//!
//! Stands in for the authoritative server: moves the ball, tracks the
//! opponent's paddle, keeps score, and feeds pointer samples that follow the
//! ball to the client. The rules here are only what it takes to make the
//! tables change plausibly.

use std::time::Duration;

use pong_client::ClientInput;
use pong_coords::CoordinateTransform;
use pong_net::{GameStatus, Identity, LoopbackStore, PlayerInfo, Side};
use tokio::sync::mpsc;
use tokio::time;

/// Identity of the scripted opponent.
pub const OPPONENT: Identity = Identity::from_bytes([0xff; 32]);

/// Ball speed in simulation units per tick.
const BALL_STEP: (f32, f32) = (0.09, 0.05);

/// Score after a scripted match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Left side.
    pub left: u32,
    /// Right side.
    pub right: u32,
}

/// Put the opponent on the right and the local player on the left, then
/// start play.
pub fn seed(store: &LoopbackStore, me: Identity) {
    store.upsert_player_info(PlayerInfo {
        player_id: me,
        side: Side::Left,
    });
    store.upsert_player_info(PlayerInfo {
        player_id: OPPONENT,
        side: Side::Right,
    });
    store.set_paddle(me, 0.0);
    store.set_paddle(OPPONENT, 0.0);
    store.set_game_state(0, 0, GameStatus::Playing);
    store.set_ball(0.0, 0.0);
}

/// Play `ticks` server ticks, then ask the client to shut down.
pub async fn play(
    store: LoopbackStore,
    transform: CoordinateTransform,
    inputs: mpsc::UnboundedSender<ClientInput>,
    ticks: u32,
    tick: Duration,
) -> MatchScore {
    let court = *transform.court();
    let half_w = court.paddle_x_offset();
    let half_h = court.height / 2.0 - court.ball_radius;

    let mut score = MatchScore::default();
    let (mut x, mut y) = (0.0_f32, 0.0_f32);
    let (mut vx, mut vy) = BALL_STEP;
    let mut arrivals = 0_u32;

    for _ in 0..ticks {
        time::sleep(tick).await;

        x += vx;
        y += vy;
        if y.abs() > half_h {
            vy = -vy;
            y = y.clamp(-half_h, half_h);
        }

        if x.abs() > half_w {
            // The local paddle always follows the ball, so only the right
            // side concedes: every other time the ball reaches it.
            if vx > 0.0 {
                arrivals += 1;
            }
            if vx > 0.0 && arrivals % 2 == 1 {
                score.left += 1;
                store.set_game_state(score.left, score.right, GameStatus::Playing);
                store.remove_ball();
                store.set_ball(0.0, 0.0);
                x = 0.0;
                y = 0.0;
                tracing::info!("point to the left: {} - {}", score.left, score.right);
                continue;
            }
            vx = -vx;
            x = x.clamp(-half_w, half_w);
        }

        store.set_ball(x, y);
        store.set_paddle(OPPONENT, y);

        let client_y = transform.to_visual_y(y);
        if inputs.send(ClientInput::PointerMoved { client_y }).is_err() {
            tracing::warn!("client loop gone; ending match early");
            return score;
        }
    }

    store.set_game_state(score.left, score.right, GameStatus::Finished);
    let _ = inputs.send(ClientInput::Shutdown);
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_play_drives_tables_and_shuts_down() {
        let (store, _events) = LoopbackStore::new("spacetime-pong");
        let me = Identity::from_u64(1);
        seed(&store, me);
        let (inputs, mut inputs_rx) = mpsc::unbounded_channel();

        let score = play(
            store.clone(),
            CoordinateTransform::default(),
            inputs,
            200,
            Duration::from_millis(16),
        )
        .await;

        let mut pointer_samples = 0;
        let mut last = None;
        while let Ok(input) = inputs_rx.try_recv() {
            if matches!(input, ClientInput::PointerMoved { .. }) {
                pointer_samples += 1;
            }
            last = Some(input);
        }
        assert!(pointer_samples > 0);
        assert_eq!(last, Some(ClientInput::Shutdown));
        assert_eq!(score.right, 0);
        assert!(score.left > 0);
        assert!(store.paddle_y(OPPONENT).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_stops_when_client_is_gone() {
        let (store, _events) = LoopbackStore::new("spacetime-pong");
        let (inputs, inputs_rx) = mpsc::unbounded_channel();
        drop(inputs_rx);

        let score = play(
            store,
            CoordinateTransform::default(),
            inputs,
            1_000,
            Duration::from_millis(16),
        )
        .await;
        assert_eq!(score, MatchScore::default());
    }
}
