//! Countdown Game
//!
//! This example drives a tiny game through a fixed-step frame loop.
//!
//! Key concepts:
//! - Time events that fire during a state
//! - Key presses that change state
//! - Game conditions that end the round
//! - Pausing without losing scripted time
//!
//! Run with: cargo run --example countdown
//! Set RUST_LOG=ludum=debug to see transitions and event resets.

use ludum::core::StateHooks;
use ludum::events::EventHooks;
use ludum::game::{EngineConfig, Game};
use ludum::input::{Key, KeyState};
use ludum::time::{ManualTimeSource, TimeSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Debug, Default)]
struct Round {
    score: u32,
    rounds: u32,
}

type Frame = Vec<String>;

const FRAME: f64 = 0.1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ludum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Countdown Game ===\n");

    let config = EngineConfig {
        log_transitions: true,
        ..EngineConfig::default()
    };
    let mut game: Game<Round, Frame> = Game::with_config("Countdown", Round::default(), config);

    let title = game.add_state("TITLE", StateHooks::new())?;
    let countdown = game.add_state("COUNTDOWN", StateHooks::new())?;
    let playing = game.add_state(
        "PLAYING",
        StateHooks::<Round>::new()
            .on_init(|ctx| {
                tracing::info!("first round, loading level");
                ctx.data_mut().rounds = 0;
                Ok(())
            })
            .on_enter(|ctx| {
                ctx.data_mut().rounds += 1;
                Ok(())
            })
            .on_update(|ctx, dt| {
                ctx.data_mut().score += (dt * 100.0).round() as u32;
                Ok(())
            }),
    )?;
    let game_over = game.add_state("GAME_OVER", StateHooks::new())?;

    game.set_state_draw(title, |_round, frame: &mut Frame| {
        frame.push("press SPACE to start".to_string());
        Ok(())
    })?;
    game.add_change_state_on_key_press_event(title, Some(Key::SPACE), countdown, EventHooks::new())?;

    for (i, label) in ["3", "2", "1"].into_iter().enumerate() {
        game.add_time_event(
            countdown,
            i as f64 * 0.5,
            Some(0.5),
            EventHooks::new().on_draw(move |_round, frame: &mut Frame| {
                frame.push(label.to_string());
                Ok(())
            }),
        )?;
    }
    game.add_change_state_at_time_event(countdown, 1.5, playing, EventHooks::new())?;

    game.set_state_draw(playing, |round, frame: &mut Frame| {
        frame.push(format!("score {}", round.score));
        Ok(())
    })?;
    game.add_game_condition_event(
        playing,
        |ctx| ctx.data().score >= 100,
        game_over,
        EventHooks::new(),
    )?;
    game.add_change_state_on_key_press_event(game_over, None, title, EventHooks::new())?;

    let mut source = ManualTimeSource::new(0.0);
    let mut input = KeyState::new();
    game.reset_clock(source.now());
    game.start(&mut input)?;

    for frame_number in 0..60 {
        match frame_number {
            3 => input.press(Key::SPACE),
            25 => {
                println!("  (paused)");
                game.pause();
            }
            30 => game.unpause(),
            _ => {}
        }

        source.advance(FRAME);
        game.tick(source.now(), &mut input)?;

        let mut frame = Frame::new();
        game.draw(&mut frame)?;
        println!(
            "frame {frame_number:2} [{:>9}] {}",
            game.current_state_name().unwrap_or("-"),
            frame.join(" ")
        );

        if game.current_state() == Some(game_over) {
            break;
        }
    }

    println!(
        "\nFinal score {} after {} round(s)",
        game.data().score,
        game.data().rounds
    );
    println!("Visited: {:?}", game.machine().history().path());
    println!("\n=== Example Complete ===");
    Ok(())
}
