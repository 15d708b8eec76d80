//! Enemy AI Template
//!
//! This example defines one enemy behaviour and stamps out independent
//! instances of it.
//!
//! Key concepts:
//! - Building a template machine by state name
//! - Guarded transitions evaluated in declaration order
//! - Per-instance data copied by `new_instance`
//! - Returning to the previous state
//!
//! Run with: cargo run --example enemy_ai

use ludum::builder::MachineBuilder;
use ludum::core::StateHooks;
use ludum::machine::StateMachine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Debug)]
struct Enemy {
    label: String,
    position: f64,
    player: f64,
    health: i32,
    stunned_for: f64,
}

impl Enemy {
    fn distance(&self) -> f64 {
        (self.player - self.position).abs()
    }
}

fn template() -> Result<StateMachine<Enemy>, ludum::core::MachineError> {
    let enemy = Enemy {
        label: "template".to_string(),
        position: 0.0,
        player: 0.0,
        health: 3,
        stunned_for: 0.0,
    };

    MachineBuilder::new("Enemy", enemy)
        .state(
            "PATROL",
            StateHooks::<Enemy>::new().on_update(|ctx, dt| {
                let phase = (ctx.state_time() * 2.0).sin();
                ctx.data_mut().position += phase * dt;
                Ok(())
            }),
        )
        .state(
            "CHASE",
            StateHooks::<Enemy>::new()
                .on_enter(|ctx| {
                    tracing::info!(enemy = %ctx.data().label, "spotted the player");
                    Ok(())
                })
                .on_update(|ctx, dt| {
                    let enemy = ctx.data_mut();
                    let step = (enemy.player - enemy.position).signum() * 2.0 * dt;
                    enemy.position += step;
                    Ok(())
                }),
        )
        .state(
            "STUNNED",
            StateHooks::<Enemy>::new()
                .on_enter(|ctx| {
                    ctx.data_mut().stunned_for = 0.5;
                    Ok(())
                })
                .on_update(|ctx, dt| {
                    let enemy = ctx.data_mut();
                    enemy.stunned_for -= dt;
                    if enemy.stunned_for <= 0.0 {
                        ctx.change_to_previous_state();
                    }
                    Ok(())
                }),
        )
        .state(
            "DEAD",
            StateHooks::<Enemy>::new().on_enter(|ctx| {
                tracing::info!(enemy = %ctx.data().label, "defeated");
                Ok(())
            }),
        )
        .initial("PATROL")
        .transition("PATROL", "DEAD", |ctx| ctx.data().health <= 0)
        .transition("CHASE", "DEAD", |ctx| ctx.data().health <= 0)
        .transition("PATROL", "CHASE", |ctx| ctx.data().distance() < 3.0)
        .transition("CHASE", "PATROL", |ctx| ctx.data().distance() > 6.0)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Enemy AI Template ===\n");

    let template = template()?;
    let stunned = template.state_id("STUNNED").ok_or("missing STUNNED state")?;

    let mut enemies: Vec<StateMachine<Enemy>> = (0..3)
        .map(|i| {
            let mut enemy = template.new_instance();
            let data = enemy.data_mut();
            data.label = format!("goblin-{i}");
            data.position = i as f64 * 4.0;
            enemy
        })
        .collect();

    for enemy in &mut enemies {
        enemy.start()?;
    }

    let player = 1.0;
    for step in 0..30 {
        for enemy in &mut enemies {
            enemy.data_mut().player = player;
            match step {
                10 if enemy.data().label == "goblin-1" => enemy.change_state(stunned)?,
                20 if enemy.data().label == "goblin-0" => enemy.data_mut().health = 0,
                _ => {}
            }
            enemy.update(0.1)?;
        }
    }

    for enemy in &enemies {
        println!(
            "{:<9} {:<8} at {:>5.2}, path {:?}",
            enemy.data().label,
            enemy.current_state_name().unwrap_or("-"),
            enemy.data().position,
            enemy
                .history()
                .path()
                .into_iter()
                .filter_map(|id| enemy.state_name(id))
                .collect::<Vec<_>>()
        );
    }

    println!("\nTemplate untouched: {}", template.data().label);
    println!("\n=== Example Complete ===");
    Ok(())
}
