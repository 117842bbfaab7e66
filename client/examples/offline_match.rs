//! Plays a full 3v3 match between two random agents, no network needed.
//!
//! Run with: cargo run -p arbiter-client --example offline_match [weather]
//! Set RUST_LOG=arbiter_battle=debug for resolver detail.

use std::sync::Arc;

use anyhow::Result;
use arbiter_battle::{
    ChartOracle, Combatant, EntryFormat, FieldState, FormatRules, MoveCategory, MoveSlot, SideSetup,
    StatBlock, Type, Weather, create_match,
};
use arbiter_client::{Arena, ArenaConfig, RandomAgent};
use tracing_subscriber::EnvFilter;

fn member(species: &str, types: Vec<Type>, base: StatBlock, moves: Vec<MoveSlot>) -> Combatant {
    Combatant::new(species.to_lowercase(), species, 50, base)
        .with_types(types)
        .with_moves(moves)
}

fn team() -> Vec<Combatant> {
    vec![
        member(
            "Charizard",
            vec![Type::Fire, Type::Flying],
            StatBlock::new(78, 84, 78, 109, 85, 100),
            vec![
                MoveSlot::new("Flamethrower", Type::Fire, MoveCategory::Special, 90, 15),
                MoveSlot::new("Air Slash", Type::Flying, MoveCategory::Special, 75, 15),
            ],
        ),
        member(
            "Blastoise",
            vec![Type::Water],
            StatBlock::new(79, 83, 100, 85, 105, 78),
            vec![
                MoveSlot::new("Surf", Type::Water, MoveCategory::Special, 90, 15),
                MoveSlot::new("Ice Beam", Type::Ice, MoveCategory::Special, 90, 10),
            ],
        ),
        member(
            "Venusaur",
            vec![Type::Grass, Type::Poison],
            StatBlock::new(80, 82, 83, 100, 100, 80),
            vec![
                MoveSlot::new("Giga Drain", Type::Grass, MoveCategory::Special, 75, 10),
                MoveSlot::new("Sludge Bomb", Type::Poison, MoveCategory::Special, 90, 10),
            ],
        ),
        member(
            "Pikachu",
            vec![Type::Electric],
            StatBlock::new(35, 55, 40, 50, 50, 90),
            vec![
                MoveSlot::new("Thunderbolt", Type::Electric, MoveCategory::Special, 90, 15),
                MoveSlot::new("Quick Attack", Type::Normal, MoveCategory::Physical, 40, 30),
            ],
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rules = FormatRules::new().with_entry_format(EntryFormat::ThreeVsThree);
    let mut field = FieldState::new();
    if let Some(weather) = std::env::args().nth(1).and_then(|w| Weather::parse(&w)) {
        field = field.with_weather(weather);
    }
    let game = create_match(SideSetup::new("red", team()), SideSetup::new("blue", team()), rules)?
        .with_field(field);

    let mut arena = Arena::new(
        game,
        ChartOracle::new(),
        Arc::new(RandomAgent::seeded("red", 1)),
        Arc::new(RandomAgent::seeded("blue", 2)),
        ArenaConfig::new().with_seed(7),
    );

    loop {
        let report = arena.advance().await;
        for entry in &report.log_delta {
            println!("{entry}");
        }
        if report.result.is_terminal() {
            break;
        }
    }

    if let Some(record) = arena.record() {
        println!(
            "\n{} after {} turns (winner: {})",
            record.result,
            record.total_turns,
            record.winner_name().unwrap_or("none")
        );
    }
    Ok(())
}
