//! Two chat-completions agents play a 1v1 match.
//!
//! Needs ARBITER_API_KEY (or GROQ_API_KEY). ARBITER_BASE_URL and
//! ARBITER_MODEL override the endpoint and model.
//!
//! Run with: cargo run -p arbiter-client --example llm_match

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arbiter_battle::{
    ChartOracle, Combatant, EntryFormat, FormatRules, MoveCategory, MoveSlot, SideSetup, StatBlock,
    Type, create_match,
};
use arbiter_client::{AgentConfig, Arena, ArenaConfig, ChatCompletionsAgent, RunOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let gengar = Combatant::new("gengar", "Gengar", 50, StatBlock::new(60, 65, 60, 130, 75, 110))
        .with_types(vec![Type::Ghost, Type::Poison])
        .with_moves(vec![
            MoveSlot::new("Shadow Ball", Type::Ghost, MoveCategory::Special, 80, 15),
            MoveSlot::new("Sludge Bomb", Type::Poison, MoveCategory::Special, 90, 10),
        ]);
    let alakazam = Combatant::new("alakazam", "Alakazam", 50, StatBlock::new(55, 50, 45, 135, 95, 120))
        .with_types(vec![Type::Psychic])
        .with_moves(vec![
            MoveSlot::new("Psychic", Type::Psychic, MoveCategory::Special, 90, 10),
            MoveSlot::new("Focus Blast", Type::Fighting, MoveCategory::Special, 120, 5),
        ]);

    let rules = FormatRules::new()
        .with_entry_format(EntryFormat::OneVsOne)
        .with_team_preview(false);
    let game = create_match(
        SideSetup::new("ghost", vec![gengar]),
        SideSetup::new("psychic", vec![alakazam]),
        rules,
    )?;

    let config = AgentConfig::from_env();
    let p1 = Arc::new(ChatCompletionsAgent::new(config.clone()).with_name("p1"));
    let p2 = Arc::new(ChatCompletionsAgent::new(config).with_name("p2"));

    let mut arena = Arena::new(
        game,
        ChartOracle::new(),
        p1,
        p2,
        ArenaConfig::new().with_decision_timeout(Duration::from_secs(60)),
    );

    // Ctrl-C stops the arena between turns
    let handle = arena.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    match arena.run().await {
        RunOutcome::Finished(outcome) => println!("finished: {outcome}"),
        RunOutcome::Aborted { turn } => println!("stopped on turn {turn}"),
    }

    for entry in arena.reasoning() {
        println!("[turn {} {}] {}", entry.turn, entry.side, entry.text);
    }
    if let Some(record) = arena.record() {
        println!("{}", record.to_json()?);
    }
    Ok(())
}
