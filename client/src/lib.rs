//! Async driver for LLM-vs-LLM battles
//!
//! An [`Arena`] owns one [`Match`](arbiter_battle::Match), a mechanics
//! oracle and two [`DecisionAgent`]s. Each [`Arena::advance`] asks the
//! agents for whatever the match needs next and applies the answers.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arbiter_battle::{ChartOracle, FormatRules, SideSetup, create_match};
//! use arbiter_client::{AgentConfig, Arena, ArenaConfig, ChatCompletionsAgent};
//!
//! # async fn demo(p1: SideSetup, p2: SideSetup) -> anyhow::Result<()> {
//! let game = create_match(p1, p2, FormatRules::default())?;
//! let agent = Arc::new(ChatCompletionsAgent::new(AgentConfig::from_env()));
//!
//! let mut arena = Arena::new(game, ChartOracle::new(), agent.clone(), agent, ArenaConfig::new());
//! let outcome = arena.run().await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod adapter;
mod agent;
mod archive;
mod arena;
mod config;
mod handle;
mod llm;
mod scripted;

pub use adapter::DecisionAdapter;
pub use agent::{AgentError, DecisionAgent};
pub use archive::{MatchRecord, ReasoningEntry};
pub use arena::{AdvanceReport, Arena, RunOutcome};
pub use config::{AgentConfig, ArenaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, RetryPolicy};
pub use handle::{ArenaHandle, ArenaState};
pub use llm::ChatCompletionsAgent;
pub use scripted::{RandomAgent, ScriptedAgent};

pub use arbiter_protocol::{DecisionRequest, SideId, TaskKind};
