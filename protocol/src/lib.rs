//! Wire format between the match engine and external decision agents
//!
//! A [`DecisionRequest`] describes one side's view of the match and the
//! kind of choice it must make. An agent answers with free text that
//! [`parse_reply`] turns into an [`AgentReply`]; when that fails,
//! [`scan_choice`] and [`scan_order`] scrape what they can.

use thiserror::Error;

pub mod reply;
pub mod request;
mod resource;
mod side;

pub use reply::{
    AgentReply, ReplyAction, ScannedChoice, parse_reply, scan_choice, scan_order,
};
pub use request::{
    ActiveView, BattleView, DecisionRequest, FieldView, MoveView, OpponentView, PreviewMember,
    RosterView, TaskKind, TeamPreview,
};
pub use resource::SpecialResource;
pub use side::SideId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplyError {
    #[error("Empty reply")]
    Empty,

    #[error("No JSON object in reply")]
    NoObject,

    #[error("Invalid reply JSON: {0}")]
    InvalidJson(String),
}
