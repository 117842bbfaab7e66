//! Agent replies
//!
//! Agents answer with a small JSON object. Models are sloppy about it, so
//! parsing tolerates code fences, prose around the object, alternate key
//! names and numbers sent as strings. When the object cannot be parsed at
//! all, [`scan_choice`] and [`scan_order`] pick what they can out of the raw
//! text.

mod extract;
mod tests;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{ReplyError, SpecialResource};

pub use extract::{ScannedChoice, scan_choice, scan_order};

/// Action kind named in a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyAction {
    Move,
    Switch,
}

impl ReplyAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" | "attack" | "m" | "use" | "fight" => Some(ReplyAction::Move),
            "switch" | "s" | "swap" => Some(ReplyAction::Switch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyAction::Move => "move",
            ReplyAction::Switch => "switch",
        }
    }
}

/// A decoded agent reply
///
/// Every field is optional; whether a reply is usable depends on the task
/// it answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    /// Short justification
    #[serde(
        default,
        alias = "reasoning",
        alias = "reason",
        alias = "justification",
        deserialize_with = "lenient_text"
    )]
    pub why: Option<String>,

    /// "move" or "switch"
    #[serde(
        default,
        alias = "action",
        alias = "type",
        alias = "kind",
        deserialize_with = "lenient_text"
    )]
    pub act: Option<String>,

    /// 1-based move slot or entry index
    #[serde(default, alias = "index", alias = "choice", deserialize_with = "lenient_index")]
    pub idx: Option<i64>,

    /// Team preview order, e.g. "213456" or [2,1,3]
    #[serde(default, alias = "team", deserialize_with = "lenient_order")]
    pub order: Option<String>,

    #[serde(default, alias = "terastallize", deserialize_with = "lenient_bool")]
    pub tera: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub dynamax: bool,

    #[serde(default, alias = "z", deserialize_with = "lenient_bool")]
    pub zmove: bool,

    #[serde(default, alias = "megaevolve", deserialize_with = "lenient_bool")]
    pub mega: bool,

    /// Alternative to the boolean flags: the resource named as a string
    #[serde(default, alias = "gimmick", deserialize_with = "lenient_text")]
    pub special: Option<String>,
}

impl AgentReply {
    /// The action kind, if the reply names a recognizable one
    pub fn action(&self) -> Option<ReplyAction> {
        self.act.as_deref().and_then(ReplyAction::parse)
    }

    /// Justification text, trimmed, or empty
    pub fn justification(&self) -> &str {
        self.why.as_deref().map(str::trim).unwrap_or("")
    }

    /// Digits of the preview order as 1-based indices (non-digits stripped)
    pub fn order_indices(&self) -> Vec<usize> {
        self.order
            .as_deref()
            .map(digits_of)
            .unwrap_or_default()
    }

    /// The special resource requested with this action, if any
    ///
    /// Only one resource may be invoked per turn; when several flags are set
    /// the first in [`SpecialResource::ALL`] order wins.
    pub fn special_resource(&self) -> Option<SpecialResource> {
        let flags = [self.tera, self.dynamax, self.zmove, self.mega];
        SpecialResource::ALL
            .into_iter()
            .zip(flags)
            .find_map(|(resource, set)| set.then_some(resource))
            .or_else(|| self.special.as_deref().and_then(SpecialResource::parse))
    }
}

/// Parse an agent reply out of raw model output
///
/// Strips markdown fences and any prose around the outermost JSON object.
pub fn parse_reply(raw: &str) -> Result<AgentReply, ReplyError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ReplyError::Empty);
    }

    let start = text.find('{').ok_or(ReplyError::NoObject)?;
    let end = text.rfind('}').ok_or(ReplyError::NoObject)?;
    if end < start {
        return Err(ReplyError::NoObject);
    }

    serde_json::from_str(&text[start..=end]).map_err(|e| ReplyError::InvalidJson(e.to_string()))
}

pub(crate) fn digits_of(s: &str) -> Vec<usize> {
    s.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as usize)
        .collect()
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .skip_while(|c| !c.is_ascii_digit() && *c != '-')
                .take_while(|c| c.is_ascii_digit() || *c == '-')
                .collect();
            digits.parse().ok()
        }
        _ => None,
    })
}

fn lenient_order<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<String>(),
        ),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    })
}
