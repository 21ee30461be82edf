//! Change model for the JSON plan export.
//!
//! Field names mirror the machine-readable export of the infrastructure tool
//! exactly. Decoding is deliberately lenient below the top level: identifiers
//! of the wrong JSON type are stringified instead of failing the whole plan.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::result::{Error, Result};

/// A decoded plan document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanDocument {
    /// Planned changes to managed resources.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_changes: Vec<ResourceChange>,
    /// Changes detected outside of the tool since the last run.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_drift: Vec<ResourceChange>,
    /// Whether the planning run reported errors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errored: bool,
    /// Whether the plan can be applied.
    #[serde(default)]
    pub applyable: Option<bool>,
    /// Whether applying the plan is expected to converge.
    #[serde(default)]
    pub complete: Option<bool>,
}

/// One resource entry of `resource_changes` or `resource_drift`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceChange {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// `managed` or `data`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub previous_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub action_reason: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub change: Change,
}

/// The before/after payload of a resource entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub before: Value,
    #[serde(default)]
    pub after: Value,
    /// Parallel tree of booleans marking `after` leaves unknown until apply.
    #[serde(default)]
    pub after_unknown: Value,
}

/// A single action tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
    /// A tag this viewer does not know, kept verbatim.
    Other(String),
}

impl Action {
    /// The tag as it appears in the export.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Action {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "no-op" => Self::NoOp,
            "create" => Self::Create,
            "read" => Self::Read,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Other(tag),
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        lenient_string(deserializer).map(Self::from)
    }
}

/// Classification of a node by the kind of change it represents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Create,
    Update,
    Destroy,
    Replace,
    Move,
    Drift,
    #[default]
    NoOp,
    /// Raw action tags joined with `/` when no known combination applies.
    Other(String),
}

impl ChangeType {
    /// Classify a resource from its action tags.
    pub fn classify(actions: &[Action]) -> Self {
        let has = |wanted: Action| actions.iter().any(|a| *a == wanted);
        if actions.iter().all(|a| *a == Action::NoOp) {
            Self::NoOp
        } else if has(Action::Create) && has(Action::Delete) {
            Self::Replace
        } else if has(Action::Create) {
            Self::Create
        } else if has(Action::Delete) {
            Self::Destroy
        } else if has(Action::Update) {
            Self::Update
        } else {
            let joined: Vec<&str> = actions.iter().map(Action::as_str).collect();
            Self::Other(joined.join("/"))
        }
    }

    /// Diff marker printed in front of a line of this type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Destroy => "-",
            Self::Update | Self::Drift | Self::Move => "~",
            Self::Replace => "-/+",
            Self::Other(tag) if tag == "read" => "<=",
            Self::NoOp | Self::Other(_) => " ",
        }
    }

    /// Past participle used in resource headers ("will be created").
    pub fn past_participle(&self) -> Cow<'_, str> {
        match self {
            Self::Create => "created".into(),
            Self::Update => "updated".into(),
            Self::Destroy => "destroyed".into(),
            Self::Replace => "replaced".into(),
            Self::Move => "moved".into(),
            Self::Drift => "drifted".into(),
            Self::NoOp => "left unchanged".into(),
            Self::Other(tag) if tag == "read" => "read".into(),
            Self::Other(tag) => format!("{tag}d").into(),
        }
    }

    /// Short label used in drift headers and logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Drift => "drift",
            Self::NoOp => "no-op",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ResourceChange {
    pub fn change_type(&self) -> ChangeType {
        ChangeType::classify(&self.change.actions)
    }

    /// True when the entry carries nothing to show (only `no-op`, or no tags at all).
    pub fn is_no_op(&self) -> bool {
        self.change.actions.iter().all(|a| *a == Action::NoOp)
    }

    /// The address this resource moved from, if it moved.
    pub fn moved_from(&self) -> Option<&str> {
        self.previous_address
            .as_deref()
            .filter(|prev| !prev.is_empty() && *prev != self.address)
    }

    pub fn is_data_source(&self) -> bool {
        self.mode == "data"
    }
}

/// Human phrase for an `action_reason`; unknown reasons pass through verbatim.
pub fn action_reason_phrase(reason: &str) -> &str {
    match reason {
        "replace_because_tainted" => "tainted, so must be replaced",
        "replace_because_cannot_update" => "cannot be updated in-place",
        "replace_by_request" => "replacement requested",
        "delete_because_no_resource_config" => "no resource configuration found",
        "delete_because_no_module" => "containing module is gone",
        "delete_because_wrong_repetition" => "wrong repetition mode",
        "delete_because_count_index" => "count index out of range",
        "delete_because_each_key" => "for_each key not found",
        "read_because_config_unknown" => "configuration contains unknown values",
        "read_because_dependency_pending" => "has pending dependent resources",
        other => other,
    }
}

/// Decode plan text into a [`PlanDocument`].
pub fn decode_plan(text: &str) -> Result<PlanDocument> {
    Ok(serde_json::from_str(text)?)
}

/// Read a plan file from disk.
pub fn read_plan_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.display().to_string(),
        source,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(stringify(Value::deserialize(deserializer)?))
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(stringify(other)),
    })
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => {
            tracing::warn!("expected a string in plan entry, got {other}");
            other.to_string()
        }
    }
}
