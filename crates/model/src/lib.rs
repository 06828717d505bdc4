use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod env;
pub mod event;
pub mod lookup;
pub mod state;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Which upload started the workflow.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowTrigger {
    /// A JSON sidecar describing the source video was uploaded
    Metadata,
    /// The source video itself was uploaded
    Video,
}

impl FromStr for WorkflowTrigger {
    type Err = UnknownTrigger;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Metadata" => Ok(WorkflowTrigger::Metadata),
            "Video" => Ok(WorkflowTrigger::Video),
            other => Err(UnknownTrigger(other.to_string())),
        }
    }
}

impl Display for WorkflowTrigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowTrigger::Metadata => f.write_str("Metadata"),
            WorkflowTrigger::Video => f.write_str("Video"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownTrigger(pub String);

impl Display for UnknownTrigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown workflow trigger '{}'", self.0)
    }
}

impl std::error::Error for UnknownTrigger {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_parses_exact_names_only() {
        assert_eq!(Ok(WorkflowTrigger::Metadata), "Metadata".parse());
        assert_eq!(Ok(WorkflowTrigger::Video), "Video".parse());

        assert!("video".parse::<WorkflowTrigger>().is_err());
        assert!("".parse::<WorkflowTrigger>().is_err());
    }

    #[test]
    fn trigger_serializes_as_variant_name() {
        let json: String = serde_json::to_string(&WorkflowTrigger::Metadata).unwrap();

        assert_eq!("\"Metadata\"", json);
    }
}
