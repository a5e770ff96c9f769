use serde_json::Value;
use std::str::FromStr;

use crate::error::SahayakError;
use crate::router::ChatTurn;

/// The fixed assistants exposed over HTTP. They differ only in the system
/// prompt and in how the user's input is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Health,
    Agriculture,
    Finance,
    General,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Health,
        Persona::Agriculture,
        Persona::Finance,
        Persona::General,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Persona::Health => "health",
            Persona::Agriculture => "agriculture",
            Persona::Finance => "finance",
            Persona::General => "general",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Persona::Health => "/api/health",
            Persona::Agriculture => "/api/agriculture",
            Persona::Finance => "/api/finance",
            Persona::General => "/api/general",
        }
    }

    /// JSON field of the request body carrying the user's input
    pub fn request_field(&self) -> &'static str {
        match self {
            Persona::Health => "symptoms",
            Persona::Agriculture => "context",
            Persona::Finance => "budgetDetails",
            Persona::General => "message",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Health => {
                "You are a medical assistant. Provide basic triage and advice with disclaimer."
            }
            Persona::Agriculture => {
                "You are an agriculture expert. Provide planting and pest control tips."
            }
            Persona::Finance => "You are a financial advisor. Suggest plans and cost-saving tips.",
            Persona::General => "You are a helpful AI assistant.",
        }
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            Persona::Health => Some("Patient symptoms"),
            Persona::Agriculture => Some("Context"),
            Persona::Finance => Some("Budget details"),
            Persona::General => None,
        }
    }

    /// System turn followed by the (labelled) user turn
    pub fn conversation(&self, input: &str) -> Vec<ChatTurn> {
        let content = match self.label() {
            Some(label) => format!("{}: {}", label, input),
            None => input.to_string(),
        };
        vec![ChatTurn::system(self.system_prompt()), ChatTurn::user(content)]
    }

    /// Build the conversation from a request body. A missing or null field
    /// is treated as empty input; non-string values are sent as JSON text.
    pub fn conversation_from_body(&self, body: &Value) -> Vec<ChatTurn> {
        let input = match body.get(self.request_field()) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        self.conversation(&input)
    }
}

impl FromStr for Persona {
    type Err = SahayakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|persona| persona.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SahayakError::UnknownPersona(s.to_string()))
    }
}
