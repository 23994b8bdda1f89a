use serde::{Deserialize, Serialize};
use tracing::debug;

/// Instruction sent ahead of every transcript
pub const SYSTEM_PROMPT: &str = r#"You are a task management assistant. Parse the user's voice command and return a JSON object with the following structure:
{
  "action": "create" | "update" | "complete" | "delete" | "createGroup" | "unknown",
  "taskTitle": "string (for create/update actions)",
  "taskDescription": "string (optional, for create/update actions)",
  "groupName": "string (for createGroup action)",
  "targetId": "string (task or group identifier if mentioned)"
}

Examples:
- "Create a task to buy groceries" -> {"action": "create", "taskTitle": "buy groceries"}
- "Add a new task call mom with a reminder to ask about dinner" -> {"action": "create", "taskTitle": "call mom", "taskDescription": "ask about dinner"}
- "Mark buy groceries as complete" -> {"action": "complete", "taskTitle": "buy groceries"}
- "Delete the task buy groceries" -> {"action": "delete", "taskTitle": "buy groceries"}
- "Create a group called work tasks" -> {"action": "createGroup", "groupName": "work tasks"}

Only return valid JSON, no explanations."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoiceAction {
    Create,
    Update,
    Complete,
    Delete,
    CreateGroup,
    #[serde(other)]
    Unknown,
}

/// Structured intent extracted from an utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCommand {
    pub action: VoiceAction,
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
}

impl VoiceCommand {
    pub fn unknown() -> Self {
        Self {
            action: VoiceAction::Unknown,
            task_title: None,
            task_description: None,
            group_name: None,
            target_id: None,
        }
    }
}

/// Parse the assistant's reply. Anything that isn't the expected object
/// becomes `unknown`.
pub fn parse_intent(content: &str) -> VoiceCommand {
    match serde_json::from_str::<VoiceCommand>(content.trim()) {
        Ok(command) => command,
        Err(e) => {
            debug!(error = %e, "intent reply was not a command object");
            VoiceCommand::unknown()
        }
    }
}
