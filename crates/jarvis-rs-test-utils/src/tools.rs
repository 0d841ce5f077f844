use async_trait::async_trait;
use jarvis_rs_tools::{Action, CommandError, CommandExecutor};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Executor with canned replies per action.
///
/// Actions without a reply fail with `ExecutionFailed`.
#[derive(Debug, Clone, Default)]
pub struct StubExecutor {
    replies: HashMap<Action, String>,
    executed: Arc<Mutex<Vec<Action>>>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, action: Action, reply: impl Into<String>) -> Self {
        self.replies.insert(action, reply.into());
        self
    }

    pub fn executed(&self) -> Vec<Action> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl CommandExecutor for StubExecutor {
    async fn execute(&self, action: Action) -> Result<String, CommandError> {
        self.executed.lock().push(action);
        self.replies
            .get(&action)
            .cloned()
            .ok_or_else(|| CommandError::ExecutionFailed(format!("no stub for {action}")))
    }
}
