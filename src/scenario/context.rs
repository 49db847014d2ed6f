#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    NotStarted,
    Running,
    Passed,
    Failed,
}

/// Diagnostic payload captured during a scenario, e.g. a failure screenshot.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Ephemeral state for one scenario execution. Created at scenario start,
/// dropped once the after-hooks are done.
#[derive(Debug)]
pub struct ScenarioContext {
    pub name: String,
    pub tags: Vec<String>,
    pub status: ScenarioStatus,
    pub attachments: Vec<Attachment>,
    pub failure: Option<String>,
}

impl ScenarioContext {
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            status: ScenarioStatus::NotStarted,
            attachments: Vec::new(),
            failure: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn attach(
        &mut self,
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: Vec<u8>,
    ) {
        self.attachments.push(Attachment {
            name: name.into(),
            media_type: media_type.into(),
            data,
        });
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = ScenarioStatus::Failed;
        self.failure = Some(reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_tags_and_attachments() {
        let mut ctx = ScenarioContext::new("First page count", vec!["flaky".to_string()]);
        assert!(ctx.has_tag("flaky"));
        assert!(!ctx.has_tag("dynamic"));

        ctx.attach("failure.png", "image/png", vec![1, 2, 3]);
        assert_eq!(ctx.attachments.len(), 1);
        assert_eq!(ctx.attachments[0].media_type, "image/png");
    }

    #[test]
    fn failure_keeps_the_first_reason_visible() {
        let mut ctx = ScenarioContext::new("Login", vec![]);
        ctx.mark_failed("element not found");
        assert_eq!(ctx.status, ScenarioStatus::Failed);
        assert_eq!(ctx.failure.as_deref(), Some("element not found"));
    }
}
