use serde::{Deserialize, Serialize};

pub const GREETING_REPLY: &str =
    "Hi — I'm Ndawonga assistant. Ask about tenders, projects, certificates, or request a quote.";
pub const PROJECTS_REPLY: &str =
    "You can view our projects on the Projects page or request a quote there.";
pub const CERTIFICATES_REPLY: &str =
    "Certificates are in the Documents area. For official copies submit a contact request.";
pub const NO_TENDERS_REPLY: &str = "No active tenders currently.";
pub const TENDERS_HEADER: &str = "Current tenders:";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Tenders,
    Projects,
    Certificates,
    Greeting,
}

impl ChatIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tenders => "tenders",
            Self::Projects => "projects",
            Self::Certificates => "certificates",
            Self::Greeting => "greeting",
        }
    }

    /// Reply text for intents that need no lookup.
    pub fn static_reply(self) -> Option<&'static str> {
        match self {
            Self::Tenders => None,
            Self::Projects => Some(PROJECTS_REPLY),
            Self::Certificates => Some(CERTIFICATES_REPLY),
            Self::Greeting => Some(GREETING_REPLY),
        }
    }
}

/// Matches when the lowercased message contains any keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRule {
    pub intent: ChatIntent,
    pub keywords: &'static [&'static str],
}

impl ChatRule {
    pub const fn new(intent: ChatIntent, keywords: &'static [&'static str]) -> Self {
        Self { intent, keywords }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Ordered rule list, highest priority first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRules {
    rules: Vec<ChatRule>,
}

impl Default for ChatRules {
    fn default() -> Self {
        Self::new(vec![
            ChatRule::new(ChatIntent::Tenders, &["tender"]),
            ChatRule::new(ChatIntent::Projects, &["project"]),
            ChatRule::new(ChatIntent::Certificates, &["bbbee", "certificate", "cidb"]),
        ])
    }
}

impl ChatRules {
    pub fn new(rules: Vec<ChatRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ChatRule] {
        &self.rules
    }

    /// First matching rule wins; no match is a greeting.
    pub fn classify(&self, message: &str) -> ChatIntent {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(ChatIntent::Greeting, |rule| rule.intent)
    }
}
