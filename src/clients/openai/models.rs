#[derive(Debug, Clone, PartialEq, Default)]
pub enum OpenAIModel {
    Gpt4o,
    #[default]
    Gpt4oMini,
    Gpt41Mini,
    Gpt35Turbo,
    Override(String),
}

impl OpenAIModel {
    pub fn id(&self) -> &str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt41Mini => "gpt-4.1-mini",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Override(s) => s.as_str(),
        }
    }

    /// Map a model id to a known variant, keeping unknown ids as overrides.
    pub fn from_id(id: &str) -> Self {
        match id {
            "gpt-4o" => Self::Gpt4o,
            "gpt-4o-mini" => Self::Gpt4oMini,
            "gpt-4.1-mini" => Self::Gpt41Mini,
            "gpt-3.5-turbo" => Self::Gpt35Turbo,
            other => Self::Override(other.to_string()),
        }
    }
}
