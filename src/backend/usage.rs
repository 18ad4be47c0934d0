/// Token counts reported by the provider for one call.
///
/// Carried alongside results for monitoring; nothing in the extraction or
/// aggregation logic depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    /// The model that served the request
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tokens() {
        let usage = TokenUsage::new("gpt-4o", 1200, 85);
        assert_eq!(usage.total_tokens(), 1285);
    }
}
