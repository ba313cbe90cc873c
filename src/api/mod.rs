pub mod openai;
pub mod types;
pub mod utils;

pub use openai::OpenAIClient;

use crate::error::Result;

/// Produces text for a prompt.
///
/// Failures come back as `Err` so callers can keep their state untouched;
/// nothing is retried.
#[allow(async_fn_in_trait)]
pub trait Generator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Wraps the user's idea in the instruction sent to the model.
pub fn philosopher_prompt(user_input: &str) -> String {
    format!(
        "You are an AI philosopher. Based on the following idea, generate an original and coherent philosophical concept or argument.\n\
         It must be authentic, non-derivative, and titled.\n\n\
         User input: {}",
        user_input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_input_verbatim() {
        let prompt = philosopher_prompt("  Does free will exist?\nMaybe.");
        assert!(prompt.starts_with("You are an AI philosopher."));
        assert!(prompt.ends_with("User input:   Does free will exist?\nMaybe."));
        assert!(prompt.contains("titled"));
    }
}
