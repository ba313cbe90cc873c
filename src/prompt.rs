use colored::Colorize;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use std::borrow::Cow;

/// Line-editor prompt showing the active theme tag, if any.
#[derive(Clone, Default)]
pub struct ReplPrompt {
    tag: Option<String>,
}

impl ReplPrompt {
    pub fn new(tag: Option<&str>) -> Self {
        Self {
            tag: tag.map(str::to_string),
        }
    }

    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.tag = tag.map(str::to_string);
    }

    fn label(&self) -> String {
        match &self.tag {
            Some(tag) => format!("#{} φ>", tag),
            None => "φ>".to_string(),
        }
    }
}

impl Prompt for ReplPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.label().bright_green().bold().to_string() + " ")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("… ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_follows_tag() {
        let mut prompt = ReplPrompt::new(None);
        assert_eq!(prompt.label(), "φ>");

        prompt.set_tag(Some("ethics"));
        assert_eq!(prompt.label(), "#ethics φ>");
    }
}
