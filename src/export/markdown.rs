use super::SESSION_TITLE;
use crate::history::HistoryEntry;

/// Renders the session oldest-first. Entry text is copied verbatim; output
/// that already contains Markdown is left for the reader to interpret.
pub fn render(entries: &[HistoryEntry]) -> String {
    let mut md = format!("# {}\n\n", SESSION_TITLE);
    for entry in entries {
        md.push_str(&format!("## {}\n", entry.heading()));
        md.push_str(&format!("**Input:** {}\n\n", entry.input));
        md.push_str(&format!("**Output:**\n{}\n\n", entry.output));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

    fn sample() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::new(
                "2024-01-01 10:00",
                "Does free will exist?",
                "Concept: Bounded Will...",
                Some("metaphysics".to_string()),
            ),
            HistoryEntry::new(
                "2024-01-01 10:05",
                "Is lying ever right?",
                "### The Kind Lie\n\n- first\n- second",
                None,
            ),
            HistoryEntry::new("2024-01-01 10:09", "What is time?", "Duration.", Some("ethics".to_string())),
        ]
    }

    fn second_level_headings(md: &str) -> Vec<String> {
        let mut headings = Vec::new();
        let mut current: Option<String> = None;
        for event in Parser::new(md) {
            match event {
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H2,
                    ..
                }) => current = Some(String::new()),
                Event::Text(text) => {
                    if let Some(heading) = current.as_mut() {
                        heading.push_str(&text);
                    }
                }
                Event::End(TagEnd::Heading(HeadingLevel::H2)) => {
                    headings.extend(current.take());
                }
                _ => {}
            }
        }
        headings
    }

    #[test]
    fn test_known_example() {
        let md = render(&sample()[..1]);
        assert!(md.starts_with("# AI Philosophy Session\n\n"));
        assert!(md.contains("## 2024-01-01 10:00 - metaphysics"));
        assert!(md.contains("**Input:** Does free will exist?"));
        assert!(md.contains("**Output:**\nConcept: Bounded Will..."));
    }

    #[test]
    fn test_exact_layout() {
        let entries = vec![HistoryEntry::new("2024-01-01 10:00", "q", "a\nb", None)];
        assert_eq!(
            render(&entries),
            "# AI Philosophy Session\n\n## 2024-01-01 10:00 - untagged\n**Input:** q\n\n**Output:**\na\nb\n\n"
        );
    }

    #[test]
    fn test_one_section_per_entry_in_order() {
        let headings = second_level_headings(&render(&sample()));
        assert_eq!(
            headings,
            vec![
                "2024-01-01 10:00 - metaphysics",
                "2024-01-01 10:05 - untagged",
                "2024-01-01 10:09 - ethics",
            ]
        );
    }

    #[test]
    fn test_output_is_not_escaped() {
        let md = render(&sample());
        assert!(md.contains("### The Kind Lie\n\n- first\n- second"));
    }

    #[test]
    fn test_deterministic() {
        let entries = sample();
        assert_eq!(render(&entries), render(&entries));
    }
}
