//! Tag Suggestions
//!
//! Static vocabulary filtered by substring as the user types. Input may hold
//! several `;`-separated tags; suggestions follow the segment being typed.

/// Suggestions shown for a non-empty query
pub const MAX_SUGGESTIONS: usize = 8;
/// Entries shown before the user types anything
pub const DEFAULT_SUGGESTIONS: usize = 10;

/// Built-in tag vocabulary, in display order
pub const DEFAULT_TAG_VOCABULARY: &[&str] = &[
    "React",
    "TypeScript",
    "JavaScript",
    "Node.js",
    "Python",
    "Rust",
    "Go",
    "AI",
    "Machine Learning",
    "Open Source",
    "SaaS",
    "Mobile",
    "Web",
    "API",
    "Database",
    "Supabase",
    "PostgreSQL",
    "Tailwind",
    "Next.js",
    "React Native",
    "Vue",
    "Svelte",
    "Docker",
    "DevOps",
    "Automation",
    "Productivity",
    "Finance",
    "Health",
    "Education",
    "Games",
    "Side Project",
    "Client Work",
];

/// Ordered, case-insensitively unique tag vocabulary
#[derive(Debug, Clone)]
pub struct TagIndex {
    vocabulary: Vec<String>,
}

impl Default for TagIndex {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_VOCABULARY.iter().copied())
    }
}

impl TagIndex {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self { vocabulary: Vec::new() };
        index.extend(vocabulary);
        index
    }

    /// Append tags not already present, keeping existing order first
    pub fn extend<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag: String = tag.into();
            let tag = tag.trim();
            if tag.is_empty() || self.contains(tag) {
                continue;
            }
            self.vocabulary.push(tag.to_string());
        }
    }

    /// Built-in vocabulary followed by tags already used on projects
    pub fn vocabulary_with<'a>(used: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::default();
        index.extend(used);
        index
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.vocabulary.iter().any(|t| same_tag(t, tag))
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// First ten entries for empty input, otherwise up to eight substring matches
    pub fn suggest(&self, input: &str) -> Vec<&str> {
        let query = input.trim().to_lowercase();
        if query.is_empty() {
            return self
                .vocabulary
                .iter()
                .take(DEFAULT_SUGGESTIONS)
                .map(String::as_str)
                .collect();
        }

        self.vocabulary
            .iter()
            .filter(|tag| tag.to_lowercase().contains(&query))
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    /// Suggest for the segment after the last `;`, hiding tags already entered
    pub fn suggest_for_input(&self, input: &str) -> Vec<&str> {
        let entered = split_tag_input(input);
        let segment = current_segment(input);
        self.suggest(segment)
            .into_iter()
            .filter(|tag| {
                !entered
                    .iter()
                    .any(|e| same_tag(e, tag) && !same_tag(e, segment))
            })
            .collect()
    }
}

/// Tag equality ignoring case, with the same Unicode folding search uses
pub fn same_tag(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Text after the last semicolon
pub fn current_segment(input: &str) -> &str {
    input.rsplit(';').next().unwrap_or("").trim()
}

/// Split `a; b;;c` into trimmed tags, dropping empties and case-insensitive repeats
pub fn split_tag_input(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        if !tags.iter().any(|t| same_tag(t, tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_first_ten() {
        let index = TagIndex::default();
        let suggestions = index.suggest("");
        assert_eq!(suggestions, DEFAULT_TAG_VOCABULARY[..10].to_vec());
        assert_eq!(index.suggest("   ").len(), 10);
    }

    #[test]
    fn test_react_query() {
        let index = TagIndex::default();
        let suggestions = index.suggest("react");
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        assert!(suggestions.iter().any(|t| t.eq_ignore_ascii_case("react")));
        assert_eq!(suggestions, vec!["React", "React Native"]);
    }

    #[test]
    fn test_caps_at_eight_in_vocabulary_order() {
        let index = TagIndex::new((1..=20).map(|i| format!("tag{}", i)));
        let suggestions = index.suggest("TAG");
        assert_eq!(suggestions.len(), 8);
        assert_eq!(suggestions[0], "tag1");
        assert_eq!(suggestions[7], "tag8");
    }

    #[test]
    fn test_vocabulary_is_deduplicated() {
        let index = TagIndex::vocabulary_with(["rust", "homelab", "Homelab", " "]);
        assert_eq!(index.vocabulary().len(), DEFAULT_TAG_VOCABULARY.len() + 1);
        assert_eq!(index.vocabulary().last().unwrap(), "homelab");
    }

    #[test]
    fn test_segment_helpers() {
        assert_eq!(current_segment("rust; rea"), "rea");
        assert_eq!(current_segment("rea"), "rea");
        assert_eq!(split_tag_input(" rust; ;Rust;web "), vec!["rust", "web"]);
        assert_eq!(split_tag_input("Ärger; ärger"), vec!["Ärger"]);
        assert!(same_tag("ÄRGER", "ärger"));
    }

    #[test]
    fn test_suggest_for_input_hides_entered_tags() {
        let index = TagIndex::default();
        let suggestions = index.suggest_for_input("React; rea");
        assert_eq!(suggestions, vec!["React Native"]);
    }
}
