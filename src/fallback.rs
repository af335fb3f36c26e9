//! Topic-parameterized stand-in questions for short pools.

use crate::bank::Category;

const SURVEY_TEMPLATES: &[&str] = &[
    "Tell me about your experience with {topic}. How did you first get involved, and what do you usually do?",
    "When was the last time you dealt with {topic}? Describe what happened from beginning to end.",
    "Describe a memorable moment related to {topic}. What made it so special?",
    "How has your interest in {topic} changed over the years? Compare the past and the present.",
    "Who do you usually share {topic} with? Tell me about them in as much detail as possible.",
];

const ROLE_PLAY_TEMPLATES: &[&str] = &[
    "I'd like to give you a situation and ask you to act it out. The situation is about {topic}. Call the person involved and ask three or four questions to get the information you need.",
    "There is a problem related to {topic} that you need to resolve. Leave a message explaining the situation and offer two or three alternatives.",
    "Have you ever experienced a situation like {topic} yourself? Tell me what happened and how you handled it.",
    "Imagine a friend asks you for advice about {topic}. Explain what they should do and why.",
];

const RANDOM_TEMPLATES: &[&str] = &[
    "Let's talk about {topic}. What do people in your country typically think about {topic}?",
    "How has {topic} changed compared to when you were younger? Give me specific examples.",
    "Tell me about a recent news story or issue related to {topic}. Why did it catch your attention?",
    "What concerns or questions do people have about {topic} these days? Explain in detail.",
];

fn templates(category: Category) -> &'static [&'static str] {
    match category {
        Category::Survey => SURVEY_TEMPLATES,
        Category::RolePlay => ROLE_PLAY_TEMPLATES,
        Category::RandomQuestion => RANDOM_TEMPLATES,
    }
}

/// How many distinct fallback questions `category` can produce.
pub fn capacity(category: Category) -> usize {
    templates(category).len()
}

/// The first `min(n, capacity)` templates of `category` with `topic` filled in.
pub fn fallback(category: Category, topic: &str, n: usize) -> Vec<String> {
    templates(category)
        .iter()
        .take(n)
        .map(|t| t.replace("{topic}", topic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_topic_and_is_stable() {
        let a = fallback(Category::Survey, "yoga", 3);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|q| q.contains("yoga") && !q.contains("{topic}")));
        assert_eq!(a, fallback(Category::Survey, "yoga", 3));
    }

    #[test]
    fn capped_at_template_count() {
        for category in Category::ALL {
            assert_eq!(fallback(category, "x", 100).len(), capacity(category));
        }
        assert!(fallback(Category::RolePlay, "x", 0).is_empty());
    }

    #[test]
    fn templates_within_a_category_are_distinct() {
        for category in Category::ALL {
            let qs = fallback(category, "weather", capacity(category));
            let unique: std::collections::HashSet<_> = qs.iter().collect();
            assert_eq!(unique.len(), qs.len());
        }
    }
}
