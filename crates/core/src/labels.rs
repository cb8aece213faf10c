//! Waste Category Labels
//!
//! The image classifier answers with one of a closed set of English tags.
//! This module maps those tags to the Korean names shown to children.

use serde::Serialize;

/// Every tag the classifier was trained on, with its display name.
pub const KNOWN_TAGS: [(&str, &str); 10] = [
    ("vinyl", "비닐류"),
    ("styrofoam", "스티로폼"),
    ("glass", "유리병"),
    ("clothes", "의류"),
    ("paper", "종이류"),
    ("can", "캔류"),
    ("computer", "컴퓨터"),
    ("battery", "폐건전지"),
    ("fluorescentlamp", "폐형광등"),
    ("plastic", "플라스틱류"),
];

/// Returns the display name for `tag`, or `tag` itself when it is not a known tag.
pub fn display_name(tag: &str) -> &str {
    KNOWN_TAGS
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, display)| *display)
        .unwrap_or(tag)
}

/// Whether `tag` is part of the classifier's vocabulary.
pub fn is_known(tag: &str) -> bool {
    KNOWN_TAGS.iter().any(|(known, _)| *known == tag)
}

/// A classifier tag paired with the name used in prompts and on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationLabel {
    pub tag: String,
    pub display: String,
}

impl ClassificationLabel {
    pub fn from_tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let display = display_name(&tag).to_string();
        Self { tag, display }
    }

    pub fn is_known(&self) -> bool {
        is_known(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_tag_maps_to_its_display_name() {
        let expected = [
            ("vinyl", "비닐류"),
            ("styrofoam", "스티로폼"),
            ("glass", "유리병"),
            ("clothes", "의류"),
            ("paper", "종이류"),
            ("can", "캔류"),
            ("computer", "컴퓨터"),
            ("battery", "폐건전지"),
            ("fluorescentlamp", "폐형광등"),
            ("plastic", "플라스틱류"),
        ];
        for (tag, display) in expected {
            assert_eq!(display_name(tag), display, "tag '{}'", tag);
            assert!(is_known(tag));
        }
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        assert_eq!(display_name("banana"), "banana");
        assert_eq!(display_name(""), "");
        // Lookup is case sensitive, like the classifier's tags.
        assert_eq!(display_name("Paper"), "Paper");
        assert!(!is_known("banana"));
    }

    #[test]
    fn test_classification_label_from_tag() {
        let label = ClassificationLabel::from_tag("can");
        assert_eq!(label.tag, "can");
        assert_eq!(label.display, "캔류");
        assert!(label.is_known());

        let unknown = ClassificationLabel::from_tag("rock");
        assert_eq!(unknown.display, "rock");
        assert!(!unknown.is_known());
    }
}
