//! Page vocabulary
//!
//! Class names the host page uses to mark animatable regions and their
//! sub-elements, and the visual tokens this crate adds. The host page's
//! stylesheet defines what the tokens look like; we only toggle them.

/// Class marking the hero region that receives the parallax offset
pub const HERO_SECTION: &str = "hero-section";
/// Optional frame nested inside an image section
pub const IMAGE_CONTAINER: &str = "image-container";
/// Image placeholder inside an initiative section
pub const IMAGE_PLACEHOLDER: &str = "image-placeholder";
/// Text block inside an initiative section
pub const CONTENT_TEXT: &str = "content-text";
/// Content image that gets the `loaded` token
pub const CONTENT_IMAGE: &str = "content-image";
/// Navigation item with click feedback
pub const NAV_ITEM: &str = "nav-item";
/// Class targeted by the transient preload rule
pub const PRELOAD_ANIMATION: &str = "preload-animation";
/// Custom property published on the document root
pub const SCROLL_PROGRESS_PROPERTY: &str = "--scroll-progress";

/// Tags that carry text inside a revealed section
pub const TEXT_TAGS: &[&str] = &["p", "h2", "h3"];

/// Category tag of a trackable element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Content,
    Image,
    Quote,
    Initiative,
    Divider,
    Lessons,
}

impl Category {
    /// All categories in classification precedence order
    pub const ALL: [Category; 6] = [
        Category::Content,
        Category::Image,
        Category::Quote,
        Category::Initiative,
        Category::Divider,
        Category::Lessons,
    ];

    /// Class names of every category, in precedence order
    pub const CLASSES: &'static [&'static str] = &[
        "content-section",
        "image-section",
        "quote-section",
        "initiative-section",
        "section-divider",
        "lessons-section",
    ];

    /// The class that marks this category on the page
    pub fn class(self) -> &'static str {
        match self {
            Category::Content => "content-section",
            Category::Image => "image-section",
            Category::Quote => "quote-section",
            Category::Initiative => "initiative-section",
            Category::Divider => "section-divider",
            Category::Lessons => "lessons-section",
        }
    }

    /// Detect the category of an element given a class lookup
    ///
    /// First match wins when an element carries several tags.
    pub fn detect(has_class: impl Fn(&str) -> bool) -> Option<Category> {
        Self::ALL.into_iter().find(|category| has_class(category.class()))
    }
}

/// Visual state token added to an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualToken {
    FadeUp,
    FadeRight,
    ScaleIn,
    Loaded,
}

impl VisualToken {
    /// Class name the token is rendered as
    pub fn class(self) -> &'static str {
        match self {
            VisualToken::FadeUp => "animate-fade-up",
            VisualToken::FadeRight => "animate-fade-right",
            VisualToken::ScaleIn => "animate-scale-in",
            VisualToken::Loaded => "loaded",
        }
    }
}

/// Element selector understood by every page host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Elements carrying a class
    Class(&'static str),
    /// Elements carrying any of the classes
    AnyClass(&'static [&'static str]),
    /// Elements with one of the tag names
    Tags(&'static [&'static str]),
    /// Links, buttons and anything with a non-negative tab index
    Focusable,
}

impl Selector {
    /// Every animatable region
    pub const ANIMATABLE: Selector = Selector::AnyClass(Category::CLASSES);
    /// Text-bearing descendants
    pub const TEXT: Selector = Selector::Tags(TEXT_TAGS);
    /// Image frames that react to hover
    pub const IMAGE_FRAMES: Selector = Selector::AnyClass(&[IMAGE_CONTAINER, IMAGE_PLACEHOLDER]);

    /// CSS selector text for DOM hosts
    pub fn to_css(&self) -> String {
        match self {
            Selector::Class(class) => format!(".{class}"),
            Selector::AnyClass(classes) => classes
                .iter()
                .map(|class| format!(".{class}"))
                .collect::<Vec<_>>()
                .join(", "),
            Selector::Tags(tags) => tags.join(", "),
            Selector::Focusable => "a, button, [tabindex]:not([tabindex=\"-1\"])".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_first_match_wins() {
        let classes = ["quote-section", "content-section"];
        let detected = Category::detect(|class| classes.contains(&class));
        assert_eq!(detected, Some(Category::Content));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(Category::detect(|class| class == "hero-section"), None);
    }

    #[test]
    fn test_classes_follow_precedence() {
        let from_all: Vec<_> = Category::ALL.iter().map(|c| c.class()).collect();
        assert_eq!(from_all, Category::CLASSES);
    }

    #[test]
    fn test_selector_css() {
        assert_eq!(Selector::TEXT.to_css(), "p, h2, h3");
        assert_eq!(
            Selector::IMAGE_FRAMES.to_css(),
            ".image-container, .image-placeholder"
        );
        assert_eq!(Selector::Class(NAV_ITEM).to_css(), ".nav-item");
    }
}
