//! Reveal routine selection

use reveal_core::vocab::IMAGE_CONTAINER;
use reveal_core::{Category, PageHost, Selector};

/// What to do with a newly visible element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealRoutine<N> {
    /// Stagger fade-up over the section's text
    StaggeredText,
    /// Scale-in on `target` (the nested image container, or the element)
    ScaleIn { target: N },
    /// Fade-up on the element itself
    FadeUp,
    /// Stagger text blocks and images of an initiative section
    Composite,
    /// Fade-right on the element itself
    FadeRight,
    /// No dedicated routine
    Skip,
}

/// Pick the reveal routine for `node`
pub fn classify<H: PageHost>(host: &H, node: &H::Node) -> RevealRoutine<H::Node> {
    match Category::detect(|class| host.has_class(node, class)) {
        Some(Category::Content) => RevealRoutine::StaggeredText,
        Some(Category::Image) => {
            let target = host
                .select_first(Some(node), Selector::Class(IMAGE_CONTAINER))
                .unwrap_or_else(|| node.clone());
            RevealRoutine::ScaleIn { target }
        }
        Some(Category::Quote) => RevealRoutine::FadeUp,
        Some(Category::Initiative) => RevealRoutine::Composite,
        Some(Category::Divider) => RevealRoutine::FadeRight,
        // Lessons sections are observed but have no animation of their own.
        Some(Category::Lessons) | None => RevealRoutine::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{Element, PageTree, Size};

    fn page() -> PageTree {
        PageTree::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn test_image_prefers_nested_container() {
        let mut page = page();
        let section = page.append(page.root(), Element::new("div").class("image-section"));
        let wrapper = page.append(section, Element::new("div"));
        let frame = page.append(wrapper, Element::new("div").class(IMAGE_CONTAINER));
        page.append(section, Element::new("div").class(IMAGE_CONTAINER));

        assert_eq!(
            classify(&page, &section),
            RevealRoutine::ScaleIn { target: frame }
        );
    }

    #[test]
    fn test_image_without_container_targets_itself() {
        let mut page = page();
        let section = page.append(page.root(), Element::new("div").class("image-section"));
        assert_eq!(
            classify(&page, &section),
            RevealRoutine::ScaleIn { target: section }
        );
    }

    #[test]
    fn test_routines_by_category() {
        let mut page = page();
        let root = page.root();
        let cases = [
            ("content-section", RevealRoutine::StaggeredText),
            ("quote-section", RevealRoutine::FadeUp),
            ("initiative-section", RevealRoutine::Composite),
            ("section-divider", RevealRoutine::FadeRight),
            ("lessons-section", RevealRoutine::Skip),
            ("hero-section", RevealRoutine::Skip),
        ];
        for (class, expected) in cases {
            let node = page.append(root, Element::new("section").class(class));
            assert_eq!(classify(&page, &node), expected, "class {class}");
        }
    }
}
