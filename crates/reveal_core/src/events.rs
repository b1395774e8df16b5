//! Page events fed to the ambient handlers

/// Keyboard key relevant to the page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Any other key, by its DOM `key` name
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// An event delivered by the host for one element or for the page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent<N> {
    /// Element was activated (click / tap)
    Click(N),
    /// Pointer entered the element
    PointerEnter(N),
    /// Pointer left the element
    PointerLeave(N),
    /// Element gained focus
    Focus(N),
    /// Element lost focus
    Blur(N),
    /// Image element finished loading
    ImageLoaded(N),
    /// Key pressed anywhere in the document
    KeyDown(Key),
    /// Document scrolled; read the offset from the host
    Scroll,
}

impl<N> PageEvent<N> {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::Click(_) => "click",
            PageEvent::PointerEnter(_) => "pointerenter",
            PageEvent::PointerLeave(_) => "pointerleave",
            PageEvent::Focus(_) => "focus",
            PageEvent::Blur(_) => "blur",
            PageEvent::ImageLoaded(_) => "load",
            PageEvent::KeyDown(_) => "keydown",
            PageEvent::Scroll => "scroll",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Esc"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other("Enter".into()));
    }
}
