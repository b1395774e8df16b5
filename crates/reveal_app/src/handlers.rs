//! Ambient interaction handlers
//!
//! Small page-lifetime behaviours that run independently of the reveal
//! pipeline: press feedback, hover scaling, focus rings, lazy-load marking,
//! hero parallax and the scroll progress property.
//!
//! Each handler is a free function over a [`PageHost`]; the ones that need
//! delays also take a [`TaskScheduler`]. None of them keeps state between
//! calls except the progress [`Debouncer`], which the caller owns.

use reveal_animation::{Debouncer, TaskScheduler};
use reveal_core::vocab::{CONTENT_IMAGE, PRELOAD_ANIMATION, SCROLL_PROGRESS_PROPERTY};
use reveal_core::{AmbientState, PageHost, Selector, StyleRuleId, VisualToken};

use crate::config::InteractionConfig;

const TRANSFORM: &str = "transform";
const OUTLINE: &str = "outline";
const OUTLINE_OFFSET: &str = "outline-offset";

/// CSS `scale()` transform value
pub fn scale(factor: f32) -> String {
    format!("scale({factor})")
}

/// CSS `translateY()` transform value, rounded to hundredths of a pixel
pub fn translate_y(offset: f32) -> String {
    let rounded = (offset * 100.0).round() / 100.0;
    // Avoid printing "-0px" when the hero sits at the top.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("translateY({rounded}px)")
}

// =============================================================================
// Pointer
// =============================================================================

/// Shrink a pressed nav item, restoring it after the press duration
pub fn press_feedback<H, S>(
    host: &mut H,
    scheduler: &mut S,
    config: &InteractionConfig,
    node: &H::Node,
) where
    H: PageHost,
    H::Node: 'static,
    S: TaskScheduler<H>,
{
    host.set_style(node, TRANSFORM, &scale(config.press_scale));
    let node = node.clone();
    scheduler.schedule(
        config.press_duration_ms,
        Box::new(move |host: &mut H| host.set_style(&node, TRANSFORM, &scale(1.0))),
    );
}

/// Enlarge a hovered image frame
pub fn hover_enter<H: PageHost>(host: &mut H, config: &InteractionConfig, node: &H::Node) {
    host.set_style(node, TRANSFORM, &scale(config.hover_scale));
}

/// Restore an image frame the pointer left
pub fn hover_leave<H: PageHost>(host: &mut H, node: &H::Node) {
    host.set_style(node, TRANSFORM, &scale(1.0));
}

// =============================================================================
// Focus
// =============================================================================

/// Draw the focus ring on a focused element
pub fn focus_ring<H: PageHost>(host: &mut H, config: &InteractionConfig, node: &H::Node) {
    host.set_style(node, OUTLINE, &config.focus_outline);
    host.set_style(node, OUTLINE_OFFSET, &config.focus_outline_offset);
}

/// Remove the focus ring from an element that lost focus
pub fn clear_focus_ring<H: PageHost>(host: &mut H, node: &H::Node) {
    host.set_style(node, OUTLINE, "none");
}

/// Escape drops focus from whatever holds it
pub fn escape<H: PageHost>(host: &mut H) {
    host.blur_active();
}

// =============================================================================
// Images
// =============================================================================

/// Mark a content image as loaded
pub fn mark_loaded<H: PageHost>(host: &mut H, node: &H::Node) {
    host.add_class(node, VisualToken::Loaded.class());
}

/// Mark content images that finished loading before the handlers attached
///
/// Returns every content image, so the host can listen for the rest.
pub fn attach_lazy_load<H: PageHost>(host: &mut H) -> Vec<H::Node> {
    let images = host.select(None, Selector::Class(CONTENT_IMAGE));
    let mut already = 0;
    for image in &images {
        if host.is_image_complete(image) {
            mark_loaded(host, image);
            already += 1;
        }
    }
    tracing::debug!(images = images.len(), already, "lazy-load attached");
    images
}

// =============================================================================
// Scroll
// =============================================================================

/// Move the hero region against the scroll direction
///
/// Returns the applied vertical offset.
pub fn apply_parallax<H: PageHost>(
    host: &mut H,
    config: &InteractionConfig,
    ambient: &AmbientState,
    hero: Option<&H::Node>,
) -> f32 {
    let offset = host.scroll_metrics().offset;
    let parallax = offset * config.parallax_rate;
    if let Some(hero) = hero {
        host.set_style(hero, TRANSFORM, &translate_y(parallax));
    }
    ambient.record_scroll(offset, parallax);
    parallax
}

/// Publish the current scroll progress ratio
pub fn publish_progress<H: PageHost>(host: &mut H, ambient: &AmbientState) -> f32 {
    let progress = host.scroll_metrics().progress();
    host.set_root_property(SCROLL_PROGRESS_PROPERTY, &progress.to_string());
    ambient.record_progress(progress);
    tracing::trace!(progress, "scroll progress published");
    progress
}

/// Recompute scroll progress once scrolling has been quiet for a while
pub fn schedule_progress<H, S>(
    debouncer: &mut Debouncer<S::Handle>,
    scheduler: &mut S,
    ambient: &AmbientState,
) where
    H: PageHost,
    S: TaskScheduler<H>,
{
    let ambient = ambient.clone();
    debouncer.trigger::<H, S>(
        scheduler,
        Box::new(move |host: &mut H| {
            publish_progress(host, &ambient);
        }),
    );
}

// =============================================================================
// Preload
// =============================================================================

/// Style rule that freezes entrance animations while the page settles
pub fn preload_rule() -> String {
    format!(
        ".{PRELOAD_ANIMATION} {{ animation-duration: 0s !important; transition-duration: 0s !important; }}"
    )
}

/// Install the preload rule and schedule its removal
pub fn suppress_initial_animations<H, S>(
    host: &mut H,
    scheduler: &mut S,
    config: &InteractionConfig,
) -> Option<StyleRuleId>
where
    H: PageHost,
    S: TaskScheduler<H>,
{
    let Some(rule) = host.insert_style_rule(&preload_rule()) else {
        tracing::warn!("host cannot install style rules; preload suppression skipped");
        return None;
    };
    scheduler.schedule(
        config.preload_duration_ms,
        Box::new(move |host: &mut H| host.remove_style_rule(rule)),
    );
    Some(rule)
}
