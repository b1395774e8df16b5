//! Reveal routines
//!
//! Applies the routine picked by [`classify`] to a newly visible element.
//! Single-token routines mutate the element right away; staggered routines
//! are planned with [`reveal_animation::stagger`] and handed to the
//! scheduler, one task per mutation.

use reveal_animation::{plan_composite, stagger_group, RevealTask, StaggerTimings, TaskScheduler};
use reveal_core::vocab::{CONTENT_TEXT, IMAGE_PLACEHOLDER};
use reveal_core::{PageHost, Selector, VisualToken};

use crate::classify::{classify, RevealRoutine};

/// Result of revealing one element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealOutcome<N> {
    /// Routine that ran
    pub routine: RevealRoutine<N>,
    /// Number of delayed mutations scheduled
    pub scheduled: usize,
}

/// Plan the staggered-text routine for a content section
pub fn plan_content<H: PageHost>(
    host: &H,
    section: &H::Node,
    timings: &StaggerTimings,
) -> Vec<RevealTask<H::Node>> {
    let text = host.select(Some(section), Selector::TEXT);
    stagger_group(text, timings.text, VisualToken::FadeUp, 0)
}

/// Plan the composite routine for an initiative section
pub fn plan_initiative<H: PageHost>(
    host: &H,
    section: &H::Node,
    timings: &StaggerTimings,
) -> Vec<RevealTask<H::Node>> {
    let blocks = host
        .select(Some(section), Selector::Class(CONTENT_TEXT))
        .into_iter()
        .map(|block| {
            let text = host.select(Some(&block), Selector::TEXT);
            (block, text)
        })
        .collect();
    let images = host.select(Some(section), Selector::Class(IMAGE_PLACEHOLDER));
    plan_composite(blocks, images, timings)
}

/// Schedule every task of a plan
pub fn schedule_plan<H, S>(plan: Vec<RevealTask<H::Node>>, scheduler: &mut S) -> usize
where
    H: PageHost,
    H::Node: 'static,
    S: TaskScheduler<H>,
{
    let count = plan.len();
    for task in plan {
        let RevealTask {
            target,
            token,
            delay_ms,
        } = task;
        tracing::trace!(?target, token = token.class(), delay_ms, "scheduling reveal task");
        scheduler.schedule(
            delay_ms,
            Box::new(move |host: &mut H| host.add_class(&target, token.class())),
        );
    }
    count
}

/// Classify `node` and run its reveal routine
pub fn reveal<H, S>(
    host: &mut H,
    scheduler: &mut S,
    timings: &StaggerTimings,
    node: &H::Node,
) -> RevealOutcome<H::Node>
where
    H: PageHost,
    H::Node: 'static,
    S: TaskScheduler<H>,
{
    let routine = classify(host, node);
    let scheduled = match &routine {
        RevealRoutine::StaggeredText => {
            let plan = plan_content(host, node, timings);
            schedule_plan::<H, S>(plan, scheduler)
        }
        RevealRoutine::Composite => {
            let plan = plan_initiative(host, node, timings);
            schedule_plan::<H, S>(plan, scheduler)
        }
        RevealRoutine::ScaleIn { target } => {
            host.add_class(target, VisualToken::ScaleIn.class());
            0
        }
        RevealRoutine::FadeUp => {
            host.add_class(node, VisualToken::FadeUp.class());
            0
        }
        RevealRoutine::FadeRight => {
            host.add_class(node, VisualToken::FadeRight.class());
            0
        }
        RevealRoutine::Skip => {
            tracing::debug!(?node, "no reveal routine for element");
            0
        }
    };
    tracing::debug!(?node, ?routine, scheduled, "element revealed");
    RevealOutcome { routine, scheduled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::{NestedDelay, TimerQueue};
    use reveal_core::{Element, NodeId, PageTree, Size};

    const FADE_UP: &str = "animate-fade-up";
    const SCALE_IN: &str = "animate-scale-in";

    fn has(page: &PageTree, node: NodeId, class: &str) -> bool {
        page.has_class(&node, class)
    }

    fn initiative(page: &mut PageTree) -> (NodeId, Vec<Vec<NodeId>>, Vec<NodeId>) {
        let section = page.append(page.root(), Element::new("section").class("initiative-section"));
        let mut blocks = Vec::new();
        for count in [2, 3] {
            let block = page.append(section, Element::new("div").class(CONTENT_TEXT));
            let text = (0..count)
                .map(|_| page.append(block, Element::new("p")))
                .collect();
            blocks.push(text);
        }
        let images = (0..2)
            .map(|_| page.append(section, Element::new("div").class(IMAGE_PLACEHOLDER)))
            .collect();
        (section, blocks, images)
    }

    #[test]
    fn test_content_stagger_fires_at_100ms_steps() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let mut queue = TimerQueue::new();
        let section = page.append(page.root(), Element::new("section").class("content-section"));
        let text: Vec<_> = ["h2", "p", "p"]
            .into_iter()
            .map(|tag| page.append(section, Element::new(tag)))
            .collect();

        let outcome = reveal(&mut page, &mut queue, &StaggerTimings::default(), &section);
        assert_eq!(outcome.routine, RevealRoutine::StaggeredText);
        assert_eq!(outcome.scheduled, 3);
        // Nothing is applied synchronously, even the zero-delay item.
        assert!(!has(&page, text[0], FADE_UP));

        queue.advance_to(0, &mut page);
        assert!(has(&page, text[0], FADE_UP));
        assert!(!has(&page, text[1], FADE_UP));

        queue.advance_to(99, &mut page);
        assert!(!has(&page, text[1], FADE_UP));
        queue.advance_to(100, &mut page);
        assert!(has(&page, text[1], FADE_UP));
        queue.advance_to(200, &mut page);
        assert!(has(&page, text[2], FADE_UP));
        assert!(!has(&page, section, FADE_UP));
    }

    #[test]
    fn test_initiative_plan_delays() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let (section, blocks, images) = initiative(&mut page);

        let plan = plan_initiative(&page, &section, &StaggerTimings::default());
        let delay_of = |node: NodeId| {
            plan.iter()
                .find(|task| task.target == node)
                .map(|task| task.delay_ms)
        };

        assert_eq!(delay_of(blocks[0][1]), Some(50));
        assert_eq!(delay_of(blocks[1][2]), Some(100));
        assert_eq!(delay_of(images[0]), Some(300));
        assert_eq!(delay_of(images[1]), Some(600));
    }

    #[test]
    fn test_initiative_compounded_mode() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let (section, blocks, _) = initiative(&mut page);
        let timings = StaggerTimings {
            nested_delay: NestedDelay::Compounded,
            ..StaggerTimings::default()
        };

        let plan = plan_initiative(&page, &section, &timings);
        let task = plan.iter().find(|task| task.target == blocks[1][2]).unwrap();
        assert_eq!(task.delay_ms, 300);
    }

    #[test]
    fn test_initiative_reveal_runs_to_completion() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let mut queue = TimerQueue::new();
        let (section, blocks, images) = initiative(&mut page);

        let outcome = reveal(&mut page, &mut queue, &StaggerTimings::default(), &section);
        assert_eq!(outcome.scheduled, 7);

        queue.advance_to(299, &mut page);
        assert!(blocks.iter().flatten().all(|p| has(&page, *p, FADE_UP)));
        assert!(!has(&page, images[0], SCALE_IN));

        queue.run_until_idle(&mut page);
        assert!(images.iter().all(|image| has(&page, *image, SCALE_IN)));
        assert_eq!(queue.now(), 600);
    }

    #[test]
    fn test_empty_sections_schedule_nothing() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let mut queue = TimerQueue::new();
        let content = page.append(page.root(), Element::new("section").class("content-section"));
        let initiative = page.append(page.root(), Element::new("section").class("initiative-section"));

        let timings = StaggerTimings::default();
        assert_eq!(reveal(&mut page, &mut queue, &timings, &content).scheduled, 0);
        assert_eq!(reveal(&mut page, &mut queue, &timings, &initiative).scheduled, 0);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_single_token_routines_apply_immediately() {
        let mut page = PageTree::new(Size::new(800.0, 600.0));
        let mut queue = TimerQueue::new();
        let timings = StaggerTimings::default();
        let quote = page.append(page.root(), Element::new("blockquote").class("quote-section"));
        let divider = page.append(page.root(), Element::new("hr").class("section-divider"));
        let image = page.append(page.root(), Element::new("figure").class("image-section"));
        let lessons = page.append(page.root(), Element::new("section").class("lessons-section"));

        reveal(&mut page, &mut queue, &timings, &quote);
        reveal(&mut page, &mut queue, &timings, &divider);
        reveal(&mut page, &mut queue, &timings, &image);
        let skipped = reveal(&mut page, &mut queue, &timings, &lessons);

        assert!(has(&page, quote, FADE_UP));
        assert!(has(&page, divider, "animate-fade-right"));
        assert!(has(&page, image, SCALE_IN));
        assert_eq!(skipped.routine, RevealRoutine::Skip);
        assert_eq!(page.classes(lessons), &["lessons-section".to_string()]);
        assert_eq!(queue.pending_count(), 0);
    }
}
