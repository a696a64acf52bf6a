//! Position conventions between stages.
//!
//! * [`for_markup`]: the AMP template renders the title and hook through
//!   fixed blocks, so only body slides enter the generic slide loop, re-based
//!   to start at position 2.
//! * [`for_render`]: the video renderer wants every slide: title first, body
//!   slides in their original order, hook last, then one fixed call-to-action.
//!
//! Title and hook are found by [`Role`], never by position.

use super::model::{CallToAction, Role, Slide, SlideIndex};
use super::StageSchema;

/// Keep only body slides and number them contiguously from 2.
///
/// For the canonical script layout (title at 1, hook at 2) every retained
/// slide moves from `p` to `p - 1`.  Body slides are kept even when the input
/// has no title or hook.
pub fn for_markup(index: &SlideIndex) -> SlideIndex {
    let mut builder = SlideIndex::builder(StageSchema::MarkupInput.start());
    for slide in index.bodies() {
        builder.push_lenient(slide.clone());
    }

    let out = builder.build();
    log::debug!(
        "renumber: markup kept {} of {} slide(s)",
        out.len(),
        index.len()
    );
    out
}

/// Reorder for the video renderer and append the call-to-action slide.
///
/// Layout: title, body slides in relative order, hook, CTA.  A missing title
/// or hook is simply skipped.  An existing CTA slide is replaced, which makes
/// the transform idempotent.
pub fn for_render(index: &SlideIndex, cta: &CallToAction) -> SlideIndex {
    let mut builder = SlideIndex::builder(StageSchema::RenderInput.start()).hook_last();

    let ordered = index
        .title()
        .into_iter()
        .chain(index.bodies())
        .chain(index.hook());

    for slide in ordered {
        builder.push_lenient(slide.clone());
    }
    builder.push_lenient(cta.to_slide());

    builder.build()
}

/// `true` when the positions of `index` are `start, start + 1, …` without gaps.
///
/// Holds for every index built through [`SlideIndex::builder`]; exposed for
/// property checks at stage boundaries.
pub fn is_contiguous(index: &SlideIndex) -> bool {
    index
        .iter()
        .map(Slide::position)
        .zip(index.start()..)
        .all(|(actual, expected)| actual == expected)
}

/// Role sequence of an index, handy for asserting stage layouts.
pub fn roles(index: &SlideIndex) -> Vec<Role> {
    index.iter().map(|s| s.role).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::codec::decode;
    use serde_json::json;

    fn script(bodies: &[&str]) -> SlideIndex {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("T")).unwrap();
        b.push(Slide::hook("H")).unwrap();
        for text in bodies {
            b.push(Slide::body(*text)).unwrap();
        }
        b.build()
    }

    #[test]
    fn markup_scenario_drops_title_and_hook() {
        let raw = json!({
            "storytitle": "A",
            "hookline": "B",
            "s1paragraph1": "C",
            "s2paragraph1": "D"
        });
        let out = for_markup(&decode(&raw, StageSchema::Script));

        assert_eq!(out.positions(), vec![2, 3]);
        assert_eq!(out.get(2).unwrap().text, "C");
        assert_eq!(out.get(3).unwrap().text, "D");
        assert_eq!(roles(&out), vec![Role::Body, Role::Body]);
    }

    #[test]
    fn markup_shifts_every_retained_position_by_one() {
        let input = script(&["a", "b", "c", "d", "e"]);
        let out = for_markup(&input);

        for slide in input.bodies() {
            let moved = out.get(slide.position() - 1).unwrap();
            assert_eq!(moved.text, slide.text);
        }
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn markup_keeps_bodies_without_title_or_hook() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::body("x")).unwrap();
        b.push(Slide::body("y")).unwrap();
        let out = for_markup(&b.build());
        assert_eq!(out.positions(), vec![2, 3]);
        assert_eq!(out.get(2).unwrap().text, "x");
    }

    #[test]
    fn markup_of_empty_index_is_empty() {
        let out = for_markup(&SlideIndex::empty(1));
        assert!(out.is_empty());
        assert_eq!(out.start(), 2);
    }

    #[test]
    fn render_orders_title_bodies_hook_cta() {
        let out = for_render(&script(&["one", "two"]), &CallToAction::default());

        assert_eq!(out.positions(), vec![1, 2, 3, 4, 5]);
        assert_eq!(
            roles(&out),
            vec![
                Role::Title,
                Role::Body,
                Role::Body,
                Role::Hook,
                Role::CallToAction
            ]
        );
        assert_eq!(out.get(2).unwrap().text, "one");
        assert_eq!(out.get(4).unwrap().text, "H");
    }

    #[test]
    fn render_is_idempotent() {
        let cta = CallToAction::default();
        let once = for_render(&script(&["a", "b", "c"]), &cta);
        let twice = for_render(&once, &cta);
        assert_eq!(once, twice);
    }

    #[test]
    fn render_without_hook_still_appends_cta() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("T")).unwrap();
        b.push(Slide::body("x")).unwrap();
        let out = for_render(&b.build(), &CallToAction::default());
        assert_eq!(
            roles(&out),
            vec![Role::Title, Role::Body, Role::CallToAction]
        );
    }

    #[test]
    fn render_without_title_starts_from_first_present_role() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::hook("H")).unwrap();
        b.push(Slide::body("x")).unwrap();
        let out = for_render(&b.build(), &CallToAction::default());
        assert_eq!(out.get(1).unwrap().text, "x");
        assert_eq!(
            roles(&out),
            vec![Role::Body, Role::Hook, Role::CallToAction]
        );
    }

    #[test]
    fn outputs_are_contiguous() {
        let cta = CallToAction::default();
        for n in 0..6 {
            let bodies: Vec<String> = (0..n).map(|i| format!("b{i}")).collect();
            let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
            let input = script(&refs);
            assert!(is_contiguous(&for_markup(&input)));
            assert!(is_contiguous(&for_render(&input, &cta)));
        }
    }
}
