//! Choice resolution.
//!
//! Resolving a choice is a pure computation: it validates every page the
//! traversal will touch and returns the timed step plan together with the
//! counter deltas. Nothing is mutated here, so a broken reference can never
//! leave counters half-applied.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use storyreel_core::error::DomainError;
use storyreel_core::ids::PageId;
use storyreel_graph::domain::graph::PageGraph;
use storyreel_graph::domain::integrity::IntegrityIssue;
use storyreel_graph::domain::page::Page;

/// Delays used when playing out a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    /// Before the first step after a tap.
    pub choice_delay: Duration,
    /// Between consecutive branch steps.
    pub step_delay: Duration,
    /// Before landing on the rejoin page.
    pub settle_delay: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            choice_delay: Duration::from_millis(500),
            step_delay: Duration::from_millis(1000),
            settle_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A panel shown in passing; not a resume point.
    Transient,
    /// The page the traversal comes to rest on.
    Terminal,
}

/// One page of a resolved traversal. `delay` is measured from the previous
/// step (or from the tap, for the first step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStep {
    pub page: PageId,
    pub delay: Duration,
    pub kind: StepKind,
}

/// Counter changes produced by a choice. Always additive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDeltas {
    pub morale: i64,
    pub keruka_bond: i64,
    pub kehinde_bond: i64,
}

/// A validated choice: what to apply and where to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub host: PageId,
    pub label: String,
    pub deltas: StateDeltas,
    pub steps: Vec<TraversalStep>,
}

impl Resolution {
    /// The page the traversal ends on.
    #[must_use]
    pub fn terminal(&self) -> Option<PageId> {
        self.steps.last().map(|step| step.page)
    }

    /// Pages in visit order.
    #[must_use]
    pub fn visits(&self) -> Vec<PageId> {
        self.steps.iter().map(|step| step.page).collect()
    }
}

/// Resolves choice `choice_index` on page `host`.
///
/// # Errors
///
/// - `DomainError::PageNotFound` if `host` is not in the graph.
/// - `DomainError::Validation` if `host` is not a choice page, the index is
///   out of range, or the branch sequence revisits a page.
/// - `DomainError::Content` if the choice page offers no choices.
/// - `DomainError::GraphIntegrity` if the target, a branch step or the
///   rejoin page does not exist.
pub fn resolve_choice(
    graph: &PageGraph,
    host: PageId,
    choice_index: usize,
    timing: &PlaybackTiming,
) -> Result<Resolution, DomainError> {
    let page = graph.get_page(host)?;
    if !page.is_choice() {
        return Err(DomainError::Validation(format!(
            "page {host} does not offer choices"
        )));
    }
    if page.choices.is_empty() {
        return Err(DomainError::Content(format!(
            "page {host}: no choices available"
        )));
    }
    let choice = page.choices.get(choice_index).ok_or_else(|| {
        DomainError::Validation(format!(
            "page {host} has {} choices; index {choice_index} is out of range",
            page.choices.len()
        ))
    })?;

    let target = graph.get_page(choice.next_page).map_err(|_| {
        DomainError::from(IntegrityIssue::DanglingChoiceTarget {
            page: host,
            label: choice.label.clone(),
            target: choice.next_page,
        })
    })?;

    Ok(Resolution {
        host,
        label: choice.label.clone(),
        deltas: StateDeltas {
            morale: choice.effect.morale,
            keruka_bond: choice.keruka_bond_effect,
            kehinde_bond: choice.kehinde_bond_effect,
        },
        steps: plan_steps(graph, target, timing)?,
    })
}

fn plan_steps(
    graph: &PageGraph,
    target: &Page,
    timing: &PlaybackTiming,
) -> Result<Vec<TraversalStep>, DomainError> {
    if !target.has_branch() {
        return Ok(vec![TraversalStep {
            page: target.id,
            delay: timing.choice_delay,
            kind: StepKind::Terminal,
        }]);
    }

    let mut seen = HashSet::with_capacity(target.branch.len());
    let mut steps = Vec::with_capacity(target.branch.len() + 1);
    for (index, &page) in target.branch.iter().enumerate() {
        if !graph.contains(page) {
            return Err(IntegrityIssue::DanglingBranchStep {
                page: target.id,
                target: page,
            }
            .into());
        }
        if !seen.insert(page) {
            return Err(IntegrityIssue::RepeatedBranchStep {
                page: target.id,
                repeated: page,
            }
            .into());
        }
        steps.push(TraversalStep {
            page,
            delay: if index == 0 {
                timing.choice_delay
            } else {
                timing.step_delay
            },
            kind: StepKind::Transient,
        });
    }

    match target.post_branch {
        Some(post) if !graph.contains(post) => {
            return Err(IntegrityIssue::DanglingPostBranch {
                page: target.id,
                target: post,
            }
            .into());
        }
        Some(post) if seen.contains(&post) => {
            return Err(IntegrityIssue::RepeatedBranchStep {
                page: target.id,
                repeated: post,
            }
            .into());
        }
        Some(post) => steps.push(TraversalStep {
            page: post,
            delay: timing.settle_delay,
            kind: StepKind::Terminal,
        }),
        // The last branch page doubles as the rejoin page.
        None => {
            if let Some(last) = steps.last_mut() {
                last.kind = StepKind::Terminal;
            }
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_graph::application::builtin::forest_graph;
    use storyreel_graph::domain::page::Choice;

    fn ids(raw: &[u32]) -> Vec<PageId> {
        raw.iter().copied().map(PageId).collect()
    }

    #[test]
    fn test_fight_plays_full_branch_then_rejoins() {
        let graph = forest_graph().unwrap();

        let resolution = resolve_choice(&graph, PageId(3), 0, &PlaybackTiming::default()).unwrap();

        assert_eq!(resolution.label, "Fight");
        assert_eq!(resolution.visits(), ids(&[4, 7, 8, 9, 10]));
        assert_eq!(resolution.deltas.morale, 3);
        let delays: Vec<u64> = resolution
            .steps
            .iter()
            .map(|step| u64::try_from(step.delay.as_millis()).unwrap())
            .collect();
        assert_eq!(delays, vec![500, 1000, 1000, 1000, 2000]);
        let terminal: Vec<_> = resolution
            .steps
            .iter()
            .filter(|step| step.kind == StepKind::Terminal)
            .collect();
        assert_eq!(terminal.len(), 1);
        assert_eq!(resolution.terminal(), Some(PageId(10)));
    }

    #[test]
    fn test_scare_plays_single_panel_then_returns_to_fight() {
        let graph = forest_graph().unwrap();

        let resolution = resolve_choice(&graph, PageId(3), 2, &PlaybackTiming::default()).unwrap();

        assert_eq!(resolution.visits(), ids(&[6, 4]));
        assert_eq!(resolution.deltas.morale, -2);
    }

    #[test]
    fn test_choice_without_branch_goes_straight_to_target() {
        let graph = forest_graph().unwrap();

        let resolution = resolve_choice(&graph, PageId(9), 1, &PlaybackTiming::default()).unwrap();

        assert_eq!(resolution.label, "Spare Wolf");
        assert_eq!(resolution.steps.len(), 1);
        assert_eq!(resolution.steps[0].page, PageId(13));
        assert_eq!(resolution.steps[0].kind, StepKind::Terminal);
    }

    #[test]
    fn test_every_forest_choice_terminates_inside_the_graph() {
        let graph = forest_graph().unwrap();

        for page in graph.pages().iter().filter(|page| page.is_choice()) {
            for index in 0..page.choices.len() {
                let resolution =
                    resolve_choice(&graph, page.id, index, &PlaybackTiming::default()).unwrap();
                let terminal = resolution.terminal().unwrap();
                assert!(graph.contains(terminal), "choice {index} on page {}", page.id);
            }
        }
    }

    #[test]
    fn test_missing_post_branch_makes_last_branch_step_terminal() {
        let graph = PageGraph::from_pages(vec![
            Page::choice(1, "a.jpg", vec![Choice::new("Go", PageId(2), 0)]),
            Page::image(2, "b.jpg").with_branch(&[2, 3], None),
            Page::image(3, "c.jpg"),
        ])
        .unwrap();

        let resolution = resolve_choice(&graph, PageId(1), 0, &PlaybackTiming::default()).unwrap();

        assert_eq!(resolution.visits(), ids(&[2, 3]));
        assert_eq!(resolution.steps[1].kind, StepKind::Terminal);
    }

    #[test]
    fn test_bond_effects_are_carried_into_deltas() {
        let graph = PageGraph::from_pages(vec![
            Page::choice(
                1,
                "a.jpg",
                vec![Choice::new("Trust Kehinde", PageId(2), 1).with_bonds(-1, 4)],
            ),
            Page::image(2, "b.jpg"),
        ])
        .unwrap();

        let resolution = resolve_choice(&graph, PageId(1), 0, &PlaybackTiming::default()).unwrap();

        assert_eq!(
            resolution.deltas,
            StateDeltas {
                morale: 1,
                keruka_bond: -1,
                kehinde_bond: 4
            }
        );
    }

    #[test]
    fn test_dangling_target_is_an_integrity_error() {
        let graph = PageGraph::from_pages(vec![Page::choice(
            1,
            "a.jpg",
            vec![Choice::new("Nowhere", PageId(9), 5)],
        )])
        .unwrap();

        let result = resolve_choice(&graph, PageId(1), 0, &PlaybackTiming::default());

        match result {
            Err(DomainError::GraphIntegrity { missing, .. }) => assert_eq!(missing, PageId(9)),
            other => panic!("expected GraphIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_branch_step_is_an_integrity_error() {
        let graph = PageGraph::from_pages(vec![
            Page::choice(1, "a.jpg", vec![Choice::new("Go", PageId(2), 0)]),
            Page::image(2, "b.jpg").with_branch(&[2, 8], Some(1)),
        ])
        .unwrap();

        let result = resolve_choice(&graph, PageId(1), 0, &PlaybackTiming::default());

        assert!(matches!(
            result,
            Err(DomainError::GraphIntegrity {
                missing: PageId(8),
                ..
            })
        ));
    }

    #[test]
    fn test_image_page_cannot_host_a_choice() {
        let graph = forest_graph().unwrap();

        let result = resolve_choice(&graph, PageId(4), 0, &PlaybackTiming::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_empty_choice_list_is_a_content_error() {
        let graph = PageGraph::from_pages(vec![Page::choice(1, "a.jpg", Vec::new())]).unwrap();

        let result = resolve_choice(&graph, PageId(1), 0, &PlaybackTiming::default());

        assert!(matches!(result, Err(DomainError::Content(_))));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let graph = forest_graph().unwrap();

        let result = resolve_choice(&graph, PageId(3), 3, &PlaybackTiming::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
