//! Edge classification: exactly one disposition per dependency record.

use std::collections::HashSet;

use tracing::debug;

use cmgraph_model::Snapshot;

use crate::hub::Hub;
use crate::markers::FrequentSet;
use crate::types::EdgeStyle;

/// Disposition of one drawn dependency edge.
///
/// Dependency records that end up as label annotations produce no entry
/// here; the annotation is written onto the source target instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedEdge {
    /// Dotted redirect from a source to the hub, deduplicated per source.
    Hub { source: usize },
    /// Collapsed edge onto the destination project's anchor node.
    Project {
        source: usize,
        project: usize,
        style: EdgeStyle,
        same_project: bool,
    },
    /// Plain dashed edge between two targets.
    Direct {
        source: usize,
        dest: usize,
        same_project: bool,
    },
}

/// Classify every dependency record, in creation order.
///
/// Conditions are checked in priority order: hub redirect, marker
/// annotation, full-project collapse, direct edge. A frequent destination in
/// the source's own directory bypasses the frequency logic entirely and
/// draws as a normal edge.
pub fn classify_edges(
    snapshot: &mut Snapshot,
    frequent: &FrequentSet,
    hub: Option<&Hub>,
) -> Vec<ClassifiedEdge> {
    let mut edges = Vec::new();
    let mut hub_sources: HashSet<usize> = HashSet::new();
    let mut project_pairs: HashSet<(usize, usize)> = HashSet::new();

    for i in 0..snapshot.dependencies.len() {
        let dep = snapshot.dependencies[i];
        let cross_directory = snapshot.targets[dep.source].directory_index
            != snapshot.targets[dep.dest].directory_index;

        if let Some(hub) = hub
            && hub.is_member(dep.dest)
        {
            if cross_directory && hub_sources.insert(dep.source) {
                edges.push(ClassifiedEdge::Hub { source: dep.source });
                continue;
            }
            // once a source is linked to the hub, further member records
            // are duplicates
            if hub_sources.contains(&dep.source) {
                continue;
            }
        }

        if frequent.contains(dep.dest) && cross_directory && !dep.full_dep {
            if let Some(marker) = snapshot.targets[dep.dest].marker() {
                snapshot.targets[dep.source].add_dep_marker(marker.symbol);
                debug!(
                    source = %snapshot.targets[dep.source].name,
                    dest = %snapshot.targets[dep.dest].name,
                    symbol = marker.symbol,
                    "annotated instead of drawn"
                );
            }
            continue;
        }

        if dep.full_dep {
            let project = snapshot.targets[dep.dest].project_index;
            let style = if project_pairs.insert((dep.source, project)) {
                EdgeStyle::Dashed
            } else {
                EdgeStyle::Invis
            };
            edges.push(ClassifiedEdge::Project {
                source: dep.source,
                project,
                style,
                same_project: dep.same_project,
            });
            continue;
        }

        edges.push(ClassifiedEdge::Direct {
            source: dep.source,
            dest: dep.dest,
            same_project: dep.same_project,
        });
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{make_directory, make_project, make_snapshot, make_target};
    use crate::hub::select_hub;
    use crate::markers::{MarkerAlphabet, detect_frequent};
    use pretty_assertions::assert_eq;

    fn reduce(snapshot: &mut Snapshot, threshold: usize) -> Vec<ClassifiedEdge> {
        let mut alphabet = MarkerAlphabet::new();
        let frequent = detect_frequent(snapshot, threshold, &mut alphabet).unwrap();
        let hub = select_hub(snapshot, &frequent, threshold);
        classify_edges(snapshot, &frequent, hub.as_ref())
    }

    /// foo -> {bar, baz}: two plain dashed edges, no markers, no hub.
    #[test]
    fn test_plain_dependencies_draw_direct_edges() {
        let mut snapshot = make_snapshot(
            vec![make_project("root", vec![0, 1, 2], vec![0])],
            vec![make_directory(".", 0, vec![0, 1, 2])],
            vec![
                make_target("foo", 0, 0),
                make_target("bar", 0, 0),
                make_target("baz", 0, 0),
            ],
            vec![vec![1, 2], vec![], vec![]],
            false,
        );

        let edges = reduce(&mut snapshot, 5);
        assert_eq!(
            edges,
            vec![
                ClassifiedEdge::Direct {
                    source: 0,
                    dest: 1,
                    same_project: true
                },
                ClassifiedEdge::Direct {
                    source: 0,
                    dest: 2,
                    same_project: true
                },
            ]
        );
        assert!(snapshot.targets.iter().all(|t| t.marker().is_none()));
    }

    /// Six cross-directory users of one frequent target: every edge becomes
    /// a label annotation, nothing is drawn.
    #[test]
    fn test_frequent_cross_directory_annotates() {
        let mut targets = vec![make_target("util", 0, 0)];
        for i in 0..6 {
            targets.push(make_target(&format!("t{i}"), 0, 1));
        }
        let mut resolved = vec![vec![]];
        resolved.extend(std::iter::repeat_n(vec![0], 6));

        let mut snapshot = make_snapshot(
            vec![make_project("root", (0..7).collect(), vec![0, 1])],
            vec![
                make_directory("lib", 0, vec![0]),
                make_directory("apps", 0, (1..7).collect()),
            ],
            targets,
            resolved,
            false,
        );

        let edges = reduce(&mut snapshot, 5);
        assert!(edges.is_empty());
        for user in &snapshot.targets[1..] {
            assert_eq!(user.dep_markers(), ["α"]);
            assert_eq!(user.display_label(), format!("{}\nα", user.name));
        }
    }

    /// Same six users in util's own directory: the differing-directory
    /// condition fails, so dashed edges draw normally.
    #[test]
    fn test_frequent_same_directory_draws_edges() {
        let mut targets = vec![make_target("util", 0, 0)];
        for i in 0..6 {
            targets.push(make_target(&format!("t{i}"), 0, 0));
        }
        let mut resolved = vec![vec![]];
        resolved.extend(std::iter::repeat_n(vec![0], 6));

        let mut snapshot = make_snapshot(
            vec![make_project("root", (0..7).collect(), vec![0])],
            vec![make_directory(".", 0, (0..7).collect())],
            targets,
            resolved,
            false,
        );

        let edges = reduce(&mut snapshot, 5);
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| matches!(e, ClassifiedEdge::Direct { .. })));
        assert!(snapshot.targets.iter().all(|t| t.dep_markers().is_empty()));
        // util is still flagged frequent; only the rendering differs
        assert!(snapshot.targets[0].marker().is_some());
    }

    /// X covers all of project Q: first edge collapses to the anchor as
    /// dashed, repeats for the same (source, project) pair go invisible.
    #[test]
    fn test_full_project_dependence_dedupes_to_invis() {
        let mut snapshot = make_snapshot(
            vec![
                make_project("root", vec![0], vec![0]),
                make_project("q", vec![1, 2], vec![1]),
            ],
            vec![
                make_directory("app", 0, vec![0]),
                make_directory("q", 1, vec![1, 2]),
            ],
            vec![
                make_target("x", 0, 0),
                make_target("q_core", 1, 1),
                make_target("q_util", 1, 1),
            ],
            vec![vec![1, 2], vec![], vec![]],
            true,
        );

        let edges = reduce(&mut snapshot, 5);
        assert_eq!(
            edges,
            vec![
                ClassifiedEdge::Project {
                    source: 0,
                    project: 1,
                    style: EdgeStyle::Dashed,
                    same_project: false
                },
                ClassifiedEdge::Project {
                    source: 0,
                    project: 1,
                    style: EdgeStyle::Invis,
                    same_project: false
                },
            ]
        );
    }

    /// Hub members redirect to a single dotted edge per source.
    #[test]
    fn test_hub_redirect_dedupes_per_source() {
        let mut targets = Vec::new();
        for i in 0..6 {
            targets.push(make_target(&format!("lib{i}"), 0, 0));
        }
        for i in 0..12 {
            targets.push(make_target(&format!("user{i}"), 0, 1));
        }
        let mut resolved = vec![vec![]; 6];
        resolved.extend(std::iter::repeat_n((0..6).collect::<Vec<_>>(), 12));

        let mut snapshot = make_snapshot(
            vec![make_project("root", (0..18).collect(), vec![0, 1])],
            vec![
                make_directory("libs", 0, (0..6).collect()),
                make_directory("apps", 0, (6..18).collect()),
            ],
            targets,
            resolved,
            false,
        );

        let edges = reduce(&mut snapshot, 5);
        // 12 sources × 6 member deps collapse to one redirect per source
        assert_eq!(edges.len(), 12);
        for (i, edge) in edges.iter().enumerate() {
            assert_eq!(*edge, ClassifiedEdge::Hub { source: 6 + i });
        }
        // redirected sources get no annotation markers
        assert!(snapshot.targets[6..].iter().all(|t| t.dep_markers().is_empty()));
    }
}
