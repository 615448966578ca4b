//! Z-order compositing.
//!
//! Shapes and connectors keep their source pre-order, except that a
//! connector declared before one of the shapes it touches is moved to sit
//! directly above the later of its two endpoints. Connectors promoted to
//! the same position keep their relative source order.
//!
//! # Example
//!
//! ```
//! # use vellum::compose::{ZEntry, assign_z_order};
//! // A(0) and B(2) joined by E(1): E moves above B.
//! let entries = [
//!     ZEntry::Shape { ordinal: 0 },
//!     ZEntry::Edge { ordinal: 1, source: Some(0), target: Some(2) },
//!     ZEntry::Shape { ordinal: 2 },
//! ];
//! assert_eq!(assign_z_order(&entries), vec![0, 2, 1]);
//! ```

/// One shape or connector taking part in compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZEntry {
    Shape {
        ordinal: usize,
    },
    /// `source` and `target` are the ordinals of the endpoint shapes, when
    /// the ends reference shapes
    Edge {
        ordinal: usize,
        source: Option<usize>,
        target: Option<usize>,
    },
}

impl ZEntry {
    pub fn ordinal(&self) -> usize {
        match *self {
            ZEntry::Shape { ordinal } | ZEntry::Edge { ordinal, .. } => ordinal,
        }
    }

    /// Position the entry is drawn at, whether it was promoted to get there,
    /// and its own ordinal as the tie-break.
    fn sort_key(&self) -> (usize, bool, usize) {
        match *self {
            ZEntry::Shape { ordinal } => (ordinal, false, ordinal),
            ZEntry::Edge {
                ordinal,
                source,
                target,
            } => {
                let latest = source.into_iter().chain(target).max().unwrap_or(ordinal);
                if latest > ordinal {
                    (latest, true, ordinal)
                } else {
                    (ordinal, false, ordinal)
                }
            }
        }
    }
}

/// Assigns a dense z-index to every entry, returned in input order.
pub fn assign_z_order(entries: &[ZEntry]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&idx| entries[idx].sort_key());

    let mut z_indices = vec![0; entries.len()];
    for (z, idx) in order.into_iter().enumerate() {
        z_indices[idx] = z;
    }
    z_indices
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn shape(ordinal: usize) -> ZEntry {
        ZEntry::Shape { ordinal }
    }

    fn edge(ordinal: usize, source: usize, target: usize) -> ZEntry {
        ZEntry::Edge {
            ordinal,
            source: Some(source),
            target: Some(target),
        }
    }

    /// Entry ordinals sorted by assigned z-index
    fn drawn_order(entries: &[ZEntry]) -> Vec<usize> {
        let z = assign_z_order(entries);
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&idx| z[idx]);
        order.into_iter().map(|idx| entries[idx].ordinal()).collect()
    }

    #[test]
    fn test_source_order_is_kept() {
        let entries = [shape(0), shape(1), edge(2, 0, 1)];
        assert_eq!(assign_z_order(&entries), vec![0, 1, 2]);
    }

    #[test]
    fn test_edge_is_promoted_above_later_endpoint() {
        let entries = [shape(0), edge(1, 0, 2), shape(2)];
        assert_eq!(drawn_order(&entries), vec![0, 2, 1]);
    }

    #[test]
    fn test_promoted_edge_precedes_following_items() {
        let entries = [edge(0, 1, 2), shape(1), shape(2), shape(3)];
        assert_eq!(drawn_order(&entries), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_promotion_ties_keep_source_order() {
        let entries = [edge(0, 2, 3), edge(1, 3, 2), shape(2), shape(3), shape(4)];
        assert_eq!(drawn_order(&entries), vec![2, 3, 0, 1, 4]);
    }

    #[test]
    fn test_floating_edge_is_not_promoted() {
        let entries = [
            ZEntry::Edge {
                ordinal: 0,
                source: None,
                target: None,
            },
            shape(1),
        ];
        assert_eq!(drawn_order(&entries), vec![0, 1]);
    }

    mod proptest_tests {
        use super::*;

        // ===================================================================
        // Strategies
        // ===================================================================

        /// Entries with ordinals `0..n`; edges reference shape ordinals.
        fn entries_strategy() -> impl Strategy<Value = Vec<ZEntry>> {
            prop::collection::vec((any::<bool>(), any::<prop::sample::Index>(), any::<prop::sample::Index>()), 1..24)
                .prop_map(|specs| {
                    let shapes: Vec<usize> = specs
                        .iter()
                        .enumerate()
                        .filter(|(_, (is_edge, _, _))| !is_edge)
                        .map(|(ordinal, _)| ordinal)
                        .collect();
                    specs
                        .iter()
                        .enumerate()
                        .map(|(ordinal, (is_edge, s, t))| {
                            if *is_edge && !shapes.is_empty() {
                                ZEntry::Edge {
                                    ordinal,
                                    source: Some(*s.get(&shapes)),
                                    target: Some(*t.get(&shapes)),
                                }
                            } else {
                                ZEntry::Shape { ordinal }
                            }
                        })
                        .collect()
                })
        }

        // ===================================================================
        // Property Test Functions
        // ===================================================================

        fn check_z_is_dense_permutation(entries: &[ZEntry]) -> Result<(), TestCaseError> {
            let mut z = assign_z_order(entries);
            z.sort_unstable();
            prop_assert_eq!(z, (0..entries.len()).collect::<Vec<_>>());
            Ok(())
        }

        fn check_edges_above_endpoints(entries: &[ZEntry]) -> Result<(), TestCaseError> {
            let z = assign_z_order(entries);
            let z_of = |ordinal: usize| {
                entries
                    .iter()
                    .position(|e| e.ordinal() == ordinal)
                    .map(|idx| z[idx])
            };
            for (idx, entry) in entries.iter().enumerate() {
                if let ZEntry::Edge { source, target, .. } = *entry {
                    for endpoint in source.into_iter().chain(target) {
                        prop_assert!(z[idx] > z_of(endpoint).unwrap_or(0));
                    }
                }
            }
            Ok(())
        }

        fn check_shapes_keep_order(entries: &[ZEntry]) -> Result<(), TestCaseError> {
            let z = assign_z_order(entries);
            let shape_z: Vec<usize> = entries
                .iter()
                .zip(&z)
                .filter(|(e, _)| matches!(e, ZEntry::Shape { .. }))
                .map(|(_, z)| *z)
                .collect();
            prop_assert!(shape_z.windows(2).all(|w| w[0] < w[1]));
            Ok(())
        }

        // ===================================================================
        // Proptest Wrappers
        // ===================================================================

        proptest! {
            #[test]
            fn z_is_dense_permutation(entries in entries_strategy()) {
                check_z_is_dense_permutation(&entries)?;
            }

            #[test]
            fn edges_above_endpoints(entries in entries_strategy()) {
                check_edges_above_endpoints(&entries)?;
            }

            #[test]
            fn shapes_keep_order(entries in entries_strategy()) {
                check_shapes_keep_order(&entries)?;
            }
        }
    }
}
