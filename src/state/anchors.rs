//! Registry of anchors with surveyed positions

use crate::core::{Anchor, DistanceEstimate, Point2, RangeConstraint};
use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Anchor identifier to position map, replaced wholesale on every update
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    positions: RwLock<HashMap<String, Point2>>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchors(entries: Vec<Anchor>) -> Self {
        let registry = Self::new();
        registry.set_anchors(entries);
        registry
    }

    /// Replace the entire anchor set. A repeated identifier keeps the last entry.
    pub fn set_anchors(&self, entries: Vec<Anchor>) {
        let replacement: HashMap<String, Point2> = entries
            .into_iter()
            .map(|anchor| (anchor.identifier, anchor.position))
            .collect();
        let count = replacement.len();
        *self.positions.write() = replacement;
        info!("Anchor registry replaced: {} anchors", count);
    }

    pub fn get_position(&self, identifier: &str) -> Option<Point2> {
        self.positions.read().get(identifier).copied()
    }

    /// Known anchors with a finite range, in the order of `estimates`
    pub fn usable_subset(&self, estimates: &[DistanceEstimate]) -> Vec<RangeConstraint> {
        let positions = self.positions.read();
        estimates
            .iter()
            .filter(|estimate| estimate.is_usable())
            .filter_map(|estimate| {
                positions.get(&estimate.identifier).map(|position| RangeConstraint {
                    identifier: estimate.identifier.clone(),
                    position: *position,
                    distance_m: estimate.distance_m,
                })
            })
            .collect()
    }

    /// All anchors, sorted by identifier
    pub fn anchors(&self) -> Vec<Anchor> {
        let mut anchors: Vec<Anchor> = self
            .positions
            .read()
            .iter()
            .map(|(identifier, position)| Anchor {
                identifier: identifier.clone(),
                position: *position,
            })
            .collect();
        anchors.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        anchors
    }

    pub fn len(&self) -> usize {
        self.positions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn estimate(id: &str, d: f64) -> DistanceEstimate {
        DistanceEstimate {
            identifier: id.to_string(),
            distance_m: d,
        }
    }

    #[test]
    fn test_set_anchors_replaces_previous_set() {
        let registry = AnchorRegistry::with_anchors(vec![
            Anchor::new("old-1", 1.0, 1.0),
            Anchor::new("old-2", 2.0, 2.0),
        ]);
        registry.set_anchors(vec![Anchor::new("new", 5.0, 6.0)]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_position("old-1"), None);
        assert_eq!(registry.get_position("new"), Some(Point2::new(5.0, 6.0)));
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let registry = AnchorRegistry::with_anchors(vec![
            Anchor::new("ap", 1.0, 1.0),
            Anchor::new("ap", 3.0, 4.0),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_position("ap"), Some(Point2::new(3.0, 4.0)));
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let registry = AnchorRegistry::with_anchors(vec![Anchor::new("Lab", 0.0, 0.0)]);
        assert!(registry.get_position("lab").is_none());
        assert!(registry.get_position("Lab").is_some());
    }

    #[test]
    fn test_usable_subset_filters_unknown_and_infinite() {
        let registry = AnchorRegistry::with_anchors(vec![
            Anchor::new("A", 0.0, 0.0),
            Anchor::new("B", 5.0, 0.0),
            Anchor::new("C", 0.0, 5.0),
        ]);
        let estimates = vec![
            estimate("C", 2.0),
            estimate("unknown", 1.0),
            estimate("B", f64::INFINITY),
            estimate("A", 3.0),
        ];

        let usable = registry.usable_subset(&estimates);
        let ids: Vec<&str> = usable.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["C", "A"]);
        assert_eq!(usable[0].position, Point2::new(0.0, 5.0));
        assert_eq!(usable[1].distance_m, 3.0);
    }

    #[test]
    fn test_concurrent_replace_and_read() {
        let registry = Arc::new(AnchorRegistry::new());
        let writers: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for j in 0..50 {
                        let v = (i * 100 + j) as f64;
                        registry.set_anchors(vec![
                            Anchor::new("A", v, v),
                            Anchor::new("B", v, v),
                        ]);
                    }
                })
            })
            .collect();

        let reader = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..200 {
                    // Every snapshot comes from a single set_anchors call.
                    let usable = registry.usable_subset(&[estimate("A", 1.0), estimate("B", 1.0)]);
                    if usable.len() == 2 {
                        assert_eq!(usable[0].position, usable[1].position);
                    }
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();
        assert_eq!(registry.len(), 2);
    }
}
