//! Escalation policies.

use std::fmt;
use std::sync::Arc;

use pager_protocols::Target;

/// One step of an escalation policy.
#[derive(Clone)]
pub struct EscalationLevel {
    level_number: usize,
    targets: Vec<Arc<dyn Target>>,
}

impl EscalationLevel {
    fn new(level_number: usize, targets: Vec<Arc<dyn Target>>) -> Self {
        Self {
            level_number,
            targets,
        }
    }

    /// Zero-based position of this level in its policy.
    pub fn level_number(&self) -> usize {
        self.level_number
    }

    /// Targets notified when the incident reaches this level.
    pub fn targets(&self) -> &[Arc<dyn Target>] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl fmt::Debug for EscalationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.targets.iter().map(|t| t.id()).collect();
        f.debug_struct("EscalationLevel")
            .field("level_number", &self.level_number)
            .field("targets", &ids)
            .finish()
    }
}

/// Ordered target groups indexed by level number.
///
/// Immutable once built. Level numbers are assigned from position, so
/// `level(n).level_number() == n` always holds.
#[derive(Debug, Clone, Default)]
pub struct EscalationPolicy {
    levels: Vec<EscalationLevel>,
}

impl EscalationPolicy {
    /// Build a policy from target groups, first group is level 0.
    pub fn new<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = Vec<Arc<dyn Target>>>,
    {
        let levels = levels
            .into_iter()
            .enumerate()
            .map(|(n, targets)| EscalationLevel::new(n, targets))
            .collect();
        Self { levels }
    }

    /// A policy with no levels. Nothing is ever notified.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Level `n`, or `None` when out of range.
    pub fn level(&self, n: usize) -> Option<&EscalationLevel> {
        self.levels.get(n)
    }

    /// Whether `n` is the final level. Every level is last in an empty policy.
    pub fn is_last_level(&self, n: usize) -> bool {
        n >= self.levels.len().saturating_sub(1)
    }

    pub fn levels(&self) -> &[EscalationLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTarget;

    fn target(id: &str) -> Arc<dyn Target> {
        Arc::new(RecordingTarget::new(id))
    }

    #[test]
    fn test_level_numbers_follow_position() {
        let policy = EscalationPolicy::new(vec![
            vec![target("a"), target("b")],
            vec![target("c")],
        ]);

        assert_eq!(policy.len(), 2);
        for (n, level) in policy.levels().iter().enumerate() {
            assert_eq!(level.level_number(), n);
        }
        assert_eq!(policy.level(1).unwrap().targets()[0].id(), "c");
    }

    #[test]
    fn test_level_out_of_range() {
        let policy = EscalationPolicy::new(vec![vec![target("a")]]);
        assert!(policy.level(1).is_none());
        assert!(policy.level(usize::MAX).is_none());
    }

    #[test]
    fn test_is_last_level() {
        let policy = EscalationPolicy::new(vec![vec![target("a")], vec![target("b")]]);
        assert!(!policy.is_last_level(0));
        assert!(policy.is_last_level(1));
        assert!(policy.is_last_level(5));
        assert!(policy.is_last_level(usize::MAX));
    }

    #[test]
    fn test_empty_policy() {
        let policy = EscalationPolicy::empty();
        assert!(policy.is_empty());
        assert!(policy.level(0).is_none());
        assert!(policy.is_last_level(0));
    }

    #[test]
    fn test_level_debug_lists_target_ids() {
        let policy = EscalationPolicy::new(vec![vec![target("email"), target("sms")]]);
        let debug = format!("{:?}", policy.level(0).unwrap());
        assert!(debug.contains("email"));
        assert!(debug.contains("sms"));
    }
}
