//! Sender filters and common predicates.

use crate::event::{Cancelable, Event};
use crate::ids::SenderId;

/// Restricts a registration to events from one sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SenderFilter {
    /// Matches every event, with or without a sender.
    #[default]
    Any,
    /// Matches only events whose sender equals this ID.
    Only(SenderId),
}

impl SenderFilter {
    /// Creates a filter that matches every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter for a single sender.
    pub fn only(sender: SenderId) -> Self {
        Self::Only(sender)
    }

    /// Returns the sender this filter is restricted to, if any.
    pub fn sender(&self) -> Option<&SenderId> {
        match self {
            SenderFilter::Any => None,
            SenderFilter::Only(sender) => Some(sender),
        }
    }

    /// Returns true if an event from `sender` passes this filter.
    ///
    /// An event with no sender only passes [`SenderFilter::Any`].
    pub fn matches(&self, sender: Option<&SenderId>) -> bool {
        match self {
            SenderFilter::Any => true,
            SenderFilter::Only(expected) => sender == Some(expected),
        }
    }
}

impl From<Option<SenderId>> for SenderFilter {
    fn from(sender: Option<SenderId>) -> Self {
        sender.map(SenderFilter::Only).unwrap_or_default()
    }
}

impl From<SenderId> for SenderFilter {
    fn from(sender: SenderId) -> Self {
        SenderFilter::Only(sender)
    }
}

/// Predicate that accepts every event.
pub fn accept_all<T: Event>(_event: &T) -> bool {
    true
}

/// Predicate that rejects events a previous handler already canceled.
pub fn not_canceled<T: Cancelable>(event: &T) -> bool {
    !event.is_canceled()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Move {
        canceled: bool,
    }

    impl Event for Move {}

    impl Cancelable for Move {
        fn is_canceled(&self) -> bool {
            self.canceled
        }

        fn set_canceled(&mut self, canceled: bool) {
            self.canceled = canceled;
        }
    }

    #[test]
    fn test_any_matches_all() {
        let filter = SenderFilter::new();
        let s = SenderId::new();

        assert!(filter.matches(Some(&s)));
        assert!(filter.matches(None));
        assert!(filter.sender().is_none());
    }

    #[test]
    fn test_only_matches_same_sender() {
        let s1 = SenderId::from_string("s1");
        let s2 = SenderId::from_string("s2");
        let filter = SenderFilter::only(s1.clone());

        assert!(filter.matches(Some(&s1)));
        assert!(!filter.matches(Some(&s2)));
        assert!(!filter.matches(None));
        assert_eq!(filter.sender(), Some(&s1));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SenderFilter::from(None), SenderFilter::Any);

        let s = SenderId::new();
        assert_eq!(SenderFilter::from(Some(s.clone())), SenderFilter::Only(s));
    }

    #[test]
    fn test_predicates() {
        let mut event = Move { canceled: false };
        assert!(accept_all(&event));
        assert!(not_canceled(&event));

        event.set_canceled(true);
        assert!(accept_all(&event));
        assert!(!not_canceled(&event));
    }
}
