#[cfg(test)]
mod dynamic_tests;

#[cfg(test)]
mod tests {
    use crate::event::{DEFAULT_PRIORITY, EventResult};

    #[test]
    fn test_event_result_default() {
        assert_eq!(EventResult::default(), EventResult::Continue);
        assert!(EventResult::Stop.is_stop());
        assert!(!EventResult::Continue.is_stop());
    }

    #[test]
    fn test_default_priority_is_zero() {
        assert_eq!(DEFAULT_PRIORITY, 0);
    }
}
