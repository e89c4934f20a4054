use crate::control::DistanceFilterControl;

/// The orchestrator side of an address group.
///
/// `refresh` is called after any change to the group's coordinates, with no
/// group lock held, so implementations may read the group back. `items`
/// supplies the group's current items so display nodes can be reset when
/// the address is cleared.
pub trait GroupHost<N>: Send + Sync {
    fn refresh(&self, group: &str, control: &DistanceFilterControl);

    fn items(&self, group: &str) -> Vec<N>;
}
