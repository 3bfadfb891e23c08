use crate::model::{Coordinate, Location};

/// State carried between user interactions.
///
/// Only the most recently selected location is kept; selecting again overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    location: Location,
}

impl Session {
    pub fn new(initial: Coordinate) -> Self {
        Self { location: Location::Coordinate(initial) }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Last coordinate the user picked, if the current selection is one.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.location {
            Location::Coordinate(c) => Some(c),
            Location::Query(_) => None,
        }
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, location: Location) -> bool {
        let changed = self.location != location;
        self.location = location;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salem() -> Coordinate {
        Coordinate::new(11.7188, 78.0779).expect("valid")
    }

    #[test]
    fn last_selection_wins() {
        let mut session = Session::new(salem());
        assert_eq!(session.coordinate(), Some(salem()));

        let paris = Coordinate::new(48.8566, 2.3522).expect("valid");
        assert!(session.select(Location::Coordinate(paris)));
        assert!(session.select(Location::Query("Salem,IN".into())));

        assert_eq!(session.location(), &Location::Query("Salem,IN".into()));
        assert_eq!(session.coordinate(), None);
    }

    #[test]
    fn reselecting_reports_no_change() {
        let mut session = Session::new(salem());
        assert!(!session.select(Location::Coordinate(salem())));
    }
}
