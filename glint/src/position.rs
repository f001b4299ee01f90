//! Document positions used to anchor minings and annotations.

/// An immutable `(offset, length)` pair identifying a line or point anchor
/// in the document.
///
/// Positions are the grouping key for minings: minings sharing a position are
/// rendered together on one annotation. Ordering is by `offset`, then
/// `length`, which is also the iteration order of grouped minings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Document offset where the anchored content starts.
    pub offset: usize,
    /// Length of the anchored range. Zero for point anchors.
    pub length: usize,
}

impl Position {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset of the anchored range.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Whether `offset` falls inside the anchored range.
    ///
    /// Point anchors (zero length) contain exactly their own offset.
    pub fn contains(&self, offset: usize) -> bool {
        if self.length == 0 {
            offset == self.offset
        } else {
            offset >= self.offset && offset < self.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_offset_then_length() {
        let mut positions = vec![
            Position::new(20, 0),
            Position::new(10, 7),
            Position::new(10, 5),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(10, 5),
                Position::new(10, 7),
                Position::new(20, 0),
            ]
        );
    }

    #[test]
    fn contains_range_anchor() {
        let pos = Position::new(10, 5);
        assert!(pos.contains(10));
        assert!(pos.contains(14));
        assert!(!pos.contains(15));
        assert!(!pos.contains(9));
    }

    #[test]
    fn contains_point_anchor() {
        let pos = Position::new(10, 0);
        assert!(pos.contains(10));
        assert!(!pos.contains(11));
    }
}
