use std::fmt;
use std::ops::Deref;

/// Read-only wrapper for reference-element operators. Only this crate can
/// create one, and it hands out shared references only.
#[derive(Clone, PartialEq)]
pub struct Frozen<T> {
    label: &'static str,
    value: T,
}

impl<T> Frozen<T> {
    pub(crate) fn new(label: &'static str, value: T) -> Self {
        Self { label, value }
    }
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frozen({}) {:?}", self.label, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_frozen_reads_through() {
        let dr = Frozen::new("Dr", array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(dr.label(), "Dr");
        assert_eq!(dr[[1, 0]], 3.0);
        assert_eq!(dr.dot(&array![1.0, 1.0]), array![3.0, 7.0]);
    }
}
