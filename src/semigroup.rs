//! Semigroup trait for combining error collections
//!
//! A semigroup is a type with an associative combine operation. Validation
//! uses it to accumulate field errors instead of short-circuiting on the
//! first one.

/// A type with an associative combine operation
///
/// # Laws
///
/// Associativity: `a.combine(b).combine(c) == a.combine(b.combine(c))`
///
/// # Examples
///
/// ```
/// use millrace::Semigroup;
///
/// let combined = vec![1, 2].combine(vec![3]);
/// assert_eq!(combined, vec![1, 2, 3]);
/// ```
pub trait Semigroup {
    /// Combine two values into one
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    fn combine(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }
}

impl Semigroup for String {
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}
