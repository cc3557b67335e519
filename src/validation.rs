//! Validation type for accumulating errors
//!
//! This module provides the `Validation` type, which is similar to `Result`
//! but designed for validation scenarios where we want to accumulate all
//! errors rather than short-circuiting on the first failure.
//!
//! # Examples
//!
//! ## Combining validations
//!
//! ```
//! use millrace::Validation;
//!
//! let v1 = Validation::<_, Vec<&str>>::success(1);
//! let v2 = Validation::<_, Vec<&str>>::success(2);
//! let result = v1.and(v2);
//!
//! assert_eq!(result, Validation::Success((1, 2)));
//! ```
//!
//! ## Accumulating errors
//!
//! ```
//! use millrace::Validation;
//!
//! let v1 = Validation::<i32, _>::failure(vec!["error1"]);
//! let v2 = Validation::<i32, _>::failure(vec!["error2"]);
//! let result = v1.and(v2);
//!
//! assert_eq!(result, Validation::Failure(vec!["error1", "error2"]));
//! ```

use crate::Semigroup;

/// A validation that either succeeds with a value or fails with accumulated errors
///
/// Unlike `Result`, `Validation` is designed to accumulate multiple errors
/// when combining validations. This makes it ideal for input validation where
/// the caller should see every violation at once, not just the first.
///
/// # Type Parameters
///
/// * `T` - The type of the success value
/// * `E` - The type of the error value (must implement `Semigroup` for accumulation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, E> {
    /// Successful validation with a value
    Success(T),
    /// Failed validation with accumulated errors
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Create a validation from a Result
    #[inline]
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error),
        }
    }

    /// Convert this validation to a Result
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(error) => Err(error),
        }
    }

    /// Check if this validation is successful
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Check if this validation failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// Transform the success value if present
    #[inline]
    pub fn map<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Transform the error value if present
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Validation<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(error) => Validation::Failure(f(error)),
        }
    }
}

impl<T, E: Semigroup> Validation<T, E> {
    /// Combine two validations, accumulating errors using the Semigroup instance
    ///
    /// If both validations are successful, returns a success with a tuple of
    /// both values. If either or both fail, accumulates the errors using
    /// `Semigroup::combine`.
    ///
    /// # Examples
    ///
    /// ```
    /// use millrace::Validation;
    ///
    /// // Both failed - errors accumulate
    /// let v1 = Validation::<i32, _>::failure(vec!["error1"]);
    /// let v2 = Validation::<i32, _>::failure(vec!["error2"]);
    /// assert_eq!(v1.and(v2), Validation::Failure(vec!["error1", "error2"]));
    /// ```
    pub fn and<U>(self, other: Validation<U, E>) -> Validation<(T, U), E> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
            (Validation::Failure(e), _) => Validation::Failure(e),
            (_, Validation::Failure(e)) => Validation::Failure(e),
        }
    }

    /// Chain a dependent validation
    ///
    /// The function is only called if the current validation is successful.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> Validation<U, E>,
    {
        match self {
            Validation::Success(value) => f(value),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Combine all validations in a Vec
    ///
    /// Returns a success with a Vec of all success values if every validation
    /// succeeds. Otherwise, accumulates all errors using `Semigroup::combine`.
    pub fn all_vec(validations: Vec<Validation<T, E>>) -> Validation<Vec<T>, E> {
        let mut successes = Vec::new();
        let mut failure: Option<E> = None;

        for validation in validations {
            match validation {
                Validation::Success(value) => successes.push(value),
                Validation::Failure(error) => {
                    failure = Some(match failure {
                        Some(acc) => acc.combine(error),
                        None => error,
                    });
                }
            }
        }

        match failure {
            None => Validation::Success(successes),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

/// Trait for combining multiple validations in a tuple
///
/// Implemented for tuples of validations so heterogeneous success types can
/// be validated together with full error accumulation.
pub trait ValidateAll<E: Semigroup> {
    /// The output type when all validations succeed
    type Output;

    /// Combine all validations, accumulating errors
    fn validate_all(self) -> Validation<Self::Output, E>;
}

impl<E: Semigroup, T1, T2> ValidateAll<E> for (Validation<T1, E>, Validation<T2, E>) {
    type Output = (T1, T2);

    fn validate_all(self) -> Validation<(T1, T2), E> {
        let (v1, v2) = self;
        v1.and(v2)
    }
}

impl<E: Semigroup, T1, T2, T3> ValidateAll<E>
    for (Validation<T1, E>, Validation<T2, E>, Validation<T3, E>)
{
    type Output = (T1, T2, T3);

    fn validate_all(self) -> Validation<(T1, T2, T3), E> {
        let (v1, v2, v3) = self;
        v1.and(v2).and(v3).map(|((a, b), c)| (a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_predicates() {
        let s = Validation::<_, Vec<&str>>::success(42);
        assert!(s.is_success());

        let f = Validation::<i32, _>::failure(vec!["error"]);
        assert!(f.is_failure());
    }

    #[test]
    fn and_accumulates_both_failures() {
        let v1 = Validation::<i32, _>::failure(vec!["error1"]);
        let v2 = Validation::<i32, _>::failure(vec!["error2"]);
        assert_eq!(v1.and(v2), Validation::Failure(vec!["error1", "error2"]));
    }

    #[test]
    fn and_keeps_single_failure() {
        let v1 = Validation::<_, Vec<&str>>::success(1);
        let v2 = Validation::<i32, _>::failure(vec!["error"]);
        assert_eq!(v1.and(v2), Validation::Failure(vec!["error"]));
    }

    #[test]
    fn and_pairs_successes() {
        let v1 = Validation::<_, Vec<&str>>::success(1);
        let v2 = Validation::<_, Vec<&str>>::success(2);
        assert_eq!(v1.and(v2), Validation::Success((1, 2)));
    }

    #[test]
    fn all_vec_accumulates() {
        let validations = vec![
            Validation::<i32, _>::failure(vec!["error1"]),
            Validation::success(1),
            Validation::failure(vec!["error2"]),
        ];
        assert_eq!(
            Validation::all_vec(validations),
            Validation::Failure(vec!["error1", "error2"])
        );
    }

    #[test]
    fn all_vec_collects_successes() {
        let validations = vec![
            Validation::<_, Vec<&str>>::success(1),
            Validation::success(2),
            Validation::success(3),
        ];
        assert_eq!(
            Validation::all_vec(validations),
            Validation::Success(vec![1, 2, 3])
        );
    }

    #[test]
    fn validate_all_triple() {
        let result = (
            Validation::<_, Vec<&str>>::success(1),
            Validation::<_, Vec<&str>>::success("two"),
            Validation::<_, Vec<&str>>::success(3.0),
        )
            .validate_all();
        assert_eq!(result, Validation::Success((1, "two", 3.0)));
    }

    #[test]
    fn and_then_short_circuits_on_failure() {
        let v = Validation::<i32, Vec<&str>>::failure(vec!["bad"]);
        let result = v.and_then(|x| Validation::success(x * 2));
        assert_eq!(result, Validation::Failure(vec!["bad"]));
    }

    #[test]
    fn round_trips_through_result() {
        let v = Validation::<_, String>::success(42);
        assert_eq!(v.clone().into_result(), Ok(42));
        assert_eq!(Validation::from_result(v.into_result()), Validation::Success(42));
    }
}
