//! Default-value selection.

/// The first value that differs from `T::default()`, or the default when
/// every value is zero.
///
/// ```
/// use diaglog::config::defaults::first_non_zero;
///
/// assert_eq!(first_non_zero(&["", "foo"]), "foo");
/// assert_eq!(first_non_zero(&["bar", "foo"]), "bar");
/// assert_eq!(first_non_zero::<i64>(&[]), 0);
/// ```
pub fn first_non_zero<T>(values: &[T]) -> T
where
    T: Default + PartialEq + Clone,
{
    let zero = T::default();
    values
        .iter()
        .find(|value| **value != zero)
        .cloned()
        .unwrap_or(zero)
}
