//! Conditional parallel iteration.
//!
//! Correlation pairs and frontier points are independent of one another, so
//! they can be evaluated on the rayon pool when the `parallel` feature is
//! enabled and the workload crosses [`AnalyticsConfig::parallel_threshold`].
//! Output order always matches input order.

use crate::types::AnalyticsConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &AnalyticsConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

/// Maps a fallible function over items, stopping at the first error.
///
/// Same dispatch rules as [`maybe_parallel_map`]. In parallel mode the error
/// returned is one of the failures, not necessarily the first by index.
#[allow(unused_variables)]
pub fn maybe_parallel_try_map<T, U, E, F>(
    items: &[T],
    config: &AnalyticsConfig,
    f: F,
) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map() {
        let config = AnalyticsConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results: Vec<i32> = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_maybe_parallel_map_preserves_order_above_threshold() {
        let config = AnalyticsConfig::default().with_threshold(4);
        let items: Vec<u64> = (0..64).collect();
        let results = maybe_parallel_map(&items, &config, |x| x * x);
        assert_eq!(results, items.iter().map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_maybe_parallel_try_map() {
        let config = AnalyticsConfig::sequential();
        let items = vec![1, 2, 3];

        let ok: Result<Vec<i32>, String> = maybe_parallel_try_map(&items, &config, |x| Ok(x + 1));
        assert_eq!(ok.unwrap(), vec![2, 3, 4]);

        let err: Result<Vec<i32>, String> = maybe_parallel_try_map(&items, &config, |x| {
            if *x == 2 {
                Err(format!("bad item {x}"))
            } else {
                Ok(*x)
            }
        });
        assert_eq!(err.unwrap_err(), "bad item 2");
    }

    #[test]
    fn test_parallel_threshold() {
        let config = AnalyticsConfig::default().with_threshold(10);
        assert!(!config.should_parallelize(5));

        #[cfg(feature = "parallel")]
        assert!(config.should_parallelize(100));
    }
}
