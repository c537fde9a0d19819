//! Already-resolved futures.

use futures::future::{Ready, ready};

/// A future that is resolved before it is first polled.
pub type Completed<T> = Ready<T>;

/// Create a future that resolves immediately to `value`.
///
/// Use `completed(())` where a caller expects "some future" but there is no
/// work to wait on.
pub fn completed<T>(value: T) -> Completed<T> {
    ready(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn resolves_on_first_poll() {
        assert_eq!(completed(42).now_or_never(), Some(42));
        assert_eq!(completed(()).now_or_never(), Some(()));
    }
}
