//! Defines the background task runner used by polling devices.
use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::errors::{Error, RuntimeError};

/// Represents a handler for a task: used to abort it.
pub type TaskHandler = JoinHandle<Result<(), Error>>;

/// Runs a given future as a tokio task on the current runtime.
///
/// # Errors
/// * `RuntimeError`: no tokio runtime is running on the calling thread.
///
/// # Example
/// ```
/// use tofpi::utils::task;
///
/// #[tokio::main]
/// async fn main() {
///     let handler = task::run(async move {
///         // whatever
///         Ok(())
///     }).unwrap();
///     handler.abort();
/// }
/// ```
pub fn run<F>(future: F) -> Result<TaskHandler, Error>
where
    F: Future<Output = Result<(), Error>> + Send + 'static,
{
    let handle = Handle::try_current().map_err(|_| RuntimeError)?;
    Ok(handle.spawn(future))
}

#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::tokio::time::sleep($crate::utils::tokio::time::Duration::from_millis(
            $ms as u64,
        ))
        .await
    };
}

#[macro_export]
macro_rules! pause_sync {
    ($ms:expr) => {
        std::thread::sleep(std::time::Duration::from_millis($ms as u64))
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;

    use crate::errors::{Error, Unknown};
    use crate::utils::task;

    #[test]
    fn test_task_outside_runtime() {
        let result = task::run(async move { Ok(()) });
        assert!(matches!(result, Err(Error::RuntimeError)));
    }

    #[tokio::test]
    async fn test_task_abort_execution() {
        let flag = Arc::new(AtomicU8::new(0));

        let flag_clone = flag.clone();
        task::run(async move {
            pause!(100);
            flag_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .expect("Should not panic");

        pause!(50);
        assert_eq!(flag.load(Ordering::SeqCst), 0);
        pause!(100);
        assert_eq!(flag.load(Ordering::SeqCst), 1);

        let flag_clone = flag.clone();
        let handler = task::run(async move {
            pause!(100);
            flag_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .expect("Should not panic");

        pause!(50);
        handler.abort();
        pause!(100);
        assert_eq!(flag.load(Ordering::SeqCst), 1, "Aborted task never ran");
    }

    #[tokio::test]
    async fn test_task_with_result() {
        let handler = task::run(async move {
            Err(Unknown {
                info: "wow panic!".to_string(),
            })
        })
        .expect("A failing task does not fail the spawn");

        let result = handler.await.expect("Task was not aborted");
        assert!(result.is_err());
    }
}
