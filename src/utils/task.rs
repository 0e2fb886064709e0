use crate::errors::ClientError;
use std::future::Future;
use std::sync::mpsc::{self as std_mpsc, Receiver, TryRecvError};

/// Runs `task` on a worker thread with its own tokio runtime. The UI thread
/// picks up the result with [`try_take`].
pub fn spawn<T, F, Fut>(task: F) -> Receiver<Result<T, ClientError>>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let (sender, receiver) = std_mpsc::channel();
    std::thread::spawn(move || {
        let result = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(task()),
            Err(e) => Err(ClientError::TaskFailed(format!(
                "Failed to start async runtime: {e}"
            ))),
        };
        let _ = sender.send(result);
    });
    receiver
}

/// Non-blocking check for a finished task. A worker that went away without
/// answering is reported as a failure.
pub fn try_take<T>(receiver: &Receiver<Result<T, ClientError>>) -> Option<Result<T, ClientError>> {
    match receiver.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(ClientError::TaskFailed(
            "worker exited without a result".to_string(),
        ))),
    }
}
