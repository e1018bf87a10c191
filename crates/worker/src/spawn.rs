use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("asmfold-worker-global")
			.build()
			.expect("failed to build asmfold-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task with shared worker classification metadata.
///
/// Uses the ambient tokio runtime when one exists, falling back to an owned
/// global runtime so hosts without a runtime of their own still work.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn spawn_runs_on_ambient_runtime() {
		let handle = spawn(TaskClass::Background, async { 41 + 1 });
		assert_eq!(handle.await.unwrap(), 42);
	}

	#[test]
	fn spawn_falls_back_to_global_runtime() {
		let (tx, rx) = std::sync::mpsc::channel();
		spawn(TaskClass::Interactive, async move {
			tx.send(7usize).ok();
		});
		assert_eq!(rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap(), 7);
	}
}
