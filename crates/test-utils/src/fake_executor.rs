use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tom::exec::{CommandExecutor, CommandJob};
use tom::fs::FileSystem;

/// A fake executor that:
/// - records which commands were "run", in start order
/// - writes the product file into the given filesystem on success
/// - fails for products registered with [`FakeExecutor::failing`]
/// - tracks the peak number of commands running at once
pub struct FakeExecutor {
    fs: Arc<dyn FileSystem>,
    executed: Arc<Mutex<Vec<CommandJob>>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    running: AtomicUsize,
    peak: Arc<AtomicUsize>,
}

impl FakeExecutor {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            executed: Arc::new(Mutex::new(Vec::new())),
            failing: HashSet::new(),
            delay: None,
            running: AtomicUsize::new(0),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Commands for the product with this name exit with an error.
    pub fn failing(mut self, product: &str) -> Self {
        self.failing.insert(product.to_string());
        self
    }

    /// Each command takes this long.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn executed(&self) -> Arc<Mutex<Vec<CommandJob>>> {
        Arc::clone(&self.executed)
    }

    pub fn peak(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }
}

/// Product names from a shared execution log.
pub fn product_names(executed: &Arc<Mutex<Vec<CommandJob>>>) -> Vec<String> {
    executed
        .lock()
        .unwrap()
        .iter()
        .map(|job| job.product.clone())
        .collect()
}

impl CommandExecutor for FakeExecutor {
    fn execute<'a>(
        &'a self,
        job: &'a CommandJob,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(job.clone());

            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let result = if self.failing.contains(&job.product) {
                Err(anyhow!("command exited with status 1"))
            } else {
                self.fs.write(&job.target, job.command.as_bytes())
            };

            self.running.fetch_sub(1, Ordering::SeqCst);
            result
        })
    }
}
