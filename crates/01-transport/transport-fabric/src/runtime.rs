use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Unit of work driven by a transport thread.
pub trait TransportEngine: Send {
    /// Performs one round of work and reports how many items moved.
    fn poll(&mut self) -> usize;
    fn name(&self) -> &'static str;
}

/// Polls the engines owned by one transport thread in registration order.
#[derive(Default)]
pub struct WorkerRuntime {
    engines: Vec<Box<dyn TransportEngine>>,
    idle_rounds: u64,
}

impl WorkerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E>(&mut self, engine: E)
    where
        E: TransportEngine + 'static,
    {
        tracing::debug!(target: "transport", engine = engine.name(), "engine registered");
        self.engines.push(Box::new(engine));
    }

    /// One pass over every engine.
    pub fn tick(&mut self) -> usize {
        let moved = self
            .engines
            .iter_mut()
            .fold(0, |total, engine| total + engine.poll());
        if moved == 0 {
            self.idle_rounds += 1;
        }
        moved
    }

    /// Ticks until a pass moves nothing once `grace` has elapsed. Returns the
    /// total moved.
    pub fn settle(&mut self, grace: Duration) -> usize {
        let deadline = Instant::now() + grace;
        let mut total = 0;
        loop {
            let moved = self.tick();
            total += moved;
            if moved == 0 && Instant::now() >= deadline {
                return total;
            }
        }
    }

    /// Ticks until `stop` is raised, sleeping `idle_sleep` after idle passes.
    pub fn run_until(&mut self, stop: &AtomicBool, idle_sleep: Duration) {
        while !stop.load(Ordering::Acquire) {
            if self.tick() == 0 {
                std::thread::sleep(idle_sleep);
            }
        }
        tracing::debug!(
            target: "transport",
            engines = self.engines.len(),
            idle_rounds = self.idle_rounds,
            "runtime stopped"
        );
    }
}
