use crate::controller::{AutoplayStep, GameController};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub type SharedController = Arc<Mutex<GameController>>;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Paces computer turns. Each turn waits `delay`, then re-reads the game and
/// acts only if the same deal is still in progress and a computer is due.
#[derive(Clone)]
pub struct TurnScheduler {
    controller: SharedController,
    delay: Duration,
    token: CancellationToken,
}

impl TurnScheduler {
    pub fn new(controller: SharedController, delay: Duration) -> Self {
        Self {
            controller,
            delay,
            token: CancellationToken::new(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives computer turns on a background task until a human is due, the
    /// round ends, the game is restarted or the scheduler is cancelled.
    /// Resolves to the steps that were applied.
    pub fn spawn(&self) -> JoinHandle<Vec<AutoplayStep>> {
        let generation = self.controller.lock().generation();
        let controller = Arc::clone(&self.controller);
        let token = self.token.child_token();
        let delay = self.delay;
        tokio::spawn(async move { drive(controller, generation, delay, token, |_| {}).await })
    }

    /// Like [`TurnScheduler::spawn`] but runs inline and reports each step
    /// as soon as it is applied.
    pub async fn run<F>(&self, on_step: F) -> Vec<AutoplayStep>
    where
        F: FnMut(&AutoplayStep),
    {
        let generation = self.controller.lock().generation();
        drive(
            Arc::clone(&self.controller),
            generation,
            self.delay,
            self.token.child_token(),
            on_step,
        )
        .await
    }
}

async fn drive<F>(
    controller: SharedController,
    generation: u64,
    delay: Duration,
    token: CancellationToken,
    mut on_step: F,
) -> Vec<AutoplayStep>
where
    F: FnMut(&AutoplayStep),
{
    let mut applied = Vec::new();
    loop {
        if !controller.lock().computer_turn_pending() {
            break;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(generation, "computer turns cancelled");
                break;
            }
            _ = sleep(delay) => {}
        }

        let step = {
            let mut guard = controller.lock();
            if guard.generation() != generation {
                debug!(generation, current = guard.generation(), "stale computer turn dropped");
                None
            } else {
                guard.autoplay_one()
            }
        };

        match step {
            Some(step) => {
                on_step(&step);
                applied.push(step);
            }
            None => break,
        }
    }
    applied
}
