use anyhow::{anyhow, Result};
use log::debug;
use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::tui::screen::{LoadTask, Loaded, ScreenId};

/// A finished fetch, queued for the render thread.
pub struct Completion {
    pub screen: ScreenId,
    pub generation: u64,
    pub result: Result<Loaded>,
}

/// Runs screen fetches on worker tasks and hands their results back through a
/// single-consumer queue drained by the render loop.
///
/// Every load is tagged with a per-screen generation; a completion whose
/// generation is no longer current belongs to a superseded load and is dropped.
pub struct AsyncLoadCoordinator {
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    generations: HashMap<ScreenId, u64>,
    next_generation: u64,
}

impl AsyncLoadCoordinator {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            generations: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Start `task` for `screen`, superseding any load already in flight for it.
    pub fn spawn(&mut self, screen: ScreenId, task: LoadTask) -> u64 {
        let generation = self.invalidate(screen);
        debug!("Starting load for {} (generation {})", screen, generation);

        let tx = self.tx.clone();
        let worker = tokio::spawn(task);
        tokio::spawn(async move {
            // A panicking fetch surfaces as a JoinError instead of taking the UI down.
            let result = match worker.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("load of {} aborted: {}", screen, e)),
            };

            if tx
                .send(Completion {
                    screen,
                    generation,
                    result,
                })
                .is_err()
            {
                debug!("Load for {} finished after shutdown", screen);
            }
        });

        generation
    }

    /// Make any in-flight load for `screen` stale. Returns the new generation.
    pub fn invalidate(&mut self, screen: ScreenId) -> u64 {
        self.next_generation += 1;
        self.generations.insert(screen, self.next_generation);
        self.next_generation
    }

    pub fn is_current(&self, completion: &Completion) -> bool {
        self.generations.get(&completion.screen) == Some(&completion.generation)
    }

    /// Next current completion, if one is already queued.
    pub fn try_next(&mut self) -> Option<Completion> {
        while let Ok(completion) = self.rx.try_recv() {
            if self.is_current(&completion) {
                return Some(completion);
            }
            self.discard(&completion);
        }
        None
    }

    /// Wait for the next current completion.
    pub async fn next(&mut self) -> Option<Completion> {
        while let Some(completion) = self.rx.recv().await {
            if self.is_current(&completion) {
                return Some(completion);
            }
            self.discard(&completion);
        }
        None
    }

    fn discard(&self, completion: &Completion) {
        debug!(
            "Discarding stale load for {} (generation {}, current {:?})",
            completion.screen,
            completion.generation,
            self.generations.get(&completion.screen)
        );
    }
}

impl Default for AsyncLoadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::screen::ready;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let mut loader = AsyncLoadCoordinator::new();
        let (release, gate) = oneshot::channel::<()>();

        let first = loader.spawn(
            ScreenId::Workspaces,
            Box::pin(async move {
                let _ = gate.await;
                Ok::<_, anyhow::Error>(Loaded::Nothing)
            }),
        );
        let second = loader.spawn(ScreenId::Workspaces, ready(Loaded::Nothing));
        assert!(second > first);

        let completion = loader.next().await.unwrap();
        assert_eq!(completion.generation, second);

        release.send(()).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(loader.try_next().is_none());
    }

    #[tokio::test]
    async fn test_panicking_load_is_reported_as_failure() {
        let mut loader = AsyncLoadCoordinator::new();
        loader.spawn(
            ScreenId::Run,
            Box::pin(async move {
                if true {
                    panic!("boom");
                }
                Ok::<_, anyhow::Error>(Loaded::Nothing)
            }),
        );

        let completion = loader.next().await.unwrap();
        let err = completion.result.err().unwrap();
        assert!(err.to_string().contains("load of run aborted"));
    }

    #[tokio::test]
    async fn test_loads_for_different_screens_do_not_interfere() {
        let mut loader = AsyncLoadCoordinator::new();
        loader.spawn(ScreenId::Organizations, ready(Loaded::Nothing));
        loader.spawn(ScreenId::Workspaces, ready(Loaded::Nothing));

        let mut seen = vec![
            loader.next().await.unwrap().screen,
            loader.next().await.unwrap().screen,
        ];
        seen.sort_by_key(|id| id.name());
        assert_eq!(seen, vec![ScreenId::Organizations, ScreenId::Workspaces]);
    }
}
