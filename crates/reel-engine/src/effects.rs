//! Deferred host commands.
//!
//! Despawning mutates host registries that rendering/UI callbacks may also
//! touch, so despawns are never applied inline. They are queued here and
//! drained by the session's owning simulation thread, keeping every
//! registry mutation on one thread. Placements are not deferred: they only
//! touch the actor's own state.
//!
//! The queue is a crossbeam channel, so a [`Sender`] obtained from
//! [`EffectQueue::sender`] can be handed to another thread.

use crossbeam_channel::{Receiver, Sender};
use reel_core::{ActorHandle, ActorHost};

/// A destructive host operation awaiting the simulation thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// Remove an actor from the world.
    Despawn(ActorHandle),
}

/// Unbounded FIFO of [`HostCommand`]s.
pub struct EffectQueue {
    tx: Sender<HostCommand>,
    rx: Receiver<HostCommand>,
}

impl Default for EffectQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectQueue {
    /// An empty queue.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Schedule `command` for the next drain.
    pub fn push(&self, command: HostCommand) {
        // The queue owns a receiver, so the channel cannot be disconnected.
        let _ = self.tx.send(command);
    }

    /// A sender other threads can use to schedule commands.
    pub fn sender(&self) -> Sender<HostCommand> {
        self.tx.clone()
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Apply every queued command to `host` in FIFO order.
    ///
    /// Returns the number of commands applied.
    pub fn drain(&self, host: &mut dyn ActorHost) -> usize {
        let mut applied = 0;
        for command in self.rx.try_iter() {
            match command {
                HostCommand::Despawn(handle) => host.despawn(handle),
            }
            applied += 1;
        }
        applied
    }
}
