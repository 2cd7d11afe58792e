//! Timed events owned by the simulation
//!
//! Swing phases, flash reverts and fade restores are scheduled here instead of
//! as free-floating callbacks. The tick drains due entries at a fixed point,
//! in (due time, insertion order) order; handlers re-check that their target
//! still exists before touching it.

use super::collision::NodeId;
use super::state::ActorId;

/// Deferred simulation work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Mid-swing hit test for the player's attack
    AttackHitCheck,
    /// Swing animation finished
    SwingEnd,
    /// Turn off an enemy's hit highlight
    FlashEnd(ActorId),
    /// Give an occluding node its opacity back
    RestoreNode(NodeId),
}

impl TimedEvent {
    /// Actor this event refers to, if any
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            TimedEvent::FlashEnd(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f64,
    seq: u64,
    event: TimedEvent,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    /// Schedule `event` to fire at sim time `due`
    pub fn schedule(&mut self, due: f64, event: TimedEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due, seq, event });
    }

    /// Remove and return everything due at or before `now`, oldest first
    pub fn drain_due(&mut self, now: f64) -> Vec<TimedEvent> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|s| {
            if s.due <= now {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.due
                .partial_cmp(&b.due)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|s| s.event).collect()
    }

    /// Drop pending events that refer to a removed actor
    pub fn cancel_actor(&mut self, id: ActorId) {
        self.entries.retain(|s| s.event.actor() != Some(id));
    }

    pub fn is_pending(&self, event: TimedEvent) -> bool {
        self.entries.iter().any(|s| s.event == event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_order_by_due_then_insertion() {
        let mut q = TimerQueue::default();
        q.schedule(0.4, TimedEvent::SwingEnd);
        q.schedule(0.15, TimedEvent::AttackHitCheck);
        q.schedule(0.15, TimedEvent::FlashEnd(ActorId(3)));
        assert!(q.drain_due(0.1).is_empty());
        assert_eq!(
            q.drain_due(0.5),
            vec![
                TimedEvent::AttackHitCheck,
                TimedEvent::FlashEnd(ActorId(3)),
                TimedEvent::SwingEnd
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_cancel_actor() {
        let mut q = TimerQueue::default();
        q.schedule(1.0, TimedEvent::FlashEnd(ActorId(7)));
        q.schedule(1.0, TimedEvent::FlashEnd(ActorId(8)));
        q.schedule(1.0, TimedEvent::SwingEnd);
        q.cancel_actor(ActorId(7));
        assert_eq!(q.len(), 2);
        assert!(!q.is_pending(TimedEvent::FlashEnd(ActorId(7))));
        assert!(q.is_pending(TimedEvent::FlashEnd(ActorId(8))));
    }
}
