// extensions/schedule.rs
//
// Timer schedule: fire-once actions keyed to a simulated clock.
// Decoupled from Entity/Scene: the owner decides what an action means.
//
// Usage:
//   let mut timers = Schedule::new();
//   let id = timers.at(clock + 5.0, Action::EndBoost);
//   timers.cancel(id);                         // superseded before it fired
//   while let Some(due) = timers.pop_due(clock) { /* handle due.action */ }

/// Handle to a scheduled entry. Ids are never reused by the same schedule,
/// so a stale handle cannot cancel a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// An entry that has come due.
#[derive(Debug, Clone, PartialEq)]
pub struct Due<A> {
    pub id: TimerId,
    /// The time the entry was scheduled for (not the time it was popped).
    pub fire_at: f64,
    pub action: A,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    id: TimerId,
    fire_at: f64,
    action: A,
}

/// Pending fire-once actions, ordered by fire time then by insertion.
#[derive(Debug, Clone)]
pub struct Schedule<A> {
    entries: Vec<Entry<A>>,
    next_id: u32,
}

impl<A> Schedule<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `action` to fire once the clock reaches `fire_at`.
    pub fn at(&mut self, fire_at: f64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, fire_at, action });
        id
    }

    /// Cancel a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel everything. Returns how many entries were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Remove and return the earliest entry due at or before `now`.
    /// Pop one at a time so handlers may schedule or cancel in between.
    pub fn pop_due(&mut self, now: f64) -> Option<Due<A>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fire_at <= now)
            .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at).then(a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        Some(Due {
            id: entry.id,
            fire_at: entry.fire_at,
            action: entry.action,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_early() {
        let mut s = Schedule::new();
        s.at(1.0, "tick");
        assert!(s.pop_due(0.99).is_none());
        let due = s.pop_due(1.0).unwrap();
        assert_eq!(due.action, "tick");
        assert_eq!(due.fire_at, 1.0);
        assert!(s.is_empty());
    }

    #[test]
    fn fires_in_time_order_then_insertion_order() {
        let mut s = Schedule::new();
        s.at(2.0, 'c');
        s.at(1.0, 'a');
        s.at(1.0, 'b');
        let order: Vec<char> = std::iter::from_fn(|| s.pop_due(5.0).map(|d| d.action)).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn cancelled_entry_never_fires() {
        let mut s = Schedule::new();
        let id = s.at(1.0, ());
        assert_eq!(s.len(), 1);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.pop_due(10.0).is_none());
    }

    #[test]
    fn cancel_all_then_ids_keep_growing() {
        let mut s = Schedule::new();
        let old = s.at(1.0, 1);
        s.at(2.0, 2);
        assert_eq!(s.cancel_all(), 2);
        let new = s.at(1.0, 3);
        assert_ne!(old, new);
        assert!(!s.cancel(old));
        assert_eq!(s.pop_due(1.0).map(|d| d.id), Some(new));
    }
}
