//! Fixed-capacity slot pools
//!
//! Dense arrays with an alive flag per slot. Capacities are tiny (at most
//! 24), so allocation is a linear scan:
//! - [`SlotPool::alloc`]: first dead slot, else evict the oldest occupant
//!   (largest age; ties go to the earlier slot)
//! - [`SlotPool::alloc_round_robin`]: overwrite the slot under a write cursor

use crate::sim::time::{Millis, age};

/// An entry that can live in a [`SlotPool`]
pub trait Slot: Default + Clone {
    fn born_ms(&self) -> Millis;
    fn is_alive(&self) -> bool;
    fn set_alive(&mut self, alive: bool);
}

#[derive(Debug, Clone)]
pub struct SlotPool<T: Slot, const N: usize> {
    slots: [T; N],
    cursor: usize,
}

impl<T: Slot, const N: usize> Default for SlotPool<T, N> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| T::default()),
            cursor: 0,
        }
    }
}

impl<T: Slot, const N: usize> SlotPool<T, N> {
    pub const CAPACITY: usize = N;

    /// Kill every slot and rewind the write cursor
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.set_alive(false);
        }
        self.cursor = 0;
    }

    /// Index a new entry should occupy: first free slot, else the oldest
    pub fn pick_slot(&self, now: Millis) -> usize {
        if let Some(free) = self.slots.iter().position(|s| !s.is_alive()) {
            return free;
        }
        let mut oldest = 0;
        let mut oldest_age = 0u32;
        for (i, slot) in self.slots.iter().enumerate() {
            let a = age(now, slot.born_ms());
            if i == 0 || a > oldest_age {
                oldest = i;
                oldest_age = a;
            }
        }
        oldest
    }

    /// Store `entry` in the first free slot or over the oldest one
    pub fn alloc(&mut self, now: Millis, mut entry: T) -> usize {
        let i = self.pick_slot(now);
        entry.set_alive(true);
        self.slots[i] = entry;
        i
    }

    /// Store `entry` at the write cursor and advance it
    pub fn alloc_round_robin(&mut self, mut entry: T) -> usize {
        let i = self.cursor;
        entry.set_alive(true);
        self.slots[i] = entry;
        self.cursor = (self.cursor + 1) % N;
        i
    }

    /// Kill entries older than `lifetime_ms`
    pub fn expire(&mut self, now: Millis, lifetime_ms: u32) {
        for slot in &mut self.slots {
            if slot.is_alive() && age(now, slot.born_ms()) > lifetime_ms {
                slot.set_alive(false);
            }
        }
    }

    pub fn any_alive(&self) -> bool {
        self.slots.iter().any(Slot::is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_alive()).count()
    }

    pub fn alive(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_alive())
    }

    pub fn slots(&self) -> &[T; N] {
        &self.slots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Token {
        born: Millis,
        alive: bool,
        tag: u32,
    }

    impl Slot for Token {
        fn born_ms(&self) -> Millis {
            self.born
        }
        fn is_alive(&self) -> bool {
            self.alive
        }
        fn set_alive(&mut self, alive: bool) {
            self.alive = alive;
        }
    }

    fn token(born: Millis, tag: u32) -> Token {
        Token {
            born,
            alive: false,
            tag,
        }
    }

    #[test]
    fn test_first_free_slot_wins() {
        let mut pool: SlotPool<Token, 3> = SlotPool::default();
        assert_eq!(pool.alloc(0, token(0, 1)), 0);
        assert_eq!(pool.alloc(1, token(1, 2)), 1);
        pool.expire(100, 50);
        assert_eq!(pool.alive_count(), 0);
        assert_eq!(pool.alloc(100, token(100, 3)), 0);
    }

    #[test]
    fn test_full_pool_evicts_oldest() {
        let mut pool: SlotPool<Token, 3> = SlotPool::default();
        pool.alloc(30, token(30, 1));
        pool.alloc(10, token(10, 2));
        pool.alloc(20, token(20, 3));
        let i = pool.alloc(40, token(40, 4));
        assert_eq!(i, 1);
        assert_eq!(pool.alive_count(), 3);
        assert!(pool.alive().all(|t| t.tag != 2));
    }

    #[test]
    fn test_eviction_tie_goes_to_first_slot() {
        let mut pool: SlotPool<Token, 3> = SlotPool::default();
        pool.alloc(50, token(50, 1));
        pool.alloc(10, token(10, 2));
        pool.alloc(10, token(10, 3));
        assert_eq!(pool.pick_slot(60), 1);
    }

    #[test]
    fn test_eviction_across_rollover() {
        let mut pool: SlotPool<Token, 2> = SlotPool::default();
        // Born before the wrap is older even though its raw value is larger
        pool.alloc(u32::MAX - 5, token(u32::MAX - 5, 1));
        pool.alloc(3, token(3, 2));
        assert_eq!(pool.pick_slot(10), 0);
    }

    #[test]
    fn test_round_robin_cursor() {
        let mut pool: SlotPool<Token, 2> = SlotPool::default();
        assert_eq!(pool.alloc_round_robin(token(0, 1)), 0);
        assert_eq!(pool.alloc_round_robin(token(0, 2)), 1);
        assert_eq!(pool.alloc_round_robin(token(0, 3)), 0);
        assert_eq!(pool.cursor(), 1);
        pool.reset();
        assert_eq!(pool.cursor(), 0);
        assert!(!pool.any_alive());
    }

    #[test]
    fn test_expire_is_strictly_greater() {
        let mut pool: SlotPool<Token, 1> = SlotPool::default();
        pool.alloc(0, token(0, 1));
        pool.expire(250, 250);
        assert!(pool.any_alive());
        pool.expire(251, 250);
        assert!(!pool.any_alive());
    }
}
