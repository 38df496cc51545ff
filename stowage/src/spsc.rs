// SPDX-License-Identifier: Apache-2.0

//! A lock-free single-producer, single-consumer ring buffer.
//!
//! The ring holds two free-running counters: how many values have been produced,
//! and how many consumed. Their wrapping difference is the number of queued
//! values, and each counter masked by `N - 1` is the slot it points at. The
//! producer only ever stores the produce counter, the consumer only the consume
//! counter. Each stores with release ordering after touching its slot and loads
//! the other's counter with acquire ordering, so a slot is never read before its
//! write is visible nor overwritten before its read completes.
//!
//! # Example
//!
//! ```
//! use stowage::Ring;
//!
//! let mut ring = Ring::<u32, 8>::new();
//! let (mut tx, mut rx) = ring.split();
//!
//! tx.push(42).unwrap();
//! assert_eq!(rx.pop(), Some(42));
//! ```
//!
//! Capacities that aren't a power of two fail to compile:
//!
//! ```compile_fail
//! use stowage::Ring;
//!
//! let mut ring = Ring::<u32, 100>::new();
//! ```

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use crossbeam_utils::CachePadded;
use log::trace;

/// A fixed-capacity SPSC ring buffer holding up to `N` values inline. `N` must be
/// a power of two.
pub struct Ring<T, const N: usize> {
	produced: CachePadded<AtomicUsize>,
	consumed: CachePadded<AtomicUsize>,
	buf: [UnsafeCell<MaybeUninit<T>>; N],
}

// Safety: slots are only written by the single producer and only read by the
// single consumer, handed off through the release/acquire counter pair.
unsafe impl<T: Send, const N: usize> Sync for Ring<T, N> { }

/// The producing half of a split [`Ring`].
pub struct Producer<'a, T, const N: usize> {
	ring: &'a Ring<T, N>,
	produced: usize,
	cached_consumed: usize,
}

/// The consuming half of a split [`Ring`].
pub struct Consumer<'a, T, const N: usize> {
	ring: &'a Ring<T, N>,
	consumed: usize,
	cached_produced: usize,
}

impl<T, const N: usize> Default for Ring<T, N> {
	fn default() -> Self { Self::new() }
}

impl<T, const N: usize> Ring<T, N> {
	const MASK: usize = {
		assert!(N.is_power_of_two(), "ring capacity must be a power of two");
		N - 1
	};

	#[allow(clippy::declare_interior_mutable_const)]
	const SLOT: UnsafeCell<MaybeUninit<T>> = UnsafeCell::new(MaybeUninit::uninit());

	/// Creates an empty ring.
	pub const fn new() -> Self {
		let _ = Self::MASK;
		Self {
			produced: CachePadded::new(AtomicUsize::new(0)),
			consumed: CachePadded::new(AtomicUsize::new(0)),
			buf: [Self::SLOT; N],
		}
	}

	/// Empties the ring, dropping any queued values and zeroing both counters.
	pub fn init(&mut self) {
		self.drop_queued();
		*self.produced.get_mut() = 0;
		*self.consumed.get_mut() = 0;
		trace!("initialized SPSC ring of capacity {}", N);
	}

	/// Splits the ring into its producer and consumer halves. Holding the ring
	/// mutably borrowed guarantees there is only one of each.
	pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
		let produced = *self.produced.get_mut();
		let consumed = *self.consumed.get_mut();
		let ring = &*self;
		(
			Producer { ring, produced, cached_consumed: consumed },
			Consumer { ring, consumed, cached_produced: produced },
		)
	}

	/// Returns the number of values the ring can hold.
	pub const fn capacity(&self) -> usize { N }

	/// Returns the number of queued values. From outside the producer and consumer
	/// this is a snapshot that may be stale by the time it's read.
	pub fn len(&self) -> usize {
		let consumed = self.consumed.load(Ordering::Acquire);
		let produced = self.produced.load(Ordering::Acquire);
		produced.wrapping_sub(consumed).min(N)
	}

	/// Returns `true` if no values are queued.
	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// Returns `true` if the ring holds `N` values.
	pub fn is_full(&self) -> bool { self.len() == N }

	fn slot(&self, counter: usize) -> *mut MaybeUninit<T> {
		self.buf[counter & Self::MASK].get()
	}

	fn drop_queued(&mut self) {
		let produced = *self.produced.get_mut();
		let mut consumed = *self.consumed.get_mut();
		while consumed != produced {
			// Safety: every slot between the counters holds a written value.
			unsafe {
				self.buf[consumed & Self::MASK].get_mut().assume_init_drop();
			}
			consumed = consumed.wrapping_add(1);
		}
		*self.consumed.get_mut() = consumed;
	}
}

impl<T, const N: usize> Drop for Ring<T, N> {
	fn drop(&mut self) {
		self.drop_queued()
	}
}

impl<T, const N: usize> fmt::Debug for Ring<T, N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Ring")
		 .field("capacity", &N)
		 .field("len", &self.len())
		 .finish()
	}
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
	/// Pushes `value` to the back of the ring, returning it if the ring is full.
	#[inline]
	pub fn push(&mut self, value: T) -> Result<(), T> {
		let produced = self.produced;
		if produced.wrapping_sub(self.cached_consumed) == N {
			self.cached_consumed = self.ring.consumed.load(Ordering::Acquire);
			if produced.wrapping_sub(self.cached_consumed) == N {
				return Err(value)
			}
		}

		// Safety: the slot is either fresh or was consumed, as observed through
		// the acquire load of the consume counter above.
		unsafe {
			(*self.ring.slot(produced)).write(value);
		}
		self.produced = produced.wrapping_add(1);
		self.ring.produced.store(self.produced, Ordering::Release);
		Ok(())
	}

	/// Returns `true` if the ring is full.
	pub fn is_full(&self) -> bool {
		self.produced.wrapping_sub(self.ring.consumed.load(Ordering::Acquire)) == N
	}

	/// Returns the number of values that can be pushed before the ring is full.
	pub fn limit(&self) -> usize {
		N - self.produced.wrapping_sub(self.ring.consumed.load(Ordering::Acquire))
	}

	/// Returns the number of values the ring can hold.
	pub const fn capacity(&self) -> usize { N }
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
	/// Pops a value from the front of the ring, or returns `None` if it's empty.
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		let consumed = self.consumed;
		if !self.refresh(consumed) {
			return None
		}

		// Safety: the slot was written before the produce counter we acquired.
		let value = unsafe { (*self.ring.slot(consumed)).assume_init_read() };
		self.consumed = consumed.wrapping_add(1);
		self.ring.consumed.store(self.consumed, Ordering::Release);
		Some(value)
	}

	/// Returns a reference to the front value without popping it, or `None` if the
	/// ring is empty.
	pub fn peek(&mut self) -> Option<&T> {
		let consumed = self.consumed;
		if !self.refresh(consumed) {
			return None
		}

		// Safety: as in `pop`; the producer won't overwrite the slot until the
		// consume counter passes it, which needs `&mut self`.
		unsafe { Some((*self.ring.slot(consumed)).assume_init_ref()) }
	}

	/// Returns `true` if the ring is empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of values ready to pop.
	pub fn len(&self) -> usize {
		self.ring.produced.load(Ordering::Acquire).wrapping_sub(self.consumed)
	}

	/// Returns the number of values the ring can hold.
	pub const fn capacity(&self) -> usize { N }

	/// Returns `true` if a value is ready at `consumed`, reloading the produce
	/// counter only when the cached copy says the ring is empty.
	fn refresh(&mut self, consumed: usize) -> bool {
		if consumed == self.cached_produced {
			self.cached_produced = self.ring.produced.load(Ordering::Acquire);
		}
		consumed != self.cached_produced
	}
}
