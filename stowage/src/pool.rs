// SPDX-License-Identifier: Apache-2.0

//! A fixed-capacity pool of fixed-size blocks.
//!
//! All `N` blocks are stored inline, so a pool's footprint is known at compile
//! time and it can sit in a `static` or inside another structure. Bookkeeping is
//! a [`Links`] arena with two lists: *free*, holding blocks ready to be claimed,
//! and *store*, holding blocks handed out to callers. A block is always on
//! exactly one of them.

use std::{fmt, mem};
use log::{debug, trace};
use thiserror::Error;
use crate::list::{ListError, ListId, Links};

const FREE: ListId<2> = ListId::new(0);
const STORE: ListId<2> = ListId::new(1);

/// An error returned when freeing a block.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum PoolError {
	#[error("block {index} is not allocated")]
	NotAllocated { index: usize },
	#[error(transparent)]
	List(#[from] ListError),
}

/// An owning reference to an allocated block. Handles can't be copied, so a
/// block can only be freed once through its handle.
///
/// A handle is only meaningful to the pool that returned it. Passing it to
/// another pool is a contract violation: it may free or read a different block.
#[derive(Debug, Eq, PartialEq, Hash)]
#[must_use = "a dropped handle leaks its block until the pool is reinitialized"]
pub struct Handle {
	index: usize,
}

impl Handle {
	/// Returns the index of the block in the pool.
	pub fn index(&self) -> usize { self.index }
}

/// A pool of `N` blocks of type `T`.
pub struct Pool<T, const N: usize> {
	links: Links<N, 2>,
	blocks: [T; N],
}

impl<T: Default, const N: usize> Default for Pool<T, N> {
	fn default() -> Self { Self::new() }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Pool<T, N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pool")
		 .field("capacity", &N)
		 .field("available", &self.available())
		 .field("allocated", &self.iter_allocated().collect::<Vec<_>>())
		 .finish()
	}
}

impl<T: Default, const N: usize> Pool<T, N> {
	/// Creates a pool with all blocks free, each holding `T::default()`.
	pub fn new() -> Self {
		Self::from_fn(|_| T::default())
	}

	/// Frees `handle`, moving its value out of the block and leaving the default
	/// in its place.
	pub fn take(&mut self, handle: Handle) -> Result<T, PoolError> {
		let index = handle.index;
		self.free(handle)?;
		Ok(mem::take(&mut self.blocks[index]))
	}
}

impl<T: Copy, const N: usize> Pool<T, N> {
	/// Creates a pool with all blocks free, each holding `value`. Usable in a
	/// `static`:
	///
	/// ```
	/// use std::sync::Mutex;
	/// use stowage::Pool;
	///
	/// static POOL: Mutex<Pool<[u8; 32], 8>> = Mutex::new(Pool::filled([0; 32]));
	///
	/// let mut pool = POOL.lock().unwrap();
	/// let block = pool.alloc().unwrap();
	/// pool.free(block).unwrap();
	/// ```
	pub const fn filled(value: T) -> Self {
		Self {
			links: Links::filled(FREE),
			blocks: [value; N],
		}
	}
}

impl<T, const N: usize> Pool<T, N> {
	/// Creates a pool with all blocks free, filling block `i` with `block(i)`.
	pub fn from_fn(block: impl FnMut(usize) -> T) -> Self {
		let mut pool = Self {
			links: Links::new(),
			blocks: std::array::from_fn(block),
		};
		pool.init();
		pool
	}

	/// Returns every block to the free list. Outstanding handles become invalid;
	/// block contents are left as they are.
	pub fn init(&mut self) {
		self.links.init(FREE);
		self.links.init(STORE);
		for index in 0..N {
			let linked = self.links.add(FREE, index);
			debug_assert!(linked.is_ok(), "block {index} was linked after reset");
		}
		trace!("initialized pool of {} blocks", N);
	}

	/// Returns the number of blocks in the pool.
	pub const fn capacity(&self) -> usize { N }

	/// Returns the number of free blocks.
	pub fn available(&self) -> usize { self.links.len(FREE) }

	/// Returns the number of allocated blocks.
	pub fn allocated(&self) -> usize { self.links.len(STORE) }

	/// Returns `true` if no blocks are free.
	pub fn is_exhausted(&self) -> bool { self.links.is_empty(FREE) }

	/// Claims a free block, or returns `None` if the pool is exhausted. The block
	/// holds whatever its previous owner left in it.
	pub fn alloc(&mut self) -> Option<Handle> {
		let Some(index) = self.links.front(FREE) else {
			debug!("pool exhausted, all {} blocks allocated", N);
			return None
		};

		let moved = self.links.move_to(STORE, index);
		debug_assert!(moved.is_ok(), "free block {index} could not be moved to the store list");
		Some(Handle { index })
	}

	/// Claims a free block and writes `value` to it, returning `value` back if the
	/// pool is exhausted.
	pub fn insert(&mut self, value: T) -> Result<Handle, T> {
		match self.alloc() {
			Some(handle) => {
				self.blocks[handle.index] = value;
				Ok(handle)
			}
			None => Err(value)
		}
	}

	/// Returns the block behind `handle` to the free list.
	pub fn free(&mut self, handle: Handle) -> Result<(), PoolError> {
		let Handle { index } = handle;
		if self.links.owner(index)? != Some(STORE) {
			debug!("rejected free of unallocated block {index}");
			return Err(PoolError::NotAllocated { index })
		}

		self.links.move_to(FREE, index)?;
		Ok(())
	}

	/// Returns a reference to the block behind `handle`, or `None` if it isn't
	/// allocated in this pool.
	pub fn get(&self, handle: &Handle) -> Option<&T> {
		self.is_allocated(handle.index)
			.then(|| &self.blocks[handle.index])
	}

	/// Returns a mutable reference to the block behind `handle`, or `None` if it
	/// isn't allocated in this pool.
	pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
		if self.is_allocated(handle.index) {
			Some(&mut self.blocks[handle.index])
		} else {
			None
		}
	}

	/// Iterates over allocated blocks, most recently allocated first.
	pub fn iter_allocated(&self) -> impl Iterator<Item = &T> + '_ {
		self.links.iter_in(STORE, &self.blocks)
	}

	fn is_allocated(&self, index: usize) -> bool {
		matches!(self.links.owner(index), Ok(Some(STORE)))
	}
}
