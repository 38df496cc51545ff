// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! ## How it works
//!
//! Every container in this crate lives in storage the caller already owns: a
//! `static`, a stack frame, or a field of some larger structure. Nothing here
//! touches the heap. Capacities are fixed when the container is created, and the
//! element type is a plain generic parameter, so each instantiation compiles down
//! to its own concrete code.
//!
//! ### FIFO
//!
//! [`Fifo`] is a bounded circular queue over a *backing buffer*, a slice borrowed
//! from the caller. Keeping the buffer outside the queue lets it live wherever the
//! caller needs it, such as a DMA-reachable memory region. Read and write cursors
//! wrap around the end of the buffer. What happens on a write to a full queue is
//! set by [`FifoOptions`]: the write is rejected by default, or the oldest element
//! is overwritten in lossy mode. The unread elements can be borrowed as contiguous
//! slices for bulk consumption without copying.
//!
//! ### SPSC ring
//!
//! [`Ring`] is a lock-free queue for exactly one producer and one consumer. Its
//! capacity is a power of two, checked at compile time, so slot indices are a mask
//! of two free-running counters. The counters are atomics published with release
//! ordering and observed with acquire ordering, so a slot write is always visible
//! before the count that exposes it. Splitting the ring hands out one [`Producer`]
//! and one [`Consumer`]; the borrow checker makes sure there are no others.
//!
//! ### Pool
//!
//! [`Pool`] hands out fixed-size blocks from an inline array. Each block is on
//! exactly one of two lists, *free* or *store*, kept in a [`Links`] arena. Claiming
//! a block moves it from the free list to the store list and returns a [`Handle`]
//! carrying its index, so freeing is a constant-time relink rather than a search.
//! An exhausted pool returns `None` rather than failing.
//!
//! ### Lists
//!
//! [`Links`] is a doubly-linked list arena: a fixed array of links indexed by
//! node, plus a few list heads. Each node records the list it belongs to, so
//! linking a node twice or unlinking a free-standing node is reported instead of
//! corrupting the neighbors.

mod element;
pub mod fifo;
pub mod list;
pub mod pool;
pub mod spsc;

pub use element::Element;
pub use fifo::{Fifo, FifoError, FifoErrorKind, FifoOptions, Overflow};
pub use list::{ListError, ListId, Links};
pub use pool::{Handle, Pool, PoolError};
pub use spsc::{Consumer, Producer, Ring};
