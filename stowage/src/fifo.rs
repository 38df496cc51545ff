// SPDX-License-Identifier: Apache-2.0

//! A bounded circular FIFO over a caller-supplied backing buffer.

mod options;

use std::cmp::min;
use std::iter::FusedIterator;
use std::slice;
use all_asserts::debug_assert_le;
use amplify_derive::Display;
use log::trace;
use thiserror::Error;
use crate::Element;

pub use options::*;

/// An error returned when a FIFO can't be bound to its backing buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid argument for a FIFO of capacity {capacity} over {len} elements; {kind}")]
pub struct FifoError {
	/// The requested capacity.
	pub capacity: usize,
	/// The length of the supplied buffer.
	pub len: usize,
	/// The error kind.
	pub kind: FifoErrorKind,
}

/// The invalid argument behind a [`FifoError`].
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum FifoErrorKind {
	/// The capacity is zero.
	#[display("capacity is zero")]
	ZeroCapacity,
	/// The backing buffer is empty.
	#[display("backing buffer is missing")]
	MissingBuffer,
	/// The backing buffer is shorter than the capacity.
	#[display("backing buffer is too small")]
	BufferTooSmall,
}

/// A bounded circular queue over a borrowed buffer.
///
/// Elements are written at the write cursor and read at the read cursor, both
/// wrapping around the end of the buffer. The buffer is never reallocated or
/// cleared; reading copies elements out and leaves their bits behind.
#[derive(Debug)]
pub struct Fifo<'a, T: Element> {
	buf: &'a mut [T],
	read: usize,
	write: usize,
	count: usize,
	options: FifoOptions,
}

/// An iterator over the unread elements of a [`Fifo`], oldest first.
#[derive(Clone, Debug)]
pub struct Iter<'a, T: 'a> {
	a: slice::Iter<'a, T>,
	b: slice::Iter<'a, T>,
}

fn bind<T>(buf: &mut [T], capacity: usize) -> Result<&mut [T], FifoError> {
	let len = buf.len();
	let kind = if len == 0 {
		FifoErrorKind::MissingBuffer
	} else if capacity == 0 {
		FifoErrorKind::ZeroCapacity
	} else if len < capacity {
		FifoErrorKind::BufferTooSmall
	} else {
		return Ok(&mut buf[..capacity])
	};
	Err(FifoError { capacity, len, kind })
}

impl<'a, T: Element> Fifo<'a, T> {
	/// Creates a FIFO using all of `buf` as its backing buffer.
	pub fn new(buf: &'a mut [T]) -> Result<Self, FifoError> {
		let capacity = buf.len();
		Self::with_capacity(buf, capacity)
	}

	/// Creates a FIFO holding up to `capacity` elements, backed by the front of
	/// `buf`.
	pub fn with_capacity(buf: &'a mut [T], capacity: usize) -> Result<Self, FifoError> {
		let buf = bind(buf, capacity)?;
		trace!("initialized FIFO of capacity {capacity}");
		Ok(Self {
			buf,
			read: 0,
			write: 0,
			count: 0,
			options: FifoOptions::new(),
		})
	}

	/// Sets the options, returning the FIFO.
	pub fn with_options(mut self, options: FifoOptions) -> Self {
		self.options = options;
		self
	}

	/// Rebinds the FIFO to `buf` with `capacity`, discarding all unread elements.
	/// On error, the FIFO is left unchanged.
	pub fn init(&mut self, buf: &'a mut [T], capacity: usize) -> Result<(), FifoError> {
		self.buf = bind(buf, capacity)?;
		self.clear();
		trace!("reinitialized FIFO of capacity {capacity}");
		Ok(())
	}

	/// Returns the options.
	pub fn options(&self) -> FifoOptions { self.options }

	/// Sets the options.
	pub fn set_options(&mut self, options: FifoOptions) {
		self.options = options;
	}

	/// Returns the number of elements the FIFO can hold.
	pub fn capacity(&self) -> usize { self.buf.len() }

	/// Returns the number of unread elements.
	pub fn len(&self) -> usize { self.count }

	/// Returns the number of elements that can be written before the FIFO is full.
	pub fn limit(&self) -> usize { self.capacity() - self.count }

	/// Returns `true` if the FIFO has no unread elements.
	pub fn is_empty(&self) -> bool { self.count == 0 }

	/// Returns `true` if the FIFO can't take another element without overflowing.
	pub fn is_full(&self) -> bool { self.count >= self.capacity() }

	/// Writes `value` to the back of the FIFO. If the FIFO is full, the value is
	/// returned in reject mode; in overwrite mode the oldest element is dropped.
	pub fn write(&mut self, value: T) -> Result<(), T> {
		if self.is_full() {
			if self.options.overflow.is_reject() {
				trace!("rejected write to full FIFO");
				return Err(value)
			}
			self.remove(1);
		}

		self.buf[self.write] = value;
		self.write = self.wrap(self.write + 1);
		self.count += 1;
		debug_assert_le!(self.count, self.capacity());
		Ok(())
	}

	/// Writes elements from `values` until the slice is exhausted or, in reject
	/// mode, the FIFO is full. Returns the number of elements written.
	pub fn write_from_slice(&mut self, values: &[T]) -> usize {
		let mut written = 0;
		for &value in values {
			if self.write(value).is_err() {
				break
			}
			written += 1;
		}
		written
	}

	/// Reads the oldest element, or returns `None` if the FIFO is empty.
	pub fn read(&mut self) -> Option<T> {
		if self.is_empty() {
			return None
		}

		let value = self.buf[self.read];
		self.read = self.wrap(self.read + 1);
		self.count -= 1;
		Some(value)
	}

	/// Returns a reference to the oldest element, or `None` if the FIFO is empty.
	pub fn peek(&self) -> Option<&T> {
		(!self.is_empty()).then(|| &self.buf[self.read])
	}

	/// Discards up to `count` of the oldest elements without reading them, returning
	/// the number discarded.
	pub fn remove(&mut self, count: usize) -> usize {
		let count = min(count, self.count);
		self.read = self.wrap(self.read + count);
		self.count -= count;
		count
	}

	/// Discards all unread elements and rewinds both cursors.
	pub fn clear(&mut self) {
		self.read = 0;
		self.write = 0;
		self.count = 0;
	}

	/// Returns the contiguous run of unread elements starting at the oldest. If the
	/// unread elements wrap around the end of the buffer, the slice stops there;
	/// consume it with [`remove`](Self::remove) to reach the rest.
	pub fn as_slice(&self) -> &[T] {
		let len = min(self.count, self.capacity() - self.read);
		&self.buf[self.read..self.read + len]
	}

	/// Returns a pair of slices which contain the unread elements, oldest first.
	pub fn as_slices(&self) -> (&[T], &[T]) {
		let a = self.as_slice();
		let b = &self.buf[..self.count - a.len()];
		(a, b)
	}

	/// Iterates over the unread elements, oldest first.
	pub fn iter(&self) -> Iter<'_, T> {
		let (a, b) = self.as_slices();
		Iter {
			a: a.iter(),
			b: b.iter()
		}
	}

	fn wrap(&self, index: usize) -> usize {
		index % self.capacity()
	}
}

impl<'a, T: Element + bytemuck::Pod> Fifo<'a, T> {
	/// Returns the contiguous run of unread elements as bytes, for handing to a
	/// DMA engine or a bulk write.
	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(self.as_slice())
	}
}

impl<'a, 'f, T: Element> IntoIterator for &'f Fifo<'a, T> {
	type Item = &'f T;
	type IntoIter = Iter<'f, T>;

	fn into_iter(self) -> Iter<'f, T> { self.iter() }
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		self.a.next().or_else(|| self.b.next())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.a.len() + self.b.len();
		(len, Some(len))
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> { }

impl<T> FusedIterator for Iter<'_, T> { }
