// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;

/// Options for tuning [`Fifo`](super::Fifo)'s behavior.
///
/// # Overflow
///
/// What a write to a full FIFO does. By default the write is rejected and the
/// value is handed back to the caller, leaving the queue untouched. In lossy mode
/// the oldest unread element is dropped to make room, so the queue always holds
/// the most recent `capacity` elements.
///
/// Lossy mode suits sample streams where stale data is worthless, such as sensor
/// readings drained less often than they arrive. Rejecting suits everything where
/// losing an element silently is a bug.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct FifoOptions {
	pub overflow: Overflow,
}

/// The full-queue write mode.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum Overflow {
	/// Reject the write, returning the value.
	#[default]
	#[display("reject")]
	Reject,
	/// Overwrite the oldest unread element.
	#[display("overwrite")]
	Overwrite,
}

impl Overflow {
	/// Returns `true` if the mode is [`Reject`](Self::Reject).
	pub fn is_reject(&self) -> bool {
		matches!(self, Self::Reject)
	}

	/// Returns `true` if the mode is [`Overwrite`](Self::Overwrite).
	pub fn is_overwrite(&self) -> bool {
		matches!(self, Self::Overwrite)
	}
}

impl Default for FifoOptions {
	fn default() -> Self { Self::new() }
}

impl FifoOptions {
	/// Creates a new set of FIFO options.
	pub const fn new() -> Self {
		Self {
			overflow: Overflow::Reject,
		}
	}

	/// Presets the options to create a "lossy" FIFO, overwriting the oldest data
	/// when full.
	#[inline]
	pub const fn lossy() -> Self {
		Self {
			overflow: Overflow::Overwrite,
			..Self::new()
		}
	}

	/// Returns the overflow mode.
	#[inline]
	pub const fn overflow(&self) -> Overflow { self.overflow }

	/// Sets the overflow mode.
	#[inline]
	pub fn set_overflow(&mut self, value: Overflow) {
		self.overflow = value;
	}

	/// Sets the overflow mode, returning the modified options.
	#[inline]
	pub const fn with_overflow(mut self, value: Overflow) -> Self {
		self.overflow = value;
		self
	}
}
