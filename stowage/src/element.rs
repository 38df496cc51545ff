// SPDX-License-Identifier: Apache-2.0

/// A value that can be stored in a [`Fifo`](crate::Fifo) slot. Slots are read out
/// by copy; the backing buffer keeps the old bits until they're overwritten.
pub trait Element: Copy { }

impl<T: Copy> Element for T { }
