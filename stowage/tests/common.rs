// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::fmt::Debug;

/// Like `assert_eq!`, but returns a failed `TestResult` instead of panicking, so
/// quickcheck can shrink the input.
macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(common::mismatch(&left, &right))
		}
	}};
}

pub fn mismatch<L: Debug, R: Debug>(left: &L, right: &R) -> String {
	format!(
		"assertion failed `(left == right)`:\n \
		left: `{left:?}`,\nright: `{right:?}`",
	)
}

/// Collects everything a queue yields through `pop` until it returns `None`.
pub fn drain<T>(pop: impl FnMut() -> Option<T>) -> Vec<T> {
	std::iter::from_fn(pop).collect()
}
