// SPDX-License-Identifier: Apache-2.0

//! A doubly-linked list arena with a fixed number of nodes and list heads.
//!
//! Links are stored by index rather than by pointer: slots `0..N` are nodes and
//! each of the `L` lists owns a head link after them. A head whose `next` points
//! back at itself marks an empty list. Nodes are added directly after the head,
//! so iteration visits the most recently added node first.
//!
//! The arena doesn't own any element data. Callers pair node indices with their
//! own array of entries, as [`Pool`](crate::Pool) does with its blocks, and walk
//! a list's entries with [`Links::iter_in`].

use std::fmt;
use std::iter::FusedIterator;
use thiserror::Error;

const NONE: usize = usize::MAX;

/// An error returned when a link operation would break list invariants.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ListError {
	#[error("node {node} is already linked into list {list}")]
	AlreadyLinked { node: usize, list: usize },
	#[error("node {node} is not linked into any list")]
	NotLinked { node: usize },
	#[error("node {node} is out of bounds for an arena of {len} nodes")]
	OutOfBounds { node: usize, len: usize },
}

/// Identifies one of the `L` list heads in a [`Links`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListId<const L: usize>(usize);

impl<const L: usize> ListId<L> {
	/// Returns the list at `index`, or `None` if `index` is not less than `L`.
	pub const fn get(index: usize) -> Option<Self> {
		if index < L {
			Some(Self(index))
		} else {
			None
		}
	}

	pub(crate) const fn new(index: usize) -> Self {
		assert!(index < L, "list index out of bounds");
		Self(index)
	}

	/// Returns the head index of this list.
	pub const fn index(self) -> usize { self.0 }

	/// Iterates over all list IDs.
	pub fn all() -> impl Iterator<Item = Self> {
		(0..L).map(Self)
	}
}

impl<const L: usize> fmt::Debug for ListId<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ListId({})", self.0)
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Link {
	prev: usize,
	next: usize,
}

impl Link {
	const DETACHED: Self = Self { prev: NONE, next: NONE };

	const fn looped(slot: usize) -> Self {
		Self { prev: slot, next: slot }
	}
}

#[derive(Copy, Clone, Debug)]
struct Node {
	link: Link,
	owner: Option<usize>,
}

impl Node {
	const DETACHED: Self = Self { link: Link::DETACHED, owner: None };
}

#[derive(Copy, Clone, Debug)]
struct Head {
	link: Link,
	len: usize,
}

/// A fixed arena of `N` doubly-linked nodes spread across `L` circular lists.
#[derive(Clone, Debug)]
pub struct Links<const N: usize, const L: usize = 1> {
	nodes: [Node; N],
	heads: [Head; L],
}

impl<const N: usize, const L: usize> Default for Links<N, L> {
	fn default() -> Self { Self::new() }
}

impl<const N: usize, const L: usize> Links<N, L> {
	/// Creates an arena with every list empty and every node unlinked.
	pub const fn new() -> Self {
		let mut heads = [Head { link: Link::DETACHED, len: 0 }; L];
		let mut h = 0;
		while h < L {
			heads[h].link = Link::looped(N + h);
			h += 1;
		}

		Self {
			nodes: [Node::DETACHED; N],
			heads,
		}
	}

	/// Creates an arena with every node on `list`, linked as if nodes `0..N` had
	/// been added in order: node `N - 1` is the front.
	pub const fn filled(list: ListId<L>) -> Self {
		let mut links = Self::new();
		if N == 0 {
			return links
		}

		let head = Self::head_slot(list);
		let mut node = 0;
		while node < N {
			links.nodes[node] = Node {
				link: Link {
					prev: if node == N - 1 { head } else { node + 1 },
					next: if node == 0 { head } else { node - 1 },
				},
				owner: Some(list.0),
			};
			node += 1;
		}

		links.heads[list.0] = Head {
			link: Link { prev: 0, next: N - 1 },
			len: N,
		};
		links
	}

	/// Returns the number of nodes in the arena.
	pub const fn node_count(&self) -> usize { N }

	/// Empties `list`. Nodes still on it become unlinked and may be added again.
	pub fn init(&mut self, list: ListId<L>) {
		let head = Self::head_slot(list);
		let mut slot = self.link(head).next;
		while slot != head {
			let next = self.link(slot).next;
			self.nodes[slot] = Node::DETACHED;
			slot = next;
		}

		self.heads[list.0] = Head {
			link: Link::looped(head),
			len: 0,
		};
	}

	/// Inserts `node` directly after the head of `list`, making it the front.
	pub fn add(&mut self, list: ListId<L>, node: usize) -> Result<(), ListError> {
		self.check(node)?;
		if let Some(owner) = self.nodes[node].owner {
			return Err(ListError::AlreadyLinked { node, list: owner })
		}

		let head = Self::head_slot(list);
		let next = self.link(head).next;
		self.nodes[node] = Node {
			link: Link { prev: head, next },
			owner: Some(list.0),
		};
		self.link_mut(next).prev = node;
		self.link_mut(head).next = node;
		self.heads[list.0].len += 1;
		Ok(())
	}

	/// Unlinks `node` from the list containing it, returning that list.
	pub fn del(&mut self, node: usize) -> Result<ListId<L>, ListError> {
		self.check(node)?;
		let Node { link: Link { prev, next }, owner } = self.nodes[node];
		let owner = owner.ok_or(ListError::NotLinked { node })?;

		self.link_mut(prev).next = next;
		self.link_mut(next).prev = prev;
		self.nodes[node] = Node::DETACHED;
		self.heads[owner].len -= 1;
		Ok(ListId(owner))
	}

	/// Moves `node` to the front of `list`, unlinking it from its current list
	/// first. Returns the list it was moved from, if any.
	pub fn move_to(&mut self, list: ListId<L>, node: usize) -> Result<Option<ListId<L>>, ListError> {
		let prev_owner = match self.owner(node)? {
			Some(_) => Some(self.del(node)?),
			None => None
		};
		self.add(list, node)?;
		Ok(prev_owner)
	}

	/// Returns `true` if `list` has no nodes.
	pub fn is_empty(&self, list: ListId<L>) -> bool {
		let head = Self::head_slot(list);
		self.link(head).next == head
	}

	/// Returns the number of nodes in `list`.
	pub fn len(&self, list: ListId<L>) -> usize { self.heads[list.0].len }

	/// Returns the most recently added node of `list`.
	pub fn front(&self, list: ListId<L>) -> Option<usize> {
		let head = Self::head_slot(list);
		let next = self.link(head).next;
		(next != head).then_some(next)
	}

	/// Returns the list `node` is linked into, if any.
	pub fn owner(&self, node: usize) -> Result<Option<ListId<L>>, ListError> {
		self.check(node)?;
		Ok(self.nodes[node].owner.map(ListId))
	}

	/// Iterates over the nodes of `list`, most recently added first.
	pub fn iter(&self, list: ListId<L>) -> Iter<'_, N, L> {
		let head = Self::head_slot(list);
		Iter {
			links: self,
			head,
			cursor: self.link(head).next,
			remaining: self.len(list),
		}
	}

	/// Iterates over the entries of `entries` whose indices are on `list`, most
	/// recently added first. Nodes past the end of `entries` have no entry and
	/// are skipped.
	pub fn iter_in<'a, T>(&'a self, list: ListId<L>, entries: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
		self.iter(list).filter_map(|node| entries.get(node))
	}

	const fn head_slot(list: ListId<L>) -> usize { N + list.0 }

	fn check(&self, node: usize) -> Result<(), ListError> {
		if node < N {
			Ok(())
		} else {
			Err(ListError::OutOfBounds { node, len: N })
		}
	}

	fn link(&self, slot: usize) -> &Link {
		if slot < N {
			&self.nodes[slot].link
		} else {
			&self.heads[slot - N].link
		}
	}

	fn link_mut(&mut self, slot: usize) -> &mut Link {
		if slot < N {
			&mut self.nodes[slot].link
		} else {
			&mut self.heads[slot - N].link
		}
	}
}

/// An iterator over the node indices of a list.
#[derive(Clone)]
pub struct Iter<'a, const N: usize, const L: usize> {
	links: &'a Links<N, L>,
	head: usize,
	cursor: usize,
	remaining: usize,
}

impl<const N: usize, const L: usize> Iterator for Iter<'_, N, L> {
	type Item = usize;

	fn next(&mut self) -> Option<usize> {
		if self.cursor == self.head {
			return None
		}

		let node = self.cursor;
		self.cursor = self.links.link(node).next;
		self.remaining -= 1;
		Some(node)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<const N: usize, const L: usize> ExactSizeIterator for Iter<'_, N, L> { }

impl<const N: usize, const L: usize> FusedIterator for Iter<'_, N, L> { }
