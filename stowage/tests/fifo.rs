// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use stowage::{Fifo, FifoErrorKind, FifoOptions, Overflow};

#[macro_use]
mod common;

const SIZE: usize = 100;

#[test]
fn init() {
	let mut buf = [0u8; SIZE];
	let fifo = Fifo::new(&mut buf).unwrap();
	assert!(fifo.is_empty());
	assert!(!fifo.is_full());
	assert_eq!(fifo.len(), 0);
	assert_eq!(fifo.limit(), SIZE);
	assert_eq!(fifo.capacity(), SIZE);
}

#[test]
fn init_invalid() {
	let mut buf = [0u8; SIZE];

	let err = Fifo::<u8>::new(&mut []).unwrap_err();
	assert_eq!(err.kind, FifoErrorKind::MissingBuffer);

	let err = Fifo::with_capacity(&mut buf, 0).unwrap_err();
	assert_eq!(err.kind, FifoErrorKind::ZeroCapacity);

	let err = Fifo::with_capacity(&mut buf, SIZE + 1).unwrap_err();
	assert_eq!(err.kind, FifoErrorKind::BufferTooSmall);
	assert_eq!((err.capacity, err.len), (SIZE + 1, SIZE));
}

#[test]
fn reinit_overwrites_state() {
	let mut a = [0u8; 8];
	let mut b = [0u8; 4];
	let mut fifo = Fifo::new(&mut a).unwrap();
	fifo.write_from_slice(&[1, 2, 3]);

	let err = fifo.init(&mut [], 4).unwrap_err();
	assert_eq!(err.kind, FifoErrorKind::MissingBuffer);
	assert_eq!(fifo.len(), 3, "failed init must leave the FIFO unchanged");

	fifo.init(&mut b, 4).unwrap();
	assert!(fifo.is_empty());
	assert_eq!(fifo.capacity(), 4);
	assert_eq!(fifo.limit(), 4);
}

#[test]
fn empty() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	assert!(fifo.is_empty());
	for _ in 0..10 {
		fifo.write(10).unwrap();
	}
	assert!(!fifo.is_empty());
	assert_eq!(fifo.read(), Some(10));
}

#[test]
fn full() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	assert!(!fifo.is_full());
	for _ in 0..SIZE {
		fifo.write(10).unwrap();
	}
	assert!(fifo.is_full());
	assert_eq!(fifo.limit(), 0);
	assert_eq!(fifo.write(11), Err(11));
	assert_eq!(fifo.len(), SIZE);
}

#[test]
fn read_write() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	for i in 0..SIZE as u8 {
		fifo.write(i).unwrap();
	}
	for i in 0..SIZE as u8 {
		assert_eq!(fifo.read(), Some(i));
	}
	assert_eq!(fifo.read(), None);
}

#[test]
fn size_across_wrap() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();

	fifo.write_from_slice(&[0; 20]);
	assert_eq!(fifo.len(), 20);
	for _ in 0..20 {
		fifo.read().unwrap();
	}
	assert_eq!(fifo.len(), 0);

	assert_eq!(fifo.write_from_slice(&[0; 80]), 80);
	for _ in 0..40 {
		fifo.read().unwrap();
	}
	assert_eq!(fifo.write_from_slice(&[0; 40]), 40);
	assert_eq!(fifo.len(), 80);
}

#[test]
fn remove() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	fifo.write_from_slice(&[0; 20]);
	assert_eq!(fifo.remove(10), 10);
	assert_eq!(fifo.len(), 10);
	assert_eq!(fifo.remove(50), 10);
	assert!(fifo.is_empty());
}

#[test]
fn as_slice() {
	let mut buf = [0u8; SIZE];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	assert_eq!(fifo.as_slice().len(), 0);

	for i in 0..10 {
		fifo.write(i).unwrap();
	}
	assert_eq!(fifo.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

	fifo.clear();
	fifo.write_from_slice(&[0; 80]);
	fifo.remove(40);
	fifo.write_from_slice(&[1; 40]);
	let (a, b) = fifo.as_slices();
	assert_eq!(fifo.as_slice().len(), 60);
	assert_eq!((a.len(), b.len()), (60, 20));
	assert!(b.iter().all(|&v| v == 1));

	fifo.remove(60);
	assert_eq!(fifo.as_slice(), &[1; 20]);
}

#[test]
fn as_bytes() {
	let mut buf = [0u16; 4];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	fifo.write_from_slice(&[0x0102, 0x0304]);
	assert_eq!(fifo.as_bytes().len(), 4);
	assert_eq!(fifo.as_bytes(), bytemuck::cast_slice::<u16, u8>(&[0x0102, 0x0304]));
}

#[test]
fn overwrite() {
	let mut buf = [0u8; 4];
	let mut fifo = Fifo::new(&mut buf).unwrap().with_options(FifoOptions::lossy());
	assert!(fifo.options().overflow().is_overwrite());
	assert_eq!(fifo.write_from_slice(&[1, 2, 3, 4, 5, 6]), 6);
	assert!(fifo.is_full());
	assert_eq!(fifo.len(), 4);
	assert_eq!(fifo.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 6]);

	fifo.set_options(FifoOptions::new().with_overflow(Overflow::Reject));
	assert_eq!(fifo.write(7), Err(7));
}

#[test]
fn peek() {
	let mut buf = [0u32; 2];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	assert_eq!(fifo.peek(), None);
	fifo.write(5).unwrap();
	assert_eq!(fifo.peek(), Some(&5));
	assert_eq!(fifo.len(), 1);
}

#[quickcheck]
fn order_preserved(data: Vec<u32>, skip: usize) -> TestResult {
	if data.is_empty() {
		return TestResult::discard()
	}

	// Offset both cursors so the data straddles the end of the buffer.
	let mut buf = vec![0; data.len()];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	let skip = skip % data.len();
	fifo.write_from_slice(&data[..skip]);
	fifo.remove(skip);

	assert_eq!(fifo.write_from_slice(&data), data.len());
	let read = (0..data.len()).filter_map(|_| fifo.read()).collect::<Vec<_>>();
	qc_assert_eq!(read, data)
}

#[quickcheck]
fn len_tracks_writes_and_reads(capacity: u8, writes: u8, reads: u8) -> TestResult {
	let capacity = capacity as usize + 1;
	let writes = writes as usize % (capacity + 1);
	let reads = reads as usize % (writes + 1);

	let mut buf = vec![0u8; capacity];
	let mut fifo = Fifo::new(&mut buf).unwrap();
	fifo.write_from_slice(&vec![0; writes]);
	for _ in 0..reads {
		fifo.read();
	}
	qc_assert_eq!((fifo.len(), fifo.limit()), (writes - reads, capacity - writes + reads))
}

#[quickcheck]
fn remove_matches_reads(data: Vec<u8>, count: usize) -> TestResult {
	if data.is_empty() {
		return TestResult::discard()
	}
	let count = count % (data.len() + 1);

	let mut a = data.clone();
	let mut b = data.clone();
	let mut removed = Fifo::new(&mut a).unwrap();
	let mut read = Fifo::new(&mut b).unwrap();
	removed.write_from_slice(&data);
	read.write_from_slice(&data);

	removed.remove(count);
	for _ in 0..count {
		read.read();
	}
	qc_assert_eq!(removed.iter().collect::<Vec<_>>(), read.iter().collect::<Vec<_>>())
}
