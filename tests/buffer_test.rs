use chunkcopy::{Backend, ChunkBuffer, ChunkError, CpuFeatures, Functable};
use std::io;

fn naive_match(out: &mut Vec<u8>, dist: usize, len: usize) {
    for _ in 0..len {
        out.push(out[out.len() - dist]);
    }
}

#[test]
fn test_buffer_switches_to_bounded_near_end() {
    // Fill right up to capacity with matches of every shape; the last ones
    // run without slack and must take the bounded paths.
    for table in Functable::supported(CpuFeatures::detect()) {
        for exact in [false, true] {
            let capacity = 4096;
            let mut buf = if exact {
                ChunkBuffer::exact(capacity, table)
            } else {
                ChunkBuffer::with_table(capacity, table)
            };
            let mut expected = Vec::new();

            buf.extend_from_slice(b"The quick brown fox").unwrap();
            expected.extend_from_slice(b"The quick brown fox");

            let shapes = [(1, 40), (3, 17), (19, 19), (8, 258), (33, 5), (16, 100), (2, 31)];
            let mut i = 0;
            while buf.remaining() > 0 {
                let (dist, len) = shapes[i % shapes.len()];
                let len = len.min(buf.remaining());
                buf.push_match(dist, len).unwrap();
                naive_match(&mut expected, dist, len);
                i += 1;
            }
            assert_eq!(buf.len(), capacity);
            assert_eq!(buf.as_slice(), &expected[..], "{:?} exact={}", table.backend(), exact);
        }
    }
}

#[test]
fn test_buffer_reports_backend() {
    let generic = Functable::for_backend(Backend::Generic).unwrap();
    let buf = ChunkBuffer::with_table(10, generic);
    assert_eq!(buf.backend(), Backend::Generic);
    assert_eq!(buf.capacity(), 10);
    assert!(buf.is_empty());
}

#[test]
fn test_buffer_default_table() {
    let mut buf = ChunkBuffer::new(64);
    buf.push(b'z').unwrap();
    buf.push_match(1, 63).unwrap();
    assert_eq!(buf.as_slice(), &[b'z'; 64][..]);
    assert_eq!(buf.backend(), chunkcopy::functable().backend());
}

#[test]
fn test_zero_length_match_is_noop() {
    let mut buf = ChunkBuffer::new(4);
    buf.push_match(0, 0).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn test_errors_convert_to_io() {
    let mut buf = ChunkBuffer::new(4);
    let err: io::Error = buf.push_match(1, 1).unwrap_err().into();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

    buf.extend_from_slice(b"abcd").unwrap();
    let err = buf.extend_from_slice(b"e").unwrap_err();
    assert_eq!(
        err,
        ChunkError::InsufficientSpace {
            requested: 1,
            available: 0
        }
    );
    let err: io::Error = err.into();
    assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    assert_eq!(err.to_string(), "Insufficient space: 1 bytes requested, 0 available");
}

#[test]
fn test_huge_capacity_cannot_reach_push_match() {
    let generic = Functable::for_backend(Backend::Generic).unwrap();
    let err = ChunkBuffer::try_with_table(usize::MAX - 7, generic).unwrap_err();
    assert_eq!(err, ChunkError::CapacityOverflow(usize::MAX - 7));
    let err: io::Error = err.into();
    assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);

    let result = std::panic::catch_unwind(|| {
        let mut buf = ChunkBuffer::with_table(usize::MAX - 7, generic);
        buf.push(b'a').unwrap();
        buf.push_match(1, 64).unwrap();
    });
    assert!(result.is_err());
}
