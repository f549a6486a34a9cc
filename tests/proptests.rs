use chunkcopy::{ChunkBuffer, CpuFeatures, Functable, Token};
use proptest::prelude::*;

fn naive_fill(buf: &mut [u8], start: usize, dist: usize, len: usize) {
    for i in start..start + len {
        buf[i] = buf[i - dist];
    }
}

fn naive_replay(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for token in tokens {
        match *token {
            Token::Literal(b) => out.push(b),
            Token::Match { dist, len } => {
                for _ in 0..len {
                    out.push(out[out.len() - dist]);
                }
            }
        }
    }
    out
}

/// Token streams where every match refers to bytes already produced.
fn token_stream() -> impl Strategy<Value = Vec<Token>> {
    (
        proptest::collection::vec(any::<u8>(), 1..16),
        proptest::collection::vec((any::<bool>(), any::<u8>(), 1usize..300, 1usize..=258), 0..40),
    )
        .prop_map(|(head, ops)| {
            let mut tokens: Vec<Token> = head.into_iter().map(Token::Literal).collect();
            let mut produced = tokens.len();
            for (is_literal, byte, dist, len) in ops {
                if is_literal {
                    tokens.push(Token::Literal(byte));
                    produced += 1;
                } else {
                    let dist = 1 + (dist - 1) % produced;
                    tokens.push(Token::Match { dist, len });
                    produced += len;
                }
            }
            tokens
        })
}

proptest! {
    #[test]
    fn pattern_fill_matches_naive(
        pattern in proptest::collection::vec(any::<u8>(), 1..80),
        len in 1usize..600,
    ) {
        let dist = pattern.len();
        for table in Functable::supported(CpuFeatures::detect()) {
            let mut expected = vec![0u8; dist + len + table.slack()];
            expected[..dist].copy_from_slice(&pattern);
            let mut actual = expected.clone();
            naive_fill(&mut expected, dist, dist, len);

            let base = actual.as_mut_ptr();
            unsafe { table.pattern_fill(base.add(dist), dist, len) };
            prop_assert_eq!(&actual[..dist + len], &expected[..dist + len]);
        }
    }

    #[test]
    fn pattern_fill_safe_stays_in_bounds(
        pattern in proptest::collection::vec(any::<u8>(), 1..40),
        len in 1usize..400,
        extra in 0usize..200,
    ) {
        let dist = pattern.len();
        for table in Functable::supported(CpuFeatures::detect()) {
            let size = dist + len + extra;
            let mut buf = vec![0xEEu8; size + 64];
            buf[..dist].copy_from_slice(&pattern);
            let base = buf.as_mut_ptr();
            unsafe { table.pattern_fill_safe(base.add(dist), dist, len, len + extra) };
            prop_assert!(buf[size..].iter().all(|&b| b == 0xEE));
            for i in dist..dist + len {
                prop_assert_eq!(buf[i], buf[i - dist]);
            }
        }
    }

    #[test]
    fn replay_matches_naive_on_every_backend(tokens in token_stream()) {
        let expected = naive_replay(&tokens);
        for table in Functable::supported(CpuFeatures::detect()) {
            let roomy = chunkcopy::lz77::replay_with(&tokens, table).unwrap();
            prop_assert_eq!(&roomy, &expected);

            let mut exact = ChunkBuffer::exact(expected.len(), table);
            chunkcopy::lz77::replay_into(&tokens, &mut exact).unwrap();
            prop_assert_eq!(exact.as_slice(), &expected[..]);
        }
    }
}
