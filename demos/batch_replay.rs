use chunkcopy::Token;
use chunkcopy::batch::BatchReplayer;
use std::time::Instant;

fn literals(bytes: &[u8]) -> Vec<Token> {
    bytes.iter().map(|&b| Token::Literal(b)).collect()
}

fn main() {
    let mut stream1 = literals(b"Hello world. ");
    stream1.push(Token::Match { dist: 13, len: 1287 });

    let mut stream2 = literals(b"xyz");
    stream2.push(Token::Match { dist: 3, len: 9997 });

    let stream3 = literals(b"Short string.");

    let mut stream4 = literals(b"A");
    stream4.push(Token::Match { dist: 1, len: 9999 });

    let streams = vec![
        stream1.as_slice(),
        stream2.as_slice(),
        stream3.as_slice(),
        stream4.as_slice(),
    ];

    println!("Batch replaying {} streams...", streams.len());
    let start = Instant::now();

    let replayer = BatchReplayer::new();
    let results = replayer.replay_batch(&streams);

    let duration = start.elapsed();
    println!("Replay took: {:?}", duration);

    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(data) => println!(
                "Stream {}: {} tokens -> {} bytes, starts with {:?}",
                i,
                streams[i].len(),
                data.len(),
                String::from_utf8_lossy(&data[..data.len().min(24)])
            ),
            Err(e) => println!("Stream {}: Replay failed: {}", i, e),
        }
    }

    println!("Bounded replay with a too-small limit for stream 1...");
    let max_sizes = [1300, 100, 13, 10000];
    let bounded = replayer.replay_batch_bounded(&streams, &max_sizes);
    for (i, result) in bounded.iter().enumerate() {
        match result {
            Ok(data) => println!("Stream {}: OK ({} bytes)", i, data.len()),
            Err(e) => println!("Stream {}: {}", i, e),
        }
    }
}
