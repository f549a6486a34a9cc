use chunkcopy::{ChunkBuffer, CpuFeatures, Functable};

fn main() {
    let caps = CpuFeatures::detect();
    println!("Detected CPU features: {:?}", caps);

    let table = chunkcopy::functable();
    println!(
        "Selected backend: {} (chunk width {} bytes)",
        table.backend(),
        table.chunk_width()
    );

    for table in Functable::supported(caps) {
        let mut buf = ChunkBuffer::with_table(40, table);
        buf.extend_from_slice(b"abc").expect("seed fits");
        buf.push_match(3, 37).expect("match fits");
        println!(
            "{:>8}: {}",
            table.backend(),
            String::from_utf8_lossy(buf.as_slice())
        );
    }

    // The last match lands exactly on the end of the buffer, where no
    // slack remains and the bounded paths take over.
    let mut exact = ChunkBuffer::exact(64, chunkcopy::functable());
    exact.push(b'-').expect("byte fits");
    exact.push_match(1, 63).expect("match fits");
    println!("Exact buffer: {}", String::from_utf8_lossy(exact.as_slice()));

    let err = exact.push(b'!').unwrap_err();
    println!("Writing past capacity: {}", err);
}
