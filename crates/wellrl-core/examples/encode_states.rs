use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use wellrl_core::{encode, UserFeatures};

/// Reads one `UserFeatures` JSON object per line and prints `key<TAB>segment`.
fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1);
    let reader: Box<dyn BufRead> = match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let features: UserFeatures = serde_json::from_str(&line)?;
        let state = encode(&features);
        println!("{state}\t{}", state.segment().label());
    }

    Ok(())
}
