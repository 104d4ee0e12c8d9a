//! `bjson-unpack` — convert a BJSON file to JSON.
//!
//! Usage:
//!   bjson-unpack <file.bjson>
//!
//! The decoded document is printed to stdout as pretty JSON.

use bjson_pack::{json, BjsonDecoder};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be a BJSON file path.");
            std::process::exit(1);
        }
    };

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let value = match BjsonDecoder::new().decode(&bytes) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match json::to_json_string_pretty(&value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
