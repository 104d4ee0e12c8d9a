//! `bjson-get` — look up a pointer in a BJSON file.
//!
//! Usage:
//!   bjson-get <file.bjson> '<pointer>'
//!
//! The addressed subtree is printed to stdout as JSON.

use bjson::Document;
use bjson_pack::{json, BjsonDecoder};
use bjson_pointer::parse_pointer;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (path, pointer) = match (args.get(1), args.get(2)) {
        (Some(p), Some(ptr)) => (p.clone(), ptr.clone()),
        _ => {
            eprintln!("Usage: bjson-get <file.bjson> '<pointer>'");
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

    let document = BjsonDecoder::new()
        .decode(&bytes)
        .map_err(|e| e.to_string())
        .and_then(|value| {
            Document::build(value, bytes, path.clone().into()).map_err(|e| e.to_string())
        })
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });

    match document.node_at_path(&parse_pointer(&pointer)) {
        Ok(node) => match json::to_json_string(&node.to_value()) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
