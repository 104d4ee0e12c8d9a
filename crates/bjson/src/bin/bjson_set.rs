//! `bjson-set` — edit one scalar leaf of a BJSON file and save.
//!
//! Usage:
//!   bjson-set <file.bjson> <address> <value> [output.bjson]
//!
//! A decimal address selects the flat-index session (in-place record
//! patch); anything else is parsed as a pointer and selects the rebuild
//! session (full re-encode). Without an output path the source file is
//! replaced atomically.

use bjson::{AddressMode, EditSession};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (path, address, value) = match (args.get(1), args.get(2), args.get(3)) {
        (Some(p), Some(a), Some(v)) => (p.clone(), a.clone(), v.clone()),
        _ => {
            eprintln!("Usage: bjson-set <file.bjson> <address> <value> [output.bjson]");
            std::process::exit(1);
        }
    };
    let output = args.get(4).cloned().unwrap_or_else(|| path.clone());

    let mode = if address.bytes().all(|b| b.is_ascii_digit()) && !address.is_empty() {
        AddressMode::Patch
    } else {
        AddressMode::Rebuild
    };

    let mut session = match EditSession::load(&path, mode) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match session.propose(&address, &value) {
        Ok(true) => {}
        Ok(false) => {
            println!("value unchanged");
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = session.commit(&output) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
