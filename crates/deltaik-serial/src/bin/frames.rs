use std::{env, fs, path::Path};

use deltaik_serial::{Event, decode};

fn main() {
    let args = env::args().skip(1);
    if args.len() == 0 {
        eprintln!("usage: frames <capture> [<capture>...]");
        std::process::exit(1);
    }

    let mut failed = 0usize;
    for path in args {
        let path_ref = Path::new(&path);
        let input = match fs::read(path_ref) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("{path}: read error: {err}");
                failed += 1;
                continue;
            }
        };

        let events = decode(&input);
        let rejected = events
            .iter()
            .filter(|e| matches!(e, Event::Rejected(_)))
            .count();
        for event in &events {
            println!("{path}: {event}");
        }
        if rejected == 0 {
            println!("OK {path} ({} events)", events.len());
        } else {
            println!("ERR {path}: {rejected} rejected frames");
            failed += 1;
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
