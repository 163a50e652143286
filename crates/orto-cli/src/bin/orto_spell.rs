// orto-spell: check spelling of words from stdin.
//
// Reads words from stdin (one per line) and reports whether each word is
// correctly spelled:
//   C: word    (correct)
//   W: word    (wrong / misspelled)
//   S: word    (suggestion, with -s)
//
// Usage:
//   orto-spell [-d DICT_BASE] [OPTIONS]

use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = orto_cli::parse_dict_path(&args);

    if orto_cli::wants_help(&args) {
        println!("orto-spell: check spelling of words from stdin.");
        println!();
        println!("Usage: orto-spell [-d DICT_BASE] [OPTIONS]");
        println!();
        println!("Reads words from stdin (one per line). Prints:");
        println!("  C: word    (correct)");
        println!("  W: word    (misspelled)");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Dictionary base path (without .aff/.dic)");
        println!("  -s, --suggest          Also print suggestions for misspelled words");
        println!("  -h, --help             Print this help");
        return;
    }

    let show_suggestions = args.iter().any(|a| a == "-s" || a == "--suggest");

    let dictionary = orto_cli::load_dictionary(dict_path.as_deref())
        .unwrap_or_else(|e| orto_cli::fatal(&e));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error reading stdin: {e}");
                break;
            }
        };
        let word = line.trim();
        if word.is_empty() {
            continue;
        }

        if dictionary.spell(word) {
            let _ = writeln!(out, "C: {word}");
        } else {
            let _ = writeln!(out, "W: {word}");
            if show_suggestions {
                for suggestion in dictionary.suggest(word) {
                    let _ = writeln!(out, "S: {suggestion}");
                }
            }
        }
    }
}
