// orto-cli: shared utilities for the command-line tools.

use std::path::PathBuf;
use std::process;

use orto::Dictionary;

/// Extract `-d PATH` / `--dict-path PATH` from the argument list,
/// returning the path and the remaining arguments.
pub fn parse_dict_path(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut dict_path = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        if arg == "-d" || arg == "--dict-path" {
            dict_path = it.next().cloned();
        } else {
            rest.push(arg.clone());
        }
    }
    (dict_path, rest)
}

/// Did the user ask for help?
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "-h" || a == "--help")
}

/// Search for a dictionary pair and load it.
///
/// Search order:
/// 1. the `dict_path` argument (a base path without extension)
/// 2. the `ORTO_DICT_PATH` environment variable
/// 3. `~/.orto/default`
/// 4. `./dictionary` in the current working directory
pub fn load_dictionary(dict_path: Option<&str>) -> Result<Dictionary, String> {
    let candidates = build_search_paths(dict_path);
    for base in &candidates {
        if base.with_extension("aff").is_file() {
            return Dictionary::from_path(base)
                .map_err(|e| format!("failed to load dictionary {}: {e}", base.display()));
        }
    }
    Err(format!(
        "could not find a dictionary (.aff/.dic pair) at any of:\n{}",
        candidates
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

fn build_search_paths(dict_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = dict_path {
        paths.push(PathBuf::from(p));
    }
    if let Ok(env_path) = std::env::var("ORTO_DICT_PATH") {
        paths.push(PathBuf::from(env_path));
    }
    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".orto").join("default"));
    }
    paths.push(PathBuf::from("dictionary"));
    paths
}

/// Print an error message and exit with a failure status.
pub fn fatal(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dict_path_is_extracted() {
        let (path, rest) = parse_dict_path(&args(&["-d", "/tmp/en", "-s"]));
        assert_eq!(path.as_deref(), Some("/tmp/en"));
        assert_eq!(rest, args(&["-s"]));
    }

    #[test]
    fn missing_dict_path_leaves_args_alone() {
        let (path, rest) = parse_dict_path(&args(&["-s", "--quiet"]));
        assert!(path.is_none());
        assert_eq!(rest, args(&["-s", "--quiet"]));
    }

    #[test]
    fn help_detection() {
        assert!(wants_help(&args(&["-h"])));
        assert!(wants_help(&args(&["-s", "--help"])));
        assert!(!wants_help(&args(&["-s"])));
    }
}
