use std::ffi::OsString;

/// Subcommands that must not trigger `run` insertion, in kebab-case.
const KNOWN_SUBCOMMANDS: &[&str] = &["run", "plan", "config", "version", "help"];

/// Global flags that may come before the subcommand. `-c`/`--config`
/// take a separate value unless written as `--config=FILE` or `-cFILE`.
fn global_flag_width(arg: &str) -> Option<usize> {
    match arg {
        "-v" | "--verbose" => Some(1),
        "-c" | "--config" => Some(2),
        _ if arg.starts_with("--config=") => Some(1),
        _ if arg.starts_with("-c") && arg.len() > 2 => Some(1),
        _ => None,
    }
}

/// Make `run` the default subcommand.
///
/// Leading global flags (`-v`, `-c FILE`) are skipped, then the next
/// argument decides:
///
/// - `--help`, `-h`, `--version`, `-V`: unchanged
/// - a known subcommand: unchanged
/// - anything else, or nothing at all: `run` is inserted before it
///
/// ```text
/// tac-setup                     -> tac-setup run
/// tac-setup --use-client        -> tac-setup run --use-client
/// tac-setup -v --data-dir /tmp  -> tac-setup -v run --data-dir /tmp
/// tac-setup -v plan --json      -> tac-setup -v plan --json (unchanged)
/// ```
pub fn route_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if args.is_empty() {
        return vec!["run".into()];
    }

    let mut index = 1;
    while let Some(width) = args
        .get(index)
        .and_then(|a| global_flag_width(&a.to_string_lossy()))
    {
        index += width;
    }
    let index = index.min(args.len());

    if let Some(arg) = args.get(index) {
        let arg = arg.to_string_lossy();
        if arg == "--help" || arg == "-h" || arg == "--version" || arg == "-V" {
            return args;
        }
        if KNOWN_SUBCOMMANDS.contains(&arg.as_ref()) {
            return args;
        }
    }

    let mut routed = Vec::with_capacity(args.len() + 1);
    routed.extend_from_slice(&args[..index]);
    routed.push("run".into());
    routed.extend_from_slice(&args[index..]);
    routed
}
