/// Quote a word for display in a POSIX shell command line.
///
/// Plain words (letters, digits and `-_./:=@%+,`) are returned as-is so that
/// rendered plans stay readable; anything else is wrapped in single quotes.
///
/// # Examples
///
/// ```
/// use tac_setup::utils::shell::quote;
///
/// assert_eq!(quote("fetchai/tac_controller:0.1.0"), "fetchai/tac_controller:0.1.0");
/// assert_eq!(quote("hello world"), "'hello world'");
/// assert_eq!(quote("foo'bar"), "'foo'\\''bar'");
/// ```
pub fn quote(s: &str) -> String {
    if is_plain(s) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

fn is_plain(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c))
}

/// Join command arguments into one quoted command line
///
/// # Examples
///
/// ```
/// use tac_setup::utils::shell::join_args;
///
/// assert_eq!(join_args(&["aea", "fetch", "--local", "fetchai/tac_controller"]),
///            "aea fetch --local fetchai/tac_controller");
/// ```
pub fn join_args(args: &[impl AsRef<str>]) -> String {
    args.iter()
        .map(|arg| quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
