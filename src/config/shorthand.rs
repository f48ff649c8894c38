// src/config/shorthand.rs

/// Reserved prefix for the build-tool shorthand.
pub const MAKE_PREFIX: &str = "make:";

/// Expand `make:a,b` arguments into one `make <target>` command per target.
///
/// Other arguments pass through untouched. Blank targets expand to a bare
/// `make`.
pub fn expand_commands<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cmds = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        match arg.strip_prefix(MAKE_PREFIX) {
            Some(targets) => {
                for target in targets.split(',') {
                    cmds.push(format!("make {}", target.trim()).trim().to_string());
                }
            }
            None => cmds.push(arg.to_string()),
        }
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_targets_in_order() {
        let cmds = expand_commands(["make:build, test", "./app"]);
        assert_eq!(cmds, vec!["make build", "make test", "./app"]);
    }

    #[test]
    fn empty_target_is_plain_make() {
        assert_eq!(expand_commands(["make:"]), vec!["make"]);
    }

    #[test]
    fn prefix_must_be_at_start() {
        assert_eq!(expand_commands(["echo make:x"]), vec!["echo make:x"]);
    }
}
