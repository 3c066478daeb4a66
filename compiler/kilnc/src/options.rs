//! Command-line flags shared by the manifest commands.

use kiln_diagnostic::DiagnosticConfig;
use kiln_metadata::DEFAULT_MAX_DEPTH;
use kiln_types::TargetInfo;

use crate::DriverError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Overrides the manifest's target.
    pub target: Option<TargetInfo>,
    /// Overrides the manifest's requesting module.
    pub module: Option<String>,
    pub max_depth: usize,
    /// Errors reported before the rest are dropped; 0 reports all.
    pub error_limit: usize,
    /// Machine-readable output where supported.
    pub json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            target: None,
            module: None,
            max_depth: DEFAULT_MAX_DEPTH,
            error_limit: DiagnosticConfig::default().error_limit,
            json: false,
        }
    }
}

/// Split `args` into options and positional arguments.
pub fn parse_options(args: &[String]) -> Result<(Options, Vec<String>), DriverError> {
    let mut options = Options::default();
    let mut positional = Vec::new();

    for arg in args {
        if let Some(bits) = arg.strip_prefix("--target=") {
            let target = bits
                .parse::<u32>()
                .ok()
                .and_then(TargetInfo::from_pointer_width)
                .ok_or_else(|| {
                    DriverError::Usage(format!("invalid target `{bits}`: expected 32 or 64"))
                })?;
            options.target = Some(target);
        } else if let Some(module) = arg.strip_prefix("--module=") {
            options.module = Some(module.to_owned());
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            options.max_depth = depth
                .parse()
                .map_err(|_| DriverError::Usage(format!("invalid depth `{depth}`")))?;
        } else if let Some(limit) = arg.strip_prefix("--error-limit=") {
            options.error_limit = limit
                .parse()
                .map_err(|_| DriverError::Usage(format!("invalid error limit `{limit}`")))?;
        } else if arg == "--json" {
            options.json = true;
        } else if arg.starts_with("--") {
            return Err(DriverError::Usage(format!("unknown option `{arg}`")));
        } else {
            positional.push(arg.clone());
        }
    }
    Ok((options, positional))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn defaults() {
        let (options, positional) = parse_options(&args(&["m.json"])).unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.error_limit, 50);
        assert_eq!(positional, vec!["m.json".to_owned()]);
    }

    #[test]
    fn all_flags() {
        let (options, _) = parse_options(&args(&[
            "--target=32",
            "--module=Lib",
            "--max-depth=8",
            "--error-limit=0",
            "--json",
        ]))
        .unwrap();
        assert_eq!(options.target, Some(TargetInfo::BITS_32));
        assert_eq!(options.module.as_deref(), Some("Lib"));
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.error_limit, 0);
        assert!(options.json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_options(&args(&["--target=16"])).is_err());
        assert!(parse_options(&args(&["--max-depth=lots"])).is_err());
        assert!(parse_options(&args(&["--error-limit=-1"])).is_err());
        assert!(parse_options(&args(&["--verbose"])).is_err());
    }
}
