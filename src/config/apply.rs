use crate::args::RaceArgs;

use super::types::RaceConfig;

/// Applies CLI overrides on top of a loaded configuration, then fills in
/// defaults.
pub fn apply_cli_overrides(config: &mut RaceConfig, args: &RaceArgs) {
    if let Some(count) = args.count {
        config.count = count.get();
    }
    if let Some(proxy) = args.proxy.as_ref() {
        config.proxy = Some(proxy.clone());
    }
    if args.verbose {
        config.verbose = true;
    }
    config.apply_defaults();
}
