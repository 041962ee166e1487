//! Default value functions for configuration.

use std::collections::BTreeMap;

use slirc_proto::PrefixModes;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

/// Features assumed before the server's first ISUPPORT reply, so that names
/// listings decode even if they arrive first.
pub fn default_features() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("CHANTYPES".to_string(), "#".to_string()),
        ("PREFIX".to_string(), PrefixModes::DEFAULT.to_string()),
    ])
}
