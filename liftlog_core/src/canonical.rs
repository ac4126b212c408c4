//! Canonical-lift name resolution.
//!
//! Maps free-text exercise names onto the four tracked barbell lifts via
//! exact case-insensitive matching against a configurable alias table.
//! Names with no alias stay unmapped: they still appear in general
//! per-exercise statistics but never in canonical-lift aggregates.

use crate::config::AliasConfig;
use crate::CanonicalLift;
use std::collections::HashMap;

/// Case-insensitive alias lookup table
#[derive(Clone, Debug)]
pub struct AliasTable {
    map: HashMap<String, CanonicalLift>,
}

impl AliasTable {
    /// Build a table from the configured alias lists
    pub fn from_config(aliases: &AliasConfig) -> Self {
        let mut map = HashMap::new();
        let groups: [(&[String], CanonicalLift); 4] = [
            (&aliases.squat, CanonicalLift::Squat),
            (&aliases.bench, CanonicalLift::Bench),
            (&aliases.deadlift, CanonicalLift::Deadlift),
            (&aliases.ohp, CanonicalLift::Ohp),
        ];
        for (names, lift) in groups {
            for name in names {
                map.insert(name.to_lowercase(), lift);
            }
        }
        Self { map }
    }

    /// Resolve a raw exercise name; None means the exercise is unmapped
    pub fn lookup(&self, name: &str) -> Option<CanonicalLift> {
        self.map.get(&name.to_lowercase()).copied()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::from_config(&AliasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = AliasTable::default();
        assert_eq!(table.lookup("squat"), Some(CanonicalLift::Squat));
        assert_eq!(table.lookup("BENCH PRESS"), Some(CanonicalLift::Bench));
        assert_eq!(table.lookup("ohp"), Some(CanonicalLift::Ohp));
    }

    #[test]
    fn test_no_partial_matching() {
        let table = AliasTable::default();
        assert_eq!(table.lookup("Squat (paused)"), None);
        assert_eq!(table.lookup("Bench Pres"), None);
    }

    #[test]
    fn test_unmapped_name() {
        let table = AliasTable::default();
        assert_eq!(table.lookup("Barbell Row"), None);
    }

    #[test]
    fn test_custom_aliases() {
        let mut aliases = AliasConfig::default();
        aliases.squat.push("Low Bar Squat".into());
        let table = AliasTable::from_config(&aliases);
        assert_eq!(table.lookup("low bar squat"), Some(CanonicalLift::Squat));
    }
}
