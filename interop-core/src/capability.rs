//! Capability flags reported for a key on a foreign object.
//!
//! A `CapabilitySet` is a small bitmask. The bit layout is stable so that a
//! set can cross an FFI boundary as a plain integer, and every flag also has
//! a host-facing symbol name (`:existing`, `:readable`, ...).

use std::fmt;

bitflags::bitflags! {
    /// The capabilities a key has on a target object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u32 {
        /// The key is known to the target.
        const EXISTING   = 1 << 0;
        /// The key's value can be read.
        const READABLE   = 1 << 1;
        /// The key's value can be written.
        const WRITABLE   = 1 << 2;
        /// The key names something callable.
        const INVOCABLE  = 1 << 3;
        /// The key names implementation-level state.
        const INTERNAL   = 1 << 4;
        /// Reserved: the key's value can be replaced in place.
        const MODIFIABLE = 1 << 5;
        /// Reserved: the key can be added to the target.
        const INSERTABLE = 1 << 6;
        /// Reserved: the key can be removed from the target.
        const REMOVABLE  = 1 << 7;
    }
}

/// Flags in the order they are rendered for the host.
const SYMBOL_TABLE: [(CapabilitySet, &str); 8] = [
    (CapabilitySet::EXISTING, "existing"),
    (CapabilitySet::READABLE, "readable"),
    (CapabilitySet::WRITABLE, "writable"),
    (CapabilitySet::INVOCABLE, "invocable"),
    (CapabilitySet::INTERNAL, "internal"),
    (CapabilitySet::INSERTABLE, "insertable"),
    (CapabilitySet::REMOVABLE, "removable"),
    (CapabilitySet::MODIFIABLE, "modifiable"),
];

impl CapabilitySet {
    /// Symbol names of the flags in this set, in vocabulary order
    pub fn symbol_names(&self) -> Vec<&'static str> {
        SYMBOL_TABLE
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Look up a single flag by its symbol name (without the leading `:`)
    pub fn from_symbol(name: &str) -> Option<Self> {
        SYMBOL_TABLE
            .iter()
            .find(|(_, symbol)| *symbol == name)
            .map(|(flag, _)| *flag)
    }

    /// Build a set from symbol names, returning the first unknown name on failure
    pub fn from_symbols<'a, I>(names: I) -> Result<Self, &'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().try_fold(Self::empty(), |set, name| {
            Self::from_symbol(name).map(|flag| set | flag).ok_or(name)
        })
    }

    /// Add `WRITABLE` unless the target is frozen
    pub(crate) fn with_writable_unless(self, frozen: bool) -> Self {
        if frozen {
            self
        } else {
            self | Self::WRITABLE
        }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<String> = self
            .symbol_names()
            .into_iter()
            .map(|name| format!(":{name}"))
            .collect();
        write!(f, "[{}]", symbols.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_renders_as_empty_list() {
        assert_eq!(CapabilitySet::empty().to_string(), "[]");
        assert!(CapabilitySet::empty().symbol_names().is_empty());
    }

    #[test]
    fn test_rendering_follows_vocabulary_order() {
        let set = CapabilitySet::INTERNAL | CapabilitySet::READABLE | CapabilitySet::EXISTING;
        assert_eq!(set.to_string(), "[:existing, :readable, :internal]");
    }

    #[test]
    fn test_bit_layout_is_stable() {
        assert_eq!(CapabilitySet::EXISTING.bits(), 1);
        assert_eq!(CapabilitySet::READABLE.bits(), 2);
        assert_eq!(CapabilitySet::WRITABLE.bits(), 4);
        assert_eq!(CapabilitySet::INVOCABLE.bits(), 8);
        assert_eq!(CapabilitySet::INTERNAL.bits(), 16);
        assert_eq!(CapabilitySet::all().bits(), 0xff);
    }

    #[test]
    fn test_from_symbols() {
        let set = CapabilitySet::from_symbols(["existing", "writable"]).unwrap();
        assert_eq!(set, CapabilitySet::EXISTING | CapabilitySet::WRITABLE);

        assert_eq!(
            CapabilitySet::from_symbols(["existing", "flying"]),
            Err("flying")
        );
    }

    #[test]
    fn test_every_flag_has_a_symbol() {
        for flag in CapabilitySet::all().iter() {
            let names = flag.symbol_names();
            assert_eq!(names.len(), 1, "flag {flag:?} should have one symbol");
            assert_eq!(CapabilitySet::from_symbol(names[0]), Some(flag));
        }
    }

    #[test]
    fn test_writable_unless_frozen() {
        let base = CapabilitySet::EXISTING | CapabilitySet::READABLE;
        assert!(base.with_writable_unless(false).contains(CapabilitySet::WRITABLE));
        assert_eq!(base.with_writable_unless(true), base);
    }
}
