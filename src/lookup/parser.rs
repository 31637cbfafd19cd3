//! Filter key parser
//!
//! Keys have the form `name[__[!]lookup]`:
//! - `name` selects the field (identifier, not starting with a digit)
//! - `lookup` is optional and falls back to the parser's default lookup
//! - `!` in front of the lookup negates the predicate

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{KeyError, KeyResult};
use super::types::{Lookup, LookupSet, LOOKUP_SEP};

static KEY_GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn key_grammar() -> &'static Regex {
    KEY_GRAMMAR.get_or_init(|| {
        Regex::new(r"^[^\d\W]\w*(?:__!?[^\d\W]\w*)?$").expect("key grammar must compile")
    })
}

/// A filter key split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    /// Field path as written in the key
    pub field_path: String,
    /// Lookup, explicit or defaulted
    pub lookup: Lookup,
    /// False when the key was negated with `!`
    pub include: bool,
}

impl ParsedKey {
    /// Key used in predicate maps handed to the collection engine
    pub fn predicate_key(&self) -> String {
        format!("{}{}{}", self.field_path, LOOKUP_SEP, self.lookup)
    }
}

/// Normalized key form, with the lookup always spelled out
impl fmt::Display for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negation = if self.include { "" } else { "!" };
        write!(f, "{}{}{}{}", self.field_path, LOOKUP_SEP, negation, self.lookup)
    }
}

/// Parses raw filter keys against a lookup whitelist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParser {
    default_lookup: Lookup,
    lookups: LookupSet,
}

impl Default for KeyParser {
    fn default() -> Self {
        Self {
            default_lookup: Lookup::Exact,
            lookups: LookupSet::all(),
        }
    }
}

impl KeyParser {
    pub fn new(default_lookup: Lookup, lookups: LookupSet) -> Self {
        Self {
            default_lookup,
            lookups,
        }
    }

    pub fn default_lookup(&self) -> Lookup {
        self.default_lookup
    }

    pub fn lookups(&self) -> &LookupSet {
        &self.lookups
    }

    pub(crate) fn set_default_lookup(&mut self, lookup: Lookup) {
        self.default_lookup = lookup;
    }

    pub(crate) fn set_lookups(&mut self, lookups: LookupSet) {
        self.lookups = lookups;
    }

    /// Parses a raw key.
    ///
    /// The key is split at the first separator; everything after it is the
    /// lookup name.
    ///
    /// # Errors
    ///
    /// - `KeyError::InvalidFormat` if the key does not match the grammar
    /// - `KeyError::UnsupportedLookup` if the lookup is unknown or not
    ///   in the whitelist (this applies to the default lookup as well)
    pub fn parse(&self, raw_key: &str) -> KeyResult<ParsedKey> {
        if !key_grammar().is_match(raw_key) {
            return Err(KeyError::InvalidFormat(raw_key.to_string()));
        }

        let (field_path, lookup, include) = match raw_key.split_once(LOOKUP_SEP) {
            None => (raw_key, self.default_lookup, true),
            Some((field_path, name)) => {
                let (name, include) = match name.strip_prefix('!') {
                    Some(name) => (name, false),
                    None => (name, true),
                };
                (field_path, name.parse::<Lookup>()?, include)
            }
        };

        if !self.lookups.contains(lookup) {
            return Err(KeyError::UnsupportedLookup(lookup.to_string()));
        }

        Ok(ParsedKey {
            field_path: field_path.to_string(),
            lookup,
            include,
        })
    }
}
