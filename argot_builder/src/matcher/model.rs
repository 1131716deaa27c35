use std::collections::HashMap;

use crate::api::CommandSchema;
use crate::model::ValueType;

/// The declared types of a resolved schema, addressable by long or short name.
/// Lookups yield the canonical long name alongside the type.
#[derive(Debug)]
pub(crate) struct OptionTypes<'s> {
    longs: HashMap<&'s str, ValueType>,
    shorts: HashMap<char, (&'s str, ValueType)>,
}

impl<'s> OptionTypes<'s> {
    pub(crate) fn new(schema: &'s CommandSchema) -> Self {
        let mut longs = HashMap::default();
        let mut shorts = HashMap::default();

        for option in schema.options() {
            longs.insert(option.name(), option.value_type());

            if let Some(short) = option.short() {
                shorts.insert(short, (option.name(), option.value_type()));
            }
        }

        Self { longs, shorts }
    }

    /// Resolve a key written as `--key`: by long name, then by short name.
    pub(crate) fn long(&self, key: &str) -> Option<(&'s str, ValueType)> {
        if let Some((name, value_type)) = self.longs.get_key_value(key) {
            return Some((*name, *value_type));
        }

        let mut characters = key.chars();
        match (characters.next(), characters.next()) {
            (Some(short), None) => self.shorts.get(&short).copied(),
            _ => None,
        }
    }

    /// Resolve a key written as `-k`: by short name, then by long name.
    pub(crate) fn short(&self, key: char) -> Option<(&'s str, ValueType)> {
        self.shorts.get(&key).copied().or_else(|| {
            let mut buffer = [0; 4];
            let name = key.encode_utf8(&mut buffer);
            self.longs
                .get_key_value(&*name)
                .map(|(name, value_type)| (*name, *value_type))
        })
    }
}
