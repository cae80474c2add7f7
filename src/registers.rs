use std::collections::BTreeMap;

pub const NUMBER_KEYS: &str = "1234567890";
pub const LOWERCASE_KEYS: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE_KEYS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Register key groups used by reset, export, and import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterCategory {
    Numbers,
    Lowercase,
    Uppercase,
    All,
}

impl RegisterCategory {
    /// Whether `key` belongs to this category.
    pub fn contains(self, key: char) -> bool {
        match self {
            RegisterCategory::Numbers => key.is_ascii_digit(),
            RegisterCategory::Lowercase => key.is_ascii_lowercase(),
            RegisterCategory::Uppercase => key.is_ascii_uppercase(),
            RegisterCategory::All => is_valid_register_key(key),
        }
    }

    fn keys(self) -> &'static str {
        match self {
            RegisterCategory::Numbers => NUMBER_KEYS,
            RegisterCategory::Lowercase => LOWERCASE_KEYS,
            RegisterCategory::Uppercase => UPPERCASE_KEYS,
            RegisterCategory::All => "",
        }
    }
}

/// True for the 62 keys a register may use: digits and ASCII letters.
pub fn is_valid_register_key(key: char) -> bool {
    key.is_ascii_alphanumeric()
}

/// Named clipboard slots, keyed by a single digit or letter.
///
/// Independent of the ordered histories: clearing the history never touches
/// registers. An absent key is distinct from a key holding an empty string.
#[derive(Debug, Default)]
pub struct RegisterStore {
    registers: BTreeMap<char, String>,
}

impl RegisterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite. The dispatcher validates the key before calling.
    pub fn set(&mut self, key: char, text: String) {
        self.registers.insert(key, text);
    }

    pub fn get(&self, key: char) -> Option<&str> {
        self.registers.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Reset a key group. "All" removes every entry; the sub-alphabets set
    /// each of their keys to an empty string instead of deleting them,
    /// which keeps the keys listed.
    pub fn reset_category(&mut self, category: RegisterCategory) {
        if category == RegisterCategory::All {
            self.registers.clear();
            return;
        }
        for key in category.keys().chars() {
            self.registers.insert(key, String::new());
        }
    }

    /// The subset of registers in `category` with non-empty content, as an
    /// owned map ready for serialization.
    pub fn export_category(&self, category: RegisterCategory) -> BTreeMap<char, String> {
        self.registers
            .iter()
            .filter(|(key, text)| category.contains(**key) && !text.is_empty())
            .map(|(key, text)| (*key, text.clone()))
            .collect()
    }

    /// Merge `entries` into the store, overwriting existing keys. Keys
    /// outside the register alphabet are skipped.
    pub fn merge(&mut self, entries: BTreeMap<char, String>) {
        for (key, text) in entries {
            if is_valid_register_key(key) {
                self.registers.insert(key, text);
            }
        }
    }

    /// Replace the whole store.
    pub fn replace_all(&mut self, entries: BTreeMap<char, String>) {
        self.registers = entries
            .into_iter()
            .filter(|(key, _)| is_valid_register_key(*key))
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.registers.iter().map(|(key, text)| (*key, text.as_str()))
    }
}
