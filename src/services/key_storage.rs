//! API key persistence in browser local storage.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{info, warn};

use crate::config::API_KEY_STORAGE_KEY;

/// String key/value storage, as offered by `window.localStorage`.
pub trait KeyValueStore {
	fn get_item(&self, key: &str) -> Option<String>;
	fn set_item(&self, key: &str, value: &str);
	fn remove_item(&self, key: &str);
}

/// `window.localStorage`; every operation is a no-op when storage is unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
	fn storage() -> Option<web_sys::Storage> {
		web_sys::window()?.local_storage().ok().flatten()
	}
}

impl KeyValueStore for LocalStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		Self::storage()?.get_item(key).ok().flatten()
	}

	fn set_item(&self, key: &str, value: &str) {
		match Self::storage().map(|s| s.set_item(key, value)) {
			Some(Ok(())) => {}
			_ => warn!("Could not write {key} to local storage"),
		}
	}

	fn remove_item(&self, key: &str) {
		if let Some(storage) = Self::storage() {
			let _ = storage.remove_item(key);
		}
	}
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
	items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
	pub fn contains(&self, key: &str) -> bool {
		self.items.borrow().contains_key(key)
	}
}

impl KeyValueStore for MemoryStore {
	fn get_item(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	fn set_item(&self, key: &str, value: &str) {
		self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
	}

	fn remove_item(&self, key: &str) {
		self.items.borrow_mut().remove(key);
	}
}

/// Reads and writes the OpenAI key under its fixed storage entry.
#[derive(Clone, Debug, Default)]
pub struct ApiKeyStorage<S = LocalStorage> {
	store: S,
}

impl<S: KeyValueStore> ApiKeyStorage<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// The stored key, or an empty string when none is saved.
	pub fn load(&self) -> String {
		self.store.get_item(API_KEY_STORAGE_KEY).unwrap_or_default()
	}

	/// Store a non-empty key; an empty key removes the entry.
	pub fn save(&self, key: &str) {
		if key.is_empty() {
			self.store.remove_item(API_KEY_STORAGE_KEY);
			info!("API key removed");
		} else {
			self.store.set_item(API_KEY_STORAGE_KEY, key);
			info!("API key saved");
		}
	}
}

/// How the key input is displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyVisibility {
	#[default]
	Masked,
	Plain,
}

impl KeyVisibility {
	pub fn toggled(self) -> Self {
		match self {
			Self::Masked => Self::Plain,
			Self::Plain => Self::Masked,
		}
	}

	/// The `type` attribute for the key input.
	pub fn input_type(self) -> &'static str {
		match self {
			Self::Masked => "password",
			Self::Plain => "text",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn saved_key_reads_back_identically() {
		let storage = ApiKeyStorage::new(MemoryStore::default());
		storage.save("sk-abc123 ");
		assert_eq!(storage.load(), "sk-abc123 ");
	}

	#[test]
	fn missing_key_loads_as_empty() {
		assert_eq!(ApiKeyStorage::new(MemoryStore::default()).load(), "");
	}

	#[test]
	fn saving_empty_key_removes_entry() {
		let storage = ApiKeyStorage::new(MemoryStore::default());
		storage.save("sk-abc123");
		storage.save("");
		assert!(!storage.store.contains(API_KEY_STORAGE_KEY));
		assert_eq!(storage.load(), "");
	}

	#[test]
	fn visibility_toggles_input_type() {
		let v = KeyVisibility::default();
		assert_eq!(v.input_type(), "password");
		assert_eq!(v.toggled().input_type(), "text");
		assert_eq!(v.toggled().toggled(), v);
	}
}
