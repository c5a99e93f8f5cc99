use std::{collections::HashMap, fmt::Display};

use crate::statement::DataType;

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
	pub name:        String,
	pub data_type:   DataType,
	/// Last value the analyzer computed for it, `0` until assigned.
	pub value:       f64,
	pub initialized: bool,
}

impl Symbol {
	pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
		Self { name: name.into(), data_type, value: 0.0, initialized: false }
	}

	/// Store a value, truncating it for `int` symbols.
	pub fn store(&mut self, value: f64) {
		self.value = match self.data_type {
			DataType::Int => value.trunc(),
			DataType::Float => value,
		};
		self.initialized = true;
	}
}

/// `name | type | init | value`, one table row.
impl Display for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let initialized = if self.initialized { "Yes" } else { "No" };
		write!(f, "{:<10} | {:<6} | {:<5} | {}", self.name, self.data_type, initialized, self.value)
	}
}

/// Name to symbol mapping for one compile, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
	symbols: Vec<Symbol>,
	index:   HashMap<String, usize>,
}

impl SymbolTable {
	pub fn new() -> Self { Self::default() }

	/// Insert a fresh symbol. Returns `false` and leaves the table untouched
	/// if the name is already declared.
	pub fn define(&mut self, symbol: Symbol) -> bool {
		if self.index.contains_key(&symbol.name) {
			return false;
		}
		self.index.insert(symbol.name.clone(), self.symbols.len());
		self.symbols.push(symbol);
		true
	}

	pub fn get(&self, name: &str) -> Option<&Symbol> { self.index.get(name).map(|&i| &self.symbols[i]) }

	pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
		self.index.get(name).map(|&i| &mut self.symbols[i])
	}

	pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

	pub fn iter(&self) -> impl Iterator<Item = &Symbol> { self.symbols.iter() }

	pub fn len(&self) -> usize { self.symbols.len() }

	pub fn is_empty(&self) -> bool { self.symbols.is_empty() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn define_rejects_redeclaration() {
		let mut table = SymbolTable::new();
		assert!(table.define(Symbol::new("x", DataType::Int)));
		assert!(!table.define(Symbol::new("x", DataType::Float)));
		assert_eq!(table.len(), 1);
		assert_eq!(table.get("x").map(|s| s.data_type), Some(DataType::Int));
	}

	#[test]
	fn iterates_in_declaration_order() {
		let mut table = SymbolTable::new();
		for name in ["b", "a", "c"] {
			table.define(Symbol::new(name, DataType::Float));
		}
		let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
		assert_eq!(names, ["b", "a", "c"]);
	}

	#[test]
	fn int_store_truncates() {
		let mut symbol = Symbol::new("n", DataType::Int);
		symbol.store(3.9);
		assert_eq!(symbol.value, 3.0);
		symbol.store(-2.5);
		assert_eq!(symbol.value, -2.0);
		assert!(symbol.initialized);

		let mut symbol = Symbol::new("f", DataType::Float);
		symbol.store(2.5);
		assert_eq!(symbol.value, 2.5);
	}

	#[test]
	fn table_row_format() {
		let mut symbol = Symbol::new("x", DataType::Int);
		assert_eq!(symbol.to_string(), "x          | int    | No    | 0");
		symbol.store(5.0);
		assert_eq!(symbol.to_string(), "x          | int    | Yes   | 5");
	}
}
