// src/lexer/tables/rules.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TablesError;

/// Token-class identity produced by a rule. Lower `priority` wins when
/// several rules accept the same input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub priority: u32,
}

impl Symbol {
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexRule {
    pub pattern: String,
    pub symbol: Symbol,
}

impl LexRule {
    pub fn new(pattern: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            pattern: pattern.into(),
            symbol,
        }
    }
}

/// `(pattern, name)` pairs to rules whose priority is their position, so
/// earlier rules win ties.
pub fn rules_in_order<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<LexRule> {
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (pattern, name))| LexRule::new(pattern, Symbol::new(name, i as u32)))
        .collect()
}

// -------------------- rule files (JSON) --------------------
//
// {"rules": [{"name": "Ident", "pattern": "[\\l_]\\w*"},
//            {"name": "Int", "pattern": "\\d\\d*", "priority": 3}]}

#[derive(Serialize, Deserialize)]
struct RuleDisk {
    name: String,
    pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct RulesDisk {
    rules: Vec<RuleDisk>,
}

/// Rules without an explicit priority get their declaration index.
pub fn load_rules_json_bytes(data: &[u8]) -> Result<Vec<LexRule>, TablesError> {
    let disk: RulesDisk = serde_json::from_slice(data)?;
    Ok(disk
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let priority = r.priority.unwrap_or(i as u32);
            LexRule::new(r.pattern, Symbol::new(r.name, priority))
        })
        .collect())
}

pub fn rules_to_json_string(rules: &[LexRule]) -> Result<String, TablesError> {
    let disk = RulesDisk {
        rules: rules
            .iter()
            .map(|r| RuleDisk {
                name: r.symbol.name.clone(),
                pattern: r.pattern.clone(),
                priority: Some(r.symbol.priority),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&disk)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_priority_defaults_to_position() {
        let json = br#"{"rules": [
            {"name": "Kw", "pattern": "if"},
            {"name": "Ident", "pattern": "\\l*", "priority": 0}
        ]}"#;
        let rules = load_rules_json_bytes(json).unwrap();
        assert_eq!(rules[0].symbol, Symbol::new("Kw", 0));
        assert_eq!(rules[1].symbol, Symbol::new("Ident", 0));
        assert_eq!(rules[1].pattern, r"\l*");
    }

    #[test]
    fn written_rules_load_back() {
        let rules = rules_in_order([("a", "A"), ("b|c", "BC")]);
        let json = rules_to_json_string(&rules).unwrap();
        assert_eq!(load_rules_json_bytes(json.as_bytes()).unwrap(), rules);
    }
}
