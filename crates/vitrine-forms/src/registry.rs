// File: src/registry.rs
// Purpose: Resolved field registry of a form instance

use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use vitrine_validation::FieldKind;

use crate::config::{ConditionalRule, FieldRules, FormConfig};
use crate::error::FormError;

/// A registered field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: String,
    pub kind: FieldKind,
    pub required: bool,
    pub rules: FieldRules,
}

/// Field ids, kinds and requiredness of one form, with the alias table
/// resolved once against the registered ids
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    conditional: Vec<ConditionalRule>,
    aliases: BTreeMap<String, String>,
    postal_field: Option<String>,
}

impl FieldRegistry {
    pub fn from_config(config: &FormConfig) -> Result<Self, FormError> {
        config.check()?;

        let fields: Vec<FieldSpec> = config
            .fields
            .iter()
            .map(|f| FieldSpec {
                id: f.id.clone(),
                kind: f.kind,
                required: f.required,
                rules: f.rules.clone(),
            })
            .collect();

        let index: HashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();

        let mut aliases = BTreeMap::new();
        for (canonical, candidates) in &config.aliases {
            match candidates.iter().find(|id| index.contains_key(id.as_str())) {
                Some(id) => {
                    aliases.insert(canonical.clone(), id.clone());
                }
                None => debug!(
                    "Alias '{}' of form '{}' matches no registered field ({:?})",
                    canonical, config.name, candidates
                ),
            }
        }

        Ok(Self {
            fields,
            index,
            conditional: config.conditional.clone(),
            aliases,
            postal_field: config.postal_field.clone(),
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn spec(&self, id: &str) -> Option<&FieldSpec> {
        self.position(id).map(|i| &self.fields[i])
    }

    pub fn conditional(&self) -> &[ConditionalRule] {
        &self.conditional
    }

    /// Field id behind a canonical name: the resolved alias, or the name
    /// itself when it is a registered id
    pub fn resolve(&self, canonical: &str) -> Option<&str> {
        self.aliases
            .get(canonical)
            .map(String::as_str)
            .or_else(|| self.index.get_key_value(canonical).map(|(id, _)| id.as_str()))
    }

    pub fn postal_field(&self) -> Option<&str> {
        self.postal_field.as_deref()
    }

    /// Field positions of a submission pass with their requiredness for
    /// that pass: declared required fields, then conditional ones whose
    /// selector currently matches, then the rest.
    ///
    /// `value_of` gives the current value of a field position; conditions are
    /// evaluated on every call.
    pub fn pass_order<'a>(&self, value_of: impl Fn(usize) -> &'a str) -> Vec<(usize, bool)> {
        let mut order: Vec<(usize, bool)> = Vec::with_capacity(self.fields.len());
        let mut seen = vec![false; self.fields.len()];

        for (i, field) in self.fields.iter().enumerate() {
            if field.required {
                order.push((i, true));
                seen[i] = true;
            }
        }

        for rule in &self.conditional {
            let Some(selector) = self.position(&rule.selector) else {
                continue;
            };
            if value_of(selector).trim() != rule.equals {
                continue;
            }
            for id in &rule.require {
                if let Some(i) = self.position(id) {
                    if !seen[i] {
                        order.push((i, true));
                        seen[i] = true;
                    }
                }
            }
        }

        for i in 0..self.fields.len() {
            if !seen[i] {
                order.push((i, false));
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alias_resolution_picks_first_registered() {
        let config = FormConfig::new("addr")
            .field(FieldConfig::new("rua", FieldKind::GenericText))
            .field(FieldConfig::new("cidade", FieldKind::GenericText))
            .alias("address", &["address", "rua", "logradouro"])
            .alias("city", &["city", "cidade"])
            .alias("state", &["state", "uf"]);
        let registry = FieldRegistry::from_config(&config).unwrap();

        assert_eq!(registry.resolve("address"), Some("rua"));
        assert_eq!(registry.resolve("city"), Some("cidade"));
        assert_eq!(registry.resolve("state"), None);
        assert_eq!(registry.resolve("rua"), Some("rua"));
    }

    #[test]
    fn test_pass_order_reevaluates_conditions() {
        let config = FormConfig::new("pay")
            .field(FieldConfig::new("cardNumber", FieldKind::CardNumber))
            .field(FieldConfig::new("name", FieldKind::GenericText).required())
            .field(FieldConfig::new("paymentMethod", FieldKind::GenericText))
            .field(FieldConfig::new("email", FieldKind::Email).required())
            .require_when("paymentMethod", "credit", &["cardNumber"]);
        let registry = FieldRegistry::from_config(&config).unwrap();

        let credit = ["", "", "credit", ""];
        assert_eq!(
            registry.pass_order(|i| credit[i]),
            vec![(1, true), (3, true), (0, true), (2, false)]
        );

        let pix = ["", "", "pix", ""];
        assert_eq!(
            registry.pass_order(|i| pix[i]),
            vec![(1, true), (3, true), (0, false), (2, false)]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FormConfig::new("bad")
            .field(FieldConfig::new("a", FieldKind::GenericText))
            .field(FieldConfig::new("a", FieldKind::GenericText));
        assert!(FieldRegistry::from_config(&config).is_err());
    }
}
