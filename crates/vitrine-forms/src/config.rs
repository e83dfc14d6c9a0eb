// File: src/config.rs
// Purpose: Form configuration parsing from vitrine.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use vitrine_validation::{FieldKind, PasswordPolicy};

use crate::error::FormError;

/// Storefront configuration: every form the site renders, by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default = "default_forms")]
    pub forms: BTreeMap<String, FormConfig>,
}

/// Field registry of a single form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Form name, filled from the table key when loaded from a file
    #[serde(default)]
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    /// Extra required fields that depend on another field's value
    #[serde(default)]
    pub conditional: Vec<ConditionalRule>,

    /// Canonical name -> candidate field ids, first registered one wins
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,

    /// Field whose blur triggers the postal-code lookup
    #[serde(default)]
    pub postal_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,

    #[serde(default = "default_kind")]
    pub kind: FieldKind,

    /// Unconditionally required
    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub rules: FieldRules,
}

/// Additional checks run at submit time after the kind's own validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldRules {
    #[serde(default)]
    pub min_length: Option<usize>,

    /// Letters and spaces only, at least 2 characters
    #[serde(default)]
    pub person_name: bool,

    #[serde(default)]
    pub password: Option<PasswordPolicy>,

    /// Must repeat the value of another field (password confirmation)
    #[serde(default)]
    pub equals_field: Option<String>,

    /// Replaces the validator's reason in the displayed marker
    #[serde(default)]
    pub message: Option<String>,
}

/// When `selector`'s value equals `equals`, every field in `require`
/// becomes required for that submission pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub selector: String,
    pub equals: String,
    pub require: Vec<String>,
}

fn default_kind() -> FieldKind {
    FieldKind::GenericText
}

fn default_forms() -> BTreeMap<String, FormConfig> {
    [FormConfig::checkout(), FormConfig::registration()]
        .into_iter()
        .map(|form| (form.name.clone(), form))
        .collect()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            forms: default_forms(),
        }
    }
}

impl FieldConfig {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            required: false,
            rules: FieldRules::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }
}

impl FormConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn require_when(
        mut self,
        selector: impl Into<String>,
        equals: impl Into<String>,
        require: &[&str],
    ) -> Self {
        self.conditional.push(ConditionalRule {
            selector: selector.into(),
            equals: equals.into(),
            require: require.iter().map(|id| id.to_string()).collect(),
        });
        self
    }

    pub fn alias(mut self, canonical: impl Into<String>, candidates: &[&str]) -> Self {
        self.aliases.insert(
            canonical.into(),
            candidates.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn postal_field(mut self, id: impl Into<String>) -> Self {
        self.postal_field = Some(id.into());
        self
    }

    /// The storefront checkout page
    pub fn checkout() -> Self {
        use FieldKind::*;

        Self::new("checkout")
            .field(FieldConfig::new("firstName", GenericText).required())
            .field(FieldConfig::new("lastName", GenericText).required())
            .field(FieldConfig::new("email", Email).required())
            .field(FieldConfig::new("phone", Phone).required())
            .field(FieldConfig::new("cpf", TaxpayerId).required())
            .field(FieldConfig::new("firstDate", Date).required())
            .field(FieldConfig::new("zipCode", PostalCode).required())
            .field(FieldConfig::new("address", GenericText).required())
            .field(FieldConfig::new("number", GenericText).required())
            .field(FieldConfig::new("neighborhood", GenericText))
            .field(FieldConfig::new("city", GenericText).required())
            .field(FieldConfig::new("state", GenericText).required())
            .field(FieldConfig::new("paymentMethod", GenericText))
            .field(FieldConfig::new("cardNumber", CardNumber))
            .field(FieldConfig::new("expiryDate", ExpiryDate))
            .field(FieldConfig::new("cvv", GenericText))
            .field(FieldConfig::new("cardName", GenericText))
            .require_when(
                "paymentMethod",
                "credit",
                &["cardNumber", "expiryDate", "cvv", "cardName"],
            )
            .alias("address", &["address", "rua", "logradouro"])
            .alias("neighborhood", &["neighborhood", "bairro"])
            .alias("city", &["city", "cidade", "localidade"])
            .alias("state", &["state", "uf", "estado"])
            .alias("number", &["number", "numero"])
            .postal_field("zipCode")
    }

    /// The account registration page
    pub fn registration() -> Self {
        use FieldKind::*;

        Self::new("registration")
            .field(FieldConfig::new("nome", GenericText).required().with_rules(FieldRules {
                person_name: true,
                ..FieldRules::default()
            }))
            .field(FieldConfig::new("email", Email).required())
            .field(FieldConfig::new("senha", GenericText).required().with_rules(FieldRules {
                password: Some(PasswordPolicy::default()),
                ..FieldRules::default()
            }))
            .field(
                FieldConfig::new("confirmar_senha", GenericText)
                    .required()
                    .with_rules(FieldRules {
                        equals_field: Some("senha".to_string()),
                        ..FieldRules::default()
                    }),
            )
    }

    /// Rejects duplicate ids and rules that name unregistered fields.
    ///
    /// Aliases may name fields the form does not have; those are dropped
    /// when the registry is built.
    pub fn check(&self) -> Result<(), FormError> {
        let mut ids = HashSet::new();
        for field in &self.fields {
            if !ids.insert(field.id.as_str()) {
                return Err(FormError::InvalidConfig(format!(
                    "duplicate field '{}' in form '{}'",
                    field.id, self.name
                )));
            }
        }

        let unknown = |id: &str, what: &str| {
            FormError::InvalidConfig(format!(
                "{} names unknown field '{}' in form '{}'",
                what, id, self.name
            ))
        };

        for rule in &self.conditional {
            if !ids.contains(rule.selector.as_str()) {
                return Err(unknown(&rule.selector, "conditional selector"));
            }
            if let Some(id) = rule.require.iter().find(|id| !ids.contains(id.as_str())) {
                return Err(unknown(id, "conditional requirement"));
            }
        }

        for field in &self.fields {
            if let Some(other) = &field.rules.equals_field {
                if !ids.contains(other.as_str()) {
                    return Err(unknown(other, "equals_field rule"));
                }
            }
        }

        if let Some(postal) = &self.postal_field {
            match self.fields.iter().find(|f| &f.id == postal) {
                None => return Err(unknown(postal, "postal_field")),
                Some(field) if field.kind != FieldKind::PostalCode => {
                    return Err(FormError::InvalidConfig(format!(
                        "postal_field '{}' has kind {}, expected postal_code",
                        postal, field.kind
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl StorefrontConfig {
    /// Load configuration from vitrine.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, use the built-in forms
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {:?}", path))
    }

    /// Parse configuration from TOML text. Blank text gives the built-in forms.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: StorefrontConfig =
            toml::from_str(content).context("Failed to parse storefront config")?;

        for (name, form) in config.forms.iter_mut() {
            if form.name.is_empty() {
                form.name = name.clone();
            }
            form.check()
                .with_context(|| format!("Invalid form '{}'", name))?;
        }

        Ok(config)
    }

    /// Load configuration from default path (./vitrine.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("vitrine.toml")
    }

    pub fn form(&self, name: &str) -> Option<&FormConfig> {
        self.forms.get(name)
    }
}
