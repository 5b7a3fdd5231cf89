//! Table-driven attribute rule registry.
//!
//! A registry is an ordered list of rule records built once per contract
//! type. Order is declaration order and is never rearranged: later
//! validators may rely on earlier ones having run.

use crate::contract::errors::Errors;
use crate::model::Attribute;

/// Decides whether an attribute may be written in the contract's state.
pub type WritablePredicate<C> = fn(&C) -> bool;

/// Adds zero or more violations for the contract's state.
pub type Validator<C> = fn(&C, &mut Errors);

/// Per-attribute rule: optional writability predicate plus optional validator.
pub struct AttributeRule<C> {
    pub attribute: Attribute,
    /// `None` means always writable.
    pub writable: Option<WritablePredicate<C>>,
    pub validator: Option<Validator<C>>,
}

impl<C> AttributeRule<C> {
    /// Evaluate the writability predicate against `contract`.
    pub fn is_writable(&self, contract: &C) -> bool {
        self.writable.is_none_or(|writable| writable(contract))
    }
}

/// A registry entry.
pub enum Rule<C> {
    Attribute(AttributeRule<C>),
    /// Whole-entity validator placed between attribute rules.
    Entity {
        name: &'static str,
        validator: Validator<C>,
    },
}

impl<C> Rule<C> {
    /// The rule's validator, if it has one.
    pub fn validator(&self) -> Option<Validator<C>> {
        match self {
            Self::Attribute(rule) => rule.validator,
            Self::Entity { validator, .. } => Some(*validator),
        }
    }
}

/// Ordered list of rules for one contract type.
pub struct RuleRegistry<C> {
    rules: Vec<Rule<C>>,
}

impl<C> Default for RuleRegistry<C> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<C> RuleRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `attribute` with an optional predicate and validator.
    ///
    /// # Panics
    ///
    /// Panics if `attribute` is already registered. Registries are built
    /// once at startup, so a duplicate is a programming error.
    #[must_use]
    pub fn register(
        mut self,
        attribute: Attribute,
        writable: Option<WritablePredicate<C>>,
        validator: Option<Validator<C>>,
    ) -> Self {
        assert!(
            self.rule_for(attribute).is_none(),
            "attribute {attribute} registered twice"
        );
        self.rules.push(Rule::Attribute(AttributeRule {
            attribute,
            writable,
            validator,
        }));
        self
    }

    /// Declare an always-writable attribute without validator.
    #[must_use]
    pub fn attribute(self, attribute: Attribute) -> Self {
        self.register(attribute, None, None)
    }

    /// Add a whole-entity validator at the current position.
    #[must_use]
    pub fn validate_with(mut self, name: &'static str, validator: Validator<C>) -> Self {
        self.rules.push(Rule::Entity { name, validator });
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<C>> {
        self.rules.iter()
    }

    pub fn attribute_rules(&self) -> impl Iterator<Item = &AttributeRule<C>> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Attribute(rule) => Some(rule),
            Rule::Entity { .. } => None,
        })
    }

    #[must_use]
    pub fn rule_for(&self, attribute: Attribute) -> Option<&AttributeRule<C>> {
        self.attribute_rules().find(|rule| rule.attribute == attribute)
    }

    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.attribute_rules().any(|rule| rule.attribute.as_str() == key)
    }

    /// Registered attributes whose predicate holds for `contract`, in
    /// declaration order.
    pub fn writable_attributes(&self, contract: &C) -> Vec<String> {
        self.attribute_rules()
            .filter(|rule| rule.is_writable(contract))
            .map(|rule| rule.attribute.as_str().to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
