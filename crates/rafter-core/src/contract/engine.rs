//! Validation engine shared by all contract types.
//!
//! One pass:
//!
//! 1. **Read-only check**: every registered attribute in the change set
//!    whose writability predicate fails gets `error_readonly`; its own
//!    validator is skipped for this pass.
//! 2. **Unknown keys**: every other changed key that is not a writable
//!    attribute of the contract gets `error_readonly`, ascending by key.
//! 3. **Validators**: every remaining validator runs in declaration
//!    order, changed or not. Validators may report under any key.
//!
//! Nothing is mutated besides the returned [`Errors`].

use tracing::debug;

use crate::contract::errors::{ErrorKey, ErrorSymbol, Errors};
use crate::contract::registry::{Rule, RuleRegistry};
use crate::messages::Messages;
use crate::model::{Attribute, ChangeSet};

/// A validation unit bound to one entity and actor.
pub trait Contract: Sized + 'static {
    /// The rule table for this contract type.
    fn registry(&self) -> &'static RuleRegistry<Self>;

    /// Keys changed since the entity was loaded.
    fn changes(&self) -> &ChangeSet;

    fn messages(&self) -> &Messages;

    /// Keys that may legally appear in an update payload.
    fn writable_attributes(&self) -> Vec<String> {
        self.registry().writable_attributes(self)
    }
}

/// Run one validation pass over `contract`.
pub fn evaluate<C: Contract>(contract: &C) -> Errors {
    let registry = contract.registry();
    let changes = contract.changes();
    let messages = contract.messages();
    let mut errors = Errors::new();
    let mut readonly: Vec<Attribute> = Vec::new();

    for rule in registry.attribute_rules() {
        if changes.contains_attribute(rule.attribute) && !rule.is_writable(contract) {
            debug!(attribute = %rule.attribute, "rejecting change to read-only attribute");
            errors.add(
                rule.attribute,
                ErrorSymbol::ErrorReadonly,
                messages.translate(ErrorSymbol::ErrorReadonly.as_str(), &[]),
            );
            readonly.push(rule.attribute);
        }
    }

    let writable = contract.writable_attributes();
    for key in changes.iter() {
        if registry.is_registered(key) || writable.iter().any(|w| w == key) {
            continue;
        }
        debug!(key, "rejecting change to unknown attribute");
        errors.add(
            ErrorKey::from(key),
            ErrorSymbol::ErrorReadonly,
            messages.translate(ErrorSymbol::ErrorReadonly.as_str(), &[]),
        );
    }

    for rule in registry.rules() {
        if matches!(rule, Rule::Attribute(r) if readonly.contains(&r.attribute)) {
            continue;
        }
        if let Some(validator) = rule.validator() {
            validator(contract, &mut errors);
        }
    }

    debug!(
        changed = changes.len(),
        violations = errors.len(),
        "contract validation pass complete"
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    struct Toy {
        changes: ChangeSet,
        locked: bool,
        messages: Messages,
    }

    fn not_locked(toy: &Toy) -> bool {
        !toy.locked
    }

    fn subject_check(_: &Toy, errors: &mut Errors) {
        errors.add(Attribute::Subject, ErrorSymbol::Inclusion, "subject ran");
    }

    fn due_check(_: &Toy, errors: &mut Errors) {
        errors.add(Attribute::DueDate, ErrorSymbol::Inclusion, "due ran");
    }

    fn base_check(_: &Toy, errors: &mut Errors) {
        errors.add(ErrorKey::Base, ErrorSymbol::ErrorUnauthorized, "base ran");
    }

    static TOY_RULES: LazyLock<RuleRegistry<Toy>> = LazyLock::new(|| {
        RuleRegistry::new()
            .register(Attribute::Subject, None, Some(subject_check))
            .validate_with("base", base_check)
            .register(Attribute::DueDate, Some(not_locked), Some(due_check))
    });

    impl Contract for Toy {
        fn registry(&self) -> &'static RuleRegistry<Self> {
            &TOY_RULES
        }

        fn changes(&self) -> &ChangeSet {
            &self.changes
        }

        fn messages(&self) -> &Messages {
            &self.messages
        }
    }

    fn toy(changes: &[&str], locked: bool) -> Toy {
        Toy {
            changes: changes.iter().copied().collect(),
            locked,
            messages: Messages::new(),
        }
    }

    #[test]
    fn validators_run_in_declaration_order() {
        let errors = evaluate(&toy(&[], false));
        let messages: Vec<&str> = errors.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["subject ran", "base ran", "due ran"]);
    }

    #[test]
    fn readonly_skips_only_own_validator() {
        let errors = evaluate(&toy(&["due_date"], true));
        assert_eq!(
            errors.symbols_for(Attribute::DueDate),
            vec![ErrorSymbol::ErrorReadonly]
        );
        assert_eq!(errors.messages_for(Attribute::Subject), vec!["subject ran"]);
        assert_eq!(errors.messages_for(ErrorKey::Base), vec!["base ran"]);
    }

    #[test]
    fn unchanged_readonly_attribute_still_validates() {
        let errors = evaluate(&toy(&[], true));
        assert_eq!(errors.messages_for(Attribute::DueDate), vec!["due ran"]);
    }

    #[test]
    fn unknown_changed_keys_are_readonly() {
        let errors = evaluate(&toy(&["author_id", "subject"], false));
        assert_eq!(
            errors.symbols_for("author_id"),
            vec![ErrorSymbol::ErrorReadonly]
        );
        assert_eq!(
            errors.symbols_for(Attribute::Subject),
            vec![ErrorSymbol::Inclusion]
        );
    }

    #[test]
    fn readonly_message_comes_from_catalog() {
        let errors = evaluate(&toy(&["due_date"], true));
        assert_eq!(
            errors.messages_for(Attribute::DueDate),
            vec!["was attempted to be written but is not writable."]
        );
    }
}
