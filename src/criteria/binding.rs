//! Restriction expressions selecting which objects qualify for a result.
//!
//! [`Binding`] is a closed sum type: every kind of restriction the compiler
//! understands is one variant, so rendering is an exhaustive `match`.
//! Logical and text-match bindings validate their arity when constructed
//! through [`LogicalBinding::new`] / [`TextMatchBinding::new`]. Text-match
//! documents decode through the constructor; logical documents do not, so the
//! compiler checks arity again.

use serde::{Deserialize, Serialize};

use crate::criteria::Relation;
use crate::error::{OqlError, Result};
use crate::types::Value;

/// A restriction over properties of the target entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// `property <relation> value`.
    Relational(RelationalBinding),
    /// Set membership.
    In(InBinding),
    /// Pattern match.
    Like(LikeBinding),
    /// Multi-word `%word%` match.
    TextMatch(TextMatchBinding),
    /// Defined / undefined check.
    Null(NullBinding),
    /// Conjunction of two or more bindings.
    And(LogicalBinding),
    /// Disjunction of two or more bindings.
    Or(LogicalBinding),
    /// Negation of one binding.
    Not(NotBinding),
}

impl Binding {
    /// `property = value`.
    pub fn equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::relational(property, Relation::Equal, value)
    }

    /// `property <relation> value`.
    pub fn relational(
        property: impl Into<String>,
        relation: Relation,
        value: impl Into<Value>,
    ) -> Self {
        Binding::Relational(RelationalBinding::new(property, relation, value))
    }

    /// `property IN LIST(values)`; nulls inside `values` select undefined properties.
    pub fn is_in<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Binding::In(InBinding::new(property, values))
    }

    /// `property LIKE pattern`.
    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Binding::Like(LikeBinding::new(property, pattern))
    }

    /// `property` is undefined.
    pub fn is_null(property: impl Into<String>) -> Self {
        Binding::Null(NullBinding::new(property, false))
    }

    /// `property` is defined.
    pub fn is_not_null(property: impl Into<String>) -> Self {
        Binding::Null(NullBinding::new(property, true))
    }

    /// Multi-word text match.
    ///
    /// # Errors
    ///
    /// Returns an error if `words` is empty.
    pub fn text_match<I, S>(property: impl Into<String>, words: I, match_all: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextMatchBinding::new(property, words, match_all).map(Binding::TextMatch)
    }

    /// Conjunction of `elements`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two elements are given.
    pub fn and(elements: Vec<Binding>) -> Result<Self> {
        LogicalBinding::new(elements).map(Binding::And)
    }

    /// Disjunction of `elements`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two elements are given.
    pub fn or(elements: Vec<Binding>) -> Result<Self> {
        LogicalBinding::new(elements).map(Binding::Or)
    }

    /// Negation of `binding`.
    #[must_use]
    pub fn negate(binding: Binding) -> Self {
        Binding::Not(NotBinding::new(binding))
    }

    /// Returns the property a leaf binding restricts, `None` for composites.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            Binding::Relational(b) => Some(&b.property),
            Binding::In(b) => Some(&b.property),
            Binding::Like(b) => Some(&b.property),
            Binding::TextMatch(b) => Some(&b.property),
            Binding::Null(b) => Some(&b.property),
            Binding::And(_) | Binding::Or(_) | Binding::Not(_) => None,
        }
    }

    /// Calls `f` with every property restricted anywhere in this tree, in
    /// rendering order.
    pub fn for_each_property<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            Binding::And(logical) | Binding::Or(logical) => {
                for element in logical.elements() {
                    element.for_each_property(f);
                }
            }
            Binding::Not(not) => not.binding().for_each_property(f),
            leaf => {
                if let Some(property) = leaf.property() {
                    f(property);
                }
            }
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Relational(_) => "relational",
            Binding::In(_) => "in",
            Binding::Like(_) => "like",
            Binding::TextMatch(_) => "text_match",
            Binding::Null(_) => "null",
            Binding::And(_) => "and",
            Binding::Or(_) => "or",
            Binding::Not(_) => "not",
        }
    }
}

/// `property <relation> value`. A null value collapses to a null check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationalBinding {
    pub property: String,
    #[serde(default)]
    pub relation: Relation,
    pub value: Value,
}

impl RelationalBinding {
    /// Creates a relational binding.
    pub fn new(property: impl Into<String>, relation: Relation, value: impl Into<Value>) -> Self {
        RelationalBinding {
            property: property.into(),
            relation,
            value: value.into(),
        }
    }
}

/// Set membership over literal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InBinding {
    pub property: String,
    #[serde(default)]
    pub values: Vec<Value>,
    /// Also match undefined properties even if `values` holds no null.
    #[serde(default)]
    pub null_contained: bool,
}

impl InBinding {
    /// Creates a membership binding.
    pub fn new<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        InBinding {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
            null_contained: false,
        }
    }

    /// Sets the null-contained flag.
    #[must_use]
    pub fn with_null_contained(mut self, null_contained: bool) -> Self {
        self.null_contained = null_contained;
        self
    }

    /// Returns true if the rendered list ends with the `nil` term.
    #[must_use]
    pub fn matches_null(&self) -> bool {
        self.null_contained || self.values.iter().any(Value::is_null)
    }
}

/// `property LIKE pattern`; wildcard syntax is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeBinding {
    pub property: String,
    pub pattern: String,
}

impl LikeBinding {
    /// Creates a pattern binding.
    pub fn new(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        LikeBinding {
            property: property.into(),
            pattern: pattern.into(),
        }
    }
}

/// Matches `%word%` for each word, combined with AND (`match_all`) or OR.
///
/// Decoding goes through [`TextMatchBinding::new`], so documents get the same
/// deduplication and non-empty check as code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TextMatchDocument")]
pub struct TextMatchBinding {
    pub property: String,
    text: Vec<String>,
    pub match_all: bool,
}

/// Wire form of [`TextMatchBinding`] before validation.
#[derive(Deserialize)]
struct TextMatchDocument {
    property: String,
    #[serde(default)]
    text: Vec<String>,
    #[serde(default)]
    match_all: bool,
}

impl TryFrom<TextMatchDocument> for TextMatchBinding {
    type Error = OqlError;

    fn try_from(document: TextMatchDocument) -> Result<Self> {
        TextMatchBinding::new(document.property, document.text, document.match_all)
    }
}

impl TextMatchBinding {
    /// Creates a text-match binding. Duplicate words are kept once, in first
    /// occurrence order.
    ///
    /// # Errors
    ///
    /// Returns an error if `words` is empty.
    pub fn new<I, S>(property: impl Into<String>, words: I, match_all: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let property = property.into();
        let mut binding = TextMatchBinding {
            property,
            text: Vec::new(),
            match_all,
        };
        for word in words {
            binding.add_word(word);
        }
        if binding.text.is_empty() {
            return Err(OqlError::InvalidBinding(format!(
                "text match on '{}' needs at least one word",
                binding.property
            )));
        }
        Ok(binding)
    }

    /// Adds a word unless it is already present.
    pub fn add_word(&mut self, word: impl Into<String>) {
        let word = word.into();
        if !self.text.contains(&word) {
            self.text.push(word);
        }
    }

    /// Returns the words in insertion order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.text
    }
}

/// Defined / undefined check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NullBinding {
    pub property: String,
    /// `false` selects undefined properties, `true` defined ones.
    #[serde(default)]
    pub not_null: bool,
}

impl NullBinding {
    /// Creates a null check.
    pub fn new(property: impl Into<String>, not_null: bool) -> Self {
        NullBinding {
            property: property.into(),
            not_null,
        }
    }
}

/// Ordered operands of an AND / OR binding. Holds at least two elements when
/// built through [`LogicalBinding::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalBinding {
    elements: Vec<Binding>,
}

impl LogicalBinding {
    /// Minimum number of operands.
    pub const MIN_ELEMENTS: usize = 2;

    /// Creates a logical binding.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two elements are given.
    pub fn new(elements: Vec<Binding>) -> Result<Self> {
        if elements.len() < Self::MIN_ELEMENTS {
            return Err(OqlError::InvalidBinding(format!(
                "logical binding needs at least {} elements, got {}",
                Self::MIN_ELEMENTS,
                elements.len()
            )));
        }
        Ok(LogicalBinding { elements })
    }

    /// Appends an operand.
    pub fn push(&mut self, binding: Binding) {
        self.elements.push(binding);
    }

    /// Returns the operands in order.
    #[must_use]
    pub fn elements(&self) -> &[Binding] {
        &self.elements
    }
}

/// Negation of exactly one binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotBinding {
    binding: Box<Binding>,
}

impl NotBinding {
    /// Wraps `binding`.
    #[must_use]
    pub fn new(binding: Binding) -> Self {
        NotBinding {
            binding: Box::new(binding),
        }
    }

    /// Returns the negated binding.
    #[must_use]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }
}
