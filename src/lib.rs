//! # this-fallback: runtime resolution for ambiguous template references
//!
//! ## Resolution Invariants
//!
//! 1. **Ambiguity**: A path is ambiguous when its head is a free identifier (not `this`,
//!    not `@arg`) that no enclosing block param, outer local, or keyword binds.
//!    - `{{item.name}}` inside `{{#each items as |item|}}` is bound.
//!    - `{{@title}}` and `{{this.title}}` are never ambiguous.
//!
//! 2. **Operand Position**: Ambiguous params and hash values are read from `this`.
//!    - `{{format-date createdAt}}` → `{{format-date this.createdAt}}`
//!
//! 3. **Statement Position**: A bare `{{name}}` becomes a runtime three-way branch:
//!    component (`<Name />`), helper (`(maybeHelpers.name)`), or `this.name`.
//!
//! 4. **Attribute Position**: `class={{name}}` becomes a helper-or-property lookup; the
//!    element is wrapped once in a `{{#let}}` holding every looked-up helper.
//!
//! 5. **Capture Avoidance**: Synthesized block params never shadow an enclosing binding,
//!    and runtime imports never take a name the template or its module binds.
//!
//! 6. **Callees Are Untouched**: `{{helper arg}}`, `(helper)`, `{{#block}}` and modifiers
//!    keep their callee; only their operands are rewritten.

mod ast;
pub mod builders;
mod diagnostics;
mod error;
mod fallback;
mod imports;
mod options;
mod printer;
mod scope;
mod string;
mod transform;
pub mod visitor;

#[cfg(test)]
mod fallback_tests;

pub use ast::*;
pub use builders::parse_path;
pub use diagnostics::{
    ambiguous_attr_fallback_warning, ambiguous_statement_fallback_warning, Diagnostic,
    DiagnosticKind, FALLBACK_DETAILS_MESSAGE,
};
pub use error::{FallbackError, Result};
pub use fallback::{
    build_lookup_binding, helper_or_property_fallback, is_ambiguous_expression,
    is_ambiguous_plain_invocation, maybe_rewrite, rewrite_ambiguous_statement,
    rewrite_as_context_property, AmbiguousMustache, AmbiguousPath, MAYBE_HELPERS_BLOCK_PARAM,
};
pub use imports::{
    ImportBinder, ImportDeclaration, ImportTable, IS_COMPONENT_MODULE, TRY_LOOKUP_HELPER_MODULE,
};
pub use options::FallbackOptions;
pub use printer::{print_expression, print_statement, print_template};
pub use scope::{ScopeOracle, ScopeStack, BUILTIN_HELPERS, TEMPLATE_KEYWORDS};
pub use string::{camelize, classify};
pub use transform::{
    transform_template, transform_template_json, transform_templates, ThisFallback,
    TransformOutput,
};
pub use visitor::TemplateVisitor;

#[cfg(feature = "napi")]
pub use transform::transform_template_native;
