//! Ambiguity detection and fallback synthesis.
//!
//! A bare `{{property}}` may name a helper, a component, or a property of
//! `this`. Once scope analysis leaves such a head unbound, the rewrites here
//! replace it with explicit runtime dispatch:
//!
//! - operand positions get the context-property path (`this.property`);
//! - statement positions get the component / helper / property branch;
//! - attribute values get the helper / property branch inside a lookup binding
//!   wrapped around their element.
//!
//! The synthesizers only accept [`AmbiguousPath`] and [`AmbiguousMustache`]
//! witnesses, which can only be obtained from the classifier.

use std::collections::BTreeSet;

use crate::ast::{
    BlockStatement, Expression, MustacheStatement, PathExpression, PathHead, Statement,
    SubExpression,
};
use crate::builders as b;
use crate::imports::{ImportBinder, IS_COMPONENT_MODULE, TRY_LOOKUP_HELPER_MODULE};
use crate::scope::ScopeOracle;
use crate::string::classify;

/// Preferred name of the block param exposing runtime helper lookups.
pub const MAYBE_HELPERS_BLOCK_PARAM: &str = "maybeHelpers";

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// A path expression whose head is a free identifier unbound in scope.
#[derive(Debug, Clone, Copy)]
pub struct AmbiguousPath<'a> {
    path: &'a PathExpression,
    head: &'a str,
}

impl<'a> AmbiguousPath<'a> {
    pub fn classify<S: ScopeOracle + ?Sized>(expr: &'a Expression, scope: &S) -> Option<Self> {
        match expr {
            Expression::Path(path) => Self::from_path(path, scope),
            _ => None,
        }
    }

    pub fn from_path<S: ScopeOracle + ?Sized>(path: &'a PathExpression, scope: &S) -> Option<Self> {
        match &path.head {
            PathHead::Var { name } if !scope.bound_in_scope(name) => Some(Self { path, head: name }),
            _ => None,
        }
    }

    pub fn head_name(&self) -> &'a str {
        self.head
    }

    pub fn path(&self) -> &'a PathExpression {
        self.path
    }
}

/// A mustache with no arguments whose callee is an [`AmbiguousPath`]; it reads
/// exactly like a property access.
#[derive(Debug, Clone, Copy)]
pub struct AmbiguousMustache<'a> {
    statement: &'a MustacheStatement,
    path: AmbiguousPath<'a>,
}

impl<'a> AmbiguousMustache<'a> {
    pub fn classify<S: ScopeOracle + ?Sized>(
        statement: &'a MustacheStatement,
        scope: &S,
    ) -> Option<Self> {
        if !statement.params.is_empty() || !statement.hash.is_empty() {
            return None;
        }
        AmbiguousPath::classify(&statement.path, scope).map(|path| Self { statement, path })
    }

    pub fn head_name(&self) -> &'a str {
        self.path.head_name()
    }

    pub fn path(&self) -> AmbiguousPath<'a> {
        self.path
    }

    pub fn statement(&self) -> &'a MustacheStatement {
        self.statement
    }

    /// `{{foo.bar}}` rather than `{{foo}}`.
    pub fn has_tail(&self) -> bool {
        !self.path.path.tail.is_empty()
    }
}

pub fn is_ambiguous_expression<S: ScopeOracle + ?Sized>(expr: &Expression, scope: &S) -> bool {
    AmbiguousPath::classify(expr, scope).is_some()
}

pub fn is_ambiguous_plain_invocation<S: ScopeOracle + ?Sized>(
    statement: &MustacheStatement,
    scope: &S,
) -> bool {
    AmbiguousMustache::classify(statement, scope).is_some()
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSION FALLBACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefixes the head with `this`:
///
/// ```hbs
/// {{! before }}
/// {{global-helper property.value}}
///
/// {{! after }}
/// {{global-helper this.property.value}}
/// ```
pub fn rewrite_as_context_property(ambiguous: AmbiguousPath<'_>) -> PathExpression {
    let path = ambiguous.path();
    let mut tail = Vec::with_capacity(path.tail.len() + 1);
    tail.push(ambiguous.head_name().to_string());
    tail.extend(path.tail.iter().cloned());
    b::path(PathHead::This, tail, path.loc)
}

/// [`rewrite_as_context_property`] when `expr` is ambiguous; otherwise `expr` itself.
pub fn maybe_rewrite<S: ScopeOracle + ?Sized>(expr: Expression, scope: &S) -> Expression {
    match AmbiguousPath::classify(&expr, scope).map(rewrite_as_context_property) {
        Some(rewritten) => Expression::Path(rewritten),
        None => expr,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP BINDING
// ═══════════════════════════════════════════════════════════════════════════════

/// Wraps `target` in a `{{let}}` that looks up every head as a helper once,
/// before the wrapped content renders:
///
/// ```hbs
/// {{#let (hash property=(tryLookupHelper "property")) as |maybeHelpers|}}
///   {{! target }}
/// {{/let}}
/// ```
///
/// The wrapper takes over `target`'s span.
pub fn build_lookup_binding<B: ImportBinder + ?Sized>(
    target: Statement,
    head_names: &BTreeSet<String>,
    block_param: &str,
    binder: &mut B,
) -> BlockStatement {
    let loc = target.loc();
    let try_lookup_helper =
        binder.bind_import(TRY_LOOKUP_HELPER_MODULE, "default", loc, "try-lookup-helper");

    let pairs = head_names
        .iter()
        .map(|head| {
            let lookup = b::sexpr(b::var(&try_lookup_helper), vec![b::string(head)], None);
            b::pair(head, Expression::SubExpression(lookup))
        })
        .collect();
    let lookups = b::sexpr(b::var("hash"), vec![], Some(b::hash(pairs)));

    b::block(
        b::var("let"),
        vec![Expression::SubExpression(lookups)],
        b::block_itself(vec![target], vec![block_param.to_string()]),
        None,
        loc,
    )
}

/// Calls the looked-up helper when there is one, else reads the property:
///
/// ```hbs
/// (if maybeHelpers.property (maybeHelpers.property) this.property)
/// ```
pub fn helper_or_property_fallback(
    block_param: &str,
    ambiguous: AmbiguousMustache<'_>,
) -> SubExpression {
    let maybe_helper = b::member(block_param, ambiguous.head_name());
    let invocation = b::sexpr(maybe_helper.clone(), vec![], None);

    b::sexpr(
        b::var("if"),
        vec![
            maybe_helper,
            Expression::SubExpression(invocation),
            Expression::Path(rewrite_as_context_property(ambiguous.path())),
        ],
        None,
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATEMENT FALLBACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolves an ambiguous statement at runtime: a component is rendered as a
/// tag, anything else goes through the helper lookup with a `this` fallback.
///
/// ```hbs
/// {{! before }}
/// {{property}}
///
/// {{! after }}
/// {{#if (isComponent "property")}}
///   <Property />
/// {{else}}
///   {{#let (hash property=(tryLookupHelper "property")) as |maybeHelpers|}}
///     {{(if maybeHelpers.property (maybeHelpers.property) this.property)}}
///   {{/let}}
/// {{/if}}
/// ```
pub fn rewrite_ambiguous_statement<B, S>(
    ambiguous: AmbiguousMustache<'_>,
    binder: &mut B,
    scope: &S,
) -> BlockStatement
where
    B: ImportBinder + ?Sized,
    S: ScopeOracle + ?Sized,
{
    let head_name = ambiguous.head_name();
    let statement = ambiguous.statement();
    let loc = statement.loc;

    let is_component = binder.bind_import(IS_COMPONENT_MODULE, "default", loc, "isComponent");
    let block_param = scope.fresh_name_like(MAYBE_HELPERS_BLOCK_PARAM);

    let mut maybe_helper_fallback = b::mustache(
        Expression::SubExpression(helper_or_property_fallback(&block_param, ambiguous)),
        vec![],
        loc,
    );
    maybe_helper_fallback.trusting = statement.trusting;

    let heads = BTreeSet::from([head_name.to_string()]);
    let try_lookup = build_lookup_binding(
        Statement::Mustache(maybe_helper_fallback),
        &heads,
        &block_param,
        binder,
    );

    let condition = b::sexpr(b::var(&is_component), vec![b::string(head_name)], None);
    let component = b::element(&classify(head_name), true);

    b::block(
        b::var("if"),
        vec![Expression::SubExpression(condition)],
        b::block_itself(vec![Statement::Element(component)], vec![]),
        Some(b::block_itself(vec![Statement::Block(try_lookup)], vec![])),
        loc,
    )
}
