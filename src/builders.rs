//! Node constructors for synthesized template fragments.
//!
//! Every builder either takes a span or defaults to [`SourceSpan::synthetic`],
//! so nodes handed back to the traversal always carry location metadata.

use crate::ast::{
    Block, BlockStatement, ElementNode, Expression, Hash, HashPair, MustacheStatement,
    PathExpression, PathHead, SourceSpan, Statement, StringLiteral, SubExpression,
};
use crate::error::{FallbackError, Result};

pub fn path(head: PathHead, tail: Vec<String>, loc: SourceSpan) -> PathExpression {
    PathExpression { head, tail, loc }
}

/// Parses a dotted path like `this.foo.bar`, `@arg` or `maybeHelpers.foo`.
pub fn parse_path(original: &str, loc: SourceSpan) -> Result<PathExpression> {
    let mut segments = original.split('.');
    let head = match segments.next() {
        Some("this") => PathHead::This,
        Some(first) if first.starts_with('@') && first.len() > 1 => PathHead::Arg {
            name: first[1..].to_string(),
        },
        Some(first) if !first.is_empty() && !first.starts_with('@') => PathHead::var(first),
        _ => return Err(FallbackError::InvalidPath(original.to_string())),
    };

    let mut tail = Vec::new();
    for segment in segments {
        if segment.is_empty() {
            return Err(FallbackError::InvalidPath(original.to_string()));
        }
        tail.push(segment.to_string());
    }

    Ok(path(head, tail, loc))
}

/// A free-identifier path with no tail, e.g. the callee `if` or `hash`.
pub fn var(name: &str) -> Expression {
    Expression::Path(path(PathHead::var(name), vec![], SourceSpan::synthetic()))
}

/// `name.member`, used for block-param lookups like `maybeHelpers.foo`.
pub fn member(name: &str, member: &str) -> Expression {
    Expression::Path(path(
        PathHead::var(name),
        vec![member.to_string()],
        SourceSpan::synthetic(),
    ))
}

pub fn string(value: &str) -> Expression {
    Expression::String(StringLiteral {
        value: value.to_string(),
        loc: SourceSpan::synthetic(),
    })
}

pub fn pair(key: &str, value: Expression) -> HashPair {
    HashPair {
        key: key.to_string(),
        value,
        loc: SourceSpan::synthetic(),
    }
}

pub fn hash(pairs: Vec<HashPair>) -> Hash {
    Hash {
        pairs,
        loc: SourceSpan::synthetic(),
    }
}

pub fn sexpr(callee: Expression, params: Vec<Expression>, hash: Option<Hash>) -> SubExpression {
    SubExpression {
        path: Box::new(callee),
        params,
        hash: hash.unwrap_or_default(),
        loc: SourceSpan::synthetic(),
    }
}

pub fn mustache(callee: Expression, params: Vec<Expression>, loc: SourceSpan) -> MustacheStatement {
    MustacheStatement {
        path: callee,
        params,
        hash: Hash::default(),
        trusting: false,
        loc,
    }
}

pub fn block(
    callee: Expression,
    params: Vec<Expression>,
    program: Block,
    inverse: Option<Block>,
    loc: SourceSpan,
) -> BlockStatement {
    BlockStatement {
        path: callee,
        params,
        hash: Hash::default(),
        program,
        inverse,
        loc,
    }
}

/// The body of a block with its own block params, e.g. `as |maybeHelpers|`.
pub fn block_itself(body: Vec<Statement>, block_params: Vec<String>) -> Block {
    Block {
        body,
        block_params,
        loc: SourceSpan::synthetic(),
    }
}

pub fn element(tag: &str, self_closing: bool) -> ElementNode {
    ElementNode {
        tag: tag.to_string(),
        self_closing,
        attributes: vec![],
        modifiers: vec![],
        children: vec![],
        block_params: vec![],
        loc: SourceSpan::synthetic(),
    }
}
