use crate::ast::{
    AttrNode, AttrValue, Block, BlockStatement, ConcatPart, ElementModifierStatement, ElementNode,
    Expression, Hash, MustacheStatement, Statement, SubExpression, Template,
};
use std::collections::HashSet;

/// The TemplateVisitor trait defines the single authoritative traversal mechanism for template trees.
///
/// Rules:
/// 1. Traversal is in document order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
/// 4. Callees (`{{callee …}}`, `(callee …)`, `{{#callee}}`) go through `visit_callee`, never
///    `visit_expression`, so operand-only rewrites cannot touch them.
pub trait TemplateVisitor {
    fn visit_template(&mut self, template: &mut Template) {
        walk_template(self, template);
    }

    fn visit_statements(&mut self, statements: &mut Vec<Statement>) {
        walk_statements(self, statements);
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
    }

    fn visit_mustache(&mut self, mustache: &mut MustacheStatement) {
        walk_mustache(self, mustache);
    }

    fn visit_block(&mut self, block: &mut BlockStatement) {
        walk_block(self, block);
    }

    fn visit_block_body(&mut self, body: &mut Block) {
        walk_block_body(self, body);
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        walk_element(self, element);
    }

    fn visit_attribute(&mut self, attr: &mut AttrNode) {
        walk_attribute(self, attr);
    }

    fn visit_modifier(&mut self, modifier: &mut ElementModifierStatement) {
        walk_modifier(self, modifier);
    }

    fn visit_callee(&mut self, callee: &mut Expression) {
        walk_callee(self, callee);
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        walk_expression(self, expr);
    }

    fn visit_sub_expression(&mut self, sexpr: &mut SubExpression) {
        walk_sub_expression(self, sexpr);
    }

    fn visit_hash(&mut self, hash: &mut Hash) {
        walk_hash(self, hash);
    }
}

pub fn walk_template<V: TemplateVisitor + ?Sized>(visitor: &mut V, template: &mut Template) {
    visitor.visit_statements(&mut template.body);
}

pub fn walk_statements<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    statements: &mut Vec<Statement>,
) {
    for statement in statements {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: TemplateVisitor + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Mustache(m) => visitor.visit_mustache(m),
        Statement::Block(b) => visitor.visit_block(b),
        Statement::Element(e) => visitor.visit_element(e),
        // Text and comments are leaves
        Statement::Text(_) | Statement::MustacheComment(_) | Statement::Comment(_) => {}
    }
}

fn walk_operands<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    params: &mut [Expression],
    hash: &mut Hash,
) {
    for param in params {
        visitor.visit_expression(param);
    }
    visitor.visit_hash(hash);
}

pub fn walk_mustache<V: TemplateVisitor + ?Sized>(visitor: &mut V, mustache: &mut MustacheStatement) {
    visitor.visit_callee(&mut mustache.path);
    walk_operands(visitor, &mut mustache.params, &mut mustache.hash);
}

pub fn walk_block<V: TemplateVisitor + ?Sized>(visitor: &mut V, block: &mut BlockStatement) {
    visitor.visit_callee(&mut block.path);
    walk_operands(visitor, &mut block.params, &mut block.hash);
    visitor.visit_block_body(&mut block.program);
    if let Some(inverse) = &mut block.inverse {
        visitor.visit_block_body(inverse);
    }
}

pub fn walk_block_body<V: TemplateVisitor + ?Sized>(visitor: &mut V, body: &mut Block) {
    visitor.visit_statements(&mut body.body);
}

pub fn walk_element<V: TemplateVisitor + ?Sized>(visitor: &mut V, element: &mut ElementNode) {
    for attr in &mut element.attributes {
        visitor.visit_attribute(attr);
    }
    for modifier in &mut element.modifiers {
        visitor.visit_modifier(modifier);
    }
    visitor.visit_statements(&mut element.children);
}

pub fn walk_attribute<V: TemplateVisitor + ?Sized>(visitor: &mut V, attr: &mut AttrNode) {
    match &mut attr.value {
        AttrValue::Text(_) => {}
        AttrValue::Mustache(m) => visitor.visit_mustache(m),
        AttrValue::Concat(concat) => {
            for part in &mut concat.parts {
                if let ConcatPart::Mustache(m) = part {
                    visitor.visit_mustache(m);
                }
            }
        }
    }
}

pub fn walk_modifier<V: TemplateVisitor + ?Sized>(
    visitor: &mut V,
    modifier: &mut ElementModifierStatement,
) {
    visitor.visit_callee(&mut modifier.path);
    walk_operands(visitor, &mut modifier.params, &mut modifier.hash);
}

/// Only a sub-expression callee has anything to walk.
pub fn walk_callee<V: TemplateVisitor + ?Sized>(visitor: &mut V, callee: &mut Expression) {
    if let Expression::SubExpression(sexpr) = callee {
        visitor.visit_sub_expression(sexpr);
    }
}

pub fn walk_expression<V: TemplateVisitor + ?Sized>(visitor: &mut V, expr: &mut Expression) {
    if let Expression::SubExpression(sexpr) = expr {
        visitor.visit_sub_expression(sexpr);
    }
}

pub fn walk_sub_expression<V: TemplateVisitor + ?Sized>(visitor: &mut V, sexpr: &mut SubExpression) {
    visitor.visit_callee(&mut sexpr.path);
    walk_operands(visitor, &mut sexpr.params, &mut sexpr.hash);
}

pub fn walk_hash<V: TemplateVisitor + ?Sized>(visitor: &mut V, hash: &mut Hash) {
    for pair in &mut hash.pairs {
        visitor.visit_expression(&mut pair.value);
    }
}

/// Collects every block param declared anywhere in a template.
#[derive(Debug, Default)]
pub struct BlockParamCollector {
    pub names: Vec<String>,
}

impl TemplateVisitor for BlockParamCollector {
    fn visit_template(&mut self, template: &mut Template) {
        self.names.extend(template.block_params.iter().cloned());
        walk_template(self, template);
    }

    fn visit_block_body(&mut self, body: &mut Block) {
        self.names.extend(body.block_params.iter().cloned());
        walk_block_body(self, body);
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        self.names.extend(element.block_params.iter().cloned());
        walk_element(self, element);
    }
}

/// Collects the free-identifier heads referenced under a node, callees included.
#[derive(Debug, Default)]
pub struct VarHeadCollector {
    pub names: HashSet<String>,
}

impl VarHeadCollector {
    fn collect(&mut self, expr: &Expression) {
        if let Some(name) = expr.as_path().and_then(|path| path.head.var_name()) {
            self.names.insert(name.to_string());
        }
    }
}

impl TemplateVisitor for VarHeadCollector {
    fn visit_callee(&mut self, callee: &mut Expression) {
        self.collect(callee);
        walk_callee(self, callee);
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        self.collect(expr);
        walk_expression(self, expr);
    }
}
