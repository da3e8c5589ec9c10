//! Prints a template tree back to Handlebars source.
//!
//! Output is compact: no whitespace is introduced beyond what the tree's text
//! nodes carry, so rewritten fragments print on a single line.

use crate::ast::{
    AttrNode, AttrValue, Block, BlockStatement, ConcatPart, ElementModifierStatement, ElementNode,
    Expression, Hash, MustacheStatement, Statement, SubExpression, Template,
};

pub fn print_template(template: &Template) -> String {
    print_statements(&template.body)
}

pub fn print_statements(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        write_statement(&mut out, statement);
    }
    out
}

pub fn print_statement(statement: &Statement) -> String {
    let mut out = String::new();
    write_statement(&mut out, statement);
    out
}

pub fn print_expression(expr: &Expression) -> String {
    match expr {
        Expression::Path(path) => path.original(),
        Expression::SubExpression(sexpr) => print_sub_expression(sexpr),
        Expression::String(s) => format!("\"{}\"", s.value.replace('"', "\\\"")),
        Expression::Boolean(b) => b.value.to_string(),
        Expression::Number(n) => {
            if n.value.fract() == 0.0 && n.value.abs() < 1e15 {
                format!("{}", n.value as i64)
            } else {
                n.value.to_string()
            }
        }
        Expression::Null(_) => "null".to_string(),
        Expression::Undefined(_) => "undefined".to_string(),
    }
}

fn print_sub_expression(sexpr: &SubExpression) -> String {
    format!("({})", call_body(&sexpr.path, &sexpr.params, &sexpr.hash))
}

fn call_body(callee: &Expression, params: &[Expression], hash: &Hash) -> String {
    let mut parts = vec![print_expression(callee)];
    parts.extend(params.iter().map(print_expression));
    parts.extend(
        hash.pairs
            .iter()
            .map(|pair| format!("{}={}", pair.key, print_expression(&pair.value))),
    );
    parts.join(" ")
}

fn print_mustache(mustache: &MustacheStatement) -> String {
    let body = call_body(&mustache.path, &mustache.params, &mustache.hash);
    if mustache.trusting {
        format!("{{{{{{{}}}}}}}", body)
    } else {
        format!("{{{{{}}}}}", body)
    }
}

fn write_block_params(out: &mut String, block_params: &[String]) {
    if !block_params.is_empty() {
        out.push_str(&format!(" as |{}|", block_params.join(" ")));
    }
}

fn write_block(out: &mut String, block: &BlockStatement) {
    out.push_str("{{#");
    out.push_str(&call_body(&block.path, &block.params, &block.hash));
    write_block_params(out, &block.program.block_params);
    out.push_str("}}");
    write_body(out, &block.program);
    if let Some(inverse) = &block.inverse {
        out.push_str("{{else}}");
        write_body(out, inverse);
    }
    out.push_str("{{/");
    out.push_str(&print_expression(&block.path));
    out.push_str("}}");
}

fn write_body(out: &mut String, block: &Block) {
    for statement in &block.body {
        write_statement(out, statement);
    }
}

fn print_attribute(attr: &AttrNode) -> String {
    match &attr.value {
        AttrValue::Text(text) => format!("{}=\"{}\"", attr.name, text.chars),
        AttrValue::Mustache(mustache) => format!("{}={}", attr.name, print_mustache(mustache)),
        AttrValue::Concat(concat) => {
            let mut value = String::new();
            for part in &concat.parts {
                match part {
                    ConcatPart::Text(text) => value.push_str(&text.chars),
                    ConcatPart::Mustache(mustache) => value.push_str(&print_mustache(mustache)),
                }
            }
            format!("{}=\"{}\"", attr.name, value)
        }
    }
}

fn print_modifier(modifier: &ElementModifierStatement) -> String {
    format!(
        "{{{{{}}}}}",
        call_body(&modifier.path, &modifier.params, &modifier.hash)
    )
}

fn write_element(out: &mut String, element: &ElementNode) {
    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&print_attribute(attr));
    }
    for modifier in &element.modifiers {
        out.push(' ');
        out.push_str(&print_modifier(modifier));
    }
    write_block_params(out, &element.block_params);

    if element.self_closing {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_statement(out, child);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn write_statement(out: &mut String, statement: &Statement) {
    match statement {
        Statement::Mustache(mustache) => out.push_str(&print_mustache(mustache)),
        Statement::Block(block) => write_block(out, block),
        Statement::Element(element) => write_element(out, element),
        Statement::Text(text) => out.push_str(&text.chars),
        Statement::MustacheComment(comment) => {
            out.push_str(&format!("{{{{!--{}--}}}}", comment.value))
        }
        Statement::Comment(comment) => out.push_str(&format!("<!--{}-->", comment.value)),
    }
}
