#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::ast::{
    AttrValue, Block, BlockStatement, ConcatPart, ElementNode, Expression, MustacheStatement, Statement,
    Template,
};
use crate::builders as b;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::fallback::{
    build_lookup_binding, helper_or_property_fallback, rewrite_ambiguous_statement,
    rewrite_as_context_property, AmbiguousMustache, AmbiguousPath, MAYBE_HELPERS_BLOCK_PARAM,
};
use crate::imports::{ImportDeclaration, ImportTable};
use crate::options::FallbackOptions;
use crate::scope::{ScopeOracle, ScopeStack};
use crate::visitor::{
    walk_block_body, walk_expression, walk_mustache, walk_statement, walk_template, BlockParamCollector,
    TemplateVisitor, VarHeadCollector,
};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub template: Template,
    /// Runtime imports the rewritten template references, in first-use order.
    pub imports: Vec<ImportDeclaration>,
    pub diagnostics: Vec<Diagnostic>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAVERSAL
// ═══════════════════════════════════════════════════════════════════════════════

/// Walks one template, keeping the scope stack in step with block params and
/// splicing fallback rewrites in visiting order.
pub struct ThisFallback<'o> {
    options: &'o FallbackOptions,
    scope: ScopeStack,
    imports: ImportTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> ThisFallback<'o> {
    pub fn new(options: &'o FallbackOptions) -> Self {
        let mut imports = ImportTable::new();
        imports.reserve(options.locals.iter().cloned());
        imports.reserve(options.reserved_names.iter().cloned());

        Self {
            options,
            scope: ScopeStack::with_locals(options.locals.iter().cloned()),
            imports,
            diagnostics: Vec::new(),
        }
    }

    /// Keeps runtime imports clear of names the template itself binds.
    pub fn reserve_names<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.imports.reserve(names);
    }

    pub fn finish(self, template: Template) -> TransformOutput {
        TransformOutput {
            template,
            imports: self.imports.into_declarations(),
            diagnostics: self.diagnostics,
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.options.emit_warnings {
            warn!(
                kind = ?diagnostic.kind,
                head = %diagnostic.head,
                "{}",
                diagnostic.render(&self.options.module_name)
            );
        }
        self.diagnostics.push(diagnostic);
    }

    fn rewrite_mustache_statement(
        &mut self,
        mustache: &MustacheStatement,
    ) -> Option<BlockStatement> {
        let ambiguous = AmbiguousMustache::classify(mustache, &self.scope)?;
        // a dotted path is always a property read
        if ambiguous.has_tail() {
            return None;
        }

        debug!(
            head = ambiguous.head_name(),
            line = mustache.loc.start.line,
            "statement fallback"
        );
        let block = rewrite_ambiguous_statement(ambiguous, &mut self.imports, &self.scope);
        self.report(Diagnostic::ambiguous_statement(
            ambiguous.head_name(),
            mustache.loc,
        ));
        Some(block)
    }

    /// Replaces ambiguous attribute values with helper-or-property lookups
    /// through `block_param`, returning the heads that need a lookup binding.
    fn rewrite_ambiguous_attributes(
        &mut self,
        element: &mut ElementNode,
        block_param: &str,
    ) -> BTreeSet<String> {
        let mut heads = BTreeSet::new();

        for attr in &mut element.attributes {
            let loc = attr.loc;
            let mut rewritten = Vec::new();
            match &mut attr.value {
                AttrValue::Text(_) => {}
                AttrValue::Mustache(mustache) => {
                    rewritten.extend(rewrite_attribute_mustache(mustache, block_param, &self.scope));
                }
                AttrValue::Concat(concat) => {
                    for part in &mut concat.parts {
                        if let ConcatPart::Mustache(mustache) = part {
                            rewritten.extend(rewrite_attribute_mustache(
                                mustache,
                                block_param,
                                &self.scope,
                            ));
                        }
                    }
                }
            }

            for head in rewritten {
                debug!(head = %head, attribute = %attr.name, "attribute fallback");
                self.report(Diagnostic::ambiguous_attribute(&head, loc));
                heads.insert(head);
            }
        }

        heads
    }

    /// Wraps an element whose attributes needed a fallback in the lookup
    /// binding. The element is fully visited here with the binding in scope.
    fn rewrite_element(&mut self, element: &mut ElementNode) -> Option<BlockStatement> {
        let block_param = self.wrapper_param_for(element);
        let heads = self.rewrite_ambiguous_attributes(element, &block_param);
        if heads.is_empty() {
            return None;
        }

        self.scope.push(std::slice::from_ref(&block_param));
        self.visit_element(element);
        self.scope.pop();

        let wrapped = Statement::Element(std::mem::replace(element, b::element("", false)));
        Some(build_lookup_binding(
            wrapped,
            &heads,
            &block_param,
            &mut self.imports,
        ))
    }

    /// A block param for the lookup binding that neither shadows an enclosing
    /// binding nor captures a free name used anywhere inside `element`.
    fn wrapper_param_for(&mut self, element: &mut ElementNode) -> String {
        let mut referenced = VarHeadCollector::default();
        referenced.visit_element(element);

        let free: Vec<String> = referenced.names.into_iter().collect();
        self.scope.push(&free);
        let block_param = self.scope.fresh_name_like(MAYBE_HELPERS_BLOCK_PARAM);
        self.scope.pop();
        block_param
    }

    fn rewrite_statement(&mut self, statement: &mut Statement) -> Option<Statement> {
        match statement {
            Statement::Mustache(mustache) => {
                self.rewrite_mustache_statement(mustache).map(Statement::Block)
            }
            Statement::Element(element) => self.rewrite_element(element).map(Statement::Block),
            _ => None,
        }
    }
}

fn rewrite_attribute_mustache<S: ScopeOracle + ?Sized>(
    mustache: &mut MustacheStatement,
    block_param: &str,
    scope: &S,
) -> Option<String> {
    let (head, fallback) = {
        let ambiguous = AmbiguousMustache::classify(mustache, scope)?;
        if ambiguous.has_tail() {
            return None;
        }
        (
            ambiguous.head_name().to_string(),
            helper_or_property_fallback(block_param, ambiguous),
        )
    };

    let trusting = mustache.trusting;
    *mustache = b::mustache(Expression::SubExpression(fallback), vec![], mustache.loc);
    mustache.trusting = trusting;
    Some(head)
}

impl TemplateVisitor for ThisFallback<'_> {
    fn visit_template(&mut self, template: &mut Template) {
        self.scope.push(&template.block_params);
        walk_template(self, template);
        self.scope.pop();
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        match self.rewrite_statement(statement) {
            Some(replacement) => *statement = replacement,
            None => walk_statement(self, statement),
        }
    }

    fn visit_block_body(&mut self, body: &mut Block) {
        self.scope.push(&body.block_params);
        walk_block_body(self, body);
        self.scope.pop();
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        for attr in &mut element.attributes {
            self.visit_attribute(attr);
        }
        for modifier in &mut element.modifiers {
            self.visit_modifier(modifier);
        }

        self.scope.push(&element.block_params);
        self.visit_statements(&mut element.children);
        self.scope.pop();
    }

    fn visit_mustache(&mut self, mustache: &mut MustacheStatement) {
        let property = AmbiguousMustache::classify(mustache, &self.scope)
            .filter(AmbiguousMustache::has_tail)
            .map(|ambiguous| rewrite_as_context_property(ambiguous.path()));

        match property {
            Some(path) => {
                debug!(path = %path.original(), "property fallback");
                mustache.path = Expression::Path(path);
            }
            None => walk_mustache(self, mustache),
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        match AmbiguousPath::classify(expr, &self.scope).map(rewrite_as_context_property) {
            Some(path) => {
                debug!(path = %path.original(), "expression fallback");
                *expr = Expression::Path(path);
            }
            None => walk_expression(self, expr),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn transform_template(
    mut template: Template,
    options: &FallbackOptions,
) -> Result<TransformOutput> {
    options.validate()?;

    let mut block_params = BlockParamCollector::default();
    block_params.visit_template(&mut template);

    let mut fallback = ThisFallback::new(options);
    fallback.reserve_names(block_params.names);
    fallback.visit_template(&mut template);

    let output = fallback.finish(template);
    debug!(
        module = %options.module_name,
        fallbacks = output.diagnostics.len(),
        imports = output.imports.len(),
        "transform finished"
    );
    Ok(output)
}

pub fn transform_template_json(ast_json: &str, options_json: Option<&str>) -> Result<String> {
    let template: Template = serde_json::from_str(ast_json)?;
    let options = match options_json {
        Some(json) => FallbackOptions::from_json(json)?,
        None => FallbackOptions::default(),
    };

    let output = transform_template(template, &options)?;
    Ok(serde_json::to_string(&output)?)
}

/// Transforms independent templates in parallel; each gets its own scope and
/// import table.
pub fn transform_templates(
    templates: Vec<Template>,
    options: &FallbackOptions,
) -> Vec<Result<TransformOutput>> {
    templates
        .into_par_iter()
        .map(|template| transform_template(template, options))
        .collect()
}

#[cfg(feature = "napi")]
#[napi]
pub fn transform_template_native(
    ast_json: String,
    options_json: Option<String>,
) -> napi::Result<String> {
    transform_template_json(&ast_json, options_json.as_deref())
        .map_err(|e| napi::Error::from_reason(format!("Transform error: {}", e)))
}
