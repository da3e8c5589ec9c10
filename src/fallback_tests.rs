#[cfg(test)]
mod tests {
    use crate::ast::{
        Expression, MustacheStatement, PathHead, SourceSpan, Statement, StringLiteral,
    };
    use crate::builders::{self as b, parse_path};
    use crate::fallback::*;
    use crate::imports::{ImportBinder, ImportTable, IS_COMPONENT_MODULE, TRY_LOOKUP_HELPER_MODULE};
    use crate::printer::{print_expression, print_statement};
    use crate::scope::{ScopeOracle, ScopeStack};
    use indoc::indoc;
    use std::collections::BTreeSet;

    fn mock_loc() -> SourceSpan {
        SourceSpan::from_coords(2, 4, 2, 16)
    }

    fn path(original: &str) -> Expression {
        Expression::Path(parse_path(original, mock_loc()).unwrap())
    }

    fn mustache(callee: &str, params: Vec<Expression>) -> MustacheStatement {
        b::mustache(path(callee), params, mock_loc())
    }

    /// Joins an indented multi-line template into the compact printer form.
    fn squash(template: &str) -> String {
        template.lines().map(str::trim).collect()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CLASSIFIER
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_free_identifier_is_ambiguous_only_when_unbound() {
        let mut scope = ScopeStack::new();
        let expr = path("property.value");
        assert!(is_ambiguous_expression(&expr, &scope));

        scope.push(&["property".to_string()]);
        assert!(!is_ambiguous_expression(&expr, &scope));

        scope.pop();
        assert!(is_ambiguous_expression(&expr, &scope));
    }

    #[test]
    fn test_this_args_and_literals_are_never_ambiguous() {
        let scope = ScopeStack::new();
        assert!(!is_ambiguous_expression(&path("this.property"), &scope));
        assert!(!is_ambiguous_expression(&path("@property"), &scope));
        assert!(!is_ambiguous_expression(&b::string("property"), &scope));

        let sexpr = Expression::SubExpression(b::sexpr(path("property"), vec![], None));
        assert!(!is_ambiguous_expression(&sexpr, &scope));
    }

    #[test]
    fn test_keywords_are_not_ambiguous() {
        let scope = ScopeStack::new();
        assert!(!is_ambiguous_plain_invocation(&mustache("yield", vec![]), &scope));
        assert!(!is_ambiguous_plain_invocation(&mustache("outlet", vec![]), &scope));
    }

    #[test]
    fn test_invocation_with_arguments_is_never_plain() {
        let scope = ScopeStack::new();

        let positional = mustache("helper", vec![path("arg")]);
        assert!(!is_ambiguous_plain_invocation(&positional, &scope));
        assert!(AmbiguousMustache::classify(&positional, &scope).is_none());

        let mut named = mustache("helper", vec![]);
        named.hash = b::hash(vec![b::pair("key", b::string("value"))]);
        assert!(!is_ambiguous_plain_invocation(&named, &scope));

        assert!(is_ambiguous_plain_invocation(&mustache("helper", vec![]), &scope));
    }

    #[test]
    fn test_mustache_witness_exposes_head_and_tail() {
        let scope = ScopeStack::new();
        let plain = mustache("property", vec![]);
        let ambiguous = AmbiguousMustache::classify(&plain, &scope).unwrap();
        assert_eq!(ambiguous.head_name(), "property");
        assert!(!ambiguous.has_tail());

        let dotted = mustache("property.value", vec![]);
        let ambiguous = AmbiguousMustache::classify(&dotted, &scope).unwrap();
        assert_eq!(ambiguous.head_name(), "property");
        assert!(ambiguous.has_tail());
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // EXPRESSION FALLBACK
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_context_property_keeps_tail_and_location() {
        let scope = ScopeStack::new();

        let dotted = path("x.y.z");
        let ambiguous = AmbiguousPath::classify(&dotted, &scope).unwrap();
        let rewritten = rewrite_as_context_property(ambiguous);
        assert_eq!(rewritten.original(), "this.x.y.z");
        assert_eq!(rewritten.head, PathHead::This);
        assert_eq!(rewritten.loc, mock_loc());

        let bare = path("x");
        let rewritten = rewrite_as_context_property(AmbiguousPath::classify(&bare, &scope).unwrap());
        assert_eq!(rewritten.original(), "this.x");
        assert_eq!(rewritten.tail, vec!["x"]);
    }

    #[test]
    fn test_maybe_rewrite_is_idempotent() {
        let scope = ScopeStack::new();

        let once = maybe_rewrite(path("property.value"), &scope);
        assert_eq!(print_expression(&once), "this.property.value");

        let twice = maybe_rewrite(once.clone(), &scope);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_maybe_rewrite_returns_bound_input_unchanged() {
        let mut scope = ScopeStack::new();
        scope.push(&["item".to_string()]);

        let bound = path("item.name");
        assert_eq!(maybe_rewrite(bound.clone(), &scope), bound);

        let literal = Expression::String(StringLiteral {
            value: "item".to_string(),
            loc: mock_loc(),
        });
        assert_eq!(maybe_rewrite(literal.clone(), &scope), literal);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // LOOKUP BINDING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_lookup_binding_maps_each_head_to_a_lookup() {
        let mut imports = ImportTable::new();
        let heads: BTreeSet<String> = ["b", "a"].iter().map(|h| h.to_string()).collect();
        let target = Statement::Mustache(mustache("target", vec![]));

        let block = build_lookup_binding(target.clone(), &heads, "maybeHelpers", &mut imports);

        assert_eq!(print_expression(&block.path), "let");
        assert_eq!(block.loc, mock_loc());
        assert_eq!(block.program.block_params, vec!["maybeHelpers"]);
        assert_eq!(block.program.body, vec![target]);
        assert!(block.inverse.is_none());

        let lookups = match &block.params[..] {
            [Expression::SubExpression(sexpr)] => sexpr,
            other => panic!("expected a single (hash) param, got {:?}", other),
        };
        assert_eq!(print_expression(&lookups.path), "hash");
        assert_eq!(lookups.hash.pairs.len(), 2);

        for (pair, expected) in lookups.hash.pairs.iter().zip(["a", "b"]) {
            assert_eq!(pair.key, expected);
            match &pair.value {
                Expression::SubExpression(lookup) => {
                    assert_eq!(print_expression(&lookup.path), "tryLookupHelper");
                    assert_eq!(lookup.params, vec![b::string(expected)]);
                    assert!(lookup.hash.is_empty());
                }
                other => panic!("expected a lookup sub-expression, got {:?}", other),
            }
        }

        assert_eq!(imports.declarations().len(), 1);
        assert_eq!(imports.declarations()[0].module, TRY_LOOKUP_HELPER_MODULE);
        assert_eq!(imports.declarations()[0].export, "default");
    }

    #[test]
    fn test_helper_or_property_fallback_shape() {
        let scope = ScopeStack::new();
        let statement = mustache("property", vec![]);
        let ambiguous = AmbiguousMustache::classify(&statement, &scope).unwrap();

        let sexpr = helper_or_property_fallback("maybeHelpers", ambiguous);
        assert_eq!(
            print_expression(&Expression::SubExpression(sexpr)),
            "(if maybeHelpers.property (maybeHelpers.property) this.property)"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // STATEMENT FALLBACK
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_statement_fallback_end_to_end() {
        let scope = ScopeStack::new();
        let mut imports = ImportTable::new();
        let statement = mustache("property", vec![]);
        let ambiguous = AmbiguousMustache::classify(&statement, &scope).unwrap();

        let block = rewrite_ambiguous_statement(ambiguous, &mut imports, &scope);

        let expected = squash(indoc! {r#"
            {{#if (isComponent "property")}}
              <Property />
            {{else}}
              {{#let (hash property=(tryLookupHelper "property")) as |maybeHelpers|}}
                {{(if maybeHelpers.property (maybeHelpers.property) this.property)}}
              {{/let}}
            {{/if}}
        "#});
        assert_eq!(print_statement(&Statement::Block(block.clone())), expected);
        assert_eq!(block.loc, mock_loc());

        match &block.program.body[..] {
            [Statement::Element(element)] => {
                assert_eq!(element.tag, "Property");
                assert!(element.self_closing);
            }
            other => panic!("expected a component element, got {:?}", other),
        }

        let modules: Vec<&str> = imports
            .declarations()
            .iter()
            .map(|d| d.module.as_str())
            .collect();
        assert_eq!(modules, vec![IS_COMPONENT_MODULE, TRY_LOOKUP_HELPER_MODULE]);
    }

    #[test]
    fn test_statement_fallback_picks_unbound_block_param() {
        let mut scope = ScopeStack::new();
        scope.push(&["maybeHelpers".to_string()]);
        scope.push(&["maybeHelpers0".to_string()]);
        let mut imports = ImportTable::new();
        let statement = mustache("user-card", vec![]);
        let ambiguous = AmbiguousMustache::classify(&statement, &scope).unwrap();

        let block = rewrite_ambiguous_statement(ambiguous, &mut imports, &scope);
        let printed = print_statement(&Statement::Block(block));

        assert!(printed.contains("<UserCard />"));
        assert!(printed.contains("as |maybeHelpers1|"));
        assert!(printed.contains("(if maybeHelpers1.user-card (maybeHelpers1.user-card) this.user-card)"));
        assert_eq!(scope.fresh_name_like(MAYBE_HELPERS_BLOCK_PARAM), "maybeHelpers1");
    }

    #[test]
    fn test_statement_fallback_keeps_triple_curlies() {
        let scope = ScopeStack::new();
        let mut imports = ImportTable::new();
        let mut statement = mustache("html", vec![]);
        statement.trusting = true;
        let ambiguous = AmbiguousMustache::classify(&statement, &scope).unwrap();

        let block = rewrite_ambiguous_statement(ambiguous, &mut imports, &scope);
        assert!(print_statement(&Statement::Block(block))
            .contains("{{{(if maybeHelpers.html (maybeHelpers.html) this.html)}}}"));
    }

    #[test]
    fn test_repeated_rewrites_bind_imports_once() {
        let scope = ScopeStack::new();
        let mut imports = ImportTable::new();

        for name in ["first", "second", "third"] {
            let statement = mustache(name, vec![]);
            let ambiguous = AmbiguousMustache::classify(&statement, &scope).unwrap();
            rewrite_ambiguous_statement(ambiguous, &mut imports, &scope);
        }

        assert_eq!(imports.declarations().len(), 2);
        let again = imports.bind_import(IS_COMPONENT_MODULE, "default", mock_loc(), "isComponent");
        assert_eq!(again, "isComponent");
    }
}
