use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Names the template compiler resolves on its own. They are never
    /// ambiguous, even when no enclosing scope binds them.
    pub static ref TEMPLATE_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        // Control flow
        s.insert("if");
        s.insert("unless");
        s.insert("each");
        s.insert("each-in");
        s.insert("let");
        s.insert("with");
        s.insert("in-element");
        s.insert("-in-element");

        // Invocation & block introspection
        s.insert("yield");
        s.insert("outlet");
        s.insert("mount");
        s.insert("has-block");
        s.insert("has-block-params");
        s.insert("component");
        s.insert("helper");
        s.insert("modifier");
        s.insert("-with-dynamic-vars");
        s.insert("-get-dynamic-var");
        s
    };

    /// Helpers and modifiers the runtime provides without an import. A block
    /// param or outer local of the same name shadows them; a free reference
    /// always resolves to the built-in, never to `this`.
    pub static ref BUILTIN_HELPERS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("action");
        s.insert("array");
        s.insert("concat");
        s.insert("debugger");
        s.insert("fn");
        s.insert("get");
        s.insert("hash");
        s.insert("log");
        s.insert("mut");
        s.insert("on");
        s.insert("readonly");
        s.insert("unbound");
        s.insert("unique-id");
        s
    };
}

/// Read interface the fallback rewrites consume. Implementations must answer
/// for the scope enclosing the node currently being visited.
pub trait ScopeOracle {
    /// Whether `name` resolves lexically: a block param, an outer local, or a keyword.
    fn bound_in_scope(&self, name: &str) -> bool;

    /// A name based on `base` that is bound in no current or enclosing scope.
    fn fresh_name_like(&self, base: &str) -> String;
}

/// Stack of block-param frames maintained by the traversal.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Vec<String>>,
    /// Bindings from the embedding module (strict-mode template scope).
    locals: HashSet<String>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locals<I, S>(locals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: Vec::new(),
            locals: locals.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, block_params: &[String]) {
        self.frames.push(block_params.to_vec());
    }

    pub fn pop(&mut self) -> Option<Vec<String>> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn has(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.iter().any(|param| param == name))
            || self.locals.contains(name)
            || TEMPLATE_KEYWORDS.contains(name)
            || BUILTIN_HELPERS.contains(name)
    }
}

impl ScopeOracle for ScopeStack {
    fn bound_in_scope(&self, name: &str) -> bool {
        self.has(name)
    }

    fn fresh_name_like(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 0usize;
        while self.has(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }
        name
    }
}
