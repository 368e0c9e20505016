use super::{Error, TagFunction};
use cel_interpreter::{Context, Program};
use core::fmt;
use regex::Regex;
use strum::IntoEnumIterator;

/// Variable holding the request being authorized
pub const REQUEST: &str = "request";

/// Variable holding the resource being accessed
pub const RESOURCE: &str = "resource";

/// Functions provided by the engine's default context
const BUILTIN_FUNCTIONS: &[&str] = &[
    "bytes",
    "contains",
    "double",
    "duration",
    "endsWith",
    "getDate",
    "getDayOfMonth",
    "getDayOfWeek",
    "getDayOfYear",
    "getFullYear",
    "getHours",
    "getMilliseconds",
    "getMinutes",
    "getMonth",
    "getSeconds",
    "int",
    "matches",
    "max",
    "min",
    "size",
    "startsWith",
    "string",
    "timestamp",
    "uint",
];

/// Member-style macro calls the parser expands into comprehensions
const COMPREHENSION_PATTERN: &str = r"\.\s*(?:all|exists|exists_one|filter|map)\s*\(";

/// The declarations every policy expression is compiled against
///
/// The environment owns the engine's root context, with the built-ins and the
/// tag predicates registered. It is immutable once built; evaluators share it
/// and evaluate in child scopes of it.
pub struct Environment {
    context: Context<'static>,
    comprehension: Regex,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        let mut context = Context::default();
        TagFunction::register_all(&mut context);

        Self {
            context,
            comprehension: Regex::new(COMPREHENSION_PATTERN).expect("comprehension pattern should be a valid regex"),
        }
    }

    #[must_use]
    pub fn declares_variable(name: &str) -> bool {
        name == REQUEST || name == RESOURCE
    }

    #[must_use]
    pub fn declares_function(name: &str) -> bool {
        BUILTIN_FUNCTIONS.contains(&name) || TagFunction::iter().any(|function| function.name() == name)
    }

    /// Whether a referenced name is an operator or parser-internal call such as `_&&_`, `!_` or `@in`
    fn is_operator(name: &str) -> bool {
        name.starts_with(['_', '@']) || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    pub(crate) const fn context(&self) -> &Context<'static> {
        &self.context
    }

    /// Rejects programs referencing functions or variables outside the environment
    ///
    /// Iteration variables of comprehensions show up as plain variables, so
    /// programs calling a comprehension macro only get their functions checked.
    pub(crate) fn check(&self, source: &str, program: &Program) -> Result<(), Error> {
        let references = program.references();

        let mut functions = references.functions();
        functions.sort_unstable();
        if let Some(name) = functions
            .iter()
            .find(|name| !Self::is_operator(name) && !Self::declares_function(name))
        {
            return Err(Error::compilation(format!("undeclared reference to function '{name}'")));
        }

        if self.comprehension.is_match(source) {
            return Ok(());
        }

        let mut variables = references.variables();
        variables.sort_unstable();
        if let Some(name) = variables.iter().find(|name| !Self::declares_variable(name)) {
            return Err(Error::compilation(format!(
                "undeclared reference to '{name}', only '{REQUEST}' and '{RESOURCE}' are available"
            )));
        }

        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("variables", &[REQUEST, RESOURCE])
            .field("functions", &TagFunction::iter().map(TagFunction::name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> Result<(), Error> {
        let program = Program::compile(source).unwrap();
        Environment::new().check(source, &program)
    }

    #[test]
    fn test_declared_variables() {
        assert!(Environment::declares_variable("request"));
        assert!(Environment::declares_variable("resource"));
        assert!(!Environment::declares_variable("now"));
    }

    #[test]
    fn test_declared_functions() {
        for function in TagFunction::iter() {
            assert!(Environment::declares_function(function.name()));
        }
        assert!(Environment::declares_function("startsWith"));
        assert!(Environment::declares_function("timestamp"));
        assert!(!Environment::declares_function("matchLabel"));
    }

    #[test]
    fn test_check_accepts_declared_references() {
        check("resource.name.startsWith('projects/') && request.time < timestamp('2024-03-21T01:14:51Z')").unwrap();
        check("resource.hasTagKeyId('tagKeys/1') && resource.matchTagId('tagKeys/1', 'tagValues/2')").unwrap();
        check("resource.hasTagKey('prj/dataset') || resource.matchTag('prj/dataset', 'value_1')").unwrap();
    }

    #[test]
    fn test_check_rejects_unknown_function() {
        let err = check("resource.matchLabel('env', 'prod')").unwrap_err();
        assert!(err.is_compilation());
        assert!(err.message().contains("matchLabel"));
    }

    #[test]
    fn test_check_rejects_unknown_variable() {
        let err = check("principal.name == 'alice'").unwrap_err();
        assert!(err.is_compilation());
        assert!(err.message().contains("'principal'"), "unexpected message: {}", err.message());
    }

    #[test]
    fn test_check_accepts_operators() {
        check("!resource.hasTagKey('a') || resource.hasTagKey('b') && resource.name != 'x'").unwrap();
        check("request.time < timestamp('2024-03-21T01:14:51Z') && request.count + 1 >= 2").unwrap();
        check("'prj/dataset' in request.keys ? -request.count < 0 : request.list[0] == 1").unwrap();
    }

    #[test]
    fn test_check_allows_comprehension_variables() {
        check("request.methods.exists(m, m == 'GET') && resource.hasTagKey('a')").unwrap();
        check("[1, 2].all(x, x > 0)").unwrap();
        check("request.items.map(i, i * 2).size() == 2").unwrap();
        check("request.items.filter(i, i > 1).size() == 1").unwrap();
    }

    #[test]
    fn test_check_comprehension_still_rejects_unknown_function() {
        let err = check("request.methods.exists(m, m.matchLabel('GET'))").unwrap_err();
        assert!(err.message().contains("matchLabel"));
    }

    #[test]
    fn test_is_operator() {
        for name in ["_&&_", "_||_", "!_", "-_", "_==_", "_<_", "_[_]", "_?_:_", "@in", "@not_strictly_false"] {
            assert!(Environment::is_operator(name), "{name} should be an operator");
        }
        assert!(!Environment::is_operator("matchTag"));
        assert!(!Environment::is_operator("startsWith"));
    }

    #[test]
    fn test_debug_lists_declarations() {
        let debug = format!("{:?}", Environment::new());
        assert!(debug.contains("request"));
        assert!(debug.contains("hasTagKeyId"));
    }
}
