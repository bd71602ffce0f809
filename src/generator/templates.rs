use minijinja::{AutoEscape, Environment, Error as TemplateError, ErrorKind as TemplateErrorKind, Value};
use serde::Serialize;

use super::case;
use super::type_map;
use crate::error::{Result, ScaffoldError};

/// The endpoint- and schema-derived templates embedded in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Storage schema and derived validators, one file per spec
    Schema,
    /// Route declarations, one file per tag
    Routes,
    /// Handler stubs, one file per tag
    Handlers,
    /// Router binding routes to handlers, one file per tag
    Router,
    /// Registry of all tag routers
    RouteIndex,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Schema,
        TemplateKind::Routes,
        TemplateKind::Handlers,
        TemplateKind::Router,
        TemplateKind::RouteIndex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Schema => "schema.ts",
            TemplateKind::Routes => "routes.ts",
            TemplateKind::Handlers => "handlers.ts",
            TemplateKind::Router => "router.ts",
            TemplateKind::RouteIndex => "route_index.ts",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            TemplateKind::Schema => include_str!("../../templates/schema.ts.jinja"),
            TemplateKind::Routes => include_str!("../../templates/routes.ts.jinja"),
            TemplateKind::Handlers => include_str!("../../templates/handlers.ts.jinja"),
            TemplateKind::Router => include_str!("../../templates/router.ts.jinja"),
            TemplateKind::RouteIndex => include_str!("../../templates/route_index.ts.jinja"),
        }
    }
}

/// Build the helper set every template is rendered with.
///
/// Filters: `camel_case`, `pascal_case`, `snake_case`, `lowercase`,
/// `capitalize`, `identifier`, `ts_string`, `ts_key`.
///
/// Functions: `storage_type(type, column)`, `validator(schema)`,
/// `status_code(code)`, `eq(a, b)`.
pub fn helper_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    env.add_filter("camel_case", |s: String| case::camel_case(&s));
    env.add_filter("pascal_case", |s: String| case::pascal_case(&s));
    env.add_filter("snake_case", |s: String| case::snake_case(&s));
    env.add_filter("lowercase", |s: String| case::lowercase(&s));
    env.add_filter("capitalize", |s: String| case::capitalize(&s));
    env.add_filter("identifier", |s: String| identifier(&s));
    env.add_filter("ts_string", |s: String| ts_string(&s));
    env.add_filter("ts_key", |s: String| ts_key(&s));

    env.add_function("storage_type", |ty: Option<String>, column: String| {
        type_map::storage_column(ty.as_deref(), &column)
    });
    env.add_function("validator", validator_helper);
    env.add_function("status_code", |code: String| {
        type_map::status_code_expression(&code)
    });
    env.add_function("eq", |a: Value, b: Value| a == b);
    env
}

fn validator_helper(schema: Value) -> std::result::Result<String, TemplateError> {
    let schema = serde_json::to_value(&schema).map_err(|e| {
        TemplateError::new(
            TemplateErrorKind::InvalidOperation,
            format!("schema is not representable as JSON: {e}"),
        )
    })?;
    Ok(type_map::validator_expression(&schema))
}

/// Double-quoted TypeScript string literal.
pub fn ts_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// Object key: bare when it is a valid identifier, quoted otherwise.
pub fn ts_key(s: &str) -> String {
    let mut chars = s.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        s.to_string()
    } else {
        ts_string(s)
    }
}

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Replace characters that cannot appear in a TypeScript identifier with `_`.
/// Reserved words get a trailing `_`.
pub fn identifier(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Immutable template set plus helpers, built once per generation run and
/// shared by every render call.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Register the helper set and compile every embedded template.
    pub fn new() -> Result<Self> {
        let mut env = helper_environment();
        for kind in TemplateKind::ALL {
            env.add_template(kind.name(), kind.source())
                .map_err(|source| ScaffoldError::Render {
                    template: kind.name().to_string(),
                    source,
                })?;
        }
        Ok(Self { env })
    }

    /// Render an embedded template.
    pub fn render<S: Serialize>(&self, kind: TemplateKind, context: S) -> Result<String> {
        let render_err = |source| ScaffoldError::Render {
            template: kind.name().to_string(),
            source,
        };
        self.env
            .get_template(kind.name())
            .map_err(render_err)?
            .render(context)
            .map_err(render_err)
    }

    /// Render an ad-hoc template body with the same helper set.
    pub fn render_str<S: Serialize>(&self, name: &str, body: &str, context: S) -> Result<String> {
        self.env
            .render_named_str(name, body, context)
            .map_err(|source| ScaffoldError::Render {
                template: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use serde_json::json;

    #[test]
    fn test_all_embedded_templates_compile() {
        assert!(Renderer::new().is_ok());
    }

    #[test]
    fn test_case_filters() {
        let r = Renderer::new().unwrap();
        let out = r
            .render_str(
                "t",
                "{{ s | camel_case }} {{ s | pascal_case }} {{ s | snake_case }} {{ s | lowercase }}",
                context! { s => "ListPets" },
            )
            .unwrap();
        assert_eq!(out, "listPets ListPets _list_pets listpets");
    }

    #[test]
    fn test_type_helpers() {
        let r = Renderer::new().unwrap();
        let out = r
            .render_str(
                "t",
                "{{ storage_type(p.type, 'done') }}|{{ validator(s) }}|{{ status_code('404') }}|{{ status_code('418') }}",
                context! {
                    p => json!({ "type": "boolean" }),
                    s => json!({ "type": "array", "items": { "type": "string" } }),
                },
            )
            .unwrap();
        assert_eq!(
            out,
            "integer(\"done\", { mode: \"boolean\" })|z.array(z.string())|HttpStatusCodes.NOT_FOUND|418"
        );
    }

    #[test]
    fn test_missing_type_falls_back() {
        let r = Renderer::new().unwrap();
        let out = r
            .render_str(
                "t",
                "{{ storage_type(p.type, 'x') }}|{{ validator(p.items) }}",
                context! { p => json!({}) },
            )
            .unwrap();
        assert_eq!(out, "text(\"x\")|z.unknown()");
    }

    #[test]
    fn test_eq_branches() {
        let r = Renderer::new().unwrap();
        let body = "{% if eq(m, 'GET') %}get{% elif eq(m, 'POST') %}post{% else %}other{% endif %}";
        assert_eq!(r.render_str("t", body, context! { m => "GET" }).unwrap(), "get");
        assert_eq!(r.render_str("t", body, context! { m => "POST" }).unwrap(), "post");
        assert_eq!(r.render_str("t", body, context! { m => "PUT" }).unwrap(), "other");
    }

    #[test]
    fn test_ts_key_and_identifier() {
        assert_eq!(ts_key("petId"), "petId");
        assert_eq!(ts_key("x-request-id"), "\"x-request-id\"");
        assert_eq!(identifier("pet store"), "pet_store");
        assert_eq!(identifier("2fa"), "_2fa");
        assert_eq!(identifier("default"), "default_");
        assert_eq!(ts_string("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_bad_template_is_render_error() {
        let r = Renderer::new().unwrap();
        let err = r.render_str("broken", "{% if %}", context! {}).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Render);
    }
}
