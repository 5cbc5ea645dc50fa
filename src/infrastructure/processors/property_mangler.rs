use crate::core::name_cache::NameMap;
use crate::core::options::PropertiesConfig;
use crate::utils::errors::MinifyError;
use once_cell::sync::Lazy;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    AccessorProperty, BindingProperty, ComputedMemberExpression, Expression, IdentifierName,
    MethodDefinition, ObjectProperty, Program, PropertyDefinition, PropertyKey,
    StaticMemberExpression,
};
use oxc_ast::AstBuilder;
use oxc_ast_visit::{walk_mut, VisitMut};
use regex::Regex;
use std::collections::HashSet;

const LEADING_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_";
const TRAILING_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_0123456789";

/// Property names of the standard library and host objects that are kept
/// unless `builtins` is set.
static BUILTIN_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Object / Function
        "constructor", "prototype", "__proto__", "toString", "toLocaleString", "valueOf",
        "hasOwnProperty", "isPrototypeOf", "propertyIsEnumerable", "call", "apply", "bind",
        "name", "length", "arguments", "caller", "assign", "create", "defineProperty",
        "defineProperties", "freeze", "isFrozen", "seal", "keys", "values", "entries",
        "fromEntries", "getPrototypeOf", "setPrototypeOf", "getOwnPropertyNames",
        "getOwnPropertyDescriptor", "value", "writable", "enumerable", "configurable", "get",
        "set",
        // Array / String
        "push", "pop", "shift", "unshift", "slice", "splice", "concat", "join", "reverse",
        "sort", "indexOf", "lastIndexOf", "includes", "find", "findIndex", "filter", "map",
        "forEach", "reduce", "reduceRight", "some", "every", "flat", "flatMap", "fill", "from",
        "of", "isArray", "charAt", "charCodeAt", "codePointAt", "split", "substring", "substr",
        "replace", "replaceAll", "match", "matchAll", "search", "trim", "trimStart", "trimEnd",
        "padStart", "padEnd", "startsWith", "endsWith", "toUpperCase", "toLowerCase", "repeat",
        "raw",
        // Collections, promises, iteration
        "has", "add", "delete", "clear", "size", "then", "catch", "finally", "resolve",
        "reject", "all", "allSettled", "race", "any", "next", "return", "throw", "done",
        // Errors, JSON, Math, Number
        "message", "stack", "cause", "parse", "stringify", "toJSON", "floor", "ceil", "round",
        "abs", "min", "max", "random", "pow", "sqrt", "toFixed", "isNaN", "isFinite",
        "isInteger", "parseInt", "parseFloat",
        // Console and host globals
        "log", "warn", "error", "info", "debug", "trace", "table", "time", "timeEnd",
        "document", "window", "globalThis", "self", "location", "navigator", "addEventListener",
        "removeEventListener", "dispatchEvent", "querySelector", "querySelectorAll",
        "getElementById", "createElement", "appendChild", "setAttribute", "getAttribute",
        "style", "className", "innerHTML", "textContent",
        // Module interop
        "exports", "module", "require", "default", "__esModule",
    ]
    .into_iter()
    .collect()
});

/// The `n`-th name of the mangled name sequence: `a`..`_`, then `aa`, `ba`, ...
pub fn nth_name(mut n: usize) -> String {
    let mut name = String::new();
    name.push(LEADING_CHARS[n % LEADING_CHARS.len()] as char);
    n /= LEADING_CHARS.len();

    while n > 0 {
        n -= 1;
        name.push(TRAILING_CHARS[n % TRAILING_CHARS.len()] as char);
        n /= TRAILING_CHARS.len();
    }

    name
}

struct ManglingRules {
    regex: Option<Regex>,
    reserved: HashSet<String>,
    builtins: bool,
}

impl ManglingRules {
    fn new(config: &PropertiesConfig) -> Result<Self, MinifyError> {
        let regex = config
            .regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| MinifyError::new(format!("Invalid property regex: {}", e)))?;

        Ok(Self {
            regex,
            reserved: config.reserved.iter().cloned().collect(),
            builtins: config.builtins,
        })
    }

    fn should_mangle(&self, name: &str) -> bool {
        if self.reserved.contains(name) {
            return false;
        }
        if !self.builtins && BUILTIN_PROPERTIES.contains(name) {
            return false;
        }
        self.regex.as_ref().map_or(true, |regex| regex.is_match(name))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Collect,
    Rename,
}

struct PropertyMangler<'a> {
    ast: AstBuilder<'a>,
    rules: ManglingRules,
    cache: NameMap,
    /// Names that stay as they are; mangled names must not collide with them
    unmangleable: HashSet<String>,
    /// Mangled names already handed out
    used: HashSet<String>,
    next_index: usize,
    pass: Pass,
}

impl<'a> PropertyMangler<'a> {
    fn mangled_name(&mut self, original: &str) -> String {
        if let Some(mangled) = self.cache.get(original) {
            return mangled.to_string();
        }

        let mangled = loop {
            let candidate = nth_name(self.next_index);
            self.next_index += 1;
            if !self.unmangleable.contains(&candidate) && !self.used.contains(&candidate) {
                break candidate;
            }
        };

        self.used.insert(mangled.clone());
        self.cache.insert(original, mangled.clone());
        mangled
    }

    /// Returns true when the name was replaced
    fn process(&mut self, ident: &mut IdentifierName<'a>) -> bool {
        let name = ident.name.to_string();
        let mangle = self.rules.should_mangle(&name);

        match self.pass {
            Pass::Collect => {
                if !mangle {
                    self.unmangleable.insert(name);
                }
                false
            }
            Pass::Rename => {
                if !mangle {
                    return false;
                }
                let mangled = self.mangled_name(&name);
                ident.name = self.ast.atom(&mangled);
                true
            }
        }
    }

    /// Quoted names are never renamed, so no mangled name may take them
    fn keep_quoted(&mut self, name: &str) {
        if self.pass == Pass::Collect {
            self.unmangleable.insert(name.to_string());
        }
    }

    fn process_key(&mut self, key: &mut PropertyKey<'a>, computed: bool) -> bool {
        match key {
            PropertyKey::StringLiteral(literal) => {
                self.keep_quoted(&literal.value);
                false
            }
            PropertyKey::StaticIdentifier(ident) if !computed => self.process(ident),
            _ => false,
        }
    }
}

impl<'a> VisitMut<'a> for PropertyMangler<'a> {
    fn visit_static_member_expression(&mut self, it: &mut StaticMemberExpression<'a>) {
        self.process(&mut it.property);
        walk_mut::walk_static_member_expression(self, it);
    }

    fn visit_computed_member_expression(&mut self, it: &mut ComputedMemberExpression<'a>) {
        if let Expression::StringLiteral(literal) = &it.expression {
            self.keep_quoted(&literal.value);
        }
        walk_mut::walk_computed_member_expression(self, it);
    }

    fn visit_object_property(&mut self, it: &mut ObjectProperty<'a>) {
        if self.process_key(&mut it.key, it.computed) {
            it.shorthand = false;
        }
        walk_mut::walk_object_property(self, it);
    }

    fn visit_binding_property(&mut self, it: &mut BindingProperty<'a>) {
        if self.process_key(&mut it.key, it.computed) {
            it.shorthand = false;
        }
        walk_mut::walk_binding_property(self, it);
    }

    fn visit_method_definition(&mut self, it: &mut MethodDefinition<'a>) {
        self.process_key(&mut it.key, it.computed);
        walk_mut::walk_method_definition(self, it);
    }

    fn visit_property_definition(&mut self, it: &mut PropertyDefinition<'a>) {
        self.process_key(&mut it.key, it.computed);
        walk_mut::walk_property_definition(self, it);
    }

    fn visit_accessor_property(&mut self, it: &mut AccessorProperty<'a>) {
        self.process_key(&mut it.key, it.computed);
        walk_mut::walk_accessor_property(self, it);
    }
}

/// Rename properties of `program` according to `config`.
///
/// Existing assignments in `cache` are reused; new assignments are added to
/// the returned map.
pub fn mangle_properties<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    config: &PropertiesConfig,
    cache: NameMap,
) -> Result<NameMap, MinifyError> {
    let used = cache.mangled_names().map(str::to_string).collect();

    let mut mangler = PropertyMangler {
        ast: AstBuilder::new(allocator),
        rules: ManglingRules::new(config)?,
        cache,
        unmangleable: HashSet::new(),
        used,
        next_index: 0,
        pass: Pass::Collect,
    };

    mangler.visit_program(program);
    mangler.pass = Pass::Rename;
    mangler.visit_program(program);

    Ok(mangler.cache)
}
