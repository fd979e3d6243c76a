//! Symbol-Table Walker
//!
//! One source file compiles into several bodies: the top-level script, each
//! function and each method. The host exposes its function and class
//! registries through [`SymbolTable`] so every body of a file can be found.

use super::body::{BytecodeBody, CompiledBody, Origin};
use serde::{Deserialize, Serialize};

/// A declared class as seen through the host's class registry
pub trait ClassEntry {
    /// Who declared the class
    fn origin(&self) -> Origin;

    /// The class's method bodies
    fn methods(&self) -> Box<dyn Iterator<Item = &dyn CompiledBody> + '_>;
}

/// The host runtime's live function and class registries
pub trait SymbolTable {
    /// Every compiled function
    fn functions(&self) -> Box<dyn Iterator<Item = &dyn CompiledBody> + '_>;

    /// Every declared class
    fn classes(&self) -> Box<dyn Iterator<Item = &dyn ClassEntry> + '_>;
}

/// User-authored bodies compiled from `filename`
///
/// Functions first, then the methods of user classes, in registry order.
pub fn user_bodies_in<'a, S>(
    symbols: &'a S,
    filename: &'a str,
) -> impl Iterator<Item = &'a dyn CompiledBody> + 'a
where
    S: SymbolTable + ?Sized,
{
    let methods = symbols
        .classes()
        .filter(|class| class.origin().is_user())
        .flat_map(|class| class.methods());

    symbols
        .functions()
        .chain(methods)
        .filter(move |body| body.origin().is_user() && body.filename() == filename)
}

/// A table with no functions and no classes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl SymbolTable for NoSymbols {
    fn functions(&self) -> Box<dyn Iterator<Item = &dyn CompiledBody> + '_> {
        Box::new(std::iter::empty())
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &dyn ClassEntry> + '_> {
        Box::new(std::iter::empty())
    }
}

/// Class declaration held by [`Registry`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// Who declared the class
    #[serde(default)]
    pub origin: Origin,
    /// Method bodies
    #[serde(default)]
    pub methods: Vec<BytecodeBody>,
}

impl ClassDecl {
    /// Create a user class with no methods
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: Origin::User,
            methods: Vec::new(),
        }
    }

    /// Add a method body
    #[must_use]
    pub fn with_method(mut self, method: BytecodeBody) -> Self {
        self.methods.push(method);
        self
    }

    /// Set the author
    #[must_use]
    pub const fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

impl ClassEntry for ClassDecl {
    fn origin(&self) -> Origin {
        self.origin
    }

    fn methods(&self) -> Box<dyn Iterator<Item = &dyn CompiledBody> + '_> {
        Box::new(self.methods.iter().map(|m| m as &dyn CompiledBody))
    }
}

/// In-memory function and class registry
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Compiled functions
    #[serde(default)]
    pub functions: Vec<BytecodeBody>,
    /// Declared classes
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function body
    pub fn add_function(&mut self, body: BytecodeBody) {
        self.functions.push(body);
    }

    /// Register a class
    pub fn add_class(&mut self, class: ClassDecl) {
        self.classes.push(class);
    }

    /// Every body held, functions first, then methods
    pub fn bodies(&self) -> impl Iterator<Item = &BytecodeBody> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }
}

impl SymbolTable for Registry {
    fn functions(&self) -> Box<dyn Iterator<Item = &dyn CompiledBody> + '_> {
        Box::new(self.functions.iter().map(|f| f as &dyn CompiledBody))
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &dyn ClassEntry> + '_> {
        Box::new(self.classes.iter().map(|c| c as &dyn ClassEntry))
    }
}
