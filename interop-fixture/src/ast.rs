// Interop Fixture AST
// Statements and literals of a .interop script, each carrying its source span

use miette::SourceSpan;

/// Byte range of a node in the script source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// A whole fixture script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Statement>,
    pub source_file: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name = expression`
    Assignment(Assignment),
    /// `class Name { attr_reader :x ... }`
    ClassDefinition(ClassDefinition),
    /// `set name @ivar = literal`
    SetInternal(SetInternal),
    /// `freeze name`
    Freeze(Identifier),
    /// A bare query whose result is printed
    Query(Query),
    /// `expect <query> <matcher>`
    Expect(Expectation),
}

/// A variable, class or attribute name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub variable: Identifier,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// `{"a" => 1}`
    Hash(HashLiteral),
    /// `meta {"name" => "Hash"}`
    Meta(HashLiteral),
    /// `new ClassName { @x = 1 }`
    New(NewObject),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub entries: Vec<HashEntry>,
    pub span: Span,
}

/// Hash entries are keyed by a String or Symbol literal
#[derive(Debug, Clone, PartialEq)]
pub struct HashEntry {
    pub key: Literal,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewObject {
    pub class_name: Identifier,
    pub internals: Vec<InternalInit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InternalInit {
    pub name: Identifier,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub name: Identifier,
    pub accessors: Vec<AccessorDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDeclaration {
    pub kind: AccessorKind,
    pub names: Vec<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Reader,
    Writer,
    Accessor,
}

impl AccessorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Reader => "attr_reader",
            AccessorKind::Writer => "attr_writer",
            AccessorKind::Accessor => "attr_accessor",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetInternal {
    pub object: Identifier,
    pub name: Identifier,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryKind {
    /// `key_info(object, key)`
    KeyInfo { object: Identifier, key: Literal },
    /// `keys(object)` or `keys(object, internal)`
    Keys {
        object: Identifier,
        include_internal: bool,
    },
    /// `read(object, key)`
    Read { object: Identifier, key: Literal },
}

impl Query {
    pub fn object(&self) -> &Identifier {
        match &self.kind {
            QueryKind::KeyInfo { object, .. }
            | QueryKind::Keys { object, .. }
            | QueryKind::Read { object, .. } => object,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub query: Query,
    pub matcher: Matcher,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// `== [:a, :b]` or `== literal`
    Equals(ExpectedValue),
    /// `includes :symbol`
    Includes(Literal),
    /// `excludes :symbol`
    Excludes(Literal),
    /// `is_empty`
    IsEmpty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedValue {
    SymbolList(Vec<Literal>),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Integer(i64),
    Float(f64),
    String(String),
    /// Symbol name without the leading ':'
    Symbol(String),
    Boolean(bool),
    Nil,
}

impl Literal {
    /// Symbol name, if this literal is a symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Name carried by a String or Symbol literal
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::String(name) | LiteralKind::Symbol(name) => Some(name),
            _ => None,
        }
    }
}
