// S-expression formatter for fixture scripts
// Renders the parsed statements as readable Lisp-like syntax for `interop parse`

use interop_fixture::*;

pub fn format_script_as_sexpr(script: &Script) -> String {
    format_script_with_indent(script, 0)
}

fn format_script_with_indent(script: &Script, indent: usize) -> String {
    let statements: Vec<String> = script
        .statements
        .iter()
        .map(|statement| format_statement_with_indent(statement, indent + 2))
        .collect();

    if statements.is_empty() {
        "(script)".to_string()
    } else if statements.len() == 1 {
        format!("(script {})", statements[0])
    } else {
        format!(
            "(script\n{}{}\n{})",
            " ".repeat(indent + 2),
            statements.join(&format!("\n{}", " ".repeat(indent + 2))),
            " ".repeat(indent)
        )
    }
}

fn format_statement_with_indent(statement: &Statement, indent: usize) -> String {
    match &statement.kind {
        StatementKind::Assignment(assignment) => format!(
            "(assign {} {})",
            assignment.variable.name,
            format_expression_with_indent(&assignment.expression, indent + 2)
        ),
        StatementKind::ClassDefinition(class) => format_class_with_indent(class, indent),
        StatementKind::SetInternal(set) => format!(
            "(set {} {} {})",
            set.object.name,
            set.name.name,
            format_literal(&set.value)
        ),
        StatementKind::Freeze(object) => format!("(freeze {})", object.name),
        StatementKind::Query(query) => format_query(query),
        StatementKind::Expect(expectation) => format!(
            "(expect {} {})",
            format_query(&expectation.query),
            format_matcher(&expectation.matcher)
        ),
    }
}

fn format_class_with_indent(class: &ClassDefinition, indent: usize) -> String {
    let accessors: Vec<String> = class
        .accessors
        .iter()
        .map(|declaration| {
            let names: Vec<String> = declaration
                .names
                .iter()
                .map(|name| format!(":{}", name.name))
                .collect();
            format!("({} {})", declaration.kind.keyword(), names.join(" "))
        })
        .collect();

    if accessors.is_empty() {
        format!("(class {})", class.name.name)
    } else {
        format!(
            "(class {}\n{}{})",
            class.name.name,
            " ".repeat(indent + 2),
            accessors.join(&format!("\n{}", " ".repeat(indent + 2)))
        )
    }
}

fn format_expression_with_indent(expression: &Expression, indent: usize) -> String {
    match &expression.kind {
        ExpressionKind::Hash(hash) => format_hash_with_indent("hash", hash, indent),
        ExpressionKind::Meta(hash) => format_hash_with_indent("meta", hash, indent),
        ExpressionKind::New(new_object) => {
            let internals: Vec<String> = new_object
                .internals
                .iter()
                .map(|init| format!("({} {})", init.name.name, format_literal(&init.value)))
                .collect();
            if internals.is_empty() {
                format!("(new {})", new_object.class_name.name)
            } else {
                format!(
                    "(new {} {})",
                    new_object.class_name.name,
                    internals.join(" ")
                )
            }
        }
        ExpressionKind::Literal(literal) => format_literal(literal),
    }
}

fn format_hash_with_indent(head: &str, hash: &HashLiteral, indent: usize) -> String {
    let entries: Vec<String> = hash
        .entries
        .iter()
        .map(|entry| {
            format!(
                "(=> {} {})",
                format_literal(&entry.key),
                format_literal(&entry.value)
            )
        })
        .collect();

    let inline = entries.join(" ");
    // Short hashes stay on one line
    if entries.is_empty() {
        format!("({head})")
    } else if inline.len() < 50 {
        format!("({head} {inline})")
    } else {
        format!(
            "({head}\n{}{})",
            " ".repeat(indent + 2),
            entries.join(&format!("\n{}", " ".repeat(indent + 2)))
        )
    }
}

fn format_query(query: &Query) -> String {
    match &query.kind {
        QueryKind::KeyInfo { object, key } => {
            format!("(key-info {} {})", object.name, format_literal(key))
        }
        QueryKind::Keys {
            object,
            include_internal: true,
        } => format!("(keys {} :internal)", object.name),
        QueryKind::Keys { object, .. } => format!("(keys {})", object.name),
        QueryKind::Read { object, key } => {
            format!("(read {} {})", object.name, format_literal(key))
        }
    }
}

fn format_matcher(matcher: &Matcher) -> String {
    match matcher {
        Matcher::Equals(ExpectedValue::SymbolList(symbols)) => {
            let symbols: Vec<String> = symbols.iter().map(format_literal).collect();
            format!("(== [{}])", symbols.join(" "))
        }
        Matcher::Equals(ExpectedValue::Literal(literal)) => {
            format!("(== {})", format_literal(literal))
        }
        Matcher::Includes(symbol) => format!("(includes {})", format_literal(symbol)),
        Matcher::Excludes(symbol) => format!("(excludes {})", format_literal(symbol)),
        Matcher::IsEmpty => "(is-empty)".to_string(),
    }
}

fn format_literal(literal: &Literal) -> String {
    match &literal.kind {
        LiteralKind::Integer(value) => value.to_string(),
        LiteralKind::Float(value) => format!("{value:?}"),
        LiteralKind::String(value) => format!("\"{}\"", value.replace('"', "\\\"")),
        LiteralKind::Symbol(name) => format!(":{name}"),
        LiteralKind::Boolean(value) => value.to_string(),
        LiteralKind::Nil => "nil".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sexpr(source: &str) -> String {
        format_script_as_sexpr(&parse_script(source).unwrap())
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(sexpr(""), "(script)");
    }

    #[test]
    fn test_single_statement_stays_inline() {
        assert_eq!(
            sexpr(r#"hash = {"a" => 1, :b => 2.5}"#),
            r#"(script (assign hash (hash (=> "a" 1) (=> :b 2.5))))"#
        );
    }

    #[test]
    fn test_statements_are_indented() {
        let source = "class Fixture {\n  attr_reader :ro\n  attr_writer :wo, :other\n}\nobject = new Fixture { @exists = 14 }\nexpect key_info(object, :ro) == [:existing, :readable]";
        let expected = "(script\n  (class Fixture\n    (attr_reader :ro)\n    (attr_writer :wo :other))\n  (assign object (new Fixture (@exists 14)))\n  (expect (key-info object :ro) (== [:existing :readable]))\n)";
        assert_eq!(sexpr(source), expected);
    }

    #[test]
    fn test_queries_and_matchers() {
        let source = "keys(hash, internal)\nread(info, \"name\")\nexpect keys(hash) is_empty\nexpect key_info(hash, :a) excludes :writable\nfreeze hash\nset hash @x = nil";
        let expected = "(script\n  (keys hash :internal)\n  (read info \"name\")\n  (expect (keys hash) (is-empty))\n  (expect (key-info hash :a) (excludes :writable))\n  (freeze hash)\n  (set hash @x nil)\n)";
        assert_eq!(sexpr(source), expected);
    }
}
