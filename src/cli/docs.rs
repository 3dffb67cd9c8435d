//! Documentation content for the objfilter CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Context,
    Literals,
    Expanders,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "context" | "contexts" => Some(Self::Context),
            "literals" | "literal" | "strings" => Some(Self::Literals),
            "expanders" | "expander" | "resolvers" => Some(Self::Expanders),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"OBJFILTER DOCUMENTATION

objfilter selects records with compact conditions such as
  color is "grey" and doors >= 3
Each record in the input is tested; the ones that match are printed.

DOCUMENTATION CATEGORIES

  syntax            Terms, attribute paths, and/or, parentheses, not
  operators         Comparison operators and how they treat each type
  context           Scoping conditions to one element with @path(...)
  literals          Numbers, hex, quoted strings and escapes
  expanders         How path segments are looked up on a record

QUICK REFERENCE

  a.b.c is 1        Attribute path
  x and y, x && y   Both hold
  x or y, x || y    Either holds
  ( ... )           Grouping
  a not contains 1  Negation (is, equals, contains, inset only)
  @list(...)        Conditions on the same element of list

Run 'objfilter doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Context) => Ok(CONTEXT_DOC),
        Some(DocCategory::Literals) => Ok(LITERALS_DOC),
        Some(DocCategory::Expanders) => Ok(EXPANDERS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Terms and Connectives

TERMS
  attribute [not] operator argument

    Example:
      Input:  [{"color": "grey"}, {"color": "red"}]
      Query:  color is "grey"
      Output: [{"color": "grey"}]

ATTRIBUTE PATHS
  a.b.c
    Follow nested records one segment at a time. When a segment holds an
    array, the rest of the path is followed for every element and a term
    matches if any reached value matches.

    Example:
      Input:  {"tyres": [{"brand": "AVON"}, {"brand": "PIRELLI"}]}
      Query:  tyres.brand is "AVON"
      Output: [{"tyres": [...]}]

    Constraints:
      - A missing attribute (or null) never matches
      - Quote names that are not identifiers: "file name" is "x"

CONNECTIVES
  and, &&       Both sides hold (binds tighter)
  or, ||        Either side holds

    a is 1 and b is 2 or c is 3   means   (a is 1 and b is 2) or c is 3

PARENTHESES
  ( expr )
    Group sub-expressions to override precedence.

NEGATION
  attribute not operator argument
    Allowed with is, equals, contains and inset. A negated term also
    matches when the attribute is missing.

    Constraints:
      - 'not' may appear once per term
      - size not > 5 is an error; write size <= 5
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparisons

  is, equals, ==    Equal; integers and floats compare by value
  !=                Not equal; also matches when the attribute is missing
  <  <=  >  >=      Ordering between numbers, between strings, between bytes
  contains          Case-insensitive substring for text; element or key
                    membership for arrays and maps
  inset             Value is in the argument: substring of a string
                    argument; every element for array values
  regexp            Regular expression search on the text form
  iregexp           Same, ignoring case

  Examples:
    doors >= 3
    path contains "system32"
    name regexp "^Create.*A$"

  Constraints:
    - Operators are case-insensitive: IS, Contains, ...
    - Comparing different types never matches
    - An invalid pattern is rejected before any record is tested
"#;

const CONTEXT_DOC: &str = r#"CONTEXT - Conditions on One Element

  @path(expr)
    Test expr against each element reached through path. The record
    matches when a single element satisfies all of expr.

    Example:
      Input:  {"imported_dlls": [
                {"name": "CreateFileA", "num_functions": 1},
                {"name": "RegQueryValueEx", "num_functions": 2}]}
      Query:  @imported_dlls(name is "RegQueryValueEx" and num_functions is 1)
      Output: []

    Without the context, the two conditions could be satisfied by
    different elements:
      Query:  imported_dlls.name is "RegQueryValueEx" and imported_dlls.num_functions is 1
      Output: [{"imported_dlls": [...]}]
"#;

const LITERALS_DOC: &str = r#"LITERALS - Arguments

NUMBERS
  42          Decimal integer
  0x2a        Hexadecimal integer
  3.5         Floating point

STRINGS
  "text" or 'text'

  Escapes:
    \\  \'  \"      The character itself
    \n  \r  \t  \b  Control characters
    \xHH            Byte HH (must be valid UTF-8 on its own)
    \.  \w  \s      Kept with the backslash, for regular expressions

  Any other escape is an error.
"#;

const EXPANDERS_DOC: &str = r#"EXPANDERS - Looking Up Path Segments

  --expander attribute   Exact-case record attributes (default)
  --expander lowercase   Segments are lowercased before lookup
  --expander key         JSON objects are maps; segments are keys

  With the attribute expanders a nested object in the path is descended
  into. With the key expander a nested object reached before the last
  segment is tested whole, so contains and inset see its keys.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_aliases() {
        assert_eq!(DocCategory::from_name("OPS"), Some(DocCategory::Operators));
        assert_eq!(DocCategory::from_name("resolvers"), Some(DocCategory::Expanders));
        assert!(matches!(get_doc_category("nope"), Err(CliError::UnknownCategory(_))));
    }
}
