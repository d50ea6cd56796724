//! Catalogue of languages offered as search filters.

/// Language names in the spelling GitHub's `language:` qualifier expects.
pub const LANGUAGES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C#",
    "C++",
    "Ruby",
    "Go",
    "Swift",
    "Kotlin",
    "PHP",
    "HTML",
    "CSS",
    "Shell",
    "Objective-C",
    "Scala",
    "Rust",
    "Dart",
    "Perl",
    "Haskell",
    "Lua",
    "R",
    "Elixir",
    "Clojure",
    "Erlang",
    "Groovy",
    "VimL",
    "CoffeeScript",
    "F#",
    "PowerShell",
    "Visual Basic",
    "Matlab",
    "Assembly",
    "Fortran",
    "COBOL",
    "Pascal",
    "Ada",
    "Prolog",
    "Lisp",
    "Scheme",
    "Julia",
    "Crystal",
    "Nim",
    "OCaml",
    "Racket",
    "Smalltalk",
    "Tcl",
    "ActionScript",
    "ColdFusion",
    "D",
    "Forth",
    "Hack",
    "J",
    "LiveScript",
    "Nix",
    "PureScript",
    "QML",
    "Reason",
    "Solidity",
    "VHDL",
    "Verilog",
    "Zig",
];

/// Look up the catalogue spelling of `name`, ignoring ASCII case.
pub fn canonical_language(name: &str) -> Option<&'static str> {
    let name = name.trim();
    LANGUAGES
        .iter()
        .copied()
        .find(|l| l.eq_ignore_ascii_case(name))
}

/// Normalise a filter list: trim, use catalogue spelling where known, drop
/// blanks and repeats while keeping first-seen order.
pub fn normalize_languages<I, S>(languages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for raw in languages {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let name = canonical_language(raw).map_or_else(|| raw.to_string(), str::to_string);
        if !out.iter().any(|l| l.eq_ignore_ascii_case(&name)) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalogue_has_no_duplicates() {
        let unique: HashSet<_> = LANGUAGES.iter().collect();
        assert_eq!(unique.len(), LANGUAGES.len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(canonical_language("rust"), Some("Rust"));
        assert_eq!(canonical_language("  c++ "), Some("C++"));
        assert_eq!(canonical_language("Brainfuck"), None);
    }

    #[test]
    fn normalize_dedupes_and_keeps_order() {
        let langs = normalize_languages(["go", "Rust", "", "GO", "Brainfuck"]);
        assert_eq!(langs, vec!["Go", "Rust", "Brainfuck"]);
    }
}
